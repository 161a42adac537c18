//! End-to-end report assembly over a canned activity source

use aniwrap_common::models::{
    ActivityKind, ActivityRecord, ActivityStatus, MediaFormat, MediaListEntry, MediaSnapshot,
    MediaType, Page, RelationEdge, RelationType, StudioSnapshot, TagSnapshot,
};
use aniwrap_common::{AniwrapError, Result};
use aniwrap_stats::source::collect_activities;
use aniwrap_stats::{build_report, ActivitySource};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};

struct StubSource {
    activity_pages: Vec<Page<ActivityRecord>>,
    media_list: Vec<MediaListEntry>,
    favorites: Vec<String>,
    activity_fetches: AtomicU32,
}

#[async_trait]
impl ActivitySource for StubSource {
    async fn activity_page(&self, page: u32) -> Result<Page<ActivityRecord>> {
        self.activity_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .activity_pages
            .get(page as usize)
            .cloned()
            .unwrap_or_else(Page::empty))
    }

    async fn media_list_page(&self, _page: u32) -> Result<Page<MediaListEntry>> {
        Ok(Page {
            entries: self.media_list.clone(),
            has_next: false,
        })
    }

    async fn favorites_page(&self, _page: u32) -> Result<Page<String>> {
        Ok(Page {
            entries: self.favorites.clone(),
            has_next: false,
        })
    }
}

struct FailingSource;

#[async_trait]
impl ActivitySource for FailingSource {
    async fn activity_page(&self, _page: u32) -> Result<Page<ActivityRecord>> {
        Err(AniwrapError::api("activity feed unavailable"))
    }

    async fn media_list_page(&self, _page: u32) -> Result<Page<MediaListEntry>> {
        Ok(Page::empty())
    }

    async fn favorites_page(&self, _page: u32) -> Result<Page<String>> {
        Ok(Page::empty())
    }
}

fn tag(name: &str, category: &str, rank: u32) -> TagSnapshot {
    TagSnapshot {
        name: name.to_string(),
        category: category.to_string(),
        rank,
    }
}

fn studio(name: &str) -> StudioSnapshot {
    StudioSnapshot {
        name: name.to_string(),
        is_animation_studio: true,
    }
}

fn event(media: MediaSnapshot, status: ActivityStatus, progress: Option<&str>) -> ActivityRecord {
    ActivityRecord {
        status: Some(status),
        kind: Some(ActivityKind::AnimeList),
        progress: progress.map(str::to_string),
        media: Some(media),
    }
}

fn list_entry(title: &str, score: f64) -> MediaListEntry {
    MediaListEntry {
        title: title.to_string(),
        media_type: Some(MediaType::Anime),
        score,
    }
}

fn frieren() -> MediaSnapshot {
    MediaSnapshot {
        title: "Sousou no Frieren".to_string(),
        duration: Some(24),
        season_year: Some(2023),
        format: Some(MediaFormat::Tv),
        average_score: Some(92.0),
        genres: vec!["Fantasy".to_string(), "Drama".to_string()],
        relations: Vec::new(),
        tags: vec![
            tag("Magic", "Theme-Fantasy", 90),
            tag("Elf", "Cast-Traits", 80),
            tag("Shounen", "Demographic", 75),
        ],
        studios: vec![studio("Madhouse")],
    }
}

fn keion() -> MediaSnapshot {
    MediaSnapshot {
        title: "K-On!".to_string(),
        duration: Some(24),
        season_year: Some(2009),
        format: Some(MediaFormat::Tv),
        average_score: Some(82.0),
        genres: vec!["Music".to_string(), "Comedy".to_string()],
        tags: vec![tag("Band", "Theme-Arts", 80)],
        studios: vec![studio("Kyoto Animation")],
        ..MediaSnapshot::default()
    }
}

fn suzume() -> MediaSnapshot {
    MediaSnapshot {
        title: "Suzume no Tojimari".to_string(),
        duration: Some(122),
        season_year: Some(2023),
        format: Some(MediaFormat::Movie),
        average_score: Some(94.0),
        genres: vec!["Fantasy".to_string()],
        studios: vec![studio("CoMix Wave Films")],
        ..MediaSnapshot::default()
    }
}

fn titan_final() -> MediaSnapshot {
    MediaSnapshot {
        title: "Shingeki no Kyojin: The Final Season".to_string(),
        duration: Some(24),
        season_year: Some(2023),
        format: Some(MediaFormat::Tv),
        average_score: Some(90.0),
        genres: vec!["Action".to_string()],
        relations: vec![RelationEdge {
            relation_type: RelationType::Prequel,
        }],
        tags: vec![
            tag("Military", "Theme-Other", 85),
            tag("Shounen", "Demographic", 80),
        ],
        studios: vec![studio("Madhouse")],
        ..MediaSnapshot::default()
    }
}

fn mystery_show() -> MediaSnapshot {
    MediaSnapshot {
        title: "Deleted From List".to_string(),
        duration: Some(20),
        ..MediaSnapshot::default()
    }
}

/// Four listed shows plus one watched show that was since removed from the
/// list, spread over three activity pages.
fn fixture_source() -> StubSource {
    let pages = vec![
        Page {
            entries: vec![
                event(frieren(), ActivityStatus::WatchedEpisode, Some("1 - 10")),
                event(keion(), ActivityStatus::RewatchedEpisode, Some("1 - 4")),
            ],
            has_next: true,
        },
        Page {
            entries: vec![event(suzume(), ActivityStatus::Completed, None)],
            has_next: true,
        },
        Page {
            entries: vec![
                event(titan_final(), ActivityStatus::WatchedEpisode, Some("1")),
                event(mystery_show(), ActivityStatus::WatchedEpisode, Some("1")),
            ],
            has_next: false,
        },
    ];
    StubSource {
        activity_pages: pages,
        media_list: vec![
            list_entry("Sousou no Frieren", 95.0),
            list_entry("K-On!", 88.0),
            list_entry("Suzume no Tojimari", 90.0),
            list_entry("Shingeki no Kyojin: The Final Season", 85.0),
        ],
        favorites: vec!["K-On!".to_string()],
        activity_fetches: AtomicU32::new(0),
    }
}

#[tokio::test]
async fn test_collect_drains_every_page() {
    let source = fixture_source();

    let records = collect_activities(&source).await.unwrap();

    assert_eq!(records.len(), 5);
    assert_eq!(source.activity_fetches.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_build_report_end_to_end() {
    let source = fixture_source();

    let report = build_report(&source, "hikari", 2023).await.unwrap();

    assert_eq!(report.username, "hikari");
    assert_eq!(report.year, 2023);

    // 240 + 96 + 122 + 24 + 20 minutes across the five shows
    assert!((report.days_watched - 502.0 / 1440.0).abs() < 1e-9);
    // Only the K-On! rewatch
    assert!((report.rewatch_days - 96.0 / 1440.0).abs() < 1e-9);
    // Frieren alone: the movie, the sequel and the 2009 show all fall out
    assert!((report.seasonal_days - 240.0 / 1440.0).abs() < 1e-9);

    // Four listed titles in score order; the unlisted show is skipped
    assert_eq!(
        report.top_five,
        vec![
            "Sousou no Frieren",
            "Suzume no Tojimari",
            "K-On!",
            "Shingeki no Kyojin: The Final Season",
        ]
    );

    assert_eq!(report.favorite_genre.as_deref(), Some("Fantasy"));
    assert_eq!(report.favorite_studio.as_deref(), Some("Madhouse"));

    let most = report.most_watched.expect("a most-watched show");
    assert_eq!(most.title, "Sousou no Frieren");
    assert_eq!(most.minutes, 240);

    let themes: Vec<&str> = report.top_themes.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(themes, vec!["Magic", "Military", "Band"]);

    assert_eq!(report.top_cast_traits.len(), 1);
    assert_eq!(report.top_cast_traits[0].name, "Elf");
    assert_eq!(report.top_cast_traits[0].weight, 80);

    let demographic = report.demographic.expect("a leading demographic");
    assert_eq!(demographic.name, "Shounen");
    assert_eq!(demographic.weight, 75 + 80);

    // Gaps: +3, +6, -4, -5
    assert!((report.controversy_score.unwrap() - 4.5).abs() < 1e-9);
    assert!(report.rating_bias.unwrap().abs() < 1e-9);

    assert_eq!(report.score_distribution.len(), 20);
    assert_eq!(report.score_distribution.iter().sum::<u64>(), 4);
    assert_eq!(report.score_distribution[19], 1);
    assert_eq!(report.score_distribution[18], 1);
    assert_eq!(report.score_distribution[17], 2);
}

#[tokio::test]
async fn test_build_report_aborts_on_fetch_error() {
    let result = build_report(&FailingSource, "hikari", 2023).await;
    assert!(result.is_err());
}
