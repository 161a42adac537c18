//! Insertion-ordered tallies and the per-category tally builders

use crate::classifier::RuleSet;
use aniwrap_common::models::ActivityRecord;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Category prefix selecting theme tags
const THEME_PREFIX: &str = "Theme-";
/// Exact category of cast-trait tags
const CAST_TRAITS_CATEGORY: &str = "Cast-Traits";
/// Exact category of demographic tags
const DEMOGRAPHIC_CATEGORY: &str = "Demographic";

/// Tally that remembers first-seen order
///
/// Winner selection reports the first key to reach the maximum in insertion
/// order; there is deliberately no further tie-break rule.
#[derive(Debug, Clone, Default)]
pub struct OrderedTally {
    counts: HashMap<String, u64>,
    order: Vec<String>,
}

impl OrderedTally {
    /// An empty tally
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to `key`, registering the key on first sight
    pub fn add(&mut self, key: &str, amount: u64) {
        if let Some(count) = self.counts.get_mut(key) {
            *count += amount;
        } else {
            self.counts.insert(key.to_string(), amount);
            self.order.push(key.to_string());
        }
    }

    /// Total recorded for `key`
    pub fn get(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// The first key to reach the maximum total, in insertion order
    pub fn max_key(&self) -> Option<&str> {
        let mut best: Option<(&str, u64)> = None;
        for key in &self.order {
            let count = self.get(key);
            match best {
                Some((_, best_count)) if count <= best_count => {}
                _ => best = Some((key, count)),
            }
        }
        best.map(|(key, _)| key)
    }

    /// Up to `n` (key, total) pairs, highest first; ties keep insertion order
    pub fn top_n(&self, n: usize) -> Vec<(String, u64)> {
        let mut pairs: Vec<(String, u64)> = self
            .order
            .iter()
            .map(|key| (key.clone(), self.get(key)))
            .collect();
        pairs.sort_by(|a, b| b.1.cmp(&a.1));
        pairs.truncate(n);
        pairs
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing has been tallied
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Genre occurrence counts across deduplicated qualifying titles
pub fn genre_tally(records: &[ActivityRecord], rules: RuleSet) -> OrderedTally {
    let mut tally = OrderedTally::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for record in records {
        if !rules.qualifies(record) {
            continue;
        }
        let Some(media) = record.media.as_ref() else {
            continue;
        };
        if !seen.insert(media.title.as_str()) {
            continue;
        }
        for genre in &media.genres {
            tally.add(genre, 1);
        }
    }

    debug!("Tallied {} genres across {} titles", tally.len(), seen.len());
    tally
}

/// Animation-studio occurrence counts across deduplicated qualifying titles
///
/// Studios not flagged as animation studios are left out.
pub fn studio_tally(records: &[ActivityRecord], rules: RuleSet) -> OrderedTally {
    let mut tally = OrderedTally::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for record in records {
        if !rules.qualifies(record) {
            continue;
        }
        let Some(media) = record.media.as_ref() else {
            continue;
        };
        if !seen.insert(media.title.as_str()) {
            continue;
        }
        for studio in &media.studios {
            if studio.is_animation_studio {
                tally.add(&studio.name, 1);
            }
        }
    }

    debug!("Tallied {} studios across {} titles", tally.len(), seen.len());
    tally
}

/// Rank-weighted tag tallies split by tag category
#[derive(Debug, Clone, Default)]
pub struct TagTallies {
    /// Tags in `Theme-` prefixed categories
    pub themes: OrderedTally,
    /// Tags in the `Cast-Traits` category
    pub cast_traits: OrderedTally,
    /// Tags in the `Demographic` category
    pub demographics: OrderedTally,
}

/// Accumulate tag ranks per category across deduplicated qualifying titles
///
/// Tags weigh by their rank, not by occurrence count. Categories outside the
/// three reported ones are ignored.
pub fn tag_tallies(records: &[ActivityRecord], rules: RuleSet) -> TagTallies {
    let mut tallies = TagTallies::default();
    let mut seen: HashSet<&str> = HashSet::new();

    for record in records {
        if !rules.qualifies(record) {
            continue;
        }
        let Some(media) = record.media.as_ref() else {
            continue;
        };
        if !seen.insert(media.title.as_str()) {
            continue;
        }
        for tag in &media.tags {
            let rank = u64::from(tag.rank);
            if tag.category == DEMOGRAPHIC_CATEGORY {
                tallies.demographics.add(&tag.name, rank);
            } else if tag.category == CAST_TRAITS_CATEGORY {
                tallies.cast_traits.add(&tag.name, rank);
            } else if tag.category.starts_with(THEME_PREFIX) {
                tallies.themes.add(&tag.name, rank);
            }
        }
    }

    debug!(
        "Tallied {} themes, {} cast traits, {} demographics",
        tallies.themes.len(),
        tallies.cast_traits.len(),
        tallies.demographics.len()
    );
    tallies
}

#[cfg(test)]
mod tests {
    use super::*;
    use aniwrap_common::models::{
        ActivityKind, ActivityStatus, MediaSnapshot, StudioSnapshot, TagSnapshot,
    };

    fn watched(title: &str, media: MediaSnapshot) -> ActivityRecord {
        ActivityRecord {
            status: Some(ActivityStatus::WatchedEpisode),
            kind: Some(ActivityKind::AnimeList),
            progress: Some("1".to_string()),
            media: Some(MediaSnapshot {
                title: title.to_string(),
                ..media
            }),
        }
    }

    fn with_genres(genres: &[&str]) -> MediaSnapshot {
        MediaSnapshot {
            genres: genres.iter().map(|g| (*g).to_string()).collect(),
            ..MediaSnapshot::default()
        }
    }

    #[test]
    fn test_ordered_tally_first_max_wins() {
        let mut tally = OrderedTally::new();
        tally.add("Action", 1);
        tally.add("Drama", 1);
        tally.add("Action", 1);
        tally.add("Comedy", 2);

        // Action and Comedy both total 2; Action was seen first
        assert_eq!(tally.max_key(), Some("Action"));
        assert_eq!(tally.get("Action"), 2);
        assert_eq!(tally.get("Missing"), 0);
    }

    #[test]
    fn test_ordered_tally_top_n_is_stable() {
        let mut tally = OrderedTally::new();
        tally.add("A", 5);
        tally.add("B", 9);
        tally.add("C", 5);
        tally.add("D", 1);

        let top = tally.top_n(3);
        assert_eq!(
            top,
            vec![
                ("B".to_string(), 9),
                ("A".to_string(), 5),
                ("C".to_string(), 5),
            ]
        );
    }

    #[test]
    fn test_empty_tally_has_no_winner() {
        let tally = OrderedTally::new();
        assert!(tally.is_empty());
        assert_eq!(tally.max_key(), None);
        assert!(tally.top_n(3).is_empty());
    }

    #[test]
    fn test_genre_tally_dedups_titles() {
        // The same title twice must increment each genre once, not twice
        let records = vec![
            watched("Frieren", with_genres(&["Adventure", "Fantasy"])),
            watched("Frieren", with_genres(&["Adventure", "Fantasy"])),
            watched("Bocchi the Rock!", with_genres(&["Comedy"])),
        ];

        let tally = genre_tally(&records, RuleSet::Default);
        assert_eq!(tally.get("Adventure"), 1);
        assert_eq!(tally.get("Fantasy"), 1);
        assert_eq!(tally.get("Comedy"), 1);
    }

    #[test]
    fn test_genre_tally_skips_non_qualifying() {
        let mut planning = watched("Frieren", with_genres(&["Fantasy"]));
        planning.status = Some(ActivityStatus::Other);

        let tally = genre_tally(&[planning], RuleSet::Default);
        assert!(tally.is_empty());
    }

    #[test]
    fn test_studio_tally_requires_animation_flag() {
        let media = MediaSnapshot {
            studios: vec![
                StudioSnapshot {
                    name: "Madhouse".to_string(),
                    is_animation_studio: true,
                },
                StudioSnapshot {
                    name: "Aniplex".to_string(),
                    is_animation_studio: false,
                },
            ],
            ..MediaSnapshot::default()
        };

        let tally = studio_tally(&[watched("Frieren", media)], RuleSet::Default);
        assert_eq!(tally.get("Madhouse"), 1);
        assert_eq!(tally.get("Aniplex"), 0);
    }

    #[test]
    fn test_tag_tallies_split_by_category_and_sum_ranks() {
        let tag = |name: &str, category: &str, rank| TagSnapshot {
            name: name.to_string(),
            category: category.to_string(),
            rank,
        };
        let records = vec![
            watched(
                "Frieren",
                MediaSnapshot {
                    tags: vec![
                        tag("Magic", "Theme-Fantasy", 90),
                        tag("Elf", "Cast-Traits", 80),
                        tag("Shounen", "Demographic", 70),
                        tag("Primarily Adult Cast", "Cast-Main Cast", 60),
                    ],
                    ..MediaSnapshot::default()
                },
            ),
            watched(
                "Mushoku Tensei",
                MediaSnapshot {
                    tags: vec![tag("Magic", "Theme-Fantasy", 60)],
                    ..MediaSnapshot::default()
                },
            ),
        ];

        let tallies = tag_tallies(&records, RuleSet::Default);
        assert_eq!(tallies.themes.get("Magic"), 150);
        assert_eq!(tallies.cast_traits.get("Elf"), 80);
        assert_eq!(tallies.demographics.get("Shounen"), 70);
        // Cast-Main Cast is not a reported category
        assert_eq!(tallies.cast_traits.get("Primarily Adult Cast"), 0);
        assert!(tallies.themes.max_key() == Some("Magic"));
    }
}
