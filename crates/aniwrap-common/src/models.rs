//! Typed AniList domain model shared across the workspace
//!
//! Activity records arrive from a GraphQL union, so every field on
//! [`ActivityRecord`] is optional: non-list activities (text posts, messages)
//! decode as empty fragments and are dropped by the classifier. Media titles
//! are plain display strings and serve as the deduplication and join key
//! across all statistics; there is deliberately no numeric id here.

use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// AniList user identifier
pub type UserId = i64;

/// Fixed page size used by every paginated query
pub const PAGE_SIZE: u32 = 50;

/// Status attached to a list activity, as AniList phrases it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityStatus {
    /// One or more episodes watched for the first time
    #[serde(rename = "watched episode")]
    WatchedEpisode,
    /// One or more episodes rewatched
    #[serde(rename = "rewatched episode")]
    RewatchedEpisode,
    /// A full rewatch of the show
    #[serde(rename = "rewatched")]
    Rewatched,
    /// The show was marked completed
    #[serde(rename = "completed")]
    Completed,
    /// Any other status (plans to watch, paused, dropped, ...)
    #[serde(other)]
    Other,
}

/// Kind of list the activity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityKind {
    /// An anime-list update
    AnimeList,
    /// Anything else (manga list, text, message)
    #[serde(other)]
    Other,
}

/// Media release format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaFormat {
    /// Televised series
    Tv,
    /// Short-form televised series
    TvShort,
    /// Theatrical release
    Movie,
    /// Special episode
    Special,
    /// Original video animation
    Ova,
    /// Original net animation
    Ona,
    /// Music video
    Music,
    /// Unrecognized format
    #[default]
    #[serde(other)]
    Unknown,
}

/// Relation between two media entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationType {
    /// The related media precedes this one
    Prequel,
    /// The related media follows this one
    Sequel,
    /// Any other relation (side story, adaptation, ...)
    #[serde(other)]
    Other,
}

/// Kind of media a list entry refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaType {
    /// Anime entry
    Anime,
    /// Manga entry
    Manga,
    /// Unrecognized media type
    #[serde(other)]
    Other,
}

/// One edge of a media's relation graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationEdge {
    /// How the related media relates to this one
    pub relation_type: RelationType,
}

/// One tag attached to a media entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSnapshot {
    /// Tag display name
    pub name: String,
    /// Tag category, e.g. `Theme-Fantasy`, `Cast-Traits`, `Demographic`
    pub category: String,
    /// Relevance rank (0-100) AniList assigns the tag on this media
    pub rank: u32,
}

/// One studio credited on a media entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudioSnapshot {
    /// Studio display name
    pub name: String,
    /// Whether the studio is an animation studio (as opposed to e.g. a
    /// production committee member)
    pub is_animation_studio: bool,
}

/// Denormalized media metadata attached to an activity
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MediaSnapshot {
    /// Romaji display title; the dedup and join key for every statistic
    pub title: String,
    /// Minutes per episode, when AniList knows it
    pub duration: Option<u32>,
    /// Year the media aired in
    pub season_year: Option<i32>,
    /// Release format
    pub format: Option<MediaFormat>,
    /// Global average score on the 0-100 scale, when enough users rated it
    pub average_score: Option<f64>,
    /// Genre names
    pub genres: Vec<String>,
    /// Relation edges, used only to detect prequels
    pub relations: Vec<RelationEdge>,
    /// Tags with category and rank
    pub tags: Vec<TagSnapshot>,
    /// Credited studios
    pub studios: Vec<StudioSnapshot>,
}

/// One list-update event from the user's activity feed
///
/// Immutable once fetched; it has no identity beyond its position in the
/// paginated stream.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActivityRecord {
    /// What happened, if this was a list activity at all
    pub status: Option<ActivityStatus>,
    /// Which list the activity belongs to
    pub kind: Option<ActivityKind>,
    /// Episode progress text: a single number or an inclusive `start - end`
    /// range
    pub progress: Option<String>,
    /// The media the activity refers to
    pub media: Option<MediaSnapshot>,
}

impl ActivityRecord {
    /// Display title of the underlying media, if present
    pub fn title(&self) -> Option<&str> {
        self.media.as_ref().map(|m| m.title.as_str())
    }
}

/// One entry of the user's full anime list
#[derive(Debug, Clone, PartialEq)]
pub struct MediaListEntry {
    /// Romaji display title
    pub title: String,
    /// What kind of media the entry is; only ANIME entries feed the score
    /// index
    pub media_type: Option<MediaType>,
    /// The user's personal score, 0-100 scale; 0 means unscored
    pub score: f64,
}

/// One page of a paginated query
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Records on this page, in feed order
    pub entries: Vec<T>,
    /// Whether the source reports further pages
    pub has_next: bool,
}

impl<T> Page<T> {
    /// A terminal empty page
    pub const fn empty() -> Self {
        Self {
            entries: Vec::new(),
            has_next: false,
        }
    }
}

/// UTC calendar-year bounds for the activity feed query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearWindow {
    /// The target calendar year
    pub year: i32,
}

impl YearWindow {
    /// Window covering the given calendar year
    pub const fn new(year: i32) -> Self {
        Self { year }
    }

    /// Unix timestamp of January 1st, 00:00 UTC of the target year
    pub fn start_epoch(self) -> i64 {
        Utc.with_ymd_and_hms(self.year, 1, 1, 0, 0, 0)
            .single()
            .map_or(0, |dt| dt.timestamp())
    }

    /// Unix timestamp of January 1st, 00:00 UTC of the following year
    ///
    /// Used as an exclusive upper bound on activity creation time.
    pub fn end_epoch(self) -> i64 {
        Utc.with_ymd_and_hms(self.year + 1, 1, 1, 0, 0, 0)
            .single()
            .map_or(i64::MAX, |dt| dt.timestamp())
    }
}
