//! Status rules deciding which activities count for a statistic

use aniwrap_common::models::{
    ActivityKind, ActivityRecord, ActivityStatus, MediaFormat, MediaSnapshot, RelationEdge,
    RelationType,
};

/// Which activities a statistic accepts as consumption events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSet {
    /// Watched or rewatched episodes, full rewatches, and completions of
    /// anime-list entries
    Default,
    /// Rewatched episodes and full rewatches only
    RewatchOnly,
    /// The default statuses, restricted to non-sequel, non-movie media that
    /// aired in the given year
    Seasonal {
        /// Year the media must have aired in
        year: i32,
    },
}

impl RuleSet {
    /// Whether the record counts as a consumption event under these rules
    pub fn qualifies(self, record: &ActivityRecord) -> bool {
        match self {
            Self::Default => qualifies_default(record),
            Self::RewatchOnly => matches!(
                record.status,
                Some(ActivityStatus::RewatchedEpisode | ActivityStatus::Rewatched)
            ),
            Self::Seasonal { year } => {
                qualifies_default(record)
                    && record
                        .media
                        .as_ref()
                        .is_some_and(|media| is_seasonal(media, year))
            }
        }
    }
}

fn qualifies_default(record: &ActivityRecord) -> bool {
    match record.status {
        Some(
            ActivityStatus::WatchedEpisode
            | ActivityStatus::RewatchedEpisode
            | ActivityStatus::Rewatched,
        ) => true,
        Some(ActivityStatus::Completed) => record.kind == Some(ActivityKind::AnimeList),
        _ => false,
    }
}

fn is_seasonal(media: &MediaSnapshot, year: i32) -> bool {
    media.season_year == Some(year)
        && media.format != Some(MediaFormat::Movie)
        && !is_sequel(&media.relations)
}

/// True iff any relation edge marks a prequel, meaning this media continues
/// an earlier one
pub fn is_sequel(relations: &[RelationEdge]) -> bool {
    relations
        .iter()
        .any(|edge| edge.relation_type == RelationType::Prequel)
}
