//! Title to personal-score lookup built from the user's full list

use aniwrap_common::models::{MediaListEntry, MediaType};
use std::collections::HashMap;
use tracing::debug;

/// Personal scores keyed by romaji title
///
/// Built from the user's full media list, anime entries only. The display
/// title is the join key against activity records; a score of 0 means the
/// entry is unscored.
#[derive(Debug, Clone, Default)]
pub struct ScoreIndex {
    scores: HashMap<String, f64>,
}

impl ScoreIndex {
    /// Build the index from full-list entries, keeping anime entries only
    ///
    /// Later entries overwrite earlier ones with the same title.
    pub fn from_entries(entries: Vec<MediaListEntry>) -> Self {
        let mut scores = HashMap::new();
        for entry in entries {
            if entry.media_type == Some(MediaType::Anime) {
                scores.insert(entry.title, entry.score);
            }
        }
        debug!("Indexed scores for {} titles", scores.len());
        Self { scores }
    }

    /// The user's score for a title, if the title exists in the list
    pub fn get(&self, title: &str) -> Option<f64> {
        self.scores.get(title).copied()
    }

    /// Number of indexed titles
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Whether the index holds no titles
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
