//! Top-list selection with favorite-aware tie-breaking

use std::collections::HashSet;
use tracing::debug;

/// The user's favorited anime titles, kept in profile order
#[derive(Debug, Clone, Default)]
pub struct FavoritesSet {
    titles: Vec<String>,
    lookup: HashSet<String>,
}

impl FavoritesSet {
    /// Build the set from titles in profile order
    pub fn new(titles: Vec<String>) -> Self {
        let lookup = titles.iter().cloned().collect();
        Self { titles, lookup }
    }

    /// Whether `title` is favorited
    pub fn contains(&self, title: &str) -> bool {
        self.lookup.contains(title)
    }

    /// Titles in profile order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.titles.iter().map(String::as_str)
    }

    /// Number of favorited titles
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

/// Pick the `limit` best titles from `scored`, breaking cutoff ties in
/// favor of favorited shows
///
/// Titles scoring strictly above the cutoff always make the list. When the
/// titles sitting exactly on the cutoff score do not all fit, favorited ones
/// claim the open slots first (in profile order) and the rest fill in score
/// order.
pub fn select_top(scored: &[(String, f64)], favorites: &FavoritesSet, limit: usize) -> Vec<String> {
    if limit == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<&(String, f64)> = scored.iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    if ranked.len() <= limit {
        return ranked.into_iter().map(|entry| entry.0.clone()).collect();
    }

    let threshold = ranked[limit - 1].1;
    let strict: Vec<&str> = ranked
        .iter()
        .filter(|entry| entry.1 > threshold)
        .map(|entry| entry.0.as_str())
        .collect();
    let tied: Vec<&str> = ranked
        .iter()
        .filter(|entry| entry.1.total_cmp(&threshold).is_eq())
        .map(|entry| entry.0.as_str())
        .collect();

    let slots = limit - strict.len();
    let mut picked: Vec<&str> = Vec::with_capacity(slots);
    for favorite in favorites.iter() {
        if picked.len() == slots {
            break;
        }
        if tied.contains(&favorite) && !picked.contains(&favorite) {
            picked.push(favorite);
        }
    }
    for title in &tied {
        if picked.len() == slots {
            break;
        }
        if !picked.contains(title) {
            picked.push(title);
        }
    }

    debug!(
        "Selected {} titles above the cutoff and {} from the tie group",
        strict.len(),
        slots
    );

    strict.into_iter().chain(picked).map(str::to_string).collect()
}
