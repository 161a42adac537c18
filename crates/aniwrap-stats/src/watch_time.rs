//! Time-based statistics over the qualifying event stream

use crate::classifier::RuleSet;
use crate::duration::resolve_minutes;
use crate::tallies::OrderedTally;
use aniwrap_common::models::ActivityRecord;
use aniwrap_common::Result;
use serde::Serialize;
use tracing::debug;

/// Minutes in one day
const MINUTES_PER_DAY: f64 = 60.0 * 24.0;

/// Cumulative time spent on one show
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowTime {
    /// Romaji display title
    pub title: String,
    /// Total minutes across every qualifying event
    pub minutes: u64,
}

/// Total minutes across every qualifying event
///
/// No per-title dedup here: repeated episodes of the same show all add
/// minutes.
pub fn total_minutes(records: &[ActivityRecord], rules: RuleSet) -> Result<u64> {
    let mut minutes = 0;
    for record in records {
        if rules.qualifies(record) {
            minutes += resolve_minutes(record)?;
        }
    }
    debug!("Accumulated {} minutes", minutes);
    Ok(minutes)
}

/// Convert minutes to fractional days
pub fn minutes_to_days(minutes: u64) -> f64 {
    minutes as f64 / MINUTES_PER_DAY
}

/// The show with the most cumulative minutes, first reached on ties
///
/// `None` when no event qualifies.
pub fn most_watched(records: &[ActivityRecord], rules: RuleSet) -> Result<Option<ShowTime>> {
    let mut tally = OrderedTally::new();
    for record in records {
        if !rules.qualifies(record) {
            continue;
        }
        let minutes = resolve_minutes(record)?;
        if let Some(title) = record.title() {
            tally.add(title, minutes);
        }
    }

    debug!("Accumulated minutes for {} shows", tally.len());
    Ok(tally.max_key().map(|title| ShowTime {
        title: title.to_string(),
        minutes: tally.get(title),
    }))
}
