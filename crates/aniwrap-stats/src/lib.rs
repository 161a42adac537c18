//! # Aniwrap Stats
//!
//! The activity aggregation pipeline: paginates a user's activity feed,
//! classifies each event against per-statistic status rules, resolves watch
//! durations, and folds the stream into the year-in-review statistics.
//!
//! Every statistic drives its own full pagination pass over the
//! [`source::ActivitySource`]; the passes share no state beyond the
//! read-only (user, year) binding and may run concurrently.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod classifier;
pub mod duration;
pub mod report;
pub mod score_index;
pub mod score_stats;
pub mod source;
pub mod tallies;
pub mod tiebreak;
pub mod watch_time;

pub use classifier::RuleSet;
pub use report::{build_report, TagWeight, WrappedReport};
pub use score_index::ScoreIndex;
pub use source::{ActivitySource, AnilistSource};
pub use tiebreak::FavoritesSet;
pub use watch_time::ShowTime;
