//! Resolves the minutes one qualifying activity contributes

use aniwrap_common::models::{ActivityRecord, ActivityStatus};
use aniwrap_common::{AniwrapError, Result};

/// Title used in errors when an activity carries no media
const UNTITLED: &str = "<unknown>";

/// Minutes contributed by one qualifying activity
///
/// Episode statuses parse the progress text: a single number counts one
/// episode, an inclusive `start - end` range counts `end - start + 1`
/// episodes. Every other status counts one full watch-through of the
/// per-episode duration. A missing duration is a hard error; zero minutes
/// would silently understate every time total.
pub fn resolve_minutes(record: &ActivityRecord) -> Result<u64> {
    let title = record.title().unwrap_or(UNTITLED);
    let duration = record
        .media
        .as_ref()
        .and_then(|media| media.duration)
        .ok_or_else(|| AniwrapError::missing_duration(title))?;
    let duration = u64::from(duration);

    match record.status {
        Some(ActivityStatus::WatchedEpisode | ActivityStatus::RewatchedEpisode) => {
            let progress = record.progress.as_deref().unwrap_or("");
            Ok(episode_count(progress, title)? * duration)
        }
        _ => Ok(duration),
    }
}

/// Number of episodes a progress string covers
///
/// The first and last whitespace-separated tokens are the inclusive range
/// bounds; a single token is a one-episode range. Anything else indicates an
/// upstream format change and fails hard.
fn episode_count(progress: &str, title: &str) -> Result<u64> {
    let malformed = || AniwrapError::malformed_progress(progress, title);

    let tokens: Vec<&str> = progress.split_whitespace().collect();
    let (Some(first), Some(last)) = (tokens.first(), tokens.last()) else {
        return Err(malformed());
    };

    let start: u64 = first.parse().map_err(|_| malformed())?;
    let end: u64 = last.parse().map_err(|_| malformed())?;
    if end < start {
        return Err(malformed());
    }

    Ok(end - start + 1)
}
