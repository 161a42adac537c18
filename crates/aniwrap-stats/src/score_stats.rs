//! Score statistics joining the event stream against the user's list scores

use crate::classifier::RuleSet;
use crate::score_index::ScoreIndex;
use aniwrap_common::models::ActivityRecord;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Number of histogram buckets covering the 100-point scale
pub const BUCKET_COUNT: usize = 20;

/// Width of one histogram bucket in score points
const BUCKET_WIDTH: f64 = 5.0;

/// Unique qualifying titles paired with the user's list score
///
/// Joins each first-seen title against the score index. Titles absent from
/// the index are logged and skipped. Unscored titles join with a zero.
pub fn scored_titles(
    records: &[ActivityRecord],
    rules: RuleSet,
    index: &ScoreIndex,
) -> Vec<(String, f64)> {
    let mut seen = HashSet::new();
    let mut scored = Vec::new();
    for record in records {
        if !rules.qualifies(record) {
            continue;
        }
        let Some(title) = record.title() else {
            continue;
        };
        if !seen.insert(title.to_string()) {
            continue;
        }
        match index.get(title) {
            Some(score) => scored.push((title.to_string(), score)),
            None => warn!("Title {:?} missing from the user's list, skipping", title),
        }
    }

    debug!("Joined scores for {} titles", scored.len());
    scored
}

/// Per-title (personal, site average) pairs for the bias statistics
///
/// Only titles the user actually scored and whose media carries a site
/// average contribute a pair.
fn score_pairs(records: &[ActivityRecord], rules: RuleSet, index: &ScoreIndex) -> Vec<(f64, f64)> {
    let mut seen = HashSet::new();
    let mut pairs = Vec::new();
    for record in records {
        if !rules.qualifies(record) {
            continue;
        }
        let Some(media) = record.media.as_ref() else {
            continue;
        };
        if !seen.insert(media.title.clone()) {
            continue;
        }
        let Some(personal) = index.get(&media.title) else {
            warn!("Title {:?} missing from the user's list, skipping", media.title);
            continue;
        };
        if personal <= 0.0 {
            continue;
        }
        let Some(average) = media.average_score else {
            continue;
        };
        pairs.push((personal, average));
    }
    pairs
}

/// Mean absolute gap between the user's score and the site average
///
/// `None` when no title has both a personal score and a site average.
pub fn controversy_score(
    records: &[ActivityRecord],
    rules: RuleSet,
    index: &ScoreIndex,
) -> Option<f64> {
    mean(
        score_pairs(records, rules, index)
            .iter()
            .map(|(personal, average)| (personal - average).abs()),
    )
}

/// Mean signed gap between the user's score and the site average
///
/// Positive means the user rates above the crowd, negative below.
pub fn rating_bias(records: &[ActivityRecord], rules: RuleSet, index: &ScoreIndex) -> Option<f64> {
    mean(
        score_pairs(records, rules, index)
            .iter()
            .map(|(personal, average)| personal - average),
    )
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0u32;
    for value in values {
        sum += value;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(sum / f64::from(count))
    }
}

/// Histogram of personal scores in 5-point buckets
///
/// Bucket `i` covers scores `[5i, 5i + 5)`, with a perfect 100 landing in
/// the final bucket. Unscored titles are left out.
pub fn score_distribution(
    records: &[ActivityRecord],
    rules: RuleSet,
    index: &ScoreIndex,
) -> [u64; BUCKET_COUNT] {
    let mut buckets = [0u64; BUCKET_COUNT];
    for (_, score) in scored_titles(records, rules, index) {
        if score <= 0.0 {
            continue;
        }
        let bucket = ((score / BUCKET_WIDTH) as usize).min(BUCKET_COUNT - 1);
        buckets[bucket] += 1;
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use aniwrap_common::models::{
        ActivityKind, ActivityStatus, MediaListEntry, MediaSnapshot, MediaType,
    };

    fn watched(title: &str, average: Option<f64>) -> ActivityRecord {
        ActivityRecord {
            status: Some(ActivityStatus::WatchedEpisode),
            kind: Some(ActivityKind::AnimeList),
            progress: Some("1".to_string()),
            media: Some(MediaSnapshot {
                title: title.to_string(),
                average_score: average,
                ..MediaSnapshot::default()
            }),
        }
    }

    fn index(pairs: &[(&str, f64)]) -> ScoreIndex {
        ScoreIndex::from_entries(
            pairs
                .iter()
                .map(|(title, score)| MediaListEntry {
                    title: (*title).to_string(),
                    media_type: Some(MediaType::Anime),
                    score: *score,
                })
                .collect(),
        )
    }

    #[test]
    fn test_scored_titles_joins_and_dedups() {
        let records = vec![
            watched("Frieren", None),
            watched("Frieren", None),
            watched("K-On!", None),
        ];
        let index = index(&[("Frieren", 92.0), ("K-On!", 0.0)]);

        let scored = scored_titles(&records, RuleSet::Default, &index);
        assert_eq!(
            scored,
            vec![("Frieren".to_string(), 92.0), ("K-On!".to_string(), 0.0)]
        );
    }

    #[test]
    fn test_scored_titles_skips_unknown_title() {
        let records = vec![watched("Not On List", None), watched("Frieren", None)];
        let index = index(&[("Frieren", 92.0)]);

        let scored = scored_titles(&records, RuleSet::Default, &index);
        assert_eq!(scored, vec![("Frieren".to_string(), 92.0)]);
    }

    #[test]
    fn test_controversy_mean_absolute_gap() {
        let records = vec![watched("Frieren", Some(60.0))];
        let index = index(&[("Frieren", 80.0)]);

        let gap = controversy_score(&records, RuleSet::Default, &index).unwrap();
        assert!((gap - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_controversy_none_without_pairs() {
        assert!(controversy_score(&[], RuleSet::Default, &ScoreIndex::default()).is_none());

        // A scored title without a site average contributes nothing
        let records = vec![watched("Frieren", None)];
        let index = index(&[("Frieren", 80.0)]);
        assert!(controversy_score(&records, RuleSet::Default, &index).is_none());
    }

    #[test]
    fn test_rating_bias_keeps_sign() {
        let records = vec![watched("Frieren", Some(80.0))];
        let index = index(&[("Frieren", 60.0)]);

        // Rating below the site average pulls the bias negative
        let bias = rating_bias(&records, RuleSet::Default, &index).unwrap();
        assert!((bias + 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bias_skips_unscored_titles() {
        let records = vec![watched("Frieren", Some(80.0)), watched("K-On!", Some(50.0))];
        let index = index(&[("Frieren", 90.0), ("K-On!", 0.0)]);

        // Only Frieren pairs up, so the bias is exactly 90 - 80
        let bias = rating_bias(&records, RuleSet::Default, &index).unwrap();
        assert!((bias - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_distribution_buckets() {
        let records = vec![
            watched("A", None),
            watched("B", None),
            watched("C", None),
        ];
        let index = index(&[("A", 92.0), ("B", 97.0), ("C", 50.0)]);

        let buckets = score_distribution(&records, RuleSet::Default, &index);
        assert_eq!(buckets[18], 1);
        assert_eq!(buckets[19], 1);
        assert_eq!(buckets[10], 1);
        assert_eq!(buckets.iter().sum::<u64>(), 3);
    }

    #[test]
    fn test_distribution_perfect_score_stays_in_range() {
        let records = vec![watched("A", None)];
        let index = index(&[("A", 100.0)]);

        let buckets = score_distribution(&records, RuleSet::Default, &index);
        assert_eq!(buckets[BUCKET_COUNT - 1], 1);
    }

    #[test]
    fn test_distribution_excludes_unscored() {
        let records = vec![watched("A", None)];
        let index = index(&[("A", 0.0)]);

        let buckets = score_distribution(&records, RuleSet::Default, &index);
        assert_eq!(buckets.iter().sum::<u64>(), 0);
    }
}
