//! Report assembly over a paged activity source

use crate::classifier::RuleSet;
use crate::score_index::ScoreIndex;
use crate::score_stats;
use crate::source::{collect_activities, collect_favorites, collect_media_list, ActivitySource};
use crate::tallies::{self, OrderedTally};
use crate::tiebreak::{select_top, FavoritesSet};
use crate::watch_time::{self, ShowTime};
use aniwrap_common::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};

/// Number of titles on the ranked list
const TOP_TITLES: usize = 5;

/// Number of leading tags reported per category
const TOP_TAGS: usize = 3;

/// A tag name with its accumulated rank weight
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagWeight {
    /// Tag name as AniList spells it
    pub name: String,
    /// Sum of per-show rank percentages
    pub weight: u64,
}

/// One year of watch statistics for one user
#[derive(Debug, Clone, Serialize)]
pub struct WrappedReport {
    /// AniList username the report was built for
    pub username: String,
    /// Calendar year the report covers
    pub year: i32,
    /// Days spent watching, all qualifying events
    pub days_watched: f64,
    /// Days spent rewatching
    pub rewatch_days: f64,
    /// Days spent on shows that premiered in the report year
    pub seasonal_days: f64,
    /// The user's highest-scored watched titles
    pub top_five: Vec<String>,
    /// Most-watched genre by unique show count
    pub favorite_genre: Option<String>,
    /// Most-watched animation studio by unique show count
    pub favorite_studio: Option<String>,
    /// The show with the most cumulative watch time
    pub most_watched: Option<ShowTime>,
    /// Leading theme tags by rank weight
    pub top_themes: Vec<TagWeight>,
    /// Leading cast trait tags by rank weight
    pub top_cast_traits: Vec<TagWeight>,
    /// Leading demographic tag
    pub demographic: Option<TagWeight>,
    /// Mean absolute gap between personal scores and site averages
    pub controversy_score: Option<f64>,
    /// Mean signed gap between personal scores and site averages
    pub rating_bias: Option<f64>,
    /// Personal score histogram in 5-point buckets
    pub score_distribution: Vec<u64>,
    /// When the report was assembled
    pub generated_at: DateTime<Utc>,
}

/// Assemble the full report for one user and year
///
/// Every statistic fetches its own pages and they all run concurrently.
/// The first fetch or parse error aborts the whole report.
#[instrument(skip(source))]
pub async fn build_report<S: ActivitySource>(
    source: &S,
    username: &str,
    year: i32,
) -> Result<WrappedReport> {
    info!("Building {} wrapped report for {}", year, username);

    let (
        days_watched,
        rewatch_days,
        seasonal_days,
        top_five,
        favorite_genre,
        favorite_studio,
        most_watched,
        (top_themes, top_cast_traits, demographic),
        controversy_score,
        rating_bias,
        score_distribution,
    ) = tokio::try_join!(
        day_total(source, RuleSet::Default),
        day_total(source, RuleSet::RewatchOnly),
        day_total(source, RuleSet::Seasonal { year }),
        ranked_titles(source),
        leading_genre(source),
        leading_studio(source),
        longest_show(source),
        tag_leaders(source),
        controversy(source),
        bias(source),
        distribution(source),
    )?;

    info!("Assembled wrapped report for {}", username);
    Ok(WrappedReport {
        username: username.to_string(),
        year,
        days_watched,
        rewatch_days,
        seasonal_days,
        top_five,
        favorite_genre,
        favorite_studio,
        most_watched,
        top_themes,
        top_cast_traits,
        demographic,
        controversy_score,
        rating_bias,
        score_distribution,
        generated_at: Utc::now(),
    })
}

async fn day_total<S: ActivitySource>(source: &S, rules: RuleSet) -> Result<f64> {
    let records = collect_activities(source).await?;
    let minutes = watch_time::total_minutes(&records, rules)?;
    Ok(watch_time::minutes_to_days(minutes))
}

async fn ranked_titles<S: ActivitySource>(source: &S) -> Result<Vec<String>> {
    let records = collect_activities(source).await?;
    let index = ScoreIndex::from_entries(collect_media_list(source).await?);
    let favorites = FavoritesSet::new(collect_favorites(source).await?);

    let scored = score_stats::scored_titles(&records, RuleSet::Default, &index);
    Ok(select_top(&scored, &favorites, TOP_TITLES))
}

async fn leading_genre<S: ActivitySource>(source: &S) -> Result<Option<String>> {
    let records = collect_activities(source).await?;
    let tally = tallies::genre_tally(&records, RuleSet::Default);
    Ok(tally.max_key().map(str::to_string))
}

async fn leading_studio<S: ActivitySource>(source: &S) -> Result<Option<String>> {
    let records = collect_activities(source).await?;
    let tally = tallies::studio_tally(&records, RuleSet::Default);
    Ok(tally.max_key().map(str::to_string))
}

async fn longest_show<S: ActivitySource>(source: &S) -> Result<Option<ShowTime>> {
    let records = collect_activities(source).await?;
    watch_time::most_watched(&records, RuleSet::Default)
}

async fn tag_leaders<S: ActivitySource>(
    source: &S,
) -> Result<(Vec<TagWeight>, Vec<TagWeight>, Option<TagWeight>)> {
    let records = collect_activities(source).await?;
    let tags = tallies::tag_tallies(&records, RuleSet::Default);

    let demographic = tags.demographics.max_key().map(|name| TagWeight {
        name: name.to_string(),
        weight: tags.demographics.get(name),
    });
    Ok((
        top_tags(&tags.themes, TOP_TAGS),
        top_tags(&tags.cast_traits, TOP_TAGS),
        demographic,
    ))
}

async fn controversy<S: ActivitySource>(source: &S) -> Result<Option<f64>> {
    let records = collect_activities(source).await?;
    let index = ScoreIndex::from_entries(collect_media_list(source).await?);
    Ok(score_stats::controversy_score(
        &records,
        RuleSet::Default,
        &index,
    ))
}

async fn bias<S: ActivitySource>(source: &S) -> Result<Option<f64>> {
    let records = collect_activities(source).await?;
    let index = ScoreIndex::from_entries(collect_media_list(source).await?);
    Ok(score_stats::rating_bias(&records, RuleSet::Default, &index))
}

async fn distribution<S: ActivitySource>(source: &S) -> Result<Vec<u64>> {
    let records = collect_activities(source).await?;
    let index = ScoreIndex::from_entries(collect_media_list(source).await?);
    Ok(score_stats::score_distribution(&records, RuleSet::Default, &index).to_vec())
}

fn top_tags(tally: &OrderedTally, n: usize) -> Vec<TagWeight> {
    tally
        .top_n(n)
        .into_iter()
        .map(|(name, weight)| TagWeight { name, weight })
        .collect()
}
