//! Text report rendering and chart spec assembly

use aniwrap_charts::{Bar, BarChartSpec, Orientation};
use aniwrap_stats::score_stats::BUCKET_COUNT;
use aniwrap_stats::{TagWeight, WrappedReport};

/// Render the report as terminal-friendly text
pub fn render_text(report: &WrappedReport) -> String {
    let mut out = String::new();

    let header = format!("AniList wrapped {} for {}", report.year, report.username);
    out.push_str(&header);
    out.push('\n');
    out.push_str(&"=".repeat(header.len()));
    out.push_str("\n\n");

    out.push_str("Watch time\n");
    out.push_str(&format!("  Total:     {:>8.2} days\n", report.days_watched));
    out.push_str(&format!("  Rewatched: {:>8.2} days\n", report.rewatch_days));
    out.push_str(&format!("  Seasonal:  {:>8.2} days\n\n", report.seasonal_days));

    out.push_str("Top shows\n");
    if report.top_five.is_empty() {
        out.push_str("  n/a\n");
    } else {
        for (i, title) in report.top_five.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", i + 1, title));
        }
    }
    out.push('\n');

    out.push_str("Favorites\n");
    out.push_str(&format!(
        "  Genre:  {}\n",
        report.favorite_genre.as_deref().unwrap_or("n/a")
    ));
    out.push_str(&format!(
        "  Studio: {}\n",
        report.favorite_studio.as_deref().unwrap_or("n/a")
    ));
    match &report.most_watched {
        Some(show) => out.push_str(&format!(
            "  Most watched: {} ({:.1} hours)\n\n",
            show.title,
            show.minutes as f64 / 60.0
        )),
        None => out.push_str("  Most watched: n/a\n\n"),
    }

    out.push_str("Tags\n");
    out.push_str(&format!("  Themes:      {}\n", tag_line(&report.top_themes)));
    out.push_str(&format!(
        "  Cast traits: {}\n",
        tag_line(&report.top_cast_traits)
    ));
    match &report.demographic {
        Some(tag) => out.push_str(&format!("  Demographic: {} ({})\n\n", tag.name, tag.weight)),
        None => out.push_str("  Demographic: n/a\n\n"),
    }

    out.push_str("Scores\n");
    out.push_str(&format!(
        "  Controversy: {}\n",
        score_line(report.controversy_score, false)
    ));
    out.push_str(&format!(
        "  Bias:        {}\n",
        score_line(report.rating_bias, true)
    ));
    out.push_str("  Distribution:\n");
    let mut any_scored = false;
    for (bucket, &count) in report.score_distribution.iter().enumerate() {
        if count > 0 {
            out.push_str(&format!("    {:>6}: {}\n", bucket_label(bucket), count));
            any_scored = true;
        }
    }
    if !any_scored {
        out.push_str("    n/a\n");
    }

    out
}

fn tag_line(tags: &[TagWeight]) -> String {
    if tags.is_empty() {
        return "n/a".to_string();
    }
    tags.iter()
        .map(|tag| format!("{} ({})", tag.name, tag.weight))
        .collect::<Vec<_>>()
        .join(", ")
}

fn score_line(value: Option<f64>, signed: bool) -> String {
    match value {
        Some(v) if signed => format!("{v:+.2}"),
        Some(v) => format!("{v:.2}"),
        None => "n/a".to_string(),
    }
}

fn bucket_label(bucket: usize) -> String {
    if bucket == BUCKET_COUNT - 1 {
        "95-100".to_string()
    } else {
        format!("{}-{}", bucket * 5, bucket * 5 + 4)
    }
}

/// Watch-time summary: total, rewatch and seasonal days side by side
pub fn watch_time_chart(report: &WrappedReport) -> BarChartSpec {
    BarChartSpec {
        title: format!("Watch time {}", report.year),
        value_label: "Days".to_string(),
        bars: vec![
            Bar::annotated(
                "Total".to_string(),
                report.days_watched,
                format_days(report.days_watched),
            ),
            Bar::annotated(
                "Rewatched".to_string(),
                report.rewatch_days,
                format_days(report.rewatch_days),
            ),
            Bar::annotated(
                "Seasonal".to_string(),
                report.seasonal_days,
                format_days(report.seasonal_days),
            ),
        ],
        orientation: Orientation::Vertical,
    }
}

/// Personal score histogram over the twenty 5-point buckets
pub fn distribution_chart(report: &WrappedReport) -> BarChartSpec {
    let bars = report
        .score_distribution
        .iter()
        .enumerate()
        .map(|(bucket, &count)| Bar::new(bucket_label(bucket), count as f64))
        .collect();
    BarChartSpec {
        title: format!("Score distribution {}", report.year),
        value_label: "Shows".to_string(),
        bars,
        orientation: Orientation::Vertical,
    }
}

/// Leading theme tags by rank weight
pub fn theme_chart(report: &WrappedReport) -> BarChartSpec {
    let bars = report
        .top_themes
        .iter()
        .map(|tag| Bar::annotated(tag.name.clone(), tag.weight as f64, tag.weight.to_string()))
        .collect();
    BarChartSpec {
        title: format!("Top themes {}", report.year),
        value_label: "Rank weight".to_string(),
        bars,
        orientation: Orientation::Horizontal,
    }
}

fn format_days(days: f64) -> String {
    format!("{days:.2} d")
}

#[cfg(test)]
mod tests {
    use super::*;
    use aniwrap_stats::ShowTime;
    use chrono::Utc;

    fn fixture_report() -> WrappedReport {
        let mut distribution = vec![0_u64; BUCKET_COUNT];
        distribution[17] = 2;
        distribution[19] = 1;

        WrappedReport {
            username: "hikari".to_string(),
            year: 2023,
            days_watched: 12.5,
            rewatch_days: 1.25,
            seasonal_days: 3.0,
            top_five: vec!["Sousou no Frieren".to_string(), "K-On!".to_string()],
            favorite_genre: Some("Fantasy".to_string()),
            favorite_studio: None,
            most_watched: Some(ShowTime {
                title: "One Piece".to_string(),
                minutes: 4830,
            }),
            top_themes: vec![
                TagWeight {
                    name: "Magic".to_string(),
                    weight: 150,
                },
                TagWeight {
                    name: "School".to_string(),
                    weight: 90,
                },
            ],
            top_cast_traits: Vec::new(),
            demographic: Some(TagWeight {
                name: "Shounen".to_string(),
                weight: 155,
            }),
            controversy_score: Some(4.5),
            rating_bias: Some(-2.0),
            score_distribution: distribution,
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_render_text_sections() {
        let text = render_text(&fixture_report());

        assert!(text.contains("AniList wrapped 2023 for hikari"));
        assert!(text.contains("Total:        12.50 days"));
        assert!(text.contains("1. Sousou no Frieren"));
        assert!(text.contains("2. K-On!"));
        assert!(text.contains("Genre:  Fantasy"));
        assert!(text.contains("Studio: n/a"));
        assert!(text.contains("Most watched: One Piece (80.5 hours)"));
        assert!(text.contains("Themes:      Magic (150), School (90)"));
        assert!(text.contains("Cast traits: n/a"));
        assert!(text.contains("Demographic: Shounen (155)"));
        assert!(text.contains("Controversy: 4.50"));
        assert!(text.contains("Bias:        -2.00"));
        assert!(text.contains("85-89: 2"));
        assert!(text.contains("95-100: 1"));
    }

    #[test]
    fn test_render_text_handles_empty_report() {
        let report = WrappedReport {
            username: "hikari".to_string(),
            year: 2023,
            days_watched: 0.0,
            rewatch_days: 0.0,
            seasonal_days: 0.0,
            top_five: Vec::new(),
            favorite_genre: None,
            favorite_studio: None,
            most_watched: None,
            top_themes: Vec::new(),
            top_cast_traits: Vec::new(),
            demographic: None,
            controversy_score: None,
            rating_bias: None,
            score_distribution: vec![0; BUCKET_COUNT],
            generated_at: Utc::now(),
        };

        let text = render_text(&report);
        assert!(text.contains("Top shows\n  n/a"));
        assert!(text.contains("Most watched: n/a"));
        assert!(text.contains("Controversy: n/a"));
        assert!(text.contains("Distribution:\n    n/a"));
    }

    #[test]
    fn test_bucket_labels() {
        assert_eq!(bucket_label(0), "0-4");
        assert_eq!(bucket_label(10), "50-54");
        assert_eq!(bucket_label(BUCKET_COUNT - 1), "95-100");
    }

    #[test]
    fn test_watch_time_chart_shape() {
        let spec = watch_time_chart(&fixture_report());

        assert_eq!(spec.title, "Watch time 2023");
        assert_eq!(spec.orientation, Orientation::Vertical);
        assert_eq!(spec.bars.len(), 3);
        assert_eq!(spec.bars[0].label, "Total");
        assert_eq!(spec.bars[0].annotation.as_deref(), Some("12.50 d"));
    }

    #[test]
    fn test_distribution_chart_covers_every_bucket() {
        let spec = distribution_chart(&fixture_report());

        assert_eq!(spec.bars.len(), BUCKET_COUNT);
        assert_eq!(spec.bars[0].label, "0-4");
        assert_eq!(spec.bars[BUCKET_COUNT - 1].label, "95-100");
        assert!((spec.bars[17].value - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_theme_chart_is_horizontal() {
        let spec = theme_chart(&fixture_report());

        assert_eq!(spec.orientation, Orientation::Horizontal);
        assert_eq!(spec.bars.len(), 2);
        assert_eq!(spec.bars[0].label, "Magic");
        assert_eq!(spec.bars[0].annotation.as_deref(), Some("150"));
    }
}
