//! Bar chart rendering to PNG files

use crate::types::{Bar, BarChartSpec, ChartStyle, Orientation};
use aniwrap_common::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use tracing::{info, warn};

const AXIS_LABEL_AREA: u32 = 40;
const VALUE_LABEL_AREA: u32 = 60;
// Wide enough for tag and title labels on horizontal charts
const CATEGORY_LABEL_AREA: u32 = 160;
const BAR_GAP: u32 = 5;
const HEADROOM: f64 = 1.05;
const TITLE_FONT_BUMP: u32 = 6;

/// Render one bar chart as a PNG file
///
/// A spec without bars is skipped with a warning instead of producing an
/// empty image.
pub async fn render_bar_chart(spec: &BarChartSpec, style: &ChartStyle, path: &Path) -> Result<()> {
    if spec.bars.is_empty() {
        warn!("Skipping chart {:?}: no bars to draw", spec.title);
        return Ok(());
    }

    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&parse_color(&style.background_color))?;

    match spec.orientation {
        Orientation::Vertical => draw_vertical(&root, spec, style)?,
        Orientation::Horizontal => draw_horizontal(&root, spec, style)?,
    }

    root.present()?;
    info!("Successfully rendered {:?} to {}", spec.title, path.display());
    Ok(())
}

fn draw_vertical(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    spec: &BarChartSpec,
    style: &ChartStyle,
) -> Result<()> {
    let bar_color = parse_color(&style.bar_color);
    let title_font = (
        style.font_family.as_str(),
        style.font_size + TITLE_FONT_BUMP,
    );
    let label_font = (style.font_family.as_str(), style.font_size);

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, title_font)
        .margin(style.margin)
        .x_label_area_size(AXIS_LABEL_AREA)
        .y_label_area_size(VALUE_LABEL_AREA)
        .build_cartesian_2d(
            (0..spec.bars.len()).into_segmented(),
            0.0..value_ceiling(&spec.bars),
        )?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(spec.bars.len())
        .x_label_formatter(&|segment| segment_label(&spec.bars, segment))
        .y_desc(&spec.value_label)
        .label_style(label_font)
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(bar_color.filled())
            .margin(BAR_GAP)
            .data(spec.bars.iter().enumerate().map(|(i, bar)| (i, bar.value))),
    )?;

    let annotation_font = label_font
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    chart.draw_series(spec.bars.iter().enumerate().filter_map(|(i, bar)| {
        bar.annotation.as_ref().map(|text| {
            Text::new(
                text.clone(),
                (SegmentValue::CenterOf(i), bar.value),
                annotation_font.clone(),
            )
        })
    }))?;

    Ok(())
}

fn draw_horizontal(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    spec: &BarChartSpec,
    style: &ChartStyle,
) -> Result<()> {
    let bar_color = parse_color(&style.bar_color);
    let title_font = (
        style.font_family.as_str(),
        style.font_size + TITLE_FONT_BUMP,
    );
    let label_font = (style.font_family.as_str(), style.font_size);

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, title_font)
        .margin(style.margin)
        .x_label_area_size(AXIS_LABEL_AREA)
        .y_label_area_size(CATEGORY_LABEL_AREA)
        .build_cartesian_2d(
            0.0..value_ceiling(&spec.bars),
            (0..spec.bars.len()).into_segmented(),
        )?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(spec.bars.len())
        .y_label_formatter(&|segment| segment_label(&spec.bars, segment))
        .x_desc(&spec.value_label)
        .label_style(label_font)
        .draw()?;

    chart.draw_series(
        Histogram::horizontal(&chart)
            .style(bar_color.filled())
            .margin(BAR_GAP)
            .data(spec.bars.iter().enumerate().map(|(i, bar)| (i, bar.value))),
    )?;

    let annotation_font = label_font
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));
    chart.draw_series(spec.bars.iter().enumerate().filter_map(|(i, bar)| {
        bar.annotation.as_ref().map(|text| {
            Text::new(
                text.clone(),
                (bar.value, SegmentValue::CenterOf(i)),
                annotation_font.clone(),
            )
        })
    }))?;

    Ok(())
}

/// Parse a `#RRGGBB` color string, black when it does not parse
fn parse_color(color_str: &str) -> RGBColor {
    if let Some(hex) = color_str.strip_prefix('#') {
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return RGBColor(r, g, b);
            }
        }
    }
    RGBColor(0, 0, 0)
}

fn value_ceiling(bars: &[Bar]) -> f64 {
    let max = bars.iter().fold(0.0_f64, |acc, bar| acc.max(bar.value));
    if max <= 0.0 {
        1.0
    } else {
        max * HEADROOM
    }
}

fn segment_label(bars: &[Bar], segment: &SegmentValue<usize>) -> String {
    match segment {
        SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => bars
            .get(*i)
            .map_or_else(String::new, |bar| bar.label.clone()),
        SegmentValue::Last => String::new(),
    }
}
