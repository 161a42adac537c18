//! Chart description types

/// Bar layout direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Bars rise from the bottom axis
    Vertical,
    /// Bars extend rightward from the left axis
    Horizontal,
}

/// One bar of a chart
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Category label drawn on the axis
    pub label: String,
    /// Bar length in value units
    pub value: f64,
    /// Text drawn at the bar's tip, if any
    pub annotation: Option<String>,
}

impl Bar {
    /// A bar without annotation text
    pub const fn new(label: String, value: f64) -> Self {
        Self {
            label,
            value,
            annotation: None,
        }
    }

    /// A bar with annotation text at its tip
    pub const fn annotated(label: String, value: f64, annotation: String) -> Self {
        Self {
            label,
            value,
            annotation: Some(annotation),
        }
    }
}

/// A complete bar chart description
#[derive(Debug, Clone, PartialEq)]
pub struct BarChartSpec {
    /// Chart caption
    pub title: String,
    /// Label on the value axis
    pub value_label: String,
    /// Bars in display order
    pub bars: Vec<Bar>,
    /// Layout direction
    pub orientation: Orientation,
}

/// Visual styling shared by every chart of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartStyle {
    /// Output image width in pixels
    pub width: u32,
    /// Output image height in pixels
    pub height: u32,
    /// Background color as `#RRGGBB`
    pub background_color: String,
    /// Bar fill color as `#RRGGBB`
    pub bar_color: String,
    /// Font family for captions and labels
    pub font_family: String,
    /// Base font size for axis labels
    pub font_size: u32,
    /// Outer margin in pixels
    pub margin: u32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            background_color: "#FFFFFF".to_string(),
            bar_color: "#2E51A2".to_string(),
            font_family: "sans-serif".to_string(),
            font_size: 13,
            margin: 10,
        }
    }
}
