//! # Aniwrap Charts
//!
//! Renders the report's bar charts as PNG files with `plotters`. The
//! calling side describes each chart as a [`types::BarChartSpec`] of
//! already-aggregated (label, value) bars; nothing here recomputes
//! statistics.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod render;
pub mod types;

pub use render::render_bar_chart;
pub use types::{Bar, BarChartSpec, ChartStyle, Orientation};
