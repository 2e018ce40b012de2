//! Report rendering: text summary, JSON, and the chart panel.

pub mod chart;
pub mod display;
pub mod generator;

pub use chart::{render_charts, ChartOptions};
pub use display::show_image;
pub use generator::{render_json, render_summary, ReportOptions};
