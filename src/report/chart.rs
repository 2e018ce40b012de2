//! Chart panel rendering.
//!
//! Draws a 2×2 grid into a single PNG: revenue by region and by product as
//! bar charts, the monthly trend as a line with markers, and units sold per
//! product as a pie with percentage labels.

use crate::error::{Result, SalesError};
use crate::models::{GroupedSales, SalesAnalysis};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::f64::consts::PI;
use std::ops::Range;
use std::path::PathBuf;
use tracing::{debug, info};

const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
const LIGHT_GREEN: RGBColor = RGBColor(144, 238, 144);
const CORAL: RGBColor = RGBColor(255, 127, 80);

const FONT: &str = "sans-serif";
const SALES_AXIS: &str = "Total Sales ($)";

/// Options for the chart image.
#[derive(Debug, Clone)]
pub struct ChartOptions {
    /// Destination PNG, overwritten if present.
    pub output: PathBuf,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            output: PathBuf::from("sales_analysis.png"),
            width: 1500,
            height: 1000,
        }
    }
}

/// Render all four panels and save the image.
pub fn render_charts(
    analysis: &SalesAnalysis,
    units_by_product: &GroupedSales,
    options: &ChartOptions,
) -> Result<()> {
    info!("Rendering charts to {}", options.output.display());

    let root = BitMapBackend::new(&options.output, (options.width, options.height))
        .into_drawing_area();
    root.fill(&WHITE).map_err(render_error)?;

    let panels = root.split_evenly((2, 2));
    draw_bar_panel(&panels[0], "Sales by Region", &analysis.region_sales, SKY_BLUE)?;
    draw_bar_panel(&panels[1], "Sales by Product", &analysis.product_sales, LIGHT_GREEN)?;
    draw_line_panel(&panels[2], "Monthly Sales Trend", &analysis.monthly_sales, CORAL)?;
    draw_pie_panel(&panels[3], "Units Sold by Product", units_by_product)?;

    root.present().map_err(render_error)?;
    debug!("Chart image written ({}x{})", options.width, options.height);
    Ok(())
}

fn render_error<E: std::fmt::Display>(err: E) -> SalesError {
    SalesError::Render(err.to_string())
}

/// Vertical range covering every finite value and zero, with headroom.
///
/// Both bounds are always finite.
fn value_axis(grouped: &GroupedSales) -> Range<f64> {
    let (min, max) = grouped
        .values()
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if min == 0.0 && max == 0.0 {
        return 0.0..1.0;
    }
    (min * 1.1).max(f64::MIN)..(max * 1.1).min(f64::MAX)
}

/// Index range for `len` categories laid out as segments.
fn category_axis(len: usize) -> Range<usize> {
    0..len.saturating_sub(1)
}

fn category_label(labels: &[&str], value: &SegmentValue<usize>) -> String {
    match value {
        SegmentValue::CenterOf(i) => labels.get(*i).map(|l| l.to_string()).unwrap_or_default(),
        _ => String::new(),
    }
}

fn draw_bar_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    grouped: &GroupedSales,
    color: RGBColor,
) -> Result<()> {
    let labels = grouped.labels();

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, 22))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(category_axis(grouped.len()).into_segmented(), value_axis(grouped))
        .map_err(render_error)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(grouped.len().max(1))
        .x_label_formatter(&|v| category_label(&labels, v))
        .y_desc(SALES_AXIS)
        .y_label_formatter(&|v| format!("{:.0}", v))
        .draw()
        .map_err(render_error)?;

    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(color.filled())
                .margin(8)
                .data(grouped.values().into_iter().enumerate()),
        )
        .map_err(render_error)?;

    Ok(())
}

fn draw_line_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    grouped: &GroupedSales,
    color: RGBColor,
) -> Result<()> {
    let labels = grouped.labels();

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, 22))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(category_axis(grouped.len()).into_segmented(), value_axis(grouped))
        .map_err(render_error)?;

    chart
        .configure_mesh()
        .x_labels(grouped.len().max(1))
        .x_label_formatter(&|v| category_label(&labels, v))
        .y_desc(SALES_AXIS)
        .y_label_formatter(&|v| format!("{:.0}", v))
        .draw()
        .map_err(render_error)?;

    let points: Vec<(SegmentValue<usize>, f64)> = grouped
        .values()
        .into_iter()
        .enumerate()
        .map(|(i, v)| (SegmentValue::CenterOf(i), v))
        .collect();

    chart
        .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))
        .map_err(render_error)?;
    chart
        .draw_series(
            points
                .into_iter()
                .map(|point| Circle::new(point, 5, color.filled())),
        )
        .map_err(render_error)?;

    Ok(())
}

fn draw_pie_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    grouped: &GroupedSales,
) -> Result<()> {
    let area = area.titled(title, (FONT, 22)).map_err(render_error)?;
    let (width, height) = area.dim_in_pixel();
    let center = (width as i32 / 2, height as i32 / 2);
    let radius = f64::from(width.min(height)) * 0.35;

    let centered = Pos::new(HPos::Center, VPos::Center);
    let label_style = (FONT, 16).into_font().color(&BLACK).pos(centered);
    let percent_style = (FONT, 14).into_font().color(&BLACK).pos(centered);

    let fractions = pie_fractions(&grouped.values());
    if fractions.iter().all(|f| *f == 0.0) {
        area.draw(&Text::new("No units sold", center, label_style))
            .map_err(render_error)?;
        return Ok(());
    }

    let mut start = 0.0;
    for (i, ((label, _), fraction)) in grouped.iter().zip(fractions).enumerate() {
        let sweep = fraction * 2.0 * PI;
        if sweep == 0.0 {
            continue;
        }

        let mut outline = vec![center];
        outline.extend(arc_points(center, radius, start, start + sweep));
        area.draw(&Polygon::new(outline, Palette99::pick(i).filled()))
            .map_err(render_error)?;

        let mid = start + sweep / 2.0;
        area.draw(&Text::new(
            label.to_string(),
            polar(center, radius * 1.15, mid),
            label_style.clone(),
        ))
        .map_err(render_error)?;
        area.draw(&Text::new(
            format_percentage(fraction),
            polar(center, radius * 0.6, mid),
            percent_style.clone(),
        ))
        .map_err(render_error)?;

        start += sweep;
    }

    Ok(())
}

/// Share of each value in the total; negatives and non-finite values count
/// as zero.
fn pie_fractions(values: &[f64]) -> Vec<f64> {
    let clamped: Vec<f64> = values
        .iter()
        .map(|v| if v.is_finite() { v.max(0.0) } else { 0.0 })
        .collect();
    let total: f64 = clamped.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return vec![0.0; values.len()];
    }
    clamped.into_iter().map(|v| v / total).collect()
}

/// `0.3333` → `33.3%`.
fn format_percentage(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// Pixel position at `angle` radians, counter-clockwise from the positive x axis.
fn polar(center: (i32, i32), radius: f64, angle: f64) -> (i32, i32) {
    (
        center.0 + (radius * angle.cos()).round() as i32,
        center.1 - (radius * angle.sin()).round() as i32,
    )
}

/// Points along an arc, roughly one per degree, endpoints included.
fn arc_points(center: (i32, i32), radius: f64, start: f64, end: f64) -> Vec<(i32, i32)> {
    let steps = ((end - start).to_degrees().abs().ceil() as usize).max(2);
    (0..=steps)
        .map(|step| {
            let angle = start + (end - start) * step as f64 / steps as f64;
            polar(center, radius, angle)
        })
        .collect()
}
