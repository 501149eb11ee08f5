use std::fmt::Display;
use std::ops::Range;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use plotters::coord::ranged1d::{DefaultFormatting, KeyPointHint, ValueFormatter};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle};
use tracing::info;

use crate::backend::{quiet_unwind, FontSafeBackend};
use crate::chart::{Chart, DrawCommand};
use crate::render::{render_basic_map, render_hills, render_intervals};
use crate::style::ChartStyle;
use crate::PlotError;

const GRID_COLOR: RGBColor = RGBColor(222, 222, 222);

/// Where [`show`] sends a chart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Output {
    Png(PathBuf),
    Svg(PathBuf),
}

impl Output {
    /// `.svg` (any case) selects SVG; every other path is written as PNG.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let is_svg = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("svg"))
            .unwrap_or(false);
        if is_svg {
            Output::Svg(path)
        } else {
            Output::Png(path)
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Output::Png(path) | Output::Svg(path) => path,
        }
    }
}

/// Rasterize the recorded commands and write the result to `output`.
pub fn show(chart: &Chart, output: &Output) -> Result<(), PlotError> {
    let size = (chart.style().width, chart.style().height);
    guard(|| match output {
        Output::Png(path) => {
            let root = FontSafeBackend::new(BitMapBackend::new(path, size)).into_drawing_area();
            draw_chart(root, chart)
        }
        Output::Svg(path) => {
            let root = FontSafeBackend::new(SVGBackend::new(path, size)).into_drawing_area();
            draw_chart(root, chart)
        }
    })?;
    info!(
        path = %output.path().display(),
        commands = chart.commands().len(),
        "wrote chart"
    );
    Ok(())
}

/// Render to an in-memory SVG document.
pub fn render_svg_string(chart: &Chart) -> Result<String, PlotError> {
    let size = (chart.style().width, chart.style().height);
    let mut svg = String::new();
    guard(|| {
        let backend = SVGBackend::with_string(&mut svg, size);
        let root = FontSafeBackend::new(backend).into_drawing_area();
        draw_chart(root, chart)
    })?;
    Ok(svg)
}

/// Render the hill overlay on a fresh chart and show it.
pub fn draw_hills<S: AsRef<[usize]>>(
    style: ChartStyle,
    altitude: &[f64],
    distance: &[f64],
    hills: &[S],
    output: &Output,
) -> Result<(), PlotError> {
    let chart = render_hills(Chart::new(style), altitude, distance, hills)?;
    show(&chart, output)
}

/// Render the interval overlay on a fresh chart and show it.
pub fn draw_intervals<S: AsRef<[usize]>>(
    style: ChartStyle,
    timestamps: &[DateTime<Utc>],
    intervals: &[S],
    output: &Output,
) -> Result<(), PlotError> {
    let chart = render_intervals(Chart::new(style), timestamps, intervals)?;
    show(&chart, output)
}

/// Render the basic map on a fresh chart and show it.
pub fn draw_basic_map(
    style: ChartStyle,
    altitude: &[f64],
    distance: &[f64],
    output: &Output,
) -> Result<(), PlotError> {
    let chart = render_basic_map(Chart::new(style), altitude, distance)?;
    show(&chart, output)
}

fn guard<F>(render: F) -> Result<(), PlotError>
where
    F: FnOnce() -> Result<(), PlotError>,
{
    quiet_unwind(render)
        .map_err(|_| PlotError::Backend("plotting backend panicked".to_string()))?
}

fn backend_error<E: Display>(err: E) -> PlotError {
    PlotError::Backend(err.to_string())
}

fn format_tick(value: f64) -> String {
    if value.abs() >= 100.0 || value.fract().abs() < 1e-9 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

/// Linear y axis with ticks at the categorical values and nowhere else.
struct CategoricalAxis {
    linear: RangedCoordf64,
    ticks: Vec<f64>,
}

impl Ranged for CategoricalAxis {
    type FormatOption = DefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.linear.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        if hint.weight().allow_light_points() {
            Vec::new()
        } else {
            self.ticks.clone()
        }
    }

    fn range(&self) -> Range<f64> {
        self.linear.range()
    }
}

/// Label of the categorical tick placed exactly at `value`.
fn categorical_label(value: f64, ticks: &[(f64, String)]) -> String {
    ticks
        .iter()
        .find(|(at, _)| *at == value)
        .map(|(_, label)| label.clone())
        .unwrap_or_default()
}

fn draw_chart<DB>(root: DrawingArea<DB, Shift>, chart: &Chart) -> Result<(), PlotError>
where
    DB: DrawingBackend,
{
    let style = chart.style();
    let labels = chart.labels();
    let bounds = chart.bounds();

    root.fill(&WHITE).map_err(backend_error)?;

    let mut builder = ChartBuilder::on(&root);
    builder
        .margin(25)
        .set_label_area_size(LabelAreaPosition::Left, 80)
        .set_label_area_size(LabelAreaPosition::Bottom, 60);
    if let Some(title) = labels.title.as_deref() {
        builder.caption(title, (FontFamily::SansSerif, style.title_font_size));
    }

    match labels.y_ticks.as_deref() {
        Some(ticks) => {
            let y_axis = CategoricalAxis {
                linear: RangedCoordf64::from(bounds.y.clone()),
                ticks: ticks.iter().map(|(at, _)| *at).collect(),
            };
            let plot = builder
                .build_cartesian_2d(bounds.x.clone(), y_axis)
                .map_err(backend_error)?;
            draw_plot(plot, chart, &|v: &f64| categorical_label(*v, ticks))?;
        }
        None => {
            let plot = builder
                .build_cartesian_2d(bounds.x.clone(), bounds.y.clone())
                .map_err(backend_error)?;
            draw_plot(plot, chart, &|v: &f64| format_tick(*v))?;
        }
    }

    root.present().map_err(backend_error)?;
    Ok(())
}

fn draw_plot<DB, Y>(
    mut plot: ChartContext<'_, DB, Cartesian2d<RangedCoordf64, Y>>,
    chart: &Chart,
    y_format: &dyn Fn(&f64) -> String,
) -> Result<(), PlotError>
where
    DB: DrawingBackend,
    Y: Ranged<ValueType = f64> + ValueFormatter<f64>,
{
    let style = chart.style();
    let labels = chart.labels();
    let axis_font = FontDesc::new(FontFamily::SansSerif, style.label_font_size, FontStyle::Normal);
    let tick_font = FontDesc::new(FontFamily::SansSerif, style.tick_font_size, FontStyle::Normal);
    let x_format = |v: &f64| format_tick(*v);

    plot.configure_mesh()
        .bold_line_style(&GRID_COLOR)
        .light_line_style(&TRANSPARENT)
        .x_desc(labels.x_label.as_str())
        .y_desc(labels.y_label.as_str())
        .axis_desc_style(axis_font.color(&BLACK))
        .label_style(tick_font.color(&BLACK.mix(0.85)))
        .x_label_formatter(&x_format)
        .y_label_formatter(y_format)
        .draw()
        .map_err(backend_error)?;

    for command in chart.commands() {
        match *command {
            DrawCommand::Line {
                from,
                to,
                color,
                width,
                ..
            } => {
                let color = RGBColor::from(color);
                plot.draw_series(std::iter::once(PathElement::new(
                    vec![from, to],
                    color.stroke_width(width),
                )))
                .map_err(backend_error)?;
            }
            DrawCommand::Point {
                at, color, radius, ..
            } => {
                let color = RGBColor::from(color);
                plot.draw_series(std::iter::once(Circle::new(at, radius, color.filled())))
                    .map_err(backend_error)?;
            }
        }
    }
    Ok(())
}
