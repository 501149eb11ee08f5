use std::ops::Range;

use crate::style::{ChartStyle, Rgb};

/// Why a command got its color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Hill,
    Background,
    InInterval,
    OutOfInterval,
    Sample,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Hill => "hill",
            Role::Background => "background",
            Role::InInterval => "in_interval",
            Role::OutOfInterval => "out_of_interval",
            Role::Sample => "sample",
        }
    }
}

/// One drawing call, in data coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCommand {
    Line {
        from: (f64, f64),
        to: (f64, f64),
        color: Rgb,
        width: u32,
        role: Role,
    },
    Point {
        at: (f64, f64),
        color: Rgb,
        radius: u32,
        role: Role,
    },
}

impl DrawCommand {
    pub fn role(&self) -> Role {
        match self {
            DrawCommand::Line { role, .. } | DrawCommand::Point { role, .. } => *role,
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            DrawCommand::Line { color, .. } | DrawCommand::Point { color, .. } => *color,
        }
    }

    pub fn is_line(&self) -> bool {
        matches!(self, DrawCommand::Line { .. })
    }

    fn coords(&self) -> [(f64, f64); 2] {
        match *self {
            DrawCommand::Line { from, to, .. } => [from, to],
            DrawCommand::Point { at, .. } => [at, at],
        }
    }
}

/// Title, axis descriptions and optional categorical y ticks.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AxisLabels {
    pub title: Option<String>,
    pub x_label: String,
    pub y_label: String,
    pub y_ticks: Option<Vec<(f64, String)>>,
}

impl AxisLabels {
    pub(crate) fn new(title: &str, x_label: &str, y_label: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            y_ticks: None,
        }
    }

    pub(crate) fn with_y_ticks(mut self, ticks: &[(f64, &str)]) -> Self {
        self.y_ticks = Some(
            ticks
                .iter()
                .map(|(value, label)| (*value, label.to_string()))
                .collect(),
        );
        self
    }
}

/// Axis ranges covering every recorded command.
#[derive(Clone, Debug, PartialEq)]
pub struct Bounds {
    pub x: Range<f64>,
    pub y: Range<f64>,
}

const AXIS_MARGIN: f64 = 0.05;

/// The chart handle: style, labels and the ordered drawing calls recorded by
/// the render operations. Nothing touches a backend until [`crate::show`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Chart {
    style: ChartStyle,
    labels: AxisLabels,
    commands: Vec<DrawCommand>,
}

impl Chart {
    pub fn new(style: ChartStyle) -> Self {
        Self {
            style,
            labels: AxisLabels::default(),
            commands: Vec::new(),
        }
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    pub fn labels(&self) -> &AxisLabels {
        &self.labels
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn line_count(&self) -> usize {
        self.commands.iter().filter(|c| c.is_line()).count()
    }

    pub fn point_count(&self) -> usize {
        self.commands.len() - self.line_count()
    }

    /// Drop every recorded command and label, keeping the style.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.labels = AxisLabels::default();
    }

    pub(crate) fn set_labels(&mut self, labels: AxisLabels) {
        self.labels = labels;
    }

    pub(crate) fn line(
        &mut self,
        from: (f64, f64),
        to: (f64, f64),
        color: Rgb,
        width: u32,
        role: Role,
    ) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            width,
            role,
        });
    }

    pub(crate) fn point(&mut self, at: (f64, f64), color: Rgb, radius: u32, role: Role) {
        self.commands.push(DrawCommand::Point {
            at,
            color,
            radius,
            role,
        });
    }

    /// Data extent padded by 5% per side. Categorical ticks always stay in
    /// range. Flat extents widen by one unit each way; an empty chart spans
    /// `0..1` on both axes.
    pub fn bounds(&self) -> Bounds {
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;

        for command in &self.commands {
            for (x, y) in command.coords() {
                if x.is_finite() {
                    x_min = x_min.min(x);
                    x_max = x_max.max(x);
                }
                if y.is_finite() {
                    y_min = y_min.min(y);
                    y_max = y_max.max(y);
                }
            }
        }
        if let Some(ticks) = self.labels.y_ticks.as_ref() {
            for (value, _) in ticks {
                y_min = y_min.min(*value);
                y_max = y_max.max(*value);
            }
        }

        Bounds {
            x: padded_range(x_min, x_max),
            y: padded_range(y_min, y_max),
        }
    }
}

fn padded_range(min: f64, max: f64) -> Range<f64> {
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    if (max - min).abs() < 1e-10 {
        return (min - 1.0)..(max + 1.0);
    }
    let pad = (max - min) * AXIS_MARGIN;
    (min - pad)..(max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_chart_bounds() {
        let chart = Chart::default();
        let bounds = chart.bounds();
        assert_eq!(bounds.x, 0.0..1.0);
        assert_eq!(bounds.y, 0.0..1.0);
    }

    #[test]
    fn bounds_are_padded() {
        let mut chart = Chart::default();
        chart.line((0.0, 100.0), (200.0, 300.0), Rgb::RED, 2, Role::Hill);
        let bounds = chart.bounds();
        assert!((bounds.x.start + 10.0).abs() < 1e-9);
        assert!((bounds.x.end - 210.0).abs() < 1e-9);
        assert!((bounds.y.start - 90.0).abs() < 1e-9);
        assert!((bounds.y.end - 310.0).abs() < 1e-9);
    }

    #[test]
    fn flat_extent_widens() {
        let mut chart = Chart::default();
        chart.point((5.0, 7.0), Rgb::BLUE, 2, Role::Sample);
        let bounds = chart.bounds();
        assert_eq!(bounds.x, 4.0..6.0);
        assert_eq!(bounds.y, 6.0..8.0);
    }

    #[test]
    fn ticks_extend_y_range() {
        let mut chart = Chart::default();
        chart.set_labels(
            AxisLabels::new("t", "x", "y").with_y_ticks(&[(0.0, "No"), (1.0, "Yes")]),
        );
        chart.line((0.0, 0.0), (1.0, 0.0), Rgb::BLUE, 3, Role::OutOfInterval);
        let bounds = chart.bounds();
        assert!(bounds.y.start < 0.0);
        assert!(bounds.y.end > 1.0);
    }

    #[test]
    fn clear_keeps_style() {
        let style = ChartStyle {
            width: 320,
            ..ChartStyle::default()
        };
        let mut chart = Chart::new(style.clone());
        chart.set_labels(AxisLabels::new("t", "x", "y"));
        chart.point((1.0, 1.0), Rgb::BLUE, 2, Role::Sample);
        chart.clear();
        assert!(chart.commands().is_empty());
        assert_eq!(chart.labels(), &AxisLabels::default());
        assert_eq!(chart.style(), &style);
    }
}
