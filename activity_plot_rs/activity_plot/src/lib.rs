//! Hill and interval overlay charts for activity telemetry.
//!
//! Segments are produced elsewhere; this crate only classifies sample pairs by
//! segment membership and draws them. A [`Chart`] is created by the caller,
//! threaded through the render operations, and finally handed to [`show`].

use thiserror::Error;

pub mod backend;
pub mod chart;
pub mod output;
pub mod render;
pub mod segments;
pub mod style;

pub use chart::{AxisLabels, Bounds, Chart, DrawCommand, Role};
pub use output::{
    draw_basic_map, draw_hills, draw_intervals, render_svg_string, show, Output,
};
pub use render::{elapsed_seconds, render_basic_map, render_hills, render_intervals};
pub use segments::{flatten, MembershipSet};
pub use style::{ChartStyle, Rgb};

#[derive(Error, Debug)]
pub enum PlotError {
    #[error("{left} has {left_len} samples but {right} has {right_len}")]
    LengthMismatch {
        left: &'static str,
        left_len: usize,
        right: &'static str,
        right_len: usize,
    },
    #[error("segment index {index} is outside a series of {len} samples")]
    InvalidIndex { index: usize, len: usize },
    #[error("plotting backend error: {0}")]
    Backend(String),
}
