use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

/// RGB triple, serialized as `[r, g, b]`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const BLUE: Rgb = Rgb(0, 0, 255);

    /// `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl From<Rgb> for RGBColor {
    fn from(value: Rgb) -> Self {
        RGBColor(value.0, value.1, value.2)
    }
}

/// Colors, strokes and canvas settings shared by every chart kind.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub hill_color: Rgb,
    pub background_color: Rgb,
    pub interval_color: Rgb,
    pub rest_color: Rgb,
    pub point_color: Rgb,
    pub line_width: u32,
    pub interval_line_width: u32,
    pub point_radius: u32,
    pub title_font_size: f64,
    pub label_font_size: f64,
    pub tick_font_size: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 760,
            hill_color: Rgb::RED,
            background_color: Rgb::BLUE,
            interval_color: Rgb::RED,
            rest_color: Rgb::BLUE,
            point_color: Rgb::BLUE,
            line_width: 2,
            interval_line_width: 3,
            point_radius: 2,
            title_font_size: 20.0,
            label_font_size: 20.0,
            tick_font_size: 14.0,
        }
    }
}
