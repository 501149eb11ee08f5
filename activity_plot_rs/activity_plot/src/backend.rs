//! Drawing-backend wrapper that keeps charts renderable without font support.
//!
//! `plotters` is built without a font engine, so bitmap backends cannot
//! rasterize text and panic when asked to. [`FontSafeBackend`] forwards every
//! call to the wrapped backend and, when text drawing or measuring fails,
//! paints the string with a built-in 5x7 glyph set instead. The first failure
//! is remembered so the inner backend is asked to draw text at most once.

use std::cell::Cell;
use std::panic;
use std::sync::Once;

use plotters_backend::{
    text_anchor, BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend,
    DrawingErrorKind,
};
use tracing::warn;

pub struct FontSafeBackend<DB> {
    inner: DB,
    text_unsupported: bool,
}

impl<DB> FontSafeBackend<DB> {
    pub fn new(inner: DB) -> Self {
        Self {
            inner,
            text_unsupported: false,
        }
    }
}

impl<DB: DrawingBackend> DrawingBackend for FontSafeBackend<DB> {
    type ErrorType = DB::ErrorType;

    fn get_size(&self) -> (u32, u32) {
        self.inner.get_size()
    }

    fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.ensure_prepared()
    }

    fn present(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.present()
    }

    fn draw_pixel(
        &mut self,
        point: BackendCoord,
        color: BackendColor,
    ) -> Result<(), DrawingErrorKind<DB::ErrorType>> {
        self.inner.draw_pixel(point, color)
    }

    fn draw_line<S: BackendStyle>(
        &mut self,
        from: BackendCoord,
        to: BackendCoord,
        style: &S,
    ) -> Result<(), DrawingErrorKind<DB::ErrorType>> {
        self.inner.draw_line(from, to, style)
    }

    fn draw_rect<S: BackendStyle>(
        &mut self,
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<DB::ErrorType>> {
        self.inner.draw_rect(upper_left, bottom_right, style, fill)
    }

    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        path: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<DB::ErrorType>> {
        self.inner.draw_path(path, style)
    }

    fn draw_circle<S: BackendStyle>(
        &mut self,
        center: BackendCoord,
        radius: u32,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_circle(center, radius, style, fill)
    }

    fn blit_bitmap(
        &mut self,
        pos: BackendCoord,
        (iw, ih): (u32, u32),
        src: &[u8],
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.blit_bitmap(pos, (iw, ih), src)
    }

    fn draw_text<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &TStyle,
        pos: BackendCoord,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        if self.text_unsupported {
            return self.draw_text_fallback(text, style, pos);
        }
        match quiet_unwind(|| self.inner.draw_text(text, style, pos)) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(DrawingErrorKind::FontError(_))) | Err(_) => {
                warn!("backend cannot draw text; using built-in glyphs");
                self.text_unsupported = true;
                self.draw_text_fallback(text, style, pos)
            }
            Ok(Err(err)) => Err(err),
        }
    }

    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        style: &TStyle,
    ) -> Result<(u32, u32), DrawingErrorKind<Self::ErrorType>> {
        if !self.text_unsupported {
            match self.inner.estimate_text_size(text, style) {
                Err(DrawingErrorKind::FontError(_)) => {}
                other => return other,
            }
        }
        let scale = glyph_scale(style.size());
        let (width, height) = fallback_extent(text, scale);
        Ok((width as u32, height as u32))
    }
}

thread_local! {
    static QUIET_PANICS: Cell<bool> = const { Cell::new(false) };
}

static QUIET_HOOK: Once = Once::new();

/// `catch_unwind` that keeps the panic hook silent for panics raised on this
/// thread while `f` runs. Panics elsewhere still reach the previous hook.
pub(crate) fn quiet_unwind<R>(f: impl FnOnce() -> R) -> std::thread::Result<R> {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !QUIET_PANICS.with(Cell::get) {
                previous(info);
            }
        }));
    });
    let was_quiet = QUIET_PANICS.with(|quiet| quiet.replace(true));
    let result = panic::catch_unwind(panic::AssertUnwindSafe(f));
    QUIET_PANICS.with(|quiet| quiet.set(was_quiet));
    result
}

impl<DB: DrawingBackend> FontSafeBackend<DB> {
    fn draw_text_fallback<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &TStyle,
        pos: BackendCoord,
    ) -> Result<(), DrawingErrorKind<DB::ErrorType>> {
        let color = style.color();
        if color.alpha == 0.0 || text.trim().is_empty() {
            return Ok(());
        }

        let scale = glyph_scale(style.size());
        let (width, height) = fallback_extent(text, scale);
        let dx = match style.anchor().h_pos {
            text_anchor::HPos::Left => 0,
            text_anchor::HPos::Right => -width,
            text_anchor::HPos::Center => -width / 2,
        };
        let dy = match style.anchor().v_pos {
            text_anchor::VPos::Top => 0,
            text_anchor::VPos::Center => -(height / 2),
            text_anchor::VPos::Bottom => -height,
        };
        let transform = style.transform();

        let mut cursor_x = dx;
        for ch in text.chars() {
            let Some(glyph) = fallback_glyph(ch) else {
                cursor_x += scale * FALLBACK_SPACE_WIDTH;
                continue;
            };
            for (row, pattern) in glyph.rows.iter().enumerate() {
                for col in 0..glyph.width {
                    if pattern & (1 << (glyph.width - 1 - col)) == 0 {
                        continue;
                    }
                    let local_x = cursor_x + i32::from(col) * scale;
                    let local_y = dy + row as i32 * scale;
                    for sx in 0..scale {
                        for sy in 0..scale {
                            let (ox, oy) = transform.transform(local_x + sx, local_y + sy);
                            self.inner
                                .draw_pixel((pos.0 + ox, pos.1 + oy), color.clone())?;
                        }
                    }
                }
            }
            cursor_x += scale * (i32::from(glyph.width) + 1);
        }
        Ok(())
    }
}

const FALLBACK_FONT_HEIGHT: usize = 7;
const FALLBACK_SPACE_WIDTH: i32 = 3;

#[derive(Clone, Copy)]
struct Glyph {
    width: u8,
    rows: [u8; FALLBACK_FONT_HEIGHT],
}

fn glyph_scale(font_size: f64) -> i32 {
    (font_size / FALLBACK_FONT_HEIGHT as f64).round().max(1.0) as i32
}

/// Unrotated pixel extent of `text` at the given glyph scale.
fn fallback_extent(text: &str, scale: i32) -> (i32, i32) {
    let columns: i32 = text
        .chars()
        .map(|ch| match fallback_glyph(ch) {
            Some(glyph) => i32::from(glyph.width) + 1,
            None => FALLBACK_SPACE_WIDTH,
        })
        .sum();
    (columns * scale, FALLBACK_FONT_HEIGHT as i32 * scale)
}

fn fallback_glyph(ch: char) -> Option<Glyph> {
    let (width, rows) = match ch.to_ascii_uppercase() {
        'A' => (5, [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
        'B' => (5, [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110]),
        'C' => (5, [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110]),
        'D' => (5, [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100]),
        'E' => (5, [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111]),
        'F' => (5, [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000]),
        'G' => (5, [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111]),
        'H' => (5, [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
        'I' => (3, [0b111, 0b010, 0b010, 0b010, 0b010, 0b010, 0b111]),
        'J' => (5, [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100]),
        'K' => (5, [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001]),
        'L' => (5, [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111]),
        'M' => (5, [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001]),
        'N' => (5, [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001]),
        'O' => (5, [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
        'P' => (5, [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000]),
        'Q' => (5, [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101]),
        'R' => (5, [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001]),
        'S' => (5, [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110]),
        'T' => (5, [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100]),
        'U' => (5, [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
        'V' => (5, [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100]),
        'W' => (5, [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010]),
        'X' => (5, [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001]),
        'Y' => (5, [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100]),
        'Z' => (5, [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111]),
        '0' => (5, [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110]),
        '1' => (3, [0b010, 0b110, 0b010, 0b010, 0b010, 0b010, 0b111]),
        '2' => (5, [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111]),
        '3' => (5, [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110]),
        '4' => (5, [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010]),
        '5' => (5, [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110]),
        '6' => (5, [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110]),
        '7' => (5, [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000]),
        '8' => (5, [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110]),
        '9' => (5, [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100]),
        '(' => (3, [0b001, 0b010, 0b100, 0b100, 0b100, 0b010, 0b001]),
        ')' => (3, [0b100, 0b010, 0b001, 0b001, 0b001, 0b010, 0b100]),
        '.' => (1, [0b0, 0b0, 0b0, 0b0, 0b0, 0b0, 0b1]),
        ',' => (2, [0b00, 0b00, 0b00, 0b00, 0b00, 0b01, 0b10]),
        ':' => (1, [0b0, 0b0, 0b1, 0b0, 0b0, 0b1, 0b0]),
        '-' => (3, [0b000, 0b000, 0b000, 0b111, 0b000, 0b000, 0b000]),
        '+' => (5, [0b00000, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000]),
        '/' => (5, [0b00001, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b10000]),
        '%' => (5, [0b11000, 0b11001, 0b00010, 0b00100, 0b01000, 0b10011, 0b00011]),
        _ => return None,
    };
    Some(Glyph { width, rows })
}
