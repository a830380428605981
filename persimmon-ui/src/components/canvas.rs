//! Canvas helpers shared by the chart components
//!
//! Scales and colour ramps are plain functions so they can be tested off
//! the browser.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Series colours, in `patients, physicians, claims` order
pub const SERIES_COLORS: [&str; 6] = [
    "#FF9800", // Orange (primary)
    "#4CAF50", // Green
    "#2196F3", // Blue
    "#9C27B0", // Purple
    "#F44336", // Red
    "#00BCD4", // Cyan
];

pub const BACKGROUND: &str = "#1f2937"; // gray-800
pub const GRID: &str = "#374151"; // gray-700
pub const LABEL: &str = "#9ca3af"; // gray-400
pub const MUTED: &str = "#6b7280"; // gray-500

/// Plot area inside the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    /// Frame with the usual axis margins
    pub fn with_margins(width: f64, height: f64) -> Self {
        let (left, right, top, bottom) = (60.0, 20.0, 20.0, 40.0);
        Self {
            left,
            top,
            width: width - left - right,
            height: height - top - bottom,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }
}

/// Obtain the 2D context, clear it and fill the background
pub fn prepare(canvas: &HtmlCanvasElement) -> Option<(CanvasRenderingContext2d, f64, f64)> {
    let ctx = canvas
        .get_context("2d")
        .ok()
        .flatten()?
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()?;

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;

    ctx.set_fill_style(&BACKGROUND.into());
    ctx.fill_rect(0.0, 0.0, width, height);

    Some((ctx, width, height))
}

/// Map `value` from `[min, max]` onto `[start, end]`
pub fn scale(value: f64, min: f64, max: f64, start: f64, end: f64) -> f64 {
    if max == min {
        return (start + end) / 2.0;
    }
    start + (value - min) / (max - min) * (end - start)
}

/// Pad a value range by 10% so marks do not sit on the frame edge
pub fn padded(min: f64, max: f64) -> (f64, f64) {
    let range = max - min;
    let padding = if range > 0.0 { range * 0.1 } else { 1.0 };
    (min - padding, max + padding)
}

/// (min, max) of the finite values, if any
pub fn extent(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Sequential blue-to-orange ramp, `t` clamped to `[0, 1]`
pub fn ramp(t: f64) -> String {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let from = (0x21 as f64, 0x96 as f64, 0xF3 as f64);
    let to = (0xFF as f64, 0x98 as f64, 0x00 as f64);
    let mix = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    format!(
        "#{:02X}{:02X}{:02X}",
        mix(from.0, to.0),
        mix(from.1, to.1),
        mix(from.2, to.2)
    )
}

/// Horizontal grid lines with y-axis labels
pub fn draw_y_grid(ctx: &CanvasRenderingContext2d, frame: &Frame, min: f64, max: f64) {
    ctx.set_stroke_style(&GRID.into());
    ctx.set_line_width(1.0);
    ctx.set_fill_style(&LABEL.into());
    ctx.set_font("12px sans-serif");

    for i in 0..=5 {
        let y = frame.top + (i as f64 / 5.0) * frame.height;
        ctx.begin_path();
        ctx.move_to(frame.left, y);
        ctx.line_to(frame.right(), y);
        ctx.stroke();

        let value = max - (i as f64 / 5.0) * (max - min);
        let _ = ctx.fill_text(&format!("{:.0}", value), 5.0, y + 4.0);
    }
}

/// Centered "no data" message
pub fn draw_empty(ctx: &CanvasRenderingContext2d, width: f64, height: f64, message: &str) {
    ctx.set_fill_style(&MUTED.into());
    ctx.set_font("16px sans-serif");
    let _ = ctx.fill_text(message, width / 2.0 - 80.0, height / 2.0);
}
