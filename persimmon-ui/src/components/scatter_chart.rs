//! Scatter Chart Component
//!
//! Circle marks over week and patients, sized by claims and coloured by
//! physicians. Hovering a mark shows its tooltip; the wheel zooms the week
//! axis, dragging pans it and a double click resets it.

use leptos::*;
use web_sys::{HtmlCanvasElement, MouseEvent, WheelEvent};

use crate::components::canvas::{self, Frame};
use crate::state::global::{ScatterChart as ScatterSpec, ScatterPoint};

const MIN_RADIUS: f64 = 3.0;
const MAX_RADIUS: f64 = 15.0;

/// Visible window of the week axis, in days from the first week
type Window = (f64, f64);

#[component]
pub fn ScatterChart(spec: ScatterSpec) -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();
    let hovered = create_rw_signal::<Option<usize>>(None);
    let window = create_rw_signal::<Option<Window>>(None);
    let drag_from = create_rw_signal::<Option<f64>>(None);

    let layout = store_value(Layout::new(&spec));
    let interactive = spec.interactive;
    let tooltip_fields = spec.encoding.tooltip.clone();
    let points = store_value(spec.points.clone());

    create_effect(move |_| {
        let hovered = hovered.get();
        let window = window.get();
        if let Some(canvas) = canvas_ref.get() {
            layout.with_value(|layout| draw_scatter(&canvas, layout, window, hovered));
        }
    });

    let on_move = move |ev: MouseEvent| {
        if !interactive {
            return;
        }
        let Some(canvas) = canvas_ref.get() else { return };
        let (x, y) = canvas_position(&canvas, &ev);

        if let Some(from) = drag_from.get_untracked() {
            layout.with_value(|layout| {
                let current = window.get_untracked().unwrap_or(layout.full_window());
                let frame = layout.frame;
                let shift = (from - x) / frame.width * (current.1 - current.0);
                window.set(Some((current.0 + shift, current.1 + shift)));
            });
            drag_from.set(Some(x));
            return;
        }

        let hit = layout.with_value(|layout| layout.hit_test(window.get_untracked(), x, y));
        if hit != hovered.get_untracked() {
            hovered.set(hit);
        }
    };

    let on_wheel = move |ev: WheelEvent| {
        if !interactive {
            return;
        }
        ev.prevent_default();
        let Some(canvas) = canvas_ref.get() else { return };
        let (x, _) = canvas_position(&canvas, &ev);

        layout.with_value(|layout| {
            let current = window.get_untracked().unwrap_or(layout.full_window());
            let factor = if ev.delta_y() < 0.0 { 0.8 } else { 1.25 };
            window.set(Some(zoom(current, layout.frame, x, factor)));
        });
    };

    view! {
        <div class="relative">
            <canvas
                node_ref=canvas_ref
                width="800"
                height="400"
                class="w-full h-64 md:h-96 rounded-lg cursor-crosshair"
                on:mousemove=on_move
                on:mousedown=move |ev: MouseEvent| {
                    if interactive {
                        if let Some(canvas) = canvas_ref.get() {
                            drag_from.set(Some(canvas_position(&canvas, &ev).0));
                        }
                    }
                }
                on:mouseup=move |_| drag_from.set(None)
                on:mouseleave=move |_| {
                    drag_from.set(None);
                    hovered.set(None);
                }
                on:wheel=on_wheel
                on:dblclick=move |_| window.set(None)
            />

            {move || {
                let fields = tooltip_fields.clone();
                hovered.get().and_then(|idx| points.with_value(|p| p.get(idx).copied())).map(|point| {
                    view! {
                        <div class="absolute top-2 right-2 bg-gray-900/90 border border-gray-700 rounded-lg px-3 py-2 text-sm">
                            <div class="font-semibold mb-1">{point.week.format("%Y-%m-%d").to_string()}</div>
                            {fields
                                .into_iter()
                                .map(|field| {
                                    let value = point.field(&field).unwrap_or_default();
                                    view! {
                                        <div class="flex justify-between space-x-4">
                                            <span class="text-gray-400 capitalize">{field}</span>
                                            <span>{value}</span>
                                        </div>
                                    }
                                })
                                .collect_view()}
                        </div>
                    }
                })
            }}

            {move || {
                layout.with_value(|layout| layout.color_domain).map(|(lo, hi)| view! {
                    <div class="flex justify-center items-center space-x-2 mt-4 text-sm text-gray-300">
                        <span>"physicians"</span>
                        <span>{lo}</span>
                        <div
                            class="w-32 h-3 rounded"
                            style=format!(
                                "background: linear-gradient(to right, {}, {})",
                                canvas::ramp(0.0),
                                canvas::ramp(1.0)
                            )
                        />
                        <span>{hi}</span>
                        <span class="text-gray-500">"(size: claims)"</span>
                    </div>
                })
            }}
        </div>
    }
}

/// Mouse position in canvas pixels
fn canvas_position(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
    let rect = canvas.get_bounding_client_rect();
    let sx = if rect.width() > 0.0 { canvas.width() as f64 / rect.width() } else { 1.0 };
    let sy = if rect.height() > 0.0 { canvas.height() as f64 / rect.height() } else { 1.0 };
    (
        (ev.client_x() as f64 - rect.left()) * sx,
        (ev.client_y() as f64 - rect.top()) * sy,
    )
}

/// Scale the window around the cursor position
fn zoom(window: Window, frame: Frame, cursor_x: f64, factor: f64) -> Window {
    let anchor = canvas::scale(cursor_x, frame.left, frame.right(), window.0, window.1);
    (
        anchor - (anchor - window.0) * factor,
        anchor + (window.1 - anchor) * factor,
    )
}

/// Fixed scales of one chart; only the week window changes
struct Layout {
    frame: Frame,
    height: f64,
    first: Option<chrono::NaiveDate>,
    /// (days from first week, patients, claims, physicians)
    marks: Vec<(f64, f64, f64, f64)>,
    y_domain: (f64, f64),
    size_domain: (f64, f64),
    color_domain: Option<(i64, i64)>,
}

impl Layout {
    fn new(spec: &ScatterSpec) -> Self {
        let (width, height) = (800.0, 400.0);
        let first = spec.points.iter().map(|p| p.week).min();

        let marks: Vec<_> = spec
            .points
            .iter()
            .map(|p: &ScatterPoint| {
                let day = first.map(|f| (p.week - f).num_days() as f64).unwrap_or(0.0);
                (day, p.patients as f64, p.claims as f64, p.physicians as f64)
            })
            .collect();

        let (y_min, y_max) = canvas::extent(marks.iter().map(|m| m.1)).unwrap_or((0.0, 1.0));
        let color_domain = canvas::extent(marks.iter().map(|m| m.3)).map(|(lo, hi)| (lo as i64, hi as i64));

        Self {
            frame: Frame::with_margins(width, height),
            height,
            first,
            y_domain: canvas::padded(y_min, y_max),
            size_domain: canvas::extent(marks.iter().map(|m| m.2)).unwrap_or((0.0, 1.0)),
            color_domain,
            marks,
        }
    }

    fn full_window(&self) -> Window {
        let (lo, hi) = canvas::extent(self.marks.iter().map(|m| m.0)).unwrap_or((0.0, 1.0));
        canvas::padded(lo, hi)
    }

    fn position(&self, window: Window, mark: &(f64, f64, f64, f64)) -> (f64, f64) {
        let f = self.frame;
        (
            canvas::scale(mark.0, window.0, window.1, f.left, f.right()),
            canvas::scale(mark.1, self.y_domain.0, self.y_domain.1, f.bottom(), f.top),
        )
    }

    fn radius(&self, claims: f64) -> f64 {
        // Area, not radius, proportional to claims
        let (lo, hi) = self.size_domain;
        let t = if hi > lo { (claims - lo) / (hi - lo) } else { 0.5 };
        (MIN_RADIUS.powi(2) + t * (MAX_RADIUS.powi(2) - MIN_RADIUS.powi(2))).sqrt()
    }

    fn color(&self, physicians: f64) -> String {
        match self.color_domain {
            Some((lo, hi)) if hi > lo => canvas::ramp((physicians - lo as f64) / (hi - lo) as f64),
            _ => canvas::ramp(0.5),
        }
    }

    /// Topmost mark under the cursor
    fn hit_test(&self, window: Option<Window>, x: f64, y: f64) -> Option<usize> {
        if !self.frame.contains(x, y) {
            return None;
        }
        let window = window.unwrap_or(self.full_window());
        let centers: Vec<_> = self
            .marks
            .iter()
            .map(|m| {
                let (cx, cy) = self.position(window, m);
                (cx, cy, self.radius(m.2))
            })
            .collect();
        nearest_mark(&centers, x, y)
    }
}

/// Index of the closest circle containing `(x, y)`; later marks win ties
fn nearest_mark(circles: &[(f64, f64, f64)], x: f64, y: f64) -> Option<usize> {
    circles
        .iter()
        .enumerate()
        .filter_map(|(i, (cx, cy, r))| {
            let d = ((cx - x).powi(2) + (cy - y).powi(2)).sqrt();
            (d <= r.max(4.0)).then_some((i, d))
        })
        .fold(None, |best: Option<(usize, f64)>, (i, d)| match best {
            Some((_, bd)) if bd < d => best,
            _ => Some((i, d)),
        })
        .map(|(i, _)| i)
}

fn draw_scatter(canvas: &HtmlCanvasElement, layout: &Layout, window: Option<Window>, hovered: Option<usize>) {
    let Some((ctx, width, height)) = canvas::prepare(canvas) else {
        return;
    };

    let Some(first) = layout.first else {
        canvas::draw_empty(&ctx, width, height, "No data for this selection");
        return;
    };

    let frame = layout.frame;
    canvas::draw_y_grid(&ctx, &frame, layout.y_domain.0, layout.y_domain.1);

    let window = window.unwrap_or(layout.full_window());

    ctx.save();
    ctx.begin_path();
    ctx.rect(frame.left, frame.top, frame.width, frame.height);
    ctx.clip();

    ctx.set_global_alpha(0.75);
    for (i, mark) in layout.marks.iter().enumerate() {
        let (x, y) = layout.position(window, mark);
        ctx.set_fill_style(&layout.color(mark.3).into());
        ctx.begin_path();
        let _ = ctx.arc(x, y, layout.radius(mark.2), 0.0, std::f64::consts::PI * 2.0);
        ctx.fill();

        if hovered == Some(i) {
            ctx.set_stroke_style(&"#ffffff".into());
            ctx.set_line_width(2.0);
            ctx.stroke();
        }
    }
    ctx.set_global_alpha(1.0);
    ctx.restore();

    ctx.set_fill_style(&canvas::LABEL.into());
    ctx.set_font("12px sans-serif");

    let num_labels = 5;
    for i in 0..=num_labels {
        let t = i as f64 / num_labels as f64;
        let day = window.0 + t * (window.1 - window.0);
        let date = first + chrono::Duration::days(day.round() as i64);
        let x = frame.left + t * frame.width;
        let _ = ctx.fill_text(&date.format("%Y-%m-%d").to_string(), x - 30.0, layout.height - 10.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_mark_inside_radius() {
        let circles = [(10.0, 10.0, 5.0), (30.0, 10.0, 5.0)];
        assert_eq!(nearest_mark(&circles, 12.0, 11.0), Some(0));
        assert_eq!(nearest_mark(&circles, 29.0, 10.0), Some(1));
        assert_eq!(nearest_mark(&circles, 20.0, 30.0), None);
    }

    #[test]
    fn test_nearest_mark_prefers_closest() {
        let circles = [(10.0, 10.0, 10.0), (14.0, 10.0, 10.0)];
        assert_eq!(nearest_mark(&circles, 13.0, 10.0), Some(1));
    }

    #[test]
    fn test_zoom_keeps_anchor() {
        let frame = Frame::with_margins(800.0, 400.0);
        let center = frame.left + frame.width / 2.0;
        let zoomed = zoom((0.0, 100.0), frame, center, 0.5);
        assert!((zoomed.0 - 25.0).abs() < 1e-9);
        assert!((zoomed.1 - 75.0).abs() < 1e-9);
    }
}
