//! Line Chart Component
//!
//! Weekly patients, physicians and claims as lines on an HTML5 canvas.

use leptos::*;
use web_sys::HtmlCanvasElement;

use crate::components::canvas::{self, Frame, SERIES_COLORS};
use crate::state::global::LineChart as LineChartSpec;

/// Line chart over the week index
#[component]
pub fn LineChart(spec: LineChartSpec) -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();

    let legend: Vec<String> = spec.series.iter().map(|s| s.name.clone()).collect();

    create_effect(move |_| {
        if let Some(canvas) = canvas_ref.get() {
            draw_line_chart(&canvas, &spec);
        }
    });

    view! {
        <div class="relative">
            <canvas
                node_ref=canvas_ref
                width="800"
                height="400"
                class="w-full h-64 md:h-96 rounded-lg"
            />

            <div class="flex justify-center flex-wrap gap-4 mt-4">
                {legend
                    .into_iter()
                    .enumerate()
                    .map(|(idx, name)| {
                        let color = SERIES_COLORS[idx % SERIES_COLORS.len()];
                        view! {
                            <div class="flex items-center space-x-2">
                                <div
                                    class="w-3 h-3 rounded-full"
                                    style=format!("background-color: {}", color)
                                />
                                <span class="text-sm text-gray-300 capitalize">{name}</span>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
        </div>
    }
}

fn draw_line_chart(canvas: &HtmlCanvasElement, spec: &LineChartSpec) {
    let Some((ctx, width, height)) = canvas::prepare(canvas) else {
        return;
    };

    let values = spec
        .series
        .iter()
        .flat_map(|s| s.values.iter().flatten().map(|v| *v as f64));

    let (Some(first), Some(last), Some((min, max))) =
        (spec.weeks.first(), spec.weeks.last(), canvas::extent(values))
    else {
        canvas::draw_empty(&ctx, width, height, "No data for this selection");
        return;
    };

    let frame = Frame::with_margins(width, height);
    let (y_min, y_max) = canvas::padded(min, max);
    canvas::draw_y_grid(&ctx, &frame, y_min, y_max);

    // Weeks are positioned by date so irregular spacing shows as such
    let days = |week: &chrono::NaiveDate| (*week - *first).num_days() as f64;
    let span = days(last);
    let x_of = |i: usize| canvas::scale(days(&spec.weeks[i]), 0.0, span, frame.left, frame.right());
    let y_of = |v: i64| canvas::scale(v as f64, y_min, y_max, frame.bottom(), frame.top);

    for (idx, series) in spec.series.iter().enumerate() {
        let color = SERIES_COLORS[idx % SERIES_COLORS.len()];
        ctx.set_stroke_style(&color.into());
        ctx.set_line_width(2.0);
        ctx.begin_path();

        // A missing value lifts the pen, leaving a gap
        let mut pen_down = false;
        for (i, value) in series.values.iter().enumerate() {
            match value {
                Some(v) if pen_down => ctx.line_to(x_of(i), y_of(*v)),
                Some(v) => {
                    ctx.move_to(x_of(i), y_of(*v));
                    pen_down = true;
                }
                None => pen_down = false,
            }
        }
        ctx.stroke();

        ctx.set_fill_style(&color.into());
        for (i, value) in series.values.iter().enumerate() {
            if let Some(v) = value {
                ctx.begin_path();
                let _ = ctx.arc(x_of(i), y_of(*v), 3.0, 0.0, std::f64::consts::PI * 2.0);
                ctx.fill();
            }
        }
    }

    ctx.set_fill_style(&canvas::LABEL.into());
    ctx.set_font("12px sans-serif");

    let num_labels = 5;
    for i in 0..=num_labels {
        let offset = (span * i as f64 / num_labels as f64).round() as i64;
        let date = *first + chrono::Duration::days(offset);
        let x = frame.left + (i as f64 / num_labels as f64) * frame.width;
        let _ = ctx.fill_text(&date.format("%Y-%m-%d").to_string(), x - 30.0, height - 10.0);
    }
}
