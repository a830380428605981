//! Pair Plot Component
//!
//! Small multiples over the comparative columns: density curves on the
//! diagonal, joint density heatmaps with the Pearson coefficient elsewhere.

use leptos::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::components::canvas::{self, SERIES_COLORS};
use crate::state::global::{CellContent, PairPlot as PairPlotSpec};

const SIZE: f64 = 720.0;
const LABEL_GUTTER: f64 = 24.0;
const CELL_GAP: f64 = 4.0;

#[component]
pub fn PairPlot(plot: PairPlotSpec) -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();
    let observations = plot.observations;

    create_effect(move |_| {
        if let Some(canvas) = canvas_ref.get() {
            draw_pair_plot(&canvas, &plot);
        }
    });

    view! {
        <div>
            <canvas
                node_ref=canvas_ref
                width=SIZE.to_string()
                height=SIZE.to_string()
                class="w-full max-w-3xl mx-auto rounded-lg"
            />
            <p class="text-center text-sm text-gray-400 mt-2">
                {format!("{} overlapping weeks", observations)}
            </p>
        </div>
    }
}

/// Side length of one cell for `n` columns
fn cell_size(n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    (SIZE - LABEL_GUTTER) / n as f64
}

fn draw_pair_plot(canvas: &HtmlCanvasElement, plot: &PairPlotSpec) {
    let Some((ctx, _, _)) = canvas::prepare(canvas) else {
        return;
    };

    let n = plot.columns.len();
    let size = cell_size(n);

    for row in 0..n {
        for col in 0..n {
            let Some(cell) = plot.cell(row, col) else { continue };
            let left = LABEL_GUTTER + col as f64 * size + CELL_GAP / 2.0;
            let top = row as f64 * size + CELL_GAP / 2.0;
            let inner = size - CELL_GAP;

            ctx.set_stroke_style(&canvas::GRID.into());
            ctx.set_line_width(1.0);
            ctx.stroke_rect(left, top, inner, inner);

            match &cell.content {
                CellContent::Density { density, .. } => {
                    // COVID columns come first
                    let color = if row < n / 2 { SERIES_COLORS[4] } else { SERIES_COLORS[0] };
                    draw_density(&ctx, left, top, inner, density, color);
                }
                CellContent::Joint {
                    correlation,
                    density,
                    ..
                } => {
                    draw_heatmap(&ctx, left, top, inner, density);
                    ctx.set_fill_style(&"#ffffff".into());
                    ctx.set_font("bold 13px sans-serif");
                    let _ = ctx.fill_text(&format!("r={:.2}", correlation), left + 4.0, top + 16.0);
                }
                // Zero variance: the frame stays empty
                CellContent::Skipped { .. } => {}
            }
        }
    }

    ctx.set_fill_style(&canvas::LABEL.into());
    ctx.set_font("10px sans-serif");
    for (i, name) in plot.columns.iter().enumerate() {
        // Column names under the last row, row names rotated along the gutter
        let _ = ctx.fill_text(name, LABEL_GUTTER + i as f64 * size + 4.0, SIZE - 8.0);

        ctx.save();
        let _ = ctx.translate(14.0, (i as f64 + 1.0) * size - 4.0);
        let _ = ctx.rotate(-std::f64::consts::FRAC_PI_2);
        let _ = ctx.fill_text(name, 0.0, 0.0);
        ctx.restore();
    }
}

fn draw_density(ctx: &CanvasRenderingContext2d, left: f64, top: f64, size: f64, density: &[f64], color: &str) {
    let Some((_, max)) = canvas::extent(density.iter().copied()) else {
        return;
    };
    if density.len() < 2 || max <= 0.0 {
        return;
    }

    let last = (density.len() - 1) as f64;
    ctx.set_stroke_style(&color.into());
    ctx.set_line_width(2.0);
    ctx.begin_path();
    for (i, d) in density.iter().enumerate() {
        let x = canvas::scale(i as f64, 0.0, last, left + 4.0, left + size - 4.0);
        let y = canvas::scale(*d, 0.0, max, top + size - 4.0, top + 24.0);
        if i == 0 {
            ctx.move_to(x, y);
        } else {
            ctx.line_to(x, y);
        }
    }
    ctx.stroke();
}

/// `density[j][i]` fills the square at column `i`, row `j` counted from the bottom
fn draw_heatmap(ctx: &CanvasRenderingContext2d, left: f64, top: f64, size: f64, density: &[Vec<f64>]) {
    let max = density
        .iter()
        .flat_map(|row| row.iter().copied())
        .fold(0.0_f64, f64::max);
    let rows = density.len();
    if rows == 0 || max <= 0.0 {
        return;
    }

    let step_y = size / rows as f64;
    for (j, row) in density.iter().enumerate() {
        let step_x = size / row.len().max(1) as f64;
        for (i, d) in row.iter().enumerate() {
            let t = d / max;
            if t < 0.02 {
                continue;
            }
            ctx.set_fill_style(&canvas::ramp(t).into());
            ctx.set_global_alpha(0.3 + 0.7 * t);
            ctx.fill_rect(
                left + i as f64 * step_x,
                top + size - (j as f64 + 1.0) * step_y,
                step_x.ceil(),
                step_y.ceil(),
            );
        }
    }
    ctx.set_global_alpha(1.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_size_divides_canvas() {
        assert_eq!(cell_size(6) * 6.0 + LABEL_GUTTER, SIZE);
        assert_eq!(cell_size(0), 0.0);
    }
}
