//! Pie Chart Component
//!
//! Draws pre-aggregated slices on an HTML5 canvas. The canvas element is
//! always mounted; the controller decides when a chart is drawn or torn
//! down through [`ChartHandle`].

use std::f64::consts::{FRAC_PI_2, TAU};

use expense_dash::{ChartDataset, ChartHandle, PieDimension};
use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const SLICE_COLORS: [&str; 8] = [
    "#FF9800", // Orange
    "#4CAF50", // Green
    "#2196F3", // Blue
    "#9C27B0", // Purple
    "#F44336", // Red
    "#00BCD4", // Cyan
    "#FFC107", // Amber
    "#795548", // Brown
];

/// Canvas for one pie dimension
#[component]
pub fn PieChart(dimension: PieDimension, title: &'static str) -> impl IntoView {
    view! {
        <section class="bg-gray-800 rounded-xl p-6">
            <h2 class="text-xl font-semibold mb-4">{title}</h2>
            <canvas
                id=dimension.canvas_id()
                width="480"
                height="300"
                class="w-full rounded-lg"
            />
        </section>
    }
}

/// A pie drawn on a mounted canvas
struct CanvasPie {
    canvas: HtmlCanvasElement,
}

impl ChartHandle for CanvasPie {
    fn destroy(self: Box<Self>) {
        if let Some(ctx) = context_2d(&self.canvas) {
            ctx.clear_rect(0.0, 0.0, self.canvas.width() as f64, self.canvas.height() as f64);
        }
    }
}

/// Stand-in when the canvas is not in the document
struct Detached;

impl ChartHandle for Detached {
    fn destroy(self: Box<Self>) {}
}

/// Draw `data` on the canvas with id `canvas_id`
pub fn draw_on_canvas(canvas_id: &str, data: &ChartDataset) -> Box<dyn ChartHandle> {
    let canvas = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(canvas_id))
        .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok());

    let Some(canvas) = canvas else {
        web_sys::console::warn_1(&format!("Canvas #{} not mounted", canvas_id).into());
        return Box::new(Detached);
    };
    let Some(ctx) = context_2d(&canvas) else {
        return Box::new(Detached);
    };

    draw_pie(&canvas, &ctx, data);
    Box::new(CanvasPie { canvas })
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
}

/// Start and end angle of every slice, clockwise from twelve o'clock
///
/// Negative values get no arc. Empty when nothing is positive.
pub fn slice_angles(data: &ChartDataset) -> Vec<(f64, f64)> {
    let total: f64 = data.slices.iter().map(|s| s.value.max(0.0)).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut start = -FRAC_PI_2;
    data.slices
        .iter()
        .map(|slice| {
            let sweep = slice.value.max(0.0) / total * TAU;
            let span = (start, start + sweep);
            start += sweep;
            span
        })
        .collect()
}

fn draw_pie(canvas: &HtmlCanvasElement, ctx: &CanvasRenderingContext2d, data: &ChartDataset) {
    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    ctx.clear_rect(0.0, 0.0, width, height);

    let angles = slice_angles(data);
    if angles.is_empty() {
        ctx.set_fill_style(&"#6b7280".into());
        ctx.set_font("16px sans-serif");
        let _ = ctx.fill_text("No data", width / 3.0 - 30.0, height / 2.0);
        return;
    }

    let radius = (height / 2.0 - 10.0).min(width / 3.0);
    let (cx, cy) = (radius + 10.0, height / 2.0);
    let total = data.total();

    for (idx, (slice, (start, end))) in data.slices.iter().zip(&angles).enumerate() {
        let color = SLICE_COLORS[idx % SLICE_COLORS.len()];

        ctx.set_fill_style(&color.into());
        ctx.begin_path();
        ctx.move_to(cx, cy);
        let _ = ctx.arc(cx, cy, radius, *start, *end);
        ctx.close_path();
        ctx.fill();

        // Legend
        let y = 20.0 + idx as f64 * 22.0;
        let x = cx + radius + 20.0;
        ctx.fill_rect(x, y - 10.0, 12.0, 12.0);
        ctx.set_fill_style(&"#d1d5db".into());
        ctx.set_font("12px sans-serif");
        let percent = if total > 0.0 { slice.value / total * 100.0 } else { 0.0 };
        let _ = ctx.fill_text(&format!("{} ({:.1}%)", slice.label, percent), x + 18.0, y);
    }
}
