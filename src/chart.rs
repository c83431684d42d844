//! Pie chart ownership
//!
//! Chart backends cannot swap a dataset in place, so a redraw always tears
//! the previous chart down first. [`ChartSlot`] enforces that at most one
//! chart is alive per canvas.

use crate::model::ChartDataset;

/// A live chart bound to a canvas
pub trait ChartHandle {
    /// Release everything the chart holds on its canvas
    fn destroy(self: Box<Self>);
}

/// Something that can draw a pie chart onto a canvas
pub trait ChartRenderer {
    fn draw_pie(&self, canvas_id: &str, data: &ChartDataset) -> Box<dyn ChartHandle>;
}

/// The single chart bound to one canvas
pub struct ChartSlot {
    canvas_id: &'static str,
    current: Option<Box<dyn ChartHandle>>,
    redraws: u64,
}

impl ChartSlot {
    pub fn new(canvas_id: &'static str) -> Self {
        Self { canvas_id, current: None, redraws: 0 }
    }

    pub fn canvas_id(&self) -> &'static str {
        self.canvas_id
    }

    pub fn is_bound(&self) -> bool {
        self.current.is_some()
    }

    /// Number of charts drawn into this slot so far
    pub fn redraws(&self) -> u64 {
        self.redraws
    }

    /// Destroy the current chart, if any, and draw a new one
    pub fn replace<R>(&mut self, renderer: &R, data: &ChartDataset)
    where
        R: ChartRenderer + ?Sized,
    {
        if let Some(previous) = self.current.take() {
            previous.destroy();
        }
        self.current = Some(renderer.draw_pie(self.canvas_id, data));
        self.redraws += 1;
    }

    pub fn clear(&mut self) {
        if let Some(previous) = self.current.take() {
            previous.destroy();
        }
    }
}

impl Drop for ChartSlot {
    fn drop(&mut self) {
        self.clear();
    }
}

impl std::fmt::Debug for ChartSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartSlot")
            .field("canvas_id", &self.canvas_id)
            .field("bound", &self.is_bound())
            .field("redraws", &self.redraws)
            .finish()
    }
}
