//! Pending-approvals page state

use expense_dash::{PendingRow, PendingView};
use leptos::*;

#[derive(Clone, Copy)]
pub struct PendingState {
    pub rows: RwSignal<Vec<PendingRow>>,
    pub empty_visible: RwSignal<bool>,
}

impl PendingState {
    pub fn new() -> Self {
        Self {
            rows: create_rw_signal(Vec::new()),
            empty_visible: create_rw_signal(false),
        }
    }
}

impl PendingView for PendingState {
    fn clear_rows(&self) {
        self.rows.set(Vec::new());
    }

    fn append_row(&self, row: &PendingRow) {
        self.rows.update(|rows| rows.push(row.clone()));
    }

    fn remove_row(&self, pending_id: i64) {
        self.rows.update(|rows| rows.retain(|r| r.pending_id != pending_id));
    }

    fn set_empty_visible(&self, visible: bool) {
        self.empty_visible.set(visible);
    }
}
