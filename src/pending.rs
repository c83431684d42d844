//! Pending-Approvals Controller
//!
//! Lists expenses awaiting an admin decision and submits approve/reject
//! decisions row by row. Each row moves through
//! `Rendered -> Requested -> Confirmed -> Submitted` and ends either removed
//! or retained with an error. Nothing is retried automatically.

use std::cell::RefCell;

use crate::api::ExpenseApi;
use crate::error::{DashError, DashResult};
use crate::model::{Decision, PendingRow};
use crate::view::{Navigator, Notifier, Page, PendingView};

pub const ACCESS_DENIED_MESSAGE: &str = "Access denied. Admins only.";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load pending expenses.";
pub const ACTION_FAILED_MESSAGE: &str = "Action failed";
pub const SERVER_ERROR_MESSAGE: &str = "Server error while processing request.";

/// Lifecycle of one pending row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowState {
    Rendered,
    Requested,
    Confirmed,
    Submitted,
    Removed,
    RetainedWithError,
}

impl RowState {
    /// A decision may be started from this state
    pub fn is_actionable(&self) -> bool {
        matches!(self, RowState::Rendered | RowState::RetainedWithError)
    }
}

/// Outcome of loading the pending list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingLoad {
    /// This many rows were rendered
    Loaded(usize),
    /// Nothing pending; the placeholder is visible
    Empty,
    /// 403; the user was sent back to the dashboard
    Redirected,
    /// Any other failure, already reported
    Failed,
}

/// Controller for the pending-approvals page
pub struct PendingApprovalsController<A, V, H> {
    api: A,
    view: V,
    host: H,
    rows: RefCell<Vec<(i64, RowState)>>,
}

impl<A, V, H> PendingApprovalsController<A, V, H>
where
    A: ExpenseApi,
    V: PendingView,
    H: Notifier + Navigator,
{
    pub fn new(api: A, view: V, host: H) -> Self {
        Self { api, view, host, rows: RefCell::new(Vec::new()) }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn row_state(&self, pending_id: i64) -> Option<RowState> {
        self.rows
            .borrow()
            .iter()
            .find(|(id, _)| *id == pending_id)
            .map(|(_, state)| *state)
    }

    /// Ids of rows still on screen, in display order
    pub fn remaining(&self) -> Vec<i64> {
        self.rows.borrow().iter().map(|(id, _)| *id).collect()
    }

    /// Clear the table and fetch the pending list
    pub async fn load(&self) -> PendingLoad {
        self.rows.borrow_mut().clear();
        self.view.clear_rows();
        self.view.set_empty_visible(false);

        let expenses = match self.api.pending_expenses().await {
            Ok(expenses) => expenses,
            Err(DashError::Forbidden { .. }) => {
                tracing::warn!("Pending list refused: admin role required");
                self.host.notify(ACCESS_DENIED_MESSAGE);
                self.host.navigate(Page::Dashboard);
                return PendingLoad::Redirected;
            }
            Err(e) => {
                tracing::error!("Failed to load pending expenses: {}", e);
                self.host.notify(LOAD_FAILED_MESSAGE);
                return PendingLoad::Failed;
            }
        };

        if expenses.is_empty() {
            self.view.set_empty_visible(true);
            return PendingLoad::Empty;
        }

        let mut rows = self.rows.borrow_mut();
        for expense in &expenses {
            let row = PendingRow::from(expense);
            self.view.append_row(&row);
            rows.push((row.pending_id, RowState::Rendered));
        }

        tracing::debug!(count = rows.len(), "Rendered pending expenses");
        PendingLoad::Loaded(rows.len())
    }

    /// Approve or reject one rendered row
    ///
    /// Returns the state the row ends in. A row whose decision is already in
    /// flight is left alone and its current state returned.
    pub async fn decide(&self, pending_id: i64, decision: Decision) -> DashResult<RowState> {
        match self.row_state(pending_id) {
            None => return Err(DashError::UnknownRow(pending_id)),
            Some(state) if !state.is_actionable() => {
                tracing::debug!(pending_id, ?state, "Decision already in progress");
                return Ok(state);
            }
            Some(_) => {}
        }

        self.set_state(pending_id, RowState::Requested);
        if !self.host.confirm(decision.confirm_message()) {
            self.set_state(pending_id, RowState::Rendered);
            return Ok(RowState::Rendered);
        }
        self.set_state(pending_id, RowState::Confirmed);

        self.set_state(pending_id, RowState::Submitted);
        let result = self.api.decide(pending_id, decision).await;

        match result {
            Ok(()) => {
                tracing::info!(pending_id, decision = decision.as_str(), "Decision recorded");
                self.view.remove_row(pending_id);

                let remaining = {
                    let mut rows = self.rows.borrow_mut();
                    rows.retain(|(id, _)| *id != pending_id);
                    rows.len()
                };
                if remaining == 0 {
                    self.view.set_empty_visible(true);
                }
                Ok(RowState::Removed)
            }
            Err(e) if e.is_http_status() => {
                tracing::warn!(pending_id, "Decision rejected: {}", e);
                self.host.notify(e.detail().unwrap_or(ACTION_FAILED_MESSAGE));
                self.set_state(pending_id, RowState::RetainedWithError);
                Ok(RowState::RetainedWithError)
            }
            Err(e) => {
                tracing::error!(pending_id, "Decision failed: {}", e);
                self.host.notify(SERVER_ERROR_MESSAGE);
                self.set_state(pending_id, RowState::RetainedWithError);
                Ok(RowState::RetainedWithError)
            }
        }
    }

    fn set_state(&self, pending_id: i64, state: RowState) {
        if let Some(entry) = self.rows.borrow_mut().iter_mut().find(|(id, _)| *id == pending_id) {
            entry.1 = state;
        }
    }
}
