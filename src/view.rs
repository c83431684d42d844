//! Rendering and host capabilities
//!
//! Controllers never touch a DOM or a terminal directly. They read control
//! values from and push view models into these traits; the browser frontend
//! implements them with reactive signals and the CLI with stdout.

use crate::api::PieDimension;
use crate::chart::ChartRenderer;
use crate::filters::{FilterControl, FilterState, TopN};
use crate::model::{KpiSet, PendingRow, Section, SelectOption, StatusTable};

/// Pages the client can navigate between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    PendingApprovals,
    Login,
}

impl Page {
    pub fn path(&self) -> &'static str {
        match self {
            Page::Dashboard => "/static/dashboard.html",
            Page::PendingApprovals => "/static/pending.html",
            Page::Login => "/static/login.html",
        }
    }
}

/// Blocking confirmation and notification, injected so flows stay testable
pub trait Notifier {
    /// Ask the user a yes/no question
    fn confirm(&self, message: &str) -> bool;

    /// Tell the user something went wrong
    fn notify(&self, message: &str);
}

pub trait Navigator {
    fn navigate(&self, page: Page);
}

/// The dashboard page
pub trait DashboardView: ChartRenderer + Navigator {
    /// Current values of the five shared filter controls
    fn filters(&self) -> FilterState;

    /// Current top-N control value for a pie chart
    fn top_n(&self, dimension: PieDimension) -> Option<TopN>;

    /// Reveal one section of the page
    fn show_section(&self, section: Section);

    /// Replace the KPI region
    fn render_kpis(&self, kpis: &KpiSet);

    /// Replace a status table and toggle its placeholder
    fn render_status_table(&self, table: &StatusTable);

    /// Replace the options of a select control
    fn render_filter_options(&self, control: FilterControl, options: &[SelectOption]);

    /// Make the Pending KPI card open the pending-approvals page
    fn enable_pending_click(&self);
}

/// The pending-approvals table
pub trait PendingView {
    fn clear_rows(&self);

    fn append_row(&self, row: &PendingRow);

    fn remove_row(&self, pending_id: i64);

    fn set_empty_visible(&self, visible: bool);
}
