//! # Expense Dash
//!
//! Client for an expense-approval dashboard: typed access to the backend
//! REST API, and the two page controllers that turn its JSON into KPI
//! cards, status tables, pie charts and approve/reject actions.
//!
//! ## Layers
//!
//! - **Fetch**: [`ExpenseApi`] returns typed records. [`ExpenseClient`]
//!   implements it with reqwest; the WASM frontend implements it with
//!   gloo-net.
//! - **Control**: [`DashboardController`] and [`PendingApprovalsController`]
//!   sequence fetches and decide what to render.
//! - **Render**: [`DashboardView`], [`PendingView`] and [`ChartRenderer`] take
//!   view models; [`Notifier`] and [`Navigator`] stand in for blocking
//!   dialogs and page navigation.
//!
//! ## Modules
//!
//! - [`model`]: wire types and view models
//! - [`filters`]: filter controls and query building
//! - [`api`]: the fetch seam and endpoint paths
//! - [`dashboard`] / [`pending`]: page controllers
//! - [`chart`]: single-chart-per-canvas ownership
//! - [`session`]: logout and the CLI token file
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use expense_dash::{Config, DashboardController, ExpenseClient, OutputFormat, TerminalView};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let client = ExpenseClient::new(&config.api)?;
//!
//!     let dashboard = DashboardController::new(client, TerminalView::new(OutputFormat::Table));
//!     let section = dashboard.load().await?;
//!     println!("Showing {:?} section", section);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod chart;
pub mod dashboard;
pub mod error;
pub mod filters;
pub mod model;
pub mod pending;
pub mod session;
pub mod view;

#[cfg(feature = "native")]
pub mod client;
#[cfg(feature = "native")]
pub mod config;
#[cfg(feature = "native")]
pub mod terminal;

// Re-export top-level types for convenience
pub use api::{endpoints, error_for_status, ExpenseApi, PieDimension};
pub use chart::{ChartHandle, ChartRenderer, ChartSlot};
pub use dashboard::{DashboardController, RefreshPolicy};
pub use error::{DashError, DashResult};
pub use filters::{encode_query, select_options, FilterControl, FilterState, TopN};
pub use model::{
    ChartDataset, ChartSlice, Decision, ExpenseRow, ExpenseStatus, FilterVocabulary, Identity,
    Kpi, KpiKind, KpiSet, KpiSummary, PendingExpense, PendingRow, Role, Section, SelectOption,
    StatusTable, UserOption, PENDING_CARD_ID,
};
pub use pending::{PendingApprovalsController, PendingLoad, RowState};
pub use session::{expired_cookie, logout, SessionStore, TokenFile, SESSION_COOKIE};
pub use view::{DashboardView, Navigator, Notifier, Page, PendingView};

#[cfg(feature = "native")]
pub use client::ExpenseClient;
#[cfg(feature = "native")]
pub use config::{
    generate_default_config, ApiConfig, Config, ConfigError, DashboardConfig, LoggingConfig,
    SessionConfig,
};
#[cfg(feature = "native")]
pub use terminal::{OutputFormat, TerminalView};
