//! Backend API seam
//!
//! [`ExpenseApi`] is the fetch layer the controllers depend on. The native
//! build implements it with reqwest (`client::ExpenseClient`), the browser
//! build with gloo-net, and tests with in-memory mocks.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{DashError, DashResult};
use crate::filters::{with_query, FilterControl, FilterState, TopN};
use crate::model::{
    ChartDataset, Decision, ExpenseRow, ExpenseStatus, FilterVocabulary, Identity, KpiSummary,
    PendingExpense,
};

/// Aggregation dimension of a pie chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieDimension {
    Head,
    Office,
}

impl PieDimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            PieDimension::Head => "head",
            PieDimension::Office => "office",
        }
    }

    /// Canvas the chart is bound to
    pub fn canvas_id(&self) -> &'static str {
        match self {
            PieDimension::Head => "head-chart",
            PieDimension::Office => "office-chart",
        }
    }

    /// The top-N control that limits this chart
    pub fn top_control(&self) -> FilterControl {
        match self {
            PieDimension::Head => FilterControl::HeadTop,
            PieDimension::Office => FilterControl::OfficeTop,
        }
    }
}

/// Endpoint paths, relative to the API base
pub mod endpoints {
    use super::*;

    pub const ME: &str = "/me";
    pub const LOGIN: &str = "/login";
    pub const ADMIN_FILTERS: &str = "/api/dashboard/admin/filters";
    pub const PENDING_EXPENSES: &str = "/api/admin/pending-expenses";

    pub fn kpis(filters: &FilterState) -> String {
        with_query("/api/dashboard/kpis", &filters.to_query())
    }

    pub fn expenses(status: ExpenseStatus) -> String {
        format!("/api/dashboard/expenses/{}", status.as_str())
    }

    pub fn pie(dimension: PieDimension, filters: &FilterState, top: Option<TopN>) -> String {
        with_query(
            &format!("/api/dashboard/admin/pie/{}", dimension.as_str()),
            &filters.to_query_with_top(top),
        )
    }

    pub fn decision(pending_id: i64, decision: Decision) -> String {
        format!("{}/{}/{}", PENDING_EXPENSES, pending_id, decision.as_str())
    }
}

/// Typed access to the dashboard backend
///
/// Futures are not required to be `Send`: everything runs on a single
/// cooperative event loop, and the browser's fetch futures are `!Send`.
#[async_trait(?Send)]
pub trait ExpenseApi {
    /// `GET /me`
    async fn me(&self) -> DashResult<Identity>;

    /// `GET /api/dashboard/kpis`
    async fn kpis(&self, filters: &FilterState) -> DashResult<KpiSummary>;

    /// `GET /api/dashboard/expenses/{status}`
    async fn expenses(&self, status: ExpenseStatus) -> DashResult<Vec<ExpenseRow>>;

    /// `GET /api/dashboard/admin/filters`
    async fn admin_filters(&self) -> DashResult<FilterVocabulary>;

    /// `GET /api/dashboard/admin/pie/{dimension}`
    async fn pie(
        &self,
        dimension: PieDimension,
        filters: &FilterState,
        top: Option<TopN>,
    ) -> DashResult<ChartDataset>;

    /// `GET /api/admin/pending-expenses`, credentials included
    async fn pending_expenses(&self) -> DashResult<Vec<PendingExpense>>;

    /// `POST /api/admin/pending-expenses/{id}/{approve|reject}`
    async fn decide(&self, pending_id: i64, decision: Decision) -> DashResult<()>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// Build the error for a non-2xx response from its status and raw body
///
/// Only a string `detail` is surfaced; validation errors that carry a list
/// fall back to the caller's generic message.
pub fn error_for_status(status: u16, body: &str) -> DashError {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .and_then(|d| d.as_str().map(str::to_string));

    if status == 403 {
        DashError::Forbidden { detail }
    } else {
        DashError::Rejected { status, detail }
    }
}
