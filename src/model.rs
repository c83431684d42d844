//! Dashboard data model
//!
//! Wire types returned by the backend and the view models the controllers
//! derive from them.

use serde::{Deserialize, Deserializer, Serialize};

/// Treat a JSON `null` string the same as a missing one
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================
// Identity
// ============================================

/// Session role. Anything other than `admin` is a regular user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[serde(other)]
    User,
}

/// Current session identity from `/me`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// The dashboard section this identity is allowed to see
    pub fn section(&self) -> Section {
        if self.is_admin() {
            Section::Admin
        } else {
            Section::User
        }
    }
}

/// Which half of the dashboard is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// Filters and pie charts
    Admin,
    /// Status tables
    User,
}

impl Section {
    pub fn element_id(&self) -> &'static str {
        match self {
            Section::Admin => "admin-section",
            Section::User => "user-section",
        }
    }
}

// ============================================
// KPIs
// ============================================

/// Aggregate numbers from `/api/dashboard/kpis`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    #[serde(default)]
    pub total_expense: f64,
    #[serde(default)]
    pub total_uploaded: u64,
    #[serde(default)]
    pub total_approved: u64,
    #[serde(default)]
    pub total_rejected: u64,
    #[serde(default)]
    pub total_pending: u64,
}

/// The five KPI cards, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum KpiKind {
    TotalExpense,
    TotalUploaded,
    Approved,
    Rejected,
    Pending,
}

impl KpiKind {
    pub const ALL: [KpiKind; 5] = [
        KpiKind::TotalExpense,
        KpiKind::TotalUploaded,
        KpiKind::Approved,
        KpiKind::Rejected,
        KpiKind::Pending,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            KpiKind::TotalExpense => "Total Expense",
            KpiKind::TotalUploaded => "Total Uploaded",
            KpiKind::Approved => "Approved",
            KpiKind::Rejected => "Rejected",
            KpiKind::Pending => "Pending",
        }
    }
}

/// Element id of the Pending card, target of the click-through
pub const PENDING_CARD_ID: &str = "pendingCard";

/// A single rendered KPI card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpi {
    pub kind: KpiKind,
    pub label: &'static str,
    pub value: String,
}

impl Kpi {
    /// Element id for cards that need one
    pub fn element_id(&self) -> Option<&'static str> {
        (self.kind == KpiKind::Pending).then_some(PENDING_CARD_ID)
    }
}

/// Ordered KPI cards, rebuilt from scratch on every fetch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KpiSet {
    pub cards: Vec<Kpi>,
}

impl From<&KpiSummary> for KpiSet {
    fn from(summary: &KpiSummary) -> Self {
        let cards = KpiKind::ALL
            .iter()
            .map(|&kind| {
                let value = match kind {
                    KpiKind::TotalExpense => summary.total_expense.to_string(),
                    KpiKind::TotalUploaded => summary.total_uploaded.to_string(),
                    KpiKind::Approved => summary.total_approved.to_string(),
                    KpiKind::Rejected => summary.total_rejected.to_string(),
                    KpiKind::Pending => summary.total_pending.to_string(),
                };
                Kpi { kind, label: kind.label(), value }
            })
            .collect();

        Self { cards }
    }
}

impl KpiSet {
    pub fn get(&self, kind: KpiKind) -> Option<&Kpi> {
        self.cards.iter().find(|k| k.kind == kind)
    }
}

// ============================================
// Status tables
// ============================================

/// Expense status keyword used by the per-user tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    Approved,
    Pending,
    Rejected,
}

impl ExpenseStatus {
    pub const ALL: [ExpenseStatus; 3] = [
        ExpenseStatus::Approved,
        ExpenseStatus::Pending,
        ExpenseStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseStatus::Approved => "approved",
            ExpenseStatus::Pending => "pending",
            ExpenseStatus::Rejected => "rejected",
        }
    }

    /// Region the table is rendered into
    pub fn table_id(&self) -> String {
        format!("{}-table", self.as_str())
    }

    /// Placeholder shown when the table is empty
    pub fn empty_id(&self) -> String {
        format!("{}-empty", self.as_str())
    }
}

impl std::fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One expense in a dashboard status table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRow {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub head: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subhead: String,
    #[serde(default)]
    pub amount: Option<f64>,
}

impl ExpenseRow {
    pub fn cells(&self) -> [String; 4] {
        [
            self.date.clone().unwrap_or_default(),
            self.head.clone(),
            self.subhead.clone(),
            self.amount.map(|a| a.to_string()).unwrap_or_default(),
        ]
    }
}

/// Rendered status table: full replacement on every load
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusTable {
    pub status: ExpenseStatus,
    pub header: Option<[&'static str; 4]>,
    pub rows: Vec<[String; 4]>,
    pub empty_visible: bool,
}

impl StatusTable {
    pub const HEADER: [&'static str; 4] = ["Date", "Head", "Subhead", "Amount"];

    pub fn from_rows(status: ExpenseStatus, records: &[ExpenseRow]) -> Self {
        if records.is_empty() {
            return Self { status, header: None, rows: Vec::new(), empty_visible: true };
        }

        Self {
            status,
            header: Some(Self::HEADER),
            rows: records.iter().map(ExpenseRow::cells).collect(),
            empty_visible: false,
        }
    }
}

// ============================================
// Admin filter vocabularies
// ============================================

/// A user entry in the filter vocabulary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserOption {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub label: String,
}

/// Filter vocabularies from `/api/dashboard/admin/filters`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterVocabulary {
    #[serde(default)]
    pub users: Vec<UserOption>,
    #[serde(default)]
    pub offices: Vec<String>,
    #[serde(default)]
    pub heads: Vec<String>,
    #[serde(default)]
    pub subheads: Vec<String>,
}

/// One `<option>` of a filter select
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self { value: value.into(), label: label.into() }
    }

    /// Same text for value and label
    pub fn plain(text: &str) -> Self {
        Self::new(text, text)
    }

    /// True for the "All ..." entry that means no filter
    pub fn is_sentinel(&self) -> bool {
        self.value.is_empty()
    }
}

// ============================================
// Charts
// ============================================

/// One pie slice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSlice {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub label: String,
    pub value: f64,
}

/// Pre-aggregated pie data, in backend order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartDataset {
    pub slices: Vec<ChartSlice>,
}

impl ChartDataset {
    pub fn labels(&self) -> Vec<&str> {
        self.slices.iter().map(|s| s.label.as_str()).collect()
    }

    pub fn total(&self) -> f64 {
        self.slices.iter().map(|s| s.value).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

// ============================================
// Pending approvals
// ============================================

/// An expense awaiting an admin decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingExpense {
    pub pending_id: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub submitted_by_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub client: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub office: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub head: String,
    #[serde(default)]
    pub subhead: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub expense_date: Option<String>,
}

/// A rendered pending-approvals row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingRow {
    pub pending_id: i64,
    pub cells: [String; 7],
}

impl PendingRow {
    pub const HEADER: [&'static str; 7] =
        ["Submitted By", "Client", "Office", "Head", "Subhead", "Amount", "Date"];
}

impl From<&PendingExpense> for PendingRow {
    fn from(exp: &PendingExpense) -> Self {
        let dash = || "-".to_string();
        Self {
            pending_id: exp.pending_id,
            cells: [
                exp.submitted_by_name.clone(),
                exp.client.clone(),
                exp.office.clone(),
                exp.head.clone(),
                exp.subhead.clone().unwrap_or_else(dash),
                exp.amount.map(|a| a.to_string()).unwrap_or_else(dash),
                exp.expense_date.clone().unwrap_or_else(dash),
            ],
        }
    }
}

/// Admin decision on a pending expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approve => "approve",
            Decision::Reject => "reject",
        }
    }

    /// Outcome wording for a recorded decision
    pub fn past_tense(&self) -> &'static str {
        match self {
            Decision::Approve => "approved",
            Decision::Reject => "rejected",
        }
    }

    pub fn confirm_message(&self) -> &'static str {
        match self {
            Decision::Approve => "Approve this expense?",
            Decision::Reject => "Reject this expense?",
        }
    }
}
