//! Shared test infrastructure for controller tests.
//!
//! - `MockApi` - scripted in-memory backend that records every call
//! - `RecordingView` - implements every view trait and keeps what it was told
//! - `RecordingHost` - scripted confirmations, recorded notifications

#![allow(dead_code)]

use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use expense_dash::{
    ChartDataset, ChartHandle, ChartRenderer, ChartSlice, DashError, DashResult, DashboardView,
    Decision, ExpenseApi, ExpenseRow, ExpenseStatus, FilterControl, FilterState,
    FilterVocabulary, Identity, KpiKind, KpiSet, KpiSummary, Navigator, Notifier, Page,
    PendingExpense, PendingRow, PendingView, PieDimension, Role, Section, SelectOption,
    StatusTable, TopN, UserOption,
};

// ============================================================================
// FIXTURES
// ============================================================================

pub fn identity(role: Role) -> Identity {
    Identity {
        id: Some(1),
        name: Some("Test User".to_string()),
        email: Some("test@example.com".to_string()),
        role,
    }
}

pub fn summary(total_expense: f64) -> KpiSummary {
    KpiSummary {
        total_expense,
        total_uploaded: 6,
        total_approved: 3,
        total_rejected: 1,
        total_pending: 2,
    }
}

pub fn dataset(pairs: &[(&str, f64)]) -> ChartDataset {
    ChartDataset {
        slices: pairs
            .iter()
            .map(|(label, value)| ChartSlice { label: label.to_string(), value: *value })
            .collect(),
    }
}

pub fn expense_row(date: Option<&str>, head: &str, amount: f64) -> ExpenseRow {
    ExpenseRow {
        date: date.map(str::to_string),
        head: head.to_string(),
        subhead: "General".to_string(),
        amount: Some(amount),
    }
}

pub fn pending_expense(pending_id: i64) -> PendingExpense {
    PendingExpense {
        pending_id,
        submitted_by_name: format!("Submitter {}", pending_id),
        client: "Acme".to_string(),
        office: "Pune".to_string(),
        head: "Travel".to_string(),
        subhead: Some("Taxi".to_string()),
        amount: Some(120.0),
        expense_date: Some("2024-04-02".to_string()),
    }
}

pub fn vocabulary() -> FilterVocabulary {
    FilterVocabulary {
        users: vec![
            UserOption { id: 2, label: "Asha".to_string() },
            UserOption { id: 5, label: "Ravi".to_string() },
        ],
        offices: vec!["Mumbai".to_string(), "Pune".to_string()],
        heads: vec!["Porter".to_string(), "Travel".to_string()],
        subheads: vec!["Local".to_string()],
    }
}

// ============================================================================
// MOCK API
// ============================================================================

/// Scripted backend. Scripts are consumed in call order; once a script runs
/// dry the default answer is used.
pub struct MockApi {
    pub role: Role,
    pub me_script: RefCell<VecDeque<DashResult<Identity>>>,
    pub kpi_script: RefCell<VecDeque<(u64, DashResult<KpiSummary>)>>,
    pub default_kpis: KpiSummary,
    pub expenses: HashMap<ExpenseStatus, Vec<ExpenseRow>>,
    pub vocabulary: FilterVocabulary,
    pub pies: HashMap<PieDimension, ChartDataset>,
    pub pie_script: RefCell<HashMap<PieDimension, VecDeque<(u64, DashResult<ChartDataset>)>>>,
    pub pending: RefCell<Option<DashResult<Vec<PendingExpense>>>>,
    pub decisions: RefCell<HashMap<i64, VecDeque<DashResult<()>>>>,
    pub decide_delay_ms: u64,

    pub calls: RefCell<Vec<String>>,
    pub kpi_queries: RefCell<Vec<FilterState>>,
    pub pie_queries: RefCell<Vec<(PieDimension, FilterState, Option<TopN>)>>,
    pub decide_calls: RefCell<Vec<(i64, Decision)>>,
}

impl MockApi {
    pub fn new(role: Role) -> Self {
        let mut pies = HashMap::new();
        pies.insert(PieDimension::Head, dataset(&[("Travel", 300.0), ("Porter", 100.0)]));
        pies.insert(PieDimension::Office, dataset(&[("Pune", 250.0), ("Mumbai", 150.0)]));

        Self {
            role,
            me_script: RefCell::new(VecDeque::new()),
            kpi_script: RefCell::new(VecDeque::new()),
            default_kpis: summary(400.0),
            expenses: HashMap::new(),
            vocabulary: vocabulary(),
            pies,
            pie_script: RefCell::new(HashMap::new()),
            pending: RefCell::new(None),
            decisions: RefCell::new(HashMap::new()),
            decide_delay_ms: 0,
            calls: RefCell::new(Vec::new()),
            kpi_queries: RefCell::new(Vec::new()),
            pie_queries: RefCell::new(Vec::new()),
            decide_calls: RefCell::new(Vec::new()),
        }
    }

    pub fn admin() -> Self {
        Self::new(Role::Admin)
    }

    pub fn user() -> Self {
        Self::new(Role::User)
    }

    pub fn script_me(self, responses: Vec<DashResult<Identity>>) -> Self {
        self.me_script.borrow_mut().extend(responses);
        self
    }

    /// `(delay in ms, response)` per KPI call
    pub fn script_kpis(self, responses: Vec<(u64, DashResult<KpiSummary>)>) -> Self {
        self.kpi_script.borrow_mut().extend(responses);
        self
    }

    /// `(delay in ms, response)` per pie call for one dimension
    pub fn script_pies(
        self,
        dimension: PieDimension,
        responses: Vec<(u64, DashResult<ChartDataset>)>,
    ) -> Self {
        self.pie_script
            .borrow_mut()
            .entry(dimension)
            .or_default()
            .extend(responses);
        self
    }

    pub fn with_expenses(mut self, status: ExpenseStatus, rows: Vec<ExpenseRow>) -> Self {
        self.expenses.insert(status, rows);
        self
    }

    pub fn with_pending(self, result: DashResult<Vec<PendingExpense>>) -> Self {
        *self.pending.borrow_mut() = Some(result);
        self
    }

    pub fn script_decision(self, pending_id: i64, result: DashResult<()>) -> Self {
        self.decisions
            .borrow_mut()
            .entry(pending_id)
            .or_default()
            .push_back(result);
        self
    }

    /// Every decision takes `delay_ms` to resolve
    pub fn with_decide_delay(mut self, delay_ms: u64) -> Self {
        self.decide_delay_ms = delay_ms;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }
}

#[async_trait(?Send)]
impl ExpenseApi for MockApi {
    async fn me(&self) -> DashResult<Identity> {
        self.record("me");
        let scripted = self.me_script.borrow_mut().pop_front();
        scripted.unwrap_or_else(|| Ok(identity(self.role)))
    }

    async fn kpis(&self, filters: &FilterState) -> DashResult<KpiSummary> {
        self.record("kpis");
        self.kpi_queries.borrow_mut().push(filters.clone());

        let scripted = self.kpi_script.borrow_mut().pop_front();
        match scripted {
            Some((delay_ms, result)) => {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                result
            }
            None => Ok(self.default_kpis.clone()),
        }
    }

    async fn expenses(&self, status: ExpenseStatus) -> DashResult<Vec<ExpenseRow>> {
        self.record(format!("expenses/{}", status));
        Ok(self.expenses.get(&status).cloned().unwrap_or_default())
    }

    async fn admin_filters(&self) -> DashResult<FilterVocabulary> {
        self.record("filters");
        Ok(self.vocabulary.clone())
    }

    async fn pie(
        &self,
        dimension: PieDimension,
        filters: &FilterState,
        top: Option<TopN>,
    ) -> DashResult<ChartDataset> {
        self.record(format!("pie/{}", dimension.as_str()));
        self.pie_queries
            .borrow_mut()
            .push((dimension, filters.clone(), top));

        let scripted = self
            .pie_script
            .borrow_mut()
            .get_mut(&dimension)
            .and_then(VecDeque::pop_front);
        match scripted {
            Some((delay_ms, result)) => {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                result
            }
            None => Ok(self.pies.get(&dimension).cloned().unwrap_or_default()),
        }
    }

    async fn pending_expenses(&self) -> DashResult<Vec<PendingExpense>> {
        self.record("pending");
        self.pending.borrow().clone().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn decide(&self, pending_id: i64, decision: Decision) -> DashResult<()> {
        self.record(format!("{}/{}", decision.as_str(), pending_id));
        self.decide_calls.borrow_mut().push((pending_id, decision));
        if self.decide_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.decide_delay_ms)).await;
        }

        let scripted = self
            .decisions
            .borrow_mut()
            .get_mut(&pending_id)
            .and_then(VecDeque::pop_front);
        scripted.unwrap_or(Ok(()))
    }
}

// ============================================================================
// RECORDING VIEW
// ============================================================================

struct RecordedChart {
    canvas_id: String,
    live: Rc<RefCell<HashMap<String, i32>>>,
}

impl ChartHandle for RecordedChart {
    fn destroy(self: Box<Self>) {
        *self.live.borrow_mut().entry(self.canvas_id.clone()).or_default() -= 1;
    }
}

/// Keeps everything the controllers render
#[derive(Default)]
pub struct RecordingView {
    pub filters: RefCell<FilterState>,
    pub tops: RefCell<HashMap<PieDimension, TopN>>,

    pub sections: RefCell<Vec<Section>>,
    pub kpis: RefCell<Vec<KpiSet>>,
    pub tables: RefCell<Vec<StatusTable>>,
    pub options: RefCell<Vec<(FilterControl, Vec<SelectOption>)>>,
    pub pending_click: Cell<bool>,
    pub live_charts: Rc<RefCell<HashMap<String, i32>>>,
    pub max_live_charts: Cell<i32>,
    pub drawn: RefCell<Vec<(String, ChartDataset)>>,
    pub pages: RefCell<Vec<Page>>,

    pub rows: RefCell<Vec<PendingRow>>,
    pub removed: RefCell<Vec<i64>>,
    pub empty_visible: Cell<bool>,
    pub appended: Cell<usize>,
}

impl RecordingView {
    pub fn with_filters(self, filters: FilterState) -> Self {
        *self.filters.borrow_mut() = filters;
        self
    }

    pub fn with_top(self, dimension: PieDimension, top: u32) -> Self {
        if let Some(top) = TopN::new(top) {
            self.tops.borrow_mut().insert(dimension, top);
        }
        self
    }

    /// Rendered values of one KPI card, in render order
    pub fn kpi_values(&self, kind: KpiKind) -> Vec<String> {
        self.kpis
            .borrow()
            .iter()
            .filter_map(|set| set.get(kind).map(|k| k.value.clone()))
            .collect()
    }

    pub fn live_charts(&self, canvas_id: &str) -> i32 {
        self.live_charts.borrow().get(canvas_id).copied().unwrap_or(0)
    }

    /// Datasets drawn on one canvas, in draw order
    pub fn drawn_on(&self, canvas_id: &str) -> Vec<ChartDataset> {
        self.drawn
            .borrow()
            .iter()
            .filter(|(id, _)| id == canvas_id)
            .map(|(_, data)| data.clone())
            .collect()
    }

    pub fn row_ids(&self) -> Vec<i64> {
        self.rows.borrow().iter().map(|r| r.pending_id).collect()
    }
}

impl ChartRenderer for RecordingView {
    fn draw_pie(&self, canvas_id: &str, data: &ChartDataset) -> Box<dyn ChartHandle> {
        let live = {
            let mut live = self.live_charts.borrow_mut();
            let count = live.entry(canvas_id.to_string()).or_default();
            *count += 1;
            *count
        };
        self.max_live_charts.set(self.max_live_charts.get().max(live));
        self.drawn.borrow_mut().push((canvas_id.to_string(), data.clone()));

        Box::new(RecordedChart {
            canvas_id: canvas_id.to_string(),
            live: Rc::clone(&self.live_charts),
        })
    }
}

impl Navigator for RecordingView {
    fn navigate(&self, page: Page) {
        self.pages.borrow_mut().push(page);
    }
}

impl DashboardView for RecordingView {
    fn filters(&self) -> FilterState {
        self.filters.borrow().clone()
    }

    fn top_n(&self, dimension: PieDimension) -> Option<TopN> {
        self.tops.borrow().get(&dimension).copied()
    }

    fn show_section(&self, section: Section) {
        self.sections.borrow_mut().push(section);
    }

    fn render_kpis(&self, kpis: &KpiSet) {
        self.kpis.borrow_mut().push(kpis.clone());
    }

    fn render_status_table(&self, table: &StatusTable) {
        self.tables.borrow_mut().push(table.clone());
    }

    fn render_filter_options(&self, control: FilterControl, options: &[SelectOption]) {
        self.options.borrow_mut().push((control, options.to_vec()));
    }

    fn enable_pending_click(&self) {
        self.pending_click.set(true);
    }
}

impl PendingView for RecordingView {
    fn clear_rows(&self) {
        self.rows.borrow_mut().clear();
    }

    fn append_row(&self, row: &PendingRow) {
        self.rows.borrow_mut().push(row.clone());
        self.appended.set(self.appended.get() + 1);
    }

    fn remove_row(&self, pending_id: i64) {
        self.rows.borrow_mut().retain(|r| r.pending_id != pending_id);
        self.removed.borrow_mut().push(pending_id);
    }

    fn set_empty_visible(&self, visible: bool) {
        self.empty_visible.set(visible);
    }
}

// ============================================================================
// RECORDING HOST
// ============================================================================

/// Scripted confirmations; every prompt, notification and navigation is kept
#[derive(Default)]
pub struct RecordingHost {
    pub answers: RefCell<VecDeque<bool>>,
    pub prompts: RefCell<Vec<String>>,
    pub notifications: RefCell<Vec<String>>,
    pub pages: RefCell<Vec<Page>>,
}

impl RecordingHost {
    pub fn answering(answers: &[bool]) -> Self {
        let host = Self::default();
        host.answers.borrow_mut().extend(answers.iter().copied());
        host
    }
}

impl Notifier for RecordingHost {
    fn confirm(&self, message: &str) -> bool {
        self.prompts.borrow_mut().push(message.to_string());
        self.answers.borrow_mut().pop_front().unwrap_or(true)
    }

    fn notify(&self, message: &str) {
        self.notifications.borrow_mut().push(message.to_string());
    }
}

impl Navigator for RecordingHost {
    fn navigate(&self, page: Page) {
        self.pages.borrow_mut().push(page);
    }
}

pub fn transport_error() -> DashError {
    DashError::Transport("connection refused".to_string())
}
