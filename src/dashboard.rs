//! Dashboard Controller
//!
//! Loads identity and KPIs, then either the admin section (filter
//! vocabularies and two pie charts) or the user section (three status
//! tables). Any filter change re-runs the refresh group: both pies and the
//! KPIs, issued concurrently.
//!
//! ## Ordering
//!
//! Refreshes are never cancelled. Under [`RefreshPolicy::LastResolved`] each
//! response is rendered when it arrives, so a slow early request can
//! overwrite a fast later one. [`RefreshPolicy::LatestRequest`] tags every
//! request with a ticket and drops responses that were superseded before
//! they resolved.

use futures_util::future::join3;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, OnceCell, RefCell};

use crate::api::{ExpenseApi, PieDimension};
use crate::chart::ChartSlot;
use crate::error::DashResult;
use crate::filters::{select_options, FilterControl};
use crate::model::{
    ChartDataset, ExpenseStatus, FilterVocabulary, KpiSet, Section, StatusTable,
};
use crate::view::{DashboardView, Page};

/// How overlapping refreshes are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// Render every response in arrival order
    #[default]
    LastResolved,
    /// Render only the response to the most recent request per target
    LatestRequest,
}

/// Hands out request tickets for one render target
#[derive(Debug, Default)]
struct Sequencer {
    issued: Cell<u64>,
}

impl Sequencer {
    fn issue(&self) -> u64 {
        let ticket = self.issued.get() + 1;
        self.issued.set(ticket);
        ticket
    }

    fn is_latest(&self, ticket: u64) -> bool {
        self.issued.get() == ticket
    }
}

/// Controller for the dashboard page
pub struct DashboardController<A, V> {
    api: A,
    view: V,
    policy: RefreshPolicy,
    section: OnceCell<Section>,
    head_chart: RefCell<ChartSlot>,
    office_chart: RefCell<ChartSlot>,
    kpi_seq: Sequencer,
    head_seq: Sequencer,
    office_seq: Sequencer,
    stale_dropped: Cell<u64>,
}

impl<A, V> DashboardController<A, V>
where
    A: ExpenseApi,
    V: DashboardView,
{
    pub fn new(api: A, view: V) -> Self {
        Self {
            api,
            view,
            policy: RefreshPolicy::default(),
            section: OnceCell::new(),
            head_chart: RefCell::new(ChartSlot::new(PieDimension::Head.canvas_id())),
            office_chart: RefCell::new(ChartSlot::new(PieDimension::Office.canvas_id())),
            kpi_seq: Sequencer::default(),
            head_seq: Sequencer::default(),
            office_seq: Sequencer::default(),
            stale_dropped: Cell::new(0),
        }
    }

    pub fn with_policy(mut self, policy: RefreshPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn policy(&self) -> RefreshPolicy {
        self.policy
    }

    /// Section chosen at the first load, if it has happened
    pub fn section(&self) -> Option<Section> {
        self.section.get().copied()
    }

    /// Whether a chart is currently bound to the dimension's canvas
    pub fn chart_bound(&self, dimension: PieDimension) -> bool {
        self.slot(dimension).borrow().is_bound()
    }

    pub fn chart_redraws(&self, dimension: PieDimension) -> u64 {
        self.slot(dimension).borrow().redraws()
    }

    /// Responses discarded because a newer request superseded them
    pub fn stale_responses(&self) -> u64 {
        self.stale_dropped.get()
    }

    /// Page-load sequence
    pub async fn load(&self) -> DashResult<Section> {
        let me = self.api.me().await?;
        tracing::debug!(role = ?me.role, "Resolved identity");

        self.load_kpis().await?;
        self.attach_pending_click().await;

        let section = *self.section.get_or_init(|| me.section());
        self.view.show_section(section);

        match section {
            Section::Admin => {
                self.load_admin_filters().await?;
                self.load_pie(PieDimension::Head).await?;
                self.load_pie(PieDimension::Office).await?;
            }
            Section::User => {
                for status in ExpenseStatus::ALL {
                    self.load_table(status).await?;
                }
            }
        }

        tracing::info!(?section, "Dashboard loaded");
        Ok(section)
    }

    /// Fetch KPIs for the current filters and replace the KPI region
    pub async fn load_kpis(&self) -> DashResult<KpiSet> {
        let filters = self.view.filters();
        let ticket = self.kpi_seq.issue();

        let summary = self.api.kpis(&filters).await?;
        let kpis = KpiSet::from(&summary);

        if self.accept(&self.kpi_seq, ticket, "kpis") {
            self.view.render_kpis(&kpis);
        }
        Ok(kpis)
    }

    /// Fetch one status table and replace it
    pub async fn load_table(&self, status: ExpenseStatus) -> DashResult<StatusTable> {
        let records = self.api.expenses(status).await?;
        let table = StatusTable::from_rows(status, &records);

        tracing::debug!(%status, rows = table.rows.len(), "Rendering status table");
        self.view.render_status_table(&table);
        Ok(table)
    }

    /// Populate the four filter selects
    pub async fn load_admin_filters(&self) -> DashResult<FilterVocabulary> {
        let vocab = self.api.admin_filters().await?;

        for (control, options) in select_options(&vocab) {
            self.view.render_filter_options(control, &options);
        }
        Ok(vocab)
    }

    /// Fetch a pie dataset and redraw its chart
    pub async fn load_pie(&self, dimension: PieDimension) -> DashResult<ChartDataset> {
        let filters = self.view.filters();
        let top = self.view.top_n(dimension);
        let seq = self.sequencer(dimension);
        let ticket = seq.issue();

        let data = self.api.pie(dimension, &filters, top).await?;

        if self.accept(seq, ticket, dimension.canvas_id()) {
            self.slot(dimension).borrow_mut().replace(&self.view, &data);
        }
        Ok(data)
    }

    /// The refresh group: both pies and the KPIs, concurrently
    pub async fn refresh(&self) -> DashResult<()> {
        let (head, office, kpis) = join3(
            self.load_pie(PieDimension::Head),
            self.load_pie(PieDimension::Office),
            self.load_kpis(),
        )
        .await;

        head?;
        office?;
        kpis?;
        Ok(())
    }

    /// Change handler for any of the seven filter controls
    pub async fn on_filter_change(&self, control: FilterControl) -> DashResult<()> {
        tracing::debug!(control = control.element_id(), "Filter changed");
        self.refresh().await
    }

    /// Re-check identity and make the Pending card clickable for admins
    ///
    /// Best effort: a failure is logged and the card stays inert.
    pub async fn attach_pending_click(&self) -> bool {
        match self.api.me().await {
            Ok(me) if me.is_admin() => {
                self.view.enable_pending_click();
                true
            }
            Ok(_) => false,
            Err(e) => {
                tracing::error!("Failed to attach pending click: {}", e);
                false
            }
        }
    }

    /// Click on the Pending card
    pub fn open_pending(&self) {
        self.view.navigate(Page::PendingApprovals);
    }

    fn slot(&self, dimension: PieDimension) -> &RefCell<ChartSlot> {
        match dimension {
            PieDimension::Head => &self.head_chart,
            PieDimension::Office => &self.office_chart,
        }
    }

    fn sequencer(&self, dimension: PieDimension) -> &Sequencer {
        match dimension {
            PieDimension::Head => &self.head_seq,
            PieDimension::Office => &self.office_seq,
        }
    }

    fn accept(&self, seq: &Sequencer, ticket: u64, target: &str) -> bool {
        match self.policy {
            RefreshPolicy::LastResolved => true,
            RefreshPolicy::LatestRequest if seq.is_latest(ticket) => true,
            RefreshPolicy::LatestRequest => {
                tracing::debug!(target_id = target, ticket, "Dropping superseded response");
                self.stale_dropped.set(self.stale_dropped.get() + 1);
                false
            }
        }
    }
}
