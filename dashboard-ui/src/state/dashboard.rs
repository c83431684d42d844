//! Dashboard page state
//!
//! Every region of the dashboard is a signal; the controller writes view
//! models into them and the components re-render.

use std::collections::HashMap;

use expense_dash::{
    ChartDataset, ChartHandle, ChartRenderer, DashboardView, ExpenseStatus, FilterControl,
    FilterState, KpiSet, Navigator, Page, PieDimension, Section, SelectOption, StatusTable, TopN,
};
use leptos::*;

use crate::components::pie_chart::draw_on_canvas;
use crate::state::global::go_to;

#[derive(Clone, Copy)]
pub struct DashboardState {
    pub filters: RwSignal<FilterState>,
    pub head_top: RwSignal<String>,
    pub office_top: RwSignal<String>,
    pub section: RwSignal<Option<Section>>,
    pub kpis: RwSignal<KpiSet>,
    pub tables: RwSignal<HashMap<ExpenseStatus, StatusTable>>,
    pub options: RwSignal<HashMap<FilterControl, Vec<SelectOption>>>,
    pub pending_clickable: RwSignal<bool>,
}

impl DashboardState {
    pub fn new() -> Self {
        let default_top = TopN::default().to_string();
        Self {
            filters: create_rw_signal(FilterState::default()),
            head_top: create_rw_signal(default_top.clone()),
            office_top: create_rw_signal(default_top),
            section: create_rw_signal(None),
            kpis: create_rw_signal(KpiSet::default()),
            tables: create_rw_signal(HashMap::new()),
            options: create_rw_signal(HashMap::new()),
            pending_clickable: create_rw_signal(false),
        }
    }

    /// The raw input behind a top-N control
    pub fn top_signal(&self, dimension: PieDimension) -> RwSignal<String> {
        match dimension {
            PieDimension::Head => self.head_top,
            PieDimension::Office => self.office_top,
        }
    }

    /// Store a control value as typed by the user
    pub fn set_control(&self, control: FilterControl, value: String) {
        match control {
            FilterControl::HeadTop => self.head_top.set(value),
            FilterControl::OfficeTop => self.office_top.set(value),
            shared => self.filters.update(|f| f.set(shared, value)),
        }
    }

    /// Current value of any of the seven controls
    pub fn control_value(&self, control: FilterControl) -> String {
        match control {
            FilterControl::HeadTop => self.head_top.get(),
            FilterControl::OfficeTop => self.office_top.get(),
            shared => self.filters.with(|f| f.get(shared).to_string()),
        }
    }
}

impl ChartRenderer for DashboardState {
    fn draw_pie(&self, canvas_id: &str, data: &ChartDataset) -> Box<dyn ChartHandle> {
        draw_on_canvas(canvas_id, data)
    }
}

impl Navigator for DashboardState {
    fn navigate(&self, page: Page) {
        go_to(page);
    }
}

impl DashboardView for DashboardState {
    fn filters(&self) -> FilterState {
        self.filters.get_untracked()
    }

    fn top_n(&self, dimension: PieDimension) -> Option<TopN> {
        self.top_signal(dimension)
            .with_untracked(|raw| TopN::from_control(raw))
    }

    fn show_section(&self, section: Section) {
        self.section.set(Some(section));
    }

    fn render_kpis(&self, kpis: &KpiSet) {
        self.kpis.set(kpis.clone());
    }

    fn render_status_table(&self, table: &StatusTable) {
        self.tables.update(|tables| {
            tables.insert(table.status, table.clone());
        });
    }

    fn render_filter_options(&self, control: FilterControl, options: &[SelectOption]) {
        self.options.update(|all| {
            all.insert(control, options.to_vec());
        });
    }

    fn enable_pending_click(&self) {
        self.pending_clickable.set(true);
    }
}
