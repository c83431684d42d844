//! KPI Card Components
//!
//! The five summary cards. The Pending card opens the pending-approvals
//! page once the controller has enabled it.

use std::rc::Rc;

use expense_dash::Kpi;
use leptos::*;

use crate::pages::dashboard::Dashboard;
use crate::state::DashboardState;

/// KPI region, rebuilt whenever the controller renders a new set
#[component]
pub fn KpiCards() -> impl IntoView {
    let state = use_context::<DashboardState>().expect("DashboardState not found");

    view! {
        <div id="kpis" class="grid grid-cols-2 md:grid-cols-5 gap-4">
            {move || {
                state.kpis.get()
                    .cards
                    .into_iter()
                    .map(|kpi| view! { <KpiCard kpi=kpi /> })
                    .collect_view()
            }}
        </div>
    }
}

#[component]
fn KpiCard(kpi: Kpi) -> impl IntoView {
    let state = use_context::<DashboardState>().expect("DashboardState not found");
    let dashboard = use_context::<Rc<Dashboard>>().expect("Dashboard controller not found");

    let element_id = kpi.element_id();
    let clickable = move || element_id.is_some() && state.pending_clickable.get();

    let on_click = move |_| {
        if clickable() {
            dashboard.open_pending();
        }
    };

    view! {
        <div
            id=element_id
            on:click=on_click
            class=move || {
                let base = "bg-gray-800 rounded-lg p-4 border border-gray-700";
                if clickable() {
                    format!("{} cursor-pointer hover:border-primary-500", base)
                } else {
                    base.to_string()
                }
            }
        >
            <span class="text-gray-400 text-sm">{kpi.label}</span>
            <div class="text-3xl font-bold mt-2">{kpi.value}</div>
        </div>
    }
}
