//! Dashboard Page
//!
//! KPI cards on top, then either the admin section (filters and pie charts)
//! or the user section (status tables). Both sections stay mounted so the
//! chart canvases exist before the first draw.

use std::rc::Rc;

use expense_dash::{DashboardController, ExpenseStatus, PieDimension, Section};
use leptos::*;

use crate::api::HttpApi;
use crate::components::{FilterBar, KpiCards, PieChart, StatusTableView};
use crate::state::{DashboardState, GlobalState};

pub type Dashboard = DashboardController<HttpApi, DashboardState>;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let global = use_context::<GlobalState>().expect("GlobalState not found");

    let state = DashboardState::new();
    let dashboard = Rc::new(DashboardController::new(HttpApi::default(), state));
    provide_context(state);
    provide_context(Rc::clone(&dashboard));

    // Page load, once on mount
    create_effect(move |_| {
        let dashboard = Rc::clone(&dashboard);
        spawn_local(async move {
            global.loading.set(true);
            if let Err(e) = dashboard.load().await {
                global.show_error(&format!("Failed to load dashboard: {}", e));
            }
            global.mark_refreshed();
        });
    });

    let display = move |section: Section| {
        if state.section.get() == Some(section) {
            "block"
        } else {
            "none"
        }
    };

    view! {
        <div class="space-y-8">
            <div>
                <h1 class="text-3xl font-bold">"Dashboard"</h1>
                <p class="text-gray-400 mt-1">"Expense overview"</p>
            </div>

            <KpiCards />

            <div id=Section::Admin.element_id() class="space-y-8" style:display=move || display(Section::Admin)>
                <FilterBar />
                <div class="grid md:grid-cols-2 gap-8">
                    <PieChart dimension=PieDimension::Head title="By Head" />
                    <PieChart dimension=PieDimension::Office title="By Office" />
                </div>
            </div>

            <div id=Section::User.element_id() class="space-y-8" style:display=move || display(Section::User)>
                {ExpenseStatus::ALL
                    .into_iter()
                    .map(|status| view! { <StatusTableView status=status /> })
                    .collect_view()}
            </div>
        </div>
    }
}
