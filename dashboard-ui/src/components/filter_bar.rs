//! Filter Bar Component
//!
//! The seven dashboard controls. Any change stores the new value and
//! re-runs the controller's refresh group.

use std::rc::Rc;

use expense_dash::{FilterControl, SelectOption};
use leptos::*;

use crate::pages::dashboard::Dashboard;
use crate::state::{DashboardState, GlobalState};

#[component]
pub fn FilterBar() -> impl IntoView {
    view! {
        <div class="grid grid-cols-2 md:grid-cols-4 lg:grid-cols-7 gap-3">
            <FilterSelect control=FilterControl::User />
            <FilterSelect control=FilterControl::Office />
            <FilterSelect control=FilterControl::Head />
            <FilterSelect control=FilterControl::Subhead />
            <FilterInput control=FilterControl::Date kind="date" />
            <FilterInput control=FilterControl::HeadTop kind="number" />
            <FilterInput control=FilterControl::OfficeTop kind="number" />
        </div>
    }
}

/// Change handler shared by every control
fn on_change(control: FilterControl) -> impl Fn(ev::Event) + 'static {
    let state = use_context::<DashboardState>().expect("DashboardState not found");
    let global = use_context::<GlobalState>().expect("GlobalState not found");
    let dashboard = use_context::<Rc<Dashboard>>().expect("Dashboard controller not found");

    move |ev| {
        state.set_control(control, event_target_value(&ev));

        let dashboard = Rc::clone(&dashboard);
        spawn_local(async move {
            if let Err(e) = dashboard.on_filter_change(control).await {
                global.show_error(&format!("Refresh failed: {}", e));
            }
        });
    }
}

#[component]
fn FilterSelect(control: FilterControl) -> impl IntoView {
    let state = use_context::<DashboardState>().expect("DashboardState not found");

    let options = move || {
        state
            .options
            .with(|all| all.get(&control).cloned())
            .unwrap_or_else(|| {
                vec![SelectOption::new("", control.sentinel_label().unwrap_or("All"))]
            })
    };

    view! {
        <select
            id=control.element_id()
            on:change=on_change(control)
            prop:value=move || state.control_value(control)
            class="bg-gray-700 rounded-lg px-3 py-2 text-sm"
        >
            {move || {
                options()
                    .into_iter()
                    .map(|o| view! { <option value=o.value>{o.label}</option> })
                    .collect_view()
            }}
        </select>
    }
}

#[component]
fn FilterInput(control: FilterControl, kind: &'static str) -> impl IntoView {
    let state = use_context::<DashboardState>().expect("DashboardState not found");

    view! {
        <input
            id=control.element_id()
            type=kind
            min=(kind == "number").then_some("1")
            on:change=on_change(control)
            prop:value=move || state.control_value(control)
            class="bg-gray-700 rounded-lg px-3 py-2 text-sm"
        />
    }
}
