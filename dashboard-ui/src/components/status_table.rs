//! Status Table Component

use expense_dash::ExpenseStatus;
use leptos::*;

use crate::state::DashboardState;

/// One of the three per-status expense tables with its empty placeholder
#[component]
pub fn StatusTableView(status: ExpenseStatus) -> impl IntoView {
    let state = use_context::<DashboardState>().expect("DashboardState not found");
    let table = move || state.tables.with(|t| t.get(&status).cloned());

    view! {
        <section class="bg-gray-800 rounded-xl p-6">
            <h2 class="text-xl font-semibold mb-4 capitalize">{status.as_str()}</h2>

            <table id=status.table_id() class="w-full text-sm">
                {move || table().and_then(|t| t.header).map(|header| view! {
                    <thead>
                        <tr class="text-left text-gray-400">
                            {header.into_iter().map(|h| view! { <th class="py-2">{h}</th> }).collect_view()}
                        </tr>
                    </thead>
                })}
                <tbody>
                    {move || {
                        table()
                            .map(|t| t.rows)
                            .unwrap_or_default()
                            .into_iter()
                            .map(|cells| view! {
                                <tr class="border-t border-gray-700">
                                    {cells.into_iter().map(|c| view! { <td class="py-2">{c}</td> }).collect_view()}
                                </tr>
                            })
                            .collect_view()
                    }}
                </tbody>
            </table>

            <p
                id=status.empty_id()
                class="text-gray-400 text-sm"
                style:display=move || {
                    if table().map(|t| t.empty_visible).unwrap_or(false) { "block" } else { "none" }
                }
            >
                "No expenses"
            </p>
        </section>
    }
}
