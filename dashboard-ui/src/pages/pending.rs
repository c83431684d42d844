//! Pending Approvals Page
//!
//! Admin-only list of expenses awaiting a decision. Non-admins are alerted
//! and sent back to the dashboard by the controller.

use std::rc::Rc;

use expense_dash::{Decision, PendingApprovalsController, PendingRow, RowState};
use leptos::*;

use crate::api::HttpApi;
use crate::state::{BrowserHost, GlobalState, PendingState};

pub type PendingApprovals = PendingApprovalsController<HttpApi, PendingState, BrowserHost>;

#[component]
pub fn PendingPage() -> impl IntoView {
    let global = use_context::<GlobalState>().expect("GlobalState not found");

    let state = PendingState::new();
    let pending: Rc<PendingApprovals> =
        Rc::new(PendingApprovalsController::new(HttpApi::default(), state, BrowserHost));

    let loader = Rc::clone(&pending);
    create_effect(move |_| {
        let pending = Rc::clone(&loader);
        spawn_local(async move {
            global.loading.set(true);
            let outcome = pending.load().await;
            web_sys::console::log_1(&format!("Pending list: {:?}", outcome).into());
            global.mark_refreshed();
        });
    });

    let on_decide = Callback::new(move |(pending_id, decision): (i64, Decision)| {
        let pending = Rc::clone(&pending);
        spawn_local(async move {
            match pending.decide(pending_id, decision).await {
                Ok(RowState::Removed) => {
                    global.show_success(&format!("Expense {}", decision.past_tense()));
                }
                Ok(_) => {}
                Err(e) => global.show_error(&e.to_string()),
            }
        });
    });

    view! {
        <div class="space-y-8">
            <div>
                <h1 class="text-3xl font-bold">"Pending Approvals"</h1>
                <p class="text-gray-400 mt-1">"Expenses waiting for an admin decision"</p>
            </div>

            <section class="bg-gray-800 rounded-xl p-6">
                <table id="pending-table" class="w-full text-sm">
                    <thead>
                        <tr class="text-left text-gray-400">
                            {PendingRow::HEADER.into_iter().map(|h| view! { <th class="py-2">{h}</th> }).collect_view()}
                            <th class="py-2">"Action"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            state.rows.get()
                                .into_iter()
                                .map(|row| view! { <PendingRowView row=row on_decide=on_decide /> })
                                .collect_view()
                        }}
                    </tbody>
                </table>

                <p
                    id="pending-empty"
                    class="text-gray-400 text-sm"
                    style:display=move || if state.empty_visible.get() { "block" } else { "none" }
                >
                    "No pending expenses"
                </p>
            </section>
        </div>
    }
}

#[component]
fn PendingRowView(row: PendingRow, on_decide: Callback<(i64, Decision)>) -> impl IntoView {
    let id = row.pending_id;

    view! {
        <tr class="border-t border-gray-700">
            {row.cells.into_iter().map(|c| view! { <td class="py-2">{c}</td> }).collect_view()}
            <td class="py-2 space-x-2">
                <button
                    on:click=move |_| on_decide.call((id, Decision::Approve))
                    class="px-3 py-1 bg-green-600 hover:bg-green-700 rounded"
                >
                    "Approve"
                </button>
                <button
                    on:click=move |_| on_decide.call((id, Decision::Reject))
                    class="px-3 py-1 bg-red-600 hover:bg-red-700 rounded"
                >
                    "Reject"
                </button>
            </td>
        </tr>
    }
}
