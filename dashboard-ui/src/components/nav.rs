//! Navigation Component
//!
//! Header bar with page links and logout.

use expense_dash::{logout, Page};
use leptos::*;

use crate::state::{BrowserHost, GlobalState};

/// Navigation header component
#[component]
pub fn Nav() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let on_logout = move |_| {
        if let Err(e) = logout(&BrowserHost, &BrowserHost) {
            state.show_error(&format!("Logout failed: {}", e));
        }
    };

    view! {
        <nav class="bg-gray-800 border-b border-gray-700">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    <a href=Page::Dashboard.path() class="text-xl font-bold text-white">
                        "Expense Dashboard"
                    </a>

                    <div class="flex items-center space-x-1">
                        <NavLink page=Page::Dashboard label="Dashboard" />
                        <NavLink page=Page::PendingApprovals label="Pending" />
                        <button
                            on:click=on_logout
                            class="px-4 py-2 rounded-lg text-gray-300 hover:text-white hover:bg-gray-700 transition-colors"
                        >
                            "Logout"
                        </button>
                    </div>
                </div>
            </div>
        </nav>
    }
}

#[component]
fn NavLink(page: Page, label: &'static str) -> impl IntoView {
    view! {
        <a
            href=page.path()
            class="px-4 py-2 rounded-lg text-gray-300 hover:text-white hover:bg-gray-700 transition-colors"
        >
            {label}
        </a>
    }
}
