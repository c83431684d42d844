//! Expense Dash frontend
//!
//! Browser UI for the expense-approval dashboard, built with Leptos (WASM).
//!
//! # Features
//!
//! - KPI cards with click-through to pending approvals
//! - Admin filters and head/office pie charts
//! - Per-status expense tables for regular users
//! - Approve/reject of pending expenses
//!
//! # Architecture
//!
//! Page logic lives in the `expense-dash` controllers. This crate supplies
//! the gloo-net fetch layer and the signal-backed views they render into.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
