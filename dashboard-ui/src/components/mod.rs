//! UI Components
//!
//! Reusable Leptos components for the dashboard and pending pages.

pub mod filter_bar;
pub mod kpi_card;
pub mod nav;
pub mod pie_chart;
pub mod status_table;
pub mod toast;

pub use filter_bar::FilterBar;
pub use kpi_card::KpiCards;
pub use nav::Nav;
pub use pie_chart::PieChart;
pub use status_table::StatusTableView;
pub use toast::Toast;
