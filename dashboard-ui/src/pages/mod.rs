//! Pages
//!
//! Top-level page components for each route.

pub mod dashboard;
pub mod pending;

pub use dashboard::DashboardPage;
pub use pending::PendingPage;
