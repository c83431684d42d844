//! State Management
//!
//! Signal-backed views the controllers render into, plus the browser host.

pub mod dashboard;
pub mod global;
pub mod pending;

pub use dashboard::DashboardState;
pub use global::{provide_global_state, BrowserHost, GlobalState};
pub use pending::PendingState;
