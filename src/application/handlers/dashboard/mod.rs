//! Dashboard query handler.

mod get_dashboard;

pub use get_dashboard::{DashboardView, GetDashboardHandler, RECENT_CYCLE_LIMIT};
