//! HTTP DTOs for the dashboard endpoint.

use serde::Serialize;

use crate::adapters::http::cycle::CycleResponse;
use crate::application::handlers::DashboardView;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardUser {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub image_url: Option<String>,
}

/// Overview shown on the dashboard page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub user: DashboardUser,
    pub recent_cycles: Vec<CycleResponse>,
    pub skill_count: u64,
    pub cycle_count: u64,
}

impl From<&DashboardView> for DashboardResponse {
    fn from(view: &DashboardView) -> Self {
        Self {
            user: DashboardUser {
                id: view.user.id().to_string(),
                email: view.user.email().to_string(),
                name: view.user.name().map(str::to_string),
                image_url: view.user.image_url().map(str::to_string),
            },
            recent_cycles: view.recent_cycles.iter().map(CycleResponse::from).collect(),
            skill_count: view.skill_count,
            cycle_count: view.cycle_count,
        }
    }
}
