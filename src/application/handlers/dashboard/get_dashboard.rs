//! GetDashboardHandler - Overview of a user's learning activity.
//!
//! The only read path that provisions a missing local user: the identity
//! webhook may not have arrived yet when a new user first lands here.

use std::sync::Arc;

use crate::application::handlers::cycle::CycleWithSkill;
use crate::domain::foundation::{AuthenticatedUser, DomainError, ErrorCode};
use crate::domain::user::{IdentityProfile, UserProfile};
use crate::ports::{CycleFilter, CycleRepository, SkillRepository, UserRepository};

/// Number of recent cycles shown on the dashboard.
pub const RECENT_CYCLE_LIMIT: u32 = 5;

/// Dashboard data for one user.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub user: UserProfile,
    pub recent_cycles: Vec<CycleWithSkill>,
    pub skill_count: u64,
    pub cycle_count: u64,
}

pub struct GetDashboardHandler {
    users: Arc<dyn UserRepository>,
    skills: Arc<dyn SkillRepository>,
    cycles: Arc<dyn CycleRepository>,
}

impl GetDashboardHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        skills: Arc<dyn SkillRepository>,
        cycles: Arc<dyn CycleRepository>,
    ) -> Self {
        Self {
            users,
            skills,
            cycles,
        }
    }

    pub async fn handle(&self, caller: &AuthenticatedUser) -> Result<DashboardView, DomainError> {
        let user = self.get_or_create(caller).await?;
        let owner = user.id().clone();

        let recent = self
            .cycles
            .list_by_owner(&owner, CycleFilter::default().with_limit(RECENT_CYCLE_LIMIT))
            .await?;
        let recent_cycles = CycleWithSkill::load_all(self.skills.as_ref(), &owner, recent).await?;

        Ok(DashboardView {
            skill_count: self.skills.count_by_owner(&owner).await?,
            cycle_count: self.cycles.count_by_owner(&owner).await?,
            recent_cycles,
            user,
        })
    }

    async fn get_or_create(&self, caller: &AuthenticatedUser) -> Result<UserProfile, DomainError> {
        if let Some(user) = self.users.find_by_id(&caller.id).await? {
            return Ok(user);
        }

        let profile = UserProfile::from_identity(IdentityProfile {
            id: caller.id.clone(),
            email: caller.email.clone().unwrap_or_default(),
            name: caller.display_name.clone(),
            image_url: None,
        });

        // A concurrent webhook may win the insert; either way, read back the stored row.
        if self.users.insert_if_absent(&profile).await? {
            tracing::info!(user_id = %caller.id, "Provisioned local user from dashboard visit");
        }

        self.users.find_by_id(&caller.id).await?.ok_or_else(|| {
            DomainError::new(
                ErrorCode::UserNotFound,
                format!("User disappeared during provisioning: {}", caller.id),
            )
        })
    }
}
