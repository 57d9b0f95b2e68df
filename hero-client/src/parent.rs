use std::sync::Arc;

use async_trait::async_trait;
use hero_core::{HeroError, LevelProgress, ProgressionModel};
use hero_types::{Account, AvatarState, HealthLogEntry};

use crate::authority::RemoteAuthority;

/// Number of recent logs shown in trends and sent to the coach.
pub const RECENT_LOG_WINDOW: usize = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct CoachRequest {
    pub display_name: String,
    pub avatar: AvatarState,
    pub recent_logs: Vec<HealthLogEntry>,
}

/// Text generator that turns a child's recent logs into advice for parents.
#[async_trait]
pub trait CoachingService: Send + Sync {
    async fn feedback(&self, request: &CoachRequest) -> Result<String, HeroError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChildOverview {
    pub avatar: AvatarState,
    pub progress: LevelProgress,
    /// Oldest first.
    pub recent_logs: Vec<HealthLogEntry>,
    pub total_logs: usize,
    pub coach_feedback: Option<String>,
}

pub struct ParentView {
    authority: RemoteAuthority,
    coach: Option<Arc<dyn CoachingService>>,
}

impl ParentView {
    pub fn new(authority: RemoteAuthority) -> Self {
        Self { authority, coach: None }
    }

    pub fn with_coach(mut self, coach: Arc<dyn CoachingService>) -> Self {
        self.coach = Some(coach);
        self
    }

    pub async fn overview(&self, child: &Account) -> Result<ChildOverview, HeroError> {
        let (avatar, logs) = tokio::try_join!(
            self.authority.get_avatar_data(&child.id),
            self.authority.get_health_logs_for(&child.id),
        )?;

        let total_logs = logs.len();
        let recent_logs = logs[total_logs.saturating_sub(RECENT_LOG_WINDOW)..].to_vec();

        let coach_feedback = match (&self.coach, recent_logs.is_empty()) {
            (Some(coach), false) => {
                let request = CoachRequest {
                    display_name: child.display_name.clone(),
                    avatar: avatar.clone(),
                    recent_logs: recent_logs.clone(),
                };
                match coach.feedback(&request).await {
                    Ok(feedback) => Some(feedback),
                    Err(err) => {
                        tracing::warn!(user_id = %child.id, "Coach unavailable: {}", err);
                        None
                    }
                }
            }
            _ => None,
        };

        Ok(ChildOverview {
            progress: ProgressionModel::level_progress(&avatar),
            avatar,
            recent_logs,
            total_logs,
            coach_feedback,
        })
    }
}
