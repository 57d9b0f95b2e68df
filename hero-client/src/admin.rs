use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use hero_core::{
    BmiBin, DailyGate, HeroError, ImportReport, Leaderboard, RejectedLine, parse_bulk_questions,
};
use hero_types::{
    Account, HealthLogEntry, Mood, QuizQuestion, RedemptionRecord, RedemptionStatus, ShopReward, ValidationReason,
};

use crate::authority::RemoteAuthority;

/// Data behind the administrator dashboard.
#[derive(Debug, Clone)]
pub struct AdminOverview {
    pub logs: Vec<HealthLogEntry>,
    pub leaderboard: Leaderboard,
    pub rewards: Vec<ShopReward>,
    pub redemptions: Vec<RedemptionRecord>,
    pub quiz_pool: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    pub saved: usize,
    pub rejected: Vec<RejectedLine>,
}

/// Today's logs that mention being sick.
pub fn sickness_alerts<'a>(logs: &'a [HealthLogEntry], gate: &DailyGate, now: DateTime<Utc>) -> Vec<&'a HealthLogEntry> {
    gate.records_on(logs, gate.today(now))
        .into_iter()
        .filter(|log| log.reports_sickness())
        .collect()
}

pub fn pending_redemptions(redemptions: &[RedemptionRecord]) -> usize {
    redemptions
        .iter()
        .filter(|r| r.status == RedemptionStatus::Pending)
        .count()
}

pub fn mood_tally(logs: &[HealthLogEntry]) -> HashMap<Mood, usize> {
    let mut tally = HashMap::new();
    for log in logs {
        *tally.entry(log.mood).or_insert(0) += 1;
    }
    tally
}

/// Logs without a measured BMI are left out.
pub fn bmi_tally(logs: &[HealthLogEntry]) -> BTreeMap<BmiBin, usize> {
    let mut tally = BTreeMap::new();
    for log in logs.iter().filter(|log| log.bmi > 0.0) {
        *tally.entry(BmiBin::from_bmi(log.bmi)).or_insert(0) += 1;
    }
    tally
}

fn invalid_reward(reason: &str) -> HeroError {
    HeroError::validation(ValidationReason::InvalidReward {
        reason: reason.to_string(),
    })
}

/// Administrator actions. Only admin accounts can build one.
pub struct AdminConsole {
    account: Account,
    authority: RemoteAuthority,
}

impl AdminConsole {
    pub fn new(account: Account, authority: RemoteAuthority) -> Result<Self, HeroError> {
        if !account.is_admin() {
            tracing::warn!(user_id = %account.id, "Non-admin tried to open the admin console");
            return Err(HeroError::validation(ValidationReason::AdminOnly));
        }
        Ok(Self { account, authority })
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub async fn overview(&self) -> Result<AdminOverview, HeroError> {
        let (logs, rows, rewards, redemptions, quiz_pool) = tokio::try_join!(
            self.authority.get_all_health_logs(),
            self.authority.get_leaderboard_data(None),
            self.authority.get_shop_rewards(),
            self.authority.get_redemptions(None),
            self.authority.get_quiz_pool(),
        )?;

        Ok(AdminOverview {
            logs,
            leaderboard: Leaderboard::from_rows(rows, None),
            rewards,
            redemptions,
            quiz_pool,
        })
    }

    /// Parses pasted questions and saves the accepted ones in small batches.
    pub async fn import_questions(&self, input: &str) -> Result<ImportOutcome, HeroError> {
        let report: ImportReport = parse_bulk_questions(input);
        if !report.rejected.is_empty() {
            tracing::info!(rejected = report.rejected.len(), "Some quiz lines were rejected");
        }

        let mut saved = 0;
        for chunk in report.chunks() {
            self.authority.save_bulk_quiz(chunk).await?;
            saved += chunk.len();
            tracing::debug!(saved, total = report.questions.len(), "Saved quiz batch");
        }

        Ok(ImportOutcome {
            saved,
            rejected: report.rejected,
        })
    }

    pub async fn delete_question(&self, question_id: &str) -> Result<(), HeroError> {
        self.authority.delete_quiz_question(question_id).await
    }

    /// Creates a reward, or updates it when `id` is set.
    pub async fn save_reward(&self, reward: &ShopReward) -> Result<(), HeroError> {
        if reward.title.trim().is_empty() {
            return Err(invalid_reward("title is required"));
        }
        if reward.cost == 0 {
            return Err(invalid_reward("cost must be greater than zero"));
        }
        self.authority.save_shop_reward(reward).await
    }

    pub async fn delete_reward(&self, reward_id: &str) -> Result<(), HeroError> {
        self.authority.delete_shop_reward(reward_id).await
    }

    pub async fn set_redemption_status(&self, redemption_id: &str, status: RedemptionStatus) -> Result<(), HeroError> {
        self.authority
            .update_redemption_status(redemption_id, status)
            .await
    }

    /// Grants experience and coins to every account.
    pub async fn broadcast_reward(&self, experience: i64, coins: i64) -> Result<(), HeroError> {
        let invalid = |reason: &str| {
            HeroError::validation(ValidationReason::InvalidBroadcast {
                reason: reason.to_string(),
            })
        };
        if experience < 0 || coins < 0 {
            return Err(invalid("amounts cannot be negative"));
        }
        if experience == 0 && coins == 0 {
            return Err(invalid("nothing to give"));
        }
        let experience = u32::try_from(experience).map_err(|_| invalid("experience is too large"))?;
        let coins = u32::try_from(coins).map_err(|_| invalid("coins are too large"))?;

        self.authority.broadcast_reward(experience, coins).await?;
        tracing::info!(experience, coins, "Broadcast reward sent to everyone");
        Ok(())
    }
}
