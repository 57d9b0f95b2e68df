use std::sync::Arc;

use chrono::{DateTime, Utc};
use hero_core::{
    DailyGate, GateStatus, HeroError, HeroEvent, HeroEventBus, HeroEventHandler, HealthLogDraft, Leaderboard,
    LevelProgress, MysteryBox, ProgressionModel, QuizSession, RulesConfig, cosmetics,
};
use hero_types::{
    Account, AvatarState, BoxOpenLog, Friend, HealthLogEntry, Item, ItemId, RedemptionRecord, ShopReward,
    SocialAction, SocialActionKind, UserCardGrant, UserItemGrant, ValidationReason,
};
use rand::Rng;
use tokio::sync::{Mutex, RwLock, watch};

use crate::authority::RemoteAuthority;
use crate::config::ClientConfig;
use crate::gateway::ActionGateway;
use crate::in_flight::{InFlight, MutationKind};
use crate::quiz_flow::PendingReward;

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Everything the student home screen renders, as last confirmed by the
/// authority.
#[derive(Debug, Clone, PartialEq)]
pub struct HomeSnapshot {
    pub avatar: AvatarState,
    pub health_logs: Vec<HealthLogEntry>,
    pub box_logs: Vec<BoxOpenLog>,
    pub items: Vec<UserItemGrant>,
    pub rewards: Vec<ShopReward>,
    pub redemptions: Vec<RedemptionRecord>,
    pub cards: Vec<UserCardGrant>,
}

impl HomeSnapshot {
    pub fn empty(user_id: &str) -> Self {
        Self {
            avatar: AvatarState::initial(user_id),
            health_logs: Vec::new(),
            box_logs: Vec::new(),
            items: Vec::new(),
            rewards: Vec::new(),
            redemptions: Vec::new(),
            cards: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HealthLogOutcome {
    pub entry: HealthLogEntry,
    pub avatar: AvatarState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Inbox {
    pub actions: Vec<SocialAction>,
    pub unread: usize,
}

/// Orchestrates one student's flows against the authority.
pub struct StudentHome {
    pub(crate) account: Account,
    pub(crate) authority: RemoteAuthority,
    pub(crate) gate: DailyGate,
    pub(crate) rules: RulesConfig,
    pub(crate) mystery_box: MysteryBox,
    pub(crate) in_flight: InFlight,
    pub(crate) snapshot: RwLock<HomeSnapshot>,
    pub(crate) quiz: Mutex<QuizSession>,
    pub(crate) pending_reward: Mutex<Option<PendingReward>>,
    events: Mutex<HeroEventBus>,
    teardown: watch::Sender<bool>,
    clock: Clock,
}

impl StudentHome {
    pub fn new(account: Account, gateway: Arc<dyn ActionGateway>, gate: DailyGate, rules: RulesConfig) -> Self {
        let (teardown, cancel) = watch::channel(false);
        let authority = RemoteAuthority::new(gateway).with_cancellation(cancel);
        Self {
            snapshot: RwLock::new(HomeSnapshot::empty(&account.id)),
            quiz: Mutex::new(QuizSession::new(&rules)),
            pending_reward: Mutex::new(None),
            mystery_box: MysteryBox::with_default_catalog(rules.mystery_box_cost),
            in_flight: InFlight::new(),
            events: Mutex::new(HeroEventBus::new()),
            clock: Arc::new(Utc::now),
            account,
            authority,
            gate,
            rules,
            teardown,
        }
    }

    pub fn from_config(account: Account, gateway: Arc<dyn ActionGateway>, config: &ClientConfig) -> Result<Self, HeroError> {
        Ok(Self::new(account, gateway, config.daily_gate()?, config.rules.clone()))
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_mystery_box(mut self, mystery_box: MysteryBox) -> Self {
        self.mystery_box = mystery_box;
        self
    }

    pub fn add_handler(&mut self, handler: Box<dyn HeroEventHandler>) {
        self.events.get_mut().add_handler(handler);
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    pub async fn snapshot(&self) -> HomeSnapshot {
        self.snapshot.read().await.clone()
    }

    pub async fn avatar(&self) -> AvatarState {
        self.snapshot.read().await.avatar.clone()
    }

    pub async fn level_progress(&self) -> LevelProgress {
        ProgressionModel::level_progress(&self.snapshot.read().await.avatar)
    }

    /// Abandons every call still waiting on the authority.
    pub fn teardown(&self) {
        tracing::debug!(user_id = %self.account.id, "Tearing down student home");
        self.teardown.send_replace(true);
    }

    pub fn is_torn_down(&self) -> bool {
        *self.teardown.borrow()
    }

    pub(crate) async fn publish(&self, event: HeroEvent) {
        self.events.lock().await.publish(event);
    }

    /// Logs and publishes a failed flow, then hands the error back.
    pub(crate) async fn reported<T>(&self, flow: &str, result: Result<T, HeroError>) -> Result<T, HeroError> {
        if let Err(err) = &result {
            if err.is_validation() {
                tracing::debug!(flow, "Refused locally: {}", err);
            } else {
                tracing::warn!(flow, "Flow failed: {}", err);
            }
            self.publish(HeroEvent::ActionFailed {
                flow: flow.to_string(),
                kind: err.kind(),
                message: err.user_message(),
            })
            .await;
        }
        result
    }

    /// Loads every panel of the home screen in parallel.
    pub async fn refresh(&self) -> Result<HomeSnapshot, HeroError> {
        let result = self.load_snapshot().await;
        self.reported("refresh", result).await
    }

    async fn load_snapshot(&self) -> Result<HomeSnapshot, HeroError> {
        let user_id = self.account.id.as_str();
        let (avatar, health_logs, box_logs, items, rewards, redemptions, cards) = tokio::try_join!(
            self.authority.get_avatar_data(user_id),
            self.authority.get_health_logs_for(user_id),
            self.authority.get_box_logs(user_id),
            self.authority.get_user_items(user_id),
            self.authority.get_shop_rewards(),
            self.authority.get_redemptions(Some(user_id)),
            self.authority.get_user_cards(user_id),
        )?;

        let snapshot = HomeSnapshot {
            avatar: avatar.clone(),
            health_logs,
            box_logs,
            items,
            rewards,
            redemptions,
            cards,
        };
        *self.snapshot.write().await = snapshot.clone();
        self.publish(HeroEvent::AvatarRefreshed { avatar }).await;
        Ok(snapshot)
    }

    pub async fn refresh_avatar(&self) -> Result<AvatarState, HeroError> {
        let result = self.authority.get_avatar_data(&self.account.id).await;
        let avatar = self.reported("refresh avatar", result).await?;
        self.snapshot.write().await.avatar = avatar.clone();
        self.publish(HeroEvent::AvatarRefreshed { avatar: avatar.clone() }).await;
        Ok(avatar)
    }

    /// Re-reads the avatar after a confirmed mutation. If the read fails the
    /// last confirmed avatar is kept as is.
    pub(crate) async fn settle(&self) -> AvatarState {
        match self.refresh_avatar().await {
            Ok(avatar) => avatar,
            Err(_) => self.avatar().await,
        }
    }

    pub async fn health_log_status(&self) -> GateStatus {
        let fetched = self.authority.get_health_logs_for(&self.account.id).await;
        let status = self.gate.status_of(fetched.as_deref(), self.now());
        if let Ok(logs) = fetched {
            self.snapshot.write().await.health_logs = logs;
        }
        status
    }

    pub async fn mystery_box_status(&self) -> GateStatus {
        let fetched = self.authority.get_box_logs(&self.account.id).await;
        let status = self.gate.status_of(fetched.as_deref(), self.now());
        if let Ok(logs) = fetched {
            self.snapshot.write().await.box_logs = logs;
        }
        status
    }

    /// Submits today's health log once.
    pub async fn submit_health_log(&self, draft: HealthLogDraft) -> Result<HealthLogOutcome, HeroError> {
        let result = self.try_submit_health_log(draft).await;
        self.reported("health log", result).await
    }

    async fn try_submit_health_log(&self, draft: HealthLogDraft) -> Result<HealthLogOutcome, HeroError> {
        let _guard = self.in_flight.begin(MutationKind::HealthLog)?;
        draft.validate()?;

        let now = self.now();
        let logs = self.authority.get_health_logs_for(&self.account.id).await?;
        DailyGate::ensure_open(self.gate.status(&logs, now), ValidationReason::AlreadyLoggedToday)?;

        let entry = draft.into_entry(self.account.id.clone(), self.gate.today(now))?;
        self.authority.save_health_log(&entry).await?;
        tracing::info!(user_id = %self.account.id, date = %entry.date, "Health log saved");

        let previous_streak = self.avatar().await.streak_count;
        let avatar = self.settle().await;
        tracing::debug!(
            streak = avatar.streak_count,
            expected = self.gate.next_streak(&logs, previous_streak, now),
            "Streak after health log"
        );

        {
            let mut snapshot = self.snapshot.write().await;
            snapshot.health_logs = logs;
            snapshot.health_logs.push(entry.clone());
        }
        self.publish(HeroEvent::HealthLogged {
            user_id: self.account.id.clone(),
            entry: entry.clone(),
        })
        .await;

        Ok(HealthLogOutcome { entry, avatar })
    }

    /// Spends currency on today's mystery box and returns the drawn item.
    pub async fn open_mystery_box<R: Rng + Send + ?Sized>(&self, rng: &mut R) -> Result<Item, HeroError> {
        let result = self.try_open_mystery_box(rng).await;
        self.reported("mystery box", result).await
    }

    async fn try_open_mystery_box<R: Rng + Send + ?Sized>(&self, rng: &mut R) -> Result<Item, HeroError> {
        let _guard = self.in_flight.begin(MutationKind::MysteryBox)?;
        let avatar = self.avatar().await;
        self.mystery_box.ensure_affordable(&avatar)?;

        let now = self.now();
        let box_logs = self.authority.get_box_logs(&self.account.id).await?;
        DailyGate::ensure_open(self.gate.status(&box_logs, now), ValidationReason::BoxAlreadyOpenedToday)?;

        let item = self.mystery_box.draw(rng)?.clone();
        self.authority.open_mystery_box(&self.account.id, &item).await?;
        tracing::info!(user_id = %self.account.id, item = %item.name, "Mystery box opened");

        let (items, box_logs) = tokio::join!(
            self.authority.get_user_items(&self.account.id),
            self.authority.get_box_logs(&self.account.id),
        );
        {
            let mut snapshot = self.snapshot.write().await;
            match items {
                Ok(items) => snapshot.items = items,
                Err(err) => tracing::warn!("Could not reload backpack: {}", err),
            }
            if let Ok(box_logs) = box_logs {
                snapshot.box_logs = box_logs;
            }
        }
        self.settle().await;

        self.publish(HeroEvent::MysteryBoxOpened {
            user_id: self.account.id.clone(),
            item: item.clone(),
        })
        .await;
        Ok(item)
    }

    /// Redeems a shop reward and returns the redemption code.
    pub async fn redeem_reward(&self, reward_id: &str) -> Result<String, HeroError> {
        let result = self.try_redeem_reward(reward_id).await;
        self.reported("redeem reward", result).await
    }

    async fn try_redeem_reward(&self, reward_id: &str) -> Result<String, HeroError> {
        let _guard = self.in_flight.begin(MutationKind::Redemption)?;
        let (reward, avatar) = {
            let snapshot = self.snapshot.read().await;
            (
                snapshot.rewards.iter().find(|r| r.id == reward_id).cloned(),
                snapshot.avatar.clone(),
            )
        };
        let reward = reward.ok_or_else(|| {
            HeroError::validation(ValidationReason::InvalidReward {
                reason: format!("reward {reward_id} is not in the shop"),
            })
        })?;
        if !reward.in_stock() {
            return Err(HeroError::validation(ValidationReason::OutOfStock {
                reward_id: reward.id.clone(),
            }));
        }
        ProgressionModel::ensure_affordable(avatar.currency, reward.cost)?;

        let code = self.authority.redeem_reward(&self.account.id, &reward).await?;
        tracing::info!(user_id = %self.account.id, reward = %reward.title, "Reward redeemed");

        let (rewards, redemptions) = tokio::join!(
            self.authority.get_shop_rewards(),
            self.authority.get_redemptions(Some(&self.account.id)),
        );
        {
            let mut snapshot = self.snapshot.write().await;
            if let Ok(rewards) = rewards {
                snapshot.rewards = rewards;
            }
            if let Ok(redemptions) = redemptions {
                snapshot.redemptions = redemptions;
            }
        }
        self.settle().await;

        self.publish(HeroEvent::RewardRedeemed {
            user_id: self.account.id.clone(),
            reward_id: reward.id,
        })
        .await;
        Ok(code)
    }

    /// Equips an owned item, or unequips it if it is already worn. Returns
    /// the item the authority reports as equipped afterwards.
    pub async fn equip_item(&self, item_id: &str) -> Result<Option<ItemId>, HeroError> {
        let result = self.try_equip_item(item_id).await;
        self.reported("equip item", result).await
    }

    async fn try_equip_item(&self, item_id: &str) -> Result<Option<ItemId>, HeroError> {
        let _guard = self.in_flight.begin(MutationKind::Equip)?;
        let target = {
            let snapshot = self.snapshot.read().await;
            cosmetics::ensure_owned(item_id, &snapshot.items)?;
            cosmetics::equip_target(&snapshot.avatar, item_id)
        };

        self.authority
            .equip_item(&self.account.id, target.as_deref())
            .await?;
        let avatar = self.settle().await;

        self.publish(HeroEvent::ItemEquipped {
            user_id: self.account.id.clone(),
            item_id: avatar.equipped_item_id.clone(),
        })
        .await;
        Ok(avatar.equipped_item_id)
    }

    pub async fn change_base_appearance(&self, appearance: &str) -> Result<AvatarState, HeroError> {
        let result = self.try_change_base_appearance(appearance).await;
        self.reported("change appearance", result).await
    }

    async fn try_change_base_appearance(&self, appearance: &str) -> Result<AvatarState, HeroError> {
        let _guard = self.in_flight.begin(MutationKind::Appearance)?;
        cosmetics::ensure_known_appearance(appearance)?;
        self.authority
            .update_base_emoji(&self.account.id, appearance)
            .await?;
        Ok(self.settle().await)
    }

    /// Ranking for the given cohort, or across all cohorts.
    pub async fn leaderboard(&self, cohort: Option<&str>) -> Result<Leaderboard, HeroError> {
        let result = self.authority.get_leaderboard_data(cohort).await;
        let rows = self.reported("leaderboard", result).await?;
        Ok(Leaderboard::from_rows(rows, cohort.map(str::to_string)))
    }

    pub async fn class_leaderboard(&self) -> Result<Leaderboard, HeroError> {
        let cohort = (!self.account.cohort.is_empty()).then_some(self.account.cohort.as_str());
        self.leaderboard(cohort).await
    }

    pub async fn friends(&self) -> Result<Vec<Friend>, HeroError> {
        let result = self.authority.get_friends(&self.account.id).await;
        self.reported("friends", result).await
    }

    pub async fn add_friend(&self, friend_id: &str) -> Result<(), HeroError> {
        let result = self.authority.add_friend(&self.account.id, friend_id).await;
        self.reported("add friend", result).await
    }

    pub async fn remove_friend(&self, friend_id: &str) -> Result<(), HeroError> {
        let result = self.authority.remove_friend(&self.account.id, friend_id).await;
        self.reported("remove friend", result).await
    }

    pub async fn send_sticker(&self, to_user_id: &str, sticker: &str) -> Result<(), HeroError> {
        let result = self
            .authority
            .send_social_action(&self.account.id, to_user_id, SocialActionKind::Sticker, sticker)
            .await;
        self.reported("send sticker", result).await
    }

    pub async fn send_heart(&self, to_user_id: &str) -> Result<(), HeroError> {
        let result = self
            .authority
            .send_social_action(&self.account.id, to_user_id, SocialActionKind::Heart, "❤️")
            .await;
        self.reported("send heart", result).await
    }

    pub async fn inbox(&self) -> Result<Inbox, HeroError> {
        let result = self.authority.get_social_actions(&self.account.id).await;
        let actions = self.reported("inbox", result).await?;
        let unread = actions
            .iter()
            .filter(|action| action.to_user_id == self.account.id && !action.is_read)
            .count();
        Ok(Inbox { actions, unread })
    }

    pub async fn mark_inbox_read(&self) -> Result<(), HeroError> {
        let result = self.authority.mark_actions_as_read(&self.account.id).await;
        self.reported("mark inbox read", result).await
    }
}
