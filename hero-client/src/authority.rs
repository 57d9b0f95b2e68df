use std::sync::Arc;

use hero_core::HeroError;
use hero_types::{
    Account, AccountId, Action, AvatarState, BoxOpenLog, Card, Friend, HealthLogEntry, Item,
    LeaderboardRow, QuizQuestion, Registration, RedemptionRecord, RedemptionStatus, ShopReward,
    SocialAction, SocialActionKind, UserCardGrant, UserItemGrant,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tokio::sync::watch;

use crate::gateway::{self, ActionGateway};

/// Typed access to every action the authority understands.
#[derive(Clone)]
pub struct RemoteAuthority {
    gateway: Arc<dyn ActionGateway>,
    cancel: Option<watch::Receiver<bool>>,
}

fn decode<T: DeserializeOwned>(action: Action, what: &str, value: Value) -> Result<T, HeroError> {
    serde_json::from_value(value).map_err(|e| HeroError::Protocol {
        action,
        message: format!("could not read {what}: {e}"),
    })
}

fn take_field<T: DeserializeOwned>(action: Action, body: &mut Value, key: &str) -> Result<T, HeroError> {
    match body.get_mut(key).map(Value::take) {
        Some(Value::Null) | None => Err(HeroError::Protocol {
            action,
            message: format!("response has no '{key}'"),
        }),
        Some(value) => decode(action, key, value),
    }
}

/// A missing or null list field reads as empty.
fn take_list<T: DeserializeOwned>(action: Action, body: &mut Value, key: &str) -> Result<Vec<T>, HeroError> {
    match body.get_mut(key).map(Value::take) {
        Some(Value::Null) | None => Ok(Vec::new()),
        Some(value) => decode(action, key, value),
    }
}

fn without_id(value: Value) -> Value {
    match value {
        Value::Object(mut fields) => {
            if fields.get("id").and_then(Value::as_str).is_some_and(str::is_empty) {
                fields.remove("id");
            }
            Value::Object(fields)
        }
        other => other,
    }
}

impl RemoteAuthority {
    pub fn new(gateway: Arc<dyn ActionGateway>) -> Self {
        Self { gateway, cancel: None }
    }

    /// Every call made through the returned authority is abandoned once the
    /// watched flag turns true.
    pub fn with_cancellation(&self, cancel: watch::Receiver<bool>) -> Self {
        Self {
            gateway: self.gateway.clone(),
            cancel: Some(cancel),
        }
    }

    pub fn gateway(&self) -> &Arc<dyn ActionGateway> {
        &self.gateway
    }

    async fn call(&self, action: Action, payload: Value) -> Result<Value, HeroError> {
        match &self.cancel {
            Some(cancel) => {
                let mut cancel = cancel.clone();
                gateway::call_cancellable(self.gateway.as_ref(), action, payload, &mut cancel).await
            }
            None => self.gateway.call(action, payload).await,
        }
    }

    pub async fn ping(&self) -> bool {
        gateway::ping(self.gateway.as_ref()).await
    }

    pub async fn login_user(&self, username: &str, password: &str) -> Result<Account, HeroError> {
        let action = Action::LoginUser;
        let mut body = self
            .call(action, json!({ "username": username, "password": password }))
            .await?;
        take_field(action, &mut body, "user")
    }

    pub async fn register_user(&self, registration: &Registration) -> Result<AccountId, HeroError> {
        let action = Action::RegisterUser;
        let payload = serde_json::to_value(registration).map_err(|e| HeroError::Protocol {
            action,
            message: e.to_string(),
        })?;
        let mut body = self.call(action, payload).await?;
        let id: Value = take_field(action, &mut body, "userId")?;
        Ok(match id {
            Value::String(id) => id,
            other => other.to_string(),
        })
    }

    /// Avatar fields arrive flat on the response body.
    pub async fn get_avatar_data(&self, user_id: &str) -> Result<AvatarState, HeroError> {
        let action = Action::GetAvatarData;
        let mut body = self.call(action, json!({ "userId": user_id })).await?;
        if let Value::Object(fields) = &mut body {
            fields.remove("success");
        }
        let mut avatar: AvatarState = decode(action, "avatar", body)?;
        if avatar.user_id.is_empty() {
            avatar.user_id = user_id.to_string();
        }
        if avatar.level == 0 {
            tracing::warn!(user_id, "Authority sent level 0, showing level 1");
            avatar.level = 1;
        }
        Ok(avatar)
    }

    /// The quiz coin bonus is display only and never sent.
    pub async fn update_avatar_stats(&self, user_id: &str, experience_gain: u32) -> Result<(), HeroError> {
        self.call(
            Action::UpdateAvatarStats,
            json!({ "userId": user_id, "expGain": experience_gain }),
        )
        .await?;
        Ok(())
    }

    pub async fn save_health_log(&self, entry: &HealthLogEntry) -> Result<(), HeroError> {
        let action = Action::SaveHealthLog;
        let payload = serde_json::to_value(entry).map_err(|e| HeroError::Protocol {
            action,
            message: e.to_string(),
        })?;
        self.call(action, without_id(payload)).await?;
        Ok(())
    }

    /// Logs of every account.
    pub async fn get_all_health_logs(&self) -> Result<Vec<HealthLogEntry>, HeroError> {
        let action = Action::GetAllHealthLogs;
        let mut body = self.call(action, json!({})).await?;
        take_list(action, &mut body, "data")
    }

    pub async fn get_health_logs_for(&self, user_id: &str) -> Result<Vec<HealthLogEntry>, HeroError> {
        let mut logs = self.get_all_health_logs().await?;
        logs.retain(|log| log.user_id == user_id);
        Ok(logs)
    }

    pub async fn get_box_logs(&self, user_id: &str) -> Result<Vec<BoxOpenLog>, HeroError> {
        let action = Action::GetBoxLogs;
        let mut body = self.call(action, json!({ "userId": user_id })).await?;
        take_list(action, &mut body, "logs")
    }

    pub async fn open_mystery_box(&self, user_id: &str, item: &Item) -> Result<(), HeroError> {
        self.call(
            Action::OpenMysteryBox,
            json!({ "userId": user_id, "itemId": item.id, "itemName": item.name }),
        )
        .await?;
        Ok(())
    }

    pub async fn get_quiz_pool(&self) -> Result<Vec<QuizQuestion>, HeroError> {
        let action = Action::GetQuizPool;
        let mut body = self.call(action, json!({})).await?;
        take_list(action, &mut body, "data")
    }

    pub async fn save_bulk_quiz(&self, questions: &[QuizQuestion]) -> Result<(), HeroError> {
        let questions: Vec<Value> = questions
            .iter()
            .map(|question| serde_json::to_value(question).map(without_id))
            .collect::<Result<_, _>>()
            .map_err(|e| HeroError::Protocol {
                action: Action::SaveBulkQuiz,
                message: e.to_string(),
            })?;
        self.call(Action::SaveBulkQuiz, json!({ "questions": questions }))
            .await?;
        Ok(())
    }

    pub async fn delete_quiz_question(&self, id: &str) -> Result<(), HeroError> {
        self.call(Action::DeleteQuizQuestion, json!({ "id": id })).await?;
        Ok(())
    }

    pub async fn award_random_card(&self, user_id: &str) -> Result<Card, HeroError> {
        let action = Action::AwardRandomCard;
        let mut body = self.call(action, json!({ "userId": user_id })).await?;
        take_field(action, &mut body, "card")
    }

    pub async fn get_cards(&self) -> Result<Vec<Card>, HeroError> {
        let action = Action::GetCards;
        let mut body = self.call(action, json!({})).await?;
        take_list(action, &mut body, "cards")
    }

    pub async fn get_user_cards(&self, user_id: &str) -> Result<Vec<UserCardGrant>, HeroError> {
        let action = Action::GetUserCards;
        let mut body = self.call(action, json!({ "userId": user_id })).await?;
        take_list(action, &mut body, "cards")
    }

    pub async fn get_user_items(&self, user_id: &str) -> Result<Vec<UserItemGrant>, HeroError> {
        let action = Action::GetUserItems;
        let mut body = self.call(action, json!({ "userId": user_id })).await?;
        take_list(action, &mut body, "items")
    }

    pub async fn get_shop_rewards(&self) -> Result<Vec<ShopReward>, HeroError> {
        let action = Action::GetShopRewards;
        let mut body = self.call(action, json!({})).await?;
        take_list(action, &mut body, "rewards")
    }

    pub async fn save_shop_reward(&self, reward: &ShopReward) -> Result<(), HeroError> {
        let action = Action::SaveShopReward;
        let reward = serde_json::to_value(reward).map_err(|e| HeroError::Protocol {
            action,
            message: e.to_string(),
        })?;
        self.call(action, json!({ "reward": without_id(reward) })).await?;
        Ok(())
    }

    pub async fn delete_shop_reward(&self, id: &str) -> Result<(), HeroError> {
        self.call(Action::DeleteShopReward, json!({ "id": id })).await?;
        Ok(())
    }

    /// Returns the redemption code to show the student.
    pub async fn redeem_reward(&self, user_id: &str, reward: &ShopReward) -> Result<String, HeroError> {
        let action = Action::RedeemReward;
        let mut body = self
            .call(
                action,
                json!({ "userId": user_id, "rewardId": reward.id, "cost": reward.cost }),
            )
            .await?;
        let code: Value = take_field(action, &mut body, "code")?;
        Ok(match code {
            Value::String(code) => code,
            other => other.to_string(),
        })
    }

    /// All redemptions, or one account's when `user_id` is given.
    pub async fn get_redemptions(&self, user_id: Option<&str>) -> Result<Vec<RedemptionRecord>, HeroError> {
        let action = Action::GetRedemptions;
        let mut payload = Map::new();
        if let Some(user_id) = user_id {
            payload.insert("userId".to_string(), Value::from(user_id));
        }
        let mut body = self.call(action, Value::Object(payload)).await?;
        take_list(action, &mut body, "redemptions")
    }

    pub async fn update_redemption_status(&self, id: &str, status: RedemptionStatus) -> Result<(), HeroError> {
        self.call(
            Action::UpdateRedemptionStatus,
            json!({ "id": id, "status": status.as_str() }),
        )
        .await?;
        Ok(())
    }

    /// Rows arrive already ranked and filtered to the cohort.
    pub async fn get_leaderboard_data(&self, cohort: Option<&str>) -> Result<Vec<LeaderboardRow>, HeroError> {
        let action = Action::GetLeaderboardData;
        let mut payload = Map::new();
        if let Some(cohort) = cohort {
            payload.insert("className".to_string(), Value::from(cohort));
        }
        let mut body = self.call(action, Value::Object(payload)).await?;
        take_list(action, &mut body, "data")
    }

    /// An empty item id unequips.
    pub async fn equip_item(&self, user_id: &str, item_id: Option<&str>) -> Result<(), HeroError> {
        self.call(
            Action::EquipItem,
            json!({ "userId": user_id, "itemId": item_id.unwrap_or_default() }),
        )
        .await?;
        Ok(())
    }

    pub async fn update_base_emoji(&self, user_id: &str, emoji: &str) -> Result<(), HeroError> {
        self.call(Action::UpdateBaseEmoji, json!({ "userId": user_id, "emoji": emoji }))
            .await?;
        Ok(())
    }

    pub async fn broadcast_reward(&self, experience: u32, coins: u32) -> Result<(), HeroError> {
        self.call(Action::BroadcastReward, json!({ "exp": experience, "coins": coins }))
            .await?;
        Ok(())
    }

    pub async fn get_friends(&self, user_id: &str) -> Result<Vec<Friend>, HeroError> {
        let action = Action::GetFriends;
        let mut body = self.call(action, json!({ "userId": user_id })).await?;
        take_list(action, &mut body, "friends")
    }

    pub async fn add_friend(&self, user_id: &str, friend_id: &str) -> Result<(), HeroError> {
        self.call(Action::AddFriend, json!({ "userId": user_id, "friendId": friend_id }))
            .await?;
        Ok(())
    }

    pub async fn remove_friend(&self, user_id: &str, friend_id: &str) -> Result<(), HeroError> {
        self.call(Action::RemoveFriend, json!({ "userId": user_id, "friendId": friend_id }))
            .await?;
        Ok(())
    }

    pub async fn send_social_action(
        &self,
        from_user_id: &str,
        to_user_id: &str,
        kind: SocialActionKind,
        content: &str,
    ) -> Result<(), HeroError> {
        self.call(
            Action::SendSocialAction,
            json!({
                "from_user_id": from_user_id,
                "to_user_id": to_user_id,
                "action_type": kind,
                "content": content,
            }),
        )
        .await?;
        Ok(())
    }

    pub async fn get_social_actions(&self, user_id: &str) -> Result<Vec<SocialAction>, HeroError> {
        let action = Action::GetSocialActions;
        let mut body = self.call(action, json!({ "userId": user_id })).await?;
        take_list(action, &mut body, "actions")
    }

    pub async fn mark_actions_as_read(&self, user_id: &str) -> Result<(), HeroError> {
        self.call(Action::MarkActionsAsRead, json!({ "userId": user_id }))
            .await?;
        Ok(())
    }
}
