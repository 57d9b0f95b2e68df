use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::account::AccountId;
use crate::lenient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum SocialActionKind {
    Sticker,
    Heart,
}

/// Sticker or heart sent from one account to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SocialAction {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub from_user_id: AccountId,
    #[serde(deserialize_with = "lenient::string")]
    pub to_user_id: AccountId,
    pub action_type: SocialActionKind,
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Friend {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub user_id: AccountId,
    #[serde(deserialize_with = "lenient::string")]
    pub friend_id: AccountId,
    #[serde(default)]
    pub created_at: String,
}
