use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::lenient;

pub type AccountId = String;
pub type ItemId = String;

/// Emoji shown when an avatar has never picked a base appearance.
pub const DEFAULT_BASE_APPEARANCE: &str = "🧑‍🚀";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    #[default]
    Student,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Account {
    #[serde(deserialize_with = "lenient::string")]
    pub id: AccountId,
    pub username: String,
    #[serde(rename = "fullname")]
    pub display_name: String,
    #[serde(default)]
    pub role: Role,
    /// Class / cohort the account is ranked within.
    #[serde(rename = "class", default, deserialize_with = "lenient::string")]
    pub cohort: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub room: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub number: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub created_at: String, // ISO 8601 string
}

impl Account {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Fields submitted with `registerUser`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Registration {
    pub username: String,
    pub password: String,
    #[serde(rename = "fullname")]
    pub display_name: String,
    #[serde(rename = "class")]
    pub cohort: String,
    pub room: String,
    pub number: String,
    pub gender: String,
}

/// Progression record owned by an account. The authority is the source of
/// truth for every field; clients replace their copy wholesale after each
/// mutating call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AvatarState {
    #[serde(default, deserialize_with = "lenient::string")]
    pub user_id: AccountId,
    #[serde(default)]
    pub avatar_name: String,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub level: u32,
    #[serde(rename = "exp", default, deserialize_with = "lenient::integer")]
    pub experience: u32,
    #[serde(rename = "coin", default, deserialize_with = "lenient::integer")]
    pub currency: u32,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub equipped_item_id: Option<ItemId>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub streak_count: u32,
    #[serde(rename = "base_emoji", default = "default_base_appearance")]
    pub base_appearance: String,
}

fn default_base_appearance() -> String {
    DEFAULT_BASE_APPEARANCE.to_string()
}

impl AvatarState {
    /// State of a freshly registered account.
    pub fn initial(user_id: impl Into<AccountId>) -> Self {
        Self {
            user_id: user_id.into(),
            avatar_name: String::new(),
            level: 1,
            experience: 0,
            currency: 0,
            equipped_item_id: None,
            streak_count: 0,
            base_appearance: default_base_appearance(),
        }
    }
}

/// One row of `getLeaderboardData`, already ranked by the authority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LeaderboardRow {
    #[serde(deserialize_with = "lenient::string")]
    pub user_id: AccountId,
    #[serde(rename = "fullname", default)]
    pub display_name: String,
    #[serde(rename = "class", default, deserialize_with = "lenient::string")]
    pub cohort: String,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub level: u32,
    #[serde(rename = "exp", default, deserialize_with = "lenient::integer")]
    pub experience: u32,
    #[serde(rename = "base_emoji", default = "default_base_appearance")]
    pub base_appearance: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avatar_from_sheet_row() {
        let json = r#"{
            "success": true,
            "avatar_name": "Nok",
            "level": "2",
            "exp": 40,
            "coin": "35",
            "equipped_item_id": "",
            "streak_count": ""
        }"#;
        let avatar: AvatarState = serde_json::from_str(json).unwrap();

        assert_eq!(avatar.level, 2);
        assert_eq!(avatar.experience, 40);
        assert_eq!(avatar.currency, 35);
        assert_eq!(avatar.equipped_item_id, None);
        assert_eq!(avatar.streak_count, 0);
        assert_eq!(avatar.base_appearance, DEFAULT_BASE_APPEARANCE);
    }

    #[test]
    fn test_avatar_serializes_with_authority_names() {
        let mut avatar = AvatarState::initial("u1");
        avatar.currency = 20;
        let value = serde_json::to_value(&avatar).unwrap();

        assert_eq!(value["coin"], 20);
        assert_eq!(value["exp"], 0);
        assert_eq!(value["level"], 1);
        assert_eq!(value["base_emoji"], DEFAULT_BASE_APPEARANCE);
    }

    #[test]
    fn test_account_role_and_cohort() {
        let json = r#"{"id": 12, "username": "admin", "fullname": "Teacher", "role": "admin", "class": 5}"#;
        let account: Account = serde_json::from_str(json).unwrap();

        assert_eq!(account.id, "12");
        assert_eq!(account.cohort, "5");
        assert!(account.is_admin());

        let json = r#"{"id": "s1", "username": "kid", "fullname": "Kid"}"#;
        let account: Account = serde_json::from_str(json).unwrap();
        assert_eq!(account.role, Role::Student);
        assert_eq!(account.cohort, "");
    }
}
