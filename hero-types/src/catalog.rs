use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::account::{AccountId, ItemId};
use crate::lenient;

pub type CardId = String;
pub type RewardId = String;
pub type QuestionId = String;

/// Cosmetic item that can drop from the mystery box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Item {
    #[serde(deserialize_with = "lenient::string")]
    pub id: ItemId,
    #[serde(rename = "item_name")]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub price: u32,
    /// Short flavour text, e.g. "+10% speed".
    #[serde(default)]
    pub effect: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserItemGrant {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub user_id: AccountId,
    #[serde(deserialize_with = "lenient::string")]
    pub item_id: ItemId,
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub is_equipped: bool,
    #[serde(default)]
    pub acquired_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum CardRarity {
    Common,
    Rare,
    Legendary,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PowerStats {
    #[serde(default, deserialize_with = "lenient::integer")]
    pub health: u32,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub brain: u32,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub energy: u32,
}

/// Collectible card awarded for a perfect quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Card {
    #[serde(deserialize_with = "lenient::string")]
    pub id: CardId,
    pub rarity: CardRarity,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub power_stats: PowerStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserCardGrant {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub user_id: AccountId,
    #[serde(deserialize_with = "lenient::string")]
    pub card_id: CardId,
    #[serde(default)]
    pub acquired_at: String,
}

/// Real-world prize redeemable for currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShopReward {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: RewardId,
    pub title: String,
    #[serde(deserialize_with = "lenient::integer")]
    pub cost: u32,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub stock: u32,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub description: String,
}

impl ShopReward {
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum RedemptionStatus {
    #[default]
    Pending,
    Completed,
}

impl RedemptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedemptionStatus::Pending => "pending",
            RedemptionStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RedemptionRecord {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub user_id: AccountId,
    #[serde(deserialize_with = "lenient::string")]
    pub reward_id: RewardId,
    #[serde(default)]
    pub status: RedemptionStatus,
    #[serde(default)]
    pub claimed_at: String,
    /// Code the student shows a teacher to collect the prize.
    #[serde(default, deserialize_with = "lenient::string")]
    pub code: String,
}

/// Multiple-choice question. Options are stored as four optional columns;
/// blank columns are dropped and `answer` indexes the remaining options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuizQuestion {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: QuestionId,
    #[serde(rename = "question")]
    pub prompt: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub option1: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub option2: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub option3: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub option4: String,
    #[serde(rename = "answer", deserialize_with = "lenient::integer")]
    pub correct_index: u32,
    #[serde(default)]
    pub icon: String,
}

impl QuizQuestion {
    pub fn options(&self) -> Vec<&str> {
        [&self.option1, &self.option2, &self.option3, &self.option4]
            .into_iter()
            .map(|o| o.as_str())
            .filter(|o| !o.is_empty())
            .collect()
    }

    pub fn is_correct(&self, selected_index: usize) -> bool {
        selected_index == self.correct_index as usize
    }
}
