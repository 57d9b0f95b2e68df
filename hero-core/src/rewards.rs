use std::time::{Duration, Instant};

use hero_types::{AvatarState, Card, Item, UserCardGrant, ValidationReason};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::errors::{HeroError, HeroResult};
use crate::progression::ProgressionModel;

fn item(id: &str, name: &str, kind: &str, price: u32, effect: &str, image: &str) -> Item {
    Item {
        id: id.to_string(),
        name: name.to_string(),
        kind: kind.to_string(),
        price,
        effect: effect.to_string(),
        image: image.to_string(),
    }
}

/// Items that can drop from the mystery box.
pub fn default_item_catalog() -> Vec<Item> {
    vec![
        item("1", "Super Cape", "costume", 20, "+10% speed", "🦸"),
        item("2", "Golden Crown", "hat", 20, "+5 charm", "👑"),
        item("3", "Magic Wand", "tool", 20, "+5 brain", "🪄"),
        item("4", "Shield of Veggies", "shield", 20, "+10 health", "🛡️"),
        item("5", "Rocket Shoes", "shoes", 20, "+15 energy", "👟"),
        item("6", "Star Glasses", "glasses", 20, "+5 focus", "🕶️"),
        item("7", "Water Bottle of Power", "tool", 20, "+10 energy", "🧴"),
        item("8", "Sleepy Pillow", "tool", 20, "+10 rest", "🛏️"),
    ]
}

/// Once-a-day paid draw from the item catalog.
#[derive(Debug, Clone)]
pub struct MysteryBox {
    catalog: Vec<Item>,
    cost: u32,
}

impl MysteryBox {
    pub fn new(catalog: Vec<Item>, cost: u32) -> Self {
        Self { catalog, cost }
    }

    pub fn with_default_catalog(cost: u32) -> Self {
        Self::new(default_item_catalog(), cost)
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn catalog(&self) -> &[Item] {
        &self.catalog
    }

    pub fn find(&self, item_id: &str) -> Option<&Item> {
        self.catalog.iter().find(|item| item.id == item_id)
    }

    pub fn ensure_affordable(&self, avatar: &AvatarState) -> HeroResult<()> {
        ProgressionModel::ensure_affordable(avatar.currency, self.cost)
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> HeroResult<&Item> {
        self.catalog.choose(rng).ok_or_else(|| {
            HeroError::validation(ValidationReason::InvalidReward {
                reason: "the mystery box has no items".to_string(),
            })
        })
    }
}

/// True when the account already held this card before the award.
pub fn is_duplicate_card(card: &Card, owned_before: &[UserCardGrant]) -> bool {
    owned_before.iter().any(|grant| grant.card_id == card.id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStage {
    Idle,
    Shaking { until: Instant },
    Revealed,
}

/// Card pack reveal: `Idle`, then a timed `Shaking` stage, then `Revealed`.
#[derive(Debug, Clone)]
pub struct CardReveal {
    card: Card,
    is_duplicate: bool,
    stage: RevealStage,
    duration: Duration,
}

impl CardReveal {
    pub fn new(card: Card, is_duplicate: bool, duration: Duration) -> Self {
        Self {
            card,
            is_duplicate,
            stage: RevealStage::Idle,
            duration,
        }
    }

    /// Starts the shaking stage. Returns false if already opened.
    pub fn open(&mut self, now: Instant) -> bool {
        if self.stage != RevealStage::Idle {
            return false;
        }
        self.stage = RevealStage::Shaking {
            until: now + self.duration,
        };
        true
    }

    pub fn tick(&mut self, now: Instant) -> RevealStage {
        if let RevealStage::Shaking { until } = self.stage {
            if now >= until {
                self.stage = RevealStage::Revealed;
            }
        }
        self.stage
    }

    pub fn stage(&self) -> RevealStage {
        self.stage
    }

    pub fn time_remaining(&self, now: Instant) -> Duration {
        match self.stage {
            RevealStage::Shaking { until } => until.saturating_duration_since(now),
            _ => Duration::ZERO,
        }
    }

    /// The card, once revealed.
    pub fn revealed(&self) -> Option<&Card> {
        match self.stage {
            RevealStage::Revealed => Some(&self.card),
            _ => None,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        self.is_duplicate
    }
}
