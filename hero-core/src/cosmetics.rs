use hero_types::{AvatarState, ItemId, UserItemGrant, ValidationReason};

use crate::errors::{HeroError, HeroResult};

/// Base looks a student can pick for their hero.
pub const BASE_APPEARANCE_POOL: &[&str] = &[
    "🧑‍🚀", "🦸", "🦸‍♀️", "🧙", "🧚", "🥷", "🧑‍🎤", "🦊", "🐯", "🐼", "🦁", "🐸",
];

pub fn ensure_known_appearance(value: &str) -> HeroResult<()> {
    if BASE_APPEARANCE_POOL.contains(&value) {
        Ok(())
    } else {
        Err(HeroError::validation(ValidationReason::UnknownAppearance {
            value: value.to_string(),
        }))
    }
}

pub fn ensure_owned(item_id: &str, owned: &[UserItemGrant]) -> HeroResult<()> {
    if owned.iter().any(|grant| grant.item_id == item_id) {
        Ok(())
    } else {
        Err(HeroError::validation(ValidationReason::ItemNotOwned {
            item_id: item_id.to_string(),
        }))
    }
}

/// Item to send to the authority when the student taps an item: tapping the
/// equipped item unequips it.
pub fn equip_target(avatar: &AvatarState, item_id: &str) -> Option<ItemId> {
    match avatar.equipped_item_id.as_deref() {
        Some(equipped) if equipped == item_id => None,
        _ => Some(item_id.to_string()),
    }
}
