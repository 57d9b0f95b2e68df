use hero_types::{AvatarState, ValidationReason};

use crate::errors::{HeroError, HeroResult};

/// Experience needed to finish a level, per level number.
pub const EXPERIENCE_PER_LEVEL: u32 = 100;

/// Progress bar values derived from an authoritative avatar snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelProgress {
    pub level: u32,
    pub experience: u32,
    pub required: u32,
    pub fraction: f64,
}

pub struct ProgressionModel;

impl ProgressionModel {
    /// Threshold shown for a level. Level 0 from a malformed record is
    /// treated as level 1.
    pub fn experience_for_level(level: u32) -> u32 {
        level.max(1).saturating_mul(EXPERIENCE_PER_LEVEL)
    }

    pub fn progress_fraction(level: u32, experience: u32) -> f64 {
        let required = Self::experience_for_level(level) as f64;
        (experience as f64 / required).clamp(0.0, 1.0)
    }

    pub fn level_progress(avatar: &AvatarState) -> LevelProgress {
        LevelProgress {
            level: avatar.level.max(1),
            experience: avatar.experience,
            required: Self::experience_for_level(avatar.level),
            fraction: Self::progress_fraction(avatar.level, avatar.experience),
        }
    }

    /// Experience reported to the authority after a quiz.
    pub fn quiz_experience(correct_count: usize, points_per_correct: u32) -> u32 {
        let correct = u32::try_from(correct_count).unwrap_or(u32::MAX);
        correct.saturating_mul(points_per_correct)
    }

    /// One coin for every two correct answers.
    pub fn quiz_coin_bonus(correct_count: usize) -> u32 {
        u32::try_from(correct_count / 2).unwrap_or(u32::MAX)
    }

    pub fn ensure_affordable(currency: u32, cost: u32) -> HeroResult<()> {
        if currency < cost {
            return Err(HeroError::validation(ValidationReason::InsufficientCurrency {
                have: currency,
                need: cost,
            }));
        }
        Ok(())
    }

    /// Balance to display while a spend is pending. The authority's answer
    /// replaces it once the mutation completes.
    pub fn balance_after_spend(currency: u32, cost: u32) -> HeroResult<u32> {
        Self::ensure_affordable(currency, cost)?;
        Ok(currency - cost)
    }
}
