use chrono::{NaiveDate, NaiveTime, Timelike};
use hero_types::{AccountId, HealthLogEntry, MissionChecklist, Mood, ValidationReason};

use crate::errors::{HeroError, HeroResult};

pub const MAX_WATER_GLASSES: u32 = 15;
pub const MAX_VEGETABLE_SCORE: u32 = 10;
const MINUTES_PER_DAY: u32 = 24 * 60;

/// Values entered on the daily health form before derived fields are filled.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthLogDraft {
    pub missions: MissionChecklist,
    pub mood: Mood,
    pub water_glasses: u32,
    /// `HH:MM`
    pub sleep_start: String,
    /// `HH:MM`, may be past midnight.
    pub sleep_end: String,
    pub exercise_activity: String,
    pub exercise_minutes: u32,
    pub sickness: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub steps: u32,
    pub vegetable_score: u32,
}

impl Default for HealthLogDraft {
    fn default() -> Self {
        Self {
            missions: MissionChecklist::all_done(),
            mood: Mood::Happy,
            water_glasses: 8,
            sleep_start: "21:00".to_string(),
            sleep_end: "06:00".to_string(),
            exercise_activity: String::new(),
            exercise_minutes: 30,
            sickness: String::new(),
            height_cm: 140.0,
            weight_kg: 35.0,
            steps: 6000,
            vegetable_score: 8,
        }
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> HeroError {
    HeroError::validation(ValidationReason::InvalidHealthLog {
        field: field.to_string(),
        reason: reason.into(),
    })
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn parse_clock(field: &str, value: &str) -> HeroResult<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| invalid(field, format!("must be a time like 21:30, got '{value}'")))
}

/// Hours slept between two clock times, wrapping past midnight, rounded to
/// one decimal.
pub fn sleep_hours(start: &str, end: &str) -> HeroResult<f64> {
    let start = parse_clock("sleep_start", start)?;
    let end = parse_clock("sleep_end", end)?;
    let start_minutes = start.hour() * 60 + start.minute();
    let end_minutes = end.hour() * 60 + end.minute();
    let minutes = (end_minutes + MINUTES_PER_DAY - start_minutes) % MINUTES_PER_DAY;
    Ok(round_tenth(minutes as f64 / 60.0))
}

/// Body mass index rounded to one decimal, if both measurements are positive.
pub fn body_mass_index(height_cm: f64, weight_kg: f64) -> Option<f64> {
    if !(height_cm > 0.0 && weight_kg > 0.0) {
        return None;
    }
    let height_m = height_cm / 100.0;
    Some(round_tenth(weight_kg / (height_m * height_m)))
}

/// Friendly label shown on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BmiCategory {
    Underweight,
    Healthy,
    Chubby,
    Overweight,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 15.0 {
            BmiCategory::Underweight
        } else if bmi < 22.0 {
            BmiCategory::Healthy
        } else if bmi < 25.0 {
            BmiCategory::Chubby
        } else {
            BmiCategory::Overweight
        }
    }
}

/// Bins used by the administrator's research tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BmiBin {
    Thin,
    Normal,
    Chubby,
    Obese,
}

impl BmiBin {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiBin::Thin
        } else if bmi < 23.0 {
            BmiBin::Normal
        } else if bmi < 25.0 {
            BmiBin::Chubby
        } else {
            BmiBin::Obese
        }
    }
}

impl HealthLogDraft {
    pub fn bmi(&self) -> Option<f64> {
        body_mass_index(self.height_cm, self.weight_kg)
    }

    pub fn bmi_category(&self) -> Option<BmiCategory> {
        self.bmi().map(BmiCategory::from_bmi)
    }

    pub fn validate(&self) -> HeroResult<()> {
        if self.mood == Mood::Unknown {
            return Err(invalid("mood", "must be picked"));
        }
        if self.water_glasses > MAX_WATER_GLASSES {
            return Err(invalid("water_glasses", format!("must be at most {MAX_WATER_GLASSES}")));
        }
        if self.vegetable_score > MAX_VEGETABLE_SCORE {
            return Err(invalid("vegetable_score", format!("must be at most {MAX_VEGETABLE_SCORE}")));
        }
        if !(self.height_cm > 0.0) {
            return Err(invalid("height", "must be greater than zero"));
        }
        if !(self.weight_kg > 0.0) {
            return Err(invalid("weight", "must be greater than zero"));
        }
        sleep_hours(&self.sleep_start, &self.sleep_end)?;
        Ok(())
    }

    /// Validates the draft and fills the derived fields. The id is left
    /// empty for the authority to assign.
    pub fn into_entry(self, user_id: impl Into<AccountId>, day: NaiveDate) -> HeroResult<HealthLogEntry> {
        self.validate()?;
        let sleep_hours = sleep_hours(&self.sleep_start, &self.sleep_end)?;
        let bmi = self
            .bmi()
            .ok_or_else(|| invalid("height", "and weight are needed for BMI"))?;

        Ok(HealthLogEntry {
            id: String::new(),
            user_id: user_id.into(),
            date: day.format("%Y-%m-%d").to_string(),
            missions: self.missions,
            mood: self.mood,
            water_glasses: self.water_glasses,
            sleep_start: self.sleep_start.trim().to_string(),
            sleep_end: self.sleep_end.trim().to_string(),
            sleep_hours,
            exercise_activity: self.exercise_activity.trim().to_string(),
            exercise_minutes: self.exercise_minutes,
            sickness: self.sickness.trim().to_string(),
            height: self.height_cm,
            weight: self.weight_kg,
            bmi,
            steps: self.steps,
            vegetable_score: self.vegetable_score,
        })
    }
}
