use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::account::{AccountId, ItemId};
use crate::lenient;

pub const MISSION_COUNT: usize = 10;

/// The ten yes/no daily habits (brushing, hand washing, water, vegetables,
/// exercise, bedtime, snacks, toilet, screen time, mood).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MissionChecklist {
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub m1: bool,
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub m2: bool,
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub m3: bool,
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub m4: bool,
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub m5: bool,
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub m6: bool,
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub m7: bool,
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub m8: bool,
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub m9: bool,
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub m10: bool,
}

impl MissionChecklist {
    pub fn from_flags(flags: [bool; MISSION_COUNT]) -> Self {
        let [m1, m2, m3, m4, m5, m6, m7, m8, m9, m10] = flags;
        Self { m1, m2, m3, m4, m5, m6, m7, m8, m9, m10 }
    }

    pub fn all_done() -> Self {
        Self::from_flags([true; MISSION_COUNT])
    }

    pub fn flags(&self) -> [bool; MISSION_COUNT] {
        [
            self.m1, self.m2, self.m3, self.m4, self.m5, self.m6, self.m7, self.m8, self.m9,
            self.m10,
        ]
    }

    pub fn completed(&self) -> usize {
        self.flags().iter().filter(|done| **done).count()
    }
}

// The sheet stores the checklist as a JSON string; freshly built entries carry an object.
fn checklist_cell<'de, D: Deserializer<'de>>(deserializer: D) -> Result<MissionChecklist, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(MissionChecklist::default()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(MissionChecklist::default()),
        Some(Value::String(s)) => serde_json::from_str(&s).map_err(de::Error::custom),
        Some(other) => serde_json::from_value(other).map_err(de::Error::custom),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Mood {
    Happy,
    Normal,
    Sad,
    Sleepy,
    Angry,
    #[default]
    Unknown,
}

impl Mood {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "happy" => Mood::Happy,
            "normal" => Mood::Normal,
            "sad" => Mood::Sad,
            "sleepy" => Mood::Sleepy,
            "angry" => Mood::Angry,
            _ => Mood::Unknown,
        }
    }
}

impl<'de> Deserialize<'de> for Mood {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = lenient::string(deserializer)?;
        Ok(Mood::parse(&value))
    }
}

/// One day's health log. At most one exists per account per calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HealthLogEntry {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub user_id: AccountId,
    /// Either `YYYY-MM-DD` or an ISO 8601 timestamp as written by the authority.
    #[serde(default)]
    pub date: String,
    #[serde(default, deserialize_with = "checklist_cell")]
    pub missions: MissionChecklist,
    #[serde(default)]
    pub mood: Mood,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub water_glasses: u32,
    #[serde(default, deserialize_with = "lenient::string")]
    pub sleep_start: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub sleep_end: String,
    #[serde(default, deserialize_with = "lenient::float")]
    pub sleep_hours: f64,
    #[serde(default)]
    pub exercise_activity: String,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub exercise_minutes: u32,
    #[serde(default)]
    pub sickness: String,
    #[serde(default, deserialize_with = "lenient::float")]
    pub height: f64,
    #[serde(default, deserialize_with = "lenient::float")]
    pub weight: f64,
    #[serde(default, deserialize_with = "lenient::float")]
    pub bmi: f64,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub steps: u32,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub vegetable_score: u32,
}

impl HealthLogEntry {
    pub fn reports_sickness(&self) -> bool {
        !self.sickness.trim().is_empty()
    }
}

/// Record that an account opened the mystery box on some day.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct BoxOpenLog {
    pub id: String,
    pub user_id: AccountId,
    pub opened_at: String,
    pub item_id: Option<ItemId>,
}

#[derive(Deserialize)]
struct BoxOpenRecord {
    #[serde(default, deserialize_with = "lenient::string")]
    id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    user_id: AccountId,
    #[serde(default, alias = "date", alias = "opened_at", deserialize_with = "lenient::string")]
    timestamp: String,
    #[serde(default, alias = "item_name", deserialize_with = "lenient::optional_string")]
    item_id: Option<ItemId>,
}

fn cell(row: &[Value], index: usize) -> Option<String> {
    match row.get(index)? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl<'de> Deserialize<'de> for BoxOpenLog {
    /// Accepts either a keyed record or a raw sheet row `[id, userId, date, item]`.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Array(row) => {
                let opened_at = cell(&row, 2)
                    .ok_or_else(|| de::Error::custom("box log row has no date in column 3"))?;
                Ok(BoxOpenLog {
                    id: cell(&row, 0).unwrap_or_default(),
                    user_id: cell(&row, 1).unwrap_or_default(),
                    opened_at,
                    item_id: cell(&row, 3),
                })
            }
            other => {
                let record: BoxOpenRecord = serde_json::from_value(other).map_err(de::Error::custom)?;
                Ok(BoxOpenLog {
                    id: record.id,
                    user_id: record.user_id,
                    opened_at: record.timestamp,
                    item_id: record.item_id,
                })
            }
        }
    }
}
