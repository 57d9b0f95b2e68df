use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};
use hero_types::{BoxOpenLog, HealthLogEntry, ValidationReason};

use crate::errors::{HeroError, HeroResult};

/// A record that belongs to one calendar day.
pub trait DatedRecord {
    fn recorded_on(&self) -> &str;
}

impl DatedRecord for HealthLogEntry {
    fn recorded_on(&self) -> &str {
        &self.date
    }
}

impl DatedRecord for BoxOpenLog {
    fn recorded_on(&self) -> &str {
        &self.opened_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStatus {
    Available,
    AlreadyDone,
    /// The record list could not be fetched. Treated as closed.
    Unverified,
}

impl GateStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, GateStatus::Available)
    }
}

/// Once-per-day availability, evaluated against the local day of a fixed
/// UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyGate {
    offset: FixedOffset,
}

impl DailyGate {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    pub fn from_offset_minutes(minutes: i32) -> HeroResult<Self> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(Self::new)
            .ok_or_else(|| HeroError::Config(format!("UTC offset of {minutes} minutes is out of range")))
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.offset).date_naive()
    }

    /// Local calendar day of a stored date. Bare dates are already local;
    /// timestamps with an offset are converted; naive timestamps are taken
    /// as local wall time.
    pub fn local_day(&self, raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(day);
        }
        if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
            return Some(instant.with_timezone(&self.offset).date_naive());
        }
        ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"]
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .map(|local| local.date())
    }

    pub fn is_recorded_on<R: DatedRecord>(&self, record: &R, day: NaiveDate) -> bool {
        match self.local_day(record.recorded_on()) {
            Some(recorded) => recorded == day,
            None => {
                tracing::warn!(date = record.recorded_on(), "Ignoring record with unreadable date");
                false
            }
        }
    }

    pub fn records_on<'a, R: DatedRecord>(&self, records: &'a [R], day: NaiveDate) -> Vec<&'a R> {
        records
            .iter()
            .filter(|record| self.is_recorded_on(*record, day))
            .collect()
    }

    /// A record whose date cannot be read might be today's, so it keeps the
    /// gate closed.
    pub fn status<R: DatedRecord>(&self, records: &[R], now: DateTime<Utc>) -> GateStatus {
        let today = self.today(now);
        let mut unreadable = false;
        for record in records {
            match self.local_day(record.recorded_on()) {
                Some(day) if day == today => return GateStatus::AlreadyDone,
                Some(_) => {}
                None => unreadable = true,
            }
        }
        if unreadable {
            tracing::warn!("Daily gate found a record with an unreadable date, keeping it closed");
            GateStatus::Unverified
        } else {
            GateStatus::Available
        }
    }

    /// Like [`DailyGate::status`], but fails closed when the fetch failed.
    pub fn status_of<R: DatedRecord, E: std::fmt::Display>(
        &self,
        fetched: Result<&[R], E>,
        now: DateTime<Utc>,
    ) -> GateStatus {
        match fetched {
            Ok(records) => self.status(records, now),
            Err(err) => {
                tracing::warn!(error = %err, "Could not verify daily gate, keeping it closed");
                GateStatus::Unverified
            }
        }
    }

    /// Error to surface when a gated action is attempted while closed.
    pub fn ensure_open(status: GateStatus, closed: ValidationReason) -> HeroResult<()> {
        if status.is_open() {
            Ok(())
        } else {
            Err(HeroError::validation(closed))
        }
    }

    /// Streak to display after logging today: extends when the latest earlier
    /// log was yesterday, otherwise restarts at 1.
    pub fn next_streak<R: DatedRecord>(
        &self,
        records: &[R],
        current_streak: u32,
        now: DateTime<Utc>,
    ) -> u32 {
        let today = self.today(now);
        let latest_prior = records
            .iter()
            .filter_map(|record| self.local_day(record.recorded_on()))
            .filter(|day| *day < today)
            .max();

        match (latest_prior, today.checked_sub_days(Days::new(1))) {
            (Some(latest), Some(yesterday)) if latest == yesterday => current_streak.saturating_add(1),
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn log_on(date: &str) -> HealthLogEntry {
        serde_json::from_value(serde_json::json!({ "user_id": "u1", "date": date })).unwrap()
    }

    fn box_on(opened_at: &str) -> BoxOpenLog {
        serde_json::from_value(serde_json::json!(["b1", "u1", opened_at, "7"])).unwrap()
    }

    fn bangkok() -> DailyGate {
        DailyGate::from_offset_minutes(420).unwrap()
    }

    fn now() -> DateTime<Utc> {
        // 10:00 local on 2026-10-18 at UTC+7
        Utc.with_ymd_and_hms(2026, 10, 18, 3, 0, 0).unwrap()
    }

    #[test]
    fn test_available_when_only_older_records() {
        let gate = bangkok();
        let logs = vec![log_on("2026-10-16"), log_on("2026-10-17")];
        assert_eq!(gate.status(&logs, now()), GateStatus::Available);
        assert!(gate.status(&logs, now()).is_open());
    }

    #[test]
    fn test_already_done_when_record_is_today() {
        let gate = bangkok();
        let logs = vec![log_on("2026-10-17"), log_on("2026-10-18")];
        assert_eq!(gate.status(&logs, now()), GateStatus::AlreadyDone);
    }

    #[test]
    fn test_timestamp_converted_to_local_day() {
        let gate = bangkok();
        // 01:30 local on the 18th, still the 17th in UTC
        let boxes = vec![box_on("2026-10-17T18:30:00.000Z")];
        assert_eq!(gate.status(&boxes, now()), GateStatus::AlreadyDone);

        let utc_gate = DailyGate::utc();
        assert_eq!(utc_gate.status(&boxes, now()), GateStatus::Available);
    }

    #[test]
    fn test_today_follows_offset() {
        let late_evening_utc = Utc.with_ymd_and_hms(2026, 10, 17, 20, 0, 0).unwrap();
        assert_eq!(
            bangkok().today(late_evening_utc),
            NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
        );
        assert_eq!(
            DailyGate::utc().today(late_evening_utc),
            NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
        );
    }

    #[test]
    fn test_unreadable_dates_keep_gate_closed() {
        let gate = bangkok();
        for raw in ["not a date", ""] {
            let logs = vec![log_on("2026-10-17"), log_on(raw)];
            let status = gate.status(&logs, now());
            assert_eq!(status, GateStatus::Unverified);
            assert!(!status.is_open());
        }

        let logs = vec![log_on("garbled"), log_on("2026-10-18")];
        assert_eq!(gate.status(&logs, now()), GateStatus::AlreadyDone);
    }

    #[test]
    fn test_fetch_failure_keeps_gate_closed() {
        let gate = bangkok();
        let fetched: Result<&[HealthLogEntry], String> = Err("timeout".to_string());
        let status = gate.status_of(fetched, now());
        assert_eq!(status, GateStatus::Unverified);
        assert!(!status.is_open());

        let err = DailyGate::ensure_open(status, ValidationReason::AlreadyLoggedToday).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_streak_extends_after_yesterday() {
        let gate = bangkok();
        let logs = vec![log_on("2026-10-15"), log_on("2026-10-17")];
        assert_eq!(gate.next_streak(&logs, 4, now()), 5);
    }

    #[test]
    fn test_streak_resets_after_gap() {
        let gate = bangkok();
        let logs = vec![log_on("2026-10-15")];
        assert_eq!(gate.next_streak(&logs, 4, now()), 1);
        assert_eq!(gate.next_streak::<HealthLogEntry>(&[], 9, now()), 1);
    }

    #[test]
    fn test_records_on_filters_by_day() {
        let gate = bangkok();
        let logs = vec![log_on("2026-10-18"), log_on("2026-10-17"), log_on("2026-10-18T02:00:00+07:00")];
        let today = gate.today(now());
        assert_eq!(gate.records_on(&logs, today).len(), 2);
    }

    #[test]
    fn test_offset_out_of_range() {
        assert!(DailyGate::from_offset_minutes(24 * 60).is_err());
    }
}
