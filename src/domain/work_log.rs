//! Daily work-task log entries kept by employees.

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{ClientId, TypeConstraintError, WorkDescription, WorkLogId};

/// Clock time format used by the forms and the backend.
pub const CLOCK_FORMAT: &str = "%H:%M";

/// Parses an `HH:MM` clock time.
pub fn parse_clock_time(value: &str) -> Result<NaiveTime, TypeConstraintError> {
    NaiveTime::parse_from_str(value.trim(), CLOCK_FORMAT)
        .map_err(|_| TypeConstraintError::InvalidValue(format!("invalid clock time: {value}")))
}

/// Elapsed time between two clock readings of the same shift.
///
/// An end earlier than the start is read as crossing midnight.
pub fn span_between(start: NaiveTime, end: NaiveTime) -> Duration {
    let span = end - start;
    if span < Duration::zero() {
        span + Duration::hours(24)
    } else {
        span
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkLog {
    pub id: WorkLogId,
    pub date: NaiveDate,
    pub client_id: Option<ClientId>,
    pub description: WorkDescription,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl WorkLog {
    pub fn duration(&self) -> Duration {
        span_between(self.start_time, self.end_time)
    }
}

/// Payload for creating or replacing a work log entry.
#[derive(Clone, Debug, PartialEq)]
pub struct NewWorkLog {
    pub date: NaiveDate,
    pub client_id: Option<ClientId>,
    pub description: WorkDescription,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl NewWorkLog {
    pub fn duration(&self) -> Duration {
        span_between(self.start_time, self.end_time)
    }
}

/// Sum of the durations of the given entries.
pub fn total_duration<'a, I>(logs: I) -> Duration
where
    I: IntoIterator<Item = &'a WorkLog>,
{
    logs.into_iter()
        .fold(Duration::zero(), |total, log| total + log.duration())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(id: i64, start: &str, end: &str) -> WorkLog {
        WorkLog {
            id: WorkLogId::new(id).unwrap(),
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            client_id: None,
            description: WorkDescription::new("Reconcile bank statements").unwrap(),
            start_time: parse_clock_time(start).unwrap(),
            end_time: parse_clock_time(end).unwrap(),
        }
    }

    #[test]
    fn duration_within_a_day() {
        assert_eq!(log(1, "09:15", "11:45").duration(), Duration::minutes(150));
        assert_eq!(log(1, "09:15", "09:15").duration(), Duration::zero());
    }

    #[test]
    fn duration_wraps_past_midnight() {
        assert_eq!(log(1, "23:30", "00:15").duration(), Duration::minutes(45));
    }

    #[test]
    fn total_sums_all_entries() {
        let logs = [log(1, "09:00", "10:00"), log(2, "13:00", "13:30")];
        assert_eq!(total_duration(&logs), Duration::minutes(90));
    }

    #[test]
    fn rejects_malformed_clock_times() {
        assert!(parse_clock_time("9am").is_err());
        assert!(parse_clock_time("25:00").is_err());
        assert!(parse_clock_time(" 07:05 ").is_ok());
    }
}
