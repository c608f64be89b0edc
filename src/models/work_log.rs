//! Wire models for daily work log entries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ClientId, TypeConstraintError, WorkDescription, WorkLogId};
use crate::domain::work_log::{CLOCK_FORMAT, NewWorkLog, WorkLog, parse_clock_time};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkLogPayload {
    pub id: i64,
    pub date: NaiveDate,
    #[serde(default)]
    pub client_id: Option<String>,
    pub description: String,
    pub start_time: String,
    pub end_time: String,
}

impl TryFrom<WorkLogPayload> for WorkLog {
    type Error = TypeConstraintError;

    fn try_from(payload: WorkLogPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            id: WorkLogId::new(payload.id)?,
            date: payload.date,
            client_id: payload
                .client_id
                .filter(|s| !s.trim().is_empty())
                .map(ClientId::new)
                .transpose()?,
            description: WorkDescription::new(payload.description)?,
            start_time: parse_clock_time(&payload.start_time)?,
            end_time: parse_clock_time(&payload.end_time)?,
        })
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
/// Body of `POST /api/employee/work-logs` and `PUT /api/employee/work-logs/{id}`.
pub struct NewWorkLogPayload {
    pub date: NaiveDate,
    pub client_id: Option<String>,
    pub description: String,
    pub start_time: String,
    pub end_time: String,
}

impl From<&NewWorkLog> for NewWorkLogPayload {
    fn from(log: &NewWorkLog) -> Self {
        Self {
            date: log.date,
            client_id: log.client_id.as_ref().map(ToString::to_string),
            description: log.description.to_string(),
            start_time: log.start_time.format(CLOCK_FORMAT).to_string(),
            end_time: log.end_time.format(CLOCK_FORMAT).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_work_log() {
        let payload: WorkLogPayload = serde_json::from_value(json!({
            "id": 7,
            "date": "2024-03-04",
            "clientId": "",
            "description": "Payroll run",
            "startTime": "08:30",
            "endTime": "10:00"
        }))
        .unwrap();

        let log = WorkLog::try_from(payload).unwrap();
        assert_eq!(log.id.get(), 7);
        assert_eq!(log.client_id, None);
        assert_eq!(log.duration().num_minutes(), 90);
    }

    #[test]
    fn encodes_clock_times_without_seconds() {
        let log = NewWorkLog {
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            client_id: Some(ClientId::new("C1").unwrap()),
            description: WorkDescription::new("VAT review").unwrap(),
            start_time: parse_clock_time("13:05").unwrap(),
            end_time: parse_clock_time("14:00").unwrap(),
        };

        let body = serde_json::to_value(NewWorkLogPayload::from(&log)).unwrap();
        assert_eq!(body["startTime"], json!("13:05"));
        assert_eq!(body["endTime"], json!("14:00"));
        assert_eq!(body["clientId"], json!("C1"));
        assert_eq!(body["date"], json!("2024-03-04"));
    }
}
