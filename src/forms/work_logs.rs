//! Forms for the daily work log.

use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{ClientId, WorkDescription, WorkLogId};
use crate::domain::work_log::{NewWorkLog, parse_clock_time};
use crate::forms::FormError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(value: &str) -> Result<NaiveDate, FormError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| FormError::InvalidDate)
}

#[derive(Debug, Deserialize, Validate)]
/// Add and update share this form; updates carry the entry id.
pub struct WorkLogForm {
    #[serde(default)]
    pub id: Option<i64>,
    pub date: String,
    #[serde(default)]
    pub client_id: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub description: String,
    pub start_time: String,
    pub end_time: String,
}

/// Validated content of a [`WorkLogForm`].
pub struct WorkLogSubmission {
    pub id: Option<WorkLogId>,
    pub log: NewWorkLog,
}

impl TryFrom<WorkLogForm> for WorkLogSubmission {
    type Error = FormError;

    fn try_from(form: WorkLogForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let id = form
            .id
            .map(WorkLogId::new)
            .transpose()
            .map_err(|_| FormError::InvalidId)?;
        let client_id = form
            .client_id
            .filter(|s| !s.trim().is_empty())
            .map(ClientId::new)
            .transpose()
            .map_err(|_| FormError::InvalidClientId)?;

        Ok(Self {
            id,
            log: NewWorkLog {
                date: parse_date(&form.date)?,
                client_id,
                description: WorkDescription::new(form.description)
                    .map_err(|_| FormError::InvalidDescription)?,
                start_time: parse_clock_time(&form.start_time).map_err(|_| FormError::InvalidTime)?,
                end_time: parse_clock_time(&form.end_time).map_err(|_| FormError::InvalidTime)?,
            },
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteWorkLogForm {
    pub id: i64,
    /// Day to return to after deletion.
    #[serde(default)]
    pub date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> WorkLogForm {
        WorkLogForm {
            id: None,
            date: "2024-03-04".to_string(),
            client_id: Some("  ".to_string()),
            description: "Bank reconciliation".to_string(),
            start_time: "22:30".to_string(),
            end_time: "00:15".to_string(),
        }
    }

    #[test]
    fn builds_new_entry_crossing_midnight() {
        let payload = WorkLogSubmission::try_from(form()).unwrap();
        assert_eq!(payload.id, None);
        assert_eq!(payload.log.client_id, None);
        assert_eq!(payload.log.duration().num_minutes(), 105);
    }

    #[test]
    fn rejects_bad_clock_time() {
        let mut bad = form();
        bad.end_time = "25:00".to_string();
        assert!(matches!(
            WorkLogSubmission::try_from(bad),
            Err(FormError::InvalidTime)
        ));
    }

    #[test]
    fn rejects_non_positive_id() {
        let mut bad = form();
        bad.id = Some(0);
        assert!(matches!(WorkLogSubmission::try_from(bad), Err(FormError::InvalidId)));
    }
}
