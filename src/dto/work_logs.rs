use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::work_log::{CLOCK_FORMAT, WorkLog};
use crate::formatting::format_duration;

#[derive(Debug, Default, Deserialize)]
pub struct WorkLogsQuery {
    /// `YYYY-MM-DD`; today when absent.
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WorkLogView {
    pub id: i64,
    pub client_id: Option<String>,
    pub description: String,
    pub start_time: String,
    pub end_time: String,
    pub duration: String,
}

impl From<&WorkLog> for WorkLogView {
    fn from(log: &WorkLog) -> Self {
        Self {
            id: log.id.get(),
            client_id: log.client_id.as_ref().map(ToString::to_string),
            description: log.description.to_string(),
            start_time: log.start_time.format(CLOCK_FORMAT).to_string(),
            end_time: log.end_time.format(CLOCK_FORMAT).to_string(),
            duration: format_duration(log.duration()),
        }
    }
}

/// Data required to render the work log template.
#[derive(Debug, Serialize)]
pub struct WorkLogsPageData {
    pub date: NaiveDate,
    pub previous_date: Option<NaiveDate>,
    pub next_date: Option<NaiveDate>,
    /// Ordered by start time.
    pub entries: Vec<WorkLogView>,
    pub total: String,
}
