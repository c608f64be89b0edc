use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::assignment::MonthKey;
use crate::domain::types::{ClientId, FeedbackId};

/// Note a client left for the bookkeeping team.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FeedbackNote {
    pub id: FeedbackId,
    pub client_id: ClientId,
    pub client_name: String,
    /// Month the feedback refers to, when the client picked one.
    pub period: Option<MonthKey>,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub reviewed: bool,
}

/// Review state used to narrow the feedback list.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackStatus {
    #[default]
    All,
    Pending,
    Reviewed,
}

impl FeedbackStatus {
    pub fn admits(self, note: &FeedbackNote) -> bool {
        match self {
            FeedbackStatus::All => true,
            FeedbackStatus::Pending => !note.reviewed,
            FeedbackStatus::Reviewed => note.reviewed,
        }
    }
}

impl From<&str> for FeedbackStatus {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "pending" => FeedbackStatus::Pending,
            "reviewed" => FeedbackStatus::Reviewed,
            _ => FeedbackStatus::All,
        }
    }
}

impl FeedbackNote {
    /// Case-insensitive search over client name and message.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.client_name.to_lowercase().contains(&term)
            || self.message.to_lowercase().contains(&term)
    }
}
