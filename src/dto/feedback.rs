use serde::{Deserialize, Serialize};

use crate::domain::feedback::FeedbackNote;
use crate::formatting::{format_date, month_label};

/// Query parameters of `GET /feedback`.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct FeedbackQuery {
    pub search: Option<String>,
    pub client: Option<String>,
    /// `all`, `pending` or `reviewed`.
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackView {
    pub id: i64,
    pub client_id: String,
    pub client_name: String,
    pub period: Option<String>,
    pub message: String,
    pub created_at: String,
    pub reviewed: bool,
}

impl From<&FeedbackNote> for FeedbackView {
    fn from(note: &FeedbackNote) -> Self {
        Self {
            id: note.id.get(),
            client_id: note.client_id.to_string(),
            client_name: note.client_name.clone(),
            period: note.period.as_ref().map(month_label),
            message: note.message.clone(),
            created_at: format_date(&note.created_at),
            reviewed: note.reviewed,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FeedbackClientOption {
    pub client_id: String,
    pub client_name: String,
}

/// Data required to render the feedback template.
#[derive(Debug, Serialize)]
pub struct FeedbackPageData {
    /// Newest first.
    pub notes: Vec<FeedbackView>,
    pub pending_count: usize,
    /// Clients that left feedback, for the client filter.
    pub clients: Vec<FeedbackClientOption>,
    pub query: FeedbackQuery,
}
