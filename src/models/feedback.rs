//! Wire model for client feedback notes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::assignment::MonthKey;
use crate::domain::feedback::FeedbackNote;
use crate::domain::types::{ClientId, FeedbackId, TypeConstraintError};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackPayload {
    pub id: i64,
    pub client_id: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub message: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub reviewed: bool,
}

impl TryFrom<FeedbackPayload> for FeedbackNote {
    type Error = TypeConstraintError;

    fn try_from(payload: FeedbackPayload) -> Result<Self, Self::Error> {
        let period = match (payload.year, payload.month) {
            (Some(year), Some(month)) => Some(MonthKey::try_new(year, month)?),
            _ => None,
        };

        Ok(Self {
            id: FeedbackId::new(payload.id)?,
            client_id: ClientId::new(payload.client_id)?,
            client_name: payload.client_name,
            period,
            message: payload.message,
            created_at: payload.created_at,
            reviewed: payload.reviewed,
        })
    }
}
