//! Wire models for assignment records served by the accounting backend.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::assignment::{AccountingStatus, Assignment, AssignmentKey, MonthKey, TaskKind};
use crate::domain::client::Client;
use crate::domain::document::DocumentCategory;
use crate::domain::types::ClientId;

/// Reasons an assignment record cannot be attributed to a client month.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MalformedRecord {
    #[error("record has no client")]
    MissingClient,
    #[error("record has no resolvable client id")]
    MissingClientId,
    #[error("record has no year")]
    MissingYear,
    #[error("record has an invalid month: {0:?}")]
    InvalidMonth(Option<i64>),
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Client reference embedded in an assignment record.
pub struct ClientPayload {
    /// Either a string or a number depending on the backend version.
    #[serde(default)]
    pub client_id: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl ClientPayload {
    /// Resolves the client id from its JSON representation.
    pub fn resolve_id(&self) -> Option<ClientId> {
        match self.client_id.as_ref()? {
            Value::String(s) => ClientId::new(s.as_str()).ok(),
            Value::Number(n) => ClientId::new(n.to_string()).ok(),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Assignment record as returned by `GET /api/employee/assigned-clients`.
pub struct AssignmentPayload {
    #[serde(default)]
    pub client: Option<ClientPayload>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<i64>,
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub accounting_done: Option<bool>,
    #[serde(default)]
    pub accounting_done_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub accounting_done_by: Option<String>,
    /// Tombstone flag; older backends send numbers or strings here.
    #[serde(default)]
    pub is_removed: Option<Value>,
    #[serde(default)]
    pub is_current_month: Option<bool>,
    #[serde(default)]
    pub total_files: Option<u32>,
    #[serde(default)]
    pub category_counts: Option<BTreeMap<String, u32>>,
}

/// Truthiness of a loosely typed JSON flag: `null`, `false`, `0` and `""`
/// are false, everything else is true.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Whether a raw backend record carries a truthy `isRemoved` flag.
pub fn is_tombstone(record: &Value) -> bool {
    record.get("isRemoved").is_some_and(is_truthy)
}

impl AssignmentPayload {
    pub fn is_removed(&self) -> bool {
        self.is_removed.as_ref().is_some_and(is_truthy)
    }
}

impl TryFrom<AssignmentPayload> for Assignment {
    type Error = MalformedRecord;

    fn try_from(payload: AssignmentPayload) -> Result<Self, Self::Error> {
        let client = payload.client.ok_or(MalformedRecord::MissingClient)?;
        let client_id = client.resolve_id().ok_or(MalformedRecord::MissingClientId)?;
        let year = payload.year.ok_or(MalformedRecord::MissingYear)?;
        let period = payload
            .month
            .and_then(|m| u32::try_from(m).ok())
            .and_then(|m| MonthKey::try_new(year, m).ok())
            .ok_or(MalformedRecord::InvalidMonth(payload.month))?;

        let task = payload
            .task
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(TaskKind::from)
            .unwrap_or_default();

        let category_counts = payload
            .category_counts
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(key, count)| match DocumentCategory::from_key(&key) {
                Ok(category) => Some((category, count)),
                Err(err) => {
                    log::warn!("Ignoring file count for category {key:?}: {err}");
                    None
                }
            })
            .collect();

        Ok(Assignment {
            client: Client::new(
                client_id,
                client.name.unwrap_or_default(),
                client.email,
                client.phone,
                client.address,
            ),
            period,
            task,
            status: AccountingStatus::from(payload.accounting_done.unwrap_or(false)),
            accounting_done_at: payload.accounting_done_at,
            accounting_done_by: payload.accounting_done_by,
            is_current_month: payload.is_current_month.unwrap_or(false),
            total_files: payload.total_files.unwrap_or(0),
            category_counts,
        })
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
/// Body of `PATCH /api/employee/assignment-status`.
pub struct StatusTogglePayload {
    pub client_id: String,
    pub year: i32,
    pub month: u32,
    pub task: String,
    pub accounting_done: bool,
}

impl StatusTogglePayload {
    pub fn new(key: &AssignmentKey, status: AccountingStatus) -> Self {
        Self {
            client_id: key.client_id.to_string(),
            year: key.period.year,
            month: key.period.month.get(),
            task: key.task.to_string(),
            accounting_done: status.is_done(),
        }
    }
}
