//! Access to the accounting backend.
//!
//! Every call carries the employee's bearer token. Readers return data,
//! writers return `()` once the backend acknowledged the mutation.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

use crate::domain::assignment::{AccountingStatus, AssignmentKey, MonthKey};
use crate::domain::document::{AssignmentFiles, NewDocumentNote};
use crate::domain::feedback::FeedbackNote;
use crate::domain::types::{ClientId, FeedbackId, WorkLogId};
use crate::domain::work_log::{NewWorkLog, WorkLog};
use crate::repository::errors::RepositoryResult;

pub mod errors;
pub mod http;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

pub use http::HttpRepository;

#[async_trait]
pub trait AssignmentReader: Send + Sync {
    /// Raw assignment records, tombstones included. Records are decoded one
    /// by one during ingest so that a single bad record cannot fail the list.
    async fn list_assignments(&self, token: &str) -> RepositoryResult<Vec<Value>>;
    async fn get_assignment_files(
        &self,
        token: &str,
        client_id: &ClientId,
        period: MonthKey,
    ) -> RepositoryResult<AssignmentFiles>;
}

#[async_trait]
pub trait AssignmentWriter: Send + Sync {
    async fn set_accounting_status(
        &self,
        token: &str,
        key: &AssignmentKey,
        status: AccountingStatus,
    ) -> RepositoryResult<()>;
}

#[async_trait]
pub trait DocumentWriter: Send + Sync {
    async fn add_document_note(&self, token: &str, note: &NewDocumentNote) -> RepositoryResult<()>;
}

#[async_trait]
pub trait WorkLogReader: Send + Sync {
    async fn list_work_logs(&self, token: &str, date: NaiveDate) -> RepositoryResult<Vec<WorkLog>>;
}

#[async_trait]
pub trait WorkLogWriter: Send + Sync {
    async fn create_work_log(&self, token: &str, log: &NewWorkLog) -> RepositoryResult<()>;
    async fn update_work_log(
        &self,
        token: &str,
        id: WorkLogId,
        log: &NewWorkLog,
    ) -> RepositoryResult<()>;
    async fn delete_work_log(&self, token: &str, id: WorkLogId) -> RepositoryResult<()>;
}

#[async_trait]
pub trait FeedbackReader: Send + Sync {
    async fn list_feedback(&self, token: &str) -> RepositoryResult<Vec<FeedbackNote>>;
}

#[async_trait]
pub trait FeedbackWriter: Send + Sync {
    async fn mark_feedback_reviewed(&self, token: &str, id: FeedbackId) -> RepositoryResult<()>;
}
