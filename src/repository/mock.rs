//! Mock repository implementations for isolating services in tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use mockall::mock;

use crate::domain::assignment::{AccountingStatus, AssignmentKey, MonthKey};
use crate::domain::document::{AssignmentFiles, NewDocumentNote};
use crate::domain::feedback::FeedbackNote;
use crate::domain::types::{ClientId, FeedbackId, WorkLogId};
use crate::domain::work_log::{NewWorkLog, WorkLog};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    AssignmentReader, AssignmentWriter, DocumentWriter, FeedbackReader, FeedbackWriter,
    WorkLogReader, WorkLogWriter,
};

mock! {
    pub Repository {}

    #[async_trait]
    impl AssignmentReader for Repository {
        async fn list_assignments(&self, token: &str) -> RepositoryResult<Vec<Value>>;
        async fn get_assignment_files(
            &self,
            token: &str,
            client_id: &ClientId,
            period: MonthKey,
        ) -> RepositoryResult<AssignmentFiles>;
    }

    #[async_trait]
    impl AssignmentWriter for Repository {
        async fn set_accounting_status(
            &self,
            token: &str,
            key: &AssignmentKey,
            status: AccountingStatus,
        ) -> RepositoryResult<()>;
    }

    #[async_trait]
    impl DocumentWriter for Repository {
        async fn add_document_note(&self, token: &str, note: &NewDocumentNote) -> RepositoryResult<()>;
    }

    #[async_trait]
    impl WorkLogReader for Repository {
        async fn list_work_logs(&self, token: &str, date: NaiveDate) -> RepositoryResult<Vec<WorkLog>>;
    }

    #[async_trait]
    impl WorkLogWriter for Repository {
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
    impl FeedbackReader for Repository {
        async fn list_feedback(&self, token: &str) -> RepositoryResult<Vec<FeedbackNote>>;
    }

    #[async_trait]
    impl FeedbackWriter for Repository {
        async fn mark_feedback_reviewed(&self, token: &str, id: FeedbackId) -> RepositoryResult<()>;
    }
}
