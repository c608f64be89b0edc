//! `reqwest` implementation of the repository traits.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::assignment::{AccountingStatus, AssignmentKey, MonthKey};
use crate::domain::document::{AssignmentFiles, NewDocumentNote};
use crate::domain::feedback::FeedbackNote;
use crate::domain::types::{ClientId, FeedbackId, WorkLogId};
use crate::domain::work_log::{NewWorkLog, WorkLog};
use crate::models::assignment::StatusTogglePayload;
use crate::models::document::{AssignmentFilesPayload, NewNotePayload, files_into_domain};
use crate::models::feedback::FeedbackPayload;
use crate::models::mutation::MutationResponse;
use crate::models::work_log::{NewWorkLogPayload, WorkLogPayload};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    AssignmentReader, AssignmentWriter, DocumentWriter, FeedbackReader, FeedbackWriter,
    WorkLogReader, WorkLogWriter,
};

/// Client for the accounting backend's employee API.
///
/// Cloning is cheap: clones share one connection pool.
#[derive(Clone, Debug)]
pub struct HttpRepository {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRepository {
    pub fn new(base_url: &str, timeout: Duration) -> RepositoryResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/employee{path}", self.base_url)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> RepositoryResult<T> {
        let response = check_status(request.send().await?).await?;
        response
            .json::<T>()
            .await
            .map_err(|err| RepositoryError::Decode(err.to_string()))
    }

    /// Sends a mutation and turns `success = false` into a rejection.
    async fn mutate(&self, request: RequestBuilder) -> RepositoryResult<()> {
        let ack: MutationResponse = self.fetch(request).await?;
        if ack.success {
            Ok(())
        } else {
            Err(RepositoryError::Rejected(
                ack.message
                    .unwrap_or_else(|| "The request was not accepted".to_string()),
            ))
        }
    }
}

async fn check_status(response: Response) -> RepositoryResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED => Err(RepositoryError::Unauthorized),
        StatusCode::NOT_FOUND => Err(RepositoryError::NotFound),
        _ => {
            let body = response.text().await.unwrap_or_default();
            // Validation failures come back as a regular acknowledgement body.
            match serde_json::from_str::<MutationResponse>(&body)
                .ok()
                .and_then(|ack| ack.message)
            {
                Some(message) if status.is_client_error() => Err(RepositoryError::Rejected(message)),
                _ => Err(RepositoryError::Http {
                    status: status.as_u16(),
                    message: body,
                }),
            }
        }
    }
}

#[async_trait]
impl AssignmentReader for HttpRepository {
    async fn list_assignments(&self, token: &str) -> RepositoryResult<Vec<Value>> {
        let request = self
            .client
            .get(self.url("/assigned-clients"))
            .bearer_auth(token);
        self.fetch(request).await
    }

    async fn get_assignment_files(
        &self,
        token: &str,
        client_id: &ClientId,
        period: MonthKey,
    ) -> RepositoryResult<AssignmentFiles> {
        let request = self
            .client
            .get(self.url(&format!(
                "/assignment-files/{client_id}/{}/{}",
                period.year, period.month
            )))
            .bearer_auth(token);
        let payload: AssignmentFilesPayload = self.fetch(request).await?;
        Ok(files_into_domain(payload, client_id.clone(), period))
    }
}

#[async_trait]
impl AssignmentWriter for HttpRepository {
    async fn set_accounting_status(
        &self,
        token: &str,
        key: &AssignmentKey,
        status: AccountingStatus,
    ) -> RepositoryResult<()> {
        let request = self
            .client
            .patch(self.url("/assignment-status"))
            .bearer_auth(token)
            .json(&StatusTogglePayload::new(key, status));
        self.mutate(request).await
    }
}

#[async_trait]
impl DocumentWriter for HttpRepository {
    async fn add_document_note(&self, token: &str, note: &NewDocumentNote) -> RepositoryResult<()> {
        let request = self
            .client
            .post(self.url("/document-notes"))
            .bearer_auth(token)
            .json(&NewNotePayload::from(note));
        self.mutate(request).await
    }
}

#[async_trait]
impl WorkLogReader for HttpRepository {
    async fn list_work_logs(&self, token: &str, date: NaiveDate) -> RepositoryResult<Vec<WorkLog>> {
        let request = self
            .client
            .get(self.url("/work-logs"))
            .query(&[("date", date.to_string())])
            .bearer_auth(token);
        let payload: Vec<WorkLogPayload> = self.fetch(request).await?;

        Ok(payload
            .into_iter()
            .filter_map(|entry| {
                let id = entry.id;
                WorkLog::try_from(entry)
                    .map_err(|err| log::warn!("Skipping malformed work log {id}: {err}"))
                    .ok()
            })
            .collect())
    }
}

#[async_trait]
impl WorkLogWriter for HttpRepository {
    async fn create_work_log(&self, token: &str, log: &NewWorkLog) -> RepositoryResult<()> {
        let request = self
            .client
            .post(self.url("/work-logs"))
            .bearer_auth(token)
            .json(&NewWorkLogPayload::from(log));
        self.mutate(request).await
    }

    async fn update_work_log(
        &self,
        token: &str,
        id: WorkLogId,
        log: &NewWorkLog,
    ) -> RepositoryResult<()> {
        let request = self
            .client
            .put(self.url(&format!("/work-logs/{id}")))
            .bearer_auth(token)
            .json(&NewWorkLogPayload::from(log));
        self.mutate(request).await
    }

    async fn delete_work_log(&self, token: &str, id: WorkLogId) -> RepositoryResult<()> {
        let request = self
            .client
            .delete(self.url(&format!("/work-logs/{id}")))
            .bearer_auth(token);
        self.mutate(request).await
    }
}

#[async_trait]
impl FeedbackReader for HttpRepository {
    async fn list_feedback(&self, token: &str) -> RepositoryResult<Vec<FeedbackNote>> {
        let request = self.client.get(self.url("/feedback")).bearer_auth(token);
        let payload: Vec<FeedbackPayload> = self.fetch(request).await?;

        Ok(payload
            .into_iter()
            .filter_map(|entry| {
                let id = entry.id;
                FeedbackNote::try_from(entry)
                    .map_err(|err| log::warn!("Skipping malformed feedback {id}: {err}"))
                    .ok()
            })
            .collect())
    }
}

#[async_trait]
impl FeedbackWriter for HttpRepository {
    async fn mark_feedback_reviewed(&self, token: &str, id: FeedbackId) -> RepositoryResult<()> {
        let request = self
            .client
            .patch(self.url(&format!("/feedback/{id}/reviewed")))
            .bearer_auth(token);
        self.mutate(request).await
    }
}
