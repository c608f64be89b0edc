//! Services behind the client feedback screen.

use std::collections::BTreeMap;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::feedback::FeedbackStatus;
use crate::domain::types::FeedbackId;
use crate::dto::feedback::{FeedbackClientOption, FeedbackPageData, FeedbackQuery, FeedbackView};
use crate::forms::feedback::FeedbackReviewedForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::{FeedbackReader, FeedbackWriter};
use crate::services::{ServiceResult, ensure_role};

/// Absent and empty values do not filter; anything else is used as given.
fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Lists feedback newest first, narrowed by search term, client and status.
pub async fn load_feedback<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: FeedbackQuery,
) -> ServiceResult<FeedbackPageData>
where
    R: FeedbackReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let mut notes = repo.list_feedback(&user.token).await.map_err(|err| {
        log::error!("Failed to load feedback: {err}");
        err
    })?;
    notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let clients = notes
        .iter()
        .map(|note| (note.client_id.to_string(), note.client_name.clone()))
        .collect::<BTreeMap<_, _>>()
        .into_iter()
        .map(|(client_id, client_name)| FeedbackClientOption {
            client_id,
            client_name,
        })
        .collect();
    let pending_count = notes.iter().filter(|note| !note.reviewed).count();

    let search = active(&query.search);
    let client = active(&query.client);
    let status = active(&query.status).map(FeedbackStatus::from).unwrap_or_default();

    let notes = notes
        .iter()
        .filter(|note| search.is_none_or(|term| note.matches(term)))
        .filter(|note| client.is_none_or(|id| note.client_id.as_str() == id))
        .filter(|note| status.admits(note))
        .map(FeedbackView::from)
        .collect();

    Ok(FeedbackPageData {
        notes,
        pending_count,
        clients,
        query,
    })
}

pub async fn mark_reviewed<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: FeedbackReviewedForm,
) -> ServiceResult<()>
where
    R: FeedbackWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let id = FeedbackId::try_from(form)?;
    repo.mark_feedback_reviewed(&user.token, id)
        .await
        .map_err(|err| {
            log::error!("Failed to mark feedback {id} as reviewed: {err}");
            err
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::feedback::FeedbackNote;
    use crate::domain::types::ClientId;
    use crate::repository::mock::MockRepository;
    use crate::services::ServiceError;
    use crate::services::test_support::bookkeeper;

    fn note(id: i64, client: &str, name: &str, day: u32, message: &str, reviewed: bool) -> FeedbackNote {
        FeedbackNote {
            id: FeedbackId::new(id).unwrap(),
            client_id: ClientId::new(client).unwrap(),
            client_name: name.to_string(),
            period: None,
            message: message.to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 4, day, 9, 0, 0).unwrap(),
            reviewed,
        }
    }

    fn repo() -> MockRepository {
        let mut repo = MockRepository::new();
        repo.expect_list_feedback().returning(|_| {
            Ok(vec![
                note(1, "C1", "Acme Corp", 1, "Where is my VAT summary?", true),
                note(2, "C2", "Other Ltd", 3, "New bank account added", false),
                note(3, "C1", "Acme Corp", 2, "Payroll changes from May", false),
            ])
        });
        repo
    }

    #[actix_web::test]
    async fn lists_newest_first() {
        let page = load_feedback(&repo(), &bookkeeper(), FeedbackQuery::default())
            .await
            .unwrap();

        let ids: Vec<i64> = page.notes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert_eq!(page.pending_count, 2);
        assert_eq!(page.clients.len(), 2);
    }

    #[actix_web::test]
    async fn filters_compose() {
        let query = FeedbackQuery {
            search: Some("ACME".to_string()),
            client: None,
            status: Some("pending".to_string()),
        };

        let page = load_feedback(&repo(), &bookkeeper(), query).await.unwrap();

        let ids: Vec<i64> = page.notes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[actix_web::test]
    async fn search_term_is_used_untrimmed() {
        let query = FeedbackQuery {
            search: Some("corp ".to_string()),
            ..FeedbackQuery::default()
        };

        let page = load_feedback(&repo(), &bookkeeper(), query).await.unwrap();

        assert!(page.notes.is_empty());
    }

    #[actix_web::test]
    async fn client_filter_matches_id() {
        let query = FeedbackQuery {
            client: Some("C2".to_string()),
            ..FeedbackQuery::default()
        };

        let page = load_feedback(&repo(), &bookkeeper(), query).await.unwrap();

        assert_eq!(page.notes.len(), 1);
        assert_eq!(page.notes[0].client_name, "Other Ltd");
    }

    #[actix_web::test]
    async fn mark_reviewed_rejects_invalid_id() {
        let mut repo = MockRepository::new();
        repo.expect_mark_feedback_reviewed().times(0);

        let result = mark_reviewed(&repo, &bookkeeper(), FeedbackReviewedForm { id: 0 }).await;

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[actix_web::test]
    async fn mark_reviewed_forwards_id() {
        let mut repo = MockRepository::new();
        repo.expect_mark_feedback_reviewed()
            .withf(|_, id| id.get() == 2)
            .times(1)
            .returning(|_, _| Ok(()));

        mark_reviewed(&repo, &bookkeeper(), FeedbackReviewedForm { id: 2 })
            .await
            .unwrap();
    }
}
