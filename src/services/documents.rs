use crate::SERVICE_ACCESS_ROLE;
use crate::domain::document::NewDocumentNote;
use crate::forms::documents::AddNoteForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::DocumentWriter;
use crate::services::{ServiceResult, ensure_role};

/// Validates the note form and forwards the sanitized note to the backend.
pub async fn add_note<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddNoteForm,
) -> ServiceResult<NewDocumentNote>
where
    R: DocumentWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let note = NewDocumentNote::try_from(form).map_err(|err| {
        log::error!("Failed to validate note form: {err}");
        err
    })?;

    repo.add_document_note(&user.token, &note)
        .await
        .map_err(|err| {
            log::error!("Failed to add a document note: {err}");
            err
        })?;

    Ok(note)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::ServiceError;
    use crate::services::test_support::{bookkeeper, outsider};

    fn form(note: &str) -> AddNoteForm {
        AddNoteForm {
            client_id: "C1".to_string(),
            year: 2024,
            month: 3,
            category_type: "Sales".to_string(),
            category_name: None,
            file_name: "invoice-1.pdf".to_string(),
            note: note.to_string(),
        }
    }

    #[actix_web::test]
    async fn sends_sanitized_note() {
        let mut repo = MockRepository::new();
        repo.expect_add_document_note()
            .withf(|token, note| token == "token-17" && note.note.as_str() == "Missing VAT number")
            .times(1)
            .returning(|_, _| Ok(()));

        let note = add_note(&repo, &bookkeeper(), form("<script>x</script>Missing VAT number"))
            .await
            .unwrap();

        assert_eq!(note.category.key(), "Sales");
    }

    #[actix_web::test]
    async fn blank_note_never_reaches_backend() {
        let mut repo = MockRepository::new();
        repo.expect_add_document_note().times(0);

        let result = add_note(&repo, &bookkeeper(), form("   ")).await;

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[actix_web::test]
    async fn requires_access_role() {
        let mut repo = MockRepository::new();
        repo.expect_add_document_note().times(0);

        let result = add_note(&repo, &outsider(), form("ok")).await;

        assert_eq!(result.unwrap_err(), ServiceError::Unauthorized);
    }

    #[actix_web::test]
    async fn backend_rejection_is_surfaced() {
        let mut repo = MockRepository::new();
        repo.expect_add_document_note()
            .returning(|_, _| Err(RepositoryError::Rejected("File was deleted".to_string())));

        let result = add_note(&repo, &bookkeeper(), form("ok")).await;

        assert_eq!(
            result.unwrap_err(),
            ServiceError::Rejected("File was deleted".to_string())
        );
    }
}
