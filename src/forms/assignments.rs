//! Forms driving the assigned clients screen.

use serde::Deserialize;
use validator::Validate;

use crate::domain::assignment::{AssignmentKey, MonthKey, TaskKind};
use crate::domain::document::{DocumentCategory, DocumentRef};
use crate::domain::types::{ClientId, FileName};
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
/// Identifies the assignment whose accounting status is flipped.
///
/// Accepted both as a posted form and as the JSON body of the API.
pub struct ToggleStatusForm {
    #[serde(alias = "clientId")]
    #[validate(length(min = 1))]
    pub client_id: String,
    pub year: i32,
    #[validate(range(min = 1, max = 12))]
    pub month: u32,
    /// Blank means "Bookkeeping".
    #[serde(default)]
    pub task: String,
}

impl TryFrom<ToggleStatusForm> for AssignmentKey {
    type Error = FormError;

    fn try_from(form: ToggleStatusForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let client_id = ClientId::new(form.client_id).map_err(|_| FormError::InvalidClientId)?;
        let period = MonthKey::try_new(form.year, form.month).map_err(|_| FormError::InvalidMonth)?;
        let task = match form.task.trim() {
            "" => TaskKind::default(),
            name => TaskKind::from(name),
        };

        Ok(AssignmentKey {
            client_id,
            period,
            task,
        })
    }
}

#[derive(Debug, Deserialize)]
/// Query string of `GET /preview`: the backend category key and file name.
pub struct PreviewQuery {
    pub category: String,
    pub file: String,
}

impl TryFrom<PreviewQuery> for DocumentRef {
    type Error = FormError;

    fn try_from(query: PreviewQuery) -> Result<Self, Self::Error> {
        Ok(DocumentRef {
            category: DocumentCategory::from_key(&query.category)
                .map_err(|_| FormError::InvalidCategory)?,
            file_name: FileName::new(query.file).map_err(|_| FormError::InvalidFileName)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_form_builds_key_with_default_task() {
        let form = ToggleStatusForm {
            client_id: " C1 ".to_string(),
            year: 2024,
            month: 3,
            task: "  ".to_string(),
        };

        let key = AssignmentKey::try_from(form).unwrap();
        assert_eq!(key.client_id.as_str(), "C1");
        assert_eq!(key.period.to_string(), "2024-3");
        assert_eq!(key.task, TaskKind::Bookkeeping);
    }

    #[test]
    fn toggle_form_rejects_month_out_of_range() {
        let form = ToggleStatusForm {
            client_id: "C1".to_string(),
            year: 2024,
            month: 13,
            task: "VAT Filing".to_string(),
        };

        assert!(matches!(
            AssignmentKey::try_from(form),
            Err(FormError::Validation(_))
        ));
    }

    #[test]
    fn toggle_form_accepts_camel_case_json() {
        let form: ToggleStatusForm = serde_json::from_str(
            r#"{"clientId": "C1", "year": 2024, "month": 3, "task": "VAT Filing"}"#,
        )
        .unwrap();

        let key = AssignmentKey::try_from(form).unwrap();
        assert_eq!(key.task, TaskKind::VatFiling);
    }

    #[test]
    fn preview_query_parses_category_key() {
        let query = PreviewQuery {
            category: "Others-Contracts".to_string(),
            file: "lease.pdf".to_string(),
        };

        let document = DocumentRef::try_from(query).unwrap();
        assert_eq!(document.category.key(), "Others-Contracts");
        assert_eq!(document.file_name.as_str(), "lease.pdf");
    }
}
