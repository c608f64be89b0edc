//! Form for annotating an uploaded document.

use serde::Deserialize;
use validator::Validate;

use crate::domain::assignment::MonthKey;
use crate::domain::document::{DocumentCategory, NewDocumentNote};
use crate::domain::types::{ClientId, FileName, NoteText};
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
pub struct AddNoteForm {
    pub client_id: String,
    pub year: i32,
    #[validate(range(min = 1, max = 12))]
    pub month: u32,
    pub category_type: String,
    #[serde(default)]
    pub category_name: Option<String>,
    pub file_name: String,
    #[validate(length(min = 1, max = 2000))]
    pub note: String,
}

impl TryFrom<AddNoteForm> for NewDocumentNote {
    type Error = FormError;

    fn try_from(form: AddNoteForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(NewDocumentNote {
            client_id: ClientId::new(form.client_id).map_err(|_| FormError::InvalidClientId)?,
            period: MonthKey::try_new(form.year, form.month).map_err(|_| FormError::InvalidMonth)?,
            category: DocumentCategory::from_parts(
                &form.category_type,
                form.category_name.as_deref(),
            )
            .map_err(|_| FormError::InvalidCategory)?,
            file_name: FileName::new(form.file_name).map_err(|_| FormError::InvalidFileName)?,
            note: NoteText::new(form.note).map_err(|_| FormError::InvalidNote)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::CategoryKind;

    fn form(note: &str) -> AddNoteForm {
        AddNoteForm {
            client_id: "C1".to_string(),
            year: 2024,
            month: 3,
            category_type: "Others".to_string(),
            category_name: Some("Contracts".to_string()),
            file_name: "lease.pdf".to_string(),
            note: note.to_string(),
        }
    }

    #[test]
    fn sanitizes_note_text() {
        let note = NewDocumentNote::try_from(form("Unsigned <script>alert(1)</script>copy")).unwrap();
        assert_eq!(note.note.as_str(), "Unsigned copy");
        assert_eq!(note.category.kind, CategoryKind::Others);
        assert_eq!(note.category.key(), "Others-Contracts");
    }

    #[test]
    fn markup_only_note_is_rejected() {
        assert!(matches!(
            NewDocumentNote::try_from(form("<script>x</script>")),
            Err(FormError::InvalidNote)
        ));
    }
}
