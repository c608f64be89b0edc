//! Wire models for categorized assignment files and document notes.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::assignment::MonthKey;
use crate::domain::document::{
    AssignmentFiles, DocumentCategory, DocumentFile, DocumentNote, NewDocumentNote,
};
use crate::domain::types::{ClientId, FileName};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePayload {
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePayload {
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub notes: Vec<NotePayload>,
}

/// Body of `GET /api/employee/assignment-files/{clientId}/{year}/{month}`,
/// keyed by the backend category key.
pub type AssignmentFilesPayload = BTreeMap<String, Vec<FilePayload>>;

impl From<NotePayload> for DocumentNote {
    fn from(note: NotePayload) -> Self {
        Self {
            note: note.note,
            created_at: note.created_at,
            created_by: note.created_by,
        }
    }
}

/// Converts the backend payload, skipping entries without a usable name.
pub fn files_into_domain(
    payload: AssignmentFilesPayload,
    client_id: ClientId,
    period: MonthKey,
) -> AssignmentFiles {
    let mut files = AssignmentFiles::empty(client_id, period);

    for (key, entries) in payload {
        let category = match DocumentCategory::from_key(&key) {
            Ok(category) => category,
            Err(err) => {
                log::warn!("Skipping files under category {key:?}: {err}");
                continue;
            }
        };

        let documents = entries
            .into_iter()
            .filter_map(|entry| match FileName::new(entry.file_name) {
                Ok(file_name) => Some(DocumentFile {
                    file_name,
                    size_bytes: entry.file_size,
                    uploaded_at: entry.uploaded_at,
                    url: entry.url,
                    notes: entry.notes.into_iter().map(Into::into).collect(),
                }),
                Err(err) => {
                    log::warn!("Skipping unnamed file in category {key:?}: {err}");
                    None
                }
            })
            .collect::<Vec<_>>();

        files.categories.entry(category).or_default().extend(documents);
    }

    files
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
/// Body of `POST /api/employee/document-notes`.
pub struct NewNotePayload {
    pub client_id: String,
    pub year: i32,
    pub month: u32,
    pub category_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    pub file_name: String,
    pub note: String,
}

impl From<&NewDocumentNote> for NewNotePayload {
    fn from(note: &NewDocumentNote) -> Self {
        Self {
            client_id: note.client_id.to_string(),
            year: note.period.year,
            month: note.period.month.get(),
            category_type: note.category.kind.to_string(),
            category_name: note.category.name.as_ref().map(ToString::to_string),
            file_name: note.file_name.to_string(),
            note: note.note.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::document::CategoryKind;
    use crate::domain::types::NoteText;

    #[test]
    fn converts_categorized_files() {
        let payload: AssignmentFilesPayload = serde_json::from_value(json!({
            "Sales": [
                {"fileName": "invoice-1.pdf", "fileSize": 1024, "notes": [{"note": "Checked"}]},
                {"fileName": "  "}
            ],
            "Others-Contracts": [
                {"fileName": "lease.pdf", "fileSize": 4096, "url": "https://files/lease.pdf"}
            ]
        }))
        .unwrap();

        let files = files_into_domain(
            payload,
            ClientId::new("C1").unwrap(),
            MonthKey::try_new(2024, 3).unwrap(),
        );

        assert_eq!(files.total_files(), 2);
        let sales = &files.categories[&DocumentCategory::from_key("Sales").unwrap()];
        assert_eq!(sales[0].notes[0].note, "Checked");
        let contracts = &files.categories[&DocumentCategory::from_key("Others-Contracts").unwrap()];
        assert_eq!(contracts[0].size_bytes, 4096);
    }

    #[test]
    fn note_payload_splits_category_parts() {
        let note = NewDocumentNote {
            client_id: ClientId::new("C1").unwrap(),
            period: MonthKey::try_new(2024, 3).unwrap(),
            category: DocumentCategory::new(CategoryKind::Others, None),
            file_name: FileName::new("lease.pdf").unwrap(),
            note: NoteText::new("Unsigned copy").unwrap(),
        };

        let body = serde_json::to_value(NewNotePayload::from(&note)).unwrap();
        assert_eq!(
            body,
            json!({
                "clientId": "C1",
                "year": 2024,
                "month": 3,
                "categoryType": "Others",
                "fileName": "lease.pdf",
                "note": "Unsigned copy"
            })
        );
    }
}
