//! Uploaded documents of a client month and the notes attached to them.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::assignment::MonthKey;
use crate::domain::types::{CategoryName, ClientId, FileName, NoteText, TypeConstraintError};

/// Document category title as used by the upload screens.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CategoryKind {
    Sales,
    Purchases,
    BankStatements,
    Receipts,
    Payroll,
    Others,
    Other(String),
}

impl Display for CategoryKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryKind::Sales => write!(f, "Sales"),
            CategoryKind::Purchases => write!(f, "Purchases"),
            CategoryKind::BankStatements => write!(f, "Bank Statements"),
            CategoryKind::Receipts => write!(f, "Receipts"),
            CategoryKind::Payroll => write!(f, "Payroll"),
            CategoryKind::Others => write!(f, "Others"),
            CategoryKind::Other(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for CategoryKind {
    fn from(s: &str) -> Self {
        match s {
            "Sales" => CategoryKind::Sales,
            "Purchases" => CategoryKind::Purchases,
            "Bank Statements" => CategoryKind::BankStatements,
            "Receipts" => CategoryKind::Receipts,
            "Payroll" => CategoryKind::Payroll,
            "Others" => CategoryKind::Others,
            _ => CategoryKind::Other(s.to_string()),
        }
    }
}

/// A document category: a title plus an optional employee-defined name.
///
/// The backend encodes it as `"title"` or `"title-categoryName"`; that string
/// form only exists at the wire boundary.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentCategory {
    pub kind: CategoryKind,
    pub name: Option<CategoryName>,
}

impl DocumentCategory {
    pub fn new(kind: CategoryKind, name: Option<CategoryName>) -> Self {
        Self { kind, name }
    }

    /// Parses the backend category key.
    pub fn from_key(key: &str) -> Result<Self, TypeConstraintError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        match key.split_once('-') {
            Some((title, name)) if !name.trim().is_empty() => Ok(Self::new(
                CategoryKind::from(title.trim()),
                Some(CategoryName::new(name)?),
            )),
            Some((title, _)) => Ok(Self::new(CategoryKind::from(title.trim()), None)),
            None => Ok(Self::new(CategoryKind::from(key), None)),
        }
    }

    /// Builds a category from the separate form fields.
    pub fn from_parts(
        category_type: &str,
        category_name: Option<&str>,
    ) -> Result<Self, TypeConstraintError> {
        let title = category_type.trim();
        if title.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        let name = category_name
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(CategoryName::new)
            .transpose()?;
        Ok(Self::new(CategoryKind::from(title), name))
    }

    /// Backend key: `"title"` or `"title-categoryName"`.
    pub fn key(&self) -> String {
        match &self.name {
            Some(name) => format!("{}-{}", self.kind, name),
            None => self.kind.to_string(),
        }
    }
}

impl Display for DocumentCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({})", self.kind, name),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl TryFrom<String> for DocumentCategory {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_key(&value)
    }
}

impl From<DocumentCategory> for String {
    fn from(value: DocumentCategory) -> Self {
        value.key()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DocumentNote {
    pub note: String,
    pub created_at: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DocumentFile {
    pub file_name: FileName,
    pub size_bytes: u64,
    pub uploaded_at: Option<DateTime<Utc>>,
    pub url: Option<String>,
    pub notes: Vec<DocumentNote>,
}

/// Categorized uploads of one client month.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AssignmentFiles {
    pub client_id: ClientId,
    pub period: MonthKey,
    pub categories: BTreeMap<DocumentCategory, Vec<DocumentFile>>,
}

impl AssignmentFiles {
    pub fn empty(client_id: ClientId, period: MonthKey) -> Self {
        Self {
            client_id,
            period,
            categories: BTreeMap::new(),
        }
    }

    pub fn total_files(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn find(&self, document: &DocumentRef) -> Option<&DocumentFile> {
        self.categories
            .get(&document.category)?
            .iter()
            .find(|file| file.file_name == document.file_name)
    }
}

/// Reference to a single uploaded document within a client month.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DocumentRef {
    pub category: DocumentCategory,
    pub file_name: FileName,
}

/// Note an employee attaches to an uploaded document.
#[derive(Clone, Debug, PartialEq)]
pub struct NewDocumentNote {
    pub client_id: ClientId,
    pub period: MonthKey,
    pub category: DocumentCategory,
    pub file_name: FileName,
    pub note: NoteText,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_key_parsing() {
        let plain = DocumentCategory::from_key("Receipts").unwrap();
        assert_eq!(plain.kind, CategoryKind::Receipts);
        assert_eq!(plain.name, None);

        let named = DocumentCategory::from_key("Others-Loan Agreements").unwrap();
        assert_eq!(named.kind, CategoryKind::Others);
        assert_eq!(named.name.as_ref().map(|n| n.as_str()), Some("Loan Agreements"));
        assert_eq!(named.key(), "Others-Loan Agreements");

        assert!(DocumentCategory::from_key("  ").is_err());
    }

    #[test]
    fn category_from_form_parts_ignores_blank_names() {
        let category = DocumentCategory::from_parts("Bank Statements", Some("  ")).unwrap();
        assert_eq!(category.kind, CategoryKind::BankStatements);
        assert_eq!(category.key(), "Bank Statements");
    }

    #[test]
    fn find_locates_document_by_category_and_name() {
        let category = DocumentCategory::from_key("Sales").unwrap();
        let file = DocumentFile {
            file_name: FileName::new("invoice-001.pdf").unwrap(),
            size_bytes: 2048,
            uploaded_at: None,
            url: None,
            notes: vec![],
        };
        let mut files = AssignmentFiles::empty(
            ClientId::new("C1").unwrap(),
            MonthKey::try_new(2024, 3).unwrap(),
        );
        files.categories.insert(category.clone(), vec![file.clone()]);

        let found = files.find(&DocumentRef {
            category,
            file_name: FileName::new("invoice-001.pdf").unwrap(),
        });
        assert_eq!(found, Some(&file));
        assert_eq!(files.total_files(), 1);
    }
}
