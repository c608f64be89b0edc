//! Monthly accounting assignments handled by employees.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::client::Client;
use crate::domain::document::DocumentCategory;
use crate::domain::types::{ClientId, Month, TypeConstraintError};

/// Kind of recurring accounting work performed for a client month.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(from = "String", into = "String")]
pub enum TaskKind {
    #[default]
    Bookkeeping,
    VatFilingComputation,
    VatFiling,
    FinancialStatementGeneration,
    Other(String),
}

impl TaskKind {
    /// Display priority inside a month: lower values come first.
    pub fn priority(&self) -> u8 {
        match self {
            TaskKind::Bookkeeping => 1,
            TaskKind::VatFilingComputation => 2,
            TaskKind::VatFiling => 3,
            TaskKind::FinancialStatementGeneration => 4,
            TaskKind::Other(_) => 99,
        }
    }
}

impl Display for TaskKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskKind::Bookkeeping => write!(f, "Bookkeeping"),
            TaskKind::VatFilingComputation => write!(f, "VAT Filing Computation"),
            TaskKind::VatFiling => write!(f, "VAT Filing"),
            TaskKind::FinancialStatementGeneration => write!(f, "Financial Statement Generation"),
            TaskKind::Other(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for TaskKind {
    fn from(s: &str) -> Self {
        match s {
            "Bookkeeping" => TaskKind::Bookkeeping,
            "VAT Filing Computation" => TaskKind::VatFilingComputation,
            "VAT Filing" => TaskKind::VatFiling,
            "Financial Statement Generation" => TaskKind::FinancialStatementGeneration,
            _ => TaskKind::Other(s.to_string()),
        }
    }
}

impl From<String> for TaskKind {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

impl From<TaskKind> for String {
    fn from(task: TaskKind) -> Self {
        task.to_string()
    }
}

/// Calendar month of an assignment, rendered as `"{year}-{month}"`.
///
/// Ordering is chronological.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    pub year: i32,
    pub month: Month,
}

impl MonthKey {
    pub fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    /// Builds a key from raw numbers, validating the month.
    pub fn try_new(year: i32, month: u32) -> Result<Self, TypeConstraintError> {
        Ok(Self::new(year, Month::new(month)?))
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Negative years never occur, so the last dash separates the month.
        let (year, month) = s
            .trim()
            .rsplit_once('-')
            .ok_or_else(|| TypeConstraintError::InvalidValue(s.to_string()))?;
        let year = year
            .parse::<i32>()
            .map_err(|_| TypeConstraintError::InvalidValue(s.to_string()))?;
        let month = month
            .parse::<u32>()
            .map_err(|_| TypeConstraintError::InvalidValue(s.to_string()))?;
        Self::try_new(year, month)
    }
}

impl TryFrom<String> for MonthKey {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(value: MonthKey) -> Self {
        value.to_string()
    }
}

/// Composite identity shared by every view of one assignment.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssignmentKey {
    pub client_id: ClientId,
    pub period: MonthKey,
    pub task: TaskKind,
}

/// Completion state of an assignment.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AccountingStatus {
    #[default]
    Pending,
    Done,
}

impl AccountingStatus {
    pub fn is_done(self) -> bool {
        matches!(self, AccountingStatus::Done)
    }

    /// The only transition between the two states.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            AccountingStatus::Pending => AccountingStatus::Done,
            AccountingStatus::Done => AccountingStatus::Pending,
        }
    }
}

impl From<bool> for AccountingStatus {
    fn from(done: bool) -> Self {
        if done {
            AccountingStatus::Done
        } else {
            AccountingStatus::Pending
        }
    }
}

/// One (client, year, month, task) unit of accounting work.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Assignment {
    pub client: Client,
    pub period: MonthKey,
    pub task: TaskKind,
    pub status: AccountingStatus,
    pub accounting_done_at: Option<DateTime<Utc>>,
    pub accounting_done_by: Option<String>,
    /// Supplied by the backend; the portal does not derive it from the clock.
    pub is_current_month: bool,
    pub total_files: u32,
    pub category_counts: BTreeMap<DocumentCategory, u32>,
}

impl Assignment {
    pub fn client_id(&self) -> &ClientId {
        &self.client.client_id
    }

    pub fn key(&self) -> AssignmentKey {
        AssignmentKey {
            client_id: self.client.client_id.clone(),
            period: self.period,
            task: self.task.clone(),
        }
    }

    pub fn matches_key(&self, key: &AssignmentKey) -> bool {
        self.client.client_id == key.client_id && self.period == key.period && self.task == key.task
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_kind_round_trips_known_names() {
        for name in [
            "Bookkeeping",
            "VAT Filing Computation",
            "VAT Filing",
            "Financial Statement Generation",
            "Payroll",
        ] {
            assert_eq!(TaskKind::from(name).to_string(), name);
        }
        assert_eq!(TaskKind::from("Payroll"), TaskKind::Other("Payroll".into()));
    }

    #[test]
    fn task_priorities_follow_fixed_table() {
        assert!(TaskKind::Bookkeeping.priority() < TaskKind::VatFilingComputation.priority());
        assert!(TaskKind::VatFilingComputation.priority() < TaskKind::VatFiling.priority());
        assert!(
            TaskKind::VatFiling.priority() < TaskKind::FinancialStatementGeneration.priority()
        );
        assert_eq!(TaskKind::Other("Audit".into()).priority(), 99);
    }

    #[test]
    fn month_key_renders_without_padding() {
        let key = MonthKey::try_new(2024, 3).unwrap();
        assert_eq!(key.to_string(), "2024-3");
        assert_eq!("2024-3".parse::<MonthKey>().unwrap(), key);
        assert!("2024-13".parse::<MonthKey>().is_err());
        assert!("2024".parse::<MonthKey>().is_err());
    }

    #[test]
    fn month_keys_order_chronologically() {
        let september = MonthKey::try_new(2023, 9).unwrap();
        let october = MonthKey::try_new(2023, 10).unwrap();
        let january = MonthKey::try_new(2024, 1).unwrap();
        assert!(september < october);
        assert!(october < january);
    }

    #[test]
    fn status_toggle_is_an_involution() {
        let status = AccountingStatus::Pending;
        assert_eq!(status.toggled(), AccountingStatus::Done);
        assert_eq!(status.toggled().toggled(), status);
    }
}
