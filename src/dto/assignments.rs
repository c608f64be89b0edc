//! Page data of the assigned clients screen.

use serde::{Deserialize, Serialize};

use crate::domain::assignment::{Assignment, MonthKey, TaskKind};
use crate::domain::client::Client;
use crate::domain::document::{DocumentCategory, DocumentFile};
use crate::formatting::{format_date, month_label};
use crate::index::{AssignmentFilter, ClientRosterEntry, GroupedAssignments};

/// Query parameters of `GET /` and `GET /api/v1/assignments`.
#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    pub search: Option<String>,
    pub year: Option<String>,
    pub month: Option<String>,
}

impl From<IndexQuery> for AssignmentFilter {
    fn from(query: IndexQuery) -> Self {
        AssignmentFilter::new(query.search, query.year, query.month)
    }
}

/// Assignment with the values the templates need precomputed.
#[derive(Debug, Serialize)]
pub struct AssignmentView {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub year: i32,
    pub month: u32,
    pub month_label: String,
    pub done: bool,
    pub done_at: Option<String>,
}

impl From<Assignment> for AssignmentView {
    fn from(assignment: Assignment) -> Self {
        Self {
            year: assignment.period.year,
            month: assignment.period.month.get(),
            month_label: month_label(&assignment.period),
            done: assignment.status.is_done(),
            done_at: assignment.accounting_done_at.as_ref().map(format_date),
            assignment,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MonthGroupView {
    pub period: MonthKey,
    pub label: String,
    pub assignments: Vec<AssignmentView>,
}

/// One client's filtered assignments, latest month first.
#[derive(Debug, Serialize)]
pub struct ClientGroupView {
    pub client: Client,
    pub months: Vec<MonthGroupView>,
}

/// Orders the grouping for display: clients in roster order, months newest
/// first, tasks by priority.
pub fn group_views(
    roster: &[ClientRosterEntry],
    mut grouped: GroupedAssignments,
) -> Vec<ClientGroupView> {
    roster
        .iter()
        .filter_map(|entry| {
            let months = grouped.remove(&entry.client.client_id)?;
            Some(ClientGroupView {
                client: entry.client.clone(),
                months: months
                    .into_iter()
                    .rev()
                    .map(|(period, assignments)| MonthGroupView {
                        period,
                        label: month_label(&period),
                        assignments: assignments.into_iter().map(Into::into).collect(),
                    })
                    .collect(),
            })
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct CategoryFilesView {
    pub key: String,
    pub label: String,
    pub category_type: String,
    pub category_name: Option<String>,
    pub files: Vec<DocumentFile>,
}

impl CategoryFilesView {
    pub fn new(category: &DocumentCategory, files: Vec<DocumentFile>) -> Self {
        Self {
            key: category.key(),
            label: category.to_string(),
            category_type: category.kind.to_string(),
            category_name: category.name.as_ref().map(ToString::to_string),
            files,
        }
    }
}

/// Document open in the preview pane, with the category fields the note
/// form posts back.
#[derive(Debug, Serialize)]
pub struct PreviewView {
    pub category_key: String,
    pub category_label: String,
    pub category_type: String,
    pub category_name: Option<String>,
    pub file: DocumentFile,
}

impl PreviewView {
    pub fn new(category: &DocumentCategory, file: DocumentFile) -> Self {
        Self {
            category_key: category.key(),
            category_label: category.to_string(),
            category_type: category.kind.to_string(),
            category_name: category.name.as_ref().map(ToString::to_string),
            file,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SelectedMonthView {
    pub period: MonthKey,
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub task: Option<TaskKind>,
    pub assignments: Vec<AssignmentView>,
    pub categories: Vec<CategoryFilesView>,
    pub total_files: usize,
    pub preview: Option<PreviewView>,
}

#[derive(Debug, Serialize)]
pub struct SelectedClientView {
    pub client: Client,
    pub assignments: Vec<AssignmentView>,
    pub month: Option<SelectedMonthView>,
}

/// Data required to render the assigned clients template.
#[derive(Debug, Serialize)]
pub struct IndexPageData {
    pub roster: Vec<ClientRosterEntry>,
    pub clients: Vec<ClientGroupView>,
    /// Malformed backend records left out of every view.
    pub skipped: usize,
    pub filter: AssignmentFilter,
    /// Distinct years for the year filter, newest first.
    pub years: Vec<i32>,
    pub selected: Option<SelectedClientView>,
}
