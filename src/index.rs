//! Assignment index: one normalized table of an employee's assignments and
//! the views derived from it.
//!
//! The table keeps the surviving records of the latest fetch in the order the
//! backend sent them. The roster, the client/month grouping, the per-client
//! selection and the filtered view are all computed on read, so a status
//! change made through [`AssignmentIndex::toggle_accounting_done`] is visible
//! in every view at once.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::assignment::{Assignment, AssignmentKey, MonthKey, TaskKind};
use crate::domain::client::Client;
use crate::domain::types::ClientId;
use crate::models::assignment::{AssignmentPayload, is_tombstone};

/// Per-client summary shown in the roster.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientRosterEntry {
    pub client: Client,
    pub assignment_count: usize,
    /// Task names per month, in the order the records arrived.
    pub tasks_by_month: BTreeMap<MonthKey, Vec<TaskKind>>,
}

impl ClientRosterEntry {
    fn seed(client: &Client) -> Self {
        Self {
            client: client.clone(),
            assignment_count: 0,
            tasks_by_month: BTreeMap::new(),
        }
    }
}

/// `clientId -> monthKey -> assignments` ordered by task priority.
pub type GroupedAssignments = BTreeMap<ClientId, BTreeMap<MonthKey, Vec<Assignment>>>;

/// Roster and grouping computed together from one table state.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentSnapshot {
    pub roster: Vec<ClientRosterEntry>,
    pub grouped: GroupedAssignments,
    /// Malformed records dropped during ingest.
    pub skipped: usize,
}

/// Free-text, year and month predicates of the assigned clients screen.
///
/// Absent or empty values do not filter. Values are used as given, so a
/// whitespace-only search term still filters.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssignmentFilter {
    pub search: Option<String>,
    pub year: Option<String>,
    pub month: Option<String>,
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl AssignmentFilter {
    pub fn new(search: Option<String>, year: Option<String>, month: Option<String>) -> Self {
        Self {
            search,
            year,
            month,
        }
    }

    pub fn is_empty(&self) -> bool {
        active(&self.search).is_none() && active(&self.year).is_none() && active(&self.month).is_none()
    }

    pub fn admits(&self, assignment: &Assignment) -> bool {
        if let Some(term) = active(&self.search)
            && !assignment.client.name_matches(term)
        {
            return false;
        }
        if let Some(year) = active(&self.year)
            && assignment.period.year.to_string() != year
        {
            return false;
        }
        if let Some(month) = active(&self.month)
            && assignment.period.month.to_string() != month
        {
            return false;
        }
        true
    }
}

/// Builds the per-client roster in first-seen order.
pub fn build_roster(records: &[Assignment]) -> Vec<ClientRosterEntry> {
    let mut positions: HashMap<&ClientId, usize> = HashMap::new();
    let mut roster: Vec<ClientRosterEntry> = Vec::new();

    for record in records {
        let position = *positions.entry(record.client_id()).or_insert_with(|| {
            roster.push(ClientRosterEntry::seed(&record.client));
            roster.len() - 1
        });
        let entry = &mut roster[position];
        entry.assignment_count += 1;
        entry
            .tasks_by_month
            .entry(record.period)
            .or_default()
            .push(record.task.clone());
    }

    roster
}

/// Groups records by client and month, ordering each month by task priority.
///
/// The sort is stable: tasks of equal priority keep their input order.
pub fn group_assignments<'a, I>(records: I) -> GroupedAssignments
where
    I: IntoIterator<Item = &'a Assignment>,
{
    let mut grouped = GroupedAssignments::new();

    for record in records {
        grouped
            .entry(record.client_id().clone())
            .or_default()
            .entry(record.period)
            .or_default()
            .push(record.clone());
    }

    for months in grouped.values_mut() {
        for assignments in months.values_mut() {
            assignments.sort_by_key(|assignment| assignment.task.priority());
        }
    }

    grouped
}

/// Most relevant first: the current month, then later years, then later months.
fn compare_recency(a: &Assignment, b: &Assignment) -> Ordering {
    b.is_current_month
        .cmp(&a.is_current_month)
        .then_with(|| b.period.year.cmp(&a.period.year))
        .then_with(|| b.period.month.cmp(&a.period.month))
}

/// Assignments of one client, most relevant first; ties keep input order.
pub fn select_client_assignments(records: &[Assignment], client_id: &ClientId) -> Vec<Assignment> {
    let mut selected: Vec<Assignment> = records
        .iter()
        .filter(|record| record.client_id() == client_id)
        .cloned()
        .collect();
    selected.sort_by(compare_recency);
    selected
}

/// Records admitted by every active predicate of `filter`.
pub fn apply_filters(records: &[Assignment], filter: &AssignmentFilter) -> Vec<Assignment> {
    records
        .iter()
        .filter(|record| filter.admits(record))
        .cloned()
        .collect()
}

/// Flips the accounting status and stamps the change time.
///
/// The stamp never moves backwards: a previous stamp at or after `now` is
/// advanced by one millisecond instead.
pub fn toggle_accounting_done(
    record: &Assignment,
    now: DateTime<Utc>,
    actor: Option<&str>,
) -> Assignment {
    let stamp = match record.accounting_done_at {
        Some(previous) if previous >= now => previous + Duration::milliseconds(1),
        _ => now,
    };

    Assignment {
        status: record.status.toggled(),
        accounting_done_at: Some(stamp),
        accounting_done_by: actor
            .map(str::to_string)
            .or_else(|| record.accounting_done_by.clone()),
        ..record.clone()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AssignmentIndex {
    records: Vec<Assignment>,
    skipped: usize,
}

impl AssignmentIndex {
    /// Builds an index from one backend response body.
    ///
    /// Records with a truthy `isRemoved` are dropped before decoding. A record
    /// that does not decode is counted as skipped instead of failing the whole
    /// response.
    pub fn ingest_raw<I>(raw: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        let mut undecodable = 0;
        let payloads: Vec<AssignmentPayload> = raw
            .into_iter()
            .filter(|record| !is_tombstone(record))
            .filter_map(|record| match serde_json::from_value(record) {
                Ok(payload) => Some(payload),
                Err(err) => {
                    undecodable += 1;
                    log::warn!("Skipping undecodable assignment record: {err}");
                    None
                }
            })
            .collect();

        Self::collect(payloads, undecodable)
    }

    /// Builds an index from decoded records.
    ///
    /// Tombstoned records are dropped first, then records that cannot be
    /// attributed to a client month. Neither case is an error.
    pub fn ingest<I>(payloads: I) -> Self
    where
        I: IntoIterator<Item = AssignmentPayload>,
    {
        Self::collect(payloads, 0)
    }

    fn collect<I>(payloads: I, mut skipped: usize) -> Self
    where
        I: IntoIterator<Item = AssignmentPayload>,
    {
        let mut records = Vec::new();

        for payload in payloads {
            if payload.is_removed() {
                continue;
            }
            match Assignment::try_from(payload) {
                Ok(assignment) => records.push(assignment),
                Err(err) => {
                    skipped += 1;
                    log::warn!("Skipping malformed assignment record: {err}");
                }
            }
        }

        if skipped > 0 {
            log::warn!("Ingested {} assignments, skipped {skipped}", records.len());
        }

        Self { records, skipped }
    }

    pub fn from_assignments(records: Vec<Assignment>) -> Self {
        Self {
            records,
            skipped: 0,
        }
    }

    pub fn records(&self) -> &[Assignment] {
        &self.records
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn roster(&self) -> Vec<ClientRosterEntry> {
        build_roster(&self.records)
    }

    pub fn grouped(&self) -> GroupedAssignments {
        group_assignments(&self.records)
    }

    pub fn snapshot(&self) -> AssignmentSnapshot {
        AssignmentSnapshot {
            roster: self.roster(),
            grouped: self.grouped(),
            skipped: self.skipped,
        }
    }

    pub fn client(&self, client_id: &ClientId) -> Option<&Client> {
        self.records
            .iter()
            .find(|record| record.client_id() == client_id)
            .map(|record| &record.client)
    }

    pub fn client_assignments(&self, client_id: &ClientId) -> Vec<Assignment> {
        select_client_assignments(&self.records, client_id)
    }

    pub fn has_month(&self, client_id: &ClientId, period: MonthKey) -> bool {
        self.records
            .iter()
            .any(|record| record.client_id() == client_id && record.period == period)
    }

    /// Assignments of one client month, ordered by task priority.
    pub fn month_assignments(&self, client_id: &ClientId, period: MonthKey) -> Vec<Assignment> {
        let mut assignments: Vec<Assignment> = self
            .records
            .iter()
            .filter(|record| record.client_id() == client_id && record.period == period)
            .cloned()
            .collect();
        assignments.sort_by_key(|assignment| assignment.task.priority());
        assignments
    }

    pub fn filtered(&self, filter: &AssignmentFilter) -> Vec<Assignment> {
        apply_filters(&self.records, filter)
    }

    pub fn filtered_grouped(&self, filter: &AssignmentFilter) -> GroupedAssignments {
        group_assignments(&self.filtered(filter))
    }

    pub fn find(&self, key: &AssignmentKey) -> Option<&Assignment> {
        self.records.iter().find(|record| record.matches_key(key))
    }

    /// Applies the toggle to every row sharing `key` and returns the updated
    /// record, or `None` when no row matches.
    pub fn toggle_accounting_done(
        &mut self,
        key: &AssignmentKey,
        now: DateTime<Utc>,
        actor: Option<&str>,
    ) -> Option<Assignment> {
        let mut updated = None;
        for record in self.records.iter_mut().filter(|record| record.matches_key(key)) {
            let next = toggle_accounting_done(record, now, actor);
            *record = next.clone();
            updated.get_or_insert(next);
        }
        updated
    }
}
