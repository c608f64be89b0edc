//! Services behind the assigned clients screen and its JSON API.

use chrono::{DateTime, Utc};

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::assignment::{Assignment, AssignmentKey, MonthKey, TaskKind};
use crate::domain::document::{AssignmentFiles, DocumentRef};
use crate::domain::types::ClientId;
use crate::dto::assignments::{
    AssignmentView, CategoryFilesView, IndexPageData, IndexQuery, PreviewView, SelectedClientView,
    SelectedMonthView, group_views,
};
use crate::forms::assignments::ToggleStatusForm;
use crate::formatting::month_label;
use crate::index::{
    AssignmentFilter, AssignmentIndex, AssignmentSnapshot, build_roster, group_assignments,
};
use crate::models::auth::AuthenticatedUser;
use crate::repository::errors::RepositoryError;
use crate::repository::{AssignmentReader, AssignmentWriter};
use crate::services::{ServiceError, ServiceResult, ensure_role};
use crate::state::{PortalState, Selection};

/// Fetches the employee's assignments and builds a fresh index from them.
pub async fn fetch_index<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<AssignmentIndex>
where
    R: AssignmentReader + ?Sized,
{
    let raw = repo.list_assignments(&user.token).await.map_err(|err| {
        log::error!("Failed to load assignments: {err}");
        err
    })?;
    Ok(AssignmentIndex::ingest_raw(raw))
}

async fn load_month<R>(
    repo: &R,
    user: &AuthenticatedUser,
    index: &AssignmentIndex,
    client_id: &ClientId,
    period: MonthKey,
    task: Option<&TaskKind>,
    preview: Option<&DocumentRef>,
) -> ServiceResult<SelectedMonthView>
where
    R: AssignmentReader + ?Sized,
{
    let files = match repo.get_assignment_files(&user.token, client_id, period).await {
        Ok(files) => files,
        Err(RepositoryError::NotFound) => AssignmentFiles::empty(client_id.clone(), period),
        Err(err) => {
            log::error!("Failed to load files of {client_id} for {period}: {err}");
            return Err(err.into());
        }
    };

    let preview = preview.and_then(|document| {
        files
            .find(document)
            .map(|file| PreviewView::new(&document.category, file.clone()))
    });
    let total_files = files.total_files();
    let categories = files
        .categories
        .into_iter()
        .map(|(category, documents)| CategoryFilesView::new(&category, documents))
        .collect();

    Ok(SelectedMonthView {
        period,
        year: period.year,
        month: period.month.get(),
        label: month_label(&period),
        task: task.cloned(),
        assignments: index
            .month_assignments(client_id, period)
            .into_iter()
            .map(AssignmentView::from)
            .collect(),
        categories,
        total_files,
        preview,
    })
}

async fn load_selection<R>(
    repo: &R,
    user: &AuthenticatedUser,
    index: &AssignmentIndex,
    selection: &Selection,
    preview: Option<&DocumentRef>,
) -> ServiceResult<Option<SelectedClientView>>
where
    R: AssignmentReader + ?Sized,
{
    let Some(client) = index.client(&selection.client_id).cloned() else {
        return Ok(None);
    };

    let month = match selection.period() {
        Some(period) => Some(
            load_month(
                repo,
                user,
                index,
                &selection.client_id,
                period,
                selection.task(),
                preview,
            )
            .await?,
        ),
        None => None,
    };

    Ok(Some(SelectedClientView {
        client,
        assignments: index
            .client_assignments(&selection.client_id)
            .into_iter()
            .map(AssignmentView::from)
            .collect(),
        month,
    }))
}

/// Loads the assigned clients screen and returns the reconciled state.
pub async fn load_index_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    state: PortalState,
    query: IndexQuery,
) -> ServiceResult<(IndexPageData, PortalState)>
where
    R: AssignmentReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let index = fetch_index(repo, user).await?;
    let mut state = state.reconcile(&index);

    let filter = AssignmentFilter::from(query);
    let roster = index.roster();
    let clients = group_views(&roster, index.filtered_grouped(&filter));

    let mut years: Vec<i32> = index.records().iter().map(|a| a.period.year).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();

    let selected = match state.selection() {
        Some(selection) => load_selection(repo, user, &index, selection, state.preview()).await?,
        None => None,
    };

    let preview_found = selected
        .as_ref()
        .and_then(|view| view.month.as_ref())
        .is_some_and(|month| month.preview.is_some());
    if state.preview().is_some() && !preview_found {
        log::info!("Previewed document is gone; closing the preview");
        state = state.close_preview().unwrap_or_default();
    }

    Ok((
        IndexPageData {
            roster,
            clients,
            skipped: index.skipped(),
            filter,
            years,
            selected,
        },
        state,
    ))
}

/// Flips the accounting status of one assignment.
///
/// The backend is updated first; the local record only changes once the
/// backend accepted the new value.
pub async fn toggle_status<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ToggleStatusForm,
    now: DateTime<Utc>,
) -> ServiceResult<Assignment>
where
    R: AssignmentReader + AssignmentWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let key = AssignmentKey::try_from(form)?;
    let mut index = fetch_index(repo, user).await?;

    let target = index
        .find(&key)
        .ok_or(ServiceError::NotFound)?
        .status
        .toggled();

    repo.set_accounting_status(&user.token, &key, target)
        .await
        .map_err(|err| {
            log::error!("Failed to update accounting status: {err}");
            err
        })?;

    index
        .toggle_accounting_done(&key, now, Some(&user.name))
        .ok_or(ServiceError::NotFound)
}

/// Roster and grouping of the records admitted by the query filters.
pub async fn list_assignments<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: IndexQuery,
) -> ServiceResult<AssignmentSnapshot>
where
    R: AssignmentReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let index = fetch_index(repo, user).await?;
    let filtered = index.filtered(&AssignmentFilter::from(query));

    Ok(AssignmentSnapshot {
        roster: build_roster(&filtered),
        grouped: group_assignments(&filtered),
        skipped: index.skipped(),
    })
}

/// Assignments of one client, most relevant first.
pub async fn client_assignments<R>(
    repo: &R,
    user: &AuthenticatedUser,
    client_id: &str,
) -> ServiceResult<Vec<Assignment>>
where
    R: AssignmentReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let client_id = ClientId::new(client_id)?;
    let index = fetch_index(repo, user).await?;

    if index.client(&client_id).is_none() {
        return Err(ServiceError::NotFound);
    }
    Ok(index.client_assignments(&client_id))
}
