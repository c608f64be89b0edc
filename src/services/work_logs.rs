//! Services behind the daily work log screen.

use chrono::NaiveDate;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::types::WorkLogId;
use crate::domain::work_log::{NewWorkLog, total_duration};
use crate::dto::work_logs::{WorkLogView, WorkLogsPageData, WorkLogsQuery};
use crate::formatting::format_duration;
use crate::forms::FormError;
use crate::forms::work_logs::{DeleteWorkLogForm, WorkLogForm, WorkLogSubmission, parse_date};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{WorkLogReader, WorkLogWriter};
use crate::services::{ServiceError, ServiceResult, ensure_role};

/// Lists one day's entries ordered by start time, with the day total.
pub async fn load_work_logs<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: WorkLogsQuery,
    today: NaiveDate,
) -> ServiceResult<WorkLogsPageData>
where
    R: WorkLogReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let date = match query.date.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => parse_date(value)?,
        None => today,
    };

    let mut logs = repo
        .list_work_logs(&user.token, date)
        .await
        .map_err(|err| {
            log::error!("Failed to load work logs for {date}: {err}");
            err
        })?;
    logs.retain(|log| log.date == date);
    logs.sort_by_key(|log| log.start_time);

    Ok(WorkLogsPageData {
        date,
        previous_date: date.pred_opt(),
        next_date: date.succ_opt(),
        total: format_duration(total_duration(&logs)),
        entries: logs.iter().map(WorkLogView::from).collect(),
    })
}

fn submission(form: WorkLogForm) -> ServiceResult<WorkLogSubmission> {
    WorkLogSubmission::try_from(form).map_err(|err| {
        log::error!("Failed to validate work log form: {err}");
        ServiceError::from(err)
    })
}

/// Creates an entry and returns it for the redirect back to its day.
pub async fn add_work_log<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: WorkLogForm,
) -> ServiceResult<NewWorkLog>
where
    R: WorkLogWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let log = submission(form)?.log;
    repo.create_work_log(&user.token, &log)
        .await
        .map_err(|err| {
            log::error!("Failed to add a work log: {err}");
            err
        })?;

    Ok(log)
}

pub async fn update_work_log<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: WorkLogForm,
) -> ServiceResult<NewWorkLog>
where
    R: WorkLogWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let WorkLogSubmission { id, log } = submission(form)?;
    let id = id.ok_or_else(|| ServiceError::from(FormError::InvalidId))?;

    repo.update_work_log(&user.token, id, &log)
        .await
        .map_err(|err| {
            log::error!("Failed to update work log {id}: {err}");
            err
        })?;

    Ok(log)
}

pub async fn delete_work_log<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: DeleteWorkLogForm,
) -> ServiceResult<()>
where
    R: WorkLogWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let id = WorkLogId::new(form.id)?;
    repo.delete_work_log(&user.token, id)
        .await
        .map_err(|err| {
            log::error!("Failed to delete work log {id}: {err}");
            err
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{ClientId, WorkDescription};
    use crate::domain::work_log::{WorkLog, parse_clock_time};
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{bookkeeper, outsider};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    fn entry(id: i64, start: &str, end: &str) -> WorkLog {
        WorkLog {
            id: WorkLogId::new(id).unwrap(),
            date: day(),
            client_id: Some(ClientId::new("C1").unwrap()),
            description: WorkDescription::new("Reconciliation").unwrap(),
            start_time: parse_clock_time(start).unwrap(),
            end_time: parse_clock_time(end).unwrap(),
        }
    }

    fn form(id: Option<i64>) -> WorkLogForm {
        WorkLogForm {
            id,
            date: "2024-03-04".to_string(),
            client_id: Some("C1".to_string()),
            description: "Payroll run".to_string(),
            start_time: "09:00".to_string(),
            end_time: "10:30".to_string(),
        }
    }

    #[actix_web::test]
    async fn lists_day_in_start_order_with_total() {
        let mut repo = MockRepository::new();
        repo.expect_list_work_logs()
            .withf(|token, date| token == "token-17" && *date == day())
            .returning(|_, _| Ok(vec![entry(2, "13:00", "14:15"), entry(1, "08:30", "10:00")]));

        let query = WorkLogsQuery {
            date: Some("2024-03-04".to_string()),
        };
        let page = load_work_logs(&repo, &bookkeeper(), query, day().succ_opt().unwrap())
            .await
            .unwrap();

        let ids: Vec<i64> = page.entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(page.entries[0].duration, "1h 30m");
        assert_eq!(page.total, "2h 45m");
        assert_eq!(page.previous_date, NaiveDate::from_ymd_opt(2024, 3, 3));
    }

    #[actix_web::test]
    async fn defaults_to_today() {
        let mut repo = MockRepository::new();
        repo.expect_list_work_logs()
            .withf(|_, date| *date == day())
            .returning(|_, _| Ok(Vec::new()));

        let page = load_work_logs(&repo, &bookkeeper(), WorkLogsQuery::default(), day())
            .await
            .unwrap();

        assert_eq!(page.date, day());
        assert!(page.entries.is_empty());
        assert_eq!(page.total, "0h 00m");
    }

    #[actix_web::test]
    async fn invalid_date_is_a_form_error() {
        let mut repo = MockRepository::new();
        repo.expect_list_work_logs().times(0);
        let query = WorkLogsQuery {
            date: Some("04/03/2024".to_string()),
        };

        let result = load_work_logs(&repo, &bookkeeper(), query, day()).await;

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[actix_web::test]
    async fn add_and_update_route_to_matching_calls() {
        let mut repo = MockRepository::new();
        repo.expect_create_work_log()
            .times(1)
            .returning(|_, _| Ok(()));
        repo.expect_update_work_log()
            .withf(|_, id, log| id.get() == 7 && log.duration().num_minutes() == 90)
            .times(1)
            .returning(|_, _, _| Ok(()));

        add_work_log(&repo, &bookkeeper(), form(None)).await.unwrap();
        update_work_log(&repo, &bookkeeper(), form(Some(7))).await.unwrap();
    }

    #[actix_web::test]
    async fn update_without_id_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_update_work_log().times(0);

        let result = update_work_log(&repo, &bookkeeper(), form(None)).await;

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[actix_web::test]
    async fn delete_requires_access_role() {
        let mut repo = MockRepository::new();
        repo.expect_delete_work_log().times(0);
        let form = DeleteWorkLogForm { id: 3, date: None };

        let result = delete_work_log(&repo, &outsider(), form).await;

        assert_eq!(result.unwrap_err(), ServiceError::Unauthorized);
    }
}
