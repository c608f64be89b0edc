use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::{Local, NaiveDate};
use tera::Tera;

use crate::dto::work_logs::WorkLogsQuery;
use crate::forms::work_logs::{DATE_FORMAT, DeleteWorkLogForm, WorkLogForm, parse_date};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::HttpRepository;
use crate::routes::{base_context, mutation_error, page_error, redirect, render_template};
use crate::services::work_logs::{add_work_log, delete_work_log, load_work_logs, update_work_log};

fn day_url(date: NaiveDate) -> String {
    format!("/work-logs?date={}", date.format(DATE_FORMAT))
}

/// Page of the day named by a submitted form, or today's page when the value
/// does not parse.
fn return_url(date: Option<&str>) -> String {
    match date.map(parse_date) {
        Some(Ok(date)) => day_url(date),
        _ => "/work-logs".to_string(),
    }
}

#[get("/work-logs")]
pub async fn show_work_logs(
    query: web::Query<WorkLogsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let today = Local::now().date_naive();
    let page = match load_work_logs(repo.get_ref(), &user, query.into_inner(), today).await {
        Ok(page) => page,
        Err(err) => return page_error(err, "/work-logs"),
    };

    let mut context = base_context(
        &flash_messages,
        &user,
        "work_logs",
        &server_config.auth_service_url,
    );
    context.insert("page", &page);
    context.insert("today", &today);

    render_template(&tera, "work_logs/index.html", &context)
}

#[post("/work-logs/add")]
pub async fn add_entry(
    user: AuthenticatedUser,
    repo: web::Data<HttpRepository>,
    web::Form(form): web::Form<WorkLogForm>,
) -> impl Responder {
    let back_to = return_url(Some(form.date.as_str()));
    match add_work_log(repo.get_ref(), &user, form).await {
        Ok(log) => {
            FlashMessage::success("Work log added.").send();
            redirect(&day_url(log.date))
        }
        Err(err) => mutation_error(err, &back_to),
    }
}

#[post("/work-logs/update")]
pub async fn update_entry(
    user: AuthenticatedUser,
    repo: web::Data<HttpRepository>,
    web::Form(form): web::Form<WorkLogForm>,
) -> impl Responder {
    let back_to = return_url(Some(form.date.as_str()));
    match update_work_log(repo.get_ref(), &user, form).await {
        Ok(log) => {
            FlashMessage::success("Work log updated.").send();
            redirect(&day_url(log.date))
        }
        Err(err) => mutation_error(err, &back_to),
    }
}

#[post("/work-logs/delete")]
pub async fn delete_entry(
    user: AuthenticatedUser,
    repo: web::Data<HttpRepository>,
    web::Form(form): web::Form<DeleteWorkLogForm>,
) -> impl Responder {
    let back_to = return_url(form.date.as_deref());
    match delete_work_log(repo.get_ref(), &user, form).await {
        Ok(()) => {
            FlashMessage::success("Work log deleted.").send();
            redirect(&back_to)
        }
        Err(err) => mutation_error(err, &back_to),
    }
}
