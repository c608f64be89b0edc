use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::Utc;
use tera::Tera;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::assignment::{MonthKey, TaskKind};
use crate::domain::document::DocumentRef;
use crate::domain::types::ClientId;
use crate::dto::assignments::IndexQuery;
use crate::forms::assignments::{PreviewQuery, ToggleStatusForm};
use crate::formatting::month_label;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::HttpRepository;
use crate::routes::{
    base_context, load_portal_state, mutation_error, page_error, redirect, render_template,
    store_portal_state,
};
use crate::services::assignments::{load_index_page, toggle_status};
use crate::services::{ServiceResult, ensure_role};
use crate::state::{PortalState, StateError};

#[get("/")]
pub async fn show_index(
    query: web::Query<IndexQuery>,
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let state = load_portal_state(&session);

    let (page, state) = match load_index_page(repo.get_ref(), &user, state, query.into_inner()).await
    {
        Ok(result) => result,
        Err(err) => return page_error(err, "/"),
    };
    store_portal_state(&session, &state);

    let mut context = base_context(
        &flash_messages,
        &user,
        "index",
        &server_config.auth_service_url,
    );
    context.insert("page", &page);
    context.insert("state", &state);

    render_template(&tera, "main/index.html", &context)
}

/// Applies a navigation step to the session state and returns to the index.
fn navigate<F>(user: &AuthenticatedUser, session: &Session, step: F) -> HttpResponse
where
    F: FnOnce(PortalState) -> ServiceResult<Result<PortalState, StateError>>,
{
    if let Err(err) = ensure_role(user, SERVICE_ACCESS_ROLE) {
        return page_error(err, "/");
    }

    match step(load_portal_state(session)) {
        Ok(Ok(state)) => store_portal_state(session, &state),
        Ok(Err(err)) => {
            log::warn!("Ignored navigation step: {err}");
            FlashMessage::warning(format!("Cannot {}.", action_of(&err))).send();
        }
        Err(err) => return page_error(err, "/"),
    }
    redirect("/")
}

fn action_of(err: &StateError) -> &'static str {
    match err {
        StateError::InvalidTransition { action, .. } => *action,
    }
}

#[get("/clients/{client_id}")]
pub async fn select_client(
    path: web::Path<String>,
    user: AuthenticatedUser,
    session: Session,
) -> impl Responder {
    navigate(&user, &session, |state| {
        let client_id = ClientId::new(path.into_inner())?;
        Ok(Ok(state.select_client(client_id)))
    })
}

#[get("/clients/{client_id}/{year}/{month}")]
pub async fn select_month(
    path: web::Path<(String, i32, u32)>,
    user: AuthenticatedUser,
    session: Session,
) -> impl Responder {
    navigate(&user, &session, |state| {
        let (client_id, year, month) = path.into_inner();
        let client_id = ClientId::new(client_id)?;
        let period = MonthKey::try_new(year, month)?;
        Ok(state.select_client(client_id).select_month(period))
    })
}

#[get("/clients/{client_id}/{year}/{month}/tasks/{task}")]
pub async fn select_task(
    path: web::Path<(String, i32, u32, String)>,
    user: AuthenticatedUser,
    session: Session,
) -> impl Responder {
    navigate(&user, &session, |state| {
        let (client_id, year, month, task) = path.into_inner();
        let client_id = ClientId::new(client_id)?;
        let period = MonthKey::try_new(year, month)?;
        Ok(state
            .select_client(client_id)
            .select_month(period)
            .and_then(|state| state.select_task(TaskKind::from(task.as_str()))))
    })
}

#[get("/preview")]
pub async fn open_preview(
    query: web::Query<PreviewQuery>,
    user: AuthenticatedUser,
    session: Session,
) -> impl Responder {
    navigate(&user, &session, |state| {
        let document = DocumentRef::try_from(query.into_inner())?;
        Ok(state.open_preview(document))
    })
}

#[post("/preview/close")]
pub async fn close_preview(user: AuthenticatedUser, session: Session) -> impl Responder {
    navigate(&user, &session, |state| Ok(state.close_preview()))
}

#[post("/selection/clear")]
pub async fn clear_selection(user: AuthenticatedUser, session: Session) -> impl Responder {
    navigate(&user, &session, |state| Ok(Ok(state.clear())))
}

#[post("/assignments/status")]
pub async fn update_status(
    user: AuthenticatedUser,
    repo: web::Data<HttpRepository>,
    web::Form(form): web::Form<ToggleStatusForm>,
) -> impl Responder {
    match toggle_status(repo.get_ref(), &user, form, Utc::now()).await {
        Ok(assignment) => {
            let status = if assignment.status.is_done() {
                "done"
            } else {
                "pending"
            };
            FlashMessage::success(format!(
                "{} for {} marked as {status}.",
                assignment.task,
                month_label(&assignment.period)
            ))
            .send();
            redirect("/")
        }
        Err(err) => mutation_error(err, "/"),
    }
}
