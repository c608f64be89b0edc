//! HTTP handlers and the helpers they share.

use std::collections::HashMap;

use actix_session::Session;
use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use tera::{Context, Tera, Value};

use crate::domain::assignment::MonthKey;
use crate::formatting::{format_file_size, format_phone, month_label};
use crate::models::auth::AuthenticatedUser;
use crate::services::ServiceError;
use crate::state::{PORTAL_STATE_KEY, PortalState};

pub mod api;
pub mod assignments;
pub mod documents;
pub mod feedback;
pub mod main;
pub mod work_logs;

/// Bootstrap alert class of a flash message level.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// Context shared by every page: alerts, the signed in user, the active
/// navigation item and the link back to the auth service.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    current_page: &str,
    home_url: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", user);
    context.insert("current_page", current_page);
    context.insert("home_url", home_url);
    context
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Maps a failed page load to a response.
///
/// An expired session answers 401 so that the unauthorized redirect sends the
/// employee back to sign in.
pub fn page_error(err: ServiceError, fallback: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => redirect("/na"),
        ServiceError::SessionExpired => HttpResponse::Unauthorized().finish(),
        ServiceError::Form(message) | ServiceError::TypeConstraint(message) => {
            FlashMessage::error(message).send();
            redirect(fallback)
        }
        other => {
            log::error!("Failed to load page: {other}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Maps a failed mutation to a flash message and a redirect to `back_to`.
pub fn mutation_error(err: ServiceError, back_to: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => redirect("/na"),
        ServiceError::SessionExpired => HttpResponse::Unauthorized().finish(),
        ServiceError::NotFound => {
            FlashMessage::error("The record no longer exists.").send();
            redirect(back_to)
        }
        ServiceError::Rejected(message) => {
            FlashMessage::error(message).send();
            redirect(back_to)
        }
        ServiceError::Form(message) | ServiceError::TypeConstraint(message) => {
            FlashMessage::error(format!("Invalid input: {message}")).send();
            redirect(back_to)
        }
        ServiceError::Internal(message) => {
            log::error!("Mutation failed: {message}");
            FlashMessage::error("The accounting service is unavailable. Try again later.").send();
            redirect(back_to)
        }
    }
}

/// Navigation state of the current session; idle when absent or unreadable.
pub fn load_portal_state(session: &Session) -> PortalState {
    session
        .get::<PortalState>(PORTAL_STATE_KEY)
        .unwrap_or_else(|err| {
            log::warn!("Discarding unreadable portal state: {err}");
            None
        })
        .unwrap_or_default()
}

pub fn store_portal_state(session: &Session, state: &PortalState) {
    if let Err(err) = session.insert(PORTAL_STATE_KEY, state) {
        log::error!("Failed to store portal state: {err}");
    }
}

fn filesize_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let bytes = value
        .as_u64()
        .ok_or_else(|| tera::Error::msg("filesize expects a byte count"))?;
    Ok(Value::String(format_file_size(bytes)))
}

fn phone_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    match value.as_str() {
        Some(phone) => Ok(Value::String(format_phone(phone))),
        None => Ok(value.clone()),
    }
}

fn month_label_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let period = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("month_label expects a \"year-month\" string"))?
        .parse::<MonthKey>()
        .map_err(|err| tera::Error::msg(err.to_string()))?;
    Ok(Value::String(month_label(&period)))
}

/// Registers the formatting filters used by the templates.
pub fn register_filters(tera: &mut Tera) {
    tera.register_filter("filesize", filesize_filter);
    tera.register_filter("phone", phone_filter);
    tera.register_filter("month_label", month_label_filter);
}
