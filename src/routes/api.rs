use actix_web::{HttpResponse, Responder, get, post, web};
use serde_json::json;

use crate::dto::assignments::IndexQuery;
use crate::forms::assignments::ToggleStatusForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::HttpRepository;
use crate::services::ServiceError;
use crate::services::assignments::{client_assignments, list_assignments, toggle_status};

/// JSON error body with a status matching the failure.
fn api_error(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => HttpResponse::Forbidden().finish(),
        ServiceError::SessionExpired => HttpResponse::Unauthorized().finish(),
        ServiceError::NotFound => HttpResponse::NotFound().json(json!({ "error": "not found" })),
        ServiceError::Form(message) | ServiceError::TypeConstraint(message) => {
            HttpResponse::BadRequest().json(json!({ "error": message }))
        }
        ServiceError::Rejected(message) => HttpResponse::Conflict().json(json!({ "error": message })),
        ServiceError::Internal(message) => {
            log::error!("API request failed: {message}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Roster and grouping of the assignments admitted by the query filters.
#[get("/v1/assignments")]
pub async fn api_v1_assignments(
    query: web::Query<IndexQuery>,
    user: AuthenticatedUser,
    repo: web::Data<HttpRepository>,
) -> impl Responder {
    match list_assignments(repo.get_ref(), &user, query.into_inner()).await {
        Ok(snapshot) => HttpResponse::Ok().json(snapshot),
        Err(err) => api_error(err),
    }
}

#[get("/v1/clients/{client_id}/assignments")]
pub async fn api_v1_client_assignments(
    path: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<HttpRepository>,
) -> impl Responder {
    match client_assignments(repo.get_ref(), &user, &path.into_inner()).await {
        Ok(assignments) => HttpResponse::Ok().json(assignments),
        Err(err) => api_error(err),
    }
}

/// Flips the accounting status and returns the updated assignment.
#[post("/v1/assignments/status")]
pub async fn api_v1_toggle_status(
    user: AuthenticatedUser,
    repo: web::Data<HttpRepository>,
    web::Json(form): web::Json<ToggleStatusForm>,
) -> impl Responder {
    match toggle_status(repo.get_ref(), &user, form, chrono::Utc::now()).await {
        Ok(assignment) => HttpResponse::Ok().json(assignment),
        Err(err) => api_error(err),
    }
}
