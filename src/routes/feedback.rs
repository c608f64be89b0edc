use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::dto::feedback::FeedbackQuery;
use crate::forms::feedback::FeedbackReviewedForm;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::HttpRepository;
use crate::routes::{base_context, mutation_error, page_error, redirect, render_template};
use crate::services::feedback::{load_feedback, mark_reviewed};

#[get("/feedback")]
pub async fn show_feedback(
    query: web::Query<FeedbackQuery>,
    user: AuthenticatedUser,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let page = match load_feedback(repo.get_ref(), &user, query.into_inner()).await {
        Ok(page) => page,
        Err(err) => return page_error(err, "/feedback"),
    };

    let mut context = base_context(
        &flash_messages,
        &user,
        "feedback",
        &server_config.auth_service_url,
    );
    context.insert("page", &page);

    render_template(&tera, "feedback/index.html", &context)
}

#[post("/feedback/reviewed")]
pub async fn feedback_reviewed(
    user: AuthenticatedUser,
    repo: web::Data<HttpRepository>,
    web::Form(form): web::Form<FeedbackReviewedForm>,
) -> impl Responder {
    match mark_reviewed(repo.get_ref(), &user, form).await {
        Ok(()) => {
            FlashMessage::success("Feedback marked as reviewed.").send();
            redirect("/feedback")
        }
        Err(err) => mutation_error(err, "/feedback"),
    }
}
