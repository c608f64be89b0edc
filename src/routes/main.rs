use actix_identity::Identity;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::routes::{base_context, redirect, render_template};

/// Shown to signed in users without access to the portal.
#[get("/na")]
pub async fn not_assigned(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(
        &flash_messages,
        &user,
        "na",
        &server_config.auth_service_url,
    );

    render_template(&tera, "main/not_assigned.html", &context)
}

/// Drops the identity together with the session, portal state included.
#[post("/logout")]
pub async fn logout(user: Identity) -> impl Responder {
    user.logout();
    redirect("/")
}
