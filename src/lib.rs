//! Employee portal over an accounting backend: assigned clients, monthly
//! documents, work logs and client feedback.

#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod formatting;
#[cfg(feature = "data")]
pub mod index;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod state;

#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "server")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

/// Role granting access to the portal.
pub const SERVICE_ACCESS_ROLE: &str = "bookkeeping";

#[cfg(feature = "server")]
pub use server::run;

#[cfg(feature = "server")]
mod server {
    use std::time::Duration;

    use actix_cors::Cors;
    use actix_files::Files;
    use actix_identity::IdentityMiddleware;
    use actix_session::{SessionMiddleware, storage::CookieSessionStore};
    use actix_web::cookie::Key;
    use actix_web::{App, HttpServer, middleware, web};
    use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
    use tera::Tera;

    use crate::middleware::RedirectUnauthorized;
    use crate::models::config::ServerConfig;
    use crate::repository::HttpRepository;
    use crate::routes::api::{api_v1_assignments, api_v1_client_assignments, api_v1_toggle_status};
    use crate::routes::assignments::{
        clear_selection, close_preview, open_preview, select_client, select_month, select_task,
        show_index, update_status,
    };
    use crate::routes::documents::add_document_note;
    use crate::routes::feedback::{feedback_reviewed, show_feedback};
    use crate::routes::main::{logout, not_assigned};
    use crate::routes::register_filters;
    use crate::routes::work_logs::{add_entry, delete_entry, show_work_logs, update_entry};

    /// Builds and runs the Actix-Web HTTP server using the provided configuration.
    pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
        let repo = HttpRepository::new(
            &server_config.backend_url,
            Duration::from_secs(server_config.backend_timeout_secs),
        )
        .map_err(|e| std::io::Error::other(format!("Failed to build backend client: {e}")))?;
        log::info!("Forwarding backend calls to {}", repo.base_url());

        // Keys and stores for identity, sessions, and flash messages.
        let secret_key = Key::from(server_config.secret.as_bytes());

        let message_store = CookieMessageStore::builder(secret_key.clone()).build();
        let message_framework = FlashMessagesFramework::builder(message_store).build();

        let mut tera = Tera::new(&server_config.templates_dir)
            .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;
        register_filters(&mut tera);

        let bind_address = (server_config.address.clone(), server_config.port);

        HttpServer::new(move || {
            App::new()
                .wrap(Cors::permissive())
                .wrap(message_framework.clone())
                .wrap(IdentityMiddleware::default())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                        .cookie_secure(false) // set to true in prod
                        .cookie_domain(Some(format!(".{}", server_config.domain)))
                        .build(),
                )
                .wrap(middleware::Compress::default())
                .wrap(middleware::Logger::default())
                .service(Files::new("/assets", "./assets"))
                .service(
                    web::scope("/api")
                        .service(api_v1_assignments)
                        .service(api_v1_client_assignments)
                        .service(api_v1_toggle_status),
                )
                .service(
                    web::scope("")
                        .wrap(RedirectUnauthorized)
                        .service(not_assigned)
                        .service(show_index)
                        .service(select_client)
                        .service(select_month)
                        .service(select_task)
                        .service(open_preview)
                        .service(close_preview)
                        .service(clear_selection)
                        .service(update_status)
                        .service(add_document_note)
                        .service(show_work_logs)
                        .service(add_entry)
                        .service(update_entry)
                        .service(delete_entry)
                        .service(show_feedback)
                        .service(feedback_reviewed)
                        .service(logout),
                )
                .app_data(web::Data::new(tera.clone()))
                .app_data(web::Data::new(repo.clone()))
                .app_data(web::Data::new(server_config.clone()))
        })
        .bind(bind_address)?
        .run()
        .await
    }
}
