use actix_web::{Responder, post, web};
use actix_web_flash_messages::FlashMessage;

use crate::forms::documents::AddNoteForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::HttpRepository;
use crate::routes::{mutation_error, redirect};
use crate::services::documents::add_note;

#[post("/notes")]
pub async fn add_document_note(
    user: AuthenticatedUser,
    repo: web::Data<HttpRepository>,
    web::Form(form): web::Form<AddNoteForm>,
) -> impl Responder {
    match add_note(repo.get_ref(), &user, form).await {
        Ok(note) => {
            FlashMessage::success(format!("Note added to {}.", note.file_name)).send();
            redirect("/")
        }
        Err(err) => mutation_error(err, "/"),
    }
}
