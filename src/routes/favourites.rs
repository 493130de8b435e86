use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::CurrentProfile;
use crate::domain::types::TeacherId;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, favourites as favourites_service};

#[get("/favourites")]
pub async fn show_favourites(
    profile: CurrentProfile,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match favourites_service::list_favourites(
        repo.get_ref(),
        &profile,
        &server_config.storage_public_url,
    ) {
        Ok(listings) => {
            let mut context = base_context(
                &flash_messages,
                Some(&profile.0),
                "favourites",
                &server_config.auth_service_url,
            );
            context.insert("listings", &listings);
            render_template(&tera, "favourites/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Favourites are available to students and parents.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list favourites: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/favourites/{teacher_id}")]
pub async fn toggle_favourite(
    teacher_id: web::Path<i32>,
    profile: CurrentProfile,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let teacher_id = teacher_id.into_inner();
    let teacher_url = format!("/teachers/{teacher_id}");
    let Ok(id) = TeacherId::new(teacher_id) else {
        FlashMessage::error("Teacher not found.").send();
        return redirect("/");
    };

    match favourites_service::toggle_favourite(repo.get_ref(), &profile, id) {
        Ok(true) => {
            FlashMessage::success("Added to favourites.").send();
            redirect(&teacher_url)
        }
        Ok(false) => {
            FlashMessage::info("Removed from favourites.").send();
            redirect(&teacher_url)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Favourites are available to students and parents.").send();
            redirect(&teacher_url)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Teacher not found.").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to toggle favourite: {err}");
            FlashMessage::error("Could not update favourites.").send();
            redirect(&teacher_url)
        }
    }
}
