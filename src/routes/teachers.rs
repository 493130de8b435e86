use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::CurrentProfile;
use crate::domain::types::TeacherId;
use crate::forms::profile::TeacherProfileForm;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_not_found, render_template};
use crate::services::{ServiceError, teachers as teachers_service};

#[get("/teachers/{teacher_id}")]
pub async fn show_teacher(
    teacher_id: web::Path<i32>,
    profile: CurrentProfile,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(
        &flash_messages,
        Some(&profile.0),
        "teachers",
        &server_config.auth_service_url,
    );

    let Ok(teacher_id) = TeacherId::new(teacher_id.into_inner()) else {
        return render_not_found(&tera, &context);
    };

    match teachers_service::load_teacher_page(
        repo.get_ref(),
        &profile,
        teacher_id,
        &server_config.storage_public_url,
    ) {
        Ok(data) => {
            let mut context = context;
            context.insert("teacher", &data.listing);
            context.insert("reviews", &data.reviews);
            context.insert("total_reviews", &data.total_reviews);
            context.insert("is_favourite", &data.is_favourite);
            context.insert("can_review", &data.can_review);
            render_template(&tera, "teachers/show.html", &context)
        }
        Err(ServiceError::NotFound) => render_not_found(&tera, &context),
        Err(err) => {
            log::error!("Failed to load teacher page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/profile")]
pub async fn edit_profile(
    profile: CurrentProfile,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match teachers_service::load_edit_profile(repo.get_ref(), &profile) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                Some(&profile.0),
                "profile",
                &server_config.auth_service_url,
            );
            context.insert("profile", &data.profile);
            context.insert("teacher", &data.teacher);
            context.insert("subjects", &data.subjects);
            render_template(&tera, "teachers/edit.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Only teachers have a public profile.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to load profile editor: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/profile")]
pub async fn save_profile(
    profile: CurrentProfile,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<TeacherProfileForm>,
) -> impl Responder {
    match teachers_service::save_profile(repo.get_ref(), &profile, form) {
        Ok(teacher_id) => {
            FlashMessage::success("Profile saved.").send();
            redirect(&format!("/teachers/{teacher_id}"))
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Only teachers have a public profile.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/profile")
        }
        Err(err) => {
            log::error!("Failed to save profile: {err}");
            FlashMessage::error("Could not save the profile.").send();
            redirect("/profile")
        }
    }
}
