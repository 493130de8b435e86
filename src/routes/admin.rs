//! Admin dashboard; the scope is wrapped in `RequireRole` for admins.

use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::CurrentProfile;
use crate::forms::admin::{FeatureTeacherForm, MAX_FEATURED_DAYS};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, admin as admin_service};

#[get("")]
pub async fn show_dashboard(
    profile: CurrentProfile,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match admin_service::load_dashboard(repo.get_ref(), &profile) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                Some(&profile.0),
                "admin",
                &server_config.auth_service_url,
            );
            context.insert("stats", &data.stats);
            context.insert("total_profiles", &data.total_profiles);
            context.insert("max_featured_days", &MAX_FEATURED_DAYS);
            render_template(&tera, "admin/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to load dashboard: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/featured")]
pub async fn feature_teacher(
    profile: CurrentProfile,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<FeatureTeacherForm>,
) -> impl Responder {
    match admin_service::feature_teacher(repo.get_ref(), &profile, form) {
        Ok(teacher) => {
            let message = match teacher.featured_until {
                Some(until) => format!("Teacher {} featured until {}.", teacher.id, until.date()),
                None => format!("Promotion of teacher {} cleared.", teacher.id),
            };
            FlashMessage::success(message).send();
            redirect("/admin")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Teacher not found.").send();
            redirect("/admin")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/admin")
        }
        Err(err) => {
            log::error!("Failed to feature teacher: {err}");
            FlashMessage::error("Could not update the promotion.").send();
            redirect("/admin")
        }
    }
}
