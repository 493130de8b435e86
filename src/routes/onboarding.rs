use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::domain::types::Role;
use crate::forms::onboarding::OnboardingForm;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, onboarding as onboarding_service};

#[get("/onboarding")]
pub async fn show_onboarding(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match onboarding_service::find_profile(repo.get_ref(), &user) {
        Ok(Some(_)) => redirect("/"),
        Ok(None) => {
            let mut context = base_context(
                &flash_messages,
                None,
                "onboarding",
                &server_config.auth_service_url,
            );
            context.insert("user", &user);
            context.insert("roles", &[Role::Student, Role::Parent, Role::Teacher]);
            render_template(&tera, "onboarding/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to load onboarding page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/onboarding")]
pub async fn complete_onboarding(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<OnboardingForm>,
) -> impl Responder {
    match onboarding_service::complete_onboarding(repo.get_ref(), &user, form) {
        Ok(profile) => {
            FlashMessage::success(format!("Welcome, {}!", profile.name)).send();
            if profile.role == Role::Teacher {
                redirect("/profile")
            } else {
                redirect("/")
            }
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/onboarding")
        }
        Err(err) => {
            log::error!("Failed to complete onboarding: {err}");
            FlashMessage::error("Could not create your profile.").send();
            redirect("/onboarding")
        }
    }
}
