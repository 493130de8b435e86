use actix_web::{Responder, post, web};
use actix_web_flash_messages::FlashMessage;

use crate::auth::CurrentProfile;
use crate::domain::types::TeacherId;
use crate::forms::reviews::ReviewForm;
use crate::repository::DieselRepository;
use crate::routes::redirect;
use crate::services::{ServiceError, reviews as reviews_service};

#[post("/teachers/{teacher_id}/reviews")]
pub async fn add_review(
    teacher_id: web::Path<i32>,
    profile: CurrentProfile,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ReviewForm>,
) -> impl Responder {
    let teacher_id = teacher_id.into_inner();
    let teacher_url = format!("/teachers/{teacher_id}");
    let Ok(id) = TeacherId::new(teacher_id) else {
        FlashMessage::error("Teacher not found.").send();
        return redirect("/");
    };

    match reviews_service::add_review(repo.get_ref(), &profile, id, form) {
        Ok(_) => {
            FlashMessage::success("Thank you for your review.").send();
            redirect(&teacher_url)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Only students and parents can leave reviews.").send();
            redirect(&teacher_url)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Teacher not found.").send();
            redirect("/")
        }
        Err(ServiceError::Form(message) | ServiceError::TypeConstraint(message)) => {
            FlashMessage::error(message).send();
            redirect(&teacher_url)
        }
        Err(err) => {
            log::error!("Failed to add review: {err}");
            FlashMessage::error("Could not save the review.").send();
            redirect(&teacher_url)
        }
    }
}
