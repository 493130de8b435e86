use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::auth::CurrentProfile;
use crate::domain::avatar::normalize_avatar_url;
use crate::domain::types::ProfileId;
use crate::forms::messages::SendMessageForm;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_not_found, render_template};
use crate::services::{ServiceError, messages as messages_service};

#[derive(Deserialize)]
pub struct ConversationParams {
    page: Option<usize>,
}

#[get("/messages")]
pub async fn show_inbox(
    profile: CurrentProfile,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match messages_service::load_inbox(repo.get_ref(), &profile) {
        Ok(data) => {
            let avatars = data
                .conversations
                .iter()
                .map(|c| {
                    normalize_avatar_url(
                        c.counterpart.avatar_url.as_deref(),
                        &server_config.storage_public_url,
                    )
                })
                .collect::<Vec<_>>();

            let mut context = base_context(
                &flash_messages,
                Some(&profile.0),
                "messages",
                &server_config.auth_service_url,
            );
            context.insert("conversations", &data.conversations);
            context.insert("avatars", &avatars);
            context.insert("unread_total", &data.unread_total);
            render_template(&tera, "messages/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to load inbox: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/messages/{profile_id}")]
/// Shows the conversation, then clears its unread flags for the viewer.
pub async fn show_conversation(
    profile_id: web::Path<i32>,
    params: web::Query<ConversationParams>,
    profile: CurrentProfile,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(
        &flash_messages,
        Some(&profile.0),
        "messages",
        &server_config.auth_service_url,
    );

    let Ok(counterpart_id) = ProfileId::new(profile_id.into_inner()) else {
        return render_not_found(&tera, &context);
    };
    let page = params.page.unwrap_or(1);

    let data = match messages_service::load_conversation(repo.get_ref(), &profile, counterpart_id, page)
    {
        Ok(data) => data,
        Err(ServiceError::NotFound) => return render_not_found(&tera, &context),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            return redirect("/messages");
        }
        Err(err) => {
            log::error!("Failed to load conversation: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    if let Err(err) = messages_service::mark_conversation_read(repo.get_ref(), &profile, counterpart_id) {
        log::error!("Failed to mark conversation as read: {err}");
    }

    context.insert("counterpart", &data.counterpart);
    context.insert(
        "counterpart_avatar_url",
        &normalize_avatar_url(
            data.counterpart.avatar_url.as_deref(),
            &server_config.storage_public_url,
        ),
    );
    context.insert("messages", &data.messages);
    context.insert("total", &data.total);
    context.insert("page", &page.max(1));
    render_template(&tera, "messages/conversation.html", &context)
}

#[post("/messages/{profile_id}")]
pub async fn send_message(
    profile_id: web::Path<i32>,
    profile: CurrentProfile,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<SendMessageForm>,
) -> impl Responder {
    let profile_id = profile_id.into_inner();
    let Ok(counterpart_id) = ProfileId::new(profile_id) else {
        FlashMessage::error("Recipient not found.").send();
        return redirect("/messages");
    };
    let conversation_url = format!("/messages/{profile_id}");

    match messages_service::send_message(repo.get_ref(), &profile, counterpart_id, form) {
        Ok(_) => redirect(&conversation_url),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Recipient not found.").send();
            redirect("/messages")
        }
        Err(ServiceError::Form(message) | ServiceError::TypeConstraint(message)) => {
            FlashMessage::error(message).send();
            redirect(&conversation_url)
        }
        Err(err) => {
            log::error!("Failed to send message: {err}");
            FlashMessage::error("Could not send the message.").send();
            redirect(&conversation_url)
        }
    }
}
