use actix_identity::Identity;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::auth::CurrentProfile;
use crate::domain::listing::{SortField, SortOrder};
use crate::dto::listings::ListingQuery;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::listings as listings_service;
use crate::view::find_teachers::{DEBOUNCE, FilterState, PLACEHOLDER_COUNT};

#[get("/")]
/// Find-teachers page; the first page is rendered on the server.
pub async fn show_index(
    req: HttpRequest,
    profile: CurrentProfile,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let query = serde_html_form::from_str::<ListingQuery>(req.query_string()).unwrap_or_else(|err| {
        log::warn!("Ignoring malformed listing query: {err}");
        ListingQuery::default()
    });
    let filters = FilterState::from_query(&query);

    let mut context = base_context(
        &flash_messages,
        Some(&profile.0),
        "index",
        &server_config.auth_service_url,
    );
    context.insert("filters", &filters);
    context.insert("sort_fields", &[
        SortField::CreatedAt,
        SortField::Rating,
        SortField::HourlyRate,
        SortField::Name,
    ]);
    context.insert("sort_orders", &[SortOrder::Desc, SortOrder::Asc]);
    context.insert("placeholder_count", &PLACEHOLDER_COUNT);
    context.insert("debounce_ms", &DEBOUNCE.as_millis().to_string());

    match listings_service::search_listings(
        repo.get_ref(),
        filters.to_query(filters.page),
        &server_config.storage_public_url,
    ) {
        Ok(listings) => {
            if listings.metadata.has_more {
                match filters.query_string(listings.metadata.page.saturating_add(1)) {
                    Ok(next) => context.insert("next_page_query", &next),
                    Err(err) => log::error!("Failed to encode next page query: {err}"),
                }
            }
            context.insert("listings", &listings);
        }
        Err(err) => {
            context.insert("search_error", &err.to_string());
        }
    }

    render_template(&tera, "main/index.html", &context)
}

#[get("/na")]
pub async fn not_assigned(
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(
        &flash_messages,
        None,
        "na",
        &server_config.auth_service_url,
    );

    render_template(&tera, "main/not_assigned.html", &context)
}

#[post("/logout")]
pub async fn logout(user: Option<Identity>) -> HttpResponse {
    if let Some(user) = user {
        user.logout();
    }
    redirect("/")
}
