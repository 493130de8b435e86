//! JSON listing API consumed by the find-teachers page.

use actix_web::{HttpRequest, HttpResponse, Responder, get, web};

use crate::domain::types::TeacherId;
use crate::dto::listings::{ApiError, ListingQuery};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::services::{ServiceError, listings as listings_service};

#[get("/listings")]
/// Paginated, filtered teacher listings wrapped in `{data, metadata}`.
pub async fn list_listings(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let query = match serde_html_form::from_str::<ListingQuery>(req.query_string()) {
        Ok(query) => query,
        Err(err) => {
            return HttpResponse::BadRequest()
                .json(ApiError::new(format!("invalid query parameters: {err}")));
        }
    };

    match listings_service::search_listings(
        repo.get_ref(),
        query,
        &server_config.storage_public_url,
    ) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => HttpResponse::InternalServerError().json(ApiError::new(err.to_string())),
    }
}

#[get("/listings/{id}")]
pub async fn show_listing(
    id: web::Path<String>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let Ok(id) = id.parse::<TeacherId>() else {
        return HttpResponse::BadRequest().json(ApiError::new("id must be a positive integer"));
    };

    match listings_service::get_listing(repo.get_ref(), id, &server_config.storage_public_url) {
        Ok(listing) => HttpResponse::Ok().json(listing),
        Err(ServiceError::NotFound) => {
            HttpResponse::NotFound().json(ApiError::new(format!("listing {id} not found")))
        }
        Err(err) => HttpResponse::InternalServerError().json(ApiError::new(err.to_string())),
    }
}
