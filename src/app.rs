//! HTTP server wiring.

use actix_cors::Cors;
use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use tera::Tera;

use crate::db::establish_connection_pool;
use crate::domain::types::Role;
use crate::middleware::{RedirectUnauthorized, RequireRole};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::admin::{feature_teacher, show_dashboard};
use crate::routes::api::{list_listings, show_listing};
use crate::routes::favourites::{show_favourites, toggle_favourite};
use crate::routes::main::{logout, not_assigned, show_index};
use crate::routes::messages::{send_message, show_conversation, show_inbox};
use crate::routes::onboarding::{complete_onboarding, show_onboarding};
use crate::routes::reviews::add_review;
use crate::routes::teachers::{edit_profile, save_profile, show_teacher};

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    // Establish Diesel connection pool for the SQLite database.
    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;

    let repo = DieselRepository::new(pool);

    // Keys and stores for identity, sessions, and flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!("Listening on {}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        App::new()
            .wrap(RedirectUnauthorized)
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
            .service(not_assigned)
            .service(logout)
            .service(list_listings)
            .service(show_listing)
            .service(show_onboarding)
            .service(complete_onboarding)
            .service(
                web::scope("/admin")
                    .wrap(RequireRole::new([Role::Admin]))
                    .service(show_dashboard)
                    .service(feature_teacher),
            )
            .service(
                web::scope("")
                    .wrap(RequireRole::any())
                    .service(show_index)
                    .service(show_teacher)
                    .service(add_review)
                    .service(edit_profile)
                    .service(save_profile)
                    .service(show_inbox)
                    .service(show_conversation)
                    .service(send_message)
                    .service(show_favourites)
                    .service(toggle_favourite),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
