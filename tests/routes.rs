use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use actix_web_flash_messages::{FlashMessagesFramework, Level, storage::CookieMessageStore};
use tera::Tera;

use pushkind_tutors::domain::types::Role;
use pushkind_tutors::middleware::RequireRole;
use pushkind_tutors::routes::alert_level_to_str;
use pushkind_tutors::routes::main::{not_assigned, show_index};

mod common;

#[::core::prelude::v1::test]
fn test_alert_level_to_str_mappings() {
    assert_eq!(alert_level_to_str(&Level::Error), "danger");
    assert_eq!(alert_level_to_str(&Level::Warning), "warning");
    assert_eq!(alert_level_to_str(&Level::Success), "success");
    assert_eq!(alert_level_to_str(&Level::Info), "info");
    assert_eq!(alert_level_to_str(&Level::Debug), "info");
}

macro_rules! page_app {
    ($test_db:expr) => {{
        let key = Key::from(common::SECRET.as_bytes());
        let flash = FlashMessagesFramework::builder(CookieMessageStore::builder(key.clone()).build())
            .build();
        let tera = Tera::new("templates/**/*").expect("templates compile");
        test::init_service(
            App::new()
                .wrap(flash)
                .wrap(IdentityMiddleware::default())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), key)
                        .cookie_secure(false)
                        .build(),
                )
                .app_data(web::Data::new(tera))
                .app_data(web::Data::new(common::server_config()))
                .app_data(web::Data::new($test_db.repo()))
                .route("/login/{sub}", web::get().to(common::login))
                .service(not_assigned)
                .service(web::scope("").wrap(RequireRole::any()).service(show_index)),
        )
        .await
    }};
}

#[actix_web::test]
async fn find_teachers_page_renders_first_page() {
    let test_db = common::TestDb::new("find_teachers_page_renders_first_page.db");
    let repo = test_db.repo();
    common::create_profile(&repo, "sam", Role::Student, "Sam");
    for i in 0..12 {
        common::create_teacher(
            &repo,
            &format!("t{i}"),
            &format!("Teacher {i:02}"),
            "Maths tutor",
            "Delhi",
            &["Math"],
        );
    }
    let app = page_app!(test_db);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/login/sam").to_request(),
    )
    .await;
    let cookie = resp
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "id")
        .map(Cookie::into_owned)
        .expect("session cookie");

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/?subject=Math&sort=name&order=asc")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    let html = std::str::from_utf8(&body).unwrap();
    assert!(html.contains("Teacher 00"));
    assert!(html.contains("Teacher 09"));
    assert!(!html.contains("Teacher 10"));
    assert!(html.contains("Showing 10 of 12 teachers"));
    assert!(html.contains("subject=Math&amp;page=2&amp;limit=10&amp;sort=name&amp;order=asc"));
}

#[actix_web::test]
async fn find_teachers_page_requires_sign_in() {
    let test_db = common::TestDb::new("find_teachers_page_requires_sign_in.db");
    let app = page_app!(test_db);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "http://auth.localhost/signin"
    );
}

#[actix_web::test]
async fn not_assigned_page_renders_for_anonymous_users() {
    let test_db = common::TestDb::new("not_assigned_page_renders_for_anonymous_users.db");
    let app = page_app!(test_db);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/na").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert!(std::str::from_utf8(&body).unwrap().contains("No access"));
}
