#![allow(dead_code)]

use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, web};
use chrono::{Duration, Utc};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pushkind_tutors::auth::AuthenticatedUser;
use pushkind_tutors::db::{DbPool, establish_connection_pool};
use pushkind_tutors::domain::profile::{NewProfile, Profile};
use pushkind_tutors::domain::teacher::{NewTeacher, TeacherRecord};
use pushkind_tutors::domain::types::{DisplayName, Email, Role, Subject};
use pushkind_tutors::models::config::ServerConfig;
use pushkind_tutors::repository::{DieselRepository, ProfileWriter, TeacherReader};
use tempfile::TempDir;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Migrated SQLite database living in a temporary directory.
pub struct TestDb {
    pool: DbPool,
    _dir: TempDir,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(name);
        let pool = establish_connection_pool(path.to_str().expect("utf-8 path"))
            .expect("build pool");

        let mut conn = pool.get().expect("get connection");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("run migrations");

        Self { pool, _dir: dir }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

pub fn new_profile(sub: &str, role: Role, name: &str) -> NewProfile {
    NewProfile::new(
        sub,
        role,
        DisplayName::new(name).expect("valid name"),
        Email::new(format!("{sub}@example.com")).expect("valid email"),
        None,
    )
}

pub fn create_profile(repo: &DieselRepository, sub: &str, role: Role, name: &str) -> Profile {
    repo.create_profile(&new_profile(sub, role, name))
        .expect("create profile")
}

/// Creates a teacher profile with the given listing details.
pub fn create_teacher(
    repo: &DieselRepository,
    sub: &str,
    name: &str,
    headline: &str,
    location: &str,
    subjects: &[&str],
) -> TeacherRecord {
    let mut teacher = NewTeacher::new(headline, location);
    teacher.subjects = subjects
        .iter()
        .map(|s| Subject::new(s).expect("valid subject"))
        .collect();

    let profile = repo
        .create_teacher_profile(&new_profile(sub, Role::Teacher, name), &teacher)
        .expect("create teacher profile");
    repo.get_teacher_by_profile(profile.id)
        .expect("load teacher")
        .expect("teacher exists")
}

pub fn days_from_now(days: i64) -> chrono::NaiveDateTime {
    Utc::now().naive_utc() + Duration::days(days)
}

pub const SECRET: &str = "test-secret-test-secret-test-secret-test-secret-test-secret-0000";

pub fn server_config() -> ServerConfig {
    ServerConfig {
        domain: "localhost".into(),
        address: "127.0.0.1".into(),
        port: 8080,
        database_url: ":memory:".into(),
        templates_dir: "templates/**/*".into(),
        secret: SECRET.into(),
        auth_service_url: "http://auth.localhost/signin".into(),
        storage_public_url: "https://cdn.example.com/avatars".into(),
    }
}

/// Signs a session token for `sub` the way the auth service does.
pub fn token_for(sub: &str) -> String {
    AuthenticatedUser {
        sub: sub.to_string(),
        email: format!("{sub}@example.com"),
        name: sub.to_string(),
        roles: Vec::new(),
        exp: (Utc::now().timestamp() + 3600) as usize,
    }
    .to_jwt(SECRET)
    .expect("sign token")
}

/// Test-only handler that stores a token for `/login/{sub}` in the session.
pub async fn login(req: HttpRequest, sub: web::Path<String>) -> HttpResponse {
    match Identity::login(&req.extensions(), token_for(&sub)) {
        Ok(_) => HttpResponse::Ok().finish(),
        Err(_) => HttpResponse::InternalServerError().finish(),
    }
}
