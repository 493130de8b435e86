//! Configuration model loaded from external sources.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub database_url: String,
    pub templates_dir: String,
    /// HS256 secret shared with the auth service; also keys the cookies.
    pub secret: String,
    /// Sign-in page of the auth service.
    pub auth_service_url: String,
    /// Public base URL of the avatar storage bucket.
    #[serde(default)]
    pub storage_public_url: String,
}
