//! Identity issued by the auth service and the profile resolved from it.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::dev::Payload;
use actix_web::error::ErrorUnauthorized;
use actix_web::{FromRequest, HttpMessage, HttpRequest, web};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::profile::Profile;
use crate::models::config::ServerConfig;

/// Claims of the HS256 token stored in the identity cookie.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub sub: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    pub exp: usize,
}

impl AuthenticatedUser {
    pub fn from_jwt(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let key = DecodingKey::from_secret(secret.as_bytes());
        let validation = Validation::new(Algorithm::HS256);
        Ok(decode::<Self>(token, &key, &validation)?.claims)
    }

    pub fn to_jwt(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let key = EncodingKey::from_secret(secret.as_bytes());
        encode(&Header::new(Algorithm::HS256), self, &key)
    }
}

/// Decodes the identity cookie of the request, if any.
///
/// Requires `web::Data<ServerConfig>` for the signing secret.
pub fn authenticate(req: &HttpRequest) -> Option<AuthenticatedUser> {
    let config = req.app_data::<web::Data<ServerConfig>>()?;
    let token = req.get_identity().ok()?.id().ok()?;

    match AuthenticatedUser::from_jwt(&token, &config.secret) {
        Ok(user) => Some(user),
        Err(err) => {
            log::warn!("Rejecting identity token: {err}");
            None
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req).ok_or_else(|| ErrorUnauthorized("unauthorized")))
    }
}

/// Profile of the signed-in user, attached by [`crate::middleware::RequireRole`].
#[derive(Debug, Clone)]
pub struct CurrentProfile(pub Profile);

impl CurrentProfile {
    pub fn into_inner(self) -> Profile {
        self.0
    }
}

impl std::ops::Deref for CurrentProfile {
    type Target = Profile;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for CurrentProfile {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<CurrentProfile>()
                .cloned()
                .ok_or_else(|| ErrorUnauthorized("profile required")),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "42".to_string(),
            email: "asha@example.com".to_string(),
            name: "Asha".to_string(),
            roles: vec![],
            exp: 4_102_444_800,
        }
    }

    #[test]
    fn jwt_round_trip() {
        let token = user().to_jwt(SECRET).unwrap();
        assert_eq!(AuthenticatedUser::from_jwt(&token, SECRET).unwrap(), user());
    }

    #[test]
    fn jwt_with_wrong_secret_is_rejected() {
        let token = user().to_jwt(SECRET).unwrap();
        assert!(AuthenticatedUser::from_jwt(&token, "another-secret").is_err());
    }

    #[test]
    fn expired_jwt_is_rejected() {
        let token = AuthenticatedUser { exp: 1, ..user() }.to_jwt(SECRET).unwrap();
        assert!(AuthenticatedUser::from_jwt(&token, SECRET).is_err());
    }
}
