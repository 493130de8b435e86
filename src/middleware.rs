//! Authorization gates wrapped around route scopes.

use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::{StatusCode, header};
use actix_web::{Error, HttpMessage, HttpResponse, web};

use crate::auth::{CurrentProfile, authenticate};
use crate::domain::profile::Profile;
use crate::domain::types::Role;
use crate::models::config::ServerConfig;
use crate::repository::{DieselRepository, ProfileReader};

/// Fallback sign-in location when no configuration is registered.
pub const DEFAULT_SIGNIN_URL: &str = "/auth/signin";
pub const ONBOARDING_URL: &str = "/onboarding";
pub const NOT_ASSIGNED_URL: &str = "/na";

type LocalBoxFuture<T> = Pin<Box<dyn Future<Output = T>>>;

fn signin_url(req: &ServiceRequest) -> String {
    req.app_data::<web::Data<ServerConfig>>()
        .map(|config| config.auth_service_url.clone())
        .unwrap_or_else(|| DEFAULT_SIGNIN_URL.to_string())
}

fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Outcome of matching a resolved profile against the allowed roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Allow,
    Onboard,
    Deny,
}

pub fn gate(profile: Option<&Profile>, allowed: &[Role]) -> Gate {
    match profile {
        None => Gate::Onboard,
        Some(profile) if allowed.contains(&profile.role) => Gate::Allow,
        Some(_) => Gate::Deny,
    }
}

/// Turns `401 Unauthorized` responses into a redirect to the sign-in page.
#[derive(Clone, Copy, Default)]
pub struct RedirectUnauthorized;

impl<S, B> Transform<S, ServiceRequest> for RedirectUnauthorized
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RedirectUnauthorizedMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RedirectUnauthorizedMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RedirectUnauthorizedMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RedirectUnauthorizedMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let location = signin_url(&req);
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let res = service.call(req).await?;
            if res.status() == StatusCode::UNAUTHORIZED {
                let (req, _) = res.into_parts();
                let redirect = see_other(&location).map_into_right_body();
                return Ok(ServiceResponse::new(req, redirect));
            }
            Ok(res.map_into_left_body())
        })
    }
}

/// Lets a request through only when the signed-in user's profile has one
/// of the allowed roles.
///
/// No identity redirects to the sign-in page, a missing profile to
/// onboarding, and any other role to `/na`. On success the profile is
/// stored in the request extensions as [`CurrentProfile`].
#[derive(Clone)]
pub struct RequireRole {
    allowed: Rc<[Role]>,
}

impl RequireRole {
    pub fn new(allowed: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }

    /// Any onboarded user.
    pub fn any() -> Self {
        Self::new([Role::Student, Role::Parent, Role::Teacher, Role::Admin])
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            allowed: Rc::clone(&self.allowed),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    allowed: Rc<[Role]>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let Some(user) = authenticate(req.request()) else {
            let location = signin_url(&req);
            return Box::pin(async move {
                Ok(req.into_response(see_other(&location).map_into_right_body()))
            });
        };

        let profile = match req.app_data::<web::Data<DieselRepository>>() {
            Some(repo) => repo.get_profile_by_sub(&user.sub),
            None => {
                log::error!("Repository is not registered for the role gate");
                return Box::pin(async move {
                    Ok(req.into_response(
                        HttpResponse::InternalServerError()
                            .finish()
                            .map_into_right_body(),
                    ))
                });
            }
        };

        let profile = match profile {
            Ok(profile) => profile,
            Err(err) => {
                log::error!("Failed to load profile for {}: {err}", user.sub);
                return Box::pin(async move {
                    Ok(req.into_response(
                        HttpResponse::InternalServerError()
                            .finish()
                            .map_into_right_body(),
                    ))
                });
            }
        };

        match gate(profile.as_ref(), &self.allowed) {
            Gate::Allow => {}
            Gate::Onboard => {
                return Box::pin(async move {
                    Ok(req.into_response(see_other(ONBOARDING_URL).map_into_right_body()))
                });
            }
            Gate::Deny => {
                return Box::pin(async move {
                    Ok(req.into_response(see_other(NOT_ASSIGNED_URL).map_into_right_body()))
                });
            }
        }

        if let Some(profile) = profile {
            req.extensions_mut().insert(CurrentProfile(profile));
        }
        let service = Rc::clone(&self.service);
        Box::pin(async move { Ok(service.call(req).await?.map_into_left_body()) })
    }
}
