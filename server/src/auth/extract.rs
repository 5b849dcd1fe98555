//! Bearer-token request extractors.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use tracing::warn;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;
use crate::store::UserRole;

/// Identity extracted from a verified bearer token. Handlers that take this
/// extractor respond 401 to requests without one.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, ApiError>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

/// Identity guaranteed to carry the admin role; anything else gets 403.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl FromRequest for AdminUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, ApiError>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).and_then(|user| {
            if user.role == UserRole::Admin {
                Ok(AdminUser(user))
            } else {
                Err(ApiError::AdminOnly)
            }
        }))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthUser, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let Some(token) = token else {
        return Err(ApiError::Unauthorized("Not authorized, no token"));
    };

    // App state is registered at startup; a missing entry means the request
    // never reached a real application instance.
    let Some(state) = req.app_data::<web::Data<AppState>>() else {
        return Err(ApiError::Unauthorized("Not authorized, token failed"));
    };

    match state.jwt.verify(token) {
        Ok(claims) => Ok(AuthUser {
            id: claims.user_id,
            email: claims.email,
            role: claims.role,
        }),
        Err(e) => {
            warn!(error = %e, "Token verification failed");
            Err(ApiError::Unauthorized("Not authorized, token failed"))
        }
    }
}
