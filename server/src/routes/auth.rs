//! Registration, login, and profile routes.

use actix_web::{get, post, web, HttpResponse, Scope};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::{StoreError, User, UserRole, UserStore};

/// bcrypt work factor, matching the original service.
const BCRYPT_COST: u32 = 12;

pub fn scope() -> Scope {
    web::scope("/auth")
        .service(register)
        .service(login)
        .service(profile)
}

#[derive(Debug, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.split('.').count() >= 2
                && domain.split('.').all(|part| !part.is_empty())
        }
        None => false,
    }
}

fn auth_body(message: &str, token: String, user: &User) -> serde_json::Value {
    json!({
        "success": true,
        "message": message,
        "data": {
            "token": token,
            "email": user.email,
            "userId": user.id,
        },
    })
}

/// Register a new user and issue a token.
#[post("/register")]
async fn register(
    state: web::Data<AppState>,
    body: web::Json<Credentials>,
) -> Result<HttpResponse, ApiError> {
    let Credentials { email, password } = body.into_inner();

    if !is_valid_email(&email) {
        return Err(ApiError::Validation("Valid email is required".to_string()));
    }
    if password.len() < 6 {
        return Err(ApiError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    let email = email.to_lowercase();
    let existing = state
        .users
        .find_by_email(&email)
        .await
        .map_err(ApiError::store("Internal server error during registration"))?;
    if existing.is_some() {
        return Err(ApiError::Validation("Email is already registered".to_string()));
    }

    let password_hash = web::block(move || bcrypt::hash(&password, BCRYPT_COST)).await??;

    let user = match state.users.create(&email, &password_hash, UserRole::User).await {
        Ok(user) => user,
        // Lost the race against a concurrent registration for the same email.
        Err(StoreError::Duplicate) => {
            return Err(ApiError::Validation("Email is already registered".to_string()))
        }
        Err(source) => {
            return Err(ApiError::Store {
                context: "Internal server error during registration",
                source,
            })
        }
    };

    let token = state.jwt.issue(user.id, &user.email, user.user_role())?;
    info!(email = %user.email, "User registered");

    Ok(HttpResponse::Created().json(auth_body("User registered successfully", token, &user)))
}

/// Log in an existing user and issue a token.
#[post("/login")]
async fn login(
    state: web::Data<AppState>,
    body: web::Json<Credentials>,
) -> Result<HttpResponse, ApiError> {
    let Credentials { email, password } = body.into_inner();

    if !is_valid_email(&email) {
        return Err(ApiError::Validation("Valid email is required".to_string()));
    }
    if password.is_empty() {
        return Err(ApiError::Validation("Password is required".to_string()));
    }

    let email = email.to_lowercase();
    let Some(user) = state
        .users
        .find_by_email(&email)
        .await
        .map_err(ApiError::store("Internal server error during login"))?
    else {
        return Err(ApiError::Unauthorized("Invalid email or password"));
    };

    let stored_hash = user.password_hash.clone();
    let matches = web::block(move || bcrypt::verify(&password, &stored_hash)).await??;
    if !matches {
        return Err(ApiError::Unauthorized("Invalid email or password"));
    }

    let token = state.jwt.issue(user.id, &user.email, user.user_role())?;

    Ok(HttpResponse::Ok().json(auth_body("Login successful", token, &user)))
}

/// Profile of the authenticated user.
#[get("/profile")]
async fn profile(user: AuthUser) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "id": user.id, "email": user.email }))
}
