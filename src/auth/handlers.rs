use axum::{
    extract::{FromRef, State},
    routing::post,
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, instrument, warn};

use crate::auth::dto::{LoginRequest, LoginResponse, PublicUser, SignupRequest, SignupResponse};
use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo::User;
use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// A duplicate email or phone is a client error; everything else from the
/// insert is a server error.
fn map_create_error(e: sqlx::Error) -> ApiError {
    match e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            warn!("signup hit unique constraint");
            ApiError::BadRequest("Email or phone is already registered".into())
        }
        e => {
            error!(error = %e, "create user failed");
            ApiError::Internal(e.to_string())
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(mut payload): Json<SignupRequest>,
) -> Result<Json<SignupResponse>, ApiError> {
    if let Some(email) = payload.email.as_mut() {
        *email = email.trim().to_lowercase();
        if email.is_empty() {
            payload.email = None;
        }
    }

    if payload.email.is_none() && payload.phone.is_none() {
        warn!("signup without email or phone");
        return Err(ApiError::BadRequest(
            "Either email or phone must be provided.".into(),
        ));
    }

    if let Some(email) = payload.email.as_deref() {
        if !is_valid_email(email) {
            warn!(%email, "invalid email");
            return Err(ApiError::BadRequest("Invalid email".into()));
        }
    }

    let hash = hash_password(&payload.password).map_err(|e| {
        error!(error = %e, "hash_password failed");
        ApiError::Internal(e.to_string())
    })?;

    let user_id = User::create(
        &state.db,
        &payload.name,
        payload.email.as_deref(),
        payload.phone.as_deref(),
        &hash,
    )
    .await
    .map_err(map_create_error)?;

    info!(user_id, "user registered");
    Ok(Json(SignupResponse {
        message: "User registered successfully".into(),
        user_id,
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let identifier = payload.identifier.trim();

    let user = match User::find_by_identifier(&state.db, identifier).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!("login for unknown identifier");
            return Err(ApiError::NotFound("User not found.".into()));
        }
        Err(e) => {
            error!(error = %e, "find_by_identifier failed");
            return Err(ApiError::Internal(e.to_string()));
        }
    };

    let ok = verify_password(&payload.password, &user.password_hash).map_err(|e| {
        error!(error = %e, user_id = user.id, "verify_password failed");
        ApiError::Internal(e.to_string())
    })?;
    if !ok {
        warn!(user_id = user.id, "login invalid password");
        return Err(ApiError::Unauthorized("Incorrect password.".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign_access(&user).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        ApiError::Internal(e.to_string())
    })?;

    info!(user_id = user.id, "user logged in");
    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer".into(),
        user: PublicUser {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
        },
    }))
}
