use axum::{extract::State, routing::post, Json, Router};
use tracing::{error, info, instrument, warn};

use crate::error::ApiError;
use crate::state::AppState;
use crate::waitlist::dto::{WaitlistRequest, WaitlistResponse};
use crate::waitlist::repo;

pub fn routes() -> Router<AppState> {
    Router::new().route("/waitlist/add", post(add_to_waitlist))
}

#[instrument(skip(state, payload))]
pub async fn add_to_waitlist(
    State(state): State<AppState>,
    Json(payload): Json<WaitlistRequest>,
) -> Result<Json<WaitlistResponse>, ApiError> {
    if payload.email.is_none() && payload.mobile.is_none() {
        warn!("waitlist signup without email or mobile");
        return Err(ApiError::BadRequest(
            "Either email or mobile is required".into(),
        ));
    }

    if let Err(e) = repo::add_entry(&state.db, &payload).await {
        error!(error = %e, "waitlist insert failed");
        return Err(ApiError::Internal(format!("Database error: {e}")));
    }

    info!(first_name = %payload.first_name, "waitlist entry added");
    Ok(Json(WaitlistResponse {
        message: "Added to waitlist successfully".into(),
    }))
}
