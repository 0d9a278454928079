use axum::{extract::State, routing::post, Json, Router};
use tracing::{error, instrument, warn};

use crate::error::{ApiError, PlanError};
use crate::meal::dto::{MealPlanResponse, MealRequest};
use crate::meal::service;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/meal/get-meal", post(get_meal))
}

#[instrument(skip(state, payload), fields(location = %payload.location))]
pub async fn get_meal(
    State(state): State<AppState>,
    Json(payload): Json<MealRequest>,
) -> Result<Json<MealPlanResponse>, ApiError> {
    if !(-90.0..=90.0).contains(&payload.latitude)
        || !(-180.0..=180.0).contains(&payload.longitude)
    {
        warn!(
            latitude = payload.latitude,
            longitude = payload.longitude,
            "coordinates out of range"
        );
        return Err(ApiError::BadRequest(
            "latitude must be in [-90, 90] and longitude in [-180, 180]".into(),
        ));
    }

    match service::plan_meals(&state, &payload).await {
        Ok(response) => Ok(Json(response)),
        Err(PlanError::Weather(e)) => {
            error!(error = %e, "weather fetch failed");
            Err(ApiError::Internal("Unable to fetch weather data".into()))
        }
        Err(PlanError::Generation(e)) => {
            error!(error = %e, "plan generation failed");
            Err(ApiError::UpstreamFailed(format!(
                "Meal plan generation failed: {e}"
            )))
        }
    }
}
