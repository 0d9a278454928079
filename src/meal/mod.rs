mod dto;
pub mod extract;
pub mod handlers;
mod prompt;
pub mod service;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
