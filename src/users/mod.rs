mod dto;
pub mod handlers;
#[cfg(test)]
pub mod memory;
pub mod repo;
mod repo_types;
pub mod store;
mod validation;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::user_routes()
}
