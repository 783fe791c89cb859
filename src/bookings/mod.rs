mod dto;
pub mod handlers;
pub mod price;
pub mod store;
pub mod validate;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
