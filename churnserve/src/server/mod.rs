//! HTTP surface: prediction, health and metrics routes.

pub mod handlers;
pub mod routes;
pub mod types;


pub use routes::create_router;
pub use types::AppState;
