pub mod api;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod screens;
pub mod templates;

pub use routes::create_router;
