// src/lib.rs

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod session;
pub mod state;
pub mod upstream;
pub mod utils;

// Re-exports
pub use routes::create_router;
