// mflix API - movie catalog and comments over a document store

// Application configuration and state
pub mod app_state;
pub mod config;

// Document store access - connection lifecycle and generic query facade
pub mod store;

// Document and response shapes
pub mod models;

// Unified movie/comment access layer and HTTP routes
pub mod movie_interface;

// Common utilities
pub mod error;

// Re-exports for convenience
pub use error::{AppError, AppResult};
