pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod store;
pub mod tracing_setup;

// Re-export the types the TUI reaches for constantly
pub use api::ApiClient;
pub use error::{ApiError, ApiResult};
pub use session::{Gate, Session};
