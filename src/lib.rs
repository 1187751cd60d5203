pub mod cdn;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repo;
pub mod response;
pub mod storage; // expose object store for handlers

// Re-export commonly used items for tests / external users
pub use config::Config;
pub use handlers::AppState;
