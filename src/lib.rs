pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
pub mod types;

pub use router::app;
pub use state::AppState;
