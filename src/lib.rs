pub mod clock;
pub mod commands;
pub mod config;
pub mod error;
pub mod observability;
pub mod render;
pub mod source;
pub mod state;

pub use config::Config;
pub use error::AppError;
pub use state::AppState;
