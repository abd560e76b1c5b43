pub mod analyzer;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod parser;
pub mod render;

pub use config::{load_config, AppConfig};
pub use error::AppError;
