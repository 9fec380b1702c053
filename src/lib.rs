#![forbid(unsafe_code)]

pub mod config;
pub mod driver;
pub mod errors;
pub mod models;
pub mod persistence;
pub mod render;
pub mod telegram;
pub mod transcribe;

pub use config::GlobalConfig;
pub use errors::{AppError, Result};
