pub mod api;
pub mod config;
pub mod email;
pub mod error;
pub mod models;
pub mod ui;

pub use error::{AppError, Result};
