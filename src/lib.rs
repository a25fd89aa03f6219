//! LibraryADP lending server
//!
//! REST JSON API for a library's lending desk: students borrow books,
//! available stock is kept per title, and each return moves the borrower's
//! trust rate up or down depending on punctuality.

use std::sync::Arc;

pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
