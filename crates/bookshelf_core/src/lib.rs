//! Core domain logic for Bookshelf, a small book-catalogue manager.
//! This crate is the single source of truth for record validation and
//! persistence rules; front-ends stay presentation-only.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod setup;

pub use config::{ConfigError, ConfigProvider, ConnectionConfig, FileConfigProvider};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::book::{
    Book, BookForm, BookValidationError, UpdateOutcome, AUTHOR_MAX_LEN, ISBN_MAX_LEN, YEAR_MAX,
    YEAR_MIN,
};
pub use repo::book_repo::{BookRepository, RepoError, RepoResult, SqliteBookRepository};
pub use service::book_service::{BookService, EditOutcome};
pub use setup::{establish_store, ConnectionFailure, SetupPrompt};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
