//! Book use-case service.
//!
//! # Responsibility
//! - Provide the add/edit/delete/list entry points front-ends call.
//! - Run form validation before any write reaches the repository.
//!
//! # Invariants
//! - Service APIs never bypass validation or repository contracts.
//! - The service layer remains storage-agnostic.

use crate::model::book::{Book, BookForm, UpdateOutcome};
use crate::repo::book_repo::{BookRepository, RepoResult};
use log::info;

/// Use-case service wrapper for book CRUD operations.
pub struct BookService<R: BookRepository> {
    repo: R,
}

/// Outcome of an edit request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The record was changed and persisted.
    Updated(Book),
    /// The submitted form matched the stored record; no write happened.
    Unchanged,
}

impl<R: BookRepository> BookService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns every record in insertion order.
    pub fn list_books(&self) -> RepoResult<Vec<Book>> {
        self.repo.list_books()
    }

    /// Looks up one record by isbn.
    pub fn get_book(&self, isbn: &str) -> RepoResult<Book> {
        self.repo.get_book(isbn)
    }

    /// Validates and persists a new record from raw form input.
    ///
    /// # Contract
    /// - Duplicate isbns are rejected before the insert is attempted.
    /// - The returned record is exactly what was persisted.
    pub fn add_book(&self, form: &BookForm) -> RepoResult<Book> {
        let existing = self.repo.list_isbns()?;
        let book = form.validate_new(&existing)?;
        self.repo.insert_book(&book)?;
        info!("event=book_add module=service status=ok isbn={}", book.isbn);
        Ok(book)
    }

    /// Validates and applies an edit of the record with `isbn`.
    ///
    /// # Contract
    /// - A form textually identical to the stored record yields
    ///   `EditOutcome::Unchanged` and performs no write.
    /// - The isbn itself is never modified.
    pub fn edit_book(&self, isbn: &str, form: &BookForm) -> RepoResult<EditOutcome> {
        let current = self.repo.get_book(isbn)?;

        match form.validate_update(&current)? {
            UpdateOutcome::Unchanged => {
                info!("event=book_edit module=service status=noop isbn={isbn}");
                Ok(EditOutcome::Unchanged)
            }
            UpdateOutcome::Changed(book) => {
                self.repo.update_book(&book)?;
                info!("event=book_edit module=service status=ok isbn={isbn}");
                Ok(EditOutcome::Updated(book))
            }
        }
    }

    /// Removes the record with `isbn` from the store.
    pub fn remove_book(&self, isbn: &str) -> RepoResult<()> {
        self.repo.delete_book(isbn)?;
        info!("event=book_delete module=service status=ok isbn={isbn}");
        Ok(())
    }
}
