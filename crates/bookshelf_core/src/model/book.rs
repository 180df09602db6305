//! Book domain model and form validation.
//!
//! # Responsibility
//! - Define the canonical record stored in the `book` table.
//! - Validate raw form input before it can become a `Book`.
//!
//! # Invariants
//! - `isbn` is the primary key and is read-only once a record exists.
//! - A `Book` value that fails `validate()` must never be persisted.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Earliest publication year accepted by validation.
pub const YEAR_MIN: i64 = 1900;
/// Latest publication year accepted by validation.
pub const YEAR_MAX: i64 = 2024;
/// Maximum isbn length, mirroring the storage column width.
pub const ISBN_MAX_LEN: usize = 20;
/// Maximum author length, mirroring the storage column width.
pub const AUTHOR_MAX_LEN: usize = 100;

/// Canonical book record.
///
/// Instances produced by form validation always satisfy `validate()`;
/// repositories re-check on every write and on every row read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub year_published: i64,
    pub price: i64,
}

/// Validation failure for a candidate record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookValidationError {
    /// A required field was left empty.
    MissingField(&'static str),
    /// A numeric field did not parse as an integer.
    NotANumber {
        field: &'static str,
        value: String,
    },
    /// A numeric or length invariant was violated.
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },
    /// Price must be strictly positive.
    InvalidPrice(i64),
    /// The isbn is already taken by another record.
    DuplicateKey(String),
}

impl Display for BookValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "{field} must be filled"),
            Self::NotANumber { field, value } => {
                write!(f, "{field} must be a whole number, got `{value}`")
            }
            Self::OutOfRange {
                field,
                min,
                max,
                value,
            } => write!(f, "{field} must be between {min} and {max}, got {value}"),
            Self::InvalidPrice(price) => {
                write!(f, "price must be greater than 0, got {price}")
            }
            Self::DuplicateKey(isbn) => write!(f, "a book with ISBN `{isbn}` already exists"),
        }
    }
}

impl Error for BookValidationError {}

impl Book {
    /// Checks the typed record invariants.
    ///
    /// # Invariants
    /// - isbn: 1..=20 characters.
    /// - title: non-empty.
    /// - author: non-empty, at most 100 characters.
    /// - year_published: within `YEAR_MIN..=YEAR_MAX`.
    /// - price: strictly positive.
    pub fn validate(&self) -> Result<(), BookValidationError> {
        if self.isbn.is_empty() {
            return Err(BookValidationError::MissingField("isbn"));
        }
        let isbn_len = self.isbn.chars().count();
        if isbn_len > ISBN_MAX_LEN {
            return Err(BookValidationError::OutOfRange {
                field: "isbn",
                min: 1,
                max: ISBN_MAX_LEN as i64,
                value: isbn_len as i64,
            });
        }
        if self.title.is_empty() {
            return Err(BookValidationError::MissingField("title"));
        }
        if self.author.is_empty() {
            return Err(BookValidationError::MissingField("author"));
        }
        let author_len = self.author.chars().count();
        if author_len > AUTHOR_MAX_LEN {
            return Err(BookValidationError::OutOfRange {
                field: "author",
                min: 1,
                max: AUTHOR_MAX_LEN as i64,
                value: author_len as i64,
            });
        }
        if !(YEAR_MIN..=YEAR_MAX).contains(&self.year_published) {
            return Err(BookValidationError::OutOfRange {
                field: "year_published",
                min: YEAR_MIN,
                max: YEAR_MAX,
                value: self.year_published,
            });
        }
        if self.price <= 0 {
            return Err(BookValidationError::InvalidPrice(self.price));
        }
        Ok(())
    }
}

/// Raw candidate as entered in the add/edit form. All fields arrive as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookForm {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub year: String,
    pub price: String,
}

/// Result of validating an edit against the stored record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// At least one editable field differs; persist the contained record.
    Changed(Book),
    /// Every editable field matches the stored record; nothing to write.
    /// Callers treat this as success, not as an error.
    Unchanged,
}

impl BookForm {
    /// Renders a stored record back into form text, for edit-screen prefill.
    pub fn from_book(book: &Book) -> Self {
        Self {
            isbn: book.isbn.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            year: book.year_published.to_string(),
            price: book.price.to_string(),
        }
    }

    /// Validates a creation candidate against the set of isbns already in
    /// the store.
    ///
    /// Check order: field completeness, numeric parsing, typed range
    /// invariants, duplicate key. Pure and deterministic.
    pub fn validate_new(&self, existing_isbns: &[String]) -> Result<Book, BookValidationError> {
        require_filled("isbn", &self.isbn)?;
        self.require_editable_fields()?;

        let book = self.to_book(self.isbn.clone())?;
        book.validate()?;

        if existing_isbns.iter().any(|known| known == &book.isbn) {
            return Err(BookValidationError::DuplicateKey(book.isbn));
        }
        Ok(book)
    }

    /// Validates an edit of `current`. The form's own `isbn` field is
    /// ignored; the produced record keeps `current.isbn`.
    ///
    /// Returns `UpdateOutcome::Unchanged` when every editable field is
    /// textually identical to the stored record. That comparison runs before
    /// any validation, so re-submitting an untouched form is always a no-op.
    pub fn validate_update(&self, current: &Book) -> Result<UpdateOutcome, BookValidationError> {
        if self.matches(current) {
            return Ok(UpdateOutcome::Unchanged);
        }

        self.require_editable_fields()?;

        let book = self.to_book(current.isbn.clone())?;
        book.validate()?;
        Ok(UpdateOutcome::Changed(book))
    }

    fn matches(&self, current: &Book) -> bool {
        self.title == current.title
            && self.author == current.author
            && self.year == current.year_published.to_string()
            && self.price == current.price.to_string()
    }

    fn require_editable_fields(&self) -> Result<(), BookValidationError> {
        require_filled("title", &self.title)?;
        require_filled("author", &self.author)?;
        require_filled("year_published", &self.year)?;
        require_filled("price", &self.price)?;
        Ok(())
    }

    fn to_book(&self, isbn: String) -> Result<Book, BookValidationError> {
        Ok(Book {
            isbn,
            title: self.title.clone(),
            author: self.author.clone(),
            year_published: parse_number("year_published", &self.year)?,
            price: parse_number("price", &self.price)?,
        })
    }
}

fn require_filled(field: &'static str, value: &str) -> Result<(), BookValidationError> {
    if value.is_empty() {
        return Err(BookValidationError::MissingField(field));
    }
    Ok(())
}

fn parse_number(field: &'static str, value: &str) -> Result<i64, BookValidationError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| BookValidationError::NotANumber {
            field,
            value: value.to_string(),
        })
}
