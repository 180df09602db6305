//! Book repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the CRUD store keyed by isbn over the `book` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `Book::validate()` before any SQL mutation.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Every write is committed before the call returns; callers never see
//!   staged state.

use crate::db::{migrations, DbError};
use crate::model::book::{Book, BookValidationError};
use rusqlite::{params, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const BOOK_SELECT_SQL: &str = "SELECT
    isbn,
    title,
    author,
    year_published,
    price
FROM book";

const REQUIRED_COLUMNS: &[&str] = &["isbn", "title", "author", "year_published", "price"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for book persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(BookValidationError),
    Db(DbError),
    NotFound(String),
    DuplicateKey(String),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(isbn) => write!(f, "no book found with ISBN `{isbn}`"),
            Self::DuplicateKey(isbn) => write!(f, "a book with ISBN `{isbn}` already exists"),
            Self::InvalidData(message) => write!(f, "invalid persisted book data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; run migrations first"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BookValidationError> for RepoError {
    fn from(value: BookValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Record-store contract keyed by isbn.
pub trait BookRepository {
    /// Persists a new record. Fails with `DuplicateKey` when the isbn exists.
    fn insert_book(&self, book: &Book) -> RepoResult<()>;
    /// Overwrites the editable fields of the record with `book.isbn`.
    /// Fails with `NotFound` when the isbn is absent.
    fn update_book(&self, book: &Book) -> RepoResult<()>;
    /// Fails with `NotFound` when the isbn is absent.
    fn get_book(&self, isbn: &str) -> RepoResult<Book>;
    /// Returns every record in insertion order, unfiltered.
    fn list_books(&self) -> RepoResult<Vec<Book>>;
    /// Removes a record. Fails with `NotFound` when the isbn is absent.
    fn delete_book(&self, isbn: &str) -> RepoResult<()>;
    /// Returns all isbns currently in the store, for duplicate checks.
    fn list_isbns(&self) -> RepoResult<Vec<String>>;
}

/// SQLite-backed book repository.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    /// Wraps a connection after verifying its schema is ready for use.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `PRAGMA user_version` does not match
    ///   the latest migration.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the `book`
    ///   table shape is wrong despite a matching version.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = migrations::latest_version();
        let actual_version: u32 =
            conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        ensure_book_table_shape(conn)?;
        Ok(Self { conn })
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn insert_book(&self, book: &Book) -> RepoResult<()> {
        book.validate()?;

        let result = self.conn.execute(
            "INSERT INTO book (isbn, title, author, year_published, price)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                book.isbn,
                book.title,
                book.author,
                book.year_published,
                book.price,
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_constraint_violation(&err) => {
                Err(RepoError::DuplicateKey(book.isbn.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn update_book(&self, book: &Book) -> RepoResult<()> {
        book.validate()?;

        let changed = self.conn.execute(
            "UPDATE book
             SET title = ?1, author = ?2, year_published = ?3, price = ?4
             WHERE isbn = ?5;",
            params![
                book.title,
                book.author,
                book.year_published,
                book.price,
                book.isbn,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(book.isbn.clone()));
        }
        Ok(())
    }

    fn get_book(&self, isbn: &str) -> RepoResult<Book> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_SELECT_SQL} WHERE isbn = ?1;"))?;

        let mut rows = stmt.query([isbn])?;
        match rows.next()? {
            Some(row) => parse_book_row(row),
            None => Err(RepoError::NotFound(isbn.to_string())),
        }
    }

    fn list_books(&self) -> RepoResult<Vec<Book>> {
        // rowid order is insertion order; updates do not reorder rows.
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_SELECT_SQL} ORDER BY rowid ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut books = Vec::new();
        while let Some(row) = rows.next()? {
            books.push(parse_book_row(row)?);
        }
        Ok(books)
    }

    fn delete_book(&self, isbn: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM book WHERE isbn = ?1;", [isbn])?;

        if changed == 0 {
            return Err(RepoError::NotFound(isbn.to_string()));
        }
        Ok(())
    }

    fn list_isbns(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT isbn FROM book ORDER BY rowid ASC;")?;

        let mut rows = stmt.query([])?;
        let mut isbns = Vec::new();
        while let Some(row) = rows.next()? {
            isbns.push(row.get(0)?);
        }
        Ok(isbns)
    }
}

fn parse_book_row(row: &Row<'_>) -> RepoResult<Book> {
    let book = Book {
        isbn: row.get("isbn")?,
        title: row.get("title")?,
        author: row.get("author")?,
        year_published: row.get("year_published")?,
        price: row.get("price")?,
    };

    book.validate().map_err(|err| {
        RepoError::InvalidData(format!("stored book `{}` violates invariants: {err}", book.isbn))
    })?;
    Ok(book)
}

fn ensure_book_table_shape(conn: &Connection) -> RepoResult<()> {
    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = 'book'
        );",
        [],
        |row| row.get(0),
    )?;
    if table_exists == 0 {
        return Err(RepoError::MissingRequiredTable("book"));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('book');")?;
    let mut rows = stmt.query([])?;
    let mut present = Vec::new();
    while let Some(row) = rows.next()? {
        present.push(row.get::<_, String>(0)?);
    }

    for &column in REQUIRED_COLUMNS {
        if !present.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: "book",
                column,
            });
        }
    }
    Ok(())
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    err.sqlite_error_code() == Some(ErrorCode::ConstraintViolation)
}
