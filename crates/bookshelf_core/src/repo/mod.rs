//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the keyed record-store contract.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes enforce `Book::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateKey`) in
//!   addition to transport errors.

pub mod book_repo;
