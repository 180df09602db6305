//! Domain model for the book catalogue.
//!
//! # Responsibility
//! - Define the canonical record persisted by the store.
//! - Turn raw form input into validated records.
//!
//! # Invariants
//! - Every record is identified by its `isbn`, which never changes after
//!   creation.
//! - A record that violates a range or non-empty invariant is rejected here,
//!   before it can reach persistence.

pub mod book;
