//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for entries.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repositories never trim or validate entry text; callers do.
//! - A duplicate word is a semantic error (`DuplicateWord`), not a DB
//!   transport error.

pub mod entry_repo;
