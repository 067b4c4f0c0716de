//! Domain model for mnemonic entries.
//!
//! # Responsibility
//! - Define the record shapes shared by storage, service and front ends.
//!
//! # Invariants
//! - `word` identifies an entry; it is unique and compared case-sensitively.
//! - Entries are append-only: there is no update or delete shape.

pub mod entry;
