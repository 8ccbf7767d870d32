//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the address book data access contract.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes enforce `Contact::validate()` before persistence.
//! - Duplicate emails surface as `RepoError::AlreadyExists`, separate from
//!   DB transport errors.

pub mod contact_repo;
