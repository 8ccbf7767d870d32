//! Use-case services built on repository contracts.
//!
//! # Responsibility
//! - Expose storage-agnostic entry points for address book callers.

pub mod contact_service;
