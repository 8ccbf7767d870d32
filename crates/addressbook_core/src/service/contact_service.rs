//! Address book use-case service.
//!
//! # Responsibility
//! - Provide stable entry points for core callers.
//! - Delegate persistence to repository implementations.
//! - Offer insert-or-update on top of the duplicate-key error.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::contact::Contact;
use crate::repo::contact_repo::{ContactRepository, RepoError, RepoResult};
use log::debug;

/// Which path `upsert` took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Use-case service wrapper for address book operations.
pub struct AddressBookService<R: ContactRepository> {
    repo: R,
}

impl<R: ContactRepository> AddressBookService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn ensure_schema(&self) -> RepoResult<()> {
        self.repo.ensure_schema()
    }

    /// Adds a new contact; duplicate emails return `RepoError::AlreadyExists`.
    pub fn add(&self, contact: Contact) -> RepoResult<Contact> {
        self.repo.add(contact)
    }

    /// Updates an existing contact by email; unknown emails are a no-op.
    pub fn save(&self, contact: Contact) -> RepoResult<Contact> {
        self.repo.save(contact)
    }

    pub fn get_all_contacts(&self) -> RepoResult<Vec<Contact>> {
        self.repo.get_all_contacts()
    }

    pub fn find_by_email(&self, email: &str) -> RepoResult<Option<Contact>> {
        self.repo.find_by_email(email)
    }

    /// Inserts `contact`, or updates the stored row when the email exists.
    ///
    /// # Contract
    /// - Tries `add` first.
    /// - Falls back to `save` only on `RepoError::AlreadyExists`.
    /// - Any other error is returned unchanged.
    pub fn upsert(&self, contact: Contact) -> RepoResult<(Contact, UpsertOutcome)> {
        match self.repo.add(contact.clone()) {
            Ok(added) => Ok((added, UpsertOutcome::Inserted)),
            Err(RepoError::AlreadyExists { .. }) => {
                debug!("event=contact_upsert module=service status=fallback path=save");
                let saved = self.repo.save(contact)?;
                Ok((saved, UpsertOutcome::Updated))
            }
            Err(err) => Err(err),
        }
    }

    /// Consumes the service and returns the underlying repository.
    pub fn into_inner(self) -> R {
        self.repo
    }
}
