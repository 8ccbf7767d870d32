//! Contact domain model.
//!
//! # Responsibility
//! - Define the address book entry persisted in the `contacts` table.
//! - Validate field presence and column lengths before writes.
//!
//! # Invariants
//! - `first_name`, `last_name` and `email` are non-blank.
//! - Field lengths fit the `contacts` column widths.
//! - `id` stays `None` until the record is read back from storage.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned surrogate key.
pub type ContactId = i64;

pub const FIRST_NAME_MAX_CHARS: usize = 50;
pub const LAST_NAME_MAX_CHARS: usize = 50;
pub const PHONE_NUMBER_MAX_CHARS: usize = 20;
pub const EMAIL_MAX_CHARS: usize = 100;

/// One address book entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Positive surrogate key; `None` before the row exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ContactId>,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    /// Natural key used by `add` and `save`.
    pub email: String,
}

/// Field-level validation failure for `Contact`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactValidationError {
    MissingField(&'static str),
    TooLong {
        field: &'static str,
        max_chars: usize,
        actual_chars: usize,
    },
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "contact {field} is required"),
            Self::TooLong {
                field,
                max_chars,
                actual_chars,
            } => write!(
                f,
                "contact {field} has {actual_chars} characters; at most {max_chars} allowed"
            ),
        }
    }
}

impl Error for ContactValidationError {}

impl Contact {
    /// Creates an unsaved contact (`id = None`).
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone_number: Option<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone_number,
            email: email.into(),
        }
    }

    /// Checks required fields and column widths.
    ///
    /// # Errors
    /// - `MissingField` when first name, last name or email is blank.
    /// - `TooLong` when a value exceeds its column width.
    pub fn validate(&self) -> Result<(), ContactValidationError> {
        require("first_name", &self.first_name)?;
        require("last_name", &self.last_name)?;
        require("email", &self.email)?;

        check_len("first_name", &self.first_name, FIRST_NAME_MAX_CHARS)?;
        check_len("last_name", &self.last_name, LAST_NAME_MAX_CHARS)?;
        check_len("email", &self.email, EMAIL_MAX_CHARS)?;
        if let Some(phone_number) = &self.phone_number {
            check_len("phone_number", phone_number, PHONE_NUMBER_MAX_CHARS)?;
        }
        Ok(())
    }

    /// Compares the four user-supplied fields, ignoring `id`.
    pub fn same_fields(&self, other: &Contact) -> bool {
        self.first_name == other.first_name
            && self.last_name == other.last_name
            && self.phone_number == other.phone_number
            && self.email == other.email
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ContactValidationError> {
    if value.trim().is_empty() {
        return Err(ContactValidationError::MissingField(field));
    }
    Ok(())
}

fn check_len(
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<(), ContactValidationError> {
    let actual_chars = value.chars().count();
    if actual_chars > max_chars {
        return Err(ContactValidationError::TooLong {
            field,
            max_chars,
            actual_chars,
        });
    }
    Ok(())
}
