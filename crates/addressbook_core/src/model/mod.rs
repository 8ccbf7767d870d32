//! Address book domain model.
//!
//! # Responsibility
//! - Define the `Contact` record shared by repository and service layers.
//! - Keep column length limits next to the record they constrain.
//!
//! # Invariants
//! - `email` is the natural identity key; at most one stored row per email.
//! - `id` is assigned by storage and only populated on read-back.

pub mod contact;
