//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record and its pre-insert shape.
//! - Own the persistence invariants every write path must check.
//!
//! # Invariants
//! - A note carries non-blank content, an audio attachment, or both.
//! - `updated_at >= created_at`.

pub mod note;
