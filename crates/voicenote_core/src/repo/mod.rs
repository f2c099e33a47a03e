//! Note store contracts and persistence implementations.
//!
//! # Responsibility
//! - Define the store contract the service layer depends on.
//! - Keep SQLite query details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `NewNote::validate()` before any SQL mutation.
//! - Read paths reject invalid persisted state instead of masking it.

pub mod note_repo;
