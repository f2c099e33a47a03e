//! Core use-case services.
//!
//! # Responsibility
//! - Validate and normalize user input before delegating to the store.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod clock;
pub mod keywords;
pub mod note_service;
pub mod title;
