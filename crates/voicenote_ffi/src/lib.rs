//! UI-facing bindings for the voice note core.

pub mod api;
