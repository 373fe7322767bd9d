//! Vera Common - Shared types and safety layer for the Vera assistant.
//!
//! Holds the catalog data model, the chat wire types, the safety and
//! rate-limit checks that gate every request, and the language-model
//! client seam with its retry policy. No catalog logic lives here; the
//! engine side is in `verad`.

pub mod catalog;
pub mod chat;
pub mod error;
pub mod llm;
pub mod retry;
pub mod safety;

pub use catalog::*;
pub use chat::*;
pub use error::VeraError;
