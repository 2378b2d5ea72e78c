//! Core business logic modules.

pub mod fingerprint;
pub mod organizer;
pub mod pipeline;
pub mod scanner;
pub mod selector;
