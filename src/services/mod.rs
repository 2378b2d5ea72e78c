//! External service clients.

pub mod catalog;

pub use catalog::{CatalogSession, HttpCatalog};
