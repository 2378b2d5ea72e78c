//! Data models.

pub mod catalog;
pub mod config;
pub mod language;
pub mod media;
pub mod run;
