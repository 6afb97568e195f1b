//! Metadata describing the queryable surface of the games database.

pub mod metadata;

pub use metadata::*;
