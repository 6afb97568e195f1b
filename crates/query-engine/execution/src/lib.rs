//! Execute queries against the database.

pub mod error;
pub mod execution;

pub use error::Error;
pub use execution::{execute, ResultRow};
