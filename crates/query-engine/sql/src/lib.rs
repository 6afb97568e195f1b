//! SQL AST types and their low-level string representation.

pub mod sql;
