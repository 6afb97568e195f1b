//! Translate a declarative query request into a parameterized SQL
//! statement, gated by the field whitelist.

pub mod translation;
