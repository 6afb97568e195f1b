//! The games query engine facade: validate, translate, execute,
//! post-process.

pub mod engine;
pub mod error;

pub use engine::{explain, fetch_game_by_slug, run, Explanation, QueryOutcome};
pub use error::Error;
