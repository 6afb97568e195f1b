//! Metadata information regarding the database and tracked information.

pub mod database;
pub mod mapping;

// re-export without modules
pub use database::*;
pub use mapping::*;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Metadata information.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize, JsonSchema)]
pub struct Metadata {
    pub base_table: BaseTable,
    pub whitelist: Whitelist,
    /// Relation routing, keyed by the reference table name the whitelist
    /// routes relation fields to.
    pub relations: std::collections::BTreeMap<String, RelationInfo>,
}

impl Metadata {
    pub fn empty() -> Self {
        Metadata {
            base_table: BaseTable::default(),
            whitelist: Whitelist::empty(),
            relations: std::collections::BTreeMap::new(),
        }
    }
}

/// How to reach one reference table from the base table.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize, JsonSchema)]
pub struct RelationInfo {
    /// The api-facing relation name, used to label the collapsed
    /// `GROUP_CONCAT` column.
    pub api_name: String,
    pub reference_table: String,
    pub link_table: String,
    /// The link table's column pointing at the reference table's id.
    pub link_column: String,
    /// The link table's column pointing at the base table's primary key.
    pub base_column: String,
}

/// The central entity table all relation joins hang off of.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize, JsonSchema)]
pub struct BaseTable {
    pub table: String,
    pub primary_key: String,
}

impl Default for BaseTable {
    fn default() -> Self {
        BaseTable {
            table: "games".to_string(),
            primary_key: "id".to_string(),
        }
    }
}
