//! The field mapping and the whitelist derived from it.
//!
//! The mapping is the single source of truth for routing an api-facing
//! field name to a physical table and column. The whitelist derived from it
//! is the exclusive gate for every field name accepted anywhere downstream;
//! no other code path may hand a table or column name to the SQL layer.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::database::{ComparisonOperator, ScalarType, UnknownTypeError};

/// One row of the api-field to table/column mapping.
///
/// Direct fields of the base table keep their bare column name as the api
/// field; fields reached through a link table are qualified as
/// `relation.column`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MappingEntry {
    pub api_field: String,
    pub table: String,
    pub column: String,
    pub field_type: String,
    pub display_name: String,
}

/// A queryable field with its routing, type and legal operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldDescriptor {
    pub table: String,
    pub column: String,
    pub value_type: ScalarType,
    pub allowed_operators: BTreeSet<ComparisonOperator>,
    pub display_name: String,
}

/// The closed set of queryable field names.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Whitelist(pub BTreeMap<String, FieldDescriptor>);

impl Whitelist {
    pub fn empty() -> Self {
        Whitelist(BTreeMap::new())
    }

    pub fn lookup(&self, api_field: &str) -> Option<&FieldDescriptor> {
        self.0.get(api_field)
    }

    pub fn contains(&self, api_field: &str) -> bool {
        self.0.contains_key(api_field)
    }
}

/// Derive the whitelist from the flattened mapping. Each entry's declared
/// type picks the operator set from the fixed type table.
pub fn build_whitelist(entries: &[MappingEntry]) -> Result<Whitelist, UnknownTypeError> {
    let mut fields = BTreeMap::new();
    for entry in entries {
        let value_type = ScalarType::parse(&entry.field_type)?;
        fields.insert(
            entry.api_field.clone(),
            FieldDescriptor {
                table: entry.table.clone(),
                column: entry.column.clone(),
                value_type,
                allowed_operators: value_type.comparison_operators(),
                display_name: entry.display_name.clone(),
            },
        );
    }
    Ok(Whitelist(fields))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(api_field: &str, table: &str, column: &str, field_type: &str) -> MappingEntry {
        MappingEntry {
            api_field: api_field.to_string(),
            table: table.to_string(),
            column: column.to_string(),
            field_type: field_type.to_string(),
            display_name: api_field.to_string(),
        }
    }

    #[test]
    fn test_whitelist_carries_routing_and_operators() {
        let whitelist = build_whitelist(&[
            entry("rating", "games", "rating", "float"),
            entry("platforms.name", "platforms", "name", "str"),
        ])
        .unwrap();

        let rating = whitelist.lookup("rating").unwrap();
        assert_eq!(rating.table, "games");
        assert_eq!(rating.value_type, ScalarType::Float);
        assert!(rating
            .allowed_operators
            .contains(&ComparisonOperator::Between));

        let platform = whitelist.lookup("platforms.name").unwrap();
        assert_eq!(platform.table, "platforms");
        assert!(platform.allowed_operators.contains(&ComparisonOperator::In));
        assert!(!platform
            .allowed_operators
            .contains(&ComparisonOperator::GreaterThan));
    }

    #[test]
    fn test_unknown_declared_type_is_an_error() {
        let result = build_whitelist(&[entry("name", "games", "name", "text")]);
        assert_eq!(
            result,
            Err(UnknownTypeError {
                declared: "text".to_string()
            })
        );
    }
}
