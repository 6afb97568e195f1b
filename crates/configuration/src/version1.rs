//! The version 1 schema-mapping document and its flattening into mapping
//! entries.

use std::collections::BTreeSet;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use query_engine_metadata::metadata::MappingEntry;

use crate::error::{ParseConfigurationError, SchemaError};

const CURRENT_VERSION: u32 = 1;

pub const CONFIGURATION_FILENAME: &str = "schema-mapping.json";

/// The declarative schema description: the base table with its scalar
/// fields, the reference tables, and the relations that reach them through
/// link tables. This is the single source of truth for table routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParsedConfiguration {
    /// Which version of the configuration format are we using.
    pub version: u32,
    pub base_table: BaseTableDocument,
    #[serde(default)]
    pub reference_tables: Vec<String>,
    #[serde(default)]
    pub relations: Vec<RelationDocument>,
}

/// The central entity table and its scalar fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BaseTableDocument {
    pub name: String,
    pub primary_key: String,
    pub fields: Vec<FieldDocument>,
}

/// One scalar field of the base table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldDocument {
    pub name: String,
    /// Declared value type: one of `int`, `float`, `str`, `datetime`.
    #[serde(rename = "type")]
    pub field_type: String,
    /// Physical column name, when it differs from the api-facing name.
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// A many-to-many relation from the base table to a reference table,
/// reachable through a link table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelationDocument {
    pub name: String,
    /// Target reference table; defaults to the relation name.
    #[serde(default)]
    pub target: Option<String>,
    /// Link table; defaults to `{base}_{target}`.
    #[serde(default)]
    pub link_table: Option<String>,
    /// Link table's column pointing at the reference table; defaults to
    /// `{target}_id`.
    #[serde(default)]
    pub link_column: Option<String>,
    /// Link table's column pointing at the base table; defaults to
    /// `game_id`.
    #[serde(default)]
    pub base_column: Option<String>,
}

impl RelationDocument {
    pub fn target(&self) -> &str {
        self.target.as_deref().unwrap_or(&self.name)
    }

    pub fn link_table(&self, base_table: &str) -> String {
        self.link_table
            .clone()
            .unwrap_or_else(|| format!("{base_table}_{}", self.target()))
    }

    pub fn link_column(&self) -> String {
        self.link_column
            .clone()
            .unwrap_or_else(|| format!("{}_id", self.target()))
    }

    pub fn base_column(&self) -> String {
        self.base_column
            .clone()
            .unwrap_or_else(|| "game_id".to_string())
    }
}

/// Read and parse the schema-mapping document from a configuration
/// directory.
pub async fn parse_configuration(
    configuration_dir: impl AsRef<Path>,
) -> Result<ParsedConfiguration, ParseConfigurationError> {
    let file = configuration_dir.as_ref().join(CONFIGURATION_FILENAME);
    let contents = tokio::fs::read_to_string(file).await?;
    let parsed: ParsedConfiguration = serde_json::from_str(&contents)?;
    if parsed.version != CURRENT_VERSION {
        return Err(ParseConfigurationError::UnsupportedVersion(parsed.version));
    }
    Ok(parsed)
}

/// Flatten the schema description into mapping entries, synthesizing the
/// `{relation}.id` and `{relation}.name` pair for every relation.
pub fn load_mapping(config: &ParsedConfiguration) -> Result<Vec<MappingEntry>, SchemaError> {
    let declared: BTreeSet<&str> = config
        .reference_tables
        .iter()
        .map(String::as_str)
        .collect();

    let mut entries = Vec::new();
    let mut seen = BTreeSet::new();

    let mut push = |entry: MappingEntry| -> Result<(), SchemaError> {
        if !seen.insert(entry.api_field.clone()) {
            return Err(SchemaError::DuplicateField(entry.api_field));
        }
        entries.push(entry);
        Ok(())
    };

    for field in &config.base_table.fields {
        push(MappingEntry {
            api_field: field.name.clone(),
            table: config.base_table.name.clone(),
            column: field.column.clone().unwrap_or_else(|| field.name.clone()),
            field_type: field.field_type.clone(),
            display_name: field.display_name.clone().unwrap_or_else(|| field.name.clone()),
        })?;
    }

    for relation in &config.relations {
        let target = relation.target();
        if !declared.contains(target) {
            return Err(SchemaError::UnknownRelationTarget {
                relation: relation.name.clone(),
                target: target.to_string(),
            });
        }
        push(MappingEntry {
            api_field: format!("{}.id", relation.name),
            table: target.to_string(),
            column: "id".to_string(),
            field_type: "int".to_string(),
            display_name: format!("{} id", relation.name),
        })?;
        push(MappingEntry {
            api_field: format!("{}.name", relation.name),
            table: target.to_string(),
            column: "name".to_string(),
            field_type: "str".to_string(),
            display_name: relation.name.clone(),
        })?;
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn games_document() -> ParsedConfiguration {
        serde_json::from_value(serde_json::json!({
            "version": 1,
            "baseTable": {
                "name": "games",
                "primaryKey": "id",
                "fields": [
                    {"name": "id", "type": "int"},
                    {"name": "name", "type": "str"},
                    {"name": "rating", "type": "float"},
                    {"name": "first_release_date", "type": "datetime", "displayName": "Release date"}
                ]
            },
            "referenceTables": ["platforms", "genres"],
            "relations": [
                {"name": "platforms"},
                {"name": "genres"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_mapping_synthesizes_relation_field_pairs() {
        let entries = load_mapping(&games_document()).unwrap();
        let api_fields: Vec<&str> = entries.iter().map(|e| e.api_field.as_str()).collect();
        assert_eq!(
            api_fields,
            vec![
                "id",
                "name",
                "rating",
                "first_release_date",
                "platforms.id",
                "platforms.name",
                "genres.id",
                "genres.name",
            ]
        );

        let platforms_name = entries
            .iter()
            .find(|e| e.api_field == "platforms.name")
            .unwrap();
        assert_eq!(platforms_name.table, "platforms");
        assert_eq!(platforms_name.column, "name");
        assert_eq!(platforms_name.field_type, "str");
    }

    #[test]
    fn test_undeclared_relation_target_is_a_schema_error() {
        let mut config = games_document();
        config.relations.push(RelationDocument {
            name: "themes".to_string(),
            target: None,
            link_table: None,
            link_column: None,
            base_column: None,
        });
        assert_eq!(
            load_mapping(&config),
            Err(SchemaError::UnknownRelationTarget {
                relation: "themes".to_string(),
                target: "themes".to_string(),
            })
        );
    }

    #[test]
    fn test_duplicate_fields_are_a_schema_error() {
        let mut config = games_document();
        config.base_table.fields.push(FieldDocument {
            name: "rating".to_string(),
            field_type: "float".to_string(),
            column: None,
            display_name: None,
        });
        assert_eq!(
            load_mapping(&config),
            Err(SchemaError::DuplicateField("rating".to_string()))
        );
    }

    #[tokio::test]
    async fn test_parse_configuration_rejects_unknown_versions() {
        let dir = std::env::temp_dir().join("gamedb-configuration-version-test");
        std::fs::create_dir_all(&dir).unwrap();
        let mut document = serde_json::to_value(games_document()).unwrap();
        document["version"] = serde_json::json!(2);
        std::fs::write(
            dir.join(CONFIGURATION_FILENAME),
            serde_json::to_string(&document).unwrap(),
        )
        .unwrap();

        let result = parse_configuration(&dir).await;
        assert!(matches!(
            result,
            Err(ParseConfigurationError::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn test_link_table_defaults() {
        let relation = RelationDocument {
            name: "platforms".to_string(),
            target: None,
            link_table: None,
            link_column: None,
            base_column: None,
        };
        assert_eq!(relation.link_table("games"), "games_platforms");
        assert_eq!(relation.link_column(), "platforms_id");
    }
}
