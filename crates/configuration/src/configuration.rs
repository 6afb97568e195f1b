//! Runtime configuration for the engine.

use std::collections::BTreeMap;

use query_engine_metadata::metadata::{self, build_whitelist};

use crate::error::SchemaError;
use crate::version1::ParsedConfiguration;

/// The 'Configuration' type collects all the information necessary to
/// serve queries at runtime.
///
/// 'ParsedConfiguration' deals with the serialized document format; values
/// of this type are produced from it once at startup via
/// 'make_runtime_configuration' and shared immutably with every caller
/// afterwards. Separating the two keeps format evolution out of the query
/// translation path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub metadata: metadata::Metadata,
}

/// Elaborate the parsed document into the runtime configuration: flatten
/// the mapping, derive the whitelist, and index the relation routing.
pub fn make_runtime_configuration(
    parsed: &ParsedConfiguration,
) -> Result<Configuration, SchemaError> {
    let entries = crate::version1::load_mapping(parsed)?;
    let whitelist = build_whitelist(&entries)?;

    let mut relations = BTreeMap::new();
    for relation in &parsed.relations {
        relations.insert(
            relation.target().to_string(),
            metadata::RelationInfo {
                api_name: relation.name.clone(),
                reference_table: relation.target().to_string(),
                link_table: relation.link_table(&parsed.base_table.name),
                link_column: relation.link_column(),
                base_column: relation.base_column(),
            },
        );
    }

    Ok(Configuration {
        metadata: metadata::Metadata {
            base_table: metadata::BaseTable {
                table: parsed.base_table.name.clone(),
                primary_key: parsed.base_table.primary_key.clone(),
            },
            whitelist,
            relations,
        },
    })
}
