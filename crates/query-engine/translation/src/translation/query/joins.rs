//! Resolve which relations a request touches and emit their joins.

use std::collections::BTreeSet;

use query_engine_metadata::metadata::Metadata;
use query_engine_sql::sql;

use super::error::Error;
use super::validate::{Fields, ValidatedRequest};

/// The joins for every referenced relation, plus the select terms that
/// collapse each relation's fan-out back to one row per base entity.
pub struct RelationJoins {
    pub joins: Vec<sql::ast::Join>,
    pub select_items: Vec<sql::ast::SelectItem>,
}

/// Collect every field referenced anywhere in the request whose owning
/// table is not the base table, and emit one two-hop LEFT JOIN pair per
/// such relation. Each relation is joined at most once no matter how many
/// times it is referenced.
pub fn translate_joins(
    metadata: &Metadata,
    validated: &ValidatedRequest,
) -> Result<RelationJoins, Error> {
    let base = &metadata.base_table;

    let mut relation_tables: BTreeSet<&str> = BTreeSet::new();

    if let Fields::List(fields) = &validated.fields {
        for field in fields {
            if field.table != base.table {
                relation_tables.insert(&field.table);
            }
        }
    }
    for filter in &validated.filters {
        if filter.field.table != base.table {
            relation_tables.insert(&filter.field.table);
        }
    }
    for field in &validated.group_by {
        if field.table != base.table {
            relation_tables.insert(&field.table);
        }
    }
    for aggregate in validated.aggregation.values() {
        if aggregate.field.table != base.table {
            relation_tables.insert(&aggregate.field.table);
        }
    }

    let mut joins = Vec::new();
    let mut select_items = Vec::new();

    for table in relation_tables {
        let relation = metadata
            .relations
            .get(table)
            .ok_or_else(|| Error::RelationNotConfigured(table.to_string()))?;

        joins.push(sql::helpers::left_join_on_columns(
            &relation.link_table,
            sql::helpers::make_column(&base.table, &base.primary_key),
            sql::helpers::make_column(&relation.link_table, &relation.base_column),
        ));
        joins.push(sql::helpers::left_join_on_columns(
            &relation.reference_table,
            sql::helpers::make_column(&relation.link_table, &relation.link_column),
            sql::helpers::make_column(&relation.reference_table, "id"),
        ));

        select_items.push(sql::ast::SelectItem::AliasedExpression {
            expression: sql::ast::Expression::GroupConcatDistinct(sql::helpers::make_column(
                &relation.reference_table,
                "name",
            )),
            alias: sql::helpers::make_column_alias(relation.api_name.clone()),
        });
    }

    Ok(RelationJoins {
        joins,
        select_items,
    })
}
