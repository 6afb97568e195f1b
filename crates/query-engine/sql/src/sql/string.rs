//! Type definitions of a low-level SQL string representation.
//!
//! The three `append_*` methods below are the only way a statement grows.
//! Identifiers pass through `append_identifier`, values through
//! `append_param`; nothing else may splice text into a statement, which is
//! what keeps caller-supplied values out of the SQL text.

/// A SQL statement under construction: the text and its bound parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SQL {
    pub sql: String,
    pub params: Vec<Param>,
}

/// A parameter bound to a `?` placeholder, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Int(i64),
    Float(f64),
    String(String),
}

impl Default for SQL {
    fn default() -> Self {
        Self::new()
    }
}

impl SQL {
    pub fn new() -> SQL {
        SQL {
            sql: String::new(),
            params: vec![],
        }
    }

    /// Append a fragment of fixed SQL syntax.
    pub fn append_syntax(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    /// Append a quoted identifier. Identifiers reaching this point come
    /// from the whitelist, never from request values; quoting guards
    /// against a malformed schema document, not against callers.
    pub fn append_identifier(&mut self, identifier: &str) {
        self.sql.push('"');
        // a double quote inside an identifier is escaped by doubling it
        self.sql.push_str(&identifier.replace('"', "\"\""));
        self.sql.push('"');
    }

    /// Append a `?` placeholder and record the value bound to it.
    pub fn append_param(&mut self, param: Param) {
        self.sql.push('?');
        self.params.push(param);
    }
}
