//! Parameterized SQL fragments.
//!
//! Values never appear in generated SQL text. Each fragment carries the
//! values for its `$N` placeholders in placeholder order, and column names
//! only ever come from static allow-lists.

use crate::types::{AppError, Result};
use serde_json::{Map, Value};

/// New values for a partial update, keyed by logical (API) field name.
///
/// Iteration follows insertion order, which for request bodies is the
/// order the fields were sent in.
pub type FieldMap = Map<String, Value>;

/// The fields a table accepts in a partial update.
///
/// `aliases` maps logical field names to storage column names; an allowed
/// field without an alias is stored under its own name.
#[derive(Debug, Clone, Copy)]
pub struct UpdatableColumns {
    pub allowed: &'static [&'static str],
    pub aliases: &'static [(&'static str, &'static str)],
}

impl UpdatableColumns {
    /// Storage column for a logical field, or `None` if the field is not
    /// updatable.
    pub fn resolve(&self, field: &str) -> Option<&'static str> {
        let allowed = self.allowed.iter().copied().find(|name| *name == field)?;

        Some(
            self.aliases
                .iter()
                .find(|(logical, _)| *logical == allowed)
                .map(|(_, column)| *column)
                .unwrap_or(allowed),
        )
    }
}

/// A `SET` clause and the values bound to its placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialUpdate {
    pub set_cols: String,
    pub values: Vec<Value>,
}

/// Builds the `SET` clause for updating the given fields.
///
/// Field `i` (0-based, map order) becomes `"<column>"=$<i+1>` and its value
/// is `values[i]`.
///
/// # Errors
///
/// Returns [`AppError::Contract`] when `fields` is empty, names a field
/// outside `columns`, or holds an array or object value.
pub fn sql_for_partial_update(fields: &FieldMap, columns: &UpdatableColumns) -> Result<PartialUpdate> {
    if fields.is_empty() {
        return Err(AppError::Contract("No data".to_string()));
    }

    let mut set_cols = Vec::with_capacity(fields.len());
    let mut values = Vec::with_capacity(fields.len());

    for (idx, (field, value)) in fields.iter().enumerate() {
        let column = columns
            .resolve(field)
            .ok_or_else(|| AppError::Contract(format!("Field not updatable: {}", field)))?;

        if value.is_array() || value.is_object() {
            return Err(AppError::Contract(format!(
                "Field {} must be a scalar value",
                field
            )));
        }

        set_cols.push(format!("\"{}\"=${}", column, idx + 1));
        values.push(value.clone());
    }

    Ok(PartialUpdate {
        set_cols: set_cols.join(", "),
        values,
    })
}

/// A complete `UPDATE ... SET ... WHERE ... RETURNING ...` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    pub sql: String,
    pub values: Vec<Value>,
}

impl UpdateStatement {
    /// Appends a single-column equality predicate bound to the next free
    /// placeholder.
    pub fn new(
        table: &str,
        update: PartialUpdate,
        key_column: &str,
        key: Value,
        returning: &str,
    ) -> Self {
        let PartialUpdate { set_cols, mut values } = update;
        let key_idx = values.len() + 1;
        values.push(key);

        Self {
            sql: format!(
                "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
                table, set_cols, key_column, key_idx, returning
            ),
            values,
        }
    }
}

/// Accumulates `AND`-joined `WHERE` conditions with numbered placeholders.
#[derive(Debug, Default)]
pub struct WhereBuilder {
    conditions: Vec<String>,
    values: Vec<Value>,
}

impl WhereBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a condition. Every `$` in `template` is replaced with the
    /// placeholder for `value`.
    pub fn push(&mut self, template: &str, value: impl Into<Value>) -> &mut Self {
        self.values.push(value.into());
        let placeholder = format!("${}", self.values.len());
        self.conditions.push(template.replace('$', &placeholder));
        self
    }

    /// Adds a condition that binds no value.
    pub fn push_raw(&mut self, condition: &str) -> &mut Self {
        self.conditions.push(condition.to_string());
        self
    }

    /// The `WHERE ...` clause (empty when no condition was added) and its
    /// values.
    pub fn build(self) -> (String, Vec<Value>) {
        if self.conditions.is_empty() {
            return (String::new(), self.values);
        }

        (format!("WHERE {}", self.conditions.join(" AND ")), self.values)
    }
}
