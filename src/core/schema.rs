//! Table shapes and the statement-text helpers used to reference them.

use crate::core::common::types::{Nullability, SqlType, Value};
use crate::core::common::EngineError;
use serde::{Deserialize, Serialize};

/// Wraps an identifier so it is safe to splice into statement text.
///
/// Double quotes inside the name are doubled; everything else passes through
/// verbatim, so names with spaces ("Line Items") work unchanged.
#[must_use]
pub fn escape_name(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Wraps a string literal for inclusion in statement text, doubling any
/// embedded single quotes.
#[must_use]
pub fn escape_string_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// One typed, possibly nullable column of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    sql_type: SqlType,
    nullability: Nullability,
}

impl Column {
    pub fn new<S: Into<String>>(name: S, sql_type: SqlType, nullability: Nullability) -> Self {
        Self { name: name.into(), sql_type, nullability }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn sql_type(&self) -> SqlType {
        self.sql_type
    }

    #[must_use]
    pub const fn nullability(&self) -> Nullability {
        self.nullability
    }

    fn render(&self) -> String {
        let constraint = match self.nullability {
            Nullability::NotNullable => " NOT NULL",
            Nullability::Nullable => "",
        };
        format!("{} {}{constraint}", escape_name(&self.name), self.sql_type.sql_name())
    }
}

/// The fixed name-plus-columns definition of one table. Immutable once
/// constructed; the installer turns it into a physical table and everything
/// else only references it for naming and validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    name: String,
    columns: Vec<Column>,
}

impl TableSchema {
    pub fn new<S: Into<String>>(name: S, columns: Vec<Column>) -> Self {
        Self { name: name.into(), columns }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Renders the create-table statement for this schema.
    #[must_use]
    pub fn create_table_sql(&self) -> String {
        let columns: Vec<String> = self.columns.iter().map(Column::render).collect();
        format!("CREATE TABLE {} ({})", escape_name(&self.name), columns.join(", "))
    }

    /// Checks one row against this schema: arity first, then nullability and
    /// type compatibility per column.
    ///
    /// # Errors
    /// Returns `ArityMismatch`, `NullViolation`, or `TypeMismatch` naming the
    /// first offending column. The engine still enforces its own rules when
    /// the row is submitted; this check just fails before any engine call.
    pub fn check_row(&self, row: &[Value]) -> Result<(), EngineError> {
        if row.len() != self.columns.len() {
            return Err(EngineError::ArityMismatch {
                table: self.name.clone(),
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        for (column, value) in self.columns.iter().zip(row) {
            if value.is_null() {
                if column.nullability() == Nullability::NotNullable {
                    return Err(EngineError::NullViolation {
                        table: self.name.clone(),
                        column: column.name().to_string(),
                    });
                }
            } else if !column.sql_type().accepts(value) {
                return Err(EngineError::TypeMismatch {
                    table: self.name.clone(),
                    column: column.name().to_string(),
                    expected: column.sql_type().sql_name(),
                    found: value.type_name(),
                });
            }
        }
        Ok(())
    }
}
