use crate::core::common::EngineError;
use chrono::NaiveDate;
use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

/// The semantic column types the demonstration tables use.
///
/// Dates are persisted as ISO-8601 text; everything else maps directly onto
/// the engine's storage classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SqlType {
    SmallInt,
    BigInt,
    Double,
    Text,
    Date,
}

impl SqlType {
    /// The type name used when rendering CREATE TABLE statements.
    #[must_use]
    pub const fn sql_name(self) -> &'static str {
        match self {
            Self::SmallInt => "SMALLINT",
            Self::BigInt => "BIGINT",
            Self::Double => "DOUBLE PRECISION",
            Self::Text => "TEXT",
            Self::Date => "DATE",
        }
    }

    /// Whether a value can be bound to a column of this type.
    ///
    /// Integers widen (a small integer binds to a big-integer or double
    /// column); nothing narrows. `Null` is a nullability question, not a type
    /// question, and is never accepted here.
    #[must_use]
    pub const fn accepts(self, value: &Value) -> bool {
        match self {
            Self::SmallInt => matches!(value, Value::SmallInt(_)),
            Self::BigInt => matches!(value, Value::SmallInt(_) | Value::BigInt(_)),
            Self::Double => {
                matches!(value, Value::SmallInt(_) | Value::BigInt(_) | Value::Double(_))
            }
            Self::Text => matches!(value, Value::Text(_)),
            Self::Date => matches!(value, Value::Date(_)),
        }
    }
}

/// Whether a column tolerates absent values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Nullability {
    NotNullable,
    Nullable,
}

/// A single cell value, positionally typed by the owning table's schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    SmallInt(i16),
    BigInt(i64),
    Double(f64),
    Text(String),
    Date(NaiveDate),
    Null,
}

impl Value {
    /// A short name for error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::SmallInt(_) => "SMALLINT",
            Self::BigInt(_) => "BIGINT",
            Self::Double(_) => "DOUBLE PRECISION",
            Self::Text(_) => "TEXT",
            Self::Date(_) => "DATE",
            Self::Null => "NULL",
        }
    }

    /// The value as an integer, widening from `SmallInt`.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::SmallInt(v) => Some(*v as i64),
            Self::BigInt(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The value as a calendar date.
    ///
    /// The engine hands date columns back as ISO-8601 text, so `Text` values
    /// in that shape parse too.
    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            Self::Text(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").ok(),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            Self::SmallInt(v) => Ok(ToSqlOutput::from(i64::from(*v))),
            Self::BigInt(v) => Ok(ToSqlOutput::from(*v)),
            Self::Double(v) => Ok(ToSqlOutput::from(*v)),
            Self::Text(s) => Ok(ToSqlOutput::from(s.as_str())),
            Self::Date(d) => d.to_sql(),
            Self::Null => Ok(ToSqlOutput::Owned(rusqlite::types::Value::Null)),
        }
    }
}

/// Builds a `Value` from whatever the engine handed back for one cell.
///
/// The engine's integer storage class is widened to `BigInt`; date columns
/// come back as text and stay text until the caller asks for a date.
pub(crate) fn value_from_engine(cell: ValueRef<'_>) -> Result<Value, EngineError> {
    match cell {
        ValueRef::Null => Ok(Value::Null),
        ValueRef::Integer(v) => Ok(Value::BigInt(v)),
        ValueRef::Real(v) => Ok(Value::Double(v)),
        ValueRef::Text(bytes) => Ok(Value::Text(String::from_utf8_lossy(bytes).into_owned())),
        ValueRef::Blob(_) => Err(EngineError::Execution(
            "query returned a blob value, which no demonstration column uses".to_string(),
        )),
    }
}

/// A single row of query results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Values in the row, indexed by column position
    values: Vec<Value>,
}

impl Row {
    /// Creates a new row with the given values
    #[must_use]
    pub const fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Gets a value by column index
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Returns the number of columns in this row
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the row has no columns
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the values in column order
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
