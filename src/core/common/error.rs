use std::fmt;

/// Single error taxonomy for everything that can go wrong between the caller
/// and the engine. No operation in this crate recovers locally; every failure
/// unwinds to the top-level caller.
#[derive(Debug)]
pub enum EngineError {
    /// The embedded engine could not be started, or a call reached a session
    /// whose engine has already been released.
    EngineUnavailable(String),
    /// The database file could not be opened, created, or replaced.
    FileAccess(String),
    /// A create-table request collided with an existing table.
    SchemaConflict(String),
    /// A scalar query did not yield exactly one row with one column.
    Cardinality { rows: usize, columns: usize },
    /// The engine rejected a statement, or returned something a command-style
    /// call cannot represent.
    Execution(String),
    /// A row value does not match the type of its column.
    TypeMismatch { table: String, column: String, expected: &'static str, found: &'static str },
    /// An absent value was supplied for a column marked not-nullable.
    NullViolation { table: String, column: String },
    /// A row's arity does not match the owning table's column count.
    ArityMismatch { table: String, expected: usize, actual: usize },
    Io(std::io::Error),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EngineUnavailable(s) => write!(f, "Engine unavailable: {s}"),
            Self::FileAccess(s) => write!(f, "File access error: {s}"),
            Self::SchemaConflict(s) => write!(f, "Schema conflict: {s}"),
            Self::Cardinality { rows, columns } => write!(
                f,
                "Cardinality error: scalar query returned {rows} row(s) with {columns} column(s), expected exactly one of each"
            ),
            Self::Execution(s) => write!(f, "Execution error: {s}"),
            Self::TypeMismatch { table, column, expected, found } => write!(
                f,
                "Type mismatch in table {table}: column {column} expects {expected}, got {found}"
            ),
            Self::NullViolation { table, column } => {
                write!(f, "Null violation in table {table}: column {column} is not nullable")
            }
            Self::ArityMismatch { table, expected, actual } => write!(
                f,
                "Arity mismatch for table {table}: schema has {expected} column(s), row has {actual}"
            ),
            Self::Io(e) => write!(f, "IO Error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

// Manual From implementations
impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<rusqlite::Error> for EngineError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, message) => {
                let text = message.clone().unwrap_or_else(|| code.to_string());
                match code.code {
                    rusqlite::ErrorCode::CannotOpen
                    | rusqlite::ErrorCode::NotADatabase
                    | rusqlite::ErrorCode::PermissionDenied
                    | rusqlite::ErrorCode::DatabaseBusy
                    | rusqlite::ErrorCode::DatabaseLocked => Self::FileAccess(text),
                    _ if text.contains("already exists") => Self::SchemaConflict(text),
                    _ => Self::Execution(text),
                }
            }
            // The engine reports prepare-time failures separately from
            // execution failures; a duplicate CREATE TABLE surfaces here.
            rusqlite::Error::SqlInputError { msg, .. } => {
                if msg.contains("already exists") {
                    Self::SchemaConflict(msg.clone())
                } else {
                    Self::Execution(msg.clone())
                }
            }
            _ => Self::Execution(err.to_string()),
        }
    }
}
