use crate::core::common::types::{value_from_engine, Row, Value};
use crate::core::common::EngineError;
use crate::core::schema::TableSchema;
use rusqlite::{Connection, OpenFlags};
use std::fs;
use std::path::{Path, PathBuf};

/// How `Session::open` treats the database file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateMode {
    /// Open a file that must already exist.
    OpenExisting,
    /// Create a file that must not already exist.
    CreateNew,
    /// Create the file, removing any previous one first.
    CreateAndReplace,
}

/// Handle to the embedded engine runtime backing a session.
///
/// The engine runs in-process, but the handle still models the start/stop
/// lifecycle so a session releases it exactly once.
#[derive(Debug)]
pub struct Engine {
    version: String,
}

impl Engine {
    /// Starts the engine runtime.
    ///
    /// # Errors
    /// Returns `EngineUnavailable` if the engine cannot be brought up at all;
    /// probed with a throwaway in-memory connection so the failure surfaces
    /// here rather than on the first file operation.
    fn start() -> Result<Self, EngineError> {
        Connection::open_in_memory()
            .map_err(|e| EngineError::EngineUnavailable(e.to_string()))?;
        Ok(Self { version: rusqlite::version().to_string() })
    }

    /// The engine library version this handle is bound to.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    fn stop(self) {}
}

/// Ties one running engine handle to one open database file.
///
/// A session is created at the start of each top-level operation and torn
/// down before that operation returns. `close` releases the connection and
/// then the engine; `Drop` guarantees the same on every other exit path, so
/// no dangling handle survives a failure.
#[derive(Debug)]
pub struct Session {
    engine: Option<Engine>,
    conn: Option<Connection>,
    path: PathBuf,
}

impl Session {
    /// Starts the engine and opens a connection to the given database file.
    ///
    /// # Errors
    /// Returns `EngineError` if:
    /// - The engine cannot be started (`EngineUnavailable`)
    /// - The file is absent under `OpenExisting`, already present under
    ///   `CreateNew`, or cannot be removed under `CreateAndReplace`
    ///   (`FileAccess` / `Io`)
    ///
    /// A failed open leaves no partial session behind.
    pub fn open<P: AsRef<Path>>(path: P, create_mode: CreateMode) -> Result<Self, EngineError> {
        let path = path.as_ref().to_path_buf();
        let engine = Engine::start()?;
        let conn = match create_mode {
            CreateMode::OpenExisting => Connection::open_with_flags(
                &path,
                OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?,
            CreateMode::CreateNew => {
                if path.exists() {
                    return Err(EngineError::FileAccess(format!(
                        "database file already exists: {}",
                        path.display()
                    )));
                }
                Connection::open(&path)?
            }
            CreateMode::CreateAndReplace => {
                if path.exists() {
                    fs::remove_file(&path)?;
                }
                Connection::open(&path)?
            }
        };
        Ok(Self { engine: Some(engine), conn: Some(conn), path })
    }

    /// The database file this session is bound to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The engine handle, while the session is live.
    #[must_use]
    pub fn engine(&self) -> Option<&Engine> {
        self.engine.as_ref()
    }

    pub(crate) fn conn(&self) -> Result<&Connection, EngineError> {
        self.conn.as_ref().ok_or_else(|| {
            EngineError::EngineUnavailable("session has already been closed".to_string())
        })
    }

    /// Creates the physical table for one schema.
    ///
    /// # Errors
    /// Returns `SchemaConflict` if a table of that name already exists.
    pub fn create_table(&self, schema: &TableSchema) -> Result<(), EngineError> {
        self.conn()?.execute(&schema.create_table_sql(), [])?;
        Ok(())
    }

    /// Creates the physical tables for each schema in order, failing fast on
    /// the first conflict.
    ///
    /// Tables created earlier in the same call are left in place when a later
    /// one fails; the installer is deliberately non-transactional.
    ///
    /// # Errors
    /// Returns the first `SchemaConflict` (or other engine error) hit.
    pub fn create_tables(&self, schemas: &[TableSchema]) -> Result<(), EngineError> {
        for schema in schemas {
            self.create_table(schema)?;
        }
        Ok(())
    }

    /// Submits an UPDATE/DELETE-style statement and reports the affected-row
    /// count.
    ///
    /// # Errors
    /// Returns `Execution` if the engine rejects the statement or if the
    /// statement yields rows instead of a count.
    pub fn execute_command(&self, command: &str) -> Result<u64, EngineError> {
        let count = self.conn()?.execute(command, [])?;
        Ok(count as u64)
    }

    /// Runs a query expected to yield exactly one row with one column and
    /// returns that value.
    ///
    /// # Errors
    /// Returns `Cardinality` for any other result shape, naming the shape
    /// actually produced.
    pub fn execute_scalar_query(&self, query: &str) -> Result<Value, EngineError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(query)?;
        let columns = stmt.column_count();
        let mut rows = stmt.query([])?;
        let first = match rows.next()? {
            Some(row) if columns == 1 => value_from_engine(row.get_ref(0)?)?,
            Some(_) => return Err(EngineError::Cardinality { rows: 1, columns }),
            None => return Err(EngineError::Cardinality { rows: 0, columns }),
        };
        let mut row_count = 1;
        while rows.next()?.is_some() {
            row_count += 1;
        }
        if row_count != 1 {
            return Err(EngineError::Cardinality { rows: row_count, columns });
        }
        Ok(first)
    }

    /// Runs a query and eagerly materializes every row.
    ///
    /// # Errors
    /// Returns `Execution` if the engine rejects the query.
    pub fn execute_list_query(&self, query: &str) -> Result<Vec<Row>, EngineError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(query)?;
        let columns = stmt.column_count();
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(columns);
            for index in 0..columns {
                values.push(value_from_engine(row.get_ref(index)?)?);
            }
            out.push(Row::new(values));
        }
        Ok(out)
    }

    /// Releases the connection, then the engine.
    ///
    /// # Errors
    /// Returns the engine's error if the connection refuses to close; the
    /// engine handle is released regardless.
    pub fn close(mut self) -> Result<(), EngineError> {
        self.release()
    }

    fn release(&mut self) -> Result<(), EngineError> {
        let closed = self
            .conn
            .take()
            .map_or(Ok(()), |conn| conn.close().map_err(|(_, err)| EngineError::from(err)));
        if let Some(engine) = self.engine.take() {
            engine.stop();
        }
        closed
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let _ = self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::common::types::{Nullability, SqlType};
    use crate::core::schema::{escape_name, Column};
    use tempfile::tempdir;

    fn items_schema() -> TableSchema {
        TableSchema::new(
            "Items",
            vec![
                Column::new("Item ID", SqlType::BigInt, Nullability::NotNullable),
                Column::new("Label", SqlType::Text, Nullability::Nullable),
            ],
        )
    }

    #[test]
    fn open_existing_fails_for_missing_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let result = Session::open(dir.path().join("absent.db"), CreateMode::OpenExisting);
        assert!(matches!(result, Err(EngineError::FileAccess(_))));
    }

    #[test]
    fn create_new_fails_when_file_exists() -> Result<(), EngineError> {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("demo.db");
        Session::open(&path, CreateMode::CreateNew)?.close()?;
        let result = Session::open(&path, CreateMode::CreateNew);
        assert!(matches!(result, Err(EngineError::FileAccess(_))));
        Ok(())
    }

    #[test]
    fn create_and_replace_discards_previous_contents() -> Result<(), EngineError> {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("demo.db");

        let session = Session::open(&path, CreateMode::CreateNew)?;
        session.create_table(&items_schema())?;
        session.close()?;

        let session = Session::open(&path, CreateMode::CreateAndReplace)?;
        // Same table name must succeed again after the replace.
        session.create_table(&items_schema())?;
        session.close()?;
        Ok(())
    }

    #[test]
    fn duplicate_create_table_is_a_schema_conflict() -> Result<(), EngineError> {
        let dir = tempdir().expect("Failed to create temp dir");
        let session = Session::open(dir.path().join("demo.db"), CreateMode::CreateNew)?;
        session.create_table(&items_schema())?;
        let result = session.create_table(&items_schema());
        assert!(matches!(result, Err(EngineError::SchemaConflict(_))));
        Ok(())
    }

    #[test]
    fn failed_install_keeps_earlier_tables() -> Result<(), EngineError> {
        let dir = tempdir().expect("Failed to create temp dir");
        let session = Session::open(dir.path().join("demo.db"), CreateMode::CreateNew)?;
        let first = items_schema();
        let duplicate = items_schema();
        assert!(session.create_tables(&[first, duplicate]).is_err());
        // The first create is not rolled back.
        let count = session
            .execute_scalar_query(&format!("SELECT COUNT(*) FROM {}", escape_name("Items")))?;
        assert_eq!(count.as_i64(), Some(0));
        Ok(())
    }

    #[test]
    fn scalar_query_enforces_cardinality() -> Result<(), EngineError> {
        let dir = tempdir().expect("Failed to create temp dir");
        let session = Session::open(dir.path().join("demo.db"), CreateMode::CreateNew)?;
        session.create_table(&items_schema())?;
        session.execute_command("INSERT INTO \"Items\" VALUES (1, 'a')")?;
        session.execute_command("INSERT INTO \"Items\" VALUES (2, 'b')")?;

        let result = session.execute_scalar_query("SELECT * FROM \"Items\"");
        assert!(matches!(result, Err(EngineError::Cardinality { .. })));

        let result =
            session.execute_scalar_query("SELECT \"Item ID\" FROM \"Items\" WHERE 1 = 0");
        assert!(matches!(result, Err(EngineError::Cardinality { rows: 0, .. })));

        let count = session.execute_scalar_query("SELECT COUNT(*) FROM \"Items\"")?;
        assert_eq!(count.as_i64(), Some(2));
        Ok(())
    }

    #[test]
    fn list_query_materializes_all_rows() -> Result<(), EngineError> {
        let dir = tempdir().expect("Failed to create temp dir");
        let session = Session::open(dir.path().join("demo.db"), CreateMode::CreateNew)?;
        session.create_table(&items_schema())?;
        session.execute_command("INSERT INTO \"Items\" VALUES (1, 'a')")?;
        session.execute_command("INSERT INTO \"Items\" VALUES (2, NULL)")?;

        let rows = session.execute_list_query("SELECT * FROM \"Items\" ORDER BY \"Item ID\"")?;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get(1).and_then(Value::as_str), Some("a"));
        assert!(rows[1].get(1).is_some_and(Value::is_null));

        // Row exposes its cells both as a slice and by iteration.
        let first = &rows[0];
        assert!(!first.is_empty());
        assert_eq!(first.values().len(), first.len());
        let ids: Vec<i64> = rows
            .iter()
            .flat_map(|row| row.into_iter().filter_map(Value::as_i64))
            .collect();
        assert_eq!(ids, [1, 2]);
        Ok(())
    }

    #[test]
    fn file_reopens_after_close_and_after_drop() -> Result<(), EngineError> {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("demo.db");

        let session = Session::open(&path, CreateMode::CreateNew)?;
        session.create_table(&items_schema())?;
        session.close()?;

        {
            let session = Session::open(&path, CreateMode::OpenExisting)?;
            // Force an error path, then drop without closing.
            assert!(session.execute_command("NOT SQL AT ALL").is_err());
        }

        let session = Session::open(&path, CreateMode::OpenExisting)?;
        let count = session.execute_scalar_query("SELECT COUNT(*) FROM \"Items\"")?;
        assert_eq!(count.as_i64(), Some(0));
        session.close()
    }

    #[test]
    fn engine_handle_reports_a_version() -> Result<(), EngineError> {
        let dir = tempdir().expect("Failed to create temp dir");
        let session = Session::open(dir.path().join("demo.db"), CreateMode::CreateNew)?;
        let engine = session.engine().expect("live session has an engine handle");
        assert!(!engine.version().is_empty());
        Ok(())
    }
}
