use crate::api::session::Session;
use crate::core::common::types::Value;
use crate::core::common::EngineError;
use crate::core::schema::{escape_name, TableSchema};
use rusqlite::params_from_iter;

/// Buffers typed rows for one table and submits them as a single batch.
///
/// Rows are validated against the schema as they are added, so a bad row is
/// rejected before anything reaches the engine. `execute` submits the whole
/// buffer inside one engine transaction; the buffer is discarded with the
/// inserter afterwards.
#[derive(Debug)]
pub struct Inserter<'a> {
    session: &'a Session,
    schema: &'a TableSchema,
    rows: Vec<Vec<Value>>,
}

impl<'a> Inserter<'a> {
    #[must_use]
    pub const fn new(session: &'a Session, schema: &'a TableSchema) -> Self {
        Self { session, schema, rows: Vec::new() }
    }

    /// Number of rows buffered so far.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.rows.len()
    }

    /// Buffers a single row.
    ///
    /// # Errors
    /// Returns `ArityMismatch`, `NullViolation`, or `TypeMismatch` if the row
    /// does not fit the table schema; nothing is buffered in that case.
    pub fn add_row(&mut self, row: Vec<Value>) -> Result<&mut Self, EngineError> {
        self.schema.check_row(&row)?;
        self.rows.push(row);
        Ok(self)
    }

    /// Buffers a batch of rows, stopping at the first invalid one.
    ///
    /// # Errors
    /// As for `add_row`. Rows accepted before the failure stay buffered.
    pub fn add_rows<I>(&mut self, rows: I) -> Result<&mut Self, EngineError>
    where
        I: IntoIterator<Item = Vec<Value>>,
    {
        for row in rows {
            self.add_row(row)?;
        }
        Ok(self)
    }

    /// Submits the buffered rows as one insert unit and reports how many
    /// were inserted. An empty buffer is a no-op.
    ///
    /// # Errors
    /// Returns the engine's error if the batch is rejected; the enclosing
    /// transaction is rolled back, so no partial batch is committed by this
    /// call.
    pub fn execute(self) -> Result<u64, EngineError> {
        if self.rows.is_empty() {
            return Ok(0);
        }
        let conn = self.session.conn()?;
        let tx = conn.unchecked_transaction()?;
        let placeholders = vec!["?"; self.schema.column_count()].join(", ");
        let sql = format!(
            "INSERT INTO {} VALUES ({placeholders})",
            escape_name(self.schema.name())
        );
        {
            let mut stmt = tx.prepare(&sql)?;
            for row in &self.rows {
                stmt.execute(params_from_iter(row.iter()))?;
            }
        }
        tx.commit()?;
        Ok(self.rows.len() as u64)
    }
}
