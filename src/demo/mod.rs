//! The four demonstration operations.
//!
//! Each operation opens its own session, does its work, and fully closes the
//! session before returning; no state is shared between them apart from the
//! database file itself. The update and delete passes each run against a
//! fresh copy of the file, so no two sessions ever contend for one file.

pub mod superstore;

use crate::api::{CreateMode, Inserter, Session};
use crate::core::common::EngineError;
use crate::core::schema::{escape_name, TableSchema};
use std::fs;
use std::path::{Path, PathBuf};
use self::superstore::{
    customer_schema, line_items_schema, orders_schema, products_schema, sample_customers,
    sample_line_items, sample_orders, sample_product, superstore_schemas,
};

/// Default database file the demonstrations run against.
pub const DEFAULT_DATABASE: &str = "superstore.db";
/// File name of the copy the update demonstration works on.
pub const UPDATE_COPY: &str = "superstore_sample_update.db";
/// File name of the copy the delete demonstration works on.
pub const DELETE_COPY: &str = "superstore_sample_delete.db";

fn count_rows(session: &Session, table: &str) -> Result<i64, EngineError> {
    let count = session
        .execute_scalar_query(&format!("SELECT COUNT(*) FROM {}", escape_name(table)))?;
    count.as_i64().ok_or_else(|| {
        EngineError::Execution(format!("COUNT(*) returned a non-integer value for table {table}"))
    })
}

fn report_counts(
    session: &Session,
    schemas: &[TableSchema],
) -> Result<Vec<(String, i64)>, EngineError> {
    let mut counts = Vec::with_capacity(schemas.len());
    for schema in schemas {
        let count = count_rows(session, schema.name())?;
        println!("The number of rows in table {} is {count}.", schema.name());
        counts.push((schema.name().to_string(), count));
    }
    Ok(counts)
}

fn copy_database(source: &Path, copy: &Path) -> Result<PathBuf, EngineError> {
    fs::copy(source, copy)?;
    Ok(copy.to_path_buf())
}

/// Creates the five Superstore tables in a fresh database file and reports
/// the (all-zero) per-table row counts.
///
/// # Errors
/// Propagates any `EngineError`; the session is released either way.
pub fn run_create<P: AsRef<Path>>(path: P) -> Result<Vec<(String, i64)>, EngineError> {
    println!("EXAMPLE - Create multiple tables within a new database file");

    let session = Session::open(path, CreateMode::CreateAndReplace)?;
    let schemas = superstore_schemas();
    session.create_tables(&schemas)?;
    let counts = report_counts(&session, &schemas)?;
    session.close()?;

    println!("The connection to the database file has been closed.");
    println!("The engine has been shut down.");
    Ok(counts)
}

/// Creates the tables in a fresh database file, bulk-inserts the sample rows,
/// and reports the per-table row counts.
///
/// Orders, Customer, and Line Items are loaded as multi-row batches; Products
/// takes the single-row path. The `test Items` table stays empty.
///
/// # Errors
/// Propagates any `EngineError`; the session is released either way.
pub fn run_insert<P: AsRef<Path>>(path: P) -> Result<Vec<(String, i64)>, EngineError> {
    println!("EXAMPLE - Insert data into multiple tables within a new database file");

    let session = Session::open(path, CreateMode::CreateAndReplace)?;
    let schemas = superstore_schemas();
    session.create_tables(&schemas)?;

    let orders = orders_schema();
    let mut inserter = Inserter::new(&session, &orders);
    inserter.add_rows(sample_orders())?;
    inserter.execute()?;

    let customer = customer_schema();
    let mut inserter = Inserter::new(&session, &customer);
    inserter.add_rows(sample_customers())?;
    inserter.execute()?;

    // Single-row insert into Products.
    let products = products_schema();
    let mut inserter = Inserter::new(&session, &products);
    inserter.add_row(sample_product())?;
    inserter.execute()?;

    let line_items = line_items_schema();
    let mut inserter = Inserter::new(&session, &line_items);
    inserter.add_rows(sample_line_items())?;
    inserter.execute()?;

    let counts = report_counts(&session, &schemas)?;
    session.close()?;

    println!("The connection to the database file has been closed.");
    println!("The engine has been shut down.");
    Ok(counts)
}

/// Copies the database file, then shifts every early or late order date in
/// the copy by ten days, reporting the affected-row count.
///
/// A row matches when its `Order Date` is on or before 2012-08-01 or on or
/// after 2013-03-01.
///
/// # Errors
/// Propagates any `EngineError`, including the file copy failing; the
/// session is released either way.
pub fn run_update<P: AsRef<Path>, Q: AsRef<Path>>(
    source: P,
    copy: Q,
) -> Result<u64, EngineError> {
    println!("EXAMPLE - Update data in a copy of an existing database file");

    let path = copy_database(source.as_ref(), copy.as_ref())?;
    let session = Session::open(&path, CreateMode::OpenExisting)?;

    let orders = escape_name("Orders");
    let order_date = escape_name("Order Date");
    let order_id = escape_name("Order ID");

    let rows_pre_update = session
        .execute_list_query(&format!("SELECT {order_date}, {order_id} FROM {orders}"))?;
    println!("Pre-Update: Individual rows showing 'Order Date' and 'Order ID' columns: {rows_pre_update:?}\n");

    println!("Update {orders} rows with early or late order dates.");
    let row_count = session.execute_command(&format!(
        "UPDATE {orders} SET {order_date} = date({order_date}, '+10 day') \
         WHERE {order_date} <= '2012-08-01' OR {order_date} >= '2013-03-01'"
    ))?;
    println!("The number of updated rows in table {orders} is {row_count}");

    let rows_post_update = session
        .execute_list_query(&format!("SELECT {order_date}, {order_id} FROM {orders}"))?;
    println!("Post-Update: Individual rows showing 'Order Date' and 'Order ID' columns: {rows_post_update:?}");

    // The original reports counts for the four data tables here.
    report_counts(&session, &superstore_schemas()[..4])?;
    session.close()?;

    println!("The connection to the database file has been closed.");
    println!("The engine has been shut down.");
    Ok(row_count)
}

/// Copies the database file, then deletes the Customer rows whose ID appears
/// in early Orders, followed by those Orders rows themselves.
///
/// Returns the two affected-row counts in that order.
///
/// # Errors
/// Propagates any `EngineError`, including the file copy failing; the
/// session is released either way.
pub fn run_delete<P: AsRef<Path>, Q: AsRef<Path>>(
    source: P,
    copy: Q,
) -> Result<(u64, u64), EngineError> {
    println!("EXAMPLE - Delete data from a copy of an existing database file");

    let path = copy_database(source.as_ref(), copy.as_ref())?;
    let session = Session::open(&path, CreateMode::OpenExisting)?;

    let customer = escape_name("Customer");
    let customer_id = escape_name("Customer ID");
    let orders = escape_name("Orders");
    let order_date = escape_name("Order Date");

    println!("Delete customers whose ID appears in early orders from table {customer}");
    let customers_deleted = session.execute_command(&format!(
        "DELETE FROM {customer} WHERE {customer_id} IN (\
         SELECT {customer_id} FROM {orders} WHERE {order_date} <= '2012-08-01')"
    ))?;
    println!("The number of deleted rows in table {customer} is {customers_deleted}.\n");

    println!("Delete the early orders themselves from table {orders}");
    let orders_deleted = session
        .execute_command(&format!("DELETE FROM {orders} WHERE {order_date} <= '2012-08-01'"))?;
    println!("The number of deleted rows in table {orders} is {orders_deleted}.");

    session.close()?;

    println!("The connection to the database file has been closed.");
    println!("The engine has been shut down.");
    Ok((customers_deleted, orders_deleted))
}
