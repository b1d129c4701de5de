//! End-to-end runs of the four demonstration operations against scratch
//! database files.

use approx::assert_relative_eq;
use chrono::NaiveDate;
use superstore_demo::demo::{run_create, run_delete, run_insert, run_update};
use superstore_demo::{escape_name, CreateMode, EngineError, Session, Value};
use tempfile::tempdir;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

fn count_rows(session: &Session, table: &str) -> i64 {
    session
        .execute_scalar_query(&format!("SELECT COUNT(*) FROM {}", escape_name(table)))
        .expect("count query")
        .as_i64()
        .expect("integer count")
}

#[test]
fn create_leaves_all_five_tables_empty() -> Result<(), EngineError> {
    let dir = tempdir().expect("Failed to create temp dir");
    let counts = run_create(dir.path().join("superstore.db"))?;
    assert_eq!(counts.len(), 5);
    for (table, count) in counts {
        assert_eq!(count, 0, "table {table} should be empty after create");
    }
    Ok(())
}

#[test]
fn insert_loads_the_sample_batches() -> Result<(), EngineError> {
    let dir = tempdir().expect("Failed to create temp dir");
    let counts = run_insert(dir.path().join("superstore.db"))?;
    let expected = [
        ("Orders", 3),
        ("Customer", 3),
        ("Products", 1),
        ("Line Items", 2),
        ("test Items", 0),
    ];
    for ((table, count), (expected_table, expected_count)) in counts.iter().zip(expected) {
        assert_eq!(table, expected_table);
        assert_eq!(*count, expected_count, "row count for table {table}");
    }
    Ok(())
}

#[test]
fn insert_is_rerunnable_because_the_file_is_replaced() -> Result<(), EngineError> {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("superstore.db");
    run_insert(&path)?;
    let counts = run_insert(&path)?;
    assert_eq!(counts[0], ("Orders".to_string(), 3));
    Ok(())
}

#[test]
fn nullable_discount_round_trips() -> Result<(), EngineError> {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("superstore.db");
    run_insert(&path)?;

    let session = Session::open(&path, CreateMode::OpenExisting)?;
    let rows = session.execute_list_query(&format!(
        "SELECT {}, {}, {} FROM {} ORDER BY {}",
        escape_name("Line Item ID"),
        escape_name("Sales"),
        escape_name("Discount"),
        escape_name("Line Items"),
        escape_name("Line Item ID"),
    ))?;
    assert_eq!(rows.len(), 2);

    let sales = rows[0].get(1).and_then(Value::as_f64).expect("Sales is a double");
    assert_relative_eq!(sales, 377.97);
    let discount = rows[0].get(2).and_then(Value::as_f64).expect("first Discount is set");
    assert_relative_eq!(discount, 0.0);
    assert!(rows[1].get(2).is_some_and(Value::is_null), "second Discount is absent");
    session.close()
}

#[test]
fn update_shifts_matching_order_dates_by_ten_days() -> Result<(), EngineError> {
    let dir = tempdir().expect("Failed to create temp dir");
    let source = dir.path().join("superstore.db");
    let copy = dir.path().join("superstore_sample_update.db");
    run_insert(&source)?;

    // Two of the three sample orders match the date window.
    let affected = run_update(&source, &copy)?;
    assert_eq!(affected, 2);

    let session = Session::open(&copy, CreateMode::OpenExisting)?;
    let rows = session.execute_list_query(&format!(
        "SELECT {}, {} FROM {} ORDER BY {}",
        escape_name("Order ID"),
        escape_name("Order Date"),
        escape_name("Orders"),
        escape_name("Order ID"),
    ))?;
    let dates: Vec<NaiveDate> = rows
        .iter()
        .map(|row| row.get(1).and_then(Value::as_date).expect("order date"))
        .collect();
    // CA-2011-100006 is untouched; the July and March orders moved +10 days.
    assert_eq!(dates, [date(2012, 9, 7), date(2012, 7, 18), date(2013, 3, 12)]);
    session.close()?;

    // The source file is untouched by the update pass.
    let session = Session::open(&source, CreateMode::OpenExisting)?;
    let untouched = session.execute_scalar_query(&format!(
        "SELECT {} FROM {} WHERE {} = 'CA-2011-100090'",
        escape_name("Order Date"),
        escape_name("Orders"),
        escape_name("Order ID"),
    ))?;
    assert_eq!(untouched.as_date(), Some(date(2012, 7, 8)));
    session.close()
}

#[test]
fn delete_removes_early_orders_and_their_customers() -> Result<(), EngineError> {
    let dir = tempdir().expect("Failed to create temp dir");
    let source = dir.path().join("superstore.db");
    let copy = dir.path().join("superstore_sample_delete.db");
    run_insert(&source)?;

    // Only the 2012-07-08 order falls on or before 2012-08-01.
    let (customers_deleted, orders_deleted) = run_delete(&source, &copy)?;
    assert_eq!(customers_deleted, 1);
    assert_eq!(orders_deleted, 1);

    let session = Session::open(&copy, CreateMode::OpenExisting)?;
    assert_eq!(count_rows(&session, "Orders"), 2);
    assert_eq!(count_rows(&session, "Customer"), 2);

    let remaining = session.execute_list_query(&format!(
        "SELECT {} FROM {} ORDER BY {}",
        escape_name("Order ID"),
        escape_name("Orders"),
        escape_name("Order ID"),
    ))?;
    let ids: Vec<&str> =
        remaining.iter().map(|row| row.get(0).and_then(Value::as_str).expect("id")).collect();
    assert_eq!(ids, ["CA-2011-100006", "CA-2011-100099"]);

    // Ed Braxton's customer row went with his order.
    let ed = session.execute_scalar_query(&format!(
        "SELECT COUNT(*) FROM {} WHERE {} = 'EB-13705'",
        escape_name("Customer"),
        escape_name("Customer ID"),
    ))?;
    assert_eq!(ed.as_i64(), Some(0));
    session.close()
}

#[test]
fn update_fails_cleanly_when_the_source_file_is_missing() {
    let dir = tempdir().expect("Failed to create temp dir");
    let source = dir.path().join("absent.db");
    let copy = dir.path().join("copy.db");
    let result = run_update(&source, &copy);
    assert!(matches!(result, Err(EngineError::Io(_))));
}

#[test]
fn file_is_reopenable_after_every_demonstration() -> Result<(), EngineError> {
    let dir = tempdir().expect("Failed to create temp dir");
    let source = dir.path().join("superstore.db");
    run_create(&source)?;
    run_insert(&source)?;
    run_update(&source, dir.path().join("update.db"))?;
    run_delete(&source, dir.path().join("delete.db"))?;

    // No dangling handle: an exclusive reopen of every file still works.
    for file in ["superstore.db", "update.db", "delete.db"] {
        let session = Session::open(dir.path().join(file), CreateMode::OpenExisting)?;
        session.close()?;
    }
    Ok(())
}
