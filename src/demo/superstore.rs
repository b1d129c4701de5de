//! The fixed Superstore table shapes and their sample rows.
//!
//! These are static configuration: defined once, installed at session start,
//! and referenced afterwards only for naming and read-back.

use crate::core::common::types::{SqlType, Value};
use crate::core::schema::{Column, TableSchema};
use crate::core::common::types::Nullability::{NotNullable, Nullable};
use chrono::NaiveDate;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

#[must_use]
pub fn orders_schema() -> TableSchema {
    TableSchema::new(
        "Orders",
        vec![
            Column::new("Address ID", SqlType::SmallInt, NotNullable),
            Column::new("Customer ID", SqlType::Text, NotNullable),
            Column::new("Order Date", SqlType::Date, NotNullable),
            Column::new("Order ID", SqlType::Text, NotNullable),
            Column::new("Ship Date", SqlType::Date, Nullable),
            Column::new("Ship Mode", SqlType::Text, Nullable),
        ],
    )
}

#[must_use]
pub fn customer_schema() -> TableSchema {
    TableSchema::new(
        "Customer",
        vec![
            Column::new("Customer ID", SqlType::Text, NotNullable),
            Column::new("Customer Name", SqlType::Text, NotNullable),
            Column::new("Loyalty Reward Points", SqlType::BigInt, NotNullable),
            Column::new("Segment", SqlType::Text, NotNullable),
        ],
    )
}

#[must_use]
pub fn products_schema() -> TableSchema {
    TableSchema::new(
        "Products",
        vec![
            Column::new("Category", SqlType::Text, NotNullable),
            Column::new("Product ID", SqlType::Text, NotNullable),
            Column::new("Product Name", SqlType::Text, NotNullable),
            Column::new("Sub-Category", SqlType::Text, NotNullable),
        ],
    )
}

#[must_use]
pub fn line_items_schema() -> TableSchema {
    TableSchema::new(
        "Line Items",
        vec![
            Column::new("Line Item ID", SqlType::BigInt, NotNullable),
            Column::new("Order ID", SqlType::Text, NotNullable),
            Column::new("Product ID", SqlType::Text, NotNullable),
            Column::new("Sales", SqlType::Double, NotNullable),
            Column::new("Quantity", SqlType::SmallInt, NotNullable),
            Column::new("Discount", SqlType::Double, Nullable),
            Column::new("Profit", SqlType::Double, NotNullable),
        ],
    )
}

#[must_use]
pub fn test_items_schema() -> TableSchema {
    TableSchema::new(
        "test Items",
        vec![
            Column::new("Test Item ID", SqlType::BigInt, NotNullable),
            Column::new("Test ID", SqlType::Text, NotNullable),
            Column::new("Test Product ID", SqlType::Text, NotNullable),
            Column::new("Test Sales", SqlType::Double, NotNullable),
            Column::new("Test Quantity", SqlType::SmallInt, NotNullable),
            Column::new("Test Discount", SqlType::Double, Nullable),
            Column::new("Test Profit", SqlType::Double, NotNullable),
        ],
    )
}

/// The five fixed table shapes, in installation order.
#[must_use]
pub fn superstore_schemas() -> Vec<TableSchema> {
    vec![
        orders_schema(),
        customer_schema(),
        products_schema(),
        line_items_schema(),
        test_items_schema(),
    ]
}

fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

/// The three sample `Orders` rows.
#[must_use]
pub fn sample_orders() -> Vec<Vec<Value>> {
    vec![
        vec![
            Value::SmallInt(399),
            text("DK-13375"),
            Value::Date(date(2012, 9, 7)),
            text("CA-2011-100006"),
            Value::Date(date(2012, 9, 13)),
            text("Standard Class"),
        ],
        vec![
            Value::SmallInt(530),
            text("EB-13705"),
            Value::Date(date(2012, 7, 8)),
            text("CA-2011-100090"),
            Value::Date(date(2012, 7, 12)),
            text("Standard Class"),
        ],
        vec![
            Value::SmallInt(777),
            text("SM-24680"),
            Value::Date(date(2013, 3, 2)),
            text("CA-2011-100099"),
            Value::Date(date(2012, 3, 12)),
            text("Standard Class"),
        ],
    ]
}

/// The three sample `Customer` rows.
#[must_use]
pub fn sample_customers() -> Vec<Vec<Value>> {
    vec![
        vec![text("DK-13375"), text("Dennis Kane"), Value::BigInt(518), text("Consumer")],
        vec![text("EB-13705"), text("Ed Braxton"), Value::BigInt(815), text("Corporate")],
        vec![text("SM-24680"), text("Sad Mushroom"), Value::BigInt(816), text("Corporate")],
    ]
}

/// The single sample `Products` row.
#[must_use]
pub fn sample_product() -> Vec<Value> {
    vec![text("TEC-PH-10002075"), text("Technology"), text("Phones"), text("AT&T EL51110 DECT")]
}

/// The two sample `Line Items` rows; the second carries a null `Discount`.
#[must_use]
pub fn sample_line_items() -> Vec<Vec<Value>> {
    vec![
        vec![
            Value::BigInt(2718),
            text("CA-2011-100006"),
            text("TEC-PH-10002075"),
            Value::Double(377.97),
            Value::SmallInt(3),
            Value::Double(0.0),
            Value::Double(109.6113),
        ],
        vec![
            Value::BigInt(2719),
            text("CA-2011-100090"),
            text("TEC-PH-10002075"),
            Value::Double(377.97),
            Value::SmallInt(3),
            Value::Null,
            Value::Double(109.6113),
        ],
    ]
}
