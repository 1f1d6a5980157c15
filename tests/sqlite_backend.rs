//! End-to-end tests against a real SQLite database file. Every facade call
//! opens its own connection, so state must live in the file between calls.

#![cfg(feature = "sqlite")]

use sql_conduit::impl_from_row;
use sql_conduit::{sqlite, CommandKind, SqlConduitError, SqlParam, SqlValue};
use tempfile::TempDir;

#[derive(Debug, Default, Clone, PartialEq)]
struct OrderRec {
    id: i64,
    amount: f64,
    note: String,
}
impl_from_row!(OrderRec { id, amount, note });

#[derive(Debug, Default, PartialEq)]
struct Unrelated {
    serial: i64,
    label: String,
}
impl_from_row!(Unrelated { serial, label });

const SELECT_ORDERS: &str = "SELECT id, amount, note FROM orders ORDER BY id";

struct TestDb {
    _dir: TempDir,
    path: String,
}

async fn seeded_db() -> TestDb {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("orders.db").to_string_lossy().into_owned();

    sqlite::execute(
        &path,
        "CREATE TABLE orders (id INTEGER PRIMARY KEY, amount REAL NOT NULL, note TEXT)",
        &[],
        CommandKind::Text,
    )
    .await
    .unwrap();

    for (id, amount, note) in [
        (1_i64, 9.5, Some("first")),
        (2, 3.0, None),
        (3, 12.25, Some("third")),
    ] {
        let params = [
            SqlParam::new("id", SqlValue::Int(id)),
            SqlParam::new("amount", SqlValue::Float(amount)),
            SqlParam::new(
                "note",
                note.map_or(SqlValue::Null, |n| SqlValue::Text(n.into())),
            ),
        ];
        let affected = sqlite::execute(
            &path,
            "INSERT INTO orders (id, amount, note) VALUES (?, ?, ?)",
            &params,
            CommandKind::Text,
        )
        .await
        .unwrap();
        assert_eq!(affected, 1);
    }

    TestDb { _dir: dir, path }
}

#[tokio::test]
async fn typed_fetch_preserves_order_and_defaults_null_fields() {
    let db = seeded_db().await;

    let orders: Vec<OrderRec> = sqlite::fetch_rows(&db.path, SELECT_ORDERS, &[], CommandKind::Text)
        .await
        .unwrap();

    assert_eq!(
        orders,
        vec![
            OrderRec {
                id: 1,
                amount: 9.5,
                note: "first".into()
            },
            OrderRec {
                id: 2,
                amount: 3.0,
                note: String::new()
            },
            OrderRec {
                id: 3,
                amount: 12.25,
                note: "third".into()
            },
        ]
    );
}

#[tokio::test]
async fn zero_matching_columns_yields_one_default_record_per_row() {
    let db = seeded_db().await;

    let records: Vec<Unrelated> =
        sqlite::fetch_rows(&db.path, SELECT_ORDERS, &[], CommandKind::Text)
            .await
            .unwrap();

    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| *r == Unrelated::default()));
}

#[tokio::test]
async fn dynamic_rows_keep_emission_order_and_nulls() {
    let db = seeded_db().await;

    let rows = sqlite::fetch_dynamic(&db.path, SELECT_ORDERS, &[], CommandKind::Text)
        .await
        .unwrap();

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].column_names(), ["id", "amount", "note"]);
    assert_eq!(rows[1].get("note"), Some(&SqlValue::Null));
    assert_eq!(rows[2].get_ci("ID"), Some(&SqlValue::Int(3)));
}

#[tokio::test]
async fn scalar_count_matches_row_set_length() {
    let db = seeded_db().await;

    let rows = sqlite::fetch_dynamic(&db.path, SELECT_ORDERS, &[], CommandKind::Text)
        .await
        .unwrap();
    let count: i64 = sqlite::fetch_scalar(
        &db.path,
        "SELECT COUNT(*) FROM orders",
        &[],
        CommandKind::Text,
    )
    .await
    .unwrap();

    assert_eq!(count, i64::try_from(rows.len()).unwrap());
}

#[tokio::test]
async fn scalar_over_empty_result_reads_as_none() {
    let db = seeded_db().await;

    let missing: Option<i64> = sqlite::fetch_scalar(
        &db.path,
        "SELECT id FROM orders WHERE id > 100",
        &[],
        CommandKind::Text,
    )
    .await
    .unwrap();

    assert_eq!(missing, None);
}

#[tokio::test]
async fn params_bind_in_declaration_order() {
    let db = seeded_db().await;

    let params = [SqlParam::new("threshold", SqlValue::Float(5.0))];
    let big: Vec<OrderRec> = sqlite::fetch_rows(
        &db.path,
        "SELECT id, amount, note FROM orders WHERE amount > ? ORDER BY id",
        &params,
        CommandKind::Text,
    )
    .await
    .unwrap();

    assert_eq!(big.iter().map(|o| o.id).collect::<Vec<_>>(), vec![1, 3]);
}

#[tokio::test]
async fn non_query_reports_affected_rows() {
    let db = seeded_db().await;

    let updated = sqlite::execute(
        &db.path,
        "UPDATE orders SET amount = amount + 1 WHERE id = ?",
        &[SqlParam::new("id", SqlValue::Int(2))],
        CommandKind::Text,
    )
    .await
    .unwrap();
    assert_eq!(updated, 1);

    let untouched = sqlite::execute(
        &db.path,
        "UPDATE orders SET amount = 0 WHERE id = ?",
        &[SqlParam::new("id", SqlValue::Int(99))],
        CommandKind::Text,
    )
    .await
    .unwrap();
    assert_eq!(untouched, 0);
}

#[tokio::test]
async fn stored_procedure_requests_are_rejected() {
    let db = seeded_db().await;

    let err = sqlite::execute(&db.path, "refresh_orders", &[], CommandKind::StoredProcedure)
        .await
        .unwrap_err();

    assert!(matches!(err, SqlConduitError::Unsupported(_)));
}

#[tokio::test]
async fn failed_statements_surface_backend_errors() {
    let db = seeded_db().await;

    let err = sqlite::fetch_dynamic(
        &db.path,
        "SELECT nope FROM no_such_table",
        &[],
        CommandKind::Text,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, SqlConduitError::Sqlite(_)));
}

#[test]
fn blocking_surface_matches_async_results() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let db = runtime.block_on(seeded_db());

    let async_orders: Vec<OrderRec> = runtime
        .block_on(sqlite::fetch_rows(
            &db.path,
            SELECT_ORDERS,
            &[],
            CommandKind::Text,
        ))
        .unwrap();
    drop(runtime);

    let blocking_orders: Vec<OrderRec> =
        sqlite::blocking::fetch_rows(&db.path, SELECT_ORDERS, &[], CommandKind::Text).unwrap();
    let count: i64 = sqlite::blocking::fetch_scalar(
        &db.path,
        "SELECT COUNT(*) FROM orders",
        &[],
        CommandKind::Text,
    )
    .unwrap();

    assert_eq!(blocking_orders, async_orders);
    assert_eq!(count, i64::try_from(async_orders.len()).unwrap());
}
