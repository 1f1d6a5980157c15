//! Engine-level tests against the instrumented mock backend: connection
//! lifecycle discipline, error propagation, and async/blocking parity.

use sql_conduit::impl_from_row;
use sql_conduit::mock::{MockBackend, MockDatabase};
use sql_conduit::{executor, CommandKind, SqlConduitError, SqlValue};

#[derive(Debug, Default, Clone, PartialEq)]
struct Order {
    id: i64,
    amount: f64,
}
impl_from_row!(Order { id, amount });

const ORDERS_SQL: &str = "SELECT id, amount FROM orders ORDER BY id";
const COUNT_SQL: &str = "SELECT COUNT(*) FROM orders";
const DELETE_SQL: &str = "DELETE FROM orders WHERE id = ?";

fn script_orders(db: &MockDatabase) {
    db.script_rows(
        ORDERS_SQL,
        &["id", "amount"],
        vec![
            vec![SqlValue::Int(1), SqlValue::Float(9.5)],
            vec![SqlValue::Int(2), SqlValue::Float(3.0)],
        ],
    );
    db.script_rows(COUNT_SQL, &["count"], vec![vec![SqlValue::Int(2)]]);
    db.script_affected(DELETE_SQL, 1);
}

#[tokio::test]
async fn typed_fetch_opens_and_closes_exactly_once() {
    let db = MockDatabase::install("mock-typed-fetch");
    script_orders(&db);

    let orders: Vec<Order> = executor::fetch_rows::<MockBackend, Order>(
        db.connection_string(),
        ORDERS_SQL,
        &[],
        CommandKind::Text,
    )
    .await
    .unwrap();

    assert_eq!(
        orders,
        vec![
            Order { id: 1, amount: 9.5 },
            Order { id: 2, amount: 3.0 },
        ]
    );
    assert_eq!(db.opens(), 1);
    assert_eq!(db.closes(), 1);
}

#[tokio::test]
async fn scalar_and_non_query_each_use_one_connection() {
    let db = MockDatabase::install("mock-scalar-nonquery");
    script_orders(&db);

    let count: i64 = executor::fetch_scalar::<MockBackend, i64>(
        db.connection_string(),
        COUNT_SQL,
        &[],
        CommandKind::Text,
    )
    .await
    .unwrap();
    assert_eq!(count, 2);

    let affected = executor::execute::<MockBackend>(
        db.connection_string(),
        DELETE_SQL,
        &[],
        CommandKind::Text,
    )
    .await
    .unwrap();
    assert_eq!(affected, 1);

    assert_eq!(db.opens(), 2);
    assert_eq!(db.closes(), 2);
}

#[tokio::test]
async fn execution_failure_propagates_and_still_closes() {
    let db = MockDatabase::install("mock-exec-failure");
    db.script_failure("SELECT boom", "relation does not exist");

    let err = executor::fetch_dynamic::<MockBackend>(
        db.connection_string(),
        "SELECT boom",
        &[],
        CommandKind::Text,
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        SqlConduitError::Execution(ref msg) if msg == "relation does not exist"
    ));
    assert_eq!(db.opens(), 1);
    assert_eq!(db.closes(), 1);
}

#[tokio::test]
async fn mapper_failure_mid_set_still_closes_once() {
    let db = MockDatabase::install("mock-mapper-failure");
    script_orders(&db);

    let err = executor::fetch_rows_with::<MockBackend, i64, _>(
        db.connection_string(),
        ORDERS_SQL,
        &[],
        CommandKind::Text,
        |row| match row.get_ci("id") {
            Some(&SqlValue::Int(1)) => Ok(1),
            _ => Err(SqlConduitError::Execution("second row rejected".into())),
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, SqlConduitError::Execution(_)));
    assert_eq!(db.opens(), 1);
    assert_eq!(db.closes(), 1);
}

#[tokio::test]
async fn open_failure_never_counts_a_close() {
    let db = MockDatabase::install("mock-open-failure");
    script_orders(&db);
    db.fail_next_open();

    let err = executor::fetch_dynamic::<MockBackend>(
        db.connection_string(),
        ORDERS_SQL,
        &[],
        CommandKind::Text,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, SqlConduitError::Connection(_)));
    assert_eq!(db.opens(), 0);
    assert_eq!(db.closes(), 0);
}

#[tokio::test]
async fn dynamic_rows_expose_columns_verbatim() {
    let db = MockDatabase::install("mock-dynamic");
    db.script_rows(
        "SELECT * FROM t",
        &["B", "a"],
        vec![vec![SqlValue::Text("x".into()), SqlValue::Null]],
    );

    let rows = executor::fetch_dynamic::<MockBackend>(
        db.connection_string(),
        "SELECT * FROM t",
        &[],
        CommandKind::Text,
    )
    .await
    .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].column_names(), ["B", "a"]);
    assert_eq!(rows[0].get_ci("b"), Some(&SqlValue::Text("x".into())));
    assert_eq!(rows[0].get("a"), Some(&SqlValue::Null));
}

#[tokio::test]
async fn empty_scalar_reads_as_null() {
    let db = MockDatabase::install("mock-empty-scalar");
    db.script_rows("SELECT id FROM empty", &["id"], vec![]);

    let none: Option<i64> = executor::fetch_scalar::<MockBackend, Option<i64>>(
        db.connection_string(),
        "SELECT id FROM empty",
        &[],
        CommandKind::Text,
    )
    .await
    .unwrap();
    assert_eq!(none, None);

    let err = executor::fetch_scalar::<MockBackend, i64>(
        db.connection_string(),
        "SELECT id FROM empty",
        &[],
        CommandKind::Text,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, SqlConduitError::ScalarCoercion { .. }));
}

#[test]
fn blocking_mirrors_match_async_results() {
    let db = MockDatabase::install("mock-blocking-parity");
    script_orders(&db);

    let typed: Vec<Order> = executor::blocking::fetch_rows::<MockBackend, Order>(
        db.connection_string(),
        ORDERS_SQL,
        &[],
        CommandKind::Text,
    )
    .unwrap();
    let dynamic = executor::blocking::fetch_dynamic::<MockBackend>(
        db.connection_string(),
        ORDERS_SQL,
        &[],
        CommandKind::Text,
    )
    .unwrap();
    let count: i64 = executor::blocking::fetch_scalar::<MockBackend, i64>(
        db.connection_string(),
        COUNT_SQL,
        &[],
        CommandKind::Text,
    )
    .unwrap();
    let affected = executor::blocking::execute::<MockBackend>(
        db.connection_string(),
        DELETE_SQL,
        &[],
        CommandKind::Text,
    )
    .unwrap();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let async_typed: Vec<Order> = runtime
        .block_on(executor::fetch_rows::<MockBackend, Order>(
            db.connection_string(),
            ORDERS_SQL,
            &[],
            CommandKind::Text,
        ))
        .unwrap();

    assert_eq!(typed, async_typed);
    assert_eq!(dynamic.len(), typed.len());
    for (row, order) in dynamic.iter().zip(&typed) {
        assert_eq!(row.get_ci("id"), Some(&SqlValue::Int(order.id)));
        assert_eq!(row.get_ci("amount"), Some(&SqlValue::Float(order.amount)));
    }
    assert_eq!(count, i64::try_from(typed.len()).unwrap());
    assert_eq!(affected, 1);
    assert_eq!(db.opens(), 5);
    assert_eq!(db.closes(), 5);
}

#[test]
fn blocking_failure_matches_async_failure() {
    let db = MockDatabase::install("mock-blocking-failure");
    db.script_failure("SELECT boom", "relation does not exist");

    let err = executor::blocking::fetch_dynamic::<MockBackend>(
        db.connection_string(),
        "SELECT boom",
        &[],
        CommandKind::Text,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        SqlConduitError::Execution(ref msg) if msg == "relation does not exist"
    ));
    assert_eq!(db.opens(), 1);
    assert_eq!(db.closes(), 1);
}
