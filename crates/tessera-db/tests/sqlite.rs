//! End-to-end execution against an in-memory SQLite database.

use rstest::{fixture, rstest};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tessera_db::prelude::*;
use tessera_query::prelude::*;

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Order {
	id: i64,
	total: i64,
}

impl FromRecord for Order {
	fn shape() -> RecordShape {
		RecordShape::new("order").identity("id").column("total")
	}
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Customer {
	id: i64,
	name: String,
	orders: Vec<Order>,
}

impl FromRecord for Customer {
	fn shape() -> RecordShape {
		RecordShape::new("customer")
			.identity("id")
			.column("name")
			.many("orders", Order::shape())
	}
}

#[derive(Serialize)]
struct NewCustomer<'a> {
	id: i64,
	name: &'a str,
}

#[derive(Serialize)]
struct NewOrder {
	id: i64,
	customer_id: i64,
	total: i64,
}

fn customer() -> Table {
	Table::new("customer")
		.with_column(ColumnDescriptor::new("id", ColumnType::BigInt).identity())
		.with_column(ColumnDescriptor::new("name", ColumnType::Text))
}

fn order() -> Table {
	Table::new("order")
		.with_column(ColumnDescriptor::new("id", ColumnType::BigInt).identity())
		.with_column(ColumnDescriptor::new("customer_id", ColumnType::BigInt))
		.with_column(ColumnDescriptor::new("total", ColumnType::BigInt))
}

/// A single pooled connection keeps the in-memory database alive for the test.
fn config() -> ConnectionConfig {
	ConnectionConfig::new("sqlite::memory:")
		.with_pool_size(1, 1)
		.with_idle_timeout(None)
		.with_max_lifetime(None)
		.with_echo(true)
}

async fn open(config: ConnectionConfig) -> Connection {
	let conn = Connection::connect(config).await.unwrap();
	conn.driver()
		.exec(
			"CREATE TABLE customer (id INTEGER PRIMARY KEY, name TEXT NOT NULL)",
			&[],
		)
		.await
		.unwrap();
	conn.driver()
		.exec(
			r#"CREATE TABLE "order" (id INTEGER PRIMARY KEY, customer_id INTEGER NOT NULL, total INTEGER NOT NULL)"#,
			&[],
		)
		.await
		.unwrap();
	conn
}

#[fixture]
async fn conn() -> Connection {
	open(config()).await
}

fn insert_customer(id: i64, name: &str) -> InsertStatement {
	Query::insert()
		.described_by(&customer())
		.model(&NewCustomer { id, name })
		.unwrap()
		.to_owned()
}

fn insert_order(id: i64, customer_id: i64, total: i64) -> InsertStatement {
	Query::insert()
		.described_by(&order())
		.model(&NewOrder {
			id,
			customer_id,
			total,
		})
		.unwrap()
		.to_owned()
}

fn customers_with_orders() -> SelectStatement {
	let (customer, order) = (customer(), order());
	let c_id = customer.col::<kind::Integer>("id").unwrap();
	let c_name = customer.col::<kind::Text>("name").unwrap();
	let o_id = order.col::<kind::Integer>("id").unwrap();
	let o_customer = order.col::<kind::Integer>("customer_id").unwrap();
	let o_total = order.col::<kind::Integer>("total").unwrap();
	Query::select()
		.column(&c_id)
		.column(&c_name)
		.column(&o_id)
		.column(&o_total)
		.from(&customer)
		.left_join(&order, o_customer.eq(&c_id))
		.order_by_expr(c_id.asc())
		.order_by_expr(o_id.asc())
		.to_owned()
}

fn customer_count() -> SelectStatement {
	Query::select()
		.expr(Func::count(Expr::asterisk()))
		.from(&customer())
		.to_owned()
}

#[rstest]
#[tokio::test]
async fn test_insert_then_fetch_nested(#[future] conn: Connection) {
	// Arrange
	let conn = conn.await;
	for stmt in [insert_customer(1, "Ada"), insert_customer(2, "Grace")] {
		conn.query(stmt).exec().await.unwrap();
	}
	for stmt in [insert_order(10, 1, 250), insert_order(11, 1, 100)] {
		conn.query(stmt).exec().await.unwrap();
	}

	// Act
	let customers: Vec<Customer> = conn.query(customers_with_orders()).fetch_all().await.unwrap();

	// Assert
	assert_eq!(
		customers,
		vec![
			Customer {
				id: 1,
				name: "Ada".to_string(),
				orders: vec![Order { id: 10, total: 250 }, Order { id: 11, total: 100 }],
			},
			Customer {
				id: 2,
				name: "Grace".to_string(),
				orders: vec![],
			},
		]
	);
	conn.close().await.unwrap();
}

#[rstest]
#[tokio::test]
async fn test_repeated_statements_reuse_one_prepared_handle(#[future] conn: Connection) {
	// Arrange
	let conn = conn.await;
	conn.query(insert_customer(1, "Ada")).exec().await.unwrap();

	// Act
	let mut counts = Vec::new();
	for _ in 0..3 {
		counts.push(conn.query(customer_count()).fetch_scalar::<i64>().await.unwrap());
	}

	// Assert
	assert_eq!(counts, vec![1, 1, 1]);
	assert_eq!(conn.cache().len(), 2);
	assert_eq!(conn.cache().stats().hits, 2);
	conn.clear_cache().await.unwrap();
	assert!(conn.cache().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_fetch_one_on_empty_table_reports_no_rows(#[future] conn: Connection) {
	// Arrange
	let conn = conn.await;

	// Act
	let one = conn.query(customers_with_orders()).fetch_one::<Customer>().await;
	let optional = conn
		.query(customers_with_orders())
		.fetch_optional::<Customer>()
		.await
		.unwrap();

	// Assert
	assert!(one.unwrap_err().is_no_rows());
	assert_eq!(optional, None);
}

#[rstest]
#[tokio::test]
async fn test_committed_transaction_is_visible(#[future] conn: Connection) {
	// Arrange
	let conn = conn.await;

	// Act
	let inserted = conn
		.transaction(async |tx| {
			let a = tx.query(insert_customer(1, "Ada")).exec().await?;
			let b = tx.query(insert_customer(2, "Grace")).exec().await?;
			let seen: i64 = tx.query(customer_count()).fetch_scalar().await?;
			Ok::<_, DatabaseError>((a + b, seen))
		})
		.await
		.unwrap();

	// Assert
	assert_eq!(inserted, (2, 2));
	let count: i64 = conn.query(customer_count()).fetch_scalar().await.unwrap();
	assert_eq!(count, 2);
}

#[rstest]
#[tokio::test]
async fn test_rolled_back_transaction_leaves_no_trace(#[future] conn: Connection) {
	// Arrange
	let conn = conn.await;
	let tx = conn.begin().await.unwrap();
	tx.query(insert_customer(1, "Ada")).exec().await.unwrap();

	// Act
	tx.rollback().await.unwrap();

	// Assert
	let count: i64 = conn.query(customer_count()).fetch_scalar().await.unwrap();
	assert_eq!(count, 0);
}

#[rstest]
#[tokio::test]
async fn test_transaction_statements_prepare_on_the_held_connection(#[future] conn: Connection) {
	// Arrange
	let conn = conn.await;
	let tx = conn.begin().await.unwrap();

	// Act
	let a = tx.query(insert_customer(1, "Ada")).exec().await.unwrap();
	let b = tx.query(insert_customer(2, "Grace")).exec().await.unwrap();
	let (cached, hits) = (tx.cache().len(), tx.cache().stats().hits);
	tx.commit().await.unwrap();

	// Assert
	assert_eq!((a, b), (1, 1));
	assert_eq!((cached, hits), (1, 1));
	assert!(conn.cache().is_empty());
	let count: i64 = conn.query(customer_count()).fetch_scalar().await.unwrap();
	assert_eq!(count, 2);
}

#[rstest]
#[tokio::test]
async fn test_unsigned_argument_beyond_i64_is_rejected(#[future] conn: Connection) {
	// Arrange
	let conn = conn.await;
	let stmt = Query::select().expr_as(Expr::val(u64::MAX), "v").to_owned();

	// Act
	let result = conn.query(stmt).fetch_scalar::<i64>().await;

	// Assert
	assert!(matches!(result, Err(DatabaseError::Bind { position: 1, .. })));
}

#[rstest]
#[tokio::test]
async fn test_nested_json_aggregation(#[future] conn: Connection) {
	// Arrange
	let conn = conn.await;
	for stmt in [insert_customer(1, "Ada"), insert_customer(2, "Grace")] {
		conn.query(stmt).exec().await.unwrap();
	}
	for stmt in [insert_order(10, 1, 250), insert_order(11, 1, 100)] {
		conn.query(stmt).exec().await.unwrap();
	}
	let (customer, order) = (customer(), order());
	let c_id = customer.col::<kind::Integer>("id").unwrap();
	let o_id = order.col::<kind::Integer>("id").unwrap();
	let o_customer = order.col::<kind::Integer>("customer_id").unwrap();
	let o_total = order.col::<kind::Integer>("total").unwrap();
	let orders = Query::select()
		.column(&o_id)
		.column(&o_total)
		.from(&order)
		.and_where(o_customer.eq(&c_id))
		.order_by_expr(o_id.asc())
		.json_array()
		.to_owned();
	let stmt = Query::select()
		.column(&c_id)
		.expr_as(Expr::subquery(orders), "orders")
		.from(&customer)
		.order_by_expr(c_id.asc())
		.json_array()
		.to_owned();

	// Act
	let document: serde_json::Value = conn.query(stmt).fetch_json().await.unwrap();

	// Assert
	assert_eq!(
		document,
		json!([
			{
				"customer.id": 1,
				"orders": [
					{"order.id": 10, "order.total": 250},
					{"order.id": 11, "order.total": 100},
				],
			},
			{"customer.id": 2, "orders": []},
		])
	);
}
