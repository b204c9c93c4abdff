//! Folding joined rows into nested records.

mod common;

use common::{MockDriver, int, text};
use rstest::{fixture, rstest};
use serde::Deserialize;
use serde_json::json;
use tessera_db::prelude::*;
use tessera_db::scan::scan;
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

#[fixture]
fn customer() -> Table {
	Table::new("customer")
		.with_column(ColumnDescriptor::new("id", ColumnType::BigInt).identity())
		.with_column(ColumnDescriptor::new("name", ColumnType::Text))
}

#[fixture]
fn order() -> Table {
	Table::new("order")
		.with_column(ColumnDescriptor::new("id", ColumnType::BigInt).identity())
		.with_column(ColumnDescriptor::new("customer_id", ColumnType::BigInt))
		.with_column(ColumnDescriptor::new("total", ColumnType::BigInt))
}

fn customers_with_orders(customer: &Table, order: &Table) -> SelectStatement {
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
		.from(customer)
		.left_join(order, o_customer.eq(&c_id))
		.order_by_expr(c_id.asc())
		.order_by_expr(o_id.asc())
		.to_owned()
}

fn columns() -> Vec<String> {
	["customer.id", "customer.name", "order.id", "order.total"]
		.iter()
		.map(|c| c.to_string())
		.collect()
}

fn null() -> Value {
	Value::BigInt(None)
}

#[rstest]
#[tokio::test]
async fn test_left_join_without_match_scans_to_empty_collection(customer: Table, order: Table) {
	// Arrange
	let rows = RowSet::new(
		columns(),
		vec![
			vec![int(1), text("Ada"), int(10), int(250)],
			vec![int(1), text("Ada"), int(11), int(100)],
			vec![int(2), text("Grace"), null(), null()],
		],
	);
	let (conn, state) = MockDriver::new(DialectKind::Postgres)
		.with_rows(rows)
		.connect(ConnectionConfig::default());

	// Act
	let customers: Vec<Customer> = conn
		.query(customers_with_orders(&customer, &order))
		.fetch_all()
		.await
		.unwrap();

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
	assert_eq!(
		state.executed_sql()[0],
		r#"SELECT customer.id AS "customer.id", customer.name AS "customer.name", "order".id AS "order.id", "order".total AS "order.total" FROM customer LEFT JOIN "order" ON "order".customer_id = customer.id ORDER BY customer.id ASC, "order".id ASC"#
	);
}

#[rstest]
#[case::one_by_one(1, 1)]
#[case::three_by_four(3, 4)]
#[case::five_by_two(5, 2)]
fn test_n_parents_with_m_children(#[case] parents: i64, #[case] children: i64) {
	// Arrange
	let mut cells = Vec::new();
	for p in 0..parents {
		for c in 0..children {
			cells.push(vec![int(p), text("x"), int(p * 100 + c), int(c)]);
		}
	}
	let rows = RowSet::new(columns(), cells);

	// Act
	let document = scan(&rows, &Shape::List(Customer::shape())).unwrap();

	// Assert
	let customers: Vec<Customer> = serde_json::from_value(document).unwrap();
	assert_eq!(customers.len(), parents as usize);
	for (p, customer) in customers.iter().enumerate() {
		assert_eq!(customer.id, p as i64);
		let ids: Vec<i64> = customer.orders.iter().map(|o| o.id).collect();
		let expected: Vec<i64> = (0..children).map(|c| p as i64 * 100 + c).collect();
		assert_eq!(ids, expected);
	}
}

#[rstest]
fn test_sibling_collections_do_not_multiply() {
	// Arrange
	let rows = RowSet::new(
		vec!["post.id".into(), "tag.id".into(), "comment.id".into()],
		vec![
			vec![int(1), int(1), int(7)],
			vec![int(1), int(1), int(8)],
			vec![int(1), int(2), int(7)],
			vec![int(1), int(2), int(8)],
		],
	);
	let shape = Shape::Record(
		RecordShape::new("post")
			.identity("id")
			.many("tags", RecordShape::new("tag").identity("id"))
			.many("comments", RecordShape::new("comment").identity("id")),
	);

	// Act
	let document = scan(&rows, &shape).unwrap();

	// Assert
	assert_eq!(
		document,
		json!({
			"id": 1,
			"tags": [{"id": 1}, {"id": 2}],
			"comments": [{"id": 7}, {"id": 8}],
		})
	);
}

#[rstest]
fn test_scanning_twice_gives_equal_results() {
	let rows = RowSet::new(
		columns(),
		vec![
			vec![int(1), text("Ada"), int(10), int(250)],
			vec![int(2), text("Grace"), null(), null()],
		],
	);
	let shape = Shape::List(Customer::shape());

	let first = scan(&rows, &shape).unwrap();
	let second = scan(&rows, &shape).unwrap();

	assert_eq!(first, second);
}

#[rstest]
#[case::matched(int(10), json!({"id": 10, "total": 5}))]
#[case::unmatched(null(), serde_json::Value::Null)]
fn test_optional_record_collapses_to_null(#[case] order_id: Value, #[case] expected: serde_json::Value) {
	// Arrange
	let total = if order_id.is_null() { null() } else { int(5) };
	let rows = RowSet::new(columns(), vec![vec![int(1), text("Ada"), order_id, total]]);
	let shape = Shape::Record(
		RecordShape::new("customer")
			.identity("id")
			.optional("latest", Order::shape()),
	);

	// Act
	let document = scan(&rows, &shape).unwrap();

	// Assert
	assert_eq!(document["latest"], expected);
}

#[rstest]
fn test_required_record_without_match_is_empty() {
	let rows = RowSet::new(columns(), vec![vec![int(1), text("Ada"), null(), null()]]);
	let shape = Shape::Record(
		RecordShape::new("customer")
			.identity("id")
			.one("order", Order::shape()),
	);

	let document = scan(&rows, &shape).unwrap();

	assert_eq!(document["order"], json!({"id": null, "total": null}));
}

#[rstest]
fn test_embedded_fields_share_the_row() {
	// Arrange
	let rows = RowSet::new(
		vec![
			"customer.id".into(),
			"customer.name".into(),
			"address.city".into(),
		],
		vec![vec![int(1), text("Ada"), text("London")]],
	);
	let shape = Shape::Record(
		RecordShape::new("customer")
			.identity("id")
			.column("name")
			.embedded(RecordShape::new("address").column("city")),
	);

	// Act
	let document = scan(&rows, &shape).unwrap();

	// Assert
	assert_eq!(document, json!({"id": 1, "name": "Ada", "city": "London"}));
}

#[rstest]
#[case::duplicate_field(
	RecordShape::new("customer").column("name").embedded(RecordShape::new("address").column("name"))
)]
#[case::empty_record(RecordShape::new("customer"))]
#[case::nested_without_prefix(
	RecordShape::new("customer").identity("id").many("orders", RecordShape::new("").column("id"))
)]
fn test_unsupported_destination_is_rejected_before_rows(#[case] shape: RecordShape) {
	// Zero rows: the shape alone is invalid
	let err = scan(&RowSet::new(columns(), vec![]), &Shape::List(shape)).unwrap_err();

	assert!(matches!(err, ScanError::UnsupportedDestination(_)));
}

#[rstest]
#[tokio::test]
async fn test_type_mismatch_names_field_and_statement(customer: Table) {
	// Arrange
	let rows = RowSet::new(
		vec!["customer.id".into(), "customer.name".into()],
		vec![vec![int(1), text("not a flag")]],
	);
	let (conn, _state) = MockDriver::new(DialectKind::Sqlite)
		.with_rows(rows)
		.connect(ConnectionConfig::default());
	let c_id = customer.col::<kind::Integer>("id").unwrap();
	let c_name = customer.col::<kind::Text>("name").unwrap();
	let stmt = Query::select()
		.column(&c_id)
		.column(&c_name)
		.from(&customer)
		.to_owned();
	let shape = Shape::Record(
		RecordShape::new("customer")
			.identity("id")
			.column_of("name", Kind::Bool),
	);

	// Act
	let err = conn.query(stmt).fetch_shape(&shape).await.unwrap_err();

	// Assert
	let DatabaseError::Scan(ScanError::TypeMismatch {
		field,
		column,
		expected,
		found,
		statement,
	}) = err
	else {
		panic!("expected a type mismatch");
	};
	assert_eq!(field, "name");
	assert_eq!(column, "customer.name");
	assert_eq!((expected, found), (Kind::Bool, Kind::Text));
	assert_eq!(
		statement,
		r#"SELECT customer.id AS "customer.id", customer.name AS "customer.name" FROM customer"#
	);
}

#[rstest]
#[tokio::test]
async fn test_fetch_one_without_rows_is_no_rows(customer: Table, order: Table) {
	let (conn, _state) = MockDriver::new(DialectKind::Postgres).connect(ConnectionConfig::default());

	let result = conn
		.query(customers_with_orders(&customer, &order))
		.fetch_one::<Customer>()
		.await;

	assert!(result.unwrap_err().is_no_rows());
}

#[rstest]
#[tokio::test]
async fn test_fetch_optional_without_rows_is_none(customer: Table, order: Table) {
	let (conn, _state) = MockDriver::new(DialectKind::Postgres).connect(ConnectionConfig::default());

	let result = conn
		.query(customers_with_orders(&customer, &order))
		.fetch_optional::<Customer>()
		.await
		.unwrap();

	assert_eq!(result, None);
}

#[rstest]
#[tokio::test]
async fn test_fetch_scalar(customer: Table) {
	// Arrange
	let rows = RowSet::new(vec!["count".into()], vec![vec![int(42)]]);
	let (conn, _state) = MockDriver::new(DialectKind::Postgres)
		.with_rows(rows)
		.connect(ConnectionConfig::default());
	let stmt = Query::select()
		.expr_as(Func::count(Expr::asterisk()), "count")
		.from(&customer)
		.to_owned();

	// Act
	let count: i64 = conn.query(stmt).fetch_scalar().await.unwrap();

	// Assert
	assert_eq!(count, 42);
}

#[rstest]
#[case::valid(r#"[{"id": 10, "total": 250}]"#, true)]
#[case::corrupt(r#"[{"id": 10,"#, false)]
#[tokio::test]
async fn test_fetch_json_document(customer: Table, #[case] document: &str, #[case] valid: bool) {
	// Arrange
	let rows = RowSet::new(vec!["orders".into()], vec![vec![text(document)]]);
	let (conn, _state) = MockDriver::new(DialectKind::Postgres)
		.with_rows(rows)
		.connect(ConnectionConfig::default());
	let c_id = customer.col::<kind::Integer>("id").unwrap();

	// Act
	let result = conn
		.query(Query::select().column(&c_id).from(&customer).to_owned())
		.fetch_json::<Vec<Order>>()
		.await;

	// Assert
	if valid {
		assert_eq!(result.unwrap(), vec![Order { id: 10, total: 250 }]);
	} else {
		assert!(matches!(
			result,
			Err(DatabaseError::Scan(ScanError::CorruptJson { ref column, .. })) if column == "orders"
		));
	}
}
