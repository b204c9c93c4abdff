//! PostgreSQL query builder backend
//!
//! Placeholders are numbered (`$1`, `$2`, ...) and identifiers are quoted
//! with double quotes. Values whose type PostgreSQL cannot infer from a
//! text parameter are cast with `::type`.

use crate::{schema::ColumnType, value::Value};

use super::{DialectKind, Feature, QueryBuilder};

/// PostgreSQL query builder
///
/// # Examples
///
/// ```rust
/// use tessera_query::prelude::*;
///
/// let stmt = Query::select()
///     .column("id")
///     .from("users")
///     .and_where(Expr::col("id").eq(1))
///     .to_owned();
///
/// let (sql, values) = stmt.build(&PostgresQueryBuilder).unwrap();
/// assert_eq!(sql, "SELECT id FROM users WHERE id = $1");
/// assert_eq!(values.len(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresQueryBuilder;

impl PostgresQueryBuilder {
	/// Create a new PostgreSQL query builder
	pub fn new() -> Self {
		Self
	}
}

impl QueryBuilder for PostgresQueryBuilder {
	fn name(&self) -> &'static str {
		"postgres"
	}

	fn kind(&self) -> DialectKind {
		DialectKind::Postgres
	}

	fn quote_char(&self) -> char {
		'"'
	}

	fn format_placeholder(&self, index: usize) -> String {
		format!("${}", index)
	}

	fn supports(&self, _feature: Feature) -> bool {
		true
	}

	fn type_name(&self, ty: ColumnType) -> &'static str {
		match ty {
			ColumnType::Boolean => "boolean",
			ColumnType::SmallInt => "smallint",
			ColumnType::Integer => "integer",
			ColumnType::BigInt => "bigint",
			ColumnType::Real => "real",
			ColumnType::Double => "double precision",
			ColumnType::Decimal => "numeric",
			ColumnType::Text => "text",
			ColumnType::Bytes => "bytea",
			ColumnType::Date => "date",
			ColumnType::Time => "time",
			ColumnType::Timestamp => "timestamp",
			ColumnType::TimestampTz => "timestamptz",
			ColumnType::Uuid => "uuid",
			ColumnType::Json => "json",
		}
	}

	fn cast_literal(&self, sql: &str, ty: ColumnType) -> String {
		format!("{}::{}", sql, self.type_name(ty))
	}

	fn requires_cast(&self, value: &Value) -> bool {
		matches!(
			value,
			Value::Bytes(_)
				| Value::ChronoDate(_)
				| Value::ChronoTime(_)
				| Value::ChronoDateTime(_)
				| Value::ChronoDateTimeUtc(_)
				| Value::Uuid(_)
				| Value::Json(_)
				| Value::Decimal(_)
		)
	}

	fn inline_literal(&self, value: &Value) -> String {
		match value {
			Value::Bytes(Some(bytes)) => {
				let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
				format!("'\\x{}'", hex)
			}
			other => other.to_sql_literal(),
		}
	}

	fn json_object_fn(&self) -> &'static str {
		"json_build_object"
	}

	fn json_array_agg_fn(&self) -> &'static str {
		"json_agg"
	}

	fn json_empty_array(&self) -> &'static str {
		"'[]'::json"
	}

	fn json_text_type(&self) -> Option<&'static str> {
		Some("text")
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		backend::RenderMode,
		error::BuildError,
		expr::{Expr, ExprTrait, Func, SimpleExpr},
		query::{
			CommonTableExpr, LockBehavior, LockType, OnConflict, Query, QueryStatementBuilder,
		},
		types::{Order, TableRef, WindowStatement},
	};
	use rstest::rstest;

	fn pg() -> PostgresQueryBuilder {
		PostgresQueryBuilder::new()
	}

	#[rstest]
	fn test_select_basic() {
		let query = Query::select()
			.columns(["id", "name"])
			.from("users")
			.to_owned();

		let (sql, values) = pg().build_select(&query, RenderMode::Parameterized).unwrap();
		assert_eq!(sql, "SELECT id, name FROM users");
		assert_eq!(values.len(), 0);
	}

	#[rstest]
	fn test_select_without_columns_is_asterisk() {
		let query = Query::select().from("users").to_owned();

		let (sql, _) = pg().build_select(&query, RenderMode::Parameterized).unwrap();
		assert_eq!(sql, "SELECT * FROM users");
	}

	#[rstest]
	fn test_qualified_columns_are_aliased() {
		// Arrange
		let query = Query::select()
			.column(("link", "id"))
			.column(("link", "url"))
			.from("link")
			.and_where(Expr::col(("link", "name")).is_in(["a", "b"]))
			.to_owned();

		// Act
		let (sql, values) = pg().build_select(&query, RenderMode::Parameterized).unwrap();

		// Assert
		assert_eq!(
			sql,
			r#"SELECT link.id AS "link.id", link.url AS "link.url" FROM link WHERE link.name IN ($1, $2)"#
		);
		assert_eq!(values.len(), 2);
	}

	#[rstest]
	fn test_reserved_and_mixed_case_identifiers_are_quoted() {
		let query = Query::select()
			.column("userId")
			.column("order")
			.from("user")
			.to_owned();

		let (sql, _) = pg().build_select(&query, RenderMode::Parameterized).unwrap();
		assert_eq!(sql, r#"SELECT "userId", "order" FROM "user""#);
	}

	#[rstest]
	fn test_placeholders_follow_textual_order() {
		// Arrange
		let query = Query::select()
			.column("id")
			.from("t")
			.and_where(Expr::col("a").eq(1))
			.and_having(Expr::col("b").gt(2))
			.group_by_columns(["id"])
			.to_owned();

		// Act
		let (sql, values) = pg().build_select(&query, RenderMode::Parameterized).unwrap();

		// Assert
		assert_eq!(sql, "SELECT id FROM t WHERE a = $1 GROUP BY id HAVING b > $2");
		assert_eq!(values.0, vec![Value::Int(Some(1)), Value::Int(Some(2))]);
	}

	#[rstest]
	fn test_null_is_inlined() {
		let query = Query::update()
			.table("users")
			.value("deleted_at", Value::ChronoDateTime(None))
			.value("name", "x")
			.to_owned();

		let (sql, values) = pg().build_update(&query, RenderMode::Parameterized).unwrap();
		assert_eq!(sql, "UPDATE users SET deleted_at = NULL, name = $1");
		assert_eq!(values.len(), 1);
	}

	#[rstest]
	fn test_uuid_parameter_is_cast() {
		let id = uuid::Uuid::nil();
		let query = Query::select()
			.column("id")
			.from("users")
			.and_where(Expr::col("id").eq(id))
			.to_owned();

		let (sql, _) = pg().build_select(&query, RenderMode::Parameterized).unwrap();
		assert_eq!(sql, "SELECT id FROM users WHERE id = $1::uuid");
	}

	#[rstest]
	fn test_inline_bytes_use_hex_escape() {
		let query = Query::select()
			.column("id")
			.from("blobs")
			.and_where(Expr::col("data").eq(vec![0x01u8, 0xab]))
			.to_owned();

		let sql = query.to_string(&PostgresQueryBuilder).unwrap();
		assert_eq!(sql, "SELECT id FROM blobs WHERE data = '\\x01ab'::bytea;\n");
	}

	#[rstest]
	fn test_distinct_on_window_and_fetch() {
		// Arrange
		let window = WindowStatement::new()
			.partition_by(Expr::col("dept"))
			.order_by(Expr::col("salary"), Order::Desc);
		let query = Query::select()
			.distinct_on(["dept"])
			.column("dept")
			.expr_as(Func::row_number().over(window.clone()), "rank")
			.from("staff")
			.window("w", window)
			.fetch_first(5)
			.offset(10)
			.to_owned();

		// Act
		let (sql, _) = pg().build_select(&query, RenderMode::Parameterized).unwrap();

		// Assert
		assert_eq!(
			sql,
			"SELECT DISTINCT ON (dept) dept, ROW_NUMBER() OVER w AS rank FROM staff \
			 WINDOW w AS (PARTITION BY dept ORDER BY salary DESC) \
			 OFFSET 10 ROWS FETCH FIRST 5 ROWS ONLY"
		);
	}

	#[rstest]
	fn test_lock_clause() {
		let query = Query::select()
			.column("id")
			.from("jobs")
			.lock_with_behavior(LockType::NoKeyUpdate, LockBehavior::SkipLocked)
			.limit(1)
			.to_owned();

		let (sql, _) = pg().build_select(&query, RenderMode::Parameterized).unwrap();
		assert_eq!(
			sql,
			"SELECT id FROM jobs LIMIT 1 FOR NO KEY UPDATE SKIP LOCKED"
		);
	}

	#[rstest]
	fn test_upsert_with_returning() {
		// Arrange
		let query = Query::insert()
			.into_table("link")
			.columns(["id", "name"])
			.values([SimpleExpr::from(1), SimpleExpr::from("Gmail")])
			.unwrap()
			.on_conflict(OnConflict::column("id").update_columns(["name"]).to_owned())
			.returning_all()
			.to_owned();

		// Act
		let (sql, values) = pg().build_insert(&query, RenderMode::Parameterized).unwrap();

		// Assert
		assert_eq!(
			sql,
			"INSERT INTO link (id, name) VALUES ($1, $2) ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name RETURNING *"
		);
		assert_eq!(values.len(), 2);
	}

	#[rstest]
	fn test_do_update_requires_target() {
		let mut on_conflict = OnConflict::new();
		on_conflict.update_columns(["name"]);
		let query = Query::insert()
			.into_table("link")
			.columns(["name"])
			.values(["x"])
			.unwrap()
			.on_conflict(on_conflict)
			.to_owned();

		let result = pg().build_insert(&query, RenderMode::Parameterized);
		assert_eq!(result, Err(BuildError::MissingConflictTarget));
	}

	#[rstest]
	fn test_empty_insert_uses_default_values() {
		let query = Query::insert().into_table("counter").to_owned();

		let (sql, _) = pg().build_insert(&query, RenderMode::Parameterized).unwrap();
		assert_eq!(sql, "INSERT INTO counter DEFAULT VALUES");
	}

	#[rstest]
	fn test_update_from() {
		let query = Query::update()
			.table("orders")
			.value("status", "vip")
			.from("customers")
			.and_where(Expr::col(("orders", "customer_id")).eq(Expr::col(("customers", "id"))))
			.to_owned();

		let (sql, _) = pg().build_update(&query, RenderMode::Parameterized).unwrap();
		assert_eq!(
			sql,
			"UPDATE orders SET status = $1 FROM customers WHERE orders.customer_id = customers.id"
		);
	}

	#[rstest]
	fn test_set_operation_casts_literals() {
		// Arrange
		let query = Query::union_all([
			Query::select()
				.column(("a", "id"))
				.from("a")
				.and_where(Expr::col(("a", "id")).eq(5))
				.to_owned(),
			Query::select().column(("b", "id")).from("b").to_owned(),
		]);

		// Act
		let sql = query.to_string(&PostgresQueryBuilder).unwrap();

		// Assert
		assert_eq!(
			sql,
			"(SELECT a.id AS \"a.id\" FROM a WHERE a.id = 5::integer) UNION ALL (SELECT b.id AS \"b.id\" FROM b);\n"
		);
	}

	#[rstest]
	fn test_set_operation_order_uses_projection_alias() {
		let query = Query::union([
			Query::select().column(("a", "id")).from("a").to_owned(),
			Query::select().column(("b", "id")).from("b").to_owned(),
		])
		.order_by(Expr::col(("a", "id")), Order::Desc)
		.limit(3)
		.to_owned();

		let (sql, _) = pg()
			.build_set_operation(&query, RenderMode::Parameterized)
			.unwrap();
		assert_eq!(
			sql,
			"(SELECT a.id AS \"a.id\" FROM a) UNION (SELECT b.id AS \"b.id\" FROM b) ORDER BY \"a.id\" DESC LIMIT 3"
		);
	}

	#[rstest]
	fn test_data_modifying_cte() {
		// Arrange
		let deleted = Query::delete()
			.from_table("sessions")
			.and_where(Expr::col("expired").eq(true))
			.returning(["user_id"])
			.to_owned();
		let query = Query::with()
			.cte(CommonTableExpr::new("gone", deleted))
			.unwrap()
			.query(Query::select().column("user_id").from("gone").to_owned())
			.to_owned();

		// Act
		let (sql, values) = pg()
			.build_with_query(&query, RenderMode::Parameterized)
			.unwrap();

		// Assert
		assert_eq!(
			sql,
			"WITH gone AS (DELETE FROM sessions WHERE expired = $1 RETURNING user_id) SELECT user_id FROM gone"
		);
		assert_eq!(values.len(), 1);
	}

	#[rstest]
	fn test_json_object_mode() {
		let query = Query::select()
			.column(("link", "id"))
			.column(("link", "name"))
			.from("link")
			.json_object()
			.to_owned();

		let (sql, _) = pg().build_select(&query, RenderMode::Parameterized).unwrap();
		assert_eq!(
			sql,
			"SELECT CAST(json_build_object('link.id', link.id, 'link.name', link.name) AS text) AS json FROM link"
		);
	}

	#[rstest]
	fn test_json_array_mode() {
		let query = Query::select()
			.column(("link", "id"))
			.from("link")
			.order_by(Expr::col(("link", "id")), Order::Asc)
			.json_array()
			.to_owned();

		let (sql, _) = pg().build_select(&query, RenderMode::Parameterized).unwrap();
		assert_eq!(
			sql,
			"SELECT CAST(COALESCE(json_agg(records.json), '[]'::json) AS text) AS json \
			 FROM (SELECT json_build_object('link.id', link.id) AS json FROM link ORDER BY link.id ASC) AS records"
		);
	}

	#[rstest]
	fn test_lateral_join() {
		let latest = Query::select()
			.column("total")
			.from("orders")
			.and_where(Expr::col(("orders", "customer_id")).eq(Expr::col(("c", "id"))))
			.limit(1)
			.to_owned();
		let query = Query::select()
			.column(("c", "id"))
			.from(TableRef::table_alias("customers", "c"))
			.cross_join(TableRef::lateral(latest, "o"))
			.to_owned();

		let (sql, _) = pg().build_select(&query, RenderMode::Parameterized).unwrap();
		assert_eq!(
			sql,
			"SELECT c.id AS \"c.id\" FROM customers AS c CROSS JOIN LATERAL (SELECT total FROM orders WHERE orders.customer_id = c.id LIMIT 1) AS o"
		);
	}

	#[rstest]
	fn test_statement_projection_matches_rendered_aliases() {
		let query = Query::select()
			.column(("link", "id"))
			.expr_as(Func::count(Expr::col("id")), "total")
			.from("link")
			.to_owned();

		assert_eq!(
			query.projection().unwrap(),
			vec!["link.id".to_string(), "total".to_string()]
		);
		let (sql, _) = query.build(&PostgresQueryBuilder).unwrap();
		assert_eq!(
			sql,
			"SELECT link.id AS \"link.id\", COUNT(id) AS total FROM link"
		);
	}
}
