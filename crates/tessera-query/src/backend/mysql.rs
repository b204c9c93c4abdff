//! MySQL query builder backend
//!
//! Placeholders are `?`, identifiers are quoted with backticks and casts
//! use `CAST(x AS type)` with MySQL's cast targets.

use crate::{schema::ColumnType, value::Value};

use super::{DialectKind, Feature, QueryBuilder};

/// Words MySQL 8 reserves in addition to the common set.
const MYSQL_RESERVED: &[&str] = &[
	"change", "condition", "database", "databases", "dense_rank", "describe", "div", "explain",
	"first_value", "function", "groups", "ignore", "interval", "kill", "lag", "last_value",
	"lead", "load", "lock", "long", "match", "mod", "of", "option", "rank", "read", "regexp",
	"release", "rename", "repeat", "replace", "require", "return", "rlike", "row", "row_number",
	"schema", "separator", "show", "signal", "sql", "system", "trigger", "unlock", "unsigned",
	"usage", "use", "write", "xor",
];

/// MySQL query builder
///
/// MySQL has no RETURNING clause; upserts use
/// [`OnDuplicateKeyUpdate`](crate::query::OnDuplicateKeyUpdate).
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlQueryBuilder;

impl MySqlQueryBuilder {
	/// Create a new MySQL query builder
	pub fn new() -> Self {
		Self
	}
}

impl QueryBuilder for MySqlQueryBuilder {
	fn name(&self) -> &'static str {
		"mysql"
	}

	fn kind(&self) -> DialectKind {
		DialectKind::MySql
	}

	fn quote_char(&self) -> char {
		'`'
	}

	fn is_reserved(&self, ident: &str) -> bool {
		MYSQL_RESERVED.contains(&ident)
	}

	fn format_placeholder(&self, _index: usize) -> String {
		"?".to_string()
	}

	fn supports(&self, feature: Feature) -> bool {
		match feature {
			Feature::Returning
			| Feature::OnConflict
			| Feature::OnConflictConstraint
			| Feature::DistinctOn
			| Feature::FullJoin
			| Feature::KeyLocking
			| Feature::FetchFirst
			| Feature::NullsOrdering
			| Feature::TupleAssignment
			| Feature::UpdateFrom
			| Feature::DataModifyingCte
			| Feature::NonFiniteFloat => false,
			Feature::OnDuplicateKeyUpdate
			| Feature::Lateral
			| Feature::RowLocking
			| Feature::SetOperationAll
			| Feature::ParenthesizedSetOperands
			| Feature::ValuesColumnAliases => true,
		}
	}

	fn type_name(&self, ty: ColumnType) -> &'static str {
		match ty {
			ColumnType::Boolean | ColumnType::SmallInt | ColumnType::Integer | ColumnType::BigInt => {
				"SIGNED"
			}
			ColumnType::Real => "FLOAT",
			ColumnType::Double => "DOUBLE",
			ColumnType::Decimal => "DECIMAL(65, 30)",
			ColumnType::Text => "CHAR",
			ColumnType::Bytes => "BINARY",
			ColumnType::Date => "DATE",
			ColumnType::Time => "TIME(6)",
			ColumnType::Timestamp | ColumnType::TimestampTz => "DATETIME(6)",
			ColumnType::Uuid => "CHAR(36)",
			ColumnType::Json => "JSON",
		}
	}

	/// Backslash is an escape character inside MySQL string literals.
	fn inline_literal(&self, value: &Value) -> String {
		match value {
			Value::Char(Some(_)) | Value::String(Some(_)) | Value::Json(Some(_)) => {
				let text = value.to_text().unwrap_or_default();
				format!("'{}'", text.replace('\\', "\\\\").replace('\'', "''"))
			}
			other => other.to_sql_literal(),
		}
	}

	fn limit_all(&self) -> Option<&'static str> {
		Some("18446744073709551615")
	}

	fn default_values(&self) -> &'static str {
		"() VALUES ()"
	}

	fn values_row_keyword(&self) -> Option<&'static str> {
		Some("ROW")
	}

	fn excluded_column(&self, quoted: &str) -> String {
		format!("VALUES({})", quoted)
	}

	fn json_object_fn(&self) -> &'static str {
		"JSON_OBJECT"
	}

	fn json_array_agg_fn(&self) -> &'static str {
		"JSON_ARRAYAGG"
	}

	fn json_empty_array(&self) -> &'static str {
		"JSON_ARRAY()"
	}

	fn json_text_type(&self) -> Option<&'static str> {
		Some("CHAR")
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		backend::RenderMode,
		error::BuildError,
		expr::{Expr, ExprTrait, SimpleExpr},
		query::{LockType, OnConflict, OnDuplicateKeyUpdate, Query, QueryStatementBuilder},
		types::{NullOrdering, Order, TableRef},
	};
	use rstest::rstest;

	fn mysql() -> MySqlQueryBuilder {
		MySqlQueryBuilder::new()
	}

	#[rstest]
	fn test_select_uses_question_marks_and_backticks() {
		// Arrange
		let query = Query::select()
			.column(("link", "id"))
			.column("rank")
			.from("link")
			.and_where(Expr::col("a").eq(1).and(Expr::col("b").eq("x")))
			.to_owned();

		// Act
		let (sql, values) = mysql().build_select(&query, RenderMode::Parameterized).unwrap();

		// Assert
		assert_eq!(
			sql,
			"SELECT link.id AS `link.id`, `rank` FROM link WHERE a = ? AND b = ?"
		);
		assert_eq!(values.len(), 2);
	}

	#[rstest]
	fn test_offset_without_limit() {
		let query = Query::select()
			.column("id")
			.from("t")
			.offset(20)
			.to_owned();

		let (sql, _) = mysql().build_select(&query, RenderMode::Parameterized).unwrap();
		assert_eq!(sql, "SELECT id FROM t LIMIT 18446744073709551615 OFFSET 20");
	}

	#[rstest]
	fn test_on_duplicate_key_update() {
		// Arrange
		let query = Query::insert()
			.into_table("link")
			.columns(["id", "name"])
			.values([SimpleExpr::from(1), SimpleExpr::from("Gmail")])
			.unwrap()
			.on_duplicate_key_update(OnDuplicateKeyUpdate::new().update_columns(["name"]).to_owned())
			.to_owned();

		// Act
		let (sql, _) = mysql().build_insert(&query, RenderMode::Parameterized).unwrap();

		// Assert
		assert_eq!(
			sql,
			"INSERT INTO link (id, name) VALUES (?, ?) ON DUPLICATE KEY UPDATE name = VALUES(name)"
		);
	}

	#[rstest]
	#[case::returning(Query::delete().from_table("t").returning_all().to_owned().into(), "RETURNING")]
	#[case::on_conflict(
		Query::insert()
			.into_table("t")
			.columns(["id"])
			.values([1])
			.unwrap()
			.on_conflict(OnConflict::column("id").do_nothing().to_owned())
			.to_owned()
			.into(),
		"ON CONFLICT"
	)]
	#[case::full_join(
		Query::select()
			.column("id")
			.from("a")
			.full_outer_join("b", Expr::col(("a", "id")).eq(Expr::col(("b", "id"))))
			.to_owned()
			.into(),
		"FULL OUTER JOIN"
	)]
	#[case::nulls(
		Query::select()
			.column("id")
			.from("a")
			.order_by_with_nulls(Expr::col("id"), Order::Asc, NullOrdering::Last)
			.to_owned()
			.into(),
		"NULLS FIRST / NULLS LAST"
	)]
	#[case::key_locking(
		Query::select()
			.column("id")
			.from("a")
			.lock(LockType::KeyShare)
			.to_owned()
			.into(),
		"FOR NO KEY UPDATE / FOR KEY SHARE"
	)]
	fn test_unsupported_features(
		#[case] stmt: crate::query::Statement,
		#[case] feature: &'static str,
	) {
		// Act
		let result = mysql().build_statement(&stmt, RenderMode::Parameterized);

		// Assert
		assert_eq!(result, Err(BuildError::Unsupported(feature, "mysql")));
	}

	#[rstest]
	fn test_update_with_extra_sources() {
		let query = Query::update()
			.table("orders")
			.value("status", "vip")
			.from("customers")
			.and_where(Expr::col(("orders", "customer_id")).eq(Expr::col(("customers", "id"))))
			.to_owned();

		let (sql, _) = mysql().build_update(&query, RenderMode::Parameterized).unwrap();
		assert_eq!(
			sql,
			"UPDATE orders, customers SET status = ? WHERE orders.customer_id = customers.id"
		);
	}

	#[rstest]
	fn test_values_table_uses_row_constructor() {
		let values = TableRef::values(
			vec![vec![SimpleExpr::from(1), SimpleExpr::from("a")]],
			"v",
			["id", "name"],
		);
		let query = Query::select().column(("v", "id")).from(values).to_owned();

		let sql = query.to_string(&MySqlQueryBuilder).unwrap();
		assert_eq!(
			sql,
			"SELECT v.id AS `v.id` FROM (VALUES ROW(CAST(1 AS SIGNED), CAST('a' AS CHAR))) AS v (id, name);\n"
		);
	}

	#[rstest]
	fn test_inline_string_escapes_backslash() {
		let query = Query::select()
			.column("id")
			.from("t")
			.and_where(Expr::col("path").eq("C:\\tmp"))
			.to_owned();

		let sql = query.to_string(&MySqlQueryBuilder).unwrap();
		assert_eq!(sql, "SELECT id FROM t WHERE path = 'C:\\\\tmp';\n");
	}

	#[rstest]
	fn test_empty_insert() {
		let query = Query::insert().into_table("counter").to_owned();

		let (sql, _) = mysql().build_insert(&query, RenderMode::Parameterized).unwrap();
		assert_eq!(sql, "INSERT INTO counter () VALUES ()");
	}

	#[rstest]
	fn test_json_array_mode() {
		let query = Query::select()
			.column(("link", "id"))
			.from("link")
			.json_array()
			.to_owned();

		let (sql, _) = mysql().build_select(&query, RenderMode::Parameterized).unwrap();
		assert_eq!(
			sql,
			"SELECT CAST(COALESCE(JSON_ARRAYAGG(records.json), JSON_ARRAY()) AS CHAR) AS json \
			 FROM (SELECT JSON_OBJECT('link.id', link.id) AS json FROM link) AS records"
		);
	}
}
