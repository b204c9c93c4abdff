//! SQLite query builder backend
//!
//! Placeholders are `?` and identifiers are quoted with double quotes.
//! SQLite's dynamic typing makes literal casts unnecessary, so values are
//! never cast; type names are only used by explicit `CAST` expressions.

use crate::{schema::ColumnType, value::Value};

use super::{DialectKind, Feature, QueryBuilder};

/// SQLite query builder
///
/// Set operation operands cannot be parenthesized in SQLite; an operand
/// carrying its own ORDER BY, LIMIT or OFFSET is wrapped as
/// `SELECT * FROM (...)` instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteQueryBuilder;

impl SqliteQueryBuilder {
	/// Create a new SQLite query builder
	pub fn new() -> Self {
		Self
	}
}

impl QueryBuilder for SqliteQueryBuilder {
	fn name(&self) -> &'static str {
		"sqlite"
	}

	fn kind(&self) -> DialectKind {
		DialectKind::Sqlite
	}

	fn quote_char(&self) -> char {
		'"'
	}

	fn format_placeholder(&self, _index: usize) -> String {
		"?".to_string()
	}

	fn supports(&self, feature: Feature) -> bool {
		match feature {
			Feature::Returning
			| Feature::OnConflict
			| Feature::FullJoin
			| Feature::NullsOrdering
			| Feature::TupleAssignment
			| Feature::UpdateFrom
			| Feature::NonFiniteFloat => true,
			Feature::OnConflictConstraint
			| Feature::OnDuplicateKeyUpdate
			| Feature::DistinctOn
			| Feature::Lateral
			| Feature::RowLocking
			| Feature::KeyLocking
			| Feature::FetchFirst
			| Feature::SetOperationAll
			| Feature::DataModifyingCte
			| Feature::ParenthesizedSetOperands
			| Feature::ValuesColumnAliases => false,
		}
	}

	fn type_name(&self, ty: ColumnType) -> &'static str {
		match ty {
			ColumnType::Boolean | ColumnType::SmallInt | ColumnType::Integer | ColumnType::BigInt => {
				"INTEGER"
			}
			ColumnType::Real | ColumnType::Double => "REAL",
			ColumnType::Decimal => "NUMERIC",
			ColumnType::Bytes => "BLOB",
			ColumnType::Text
			| ColumnType::Date
			| ColumnType::Time
			| ColumnType::Timestamp
			| ColumnType::TimestampTz
			| ColumnType::Uuid
			| ColumnType::Json => "TEXT",
		}
	}

	fn cast_literal(&self, sql: &str, _ty: ColumnType) -> String {
		sql.to_string()
	}

	/// SQLite reads `9e999` as infinity and stores NaN as NULL
	fn inline_literal(&self, value: &Value) -> String {
		let n = match value {
			Value::Float(Some(n)) => f64::from(*n),
			Value::Double(Some(n)) => *n,
			other => return other.to_sql_literal(),
		};
		if n.is_nan() {
			"NULL".to_string()
		} else if n.is_infinite() {
			if n > 0.0 { "9e999" } else { "-9e999" }.to_string()
		} else {
			value.to_sql_literal()
		}
	}

	fn limit_all(&self) -> Option<&'static str> {
		Some("-1")
	}

	fn json_object_fn(&self) -> &'static str {
		"json_object"
	}

	fn json_array_agg_fn(&self) -> &'static str {
		"json_group_array"
	}

	fn json_empty_array(&self) -> &'static str {
		"json_array()"
	}

	fn nested_json_fn(&self) -> Option<&'static str> {
		Some("json")
	}
}
