//! Result materialization.
//!
//! Joined rows are folded back into nested records. Each record level is
//! described by a [`RecordShape`]; rows belonging to the same record are
//! recognised by the level's identity columns.
//!
//! - Nested records are deduplicated per parent by identity, so an N×M
//!   join yields N parents with M children each.
//! - A nested record whose identity cells are all NULL (a LEFT JOIN
//!   without a match) is skipped: `[]` for collections, `null` for
//!   optional records.
//! - The outermost list is not deduplicated. Without nested records each
//!   row is one element; with them, consecutive rows sharing the root
//!   identity form one element.
//!
//! Grouping relies on the statement ordering rows so that each record's
//! rows are adjacent.
//!
//! ## Examples
//!
//! ```rust
//! use tessera_db::RowSet;
//! use tessera_db::scan::{RecordShape, Shape, scan};
//! use tessera_query::Value;
//!
//! let rows = RowSet::new(
//!     vec!["customer.id".into(), "order.id".into()],
//!     vec![
//!         vec![Value::BigInt(Some(1)), Value::BigInt(Some(10))],
//!         vec![Value::BigInt(Some(1)), Value::BigInt(Some(11))],
//!         vec![Value::BigInt(Some(2)), Value::BigInt(None)],
//!     ],
//! );
//! let shape = Shape::List(
//!     RecordShape::new("customer")
//!         .identity("id")
//!         .many("orders", RecordShape::new("order").identity("id")),
//! );
//!
//! let document = scan(&rows, &shape).unwrap();
//! assert_eq!(
//!     document,
//!     serde_json::json!([
//!         {"id": 1, "orders": [{"id": 10}, {"id": 11}]},
//!         {"id": 2, "orders": []},
//!     ])
//! );
//! ```

mod plan;
mod shape;

use serde::de::DeserializeOwned;
use serde_json::Value as Json;

use crate::driver::RowSet;
use crate::error::ScanError;
use plan::LevelPlan;

pub use shape::{Cardinality, FieldShape, FromRecord, RecordShape, Shape};

/// Scan `rows` into a JSON document shaped by `shape`
pub fn scan(rows: &RowSet, shape: &Shape) -> Result<Json, ScanError> {
	Scanner::new(shape).scan(rows)
}

/// Decode the JSON document in the first cell of the first row.
///
/// This is the read side of statements that aggregate nested records into
/// one JSON column per row. Text, binary and JSON cells are accepted; a
/// document that does not parse is [`ScanError::CorruptJson`]. Zero rows
/// give `null`.
pub fn scan_json(rows: &RowSet) -> Result<Json, ScanError> {
	match (rows.columns.first(), rows.rows.first().and_then(|row| row.first())) {
		(Some(column), Some(cell)) => plan::decode_document(column, cell),
		_ => Ok(Json::Null),
	}
}

/// Scans row sets into one shape.
///
/// The statement text is only used to identify the query in errors.
#[derive(Debug, Clone, Copy)]
pub struct Scanner<'a> {
	shape: &'a Shape,
	statement: &'a str,
}

impl<'a> Scanner<'a> {
	pub fn new(shape: &'a Shape) -> Self {
		Self {
			shape,
			statement: "",
		}
	}

	/// Name the statement the rows came from
	#[must_use]
	pub fn with_statement(mut self, statement: &'a str) -> Self {
		self.statement = statement;
		self
	}

	/// Fold `rows` into a JSON document.
	///
	/// Zero rows give `null` for [`Shape::Scalar`] and [`Shape::Record`]
	/// and `[]` for [`Shape::List`].
	///
	/// # Errors
	///
	/// [`ScanError::UnsupportedDestination`] is reported before any row is
	/// read. Cell errors name the field, the column and the statement.
	pub fn scan(&self, rows: &RowSet) -> Result<Json, ScanError> {
		match self.shape {
			Shape::Scalar => Ok(rows
				.rows
				.first()
				.and_then(|row| row.first())
				.map_or(Json::Null, |cell| cell.to_json())),
			Shape::Record(record) => {
				let plan = LevelPlan::compile(record, &rows.columns)?;
				check_widths(rows)?;
				self.record(&plan, rows)
			}
			Shape::List(record) => {
				let plan = LevelPlan::compile(record, &rows.columns)?;
				check_widths(rows)?;
				self.list(&plan, rows)
			}
		}
	}

	/// Scan and deserialize into `T`
	pub fn scan_as<T: DeserializeOwned>(&self, rows: &RowSet) -> Result<T, ScanError> {
		Ok(serde_json::from_value(self.scan(rows)?)?)
	}

	fn record(&self, plan: &LevelPlan, rows: &RowSet) -> Result<Json, ScanError> {
		let Some(first) = rows.rows.first() else {
			return Ok(Json::Null);
		};
		let key = plan.root_key(first);

		let mut group = plan.group(&rows.rows, 0);
		for (at, row) in rows.rows.iter().enumerate().skip(1) {
			if plan.root_key(row) == key {
				plan.extend(&mut group, &rows.rows, at);
			}
		}
		plan.render(&group, &rows.rows, self.statement)
	}

	fn list(&self, plan: &LevelPlan, rows: &RowSet) -> Result<Json, ScanError> {
		let mut groups = Vec::new();
		let mut last_key = None;

		for (at, row) in rows.rows.iter().enumerate() {
			if !plan.has_children() {
				groups.push(plan.group(&rows.rows, at));
				continue;
			}
			let key = plan.root_key(row);
			if last_key.as_ref() == Some(&key)
				&& let Some(group) = groups.last_mut()
			{
				plan.extend(group, &rows.rows, at);
			} else {
				groups.push(plan.group(&rows.rows, at));
				last_key = Some(key);
			}
		}

		groups
			.iter()
			.map(|group| plan.render(group, &rows.rows, self.statement))
			.collect::<Result<Vec<_>, _>>()
			.map(Json::Array)
	}
}

fn check_widths(rows: &RowSet) -> Result<(), ScanError> {
	let expected = rows.columns.len();
	match rows.rows.iter().enumerate().find(|(_, cells)| cells.len() < expected) {
		Some((row, cells)) => Err(ScanError::ShortRow {
			row,
			expected,
			found: cells.len(),
		}),
		None => Ok(()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use tessera_query::Value;

	fn int(v: i64) -> Value {
		Value::BigInt(Some(v))
	}

	#[rstest]
	fn test_scalar_takes_first_cell() {
		let rows = RowSet::new(vec!["count".into()], vec![vec![int(7)], vec![int(8)]]);

		assert_eq!(scan(&rows, &Shape::Scalar).unwrap(), Json::from(7));
	}

	#[rstest]
	#[case::scalar(Shape::Scalar, Json::Null)]
	#[case::record(Shape::Record(RecordShape::new("t").column("id")), Json::Null)]
	#[case::list(Shape::List(RecordShape::new("t").column("id")), serde_json::json!([]))]
	fn test_zero_rows(#[case] shape: Shape, #[case] expected: Json) {
		assert_eq!(scan(&RowSet::default(), &shape).unwrap(), expected);
	}

	#[rstest]
	#[case::record(Shape::Record(RecordShape::new("t").identity("id").column("name")))]
	#[case::list(Shape::List(RecordShape::new("t").identity("id").column("name")))]
	fn test_short_row_is_an_error(#[case] shape: Shape) {
		// Arrange
		let rows = RowSet::new(
			vec!["t.id".into(), "t.name".into()],
			vec![vec![int(1), Value::from("a")], vec![int(2)]],
		);

		// Act
		let result = scan(&rows, &shape);

		// Assert
		assert_eq!(
			result,
			Err(ScanError::ShortRow {
				row: 1,
				expected: 2,
				found: 1,
			})
		);
	}

	#[rstest]
	fn test_flat_list_keeps_duplicate_rows() {
		// Arrange
		let rows = RowSet::new(vec!["t.id".into()], vec![vec![int(1)], vec![int(1)]]);
		let shape = Shape::List(RecordShape::new("t").identity("id"));

		// Act
		let document = scan(&rows, &shape).unwrap();

		// Assert
		assert_eq!(document, serde_json::json!([{"id": 1}, {"id": 1}]));
	}

	#[rstest]
	fn test_record_discards_rows_of_other_records() {
		// Arrange
		let rows = RowSet::new(
			vec!["p.id".into(), "c.id".into()],
			vec![
				vec![int(1), int(10)],
				vec![int(2), int(20)],
				vec![int(1), int(11)],
			],
		);
		let shape = Shape::Record(
			RecordShape::new("p")
				.identity("id")
				.many("children", RecordShape::new("c").identity("id")),
		);

		// Act
		let document = scan(&rows, &shape).unwrap();

		// Assert
		assert_eq!(
			document,
			serde_json::json!({"id": 1, "children": [{"id": 10}, {"id": 11}]})
		);
	}

	#[rstest]
	fn test_scan_json_reads_text_documents() {
		let rows = RowSet::new(
			vec!["orders".into()],
			vec![vec![Value::String(Some(Box::new(r#"[{"id": 10}]"#.to_string())))]],
		);

		assert_eq!(scan_json(&rows).unwrap(), serde_json::json!([{"id": 10}]));
	}

	#[rstest]
	fn test_scan_json_rejects_corrupt_documents() {
		let rows = RowSet::new(
			vec!["orders".into()],
			vec![vec![Value::String(Some(Box::new("[{".to_string())))]],
		);

		let err = scan_json(&rows).unwrap_err();

		assert!(matches!(err, ScanError::CorruptJson { column, .. } if column == "orders"));
	}

	#[rstest]
	fn test_missing_columns_are_omitted() {
		let rows = RowSet::new(vec!["t.id".into()], vec![vec![int(1)]]);
		let shape = Shape::Record(RecordShape::new("t").identity("id").column("label"));

		assert_eq!(scan(&rows, &shape).unwrap(), serde_json::json!({"id": 1}));
	}
}
