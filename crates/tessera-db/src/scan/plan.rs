//! Scan plans: a shape resolved against the columns of a row set.

use std::collections::HashMap;

use serde_json::{Map, Value as Json};
use tessera_query::{Kind, Value};

use super::shape::{Cardinality, FieldShape, RecordShape};
use crate::error::ScanError;

/// A record level with its fields bound to column positions
#[derive(Debug)]
pub(crate) struct LevelPlan {
	columns: Vec<ColumnSlot>,
	json: Vec<JsonSlot>,
	identity: Vec<usize>,
	children: Vec<ChildPlan>,
}

#[derive(Debug)]
struct ColumnSlot {
	field: String,
	alias: String,
	index: Option<usize>,
	kind: Option<Kind>,
}

#[derive(Debug)]
struct JsonSlot {
	field: String,
	alias: String,
	index: Option<usize>,
}

#[derive(Debug)]
struct ChildPlan {
	field: String,
	cardinality: Cardinality,
	level: LevelPlan,
}

/// Records collected for one level, in first-seen order
#[derive(Debug, Default)]
pub(crate) struct Group {
	row: usize,
	children: Vec<Vec<Group>>,
	index: Vec<HashMap<String, usize>>,
}

impl LevelPlan {
	/// Resolve `shape` against `columns`.
	///
	/// Fails for shapes that cannot be materialized, whatever the rows.
	pub(crate) fn compile(shape: &RecordShape, columns: &[String]) -> Result<Self, ScanError> {
		let mut level = LevelPlan {
			columns: Vec::new(),
			json: Vec::new(),
			identity: Vec::new(),
			children: Vec::new(),
		};
		let mut marked = Vec::new();
		let mut names = Vec::new();
		level.collect(shape, columns, &mut marked, &mut names)?;

		if names.is_empty() {
			return Err(ScanError::UnsupportedDestination(format!(
				"record \"{}\" has no fields",
				shape.prefix()
			)));
		}

		let marked: Vec<usize> = marked
			.iter()
			.filter_map(|i| level.columns[*i].index)
			.collect();
		level.identity = if marked.is_empty() {
			level.columns.iter().filter_map(|slot| slot.index).collect()
		} else {
			marked
		};
		Ok(level)
	}

	fn collect(
		&mut self,
		shape: &RecordShape,
		columns: &[String],
		marked: &mut Vec<usize>,
		names: &mut Vec<String>,
	) -> Result<(), ScanError> {
		for field in shape.fields() {
			if let Some(name) = field.field() {
				if names.iter().any(|n| n == name) {
					return Err(ScanError::UnsupportedDestination(format!(
						"field \"{}\" is declared twice in record \"{}\"",
						name,
						shape.prefix()
					)));
				}
				names.push(name.to_string());
			}

			match field {
				FieldShape::Column {
					field,
					alias,
					kind,
					identity,
				} => {
					if *identity {
						marked.push(self.columns.len());
					}
					self.columns.push(ColumnSlot {
						field: field.clone(),
						alias: alias.clone(),
						index: position(columns, alias),
						kind: *kind,
					});
				}
				FieldShape::Json { field, alias } => self.json.push(JsonSlot {
					field: field.clone(),
					alias: alias.clone(),
					index: position(columns, alias),
				}),
				FieldShape::Record {
					field,
					cardinality,
					shape: nested,
				} => {
					if nested.prefix().is_empty() {
						return Err(ScanError::UnsupportedDestination(format!(
							"nested record \"{}\" has no alias prefix",
							field
						)));
					}
					self.children.push(ChildPlan {
						field: field.clone(),
						cardinality: *cardinality,
						level: LevelPlan::compile(nested, columns)?,
					});
				}
				FieldShape::Embedded(embedded) => self.collect(embedded, columns, marked, names)?,
			}
		}
		Ok(())
	}

	pub(crate) fn has_children(&self) -> bool {
		!self.children.is_empty()
	}

	/// Grouping key of `row` at this level; `None` when every identity cell
	/// is NULL or the level has no columns in the row set.
	pub(crate) fn key(&self, row: &[Value]) -> Option<String> {
		let cells: Vec<Option<&Value>> = self.identity.iter().map(|i| row.get(*i)).collect();
		if cells.iter().all(|cell| cell.is_none_or(Value::is_null)) {
			return None;
		}
		Some(format!("{:?}", cells))
	}

	/// Key used for root grouping, where NULL identities are still records
	pub(crate) fn root_key(&self, row: &[Value]) -> String {
		let cells: Vec<Option<&Value>> = self.identity.iter().map(|i| row.get(*i)).collect();
		format!("{:?}", cells)
	}

	/// Start a group at `row` and descend into its nested levels
	pub(crate) fn group(&self, rows: &[Vec<Value>], row: usize) -> Group {
		let mut group = Group {
			row,
			children: self.children.iter().map(|_| Vec::new()).collect(),
			index: self.children.iter().map(|_| HashMap::new()).collect(),
		};
		self.extend(&mut group, rows, row);
		group
	}

	/// Fold another row of the same record into `group`
	pub(crate) fn extend(&self, group: &mut Group, rows: &[Vec<Value>], row: usize) {
		for (i, child) in self.children.iter().enumerate() {
			let Some(key) = rows.get(row).and_then(|cells| child.level.key(cells)) else {
				continue;
			};
			match group.index[i].get(&key) {
				Some(&at) => child.level.extend(&mut group.children[i][at], rows, row),
				None => {
					let created = child.level.group(rows, row);
					group.index[i].insert(key, group.children[i].len());
					group.children[i].push(created);
				}
			}
		}
	}

	/// Render a collected group as a JSON object
	pub(crate) fn render(
		&self,
		group: &Group,
		rows: &[Vec<Value>],
		statement: &str,
	) -> Result<Json, ScanError> {
		let row = rows.get(group.row).map_or(&[][..], Vec::as_slice);
		let cell = |index: usize| {
			row.get(index).ok_or(ScanError::ShortRow {
				row: group.row,
				expected: index + 1,
				found: row.len(),
			})
		};
		let mut object = Map::new();

		for slot in &self.columns {
			if let Some(index) = slot.index {
				object.insert(slot.field.clone(), slot.convert(cell(index)?, statement)?);
			}
		}
		for slot in &self.json {
			if let Some(index) = slot.index {
				object.insert(slot.field.clone(), slot.decode(cell(index)?)?);
			}
		}
		for (child, groups) in self.children.iter().zip(&group.children) {
			let value = match child.cardinality {
				Cardinality::Many => Json::Array(
					groups
						.iter()
						.map(|g| child.level.render(g, rows, statement))
						.collect::<Result<_, _>>()?,
				),
				Cardinality::Optional => match groups.first() {
					Some(g) => child.level.render(g, rows, statement)?,
					None => Json::Null,
				},
				Cardinality::One => match groups.first() {
					Some(g) => child.level.render(g, rows, statement)?,
					None => child.level.empty(),
				},
			};
			object.insert(child.field.clone(), value);
		}
		Ok(Json::Object(object))
	}

	/// The record produced when a required nested record has no match
	fn empty(&self) -> Json {
		let mut object = Map::new();
		for slot in &self.columns {
			if slot.index.is_some() {
				object.insert(slot.field.clone(), Json::Null);
			}
		}
		for slot in &self.json {
			if slot.index.is_some() {
				object.insert(slot.field.clone(), Json::Null);
			}
		}
		for child in &self.children {
			let value = match child.cardinality {
				Cardinality::Many => Json::Array(Vec::new()),
				Cardinality::Optional => Json::Null,
				Cardinality::One => child.level.empty(),
			};
			object.insert(child.field.clone(), value);
		}
		Json::Object(object)
	}
}

impl ColumnSlot {
	fn convert(&self, cell: &Value, statement: &str) -> Result<Json, ScanError> {
		let Some(expected) = self.kind else {
			return Ok(cell.to_json());
		};
		if cell.is_null() {
			return Ok(Json::Null);
		}

		let found = cell.column_type().kind();
		match (expected, found) {
			(Kind::Json, Kind::Text) => parse_json(&self.alias, cell),
			(expected, found) if expected == found => Ok(cell.to_json()),
			(Kind::Bool, Kind::Integer) => Ok(Json::Bool(cell.to_json().as_i64() != Some(0))),
			(expected, found) if expected.is_numeric() && found.is_numeric() => Ok(cell.to_json()),
			(Kind::Decimal | Kind::Date | Kind::Time | Kind::Timestamp | Kind::Uuid, Kind::Text) => {
				Ok(cell.to_json())
			}
			_ => Err(ScanError::TypeMismatch {
				field: self.field.clone(),
				column: self.alias.clone(),
				expected,
				found,
				statement: statement.to_string(),
			}),
		}
	}
}

impl JsonSlot {
	fn decode(&self, cell: &Value) -> Result<Json, ScanError> {
		decode_document(&self.alias, cell)
	}
}

/// Parse the JSON document held by `cell`
pub(crate) fn decode_document(alias: &str, cell: &Value) -> Result<Json, ScanError> {
	match cell {
		_ if cell.is_null() => Ok(Json::Null),
		Value::Json(Some(document)) => Ok(document.as_ref().clone()),
		Value::Bytes(Some(bytes)) => {
			serde_json::from_slice(bytes).map_err(|e| ScanError::CorruptJson {
				column: alias.to_string(),
				message: e.to_string(),
			})
		}
		_ => parse_json(alias, cell),
	}
}

fn parse_json(alias: &str, cell: &Value) -> Result<Json, ScanError> {
	let text = cell.to_text().unwrap_or_default();
	serde_json::from_str(&text).map_err(|e| ScanError::CorruptJson {
		column: alias.to_string(),
		message: e.to_string(),
	})
}

fn position(columns: &[String], alias: &str) -> Option<usize> {
	columns.iter().position(|c| c == alias)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn columns(names: &[&str]) -> Vec<String> {
		names.iter().map(|n| n.to_string()).collect()
	}

	#[rstest]
	fn test_identity_prefers_marked_columns() {
		let shape = RecordShape::new("t").column("name").identity("id");

		let plan = LevelPlan::compile(&shape, &columns(&["t.name", "t.id"])).unwrap();

		assert_eq!(plan.identity, vec![1]);
	}

	#[rstest]
	fn test_identity_falls_back_to_all_present_columns() {
		let shape = RecordShape::new("t").column("a").column("b").identity("missing");

		let plan = LevelPlan::compile(&shape, &columns(&["t.b", "t.a"])).unwrap();

		assert_eq!(plan.identity, vec![0, 1]);
	}

	#[rstest]
	fn test_all_null_identity_has_no_key() {
		let shape = RecordShape::new("t").identity("id");
		let plan = LevelPlan::compile(&shape, &columns(&["t.id"])).unwrap();

		assert_eq!(plan.key(&[Value::BigInt(None)]), None);
		assert!(plan.key(&[Value::BigInt(Some(3))]).is_some());
	}

	#[rstest]
	fn test_missing_cells_render_as_short_row() {
		// Arrange
		let shape = RecordShape::new("t").identity("id").column("name");
		let plan = LevelPlan::compile(&shape, &columns(&["t.id", "t.name"])).unwrap();
		let rows = vec![vec![Value::BigInt(Some(1))]];

		// Act
		let key = plan.key(&rows[0]);
		let group = plan.group(&rows, 0);
		let result = plan.render(&group, &rows, "");

		// Assert
		assert!(key.is_some());
		assert_eq!(
			result,
			Err(ScanError::ShortRow {
				row: 0,
				expected: 2,
				found: 1,
			})
		);
	}

	#[rstest]
	#[case::text_as_bool(Kind::Bool, Value::String(Some(Box::new("yes".to_string()))))]
	#[case::int_as_text(Kind::Text, Value::Int(Some(1)))]
	#[case::bytes_as_uuid(Kind::Uuid, Value::Bytes(Some(Box::new(vec![1]))))]
	fn test_kind_mismatch(#[case] kind: Kind, #[case] cell: Value) {
		let slot = ColumnSlot {
			field: "f".to_string(),
			alias: "t.f".to_string(),
			index: Some(0),
			kind: Some(kind),
		};

		let err = slot.convert(&cell, "SELECT 1").unwrap_err();

		assert!(matches!(err, ScanError::TypeMismatch { expected, .. } if expected == kind));
	}

	#[rstest]
	#[case::int_as_bool(Kind::Bool, Value::BigInt(Some(1)), Json::Bool(true))]
	#[case::int_as_float(Kind::Float, Value::Int(Some(2)), Json::from(2))]
	#[case::text_as_json(
		Kind::Json,
		Value::String(Some(Box::new("[1]".to_string()))),
		serde_json::json!([1])
	)]
	#[case::null(Kind::Text, Value::String(None), Json::Null)]
	fn test_kind_coercion(#[case] kind: Kind, #[case] cell: Value, #[case] expected: Json) {
		let slot = ColumnSlot {
			field: "f".to_string(),
			alias: "t.f".to_string(),
			index: Some(0),
			kind: Some(kind),
		};

		assert_eq!(slot.convert(&cell, "SELECT 1").unwrap(), expected);
	}
}
