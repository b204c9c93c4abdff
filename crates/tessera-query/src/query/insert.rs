//! `INSERT INTO ... VALUES | SELECT | <model>` with upsert and RETURNING.

use serde::Serialize;

use crate::{
	backend::{QueryBuilder, RenderMode},
	error::BuildError,
	expr::{SimpleExpr, coerce_value},
	schema::{ColumnDescriptor, Table},
	types::{DynIden, IntoIden, IntoTableRef, TableRef},
	value::{Value, Values},
};

use super::{
	SubQuery,
	on_conflict::{OnConflict, OnDuplicateKeyUpdate},
	returning::{ReturningClause, impl_returning, returning_projection},
	traits::QueryStatementBuilder,
};

/// Where inserted rows come from
#[derive(Debug, Clone, PartialEq)]
pub enum InsertSource {
	/// `VALUES (...), (...)`; every row as wide as the column list
	Values(Vec<Vec<SimpleExpr>>),
	/// `INSERT ... SELECT`
	Subquery(Box<SubQuery>),
}

impl Default for InsertSource {
	fn default() -> Self {
		Self::Values(Vec::new())
	}
}

/// An INSERT.
///
/// An empty column list means "all columns, positionally". Without any
/// row the statement inserts one row of defaults.
///
/// ```rust
/// use tessera_query::prelude::*;
///
/// # fn main() -> Result<(), tessera_query::BuildError> {
/// let mut stmt = Query::insert();
/// stmt.into_table("users").columns(["name", "email"]);
/// stmt.values(["Alice", "alice@example.com"])?;
/// stmt.values(["Bob", "bob@example.com"])?;
///
/// let (sql, args) = stmt.build(&PostgresQueryBuilder)?;
/// assert_eq!(sql, "INSERT INTO users (name, email) VALUES ($1, $2), ($3, $4)");
/// assert_eq!(args.len(), 4);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertStatement {
	pub(crate) table: Option<TableRef>,
	pub(crate) columns: Vec<DynIden>,
	pub(crate) descriptors: Vec<ColumnDescriptor>,
	pub(crate) source: InsertSource,
	pub(crate) on_conflict: Option<OnConflict>,
	pub(crate) on_duplicate: Option<OnDuplicateKeyUpdate>,
	pub(crate) returning: Option<ReturningClause>,
}

impl InsertStatement {
	pub fn new() -> Self {
		Self::default()
	}

	/// Move the statement out, leaving an empty one behind
	pub fn take(&mut self) -> Self {
		std::mem::take(self)
	}

	pub fn into_table<T>(&mut self, tbl: T) -> &mut Self
	where
		T: IntoTableRef,
	{
		self.table = Some(tbl.into_table_ref());
		self
	}

	/// Insert into a described table.
	///
	/// Literal values are then converted to the declared column widths and
	/// [`model`](Self::model) can map record fields to columns.
	pub fn described_by(&mut self, table: &Table) -> &mut Self {
		self.table = Some(table.table_ref());
		self.descriptors = table.descriptors().to_vec();
		self
	}

	/// Add a column to the column list
	pub fn column<C>(&mut self, col: C) -> &mut Self
	where
		C: IntoIden,
	{
		self.columns.push(col.into_iden());
		self
	}

	/// Set the column list
	pub fn columns<I, C>(&mut self, cols: I) -> &mut Self
	where
		I: IntoIterator<Item = C>,
		C: IntoIden,
	{
		self.columns = cols.into_iter().map(IntoIden::into_iden).collect();
		self
	}

	/// Add a VALUES row
	///
	/// The row must have one value per declared column; with no declared
	/// columns every row must match the first one.
	///
	/// # Errors
	///
	/// [`BuildError::ColumnCountMismatch`] when the row has the wrong width.
	pub fn values<I, E>(&mut self, row: I) -> Result<&mut Self, BuildError>
	where
		I: IntoIterator<Item = E>,
		E: Into<SimpleExpr>,
	{
		let row: Vec<SimpleExpr> = row.into_iter().map(Into::into).collect();
		if let InsertSource::Subquery(_) = self.source {
			self.source = InsertSource::Values(Vec::new());
		}
		let (index, first_width) = match &self.source {
			InsertSource::Values(rows) => (rows.len(), rows.first().map(Vec::len)),
			InsertSource::Subquery(_) => (0, None),
		};
		let expected = if self.columns.is_empty() {
			first_width.unwrap_or(row.len())
		} else {
			self.columns.len()
		};
		if row.len() != expected {
			return Err(BuildError::ColumnCountMismatch {
				row: index,
				expected,
				found: row.len(),
			});
		}
		let row = row
			.into_iter()
			.enumerate()
			.map(|(i, expr)| match expr {
				SimpleExpr::Value(v) => SimpleExpr::Value(coerce_value(v, self.declared_type(i))),
				other => other,
			})
			.collect();
		if let InsertSource::Values(rows) = &mut self.source {
			rows.push(row);
		}
		Ok(self)
	}

	/// Declared type of the `i`-th inserted column, if the table is described.
	fn declared_type(&self, i: usize) -> Option<crate::schema::ColumnType> {
		let name = match self.columns.get(i) {
			Some(name) => name,
			None if self.columns.is_empty() => &self.descriptors.get(i)?.name,
			None => return None,
		};
		self.descriptors
			.iter()
			.find(|d| &d.name == name)
			.map(|d| d.column_type)
	}

	/// Insert the rows produced by a sub-select
	pub fn select_from<Q>(&mut self, query: Q) -> &mut Self
	where
		Q: Into<SubQuery>,
	{
		self.source = InsertSource::Subquery(Box::new(query.into()));
		self
	}

	/// Add one row converted field by field from a serializable record.
	///
	/// Fields are matched to columns by name. When no column list was given,
	/// the described table's columns are used in declaration order and
	/// identity columns missing from the record (or `null`) are left to the
	/// database.
	///
	/// # Errors
	///
	/// [`BuildError::Model`] when the record is not a struct/map, a declared
	/// column has no matching field, or a field cannot be read as the
	/// column's type.
	///
	/// # Examples
	///
	/// ```rust,ignore
	/// #[derive(Serialize)]
	/// struct NewLink { url: String, name: String }
	///
	/// let stmt = Query::insert()
	///     .described_by(&link)
	///     .model(&NewLink { url: "https://mail.google.com".into(), name: "Gmail".into() })?
	///     .to_owned();
	/// // INSERT INTO link (url, name) VALUES ($1, $2)
	/// ```
	pub fn model<M>(&mut self, model: &M) -> Result<&mut Self, BuildError>
	where
		M: Serialize + ?Sized,
	{
		let json = serde_json::to_value(model).map_err(|e| BuildError::Model(e.to_string()))?;
		let fields = match json {
			serde_json::Value::Object(fields) => fields,
			other => {
				return Err(BuildError::Model(format!(
					"expected a record, found {}",
					json_type_name(&other)
				)));
			}
		};

		if self.columns.is_empty() {
			self.columns = if self.descriptors.is_empty() {
				fields.keys().map(IntoIden::into_iden).collect()
			} else {
				self.descriptors
					.iter()
					.filter(|d| {
						!d.identity
							|| fields
								.get(d.name.as_str())
								.is_some_and(|v| !v.is_null())
					})
					.map(|d| d.name.clone())
					.collect()
			};
		}

		let row = self
			.columns
			.iter()
			.map(|column| {
				let declared = self
					.descriptors
					.iter()
					.find(|d| &d.name == column)
					.map(|d| d.column_type);
				let field = fields.get(column.as_str()).ok_or_else(|| {
					BuildError::Model(format!("record has no field \"{}\"", column))
				})?;
				Value::from_json(field, declared)
					.map(SimpleExpr::Value)
					.map_err(|e| BuildError::Model(format!("field \"{}\": {}", column, e)))
			})
			.collect::<Result<Vec<_>, _>>()?;
		self.values(row)
	}

	/// Set the ON CONFLICT clause (PostgreSQL, SQLite)
	pub fn on_conflict(&mut self, on_conflict: OnConflict) -> &mut Self {
		self.on_conflict = Some(on_conflict);
		self
	}

	/// Set the ON DUPLICATE KEY UPDATE clause (MySQL)
	pub fn on_duplicate_key_update(&mut self, update: OnDuplicateKeyUpdate) -> &mut Self {
		self.on_duplicate = Some(update);
		self
	}

	/// The VALUES rows, if the source is a VALUES list
	pub fn rows(&self) -> Option<&[Vec<SimpleExpr>]> {
		match &self.source {
			InsertSource::Values(rows) => Some(rows),
			InsertSource::Subquery(_) => None,
		}
	}
}

fn json_type_name(json: &serde_json::Value) -> &'static str {
	match json {
		serde_json::Value::Null => "null",
		serde_json::Value::Bool(_) => "a boolean",
		serde_json::Value::Number(_) => "a number",
		serde_json::Value::String(_) => "a string",
		serde_json::Value::Array(_) => "an array",
		serde_json::Value::Object(_) => "an object",
	}
}

impl_returning!(InsertStatement);

impl QueryStatementBuilder for InsertStatement {
	fn build_with(
		&self,
		query_builder: &dyn QueryBuilder,
		mode: RenderMode,
	) -> Result<(String, Values), BuildError> {
		query_builder.build_insert(self, mode)
	}

	fn projection(&self) -> Result<Vec<String>, BuildError> {
		returning_projection(self.returning.as_ref(), &self.descriptors)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::query::Query;
	use crate::schema::ColumnType;
	use rstest::{fixture, rstest};

	#[derive(Serialize)]
	struct NewLink {
		id: Option<i64>,
		url: String,
		name: String,
	}

	#[fixture]
	fn link() -> Table {
		Table::new("link")
			.with_column(ColumnDescriptor::new("id", ColumnType::Integer).identity())
			.with_column(ColumnDescriptor::new("url", ColumnType::Text))
			.with_column(ColumnDescriptor::new("name", ColumnType::Text))
	}

	#[rstest]
	fn test_values_rejects_wrong_width() {
		// Arrange
		let mut stmt = Query::insert();
		stmt.into_table("users").columns(["name", "email"]);

		// Act
		let result = stmt.values(["Alice"]).map(|_| ());

		// Assert
		assert_eq!(
			result,
			Err(BuildError::ColumnCountMismatch {
				row: 0,
				expected: 2,
				found: 1
			})
		);
	}

	#[rstest]
	fn test_values_without_columns_follow_first_row() {
		let mut stmt = Query::insert();
		stmt.into_table("pair");
		stmt.values([1, 2]).unwrap();

		let result = stmt.values([1, 2, 3]).map(|_| ());

		assert_eq!(
			result,
			Err(BuildError::ColumnCountMismatch {
				row: 1,
				expected: 2,
				found: 3
			})
		);
	}

	#[rstest]
	fn test_values_are_coerced_to_declared_width(link: Table) {
		let mut stmt = Query::insert();
		stmt.described_by(&link).columns(["id", "name"]);

		stmt.values([SimpleExpr::from(7i64), SimpleExpr::from("Gmail")])
			.unwrap();

		let rows = stmt.rows().unwrap();
		assert_eq!(rows[0][0], SimpleExpr::Value(Value::Int(Some(7))));
	}

	#[rstest]
	fn test_model_skips_missing_identity(link: Table) {
		// Arrange
		let record = NewLink {
			id: None,
			url: "https://outlook.com".to_string(),
			name: "Outlook".to_string(),
		};
		let mut stmt = Query::insert();

		// Act
		stmt.described_by(&link).model(&record).unwrap();

		// Assert
		assert_eq!(
			stmt.columns,
			vec![DynIden::new("url"), DynIden::new("name")]
		);
		assert_eq!(stmt.rows().map(<[_]>::len), Some(1));
	}

	#[rstest]
	fn test_model_keeps_present_identity(link: Table) {
		let record = NewLink {
			id: Some(3),
			url: "https://gmail.com".to_string(),
			name: "Gmail".to_string(),
		};
		let mut stmt = Query::insert();

		stmt.described_by(&link).model(&record).unwrap();

		assert_eq!(stmt.columns.len(), 3);
		assert_eq!(
			stmt.rows().unwrap()[0][0],
			SimpleExpr::Value(Value::Int(Some(3)))
		);
	}

	#[rstest]
	fn test_model_rejects_scalar() {
		let mut stmt = Query::insert();
		stmt.into_table("t");

		let result = stmt.model(&42).map(|_| ());

		assert_eq!(
			result,
			Err(BuildError::Model("expected a record, found a number".to_string()))
		);
	}

	#[rstest]
	fn test_returning_all_projects_described_columns(link: Table) {
		let stmt = Query::insert()
			.described_by(&link)
			.returning_all()
			.to_owned();

		assert_eq!(
			stmt.projection(),
			Ok(vec!["id".to_string(), "url".to_string(), "name".to_string()])
		);
	}
}
