//! Table descriptors and derived tables.

use std::sync::Arc;

use crate::error::BuildError;
use crate::expr::DynExpr;
use crate::query::{QueryStatementBuilder, SubQuery};
use crate::types::{ColumnRef, DynIden, IntoIden, IntoTableRef, TableRef, ValueKind};

use super::column::Column;
use super::ColumnDescriptor;

#[derive(Debug, Clone, PartialEq)]
struct TableDef {
	schema: Option<DynIden>,
	name: DynIden,
	columns: Vec<ColumnDescriptor>,
}

/// An immutable table descriptor.
///
/// Cloning is cheap: the column list is shared. [`Table::alias`] returns a
/// new descriptor qualified by the alias and leaves the original untouched,
/// which is how self-joins are written.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
	def: Arc<TableDef>,
	alias: Option<DynIden>,
}

impl Table {
	/// A table without columns.
	pub fn new<N: IntoIden>(name: N) -> Self {
		Self {
			def: Arc::new(TableDef {
				schema: None,
				name: name.into_iden(),
				columns: Vec::new(),
			}),
			alias: None,
		}
	}

	/// Qualify the table with a schema.
	#[must_use]
	pub fn with_schema<S: IntoIden>(mut self, schema: S) -> Self {
		Arc::make_mut(&mut self.def).schema = Some(schema.into_iden());
		self
	}

	/// Add a column. A column with the same name replaces the earlier one.
	#[must_use]
	pub fn with_column(mut self, column: ColumnDescriptor) -> Self {
		let def = Arc::make_mut(&mut self.def);
		match def.columns.iter_mut().find(|c| c.name == column.name) {
			Some(existing) => *existing = column,
			None => def.columns.push(column),
		}
		self
	}

	/// The same table under another name.
	#[must_use]
	pub fn alias<A: IntoIden>(&self, alias: A) -> Table {
		Self {
			def: Arc::clone(&self.def),
			alias: Some(alias.into_iden()),
		}
	}

	/// Table name.
	pub fn name(&self) -> &DynIden {
		&self.def.name
	}

	/// Schema name, if any.
	pub fn schema(&self) -> Option<&DynIden> {
		self.def.schema.as_ref()
	}

	/// Alias, if this descriptor was aliased.
	pub fn alias_name(&self) -> Option<&DynIden> {
		self.alias.as_ref()
	}

	/// The name columns of this table are qualified with.
	pub fn qualifier(&self) -> &DynIden {
		self.alias.as_ref().unwrap_or(&self.def.name)
	}

	/// Column descriptors in declaration order.
	pub fn descriptors(&self) -> &[ColumnDescriptor] {
		&self.def.columns
	}

	/// Look up a column descriptor by name.
	pub fn descriptor(&self, name: &str) -> Option<&ColumnDescriptor> {
		self.def.columns.iter().find(|c| c.name.as_str() == name)
	}

	/// Columns marked as the row identity.
	pub fn identity_columns(&self) -> impl Iterator<Item = &ColumnDescriptor> {
		self.def.columns.iter().filter(|c| c.identity)
	}

	/// A typed column of this table.
	///
	/// Fails with [`BuildError::UnknownColumn`] if the table does not
	/// declare the column and with [`BuildError::KindMismatch`] if its type
	/// is not of kind `K`.
	pub fn col<K: ValueKind>(&self, name: &str) -> Result<Column<K>, BuildError> {
		let desc = self.lookup(name)?;
		let actual = desc.column_type.kind();
		if actual != K::KIND {
			return Err(BuildError::KindMismatch {
				left: K::KIND,
				right: actual,
			});
		}
		Ok(Column::from_descriptor(self.qualifier().clone(), desc))
	}

	/// A column whose kind is checked when it is combined, not now.
	pub fn dyn_col(&self, name: &str) -> Result<DynExpr, BuildError> {
		let desc = self.lookup(name)?;
		Ok(DynExpr::column(
			ColumnRef::TableColumn(self.qualifier().clone(), desc.name.clone()),
			desc.column_type,
		))
	}

	/// Every column, qualified, in declaration order.
	pub fn columns(&self) -> Vec<ColumnRef> {
		self.def
			.columns
			.iter()
			.map(|c| ColumnRef::TableColumn(self.qualifier().clone(), c.name.clone()))
			.collect()
	}

	/// `qualifier.*`
	pub fn asterisk(&self) -> ColumnRef {
		ColumnRef::TableAsterisk(self.qualifier().clone())
	}

	/// The FROM-clause reference for this descriptor.
	pub fn table_ref(&self) -> TableRef {
		let name = self.def.name.clone();
		match (&self.def.schema, &self.alias) {
			(None, None) => TableRef::Table(name),
			(Some(s), None) => TableRef::SchemaTable(s.clone(), name),
			(None, Some(a)) => TableRef::TableAlias(name, a.clone()),
			(Some(s), Some(a)) => TableRef::SchemaTableAlias(s.clone(), name, a.clone()),
		}
	}

	fn lookup(&self, name: &str) -> Result<&ColumnDescriptor, BuildError> {
		self.descriptor(name)
			.ok_or_else(|| BuildError::UnknownColumn {
				table: self.def.name.to_string(),
				column: name.to_string(),
			})
	}
}

impl IntoTableRef for Table {
	fn into_table_ref(self) -> TableRef {
		self.table_ref()
	}
}

impl IntoTableRef for &Table {
	fn into_table_ref(self) -> TableRef {
		self.table_ref()
	}
}

/// A named source built from a statement: a derived table, a LATERAL
/// subquery or a reference to a common table expression.
///
/// Columns of a derived table take their names from the inner projection.
/// An inner item projected as `"link.id"` is addressed as `"link.id"` and
/// keeps that alias when projected again, so nesting survives the extra
/// layer.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedTable {
	alias: DynIden,
	query: Option<Box<SubQuery>>,
	lateral: bool,
}

impl DerivedTable {
	/// `(query) AS alias`
	pub fn new<Q: Into<SubQuery>, A: IntoIden>(query: Q, alias: A) -> Self {
		Self {
			alias: alias.into_iden(),
			query: Some(Box::new(query.into())),
			lateral: false,
		}
	}

	/// `LATERAL (query) AS alias`
	pub fn lateral<Q: Into<SubQuery>, A: IntoIden>(query: Q, alias: A) -> Self {
		Self {
			lateral: true,
			..Self::new(query, alias)
		}
	}

	/// A reference to a common table expression by name.
	pub fn named<A: IntoIden>(name: A) -> Self {
		Self {
			alias: name.into_iden(),
			query: None,
			lateral: false,
		}
	}

	/// The qualifying name.
	pub fn alias(&self) -> &DynIden {
		&self.alias
	}

	/// A typed column of the derived table.
	///
	/// When the inner statement is known and all its items are named, the
	/// column must be one of them. The column type is the default for `K`.
	pub fn col<K: ValueKind>(&self, name: &str) -> Result<Column<K>, BuildError> {
		if let Some(query) = &self.query {
			if let Ok(names) = query.projection() {
				if !names.iter().any(|n| n == name) {
					return Err(BuildError::UnknownColumn {
						table: self.alias.to_string(),
						column: name.to_string(),
					});
				}
			}
		}
		Ok(Column::derived(self.alias.clone(), name.into_iden()))
	}

	/// The FROM-clause reference for this source.
	pub fn table_ref(&self) -> TableRef {
		match &self.query {
			Some(q) if self.lateral => TableRef::Lateral(q.clone(), self.alias.clone()),
			Some(q) => TableRef::SubQuery(q.clone(), self.alias.clone()),
			None => TableRef::Table(self.alias.clone()),
		}
	}
}

impl IntoTableRef for DerivedTable {
	fn into_table_ref(self) -> TableRef {
		self.table_ref()
	}
}

impl IntoTableRef for &DerivedTable {
	fn into_table_ref(self) -> TableRef {
		self.table_ref()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::query::Query;
	use crate::schema::ColumnType;
	use crate::types::{Kind, kind};
	use rstest::{fixture, rstest};

	#[fixture]
	fn link() -> Table {
		Table::new("link")
			.with_column(ColumnDescriptor::new("id", ColumnType::Integer).identity())
			.with_column(ColumnDescriptor::new("url", ColumnType::Text))
	}

	#[rstest]
	fn test_alias_returns_new_value(link: Table) {
		// Act
		let aliased = link.alias("l2");

		// Assert
		assert_eq!(link.qualifier().as_str(), "link");
		assert_eq!(aliased.qualifier().as_str(), "l2");
		assert_eq!(aliased.table_ref(), TableRef::table_alias("link", "l2"));
	}

	#[rstest]
	fn test_col_rejects_unknown_and_mismatched(link: Table) {
		assert_eq!(
			link.col::<kind::Text>("missing").unwrap_err(),
			BuildError::UnknownColumn {
				table: "link".to_string(),
				column: "missing".to_string(),
			}
		);
		assert_eq!(
			link.col::<kind::Bool>("url").unwrap_err(),
			BuildError::KindMismatch {
				left: Kind::Bool,
				right: Kind::Text,
			}
		);
		assert!(link.col::<kind::Integer>("id").is_ok());
	}

	#[rstest]
	fn test_with_column_replaces_same_name(link: Table) {
		let changed = link.with_column(ColumnDescriptor::new("url", ColumnType::Bytes));
		assert_eq!(changed.descriptors().len(), 2);
		assert_eq!(
			changed.descriptor("url").map(|d| d.column_type),
			Some(ColumnType::Bytes)
		);
	}

	#[rstest]
	fn test_derived_table_validates_inner_projection(link: Table) {
		// Arrange
		let id = link.col::<kind::Integer>("id").unwrap();
		let inner = Query::select().column(&id).from(&link).to_owned();

		// Act
		let derived = DerivedTable::new(inner, "sub");

		// Assert
		let col = derived.col::<kind::Integer>("link.id").unwrap();
		assert_eq!(col.projection_alias(), "link.id");
		assert!(derived.col::<kind::Integer>("id").is_err());
	}
}
