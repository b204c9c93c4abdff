//! Column references and the projection aliases derived from them.

use super::iden::{DynIden, IntoIden};

/// A column, optionally qualified, or a star.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnRef {
	Column(DynIden),
	TableColumn(DynIden, DynIden),
	SchemaTableColumn(DynIden, DynIden, DynIden),
	/// `*`
	Asterisk,
	/// `t.*`
	TableAsterisk(DynIden),
}

impl ColumnRef {
	pub fn column<I: IntoIden>(column: I) -> Self {
		Self::Column(column.into_iden())
	}

	pub fn table_column<T: IntoIden, C: IntoIden>(table: T, column: C) -> Self {
		Self::TableColumn(table.into_iden(), column.into_iden())
	}

	pub fn asterisk() -> Self {
		Self::Asterisk
	}

	pub fn table_asterisk<T: IntoIden>(table: T) -> Self {
		Self::TableAsterisk(table.into_iden())
	}

	/// Last path segment; `None` for stars
	#[must_use]
	pub fn column_name(&self) -> Option<&DynIden> {
		match self {
			Self::Column(name) => Some(name),
			Self::TableColumn(_, name) => Some(name),
			Self::SchemaTableColumn(_, _, name) => Some(name),
			Self::Asterisk | Self::TableAsterisk(_) => None,
		}
	}

	/// Table (or table alias) the reference is qualified with
	#[must_use]
	pub fn qualifier(&self) -> Option<&DynIden> {
		match self {
			Self::TableColumn(table, _)
			| Self::SchemaTableColumn(_, table, _)
			| Self::TableAsterisk(table) => Some(table),
			Self::Column(_) | Self::Asterisk => None,
		}
	}

	/// `"<qualifier>.<column>"`, the alias a qualified column is projected as.
	///
	/// Bare columns and stars have none.
	#[must_use]
	pub fn projection_alias(&self) -> Option<String> {
		Some(projection_alias(self.qualifier()?, self.column_name()?))
	}
}

/// Alias of `table.column`.
///
/// A column read from a derived table may already carry a dotted alias
/// (`sub."customer.id"`); it is projected under that alias unchanged.
pub(crate) fn projection_alias(table: &DynIden, column: &DynIden) -> String {
	let column = column.as_str();
	if column.contains('.') {
		column.to_owned()
	} else {
		format!("{table}.{column}")
	}
}

/// Anything that names a column: `"c"`, `("t", "c")` or `("s", "t", "c")`
pub trait IntoColumnRef {
	fn into_column_ref(self) -> ColumnRef;
}

impl IntoColumnRef for ColumnRef {
	fn into_column_ref(self) -> ColumnRef {
		self
	}
}

impl<T: IntoIden> IntoColumnRef for T {
	fn into_column_ref(self) -> ColumnRef {
		ColumnRef::Column(self.into_iden())
	}
}

impl<T: IntoIden, C: IntoIden> IntoColumnRef for (T, C) {
	fn into_column_ref(self) -> ColumnRef {
		let (table, column) = self;
		ColumnRef::table_column(table, column)
	}
}

impl<S: IntoIden, T: IntoIden, C: IntoIden> IntoColumnRef for (S, T, C) {
	fn into_column_ref(self) -> ColumnRef {
		let (schema, table, column) = self;
		ColumnRef::SchemaTableColumn(schema.into_iden(), table.into_iden(), column.into_iden())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case::bare("name".into_column_ref(), None)]
	#[case::qualified(("users", "name").into_column_ref(), Some("users.name"))]
	#[case::schema(("public", "users", "name").into_column_ref(), Some("users.name"))]
	#[case::dotted(("sub", "customer.id").into_column_ref(), Some("customer.id"))]
	#[case::star(ColumnRef::table_asterisk("users"), None)]
	fn test_projection_alias(#[case] col: ColumnRef, #[case] expected: Option<&str>) {
		assert_eq!(col.projection_alias().as_deref(), expected);
	}

	#[rstest]
	fn test_star_has_qualifier_but_no_name() {
		let star = ColumnRef::table_asterisk("users");
		assert_eq!(star.qualifier().map(DynIden::as_str), Some("users"));
		assert_eq!(star.column_name(), None);
	}
}
