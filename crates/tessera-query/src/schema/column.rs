//! Typed columns.

use std::marker::PhantomData;

use crate::expr::{IntoTyped, SimpleExpr, TypedExpr};
use crate::types::{
	ColumnRef, DynIden, IntoColumnRef, Order, OrderExpr, ValueKind, kind, projection_alias,
};

use super::{ColumnDescriptor, ColumnType};

/// A column bound to a table-like source, carrying its value kind `K`.
///
/// Comparison methods only accept operands of the same kind, so comparing
/// a text column with a boolean fails to compile. Literal operands are
/// converted to the column's declared width.
///
/// ```rust
/// use tessera_query::prelude::*;
///
/// let users = Table::new("users")
///     .with_column(ColumnDescriptor::new("age", ColumnType::SmallInt));
/// let age = users.col::<kind::Integer>("age").unwrap();
///
/// let (sql, values) = Query::select()
///     .column(&age)
///     .from(&users)
///     .and_where(age.gte(18))
///     .to_owned()
///     .build(&PostgresQueryBuilder)
///     .unwrap();
/// assert_eq!(sql, r#"SELECT users.age AS "users.age" FROM users WHERE users.age >= $1"#);
/// assert_eq!(values[0], Value::SmallInt(Some(18)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Column<K> {
	source: DynIden,
	name: DynIden,
	column_type: ColumnType,
	nullable: bool,
	identity: bool,
	_kind: PhantomData<fn() -> K>,
}

impl<K: ValueKind> Column<K> {
	pub(crate) fn from_descriptor(source: DynIden, desc: &ColumnDescriptor) -> Self {
		Self {
			source,
			name: desc.name.clone(),
			column_type: desc.column_type,
			nullable: desc.nullable,
			identity: desc.identity,
			_kind: PhantomData,
		}
	}

	pub(crate) fn derived(source: DynIden, name: DynIden) -> Self {
		Self {
			source,
			name,
			column_type: K::DEFAULT_TYPE,
			nullable: true,
			identity: false,
			_kind: PhantomData,
		}
	}

	/// Column name.
	pub fn name(&self) -> &DynIden {
		&self.name
	}

	/// Qualifying source name.
	pub fn source(&self) -> &DynIden {
		&self.source
	}

	/// Declared SQL type.
	pub fn column_type(&self) -> ColumnType {
		self.column_type
	}

	/// Whether the column accepts NULL.
	pub fn is_nullable(&self) -> bool {
		self.nullable
	}

	/// Whether the column is part of the row identity.
	pub fn is_identity(&self) -> bool {
		self.identity
	}

	/// The `"<source>.<name>"` alias this column is projected as.
	pub fn projection_alias(&self) -> String {
		projection_alias(&self.source, &self.name)
	}

	/// Qualified column reference.
	pub fn column_ref(&self) -> ColumnRef {
		ColumnRef::TableColumn(self.source.clone(), self.name.clone())
	}

	/// The column as a typed expression.
	pub fn expr(&self) -> TypedExpr<K> {
		TypedExpr::with_type(SimpleExpr::Column(self.column_ref()), Some(self.column_type))
	}

	/// `column = other`
	pub fn eq<R: IntoTyped<K>>(&self, other: R) -> TypedExpr<kind::Bool> {
		self.expr().eq(other)
	}

	/// `column <> other`
	pub fn ne<R: IntoTyped<K>>(&self, other: R) -> TypedExpr<kind::Bool> {
		self.expr().ne(other)
	}

	/// `column < other`
	pub fn lt<R: IntoTyped<K>>(&self, other: R) -> TypedExpr<kind::Bool> {
		self.expr().lt(other)
	}

	/// `column <= other`
	pub fn lte<R: IntoTyped<K>>(&self, other: R) -> TypedExpr<kind::Bool> {
		self.expr().lte(other)
	}

	/// `column > other`
	pub fn gt<R: IntoTyped<K>>(&self, other: R) -> TypedExpr<kind::Bool> {
		self.expr().gt(other)
	}

	/// `column >= other`
	pub fn gte<R: IntoTyped<K>>(&self, other: R) -> TypedExpr<kind::Bool> {
		self.expr().gte(other)
	}

	/// `column IS NULL`
	pub fn is_null(&self) -> TypedExpr<kind::Bool> {
		self.expr().is_null()
	}

	/// `column IS NOT NULL`
	pub fn is_not_null(&self) -> TypedExpr<kind::Bool> {
		self.expr().is_not_null()
	}

	/// `column IN (...)`
	pub fn is_in<I, R>(&self, items: I) -> TypedExpr<kind::Bool>
	where
		I: IntoIterator<Item = R>,
		R: IntoTyped<K>,
	{
		self.expr().is_in(items)
	}

	/// `column NOT IN (...)`
	pub fn is_not_in<I, R>(&self, items: I) -> TypedExpr<kind::Bool>
	where
		I: IntoIterator<Item = R>,
		R: IntoTyped<K>,
	{
		self.expr().is_not_in(items)
	}

	/// `column BETWEEN low AND high`
	pub fn between<A, B>(&self, low: A, high: B) -> TypedExpr<kind::Bool>
	where
		A: IntoTyped<K>,
		B: IntoTyped<K>,
	{
		self.expr().between(low, high)
	}

	/// Assignment of a value to this column, for UPDATE and upsert SET lists.
	pub fn to<V: IntoTyped<K>>(&self, value: V) -> (DynIden, SimpleExpr) {
		(
			self.name.clone(),
			value.into_typed(Some(self.column_type)).into_simple_expr(),
		)
	}

	/// Ascending sort key.
	pub fn asc(&self) -> OrderExpr {
		OrderExpr::new(self.column_ref(), Order::Asc)
	}

	/// Descending sort key.
	pub fn desc(&self) -> OrderExpr {
		OrderExpr::new(self.column_ref(), Order::Desc)
	}
}

impl Column<kind::Text> {
	/// `column LIKE pattern`
	pub fn like<R: IntoTyped<kind::Text>>(&self, pattern: R) -> TypedExpr<kind::Bool> {
		self.expr().like(pattern)
	}

	/// `column NOT LIKE pattern`
	pub fn not_like<R: IntoTyped<kind::Text>>(&self, pattern: R) -> TypedExpr<kind::Bool> {
		self.expr().not_like(pattern)
	}
}

impl<K: ValueKind> IntoColumnRef for Column<K> {
	fn into_column_ref(self) -> ColumnRef {
		self.column_ref()
	}
}

impl<K: ValueKind> IntoColumnRef for &Column<K> {
	fn into_column_ref(self) -> ColumnRef {
		self.column_ref()
	}
}

impl<K: ValueKind> From<Column<K>> for SimpleExpr {
	fn from(c: Column<K>) -> Self {
		SimpleExpr::Column(c.column_ref())
	}
}

impl<K: ValueKind> From<&Column<K>> for SimpleExpr {
	fn from(c: &Column<K>) -> Self {
		SimpleExpr::Column(c.column_ref())
	}
}
