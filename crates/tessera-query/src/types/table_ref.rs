//! FROM and JOIN sources.

use crate::expr::{IntoCondition, SimpleExpr};
use crate::query::SubQuery;

use super::iden::{DynIden, IntoIden};
use super::join::{JoinExpr, JoinOn, JoinType};

/// `(VALUES (..), (..)) AS alias (columns)`
#[derive(Debug, Clone, PartialEq)]
pub struct ValuesList {
	pub rows: Vec<Vec<SimpleExpr>>,
	/// May be empty; the dialect's default column names apply then
	pub columns: Vec<DynIden>,
}

/// `left <join>`; nesting builds left-deep chains
#[derive(Debug, Clone, PartialEq)]
pub struct JoinTree {
	pub left: TableRef,
	pub join: JoinExpr,
}

/// Anything a FROM or JOIN clause can name.
///
/// Values are immutable: the join methods consume `self` and return the
/// combined tree.
///
/// ```rust
/// use tessera_query::prelude::*;
/// use tessera_query::types::TableRef;
///
/// let source = TableRef::table_alias("customer", "c")
///     .left_join("orders", Expr::col(("orders", "customer_id")).eq(Expr::col(("c", "id"))));
/// let (sql, _) = Query::select()
///     .column(("c", "id"))
///     .from(source)
///     .build(&SqliteQueryBuilder)
///     .unwrap();
/// assert_eq!(
///     sql,
///     "SELECT c.id AS \"c.id\" FROM customer AS c LEFT JOIN orders ON orders.customer_id = c.id"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum TableRef {
	Table(DynIden),
	SchemaTable(DynIden, DynIden),
	TableAlias(DynIden, DynIden),
	SchemaTableAlias(DynIden, DynIden, DynIden),
	/// Derived table
	SubQuery(Box<SubQuery>, DynIden),
	/// Derived table that may reference sources to its left
	Lateral(Box<SubQuery>, DynIden),
	Values(Box<ValuesList>, DynIden),
	Join(Box<JoinTree>),
}

impl TableRef {
	pub fn table<I: IntoIden>(table: I) -> Self {
		Self::Table(table.into_iden())
	}

	pub fn schema_table<S: IntoIden, T: IntoIden>(schema: S, table: T) -> Self {
		Self::SchemaTable(schema.into_iden(), table.into_iden())
	}

	pub fn table_alias<T: IntoIden, A: IntoIden>(table: T, alias: A) -> Self {
		Self::TableAlias(table.into_iden(), alias.into_iden())
	}

	pub fn subquery<Q: Into<SubQuery>, A: IntoIden>(query: Q, alias: A) -> Self {
		Self::SubQuery(Box::new(query.into()), alias.into_iden())
	}

	pub fn lateral<Q: Into<SubQuery>, A: IntoIden>(query: Q, alias: A) -> Self {
		Self::Lateral(Box::new(query.into()), alias.into_iden())
	}

	/// Inline rows; see [`ValuesList`]
	pub fn values<R, E, A, I, C>(rows: R, alias: A, columns: I) -> Self
	where
		R: IntoIterator<Item = Vec<E>>,
		E: Into<SimpleExpr>,
		A: IntoIden,
		I: IntoIterator<Item = C>,
		C: IntoIden,
	{
		let rows = rows
			.into_iter()
			.map(|row| row.into_iter().map(Into::into).collect())
			.collect();
		Self::Values(
			Box::new(ValuesList {
				rows,
				columns: columns.into_iter().map(IntoIden::into_iden).collect(),
			}),
			alias.into_iden(),
		)
	}

	/// Name columns of this source are qualified with; joins have none
	#[must_use]
	pub fn qualifier(&self) -> Option<&DynIden> {
		match self {
			Self::Table(t) | Self::SchemaTable(_, t) => Some(t),
			Self::TableAlias(_, a)
			| Self::SchemaTableAlias(_, _, a)
			| Self::SubQuery(_, a)
			| Self::Lateral(_, a)
			| Self::Values(_, a) => Some(a),
			Self::Join(_) => None,
		}
	}

	/// `self INNER JOIN table ON condition`
	#[must_use]
	pub fn inner_join<T, C>(self, table: T, condition: C) -> Self
	where
		T: IntoTableRef,
		C: IntoCondition,
	{
		self.join(JoinType::InnerJoin, table, condition)
	}

	/// `self LEFT JOIN table ON condition`
	#[must_use]
	pub fn left_join<T, C>(self, table: T, condition: C) -> Self
	where
		T: IntoTableRef,
		C: IntoCondition,
	{
		self.join(JoinType::LeftJoin, table, condition)
	}

	/// `self RIGHT JOIN table ON condition`
	#[must_use]
	pub fn right_join<T, C>(self, table: T, condition: C) -> Self
	where
		T: IntoTableRef,
		C: IntoCondition,
	{
		self.join(JoinType::RightJoin, table, condition)
	}

	/// `self FULL OUTER JOIN table ON condition`
	#[must_use]
	pub fn full_join<T, C>(self, table: T, condition: C) -> Self
	where
		T: IntoTableRef,
		C: IntoCondition,
	{
		self.join(JoinType::FullOuterJoin, table, condition)
	}

	/// `self CROSS JOIN table`
	#[must_use]
	pub fn cross_join<T>(self, table: T) -> Self
	where
		T: IntoTableRef,
	{
		Self::Join(Box::new(JoinTree {
			left: self,
			join: JoinExpr::new(JoinType::CrossJoin, table.into_table_ref(), None),
		}))
	}

	/// Join with any [`JoinType`] that takes an ON condition
	#[must_use]
	pub fn join<T, C>(self, join: JoinType, table: T, condition: C) -> Self
	where
		T: IntoTableRef,
		C: IntoCondition,
	{
		Self::Join(Box::new(JoinTree {
			left: self,
			join: JoinExpr::new(
				join,
				table.into_table_ref(),
				Some(JoinOn::Condition(Box::new(condition.into_condition()))),
			),
		}))
	}
}

/// Anything usable as a FROM source: names, `(schema, table)` pairs and
/// ready [`TableRef`]s
pub trait IntoTableRef {
	fn into_table_ref(self) -> TableRef;
}

impl IntoTableRef for TableRef {
	fn into_table_ref(self) -> TableRef {
		self
	}
}

impl IntoTableRef for &TableRef {
	fn into_table_ref(self) -> TableRef {
		self.clone()
	}
}

macro_rules! named_table {
	($($ty:ty),*) => {
		$(impl IntoTableRef for $ty {
			fn into_table_ref(self) -> TableRef {
				TableRef::Table(self.into_iden())
			}
		})*
	};
}

named_table!(DynIden, &str, String, super::alias::Alias);

impl<S: IntoIden, T: IntoIden> IntoTableRef for (S, T) {
	fn into_table_ref(self) -> TableRef {
		let (schema, table) = self;
		TableRef::schema_table(schema, table)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::expr::{Expr, ExprTrait};
	use rstest::rstest;

	#[rstest]
	fn test_table_ref_qualifier() {
		assert_eq!(TableRef::table("users").qualifier().map(DynIden::as_str), Some("users"));
		assert_eq!(
			TableRef::table_alias("users", "u").qualifier().map(DynIden::as_str),
			Some("u")
		);
	}

	#[rstest]
	fn test_join_returns_new_tree() {
		// Arrange
		let customers = TableRef::table("customer");

		// Act
		let joined = customers.clone().left_join(
			"orders",
			Expr::col(("orders", "customer_id")).eq(Expr::col(("customer", "id"))),
		);

		// Assert
		assert_eq!(customers, TableRef::table("customer"));
		let TableRef::Join(tree) = joined else {
			panic!("expected a join tree");
		};
		assert_eq!(tree.left, customers);
		assert_eq!(tree.join.join, JoinType::LeftJoin);
	}
}
