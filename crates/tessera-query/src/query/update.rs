//! `UPDATE ... SET ... [FROM ...] WHERE ... RETURNING ...`

use crate::{
	backend::{QueryBuilder, RenderMode},
	error::BuildError,
	expr::{Condition, ConditionHolder, IntoCondition, SimpleExpr},
	types::{DynIden, IntoIden, IntoTableRef, TableRef},
	value::Values,
};

use super::{
	SubQuery,
	returning::{ReturningClause, impl_returning, returning_projection},
	traits::QueryStatementBuilder,
};

/// One entry of the SET list
#[derive(Debug, Clone, PartialEq)]
pub enum Assignment {
	/// `column = expr`
	Column(DynIden, SimpleExpr),
	/// `(a, b) = (SELECT ...)`; not every dialect accepts it
	Tuple(Vec<DynIden>, Box<SubQuery>),
}

/// An UPDATE.
///
/// Extra sources added with [`from`](Self::from) become `UPDATE ... FROM`
/// where the dialect has it and a multi-table `UPDATE a, b` otherwise.
///
/// ```rust
/// use tessera_query::prelude::*;
///
/// let (sql, args) = Query::update()
///     .table("users")
///     .value("active", false)
///     .value("seen_at", Expr::current_timestamp())
///     .and_where(Expr::col("id").eq(3))
///     .build(&PostgresQueryBuilder)
///     .unwrap();
/// assert_eq!(sql, "UPDATE users SET active = $1, seen_at = CURRENT_TIMESTAMP WHERE id = $2");
/// assert_eq!(args.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateStatement {
	pub(crate) table: Option<TableRef>,
	pub(crate) assignments: Vec<Assignment>,
	pub(crate) from: Vec<TableRef>,
	pub(crate) r#where: ConditionHolder,
	pub(crate) returning: Option<ReturningClause>,
}

impl UpdateStatement {
	pub fn new() -> Self {
		Self::default()
	}

	/// Move the statement out, leaving an empty one behind
	pub fn take(&mut self) -> Self {
		std::mem::take(self)
	}

	pub fn table<T: IntoTableRef>(&mut self, table: T) -> &mut Self {
		self.table = Some(table.into_table_ref());
		self
	}

	/// `column = value`
	pub fn value<C, V>(&mut self, column: C, value: V) -> &mut Self
	where
		C: IntoIden,
		V: Into<SimpleExpr>,
	{
		self.set((column.into_iden(), value.into()))
	}

	pub fn values<I, C, V>(&mut self, pairs: I) -> &mut Self
	where
		I: IntoIterator<Item = (C, V)>,
		C: IntoIden,
		V: Into<SimpleExpr>,
	{
		pairs.into_iter().fold(self, |stmt, (c, v)| stmt.value(c, v))
	}

	/// Push a ready pair, as made by [`Column::to`](crate::schema::Column::to)
	pub fn set(&mut self, (column, value): (DynIden, SimpleExpr)) -> &mut Self {
		self.assignments.push(Assignment::Column(column, value));
		self
	}

	/// `(a, b) = (SELECT x, y ...)`
	pub fn set_from_subquery<I, C, Q>(&mut self, columns: I, query: Q) -> &mut Self
	where
		I: IntoIterator<Item = C>,
		C: IntoIden,
		Q: Into<SubQuery>,
	{
		let columns = columns.into_iter().map(IntoIden::into_iden).collect();
		self.assignments
			.push(Assignment::Tuple(columns, Box::new(query.into())));
		self
	}

	/// Another source visible to SET and WHERE
	pub fn from<T: IntoTableRef>(&mut self, source: T) -> &mut Self {
		self.from.push(source.into_table_ref());
		self
	}

	pub fn and_where<C: IntoCondition>(&mut self, condition: C) -> &mut Self {
		self.r#where.add_and(condition);
		self
	}

	/// OR `condition` with everything in WHERE so far
	pub fn or_where<C: IntoCondition>(&mut self, condition: C) -> &mut Self {
		self.r#where.add_or(condition);
		self
	}

	pub fn cond_where(&mut self, condition: Condition) -> &mut Self {
		self.and_where(condition)
	}
}

impl_returning!(UpdateStatement);

impl QueryStatementBuilder for UpdateStatement {
	fn build_with(
		&self,
		query_builder: &dyn QueryBuilder,
		mode: RenderMode,
	) -> Result<(String, Values), BuildError> {
		query_builder.build_update(self, mode)
	}

	fn projection(&self) -> Result<Vec<String>, BuildError> {
		returning_projection(self.returning.as_ref(), &[])
	}
}
