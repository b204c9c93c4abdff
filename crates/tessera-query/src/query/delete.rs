//! `DELETE FROM ... WHERE ... RETURNING ...`

use crate::{
	backend::{QueryBuilder, RenderMode},
	error::BuildError,
	expr::{Condition, ConditionHolder, IntoCondition},
	types::{IntoTableRef, TableRef},
	value::Values,
};

use super::{
	returning::{ReturningClause, impl_returning, returning_projection},
	traits::QueryStatementBuilder,
};

/// A DELETE. Rendering fails without a target table.
///
/// ```rust
/// use tessera_query::prelude::*;
///
/// let (sql, args) = Query::delete()
///     .from_table("sessions")
///     .and_where(Expr::col("user_id").eq(7))
///     .or_where(Expr::col("revoked").eq(true))
///     .build(&MySqlQueryBuilder)
///     .unwrap();
/// assert_eq!(sql, "DELETE FROM sessions WHERE user_id = ? OR revoked = ?");
/// assert_eq!(args.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteStatement {
	pub(crate) table: Option<TableRef>,
	pub(crate) r#where: ConditionHolder,
	pub(crate) returning: Option<ReturningClause>,
}

impl DeleteStatement {
	pub fn new() -> Self {
		Self::default()
	}

	/// Move the statement out, leaving an empty one behind
	pub fn take(&mut self) -> Self {
		std::mem::take(self)
	}

	pub fn from_table<T: IntoTableRef>(&mut self, table: T) -> &mut Self {
		self.table = Some(table.into_table_ref());
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

impl_returning!(DeleteStatement);

impl QueryStatementBuilder for DeleteStatement {
	fn build_with(
		&self,
		query_builder: &dyn QueryBuilder,
		mode: RenderMode,
	) -> Result<(String, Values), BuildError> {
		query_builder.build_delete(self, mode)
	}

	fn projection(&self) -> Result<Vec<String>, BuildError> {
		returning_projection(self.returning.as_ref(), &[])
	}
}
