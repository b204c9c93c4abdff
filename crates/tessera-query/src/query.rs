//! Statement builders.
//!
//! Every statement is built through `&mut self -> &mut Self` methods and
//! finished with `.to_owned()`:
//!
//! ```rust,ignore
//! use tessera_query::prelude::*;
//!
//! let stmt = Query::select()
//!     .column("id")
//!     .from("users")
//!     .and_where(Expr::col("active").eq(true))
//!     .to_owned();
//! ```
//!
//! Statements may be nested: a [`SubQuery`] is any statement that yields
//! rows and can appear in FROM, in a scalar position, or behind `EXISTS`,
//! `IN`, `ANY` and `ALL`. A [`Statement`] is any statement at all, used as a
//! CTE body or as the final statement of a [`WithStatement`].

mod delete;
mod insert;
mod lock;
mod on_conflict;
mod returning;
mod select;
mod set_operation;
mod traits;
mod update;
pub(crate) mod visit;
mod with;

pub use delete::DeleteStatement;
pub use insert::{InsertSource, InsertStatement};
pub use lock::{LockBehavior, LockClause, LockType};
pub use on_conflict::{OnConflict, OnConflictAction, OnConflictTarget, OnDuplicateKeyUpdate};
pub use returning::{ReturnItem, ReturningClause};
pub use select::{JsonMode, SelectDistinct, SelectExpr, SelectStatement};
pub use set_operation::{SetOperation, SetOperator};
pub use traits::QueryStatementBuilder;
pub use update::{Assignment, UpdateStatement};
pub use with::{CommonTableExpr, WithStatement};

use crate::backend::{QueryBuilder, RenderMode};
use crate::error::BuildError;
use crate::value::Values;

/// Entry point for building statements.
///
/// # Example
///
/// ```rust,ignore
/// use tessera_query::prelude::*;
///
/// let select = Query::select().column("id").from("users").to_owned();
/// let insert = Query::insert().into_table("users").columns(["name"]).to_owned();
/// let update = Query::update().table("users").value("active", false).to_owned();
/// let delete = Query::delete().from_table("users").to_owned();
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Query;

impl Query {
	/// Construct a new [`SelectStatement`]
	pub fn select() -> SelectStatement {
		SelectStatement::new()
	}

	/// Construct a new [`InsertStatement`]
	pub fn insert() -> InsertStatement {
		InsertStatement::new()
	}

	/// Construct a new [`UpdateStatement`]
	pub fn update() -> UpdateStatement {
		UpdateStatement::new()
	}

	/// Construct a new [`DeleteStatement`]
	pub fn delete() -> DeleteStatement {
		DeleteStatement::new()
	}

	/// `a UNION b UNION ...`
	pub fn union<I, Q>(operands: I) -> SetOperation
	where
		I: IntoIterator<Item = Q>,
		Q: Into<SubQuery>,
	{
		SetOperation::new(SetOperator::Union, false, operands)
	}

	/// `a UNION ALL b UNION ALL ...`
	pub fn union_all<I, Q>(operands: I) -> SetOperation
	where
		I: IntoIterator<Item = Q>,
		Q: Into<SubQuery>,
	{
		SetOperation::new(SetOperator::Union, true, operands)
	}

	/// `a INTERSECT b`
	pub fn intersect<I, Q>(operands: I) -> SetOperation
	where
		I: IntoIterator<Item = Q>,
		Q: Into<SubQuery>,
	{
		SetOperation::new(SetOperator::Intersect, false, operands)
	}

	/// `a INTERSECT ALL b`
	pub fn intersect_all<I, Q>(operands: I) -> SetOperation
	where
		I: IntoIterator<Item = Q>,
		Q: Into<SubQuery>,
	{
		SetOperation::new(SetOperator::Intersect, true, operands)
	}

	/// `a EXCEPT b`
	pub fn except<I, Q>(operands: I) -> SetOperation
	where
		I: IntoIterator<Item = Q>,
		Q: Into<SubQuery>,
	{
		SetOperation::new(SetOperator::Except, false, operands)
	}

	/// `a EXCEPT ALL b`
	pub fn except_all<I, Q>(operands: I) -> SetOperation
	where
		I: IntoIterator<Item = Q>,
		Q: Into<SubQuery>,
	{
		SetOperation::new(SetOperator::Except, true, operands)
	}

	/// Construct a new [`WithStatement`]
	pub fn with() -> WithStatement {
		WithStatement::new()
	}
}

/// A statement that yields rows and can be nested in another statement.
#[derive(Debug, Clone, PartialEq)]
pub enum SubQuery {
	/// A SELECT statement
	Select(SelectStatement),
	/// A UNION / INTERSECT / EXCEPT
	SetOperation(SetOperation),
}

impl SubQuery {
	/// Whether this operand carries clauses that bind tighter than a set
	/// operator (ORDER BY, LIMIT, OFFSET, locking) or is itself a set
	/// operation.
	pub(crate) fn needs_isolation(&self) -> bool {
		match self {
			Self::Select(s) => {
				!s.orders.is_empty() || s.limit.is_some() || s.offset.is_some() || s.lock.is_some()
			}
			Self::SetOperation(_) => true,
		}
	}
}

impl From<SelectStatement> for SubQuery {
	fn from(s: SelectStatement) -> Self {
		Self::Select(s)
	}
}

impl From<&SelectStatement> for SubQuery {
	fn from(s: &SelectStatement) -> Self {
		Self::Select(s.clone())
	}
}

impl From<&mut SelectStatement> for SubQuery {
	fn from(s: &mut SelectStatement) -> Self {
		Self::Select(s.clone())
	}
}

impl From<SetOperation> for SubQuery {
	fn from(s: SetOperation) -> Self {
		Self::SetOperation(s)
	}
}

impl From<&SetOperation> for SubQuery {
	fn from(s: &SetOperation) -> Self {
		Self::SetOperation(s.clone())
	}
}

impl From<&mut SetOperation> for SubQuery {
	fn from(s: &mut SetOperation) -> Self {
		Self::SetOperation(s.clone())
	}
}

impl QueryStatementBuilder for SubQuery {
	fn build_with(
		&self,
		query_builder: &dyn QueryBuilder,
		mode: RenderMode,
	) -> Result<(String, Values), BuildError> {
		match self {
			Self::Select(s) => s.build_with(query_builder, mode),
			Self::SetOperation(s) => s.build_with(query_builder, mode),
		}
	}

	fn projection(&self) -> Result<Vec<String>, BuildError> {
		match self {
			Self::Select(s) => s.projection(),
			Self::SetOperation(s) => s.projection(),
		}
	}
}

/// Any statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
	/// SELECT
	Select(SelectStatement),
	/// INSERT
	Insert(InsertStatement),
	/// UPDATE
	Update(UpdateStatement),
	/// DELETE
	Delete(DeleteStatement),
	/// UNION / INTERSECT / EXCEPT
	SetOperation(SetOperation),
	/// WITH ... final statement
	With(WithStatement),
}

impl Statement {
	/// Whether the statement modifies data.
	#[must_use]
	pub fn is_data_modifying(&self) -> bool {
		match self {
			Self::Insert(_) | Self::Update(_) | Self::Delete(_) => true,
			Self::Select(_) | Self::SetOperation(_) => false,
			Self::With(w) => w.query.as_deref().is_some_and(Statement::is_data_modifying),
		}
	}

	/// Whether executing the statement produces rows.
	#[must_use]
	pub fn returns_rows(&self) -> bool {
		match self {
			Self::Select(_) | Self::SetOperation(_) => true,
			Self::Insert(s) => s.returning.is_some(),
			Self::Update(s) => s.returning.is_some(),
			Self::Delete(s) => s.returning.is_some(),
			Self::With(w) => w.query.as_deref().is_some_and(Statement::returns_rows),
		}
	}
}

macro_rules! statement_from {
	($($variant:ident($ty:ty)),* $(,)?) => {
		$(
			impl From<$ty> for Statement {
				fn from(s: $ty) -> Self {
					Self::$variant(s)
				}
			}

			impl From<&$ty> for Statement {
				fn from(s: &$ty) -> Self {
					Self::$variant(s.clone())
				}
			}

			impl From<&mut $ty> for Statement {
				fn from(s: &mut $ty) -> Self {
					Self::$variant(s.clone())
				}
			}
		)*
	};
}

statement_from! {
	Select(SelectStatement),
	Insert(InsertStatement),
	Update(UpdateStatement),
	Delete(DeleteStatement),
	SetOperation(SetOperation),
	With(WithStatement),
}

impl From<SubQuery> for Statement {
	fn from(q: SubQuery) -> Self {
		match q {
			SubQuery::Select(s) => Self::Select(s),
			SubQuery::SetOperation(s) => Self::SetOperation(s),
		}
	}
}

impl QueryStatementBuilder for Statement {
	fn build_with(
		&self,
		query_builder: &dyn QueryBuilder,
		mode: RenderMode,
	) -> Result<(String, Values), BuildError> {
		query_builder.build_statement(self, mode)
	}

	fn projection(&self) -> Result<Vec<String>, BuildError> {
		match self {
			Self::Select(s) => s.projection(),
			Self::Insert(s) => s.projection(),
			Self::Update(s) => s.projection(),
			Self::Delete(s) => s.projection(),
			Self::SetOperation(s) => s.projection(),
			Self::With(s) => s.projection(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::expr::{Expr, ExprTrait};
	use rstest::rstest;

	#[rstest]
	fn test_statement_from_builders() {
		// Arrange
		let select = Query::select().column("id").from("users").to_owned();
		let insert = Query::insert().into_table("users").to_owned();

		// Act
		let a = Statement::from(&select);
		let b = Statement::from(insert);

		// Assert
		assert!(matches!(a, Statement::Select(_)));
		assert!(!a.is_data_modifying());
		assert!(b.is_data_modifying());
		assert!(!b.returns_rows());
	}

	#[rstest]
	fn test_subquery_isolation() {
		let plain = SubQuery::from(Query::select().column("id").from("a").to_owned());
		let limited = SubQuery::from(Query::select().column("id").from("a").limit(1).to_owned());
		let nested = SubQuery::from(Query::union([
			Query::select().column("id").from("a").to_owned(),
			Query::select()
				.column("id")
				.from("b")
				.and_where(Expr::col("id").gt(1))
				.to_owned(),
		]));

		assert!(!plain.needs_isolation());
		assert!(limited.needs_isolation());
		assert!(nested.needs_isolation());
	}
}
