//! The rendering entry point every statement implements.

use std::fmt::Debug;

use crate::backend::{QueryBuilder, RenderMode};
use crate::error::BuildError;
use crate::value::Values;

/// A statement that can be rendered for a dialect.
///
/// The same statement renders for every dialect; only the placeholder,
/// quoting and cast syntax differ:
///
/// ```rust
/// use tessera_query::prelude::*;
///
/// let stmt = Query::select()
///     .column("name")
///     .from("users")
///     .and_where(Expr::col("active").eq(true))
///     .to_owned();
///
/// let (pg, _) = stmt.build(&PostgresQueryBuilder).unwrap();
/// let (my, _) = stmt.build(&MySqlQueryBuilder).unwrap();
/// assert_eq!(pg, "SELECT name FROM users WHERE active = $1");
/// assert_eq!(my, "SELECT name FROM users WHERE active = ?");
/// ```
pub trait QueryStatementBuilder: Debug {
	/// Render the statement in the given mode.
	///
	/// In [`RenderMode::Parameterized`] literal values become placeholders
	/// and are returned in order. In [`RenderMode::Inline`] they are
	/// substituted into the text and the returned list is empty.
	fn build_with(
		&self,
		query_builder: &dyn QueryBuilder,
		mode: RenderMode,
	) -> Result<(String, Values), BuildError>;

	/// Parameterized SQL and its arguments, in placeholder order
	fn build(&self, query_builder: &dyn QueryBuilder) -> Result<(String, Values), BuildError> {
		self.build_with(query_builder, RenderMode::Parameterized)
	}

	/// Render debug SQL with every value inlined, terminated by `;\n`.
	///
	/// The output is byte-stable for identical statements and is meant for
	/// logs and fixtures, never for execution.
	fn to_string(&self, query_builder: &dyn QueryBuilder) -> Result<String, BuildError> {
		let (sql, _) = self.build_with(query_builder, RenderMode::Inline)?;
		Ok(format!("{};\n", sql))
	}

	/// The resolved projection aliases, in projection order.
	///
	/// This is the contract the result materializer uses to rebuild nested
	/// records from flat rows.
	fn projection(&self) -> Result<Vec<String>, BuildError>;
}
