//! Common table expressions (`WITH ...`).

use crate::{
	backend::{QueryBuilder, RenderMode},
	error::BuildError,
	types::{DynIden, IntoIden},
	value::Values,
};

use super::{Statement, traits::QueryStatementBuilder, visit};

/// One named binding of a WITH clause.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonTableExpr {
	pub(crate) name: DynIden,
	pub(crate) columns: Vec<DynIden>,
	pub(crate) body: Box<Statement>,
}

impl CommonTableExpr {
	/// Bind `body` to `name`. Any statement may be bound, including
	/// INSERT/UPDATE/DELETE with RETURNING.
	pub fn new<N, S>(name: N, body: S) -> Self
	where
		N: IntoIden,
		S: Into<Statement>,
	{
		Self {
			name: name.into_iden(),
			columns: Vec::new(),
			body: Box::new(body.into()),
		}
	}

	/// Rename the output columns (`name (a, b) AS (...)`)
	#[must_use]
	pub fn columns<I, C>(mut self, columns: I) -> Self
	where
		I: IntoIterator<Item = C>,
		C: IntoIden,
	{
		self.columns = columns.into_iter().map(IntoIden::into_iden).collect();
		self
	}

	/// The binding name
	#[must_use]
	pub fn name(&self) -> &DynIden {
		&self.name
	}
}

/// `WITH a AS (...), b AS (...) <final statement>`
///
/// A binding may only reference bindings declared before it. With
/// [`recursive`](Self::recursive) it may also reference itself.
///
/// # Examples
///
/// ```rust,ignore
/// use tessera_query::prelude::*;
///
/// let recent = Query::select()
///     .columns(["id", "customer_id"])
///     .from("orders")
///     .and_where(Expr::col("placed_at").gt("2024-01-01"))
///     .to_owned();
///
/// let stmt = Query::with()
///     .cte(CommonTableExpr::new("recent", recent))?
///     .query(
///         Query::select()
///             .column(("recent", "id"))
///             .from("recent")
///             .to_owned(),
///     )
///     .to_owned();
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WithStatement {
	pub(crate) recursive: bool,
	pub(crate) ctes: Vec<CommonTableExpr>,
	pub(crate) query: Option<Box<Statement>>,
}

impl WithStatement {
	/// Create an empty WITH clause
	pub fn new() -> Self {
		Self::default()
	}

	/// Take the ownership of data in the current [`WithStatement`]
	pub fn take(&mut self) -> Self {
		std::mem::take(self)
	}

	/// `WITH RECURSIVE`; set before adding self-referencing bindings
	pub fn recursive(&mut self, recursive: bool) -> &mut Self {
		self.recursive = recursive;
		self
	}

	/// Append a binding
	///
	/// # Errors
	///
	/// [`BuildError::ForwardCteReference`] when the binding references
	/// itself outside a recursive clause, or when an earlier binding
	/// references this name.
	pub fn cte(&mut self, cte: CommonTableExpr) -> Result<&mut Self, BuildError> {
		self.ctes.push(cte);
		if let Err(err) = self.check_references() {
			self.ctes.pop();
			return Err(err);
		}
		Ok(self)
	}

	/// Set the final statement
	pub fn query<S>(&mut self, query: S) -> &mut Self
	where
		S: Into<Statement>,
	{
		self.query = Some(Box::new(query.into()));
		self
	}

	/// The bindings in declaration order
	#[must_use]
	pub fn ctes(&self) -> &[CommonTableExpr] {
		&self.ctes
	}

	/// Every binding may only name bindings declared before it.
	pub(crate) fn check_references(&self) -> Result<(), BuildError> {
		for (i, cte) in self.ctes.iter().enumerate() {
			for table in visit::referenced_tables(&cte.body) {
				let Some(j) = self.ctes.iter().position(|c| c.name == table) else {
					continue;
				};
				if j > i || (j == i && !self.recursive) {
					return Err(BuildError::ForwardCteReference {
						name: cte.name.to_string(),
						referenced: table.to_string(),
					});
				}
			}
		}
		Ok(())
	}
}

impl QueryStatementBuilder for WithStatement {
	fn build_with(
		&self,
		query_builder: &dyn QueryBuilder,
		mode: RenderMode,
	) -> Result<(String, Values), BuildError> {
		query_builder.build_with_query(self, mode)
	}

	fn projection(&self) -> Result<Vec<String>, BuildError> {
		self.query
			.as_deref()
			.ok_or(BuildError::MissingQuery)?
			.projection()
	}
}
