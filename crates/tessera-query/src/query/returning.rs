//! `RETURNING` projections of INSERT, UPDATE and DELETE.

use crate::error::BuildError;
use crate::expr::SimpleExpr;
use crate::schema::ColumnDescriptor;
use crate::types::IntoColumnRef;

/// What a data-modifying statement hands back.
///
/// ```rust
/// use tessera_query::prelude::*;
///
/// let (sql, _) = Query::delete()
///     .from_table("sessions")
///     .returning(["id"])
///     .returning_expr(Expr::col("expires_at").lt(Expr::current_timestamp()), "stale")
///     .build(&PostgresQueryBuilder)
///     .unwrap();
/// assert_eq!(
///     sql,
///     "DELETE FROM sessions RETURNING id, expires_at < CURRENT_TIMESTAMP AS stale"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ReturningClause {
	/// `RETURNING *`
	#[default]
	All,
	Items(Vec<ReturnItem>),
}

/// One returned expression and the alias it is read back under
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnItem {
	pub expr: SimpleExpr,
	pub alias: Option<String>,
}

impl ReturnItem {
	/// Name the item is projected as: its alias, else a bare column's name
	pub fn name(&self) -> Option<String> {
		match (&self.alias, &self.expr) {
			(Some(alias), _) => Some(alias.clone()),
			(None, SimpleExpr::Column(col)) => col.column_name().map(ToString::to_string),
			_ => None,
		}
	}
}

impl ReturningClause {
	pub fn all() -> Self {
		Self::All
	}

	pub fn columns<I, C>(cols: I) -> Self
	where
		I: IntoIterator<Item = C>,
		C: IntoColumnRef,
	{
		Self::Items(
			cols.into_iter()
				.map(|c| ReturnItem {
					expr: SimpleExpr::Column(c.into_column_ref()),
					alias: None,
				})
				.collect(),
		)
	}

	/// Append an item; `RETURNING *` is replaced rather than extended.
	pub fn push(&mut self, expr: SimpleExpr, alias: Option<String>) {
		let item = ReturnItem { expr, alias };
		match self {
			Self::All => *self = Self::Items(vec![item]),
			Self::Items(items) => items.push(item),
		}
	}

	pub fn is_all(&self) -> bool {
		matches!(self, Self::All)
	}

	/// Projected names, with `RETURNING *` resolved against `descriptors`.
	///
	/// An unaliased computed item has no name and fails with its position.
	pub(crate) fn projection(
		&self,
		descriptors: &[ColumnDescriptor],
	) -> Result<Vec<String>, BuildError> {
		match self {
			Self::All => Ok(descriptors.iter().map(|d| d.name.to_string()).collect()),
			Self::Items(items) => items
				.iter()
				.enumerate()
				.map(|(i, item)| item.name().ok_or(BuildError::UnnamedProjection(i)))
				.collect(),
		}
	}
}

/// Projection of an optional clause; no clause projects nothing.
pub(crate) fn returning_projection(
	returning: Option<&ReturningClause>,
	descriptors: &[ColumnDescriptor],
) -> Result<Vec<String>, BuildError> {
	returning.map_or_else(|| Ok(Vec::new()), |r| r.projection(descriptors))
}

/// The `returning*` setters shared by the data-modifying statements.
macro_rules! impl_returning {
	($stmt:ty) => {
		impl $stmt {
			/// Return the listed columns
			pub fn returning<I, C>(&mut self, cols: I) -> &mut Self
			where
				I: IntoIterator<Item = C>,
				C: $crate::types::IntoColumnRef,
			{
				self.returning = Some($crate::query::ReturningClause::columns(cols));
				self
			}

			/// `RETURNING *`
			pub fn returning_all(&mut self) -> &mut Self {
				self.returning = Some($crate::query::ReturningClause::all());
				self
			}

			/// Also return a computed expression under `alias`
			pub fn returning_expr<E>(&mut self, expr: E, alias: &str) -> &mut Self
			where
				E: Into<$crate::expr::SimpleExpr>,
			{
				self.returning
					.get_or_insert_with(|| $crate::query::ReturningClause::Items(Vec::new()))
					.push(expr.into(), Some(alias.to_string()));
				self
			}
		}
	};
}

pub(crate) use impl_returning;

#[cfg(test)]
mod tests {
	use super::*;
	use crate::expr::{Expr, ExprTrait};
	use crate::schema::ColumnType;
	use rstest::rstest;

	#[rstest]
	fn test_star_resolves_against_descriptors() {
		// Arrange
		let described = [
			ColumnDescriptor::new("id", ColumnType::BigInt),
			ColumnDescriptor::new("url", ColumnType::Text),
		];

		// Act
		let names = ReturningClause::all().projection(&described);

		// Assert
		assert_eq!(names, Ok(vec!["id".to_string(), "url".to_string()]));
	}

	#[rstest]
	fn test_push_replaces_star() {
		let mut returning = ReturningClause::all();
		returning.push(Expr::col("id").into_simple_expr(), None);
		assert_eq!(returning, ReturningClause::columns(["id"]));
	}

	#[rstest]
	#[case::aliased(Some("double"), Ok(vec!["double".to_string()]))]
	#[case::unaliased(None, Err(BuildError::UnnamedProjection(0)))]
	fn test_computed_item_needs_alias(
		#[case] alias: Option<&str>,
		#[case] expected: Result<Vec<String>, BuildError>,
	) {
		let mut returning = ReturningClause::Items(Vec::new());
		returning.push(Expr::col("price").mul(2), alias.map(ToString::to_string));
		assert_eq!(returning.projection(&[]), expected);
	}

	#[rstest]
	fn test_no_clause_projects_nothing() {
		assert_eq!(returning_projection(None, &[]), Ok(Vec::new()));
	}
}
