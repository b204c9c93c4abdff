//! Untyped expression entry points.
//!
//! [`Expr`] wraps a [`SimpleExpr`] and offers the constructors; the
//! combinators (`eq`, `and`, `add`, ...) live on [`ExprTrait`](super::ExprTrait).
//! Nothing here checks value kinds, see [`TypedExpr`](super::TypedExpr) for that.

use super::raw::RawFragment;
use super::simple_expr::{CaseStatement, Keyword, SimpleExpr, SubQueryOper};
use crate::query::SubQuery;
use crate::types::{ColumnRef, IntoColumnRef, IntoIden};
use crate::value::IntoValue;

/// An untyped SQL expression.
///
/// ```rust
/// use tessera_query::prelude::*;
///
/// let adult = Expr::col("age").gte(18).and(Expr::col("active").eq(true));
/// let (sql, args) = Query::select()
///     .column("id")
///     .from("users")
///     .and_where(adult)
///     .to_owned()
///     .build(&SqliteQueryBuilder)
///     .unwrap();
/// assert_eq!(sql, "SELECT id FROM users WHERE age >= ? AND active = ?");
/// assert_eq!(args.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Expr(SimpleExpr);

impl Expr {
	/// Column reference; `("t", "c")` qualifies it
	pub fn col<C: IntoColumnRef>(col: C) -> Self {
		Self(SimpleExpr::Column(col.into_column_ref()))
	}

	/// `table.column`
	pub fn tbl<T: IntoIden, C: IntoIden>(table: T, col: C) -> Self {
		Self(SimpleExpr::Column(ColumnRef::table_column(table, col)))
	}

	/// Literal; bound as an argument in parameterized mode
	pub fn val<V: IntoValue>(val: V) -> Self {
		Self(SimpleExpr::Value(val.into_value()))
	}

	/// Verbatim SQL text with no arguments.
	///
	/// Use [`Expr::raw`] when the fragment has placeholders.
	pub fn cust<S: Into<String>>(sql: S) -> Self {
		Self(SimpleExpr::Custom(sql.into()))
	}

	/// SQL fragment with `#N` and `@name` placeholders.
	///
	/// ```rust
	/// use tessera_query::expr::{Expr, RawFragment};
	///
	/// let age = Expr::raw(
	///     RawFragment::new("age(#1, @since)")
	///         .arg(42)
	///         .named("since", "2020-01-01"),
	/// );
	/// ```
	pub fn raw(fragment: RawFragment) -> Self {
		Self(SimpleExpr::Raw(Box::new(fragment)))
	}

	/// `(a, b, ...)`
	pub fn tuple<I>(items: I) -> Self
	where
		I: IntoIterator,
		I::Item: Into<SimpleExpr>,
	{
		Self(SimpleExpr::Tuple(items.into_iter().map(Into::into).collect()))
	}

	/// `*`
	pub fn asterisk() -> Self {
		Self(SimpleExpr::Asterisk)
	}

	/// Scalar sub-select
	pub fn subquery<Q: Into<SubQuery>>(query: Q) -> Self {
		Self::nested(None, query)
	}

	pub fn exists<Q: Into<SubQuery>>(query: Q) -> Self {
		Self::nested(Some(SubQueryOper::Exists), query)
	}

	pub fn not_exists<Q: Into<SubQuery>>(query: Q) -> Self {
		Self::nested(Some(SubQueryOper::NotExists), query)
	}

	/// `ANY (sub-select)`, the right operand of a comparison
	pub fn any<Q: Into<SubQuery>>(query: Q) -> Self {
		Self::nested(Some(SubQueryOper::Any), query)
	}

	/// `ALL (sub-select)`, the right operand of a comparison
	pub fn all<Q: Into<SubQuery>>(query: Q) -> Self {
		Self::nested(Some(SubQueryOper::All), query)
	}

	fn nested<Q: Into<SubQuery>>(oper: Option<SubQueryOper>, query: Q) -> Self {
		Self(SimpleExpr::SubQuery(oper, Box::new(query.into())))
	}

	/// Start a searched `CASE`.
	///
	/// ```rust
	/// use tessera_query::expr::{Expr, ExprTrait};
	///
	/// let label = Expr::case()
	///     .when(Expr::col("status").eq("active"), "Active")
	///     .when(Expr::col("status").eq("pending"), "Pending")
	///     .else_result("Unknown");
	/// ```
	pub fn case() -> CaseExprBuilder {
		CaseExprBuilder(CaseStatement::new())
	}

	/// `EXCLUDED.column`, the proposed row in an upsert action
	pub fn excluded<C: IntoIden>(column: C) -> Self {
		Self(SimpleExpr::Excluded(column.into_iden()))
	}

	pub fn null() -> Self {
		Self::keyword(Keyword::Null)
	}

	/// `DEFAULT`, for INSERT and UPDATE values
	pub fn default_value() -> Self {
		Self::keyword(Keyword::Default)
	}

	pub fn current_timestamp() -> Self {
		Self::keyword(Keyword::CurrentTimestamp)
	}

	pub fn current_date() -> Self {
		Self::keyword(Keyword::CurrentDate)
	}

	fn keyword(keyword: Keyword) -> Self {
		Self(SimpleExpr::Constant(keyword))
	}

	#[must_use]
	pub fn into_simple_expr(self) -> SimpleExpr {
		self.0
	}

	#[must_use]
	pub fn as_simple_expr(&self) -> &SimpleExpr {
		&self.0
	}
}

impl From<Expr> for SimpleExpr {
	fn from(e: Expr) -> Self {
		e.0
	}
}

impl From<SimpleExpr> for Expr {
	fn from(e: SimpleExpr) -> Self {
		Self(e)
	}
}

/// A `CASE` being assembled by [`Expr::case`]
#[derive(Debug, Clone)]
pub struct CaseExprBuilder(CaseStatement);

impl CaseExprBuilder {
	#[must_use]
	pub fn when<C, R>(self, condition: C, result: R) -> Self
	where
		C: Into<SimpleExpr>,
		R: Into<SimpleExpr>,
	{
		Self(self.0.when(condition, result))
	}

	/// Finish with an `ELSE` branch
	#[must_use]
	pub fn else_result<E: Into<SimpleExpr>>(self, result: E) -> Expr {
		Self(self.0.else_result(result)).build()
	}

	/// Finish without `ELSE`; unmatched rows yield NULL
	#[must_use]
	pub fn build(self) -> Expr {
		Expr(SimpleExpr::Case(Box::new(self.0)))
	}
}
