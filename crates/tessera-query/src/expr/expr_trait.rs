//! ExprTrait - combinators shared by [`Expr`] and [`SimpleExpr`].

use super::expr::Expr;
use super::simple_expr::{SimpleExpr, WindowRef};
use crate::query::SubQuery;
use crate::schema::ColumnType;
use crate::types::{BinOper, IntoIden, UnOper, WindowStatement};

fn binary(left: SimpleExpr, op: BinOper, right: SimpleExpr) -> SimpleExpr {
	SimpleExpr::Binary(Box::new(left), op, Box::new(right))
}

/// Untyped expression operations.
///
/// Every method consumes the receiver and returns a new [`SimpleExpr`]; the
/// operands are never modified. Kinds are not checked here; use
/// [`TypedExpr`](super::TypedExpr) or [`DynExpr`](super::DynExpr) for that.
///
/// # Example
///
/// ```rust
/// use tessera_query::expr::{Expr, ExprTrait};
///
/// let expr = Expr::col("age").gte(18).and(Expr::col("active").eq(true));
/// ```
pub trait ExprTrait: Sized {
	/// Convert into the underlying AST node.
	fn into_expr(self) -> SimpleExpr;

	/// `self = right`
	fn eq<R>(self, right: R) -> SimpleExpr
	where
		R: Into<SimpleExpr>,
	{
		binary(self.into_expr(), BinOper::Equal, right.into())
	}

	/// `self <> right`
	fn ne<R>(self, right: R) -> SimpleExpr
	where
		R: Into<SimpleExpr>,
	{
		binary(self.into_expr(), BinOper::NotEqual, right.into())
	}

	/// `self < right`
	fn lt<R>(self, right: R) -> SimpleExpr
	where
		R: Into<SimpleExpr>,
	{
		binary(self.into_expr(), BinOper::SmallerThan, right.into())
	}

	/// `self <= right`
	fn lte<R>(self, right: R) -> SimpleExpr
	where
		R: Into<SimpleExpr>,
	{
		binary(self.into_expr(), BinOper::SmallerThanOrEqual, right.into())
	}

	/// `self > right`
	fn gt<R>(self, right: R) -> SimpleExpr
	where
		R: Into<SimpleExpr>,
	{
		binary(self.into_expr(), BinOper::GreaterThan, right.into())
	}

	/// `self >= right`
	fn gte<R>(self, right: R) -> SimpleExpr
	where
		R: Into<SimpleExpr>,
	{
		binary(self.into_expr(), BinOper::GreaterThanOrEqual, right.into())
	}

	/// `self IS NULL`
	fn is_null(self) -> SimpleExpr {
		binary(
			self.into_expr(),
			BinOper::Is,
			SimpleExpr::Constant(super::Keyword::Null),
		)
	}

	/// `self IS NOT NULL`
	fn is_not_null(self) -> SimpleExpr {
		binary(
			self.into_expr(),
			BinOper::IsNot,
			SimpleExpr::Constant(super::Keyword::Null),
		)
	}

	/// `self IN (v1, v2, ...)`
	///
	/// An empty list renders as a predicate that is always false.
	fn is_in<I, V>(self, values: I) -> SimpleExpr
	where
		I: IntoIterator<Item = V>,
		V: Into<SimpleExpr>,
	{
		binary(
			self.into_expr(),
			BinOper::In,
			SimpleExpr::Tuple(values.into_iter().map(Into::into).collect()),
		)
	}

	/// `self NOT IN (v1, v2, ...)`
	fn is_not_in<I, V>(self, values: I) -> SimpleExpr
	where
		I: IntoIterator<Item = V>,
		V: Into<SimpleExpr>,
	{
		binary(
			self.into_expr(),
			BinOper::NotIn,
			SimpleExpr::Tuple(values.into_iter().map(Into::into).collect()),
		)
	}

	/// `self IN (subquery)`
	fn in_subquery<Q>(self, query: Q) -> SimpleExpr
	where
		Q: Into<SubQuery>,
	{
		binary(
			self.into_expr(),
			BinOper::In,
			SimpleExpr::SubQuery(None, Box::new(query.into())),
		)
	}

	/// `self NOT IN (subquery)`
	fn not_in_subquery<Q>(self, query: Q) -> SimpleExpr
	where
		Q: Into<SubQuery>,
	{
		binary(
			self.into_expr(),
			BinOper::NotIn,
			SimpleExpr::SubQuery(None, Box::new(query.into())),
		)
	}

	/// `self BETWEEN low AND high`
	fn between<A, B>(self, low: A, high: B) -> SimpleExpr
	where
		A: Into<SimpleExpr>,
		B: Into<SimpleExpr>,
	{
		binary(
			self.into_expr(),
			BinOper::Between,
			binary(low.into(), BinOper::And, high.into()),
		)
	}

	/// `self NOT BETWEEN low AND high`
	fn not_between<A, B>(self, low: A, high: B) -> SimpleExpr
	where
		A: Into<SimpleExpr>,
		B: Into<SimpleExpr>,
	{
		binary(
			self.into_expr(),
			BinOper::NotBetween,
			binary(low.into(), BinOper::And, high.into()),
		)
	}

	/// `self LIKE pattern`
	fn like<R>(self, pattern: R) -> SimpleExpr
	where
		R: Into<SimpleExpr>,
	{
		binary(self.into_expr(), BinOper::Like, pattern.into())
	}

	/// `self NOT LIKE pattern`
	fn not_like<R>(self, pattern: R) -> SimpleExpr
	where
		R: Into<SimpleExpr>,
	{
		binary(self.into_expr(), BinOper::NotLike, pattern.into())
	}

	/// `self AND right`
	fn and<R>(self, right: R) -> SimpleExpr
	where
		R: Into<SimpleExpr>,
	{
		binary(self.into_expr(), BinOper::And, right.into())
	}

	/// `self OR right`
	fn or<R>(self, right: R) -> SimpleExpr
	where
		R: Into<SimpleExpr>,
	{
		binary(self.into_expr(), BinOper::Or, right.into())
	}

	/// `NOT self`
	// Intentional builder-pattern method, not std::ops::Not
	#[allow(clippy::should_implement_trait)]
	fn not(self) -> SimpleExpr {
		SimpleExpr::Unary(UnOper::Not, Box::new(self.into_expr()))
	}

	/// `self + right`
	// Intentional builder-pattern method, not std::ops::Add
	#[allow(clippy::should_implement_trait)]
	fn add<R>(self, right: R) -> SimpleExpr
	where
		R: Into<SimpleExpr>,
	{
		binary(self.into_expr(), BinOper::Add, right.into())
	}

	/// `self - right`
	#[allow(clippy::should_implement_trait)]
	fn sub<R>(self, right: R) -> SimpleExpr
	where
		R: Into<SimpleExpr>,
	{
		binary(self.into_expr(), BinOper::Sub, right.into())
	}

	/// `self * right`
	#[allow(clippy::should_implement_trait)]
	fn mul<R>(self, right: R) -> SimpleExpr
	where
		R: Into<SimpleExpr>,
	{
		binary(self.into_expr(), BinOper::Mul, right.into())
	}

	/// `self / right`
	#[allow(clippy::should_implement_trait)]
	fn div<R>(self, right: R) -> SimpleExpr
	where
		R: Into<SimpleExpr>,
	{
		binary(self.into_expr(), BinOper::Div, right.into())
	}

	/// `self % right`
	fn modulo<R>(self, right: R) -> SimpleExpr
	where
		R: Into<SimpleExpr>,
	{
		binary(self.into_expr(), BinOper::Mod, right.into())
	}

	/// `-self`
	#[allow(clippy::should_implement_trait)]
	fn neg(self) -> SimpleExpr {
		SimpleExpr::Unary(UnOper::Neg, Box::new(self.into_expr()))
	}

	/// `CAST(self AS type)`, spelled per dialect.
	fn cast_as(self, ty: ColumnType) -> SimpleExpr {
		SimpleExpr::Cast(Box::new(self.into_expr()), ty)
	}

	/// `self OVER (window)`
	fn over(self, window: WindowStatement) -> SimpleExpr {
		SimpleExpr::Window(
			Box::new(self.into_expr()),
			Box::new(WindowRef::Spec(window)),
		)
	}

	/// `self OVER name`, referring to a named WINDOW definition.
	fn over_named<N>(self, name: N) -> SimpleExpr
	where
		N: IntoIden,
	{
		SimpleExpr::Window(
			Box::new(self.into_expr()),
			Box::new(WindowRef::Named(name.into_iden())),
		)
	}
}

impl ExprTrait for SimpleExpr {
	fn into_expr(self) -> SimpleExpr {
		self
	}
}

impl ExprTrait for Expr {
	fn into_expr(self) -> SimpleExpr {
		self.into_simple_expr()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::expr::Keyword;
	use crate::types::ColumnRef;
	use crate::value::Value;
	use rstest::rstest;

	#[rstest]
	fn test_eq_builds_binary() {
		// Act
		let expr = Expr::col("age").eq(18i32);

		// Assert
		assert_eq!(
			expr,
			SimpleExpr::Binary(
				Box::new(SimpleExpr::Column(ColumnRef::column("age"))),
				BinOper::Equal,
				Box::new(SimpleExpr::Value(Value::Int(Some(18)))),
			)
		);
	}

	#[rstest]
	fn test_is_null_uses_null_keyword() {
		let expr = Expr::col("deleted_at").is_null();
		let SimpleExpr::Binary(_, op, right) = expr else {
			panic!("Expected Binary variant");
		};
		assert_eq!(op, BinOper::Is);
		assert_eq!(*right, SimpleExpr::Constant(Keyword::Null));
	}

	#[rstest]
	fn test_combinators_do_not_mutate_operands() {
		// Arrange
		let base = Expr::col("a").eq(1i32);

		// Act
		let combined = base.clone().and(Expr::col("b").eq(2i32));

		// Assert
		assert_eq!(base.binary_oper(), Some(BinOper::Equal));
		assert_eq!(combined.binary_oper(), Some(BinOper::And));
	}
}
