//! SQL aggregate and window function builders.
//!
//! This module provides the [`Func`] struct with static methods for
//! constructing common SQL function calls.

use super::simple_expr::{Keyword, SimpleExpr};
use crate::types::{IntoIden, UnOper};

/// SQL function builder.
///
/// Provides static methods for aggregates (COUNT, SUM, AVG, MIN, MAX),
/// scalar helpers (COALESCE, LOWER, UPPER) and window functions
/// (ROW_NUMBER, RANK, DENSE_RANK, LAG, LEAD). Window functions are finished
/// with [`ExprTrait::over`](super::ExprTrait::over).
///
/// # Examples
///
/// ```rust
/// use tessera_query::prelude::*;
///
/// // COUNT(*)
/// let count_all = Func::count(Expr::asterisk());
///
/// // COALESCE(name, 'Unknown')
/// let name = Func::coalesce([Expr::col("name"), Expr::val("Unknown")]);
///
/// // ROW_NUMBER() OVER (PARTITION BY dept)
/// let rn = Func::row_number().over(WindowStatement::new().partition_by(Expr::col("dept")));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Func;

fn call<E: Into<SimpleExpr>>(name: &str, args: impl IntoIterator<Item = E>) -> SimpleExpr {
	SimpleExpr::FunctionCall(name.into_iden(), args.into_iter().map(Into::into).collect())
}

impl Func {
	/// Create a COUNT(expr) function call.
	pub fn count<E: Into<SimpleExpr>>(expr: E) -> SimpleExpr {
		call("COUNT", [expr])
	}

	/// Create a COUNT(DISTINCT expr) function call.
	pub fn count_distinct<E: Into<SimpleExpr>>(expr: E) -> SimpleExpr {
		call(
			"COUNT",
			[SimpleExpr::Unary(UnOper::Distinct, Box::new(expr.into()))],
		)
	}

	/// Create a SUM(expr) function call.
	pub fn sum<E: Into<SimpleExpr>>(expr: E) -> SimpleExpr {
		call("SUM", [expr])
	}

	/// Create an AVG(expr) function call.
	pub fn avg<E: Into<SimpleExpr>>(expr: E) -> SimpleExpr {
		call("AVG", [expr])
	}

	/// Create a MIN(expr) function call.
	pub fn min<E: Into<SimpleExpr>>(expr: E) -> SimpleExpr {
		call("MIN", [expr])
	}

	/// Create a MAX(expr) function call.
	pub fn max<E: Into<SimpleExpr>>(expr: E) -> SimpleExpr {
		call("MAX", [expr])
	}

	/// Create a COALESCE(expr1, expr2, ...) function call.
	pub fn coalesce<I, E>(exprs: I) -> SimpleExpr
	where
		I: IntoIterator<Item = E>,
		E: Into<SimpleExpr>,
	{
		call("COALESCE", exprs)
	}

	/// Create a LOWER(expr) function call.
	pub fn lower<E: Into<SimpleExpr>>(expr: E) -> SimpleExpr {
		call("LOWER", [expr])
	}

	/// Create an UPPER(expr) function call.
	pub fn upper<E: Into<SimpleExpr>>(expr: E) -> SimpleExpr {
		call("UPPER", [expr])
	}

	/// ROW_NUMBER()
	pub fn row_number() -> SimpleExpr {
		call::<SimpleExpr>("ROW_NUMBER", [])
	}

	/// RANK()
	pub fn rank() -> SimpleExpr {
		call::<SimpleExpr>("RANK", [])
	}

	/// DENSE_RANK()
	pub fn dense_rank() -> SimpleExpr {
		call::<SimpleExpr>("DENSE_RANK", [])
	}

	/// LAG(expr, offset, default)
	///
	/// A missing default is rendered as NULL so the offset is never
	/// misread as the default.
	pub fn lag<E, D>(expr: E, offset: u32, default: Option<D>) -> SimpleExpr
	where
		E: Into<SimpleExpr>,
		D: Into<SimpleExpr>,
	{
		Self::offset_fn("LAG", expr.into(), offset, default.map(Into::into))
	}

	/// LEAD(expr, offset, default)
	pub fn lead<E, D>(expr: E, offset: u32, default: Option<D>) -> SimpleExpr
	where
		E: Into<SimpleExpr>,
		D: Into<SimpleExpr>,
	{
		Self::offset_fn("LEAD", expr.into(), offset, default.map(Into::into))
	}

	fn offset_fn(
		name: &str,
		expr: SimpleExpr,
		offset: u32,
		default: Option<SimpleExpr>,
	) -> SimpleExpr {
		let mut args = vec![expr, SimpleExpr::Custom(offset.to_string())];
		if let Some(default) = default {
			args.push(default);
		} else if offset != 1 {
			args.push(SimpleExpr::Constant(Keyword::Null));
		}
		SimpleExpr::FunctionCall(name.into_iden(), args)
	}
}
