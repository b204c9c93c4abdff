//! `OVER (...)` definitions: partitioning, ordering and an optional frame.
//!
//! A definition is used inline by a window call or registered by name in
//! a `WINDOW` clause; the renderer prints the name when the two are equal.

use crate::expr::SimpleExpr;

use super::order::{NullOrdering, Order, OrderExpr};

/// Frame unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameType {
	/// RANGE
	Range,
	/// ROWS
	Rows,
	/// GROUPS
	Groups,
}

impl FrameType {
	/// SQL keyword.
	#[must_use]
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Range => "RANGE",
			Self::Rows => "ROWS",
			Self::Groups => "GROUPS",
		}
	}
}

/// Frame boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
	/// UNBOUNDED PRECEDING
	UnboundedPreceding,
	/// `n` PRECEDING
	Preceding(u64),
	/// CURRENT ROW
	CurrentRow,
	/// `n` FOLLOWING
	Following(u64),
	/// UNBOUNDED FOLLOWING
	UnboundedFollowing,
}

impl Frame {
	/// SQL text of the boundary.
	#[must_use]
	pub fn to_sql(&self) -> String {
		match self {
			Self::UnboundedPreceding => "UNBOUNDED PRECEDING".to_string(),
			Self::Preceding(n) => format!("{} PRECEDING", n),
			Self::CurrentRow => "CURRENT ROW".to_string(),
			Self::Following(n) => format!("{} FOLLOWING", n),
			Self::UnboundedFollowing => "UNBOUNDED FOLLOWING".to_string(),
		}
	}
}

/// Frame clause of a window specification.
///
/// With no `end`, the clause renders as `ROWS <start>`; otherwise as
/// `ROWS BETWEEN <start> AND <end>`.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameClause {
	/// Frame unit
	pub frame_type: FrameType,
	/// Start boundary
	pub start: Frame,
	/// Optional end boundary
	pub end: Option<Frame>,
}

/// Window specification used by `OVER (...)` and `WINDOW name AS (...)`.
///
/// A specification without a frame clause uses the database default frame.
///
/// # Examples
///
/// ```rust
/// use tessera_query::prelude::*;
///
/// let window = WindowStatement::new()
///     .partition_by(Expr::col("department"))
///     .order_by(Expr::col("salary"), Order::Desc)
///     .frame_between(FrameType::Rows, Frame::UnboundedPreceding, Frame::CurrentRow);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowStatement {
	/// PARTITION BY expressions
	pub partition_by: Vec<SimpleExpr>,
	/// ORDER BY items
	pub order_by: Vec<OrderExpr>,
	/// Frame clause
	pub frame: Option<FrameClause>,
}

impl WindowStatement {
	/// Create an empty window specification.
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a PARTITION BY expression.
	#[must_use]
	pub fn partition_by(mut self, expr: impl Into<SimpleExpr>) -> Self {
		self.partition_by.push(expr.into());
		self
	}

	/// Add an ORDER BY item.
	#[must_use]
	pub fn order_by(mut self, expr: impl Into<SimpleExpr>, order: Order) -> Self {
		self.order_by.push(OrderExpr::new(expr, order));
		self
	}

	/// Add an ORDER BY item with NULL placement.
	#[must_use]
	pub fn order_by_with_nulls(
		mut self,
		expr: impl Into<SimpleExpr>,
		order: Order,
		nulls: NullOrdering,
	) -> Self {
		self.order_by.push(OrderExpr::new(expr, order).nulls(nulls));
		self
	}

	/// Set a single-boundary frame.
	#[must_use]
	pub fn frame_start(mut self, frame_type: FrameType, start: Frame) -> Self {
		self.frame = Some(FrameClause {
			frame_type,
			start,
			end: None,
		});
		self
	}

	/// Set a `BETWEEN start AND end` frame.
	#[must_use]
	pub fn frame_between(mut self, frame_type: FrameType, start: Frame, end: Frame) -> Self {
		self.frame = Some(FrameClause {
			frame_type,
			start,
			end: Some(end),
		});
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::expr::Expr;
	use rstest::rstest;

	#[rstest]
	fn test_window_structural_equality() {
		let a = WindowStatement::new()
			.partition_by(Expr::col("dept"))
			.order_by(Expr::col("salary"), Order::Desc);
		let b = WindowStatement::new()
			.partition_by(Expr::col("dept"))
			.order_by(Expr::col("salary"), Order::Desc);
		assert_eq!(a, b);
		assert_ne!(a, b.frame_start(FrameType::Rows, Frame::CurrentRow));
	}

	#[rstest]
	#[case(Frame::UnboundedPreceding, "UNBOUNDED PRECEDING")]
	#[case(Frame::Preceding(3), "3 PRECEDING")]
	#[case(Frame::CurrentRow, "CURRENT ROW")]
	#[case(Frame::Following(1), "1 FOLLOWING")]
	fn test_frame_sql(#[case] frame: Frame, #[case] expected: &str) {
		assert_eq!(frame.to_sql(), expected);
	}
}
