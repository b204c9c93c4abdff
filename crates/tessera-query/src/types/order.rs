//! Sort keys.

use crate::expr::SimpleExpr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Order {
	#[default]
	Asc,
	Desc,
}

impl Order {
	#[must_use]
	pub fn as_str(&self) -> &'static str {
		if matches!(self, Self::Desc) { "DESC" } else { "ASC" }
	}
}

/// Where NULL keys sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NullOrdering {
	First,
	Last,
}

impl NullOrdering {
	#[must_use]
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::First => "NULLS FIRST",
			Self::Last => "NULLS LAST",
		}
	}
}

/// A key of ORDER BY or of a window's ordering
#[derive(Debug, Clone, PartialEq)]
pub struct OrderExpr {
	pub expr: SimpleExpr,
	pub order: Order,
	/// `None` leaves NULL placement to the database
	pub nulls: Option<NullOrdering>,
}

impl OrderExpr {
	pub fn new(expr: impl Into<SimpleExpr>, order: Order) -> Self {
		Self {
			expr: expr.into(),
			order,
			nulls: None,
		}
	}

	#[must_use]
	pub fn nulls(self, nulls: NullOrdering) -> Self {
		Self {
			nulls: Some(nulls),
			..self
		}
	}
}
