//! Boolean condition trees for WHERE, HAVING and JOIN ... ON.
//!
//! A [`Condition`] joins its items with one [`Junction`] and may be negated
//! as a whole. Items are either plain boolean expressions or nested
//! conditions, so `a AND (b OR c)` is an `and` condition holding `a` and an
//! `or` condition.

use super::simple_expr::{Keyword, SimpleExpr};
use crate::types::{BinOper, UnOper};

/// Operator joining the items of a [`Condition`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Junction {
	#[default]
	And,
	Or,
}

impl Junction {
	pub fn oper(self) -> BinOper {
		match self {
			Self::And => BinOper::And,
			Self::Or => BinOper::Or,
		}
	}

	/// Value of an empty chain
	fn identity(self) -> Keyword {
		match self {
			Self::And => Keyword::True,
			Self::Or => Keyword::False,
		}
	}
}

/// One item of a condition chain
#[derive(Debug, Clone, PartialEq)]
pub enum CondItem {
	Expr(SimpleExpr),
	Nested(Condition),
}

impl CondItem {
	fn to_simple_expr(&self) -> SimpleExpr {
		match self {
			Self::Expr(e) => e.clone(),
			Self::Nested(c) => c.to_simple_expr(),
		}
	}
}

/// A chain of boolean items joined by AND or OR.
///
/// ```rust
/// use tessera_query::prelude::*;
///
/// let cond = Cond::all()
///     .add(Expr::col("verified").eq(true))
///     .add(
///         Cond::any()
///             .add(Expr::col("role").eq("admin"))
///             .add(Expr::col("role").eq("moderator")),
///     );
/// assert_eq!(cond.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Condition {
	pub(crate) junction: Junction,
	pub(crate) negated: bool,
	pub(crate) items: Vec<CondItem>,
}

impl Condition {
	pub fn new(junction: Junction) -> Self {
		Self {
			junction,
			negated: false,
			items: Vec::new(),
		}
	}

	/// Items joined with AND
	pub fn all() -> Self {
		Self::new(Junction::And)
	}

	/// Items joined with OR
	pub fn any() -> Self {
		Self::new(Junction::Or)
	}

	#[must_use]
	#[allow(clippy::should_implement_trait)]
	pub fn add<C: IntoCondition>(mut self, condition: C) -> Self {
		self.items.push(condition.into_cond_item());
		self
	}

	/// Add `condition` when it is `Some`; handy for optional filters
	#[must_use]
	pub fn add_option<C: IntoCondition>(self, condition: Option<C>) -> Self {
		match condition {
			Some(c) => self.add(c),
			None => self,
		}
	}

	/// Negate the whole chain
	#[must_use]
	#[allow(clippy::should_implement_trait)]
	pub fn not(mut self) -> Self {
		self.negated = !self.negated;
		self
	}

	pub fn junction(&self) -> Junction {
		self.junction
	}

	pub fn is_negated(&self) -> bool {
		self.negated
	}

	pub fn items(&self) -> &[CondItem] {
		&self.items
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Fold the chain left to right into one expression.
	///
	/// An empty AND chain is `TRUE`, an empty OR chain is `FALSE`.
	pub fn to_simple_expr(&self) -> SimpleExpr {
		let oper = self.junction.oper();
		let folded = self
			.items
			.iter()
			.map(CondItem::to_simple_expr)
			.reduce(|lhs, rhs| SimpleExpr::Binary(Box::new(lhs), oper, Box::new(rhs)))
			.unwrap_or_else(|| SimpleExpr::Constant(self.junction.identity()));
		if self.negated {
			SimpleExpr::Unary(UnOper::Not, Box::new(folded))
		} else {
			folded
		}
	}

	#[must_use]
	pub fn into_simple_expr(self) -> SimpleExpr {
		self.to_simple_expr()
	}
}

impl From<Condition> for SimpleExpr {
	fn from(c: Condition) -> Self {
		c.to_simple_expr()
	}
}

/// Shorthand constructors for [`Condition`]
pub struct Cond;

impl Cond {
	pub fn all() -> Condition {
		Condition::all()
	}

	pub fn any() -> Condition {
		Condition::any()
	}
}

/// Anything usable as a WHERE/HAVING/ON item.
///
/// Implemented for untyped expressions and for boolean typed expressions
/// only, so `and_where(name.eq("x"))` compiles while `and_where(name)`
/// does not.
pub trait IntoCondition {
	fn into_cond_item(self) -> CondItem;

	/// The item as a condition; a bare expression becomes a one-item AND chain.
	fn into_condition(self) -> Condition
	where
		Self: Sized,
	{
		match self.into_cond_item() {
			CondItem::Nested(c) => c,
			item @ CondItem::Expr(_) => Condition {
				items: vec![item],
				..Condition::all()
			},
		}
	}
}

impl IntoCondition for Condition {
	fn into_cond_item(self) -> CondItem {
		CondItem::Nested(self)
	}

	fn into_condition(self) -> Condition {
		self
	}
}

impl IntoCondition for SimpleExpr {
	fn into_cond_item(self) -> CondItem {
		CondItem::Expr(self)
	}
}

impl IntoCondition for super::expr::Expr {
	fn into_cond_item(self) -> CondItem {
		CondItem::Expr(self.into_simple_expr())
	}
}

/// WHERE or HAVING clause of a statement builder.
///
/// `add_and` extends the current chain. `add_or` turns everything added so
/// far into the left operand of an OR; a later `add_and` then ANDs with
/// that whole group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionHolder {
	pub(crate) root: Condition,
}

impl ConditionHolder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_and<C: IntoCondition>(&mut self, condition: C) {
		if self.root.junction == Junction::Or || self.root.negated {
			let group = std::mem::take(&mut self.root);
			self.root = Condition::all().add(group);
		}
		self.root.items.push(condition.into_cond_item());
	}

	pub fn add_or<C: IntoCondition>(&mut self, condition: C) {
		if self.root.is_empty() {
			self.root.items.push(condition.into_cond_item());
			return;
		}
		let group = std::mem::take(&mut self.root);
		self.root = Condition::any().add(group).add(condition);
	}

	/// Replace the clause with `condition`
	pub fn set_condition(&mut self, condition: Condition) {
		self.root = condition;
	}

	pub fn is_empty(&self) -> bool {
		self.root.is_empty()
	}

	/// Number of top-level items
	pub fn len(&self) -> usize {
		self.root.len()
	}

	/// The clause as a single condition, `None` when nothing was added
	pub fn as_condition(&self) -> Option<&Condition> {
		(!self.root.is_empty()).then_some(&self.root)
	}
}

/// AND of every argument.
///
/// ```rust
/// use tessera_query::{all, expr::{Expr, ExprTrait}};
///
/// let cond = all![Expr::col("active").eq(true), Expr::col("verified").eq(true)];
/// assert_eq!(cond.len(), 2);
/// ```
#[macro_export]
macro_rules! all {
	($($item:expr),* $(,)?) => {
		$crate::expr::Condition::all()$(.add($item))*
	};
}

/// OR of every argument.
///
/// ```rust
/// use tessera_query::{any, expr::{Expr, ExprTrait}};
///
/// let cond = any![Expr::col("role").eq("admin"), Expr::col("role").eq("staff")];
/// assert_eq!(cond.len(), 2);
/// ```
#[macro_export]
macro_rules! any {
	($($item:expr),* $(,)?) => {
		$crate::expr::Condition::any()$(.add($item))*
	};
}
