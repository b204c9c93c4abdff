//! UNION / INTERSECT / EXCEPT

use crate::{
	backend::{QueryBuilder, RenderMode},
	error::BuildError,
	expr::SimpleExpr,
	types::{NullOrdering, Order, OrderExpr},
	value::Values,
};

use super::{SubQuery, traits::QueryStatementBuilder};

/// Set operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOperator {
	/// `UNION`
	Union,
	/// `INTERSECT`
	Intersect,
	/// `EXCEPT`
	Except,
}

impl SetOperator {
	/// SQL keyword.
	#[must_use]
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Union => "UNION",
			Self::Intersect => "INTERSECT",
			Self::Except => "EXCEPT",
		}
	}
}

/// Combination of several row sources by one set operator, with an
/// ORDER BY / LIMIT / OFFSET applied to the combined result.
///
/// Mixing operators is done by nesting: an operand may itself be a
/// `SetOperation`.
///
/// # Examples
///
/// ```rust,ignore
/// use tessera_query::prelude::*;
///
/// let stmt = Query::union_all([
///     Query::select().column(("staff", "name")).from("staff").to_owned(),
///     Query::select().column(("contractor", "name")).from("contractor").to_owned(),
/// ])
/// .order_by(Expr::col("name"), Order::Asc)
/// .to_owned();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SetOperation {
	pub(crate) operator: SetOperator,
	pub(crate) all: bool,
	pub(crate) operands: Vec<SubQuery>,
	pub(crate) orders: Vec<OrderExpr>,
	pub(crate) limit: Option<u64>,
	pub(crate) offset: Option<u64>,
}

impl SetOperation {
	/// Combine `operands` with `operator`
	pub fn new<I, Q>(operator: SetOperator, all: bool, operands: I) -> Self
	where
		I: IntoIterator<Item = Q>,
		Q: Into<SubQuery>,
	{
		Self {
			operator,
			all,
			operands: operands.into_iter().map(Into::into).collect(),
			orders: Vec::new(),
			limit: None,
			offset: None,
		}
	}

	/// Append an operand
	pub fn add<Q>(&mut self, operand: Q) -> &mut Self
	where
		Q: Into<SubQuery>,
	{
		self.operands.push(operand.into());
		self
	}

	/// Order the combined result
	///
	/// Qualified columns that name a projection item of the first operand
	/// are rendered as that item's alias.
	pub fn order_by<E>(&mut self, expr: E, order: Order) -> &mut Self
	where
		E: Into<SimpleExpr>,
	{
		self.orders.push(OrderExpr::new(expr, order));
		self
	}

	/// Order the combined result with NULLS FIRST/LAST
	pub fn order_by_with_nulls<E>(&mut self, expr: E, order: Order, nulls: NullOrdering) -> &mut Self
	where
		E: Into<SimpleExpr>,
	{
		self.orders.push(OrderExpr::new(expr, order).nulls(nulls));
		self
	}

	/// Add a prepared ORDER BY item
	pub fn order_by_expr(&mut self, order: OrderExpr) -> &mut Self {
		self.orders.push(order);
		self
	}

	/// `LIMIT n` on the combined result
	pub fn limit(&mut self, limit: u64) -> &mut Self {
		self.limit = Some(limit);
		self
	}

	/// `OFFSET n` on the combined result
	pub fn offset(&mut self, offset: u64) -> &mut Self {
		self.offset = Some(offset);
		self
	}

	/// The set operator
	#[must_use]
	pub fn operator(&self) -> SetOperator {
		self.operator
	}

	/// Whether duplicates are kept (`ALL`)
	#[must_use]
	pub fn is_all(&self) -> bool {
		self.all
	}

	/// The operands in order
	#[must_use]
	pub fn operands(&self) -> &[SubQuery] {
		&self.operands
	}
}

impl QueryStatementBuilder for SetOperation {
	fn build_with(
		&self,
		query_builder: &dyn QueryBuilder,
		mode: RenderMode,
	) -> Result<(String, Values), BuildError> {
		query_builder.build_set_operation(self, mode)
	}

	/// The combined result is named after its first operand.
	fn projection(&self) -> Result<Vec<String>, BuildError> {
		self.operands
			.first()
			.ok_or(BuildError::EmptySetOperation)?
			.projection()
	}
}
