//! SELECT, including JSON-aggregating projections and locking.

use std::collections::HashSet;

use crate::{
	backend::{QueryBuilder, RenderMode},
	error::BuildError,
	expr::{Condition, ConditionHolder, IntoCondition, SimpleExpr},
	types::{
		ColumnRef, DynIden, IntoColumnRef, IntoIden, IntoTableRef, JoinExpr, JoinOn, JoinType,
		NullOrdering, Order, OrderExpr, TableRef, WindowStatement,
	},
	value::Values,
};

use super::{
	lock::{LockBehavior, LockClause, LockType},
	traits::QueryStatementBuilder,
};

/// One item of the projection list.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectExpr {
	/// The projected expression
	pub expr: SimpleExpr,
	/// Explicit alias, overriding the projection alias
	pub alias: Option<DynIden>,
}

impl SelectExpr {
	/// The resolved projection alias of this item.
	///
	/// An explicit alias wins; a qualified column resolves to
	/// `"<source>.<name>"`, an unqualified one to its own name. Computed
	/// expressions without an alias have no name.
	#[must_use]
	pub fn name(&self) -> Option<String> {
		if let Some(alias) = &self.alias {
			return Some(alias.to_string());
		}
		match &self.expr {
			SimpleExpr::Column(col) => col
				.projection_alias()
				.or_else(|| col.column_name().map(ToString::to_string)),
			_ => None,
		}
	}

	/// The name the database gives this item when no alias is written.
	pub(crate) fn natural_name(&self) -> Option<&str> {
		match &self.expr {
			SimpleExpr::Column(col) => col.column_name().map(DynIden::as_str),
			_ => None,
		}
	}

	pub(crate) fn is_asterisk(&self) -> bool {
		matches!(
			self.expr,
			SimpleExpr::Asterisk
				| SimpleExpr::Column(ColumnRef::Asterisk)
				| SimpleExpr::Column(ColumnRef::TableAsterisk(_))
		)
	}
}

/// `DISTINCT` or `DISTINCT ON (...)`; the two are mutually exclusive.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectDistinct {
	/// `SELECT DISTINCT`
	Distinct,
	/// `SELECT DISTINCT ON (columns)`
	DistinctOn(Vec<ColumnRef>),
}

/// How a SELECT is wrapped into JSON by the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonMode {
	/// One JSON object per row, keyed by projection alias
	Object,
	/// A single JSON array holding one object per row
	Array,
}

/// SELECT statement builder
///
/// Clauses render in a fixed order regardless of the order the builder
/// methods were called in.
///
/// # Examples
///
/// ```rust,ignore
/// use tessera_query::prelude::*;
///
/// let query = Query::select()
///     .column("id")
///     .column("name")
///     .from("users")
///     .and_where(Expr::col("active").eq(true))
///     .order_by(Expr::col("name"), Order::Asc)
///     .limit(10)
///     .to_owned();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
	pub(crate) distinct: Option<SelectDistinct>,
	pub(crate) selects: Vec<SelectExpr>,
	pub(crate) from: Vec<TableRef>,
	pub(crate) join: Vec<JoinExpr>,
	pub(crate) r#where: ConditionHolder,
	pub(crate) groups: Vec<SimpleExpr>,
	pub(crate) having: ConditionHolder,
	pub(crate) windows: Vec<(DynIden, WindowStatement)>,
	pub(crate) orders: Vec<OrderExpr>,
	pub(crate) limit: Option<u64>,
	pub(crate) offset: Option<u64>,
	pub(crate) fetch: bool,
	pub(crate) lock: Option<LockClause>,
	pub(crate) json: Option<JsonMode>,
}

impl SelectStatement {
	/// Create a new SELECT statement
	pub fn new() -> Self {
		Self {
			distinct: None,
			selects: Vec::new(),
			from: Vec::new(),
			join: Vec::new(),
			r#where: ConditionHolder::new(),
			groups: Vec::new(),
			having: ConditionHolder::new(),
			windows: Vec::new(),
			orders: Vec::new(),
			limit: None,
			offset: None,
			fetch: false,
			lock: None,
			json: None,
		}
	}

	/// Take the ownership of data in the current [`SelectStatement`]
	pub fn take(&mut self) -> Self {
		std::mem::take(self)
	}

	/// `SELECT DISTINCT`
	pub fn distinct(&mut self) -> &mut Self {
		self.distinct = Some(SelectDistinct::Distinct);
		self
	}

	/// `SELECT DISTINCT ON (...)`, replacing a plain `DISTINCT`
	pub fn distinct_on<I, C>(&mut self, cols: I) -> &mut Self
	where
		I: IntoIterator<Item = C>,
		C: IntoColumnRef,
	{
		self.distinct = Some(SelectDistinct::DistinctOn(
			cols.into_iter().map(IntoColumnRef::into_column_ref).collect(),
		));
		self
	}

	/// Add a column to the projection
	///
	/// # Examples
	///
	/// ```rust,ignore
	/// use tessera_query::prelude::*;
	///
	/// let query = Query::select()
	///     .column("id")
	///     .column(("users", "name"))
	///     .from("users")
	///     .to_owned();
	/// ```
	pub fn column<C>(&mut self, col: C) -> &mut Self
	where
		C: IntoColumnRef,
	{
		self.selects.push(SelectExpr {
			expr: SimpleExpr::Column(col.into_column_ref()),
			alias: None,
		});
		self
	}

	/// Add several columns to the projection
	pub fn columns<I, C>(&mut self, cols: I) -> &mut Self
	where
		I: IntoIterator<Item = C>,
		C: IntoColumnRef,
	{
		for col in cols {
			self.column(col);
		}
		self
	}

	/// Add an expression to the projection
	pub fn expr<E>(&mut self, expr: E) -> &mut Self
	where
		E: Into<SimpleExpr>,
	{
		self.selects.push(SelectExpr {
			expr: expr.into(),
			alias: None,
		});
		self
	}

	/// Add several expressions to the projection
	pub fn exprs<I, E>(&mut self, exprs: I) -> &mut Self
	where
		I: IntoIterator<Item = E>,
		E: Into<SimpleExpr>,
	{
		for expr in exprs {
			self.expr(expr);
		}
		self
	}

	/// Add an expression with an explicit alias
	///
	/// # Examples
	///
	/// ```rust,ignore
	/// use tessera_query::prelude::*;
	///
	/// let query = Query::select()
	///     .expr_as(Func::count(Expr::asterisk()), "total")
	///     .from("orders")
	///     .to_owned();
	/// ```
	pub fn expr_as<E, A>(&mut self, expr: E, alias: A) -> &mut Self
	where
		E: Into<SimpleExpr>,
		A: IntoIden,
	{
		self.selects.push(SelectExpr {
			expr: expr.into(),
			alias: Some(alias.into_iden()),
		});
		self
	}

	/// Remove every projection item
	pub fn clear_selects(&mut self) -> &mut Self {
		self.selects.clear();
		self
	}

	/// Add a FROM source. Several sources are separated by commas.
	pub fn from<T>(&mut self, table: T) -> &mut Self
	where
		T: IntoTableRef,
	{
		self.from.push(table.into_table_ref());
		self
	}

	/// Add a derived table to FROM
	pub fn from_subquery<Q, A>(&mut self, query: Q, alias: A) -> &mut Self
	where
		Q: Into<super::SubQuery>,
		A: IntoIden,
	{
		self.from.push(TableRef::subquery(query, alias));
		self
	}

	/// Add a JOIN
	pub fn join<T, C>(&mut self, join: JoinType, table: T, condition: C) -> &mut Self
	where
		T: IntoTableRef,
		C: IntoCondition,
	{
		self.join.push(JoinExpr::new(
			join,
			table.into_table_ref(),
			Some(JoinOn::Condition(Box::new(condition.into_condition()))),
		));
		self
	}

	/// Add a JOIN with a USING column list
	pub fn join_using<T, I, C>(&mut self, join: JoinType, table: T, cols: I) -> &mut Self
	where
		T: IntoTableRef,
		I: IntoIterator<Item = C>,
		C: IntoIden,
	{
		self.join.push(JoinExpr::new(
			join,
			table.into_table_ref(),
			Some(JoinOn::Using(cols.into_iter().map(IntoIden::into_iden).collect())),
		));
		self
	}

	/// `INNER JOIN table ON condition`
	pub fn inner_join<T, C>(&mut self, table: T, condition: C) -> &mut Self
	where
		T: IntoTableRef,
		C: IntoCondition,
	{
		self.join(JoinType::InnerJoin, table, condition)
	}

	/// `LEFT JOIN table ON condition`
	pub fn left_join<T, C>(&mut self, table: T, condition: C) -> &mut Self
	where
		T: IntoTableRef,
		C: IntoCondition,
	{
		self.join(JoinType::LeftJoin, table, condition)
	}

	/// `RIGHT JOIN table ON condition`
	pub fn right_join<T, C>(&mut self, table: T, condition: C) -> &mut Self
	where
		T: IntoTableRef,
		C: IntoCondition,
	{
		self.join(JoinType::RightJoin, table, condition)
	}

	/// `FULL OUTER JOIN table ON condition`
	pub fn full_outer_join<T, C>(&mut self, table: T, condition: C) -> &mut Self
	where
		T: IntoTableRef,
		C: IntoCondition,
	{
		self.join(JoinType::FullOuterJoin, table, condition)
	}

	/// `CROSS JOIN table`
	pub fn cross_join<T>(&mut self, table: T) -> &mut Self
	where
		T: IntoTableRef,
	{
		self.join
			.push(JoinExpr::new(JoinType::CrossJoin, table.into_table_ref(), None));
		self
	}

	/// AND `condition` onto WHERE
	pub fn and_where<C>(&mut self, condition: C) -> &mut Self
	where
		C: IntoCondition,
	{
		self.r#where.add_and(condition);
		self
	}

	/// Add a condition with OR, grouping everything added so far
	pub fn or_where<C>(&mut self, condition: C) -> &mut Self
	where
		C: IntoCondition,
	{
		self.r#where.add_or(condition);
		self
	}

	/// [`and_where`](Self::and_where) for a prebuilt [`Condition`]
	pub fn cond_where(&mut self, condition: Condition) -> &mut Self {
		self.r#where.add_and(condition);
		self
	}

	/// Add a GROUP BY expression
	pub fn group_by<E>(&mut self, expr: E) -> &mut Self
	where
		E: Into<SimpleExpr>,
	{
		self.groups.push(expr.into());
		self
	}

	/// Add several GROUP BY columns
	pub fn group_by_columns<I, C>(&mut self, cols: I) -> &mut Self
	where
		I: IntoIterator<Item = C>,
		C: IntoColumnRef,
	{
		self.groups.extend(
			cols.into_iter()
				.map(|c| SimpleExpr::Column(c.into_column_ref())),
		);
		self
	}

	/// Add a condition to the HAVING clause
	pub fn and_having<C>(&mut self, condition: C) -> &mut Self
	where
		C: IntoCondition,
	{
		self.having.add_and(condition);
		self
	}

	/// Add a HAVING condition with OR
	pub fn or_having<C>(&mut self, condition: C) -> &mut Self
	where
		C: IntoCondition,
	{
		self.having.add_or(condition);
		self
	}

	/// Declare a named window (`WINDOW name AS (...)`)
	///
	/// Window functions whose inline window equals a declared one render as
	/// `OVER name`.
	pub fn window<N>(&mut self, name: N, window: WindowStatement) -> &mut Self
	where
		N: IntoIden,
	{
		self.windows.push((name.into_iden(), window));
		self
	}

	/// Add an ORDER BY expression
	pub fn order_by<E>(&mut self, expr: E, order: Order) -> &mut Self
	where
		E: Into<SimpleExpr>,
	{
		self.orders.push(OrderExpr::new(expr, order));
		self
	}

	/// Add an ORDER BY expression with NULLS FIRST/LAST
	pub fn order_by_with_nulls<E>(&mut self, expr: E, order: Order, nulls: NullOrdering) -> &mut Self
	where
		E: Into<SimpleExpr>,
	{
		self.orders.push(OrderExpr::new(expr, order).nulls(nulls));
		self
	}

	/// Add a prepared ORDER BY item, such as [`Column::asc`](crate::schema::Column::asc)
	pub fn order_by_expr(&mut self, order: OrderExpr) -> &mut Self {
		self.orders.push(order);
		self
	}

	/// `LIMIT n`
	pub fn limit(&mut self, limit: u64) -> &mut Self {
		self.limit = Some(limit);
		self.fetch = false;
		self
	}

	/// `OFFSET n`
	pub fn offset(&mut self, offset: u64) -> &mut Self {
		self.offset = Some(offset);
		self
	}

	/// `FETCH FIRST n ROWS ONLY` instead of `LIMIT n`
	pub fn fetch_first(&mut self, rows: u64) -> &mut Self {
		self.limit = Some(rows);
		self.fetch = true;
		self
	}

	/// `FOR UPDATE`, `FOR SHARE`, ...
	pub fn lock(&mut self, r#type: LockType) -> &mut Self {
		self.lock = Some(LockClause::new(r#type));
		self
	}

	/// Row lock with `NOWAIT` or `SKIP LOCKED`
	pub fn lock_with_behavior(&mut self, r#type: LockType, behavior: LockBehavior) -> &mut Self {
		self.lock = Some(LockClause::new(r#type).behavior(behavior));
		self
	}

	/// Row lock restricted to some tables (`FOR UPDATE OF t`)
	pub fn lock_of<I, T>(&mut self, r#type: LockType, tables: I, behavior: LockBehavior) -> &mut Self
	where
		I: IntoIterator<Item = T>,
		T: IntoIden,
	{
		self.lock = Some(LockClause::new(r#type).of(tables).behavior(behavior));
		self
	}

	/// Ask the database to return each row as one JSON object keyed by
	/// projection alias, in a single `json` column.
	pub fn json_object(&mut self) -> &mut Self {
		self.json = Some(JsonMode::Object);
		self
	}

	/// Ask the database to aggregate every row into one JSON array of
	/// objects, returned as a single row with a single `json` column.
	pub fn json_array(&mut self) -> &mut Self {
		self.json = Some(JsonMode::Array);
		self
	}

	/// The JSON wrapping mode, if any.
	#[must_use]
	pub fn json_mode(&self) -> Option<JsonMode> {
		self.json
	}

	/// Projection items as written, ignoring JSON wrapping.
	#[must_use]
	pub fn selects(&self) -> &[SelectExpr] {
		&self.selects
	}

	/// Fail if two named projection items share an alias.
	pub(crate) fn check_aliases(&self) -> Result<(), BuildError> {
		let mut seen = HashSet::new();
		for item in &self.selects {
			if item.is_asterisk() {
				continue;
			}
			if let Some(name) = item.name()
				&& !seen.insert(name.clone())
			{
				return Err(BuildError::AmbiguousAlias(name));
			}
		}
		Ok(())
	}

	/// Projection names before JSON wrapping: every item must be named.
	pub(crate) fn row_projection(&self) -> Result<Vec<String>, BuildError> {
		self.check_aliases()?;
		self.selects
			.iter()
			.enumerate()
			.map(|(i, item)| {
				if item.is_asterisk() {
					return Ok(match &item.expr {
						SimpleExpr::Column(ColumnRef::TableAsterisk(t)) => format!("{}.*", t),
						_ => "*".to_string(),
					});
				}
				item.name().ok_or(BuildError::UnnamedProjection(i))
			})
			.collect()
	}
}

impl Default for SelectStatement {
	fn default() -> Self {
		Self::new()
	}
}

impl QueryStatementBuilder for SelectStatement {
	fn build_with(
		&self,
		query_builder: &dyn QueryBuilder,
		mode: RenderMode,
	) -> Result<(String, Values), BuildError> {
		query_builder.build_select(self, mode)
	}

	fn projection(&self) -> Result<Vec<String>, BuildError> {
		match self.json {
			Some(_) => Ok(vec!["json".to_string()]),
			None => self.row_projection(),
		}
	}
}
