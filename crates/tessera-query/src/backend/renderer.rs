//! Clause walk shared by every dialect.
//!
//! The renderer visits a statement tree once, writing text and binding
//! values in textual order, and asks the dialect for every decision that
//! differs between engines.

use std::cmp::Ordering;

use crate::{
	error::BuildError,
	expr::{CaseStatement, ConditionHolder, RawPart, SimpleExpr, WindowRef},
	query::{
		Assignment, DeleteStatement, InsertSource, InsertStatement, JsonMode, LockClause,
		LockType, OnConflict, OnConflictAction, OnConflictTarget, QueryStatementBuilder,
		ReturningClause, SelectDistinct, SelectStatement, SetOperation, SetOperator, Statement,
		SubQuery, UpdateStatement, WithStatement,
	},
	types::{
		BinOper, ColumnRef, DynIden, JoinExpr, JoinOn, JoinType, OrderExpr, TableRef, UnOper,
		ValuesList, WindowStatement,
	},
	value::{Value, Values},
};

use super::{Feature, QueryBuilder, RenderMode, SqlWriter};

type Rendered = Result<(), BuildError>;

pub(crate) struct SqlRenderer<'a, D: QueryBuilder + ?Sized> {
	dialect: &'a D,
	mode: RenderMode,
	writer: SqlWriter,
	/// Greater than zero inside CASE branches, set operation operands and
	/// VALUES tables, where literals are always cast.
	cast_depth: usize,
	/// Depth of parenthesized sub-selects; JSON output is only converted to
	/// text at depth zero.
	nesting: usize,
	/// WINDOW clause of the SELECT being rendered
	windows: Vec<(DynIden, WindowStatement)>,
}

impl<'a, D: QueryBuilder + ?Sized> SqlRenderer<'a, D> {
	pub(crate) fn new(dialect: &'a D, mode: RenderMode) -> Self {
		Self {
			dialect,
			mode,
			writer: SqlWriter::new(),
			cast_depth: 0,
			nesting: 0,
			windows: Vec::new(),
		}
	}

	pub(crate) fn finish(self) -> (String, Values) {
		self.writer.finish()
	}

	fn require(&self, feature: Feature) -> Rendered {
		if self.dialect.supports(feature) {
			Ok(())
		} else {
			Err(BuildError::Unsupported(feature.as_str(), self.dialect.name()))
		}
	}

	fn push(&mut self, s: &str) {
		self.writer.push(s);
	}

	fn iden(&mut self, iden: &DynIden) {
		let quoted = self.dialect.quote_identifier(iden.as_str());
		self.writer.push(&quoted);
	}

	fn idens(&mut self, idens: &[DynIden]) {
		let dialect = self.dialect;
		self.writer.push_separated(idens, ", ", |w, iden| {
			w.push(&dialect.quote_identifier(iden.as_str()));
		});
	}

	pub(crate) fn statement(&mut self, stmt: &Statement) -> Rendered {
		match stmt {
			Statement::Select(s) => self.select(s),
			Statement::Insert(s) => self.insert(s),
			Statement::Update(s) => self.update(s),
			Statement::Delete(s) => self.delete(s),
			Statement::SetOperation(s) => self.set_operation(s),
			Statement::With(s) => self.with(s),
		}
	}

	/// A parenthesized sub-select; the caller writes the parentheses.
	fn subquery(&mut self, query: &SubQuery) -> Rendered {
		self.nesting += 1;
		let result = self.query_body(query);
		self.nesting -= 1;
		result
	}

	fn query_body(&mut self, query: &SubQuery) -> Rendered {
		match query {
			SubQuery::Select(s) => self.select(s),
			SubQuery::SetOperation(s) => self.set_operation(s),
		}
	}

	// ---------------------------------------------------------------------
	// SELECT
	// ---------------------------------------------------------------------

	pub(crate) fn select(&mut self, stmt: &SelectStatement) -> Rendered {
		match stmt.json {
			None => self.select_core(stmt, false),
			Some(JsonMode::Object) => self.select_core(stmt, true),
			Some(JsonMode::Array) => self.json_array(stmt),
		}
	}

	fn select_core(&mut self, stmt: &SelectStatement, json: bool) -> Rendered {
		stmt.check_aliases()?;
		let outer = std::mem::replace(&mut self.windows, stmt.windows.clone());
		let result = self.select_clauses(stmt, json);
		self.windows = outer;
		result
	}

	fn select_clauses(&mut self, stmt: &SelectStatement, json: bool) -> Rendered {
		self.push("SELECT");
		match &stmt.distinct {
			Some(SelectDistinct::Distinct) => self.push(" DISTINCT"),
			Some(SelectDistinct::DistinctOn(cols)) => {
				self.require(Feature::DistinctOn)?;
				self.push(" DISTINCT ON (");
				for (i, col) in cols.iter().enumerate() {
					if i > 0 {
						self.writer.push_comma();
					}
					self.column_ref(col);
				}
				self.push(")");
			}
			None => {}
		}
		self.push(" ");
		if json {
			self.json_object(stmt)?;
		} else {
			self.projection(stmt)?;
		}

		if !stmt.from.is_empty() {
			self.push(" FROM ");
			for (i, table) in stmt.from.iter().enumerate() {
				if i > 0 {
					self.writer.push_comma();
				}
				self.table_ref(table)?;
			}
		}
		for join in &stmt.join {
			self.push(" ");
			self.join(join)?;
		}
		self.condition(" WHERE ", &stmt.r#where)?;
		if !stmt.groups.is_empty() {
			self.push(" GROUP BY ");
			self.exprs(&stmt.groups)?;
		}
		self.condition(" HAVING ", &stmt.having)?;
		if !stmt.windows.is_empty() {
			self.push(" WINDOW ");
			for (i, (name, window)) in stmt.windows.iter().enumerate() {
				if i > 0 {
					self.writer.push_comma();
				}
				self.iden(name);
				self.push(" AS (");
				self.window_spec(window)?;
				self.push(")");
			}
		}
		self.orders(&stmt.orders)?;
		self.limit_offset(stmt.limit, stmt.offset, stmt.fetch)?;
		if let Some(lock) = &stmt.lock {
			self.lock(lock)?;
		}
		Ok(())
	}

	fn projection(&mut self, stmt: &SelectStatement) -> Rendered {
		if stmt.selects.is_empty() {
			self.push("*");
			return Ok(());
		}
		for (i, item) in stmt.selects.iter().enumerate() {
			if i > 0 {
				self.writer.push_comma();
			}
			self.expr(&item.expr)?;
			if item.is_asterisk() {
				continue;
			}
			if let Some(name) = item.name()
				&& item.natural_name() != Some(name.as_str())
			{
				self.push(" AS ");
				let quoted = self.dialect.quote_identifier(&name);
				self.push(&quoted);
			}
		}
		Ok(())
	}

	/// `json_build_object('alias', expr, ...) AS json`
	fn json_object(&mut self, stmt: &SelectStatement) -> Rendered {
		let dialect = self.dialect;
		let text_type = dialect.json_text_type().filter(|_| self.nesting == 0);
		if text_type.is_some() {
			self.push("CAST(");
		}
		self.push(dialect.json_object_fn());
		self.push("(");
		for (i, item) in stmt.selects.iter().enumerate() {
			let key = item
				.name()
				.filter(|_| !item.is_asterisk())
				.ok_or(BuildError::UnnamedProjection(i))?;
			if i > 0 {
				self.writer.push_comma();
			}
			self.push(&dialect.inline_literal(&Value::from(key.as_str())));
			self.writer.push_comma();
			match (is_json_subquery(&item.expr), dialect.nested_json_fn()) {
				(true, Some(func)) => {
					self.push(func);
					self.push("(");
					self.expr(&item.expr)?;
					self.push(")");
				}
				_ => self.expr(&item.expr)?,
			}
		}
		self.push(")");
		if let Some(ty) = text_type {
			self.push(" AS ");
			self.push(ty);
			self.push(")");
		}
		self.push(" AS json");
		Ok(())
	}

	/// `SELECT COALESCE(agg(records.json), '[]') AS json FROM (<object select>) AS records`
	fn json_array(&mut self, stmt: &SelectStatement) -> Rendered {
		let dialect = self.dialect;
		let text_type = dialect.json_text_type().filter(|_| self.nesting == 0);
		self.push("SELECT ");
		if text_type.is_some() {
			self.push("CAST(");
		}
		self.push("COALESCE(");
		self.push(dialect.json_array_agg_fn());
		self.push("(");
		match dialect.nested_json_fn() {
			Some(func) => {
				self.push(func);
				self.push("(records.json)");
			}
			None => self.push("records.json"),
		}
		self.push("), ");
		self.push(dialect.json_empty_array());
		self.push(")");
		if let Some(ty) = text_type {
			self.push(" AS ");
			self.push(ty);
			self.push(")");
		}
		self.push(" AS json FROM (");
		self.nesting += 1;
		let result = self.select_core(stmt, true);
		self.nesting -= 1;
		result?;
		self.push(") AS records");
		Ok(())
	}

	fn orders(&mut self, orders: &[OrderExpr]) -> Rendered {
		if orders.is_empty() {
			return Ok(());
		}
		self.push(" ORDER BY ");
		for (i, order) in orders.iter().enumerate() {
			if i > 0 {
				self.writer.push_comma();
			}
			self.expr(&order.expr)?;
			self.order_suffix(order)?;
		}
		Ok(())
	}

	fn order_suffix(&mut self, order: &OrderExpr) -> Rendered {
		self.push(" ");
		self.push(order.order.as_str());
		if let Some(nulls) = order.nulls {
			self.require(Feature::NullsOrdering)?;
			self.push(" ");
			self.push(nulls.as_str());
		}
		Ok(())
	}

	/// LIMIT and OFFSET are written as literal numbers.
	fn limit_offset(&mut self, limit: Option<u64>, offset: Option<u64>, fetch: bool) -> Rendered {
		if fetch {
			self.require(Feature::FetchFirst)?;
			if let Some(offset) = offset {
				self.push(&format!(" OFFSET {} ROWS", offset));
			}
			if let Some(limit) = limit {
				self.push(&format!(" FETCH FIRST {} ROWS ONLY", limit));
			}
			return Ok(());
		}
		match (limit, offset) {
			(Some(limit), _) => self.push(&format!(" LIMIT {}", limit)),
			(None, Some(_)) => {
				if let Some(all) = self.dialect.limit_all() {
					self.push(" LIMIT ");
					self.push(all);
				}
			}
			(None, None) => {}
		}
		if let Some(offset) = offset {
			self.push(&format!(" OFFSET {}", offset));
		}
		Ok(())
	}

	fn lock(&mut self, lock: &LockClause) -> Rendered {
		self.require(Feature::RowLocking)?;
		if matches!(lock.r#type, LockType::NoKeyUpdate | LockType::KeyShare) {
			self.require(Feature::KeyLocking)?;
		}
		self.push(" ");
		self.push(lock.r#type.as_str());
		if !lock.of.is_empty() {
			self.push(" OF ");
			self.idens(&lock.of);
		}
		if let Some(behavior) = lock.behavior.as_str() {
			self.push(" ");
			self.push(behavior);
		}
		Ok(())
	}

	fn window_spec(&mut self, window: &WindowStatement) -> Rendered {
		let mut sep = "";
		if !window.partition_by.is_empty() {
			self.push("PARTITION BY ");
			self.exprs(&window.partition_by)?;
			sep = " ";
		}
		if !window.order_by.is_empty() {
			self.push(sep);
			self.push("ORDER BY ");
			for (i, order) in window.order_by.iter().enumerate() {
				if i > 0 {
					self.writer.push_comma();
				}
				self.expr(&order.expr)?;
				self.order_suffix(order)?;
			}
			sep = " ";
		}
		if let Some(frame) = &window.frame {
			self.push(sep);
			self.push(frame.frame_type.as_str());
			match frame.end {
				Some(end) => {
					self.push(" BETWEEN ");
					self.push(&frame.start.to_sql());
					self.push(" AND ");
					self.push(&end.to_sql());
				}
				None => {
					self.push(" ");
					self.push(&frame.start.to_sql());
				}
			}
		}
		Ok(())
	}

	// ---------------------------------------------------------------------
	// Sources
	// ---------------------------------------------------------------------

	fn table_ref(&mut self, table: &TableRef) -> Rendered {
		match table {
			TableRef::Table(name) => self.iden(name),
			TableRef::SchemaTable(schema, name) => {
				self.iden(schema);
				self.push(".");
				self.iden(name);
			}
			TableRef::TableAlias(name, alias) => {
				self.iden(name);
				self.push(" AS ");
				self.iden(alias);
			}
			TableRef::SchemaTableAlias(schema, name, alias) => {
				self.iden(schema);
				self.push(".");
				self.iden(name);
				self.push(" AS ");
				self.iden(alias);
			}
			TableRef::SubQuery(query, alias) => {
				self.push("(");
				self.subquery(query)?;
				self.push(") AS ");
				self.iden(alias);
			}
			TableRef::Lateral(query, alias) => {
				self.require(Feature::Lateral)?;
				self.push("LATERAL (");
				self.subquery(query)?;
				self.push(") AS ");
				self.iden(alias);
			}
			TableRef::Values(values, alias) => self.values_table(values, alias)?,
			TableRef::Join(tree) => {
				self.table_ref(&tree.left)?;
				self.push(" ");
				self.join(&tree.join)?;
			}
		}
		Ok(())
	}

	fn values_table(&mut self, values: &ValuesList, alias: &DynIden) -> Rendered {
		if !values.columns.is_empty() {
			self.require(Feature::ValuesColumnAliases)?;
		}
		let row_keyword = self.dialect.values_row_keyword();
		self.push("(VALUES ");
		self.cast_depth += 1;
		let mut result = Ok(());
		for (i, row) in values.rows.iter().enumerate() {
			if i > 0 {
				self.writer.push_comma();
			}
			if let Some(keyword) = row_keyword {
				self.push(keyword);
			}
			self.push("(");
			result = self.exprs(row);
			if result.is_err() {
				break;
			}
			self.push(")");
		}
		self.cast_depth -= 1;
		result?;
		self.push(") AS ");
		self.iden(alias);
		if !values.columns.is_empty() {
			self.push(" (");
			self.idens(&values.columns);
			self.push(")");
		}
		Ok(())
	}

	fn join(&mut self, join: &JoinExpr) -> Rendered {
		if join.join == JoinType::FullOuterJoin {
			self.require(Feature::FullJoin)?;
		}
		self.push(join.join.as_str());
		self.push(" ");
		self.table_ref(&join.table)?;
		match &join.on {
			Some(JoinOn::Condition(cond)) => {
				self.push(" ON ");
				self.expr(&cond.to_simple_expr())?;
			}
			Some(JoinOn::Using(cols)) => {
				self.push(" USING (");
				self.idens(cols);
				self.push(")");
			}
			None if join.join != JoinType::CrossJoin => self.push(" ON TRUE"),
			None => {}
		}
		Ok(())
	}

	fn condition(&mut self, keyword: &str, holder: &ConditionHolder) -> Rendered {
		match holder.as_condition() {
			Some(cond) => {
				self.push(keyword);
				self.expr(&cond.to_simple_expr())
			}
			None => Ok(()),
		}
	}

	// ---------------------------------------------------------------------
	// Expressions
	// ---------------------------------------------------------------------

	fn exprs(&mut self, exprs: &[SimpleExpr]) -> Rendered {
		for (i, expr) in exprs.iter().enumerate() {
			if i > 0 {
				self.writer.push_comma();
			}
			self.expr(expr)?;
		}
		Ok(())
	}

	fn expr(&mut self, expr: &SimpleExpr) -> Rendered {
		match expr {
			SimpleExpr::Column(col) => self.column_ref(col),
			SimpleExpr::Value(value) => self.value(value)?,
			SimpleExpr::Unary(op, inner) => self.unary(*op, inner)?,
			SimpleExpr::Binary(left, op, right) => self.binary(left, *op, right)?,
			SimpleExpr::FunctionCall(name, args) => {
				self.push(name.as_str());
				self.push("(");
				self.exprs(args)?;
				self.push(")");
			}
			SimpleExpr::SubQuery(op, query) => {
				if let Some(op) = op {
					self.push(op.as_str());
					self.push(" ");
				}
				self.push("(");
				self.subquery(query)?;
				self.push(")");
			}
			SimpleExpr::Tuple(items) => {
				self.push("(");
				self.exprs(items)?;
				self.push(")");
			}
			SimpleExpr::Custom(sql) => self.push(sql),
			SimpleExpr::Raw(raw) => {
				for part in raw.parse()? {
					match part {
						RawPart::Text(text) => self.push(text),
						RawPart::Expr(arg) => self.expr(arg)?,
					}
				}
			}
			SimpleExpr::Constant(keyword) => self.push(keyword.as_str()),
			SimpleExpr::Asterisk => self.push("*"),
			SimpleExpr::Case(case) => {
				self.cast_depth += 1;
				let result = self.case(case);
				self.cast_depth -= 1;
				result?;
			}
			SimpleExpr::Cast(inner, ty) => {
				self.push("CAST(");
				self.expr(inner)?;
				self.push(" AS ");
				self.push(self.dialect.type_name(*ty));
				self.push(")");
			}
			SimpleExpr::Window(inner, window) => {
				self.expr(inner)?;
				self.push(" OVER ");
				match window.as_ref() {
					WindowRef::Named(name) => self.iden(name),
					WindowRef::Spec(spec) => {
						let declared = self
							.windows
							.iter()
							.find(|(_, w)| w == spec)
							.map(|(name, _)| name.clone());
						match declared {
							Some(name) => self.iden(&name),
							None => {
								self.push("(");
								self.window_spec(spec)?;
								self.push(")");
							}
						}
					}
				}
			}
			SimpleExpr::Excluded(col) => {
				let dialect = self.dialect;
				let quoted = dialect.quote_identifier(col.as_str());
				self.push(&dialect.excluded_column(&quoted));
			}
		}
		Ok(())
	}

	fn case(&mut self, case: &CaseStatement) -> Rendered {
		self.push("CASE");
		for (when, then) in &case.branches {
			self.push(" WHEN ");
			self.expr(when)?;
			self.push(" THEN ");
			self.expr(then)?;
		}
		if let Some(other) = &case.otherwise {
			self.push(" ELSE ");
			self.expr(other)?;
		}
		self.push(" END");
		Ok(())
	}

	fn column_ref(&mut self, col: &ColumnRef) {
		match col {
			ColumnRef::Column(name) => self.iden(name),
			ColumnRef::TableColumn(table, name) => {
				self.iden(table);
				self.push(".");
				self.iden(name);
			}
			ColumnRef::SchemaTableColumn(schema, table, name) => {
				self.iden(schema);
				self.push(".");
				self.iden(table);
				self.push(".");
				self.iden(name);
			}
			ColumnRef::Asterisk => self.push("*"),
			ColumnRef::TableAsterisk(table) => {
				self.iden(table);
				self.push(".*");
			}
		}
	}

	fn value(&mut self, value: &Value) -> Rendered {
		if value.is_null() {
			self.push("NULL");
			return Ok(());
		}
		let non_finite = value.is_non_finite();
		if non_finite {
			self.require(Feature::NonFiniteFloat)?;
		}
		let dialect = self.dialect;
		let cast = self.cast_depth > 0
			|| dialect.requires_cast(value)
			|| (non_finite && self.mode == RenderMode::Inline);
		let ty = value.column_type();
		match self.mode {
			RenderMode::Inline => {
				let literal = dialect.inline_literal(value);
				if cast {
					self.push(&dialect.cast_literal(&literal, ty));
				} else {
					self.push(&literal);
				}
			}
			RenderMode::Parameterized => {
				self.writer.bind(value.clone(), |index| {
					let placeholder = dialect.format_placeholder(index);
					if cast {
						dialect.cast_literal(&placeholder, ty)
					} else {
						placeholder
					}
				});
			}
		}
		Ok(())
	}

	fn operand(&mut self, expr: &SimpleExpr, parenthesize: bool) -> Rendered {
		if parenthesize {
			self.push("(");
			self.expr(expr)?;
			self.push(")");
			Ok(())
		} else {
			self.expr(expr)
		}
	}

	fn unary(&mut self, op: UnOper, inner: &SimpleExpr) -> Rendered {
		match op {
			UnOper::Not => {
				self.push("NOT ");
				self.operand(inner, matches!(inner, SimpleExpr::Binary(..)))
			}
			UnOper::Neg => {
				self.push("-");
				let bare = matches!(inner, SimpleExpr::Column(_) | SimpleExpr::FunctionCall(..));
				self.operand(inner, !bare)
			}
			UnOper::Distinct => {
				self.push("DISTINCT ");
				self.expr(inner)
			}
		}
	}

	fn binary(&mut self, left: &SimpleExpr, op: BinOper, right: &SimpleExpr) -> Rendered {
		match (op, right) {
			(BinOper::In, SimpleExpr::Tuple(items)) if items.is_empty() => {
				self.push("1 = 0");
				Ok(())
			}
			(BinOper::NotIn, SimpleExpr::Tuple(items)) if items.is_empty() => {
				self.push("1 = 1");
				Ok(())
			}
			(BinOper::Between | BinOper::NotBetween, SimpleExpr::Binary(low, BinOper::And, high)) => {
				self.operand(left, needs_parens(left, op, false))?;
				self.push(" ");
				self.push(op.as_str());
				self.push(" ");
				self.operand(low, needs_parens(low, op, true))?;
				self.push(" AND ");
				self.operand(high, needs_parens(high, op, true))
			}
			_ => {
				self.operand(left, needs_parens(left, op, false))?;
				self.push(" ");
				self.push(op.as_str());
				self.push(" ");
				self.operand(right, needs_parens(right, op, true))
			}
		}
	}

	// ---------------------------------------------------------------------
	// Set operations and WITH
	// ---------------------------------------------------------------------

	pub(crate) fn set_operation(&mut self, stmt: &SetOperation) -> Rendered {
		if stmt.operands.is_empty() {
			return Err(BuildError::EmptySetOperation);
		}
		if stmt.all && stmt.operator != SetOperator::Union {
			self.require(Feature::SetOperationAll)?;
		}
		let keyword = if stmt.all {
			format!(" {} ALL ", stmt.operator.as_str())
		} else {
			format!(" {} ", stmt.operator.as_str())
		};
		let parenthesize = self.dialect.supports(Feature::ParenthesizedSetOperands);

		self.cast_depth += 1;
		let result = self.set_operands(&stmt.operands, &keyword, parenthesize);
		self.cast_depth -= 1;
		result?;

		if !stmt.orders.is_empty() {
			let names = stmt
				.operands
				.first()
				.and_then(|q| q.projection().ok())
				.unwrap_or_default();
			self.push(" ORDER BY ");
			for (i, order) in stmt.orders.iter().enumerate() {
				if i > 0 {
					self.writer.push_comma();
				}
				let alias = match &order.expr {
					SimpleExpr::Column(col) => col.projection_alias().filter(|a| names.contains(a)),
					_ => None,
				};
				match alias {
					Some(alias) => {
						let quoted = self.dialect.quote_identifier(&alias);
						self.push(&quoted);
					}
					None => self.expr(&order.expr)?,
				}
				self.order_suffix(order)?;
			}
		}
		self.limit_offset(stmt.limit, stmt.offset, false)
	}

	fn set_operands(&mut self, operands: &[SubQuery], keyword: &str, parenthesize: bool) -> Rendered {
		for (i, operand) in operands.iter().enumerate() {
			if i > 0 {
				self.push(keyword);
			}
			if parenthesize {
				self.push("(");
				self.query_body(operand)?;
				self.push(")");
			} else if operand.needs_isolation() {
				self.push("SELECT * FROM (");
				self.query_body(operand)?;
				self.push(")");
			} else {
				self.query_body(operand)?;
			}
		}
		Ok(())
	}

	pub(crate) fn with(&mut self, stmt: &WithStatement) -> Rendered {
		stmt.check_references()?;
		let query = stmt.query.as_deref().ok_or(BuildError::MissingQuery)?;
		self.push("WITH ");
		if stmt.recursive {
			self.push("RECURSIVE ");
		}
		for (i, cte) in stmt.ctes.iter().enumerate() {
			if i > 0 {
				self.writer.push_comma();
			}
			if cte.body.is_data_modifying() {
				self.require(Feature::DataModifyingCte)?;
			}
			self.iden(&cte.name);
			if !cte.columns.is_empty() {
				self.push(" (");
				self.idens(&cte.columns);
				self.push(")");
			}
			self.push(" AS (");
			self.statement(&cte.body)?;
			self.push(")");
		}
		self.push(" ");
		self.statement(query)
	}

	// ---------------------------------------------------------------------
	// DML
	// ---------------------------------------------------------------------

	pub(crate) fn insert(&mut self, stmt: &InsertStatement) -> Rendered {
		let table = stmt
			.table
			.as_ref()
			.ok_or(BuildError::MissingTable("INSERT"))?;
		self.push("INSERT INTO ");
		self.table_ref(table)?;

		match &stmt.source {
			InsertSource::Values(rows) if rows.is_empty() => {
				if !stmt.columns.is_empty() {
					return Err(BuildError::ColumnCountMismatch {
						row: 0,
						expected: stmt.columns.len(),
						found: 0,
					});
				}
				self.push(" ");
				self.push(self.dialect.default_values());
			}
			InsertSource::Values(rows) => {
				self.insert_columns(&stmt.columns);
				self.push(" VALUES ");
				for (i, row) in rows.iter().enumerate() {
					if i > 0 {
						self.writer.push_comma();
					}
					self.push("(");
					self.exprs(row)?;
					self.push(")");
				}
			}
			InsertSource::Subquery(query) => {
				self.insert_columns(&stmt.columns);
				self.push(" ");
				self.subquery(query)?;
			}
		}

		if let Some(on_conflict) = &stmt.on_conflict {
			self.on_conflict(on_conflict)?;
		}
		if let Some(on_duplicate) = &stmt.on_duplicate {
			self.require(Feature::OnDuplicateKeyUpdate)?;
			self.push(" ON DUPLICATE KEY UPDATE ");
			self.assignments(&on_duplicate.assignments)?;
		}
		self.returning(stmt.returning.as_ref())
	}

	fn insert_columns(&mut self, columns: &[DynIden]) {
		if !columns.is_empty() {
			self.push(" (");
			self.idens(columns);
			self.push(")");
		}
	}

	fn on_conflict(&mut self, on_conflict: &OnConflict) -> Rendered {
		self.require(Feature::OnConflict)?;
		self.push(" ON CONFLICT");
		match &on_conflict.target {
			OnConflictTarget::None => {
				if matches!(on_conflict.action, OnConflictAction::DoUpdate { .. }) {
					return Err(BuildError::MissingConflictTarget);
				}
			}
			OnConflictTarget::Columns(cols) => {
				self.push(" (");
				self.idens(cols);
				self.push(")");
			}
			OnConflictTarget::Constraint(name) => {
				self.require(Feature::OnConflictConstraint)?;
				self.push(" ON CONSTRAINT ");
				self.iden(name);
			}
		}
		match &on_conflict.action {
			OnConflictAction::DoNothing => {
				self.push(" DO NOTHING");
				Ok(())
			}
			OnConflictAction::DoUpdate {
				assignments,
				r#where,
			} => {
				if assignments.is_empty() {
					return Err(BuildError::NoAssignments);
				}
				self.push(" DO UPDATE SET ");
				self.assignments(assignments)?;
				self.condition(" WHERE ", r#where)
			}
		}
	}

	fn assignments(&mut self, assignments: &[(DynIden, SimpleExpr)]) -> Rendered {
		for (i, (col, value)) in assignments.iter().enumerate() {
			if i > 0 {
				self.writer.push_comma();
			}
			self.iden(col);
			self.push(" = ");
			self.expr(value)?;
		}
		Ok(())
	}

	fn returning(&mut self, returning: Option<&ReturningClause>) -> Rendered {
		let Some(returning) = returning else {
			return Ok(());
		};
		self.require(Feature::Returning)?;
		self.push(" RETURNING ");
		match returning {
			ReturningClause::All => self.push("*"),
			ReturningClause::Items(items) => {
				for (i, item) in items.iter().enumerate() {
					if i > 0 {
						self.writer.push_comma();
					}
					self.expr(&item.expr)?;
					if let Some(alias) = &item.alias {
						self.push(" AS ");
						let quoted = self.dialect.quote_identifier(alias);
						self.push(&quoted);
					}
				}
			}
		}
		Ok(())
	}

	pub(crate) fn update(&mut self, stmt: &UpdateStatement) -> Rendered {
		let table = stmt
			.table
			.as_ref()
			.ok_or(BuildError::MissingTable("UPDATE"))?;
		if stmt.assignments.is_empty() {
			return Err(BuildError::NoAssignments);
		}
		let from_clause = self.dialect.supports(Feature::UpdateFrom);

		self.push("UPDATE ");
		self.table_ref(table)?;
		if !from_clause {
			for source in &stmt.from {
				self.writer.push_comma();
				self.table_ref(source)?;
			}
		}
		self.push(" SET ");
		for (i, assignment) in stmt.assignments.iter().enumerate() {
			if i > 0 {
				self.writer.push_comma();
			}
			match assignment {
				Assignment::Column(col, value) => {
					self.iden(col);
					self.push(" = ");
					self.expr(value)?;
				}
				Assignment::Tuple(cols, query) => {
					self.require(Feature::TupleAssignment)?;
					self.push("(");
					self.idens(cols);
					self.push(") = (");
					self.subquery(query)?;
					self.push(")");
				}
			}
		}
		if from_clause && !stmt.from.is_empty() {
			self.push(" FROM ");
			for (i, source) in stmt.from.iter().enumerate() {
				if i > 0 {
					self.writer.push_comma();
				}
				self.table_ref(source)?;
			}
		}
		self.condition(" WHERE ", &stmt.r#where)?;
		self.returning(stmt.returning.as_ref())
	}

	pub(crate) fn delete(&mut self, stmt: &DeleteStatement) -> Rendered {
		let table = stmt
			.table
			.as_ref()
			.ok_or(BuildError::MissingTable("DELETE"))?;
		self.push("DELETE FROM ");
		self.table_ref(table)?;
		self.condition(" WHERE ", &stmt.r#where)?;
		self.returning(stmt.returning.as_ref())
	}
}

/// Whether a scalar sub-select produces JSON.
fn is_json_subquery(expr: &SimpleExpr) -> bool {
	matches!(
		expr,
		SimpleExpr::SubQuery(None, query)
			if matches!(query.as_ref(), SubQuery::Select(s) if s.json.is_some())
	)
}

/// Whether `child` must be parenthesized as an operand of `parent`.
fn needs_parens(child: &SimpleExpr, parent: BinOper, right: bool) -> bool {
	match child {
		SimpleExpr::Binary(_, op, _) => match op.precedence().cmp(&parent.precedence()) {
			Ordering::Less => true,
			Ordering::Greater => false,
			Ordering::Equal if right => !(*op == parent && parent.is_associative()),
			Ordering::Equal => parent.is_predicate() && !parent.is_associative(),
		},
		SimpleExpr::Unary(UnOper::Not, _) => parent.precedence() > BinOper::And.precedence(),
		_ => false,
	}
}
