//! Read-only walks over statement trees.

use crate::expr::{CondItem, ConditionHolder, RawPart, SimpleExpr, WindowRef};
use crate::types::{DynIden, JoinExpr, JoinOn, OrderExpr, TableRef, WindowStatement};

use super::{
	InsertSource, Statement, SubQuery,
	on_conflict::OnConflictAction,
	select::SelectStatement,
	update::Assignment,
};

/// Every unqualified table name a statement reads from or writes to,
/// including names used inside nested sub-selects.
pub(crate) fn referenced_tables(stmt: &Statement) -> Vec<DynIden> {
	let mut out = Vec::new();
	statement(stmt, &mut out);
	out
}

fn statement(stmt: &Statement, out: &mut Vec<DynIden>) {
	match stmt {
		Statement::Select(s) => select(s, out),
		Statement::SetOperation(s) => {
			for operand in &s.operands {
				subquery(operand, out);
			}
			orders(&s.orders, out);
		}
		Statement::Insert(s) => {
			if let Some(t) = &s.table {
				table_ref(t, out);
			}
			match &s.source {
				InsertSource::Values(rows) => rows.iter().flatten().for_each(|e| expr(e, out)),
				InsertSource::Subquery(q) => subquery(q, out),
			}
			if let Some(OnConflictAction::DoUpdate { assignments, r#where }) =
				s.on_conflict.as_ref().map(|c| &c.action)
			{
				assignments.iter().for_each(|(_, e)| expr(e, out));
				conditions(r#where, out);
			}
		}
		Statement::Update(s) => {
			if let Some(t) = &s.table {
				table_ref(t, out);
			}
			for assignment in &s.assignments {
				match assignment {
					Assignment::Column(_, e) => expr(e, out),
					Assignment::Tuple(_, q) => subquery(q, out),
				}
			}
			s.from.iter().for_each(|t| table_ref(t, out));
			conditions(&s.r#where, out);
		}
		Statement::Delete(s) => {
			if let Some(t) = &s.table {
				table_ref(t, out);
			}
			conditions(&s.r#where, out);
		}
		Statement::With(w) => {
			for cte in &w.ctes {
				statement(&cte.body, out);
			}
			if let Some(q) = &w.query {
				statement(q, out);
			}
		}
	}
}

fn subquery(q: &SubQuery, out: &mut Vec<DynIden>) {
	match q {
		SubQuery::Select(s) => select(s, out),
		SubQuery::SetOperation(s) => {
			for operand in &s.operands {
				subquery(operand, out);
			}
		}
	}
}

fn select(s: &SelectStatement, out: &mut Vec<DynIden>) {
	s.selects.iter().for_each(|item| expr(&item.expr, out));
	s.from.iter().for_each(|t| table_ref(t, out));
	s.join.iter().for_each(|j| join(j, out));
	conditions(&s.r#where, out);
	s.groups.iter().for_each(|e| expr(e, out));
	conditions(&s.having, out);
	s.windows.iter().for_each(|(_, w)| window(w, out));
	orders(&s.orders, out);
}

fn table_ref(t: &TableRef, out: &mut Vec<DynIden>) {
	match t {
		TableRef::Table(name) | TableRef::TableAlias(name, _) => out.push(name.clone()),
		TableRef::SchemaTable(..) | TableRef::SchemaTableAlias(..) => {}
		TableRef::SubQuery(q, _) | TableRef::Lateral(q, _) => subquery(q, out),
		TableRef::Values(values, _) => values.rows.iter().flatten().for_each(|e| expr(e, out)),
		TableRef::Join(tree) => {
			table_ref(&tree.left, out);
			join(&tree.join, out);
		}
	}
}

fn join(j: &JoinExpr, out: &mut Vec<DynIden>) {
	table_ref(&j.table, out);
	if let Some(JoinOn::Condition(c)) = &j.on {
		condition_items(c.items(), out);
	}
}

fn conditions(holder: &ConditionHolder, out: &mut Vec<DynIden>) {
	condition_items(holder.root.items(), out);
}

fn condition_items(items: &[CondItem], out: &mut Vec<DynIden>) {
	for item in items {
		match item {
			CondItem::Expr(e) => expr(e, out),
			CondItem::Nested(c) => condition_items(c.items(), out),
		}
	}
}

fn orders(orders: &[OrderExpr], out: &mut Vec<DynIden>) {
	orders.iter().for_each(|o| expr(&o.expr, out));
}

fn window(w: &WindowStatement, out: &mut Vec<DynIden>) {
	w.partition_by.iter().for_each(|e| expr(e, out));
	orders(&w.order_by, out);
}

fn expr(e: &SimpleExpr, out: &mut Vec<DynIden>) {
	match e {
		SimpleExpr::SubQuery(_, q) => subquery(q, out),
		SimpleExpr::Unary(_, inner) | SimpleExpr::Cast(inner, _) => expr(inner, out),
		SimpleExpr::Binary(left, _, right) => {
			expr(left, out);
			expr(right, out);
		}
		SimpleExpr::FunctionCall(_, args) | SimpleExpr::Tuple(args) => {
			args.iter().for_each(|a| expr(a, out));
		}
		SimpleExpr::Case(case) => {
			for (when, then) in &case.branches {
				expr(when, out);
				expr(then, out);
			}
			if let Some(e) = &case.otherwise {
				expr(e, out);
			}
		}
		SimpleExpr::Window(inner, w) => {
			expr(inner, out);
			if let WindowRef::Spec(spec) = w.as_ref() {
				window(spec, out);
			}
		}
		SimpleExpr::Raw(raw) => {
			if let Ok(parts) = raw.parse() {
				for part in parts {
					if let RawPart::Expr(e) = part {
						expr(e, out);
					}
				}
			}
		}
		SimpleExpr::Column(_)
		| SimpleExpr::Value(_)
		| SimpleExpr::Custom(_)
		| SimpleExpr::Constant(_)
		| SimpleExpr::Asterisk
		| SimpleExpr::Excluded(_) => {}
	}
}
