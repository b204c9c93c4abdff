//! Property tests for statement rendering.

use proptest::prelude::*;
use tessera_query::prelude::*;

fn column_name() -> impl Strategy<Value = &'static str> {
	prop::sample::select(vec!["id", "age", "score", "rank", "order"])
}

fn predicates() -> impl Strategy<Value = Vec<(&'static str, i32, bool)>> {
	prop::collection::vec((column_name(), any::<i32>(), any::<bool>()), 0..8)
}

fn statement(preds: &[(&'static str, i32, bool)], limit: Option<u64>) -> SelectStatement {
	let mut stmt = Query::select();
	stmt.column("id").from("t");
	for (column, value, either) in preds {
		if *either {
			stmt.or_where(Expr::col(*column).gt(*value));
		} else {
			stmt.and_where(Expr::col(*column).eq(*value));
		}
	}
	if let Some(limit) = limit {
		stmt.limit(limit);
	}
	stmt.to_owned()
}

proptest! {
	#[test]
	fn rendering_is_deterministic(preds in predicates(), limit in prop::option::of(0u64..1000)) {
		let stmt = statement(&preds, limit);

		for kind in [DialectKind::Postgres, DialectKind::MySql, DialectKind::Sqlite] {
			let builder = kind.query_builder();
			prop_assert_eq!(stmt.build(builder), stmt.build(builder));
			prop_assert_eq!(stmt.to_string(builder), stmt.to_string(builder));
		}
	}

	#[test]
	fn one_argument_per_placeholder(preds in predicates()) {
		let stmt = statement(&preds, None);

		let (sql, values) = stmt.build(&SqliteQueryBuilder).unwrap();
		prop_assert_eq!(sql.matches('?').count(), values.len());
		prop_assert_eq!(values.len(), preds.len());
	}

	#[test]
	fn postgres_placeholders_are_numbered_in_order(preds in predicates()) {
		let stmt = statement(&preds, None);

		let (sql, values) = stmt.build(&PostgresQueryBuilder).unwrap();
		let mut rest = sql.as_str();
		for index in 1..=values.len() {
			let needle = format!("${}", index);
			let at = rest.find(&needle);
			prop_assert!(at.is_some(), "missing {} in {}", needle, sql);
			rest = &rest[at.unwrap_or(0) + needle.len()..];
		}
		prop_assert!(!rest.contains('$'));
	}

	#[test]
	fn inline_form_binds_nothing(preds in predicates()) {
		let stmt = statement(&preds, None);

		let (sql, values) = stmt
			.build_with(&MySqlQueryBuilder, RenderMode::Inline)
			.unwrap();
		prop_assert!(values.is_empty());
		prop_assert!(!sql.contains('?'));
	}
}
