//! SQL Backend implementations
//!
//! This module provides database-specific SQL generation backends for
//! PostgreSQL, MySQL and SQLite. A backend is a strategy object: it supplies
//! placeholder syntax, identifier quoting, literal casts and the set of
//! clause forms the engine accepts. The clause walk itself is shared and
//! lives in the renderer, so every dialect renders clauses in the same
//! canonical order and numbers placeholders identically.

use std::fmt;
use std::str::FromStr;

use crate::{
	error::BuildError,
	query::{
		DeleteStatement, InsertStatement, SelectStatement, SetOperation, Statement,
		UpdateStatement, WithStatement,
	},
	schema::ColumnType,
	value::{Value, Values},
};

mod mysql;
mod postgres;
mod renderer;
mod sql_writer;
mod sqlite;

pub use mysql::MySqlQueryBuilder;
pub use postgres::PostgresQueryBuilder;
pub use sql_writer::SqlWriter;
pub use sqlite::SqliteQueryBuilder;

use renderer::SqlRenderer;

/// How literal values appear in rendered SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
	/// Values become placeholders and are returned separately
	#[default]
	Parameterized,
	/// Values are substituted into the text, cast where the dialect would
	/// otherwise mis-infer their type. For logs and fixtures only.
	Inline,
}

/// Clause forms that not every dialect accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
	/// `RETURNING ...`
	Returning,
	/// `ON CONFLICT ...`
	OnConflict,
	/// `ON CONFLICT ON CONSTRAINT name`
	OnConflictConstraint,
	/// `ON DUPLICATE KEY UPDATE ...`
	OnDuplicateKeyUpdate,
	/// `SELECT DISTINCT ON (...)`
	DistinctOn,
	/// `LATERAL (subquery)`
	Lateral,
	/// `FULL OUTER JOIN`
	FullJoin,
	/// `FOR UPDATE` / `FOR SHARE`
	RowLocking,
	/// `FOR NO KEY UPDATE` / `FOR KEY SHARE`
	KeyLocking,
	/// `FETCH FIRST n ROWS ONLY`
	FetchFirst,
	/// `NULLS FIRST` / `NULLS LAST`
	NullsOrdering,
	/// `INTERSECT ALL` / `EXCEPT ALL`
	SetOperationAll,
	/// `(a, b) = (SELECT ...)` in UPDATE
	TupleAssignment,
	/// `UPDATE t SET ... FROM x`; without it extra sources are listed
	/// after the target table
	UpdateFrom,
	/// INSERT/UPDATE/DELETE as a CTE body
	DataModifyingCte,
	/// `(SELECT ...) UNION (SELECT ...)`
	ParenthesizedSetOperands,
	/// `(VALUES ...) AS v (a, b)`
	ValuesColumnAliases,
	/// NaN and infinite floating-point values
	NonFiniteFloat,
}

impl Feature {
	/// Human-readable name used in error messages.
	#[must_use]
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Returning => "RETURNING",
			Self::OnConflict => "ON CONFLICT",
			Self::OnConflictConstraint => "ON CONFLICT ON CONSTRAINT",
			Self::OnDuplicateKeyUpdate => "ON DUPLICATE KEY UPDATE",
			Self::DistinctOn => "DISTINCT ON",
			Self::Lateral => "LATERAL",
			Self::FullJoin => "FULL OUTER JOIN",
			Self::RowLocking => "row locking",
			Self::KeyLocking => "FOR NO KEY UPDATE / FOR KEY SHARE",
			Self::FetchFirst => "FETCH FIRST",
			Self::NullsOrdering => "NULLS FIRST / NULLS LAST",
			Self::SetOperationAll => "INTERSECT ALL / EXCEPT ALL",
			Self::TupleAssignment => "tuple assignment from a sub-select",
			Self::UpdateFrom => "UPDATE ... FROM",
			Self::DataModifyingCte => "data-modifying CTE",
			Self::ParenthesizedSetOperands => "parenthesized set operands",
			Self::ValuesColumnAliases => "VALUES column aliases",
			Self::NonFiniteFloat => "NaN or infinite float",
		}
	}
}

/// Words quoted by every dialect when used as identifiers.
const RESERVED: &[&str] = &[
	"all", "alter", "and", "any", "as", "asc", "between", "both", "by", "case", "cast", "check",
	"collate", "column", "constraint", "create", "cross", "current_date", "current_time",
	"current_timestamp", "current_user", "default", "delete", "desc", "distinct", "do", "drop",
	"else", "end", "except", "exists", "false", "fetch", "for", "foreign", "from", "full",
	"grant", "group", "having", "in", "index", "inner", "insert", "intersect", "into", "is",
	"join", "key", "lateral", "leading", "left", "like", "limit", "natural", "not", "null",
	"offset", "on", "only", "or", "order", "outer", "over", "partition", "primary", "range",
	"references", "returning", "right", "rows", "select", "session_user", "set", "some", "table",
	"then", "to", "trailing", "true", "union", "unique", "update", "user", "using", "values",
	"when", "where", "window", "with",
];

/// Whether `ident` can be written without quotes.
pub(crate) fn is_plain_identifier(ident: &str) -> bool {
	let mut chars = ident.chars();
	let starts_well = chars
		.next()
		.is_some_and(|c| c.is_ascii_lowercase() || c == '_');
	starts_well
		&& chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
		&& !RESERVED.contains(&ident)
}

/// Query builder trait for generating SQL from query statements
///
/// This trait defines the interface for database-specific query builders.
/// Implementations only describe their dialect; the provided `build_*`
/// methods walk the statement and consult the dialect at every decision.
///
/// # Implementations
///
/// - [`PostgresQueryBuilder`] - PostgreSQL backend
/// - [`MySqlQueryBuilder`] - MySQL backend
/// - [`SqliteQueryBuilder`] - SQLite backend
///
/// # Examples
///
/// ```rust,ignore
/// use tessera_query::prelude::*;
///
/// let stmt = Query::select()
///     .column("id")
///     .column("name")
///     .from("users")
///     .and_where(Expr::col("active").eq(true))
///     .to_owned();
///
/// let (sql, values) = PostgresQueryBuilder.build_select(&stmt, RenderMode::Parameterized)?;
/// // sql: SELECT id, name FROM users WHERE active = $1
/// // values: [Value::Bool(Some(true))]
/// ```
pub trait QueryBuilder: fmt::Debug + Send + Sync {
	/// Dialect name used in error messages
	fn name(&self) -> &'static str;

	/// Dialect this builder renders
	fn kind(&self) -> DialectKind;

	/// Identifier quote character
	fn quote_char(&self) -> char;

	/// Quote an identifier unconditionally, doubling embedded quotes
	fn escape_identifier(&self, ident: &str) -> String {
		let q = self.quote_char();
		let mut out = String::with_capacity(ident.len() + 2);
		out.push(q);
		for c in ident.chars() {
			if c == q {
				out.push(q);
			}
			out.push(c);
		}
		out.push(q);
		out
	}

	/// Quote an identifier only if it is reserved, mixed-case, or contains
	/// characters other than lowercase letters, digits and `_`
	fn quote_identifier(&self, ident: &str) -> String {
		if is_plain_identifier(ident) && !self.is_reserved(ident) {
			ident.to_string()
		} else {
			self.escape_identifier(ident)
		}
	}

	/// Additional words this dialect reserves
	fn is_reserved(&self, _ident: &str) -> bool {
		false
	}

	/// Placeholder for the `index`-th argument (1-based)
	fn format_placeholder(&self, index: usize) -> String;

	/// Whether the dialect accepts a clause form
	fn supports(&self, feature: Feature) -> bool;

	/// SQL type name used in casts
	fn type_name(&self, ty: ColumnType) -> &'static str;

	/// Wrap a literal or placeholder in a cast to `ty`
	fn cast_literal(&self, sql: &str, ty: ColumnType) -> String {
		format!("CAST({} AS {})", sql, self.type_name(ty))
	}

	/// Whether a value is always cast, even outside CASE and set
	/// operation branches
	fn requires_cast(&self, _value: &Value) -> bool {
		false
	}

	/// Inline text of a non-null value
	fn inline_literal(&self, value: &Value) -> String {
		value.to_sql_literal()
	}

	/// `LIMIT` argument meaning "no limit", needed before a bare OFFSET
	fn limit_all(&self) -> Option<&'static str> {
		None
	}

	/// Tail of an INSERT without columns and rows
	fn default_values(&self) -> &'static str {
		"DEFAULT VALUES"
	}

	/// Keyword prefixing each row of a VALUES table
	fn values_row_keyword(&self) -> Option<&'static str> {
		None
	}

	/// Reference to the value proposed for insertion in an upsert
	fn excluded_column(&self, quoted: &str) -> String {
		format!("EXCLUDED.{}", quoted)
	}

	/// Function building a JSON object from key/value pairs
	fn json_object_fn(&self) -> &'static str;

	/// Aggregate building a JSON array
	fn json_array_agg_fn(&self) -> &'static str;

	/// Empty JSON array literal
	fn json_empty_array(&self) -> &'static str;

	/// Function re-reading a nested JSON value that arrives as text
	fn nested_json_fn(&self) -> Option<&'static str> {
		None
	}

	/// Type the outermost JSON column is cast to so drivers read it as text
	fn json_text_type(&self) -> Option<&'static str> {
		None
	}

	/// Build SELECT statement
	fn build_select(
		&self,
		stmt: &SelectStatement,
		mode: RenderMode,
	) -> Result<(String, Values), BuildError> {
		let mut renderer = SqlRenderer::new(self, mode);
		renderer.select(stmt)?;
		Ok(renderer.finish())
	}

	/// Build INSERT statement
	fn build_insert(
		&self,
		stmt: &InsertStatement,
		mode: RenderMode,
	) -> Result<(String, Values), BuildError> {
		let mut renderer = SqlRenderer::new(self, mode);
		renderer.insert(stmt)?;
		Ok(renderer.finish())
	}

	/// Build UPDATE statement
	fn build_update(
		&self,
		stmt: &UpdateStatement,
		mode: RenderMode,
	) -> Result<(String, Values), BuildError> {
		let mut renderer = SqlRenderer::new(self, mode);
		renderer.update(stmt)?;
		Ok(renderer.finish())
	}

	/// Build DELETE statement
	fn build_delete(
		&self,
		stmt: &DeleteStatement,
		mode: RenderMode,
	) -> Result<(String, Values), BuildError> {
		let mut renderer = SqlRenderer::new(self, mode);
		renderer.delete(stmt)?;
		Ok(renderer.finish())
	}

	/// Build UNION / INTERSECT / EXCEPT
	fn build_set_operation(
		&self,
		stmt: &SetOperation,
		mode: RenderMode,
	) -> Result<(String, Values), BuildError> {
		let mut renderer = SqlRenderer::new(self, mode);
		renderer.set_operation(stmt)?;
		Ok(renderer.finish())
	}

	/// Build WITH ... statement
	fn build_with_query(
		&self,
		stmt: &WithStatement,
		mode: RenderMode,
	) -> Result<(String, Values), BuildError> {
		let mut renderer = SqlRenderer::new(self, mode);
		renderer.with(stmt)?;
		Ok(renderer.finish())
	}

	/// Build any statement
	fn build_statement(
		&self,
		stmt: &Statement,
		mode: RenderMode,
	) -> Result<(String, Values), BuildError> {
		let mut renderer = SqlRenderer::new(self, mode);
		renderer.statement(stmt)?;
		Ok(renderer.finish())
	}
}

/// The supported database engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialectKind {
	/// PostgreSQL
	Postgres,
	/// MySQL / MariaDB
	MySql,
	/// SQLite
	Sqlite,
}

impl DialectKind {
	/// Infer the dialect from a connection URL scheme.
	///
	/// ```rust
	/// use tessera_query::DialectKind;
	///
	/// assert_eq!(DialectKind::from_url("postgres://localhost/app"), Some(DialectKind::Postgres));
	/// assert_eq!(DialectKind::from_url("sqlite::memory:"), Some(DialectKind::Sqlite));
	/// assert_eq!(DialectKind::from_url("redis://localhost"), None);
	/// ```
	#[must_use]
	pub fn from_url(url: &str) -> Option<Self> {
		let scheme = url.split(':').next()?.to_ascii_lowercase();
		match scheme.as_str() {
			"postgres" | "postgresql" => Some(Self::Postgres),
			"mysql" | "mariadb" => Some(Self::MySql),
			"sqlite" => Some(Self::Sqlite),
			_ => None,
		}
	}

	/// The builder rendering this dialect.
	#[must_use]
	pub fn query_builder(&self) -> &'static dyn QueryBuilder {
		match self {
			Self::Postgres => &PostgresQueryBuilder,
			Self::MySql => &MySqlQueryBuilder,
			Self::Sqlite => &SqliteQueryBuilder,
		}
	}

	/// Lowercase dialect name.
	#[must_use]
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Postgres => "postgres",
			Self::MySql => "mysql",
			Self::Sqlite => "sqlite",
		}
	}
}

impl fmt::Display for DialectKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for DialectKind {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"postgres" | "postgresql" => Ok(Self::Postgres),
			"mysql" | "mariadb" => Ok(Self::MySql),
			"sqlite" => Ok(Self::Sqlite),
			other => Err(format!("unknown dialect \"{}\"", other)),
		}
	}
}
