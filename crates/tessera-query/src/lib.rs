//! # tessera-query
//!
//! A type-safe SQL statement builder.
//!
//! Statements are composed as expression trees, never as strings, and
//! rendered to dialect-correct parameterized SQL for PostgreSQL, MySQL and
//! SQLite. Every statement can also be rendered in an inline "debug" form
//! where literal values are substituted and cast explicitly.
//!
//! ## Architecture
//!
//! - [`value`]: literal values and argument lists
//! - [`types`]: identifiers, column and table references, operators, value kinds
//! - [`schema`]: table and column descriptors (hand-written or generated)
//! - [`expr`]: the expression AST, the untyped [`Expr`] builder and the
//!   kind-checked [`TypedExpr`]
//! - [`query`]: statement builders ([`SelectStatement`], [`InsertStatement`],
//!   [`UpdateStatement`], [`DeleteStatement`], [`SetOperation`],
//!   [`WithStatement`])
//! - [`backend`]: the dialect strategies ([`PostgresQueryBuilder`],
//!   [`MySqlQueryBuilder`], [`SqliteQueryBuilder`]) and the renderer
//!
//! ## Quick Start
//!
//! ```rust
//! use tessera_query::prelude::*;
//!
//! let link = Table::new("link")
//!     .with_column(ColumnDescriptor::new("id", ColumnType::Integer).identity())
//!     .with_column(ColumnDescriptor::new("url", ColumnType::Text))
//!     .with_column(ColumnDescriptor::new("name", ColumnType::Text));
//!
//! let id = link.col::<kind::Integer>("id").unwrap();
//! let url = link.col::<kind::Text>("url").unwrap();
//! let name = link.col::<kind::Text>("name").unwrap();
//!
//! let stmt = Query::select()
//!     .column(&id)
//!     .column(&url)
//!     .from(&link)
//!     .and_where(name.is_in(["Gmail", "Outlook"]))
//!     .to_owned();
//!
//! let (sql, values) = stmt.build(&PostgresQueryBuilder).unwrap();
//! assert_eq!(
//!     sql,
//!     r#"SELECT link.id AS "link.id", link.url AS "link.url" FROM link WHERE link.name IN ($1, $2)"#
//! );
//! assert_eq!(values.len(), 2);
//! ```
//!
//! ## Backend Differences
//!
//! | Feature | PostgreSQL | MySQL | SQLite |
//! |---------|-----------|-------|--------|
//! | Identifier quoting | `"name"` | `` `name` `` | `"name"` |
//! | Placeholders | `$1, $2, ...` | `?, ?, ...` | `?, ?, ...` |
//! | RETURNING | yes | no | yes |
//! | ON CONFLICT | yes | no | yes |
//! | DISTINCT ON | yes | no | no |
//! | LATERAL | yes | yes | no |
//! | Row locking | yes | yes | no |

pub mod backend;
pub mod error;
pub mod expr;
pub mod query;
pub mod schema;
pub mod types;
pub mod value;

pub use backend::{
	DialectKind, Feature, MySqlQueryBuilder, PostgresQueryBuilder, QueryBuilder, RenderMode,
	SqlWriter, SqliteQueryBuilder,
};
pub use error::BuildError;
pub use expr::{
	Cond, Condition, DynExpr, Expr, ExprTrait, Func, IntoCondition, IntoTyped, RawFragment,
	SimpleExpr, TypedExpr,
};
pub use query::{
	CommonTableExpr, DeleteStatement, InsertStatement, LockBehavior, LockType, OnConflict,
	OnDuplicateKeyUpdate, Query, QueryStatementBuilder, ReturningClause, SelectStatement,
	SetOperation, SetOperator, Statement, SubQuery, UpdateStatement, WithStatement,
};
pub use schema::{Column, ColumnDescriptor, ColumnType, DerivedTable, Table};
pub use types::{
	Alias, ColumnRef, DynIden, IntoColumnRef, IntoIden, IntoTableRef, JoinType, Kind,
	NullOrdering, Order, TableRef, WindowStatement, kind,
};
pub use value::{IntoValue, Value, Values};

/// Commonly used items, for glob import.
pub mod prelude {
	pub use crate::backend::{
		DialectKind, MySqlQueryBuilder, PostgresQueryBuilder, QueryBuilder, RenderMode,
		SqliteQueryBuilder,
	};
	pub use crate::error::BuildError;
	pub use crate::expr::{
		Cond, Condition, DynExpr, Expr, ExprTrait, Func, IntoCondition, RawFragment, SimpleExpr,
		TypedExpr,
	};
	pub use crate::query::{
		CommonTableExpr, DeleteStatement, InsertStatement, LockBehavior, LockType, OnConflict,
		OnDuplicateKeyUpdate, Query, QueryStatementBuilder, ReturningClause, SelectStatement,
		SetOperation, SetOperator, Statement, SubQuery, UpdateStatement, WithStatement,
	};
	pub use crate::schema::{Column, ColumnDescriptor, ColumnType, DerivedTable, Table};
	pub use crate::types::{
		Alias, ColumnRef, DynIden, Frame, FrameType, IntoColumnRef, IntoIden, IntoTableRef,
		JoinType, Kind, NullOrdering, Order, TableRef, WindowStatement, kind,
	};
	pub use crate::value::{IntoValue, Value, Values};
	pub use crate::{all, any};
}
