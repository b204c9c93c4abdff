//! Statement builder module.
//!
//! Re-exports [`tessera_query`]: table descriptors, typed column
//! expressions, statement builders and the dialect renderers.
//!
//! # Examples
//!
//! ```rust
//! use tessera::query::{DialectKind, Query, QueryStatementBuilder, Table};
//!
//! let stmt = Query::delete().from_table(&Table::new("link")).to_owned();
//! let (sql, _) = stmt.build(DialectKind::Sqlite.query_builder()).unwrap();
//! assert_eq!(sql, "DELETE FROM link");
//! ```

pub use tessera_query::*;
