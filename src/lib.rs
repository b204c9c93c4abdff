//! # Tessera
//!
//! Type-safe SQL statements for PostgreSQL, MySQL and SQLite, executed
//! through a per-connection prepared-statement cache and folded back into
//! nested records.
//!
//! Tessera is split into two crates, re-exported here:
//!
//! - [`query`] (`tessera-query`): table descriptors, kind-checked column
//!   expressions, statement builders and dialect renderers
//! - [`db`] (`tessera-db`): the driver boundary, connections, transactions,
//!   the statement cache and the result scanner
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use serde::Deserialize;
//! use tessera::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! struct Order {
//!     id: i64,
//!     total: i64,
//! }
//!
//! impl FromRecord for Order {
//!     fn shape() -> RecordShape {
//!         RecordShape::new("order").identity("id").column("total")
//!     }
//! }
//!
//! #[derive(Debug, Deserialize)]
//! struct Customer {
//!     id: i64,
//!     orders: Vec<Order>,
//! }
//!
//! impl FromRecord for Customer {
//!     fn shape() -> RecordShape {
//!         RecordShape::new("customer")
//!             .identity("id")
//!             .many("orders", Order::shape())
//!     }
//! }
//!
//! # async fn run() -> tessera::db::Result<()> {
//! let customer = Table::new("customer")
//!     .with_column(ColumnDescriptor::new("id", ColumnType::BigInt).identity());
//! let order = Table::new("order")
//!     .with_column(ColumnDescriptor::new("id", ColumnType::BigInt).identity())
//!     .with_column(ColumnDescriptor::new("customer_id", ColumnType::BigInt))
//!     .with_column(ColumnDescriptor::new("total", ColumnType::BigInt));
//!
//! let c_id = customer.col::<kind::Integer>("id").unwrap();
//! let o_id = order.col::<kind::Integer>("id").unwrap();
//! let o_customer = order.col::<kind::Integer>("customer_id").unwrap();
//! let o_total = order.col::<kind::Integer>("total").unwrap();
//!
//! let stmt = Query::select()
//!     .column(&c_id)
//!     .column(&o_id)
//!     .column(&o_total)
//!     .from(&customer)
//!     .left_join(&order, o_customer.eq(&c_id))
//!     .order_by_expr(c_id.asc())
//!     .to_owned();
//!
//! let conn = Connection::connect(ConnectionConfig::new("sqlite::memory:")).await?;
//! let customers: Vec<Customer> = conn.query(stmt).fetch_all().await?;
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod query;

pub use tessera_db::{
	CacheStats, Connection, ConnectionConfig, DatabaseError, Execution, FromRecord, RecordShape,
	Shape, Transaction,
};
pub use tessera_query::{DialectKind, Query, QueryStatementBuilder, Statement, Table, Value};

/// Everything needed to build and run statements, for glob import.
pub mod prelude {
	pub use tessera_db::prelude::*;
	pub use tessera_query::prelude::*;
}
