//! Driver boundary.
//!
//! The execution layer only needs parameterized SQL in and rows out. A
//! [`Driver`] provides that for a connection pool, a [`TransactionDriver`]
//! for one open transaction, and a [`PreparedStatement`] for one prepared
//! text. [`SqlxDriver`] implements all three over `sqlx::AnyPool`.

mod codec;
mod sqlx_driver;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tessera_query::{DialectKind, Value};

use crate::error::Result;

pub use sqlx_driver::{SqlxDriver, SqlxStatement, SqlxTransaction};

/// Rows returned by a query: column names and one cell per column per row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
	/// Column names in result order
	pub columns: Vec<String>,
	/// Row cells, each row as long as `columns`
	pub rows: Vec<Vec<Value>>,
}

impl RowSet {
	/// Create a row set
	pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
		Self { columns, rows }
	}

	/// Number of rows
	pub fn len(&self) -> usize {
		self.rows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	/// Position of a column by name
	pub fn column_index(&self, name: &str) -> Option<usize> {
		self.columns.iter().position(|c| c == name)
	}
}

/// A statement prepared for repeated execution.
#[async_trait]
pub trait PreparedStatement: fmt::Debug + Send + Sync {
	/// The SQL text the handle was prepared from
	fn sql(&self) -> &str;

	/// Execute and return the number of affected rows
	async fn exec(&self, args: &[Value]) -> Result<u64>;

	/// Execute and return the rows
	async fn query(&self, args: &[Value]) -> Result<RowSet>;

	/// Release the handle; later use fails
	async fn close(&self) -> Result<()>;
}

/// A connection pool able to run statements and open transactions.
#[async_trait]
pub trait Driver: Send + Sync {
	/// Dialect of the database behind the driver
	fn dialect(&self) -> DialectKind;

	/// Execute a statement and return the number of affected rows
	async fn exec(&self, sql: &str, args: &[Value]) -> Result<u64>;

	/// Execute a statement and return its rows
	async fn query(&self, sql: &str, args: &[Value]) -> Result<RowSet>;

	/// Prepare a statement for repeated execution
	async fn prepare(&self, sql: &str) -> Result<Arc<dyn PreparedStatement>>;

	/// Begin a transaction on a dedicated connection
	async fn begin(&self) -> Result<Box<dyn TransactionDriver>>;

	/// Close the pool
	async fn close(&self);
}

/// One open transaction.
///
/// Dropping a transaction driver without calling [`commit`](Self::commit)
/// or [`rollback`](Self::rollback) rolls it back.
#[async_trait]
pub trait TransactionDriver: Send + Sync {
	/// Execute a statement inside the transaction
	async fn exec(&self, sql: &str, args: &[Value]) -> Result<u64>;

	/// Execute a statement inside the transaction and return its rows
	async fn query(&self, sql: &str, args: &[Value]) -> Result<RowSet>;

	/// Prepare a statement bound to this transaction
	async fn prepare(&self, sql: &str) -> Result<Arc<dyn PreparedStatement>>;

	/// Bind a connection-level handle to this transaction.
	///
	/// Closing the returned handle leaves `handle` open.
	fn adopt(&self, handle: Arc<dyn PreparedStatement>) -> Arc<dyn PreparedStatement>;

	/// Commit the transaction
	async fn commit(self: Box<Self>) -> Result<()>;

	/// Roll back the transaction
	async fn rollback(self: Box<Self>) -> Result<()>;
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_row_set_lookup() {
		let rows = RowSet::new(
			vec!["link.id".to_string(), "link.url".to_string()],
			vec![vec![Value::BigInt(Some(1)), Value::String(None)]],
		);

		assert_eq!(rows.len(), 1);
		assert!(!rows.is_empty());
		assert_eq!(rows.column_index("link.url"), Some(1));
		assert_eq!(rows.column_index("link.name"), None);
	}
}
