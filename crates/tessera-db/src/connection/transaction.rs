//! Transactions.

use std::fmt;
use std::sync::Arc;

use tessera_query::{Statement, Value};

use super::{Connection, Execution};
use crate::cache::StatementCache;
use crate::driver::{PreparedStatement, RowSet, TransactionDriver};
use crate::error::{DatabaseError, Result};

/// An open transaction.
///
/// Statements prepared inside the transaction are cached separately from
/// the connection and closed before it commits or rolls back. Dropping a
/// transaction without finishing it rolls it back.
pub struct Transaction {
	conn: Connection,
	cache: StatementCache,
	driver: Option<Box<dyn TransactionDriver>>,
}

impl fmt::Debug for Transaction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Transaction")
			.field("dialect", &self.conn.dialect())
			.field("cached_statements", &self.cache.len())
			.field("finished", &self.driver.is_none())
			.finish()
	}
}

impl Transaction {
	pub(crate) fn new(conn: Connection, driver: Box<dyn TransactionDriver>) -> Self {
		let cache = StatementCache::new(conn.cache().is_enabled());
		Self {
			conn,
			cache,
			driver: Some(driver),
		}
	}

	/// The connection the transaction was started on
	pub fn connection(&self) -> &Connection {
		&self.conn
	}

	/// Statements prepared inside this transaction
	pub fn cache(&self) -> &StatementCache {
		&self.cache
	}

	/// Prepare `stmt` for execution inside the transaction
	pub fn query(&self, stmt: impl Into<Statement>) -> Execution<'_> {
		Execution::on_transaction(self, stmt.into())
	}

	/// Close the transaction's statements and commit.
	///
	/// # Errors
	///
	/// The commit error, or the aggregated close failures when the commit
	/// itself succeeded.
	pub async fn commit(mut self) -> Result<()> {
		let driver = self.driver.take().ok_or_else(finished)?;
		let cleared = self.cache.clear().await;
		driver.commit().await?;
		tracing::debug!("transaction committed");
		cleared?;
		Ok(())
	}

	/// Close the transaction's statements and roll back.
	pub async fn rollback(mut self) -> Result<()> {
		let driver = self.driver.take().ok_or_else(finished)?;
		let cleared = self.cache.clear().await;
		driver.rollback().await?;
		tracing::debug!("transaction rolled back");
		cleared?;
		Ok(())
	}

	fn driver(&self) -> Result<&dyn TransactionDriver> {
		self.driver.as_deref().ok_or_else(finished)
	}

	/// Transaction-bound handle for `sql`.
	///
	/// A handle the connection already holds is adopted; otherwise the
	/// statement is prepared on the transaction's own connection.
	async fn prepare(&self, sql: &str) -> Result<Arc<dyn PreparedStatement>> {
		let driver = self.driver()?;
		self.cache
			.get_or_prepare(sql, || async {
				match self.conn.cache().get(sql) {
					Some(handle) => Ok(driver.adopt(handle)),
					None => driver.prepare(sql).await,
				}
			})
			.await
	}

	pub(crate) async fn run_query(&self, sql: &str, args: &[Value]) -> Result<RowSet> {
		if self.cache.is_enabled() {
			self.prepare(sql).await?.query(args).await
		} else {
			self.driver()?.query(sql, args).await
		}
	}

	pub(crate) async fn run_exec(&self, sql: &str, args: &[Value]) -> Result<u64> {
		if self.cache.is_enabled() {
			self.prepare(sql).await?.exec(args).await
		} else {
			self.driver()?.exec(sql, args).await
		}
	}
}

impl Drop for Transaction {
	fn drop(&mut self) {
		if self.driver.is_some() {
			tracing::warn!(
				cached_statements = self.cache.len(),
				"transaction dropped without commit or rollback; rolling back"
			);
		}
	}
}

fn finished() -> DatabaseError {
	DatabaseError::Transaction("transaction already finished".to_string())
}
