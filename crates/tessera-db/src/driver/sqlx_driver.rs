//! Driver implementation over `sqlx::AnyPool`.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use sqlx::any::{Any, AnyPoolOptions};
use sqlx::{AnyPool, Executor, Transaction};
use tessera_query::{DialectKind, Value};
use tokio::sync::Mutex;

use super::codec::{bind_all, row_set};
use super::{Driver, PreparedStatement, RowSet, TransactionDriver};
use crate::config::ConnectionConfig;
use crate::error::{DatabaseError, Result};

type SharedTransaction = Arc<Mutex<Option<Transaction<'static, Any>>>>;

/// Connection pool driver for PostgreSQL, MySQL and SQLite
#[derive(Debug, Clone)]
pub struct SqlxDriver {
	pool: AnyPool,
	dialect: DialectKind,
}

impl SqlxDriver {
	/// Connect a pool configured from `config`
	///
	/// # Errors
	///
	/// [`DatabaseError::Config`] for an unknown URL scheme, or the
	/// driver error when the pool cannot connect.
	pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
		let dialect = config.dialect()?;
		sqlx::any::install_default_drivers();

		let pool = AnyPoolOptions::new()
			.min_connections(config.pool.min_size)
			.max_connections(config.pool.max_size)
			.acquire_timeout(config.pool.acquire_timeout())
			.idle_timeout(config.pool.idle_timeout())
			.max_lifetime(config.pool.max_lifetime())
			.connect(&config.url)
			.await?;

		tracing::debug!(url = %config.url, dialect = dialect.as_str(), "connected pool");
		Ok(Self { pool, dialect })
	}

	/// Wrap an existing pool
	pub fn from_pool(pool: AnyPool, dialect: DialectKind) -> Self {
		Self { pool, dialect }
	}

	/// The underlying pool
	pub fn pool(&self) -> &AnyPool {
		&self.pool
	}
}

#[async_trait]
impl Driver for SqlxDriver {
	fn dialect(&self) -> DialectKind {
		self.dialect
	}

	async fn exec(&self, sql: &str, args: &[Value]) -> Result<u64> {
		let result = bind_all(sql, args)?.execute(&self.pool).await?;
		Ok(result.rows_affected())
	}

	async fn query(&self, sql: &str, args: &[Value]) -> Result<RowSet> {
		let rows = bind_all(sql, args)?.fetch_all(&self.pool).await?;
		row_set(rows)
	}

	async fn prepare(&self, sql: &str) -> Result<Arc<dyn PreparedStatement>> {
		(&self.pool).prepare(sql).await?;
		Ok(Arc::new(SqlxStatement {
			sql: sql.to_string(),
			pool: self.pool.clone(),
			closed: AtomicBool::new(false),
		}))
	}

	async fn begin(&self) -> Result<Box<dyn TransactionDriver>> {
		let tx = self.pool.begin().await?;
		Ok(Box::new(SqlxTransaction {
			tx: Arc::new(Mutex::new(Some(tx))),
		}))
	}

	async fn close(&self) {
		self.pool.close().await;
	}
}

/// A statement prepared on the pool.
///
/// sqlx keeps the server-side statement in each pooled connection's own
/// cache; the handle re-binds the same text with `persistent(true)`.
#[derive(Debug)]
pub struct SqlxStatement {
	sql: String,
	pool: AnyPool,
	closed: AtomicBool,
}

impl SqlxStatement {
	fn ensure_open(&self) -> Result<()> {
		if self.closed.load(Ordering::Acquire) {
			return Err(DatabaseError::StatementClosed(self.sql.clone()));
		}
		Ok(())
	}
}

#[async_trait]
impl PreparedStatement for SqlxStatement {
	fn sql(&self) -> &str {
		&self.sql
	}

	async fn exec(&self, args: &[Value]) -> Result<u64> {
		self.ensure_open()?;
		let result = bind_all(&self.sql, args)?.execute(&self.pool).await?;
		Ok(result.rows_affected())
	}

	async fn query(&self, args: &[Value]) -> Result<RowSet> {
		self.ensure_open()?;
		let rows = bind_all(&self.sql, args)?.fetch_all(&self.pool).await?;
		row_set(rows)
	}

	async fn close(&self) -> Result<()> {
		self.closed.store(true, Ordering::Release);
		Ok(())
	}
}

/// An open sqlx transaction.
///
/// Statements prepared inside the transaction share its connection. Once
/// committed or rolled back, every statement bound to it fails with
/// [`DatabaseError::Transaction`].
pub struct SqlxTransaction {
	tx: SharedTransaction,
}

impl SqlxTransaction {
	fn statement(&self, sql: &str) -> Arc<dyn PreparedStatement> {
		Arc::new(SqlxTxStatement {
			sql: sql.to_string(),
			tx: Arc::clone(&self.tx),
			closed: AtomicBool::new(false),
		})
	}

	async fn finish(&self, commit: bool) -> Result<()> {
		let tx = self
			.tx
			.lock()
			.await
			.take()
			.ok_or_else(finished)?;
		if commit {
			tx.commit().await?;
		} else {
			tx.rollback().await?;
		}
		Ok(())
	}
}

async fn tx_exec(tx: &SharedTransaction, sql: &str, args: &[Value]) -> Result<u64> {
	let mut guard = tx.lock().await;
	let tx = guard.as_mut().ok_or_else(finished)?;
	let result = bind_all(sql, args)?.execute(&mut **tx).await?;
	Ok(result.rows_affected())
}

async fn tx_query(tx: &SharedTransaction, sql: &str, args: &[Value]) -> Result<RowSet> {
	let mut guard = tx.lock().await;
	let tx = guard.as_mut().ok_or_else(finished)?;
	let rows = bind_all(sql, args)?.fetch_all(&mut **tx).await?;
	row_set(rows)
}

fn finished() -> DatabaseError {
	DatabaseError::Transaction("transaction already finished".to_string())
}

#[async_trait]
impl TransactionDriver for SqlxTransaction {
	async fn exec(&self, sql: &str, args: &[Value]) -> Result<u64> {
		tx_exec(&self.tx, sql, args).await
	}

	async fn query(&self, sql: &str, args: &[Value]) -> Result<RowSet> {
		tx_query(&self.tx, sql, args).await
	}

	async fn prepare(&self, sql: &str) -> Result<Arc<dyn PreparedStatement>> {
		{
			let mut guard = self.tx.lock().await;
			let tx = guard.as_mut().ok_or_else(finished)?;
			(&mut **tx).prepare(sql).await?;
		}
		Ok(self.statement(sql))
	}

	fn adopt(&self, handle: Arc<dyn PreparedStatement>) -> Arc<dyn PreparedStatement> {
		self.statement(handle.sql())
	}

	async fn commit(self: Box<Self>) -> Result<()> {
		self.finish(true).await
	}

	async fn rollback(self: Box<Self>) -> Result<()> {
		self.finish(false).await
	}
}

/// A statement bound to one transaction
struct SqlxTxStatement {
	sql: String,
	tx: SharedTransaction,
	closed: AtomicBool,
}

impl fmt::Debug for SqlxTxStatement {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SqlxTxStatement")
			.field("sql", &self.sql)
			.field("closed", &self.closed)
			.finish_non_exhaustive()
	}
}

impl SqlxTxStatement {
	fn ensure_open(&self) -> Result<()> {
		if self.closed.load(Ordering::Acquire) {
			return Err(DatabaseError::StatementClosed(self.sql.clone()));
		}
		Ok(())
	}
}

#[async_trait]
impl PreparedStatement for SqlxTxStatement {
	fn sql(&self) -> &str {
		&self.sql
	}

	async fn exec(&self, args: &[Value]) -> Result<u64> {
		self.ensure_open()?;
		tx_exec(&self.tx, &self.sql, args).await
	}

	async fn query(&self, args: &[Value]) -> Result<RowSet> {
		self.ensure_open()?;
		tx_query(&self.tx, &self.sql, args).await
	}

	async fn close(&self) -> Result<()> {
		self.closed.store(true, Ordering::Release);
		Ok(())
	}
}
