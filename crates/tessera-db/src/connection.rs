//! Connections, transactions and statement execution.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use serde::Deserialize;
//! use tessera_db::prelude::*;
//! use tessera_query::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! struct Link {
//!     id: i64,
//!     url: String,
//! }
//!
//! impl FromRecord for Link {
//!     fn shape() -> RecordShape {
//!         RecordShape::new("link").identity("id").column("url")
//!     }
//! }
//!
//! # async fn example() -> Result<(), DatabaseError> {
//! let link = Table::new("link")
//!     .with_column(ColumnDescriptor::new("id", ColumnType::BigInt).identity())
//!     .with_column(ColumnDescriptor::new("url", ColumnType::Text));
//! let id = link.col::<kind::Integer>("id")?;
//! let url = link.col::<kind::Text>("url")?;
//!
//! let conn = Connection::connect(ConnectionConfig::new("postgres://localhost/app")).await?;
//! let links: Vec<Link> = conn
//!     .query(Query::select().column(&id).column(&url).from(&link).order_by_expr(id.asc()))
//!     .fetch_all()
//!     .await?;
//!
//! conn.transaction(async |tx| {
//!     tx.query(Query::delete().from_table(&link).and_where(id.eq(1))).exec().await?;
//!     Ok::<_, DatabaseError>(())
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```

mod execution;
mod transaction;

use std::fmt;
use std::sync::Arc;

use tessera_query::{DialectKind, Statement, Value};

use crate::cache::StatementCache;
use crate::config::ConnectionConfig;
use crate::driver::{Driver, PreparedStatement, RowSet, SqlxDriver};
use crate::error::{DatabaseError, Result};

pub use execution::Execution;
pub use transaction::Transaction;

/// A pooled database connection with its statement cache.
///
/// Cloning is cheap; clones share the pool and the cache.
#[derive(Clone)]
pub struct Connection {
	inner: Arc<ConnectionInner>,
}

struct ConnectionInner {
	driver: Arc<dyn Driver>,
	cache: StatementCache,
	config: ConnectionConfig,
	dialect: DialectKind,
}

impl fmt::Debug for Connection {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Connection")
			.field("dialect", &self.inner.dialect)
			.field("config", &self.inner.config)
			.field("cached_statements", &self.inner.cache.len())
			.finish()
	}
}

impl Connection {
	/// Connect using the sqlx driver for the URL in `config`
	pub async fn connect(config: ConnectionConfig) -> Result<Self> {
		let driver = SqlxDriver::connect(&config).await?;
		Ok(Self::with_driver(Arc::new(driver), config))
	}

	/// Use an existing driver
	pub fn with_driver(driver: Arc<dyn Driver>, config: ConnectionConfig) -> Self {
		let dialect = driver.dialect();
		let cache = StatementCache::new(config.cache_statements);
		Self {
			inner: Arc::new(ConnectionInner {
				driver,
				cache,
				config,
				dialect,
			}),
		}
	}

	pub fn dialect(&self) -> DialectKind {
		self.inner.dialect
	}

	pub fn config(&self) -> &ConnectionConfig {
		&self.inner.config
	}

	/// The connection-level statement cache
	pub fn cache(&self) -> &StatementCache {
		&self.inner.cache
	}

	/// The driver, for statements the builder does not model (e.g. DDL)
	pub fn driver(&self) -> &Arc<dyn Driver> {
		&self.inner.driver
	}

	/// Prepare `stmt` for execution on this connection
	pub fn query(&self, stmt: impl Into<Statement>) -> Execution<'_> {
		Execution::on_connection(self, stmt.into())
	}

	/// Begin a transaction
	pub async fn begin(&self) -> Result<Transaction> {
		let driver = self.inner.driver.begin().await?;
		tracing::debug!("transaction started");
		Ok(Transaction::new(self.clone(), driver))
	}

	/// Run `f` inside a transaction.
	///
	/// Commits when `f` returns `Ok` and rolls back when it returns `Err`.
	pub async fn transaction<T, E, F>(&self, f: F) -> std::result::Result<T, E>
	where
		F: AsyncFnOnce(&Transaction) -> std::result::Result<T, E>,
		E: From<DatabaseError>,
	{
		let tx = self.begin().await?;

		match f(&tx).await {
			Ok(result) => {
				tx.commit().await?;
				Ok(result)
			}
			Err(e) => {
				tx.rollback().await?;
				Err(e)
			}
		}
	}

	/// Close and forget every cached statement
	pub async fn clear_cache(&self) -> Result<()> {
		self.inner.cache.clear().await?;
		Ok(())
	}

	/// Clear the statement cache and close the pool.
	///
	/// The pool is closed even when some cached statements fail to close.
	pub async fn close(&self) -> Result<()> {
		let cleared = self.inner.cache.clear().await;
		self.inner.driver.close().await;
		cleared?;
		Ok(())
	}

	/// Cached handle for `sql`, prepared on a miss
	pub(crate) async fn prepare(&self, sql: &str) -> Result<Arc<dyn PreparedStatement>> {
		self.inner
			.cache
			.get_or_prepare(sql, || async {
				tracing::debug!(sql, "preparing statement");
				self.inner.driver.prepare(sql).await
			})
			.await
	}

	pub(crate) async fn run_query(&self, sql: &str, args: &[Value]) -> Result<RowSet> {
		if self.inner.cache.is_enabled() {
			self.prepare(sql).await?.query(args).await
		} else {
			self.inner.driver.query(sql, args).await
		}
	}

	pub(crate) async fn run_exec(&self, sql: &str, args: &[Value]) -> Result<u64> {
		if self.inner.cache.is_enabled() {
			self.prepare(sql).await?.exec(args).await
		} else {
			self.inner.driver.exec(sql, args).await
		}
	}
}
