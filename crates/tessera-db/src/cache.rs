//! Prepared statement cache.
//!
//! At most one handle is kept per SQL text. Concurrent callers missing on
//! the same text each prepare a handle; the first one installed wins and
//! the others are closed and replaced by the winner.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::driver::PreparedStatement;
use crate::error::{CacheError, Result};

/// Counters describing cache activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
	/// Lookups answered from the cache
	pub hits: u64,
	/// Lookups that had to prepare
	pub misses: u64,
	/// Prepared handles closed because another caller installed first
	pub discarded: u64,
}

/// Cache of prepared statements keyed by SQL text
#[derive(Debug)]
pub struct StatementCache {
	statements: RwLock<HashMap<String, Arc<dyn PreparedStatement>>>,
	enabled: AtomicBool,
	hits: AtomicU64,
	misses: AtomicU64,
	discarded: AtomicU64,
}

impl Default for StatementCache {
	fn default() -> Self {
		Self::new(true)
	}
}

impl StatementCache {
	/// Create an empty cache
	pub fn new(enabled: bool) -> Self {
		Self {
			statements: RwLock::new(HashMap::new()),
			enabled: AtomicBool::new(enabled),
			hits: AtomicU64::new(0),
			misses: AtomicU64::new(0),
			discarded: AtomicU64::new(0),
		}
	}

	/// Whether lookups are served from the cache
	pub fn is_enabled(&self) -> bool {
		self.enabled.load(Ordering::Acquire)
	}

	/// Enable or disable caching.
	///
	/// Disabling keeps existing entries; call [`clear`](Self::clear) to
	/// release them.
	pub fn set_enabled(&self, enabled: bool) {
		self.enabled.store(enabled, Ordering::Release);
	}

	/// Number of cached handles
	pub fn len(&self) -> usize {
		self.statements.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.statements.read().is_empty()
	}

	/// Cached handle for `sql`, if any
	pub fn get(&self, sql: &str) -> Option<Arc<dyn PreparedStatement>> {
		self.statements.read().get(sql).cloned()
	}

	/// Snapshot of the activity counters
	pub fn stats(&self) -> CacheStats {
		CacheStats {
			hits: self.hits.load(Ordering::Relaxed),
			misses: self.misses.load(Ordering::Relaxed),
			discarded: self.discarded.load(Ordering::Relaxed),
		}
	}

	/// Return the cached handle for `sql`, preparing one on a miss.
	///
	/// Errors from `prepare` are returned unchanged and leave no entry.
	pub async fn get_or_prepare<F, Fut>(
		&self,
		sql: &str,
		prepare: F,
	) -> Result<Arc<dyn PreparedStatement>>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<Arc<dyn PreparedStatement>>>,
	{
		// Fast path
		if let Some(handle) = self.get(sql) {
			self.hits.fetch_add(1, Ordering::Relaxed);
			tracing::debug!(sql, "statement cache hit");
			return Ok(handle);
		}

		self.misses.fetch_add(1, Ordering::Relaxed);
		tracing::debug!(sql, "statement cache miss");
		let prepared = prepare().await?;

		let (handle, duplicate) = {
			let mut statements = self.statements.write();
			match statements.get(sql) {
				Some(existing) => (Arc::clone(existing), Some(prepared)),
				None => {
					statements.insert(sql.to_string(), Arc::clone(&prepared));
					(prepared, None)
				}
			}
		};

		if let Some(duplicate) = duplicate {
			self.discarded.fetch_add(1, Ordering::Relaxed);
			if let Err(e) = duplicate.close().await {
				tracing::warn!(sql, error = %e, "failed to close duplicate prepared statement");
			}
		}
		Ok(handle)
	}

	/// Close every cached handle and empty the cache.
	///
	/// Every handle is closed even when some fail; the failures are
	/// returned together.
	///
	/// ```
	/// # tokio_test::block_on(async {
	/// use tessera_db::StatementCache;
	///
	/// let cache = StatementCache::default();
	/// cache.clear().await.unwrap();
	/// assert!(cache.is_empty());
	/// assert_eq!(cache.stats().misses, 0);
	/// # });
	/// ```
	pub async fn clear(&self) -> std::result::Result<(), CacheError> {
		let drained: Vec<_> = self.statements.write().drain().collect();

		let mut failures = Vec::new();
		for (sql, handle) in drained {
			if let Err(e) = handle.close().await {
				failures.push(format!("{}: {}", sql, e));
			}
		}

		if failures.is_empty() {
			Ok(())
		} else {
			Err(CacheError::Close(failures))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::driver::RowSet;
	use crate::error::DatabaseError;
	use async_trait::async_trait;
	use rstest::{fixture, rstest};
	use tessera_query::Value;

	#[derive(Debug, Default)]
	struct FakeStatement {
		sql: String,
		fail_close: bool,
		closed: AtomicBool,
	}

	#[async_trait]
	impl PreparedStatement for FakeStatement {
		fn sql(&self) -> &str {
			&self.sql
		}

		async fn exec(&self, _args: &[Value]) -> Result<u64> {
			Ok(0)
		}

		async fn query(&self, _args: &[Value]) -> Result<RowSet> {
			Ok(RowSet::default())
		}

		async fn close(&self) -> Result<()> {
			self.closed.store(true, Ordering::SeqCst);
			if self.fail_close {
				return Err(DatabaseError::Backend(format!("cannot close {}", self.sql)));
			}
			Ok(())
		}
	}

	fn handle(sql: &str, fail_close: bool) -> Arc<dyn PreparedStatement> {
		Arc::new(FakeStatement {
			sql: sql.to_string(),
			fail_close,
			..Default::default()
		})
	}

	#[fixture]
	fn cache() -> StatementCache {
		StatementCache::default()
	}

	#[rstest]
	#[tokio::test]
	async fn test_second_lookup_hits(cache: StatementCache) {
		// Act
		let first = cache
			.get_or_prepare("SELECT 1", || async { Ok(handle("SELECT 1", false)) })
			.await
			.unwrap();
		let second = cache
			.get_or_prepare("SELECT 1", || async {
				Err(DatabaseError::Backend("prepared twice".to_string()))
			})
			.await
			.unwrap();

		// Assert
		assert!(Arc::ptr_eq(&first, &second));
		assert_eq!(cache.len(), 1);
		assert_eq!(
			cache.stats(),
			CacheStats {
				hits: 1,
				misses: 1,
				discarded: 0
			}
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_prepare_error_leaves_no_entry(cache: StatementCache) {
		let result = cache
			.get_or_prepare("SELEC 1", || async {
				Err(DatabaseError::Backend("syntax error".to_string()))
			})
			.await;

		assert!(matches!(result, Err(DatabaseError::Backend(_))));
		assert!(cache.is_empty());
	}

	#[rstest]
	#[tokio::test]
	async fn test_clear_closes_all_and_aggregates_failures(cache: StatementCache) {
		// Arrange
		for (sql, fail) in [("a", true), ("b", false), ("c", true)] {
			cache
				.get_or_prepare(sql, || async move { Ok(handle(sql, fail)) })
				.await
				.unwrap();
		}

		// Act
		let result = cache.clear().await;

		// Assert
		let Err(CacheError::Close(mut failures)) = result else {
			panic!("expected close failures");
		};
		failures.sort();
		assert_eq!(
			failures,
			vec![
				"a: Backend error: cannot close a".to_string(),
				"c: Backend error: cannot close c".to_string(),
			]
		);
		assert!(cache.is_empty());
	}

	#[rstest]
	fn test_toggle(cache: StatementCache) {
		assert!(cache.is_enabled());

		cache.set_enabled(false);

		assert!(!cache.is_enabled());
	}
}
