//! Connection settings.
//!
//! A [`ConnectionConfig`] deserializes from any serde source; absent keys
//! take their defaults, so a file only needs the URL:
//!
//! ```rust
//! use tessera_db::ConnectionConfig;
//! use tessera_query::DialectKind;
//!
//! let config: ConnectionConfig = serde_json::from_str(
//!     r#"{ "url": "postgres://localhost/app", "pool": { "max_size": 16 } }"#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.dialect().unwrap(), DialectKind::Postgres);
//! assert_eq!(config.pool.max_size, 16);
//! assert_eq!(config.pool.min_size, 1);
//! assert!(config.cache_statements);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tessera_query::DialectKind;

use crate::error::DatabaseError;

/// Everything needed to open a [`Connection`](crate::Connection)
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
	/// `sqlite::memory:`, `postgres://...`, `mysql://...`
	pub url: String,
	pub pool: PoolOptions,
	/// Log each executed statement at DEBUG with its values inlined
	pub echo: bool,
	/// Prepare each distinct statement once per connection and reuse it
	pub cache_statements: bool,
}

/// Pool sizing and connection lifetimes. Durations are whole seconds.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolOptions {
	pub min_size: u32,
	pub max_size: u32,
	/// How long an acquire waits for a free connection
	pub acquire_timeout: u64,
	/// `None` keeps idle connections open
	pub idle_timeout: Option<u64>,
	/// `None` never recycles a connection
	pub max_lifetime: Option<u64>,
}

impl Default for PoolOptions {
	fn default() -> Self {
		Self {
			min_size: 1,
			max_size: 10,
			acquire_timeout: 30,
			idle_timeout: Some(10 * 60),
			max_lifetime: Some(30 * 60),
		}
	}
}

impl PoolOptions {
	pub(crate) fn acquire_timeout(&self) -> Duration {
		Duration::from_secs(self.acquire_timeout)
	}

	pub(crate) fn idle_timeout(&self) -> Option<Duration> {
		self.idle_timeout.map(Duration::from_secs)
	}

	pub(crate) fn max_lifetime(&self) -> Option<Duration> {
		self.max_lifetime.map(Duration::from_secs)
	}
}

impl Default for ConnectionConfig {
	fn default() -> Self {
		Self::new("sqlite::memory:")
	}
}

impl ConnectionConfig {
	pub fn new(url: impl Into<String>) -> Self {
		Self {
			url: url.into(),
			pool: PoolOptions::default(),
			echo: false,
			cache_statements: true,
		}
	}

	#[must_use]
	pub fn with_pool_size(self, min_size: u32, max_size: u32) -> Self {
		self.with_pool(|p| {
			p.min_size = min_size;
			p.max_size = max_size;
		})
	}

	#[must_use]
	pub fn with_acquire_timeout(self, seconds: u64) -> Self {
		self.with_pool(|p| p.acquire_timeout = seconds)
	}

	#[must_use]
	pub fn with_idle_timeout(self, seconds: Option<u64>) -> Self {
		self.with_pool(|p| p.idle_timeout = seconds)
	}

	#[must_use]
	pub fn with_max_lifetime(self, seconds: Option<u64>) -> Self {
		self.with_pool(|p| p.max_lifetime = seconds)
	}

	#[must_use]
	pub fn with_echo(self, echo: bool) -> Self {
		Self { echo, ..self }
	}

	#[must_use]
	pub fn with_statement_cache(self, cache_statements: bool) -> Self {
		Self {
			cache_statements,
			..self
		}
	}

	fn with_pool(mut self, f: impl FnOnce(&mut PoolOptions)) -> Self {
		f(&mut self.pool);
		self
	}

	/// Dialect named by the URL scheme.
	///
	/// # Errors
	///
	/// [`DatabaseError::Config`] when no dialect handles the scheme.
	pub fn dialect(&self) -> Result<DialectKind, DatabaseError> {
		DialectKind::from_url(&self.url).ok_or_else(|| {
			DatabaseError::Config(format!("no dialect for database URL \"{}\"", self.url))
		})
	}
}
