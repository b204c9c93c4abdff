//! # tessera-db
//!
//! Execution layer for statements built with `tessera-query`.
//!
//! ## Architecture
//!
//! - [`driver`]: the driver boundary ([`Driver`], [`TransactionDriver`],
//!   [`PreparedStatement`]) and its sqlx implementation ([`SqlxDriver`])
//! - [`cache`]: the per-connection prepared [`StatementCache`]
//! - [`connection`]: [`Connection`], [`Transaction`] and [`Execution`]
//! - [`scan`]: folding joined rows back into nested records
//! - [`config`]: pool and logging settings ([`ConnectionConfig`])
//!
//! ## Logging
//!
//! Events are emitted with `tracing`; no subscriber is installed. With
//! [`ConnectionConfig::echo`] every statement is logged at `DEBUG` in its
//! inline form.
//!
//! ## Cancellation
//!
//! Every execution accepts a [`CancellationToken`] through
//! [`Execution::cancel_on`]. Cancellation is reported as
//! [`DatabaseError::Cancelled`] and leaves nothing in the statement cache.

pub mod cache;
pub mod config;
pub mod connection;
pub mod driver;
pub mod error;
pub mod scan;

pub use cache::{CacheStats, StatementCache};
pub use config::{ConnectionConfig, PoolOptions};
pub use connection::{Connection, Execution, Transaction};
pub use driver::{Driver, PreparedStatement, RowSet, SqlxDriver, TransactionDriver};
pub use error::{CacheError, DatabaseError, Result, ScanError};
pub use scan::{FromRecord, RecordShape, Shape};
pub use tokio_util::sync::CancellationToken;

/// Commonly used items, for glob import.
pub mod prelude {
	pub use crate::cache::{CacheStats, StatementCache};
	pub use crate::config::ConnectionConfig;
	pub use crate::connection::{Connection, Execution, Transaction};
	pub use crate::driver::{Driver, PreparedStatement, RowSet, TransactionDriver};
	pub use crate::error::{CacheError, DatabaseError, ScanError};
	pub use crate::scan::{Cardinality, FieldShape, FromRecord, RecordShape, Scanner, Shape};
	pub use tokio_util::sync::CancellationToken;
}
