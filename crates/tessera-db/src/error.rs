//! Error types for execution, caching and result materialization.

use tessera_query::{BuildError, Kind};

/// Errors that can occur while executing a statement
///
/// Transport errors reported by sqlx are passed through unchanged in
/// [`DatabaseError::Driver`]. Cancellation is reported as its own variant so
/// callers never have to inspect driver messages to recognise it.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
	/// The statement could not be rendered for the connection's dialect
	#[error("Query building error: {0}")]
	Build(#[from] BuildError),

	/// The result could not be materialized into the destination
	#[error("Scan error: {0}")]
	Scan(#[from] ScanError),

	/// A single record was expected but the query returned no rows
	#[error("No result found")]
	NoRows,

	/// Closing cached statement handles failed
	#[error("Statement cache error: {0}")]
	Cache(#[from] CacheError),

	/// The operation was cancelled through its cancellation token
	#[error("Operation cancelled")]
	Cancelled,

	/// The transaction was already finished or could not be started
	#[error("Transaction error: {0}")]
	Transaction(String),

	/// A prepared statement was used after it was closed
	#[error("Statement handle is closed: {0}")]
	StatementClosed(String),

	/// An argument has no representation the driver can carry
	#[error("Cannot bind argument {position}: {message}")]
	Bind { position: usize, message: String },

	/// The connection configuration is invalid
	#[error("Invalid configuration: {0}")]
	Config(String),

	/// Error reported by the sqlx driver
	#[error("Database error: {0}")]
	Driver(#[from] sqlx::Error),

	/// Error reported by a driver that is not backed by sqlx
	#[error("Backend error: {0}")]
	Backend(String),
}

impl DatabaseError {
	/// Whether this is the "expected one row, got none" signal.
	///
	/// ```rust
	/// use tessera_db::DatabaseError;
	///
	/// assert!(DatabaseError::NoRows.is_no_rows());
	/// assert!(!DatabaseError::Cancelled.is_no_rows());
	/// ```
	#[must_use]
	pub fn is_no_rows(&self) -> bool {
		matches!(self, Self::NoRows)
	}

	/// Whether the operation was cancelled.
	#[must_use]
	pub fn is_cancelled(&self) -> bool {
		matches!(self, Self::Cancelled)
	}
}

/// Errors raised by the statement cache
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
	/// One or more handles failed to close; every failure is kept
	#[error("failed to close {} statement(s): {}", .0.len(), .0.join("; "))]
	Close(Vec<String>),
}

/// Errors raised while folding rows into a destination shape
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScanError {
	/// The shape cannot be materialized; detected before any row is read
	#[error("unsupported destination: {0}")]
	UnsupportedDestination(String),

	/// A cell does not hold the kind the destination field expects
	#[error("field \"{field}\" expects {expected} but column \"{column}\" holds {found} (statement: {statement})")]
	TypeMismatch {
		/// Destination field
		field: String,
		/// Projection alias of the column
		column: String,
		/// Kind declared by the destination
		expected: Kind,
		/// Kind found in the row
		found: Kind,
		/// SQL of the statement that produced the row
		statement: String,
	},

	/// A JSON column could not be parsed
	#[error("column \"{column}\" holds invalid JSON: {message}")]
	CorruptJson {
		/// Projection alias of the column
		column: String,
		/// Parser message
		message: String,
	},

	/// A row carries fewer cells than the result has columns
	#[error("row {row} has {found} cell(s) but {expected} column(s) are projected")]
	ShortRow {
		/// Zero-based row number
		row: usize,
		/// Cells the projection needs
		expected: usize,
		/// Cells the row holds
		found: usize,
	},

	/// The materialized document does not fit the destination type
	#[error("failed to deserialize result: {0}")]
	Deserialize(String),
}

impl From<serde_json::Error> for ScanError {
	fn from(e: serde_json::Error) -> Self {
		Self::Deserialize(e.to_string())
	}
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, DatabaseError>;
