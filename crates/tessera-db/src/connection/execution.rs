//! One statement bound to a connection or transaction, ready to run.

use std::future::Future;

use serde::de::DeserializeOwned;
use serde_json::Value as Json;
use tessera_query::{QueryStatementBuilder, Statement, Values};
use tokio_util::sync::CancellationToken;

use super::{Connection, Transaction};
use crate::driver::RowSet;
use crate::error::{DatabaseError, Result, ScanError};
use crate::scan::{FromRecord, Scanner, Shape, scan_json};

#[derive(Debug, Clone, Copy)]
enum Target<'a> {
	Connection(&'a Connection),
	Transaction(&'a Transaction),
}

impl Target<'_> {
	fn connection(&self) -> &Connection {
		match self {
			Self::Connection(conn) => conn,
			Self::Transaction(tx) => tx.connection(),
		}
	}
}

/// A statement waiting to be executed.
///
/// Created by [`Connection::query`] and [`Transaction::query`]. The
/// statement is rendered for the connection's dialect when one of the
/// `exec`/`fetch_*` methods runs it.
#[derive(Debug)]
#[must_use = "an execution does nothing until one of its methods is awaited"]
pub struct Execution<'a> {
	target: Target<'a>,
	statement: Statement,
	cancel: Option<CancellationToken>,
}

impl<'a> Execution<'a> {
	pub(crate) fn on_connection(conn: &'a Connection, statement: Statement) -> Self {
		Self {
			target: Target::Connection(conn),
			statement,
			cancel: None,
		}
	}

	pub(crate) fn on_transaction(tx: &'a Transaction, statement: Statement) -> Self {
		Self {
			target: Target::Transaction(tx),
			statement,
			cancel: None,
		}
	}

	/// Abort the execution when `token` is cancelled.
	///
	/// A cancelled execution returns [`DatabaseError::Cancelled`]. A token
	/// that is already cancelled stops the execution before anything is
	/// prepared.
	pub fn cancel_on(mut self, token: CancellationToken) -> Self {
		self.cancel = Some(token);
		self
	}

	/// The statement being executed
	pub fn statement(&self) -> &Statement {
		&self.statement
	}

	/// Execute and return the number of affected rows
	pub async fn exec(self) -> Result<u64> {
		let (sql, values) = self.render()?;
		let target = self.target;
		self.cancellable(async move {
			match target {
				Target::Connection(conn) => conn.run_exec(&sql, &values.0).await,
				Target::Transaction(tx) => tx.run_exec(&sql, &values.0).await,
			}
		})
		.await
	}

	/// Execute and return the raw rows
	pub async fn rows(self) -> Result<RowSet> {
		self.fetch().await.map(|(_, rows)| rows)
	}

	/// Every row group as a `T`
	pub async fn fetch_all<T: FromRecord>(self) -> Result<Vec<T>> {
		let (sql, rows) = self.fetch().await?;
		let shape = Shape::List(T::shape());
		Ok(Scanner::new(&shape).with_statement(&sql).scan_as(&rows)?)
	}

	/// The first row group as a `T`.
	///
	/// # Errors
	///
	/// [`DatabaseError::NoRows`] when the statement returns no rows.
	pub async fn fetch_one<T: FromRecord>(self) -> Result<T> {
		self.fetch_optional().await?.ok_or(DatabaseError::NoRows)
	}

	/// The first row group as a `T`, or `None` without rows
	pub async fn fetch_optional<T: FromRecord>(self) -> Result<Option<T>> {
		let (sql, rows) = self.fetch().await?;
		if rows.is_empty() {
			return Ok(None);
		}
		let shape = Shape::Record(T::shape());
		Ok(Some(Scanner::new(&shape).with_statement(&sql).scan_as(&rows)?))
	}

	/// The first cell of the first row.
	///
	/// # Errors
	///
	/// [`DatabaseError::NoRows`] when the statement returns no rows.
	pub async fn fetch_scalar<T: DeserializeOwned>(self) -> Result<T> {
		let (sql, rows) = self.fetch().await?;
		if rows.is_empty() {
			return Err(DatabaseError::NoRows);
		}
		Ok(Scanner::new(&Shape::Scalar)
			.with_statement(&sql)
			.scan_as(&rows)?)
	}

	/// Decode the JSON document in the first column of the first row.
	///
	/// For statements that aggregate nested records into one JSON value.
	///
	/// # Errors
	///
	/// [`DatabaseError::NoRows`] when the statement returns no rows and
	/// [`ScanError::CorruptJson`] when the
	/// document does not parse.
	pub async fn fetch_json<T: DeserializeOwned>(self) -> Result<T> {
		let (_, rows) = self.fetch().await?;
		if rows.is_empty() {
			return Err(DatabaseError::NoRows);
		}
		let document = scan_json(&rows)?;
		Ok(serde_json::from_value(document).map_err(ScanError::from)?)
	}

	/// Scan the rows into an arbitrary shape
	pub async fn fetch_shape(self, shape: &Shape) -> Result<Json> {
		let (sql, rows) = self.fetch().await?;
		Ok(Scanner::new(shape).with_statement(&sql).scan(&rows)?)
	}

	async fn fetch(self) -> Result<(String, RowSet)> {
		let (sql, values) = self.render()?;
		let target = self.target;
		let rows = self
			.cancellable(async {
				match target {
					Target::Connection(conn) => conn.run_query(&sql, &values.0).await,
					Target::Transaction(tx) => tx.run_query(&sql, &values.0).await,
				}
			})
			.await?;
		Ok((sql, rows))
	}

	fn render(&self) -> Result<(String, Values)> {
		let conn = self.target.connection();
		let builder = conn.dialect().query_builder();

		if conn.config().echo {
			match self.statement.to_string(builder) {
				Ok(inline) => {
					tracing::debug!(dialect = conn.dialect().as_str(), "{}", inline.trim_end())
				}
				Err(e) => tracing::debug!(error = %e, "statement has no inline form"),
			}
		}
		Ok(self.statement.build(builder)?)
	}

	async fn cancellable<T, F>(&self, fut: F) -> Result<T>
	where
		F: Future<Output = Result<T>>,
	{
		let Some(token) = &self.cancel else {
			return fut.await;
		};
		tokio::select! {
			biased;
			_ = token.cancelled() => Err(DatabaseError::Cancelled),
			result = fut => result,
		}
	}
}
