//! In-memory driver that records what the execution layer asks of it.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tessera_db::{
	Connection, ConnectionConfig, DatabaseError, Driver, PreparedStatement, Result, RowSet,
	TransactionDriver,
};
use tessera_query::{DialectKind, Value};
use tokio::sync::Barrier;

/// Counters shared by the driver, its transactions and its statements
#[derive(Debug, Default)]
pub struct MockState {
	pub prepares: AtomicUsize,
	pub tx_prepares: AtomicUsize,
	pub closes: AtomicUsize,
	pub tx_closes: AtomicUsize,
	pub begins: AtomicUsize,
	pub commits: AtomicUsize,
	pub rollbacks: AtomicUsize,
	pub fail_close: AtomicBool,
	pub affected: AtomicU64,
	pub executed: Mutex<Vec<(String, Vec<Value>)>>,
	pub rows: Mutex<RowSet>,
}

impl MockState {
	pub fn count(counter: &AtomicUsize) -> usize {
		counter.load(Ordering::SeqCst)
	}

	pub fn executed_sql(&self) -> Vec<String> {
		self.executed.lock().iter().map(|(sql, _)| sql.clone()).collect()
	}

	fn record(&self, sql: &str, args: &[Value]) {
		self.executed.lock().push((sql.to_string(), args.to_vec()));
	}
}

pub struct MockDriver {
	pub state: Arc<MockState>,
	dialect: DialectKind,
	barrier: Option<Barrier>,
}

impl MockDriver {
	pub fn new(dialect: DialectKind) -> Self {
		Self {
			state: Arc::new(MockState::default()),
			dialect,
			barrier: None,
		}
	}

	/// Rows returned by every query
	pub fn with_rows(self, rows: RowSet) -> Self {
		*self.state.rows.lock() = rows;
		self
	}

	/// Hold every prepare until `parties` prepares are in flight
	pub fn with_prepare_barrier(mut self, parties: usize) -> Self {
		self.barrier = Some(Barrier::new(parties));
		self
	}

	pub fn failing_close(self) -> Self {
		self.state.fail_close.store(true, Ordering::SeqCst);
		self
	}

	pub fn with_affected(self, affected: u64) -> Self {
		self.state.affected.store(affected, Ordering::SeqCst);
		self
	}

	/// Connection over this driver; returns the shared counters too
	pub fn connect(self, config: ConnectionConfig) -> (Connection, Arc<MockState>) {
		let state = Arc::clone(&self.state);
		(Connection::with_driver(Arc::new(self), config), state)
	}
}

#[async_trait]
impl Driver for MockDriver {
	fn dialect(&self) -> DialectKind {
		self.dialect
	}

	async fn exec(&self, sql: &str, args: &[Value]) -> Result<u64> {
		self.state.record(sql, args);
		Ok(self.state.affected.load(Ordering::SeqCst))
	}

	async fn query(&self, sql: &str, args: &[Value]) -> Result<RowSet> {
		self.state.record(sql, args);
		Ok(self.state.rows.lock().clone())
	}

	async fn prepare(&self, sql: &str) -> Result<Arc<dyn PreparedStatement>> {
		self.state.prepares.fetch_add(1, Ordering::SeqCst);
		if let Some(barrier) = &self.barrier {
			barrier.wait().await;
		}
		Ok(Arc::new(MockStatement::new(sql, &self.state, false)))
	}

	async fn begin(&self) -> Result<Box<dyn TransactionDriver>> {
		self.state.begins.fetch_add(1, Ordering::SeqCst);
		Ok(Box::new(MockTransaction {
			state: Arc::clone(&self.state),
		}))
	}

	async fn close(&self) {}
}

pub struct MockTransaction {
	state: Arc<MockState>,
}

#[async_trait]
impl TransactionDriver for MockTransaction {
	async fn exec(&self, sql: &str, args: &[Value]) -> Result<u64> {
		self.state.record(sql, args);
		Ok(self.state.affected.load(Ordering::SeqCst))
	}

	async fn query(&self, sql: &str, args: &[Value]) -> Result<RowSet> {
		self.state.record(sql, args);
		Ok(self.state.rows.lock().clone())
	}

	async fn prepare(&self, sql: &str) -> Result<Arc<dyn PreparedStatement>> {
		self.state.tx_prepares.fetch_add(1, Ordering::SeqCst);
		Ok(Arc::new(MockStatement::new(sql, &self.state, true)))
	}

	fn adopt(&self, handle: Arc<dyn PreparedStatement>) -> Arc<dyn PreparedStatement> {
		Arc::new(MockStatement::new(handle.sql(), &self.state, true))
	}

	async fn commit(self: Box<Self>) -> Result<()> {
		self.state.commits.fetch_add(1, Ordering::SeqCst);
		Ok(())
	}

	async fn rollback(self: Box<Self>) -> Result<()> {
		self.state.rollbacks.fetch_add(1, Ordering::SeqCst);
		Ok(())
	}
}

#[derive(Debug)]
pub struct MockStatement {
	sql: String,
	state: Arc<MockState>,
	in_transaction: bool,
	closed: AtomicBool,
}

impl MockStatement {
	fn new(sql: &str, state: &Arc<MockState>, in_transaction: bool) -> Self {
		Self {
			sql: sql.to_string(),
			state: Arc::clone(state),
			in_transaction,
			closed: AtomicBool::new(false),
		}
	}

	fn ensure_open(&self) -> Result<()> {
		if self.closed.load(Ordering::SeqCst) {
			return Err(DatabaseError::StatementClosed(self.sql.clone()));
		}
		Ok(())
	}
}

#[async_trait]
impl PreparedStatement for MockStatement {
	fn sql(&self) -> &str {
		&self.sql
	}

	async fn exec(&self, args: &[Value]) -> Result<u64> {
		self.ensure_open()?;
		self.state.record(&self.sql, args);
		Ok(self.state.affected.load(Ordering::SeqCst))
	}

	async fn query(&self, args: &[Value]) -> Result<RowSet> {
		self.ensure_open()?;
		self.state.record(&self.sql, args);
		Ok(self.state.rows.lock().clone())
	}

	async fn close(&self) -> Result<()> {
		self.closed.store(true, Ordering::SeqCst);
		if self.in_transaction {
			self.state.tx_closes.fetch_add(1, Ordering::SeqCst);
		} else {
			self.state.closes.fetch_add(1, Ordering::SeqCst);
		}
		if self.state.fail_close.load(Ordering::SeqCst) {
			return Err(DatabaseError::Backend(format!("cannot close {}", self.sql)));
		}
		Ok(())
	}
}

pub fn text(v: &str) -> Value {
	Value::String(Some(Box::new(v.to_string())))
}

pub fn int(v: i64) -> Value {
	Value::BigInt(Some(v))
}
