//! Row-locking clause (`FOR UPDATE`, `FOR SHARE`, ...).

use crate::types::{DynIden, IntoIden};

/// Lock strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockType {
	/// `FOR UPDATE`
	Update,
	/// `FOR NO KEY UPDATE` (PostgreSQL)
	NoKeyUpdate,
	/// `FOR SHARE`
	Share,
	/// `FOR KEY SHARE` (PostgreSQL)
	KeyShare,
}

impl LockType {
	/// SQL text of the lock strength.
	#[must_use]
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Update => "FOR UPDATE",
			Self::NoKeyUpdate => "FOR NO KEY UPDATE",
			Self::Share => "FOR SHARE",
			Self::KeyShare => "FOR KEY SHARE",
		}
	}
}

/// What to do when a row is already locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockBehavior {
	/// Block until the lock is released
	#[default]
	Wait,
	/// `NOWAIT`
	NoWait,
	/// `SKIP LOCKED`
	SkipLocked,
}

impl LockBehavior {
	/// SQL suffix, empty for the default behavior.
	#[must_use]
	pub fn as_str(&self) -> Option<&'static str> {
		match self {
			Self::Wait => None,
			Self::NoWait => Some("NOWAIT"),
			Self::SkipLocked => Some("SKIP LOCKED"),
		}
	}
}

/// `FOR <type> [OF tables] [NOWAIT | SKIP LOCKED]`
#[derive(Debug, Clone, PartialEq)]
pub struct LockClause {
	pub(crate) r#type: LockType,
	pub(crate) of: Vec<DynIden>,
	pub(crate) behavior: LockBehavior,
}

impl LockClause {
	/// Lock with the default waiting behavior.
	pub fn new(r#type: LockType) -> Self {
		Self {
			r#type,
			of: Vec::new(),
			behavior: LockBehavior::Wait,
		}
	}

	/// Restrict the lock to some tables.
	#[must_use]
	pub fn of<I, T>(mut self, tables: I) -> Self
	where
		I: IntoIterator<Item = T>,
		T: IntoIden,
	{
		self.of = tables.into_iter().map(IntoIden::into_iden).collect();
		self
	}

	/// Set `NOWAIT` or `SKIP LOCKED`.
	#[must_use]
	pub fn behavior(mut self, behavior: LockBehavior) -> Self {
		self.behavior = behavior;
		self
	}

	/// Lock strength.
	#[must_use]
	pub fn lock_type(&self) -> LockType {
		self.r#type
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(LockType::Update, "FOR UPDATE")]
	#[case(LockType::NoKeyUpdate, "FOR NO KEY UPDATE")]
	#[case(LockType::Share, "FOR SHARE")]
	#[case(LockType::KeyShare, "FOR KEY SHARE")]
	fn test_lock_type_sql(#[case] lock: LockType, #[case] expected: &str) {
		assert_eq!(lock.as_str(), expected);
	}

	#[rstest]
	fn test_lock_clause_builder() {
		let clause = LockClause::new(LockType::Update)
			.of(["orders"])
			.behavior(LockBehavior::SkipLocked);

		assert_eq!(clause.of.len(), 1);
		assert_eq!(clause.behavior.as_str(), Some("SKIP LOCKED"));
		assert_eq!(LockBehavior::default().as_str(), None);
	}
}
