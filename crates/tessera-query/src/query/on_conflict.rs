//! Upsert clauses: `ON CONFLICT` and `ON DUPLICATE KEY UPDATE`.

use crate::expr::{ConditionHolder, IntoCondition, SimpleExpr};
use crate::types::{DynIden, IntoIden};

/// What an `ON CONFLICT` clause matches.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum OnConflictTarget {
	/// No target; only valid with `DO NOTHING`
	#[default]
	None,
	/// `ON CONFLICT (a, b)`
	Columns(Vec<DynIden>),
	/// `ON CONFLICT ON CONSTRAINT name` (PostgreSQL)
	Constraint(DynIden),
}

/// What an `ON CONFLICT` clause does.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum OnConflictAction {
	/// `DO NOTHING`
	#[default]
	DoNothing,
	/// `DO UPDATE SET ... [WHERE ...]`
	DoUpdate {
		/// SET assignments
		assignments: Vec<(DynIden, SimpleExpr)>,
		/// Optional filter on the conflicting row
		r#where: ConditionHolder,
	},
}

/// `ON CONFLICT` clause for INSERT (PostgreSQL, SQLite)
///
/// # Examples
///
/// ```rust,ignore
/// use tessera_query::prelude::*;
///
/// let stmt = Query::insert()
///     .into_table("link")
///     .columns(["id", "name"])
///     .values([SimpleExpr::from(1), SimpleExpr::from("Gmail")])?
///     .on_conflict(OnConflict::column("id").update_columns(["name"]).to_owned())
///     .returning_all()
///     .to_owned();
/// // INSERT INTO link (id, name) VALUES ($1, $2)
/// //   ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name RETURNING *
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OnConflict {
	pub(crate) target: OnConflictTarget,
	pub(crate) action: OnConflictAction,
}

impl OnConflict {
	/// A clause without conflict target
	pub fn new() -> Self {
		Self::default()
	}

	/// Conflict on one column
	pub fn column<C: IntoIden>(column: C) -> Self {
		Self::columns([column])
	}

	/// Conflict on several columns
	pub fn columns<I, C>(columns: I) -> Self
	where
		I: IntoIterator<Item = C>,
		C: IntoIden,
	{
		Self {
			target: OnConflictTarget::Columns(columns.into_iter().map(IntoIden::into_iden).collect()),
			action: OnConflictAction::DoNothing,
		}
	}

	/// Conflict on a named constraint
	pub fn constraint<N: IntoIden>(name: N) -> Self {
		Self {
			target: OnConflictTarget::Constraint(name.into_iden()),
			action: OnConflictAction::DoNothing,
		}
	}

	/// `DO NOTHING`
	pub fn do_nothing(&mut self) -> &mut Self {
		self.action = OnConflictAction::DoNothing;
		self
	}

	/// Set each column to the value proposed for insertion
	/// (`col = EXCLUDED.col`)
	pub fn update_columns<I, C>(&mut self, columns: I) -> &mut Self
	where
		I: IntoIterator<Item = C>,
		C: IntoIden,
	{
		for column in columns {
			let column = column.into_iden();
			let value = SimpleExpr::Excluded(column.clone());
			self.push_assignment(column, value);
		}
		self
	}

	/// Set a column to an arbitrary expression
	pub fn value<C, E>(&mut self, column: C, value: E) -> &mut Self
	where
		C: IntoIden,
		E: Into<SimpleExpr>,
	{
		self.push_assignment(column.into_iden(), value.into());
		self
	}

	/// Add a filter to `DO UPDATE`
	pub fn action_and_where<C>(&mut self, condition: C) -> &mut Self
	where
		C: IntoCondition,
	{
		if let OnConflictAction::DoNothing = self.action {
			self.action = OnConflictAction::DoUpdate {
				assignments: Vec::new(),
				r#where: ConditionHolder::new(),
			};
		}
		if let OnConflictAction::DoUpdate { r#where, .. } = &mut self.action {
			r#where.add_and(condition);
		}
		self
	}

	/// Conflict target
	#[must_use]
	pub fn target(&self) -> &OnConflictTarget {
		&self.target
	}

	/// Conflict action
	#[must_use]
	pub fn action(&self) -> &OnConflictAction {
		&self.action
	}

	fn push_assignment(&mut self, column: DynIden, value: SimpleExpr) {
		match &mut self.action {
			OnConflictAction::DoUpdate { assignments, .. } => assignments.push((column, value)),
			OnConflictAction::DoNothing => {
				self.action = OnConflictAction::DoUpdate {
					assignments: vec![(column, value)],
					r#where: ConditionHolder::new(),
				};
			}
		}
	}
}

/// `ON DUPLICATE KEY UPDATE` clause for INSERT (MySQL)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OnDuplicateKeyUpdate {
	pub(crate) assignments: Vec<(DynIden, SimpleExpr)>,
}

impl OnDuplicateKeyUpdate {
	/// An empty clause
	pub fn new() -> Self {
		Self::default()
	}

	/// Set each column to the value proposed for insertion
	pub fn update_columns<I, C>(&mut self, columns: I) -> &mut Self
	where
		I: IntoIterator<Item = C>,
		C: IntoIden,
	{
		for column in columns {
			let column = column.into_iden();
			self.assignments
				.push((column.clone(), SimpleExpr::Excluded(column)));
		}
		self
	}

	/// Set a column to an arbitrary expression
	pub fn value<C, E>(&mut self, column: C, value: E) -> &mut Self
	where
		C: IntoIden,
		E: Into<SimpleExpr>,
	{
		self.assignments.push((column.into_iden(), value.into()));
		self
	}
}
