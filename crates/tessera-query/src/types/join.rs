//! JOIN types.

use crate::expr::Condition;

use super::iden::DynIden;
use super::table_ref::TableRef;

/// Join operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinType {
	/// INNER JOIN
	InnerJoin,
	/// LEFT JOIN
	LeftJoin,
	/// RIGHT JOIN
	RightJoin,
	/// FULL OUTER JOIN
	FullOuterJoin,
	/// CROSS JOIN
	CrossJoin,
}

impl JoinType {
	/// SQL keywords.
	#[must_use]
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::InnerJoin => "INNER JOIN",
			Self::LeftJoin => "LEFT JOIN",
			Self::RightJoin => "RIGHT JOIN",
			Self::FullOuterJoin => "FULL OUTER JOIN",
			Self::CrossJoin => "CROSS JOIN",
		}
	}
}

/// Join constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinOn {
	/// `ON <condition>`
	Condition(Box<Condition>),
	/// `USING (<columns>)`
	Using(Vec<DynIden>),
}

/// One join step: operator, right-hand source and constraint.
///
/// A join without a constraint (other than CROSS JOIN) renders `ON TRUE`,
/// which is what a LATERAL join usually wants.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinExpr {
	/// Join operator
	pub join: JoinType,
	/// Right-hand source
	pub table: TableRef,
	/// Constraint
	pub on: Option<JoinOn>,
}

impl JoinExpr {
	/// Create a join step.
	pub fn new(join: JoinType, table: TableRef, on: Option<JoinOn>) -> Self {
		Self { join, table, on }
	}
}
