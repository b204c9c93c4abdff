//! Errors raised while building or rendering statements.

use crate::types::Kind;

/// Error returned when a statement cannot be built or rendered.
///
/// Kind mismatches and unknown columns are reported while the tree is being
/// constructed. Everything that depends on the target dialect is deferred to
/// render time, so the same statement can be rendered for several dialects.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
	/// The construct cannot be expressed in the target dialect.
	#[error("{0} is not supported by {1}")]
	Unsupported(&'static str, &'static str),

	/// Two projection items resolve to the same alias.
	#[error("projection alias \"{0}\" is used more than once; alias one of the items explicitly")]
	AmbiguousAlias(String),

	/// `ON CONFLICT ... DO UPDATE` was built without a conflict target.
	#[error("ON CONFLICT DO UPDATE requires a conflict target")]
	MissingConflictTarget,

	/// A DML statement was built without a target table.
	#[error("{0} statement has no target table")]
	MissingTable(&'static str),

	/// An UPDATE statement has no SET assignment.
	#[error("UPDATE statement has no assignments")]
	NoAssignments,

	/// A VALUES row does not match the declared column list.
	#[error("row {row} has {found} values but {expected} columns were declared")]
	ColumnCountMismatch {
		/// Zero-based row index
		row: usize,
		/// Number of declared columns
		expected: usize,
		/// Number of values in the row
		found: usize,
	},

	/// A raw fragment references a placeholder without a bound argument.
	#[error("raw fragment references unbound placeholder {0}")]
	UnboundPlaceholder(String),

	/// A common table expression references itself or a later binding.
	#[error("common table expression \"{name}\" references \"{referenced}\" before it is declared")]
	ForwardCteReference {
		/// The binding containing the reference
		name: String,
		/// The binding being referenced
		referenced: String,
	},

	/// Two expressions of incompatible value kinds were combined.
	#[error("cannot combine a {left} expression with a {right} expression")]
	KindMismatch {
		/// Kind of the left operand
		left: Kind,
		/// Kind of the right operand
		right: Kind,
	},

	/// A column was requested that the table does not declare.
	#[error("table \"{table}\" has no column \"{column}\"")]
	UnknownColumn {
		/// Table name
		table: String,
		/// Requested column
		column: String,
	},

	/// A projection item has no name usable as a JSON object key.
	#[error("projection item {0} needs an alias to be used as a JSON key")]
	UnnamedProjection(usize),

	/// A WITH clause was rendered without a final statement.
	#[error("WITH clause has no final statement")]
	MissingQuery,

	/// A set operation was rendered without operands.
	#[error("set operation has no operands")]
	EmptySetOperation,

	/// A model could not be converted into an INSERT row.
	#[error("cannot convert model into a row: {0}")]
	Model(String),
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_unsupported_message_names_feature_and_dialect() {
		// Arrange
		let err = BuildError::Unsupported("RETURNING", "mysql");

		// Act
		let message = err.to_string();

		// Assert
		assert_eq!(message, "RETURNING is not supported by mysql");
	}

	#[rstest]
	fn test_kind_mismatch_message() {
		let err = BuildError::KindMismatch {
			left: Kind::Text,
			right: Kind::Bool,
		};
		assert_eq!(
			err.to_string(),
			"cannot combine a text expression with a bool expression"
		);
	}
}
