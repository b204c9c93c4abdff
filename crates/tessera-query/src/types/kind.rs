//! Value kinds.
//!
//! Every expression carries a value kind. Kinds exist only to restrict which
//! expressions may be combined: comparing a text column with a boolean
//! literal is rejected at compile time for [`TypedExpr`](crate::expr::TypedExpr)
//! and at construction time for [`DynExpr`](crate::expr::DynExpr).
//!
//! The marker types in this module are used as the `K` parameter of typed
//! expressions and columns:
//!
//! ```rust
//! use tessera_query::prelude::*;
//!
//! let users = Table::new("users")
//!     .with_column(ColumnDescriptor::new("age", ColumnType::Integer));
//! let age = users.col::<kind::Integer>("age").unwrap();
//! let adult = age.gte(18);
//! ```

use std::fmt;

use crate::schema::ColumnType;

/// Runtime representation of a value kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
	/// Boolean
	Bool,
	/// Integer of any width
	Integer,
	/// Floating point
	Float,
	/// Exact numeric
	Decimal,
	/// Character data
	Text,
	/// Binary data
	Bytes,
	/// Calendar date
	Date,
	/// Time of day
	Time,
	/// Date and time, with or without zone
	Timestamp,
	/// UUID
	Uuid,
	/// JSON document
	Json,
}

impl Kind {
	/// Lowercase name of the kind.
	#[must_use]
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Bool => "bool",
			Self::Integer => "integer",
			Self::Float => "float",
			Self::Decimal => "decimal",
			Self::Text => "text",
			Self::Bytes => "bytes",
			Self::Date => "date",
			Self::Time => "time",
			Self::Timestamp => "timestamp",
			Self::Uuid => "uuid",
			Self::Json => "json",
		}
	}

	/// Returns `true` for integer, float and decimal kinds.
	#[must_use]
	pub fn is_numeric(&self) -> bool {
		matches!(self, Self::Integer | Self::Float | Self::Decimal)
	}

	/// Whether expressions of the two kinds may be compared or combined.
	///
	/// Numeric kinds combine with each other; every other kind only
	/// combines with itself.
	#[must_use]
	pub fn is_compatible(&self, other: Kind) -> bool {
		*self == other || (self.is_numeric() && other.is_numeric())
	}
}

impl fmt::Display for Kind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Compile-time value kind marker.
pub trait ValueKind: Copy + fmt::Debug + Send + Sync + 'static {
	/// The runtime kind.
	const KIND: Kind;

	/// Column type assumed when no descriptor is available.
	const DEFAULT_TYPE: ColumnType;
}

/// Marker for kinds that support arithmetic.
pub trait Numeric: ValueKind {}

macro_rules! value_kinds {
	($($(#[$doc:meta])* $name:ident => $ty:ident;)*) => {
		$(
			$(#[$doc])*
			#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
			pub struct $name;

			impl ValueKind for $name {
				const KIND: Kind = Kind::$name;
				const DEFAULT_TYPE: ColumnType = ColumnType::$ty;
			}
		)*
	};
}

value_kinds! {
	/// Boolean kind
	Bool => Boolean;
	/// Integer kind
	Integer => BigInt;
	/// Floating point kind
	Float => Double;
	/// Exact numeric kind
	Decimal => Decimal;
	/// Text kind
	Text => Text;
	/// Binary kind
	Bytes => Bytes;
	/// Date kind
	Date => Date;
	/// Time kind
	Time => Time;
	/// Timestamp kind
	Timestamp => Timestamp;
	/// UUID kind
	Uuid => Uuid;
	/// JSON kind
	Json => Json;
}

impl Numeric for Integer {}
impl Numeric for Float {}
impl Numeric for Decimal {}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(Kind::Integer, Kind::Float, true)]
	#[case(Kind::Decimal, Kind::Integer, true)]
	#[case(Kind::Text, Kind::Text, true)]
	#[case(Kind::Text, Kind::Bool, false)]
	#[case(Kind::Timestamp, Kind::Date, false)]
	#[case(Kind::Uuid, Kind::Text, false)]
	fn test_kind_compatibility(#[case] left: Kind, #[case] right: Kind, #[case] expected: bool) {
		assert_eq!(left.is_compatible(right), expected);
		assert_eq!(right.is_compatible(left), expected);
	}

	#[rstest]
	fn test_marker_constants() {
		assert_eq!(Integer::KIND, Kind::Integer);
		assert_eq!(Text::DEFAULT_TYPE, ColumnType::Text);
	}
}
