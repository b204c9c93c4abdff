//! Table and column descriptors.
//!
//! Descriptors describe what a table looks like: its name, its columns,
//! their SQL types and which columns identify a row. They are the boundary
//! between this crate and schema generators; a hand-written [`Table`] and a
//! generated one are the same value.
//!
//! ```rust
//! use tessera_query::prelude::*;
//!
//! let customer = Table::new("customer")
//!     .with_column(ColumnDescriptor::new("id", ColumnType::Integer).identity())
//!     .with_column(ColumnDescriptor::new("name", ColumnType::Text));
//!
//! // Self-join: aliasing returns a new descriptor.
//! let referrer = customer.alias("referrer");
//! assert_eq!(customer.qualifier().as_str(), "customer");
//! assert_eq!(referrer.qualifier().as_str(), "referrer");
//! ```

mod column;
mod table;

pub use column::Column;
pub use table::{DerivedTable, Table};

use crate::types::{DynIden, IntoIden, Kind};

/// SQL type of a column.
///
/// Dialects map each type to their own spelling when casting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
	/// BOOLEAN
	Boolean,
	/// 16-bit integer
	SmallInt,
	/// 32-bit integer
	Integer,
	/// 64-bit integer
	BigInt,
	/// 32-bit float
	Real,
	/// 64-bit float
	Double,
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
	/// Timestamp without zone
	Timestamp,
	/// Timestamp with zone
	TimestampTz,
	/// UUID
	Uuid,
	/// JSON document
	Json,
}

impl ColumnType {
	/// Value kind of the type.
	#[must_use]
	pub fn kind(&self) -> Kind {
		match self {
			Self::Boolean => Kind::Bool,
			Self::SmallInt | Self::Integer | Self::BigInt => Kind::Integer,
			Self::Real | Self::Double => Kind::Float,
			Self::Decimal => Kind::Decimal,
			Self::Text => Kind::Text,
			Self::Bytes => Kind::Bytes,
			Self::Date => Kind::Date,
			Self::Time => Kind::Time,
			Self::Timestamp | Self::TimestampTz => Kind::Timestamp,
			Self::Uuid => Kind::Uuid,
			Self::Json => Kind::Json,
		}
	}

	/// Dialect-neutral lowercase name.
	#[must_use]
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Boolean => "boolean",
			Self::SmallInt => "smallint",
			Self::Integer => "integer",
			Self::BigInt => "bigint",
			Self::Real => "real",
			Self::Double => "double",
			Self::Decimal => "decimal",
			Self::Text => "text",
			Self::Bytes => "bytes",
			Self::Date => "date",
			Self::Time => "time",
			Self::Timestamp => "timestamp",
			Self::TimestampTz => "timestamptz",
			Self::Uuid => "uuid",
			Self::Json => "json",
		}
	}
}

/// Description of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
	/// Column name
	pub name: DynIden,
	/// SQL type
	pub column_type: ColumnType,
	/// Whether the column accepts NULL
	pub nullable: bool,
	/// Whether the column is (part of) the row identity, usually the primary key
	pub identity: bool,
}

impl ColumnDescriptor {
	/// A non-null, non-identity column.
	pub fn new<N: IntoIden>(name: N, column_type: ColumnType) -> Self {
		Self {
			name: name.into_iden(),
			column_type,
			nullable: false,
			identity: false,
		}
	}

	/// Mark the column as part of the row identity.
	#[must_use]
	pub fn identity(mut self) -> Self {
		self.identity = true;
		self
	}

	/// Mark the column as nullable.
	#[must_use]
	pub fn nullable(mut self) -> Self {
		self.nullable = true;
		self
	}
}
