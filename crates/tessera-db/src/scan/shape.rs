//! Destination shapes.
//!
//! A shape tells the scanner which projection aliases feed which fields
//! and where nested records begin. Columns of a nested record are found
//! under its alias prefix (`"<prefix>.<column>"`), matching the aliases
//! the renderer gives projected columns.

use serde::de::DeserializeOwned;
use tessera_query::{Kind, Table};

/// What a statement's rows are scanned into
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
	/// The first cell of the first row
	Scalar,
	/// One record built from the first row group
	Record(RecordShape),
	/// One record per row group
	List(RecordShape),
}

/// How many nested records a field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
	/// Exactly one; a missing match yields an empty record
	One,
	/// At most one; a missing match yields `null`
	Optional,
	/// Any number; a missing match yields `[]`
	Many,
}

/// One field of a record
#[derive(Debug, Clone, PartialEq)]
pub enum FieldShape {
	/// A field read from one column
	Column {
		field: String,
		alias: String,
		kind: Option<Kind>,
		identity: bool,
	},
	/// A nested record or collection of records
	Record {
		field: String,
		cardinality: Cardinality,
		shape: RecordShape,
	},
	/// Fields read from the same row level without a field of their own
	Embedded(RecordShape),
	/// A field decoded from a JSON document column
	Json { field: String, alias: String },
}

impl FieldShape {
	/// Name of the destination field; `None` for embedded records.
	pub fn field(&self) -> Option<&str> {
		match self {
			Self::Column { field, .. } | Self::Record { field, .. } | Self::Json { field, .. } => {
				Some(field)
			}
			Self::Embedded(_) => None,
		}
	}
}

/// Fields of one record and the alias prefix its columns live under.
///
/// ```rust
/// use tessera_db::scan::{Cardinality, FieldShape, RecordShape};
///
/// let customer = RecordShape::new("customer")
///     .identity("id")
///     .column("name")
///     .many("orders", RecordShape::new("order").identity("id").column("total"));
///
/// assert_eq!(customer.prefix(), "customer");
/// assert_eq!(customer.fields().len(), 3);
/// assert!(matches!(
///     &customer.fields()[2],
///     FieldShape::Record { cardinality: Cardinality::Many, .. }
/// ));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordShape {
	prefix: String,
	fields: Vec<FieldShape>,
}

impl RecordShape {
	/// An empty record whose columns live under `prefix`
	pub fn new(prefix: impl Into<String>) -> Self {
		Self {
			prefix: prefix.into(),
			fields: Vec::new(),
		}
	}

	/// Shape of a table's projected columns, identity flags included
	pub fn from_table(table: &Table) -> Self {
		let mut shape = Self::new(table.qualifier().to_string());
		for desc in table.descriptors() {
			let name = desc.name.to_string();
			let alias = shape.alias(&name);
			shape.fields.push(FieldShape::Column {
				field: name,
				alias,
				kind: Some(desc.column_type.kind()),
				identity: desc.identity,
			});
		}
		shape
	}

	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	pub fn fields(&self) -> &[FieldShape] {
		&self.fields
	}

	/// Add a field read from `"<prefix>.<name>"`
	#[must_use]
	pub fn column(self, name: &str) -> Self {
		self.push_column(name, None, false)
	}

	/// Add a field that is part of the record's identity.
	///
	/// When no identity field is present in the result, every present
	/// column under the prefix identifies the record.
	#[must_use]
	pub fn identity(self, name: &str) -> Self {
		self.push_column(name, None, true)
	}

	/// Add a field whose cells must hold `kind`
	#[must_use]
	pub fn column_of(self, name: &str, kind: Kind) -> Self {
		self.push_column(name, Some(kind), false)
	}

	/// Add a field read from an explicit alias
	#[must_use]
	pub fn column_as(mut self, field: &str, alias: &str) -> Self {
		self.fields.push(FieldShape::Column {
			field: field.to_string(),
			alias: alias.to_string(),
			kind: None,
			identity: false,
		});
		self
	}

	/// Add a field decoded from the JSON document in `alias`
	#[must_use]
	pub fn json(mut self, field: &str, alias: &str) -> Self {
		self.fields.push(FieldShape::Json {
			field: field.to_string(),
			alias: alias.to_string(),
		});
		self
	}

	/// Add a nested record that is always present
	#[must_use]
	pub fn one(self, field: &str, shape: RecordShape) -> Self {
		self.nested(field, Cardinality::One, shape)
	}

	/// Add a nested record that may be absent
	#[must_use]
	pub fn optional(self, field: &str, shape: RecordShape) -> Self {
		self.nested(field, Cardinality::Optional, shape)
	}

	/// Add a nested collection of records
	#[must_use]
	pub fn many(self, field: &str, shape: RecordShape) -> Self {
		self.nested(field, Cardinality::Many, shape)
	}

	/// Add fields of another record at this level
	#[must_use]
	pub fn embedded(mut self, shape: RecordShape) -> Self {
		self.fields.push(FieldShape::Embedded(shape));
		self
	}

	/// Add an arbitrary field
	#[must_use]
	pub fn field(mut self, field: FieldShape) -> Self {
		self.fields.push(field);
		self
	}

	fn nested(mut self, field: &str, cardinality: Cardinality, shape: RecordShape) -> Self {
		self.fields.push(FieldShape::Record {
			field: field.to_string(),
			cardinality,
			shape,
		});
		self
	}

	fn push_column(mut self, name: &str, kind: Option<Kind>, identity: bool) -> Self {
		let alias = self.alias(name);
		self.fields.push(FieldShape::Column {
			field: name.to_string(),
			alias,
			kind,
			identity,
		});
		self
	}

	fn alias(&self, name: &str) -> String {
		if self.prefix.is_empty() {
			name.to_string()
		} else {
			format!("{}.{}", self.prefix, name)
		}
	}
}

/// A type that rows can be scanned into.
///
/// The scanner builds a JSON document following [`shape`](Self::shape);
/// the type's `Deserialize` implementation reads it.
///
/// ```rust
/// use serde::Deserialize;
/// use tessera_db::scan::{FromRecord, RecordShape};
///
/// #[derive(Deserialize)]
/// struct Link {
///     id: i64,
///     url: String,
/// }
///
/// impl FromRecord for Link {
///     fn shape() -> RecordShape {
///         RecordShape::new("link").identity("id").column("url")
///     }
/// }
///
/// assert_eq!(Link::shape().prefix(), "link");
/// ```
pub trait FromRecord: DeserializeOwned {
	/// Shape of one record of this type
	fn shape() -> RecordShape;
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use tessera_query::{ColumnDescriptor, ColumnType};

	#[rstest]
	#[case::prefixed("link", "link.url")]
	#[case::bare("", "url")]
	fn test_column_alias(#[case] prefix: &str, #[case] expected: &str) {
		let shape = RecordShape::new(prefix).column("url");

		let FieldShape::Column { alias, .. } = &shape.fields()[0] else {
			panic!("expected a column field");
		};
		assert_eq!(alias, expected);
	}

	#[rstest]
	fn test_from_table_uses_alias_and_identity() {
		// Arrange
		let link = Table::new("link")
			.with_column(ColumnDescriptor::new("id", ColumnType::BigInt).identity())
			.with_column(ColumnDescriptor::new("url", ColumnType::Text));

		// Act
		let shape = RecordShape::from_table(&link.alias("l"));

		// Assert
		assert_eq!(shape.prefix(), "l");
		assert_eq!(
			shape.fields()[0],
			FieldShape::Column {
				field: "id".to_string(),
				alias: "l.id".to_string(),
				kind: Some(Kind::Integer),
				identity: true,
			}
		);
		assert_eq!(shape.fields()[1].field(), Some("url"));
	}
}
