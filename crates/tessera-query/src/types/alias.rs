//! Identifiers named at runtime.

use super::iden::{DynIden, IntoIden};

/// A name built at runtime, for CTEs, derived tables and computed columns.
///
/// ```rust
/// use tessera_query::types::{Alias, IntoIden};
///
/// let name = Alias::new(format!("page_{}", 2));
/// assert_eq!(name.into_iden().as_str(), "page_2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Alias(String);

impl Alias {
	pub fn new(name: impl Into<String>) -> Self {
		Self(name.into())
	}

	#[must_use]
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl IntoIden for Alias {
	fn into_iden(self) -> DynIden {
		self.0.into_iden()
	}
}
