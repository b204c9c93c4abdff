//! Identifier types.

use std::fmt;
use std::sync::Arc;

/// A cheaply cloneable SQL identifier.
///
/// Identifiers are stored unquoted; each dialect decides at render time
/// whether the name needs quoting.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DynIden(Arc<str>);

impl DynIden {
	/// Create a new identifier.
	pub fn new(name: impl AsRef<str>) -> Self {
		Self(Arc::from(name.as_ref()))
	}

	/// The unquoted identifier text.
	#[must_use]
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Debug for DynIden {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:?}", &*self.0)
	}
}

impl fmt::Display for DynIden {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl AsRef<str> for DynIden {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

/// Conversion into [`DynIden`].
pub trait IntoIden {
	/// Convert into an identifier.
	fn into_iden(self) -> DynIden;
}

impl IntoIden for DynIden {
	fn into_iden(self) -> DynIden {
		self
	}
}

impl IntoIden for &DynIden {
	fn into_iden(self) -> DynIden {
		self.clone()
	}
}

impl IntoIden for &str {
	fn into_iden(self) -> DynIden {
		DynIden::new(self)
	}
}

impl IntoIden for String {
	fn into_iden(self) -> DynIden {
		DynIden(Arc::from(self))
	}
}

impl IntoIden for &String {
	fn into_iden(self) -> DynIden {
		DynIden::new(self)
	}
}
