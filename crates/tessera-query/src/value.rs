//! Value types for SQL parameters.
//!
//! This module provides [`Value`], the literal carried by expression trees
//! and bound as a statement argument, and [`Values`], the ordered argument
//! list returned next to rendered SQL.

mod core;
mod json;

pub use self::core::Value;
pub(crate) use self::json::null_of;

/// Ordered list of statement arguments.
///
/// Position `i` in the list corresponds to placeholder `i + 1` in the
/// rendered SQL.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Values(pub Vec<Value>);

impl Values {
	/// Create an empty argument list.
	#[must_use]
	pub fn new() -> Self {
		Self(Vec::new())
	}

	/// Number of arguments.
	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether there are no arguments.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Append an argument and return its 1-based placeholder index.
	pub fn push(&mut self, value: Value) -> usize {
		self.0.push(value);
		self.0.len()
	}

	/// Iterate over the arguments in placeholder order.
	pub fn iter(&self) -> std::slice::Iter<'_, Value> {
		self.0.iter()
	}

	/// Consume the list and return the underlying vector.
	#[must_use]
	pub fn into_inner(self) -> Vec<Value> {
		self.0
	}
}

impl IntoIterator for Values {
	type Item = Value;
	type IntoIter = std::vec::IntoIter<Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

impl<'a> IntoIterator for &'a Values {
	type Item = &'a Value;
	type IntoIter = std::slice::Iter<'a, Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

impl std::ops::Index<usize> for Values {
	type Output = Value;

	fn index(&self, index: usize) -> &Self::Output {
		&self.0[index]
	}
}

/// Conversion of a Rust value into a [`Value`].
///
/// # Example
///
/// ```rust
/// use tessera_query::{IntoValue, Value};
///
/// assert_eq!(42i32.into_value(), Value::Int(Some(42)));
/// assert_eq!(Option::<i32>::None.into_value(), Value::Int(None));
/// ```
pub trait IntoValue {
	/// Convert into a [`Value`].
	fn into_value(self) -> Value;
}

/// Types with a typed SQL NULL, used to convert `None`.
pub trait NullValue {
	/// The NULL of this type.
	fn null() -> Value;
}

impl IntoValue for Value {
	fn into_value(self) -> Value {
		self
	}
}

impl<T> IntoValue for Option<T>
where
	T: IntoValue + NullValue,
{
	fn into_value(self) -> Value {
		match self {
			Some(v) => v.into_value(),
			None => T::null(),
		}
	}
}

macro_rules! impl_into_value {
	($ty:ty, $variant:ident) => {
		impl IntoValue for $ty {
			fn into_value(self) -> Value {
				Value::$variant(Some(self))
			}
		}

		impl NullValue for $ty {
			fn null() -> Value {
				Value::$variant(None)
			}
		}

		impl From<$ty> for Value {
			fn from(v: $ty) -> Self {
				v.into_value()
			}
		}
	};
	($ty:ty, $variant:ident, boxed) => {
		impl IntoValue for $ty {
			fn into_value(self) -> Value {
				Value::$variant(Some(Box::new(self)))
			}
		}

		impl NullValue for $ty {
			fn null() -> Value {
				Value::$variant(None)
			}
		}

		impl From<$ty> for Value {
			fn from(v: $ty) -> Self {
				v.into_value()
			}
		}
	};
}

impl_into_value!(bool, Bool);
impl_into_value!(i8, TinyInt);
impl_into_value!(i16, SmallInt);
impl_into_value!(i32, Int);
impl_into_value!(i64, BigInt);
impl_into_value!(u8, TinyUnsigned);
impl_into_value!(u16, SmallUnsigned);
impl_into_value!(u32, Unsigned);
impl_into_value!(u64, BigUnsigned);
impl_into_value!(f32, Float);
impl_into_value!(f64, Double);
impl_into_value!(char, Char);
impl_into_value!(String, String, boxed);
impl_into_value!(Vec<u8>, Bytes, boxed);
impl_into_value!(chrono::NaiveDate, ChronoDate, boxed);
impl_into_value!(chrono::NaiveTime, ChronoTime, boxed);
impl_into_value!(chrono::NaiveDateTime, ChronoDateTime, boxed);
impl_into_value!(chrono::DateTime<chrono::Utc>, ChronoDateTimeUtc, boxed);
impl_into_value!(uuid::Uuid, Uuid, boxed);
impl_into_value!(serde_json::Value, Json, boxed);
impl_into_value!(rust_decimal::Decimal, Decimal, boxed);

impl IntoValue for &str {
	fn into_value(self) -> Value {
		Value::String(Some(Box::new(self.to_string())))
	}
}

impl NullValue for &str {
	fn null() -> Value {
		Value::String(None)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		v.into_value()
	}
}

impl IntoValue for &String {
	fn into_value(self) -> Value {
		Value::String(Some(Box::new(self.clone())))
	}
}

impl IntoValue for &[u8] {
	fn into_value(self) -> Value {
		Value::Bytes(Some(Box::new(self.to_vec())))
	}
}
