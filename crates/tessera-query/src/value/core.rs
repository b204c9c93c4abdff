//! The [`Value`] cell type.

use crate::schema::ColumnType;

/// A typed SQL value, used both for bound arguments and decoded cells.
///
/// Every variant carries an `Option`: `None` is a typed `NULL`, so a null
/// integer still binds and casts as an integer. Payloads wider than a
/// pointer are boxed.
///
/// ```rust
/// use tessera_query::Value;
///
/// let age = Value::Int(Some(42));
/// let missing = Value::Int(None);
/// assert!(!age.is_null());
/// assert!(missing.is_null());
/// assert_eq!(Value::from("bob"), Value::String(Some(Box::new("bob".into()))));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
	Bool(Option<bool>),
	TinyInt(Option<i8>),
	SmallInt(Option<i16>),
	Int(Option<i32>),
	BigInt(Option<i64>),
	TinyUnsigned(Option<u8>),
	SmallUnsigned(Option<u16>),
	Unsigned(Option<u32>),
	BigUnsigned(Option<u64>),
	Float(Option<f32>),
	Double(Option<f64>),
	Char(Option<char>),
	String(Option<Box<String>>),
	Bytes(Option<Box<Vec<u8>>>),
	ChronoDate(Option<Box<chrono::NaiveDate>>),
	ChronoTime(Option<Box<chrono::NaiveTime>>),
	/// Timestamp without zone
	ChronoDateTime(Option<Box<chrono::NaiveDateTime>>),
	/// Timestamp normalized to UTC
	ChronoDateTimeUtc(Option<Box<chrono::DateTime<chrono::Utc>>>),
	Uuid(Option<Box<uuid::Uuid>>),
	Json(Option<Box<serde_json::Value>>),
	Decimal(Option<Box<rust_decimal::Decimal>>),
}

/// Applies `$body` to the payload option of whichever variant `$value` is.
macro_rules! with_payload {
	($value:expr, $p:ident => $body:expr) => {
		match $value {
			Value::Bool($p) => $body,
			Value::TinyInt($p) => $body,
			Value::SmallInt($p) => $body,
			Value::Int($p) => $body,
			Value::BigInt($p) => $body,
			Value::TinyUnsigned($p) => $body,
			Value::SmallUnsigned($p) => $body,
			Value::Unsigned($p) => $body,
			Value::BigUnsigned($p) => $body,
			Value::Float($p) => $body,
			Value::Double($p) => $body,
			Value::Char($p) => $body,
			Value::String($p) => $body,
			Value::Bytes($p) => $body,
			Value::ChronoDate($p) => $body,
			Value::ChronoTime($p) => $body,
			Value::ChronoDateTime($p) => $body,
			Value::ChronoDateTimeUtc($p) => $body,
			Value::Uuid($p) => $body,
			Value::Json($p) => $body,
			Value::Decimal($p) => $body,
		}
	};
}

const DATE: &str = "%Y-%m-%d";
const TIME: &str = "%H:%M:%S%.f";
const DATETIME: &str = "%Y-%m-%d %H:%M:%S%.f";
const DATETIME_TZ: &str = "%Y-%m-%d %H:%M:%S%.f%:z";

impl Value {
	/// ```rust
	/// use tessera_query::Value;
	///
	/// assert!(Value::Bool(None).is_null());
	/// assert!(!Value::Bool(Some(false)).is_null());
	/// ```
	#[must_use]
	pub fn is_null(&self) -> bool {
		with_payload!(self, p => p.is_none())
	}

	/// SQL type the value binds and casts as.
	///
	/// Unsigned integers map to the smallest signed type wide enough for them.
	#[must_use]
	pub fn column_type(&self) -> ColumnType {
		match self {
			Self::Bool(_) => ColumnType::Boolean,
			Self::TinyInt(_) | Self::SmallInt(_) | Self::TinyUnsigned(_) => ColumnType::SmallInt,
			Self::Int(_) | Self::SmallUnsigned(_) => ColumnType::Integer,
			Self::BigInt(_) | Self::Unsigned(_) | Self::BigUnsigned(_) => ColumnType::BigInt,
			Self::Float(_) => ColumnType::Real,
			Self::Double(_) => ColumnType::Double,
			Self::Char(_) | Self::String(_) => ColumnType::Text,
			Self::Bytes(_) => ColumnType::Bytes,
			Self::ChronoDate(_) => ColumnType::Date,
			Self::ChronoTime(_) => ColumnType::Time,
			Self::ChronoDateTime(_) => ColumnType::Timestamp,
			Self::ChronoDateTimeUtc(_) => ColumnType::TimestampTz,
			Self::Uuid(_) => ColumnType::Uuid,
			Self::Json(_) => ColumnType::Json,
			Self::Decimal(_) => ColumnType::Decimal,
		}
	}

	/// Portable literal text for inline rendering.
	///
	/// Text-like values are single-quoted with embedded quotes doubled;
	/// binary data is written as `X'..'`. Dialects adjust the text where
	/// their lexers differ.
	///
	/// ```rust
	/// use tessera_query::Value;
	///
	/// assert_eq!(Value::BigInt(Some(-7)).to_sql_literal(), "-7");
	/// assert_eq!(Value::Bool(Some(true)).to_sql_literal(), "TRUE");
	/// assert_eq!(Value::from("O'Hara").to_sql_literal(), "'O''Hara'");
	/// assert_eq!(Value::Double(None).to_sql_literal(), "NULL");
	/// ```
	#[must_use]
	pub fn to_sql_literal(&self) -> String {
		match self {
			Self::Bool(Some(true)) => "TRUE".to_string(),
			Self::Bool(Some(false)) => "FALSE".to_string(),
			Self::Bytes(Some(bytes)) => {
				let mut out = String::with_capacity(bytes.len() * 2 + 3);
				out.push_str("X'");
				for b in bytes.iter() {
					out.push_str(&format!("{b:02X}"));
				}
				out.push('\'');
				out
			}
			Self::Float(Some(n)) if !n.is_finite() => non_finite_literal(f64::from(*n)),
			Self::Double(Some(n)) if !n.is_finite() => non_finite_literal(*n),
			_ if self.is_null() => "NULL".to_string(),
			_ if self.is_quoted() => match self.to_text() {
				Some(text) => format!("'{}'", text.replace('\'', "''")),
				None => "NULL".to_string(),
			},
			_ => self.numeric_text().unwrap_or_else(|| "NULL".to_string()),
		}
	}

	/// Text used when the value is bound as a string parameter.
	///
	/// Temporal, UUID, JSON and decimal values travel as text and are cast
	/// back by the SQL; this is the unquoted form of [`Value::to_sql_literal`].
	#[must_use]
	pub fn to_text(&self) -> Option<String> {
		let text = match self {
			Self::Char(Some(c)) => c.to_string(),
			Self::String(Some(s)) => s.as_str().to_owned(),
			Self::ChronoDate(Some(d)) => d.format(DATE).to_string(),
			Self::ChronoTime(Some(t)) => t.format(TIME).to_string(),
			Self::ChronoDateTime(Some(dt)) => dt.format(DATETIME).to_string(),
			Self::ChronoDateTimeUtc(Some(dt)) => dt.format(DATETIME_TZ).to_string(),
			Self::Uuid(Some(id)) => id.to_string(),
			Self::Json(Some(doc)) => doc.to_string(),
			Self::Decimal(Some(d)) => d.to_string(),
			_ => return None,
		};
		Some(text)
	}

	/// NaN or an infinity, which SQL has no numeric literal for
	#[must_use]
	pub fn is_non_finite(&self) -> bool {
		match self {
			Self::Float(Some(n)) => !n.is_finite(),
			Self::Double(Some(n)) => !n.is_finite(),
			_ => false,
		}
	}

	/// Whether the inline literal of this value is a quoted string
	fn is_quoted(&self) -> bool {
		!matches!(self, Self::Decimal(_)) && self.to_text().is_some()
	}

	fn numeric_text(&self) -> Option<String> {
		Some(match self {
			Self::TinyInt(Some(n)) => n.to_string(),
			Self::SmallInt(Some(n)) => n.to_string(),
			Self::Int(Some(n)) => n.to_string(),
			Self::BigInt(Some(n)) => n.to_string(),
			Self::TinyUnsigned(Some(n)) => n.to_string(),
			Self::SmallUnsigned(Some(n)) => n.to_string(),
			Self::Unsigned(Some(n)) => n.to_string(),
			Self::BigUnsigned(Some(n)) => n.to_string(),
			Self::Float(Some(n)) => n.to_string(),
			Self::Double(Some(n)) => n.to_string(),
			Self::Decimal(Some(d)) => d.to_string(),
			_ => return None,
		})
	}
}

/// The text form PostgreSQL parses back into a float
fn non_finite_literal(n: f64) -> String {
	let text = if n.is_nan() {
		"'NaN'"
	} else if n.is_sign_positive() {
		"'Infinity'"
	} else {
		"'-Infinity'"
	};
	text.to_string()
}

impl Default for Value {
	/// An untyped-looking `NULL`, carried as a null string
	fn default() -> Self {
		Self::String(None)
	}
}
