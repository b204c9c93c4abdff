//! Conversion between [`Value`] and JSON documents.
//!
//! Used when a model is flattened into an INSERT row and when result cells
//! are handed to serde for materialization.

use super::Value;
use crate::schema::ColumnType;
use serde_json::{Number, Value as Json};

impl Value {
	/// Convert this value into a JSON document.
	///
	/// Temporal, UUID and decimal values become strings in the same format
	/// their serde implementations read back.
	#[must_use]
	pub fn to_json(&self) -> Json {
		if self.is_null() {
			return Json::Null;
		}
		match self {
			Self::Bool(Some(v)) => Json::Bool(*v),
			Self::TinyInt(Some(v)) => Json::from(*v),
			Self::SmallInt(Some(v)) => Json::from(*v),
			Self::Int(Some(v)) => Json::from(*v),
			Self::BigInt(Some(v)) => Json::from(*v),
			Self::TinyUnsigned(Some(v)) => Json::from(*v),
			Self::SmallUnsigned(Some(v)) => Json::from(*v),
			Self::Unsigned(Some(v)) => Json::from(*v),
			Self::BigUnsigned(Some(v)) => Json::from(*v),
			Self::Float(Some(v)) => Number::from_f64(f64::from(*v)).map_or(Json::Null, Json::Number),
			Self::Double(Some(v)) => Number::from_f64(*v).map_or(Json::Null, Json::Number),
			Self::Char(Some(v)) => Json::String(v.to_string()),
			Self::String(Some(v)) => Json::String(v.as_str().to_string()),
			Self::Bytes(Some(v)) => Json::Array(v.iter().map(|b| Json::from(*b)).collect()),
			Self::ChronoDate(Some(v)) => Json::String(v.format("%Y-%m-%d").to_string()),
			Self::ChronoTime(Some(v)) => Json::String(v.format("%H:%M:%S%.f").to_string()),
			Self::ChronoDateTime(Some(v)) => {
				Json::String(v.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
			}
			Self::ChronoDateTimeUtc(Some(v)) => Json::String(v.to_rfc3339()),
			Self::Uuid(Some(v)) => Json::String(v.to_string()),
			Self::Json(Some(v)) => v.as_ref().clone(),
			Self::Decimal(Some(v)) => Json::String(v.to_string()),
			_ => Json::Null,
		}
	}

	/// Convert a JSON document into a value.
	///
	/// With a column type, the document is coerced to that type: strings
	/// are parsed into dates, UUIDs and decimals, and integers are narrowed
	/// to the column width. Without one, the natural mapping is used
	/// (integers as `BigInt`, numbers as `Double`, objects and arrays as
	/// `Json`).
	///
	/// Returns an error message when the document cannot represent the
	/// requested type.
	pub fn from_json(json: &Json, column_type: Option<ColumnType>) -> Result<Value, String> {
		let Some(ty) = column_type else {
			return Ok(natural(json));
		};
		if json.is_null() {
			return Ok(null_of(ty));
		}
		let mismatch = || format!("cannot read {} as {}", json, ty.as_str());
		let value = match ty {
			ColumnType::Boolean => Value::Bool(Some(json.as_bool().ok_or_else(mismatch)?)),
			ColumnType::SmallInt => {
				let v = json.as_i64().ok_or_else(mismatch)?;
				Value::SmallInt(Some(i16::try_from(v).map_err(|_| mismatch())?))
			}
			ColumnType::Integer => {
				let v = json.as_i64().ok_or_else(mismatch)?;
				Value::Int(Some(i32::try_from(v).map_err(|_| mismatch())?))
			}
			ColumnType::BigInt => Value::BigInt(Some(json.as_i64().ok_or_else(mismatch)?)),
			ColumnType::Real => Value::Float(Some(json.as_f64().ok_or_else(mismatch)? as f32)),
			ColumnType::Double => Value::Double(Some(json.as_f64().ok_or_else(mismatch)?)),
			ColumnType::Decimal => {
				let parsed = match json {
					Json::String(s) => s.parse::<rust_decimal::Decimal>().ok(),
					Json::Number(n) => n.to_string().parse::<rust_decimal::Decimal>().ok(),
					_ => None,
				};
				Value::from(parsed.ok_or_else(mismatch)?)
			}
			ColumnType::Text => match json {
				Json::String(s) => Value::from(s.clone()),
				_ => return Err(mismatch()),
			},
			ColumnType::Bytes => {
				let items = json.as_array().ok_or_else(mismatch)?;
				let bytes = items
					.iter()
					.map(|b| b.as_u64().and_then(|b| u8::try_from(b).ok()))
					.collect::<Option<Vec<u8>>>()
					.ok_or_else(mismatch)?;
				Value::from(bytes)
			}
			ColumnType::Date => Value::from(
				parse_str(json, |s| s.parse::<chrono::NaiveDate>().ok()).ok_or_else(mismatch)?,
			),
			ColumnType::Time => Value::from(
				parse_str(json, |s| s.parse::<chrono::NaiveTime>().ok()).ok_or_else(mismatch)?,
			),
			ColumnType::Timestamp => Value::from(
				parse_str(json, |s| s.parse::<chrono::NaiveDateTime>().ok())
					.ok_or_else(mismatch)?,
			),
			ColumnType::TimestampTz => Value::from(
				parse_str(json, |s| {
					chrono::DateTime::parse_from_rfc3339(s)
						.ok()
						.map(|d| d.with_timezone(&chrono::Utc))
				})
				.ok_or_else(mismatch)?,
			),
			ColumnType::Uuid => Value::from(
				parse_str(json, |s| s.parse::<uuid::Uuid>().ok()).ok_or_else(mismatch)?,
			),
			ColumnType::Json => Value::from(json.clone()),
		};
		Ok(value)
	}
}

fn parse_str<T>(json: &Json, parse: impl FnOnce(&str) -> Option<T>) -> Option<T> {
	json.as_str().and_then(parse)
}

fn natural(json: &Json) -> Value {
	match json {
		Json::Null => Value::String(None),
		Json::Bool(b) => Value::Bool(Some(*b)),
		Json::Number(n) => match n.as_i64() {
			Some(i) => Value::BigInt(Some(i)),
			None => Value::Double(n.as_f64()),
		},
		Json::String(s) => Value::from(s.clone()),
		Json::Array(_) | Json::Object(_) => Value::from(json.clone()),
	}
}

/// Typed NULL for a column type.
pub(crate) fn null_of(ty: ColumnType) -> Value {
	match ty {
		ColumnType::Boolean => Value::Bool(None),
		ColumnType::SmallInt => Value::SmallInt(None),
		ColumnType::Integer => Value::Int(None),
		ColumnType::BigInt => Value::BigInt(None),
		ColumnType::Real => Value::Float(None),
		ColumnType::Double => Value::Double(None),
		ColumnType::Decimal => Value::Decimal(None),
		ColumnType::Text => Value::String(None),
		ColumnType::Bytes => Value::Bytes(None),
		ColumnType::Date => Value::ChronoDate(None),
		ColumnType::Time => Value::ChronoTime(None),
		ColumnType::Timestamp => Value::ChronoDateTime(None),
		ColumnType::TimestampTz => Value::ChronoDateTimeUtc(None),
		ColumnType::Uuid => Value::Uuid(None),
		ColumnType::Json => Value::Json(None),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_from_json_coerces_uuid_string() {
		// Arrange
		let id = uuid::Uuid::new_v4();
		let doc = json!(id.to_string());

		// Act
		let value = Value::from_json(&doc, Some(ColumnType::Uuid)).unwrap();

		// Assert
		assert_eq!(value, Value::from(id));
	}

	#[rstest]
	fn test_from_json_narrows_integer_to_column_width() {
		let value = Value::from_json(&json!(7), Some(ColumnType::Integer)).unwrap();
		assert_eq!(value, Value::Int(Some(7)));

		let err = Value::from_json(&json!(70000), Some(ColumnType::SmallInt)).unwrap_err();
		assert_eq!(err, "cannot read 70000 as smallint");
	}

	#[rstest]
	fn test_from_json_null_keeps_column_type() {
		let value = Value::from_json(&Json::Null, Some(ColumnType::Date)).unwrap();
		assert_eq!(value, Value::ChronoDate(None));
	}

	#[rstest]
	fn test_to_json_decimal_is_string() {
		let value = Value::from("12.50".parse::<rust_decimal::Decimal>().unwrap());
		assert_eq!(value.to_json(), json!("12.50"));
	}
}
