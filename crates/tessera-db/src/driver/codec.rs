//! Conversion between [`Value`] and the sqlx `Any` driver.
//!
//! The `Any` driver only carries booleans, integers, floats, text and
//! blobs. Temporal, UUID, JSON and decimal arguments are bound as text;
//! the PostgreSQL renderer casts their placeholders back to the column type.

use sqlx::any::{Any, AnyArguments, AnyRow};
use sqlx::query::Query;
use sqlx::{Column, Row, TypeInfo, ValueRef};
use tessera_query::Value;

use super::RowSet;
use crate::error::{DatabaseError, Result};

type AnyQuery<'q> = Query<'q, Any, AnyArguments<'q>>;

/// Bind one argument.
///
/// Fails for unsigned 64-bit values above `i64::MAX`, which no backend
/// reachable through `Any` can hold.
pub(crate) fn bind_value<'q>(
	query: AnyQuery<'q>,
	value: &Value,
) -> std::result::Result<AnyQuery<'q>, String> {
	Ok(match value {
		Value::Bool(v) => query.bind(*v),
		Value::TinyInt(v) => query.bind(v.map(i16::from)),
		Value::SmallInt(v) => query.bind(*v),
		Value::Int(v) => query.bind(*v),
		Value::BigInt(v) => query.bind(*v),
		Value::TinyUnsigned(v) => query.bind(v.map(i16::from)),
		Value::SmallUnsigned(v) => query.bind(v.map(i32::from)),
		Value::Unsigned(v) => query.bind(v.map(i64::from)),
		Value::BigUnsigned(Some(v)) => query.bind(
			i64::try_from(*v).map_err(|_| format!("{v} does not fit in a signed 64-bit integer"))?,
		),
		Value::BigUnsigned(None) => query.bind(None::<i64>),
		Value::Float(v) => query.bind(*v),
		Value::Double(v) => query.bind(*v),
		Value::Bytes(v) => query.bind(v.as_deref().cloned()),
		Value::Char(_)
		| Value::String(_)
		| Value::ChronoDate(_)
		| Value::ChronoTime(_)
		| Value::ChronoDateTime(_)
		| Value::ChronoDateTimeUtc(_)
		| Value::Uuid(_)
		| Value::Json(_)
		| Value::Decimal(_) => query.bind(value.to_text()),
	})
}

/// Bind every argument in order.
///
/// # Errors
///
/// [`DatabaseError::Bind`] naming the 1-based position of the first
/// argument that cannot be carried.
pub(crate) fn bind_all<'q>(sql: &'q str, args: &[Value]) -> Result<AnyQuery<'q>> {
	args.iter()
		.enumerate()
		.try_fold(sqlx::query(sql).persistent(true), |query, (i, value)| {
			bind_value(query, value).map_err(|message| DatabaseError::Bind {
				position: i + 1,
				message,
			})
		})
}

/// Convert fetched rows into a [`RowSet`]
pub(crate) fn row_set(rows: Vec<AnyRow>) -> Result<RowSet> {
	let columns = rows
		.first()
		.map(|row| row.columns().iter().map(|c| c.name().to_string()).collect())
		.unwrap_or_default();
	let rows = rows.iter().map(decode_row).collect::<Result<Vec<_>>>()?;
	Ok(RowSet { columns, rows })
}

fn decode_row(row: &AnyRow) -> Result<Vec<Value>> {
	(0..row.columns().len()).map(|i| decode_cell(row, i)).collect()
}

fn decode_cell(row: &AnyRow, index: usize) -> Result<Value> {
	let type_name = row.columns()[index].type_info().name().to_string();
	if row.try_get_raw(index)?.is_null() {
		return Ok(null_of(&type_name));
	}

	let typed = match type_name.as_str() {
		"BOOLEAN" => row.try_get::<bool, _>(index).map(|v| Value::Bool(Some(v))),
		"SMALLINT" => row.try_get::<i16, _>(index).map(|v| Value::SmallInt(Some(v))),
		"INTEGER" => row.try_get::<i32, _>(index).map(|v| Value::Int(Some(v))),
		"BIGINT" => row.try_get::<i64, _>(index).map(|v| Value::BigInt(Some(v))),
		"REAL" => row.try_get::<f32, _>(index).map(|v| Value::Float(Some(v))),
		"DOUBLE" => row.try_get::<f64, _>(index).map(|v| Value::Double(Some(v))),
		"TEXT" => row
			.try_get::<String, _>(index)
			.map(|v| Value::String(Some(Box::new(v)))),
		"BLOB" => row
			.try_get::<Vec<u8>, _>(index)
			.map(|v| Value::Bytes(Some(Box::new(v)))),
		_ => Err(sqlx::Error::ColumnNotFound(type_name.clone())),
	};
	if let Ok(value) = typed {
		return Ok(value);
	}

	// Dynamically typed cells (SQLite) may not match their declared type.
	if let Ok(v) = row.try_get::<i64, _>(index) {
		Ok(Value::BigInt(Some(v)))
	} else if let Ok(v) = row.try_get::<f64, _>(index) {
		Ok(Value::Double(Some(v)))
	} else if let Ok(v) = row.try_get::<String, _>(index) {
		Ok(Value::String(Some(Box::new(v))))
	} else if let Ok(v) = row.try_get::<Vec<u8>, _>(index) {
		Ok(Value::Bytes(Some(Box::new(v))))
	} else if let Ok(v) = row.try_get::<bool, _>(index) {
		Ok(Value::Bool(Some(v)))
	} else {
		Err(DatabaseError::Backend(format!(
			"cannot decode column \"{}\" of type {}",
			row.columns()[index].name(),
			type_name
		)))
	}
}

fn null_of(type_name: &str) -> Value {
	match type_name {
		"BOOLEAN" => Value::Bool(None),
		"SMALLINT" => Value::SmallInt(None),
		"INTEGER" => Value::Int(None),
		"BIGINT" => Value::BigInt(None),
		"REAL" => Value::Float(None),
		"DOUBLE" => Value::Double(None),
		"BLOB" => Value::Bytes(None),
		_ => Value::String(None),
	}
}
