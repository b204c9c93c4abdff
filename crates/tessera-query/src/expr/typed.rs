//! Kind-checked expressions.
//!
//! [`TypedExpr<K>`] carries its value kind in the type, so combining
//! incompatible expressions is a compile error. [`DynExpr`] carries the kind
//! at runtime for code that only learns column types while running, and
//! reports the same mistakes as [`BuildError::KindMismatch`].

use std::marker::PhantomData;

use super::condition::{CondItem, IntoCondition};
use super::simple_expr::{SimpleExpr, WindowRef};
use crate::error::BuildError;
use crate::schema::{Column, ColumnType};
use crate::types::kind::{self, Numeric};
use crate::types::{
	BinOper, ColumnRef, IntoIden, Kind, Order, OrderExpr, UnOper, ValueKind, WindowStatement,
};
use crate::value::{IntoValue, NullValue, Value};

/// Convert a literal to the width of the column it is compared with.
///
/// Integers that do not fit the column width keep their own width, so the
/// database reports the overflow instead of this crate truncating.
pub(crate) fn coerce_value(value: Value, hint: Option<ColumnType>) -> Value {
	let Some(ty) = hint else {
		return value;
	};
	if value.is_null() {
		return if value.column_type().kind().is_compatible(ty.kind()) {
			crate::value::null_of(ty)
		} else {
			value
		};
	}
	if let Some(i) = integer_of(&value) {
		return match ty {
			ColumnType::SmallInt => i16::try_from(i).map(Value::from).unwrap_or(value),
			ColumnType::Integer => i32::try_from(i).map(Value::from).unwrap_or(value),
			ColumnType::BigInt => i64::try_from(i).map(Value::from).unwrap_or(value),
			ColumnType::Real => Value::Float(Some(i as f32)),
			ColumnType::Double => Value::Double(Some(i as f64)),
			ColumnType::Decimal => i64::try_from(i)
				.map(|i| Value::from(rust_decimal::Decimal::from(i)))
				.unwrap_or(value),
			_ => value,
		};
	}
	match (value, ty) {
		(Value::Float(Some(f)), ColumnType::Double) => Value::Double(Some(f64::from(f))),
		(Value::Double(Some(f)), ColumnType::Real) => Value::Float(Some(f as f32)),
		(Value::ChronoDateTime(Some(dt)), ColumnType::TimestampTz) => {
			Value::from(dt.and_utc())
		}
		(value, _) => value,
	}
}

fn integer_of(value: &Value) -> Option<i128> {
	match value {
		Value::TinyInt(Some(v)) => Some(i128::from(*v)),
		Value::SmallInt(Some(v)) => Some(i128::from(*v)),
		Value::Int(Some(v)) => Some(i128::from(*v)),
		Value::BigInt(Some(v)) => Some(i128::from(*v)),
		Value::TinyUnsigned(Some(v)) => Some(i128::from(*v)),
		Value::SmallUnsigned(Some(v)) => Some(i128::from(*v)),
		Value::Unsigned(Some(v)) => Some(i128::from(*v)),
		Value::BigUnsigned(Some(v)) => Some(i128::from(*v)),
		_ => None,
	}
}

fn binary(left: SimpleExpr, op: BinOper, right: SimpleExpr) -> SimpleExpr {
	SimpleExpr::Binary(Box::new(left), op, Box::new(right))
}

/// An expression of value kind `K`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedExpr<K> {
	expr: SimpleExpr,
	column_type: Option<ColumnType>,
	_kind: PhantomData<fn() -> K>,
}

/// Conversion into a [`TypedExpr<K>`].
///
/// The hint is the column type of the other operand; literals use it to
/// pick their width.
pub trait IntoTyped<K: ValueKind> {
	/// Convert, using `hint` for literal width.
	fn into_typed(self, hint: Option<ColumnType>) -> TypedExpr<K>;
}

impl<K: ValueKind> TypedExpr<K> {
	/// Wrap an untyped expression, asserting it is of kind `K`.
	pub fn new<E: Into<SimpleExpr>>(expr: E) -> Self {
		Self::with_type(expr.into(), None)
	}

	pub(crate) fn with_type(expr: SimpleExpr, column_type: Option<ColumnType>) -> Self {
		Self {
			expr,
			column_type,
			_kind: PhantomData,
		}
	}

	fn derive<T: ValueKind>(expr: SimpleExpr, column_type: Option<ColumnType>) -> TypedExpr<T> {
		TypedExpr::with_type(expr, column_type)
	}

	fn predicate(expr: SimpleExpr) -> TypedExpr<kind::Bool> {
		Self::derive(expr, Some(ColumnType::Boolean))
	}

	/// Runtime kind.
	pub fn kind(&self) -> Kind {
		K::KIND
	}

	/// SQL type, when known.
	pub fn column_type(&self) -> Option<ColumnType> {
		self.column_type
	}

	/// Borrow the underlying AST node.
	pub fn as_simple_expr(&self) -> &SimpleExpr {
		&self.expr
	}

	/// Convert into the underlying AST node.
	pub fn into_simple_expr(self) -> SimpleExpr {
		self.expr
	}

	fn compare<R: IntoTyped<K>>(self, op: BinOper, other: R) -> TypedExpr<kind::Bool> {
		let right = other.into_typed(self.column_type);
		Self::predicate(binary(self.expr, op, right.expr))
	}

	/// `self = other`
	pub fn eq<R: IntoTyped<K>>(self, other: R) -> TypedExpr<kind::Bool> {
		self.compare(BinOper::Equal, other)
	}

	/// `self <> other`
	pub fn ne<R: IntoTyped<K>>(self, other: R) -> TypedExpr<kind::Bool> {
		self.compare(BinOper::NotEqual, other)
	}

	/// `self < other`
	pub fn lt<R: IntoTyped<K>>(self, other: R) -> TypedExpr<kind::Bool> {
		self.compare(BinOper::SmallerThan, other)
	}

	/// `self <= other`
	pub fn lte<R: IntoTyped<K>>(self, other: R) -> TypedExpr<kind::Bool> {
		self.compare(BinOper::SmallerThanOrEqual, other)
	}

	/// `self > other`
	pub fn gt<R: IntoTyped<K>>(self, other: R) -> TypedExpr<kind::Bool> {
		self.compare(BinOper::GreaterThan, other)
	}

	/// `self >= other`
	pub fn gte<R: IntoTyped<K>>(self, other: R) -> TypedExpr<kind::Bool> {
		self.compare(BinOper::GreaterThanOrEqual, other)
	}

	/// `self IS NULL`
	pub fn is_null(self) -> TypedExpr<kind::Bool> {
		Self::predicate(binary(self.expr, BinOper::Is, SimpleExpr::from(super::Keyword::Null)))
	}

	/// `self IS NOT NULL`
	pub fn is_not_null(self) -> TypedExpr<kind::Bool> {
		Self::predicate(binary(
			self.expr,
			BinOper::IsNot,
			SimpleExpr::from(super::Keyword::Null),
		))
	}

	fn membership<I, R>(self, op: BinOper, items: I) -> TypedExpr<kind::Bool>
	where
		I: IntoIterator<Item = R>,
		R: IntoTyped<K>,
	{
		let hint = self.column_type;
		let items = items
			.into_iter()
			.map(|item| item.into_typed(hint).expr)
			.collect();
		Self::predicate(binary(self.expr, op, SimpleExpr::Tuple(items)))
	}

	/// `self IN (...)`; an empty list is always false.
	pub fn is_in<I, R>(self, items: I) -> TypedExpr<kind::Bool>
	where
		I: IntoIterator<Item = R>,
		R: IntoTyped<K>,
	{
		self.membership(BinOper::In, items)
	}

	/// `self NOT IN (...)`; an empty list is always true.
	pub fn is_not_in<I, R>(self, items: I) -> TypedExpr<kind::Bool>
	where
		I: IntoIterator<Item = R>,
		R: IntoTyped<K>,
	{
		self.membership(BinOper::NotIn, items)
	}

	/// `self BETWEEN low AND high`
	pub fn between<A, B>(self, low: A, high: B) -> TypedExpr<kind::Bool>
	where
		A: IntoTyped<K>,
		B: IntoTyped<K>,
	{
		let hint = self.column_type;
		let range = binary(
			low.into_typed(hint).expr,
			BinOper::And,
			high.into_typed(hint).expr,
		);
		Self::predicate(binary(self.expr, BinOper::Between, range))
	}

	/// `MAX(self)`
	pub fn max(self) -> Self {
		let ty = self.column_type;
		Self::with_type(super::Func::max(self.expr), ty)
	}

	/// `MIN(self)`
	pub fn min(self) -> Self {
		let ty = self.column_type;
		Self::with_type(super::Func::min(self.expr), ty)
	}

	/// `COUNT(self)`
	pub fn count(self) -> TypedExpr<kind::Integer> {
		Self::derive(super::Func::count(self.expr), Some(ColumnType::BigInt))
	}

	/// `self OVER (window)`
	pub fn over(self, window: WindowStatement) -> Self {
		let ty = self.column_type;
		Self::with_type(
			SimpleExpr::Window(Box::new(self.expr), Box::new(WindowRef::Spec(window))),
			ty,
		)
	}

	/// `self OVER name`
	pub fn over_named<N: IntoIden>(self, name: N) -> Self {
		let ty = self.column_type;
		Self::with_type(
			SimpleExpr::Window(
				Box::new(self.expr),
				Box::new(WindowRef::Named(name.into_iden())),
			),
			ty,
		)
	}

	/// `CAST(self AS <default type of T>)`
	pub fn cast<T: ValueKind>(self) -> TypedExpr<T> {
		Self::derive(
			SimpleExpr::Cast(Box::new(self.expr), T::DEFAULT_TYPE),
			Some(T::DEFAULT_TYPE),
		)
	}

	/// Forget the static kind.
	pub fn into_dyn(self) -> DynExpr {
		DynExpr {
			expr: self.expr,
			kind: K::KIND,
			column_type: self.column_type,
		}
	}

	/// Ascending sort key.
	pub fn asc(self) -> OrderExpr {
		OrderExpr::new(self.expr, Order::Asc)
	}

	/// Descending sort key.
	pub fn desc(self) -> OrderExpr {
		OrderExpr::new(self.expr, Order::Desc)
	}
}

impl TypedExpr<kind::Bool> {
	/// `self AND other`
	pub fn and<R: IntoTyped<kind::Bool>>(self, other: R) -> Self {
		Self::predicate(binary(self.expr, BinOper::And, other.into_typed(None).expr))
	}

	/// `self OR other`
	pub fn or<R: IntoTyped<kind::Bool>>(self, other: R) -> Self {
		Self::predicate(binary(self.expr, BinOper::Or, other.into_typed(None).expr))
	}

	/// `NOT self`
	#[allow(clippy::should_implement_trait)]
	pub fn not(self) -> Self {
		Self::predicate(SimpleExpr::Unary(UnOper::Not, Box::new(self.expr)))
	}
}

impl<K: Numeric> TypedExpr<K> {
	fn arithmetic<R: IntoTyped<K>>(self, op: BinOper, other: R) -> Self {
		let ty = self.column_type;
		let right = other.into_typed(ty);
		Self::with_type(binary(self.expr, op, right.expr), ty)
	}

	/// `self + other`
	#[allow(clippy::should_implement_trait)]
	pub fn add<R: IntoTyped<K>>(self, other: R) -> Self {
		self.arithmetic(BinOper::Add, other)
	}

	/// `self - other`
	#[allow(clippy::should_implement_trait)]
	pub fn sub<R: IntoTyped<K>>(self, other: R) -> Self {
		self.arithmetic(BinOper::Sub, other)
	}

	/// `self * other`
	#[allow(clippy::should_implement_trait)]
	pub fn mul<R: IntoTyped<K>>(self, other: R) -> Self {
		self.arithmetic(BinOper::Mul, other)
	}

	/// `self / other`
	#[allow(clippy::should_implement_trait)]
	pub fn div<R: IntoTyped<K>>(self, other: R) -> Self {
		self.arithmetic(BinOper::Div, other)
	}

	/// `SUM(self)`
	pub fn sum(self) -> Self {
		let ty = self.column_type;
		Self::with_type(super::Func::sum(self.expr), ty)
	}

	/// `AVG(self)`
	pub fn avg(self) -> TypedExpr<kind::Float> {
		Self::derive(super::Func::avg(self.expr), Some(ColumnType::Double))
	}
}

impl TypedExpr<kind::Text> {
	/// `self LIKE pattern`
	pub fn like<R: IntoTyped<kind::Text>>(self, pattern: R) -> TypedExpr<kind::Bool> {
		self.compare(BinOper::Like, pattern)
	}

	/// `self NOT LIKE pattern`
	pub fn not_like<R: IntoTyped<kind::Text>>(self, pattern: R) -> TypedExpr<kind::Bool> {
		self.compare(BinOper::NotLike, pattern)
	}

	/// `LOWER(self)`
	pub fn lower(self) -> Self {
		Self::with_type(super::Func::lower(self.expr), Some(ColumnType::Text))
	}

	/// `UPPER(self)`
	pub fn upper(self) -> Self {
		Self::with_type(super::Func::upper(self.expr), Some(ColumnType::Text))
	}
}

impl<K: ValueKind> From<TypedExpr<K>> for SimpleExpr {
	fn from(e: TypedExpr<K>) -> Self {
		e.expr
	}
}

impl IntoCondition for TypedExpr<kind::Bool> {
	fn into_cond_item(self) -> CondItem {
		CondItem::Expr(self.expr)
	}
}

impl<K: ValueKind> IntoTyped<K> for TypedExpr<K> {
	fn into_typed(self, _hint: Option<ColumnType>) -> TypedExpr<K> {
		self
	}
}

impl<K: ValueKind> IntoTyped<K> for Column<K> {
	fn into_typed(self, _hint: Option<ColumnType>) -> TypedExpr<K> {
		self.expr()
	}
}

impl<K: ValueKind> IntoTyped<K> for &Column<K> {
	fn into_typed(self, _hint: Option<ColumnType>) -> TypedExpr<K> {
		self.expr()
	}
}

impl<K, T> IntoTyped<K> for Option<T>
where
	K: ValueKind,
	T: IntoTyped<K> + NullValue,
{
	fn into_typed(self, hint: Option<ColumnType>) -> TypedExpr<K> {
		match self {
			Some(v) => v.into_typed(hint),
			None => {
				let value = coerce_value(T::null(), hint);
				let ty = hint.unwrap_or_else(|| value.column_type());
				TypedExpr::with_type(SimpleExpr::Value(value), Some(ty))
			}
		}
	}
}

macro_rules! impl_typed_literal {
	($kind:ident: $($ty:ty),* $(,)?) => {
		$(
			impl IntoTyped<kind::$kind> for $ty {
				fn into_typed(self, hint: Option<ColumnType>) -> TypedExpr<kind::$kind> {
					let value = coerce_value(self.into_value(), hint);
					let ty = value.column_type();
					TypedExpr::with_type(SimpleExpr::Value(value), Some(ty))
				}
			}
		)*
	};
}

impl_typed_literal!(Bool: bool);
impl_typed_literal!(Integer: i8, i16, i32, i64, u8, u16, u32, u64);
impl_typed_literal!(Float: f32, f64);
impl_typed_literal!(Decimal: rust_decimal::Decimal);
impl_typed_literal!(Text: &str, String, &String, char);
impl_typed_literal!(Bytes: Vec<u8>, &[u8]);
impl_typed_literal!(Date: chrono::NaiveDate);
impl_typed_literal!(Time: chrono::NaiveTime);
impl_typed_literal!(Timestamp: chrono::NaiveDateTime, chrono::DateTime<chrono::Utc>);
impl_typed_literal!(Uuid: uuid::Uuid);
impl_typed_literal!(Json: serde_json::Value);

/// An expression whose kind is checked at construction time.
///
/// ```rust
/// use tessera_query::prelude::*;
///
/// let users = Table::new("users")
///     .with_column(ColumnDescriptor::new("name", ColumnType::Text));
/// let name = users.dyn_col("name").unwrap();
///
/// assert!(name.clone().eq("alice").is_ok());
/// assert!(matches!(name.eq(true), Err(BuildError::KindMismatch { .. })));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DynExpr {
	expr: SimpleExpr,
	kind: Kind,
	column_type: Option<ColumnType>,
}

impl DynExpr {
	/// Wrap an expression of a known kind.
	pub fn new<E: Into<SimpleExpr>>(expr: E, kind: Kind) -> Self {
		Self {
			expr: expr.into(),
			kind,
			column_type: None,
		}
	}

	pub(crate) fn column(column: ColumnRef, column_type: ColumnType) -> Self {
		Self {
			expr: SimpleExpr::Column(column),
			kind: column_type.kind(),
			column_type: Some(column_type),
		}
	}

	/// A literal.
	pub fn val<V: IntoValue>(value: V) -> Self {
		Self::from(value.into_value())
	}

	/// Runtime kind.
	pub fn kind(&self) -> Kind {
		self.kind
	}

	/// SQL type, when known.
	pub fn column_type(&self) -> Option<ColumnType> {
		self.column_type
	}

	/// Convert into the underlying AST node.
	pub fn into_simple_expr(self) -> SimpleExpr {
		self.expr
	}

	fn check(&self, other: &DynExpr) -> Result<(), BuildError> {
		if self.kind.is_compatible(other.kind) {
			Ok(())
		} else {
			Err(BuildError::KindMismatch {
				left: self.kind,
				right: other.kind,
			})
		}
	}

	fn operand(self, hint: Option<ColumnType>) -> SimpleExpr {
		match self.expr {
			SimpleExpr::Value(v) => SimpleExpr::Value(coerce_value(v, hint)),
			e => e,
		}
	}

	fn predicate(expr: SimpleExpr) -> Self {
		Self {
			expr,
			kind: Kind::Bool,
			column_type: Some(ColumnType::Boolean),
		}
	}

	fn compare<R: Into<DynExpr>>(self, op: BinOper, other: R) -> Result<DynExpr, BuildError> {
		let other = other.into();
		self.check(&other)?;
		let right = other.operand(self.column_type);
		Ok(Self::predicate(binary(self.expr, op, right)))
	}

	/// `self = other`
	pub fn eq<R: Into<DynExpr>>(self, other: R) -> Result<DynExpr, BuildError> {
		self.compare(BinOper::Equal, other)
	}

	/// `self <> other`
	pub fn ne<R: Into<DynExpr>>(self, other: R) -> Result<DynExpr, BuildError> {
		self.compare(BinOper::NotEqual, other)
	}

	/// `self < other`
	pub fn lt<R: Into<DynExpr>>(self, other: R) -> Result<DynExpr, BuildError> {
		self.compare(BinOper::SmallerThan, other)
	}

	/// `self <= other`
	pub fn lte<R: Into<DynExpr>>(self, other: R) -> Result<DynExpr, BuildError> {
		self.compare(BinOper::SmallerThanOrEqual, other)
	}

	/// `self > other`
	pub fn gt<R: Into<DynExpr>>(self, other: R) -> Result<DynExpr, BuildError> {
		self.compare(BinOper::GreaterThan, other)
	}

	/// `self >= other`
	pub fn gte<R: Into<DynExpr>>(self, other: R) -> Result<DynExpr, BuildError> {
		self.compare(BinOper::GreaterThanOrEqual, other)
	}

	/// `self LIKE pattern`; both sides must be text.
	pub fn like<R: Into<DynExpr>>(self, pattern: R) -> Result<DynExpr, BuildError> {
		if self.kind != Kind::Text {
			return Err(BuildError::KindMismatch {
				left: self.kind,
				right: Kind::Text,
			});
		}
		self.compare(BinOper::Like, pattern)
	}

	/// `self IN (...)`
	pub fn is_in<I, R>(self, items: I) -> Result<DynExpr, BuildError>
	where
		I: IntoIterator<Item = R>,
		R: Into<DynExpr>,
	{
		let mut exprs = Vec::new();
		for item in items {
			let item = item.into();
			self.check(&item)?;
			exprs.push(item.operand(self.column_type));
		}
		Ok(Self::predicate(binary(self.expr, BinOper::In, SimpleExpr::Tuple(exprs))))
	}

	/// `self IS NULL`
	pub fn is_null(self) -> DynExpr {
		Self::predicate(binary(self.expr, BinOper::Is, SimpleExpr::from(super::Keyword::Null)))
	}

	fn logical<R: Into<DynExpr>>(self, op: BinOper, other: R) -> Result<DynExpr, BuildError> {
		let other = other.into();
		if self.kind != Kind::Bool || other.kind != Kind::Bool {
			return Err(BuildError::KindMismatch {
				left: self.kind,
				right: other.kind,
			});
		}
		Ok(Self::predicate(binary(self.expr, op, other.expr)))
	}

	/// `self AND other`; both sides must be boolean.
	pub fn and<R: Into<DynExpr>>(self, other: R) -> Result<DynExpr, BuildError> {
		self.logical(BinOper::And, other)
	}

	/// `self OR other`; both sides must be boolean.
	pub fn or<R: Into<DynExpr>>(self, other: R) -> Result<DynExpr, BuildError> {
		self.logical(BinOper::Or, other)
	}

	/// Recover a statically typed expression.
	pub fn typed<K: ValueKind>(self) -> Result<TypedExpr<K>, BuildError> {
		if self.kind != K::KIND {
			return Err(BuildError::KindMismatch {
				left: K::KIND,
				right: self.kind,
			});
		}
		Ok(TypedExpr::with_type(self.expr, self.column_type))
	}
}

impl From<Value> for DynExpr {
	fn from(v: Value) -> Self {
		let ty = v.column_type();
		Self {
			expr: SimpleExpr::Value(v),
			kind: ty.kind(),
			column_type: Some(ty),
		}
	}
}

impl<K: ValueKind> From<TypedExpr<K>> for DynExpr {
	fn from(e: TypedExpr<K>) -> Self {
		e.into_dyn()
	}
}

impl<K: ValueKind> From<&Column<K>> for DynExpr {
	fn from(c: &Column<K>) -> Self {
		c.expr().into_dyn()
	}
}

impl From<DynExpr> for SimpleExpr {
	fn from(e: DynExpr) -> Self {
		e.expr
	}
}

impl IntoCondition for DynExpr {
	fn into_cond_item(self) -> CondItem {
		CondItem::Expr(self.expr)
	}
}

macro_rules! impl_dyn_literal {
	($($ty:ty),* $(,)?) => {
		$(
			impl From<$ty> for DynExpr {
				fn from(v: $ty) -> Self {
					Value::from(v).into()
				}
			}
		)*
	};
}

impl_dyn_literal!(
	bool,
	i8,
	i16,
	i32,
	i64,
	u8,
	u16,
	u32,
	u64,
	f32,
	f64,
	char,
	&str,
	String,
	Vec<u8>,
	chrono::NaiveDate,
	chrono::NaiveTime,
	chrono::NaiveDateTime,
	chrono::DateTime<chrono::Utc>,
	uuid::Uuid,
	serde_json::Value,
	rust_decimal::Decimal,
);

#[cfg(test)]
mod tests {
	use super::*;
	use crate::schema::{ColumnDescriptor, Table};
	use rstest::{fixture, rstest};

	#[fixture]
	fn customer() -> Table {
		Table::new("customer")
			.with_column(ColumnDescriptor::new("id", ColumnType::Integer).identity())
			.with_column(ColumnDescriptor::new("name", ColumnType::Text))
			.with_column(ColumnDescriptor::new("active", ColumnType::Boolean))
	}

	#[rstest]
	fn test_in_list_literals_take_column_width(customer: Table) {
		// Arrange
		let id = customer.col::<kind::Integer>("id").unwrap();

		// Act
		let expr = id.is_in([1i64, 2]).into_simple_expr();

		// Assert
		let SimpleExpr::Binary(_, BinOper::In, right) = expr else {
			panic!("expected IN");
		};
		assert_eq!(
			*right,
			SimpleExpr::Tuple(vec![
				SimpleExpr::Value(Value::Int(Some(1))),
				SimpleExpr::Value(Value::Int(Some(2))),
			])
		);
	}

	#[rstest]
	fn test_predicates_compose(customer: Table) {
		let active = customer.col::<kind::Bool>("active").unwrap();
		let name = customer.col::<kind::Text>("name").unwrap();

		let expr = active.eq(true).and(name.like("A%")).not();

		assert_eq!(expr.kind(), Kind::Bool);
		assert!(matches!(
			expr.into_simple_expr(),
			SimpleExpr::Unary(UnOper::Not, _)
		));
	}

	#[rstest]
	fn test_dyn_expr_rejects_incompatible_kinds(customer: Table) {
		// Arrange
		let name = customer.dyn_col("name").unwrap();

		// Act
		let result = name.eq(true);

		// Assert
		assert_eq!(
			result,
			Err(BuildError::KindMismatch {
				left: Kind::Text,
				right: Kind::Bool,
			})
		);
	}

	#[rstest]
	fn test_dyn_expr_numeric_kinds_compare(customer: Table) {
		let id = customer.dyn_col("id").unwrap();
		assert!(id.clone().gt(1.5f64).is_ok());
		assert!(id.eq(3i64).is_ok());
	}

	#[rstest]
	fn test_dyn_and_requires_booleans(customer: Table) {
		let id = customer.dyn_col("id").unwrap();
		let active = customer.dyn_col("active").unwrap();
		assert!(active.clone().and(active.clone()).is_ok());
		assert!(active.and(id).is_err());
	}

	#[rstest]
	fn test_typed_roundtrip_checks_kind(customer: Table) {
		let id = customer.dyn_col("id").unwrap();
		assert!(id.clone().typed::<kind::Integer>().is_ok());
		assert!(id.typed::<kind::Text>().is_err());
	}

	#[rstest]
	fn test_none_literal_is_typed_null(customer: Table) {
		let name = customer.col::<kind::Text>("name").unwrap();
		let expr = name.ne(None::<String>).into_simple_expr();
		let SimpleExpr::Binary(_, _, right) = expr else {
			panic!("expected comparison");
		};
		assert_eq!(*right, SimpleExpr::Value(Value::String(None)));
	}
}
