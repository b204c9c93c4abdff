//! The expression tree every builder lowers to.
//!
//! [`SimpleExpr`] is a closed enum; the renderer and the projection visitor
//! match on it exhaustively.

use crate::query::SubQuery;
use crate::schema::ColumnType;
use crate::types::{BinOper, ColumnRef, DynIden, UnOper, WindowStatement};
use crate::value::Value;

use super::raw::RawFragment;

/// How a sub-select is used inside an expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubQueryOper {
	Exists,
	NotExists,
	/// Right operand of a comparison: `x = ANY (...)`
	Any,
	/// Right operand of a comparison: `x > ALL (...)`
	All,
}

impl SubQueryOper {
	#[must_use]
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Exists => "EXISTS",
			Self::NotExists => "NOT EXISTS",
			Self::Any => "ANY",
			Self::All => "ALL",
		}
	}
}

/// Target of `OVER`
#[derive(Debug, Clone, PartialEq)]
pub enum WindowRef {
	/// Inline `OVER (...)`
	Spec(WindowStatement),
	/// `OVER name` for an entry of the statement's WINDOW clause
	Named(DynIden),
}

/// Expression node.
///
/// Trees are values: combinators consume their operands and return a new
/// node, so sharing a sub-tree means cloning it.
///
/// ```rust
/// use tessera_query::expr::SimpleExpr;
/// use tessera_query::types::{BinOper, ColumnRef};
/// use tessera_query::Value;
///
/// let age_check = SimpleExpr::Binary(
///     Box::new(SimpleExpr::Column(ColumnRef::column("age"))),
///     BinOper::GreaterThanOrEqual,
///     Box::new(SimpleExpr::Value(Value::Int(Some(18)))),
/// );
/// assert_eq!(age_check.binary_oper(), Some(BinOper::GreaterThanOrEqual));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum SimpleExpr {
	Column(ColumnRef),
	Value(Value),
	Unary(UnOper, Box<SimpleExpr>),
	Binary(Box<SimpleExpr>, BinOper, Box<SimpleExpr>),
	/// `name(args...)`
	FunctionCall(DynIden, Vec<SimpleExpr>),
	/// Sub-select; `None` is a scalar sub-select or the right side of `IN`
	SubQuery(Option<SubQueryOper>, Box<SubQuery>),
	Tuple(Vec<SimpleExpr>),
	/// Verbatim text
	Custom(String),
	/// Text with `#N` / `@name` placeholders
	Raw(Box<RawFragment>),
	Constant(Keyword),
	Asterisk,
	Case(Box<CaseStatement>),
	/// `CAST(expr AS type)`, spelled per dialect
	Cast(Box<SimpleExpr>, ColumnType),
	/// `call OVER window`
	Window(Box<SimpleExpr>, Box<WindowRef>),
	/// `EXCLUDED.column` in an upsert action
	Excluded(DynIden),
}

impl SimpleExpr {
	/// Operator of a binary node
	#[must_use]
	pub fn binary_oper(&self) -> Option<BinOper> {
		match self {
			Self::Binary(_, op, _) => Some(*op),
			_ => None,
		}
	}
}

/// Keywords usable where an expression is expected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
	Null,
	True,
	False,
	Default,
	CurrentTimestamp,
	CurrentDate,
	CurrentTime,
}

impl Keyword {
	#[must_use]
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Null => "NULL",
			Self::True => "TRUE",
			Self::False => "FALSE",
			Self::Default => "DEFAULT",
			Self::CurrentTimestamp => "CURRENT_TIMESTAMP",
			Self::CurrentDate => "CURRENT_DATE",
			Self::CurrentTime => "CURRENT_TIME",
		}
	}
}

/// Searched `CASE WHEN c THEN r ... [ELSE e] END`.
///
/// In inline mode literal branch results are cast explicitly so every
/// branch reports the same type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseStatement {
	pub branches: Vec<(SimpleExpr, SimpleExpr)>,
	pub otherwise: Option<SimpleExpr>,
}

impl CaseStatement {
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn when<C, R>(mut self, condition: C, result: R) -> Self
	where
		C: Into<SimpleExpr>,
		R: Into<SimpleExpr>,
	{
		self.branches.push((condition.into(), result.into()));
		self
	}

	#[must_use]
	pub fn else_result<E: Into<SimpleExpr>>(mut self, result: E) -> Self {
		self.otherwise = Some(result.into());
		self
	}
}

impl From<Value> for SimpleExpr {
	fn from(v: Value) -> Self {
		Self::Value(v)
	}
}

impl From<ColumnRef> for SimpleExpr {
	fn from(c: ColumnRef) -> Self {
		Self::Column(c)
	}
}

impl From<Keyword> for SimpleExpr {
	fn from(k: Keyword) -> Self {
		Self::Constant(k)
	}
}

impl From<CaseStatement> for SimpleExpr {
	fn from(case: CaseStatement) -> Self {
		Self::Case(Box::new(case))
	}
}

impl From<RawFragment> for SimpleExpr {
	fn from(raw: RawFragment) -> Self {
		Self::Raw(Box::new(raw))
	}
}

macro_rules! impl_from_literal {
	($($ty:ty),* $(,)?) => {
		$(
			impl From<$ty> for SimpleExpr {
				fn from(v: $ty) -> Self {
					Self::Value(Value::from(v))
				}
			}
		)*
	};
}

impl_from_literal!(
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

impl<T> From<Option<T>> for SimpleExpr
where
	T: crate::value::IntoValue + crate::value::NullValue,
{
	fn from(v: Option<T>) -> Self {
		use crate::value::IntoValue;
		Self::Value(v.into_value())
	}
}
