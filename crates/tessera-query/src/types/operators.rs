//! Operators of the expression tree.

/// Prefix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnOper {
	Not,
	/// `-x`
	Neg,
	/// `DISTINCT` inside an aggregate call, `count(DISTINCT x)`
	Distinct,
}

impl UnOper {
	#[must_use]
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Not => "NOT",
			Self::Neg => "-",
			Self::Distinct => "DISTINCT",
		}
	}
}

/// Declares [`BinOper`] from one row per operator: variant, SQL text and
/// binding strength.
macro_rules! bin_opers {
	($($variant:ident => $sql:literal @ $prec:literal),* $(,)?) => {
		/// Infix operators.
		///
		/// Precedence follows the SQL standard grouping: arithmetic binds
		/// tightest, then comparison, pattern, range and membership, `IS`,
		/// `AND` and finally `OR`.
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
		pub enum BinOper {
			$($variant,)*
		}

		impl BinOper {
			#[must_use]
			pub fn as_str(&self) -> &'static str {
				match self {
					$(Self::$variant => $sql,)*
				}
			}

			/// Higher binds tighter
			#[must_use]
			pub fn precedence(&self) -> u8 {
				match self {
					$(Self::$variant => $prec,)*
				}
			}
		}
	};
}

bin_opers! {
	Or => "OR" @ 1,
	And => "AND" @ 2,
	Is => "IS" @ 3,
	IsNot => "IS NOT" @ 3,
	In => "IN" @ 4,
	NotIn => "NOT IN" @ 4,
	Between => "BETWEEN" @ 4,
	NotBetween => "NOT BETWEEN" @ 4,
	Like => "LIKE" @ 5,
	NotLike => "NOT LIKE" @ 5,
	Equal => "=" @ 6,
	NotEqual => "<>" @ 6,
	SmallerThan => "<" @ 6,
	SmallerThanOrEqual => "<=" @ 6,
	GreaterThan => ">" @ 6,
	GreaterThanOrEqual => ">=" @ 6,
	Add => "+" @ 10,
	Sub => "-" @ 10,
	Mul => "*" @ 11,
	Div => "/" @ 11,
	Mod => "%" @ 11,
}

impl BinOper {
	/// `a op (b op c)` means the same as `(a op b) op c`
	#[must_use]
	pub fn is_associative(&self) -> bool {
		matches!(self, Self::And | Self::Or | Self::Add | Self::Mul)
	}

	/// Yields a boolean rather than a number
	#[must_use]
	pub fn is_predicate(&self) -> bool {
		self.precedence() < BinOper::Add.precedence()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(BinOper::NotEqual, "<>")]
	#[case(BinOper::SmallerThanOrEqual, "<=")]
	#[case(BinOper::NotBetween, "NOT BETWEEN")]
	#[case(BinOper::IsNot, "IS NOT")]
	#[case(BinOper::Mod, "%")]
	fn test_sql_text(#[case] op: BinOper, #[case] expected: &str) {
		assert_eq!(op.as_str(), expected);
	}

	#[rstest]
	#[case::or_below_and(BinOper::Or, BinOper::And)]
	#[case::and_below_comparison(BinOper::And, BinOper::Equal)]
	#[case::comparison_below_arithmetic(BinOper::GreaterThan, BinOper::Sub)]
	#[case::sum_below_product(BinOper::Add, BinOper::Mul)]
	fn test_binds_looser(#[case] loose: BinOper, #[case] tight: BinOper) {
		assert!(loose.precedence() < tight.precedence());
	}

	#[rstest]
	#[case(BinOper::Like, true)]
	#[case(BinOper::In, true)]
	#[case(BinOper::Div, false)]
	fn test_is_predicate(#[case] op: BinOper, #[case] expected: bool) {
		assert_eq!(op.is_predicate(), expected);
	}
}
