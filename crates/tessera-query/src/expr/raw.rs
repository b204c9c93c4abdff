//! Raw SQL fragments with bound placeholders.
//!
//! A raw fragment is the escape hatch for SQL the expression model does not
//! cover. Arguments are referenced positionally (`#1`, `#2`, ...) or by name
//! (`@name`) and are rendered like any other expression, so they take part
//! in placeholder numbering and inline casting.

use super::simple_expr::SimpleExpr;
use crate::error::BuildError;

/// Literal SQL with `#N` and `@name` placeholders.
///
/// # Example
///
/// ```rust
/// use tessera_query::expr::RawFragment;
///
/// let fragment = RawFragment::new("price * #1 > @limit")
///     .arg(2)
///     .named("limit", 100);
/// assert_eq!(fragment.parse().unwrap().len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RawFragment {
	sql: String,
	positional: Vec<SimpleExpr>,
	named: Vec<(String, SimpleExpr)>,
}

/// A piece of a parsed raw fragment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawPart<'a> {
	/// Text emitted verbatim
	Text(&'a str),
	/// A bound argument
	Expr(&'a SimpleExpr),
}

impl RawFragment {
	/// Create a fragment without arguments.
	pub fn new<S: Into<String>>(sql: S) -> Self {
		Self {
			sql: sql.into(),
			positional: Vec::new(),
			named: Vec::new(),
		}
	}

	/// Bind the next positional argument (`#1` for the first call).
	#[must_use]
	pub fn arg<E: Into<SimpleExpr>>(mut self, value: E) -> Self {
		self.positional.push(value.into());
		self
	}

	/// Bind a named argument (`@name`). Binding a name twice replaces the
	/// earlier value.
	#[must_use]
	pub fn named<N: Into<String>, E: Into<SimpleExpr>>(mut self, name: N, value: E) -> Self {
		let name = name.into();
		let value = value.into();
		match self.named.iter_mut().find(|(n, _)| *n == name) {
			Some(slot) => slot.1 = value,
			None => self.named.push((name, value)),
		}
		self
	}

	/// The fragment text.
	#[must_use]
	pub fn sql(&self) -> &str {
		&self.sql
	}

	/// Split the fragment into text and argument parts.
	///
	/// Text between single quotes is never substituted. An `@word` without a
	/// bound argument is kept as text; a `#N` without one is an error.
	pub fn parse(&self) -> Result<Vec<RawPart<'_>>, BuildError> {
		let sql = self.sql.as_str();
		let bytes = sql.as_bytes();
		let mut parts = Vec::new();
		let mut text_start = 0;
		let mut in_quote = false;
		let mut i = 0;

		while i < bytes.len() {
			let b = bytes[i];
			if b == b'\'' {
				in_quote = !in_quote;
				i += 1;
				continue;
			}
			if in_quote {
				i += 1;
				continue;
			}
			match b {
				b'#' => {
					let end = scan_while(bytes, i + 1, |c| c.is_ascii_digit());
					if end == i + 1 {
						i += 1;
						continue;
					}
					let token = &sql[i..end];
					let expr = sql[i + 1..end]
						.parse::<usize>()
						.ok()
						.and_then(|n| n.checked_sub(1))
						.and_then(|n| self.positional.get(n))
						.ok_or_else(|| BuildError::UnboundPlaceholder(token.to_string()))?;
					push_text(&mut parts, &sql[text_start..i]);
					parts.push(RawPart::Expr(expr));
					i = end;
					text_start = end;
				}
				b'@' => {
					let start = i + 1;
					if start >= bytes.len() || !is_ident_start(bytes[start]) {
						i += 1;
						continue;
					}
					let end = scan_while(bytes, start, is_ident_char);
					let name = &sql[start..end];
					if let Some((_, expr)) = self.named.iter().find(|(n, _)| n == name) {
						push_text(&mut parts, &sql[text_start..i]);
						parts.push(RawPart::Expr(expr));
						text_start = end;
					}
					i = end;
				}
				_ => i += 1,
			}
		}
		push_text(&mut parts, &sql[text_start..]);
		Ok(parts)
	}
}

fn push_text<'a>(parts: &mut Vec<RawPart<'a>>, text: &'a str) {
	if !text.is_empty() {
		parts.push(RawPart::Text(text));
	}
}

fn scan_while(bytes: &[u8], mut i: usize, pred: impl Fn(u8) -> bool) -> usize {
	while i < bytes.len() && pred(bytes[i]) {
		i += 1;
	}
	i
}

fn is_ident_start(b: u8) -> bool {
	b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_char(b: u8) -> bool {
	b.is_ascii_alphanumeric() || b == b'_'
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::value::Value;
	use rstest::rstest;

	#[rstest]
	fn test_parse_positional_and_named() {
		// Arrange
		let fragment = RawFragment::new("age(#1) > @min").arg("born").named("min", 18i32);

		// Act
		let parts = fragment.parse().unwrap();

		// Assert
		assert_eq!(
			parts,
			vec![
				RawPart::Text("age("),
				RawPart::Expr(&SimpleExpr::Value(Value::from("born"))),
				RawPart::Text(") > "),
				RawPart::Expr(&SimpleExpr::Value(Value::Int(Some(18)))),
			]
		);
	}

	#[rstest]
	fn test_quoted_text_is_not_substituted() {
		let fragment = RawFragment::new("x = '#1 @min' AND y = #1")
			.arg(5i32)
			.named("min", 1i32);

		let parts = fragment.parse().unwrap();

		assert_eq!(parts[0], RawPart::Text("x = '#1 @min' AND y = "));
		assert_eq!(parts.len(), 2);
	}

	#[rstest]
	fn test_unknown_name_is_kept_literally() {
		let fragment = RawFragment::new("SELECT @@version, @unknown");
		let parts = fragment.parse().unwrap();
		assert_eq!(parts, vec![RawPart::Text("SELECT @@version, @unknown")]);
	}

	#[rstest]
	#[case::out_of_range("#2")]
	#[case::zero("#0")]
	fn test_unbound_positional_is_error(#[case] sql: &str) {
		let fragment = RawFragment::new(sql).arg(1i32);
		assert_eq!(
			fragment.parse(),
			Err(BuildError::UnboundPlaceholder(sql.to_string()))
		);
	}
}
