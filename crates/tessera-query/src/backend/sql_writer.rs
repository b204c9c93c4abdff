//! Text and argument accumulator used by the renderer.

use crate::value::{Value, Values};

/// SQL text under construction and the arguments bound so far.
///
/// Placeholder numbers are assigned as values are bound, so they always
/// follow textual order: the n-th bound value is placeholder `n`.
///
/// ```rust
/// use tessera_query::{SqlWriter, Value};
///
/// let mut w = SqlWriter::new();
/// w.push("SELECT * FROM users WHERE id = ");
/// w.bind(Value::Int(Some(1)), |n| format!("${n}"));
/// w.push(" OR id = ");
/// w.bind(Value::Int(Some(2)), |n| format!("${n}"));
///
/// let (sql, args) = w.finish();
/// assert_eq!(sql, "SELECT * FROM users WHERE id = $1 OR id = $2");
/// assert_eq!(args.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SqlWriter {
	sql: String,
	args: Values,
}

impl SqlWriter {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, s: &str) {
		self.sql.push_str(s);
	}

	pub fn push_comma(&mut self) {
		self.sql.push_str(", ");
	}

	/// Write every item through `f`, separated by `sep`
	pub fn push_separated<I, F>(&mut self, items: I, sep: &str, mut f: F)
	where
		I: IntoIterator,
		F: FnMut(&mut Self, I::Item),
	{
		for (i, item) in items.into_iter().enumerate() {
			if i > 0 {
				self.sql.push_str(sep);
			}
			f(self, item);
		}
	}

	/// Bind `value` and write the placeholder `placeholder` makes for its number.
	///
	/// NULL is never bound; the keyword is written instead and `None` returned.
	pub fn bind<F>(&mut self, value: Value, placeholder: F) -> Option<usize>
	where
		F: FnOnce(usize) -> String,
	{
		if value.is_null() {
			self.sql.push_str("NULL");
			return None;
		}
		let n = self.args.push(value);
		self.sql.push_str(&placeholder(n));
		Some(n)
	}

	/// Number the next bound value will get
	pub fn next_placeholder(&self) -> usize {
		self.args.len() + 1
	}

	pub fn sql(&self) -> &str {
		&self.sql
	}

	pub fn args(&self) -> &Values {
		&self.args
	}

	pub fn finish(self) -> (String, Values) {
		(self.sql, self.args)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn question(_: usize) -> String {
		"?".to_string()
	}

	#[rstest]
	fn test_bind_numbers_in_write_order() {
		// Arrange
		let mut w = SqlWriter::new();

		// Act
		let a = w.bind(Value::Int(Some(42)), |n| format!("${n}"));
		w.push(" ");
		let b = w.bind(Value::from("x"), |n| format!("${n}"));

		// Assert
		assert_eq!(w.sql(), "$1 $2");
		assert_eq!((a, b), (Some(1), Some(2)));
		assert_eq!(w.next_placeholder(), 3);
	}

	#[rstest]
	fn test_null_is_written_not_bound() {
		// Arrange
		let mut w = SqlWriter::new();

		// Act
		let skipped = w.bind(Value::Int(None), question);
		w.push_comma();
		w.bind(Value::Int(Some(1)), question);

		// Assert
		assert_eq!(skipped, None);
		assert_eq!(w.sql(), "NULL, ?");
		assert_eq!(w.args().0, vec![Value::Int(Some(1))]);
	}

	#[rstest]
	#[case::none(&[], "")]
	#[case::one(&["a"], "\"a\"")]
	#[case::many(&["a", "b", "c"], "\"a\" | \"b\" | \"c\"")]
	fn test_push_separated(#[case] items: &[&str], #[case] expected: &str) {
		let mut w = SqlWriter::new();
		w.push_separated(items, " | ", |w, item| w.push(&format!("\"{item}\"")));
		assert_eq!(w.sql(), expected);
	}
}
