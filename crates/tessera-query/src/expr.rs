//! Expressions.
//!
//! [`SimpleExpr`] is the tree everything renders from. [`Expr`] and the
//! [`ExprTrait`] combinators build it without checks; [`TypedExpr`] and
//! [`DynExpr`] build it with value kinds checked. Boolean trees for WHERE,
//! HAVING and ON are [`Condition`]s.

mod condition;
mod expr;
mod expr_trait;
mod func;
mod raw;
mod simple_expr;
mod typed;

pub use condition::{Cond, CondItem, Condition, ConditionHolder, IntoCondition, Junction};
pub use expr::{CaseExprBuilder, Expr};
pub use expr_trait::ExprTrait;
pub use func::Func;
pub use raw::{RawFragment, RawPart};
pub use simple_expr::{CaseStatement, Keyword, SimpleExpr, SubQueryOper, WindowRef};
pub use typed::{DynExpr, IntoTyped, TypedExpr};
pub(crate) use typed::coerce_value;
