//! Names and references: identifiers, column and table references,
//! operators, ordering, joins and window definitions.
//!
//! Anything that can name a column converts through [`IntoColumnRef`]:
//! `"id"`, `("users", "id")` and `("public", "users", "id")` all work.
//! [`kind`] holds the marker types typed expressions are checked with.

mod alias;
mod column_ref;
mod iden;
mod join;
pub mod kind;
mod operators;
mod order;
mod table_ref;
mod window;

pub use alias::Alias;
pub use column_ref::{ColumnRef, IntoColumnRef};
pub(crate) use column_ref::projection_alias;
pub use iden::{DynIden, IntoIden};
pub use join::{JoinExpr, JoinOn, JoinType};
pub use kind::{Kind, ValueKind};
pub use operators::{BinOper, UnOper};
pub use order::{NullOrdering, Order, OrderExpr};
pub use table_ref::{IntoTableRef, JoinTree, TableRef, ValuesList};
pub use window::{Frame, FrameClause, FrameType, WindowStatement};
