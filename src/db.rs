//! Execution module.
//!
//! Re-exports [`tessera_db`]: connections, transactions, the prepared
//! statement cache and the nested result scanner.

pub use tessera_db::*;
