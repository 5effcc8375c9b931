//! Database module
//!
//! Connection management, row models, the generic repository and the
//! [`Store`] that aggregates them.

pub mod connection;
pub mod error;
pub mod models;
pub mod repository;
pub mod store;

pub use connection::{DatabaseConnection, DatabasePool};
pub use error::{DatabaseError, DbResult};
pub use repository::{Clause, Entity, Order, Repository, SqlValue};
pub use store::{RunWithMessages, Store};
