//! Rewriting a statement for each routing unit.

pub mod builder;
pub mod error;
pub mod insert_values;
pub mod table;
pub mod token;

pub use builder::{Rewritten, SqlBuilder};
pub use error::Error;
pub use insert_values::InsertValuesTokenGenerator;
pub use token::{InsertValueToken, InsertValuesToken, SqlToken, Substitutable, TableToken};
