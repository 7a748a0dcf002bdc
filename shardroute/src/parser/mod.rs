//! Statement model produced by the SQL parser.

pub mod segment;
pub mod statement;
pub mod value;
pub mod where_clause;

pub use segment::{Expression, InsertValuesSegment, Segment, TableSegment};
pub use statement::{Filtered, Insert, Statement, StatementKind};
pub use value::Value;
pub use where_clause::{ColumnRef, Operator, Predicate, WhereClause};
