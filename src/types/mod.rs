//! This module defines the core, strongly-typed data representations shared by the
//! chunk store, the logical index, and the ordering engine.
//!
//! It includes the `ColumnType` enum used to validate decoded Arrow columns, and
//! the `RowRef` composite reference that the logical index is made of.

pub mod column_type;
pub mod row_ref;

// Re-export the main type(s) for easier access.
pub use column_type::ColumnType;
pub use row_ref::RowRef;
