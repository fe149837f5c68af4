//! This file is the root of the `indisort` Rust crate.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of the library (`chunk_store`,
//!     `ordering`, `harness`, etc.) so the Rust compiler knows they exist.
//! 2.  Re-exporting the handful of types most callers need.
//!
//! The data flow is: `ChunkStore` (immutable decoded columns) ->
//! `LogicalIndex` (a permutation of row references) -> `ordering::sort`
//! (reorders the index, never the data).

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
mod observability; // Make macros available throughout the crate

pub mod chunk_store;
pub mod config;
pub mod error;
pub mod harness;
pub mod logical_index;
pub mod ordering;
pub mod synthetic;
pub mod traits;
pub mod types;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use chunk_store::ChunkStore;
pub use error::{IndisortError, Result};
pub use logical_index::LogicalIndex;
pub use ordering::{sort, Algorithm, KeyPolicy, KeyPolicyKind};
pub use types::RowRef;
