//! Type-safe view of the Arrow column types the loader can encounter.

use crate::error::IndisortError;
use arrow::datatypes::DataType as ArrowDataType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The column types a decoded batch may carry.
///
/// Only `Int64` can back a chunk. The other variants exist so a schema mismatch
/// can be reported by name instead of by Arrow's debug string.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Int32,
    Int64,
    UInt64,
    Float64,
    Date32,
    Utf8,
}

impl ColumnType {
    /// Converts an Arrow `DataType` into a `ColumnType`.
    pub fn from_arrow_type(arrow_type: &ArrowDataType) -> Result<Self, IndisortError> {
        match arrow_type {
            ArrowDataType::Int32 => Ok(Self::Int32),
            ArrowDataType::Int64 => Ok(Self::Int64),
            ArrowDataType::UInt64 => Ok(Self::UInt64),
            ArrowDataType::Float64 => Ok(Self::Float64),
            ArrowDataType::Date32 => Ok(Self::Date32),
            ArrowDataType::Utf8 => Ok(Self::Utf8),
            dt => Err(IndisortError::UnsupportedType(format!(
                "Cannot convert Arrow type {:?} to a column type",
                dt
            ))),
        }
    }

    /// Returns `true` if a column of this type can be stored as a chunk.
    pub fn is_chunk_type(&self) -> bool {
        matches!(self, Self::Int64)
    }

    /// Validates that `arrow_type` is the one chunk type, naming `column_id` on failure.
    pub fn require_chunk_type(
        arrow_type: &ArrowDataType,
        column_id: usize,
    ) -> Result<Self, IndisortError> {
        let column_type = Self::from_arrow_type(arrow_type)?;
        if !column_type.is_chunk_type() {
            return Err(IndisortError::UnsupportedType(format!(
                "column {} is {}, only Int64 columns can be loaded",
                column_id, column_type
            )));
        }
        Ok(column_type)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Matches the Arrow `DataType` string representation.
        write!(f, "{:?}", self)
    }
}
