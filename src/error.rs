use thiserror::Error;

use crate::value::TypeId;

/// Errors raised by the value, type and hash layers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// Numeric type id with no registered type behaviour.
    #[error("unsupported type id: {0}")]
    UnsupportedType(i32),
    /// Typed read of a payload that does not match the value's type id.
    #[error("type mismatch: type id {type_id:?}, expected {expected}")]
    TypeMismatch {
        type_id: TypeId,
        expected: &'static str,
    },
}

/// Errors raised by `HyperLogLog`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HyperLogLogError {
    /// Bucket exponent outside of `[0, 64)`.
    #[error("invalid number of bucket bits: {0}, expected value in [0, 64)")]
    InvalidBits(i16),
    /// Register array for the requested exponent could not be allocated.
    #[error("failed to allocate {buckets} registers")]
    Allocation { buckets: u64 },
    /// Element could not be hashed; the element was not added.
    #[error("failed to hash element: {0}")]
    Hash(#[from] ValueError),
}
