//! Per-type behaviour of `Value`s.
//!
//! Every `TypeId` maps to one handler in `type_instance`. Supporting a new
//! type means adding a handler and a match arm, existing handlers stay as is.

use std::borrow::Cow;

use enum_dispatch::enum_dispatch;

use crate::error::ValueError;
use crate::value::{TypeId, Value};

/// Type handlers, one per `TypeId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[enum_dispatch]
pub enum TypeInstance {
    BigInt(BigIntType),
    Varchar(VarcharType),
}

/// Behaviour which must be implemented by every type handler.
#[enum_dispatch(TypeInstance)]
pub trait Type {
    /// Raw bytes of the value's payload.
    fn data<'a>(&self, value: &'a Value) -> Result<Cow<'a, [u8]>, ValueError>;
    /// Declared storage size of the value.
    fn storage_size(&self, value: &Value) -> u32;
}

/// Return the handler registered for `type_id`.
#[inline]
pub const fn type_instance(type_id: TypeId) -> TypeInstance {
    match type_id {
        TypeId::BigInt => TypeInstance::BigInt(BigIntType),
        TypeId::Varchar => TypeInstance::Varchar(VarcharType),
    }
}

/// 64-bit signed integer handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BigIntType;

impl Type for BigIntType {
    /// Little-endian 8-byte encoding of the integer.
    #[inline]
    fn data<'a>(&self, value: &'a Value) -> Result<Cow<'a, [u8]>, ValueError> {
        let v = value.get_as::<i64>()?;
        Ok(Cow::Owned(v.to_le_bytes().to_vec()))
    }

    #[inline]
    fn storage_size(&self, value: &Value) -> u32 {
        value.declared_size()
    }
}

/// Variable-length byte string handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VarcharType;

impl Type for VarcharType {
    #[inline]
    fn data<'a>(&self, value: &'a Value) -> Result<Cow<'a, [u8]>, ValueError> {
        value.get_as::<&[u8]>().map(Cow::Borrowed)
    }

    #[inline]
    fn storage_size(&self, value: &Value) -> u32 {
        value.declared_size()
    }
}
