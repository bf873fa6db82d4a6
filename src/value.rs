//! Immutable typed values consumed by the estimator.
//!
//! A `Value` carries a type id, exactly one payload matching that id and a
//! declared storage size. Per-type behaviour (raw bytes, storage size) lives in
//! [`crate::types`] and is selected by the type id.

use std::borrow::Cow;

use crate::error::ValueError;
use crate::types::{type_instance, Type};

/// Type tag of a `Value`.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeId {
    BigInt = 0,
    Varchar = 1,
}

impl TryFrom<i32> for TypeId {
    type Error = ValueError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(TypeId::BigInt),
            1 => Ok(TypeId::Varchar),
            _ => Err(ValueError::UnsupportedType(code)),
        }
    }
}

impl From<TypeId> for i32 {
    fn from(type_id: TypeId) -> Self {
        type_id as i32
    }
}

/// Payload of a `Value`, always matching its `TypeId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Val {
    BigInt(i64),
    VarLen(Box<[u8]>),
}

/// Immutable tagged value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Value {
    type_id: TypeId,
    val: Val,
    /// Declared storage size. Left at zero for `BigInt` values.
    length: u32,
}

impl Value {
    /// Create new `BigInt` value.
    #[inline]
    pub fn new_bigint(v: i64) -> Self {
        Self {
            type_id: TypeId::BigInt,
            val: Val::BigInt(v),
            length: 0,
        }
    }

    /// Create new `Varchar` value from a string.
    #[inline]
    pub fn new_varchar(v: &str) -> Self {
        Self::new_varchar_bytes(v.as_bytes())
    }

    /// Create new `Varchar` value from raw bytes.
    ///
    /// The declared size saturates at `u32::MAX`, so payloads longer than 4 GiB
    /// keep all their bytes but only the first `u32::MAX` of them are hashed.
    pub fn new_varchar_bytes(v: impl Into<Box<[u8]>>) -> Self {
        let bytes = v.into();
        let length = declared_length(bytes.len());
        Self {
            type_id: TypeId::Varchar,
            val: Val::VarLen(bytes),
            length,
        }
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Storage size reported by the value's type.
    #[inline]
    pub fn storage_size(&self) -> u32 {
        type_instance(self.type_id).storage_size(self)
    }

    /// Raw bytes reported by the value's type.
    #[inline]
    pub fn data(&self) -> Result<Cow<'_, [u8]>, ValueError> {
        type_instance(self.type_id).data(self)
    }

    /// Declared size exactly as stored on the value.
    #[inline]
    pub(crate) fn declared_size(&self) -> u32 {
        self.length
    }

    /// Read the payload as `T`, failing if `T` does not match the type id.
    pub fn get_as<'a, T: FromValue<'a>>(&'a self) -> Result<T, ValueError> {
        T::from_value(self).ok_or(ValueError::TypeMismatch {
            type_id: self.type_id,
            expected: T::NAME,
        })
    }
}

/// Storage size declared for a payload of `len` bytes, saturating at `u32::MAX`.
#[inline]
fn declared_length(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

/// Typed read access to a `Value` payload.
pub trait FromValue<'a>: Sized {
    const NAME: &'static str;

    fn from_value(value: &'a Value) -> Option<Self>;
}

impl<'a> FromValue<'a> for i64 {
    const NAME: &'static str = "i64";

    #[inline]
    fn from_value(value: &'a Value) -> Option<Self> {
        match (value.type_id, &value.val) {
            (TypeId::BigInt, Val::BigInt(v)) => Some(*v),
            _ => None,
        }
    }
}

impl<'a> FromValue<'a> for &'a [u8] {
    const NAME: &'static str = "[u8]";

    #[inline]
    fn from_value(value: &'a Value) -> Option<Self> {
        match (value.type_id, &value.val) {
            (TypeId::Varchar, Val::VarLen(v)) => Some(&v[..]),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::new_bigint(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::new_varchar(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::new_varchar_bytes(v.into_bytes())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::new_varchar_bytes(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::new_varchar_bytes(v)
    }
}

/// Conversion of an element into a `Value` before it is hashed.
///
/// Engines embedding the estimator implement this for their own datum types;
/// a failed conversion aborts the insertion of that element. Byte payloads are
/// hashed up to their declared size, see [`Value::new_varchar_bytes`].
pub trait ToValue {
    fn to_value(&self) -> Result<Cow<'_, Value>, ValueError>;
}

impl ToValue for Value {
    #[inline]
    fn to_value(&self) -> Result<Cow<'_, Value>, ValueError> {
        Ok(Cow::Borrowed(self))
    }
}

impl ToValue for i64 {
    #[inline]
    fn to_value(&self) -> Result<Cow<'_, Value>, ValueError> {
        Ok(Cow::Owned(Value::new_bigint(*self)))
    }
}

impl ToValue for str {
    #[inline]
    fn to_value(&self) -> Result<Cow<'_, Value>, ValueError> {
        Ok(Cow::Owned(Value::new_varchar(self)))
    }
}

impl ToValue for String {
    #[inline]
    fn to_value(&self) -> Result<Cow<'_, Value>, ValueError> {
        self.as_str().to_value()
    }
}

impl ToValue for [u8] {
    #[inline]
    fn to_value(&self) -> Result<Cow<'_, Value>, ValueError> {
        Ok(Cow::Owned(Value::new_varchar_bytes(self)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0 => Ok(TypeId::BigInt))]
    #[test_case(1 => Ok(TypeId::Varchar))]
    #[test_case(2 => Err(ValueError::UnsupportedType(2)))]
    #[test_case(-1 => Err(ValueError::UnsupportedType(-1)))]
    fn test_type_id_from_code(code: i32) -> Result<TypeId, ValueError> {
        TypeId::try_from(code)
    }

    #[test]
    fn test_storage_size() {
        assert_eq!(Value::new_varchar("").storage_size(), 0);
        assert_eq!(Value::new_varchar("hello").storage_size(), 5);
        assert_eq!(Value::new_varchar("héllo").storage_size(), 6);
        // BigInt values never populate their declared size.
        assert_eq!(Value::new_bigint(12345).storage_size(), 0);
        assert_eq!(Value::new_bigint(i64::MIN).storage_size(), 0);
    }

    #[test_case(0 => 0)]
    #[test_case(5 => 5)]
    #[test_case(u32::MAX as usize => u32::MAX)]
    #[test_case(usize::MAX => u32::MAX)]
    fn test_declared_length(len: usize) -> u32 {
        declared_length(len)
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_declared_length_saturates_past_4_gib() {
        assert_eq!(declared_length(u32::MAX as usize + 1), u32::MAX);
        assert_eq!(declared_length(1 << 40), u32::MAX);
    }

    #[test]
    fn test_get_as() {
        let int = Value::new_bigint(-7);
        assert_eq!(int.get_as::<i64>(), Ok(-7));
        assert_eq!(
            int.get_as::<&[u8]>(),
            Err(ValueError::TypeMismatch {
                type_id: TypeId::BigInt,
                expected: "[u8]",
            })
        );

        let text = Value::new_varchar("abc");
        assert_eq!(text.get_as::<&[u8]>(), Ok(&b"abc"[..]));
        assert!(text.get_as::<i64>().is_err());
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Value::from(5i64), Value::new_bigint(5));
        assert_eq!(Value::from("x"), Value::new_varchar("x"));
        assert_eq!(Value::from(String::from("x")), Value::new_varchar("x"));
        assert_eq!(Value::from(&b"x"[..]), Value::new_varchar("x"));
        assert_eq!(Value::from(vec![b'x']), Value::new_varchar("x"));
        assert_eq!(i32::from(TypeId::Varchar), 1);
    }

    #[test]
    fn test_to_value() {
        let value = Value::new_varchar("borrowed");
        assert!(matches!(value.to_value(), Ok(Cow::Borrowed(_))));
        assert_eq!(42i64.to_value().unwrap().as_ref(), &Value::new_bigint(42));
        assert_eq!("k".to_value().unwrap().type_id(), TypeId::Varchar);
        assert_eq!(b"k"[..].to_value().unwrap().storage_size(), 1);
    }
}
