//! Hashing of values into 64-bit hashes consumed by `HyperLogLog`.
//!
//! All hashes are built on [`hash_bytes`], a rotate-xor fold seeded with the
//! input length. Fixed-size scalars are hashed through their little-endian
//! byte encoding, byte strings are hashed directly.

use crate::error::ValueError;
use crate::value::{TypeId, Value};

/// Hash of a single value.
pub type HashT = u64;

/// Hash byte sequence.
///
/// Each byte is sign-extended before being folded in, so bytes above `0x7f`
/// set all high bits of the intermediate hash.
#[inline]
pub fn hash_bytes(bytes: &[u8]) -> HashT {
    bytes.iter().fold(bytes.len() as HashT, |hash, &b| {
        ((hash << 5) ^ (hash >> 27)) ^ (b as i8 as HashT)
    })
}

/// Fixed-size scalar with a stable byte encoding.
pub trait FixedBytes: Copy {
    type Bytes: AsRef<[u8]>;

    fn fixed_bytes(self) -> Self::Bytes;
}

macro_rules! impl_fixed_bytes {
    ($($t:ty),*) => {
        $(
            impl FixedBytes for $t {
                type Bytes = [u8; std::mem::size_of::<$t>()];

                #[inline]
                fn fixed_bytes(self) -> Self::Bytes {
                    self.to_le_bytes()
                }
            }
        )*
    };
}

impl_fixed_bytes!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

impl FixedBytes for bool {
    type Bytes = [u8; 1];

    #[inline]
    fn fixed_bytes(self) -> Self::Bytes {
        [u8::from(self)]
    }
}

/// Hash fixed-size scalar through its little-endian encoding.
#[inline]
pub fn hash<T: FixedBytes>(val: T) -> HashT {
    hash_bytes(val.fixed_bytes().as_ref())
}

/// Hash `Value` according to its type.
pub fn hash_value(value: &Value) -> Result<HashT, ValueError> {
    match value.type_id() {
        TypeId::BigInt => Ok(hash(value.get_as::<i64>()?)),
        TypeId::Varchar => {
            let raw = value.data()?;
            let len = (value.storage_size() as usize).min(raw.len());
            Ok(hash_bytes(&raw[..len]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(b"" => 0)]
    #[test_case(b"a" => 0x41)]
    #[test_case(b"\xff" => 0xffff_ffff_ffff_ffdf; "sign extended byte")]
    #[test_case(b"key0" => 0x0074_1b10)]
    #[test_case(b"hello" => 0x0cb3_3def)]
    fn test_hash_bytes(bytes: &[u8]) -> HashT {
        hash_bytes(bytes)
    }

    #[test_case(0 => 0x0800_0000_0800)]
    #[test_case(1 => 0x0808_0000_0808)]
    #[test_case(-1 => 0xfe00_77e7_fff0_77ff)]
    #[test_case(12345 => 0x09c4_0000_0804)]
    fn test_hash_i64(v: i64) -> HashT {
        hash(v)
    }

    #[test]
    fn test_hash_is_order_sensitive() {
        assert_ne!(hash_bytes(b"ab"), hash_bytes(b"ba"));
    }

    #[test]
    fn test_hash_value_matches_type_data() {
        for v in [0, 1, -1, 12345, i64::MAX, i64::MIN] {
            let value = Value::new_bigint(v);
            let data = value.data().unwrap();
            assert_eq!(hash_value(&value), Ok(hash_bytes(&data)));
            assert_eq!(hash_value(&value), Ok(hash(v)));
        }

        let value = Value::new_varchar("key0");
        assert_eq!(hash_value(&value), Ok(hash_bytes(b"key0")));
    }

    #[test]
    fn test_hash_value_is_pure() {
        let values = [Value::new_bigint(42), Value::new_varchar("forty two")];
        for value in &values {
            assert_eq!(hash_value(value), hash_value(value));
        }
    }

    #[test]
    fn test_hash_scalars() {
        assert_eq!(hash(true), hash_bytes(&[1]));
        assert_eq!(hash(7u16), hash_bytes(&[7, 0]));
        assert_eq!(hash(1.0f64), hash_bytes(&1.0f64.to_le_bytes()));
    }
}
