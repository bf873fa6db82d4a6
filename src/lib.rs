//! `stats-hyperloglog` estimates the number of distinct values in a column or stream
//! for query planner statistics, where exact distinct counts are too expensive to maintain.
//!
//! Values are tagged (`BigInt` or `Varchar`), hashed into 64-bit hashes and fed into a
//! HyperLogLog register array which can be shared between threads.
//!
//! ```
//! use stats_hyperloglog::HyperLogLog;
//!
//! let hll = HyperLogLog::<str>::new(10).unwrap();
//! hll.add_elem("a").unwrap();
//! hll.add_elem("b").unwrap();
//! let estimate = hll.compute_cardinality();
//! assert_eq!(hll.cardinality(), estimate);
//! ```
pub mod error;
pub mod hash;
pub mod hyperloglog;
pub mod types;
pub mod value;

pub use error::{HyperLogLogError, ValueError};
pub use hash::{hash, hash_bytes, hash_value, HashT};
pub use hyperloglog::HyperLogLog;
pub use value::{ToValue, TypeId, Value};
