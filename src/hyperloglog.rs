//! ## HyperLogLog estimator
//! Estimates number of distinct values added to it using `M = 2^n_bits` registers.
//!
//! Every element is converted into a `Value` and hashed into a 64-bit hash `H`:
//! - bits `63..64-n_bits` of `H` (most significant first) select the register;
//! - the remaining `w = 64 - n_bits` low bits give the rank, the 1-based position
//!   of their leftmost set bit, or `w + 1` when all of them are zero.
//!
//! Each register keeps the maximum rank seen for its bucket. The estimate is
//! `ALPHA * M^2 / sum(2^-register)` with a fixed `ALPHA` for every `M` and
//! without small or large range corrections, so it differs from canonical
//! HyperLogLog: an empty estimator reports roughly `ALPHA * M`, and large
//! cardinalities come out about 10% high.
//!
//! [Original HyperLogLog paper](https://algo.inria.fr/flajolet/Publications/FlFuGaMe07.pdf)
//!
//! ## Concurrency
//! All methods take `&self`. Hashing happens outside of the register lock, only
//! the register max-update is serialized. `compute_cardinality` holds the lock
//! for the whole scan and therefore sees a consistent snapshot.

use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::{debug, error, warn};

use crate::error::{HyperLogLogError, ValueError};
use crate::hash::{hash_value, HashT};
use crate::value::{ToValue, Value};

/// Number of bits in a hash
pub const BITSET_CAPACITY: i16 = 64;
/// Cardinality constant used for every number of registers
pub const ALPHA: f64 = 0.79402;
/// Bucket bits used by `HyperLogLog::default`
pub const DEFAULT_N_BITS: i16 = 12;

/// Approximate distinct counter over elements of type `T`.
pub struct HyperLogLog<T: ToValue + ?Sized = Value> {
    /// Number of bits used for register indices
    n_bits: u32,
    /// Number of registers, `2^n_bits`
    num_buckets: u64,
    /// Maximum rank observed per bucket
    registers: Mutex<Box<[u8]>>,
    /// Last computed estimate
    cardinality: AtomicU64,
    _phantom: PhantomData<fn(&T)>,
}

impl<T: ToValue + ?Sized> HyperLogLog<T> {
    /// Create new `HyperLogLog` with `2^n_bits` zeroed registers.
    ///
    /// Fails for `n_bits` outside of `[0, 64)` and when the register array
    /// cannot be allocated.
    pub fn new(n_bits: i16) -> Result<Self, HyperLogLogError> {
        if !(0..BITSET_CAPACITY).contains(&n_bits) {
            return Err(HyperLogLogError::InvalidBits(n_bits));
        }
        let buckets = 1u64 << n_bits;
        let len = usize::try_from(buckets).map_err(|_| HyperLogLogError::Allocation { buckets })?;

        let mut registers = Vec::new();
        registers
            .try_reserve_exact(len)
            .map_err(|_| HyperLogLogError::Allocation { buckets })?;
        registers.resize(len, 0);

        debug!(n_bits, buckets, "created hyperloglog");
        Ok(Self::from_registers(registers))
    }

    /// Create `HyperLogLog` owning given registers, their count must be a power of two.
    #[inline]
    fn from_registers(registers: Vec<u8>) -> Self {
        let registers = registers.into_boxed_slice();
        let num_buckets = registers.len() as u64;
        Self {
            n_bits: num_buckets.trailing_zeros(),
            num_buckets,
            registers: Mutex::new(registers),
            cardinality: AtomicU64::new(0),
            _phantom: PhantomData,
        }
    }

    /// Number of bits used for register indices
    #[inline]
    pub fn n_bits(&self) -> u32 {
        self.n_bits
    }

    /// Number of registers
    #[inline]
    pub fn num_buckets(&self) -> u64 {
        self.num_buckets
    }

    /// Return the estimate stored by the last `compute_cardinality` call, `0` if never computed.
    #[inline]
    pub fn cardinality(&self) -> u64 {
        self.cardinality.load(Ordering::Acquire)
    }

    /// Add element to `HyperLogLog`.
    ///
    /// An element which cannot be converted or hashed is not counted and the
    /// error is returned to the caller.
    pub fn add_elem(&self, item: &T) -> Result<(), HyperLogLogError> {
        let hash = self.calculate_hash(item).map_err(|err| {
            error!(%err, "failed to hash element");
            err
        })?;
        self.add_hash(hash);
        Ok(())
    }

    /// Hash element through its `Value`
    #[inline]
    pub fn calculate_hash(&self, item: &T) -> Result<HashT, ValueError> {
        let value = item.to_value()?;
        hash_value(&value)
    }

    /// Add precomputed hash to `HyperLogLog`
    #[inline]
    pub fn add_hash(&self, hash: HashT) {
        let bucket_index = self.bucket_index(hash);
        let p_value = self.position_of_leftmost_one(hash) + 1;
        self.update_bucket(bucket_index, p_value);
    }

    /// Return register index given by the top `n_bits` bits of `hash`.
    #[inline]
    pub fn bucket_index(&self, hash: HashT) -> u64 {
        if self.n_bits == 0 {
            return 0;
        }
        hash >> (u64::BITS - self.n_bits)
    }

    /// Return number of leading zeros within the low `64 - n_bits` bits of `hash`.
    ///
    /// Equals `64 - n_bits` when all of these bits are zero.
    #[inline]
    pub fn position_of_leftmost_one(&self, hash: HashT) -> u64 {
        let w = u64::BITS - self.n_bits;
        let low = if w == u64::BITS {
            hash
        } else {
            hash & ((1 << w) - 1)
        };
        u64::from(low.leading_zeros() - self.n_bits)
    }

    /// Raise register `bucket_index` to `p_value` if it is currently lower.
    #[inline]
    fn update_bucket(&self, bucket_index: u64, p_value: u64) {
        // rank never exceeds 65
        let p_value = p_value as u8;
        let mut registers = self.registers.lock();
        let register = usize::try_from(bucket_index)
            .ok()
            .and_then(|idx| registers.get_mut(idx));
        match register {
            Some(register) if p_value > *register => *register = p_value,
            Some(_) => {}
            None => warn!(bucket_index, buckets = self.num_buckets, "ignoring out of range bucket"),
        }
    }

    /// Compute cardinality estimate from current registers, store and return it.
    pub fn compute_cardinality(&self) -> u64 {
        let registers = self.registers.lock();
        let sum: f64 = registers
            .iter()
            .map(|&r| 1.0 / 2f64.powi(i32::from(r)))
            .sum();
        let m = self.num_buckets as f64;
        let cardinality = (ALPHA * m * m / sum) as u64;
        self.cardinality.store(cardinality, Ordering::Release);
        drop(registers);

        debug!(buckets = self.num_buckets, cardinality, "computed cardinality");
        cardinality
    }

    /// Return copy of current registers
    pub fn registers(&self) -> Vec<u8> {
        self.registers.lock().to_vec()
    }
}

impl<T: ToValue + ?Sized> Default for HyperLogLog<T> {
    fn default() -> Self {
        Self::from_registers(vec![0; 1 << DEFAULT_N_BITS])
    }
}

impl<T: ToValue + ?Sized> Debug for HyperLogLog<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ n_bits: {}, buckets: {}, cardinality: {} }}",
            self.n_bits,
            self.num_buckets,
            self.cardinality()
        )
    }
}
