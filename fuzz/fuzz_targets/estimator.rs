#![no_main]

use libfuzzer_sys::fuzz_target;
use stats_hyperloglog::{HyperLogLog, Value};

fuzz_target!(|data: &[u8]| {
    let Some((&n_bits, rest)) = data.split_first() else {
        return;
    };
    let n_bits = i16::from(n_bits % 20);

    let hll = HyperLogLog::<Value>::new(n_bits).unwrap();
    for chunk in rest.chunks(8) {
        let value = match <[u8; 8]>::try_from(chunk) {
            Ok(bytes) => Value::new_bigint(i64::from_le_bytes(bytes)),
            Err(_) => Value::new_varchar_bytes(chunk),
        };
        hll.add_elem(&value).unwrap();
    }

    let registers = hll.registers();
    assert_eq!(registers.len() as u64, hll.num_buckets());
    let max_rank = 65 - n_bits as u8;
    assert!(registers.iter().all(|&r| r <= max_rank));

    let estimate = hll.compute_cardinality();
    assert_eq!(hll.cardinality(), estimate);
});
