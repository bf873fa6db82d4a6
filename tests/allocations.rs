#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use stats_hyperloglog::HyperLogLog;

/// Run `f` under a fresh heap profiler and return `(total_bytes, total_blocks)`.
fn measure_allocations(f: impl FnOnce()) -> (u64, u64) {
    let _profiler = dhat::Profiler::builder().testing().build();
    f();
    let stats = dhat::HeapStats::get();
    (stats.total_bytes, stats.total_blocks)
}

#[test]
fn test_allocations() {
    // register logging callsites outside of measurements
    let hll = HyperLogLog::<i64>::new(12).unwrap();
    hll.compute_cardinality();

    // registers are a single byte-per-bucket block
    for n_bits in [0, 4, 10, 14, 16] {
        let (bytes, blocks) = measure_allocations(|| {
            let hll = HyperLogLog::<i64>::new(n_bits).unwrap();
            assert_eq!(hll.num_buckets(), 1 << n_bits);
        });
        assert_eq!((bytes, blocks), (1 << n_bits, 1), "n_bits = {n_bits}");
    }

    // integer elements are hashed without touching the heap
    let (bytes, blocks) = measure_allocations(|| {
        for i in 0..10_000 {
            hll.add_elem(&i).unwrap();
        }
        hll.compute_cardinality();
    });
    assert_eq!((bytes, blocks), (0, 0));
}
