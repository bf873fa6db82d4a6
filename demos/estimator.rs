use stats_hyperloglog::{HyperLogLog, Value};

fn main() {
    let ids = HyperLogLog::<i64>::new(10).unwrap();
    for i in 0..10_000 {
        ids.add_elem(&(i % 2500)).unwrap();
    }
    println!("ids estimate = {}", ids.compute_cardinality());

    let mixed = HyperLogLog::<Value>::new(10).unwrap();
    for value in [
        Value::new_bigint(1),
        Value::new_varchar("one"),
        Value::new_varchar("one"),
        Value::new_bigint(2),
    ] {
        mixed.add_elem(&value).unwrap();
    }
    println!("mixed estimate = {}", mixed.compute_cardinality());
    println!("last estimate = {}", mixed.cardinality());
}
