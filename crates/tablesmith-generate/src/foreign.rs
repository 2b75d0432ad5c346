use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::value::Value;

/// Primary-key pools published by generated tables, scoped to one run.
///
/// Each pool is written exactly once, after its table's rows are complete,
/// and read only by tables generated later in the same run.
#[derive(Debug, Default)]
pub struct KeyPools {
    pools: BTreeMap<String, Vec<Value>>,
}

impl KeyPools {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the primary-key values generated for `table`.
    pub fn publish(&mut self, table: &str, values: Vec<Value>) {
        self.pools.insert(table.to_string(), values);
    }

    /// Draw one value uniformly at random, with replacement.
    ///
    /// Returns `None` when the table has not published a pool (or published
    /// an empty one) — the caller turns that into an unresolved-reference
    /// error.
    pub fn pick(&self, table: &str, rng: &mut impl Rng) -> Option<Value> {
        self.pools.get(table)?.choose(rng).cloned()
    }

    /// The published pool for a table, if any.
    pub fn values(&self, table: &str) -> Option<&[Value]> {
        self.pools.get(table).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn pick_draws_from_published_pool() {
        let mut pools = KeyPools::new();
        pools.publish("users", vec![Value::Int(1), Value::Int(2), Value::Int(3)]);

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..20 {
            let value = pools.pick("users", &mut rng).unwrap();
            assert!(matches!(value, Value::Int(1..=3)));
        }
    }

    #[test]
    fn pick_from_missing_or_empty_pool_is_none() {
        let mut pools = KeyPools::new();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert!(pools.pick("users", &mut rng).is_none());

        pools.publish("users", Vec::new());
        assert!(pools.pick("users", &mut rng).is_none());
    }
}
