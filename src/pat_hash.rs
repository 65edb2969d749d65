//! Functional/pattern-hash table: buckets nodes by simulation signature
//! so `Mgr::make_and` can find a node that already computes the same (or
//! complementary) Boolean function, up to what simulation alone can tell.
//!
//! This table only holds bucket membership -- it does not itself decide
//! equality. The original `PatHash::find` interleaves the bucket walk
//! with SAT-backed comparisons and restarts the walk from the bucket head
//! whenever a comparison absorbs a counter-example (because absorption
//! changes every node's simulation pattern, and this table gets cleared
//! and rebuilt in response). That orchestration -- and the restart loop
//! -- lives in `Mgr::make_and`, which is the only place with access to
//! both the SAT prover and the whole node arena; this module just gives
//! it `bucket`/`add`/`clear`.
use crate::node::NodeRef;

pub(crate) struct PatHash {
    buckets: Vec<Vec<(u64, NodeRef)>>,
    count: usize,
    next_limit: usize,
}

const INITIAL_SIZE: usize = 1024;

impl PatHash {
    pub(crate) fn new() -> Self {
        PatHash {
            buckets: (0..INITIAL_SIZE).map(|_| Vec::new()).collect(),
            count: 0,
            next_limit: (INITIAL_SIZE as f64 * 1.8) as usize,
        }
    }

    fn pos_of(&self, sim_hash: u64) -> usize {
        (sim_hash as usize) % self.buckets.len()
    }

    /// Every node whose `sim_hash` mapped to this bucket -- the whole
    /// chain, unfiltered, exactly as `PatHash::find`'s `for (node1 = ...;
    /// node1; node1 = node1->mLink2)` walks it. The caller still has to
    /// run the real (cheap bitwise, then SAT) comparison per candidate.
    pub(crate) fn bucket(&self, sim_hash: u64) -> impl Iterator<Item = NodeRef> + '_ {
        let pos = self.pos_of(sim_hash);
        self.buckets[pos].iter().map(|&(_, node)| node)
    }

    pub(crate) fn add(&mut self, sim_hash: u64, node: NodeRef) {
        if self.count >= self.next_limit {
            self.grow();
        }
        let pos = self.pos_of(sim_hash);
        self.buckets[pos].push((sim_hash, node));
        self.count += 1;
    }

    fn grow(&mut self) {
        let old = std::mem::take(&mut self.buckets);
        let new_size = old.len() * 2;
        self.buckets = (0..new_size).map(|_| Vec::new()).collect();
        self.next_limit = (new_size as f64 * 1.8) as usize;
        for bucket in old {
            for (h, node) in bucket {
                let pos = (h as usize) % new_size;
                self.buckets[pos].push((h, node));
            }
        }
    }

    /// Drops every entry without shrinking the bucket array -- called by
    /// `Mgr` after absorbing a counter-example, since every live node's
    /// `sim_hash` just changed and has to be rebucketed from scratch
    /// (`FraigMgrImpl::add_pat`'s `mHashTable2.clear()`).
    pub(crate) fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeRef;

    fn nref(i: u32) -> NodeRef { NodeRef(i) }

    #[test]
    fn bucket_is_empty_until_added() {
        let t = PatHash::new();
        assert_eq!(t.bucket(42).count(), 0);
    }

    #[test]
    fn add_then_bucket_contains_it() {
        let mut t = PatHash::new();
        t.add(7, nref(1));
        t.add(7, nref(2));
        let found: Vec<_> = t.bucket(7).collect();
        assert_eq!(found, vec![nref(1), nref(2)]);
    }

    #[test]
    fn clear_empties_every_bucket_but_keeps_capacity() {
        let mut t = PatHash::new();
        for i in 0..10u64 {
            t.add(i, nref(i as u32));
        }
        t.clear();
        for i in 0..10u64 {
            assert_eq!(t.bucket(i).count(), 0);
        }
        // capacity (and thus the modulus used for bucketing) is unchanged
        assert_eq!(t.buckets.len(), INITIAL_SIZE);
    }

    #[test]
    fn grows_past_load_factor_and_keeps_entries_reachable() {
        let mut t = PatHash::new();
        for i in 0..2000u64 {
            t.add(i, nref(i as u32));
        }
        assert!(t.buckets.len() > INITIAL_SIZE);
        for i in 0..2000u64 {
            assert!(t.bucket(i).any(|n| n == nref(i as u32)));
        }
    }
}
