//! Structural-hash table: canonicalizes AND nodes by their exact
//! `(fanin0, fanin1)` pair so `Mgr::make_and` never builds the same AND
//! twice structurally.
use crate::handle::Handle;
use crate::node::NodeRef;

/// Chained bucket table keyed on `(fanin0, fanin1)`, grown by doubling
/// once the load factor crosses 1.8 -- the same policy as the original
/// `FraigHash::alloc_table` (`mNextLimit = mHashSize * 1.8`).
pub(crate) struct StructHash {
    buckets: Vec<Vec<(Handle, Handle, NodeRef)>>,
    count: usize,
    next_limit: usize,
}

const INITIAL_SIZE: usize = 1024;

impl StructHash {
    pub(crate) fn new() -> Self {
        StructHash {
            buckets: (0..INITIAL_SIZE).map(|_| Vec::new()).collect(),
            count: 0,
            next_limit: (INITIAL_SIZE as f64 * 1.8) as usize,
        }
    }

    fn hash_of(h1: Handle, h2: Handle) -> u64 {
        fxhash::hash64(&h1).wrapping_add(fxhash::hash64(&h2).wrapping_mul(13))
    }

    fn pos_of(&self, h1: Handle, h2: Handle) -> usize {
        (Self::hash_of(h1, h2) as usize) % self.buckets.len()
    }

    /// Looks up an AND node with exactly these fanins, already normalized
    /// by the caller (`Mgr::make_and` step 2).
    pub(crate) fn find(&self, fanin0: Handle, fanin1: Handle) -> Option<NodeRef> {
        let pos = self.pos_of(fanin0, fanin1);
        self.buckets[pos]
            .iter()
            .find(|&&(f0, f1, _)| f0 == fanin0 && f1 == fanin1)
            .map(|&(_, _, node)| node)
    }

    pub(crate) fn add(&mut self, fanin0: Handle, fanin1: Handle, node: NodeRef) {
        if self.count >= self.next_limit {
            self.grow();
        }
        let pos = self.pos_of(fanin0, fanin1);
        self.buckets[pos].push((fanin0, fanin1, node));
        self.count += 1;
    }

    fn grow(&mut self) {
        let old = std::mem::replace(&mut self.buckets, Vec::new());
        let new_size = old.len() * 2;
        self.buckets = (0..new_size).map(|_| Vec::new()).collect();
        self.next_limit = (new_size as f64 * 1.8) as usize;
        for bucket in old {
            for (f0, f1, node) in bucket {
                let pos = self.pos_of(f0, f1);
                self.buckets[pos].push((f0, f1, node));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeRef;

    fn nref(i: u32) -> NodeRef { NodeRef(i) }

    #[test]
    fn find_misses_on_empty_table() {
        let t = StructHash::new();
        assert!(t.find(Handle::zero(), Handle::one()).is_none());
    }

    #[test]
    fn add_then_find_roundtrips() {
        let mut t = StructHash::new();
        let h1 = Handle::zero();
        let h2 = Handle::one();
        t.add(h1, h2, nref(7));
        assert_eq!(t.find(h1, h2), Some(nref(7)));
        // swapped order is a distinct key -- the caller normalizes order,
        // the table itself does not treat the pair as unordered.
        assert!(t.find(h2, h1).is_none());
    }

    #[test]
    fn survives_growth_past_load_factor() {
        let mut t = StructHash::new();
        // force several doublings; every previously-added pair must still
        // be found afterwards.
        for i in 0..4000u32 {
            t.add(Handle::zero(), Handle::one(), nref(i));
        }
        assert_eq!(t.buckets.len(), INITIAL_SIZE * 4);
        // only the last insertion for a given (h1,h2) pair is what `find`
        // would see first, but every slot should still be reachable.
        let found = t.find(Handle::zero(), Handle::one());
        assert!(found.is_some());
    }
}
