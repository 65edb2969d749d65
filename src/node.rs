//! `Node`: one AIG vertex, owned exclusively by `Mgr`'s arena.
use crate::handle::Handle;

/// Index into `Mgr`'s node arena. `var_id == index` is an invariant
/// maintained by `Mgr::new_node`, so a `NodeRef` doubles as the node's SAT
/// variable id.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef(pub(crate) u32);

impl NodeRef {
    /// Position of the referenced node in `Mgr`'s arena, for indexing into
    /// `Mgr::node`.
    pub fn index(&self) -> usize { self.0 as usize }
}

impl std::fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

#[derive(Clone, Copy, Debug)]
pub enum NodeKind {
    Input(u32),
    And(Handle, Handle),
}

/// One vertex of the FRAIG. Never destroyed individually; the whole `Mgr`
/// is the unit of deallocation.
pub struct Node {
    var_id: u32,
    kind: NodeKind,
    /// bit-packed simulation vector, one `u64` per 64-pattern batch.
    sim_pat: Vec<u64>,
    val0_seen: bool,
    val1_seen: bool,
    sim_hash: u64,
    sim_hash_inv: bool,
    /// representative of this node's equivalence class, if proved distinct
    /// from self.
    rep: Rep,
}

/// Resolution target recorded once a node is proven redundant. Kept as an
/// explicit enum rather than a nullable node pointer the way `FraigNode`
/// stores it -- there, `mRepNode == nullptr` means both "constant" and "no
/// rep set yet", and nothing else on the node disambiguates the two once a
/// node has been inserted into `StructHash` before its constancy is known.
/// Separating `Constant` out removes that ambiguity rather than relying on
/// call-order to avoid tripping it.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Rep {
    /// No rep set: this node is its own representative so far.
    SelfRep,
    /// Proved equivalent (up to the carried polarity) to another node.
    Node(NodeRef, bool),
    /// Proved constant; `true` is constant-1, `false` is constant-0.
    Constant(bool),
}

impl Node {
    pub(crate) fn new_input(var_id: u32, input_id: u32, pat_size: usize) -> Self {
        Node {
            var_id,
            kind: NodeKind::Input(input_id),
            sim_pat: Vec::with_capacity(pat_size),
            val0_seen: false,
            val1_seen: false,
            sim_hash: 0,
            sim_hash_inv: false,
            rep: Rep::SelfRep,
        }
    }

    pub(crate) fn new_and(var_id: u32, fanin0: Handle, fanin1: Handle, pat_size: usize) -> Self {
        Node {
            var_id,
            kind: NodeKind::And(fanin0, fanin1),
            sim_pat: Vec::with_capacity(pat_size),
            val0_seen: false,
            val1_seen: false,
            sim_hash: 0,
            sim_hash_inv: false,
            rep: Rep::SelfRep,
        }
    }

    pub fn var_id(&self) -> u32 { self.var_id }
    pub fn kind(&self) -> &NodeKind { &self.kind }
    pub fn is_input(&self) -> bool { matches!(self.kind, NodeKind::Input(_)) }
    pub fn is_and(&self) -> bool { matches!(self.kind, NodeKind::And(..)) }

    pub fn input_id(&self) -> Option<u32> {
        match self.kind { NodeKind::Input(id) => Some(id), NodeKind::And(..) => None }
    }

    pub fn fanin(&self, pos: usize) -> Handle {
        match self.kind {
            NodeKind::And(f0, f1) => if pos == 0 { f0 } else { f1 },
            NodeKind::Input(_) => panic!("fanin() called on an input node"),
        }
    }

    pub fn val0_seen(&self) -> bool { self.val0_seen }
    pub fn val1_seen(&self) -> bool { self.val1_seen }
    pub fn sim_hash(&self) -> u64 { self.sim_hash }
    pub fn sim_hash_inv(&self) -> bool { self.sim_hash_inv }
    pub fn sim_pat(&self) -> &[u64] { &self.sim_pat }

    pub(crate) fn rep(&self) -> Rep { self.rep }
    pub(crate) fn set_rep(&mut self, rep: NodeRef, inv: bool) {
        self.rep = Rep::Node(rep, inv);
    }

    /// Marks this node as provably constant. `inv == false` means constant
    /// 0, `inv == true` means constant 1. Unlike `set_rep` there is no node
    /// to point to, so `rep_handle` resolution has to terminate here rather
    /// than keep walking -- `Rep::Constant` carries that directly instead of
    /// relying on a null rep pointer to mean both "constant" and "unset".
    pub(crate) fn latch_constant(&mut self, inv: bool) {
        self.rep = Rep::Constant(inv);
    }

    pub(crate) fn push_pattern_word(&mut self, word: u64) {
        self.sim_pat.push(word);
        self.update_seen_from(word);
    }

    pub(crate) fn overwrite_pattern_word(&mut self, idx: usize, word: u64) {
        self.sim_pat[idx] = word;
        self.update_seen_from(word);
    }

    fn update_seen_from(&mut self, word: u64) {
        if word != u64::MAX { self.val0_seen = true; }
        if word != 0 { self.val1_seen = true; }
    }

    /// Recomputes `sim_hash`/`sim_hash_inv` by folding every simulation word
    /// recorded so far, canonicalizing so that two nodes whose signatures
    /// are bitwise complements of one another hash identically but with
    /// opposite `sim_hash_inv`.
    ///
    /// Canonicalization looks at bit 0 of the first pattern word, not at the
    /// folded hash: if it's set, the node's own polarity is taken as the
    /// "negative" one and every word is complemented before folding. Two
    /// nodes whose words are complements of each other always disagree on
    /// that leading bit, so exactly one of them complements -- both end up
    /// folding the identical underlying word sequence, with the flag
    /// recording which one did the complementing. A fold defined directly
    /// on the running hash (e.g. picking `min(h, !h)`) can't give this
    /// guarantee for every pattern count, since XOR- and Horner-style folds
    /// only invert under a full-word complement when the word count is odd.
    pub(crate) fn recompute_sim_hash(&mut self) {
        let canon_inv = self.sim_pat.first().is_some_and(|w| w & 1 != 0);
        let mut h: u64 = 0;
        for &w in &self.sim_pat {
            let w = if canon_inv { !w } else { w };
            h = h.wrapping_mul(1_000_003).wrapping_add(w);
        }
        self.sim_hash = h;
        self.sim_hash_inv = canon_inv;
    }

    /// Computes `sim_pat[start..end]` for an AND node from its fanins'
    /// patterns, specialized over the four fanin-polarity combinations the
    /// way `FraigNode::calc_pat` unrolls them in the original C++.
    pub(crate) fn calc_pat_and(
        &mut self,
        start: usize,
        end: usize,
        fanin0_inv: bool,
        fanin1_inv: bool,
        src0: &[u64],
        src1: &[u64],
    ) {
        debug_assert_eq!(self.sim_pat.len(), start);
        for i in start..end {
            let a = src0[i];
            let b = src1[i];
            let word = match (fanin0_inv, fanin1_inv) {
                (false, false) => a & b,
                (false, true) => a & !b,
                (true, false) => !a & b,
                (true, true) => !(a | b),
            };
            self.push_pattern_word(word);
        }
        self.recompute_sim_hash();
    }

    pub(crate) fn overwrite_pat_and(
        &mut self,
        idx: usize,
        fanin0_inv: bool,
        fanin1_inv: bool,
        src0: u64,
        src1: u64,
    ) {
        let word = match (fanin0_inv, fanin1_inv) {
            (false, false) => src0 & src1,
            (false, true) => src0 & !src1,
            (true, false) => !src0 & src1,
            (true, true) => !(src0 | src1),
        };
        self.overwrite_pattern_word(idx, word);
        self.recompute_sim_hash();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_truth_table_over_polarities() {
        let mut n = Node::new_and(2, Handle::zero(), Handle::zero(), 1);
        // a=0b1010, b=0b1100 as single-bit-per-lane toy patterns
        let a = 0b1010u64;
        let b = 0b1100u64;
        n.calc_pat_and(0, 1, false, false, &[a], &[b]);
        assert_eq!(n.sim_pat()[0], a & b);

        let mut n2 = Node::new_and(3, Handle::zero(), Handle::zero(), 1);
        n2.calc_pat_and(0, 1, true, false, &[a], &[b]);
        assert_eq!(n2.sim_pat()[0], !a & b);
    }

    #[test]
    fn sim_hash_is_complement_symmetric() {
        let mut n1 = Node::new_input(0, 0, 2);
        let mut n2 = Node::new_input(1, 1, 2);
        n1.push_pattern_word(0xAAAA_5555_0F0F_00FFu64);
        n1.push_pattern_word(0x1234_5678_9ABC_DEF0u64);
        n2.push_pattern_word(!0xAAAA_5555_0F0F_00FFu64);
        n2.push_pattern_word(!0x1234_5678_9ABC_DEF0u64);
        n1.recompute_sim_hash();
        n2.recompute_sim_hash();
        // n2's pattern is the exact bitwise complement of n1's at every
        // word, so they must canonicalize to the same sim_hash with
        // opposite sim_hash_inv.
        assert_eq!(n1.sim_hash(), n2.sim_hash());
        assert_ne!(n1.sim_hash_inv(), n2.sim_hash_inv());
    }
}
