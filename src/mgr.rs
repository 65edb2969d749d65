//! `Mgr`: the FRAIG manager. Owns the node arena and orchestrates
//! structural hashing, simulation, and SAT-backed equivalence discharge
//! behind the small set of `make_*`/`check_equiv` entry points.
use std::io::Write;
use std::sync::Once;

use simplelog::{Config, LevelFilter, TermLogger, WriteLogger};

use crate::expr::Expr;
use crate::handle::Handle;
use crate::node::{Node, NodeKind, NodeRef, Rep};
use crate::pat_hash::PatHash;
use crate::sat::{Sat3, SatConfig, SatProver, SatStat};
use crate::sim::{SimConfig, SimEngine};
use crate::struct_hash::StructHash;

/// `log`/`simplelog` allow installing the global logger exactly once per
/// process; `set_loglevel`/`set_logstream` both route through this guard
/// rather than panicking on a second call, the way the C++ original's
/// `mLogStream`/`mLogLevel` fields tolerate being set repeatedly.
static LOGGER_INSTALLED: Once = Once::new();

fn level_filter_of(level: i32) -> LevelFilter {
    match level {
        i32::MIN..=0 => LevelFilter::Off,
        1 => LevelFilter::Error,
        2 => LevelFilter::Warn,
        3 => LevelFilter::Info,
        4 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub struct Mgr {
    nodes: Vec<Node>,
    input_nodes: Vec<NodeRef>,
    struct_hash: StructHash,
    pat_hash: PatHash,
    sim: SimEngine,
    sat: SatProver,
    loop_limit: u32,
    log_level: i32,
}

impl Mgr {
    pub fn new(sim_cfg: SimConfig, sat_cfg: SatConfig) -> Self {
        Mgr {
            nodes: Vec::new(),
            input_nodes: Vec::new(),
            struct_hash: StructHash::new(),
            pat_hash: PatHash::new(),
            sim: SimEngine::new(&sim_cfg),
            sat: SatProver::new(&sat_cfg),
            loop_limit: 1000,
            log_level: 0,
        }
    }

    // ---- introspection ----------------------------------------------

    pub fn input_num(&self) -> usize { self.input_nodes.len() }
    pub fn input_node(&self, pos: usize) -> NodeRef { self.input_nodes[pos] }
    pub fn node_num(&self) -> usize { self.nodes.len() }
    pub fn node(&self, pos: usize) -> &Node { &self.nodes[pos] }

    /// Sets the verbosity of `trace!`/`debug!`/`info!` calls made from
    /// `make_and`/`check_equiv`/the SAT wrapper, installing a `simplelog`
    /// terminal logger on first use.
    pub fn set_loglevel(&mut self, level: i32) {
        self.log_level = level;
        LOGGER_INSTALLED.call_once(|| {
            let _ = TermLogger::init(level_filter_of(level), Config::default());
        });
    }

    /// Redirects logging to an arbitrary writer instead of the terminal
    /// (e.g. a log file). Like `set_loglevel`, only the first call across
    /// the process actually installs a logger; `log`/`simplelog` provide
    /// no way to swap the global logger out afterward.
    pub fn set_logstream<W: Write + Send + 'static>(&mut self, stream: W) {
        let level = self.log_level;
        LOGGER_INSTALLED.call_once(|| {
            let _ = WriteLogger::init(level_filter_of(level), Config::default(), stream);
        });
    }

    pub fn set_loop_limit(&mut self, limit: u32) { self.loop_limit = limit; }

    pub fn check_const_stat(&self) -> SatStat { self.sat.check_const_stat() }
    pub fn check_equiv_stat(&self) -> SatStat { self.sat.check_equiv_stat() }

    /// Logs both histograms at `info!` -- `FraigMgrImpl::dump_stats`.
    pub fn dump_stats(&self) {
        let c = self.check_const_stat();
        let e = self.check_equiv_stat();
        info!(
            "check_const: {} success / {} failure / {} abort",
            c.success.count, c.failure.count, c.abort.count
        );
        info!(
            "check_equiv: {} success / {} failure / {} abort",
            e.success.count, e.failure.count, e.abort.count
        );
    }

    // ---- node arena ----------------------------------------------------

    fn new_node(&mut self, kind: NodeKind) -> NodeRef {
        let var_id = self.sat.new_var();
        debug_assert_eq!(var_id as usize, self.nodes.len());
        let pat_used = self.sim.pat_used();
        let node = match kind {
            NodeKind::Input(id) => Node::new_input(var_id, id, pat_used),
            NodeKind::And(f0, f1) => Node::new_and(var_id, f0, f1, pat_used),
        };
        let r = NodeRef(var_id);
        self.nodes.push(node);
        r
    }

    fn node_mut(&mut self, r: NodeRef) -> &mut Node { &mut self.nodes[r.index()] }

    fn handle_fanin_words(&self, h: Handle, idx: usize) -> u64 {
        match h.node_ref() {
            None => if h.inv() { u64::MAX } else { 0 },
            Some(r) => self.nodes[r.index()].sim_pat()[idx],
        }
    }

    /// Walks `rep` chains to the canonical representative of `h`'s node,
    /// accumulating inversion along the way -- `FraigHandle::rep_handle`.
    /// A `Rep::Constant` terminates the walk at `Handle::zero()`/`one()`
    /// rather than at a dead node, so a node discovered constant by one
    /// `make_and` call still resolves correctly when a later call reaches
    /// it through a structural-hash hit.
    pub fn rep_handle(&self, h: Handle) -> Handle {
        let mut cur = h;
        loop {
            let Some(r) = cur.node_ref() else { return cur };
            match self.nodes[r.index()].rep() {
                Rep::SelfRep => return cur,
                Rep::Constant(inv) => {
                    let value = cur.inv() ^ inv;
                    return if value { Handle::one() } else { Handle::zero() };
                }
                Rep::Node(rep, inv) => {
                    let new_inv = cur.inv() ^ inv;
                    cur = Handle::new(rep, new_inv);
                }
            }
        }
    }

    // ---- constant/input construction -----------------------------------

    pub fn make_zero(&self) -> Handle { Handle::zero() }
    pub fn make_one(&self) -> Handle { Handle::one() }

    pub fn make_input(&mut self) -> Handle {
        let input_id = self.input_nodes.len() as u32;
        let r = self.new_node(NodeKind::Input(input_id));
        self.input_nodes.push(r);
        let pattern = self.sim.random_initial_pattern();
        for word in pattern {
            self.node_mut(r).push_pattern_word(word);
        }
        self.node_mut(r).recompute_sim_hash();
        trace!("make_input -> {:?}", r);
        Handle::new(r, false)
    }

    // ---- make_and: the central operation -----------------------------

    pub fn make_and(&mut self, h1: Handle, h2: Handle) -> Handle {
        trace!("make_and({:?}, {:?})", h1, h2);

        // step 1: trivial shortcuts.
        if h1.is_zero() || h2.is_zero() { return Handle::zero(); }
        if h1.is_one() { return h2; }
        if h2.is_one() { return h1; }
        if h1 == h2 { return h1; }
        if h1.node_ref() == h2.node_ref() {
            // same node, opposite polarity (h1 == h2 already handled above)
            return Handle::zero();
        }

        // step 2: normalize by var_id so structural hashing is order-independent.
        let (h1, h2) = {
            let v1 = h1.var_id_or(|r| self.nodes[r.index()].var_id());
            let v2 = h2.var_id_or(|r| self.nodes[r.index()].var_id());
            if v1 < v2 { (h2, h1) } else { (h1, h2) }
        };

        // step 3: structural-hash probe.
        if let Some(existing) = self.struct_hash.find(h1, h2) {
            trace!("make_and struct-hash hit -> {:?}", existing);
            return self.rep_handle(Handle::new(existing, false));
        }

        // step 4: build the node and its simulation pattern.
        let node = self.new_node(NodeKind::And(h1, h2));
        self.recompute_full_pattern(node, h1, h2);
        self.struct_hash.add(h1, h2, node);

        // step 5: Tseitin-encode the gate.
        let (v1, inv1) = self.lit_of(h1);
        let (v2, inv2) = self.lit_of(h2);
        let out_var = self.nodes[node.index()].var_id();
        self.sat.add_and_clauses(out_var, v1, inv1, v2, inv2);

        // step 6: constancy check, absorbing any counter-examples.
        if let Some(constant) = self.verify_const(node) {
            return constant;
        }

        // step 7: pattern-hash probe with restart-on-absorption.
        'restart: loop {
            let n = &self.nodes[node.index()];
            let (sim_hash, sim_hash_inv) = (n.sim_hash(), n.sim_hash_inv());
            let candidates: Vec<NodeRef> = self.pat_hash.bucket(sim_hash).collect();
            for candidate in candidates {
                if candidate == node { continue; }
                let inv = self.nodes[candidate.index()].sim_hash_inv() ^ sim_hash_inv;
                if !self.compare_pat(candidate, node, inv) { continue; }
                let var1 = self.nodes[candidate.index()].var_id();
                let var2 = self.nodes[node.index()].var_id();
                match self.sat.check_equiv(var1, var2, inv) {
                    Sat3::True => {
                        self.node_mut(node).set_rep(candidate, inv);
                        return self.rep_handle(Handle::new(candidate, inv));
                    }
                    Sat3::False => {
                        self.absorb_counterexample(node);
                        continue 'restart;
                    }
                    Sat3::Unknown => {
                        debug!("make_and: check_equiv aborted, treating as distinct");
                        break;
                    }
                }
            }
            self.pat_hash.add(sim_hash, node);
            return Handle::new(node, false);
        }
    }

    fn lit_of(&self, h: Handle) -> (u32, bool) {
        match h.node_ref() {
            Some(r) => (self.nodes[r.index()].var_id(), h.inv()),
            None => unreachable!("constants are handled before make_and needs a literal"),
        }
    }

    fn recompute_full_pattern(&mut self, node: NodeRef, fanin0: Handle, fanin1: Handle) {
        let pat_used = self.sim.pat_used();
        let src0: Vec<u64> = (0..pat_used).map(|i| self.handle_fanin_words(fanin0, i)).collect();
        let src1: Vec<u64> = (0..pat_used).map(|i| self.handle_fanin_words(fanin1, i)).collect();
        self.node_mut(node).calc_pat_and(0, pat_used, fanin0.inv(), fanin1.inv(), &src0, &src1);
    }

    fn compare_pat(&self, node1: NodeRef, node2: NodeRef, inv: bool) -> bool {
        let p1 = self.nodes[node1.index()].sim_pat();
        let p2 = self.nodes[node2.index()].sim_pat();
        debug_assert_eq!(p1.len(), p2.len());
        if inv {
            p1.iter().zip(p2).all(|(&a, &b)| a == !b)
        } else {
            p1.iter().zip(p2).all(|(&a, &b)| a == b)
        }
    }

    /// Checks both constant-0 and constant-1, absorbing every
    /// counter-example SAT produces along the way -- `verify_const`.
    /// Returns the constant handle if one was proved.
    fn verify_const(&mut self, node: NodeRef) -> Option<Handle> {
        let var_id = self.nodes[node.index()].var_id();
        if !self.nodes[node.index()].val1_seen() {
            match self.sat.check_const(var_id, false) {
                Sat3::True => {
                    self.node_mut(node).latch_constant(false);
                    return Some(Handle::zero());
                }
                Sat3::False => self.absorb_counterexample(node),
                Sat3::Unknown => {}
            }
        }
        if !self.nodes[node.index()].val0_seen() {
            match self.sat.check_const(var_id, true) {
                Sat3::True => {
                    self.node_mut(node).latch_constant(true);
                    return Some(Handle::one());
                }
                Sat3::False => self.absorb_counterexample(node),
                Sat3::Unknown => {}
            }
        }
        None
    }

    /// Folds the last SAT model into every live node's simulation
    /// pattern, clearing and rebuilding the pattern-hash table since
    /// every `sim_hash` just changed -- `FraigMgrImpl::add_pat`.
    fn absorb_counterexample(&mut self, exclude: NodeRef) {
        if self.sim.needs_growth() {
            self.sim.double_capacity();
        }
        self.pat_hash.clear();
        let idx = self.sim.pat_used();
        for i in 0..self.nodes.len() {
            let r = NodeRef(i as u32);
            let kind = *self.nodes[i].kind();
            match kind {
                NodeKind::Input(_) => {
                    let var_id = self.nodes[i].var_id();
                    let model_bit = self.sat.model_bit(var_id);
                    let word = self.sim.biased_word(model_bit);
                    self.node_mut(r).push_pattern_word(word);
                    self.node_mut(r).recompute_sim_hash();
                }
                NodeKind::And(f0, f1) => {
                    let src0 = self.handle_fanin_words(f0, idx);
                    let src1 = self.handle_fanin_words(f1, idx);
                    self.node_mut(r).overwrite_pat_and(idx, f0.inv(), f1.inv(), src0, src1);
                }
            }
            if r != exclude {
                let n = &self.nodes[i];
                self.pat_hash.add(n.sim_hash(), r);
            }
        }
        self.sim.advance();
    }

    // ---- derived connectives -----------------------------------------

    pub fn make_or(&mut self, h1: Handle, h2: Handle) -> Handle {
        !self.make_and(!h1, !h2)
    }

    pub fn make_xor(&mut self, h1: Handle, h2: Handle) -> Handle {
        let t1 = self.make_and(h1, !h2);
        let t2 = self.make_and(!h1, h2);
        self.make_or(t1, t2)
    }

    /// Balanced binary-split reduction, never a left/right fold --
    /// `FraigMgr::_make_and`/`_make_xor`.
    pub fn make_and_many(&mut self, edges: &[Handle]) -> Handle {
        assert!(!edges.is_empty());
        self.make_and_many_range(edges, 0, edges.len(), false)
    }

    pub fn make_or_many(&mut self, edges: &[Handle]) -> Handle {
        assert!(!edges.is_empty());
        !self.make_and_many_range(edges, 0, edges.len(), true)
    }

    pub fn make_xor_many(&mut self, edges: &[Handle]) -> Handle {
        assert!(!edges.is_empty());
        self.make_xor_many_range(edges, 0, edges.len())
    }

    fn make_and_many_range(&mut self, edges: &[Handle], start: usize, end: usize, iinv: bool) -> Handle {
        let n = end - start;
        if n == 1 {
            let h = edges[start];
            return if iinv { !h } else { h };
        }
        let mid = start + (n + 1) / 2;
        let h0 = self.make_and_many_range(edges, start, mid, iinv);
        let h1 = self.make_and_many_range(edges, mid, end, iinv);
        self.make_and(h0, h1)
    }

    fn make_xor_many_range(&mut self, edges: &[Handle], start: usize, end: usize) -> Handle {
        let n = end - start;
        if n == 1 { return edges[start]; }
        let mid = start + (n + 1) / 2;
        let h0 = self.make_xor_many_range(edges, start, mid);
        let h1 = self.make_xor_many_range(edges, mid, end);
        self.make_xor(h0, h1)
    }

    // ---- combinator-tree and cofactor construction ---------------------

    pub fn make_expr(&mut self, expr: &Expr, inputs: &[Handle]) -> Handle {
        match expr {
            Expr::Zero => self.make_zero(),
            Expr::One => self.make_one(),
            Expr::PosiLiteral(id) => inputs[*id],
            Expr::NegaLiteral(id) => !inputs[*id],
            Expr::And(children) => {
                let edges: Vec<Handle> = children.iter().map(|c| self.make_expr(c, inputs)).collect();
                self.make_and_many(&edges)
            }
            Expr::Or(children) => {
                let edges: Vec<Handle> = children.iter().map(|c| self.make_expr(c, inputs)).collect();
                self.make_or_many(&edges)
            }
            Expr::Xor(children) => {
                let edges: Vec<Handle> = children.iter().map(|c| self.make_expr(c, inputs)).collect();
                self.make_xor_many(&edges)
            }
        }
    }

    /// Substitutes `edge`'s `input_id`-th input with the constant `inv`
    /// and rebuilds downstream -- `FraigMgr::make_cofactor`.
    pub fn make_cofactor(&mut self, edge: Handle, input_id: u32, inv: bool) -> Handle {
        if edge.is_const() { return edge; }
        let r = edge.node_ref().unwrap();
        let kind = *self.nodes[r.index()].kind();
        let ans = match kind {
            NodeKind::Input(id) => {
                if id == input_id {
                    if inv { self.make_zero() } else { self.make_one() }
                } else {
                    Handle::new(r, false)
                }
            }
            NodeKind::And(f0, f1) => {
                let h0 = self.make_cofactor(f0, input_id, inv);
                let h1 = self.make_cofactor(f1, input_id, inv);
                self.make_and(h0, h1)
            }
        };
        if edge.inv() { !ans } else { ans }
    }

    // ---- equivalence checking -------------------------------------------

    /// `h1 == h2` and either-constant short-circuits are resolved without
    /// a SAT call -- `FraigMgrImpl::check_equiv` (the handle overload).
    pub fn check_equiv(&mut self, h1: Handle, h2: Handle) -> Sat3 {
        if h1 == h2 { return Sat3::True; }
        if h1.node_ref() == h2.node_ref() {
            // same node, opposite polarity: never equal.
            return Sat3::False;
        }
        if h1.is_zero() { return self.check_const_of(h2, false); }
        if h1.is_one() { return self.check_const_of(h2, true); }
        if h2.is_zero() { return self.check_const_of(h1, false); }
        if h2.is_one() { return self.check_const_of(h1, true); }

        let var1 = self.lit_of(h1).0;
        let var2 = self.lit_of(h2).0;
        let inv = h1.inv() ^ h2.inv();
        self.sat.check_equiv(var1, var2, inv)
    }

    fn check_const_of(&mut self, h: Handle, target_one: bool) -> Sat3 {
        let (var, inv) = self.lit_of(h);
        let want_inv = inv ^ target_one;
        self.sat.check_const(var, want_inv)
    }
}

include!("test_fraig.rs");
