//! Bridges an external gate-level netlist representation into `Mgr`
//! primitives, the way `Bn2FraigConv::node2handle` walks a `BnNode`'s
//! logic-type switch assuming its fanins are already converted. This
//! module owns no netlist IR of its own -- callers walk their own graph
//! and call `convert_gate` once per node, in fanin-before-fanout order.
use crate::expr::Expr;
use crate::handle::Handle;
use crate::mgr::Mgr;

/// Mirrors `BnLogicType`'s gate-kind switch. `fanin_handles` passed to
/// `convert_gate` are always already-built handles, matching
/// `node2handle`'s "fanin side is assumed already fraig'd" invariant.
#[derive(Clone, Debug)]
pub enum GateKind {
    Const0,
    Const1,
    Buff,
    Not,
    And,
    Nand,
    Or,
    Nor,
    Xor,
    Xnor,
    /// Arbitrary combinator tree over the fanins -- `kBnLt_EXPR`.
    Expr(Expr),
    /// Truth table over `fanin_handles`, one bit per minterm index (bit 0
    /// of the index is fanin 0). `kBnLt_TV` is left genuinely unimplemented
    /// in the original gate-kind switch; expanded here into a
    /// sum-of-products over `Mgr::make_expr` instead of left unhandled.
    TruthTable(Vec<bool>),
}

/// Builds the handle for one gate from its already-converted fanin
/// handles -- `Bn2FraigConv::node2handle`'s logic-type switch.
pub fn convert_gate(mgr: &mut Mgr, kind: &GateKind, fanin_handles: &[Handle]) -> Handle {
    match kind {
        GateKind::Const0 => mgr.make_zero(),
        GateKind::Const1 => mgr.make_one(),
        GateKind::Buff => fanin_handles[0],
        GateKind::Not => !fanin_handles[0],
        GateKind::And => mgr.make_and_many(fanin_handles),
        GateKind::Nand => !mgr.make_and_many(fanin_handles),
        GateKind::Or => mgr.make_or_many(fanin_handles),
        GateKind::Nor => !mgr.make_or_many(fanin_handles),
        GateKind::Xor => mgr.make_xor_many(fanin_handles),
        GateKind::Xnor => !mgr.make_xor_many(fanin_handles),
        GateKind::Expr(expr) => mgr.make_expr(expr, fanin_handles),
        GateKind::TruthTable(table) => build_truth_table(mgr, table, fanin_handles),
    }
}

fn build_truth_table(mgr: &mut Mgr, table: &[bool], fanin_handles: &[Handle]) -> Handle {
    let ni = fanin_handles.len();
    assert_eq!(table.len(), 1usize << ni, "truth table length must be 2^fanin_num");
    if ni == 0 {
        return if table[0] { mgr.make_one() } else { mgr.make_zero() };
    }
    let minterms: Vec<Expr> = (0..table.len())
        .filter(|&m| table[m])
        .map(|m| {
            let literals: Vec<Expr> = (0..ni)
                .map(|b| if (m >> b) & 1 == 1 { Expr::literal(b) } else { Expr::not_literal(b) })
                .collect();
            Expr::and(literals)
        })
        .collect();
    if minterms.is_empty() {
        return mgr.make_zero();
    }
    let sop = Expr::or(minterms);
    mgr.make_expr(&sop, fanin_handles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::SatConfig;
    use crate::sim::SimConfig;

    fn new_mgr() -> Mgr {
        Mgr::new(SimConfig::default(), SatConfig::default())
    }

    #[test]
    fn buff_and_not_pass_through_fanin() {
        let mut mgr = new_mgr();
        let a = mgr.make_input();
        assert_eq!(convert_gate(&mut mgr, &GateKind::Buff, &[a]), a);
        assert_eq!(convert_gate(&mut mgr, &GateKind::Not, &[a]), !a);
    }

    #[test]
    fn and_gate_matches_make_and_many() {
        let mut mgr = new_mgr();
        let a = mgr.make_input();
        let b = mgr.make_input();
        let via_adapter = convert_gate(&mut mgr, &GateKind::And, &[a, b]);
        let direct = mgr.make_and(a, b);
        assert_eq!(mgr.check_equiv(via_adapter, direct), crate::sat::Sat3::True);
    }

    #[test]
    fn truth_table_reproduces_and_gate() {
        let mut mgr = new_mgr();
        let a = mgr.make_input();
        let b = mgr.make_input();
        // index bit0=a, bit1=b; only both-true (index 3) is on.
        let table = vec![false, false, false, true];
        let via_tv = convert_gate(&mut mgr, &GateKind::TruthTable(table), &[a, b]);
        let direct = mgr.make_and(a, b);
        assert_eq!(mgr.check_equiv(via_tv, direct), crate::sat::Sat3::True);
    }

    #[test]
    fn constant_zero_truth_table_is_zero() {
        let mut mgr = new_mgr();
        let a = mgr.make_input();
        let table = vec![false, false];
        let h = convert_gate(&mut mgr, &GateKind::TruthTable(table), &[a]);
        assert!(h.is_zero());
    }
}
