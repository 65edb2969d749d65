//! A small Boolean-expression tree consumed by `Mgr::make_expr` --
//! mirrors `ym::Expr`'s leaf/AND/OR/XOR shape as seen from
//! `FraigMgr::make_expr`, rather than inventing a different AST.
//! There is no parser for any on-disk expression syntax here -- this is
//! purely an in-memory combinator tree callers build by hand.

/// Leaf or internal node of a Boolean expression over a fixed set of
/// named inputs (by index into the `inputs` slice `Mgr::make_expr`
/// takes).
#[derive(Clone, Debug)]
pub enum Expr {
    Zero,
    One,
    /// A non-inverted reference to `inputs[_]`.
    PosiLiteral(usize),
    /// An inverted reference to `inputs[_]`.
    NegaLiteral(usize),
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Xor(Vec<Expr>),
}

impl Expr {
    pub fn zero() -> Self { Expr::Zero }
    pub fn one() -> Self { Expr::One }
    pub fn literal(input_id: usize) -> Self { Expr::PosiLiteral(input_id) }
    pub fn not_literal(input_id: usize) -> Self { Expr::NegaLiteral(input_id) }

    /// Builds an `And`/`Or`/`Xor` node, asserting the arity the original
    /// `make_expr`/`_make_and`/`_make_xor` dispatch always assumes (at
    /// least one child; a single child degenerates to an identity, which
    /// `Mgr::make_expr` still handles correctly).
    pub fn and(children: Vec<Expr>) -> Self {
        assert!(!children.is_empty(), "Expr::and needs at least one child");
        Expr::And(children)
    }
    pub fn or(children: Vec<Expr>) -> Self {
        assert!(!children.is_empty(), "Expr::or needs at least one child");
        Expr::Or(children)
    }
    pub fn xor(children: Vec<Expr>) -> Self {
        assert!(!children.is_empty(), "Expr::xor needs at least one child");
        Expr::Xor(children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_build_expected_shapes() {
        assert!(matches!(Expr::literal(3), Expr::PosiLiteral(3)));
        assert!(matches!(Expr::not_literal(3), Expr::NegaLiteral(3)));
        let tree = Expr::and(vec![Expr::literal(0), Expr::literal(1)]);
        match tree {
            Expr::And(children) => assert_eq!(children.len(), 2),
            _ => panic!("expected And"),
        }
    }

    #[test]
    #[should_panic]
    fn and_rejects_empty_children() {
        Expr::and(vec![]);
    }
}
