//! Edges of the AIG: a node reference plus an inversion bit.
use std::fmt;
use crate::node::NodeRef;

/// A `Handle` is what every public `Mgr` operation passes around: it names
/// an AIG node (or nothing, for a constant) together with the polarity the
/// caller wants to see it in. Two handles are `==` only if they name the
/// same node under the same polarity -- see `Mgr::check_equiv` for whether
/// two *different* handles compute the same function.
///
/// Constants are `node: None`; `inv` then picks ZERO (`false`) or ONE
/// (`true`). This is the explicit-struct alternative to the packed-pointer
/// trick the original C++ `FraigHandle` uses (see DESIGN.md).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    node: Option<NodeRef>,
    inv: bool,
}

impl Handle {
    pub(crate) fn new(node: NodeRef, inv: bool) -> Self {
        Handle { node: Some(node), inv }
    }

    /// The constant-0 handle.
    pub fn zero() -> Self { Handle { node: None, inv: false } }
    /// The constant-1 handle.
    pub fn one() -> Self { Handle { node: None, inv: true } }

    pub fn is_zero(&self) -> bool { self.node.is_none() && !self.inv }
    pub fn is_one(&self) -> bool { self.node.is_none() && self.inv }
    pub fn is_const(&self) -> bool { self.node.is_none() }

    pub fn inv(&self) -> bool { self.inv }
    pub(crate) fn node_ref(&self) -> Option<NodeRef> { self.node }

    /// `var_id` of the constant is conventionally `-1` so that the
    /// `make_and` normalization step (§4.7 step 2: "if h1.var_id <
    /// h2.var_id swap them") always keeps a constant, if present, in the
    /// second slot -- though `make_and`'s trivial shortcuts actually catch
    /// constants before normalization ever runs.
    pub(crate) fn var_id_or(&self, var_id_of: impl FnOnce(NodeRef) -> u32) -> i64 {
        match self.node {
            Some(n) => var_id_of(n) as i64,
            None => -1,
        }
    }
}

impl std::ops::Not for Handle {
    type Output = Handle;
    fn not(self) -> Handle { Handle { node: self.node, inv: !self.inv } }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() { write!(f, "ZERO") }
        else if self.is_one() { write!(f, "ONE") }
        else {
            if self.inv { write!(f, "~")?; }
            write!(f, "{:?}", self.node.unwrap())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_are_distinct_and_self_inverse() {
        assert_ne!(Handle::zero(), Handle::one());
        assert_eq!(!Handle::zero(), Handle::one());
        assert_eq!(!Handle::one(), Handle::zero());
        assert!(Handle::zero().is_const());
        assert!(Handle::one().is_const());
    }

    #[test]
    fn double_negation_is_identity() {
        let h = Handle::zero();
        assert_eq!(!(!h), h);
    }
}
