//! A functionally reduced AND-inverter graph (FRAIG) manager for
//! combinational equivalence checking: build an AIG through `Mgr`'s
//! `make_*` constructors, and every node that the structural-hash,
//! simulation, and SAT-backed equivalence passes can resolve to an
//! existing one is folded into it instead of allocated again.

#![allow(clippy::many_single_char_names)]

#[macro_use] extern crate log;
extern crate fxhash;
extern crate rand;
extern crate simplelog;
extern crate varisat;

/// Handles into the graph: an optional node reference plus an inversion bit.
pub mod handle;
/// AIG vertices (inputs and AND gates) owned by `Mgr`'s arena.
pub mod node;

/// Structural-hash table: canonicalizes AND nodes by their exact fanin pair.
pub(crate) mod struct_hash;
/// Pattern-hash table: buckets nodes by simulation signature.
pub(crate) mod pat_hash;
/// Random-pattern simulation and counter-example absorption.
pub mod sim;
/// Incremental SAT-backed constancy/equivalence discharge.
pub mod sat;

/// In-memory Boolean-expression combinator tree consumed by `Mgr::make_expr`.
pub mod expr;
/// Gate-kind contract for converting an external netlist representation
/// into `Mgr` primitives.
pub mod adapter;

/// The FRAIG manager itself.
pub mod mgr;

pub use expr::Expr;
pub use handle::Handle;
pub use mgr::Mgr;
pub use node::{Node, NodeKind, NodeRef};
pub use sat::{Sat3, SatConfig, SatStat};
pub use sim::SimConfig;
