#![forbid(unsafe_code)]

//! Planarity bookkeeping over a linear point order.
//!
//! Given a total order on opaque points, this crate tracks the undirected
//! links accepted so far and answers, incrementally, whether the link set
//! can be drawn above the order without any two links crossing. This is the
//! classical constraint used when generating word-order-respecting
//! dependency structures: drawn as arcs above a sentence, no arc may cross
//! another.
//!
//! Design goals:
//! - links are addressed by point identity, so permuting the order (as the
//!   reordering heuristic does) can never silently rebind a link
//! - position-dependent queries report missing points as explicit errors
//! - deterministic, testable audits; crossing minimization is a bounded
//!   local search, not an optimality claim

mod arrangement;
pub mod cross;
pub mod error;
pub mod optimize;

pub use arrangement::{Arrangement, ArrangementOptions, Link, Point};
pub use error::{Error, Result};
pub use optimize::{OptimizeOutcome, optimize_sequence};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
