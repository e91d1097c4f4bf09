#![forbid(unsafe_code)]

//! Planarity-enforcing policy for incremental graph construction.
//!
//! [`PlanarPolicy`] sits between a construction driver and a
//! [`planarc::Arrangement`]: it keeps every point a proposal touches in the
//! linear order, decides whether a proposed connection is accepted, rejected,
//! or allowed with a recorded violation, and re-optimizes the order after
//! link growth. Construction stages compose by delegation: the policy can
//! wrap another [`Stage`] or run standalone against a [`Dictionary`].

mod dictionary;
mod policy;
mod stage;

pub use dictionary::{Dictionary, MapDictionary};
pub use policy::{PlanarPolicy, PolicyOptions, SessionState};
pub use stage::{Candidate, Stage};
