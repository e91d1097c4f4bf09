use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

use crate::cross;
use crate::error::{Error, Result};

/// Identity of a point in the arrangement.
///
/// Points are opaque to this crate: they are ordered, indexed, and compared,
/// never inspected. Any clonable, hashable, totally ordered type qualifies.
pub trait Point: Clone + Eq + Hash + Ord {}

impl<T: Clone + Eq + Hash + Ord> Point for T {}

/// An accepted undirected link between two points.
///
/// Stored by point identity; positions are resolved against the current
/// sequence only when a crossing test needs them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Link<P> {
    pub v: P,
    pub w: P,
}

impl<P> Link<P> {
    pub fn new(v: P, w: P) -> Self {
        Self { v, w }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrangementOptions {
    /// Admit a pair that is already stored (in either orientation) as a
    /// second entry. When off, such an admission is an ordinary rejection.
    pub allow_duplicate_links: bool,
}

impl Default for ArrangementOptions {
    fn default() -> Self {
        Self {
            allow_duplicate_links: true,
        }
    }
}

/// A linear arrangement of points plus the links accepted over it.
///
/// The sequence holds distinct points; the position index always mirrors it
/// and is rebuilt in full whenever the sequence is replaced or permuted.
/// The sequence itself only ever grows by [`Arrangement::append_point`] or
/// gets permuted by [`crate::optimize::optimize_sequence`].
#[derive(Debug, Clone)]
pub struct Arrangement<P: Point> {
    options: ArrangementOptions,
    sequence: Vec<P>,
    positions: FxHashMap<P, usize>,
    links: Vec<Link<P>>,
}

impl<P: Point> Default for Arrangement<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Point> Arrangement<P> {
    pub fn new() -> Self {
        Self::with_options(ArrangementOptions::default())
    }

    pub fn with_options(options: ArrangementOptions) -> Self {
        Self {
            options,
            sequence: Vec::new(),
            positions: FxHashMap::default(),
            links: Vec::new(),
        }
    }

    pub fn options(&self) -> ArrangementOptions {
        self.options
    }

    /// Empties the sequence, the position index, and the link set.
    ///
    /// Any sequence copy or position held elsewhere is stale afterwards.
    pub fn clear(&mut self) {
        self.sequence.clear();
        self.positions.clear();
        self.links.clear();
    }

    /// Replaces the sequence wholesale and rebuilds the position index.
    ///
    /// All existing links are discarded: a new order invalidates every prior
    /// crossing computation, so links cannot be carried over. The caller
    /// must not pass duplicate points; if it does, the index keeps the last
    /// occurrence.
    pub fn set_sequence(&mut self, sequence: Vec<P>) {
        self.sequence = sequence;
        self.rebuild_positions();
        self.links.clear();
    }

    /// Appends one new point to the end of the sequence and returns its
    /// position. A point already present is rejected and nothing changes.
    pub fn append_point(&mut self, point: P) -> Result<usize> {
        if self.positions.contains_key(&point) {
            return Err(Error::PointAlreadyPresent);
        }
        let position = self.sequence.len();
        self.positions.insert(point.clone(), position);
        self.sequence.push(point);
        Ok(position)
    }

    pub fn has_point(&self, point: &P) -> bool {
        self.positions.contains_key(point)
    }

    /// Position of `point` in the sequence, or `None` when absent.
    pub fn position_of(&self, point: &P) -> Option<usize> {
        self.positions.get(point).copied()
    }

    pub fn sequence(&self) -> &[P] {
        &self.sequence
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn links(&self) -> &[Link<P>] {
        &self.links
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn has_link(&self, v: &P, w: &P) -> bool {
        self.links
            .iter()
            .any(|l| (l.v == *v && l.w == *w) || (l.v == *w && l.w == *v))
    }

    /// Whether adding the link `(v, w)` would keep the current link set
    /// planar.
    ///
    /// Both points must already be in the sequence; a missing point is
    /// reported as [`Error::PointNotInSequence`], never coerced to `false`.
    /// The scan rejects on the first crossing found.
    pub fn is_planar_link(&self, v: &P, w: &P) -> Result<bool> {
        let a = self.resolve(v)?;
        let b = self.resolve(w)?;
        let planar = !self.links.iter().any(|link| {
            cross::links_cross(a, b, self.resolve_stored(&link.v), self.resolve_stored(&link.w))
        });
        Ok(planar)
    }

    /// Checks planarity and, only if the link keeps the set planar, stores
    /// it. `Ok(true)` means stored; `Ok(false)` means rejected (a crossing,
    /// a self-loop, or a duplicate while duplicates are disallowed) with
    /// state unchanged.
    pub fn add_link(&mut self, v: &P, w: &P) -> Result<bool> {
        if !self.is_planar_link(v, w)? {
            return Ok(false);
        }
        self.admit(v, w)
    }

    /// Stores the link without the crossing test.
    ///
    /// Membership, self-loop, and duplicate validation still apply. This is
    /// the bypass used by lenient construction policies so the audit
    /// operations keep describing the graph actually built.
    pub fn force_add_link(&mut self, v: &P, w: &P) -> Result<bool> {
        self.admit(v, w)
    }

    fn admit(&mut self, v: &P, w: &P) -> Result<bool> {
        self.resolve(v)?;
        self.resolve(w)?;
        if v == w {
            return Ok(false);
        }
        if !self.options.allow_duplicate_links && self.has_link(v, w) {
            return Ok(false);
        }
        self.links.push(Link::new(v.clone(), w.clone()));
        Ok(true)
    }

    /// Removes every stored entry matching the pair in either orientation.
    /// Silent no-op when nothing matches.
    pub fn remove_link(&mut self, v: &P, w: &P) {
        self.links
            .retain(|l| !((l.v == *v && l.w == *w) || (l.v == *w && l.w == *v)));
    }

    /// Audits the entire link set pairwise for crossings.
    pub fn is_planar(&self) -> bool {
        let resolved = self.resolved_links();
        for i in 0..resolved.len() {
            for j in (i + 1)..resolved.len() {
                let (i1, j1) = resolved[i];
                let (i2, j2) = resolved[j];
                if cross::links_cross(i1, j1, i2, j2) {
                    return false;
                }
            }
        }
        true
    }

    /// Number of crossing link pairs in the current set.
    pub fn crossing_count(&self) -> usize {
        cross::count_crossings(&self.resolved_links())
    }

    /// The deduplicated links participating in at least one crossing, each
    /// normalized so `v` is the endpoint at the smaller position.
    pub fn crossing_links(&self) -> Vec<Link<P>> {
        let resolved = self.resolved_links();
        let mut out: Vec<Link<P>> = Vec::new();
        for i in 0..resolved.len() {
            for j in (i + 1)..resolved.len() {
                let (i1, j1) = resolved[i];
                let (i2, j2) = resolved[j];
                if cross::links_cross(i1, j1, i2, j2) {
                    out.push(self.normalized_by_position(&self.links[i]));
                    out.push(self.normalized_by_position(&self.links[j]));
                }
            }
        }
        out.sort();
        out.dedup();
        out
    }

    /// Swaps the points at positions `i` and `i + 1` and rebuilds the index.
    pub(crate) fn swap_adjacent(&mut self, i: usize) {
        self.sequence.swap(i, i + 1);
        self.rebuild_positions();
    }

    fn rebuild_positions(&mut self) {
        self.positions.clear();
        for (i, point) in self.sequence.iter().enumerate() {
            self.positions.insert(point.clone(), i);
        }
    }

    fn resolve(&self, point: &P) -> Result<usize> {
        self.positions
            .get(point)
            .copied()
            .ok_or(Error::PointNotInSequence)
    }

    fn resolve_stored(&self, point: &P) -> usize {
        *self
            .positions
            .get(point)
            .expect("stored link endpoint missing from position index")
    }

    fn resolved_links(&self) -> Vec<(usize, usize)> {
        self.links
            .iter()
            .map(|l| (self.resolve_stored(&l.v), self.resolve_stored(&l.w)))
            .collect()
    }

    fn normalized_by_position(&self, link: &Link<P>) -> Link<P> {
        if self.resolve_stored(&link.v) <= self.resolve_stored(&link.w) {
            link.clone()
        } else {
            Link::new(link.w.clone(), link.v.clone())
        }
    }
}

impl<P: Point + fmt::Debug> fmt::Display for Arrangement<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "sequence ({} points): {:?}", self.sequence.len(), self.sequence)?;
        writeln!(f, "links ({}): {:?}", self.links.len(), self.links)?;
        write!(
            f,
            "crossings: {} (planar: {})",
            self.crossing_count(),
            if self.is_planar() { "yes" } else { "no" }
        )
    }
}
