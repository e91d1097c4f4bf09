use planarc::{Link, Point};

/// A candidate structural match produced by selection.
///
/// A match either decomposes into the points it would attach at, or is a
/// point itself (any clonable point is its own candidate via the blanket
/// impl). The first point is the representative used for planarity checks.
pub trait Candidate<P> {
    /// Constituent points, representative first. Empty when the match
    /// carries no point payload.
    fn points(&self) -> Vec<P>;
}

impl<P: Clone> Candidate<P> for P {
    fn points(&self) -> Vec<P> {
        vec![self.clone()]
    }
}

/// Capability surface of one construction stage.
///
/// Stages compose by delegation rather than inheritance: a stage may hold a
/// boxed next stage, consult it first, and then apply its own policy to the
/// result. [`crate::PlanarPolicy`] implements this trait so it can wrap any
/// other stage or be wrapped itself.
pub trait Stage<P: Point> {
    /// Connector-like query used to look up candidate matches.
    type Query;
    /// Structural match handed back by selection.
    type Match: Candidate<P>;

    /// Drops per-session state and returns the stage to idle.
    fn reset(&mut self);

    /// Registers the points a construction session starts from.
    fn add_roots(&mut self, roots: &[P]);

    /// Next unexplored root, when the stage tracks any.
    fn next_root(&mut self) -> Option<P>;

    /// Points the given connector could attach to.
    fn joints(&mut self, query: &Self::Query) -> Vec<P>;

    /// Picks a match for `query` to connect onto `from`, or `None` when the
    /// stage has no acceptable candidate.
    fn select(&mut self, from: &Self::Match, query: &Self::Query) -> Option<Self::Match>;

    /// Materializes an accepted connection between two points.
    fn make_link(&mut self, v: &P, w: &P) -> Option<Link<P>>;
}
