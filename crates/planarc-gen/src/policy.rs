use serde::{Deserialize, Serialize};

use planarc::{Arrangement, Link, Point, optimize_sequence};

use crate::dictionary::Dictionary;
use crate::stage::{Candidate, Stage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyOptions {
    /// Reject any connection that would cross an existing link. When off,
    /// the connection is allowed and the violation is recorded instead.
    pub strict_planarity: bool,
    /// Re-run the crossing-minimization heuristic after a link addition
    /// that leaves at least one crossing.
    pub auto_optimize: bool,
}

impl Default for PolicyOptions {
    fn default() -> Self {
        Self {
            strict_planarity: true,
            auto_optimize: true,
        }
    }
}

impl PolicyOptions {
    /// Reject would-be-crossing connections outright.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Allow would-be-crossing connections, recording each violation.
    pub fn lenient() -> Self {
        Self {
            strict_planarity: false,
            ..Self::default()
        }
    }
}

/// Where a construction session currently stands. A rejected proposal does
/// not leave `Building`; only [`PlanarPolicy::reset`] returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Building,
}

/// Planarity-enforcing construction stage.
///
/// Owns one [`Arrangement`] for the lifetime of a construction session and
/// mediates every proposed connection through it. Candidates come from a
/// wrapped delegate stage when one is configured, otherwise from the first
/// dictionary match. Points a proposal touches that are not yet in the
/// linear order are appended to its end.
pub struct PlanarPolicy<P: Point, Q, S: Candidate<P>> {
    delegate: Option<Box<dyn Stage<P, Query = Q, Match = S>>>,
    dictionary: Option<Box<dyn Dictionary<Q, S>>>,
    constraints: Arrangement<P>,
    sequence: Vec<P>,
    violations: Vec<Link<P>>,
    options: PolicyOptions,
    state: SessionState,
}

impl<P: Point, Q, S: Candidate<P>> PlanarPolicy<P, Q, S> {
    /// Wraps another construction stage (decorator usage).
    pub fn with_delegate(
        delegate: impl Stage<P, Query = Q, Match = S> + 'static,
        options: PolicyOptions,
    ) -> Self {
        Self {
            delegate: Some(Box::new(delegate)),
            dictionary: None,
            constraints: Arrangement::new(),
            sequence: Vec::new(),
            violations: Vec::new(),
            options,
            state: SessionState::Idle,
        }
    }

    /// Standalone usage against a dictionary of candidate matches.
    pub fn with_dictionary(
        dictionary: impl Dictionary<Q, S> + 'static,
        options: PolicyOptions,
    ) -> Self {
        Self {
            delegate: None,
            dictionary: Some(Box::new(dictionary)),
            constraints: Arrangement::new(),
            sequence: Vec::new(),
            violations: Vec::new(),
            options,
            state: SessionState::Idle,
        }
    }

    pub fn options(&self) -> PolicyOptions {
        self.options
    }

    pub fn set_options(&mut self, options: PolicyOptions) {
        self.options = options;
    }

    /// The owned constraint engine, for inspection only.
    pub fn constraints(&self) -> &Arrangement<P> {
        &self.constraints
    }

    /// The current linear order, the source of truth handed to the engine.
    pub fn sequence(&self) -> &[P] {
        &self.sequence
    }

    /// Lenient-mode allowances recorded so far, in the order they happened.
    /// This is an event log: a connection driven through both selection and
    /// link creation appears twice.
    pub fn violations(&self) -> &[Link<P>] {
        &self.violations
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Seeds the linear order (for language generation, the word order).
    /// Existing links are discarded along with the previous order.
    pub fn set_initial_sequence(&mut self, sequence: Vec<P>) {
        self.sequence = sequence.clone();
        self.constraints.set_sequence(sequence);
    }

    /// Drops all per-session state and returns to [`SessionState::Idle`].
    pub fn reset(&mut self) {
        self.constraints.clear();
        self.sequence.clear();
        self.violations.clear();
        self.state = SessionState::Idle;
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.reset();
        }
    }

    /// Ensures the given roots are in the linear order and forwards them to
    /// the delegate.
    pub fn add_roots(&mut self, roots: &[P]) {
        self.state = SessionState::Building;
        self.ensure_points(roots);
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.add_roots(roots);
        }
    }

    /// Next unexplored root. Standalone mode tracks none.
    pub fn next_root(&mut self) -> Option<P> {
        self.delegate.as_mut().and_then(|d| d.next_root())
    }

    /// Points the connector could attach to. Standalone mode knows none.
    pub fn joints(&mut self, query: &Q) -> Vec<P> {
        self.delegate
            .as_mut()
            .map(|d| d.joints(query))
            .unwrap_or_default()
    }

    /// Picks a candidate match for `query` to connect onto `from`.
    ///
    /// The delegate is consulted first; without one, the first dictionary
    /// match is taken. Every point on either side is ensured present in the
    /// order, then the implied connection between the two representative
    /// points is checked: a would-be crossing yields `None` in strict mode,
    /// or the candidate plus a recorded violation in lenient mode.
    pub fn select(&mut self, from: &S, query: &Q) -> Option<S> {
        self.state = SessionState::Building;

        let candidate = match self.delegate.as_mut() {
            Some(delegate) => delegate.select(from, query),
            None => self
                .dictionary
                .as_ref()
                .and_then(|dict| dict.matches(query).into_iter().next()),
        }?;

        let from_points = from.points();
        let to_points = candidate.points();
        self.ensure_points(&from_points);
        self.ensure_points(&to_points);

        if let (Some(v), Some(w)) = (from_points.first(), to_points.first()) {
            if !self.link_is_planar(v, w) {
                if self.options.strict_planarity {
                    tracing::debug!("rejecting selection: connection would cross an existing link");
                    return None;
                }
                tracing::warn!("allowing non-planar selection");
                self.violations.push(Link::new(v.clone(), w.clone()));
            }
        }

        Some(candidate)
    }

    /// Creates the link `(v, w)` under the configured policy.
    ///
    /// Endpoints are ensured present first. Self-loops are always rejected.
    /// A would-be crossing is rejected in strict mode; in lenient mode it is
    /// recorded and force-registered so the engine's audits keep describing
    /// the graph actually built. Accepted links are materialized by the
    /// delegate, or trivially standalone. If the delegate declines, the
    /// registration is kept; callers that need rollback use
    /// [`PlanarPolicy::remove_link`]. When auto-optimization is on and
    /// crossings remain, the order is re-optimized and the cached sequence
    /// refreshed.
    pub fn make_link(&mut self, v: &P, w: &P) -> Option<Link<P>> {
        self.state = SessionState::Building;
        self.ensure_point(v);
        self.ensure_point(w);

        if v == w {
            tracing::debug!("rejecting self-loop connection");
            return None;
        }

        let planar = self.link_is_planar(v, w);
        if !planar {
            if self.options.strict_planarity {
                tracing::warn!("cannot create non-planar link");
                return None;
            }
            tracing::warn!("creating non-planar link");
            self.violations.push(Link::new(v.clone(), w.clone()));
        }

        let registered = if planar {
            self.constraints.add_link(v, w)
        } else {
            self.constraints.force_add_link(v, w)
        };
        match registered {
            Ok(true) => {}
            Ok(false) => tracing::warn!("link admission refused by the arrangement"),
            Err(err) => tracing::warn!(%err, "failed to register link"),
        }

        let link = match self.delegate.as_mut() {
            Some(delegate) => {
                let made = delegate.make_link(v, w);
                if made.is_none() {
                    tracing::warn!("delegate declined to materialize link; registration kept");
                }
                made
            }
            None => Some(Link::new(v.clone(), w.clone())),
        };

        if self.options.auto_optimize && self.constraints.crossing_count() > 0 {
            let outcome = optimize_sequence(&mut self.constraints);
            self.sequence = self.constraints.sequence().to_vec();
            tracing::debug!(
                passes = outcome.passes,
                crossings = outcome.final_crossings,
                "re-optimized sequence after link growth"
            );
        }

        link
    }

    /// Unregisters a link from the constraint engine, in either orientation.
    /// The delegate is not notified; undoing materialization is its owner's
    /// business.
    pub fn remove_link(&mut self, v: &P, w: &P) {
        self.constraints.remove_link(v, w);
    }

    /// Advisory insertion position for a new point: directly after an
    /// already-connected neighbor, or the end of the order when the neighbor
    /// is unknown.
    ///
    /// This is an extension point for smarter placement. The active
    /// insertion policy is append-to-end, because the engine's order only
    /// grows by append; the hint is exposed for callers that build their own
    /// initial sequence.
    pub fn insertion_hint(&self, _point: &P, neighbor: &P) -> usize {
        match self.constraints.position_of(neighbor) {
            Some(position) => position + 1,
            None => self.sequence.len(),
        }
    }

    fn ensure_points(&mut self, points: &[P]) {
        for point in points {
            self.ensure_point(point);
        }
    }

    /// Append-to-end insertion for any point not yet in the order.
    fn ensure_point(&mut self, point: &P) {
        if self.constraints.append_point(point.clone()).is_ok() {
            self.sequence.push(point.clone());
        }
    }

    fn link_is_planar(&self, v: &P, w: &P) -> bool {
        match self.constraints.is_planar_link(v, w) {
            Ok(planar) => planar,
            Err(err) => {
                tracing::warn!(%err, "planarity probe failed; treating connection as non-planar");
                false
            }
        }
    }
}

impl<P: Point, Q, S: Candidate<P>> Stage<P> for PlanarPolicy<P, Q, S> {
    type Query = Q;
    type Match = S;

    fn reset(&mut self) {
        PlanarPolicy::reset(self);
    }

    fn add_roots(&mut self, roots: &[P]) {
        PlanarPolicy::add_roots(self, roots);
    }

    fn next_root(&mut self) -> Option<P> {
        PlanarPolicy::next_root(self)
    }

    fn joints(&mut self, query: &Q) -> Vec<P> {
        PlanarPolicy::joints(self, query)
    }

    fn select(&mut self, from: &S, query: &Q) -> Option<S> {
        PlanarPolicy::select(self, from, query)
    }

    fn make_link(&mut self, v: &P, w: &P) -> Option<Link<P>> {
        PlanarPolicy::make_link(self, v, w)
    }
}
