use std::cell::RefCell;
use std::rc::Rc;

use planarc::Link;
use planarc_gen::{MapDictionary, PlanarPolicy, PolicyOptions, SessionState, Stage};

fn id(s: &str) -> String {
    s.to_string()
}

fn dictionary_policy(options: PolicyOptions) -> PlanarPolicy<String, String, String> {
    let mut dictionary: MapDictionary<String, String> = MapDictionary::new();
    dictionary.insert(id("q"), id("d"));
    dictionary.insert(id("q"), id("c"));

    let mut policy = PlanarPolicy::with_dictionary(dictionary, options);
    policy.set_initial_sequence(vec![id("a"), id("b"), id("c"), id("d")]);
    policy
}

#[derive(Default)]
struct StageLog {
    resets: usize,
    roots: Vec<String>,
    selects: usize,
    links: Vec<Link<String>>,
}

struct ScriptedStage {
    log: Rc<RefCell<StageLog>>,
    selection: Option<String>,
    materialize: bool,
    pending_roots: Vec<String>,
}

impl ScriptedStage {
    fn new(log: Rc<RefCell<StageLog>>, selection: Option<String>, materialize: bool) -> Self {
        Self {
            log,
            selection,
            materialize,
            pending_roots: Vec::new(),
        }
    }
}

impl Stage<String> for ScriptedStage {
    type Query = String;
    type Match = String;

    fn reset(&mut self) {
        self.log.borrow_mut().resets += 1;
        self.pending_roots.clear();
    }

    fn add_roots(&mut self, roots: &[String]) {
        self.log.borrow_mut().roots.extend_from_slice(roots);
        self.pending_roots.extend_from_slice(roots);
    }

    fn next_root(&mut self) -> Option<String> {
        self.pending_roots.pop()
    }

    fn joints(&mut self, _query: &String) -> Vec<String> {
        Vec::new()
    }

    fn select(&mut self, _from: &String, _query: &String) -> Option<String> {
        self.log.borrow_mut().selects += 1;
        self.selection.clone()
    }

    fn make_link(&mut self, v: &String, w: &String) -> Option<Link<String>> {
        if !self.materialize {
            return None;
        }
        let link = Link::new(v.clone(), w.clone());
        self.log.borrow_mut().links.push(link.clone());
        Some(link)
    }
}

#[test]
fn strict_selection_rejects_a_crossing_candidate() {
    let mut policy = dictionary_policy(PolicyOptions::strict());
    assert!(policy.make_link(&id("a"), &id("c")).is_some());

    // The first dictionary match for "q" is d, and b-d would cross a-c.
    assert_eq!(policy.select(&id("b"), &id("q")), None);
    assert!(policy.violations().is_empty());
    assert_eq!(policy.state(), SessionState::Building);
}

#[test]
fn lenient_selection_allows_and_records_the_violation() {
    let mut policy = dictionary_policy(PolicyOptions::lenient());
    assert!(policy.make_link(&id("a"), &id("c")).is_some());

    assert_eq!(policy.select(&id("b"), &id("q")), Some(id("d")));
    assert_eq!(policy.violations(), &[Link::new(id("b"), id("d"))]);
}

#[test]
fn selection_takes_the_first_dictionary_match() {
    let mut policy = dictionary_policy(PolicyOptions::strict());

    // No links yet, so the first match (d) is planar and wins over c.
    assert_eq!(policy.select(&id("b"), &id("q")), Some(id("d")));
}

#[test]
fn selection_without_a_candidate_source_is_empty() {
    let dictionary: MapDictionary<String, String> = MapDictionary::new();
    let mut policy: PlanarPolicy<String, String, String> =
        PlanarPolicy::with_dictionary(dictionary, PolicyOptions::strict());

    assert_eq!(policy.select(&id("a"), &id("q")), None);
}

#[test]
fn make_link_registers_and_materializes_standalone() {
    let mut policy = dictionary_policy(PolicyOptions::strict());

    let link = policy.make_link(&id("a"), &id("c"));
    assert_eq!(link, Some(Link::new(id("a"), id("c"))));
    assert_eq!(policy.constraints().link_count(), 1);
    assert!(policy.constraints().is_planar());
    assert_eq!(policy.state(), SessionState::Building);
}

#[test]
fn strict_make_link_rejects_a_crossing_connection() {
    let mut policy = dictionary_policy(PolicyOptions::strict());
    policy.make_link(&id("a"), &id("c"));

    assert_eq!(policy.make_link(&id("b"), &id("d")), None);
    assert_eq!(policy.constraints().link_count(), 1);
    assert!(policy.violations().is_empty());
}

#[test]
fn lenient_make_link_is_visible_to_the_audit() {
    let mut policy = dictionary_policy(PolicyOptions {
        strict_planarity: false,
        auto_optimize: false,
    });
    policy.make_link(&id("a"), &id("c"));

    let link = policy.make_link(&id("b"), &id("d"));
    assert_eq!(link, Some(Link::new(id("b"), id("d"))));
    assert_eq!(policy.violations(), &[Link::new(id("b"), id("d"))]);
    assert_eq!(policy.constraints().link_count(), 2);
    assert_eq!(policy.constraints().crossing_count(), 1);
    assert!(!policy.constraints().is_planar());
}

#[test]
fn auto_optimize_untangles_and_refreshes_the_cached_sequence() {
    let dictionary: MapDictionary<String, String> = MapDictionary::new();
    let mut policy: PlanarPolicy<String, String, String> =
        PlanarPolicy::with_dictionary(dictionary, PolicyOptions::lenient());
    policy.set_initial_sequence(vec![id("a"), id("c"), id("b"), id("d")]);

    policy.make_link(&id("a"), &id("b"));
    policy.make_link(&id("c"), &id("d"));

    assert_eq!(policy.constraints().crossing_count(), 0);
    assert_eq!(policy.sequence(), policy.constraints().sequence());
    assert_eq!(policy.violations().len(), 1);
}

#[test]
fn proposals_append_unknown_points_to_the_order() {
    let mut policy = dictionary_policy(PolicyOptions::strict());

    policy.make_link(&id("x"), &id("y"));
    assert_eq!(policy.constraints().position_of(&id("x")), Some(4));
    assert_eq!(policy.constraints().position_of(&id("y")), Some(5));
    assert_eq!(policy.sequence().len(), 6);

    policy.add_roots(&[id("z"), id("a")]);
    assert_eq!(policy.constraints().position_of(&id("z")), Some(6));
    // Already-present roots keep their position.
    assert_eq!(policy.constraints().position_of(&id("a")), Some(0));
    assert_eq!(policy.sequence().len(), 7);
}

#[test]
fn self_loops_are_rejected_without_a_violation_record() {
    for options in [PolicyOptions::strict(), PolicyOptions::lenient()] {
        let mut policy = dictionary_policy(options);
        assert_eq!(policy.make_link(&id("a"), &id("a")), None);
        assert_eq!(policy.constraints().link_count(), 0);
        assert!(policy.violations().is_empty());
    }
}

#[test]
fn delegate_is_consulted_before_the_dictionary() {
    let log = Rc::new(RefCell::new(StageLog::default()));
    let stage = ScriptedStage::new(Rc::clone(&log), Some(id("d")), true);
    let mut policy = PlanarPolicy::with_delegate(stage, PolicyOptions::strict());
    policy.set_initial_sequence(vec![id("a"), id("b"), id("c"), id("d")]);

    assert_eq!(policy.select(&id("b"), &id("q")), Some(id("d")));
    assert_eq!(log.borrow().selects, 1);

    // The delegate's candidate is still filtered by planarity.
    policy.make_link(&id("a"), &id("c"));
    assert_eq!(policy.select(&id("b"), &id("q")), None);
    assert_eq!(log.borrow().selects, 2);
}

#[test]
fn delegate_materializes_accepted_links_and_receives_roots() {
    let log = Rc::new(RefCell::new(StageLog::default()));
    let stage = ScriptedStage::new(Rc::clone(&log), None, true);
    let mut policy = PlanarPolicy::with_delegate(stage, PolicyOptions::strict());
    policy.set_initial_sequence(vec![id("a"), id("b")]);

    policy.add_roots(&[id("a")]);
    assert_eq!(log.borrow().roots, vec![id("a")]);
    assert_eq!(policy.next_root(), Some(id("a")));
    assert_eq!(policy.next_root(), None);

    let link = policy.make_link(&id("a"), &id("b"));
    assert_eq!(link, Some(Link::new(id("a"), id("b"))));
    assert_eq!(log.borrow().links, vec![Link::new(id("a"), id("b"))]);

    policy.reset();
    assert_eq!(log.borrow().resets, 1);
    assert_eq!(policy.state(), SessionState::Idle);
}

#[test]
fn declined_materialization_keeps_the_registration() {
    let log = Rc::new(RefCell::new(StageLog::default()));
    let stage = ScriptedStage::new(Rc::clone(&log), None, false);
    let mut policy = PlanarPolicy::with_delegate(stage, PolicyOptions::strict());
    policy.set_initial_sequence(vec![id("a"), id("b")]);

    assert_eq!(policy.make_link(&id("a"), &id("b")), None);
    assert_eq!(policy.constraints().link_count(), 1);

    policy.remove_link(&id("b"), &id("a"));
    assert_eq!(policy.constraints().link_count(), 0);
}

#[test]
fn sessions_move_between_idle_and_building() {
    let mut policy = dictionary_policy(PolicyOptions::strict());
    assert_eq!(policy.state(), SessionState::Idle);

    policy.make_link(&id("a"), &id("c"));
    assert_eq!(policy.state(), SessionState::Building);

    // A rejected proposal leaves the session where it was.
    policy.make_link(&id("b"), &id("d"));
    assert_eq!(policy.state(), SessionState::Building);

    policy.reset();
    assert_eq!(policy.state(), SessionState::Idle);
    assert!(policy.sequence().is_empty());
    assert_eq!(policy.constraints().link_count(), 0);
}

#[test]
fn insertion_hint_places_next_to_a_known_neighbor() {
    let policy = dictionary_policy(PolicyOptions::strict());

    assert_eq!(policy.insertion_hint(&id("x"), &id("b")), 2);
    assert_eq!(policy.insertion_hint(&id("x"), &id("unknown")), 4);
}
