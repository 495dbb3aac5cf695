use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use lodestar_core::BinaryHeap;

use crate::traits::{Graph, Heuristic, PathResolver, SteppingPathResolver};
use crate::vertex::{OpenComparer, OpenEntry, Vertex, VertexId, VertexPool, cheapest_first};
use crate::{Path, PathStatus, ResolverError, SearchDirection};

/// A* search over a caller-supplied [`Graph`] and [`Heuristic`].
///
/// The search can run to completion in one call ([`reduce`](Self::reduce))
/// or one expansion at a time ([`begin_stepped_reduce`](Self::begin_stepped_reduce),
/// [`step`](Self::step), [`end_stepped_reduce`](Self::end_stepped_reduce)) so
/// that a scheduler can spend a bounded amount of work per turn.
///
/// By default the search runs backward: the open set is seeded with the goal
/// and the search ends when the start is popped, so the back-pointer chain is
/// already in start-to-goal order. The graph must then report reverse
/// adjacency (see [`Graph::neighbours`]).
///
/// Open, closed and pooled vertex storage is kept between searches, so a
/// resolver that is reused stops allocating after warm-up.
pub struct AStarPathResolver<N, G, H> {
    graph: Option<G>,
    heuristic: Option<H>,
    direction: SearchDirection,
    start: Option<N>,
    goal: Option<N>,
    status: PathStatus,
    // search state
    pool: VertexPool<N>,
    open: BinaryHeap<OpenEntry, OpenComparer>,
    open_index: HashMap<N, VertexId>,
    closed: HashSet<N>,
    tracked: Vec<VertexId>,
    terminal: Option<VertexId>,
    expansions: usize,
    // scratch buffer for neighbour queries
    nbuf: Vec<N>,
}

impl<N, G, H> Default for AStarPathResolver<N, G, H>
where
    N: Clone + Eq + Hash,
    G: Graph<N>,
    H: Heuristic<N>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<N, G, H> AStarPathResolver<N, G, H>
where
    N: Clone + Eq + Hash,
    G: Graph<N>,
    H: Heuristic<N>,
{
    /// Create an unconfigured resolver. Call [`configure`](Self::configure)
    /// before searching.
    pub fn new() -> Self {
        Self::with_pool(VertexPool::new())
    }

    /// Create a resolver ready to search `graph` with `heuristic`.
    pub fn with_graph(graph: G, heuristic: H) -> Self {
        let mut resolver = Self::new();
        resolver.graph = Some(graph);
        resolver.heuristic = Some(heuristic);
        resolver
    }

    /// Create an unconfigured resolver that draws its vertex records from
    /// `pool`.
    pub fn with_pool(pool: VertexPool<N>) -> Self {
        Self {
            graph: None,
            heuristic: None,
            direction: SearchDirection::default(),
            start: None,
            goal: None,
            status: PathStatus::Idle,
            pool,
            open: BinaryHeap::new(cheapest_first as OpenComparer),
            open_index: HashMap::new(),
            closed: HashSet::new(),
            tracked: Vec::new(),
            terminal: None,
            expansions: 0,
            nbuf: Vec::with_capacity(8),
        }
    }

    /// Cancel any search and hand back the vertex pool.
    pub fn into_pool(mut self) -> VertexPool<N> {
        self.reset();
        self.pool
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    /// Replace the graph and heuristic. Rejected while a search is in flight.
    pub fn configure(&mut self, graph: G, heuristic: H) -> Result<(), ResolverError> {
        self.ensure_idle()?;
        self.graph = Some(graph);
        self.heuristic = Some(heuristic);
        Ok(())
    }

    pub fn graph(&self) -> Option<&G> {
        self.graph.as_ref()
    }

    pub fn heuristic(&self) -> Option<&H> {
        self.heuristic.as_ref()
    }

    pub fn direction(&self) -> SearchDirection {
        self.direction
    }

    /// Choose which endpoint seeds the search. Rejected while a search is in
    /// flight.
    pub fn set_direction(&mut self, direction: SearchDirection) -> Result<(), ResolverError> {
        self.ensure_idle()?;
        self.direction = direction;
        Ok(())
    }

    pub fn start(&self) -> Option<&N> {
        self.start.as_ref()
    }

    pub fn goal(&self) -> Option<&N> {
        self.goal.as_ref()
    }

    /// Set or clear the start node. Rejected while a search is in flight.
    pub fn set_start(&mut self, node: impl Into<Option<N>>) -> Result<(), ResolverError> {
        self.ensure_idle()?;
        self.start = node.into();
        Ok(())
    }

    /// Set or clear the goal node. Rejected while a search is in flight.
    pub fn set_goal(&mut self, node: impl Into<Option<N>>) -> Result<(), ResolverError> {
        self.ensure_idle()?;
        self.goal = node.into();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Introspection
    // -----------------------------------------------------------------------

    #[inline]
    pub fn status(&self) -> PathStatus {
        self.status
    }

    #[inline]
    pub fn is_calculating(&self) -> bool {
        self.status == PathStatus::Calculating
    }

    /// Nodes expanded by the current search.
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    /// Vertex records allocated by the current search.
    pub fn tracked_len(&self) -> usize {
        self.tracked.len()
    }

    /// Vertex records currently checked out of the pool.
    pub fn live_vertices(&self) -> usize {
        self.pool.live()
    }

    pub fn pool(&self) -> &VertexPool<N> {
        &self.pool
    }

    /// Cost of the path found by a completed stepped search, before it is
    /// collected.
    pub fn terminal_cost(&self) -> Option<f32> {
        if self.status != PathStatus::Complete {
            return None;
        }
        let id = self.terminal?;
        self.pool.inner.get(id).map(|v| v.g)
    }

    // -----------------------------------------------------------------------
    // Synchronous search
    // -----------------------------------------------------------------------

    /// Run a full search and return the start-to-goal path, inclusive.
    ///
    /// An empty vector means no path exists. The resolver is idle again
    /// when this returns.
    pub fn reduce(&mut self) -> Result<Vec<N>, ResolverError> {
        let mut out = Vec::new();
        self.reduce_into(&mut out)?;
        Ok(out)
    }

    /// Run a full search, appending the path to `out`. Returns the number of
    /// nodes appended, zero if no path exists.
    pub fn reduce_into(&mut self, out: &mut Vec<N>) -> Result<usize, ResolverError> {
        self.run_to_end()?;
        Ok(self.end_stepped_reduce(out))
    }

    /// Run a full search and return the path with its cost, or `None` if no
    /// path exists.
    pub fn reduce_path(&mut self) -> Result<Option<Path<N>>, ResolverError> {
        self.run_to_end()?;
        Ok(self.end_stepped_path())
    }

    fn run_to_end(&mut self) -> Result<PathStatus, ResolverError> {
        self.begin_stepped_reduce()?;
        loop {
            match self.step() {
                Ok(PathStatus::Calculating) => continue,
                Ok(status) => return Ok(status),
                Err(err) => {
                    self.reset();
                    return Err(err);
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Stepped search
    // -----------------------------------------------------------------------

    /// Validate the configuration, clear previous state and seed the open
    /// set. The resolver is `Calculating` afterwards.
    pub fn begin_stepped_reduce(&mut self) -> Result<(), ResolverError> {
        self.ensure_idle()?;
        if let Err(err) = self.validate() {
            self.reset();
            return Err(err);
        }
        self.reset();

        let (Some(graph), Some(heuristic), Some(seed), Some(target)) = (
            self.graph.as_ref(),
            self.heuristic.as_ref(),
            seed_of(self.direction, &self.start, &self.goal),
            target_of(self.direction, &self.start, &self.goal),
        ) else {
            unreachable!("configuration validated above");
        };

        self.open.reserve(graph.count());

        let h = heuristic.distance(seed, target);
        let id = self.pool.inner.acquire();
        self.tracked.push(id);
        if let Some(v) = self.pool.inner.get_mut(id) {
            v.node = Some(seed.clone());
            v.next = None;
            v.g = 0.0;
            v.h = h;
            v.f = h;
        }
        self.open.push(OpenEntry { id, f: h });
        self.open_index.insert(seed.clone(), id);
        self.status = PathStatus::Calculating;

        log::debug!(
            "astar: search started ({:?}, graph size hint {})",
            self.direction,
            graph.count()
        );
        Ok(())
    }

    /// Expand the cheapest open node.
    ///
    /// Terminal statuses are returned unchanged; stepping an idle resolver is
    /// an error.
    pub fn step(&mut self) -> Result<PathStatus, ResolverError> {
        match self.status {
            PathStatus::Idle => return Err(ResolverError::NotStarted),
            PathStatus::Complete | PathStatus::Failed => return Ok(self.status),
            PathStatus::Calculating => {}
        }

        let Some(graph) = self.graph.as_ref() else {
            return Err(ResolverError::MissingGraph);
        };
        let Some(heuristic) = self.heuristic.as_ref() else {
            return Err(ResolverError::MissingHeuristic);
        };
        let Some(target) = target_of(self.direction, &self.start, &self.goal) else {
            return Err(match self.direction {
                SearchDirection::Backward => ResolverError::MissingStart,
                SearchDirection::Forward => ResolverError::MissingGoal,
            });
        };

        let Some(current) = self.open.pop() else {
            self.status = PathStatus::Failed;
            return Ok(self.status);
        };
        let Some(Vertex {
            node: Some(node),
            g: current_g,
            ..
        }) = self.pool.inner.get(current.id)
        else {
            unreachable!("open entry {} has no live vertex", current.id);
        };
        let node = node.clone();
        let current_g = *current_g;
        self.open_index.remove(&node);

        if node == *target {
            self.terminal = Some(current.id);
            self.status = PathStatus::Complete;
            log::debug!(
                "astar: path found after {} expansions (cost {})",
                self.expansions,
                current_g
            );
            return Ok(self.status);
        }

        self.closed.insert(node.clone());
        self.expansions += 1;
        let mut nbuf = std::mem::take(&mut self.nbuf);
        nbuf.clear();
        graph.neighbours(&node, &mut nbuf);

        for neighbour in nbuf.drain(..) {
            if self.closed.contains(&neighbour) {
                continue;
            }
            let tentative_g =
                current_g + heuristic.distance(&node, &neighbour) + heuristic.weight(&neighbour);

            if let Some(&id) = self.open_index.get(&neighbour) {
                let Some(v) = self.pool.inner.get_mut(id) else {
                    continue;
                };
                // Strictly cheaper only: ties keep the first predecessor.
                if tentative_g >= v.g {
                    continue;
                }
                v.g = tentative_g;
                v.f = tentative_g + v.h;
                v.next = Some(current.id);
                let f = v.f;
                // Linear scan for the heap slot; only paid on a strict
                // improvement.
                if let Some(pos) = self.open.position(|e| e.id == id) {
                    if let Some(entry) = self.open.get_mut(pos) {
                        entry.f = f;
                    }
                    self.open.update(pos);
                }
            } else {
                let h = heuristic.distance(&neighbour, target);
                let f = tentative_g + h;
                let id = self.pool.inner.acquire();
                self.tracked.push(id);
                if let Some(v) = self.pool.inner.get_mut(id) {
                    v.node = Some(neighbour.clone());
                    v.next = Some(current.id);
                    v.g = tentative_g;
                    v.h = h;
                    v.f = f;
                }
                self.open.push(OpenEntry { id, f });
                self.open_index.insert(neighbour, id);
            }
        }
        self.nbuf = nbuf;

        log::trace!(
            "astar: expansion {} (g = {}, open = {}, closed = {})",
            self.expansions,
            current_g,
            self.open.len(),
            self.closed.len()
        );

        if self.open.is_empty() {
            self.status = PathStatus::Failed;
            log::debug!("astar: no path after {} expansions", self.expansions);
        }
        Ok(self.status)
    }

    /// Collect the path of a completed search into `out` and reset.
    ///
    /// Returns the number of nodes appended; zero if the search failed or
    /// has not finished (it is abandoned either way).
    pub fn end_stepped_reduce(&mut self, out: &mut Vec<N>) -> usize {
        let count = if self.status == PathStatus::Complete {
            self.collect_path(out)
        } else {
            0
        };
        self.reset();
        count
    }

    /// Like [`end_stepped_reduce`](Self::end_stepped_reduce) but returns the
    /// path with its cost, or `None` if there is none.
    pub fn end_stepped_path(&mut self) -> Option<Path<N>> {
        let path = match self.terminal_cost() {
            Some(cost) => {
                let mut nodes = Vec::new();
                self.collect_path(&mut nodes);
                Some(Path { nodes, cost })
            }
            None => None,
        };
        self.reset();
        path
    }

    /// Release every vertex record, clear the open and closed sets and go
    /// back to `Idle`. Safe in any state; cancels a running search.
    pub fn reset(&mut self) {
        for id in self.tracked.drain(..) {
            self.pool.inner.release(id);
        }
        self.open.clear();
        self.open_index.clear();
        self.closed.clear();
        self.terminal = None;
        self.expansions = 0;
        self.status = PathStatus::Idle;
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn ensure_idle(&self) -> Result<(), ResolverError> {
        if self.is_calculating() {
            return Err(ResolverError::Busy);
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ResolverError> {
        if self.graph.is_none() {
            return Err(ResolverError::MissingGraph);
        }
        if self.heuristic.is_none() {
            return Err(ResolverError::MissingHeuristic);
        }
        if self.start.is_none() {
            return Err(ResolverError::MissingStart);
        }
        if self.goal.is_none() {
            return Err(ResolverError::MissingGoal);
        }
        Ok(())
    }

    /// Walk the back-pointer chain from the terminal record, appending each
    /// node to `out` in start-to-goal order.
    fn collect_path(&self, out: &mut Vec<N>) -> usize {
        let first = out.len();
        let mut cursor = self.terminal;
        while let Some(id) = cursor {
            let Some(v) = self.pool.inner.get(id) else {
                break;
            };
            if let Some(node) = &v.node {
                out.push(node.clone());
            }
            cursor = v.next;
        }
        if self.direction == SearchDirection::Forward {
            out[first..].reverse();
        }
        out.len() - first
    }
}

/// Endpoint the open set is seeded with.
fn seed_of<'a, N>(
    direction: SearchDirection,
    start: &'a Option<N>,
    goal: &'a Option<N>,
) -> Option<&'a N> {
    match direction {
        SearchDirection::Backward => goal.as_ref(),
        SearchDirection::Forward => start.as_ref(),
    }
}

/// Endpoint whose removal from the open set completes the search.
fn target_of<'a, N>(
    direction: SearchDirection,
    start: &'a Option<N>,
    goal: &'a Option<N>,
) -> Option<&'a N> {
    match direction {
        SearchDirection::Backward => start.as_ref(),
        SearchDirection::Forward => goal.as_ref(),
    }
}

impl<N, G, H> PathResolver<N> for AStarPathResolver<N, G, H>
where
    N: Clone + Eq + Hash,
    G: Graph<N>,
    H: Heuristic<N>,
{
    fn start(&self) -> Option<&N> {
        AStarPathResolver::start(self)
    }

    fn goal(&self) -> Option<&N> {
        AStarPathResolver::goal(self)
    }

    fn set_start(&mut self, node: Option<N>) -> Result<(), ResolverError> {
        AStarPathResolver::set_start(self, node)
    }

    fn set_goal(&mut self, node: Option<N>) -> Result<(), ResolverError> {
        AStarPathResolver::set_goal(self, node)
    }

    fn reduce_into(&mut self, out: &mut Vec<N>) -> Result<usize, ResolverError> {
        AStarPathResolver::reduce_into(self, out)
    }
}

impl<N, G, H> SteppingPathResolver<N> for AStarPathResolver<N, G, H>
where
    N: Clone + Eq + Hash,
    G: Graph<N>,
    H: Heuristic<N>,
{
    fn status(&self) -> PathStatus {
        self.status
    }

    fn begin_stepped_reduce(&mut self) -> Result<(), ResolverError> {
        AStarPathResolver::begin_stepped_reduce(self)
    }

    fn step(&mut self) -> Result<PathStatus, ResolverError> {
        AStarPathResolver::step(self)
    }

    fn end_stepped_reduce(&mut self, out: &mut Vec<N>) -> usize {
        AStarPathResolver::end_stepped_reduce(self, out)
    }

    fn reset(&mut self) {
        AStarPathResolver::reset(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    // -----------------------------------------------------------------------
    // Fixtures
    // -----------------------------------------------------------------------

    /// Directed graph with explicit edge costs. Reports reverse adjacency
    /// unless built with `forward()`.
    #[derive(Default)]
    struct Links {
        costs: HashMap<(char, char), f32>,
        incoming: HashMap<char, Vec<char>>,
        outgoing: HashMap<char, Vec<char>>,
        weights: HashMap<char, f32>,
        forward: bool,
    }

    impl Links {
        fn link(mut self, a: char, b: char, cost: f32) -> Self {
            self.costs.insert((a, b), cost);
            self.outgoing.entry(a).or_default().push(b);
            self.incoming.entry(b).or_default().push(a);
            self
        }

        fn both(self, a: char, b: char, cost: f32) -> Self {
            self.link(a, b, cost).link(b, a, cost)
        }

        fn penalty(mut self, node: char, w: f32) -> Self {
            self.weights.insert(node, w);
            self
        }

        fn forward(mut self) -> Self {
            self.forward = true;
            self
        }

        /// A -> B -> C -> D, unit costs.
        fn chain() -> Self {
            Self::default()
                .link('A', 'B', 1.0)
                .link('B', 'C', 1.0)
                .link('C', 'D', 1.0)
        }
    }

    impl Graph<char> for Links {
        fn count(&self) -> usize {
            self.costs.len()
        }

        fn neighbours(&self, node: &char, buf: &mut Vec<char>) {
            let adjacency = if self.forward {
                &self.outgoing
            } else {
                &self.incoming
            };
            if let Some(ns) = adjacency.get(node) {
                buf.extend_from_slice(ns);
            }
        }
    }

    impl Heuristic<char> for Links {
        fn distance(&self, a: &char, b: &char) -> f32 {
            self.costs
                .get(&(*a, *b))
                .or_else(|| self.costs.get(&(*b, *a)))
                .copied()
                .unwrap_or(0.0)
        }

        fn weight(&self, node: &char) -> f32 {
            self.weights.get(node).copied().unwrap_or(0.0)
        }
    }

    type LinkResolver<'a> = AStarPathResolver<char, &'a Links, &'a Links>;

    fn resolver(links: &Links, start: char, goal: char) -> LinkResolver<'_> {
        let mut r = AStarPathResolver::with_graph(links, links);
        r.set_start(start).unwrap();
        r.set_goal(goal).unwrap();
        r
    }

    type Cell = (i32, i32);

    /// Undirected 4-connected grid with walls and per-cell weights.
    struct Grid {
        w: i32,
        h: i32,
        walls: HashSet<Cell>,
        weights: HashMap<Cell, f32>,
    }

    impl Grid {
        fn open(w: i32, h: i32) -> Self {
            Self {
                w,
                h,
                walls: HashSet::new(),
                weights: HashMap::new(),
            }
        }

        fn random(rng: &mut StdRng, w: i32, h: i32) -> Self {
            let mut grid = Self::open(w, h);
            for y in 0..h {
                for x in 0..w {
                    match rng.random_range(0..10u32) {
                        0..=2 => {
                            grid.walls.insert((x, y));
                        }
                        3 | 4 => {
                            grid.weights.insert((x, y), rng.random_range(1..4) as f32);
                        }
                        _ => {}
                    }
                }
            }
            grid
        }

        fn random_cell(&mut self, rng: &mut StdRng) -> Cell {
            let c = (rng.random_range(0..self.w), rng.random_range(0..self.h));
            self.walls.remove(&c);
            c
        }

        fn passable(&self, c: Cell) -> bool {
            c.0 >= 0 && c.1 >= 0 && c.0 < self.w && c.1 < self.h && !self.walls.contains(&c)
        }
    }

    impl Graph<Cell> for Grid {
        fn count(&self) -> usize {
            (self.w * self.h) as usize
        }

        fn neighbours(&self, node: &Cell, buf: &mut Vec<Cell>) {
            let (x, y) = *node;
            for c in [(x, y - 1), (x + 1, y), (x, y + 1), (x - 1, y)] {
                if self.passable(c) {
                    buf.push(c);
                }
            }
        }
    }

    impl Heuristic<Cell> for Grid {
        fn distance(&self, a: &Cell, b: &Cell) -> f32 {
            ((a.0 - b.0).abs() + (a.1 - b.1).abs()) as f32
        }

        fn weight(&self, node: &Cell) -> f32 {
            self.weights.get(node).copied().unwrap_or(0.0)
        }
    }

    fn grid_resolver(grid: &Grid, start: Cell, goal: Cell) -> AStarPathResolver<Cell, &Grid, &Grid> {
        let mut r = AStarPathResolver::with_graph(grid, grid);
        r.set_start(start).unwrap();
        r.set_goal(goal).unwrap();
        r
    }

    fn stepped<N, G, H>(r: &mut AStarPathResolver<N, G, H>) -> Vec<N>
    where
        N: Clone + Eq + Hash,
        G: Graph<N>,
        H: Heuristic<N>,
    {
        r.begin_stepped_reduce().unwrap();
        while r.step().unwrap() == PathStatus::Calculating {}
        let mut out = Vec::new();
        r.end_stepped_reduce(&mut out);
        out
    }

    fn assert_clean<N, G, H>(r: &AStarPathResolver<N, G, H>)
    where
        N: Clone + Eq + Hash,
        G: Graph<N>,
        H: Heuristic<N>,
    {
        assert_eq!(r.status(), PathStatus::Idle);
        assert_eq!(r.tracked_len(), 0);
        assert_eq!(r.live_vertices(), 0);
    }

    // -----------------------------------------------------------------------
    // Search results
    // -----------------------------------------------------------------------

    #[test]
    fn chain_resolves_in_traversal_order() {
        let links = Links::chain();
        let mut r = resolver(&links, 'A', 'D');
        let path = r.reduce_path().unwrap().unwrap();
        assert_eq!(path.nodes, vec!['A', 'B', 'C', 'D']);
        assert_eq!(path.cost, 3.0);
        assert_eq!(r.reduce().unwrap(), vec!['A', 'B', 'C', 'D']);
        assert_clean(&r);
    }

    #[test]
    fn disconnected_components_fail() {
        let links = Links::default().both('A', 'B', 1.0).both('C', 'D', 1.0);
        let mut r = resolver(&links, 'A', 'D');
        assert!(r.reduce().unwrap().is_empty());
        assert_eq!(r.reduce_path().unwrap(), None);

        r.begin_stepped_reduce().unwrap();
        let mut last = PathStatus::Calculating;
        while last == PathStatus::Calculating {
            last = r.step().unwrap();
            assert_ne!(last, PathStatus::Complete);
        }
        assert_eq!(last, PathStatus::Failed);
        // Terminal states are sticky.
        assert_eq!(r.step().unwrap(), PathStatus::Failed);
        let mut out = Vec::new();
        assert_eq!(r.end_stepped_reduce(&mut out), 0);
        assert!(out.is_empty());
        assert_clean(&r);
    }

    #[test]
    fn shortcut_loses_to_cheaper_route() {
        let links = Links::chain().link('A', 'D', 10.0);
        let mut r = resolver(&links, 'A', 'D');
        let path = r.reduce_path().unwrap().unwrap();
        assert_eq!(path.nodes, vec!['A', 'B', 'C', 'D']);
        assert_eq!(path.cost, 3.0);
    }

    #[test]
    fn equal_cost_keeps_first_predecessor() {
        let links = Links::default()
            .link('A', 'B', 1.0)
            .link('A', 'C', 1.0)
            .link('B', 'D', 1.0)
            .link('C', 'D', 1.0);
        let mut r = resolver(&links, 'A', 'D');
        assert_eq!(r.reduce().unwrap(), vec!['A', 'B', 'D']);
    }

    #[test]
    fn node_weight_steers_route() {
        let links = Links::default()
            .link('A', 'B', 1.0)
            .link('A', 'C', 1.0)
            .link('B', 'D', 1.0)
            .link('C', 'D', 1.0)
            .penalty('B', 5.0);
        let mut r = resolver(&links, 'A', 'D');
        let path = r.reduce_path().unwrap().unwrap();
        assert_eq!(path.nodes, vec!['A', 'C', 'D']);
        assert_eq!(path.cost, 2.0);
    }

    #[test]
    fn start_equals_goal_is_single_node_path() {
        let links = Links::chain();
        let mut r = resolver(&links, 'B', 'B');
        assert_eq!(r.reduce().unwrap(), vec!['B']);
        let path = r.reduce_path().unwrap().unwrap();
        assert_eq!(path.nodes, vec!['B']);
        assert_eq!(path.cost, 0.0);
    }

    #[test]
    fn one_way_edges_are_respected() {
        let links = Links::default().link('A', 'B', 1.0);
        assert_eq!(resolver(&links, 'A', 'B').reduce().unwrap(), vec!['A', 'B']);
        assert!(resolver(&links, 'B', 'A').reduce().unwrap().is_empty());
    }

    #[test]
    fn forward_search_over_forward_adjacency() {
        let links = Links::chain().link('A', 'D', 10.0).forward();
        let mut r = resolver(&links, 'A', 'D');
        r.set_direction(SearchDirection::Forward).unwrap();
        let path = r.reduce_path().unwrap().unwrap();
        assert_eq!(path.nodes, vec!['A', 'B', 'C', 'D']);
        assert_eq!(path.cost, 3.0);

        let mut back = resolver(&links, 'D', 'A');
        back.set_direction(SearchDirection::Forward).unwrap();
        assert!(back.reduce().unwrap().is_empty());
    }

    #[test]
    fn reduce_into_appends() {
        let links = Links::chain();
        let mut r = resolver(&links, 'B', 'D');
        let mut out = vec!['z'];
        assert_eq!(r.reduce_into(&mut out).unwrap(), 3);
        assert_eq!(out, vec!['z', 'B', 'C', 'D']);

        let mut r = resolver(&links, 'D', 'A');
        assert_eq!(r.reduce_into(&mut out).unwrap(), 0);
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn open_grid_path_is_shortest() {
        let grid = Grid::open(10, 10);
        let mut r = grid_resolver(&grid, (0, 0), (9, 9));
        let path = r.reduce_path().unwrap().unwrap();
        assert_eq!(path.len(), 19);
        assert_eq!(path.cost, 18.0);
        assert_eq!(path.first(), Some(&(0, 0)));
        assert_eq!(path.last(), Some(&(9, 9)));
        for pair in path.nodes.windows(2) {
            assert_eq!(grid.distance(&pair[0], &pair[1]), 1.0);
        }
    }

    // -----------------------------------------------------------------------
    // Stepped protocol
    // -----------------------------------------------------------------------

    #[test]
    fn stepped_matches_reduce_on_random_grids() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..60 {
            let w = rng.random_range(2..14);
            let h = rng.random_range(2..14);
            let mut grid = Grid::random(&mut rng, w, h);
            let start = grid.random_cell(&mut rng);
            let goal = grid.random_cell(&mut rng);
            let mut r = grid_resolver(&grid, start, goal);
            let blocking = r.reduce().unwrap();
            let incremental = stepped(&mut r);
            assert_eq!(blocking, incremental);
            if let Some(first) = blocking.first() {
                assert_eq!(*first, start);
                assert_eq!(blocking.last(), Some(&goal));
            }
            assert_clean(&r);
        }
    }

    #[test]
    fn forward_and_backward_agree_on_cost() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..60 {
            let w = rng.random_range(2..12);
            let h = rng.random_range(2..12);
            let mut grid = Grid::random(&mut rng, w, h);
            let start = grid.random_cell(&mut rng);
            let goal = grid.random_cell(&mut rng);

            let mut backward = grid_resolver(&grid, start, goal);
            let mut forward = grid_resolver(&grid, start, goal);
            forward.set_direction(SearchDirection::Forward).unwrap();

            match (backward.reduce_path().unwrap(), forward.reduce_path().unwrap()) {
                (Some(b), Some(f)) => {
                    // Each direction charges the weight of every node but its seed.
                    let b_cost = b.cost - grid.weight(&start);
                    let f_cost = f.cost - grid.weight(&goal);
                    assert!((b_cost - f_cost).abs() < 1e-4, "{b_cost} != {f_cost}");
                    assert_eq!(f.first(), Some(&start));
                    assert_eq!(f.last(), Some(&goal));
                }
                (None, None) => {}
                (b, f) => panic!("directions disagree on reachability: {b:?} vs {f:?}"),
            }
        }
    }

    #[test]
    fn step_many_respects_budget() {
        let grid = Grid::open(20, 20);
        let mut r = grid_resolver(&grid, (0, 0), (19, 19));
        r.begin_stepped_reduce().unwrap();
        assert_eq!(r.step_many(5).unwrap(), PathStatus::Calculating);
        assert_eq!(r.expansions(), 5);

        let mut turns = 1;
        while r.step_many(5).unwrap() == PathStatus::Calculating {
            turns += 1;
        }
        assert!(turns > 1);
        assert_eq!(r.status(), PathStatus::Complete);
        assert_eq!(r.terminal_cost(), Some(38.0));
        let mut out = Vec::new();
        assert_eq!(r.end_stepped_reduce(&mut out), 39);
        assert_clean(&r);
    }

    #[test]
    fn end_before_completion_abandons_search() {
        let grid = Grid::open(8, 8);
        let mut r = grid_resolver(&grid, (0, 0), (7, 7));
        r.begin_stepped_reduce().unwrap();
        r.step().unwrap();
        assert!(r.is_calculating());
        let mut out = Vec::new();
        assert_eq!(r.end_stepped_reduce(&mut out), 0);
        assert!(out.is_empty());
        assert_clean(&r);
        assert_eq!(r.end_stepped_path(), None);
    }

    #[test]
    fn reset_is_always_safe() {
        let grid = Grid::open(6, 6);
        let mut r = grid_resolver(&grid, (0, 0), (5, 5));

        r.reset();
        assert_clean(&r);

        r.begin_stepped_reduce().unwrap();
        r.step_many(3).unwrap();
        assert!(r.live_vertices() > 0);
        assert_eq!(r.live_vertices(), r.tracked_len());
        r.reset();
        assert_clean(&r);
        assert_eq!(r.step(), Err(ResolverError::NotStarted));

        r.begin_stepped_reduce().unwrap();
        while r.step().unwrap() == PathStatus::Calculating {}
        assert_eq!(r.status(), PathStatus::Complete);
        r.reset();
        assert_clean(&r);
        r.reset();
        assert_clean(&r);
    }

    #[test]
    fn begin_after_terminal_restarts() {
        let links = Links::chain();
        let mut r = resolver(&links, 'A', 'D');
        r.begin_stepped_reduce().unwrap();
        while r.step().unwrap() == PathStatus::Calculating {}
        assert_eq!(r.status(), PathStatus::Complete);

        // Not calculating any more, so endpoints may change.
        r.set_start('B').unwrap();
        assert_eq!(stepped(&mut r), vec!['B', 'C', 'D']);
    }

    #[test]
    fn generic_scheduler_drives_any_stepping_resolver() {
        fn drive<R: SteppingPathResolver<Cell>>(r: &mut R, per_turn: usize) -> (Vec<Cell>, usize) {
            r.begin_stepped_reduce().unwrap();
            let mut turns = 0;
            while r.is_calculating() {
                r.step_many(per_turn).unwrap();
                turns += 1;
            }
            let mut out = Vec::new();
            r.end_stepped_reduce(&mut out);
            (out, turns)
        }

        let grid = Grid::open(12, 12);
        let mut r = grid_resolver(&grid, (0, 0), (11, 0));
        let (fast, fast_turns) = drive(&mut r, 64);
        let (slow, slow_turns) = drive(&mut r, 1);
        assert_eq!(fast, slow);
        assert_eq!(fast.len(), 12);
        assert!(slow_turns > fast_turns);
        assert_eq!(PathResolver::reduce(&mut r).unwrap(), fast);
    }

    // -----------------------------------------------------------------------
    // Misuse
    // -----------------------------------------------------------------------

    #[test]
    fn step_without_begin_fails() {
        let links = Links::chain();
        let mut r = resolver(&links, 'A', 'D');
        assert_eq!(r.step(), Err(ResolverError::NotStarted));
        assert_clean(&r);
    }

    #[test]
    fn missing_configuration_fails() {
        let mut r: AStarPathResolver<char, Links, Links> = AStarPathResolver::new();
        r.set_start('A').unwrap();
        r.set_goal('D').unwrap();
        assert_eq!(r.reduce(), Err(ResolverError::MissingGraph));
        assert_eq!(r.begin_stepped_reduce(), Err(ResolverError::MissingGraph));

        r.configure(Links::chain(), Links::chain()).unwrap();
        assert_eq!(r.reduce().unwrap(), vec!['A', 'B', 'C', 'D']);

        r.set_start(None::<char>).unwrap();
        assert_eq!(r.reduce(), Err(ResolverError::MissingStart));
        r.set_start('A').unwrap();
        r.set_goal(None::<char>).unwrap();
        assert_eq!(r.reduce_path(), Err(ResolverError::MissingGoal));
        assert_clean(&r);
    }

    #[test]
    fn failed_begin_clears_previous_result() {
        let links = Links::chain();
        let mut r = resolver(&links, 'A', 'D');
        r.begin_stepped_reduce().unwrap();
        while r.step().unwrap() == PathStatus::Calculating {}
        r.set_goal(None::<char>).unwrap();
        assert_eq!(r.begin_stepped_reduce(), Err(ResolverError::MissingGoal));
        assert_clean(&r);
    }

    #[test]
    fn locked_while_calculating() {
        let links = Links::chain();
        let other = Links::default();
        let mut r = resolver(&links, 'A', 'D');
        r.begin_stepped_reduce().unwrap();
        r.step().unwrap();

        assert_eq!(r.configure(&other, &other), Err(ResolverError::Busy));
        assert_eq!(r.set_start('B'), Err(ResolverError::Busy));
        assert_eq!(r.set_goal('C'), Err(ResolverError::Busy));
        assert_eq!(
            r.set_direction(SearchDirection::Forward),
            Err(ResolverError::Busy)
        );
        assert_eq!(r.begin_stepped_reduce(), Err(ResolverError::Busy));
        assert_eq!(r.reduce(), Err(ResolverError::Busy));

        // The running search is untouched.
        assert!(r.is_calculating());
        assert_eq!(r.start(), Some(&'A'));
        while r.step().unwrap() == PathStatus::Calculating {}
        let mut out = Vec::new();
        r.end_stepped_reduce(&mut out);
        assert_eq!(out, vec!['A', 'B', 'C', 'D']);
    }

    // -----------------------------------------------------------------------
    // Pooling
    // -----------------------------------------------------------------------

    #[test]
    fn repeated_searches_do_not_leak() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut largest = 0;
        let mut pool = VertexPool::new();
        for size in (2..24).chain((2..24).rev()) {
            let mut grid = Grid::random(&mut rng, size, size);
            let start = grid.random_cell(&mut rng);
            let goal = grid.random_cell(&mut rng);
            largest = largest.max(grid.count());

            let mut r = AStarPathResolver::with_pool(pool);
            r.configure(&grid, &grid).unwrap();
            r.set_start(start).unwrap();
            r.set_goal(goal).unwrap();
            for _ in 0..3 {
                r.reduce().unwrap();
                assert_clean(&r);
            }
            pool = r.into_pool();
            assert_eq!(pool.live(), 0);
            assert!(pool.len() <= largest);
        }
    }

    #[test]
    fn warmed_pool_stops_growing() {
        let grid = Grid::open(15, 15);
        let mut r = grid_resolver(&grid, (0, 0), (14, 14));
        r.reduce().unwrap();
        let warmed = r.pool().len();
        assert!(warmed > 0);
        for _ in 0..5 {
            r.reduce().unwrap();
            assert_eq!(r.pool().len(), warmed);
            assert_eq!(r.pool().free(), warmed);
        }
    }
}
