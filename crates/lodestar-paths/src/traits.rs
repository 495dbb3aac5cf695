use crate::{PathStatus, ResolverError};

/// Graph interface consumed by the resolvers: neighbour enumeration.
///
/// With [`SearchDirection::Backward`](crate::SearchDirection::Backward) (the
/// default) `neighbours` must yield the nodes that can *reach* `node`, i.e.
/// reverse adjacency. For undirected graphs both readings coincide.
pub trait Graph<N> {
    /// Approximate node count. Only used to pre-size internal buffers.
    fn count(&self) -> usize;

    /// Append the neighbours of `node` into `buf`. The caller clears `buf`
    /// before calling.
    fn neighbours(&self, node: &N, buf: &mut Vec<N>);
}

/// Cost model consumed by the resolvers.
pub trait Heuristic<N> {
    /// Cost of travelling between `a` and `b`. For adjacent nodes this is the
    /// edge cost; for distant nodes it is the estimate used as `h`. Should be
    /// non-negative and, for optimal paths, never overestimate.
    fn distance(&self, a: &N, b: &N) -> f32;

    /// Static penalty for entering `node` (terrain cost and the like).
    fn weight(&self, node: &N) -> f32;
}

impl<N, G: Graph<N> + ?Sized> Graph<N> for &G {
    #[inline]
    fn count(&self) -> usize {
        (**self).count()
    }

    #[inline]
    fn neighbours(&self, node: &N, buf: &mut Vec<N>) {
        (**self).neighbours(node, buf)
    }
}

impl<N, H: Heuristic<N> + ?Sized> Heuristic<N> for &H {
    #[inline]
    fn distance(&self, a: &N, b: &N) -> f32 {
        (**self).distance(a, b)
    }

    #[inline]
    fn weight(&self, node: &N) -> f32 {
        (**self).weight(node)
    }
}

/// Resolver that computes a full path in one call.
pub trait PathResolver<N> {
    fn start(&self) -> Option<&N>;
    fn goal(&self) -> Option<&N>;
    fn set_start(&mut self, node: Option<N>) -> Result<(), ResolverError>;
    fn set_goal(&mut self, node: Option<N>) -> Result<(), ResolverError>;

    /// Append the start-to-goal path to `out` and return how many nodes were
    /// appended. Zero means no path exists.
    fn reduce_into(&mut self, out: &mut Vec<N>) -> Result<usize, ResolverError>;

    /// Compute the start-to-goal path. Empty means no path exists.
    fn reduce(&mut self) -> Result<Vec<N>, ResolverError> {
        let mut out = Vec::new();
        self.reduce_into(&mut out)?;
        Ok(out)
    }
}

/// Resolver whose search can be spread across several scheduling turns.
///
/// Protocol: [`begin_stepped_reduce`](Self::begin_stepped_reduce), then
/// [`step`](Self::step) until it reports a terminal status, then
/// [`end_stepped_reduce`](Self::end_stepped_reduce). [`reset`](Self::reset)
/// cancels at any point.
pub trait SteppingPathResolver<N>: PathResolver<N> {
    fn status(&self) -> PathStatus;

    fn is_calculating(&self) -> bool {
        self.status() == PathStatus::Calculating
    }

    fn begin_stepped_reduce(&mut self) -> Result<(), ResolverError>;
    fn step(&mut self) -> Result<PathStatus, ResolverError>;
    fn end_stepped_reduce(&mut self, out: &mut Vec<N>) -> usize;
    fn reset(&mut self);

    /// Run at most `max_steps` steps, stopping early once the search is
    /// [`Complete`](PathStatus::Complete) or [`Failed`](PathStatus::Failed).
    fn step_many(&mut self, max_steps: usize) -> Result<PathStatus, ResolverError> {
        let mut status = self.status();
        for _ in 0..max_steps {
            status = self.step()?;
            if status.is_terminal() {
                break;
            }
        }
        Ok(status)
    }
}
