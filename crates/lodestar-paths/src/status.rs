use std::fmt;

/// Progress of a resolver's search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathStatus {
    /// The search exhausted every reachable node without finding a path.
    Failed,
    /// No search is in flight.
    #[default]
    Idle,
    /// A stepped search has begun and has not yet terminated.
    Calculating,
    /// A path was found and can be collected.
    Complete,
}

impl PathStatus {
    /// `Complete` or `Failed`: further steps do no work.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }
}

impl fmt::Display for PathStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Failed => "failed",
            Self::Idle => "idle",
            Self::Calculating => "calculating",
            Self::Complete => "complete",
        };
        f.write_str(s)
    }
}

/// Which endpoint the search is seeded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchDirection {
    /// Seed with the goal and expand towards the start. The graph must
    /// report reverse adjacency; the back-pointer chain is already in
    /// start-to-goal order.
    #[default]
    Backward,
    /// Seed with the start and expand towards the goal over forward
    /// adjacency. The chain is reversed once the search completes.
    Forward,
}
