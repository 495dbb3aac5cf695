/// Misuse of a resolver: bad configuration or protocol violations.
///
/// Failing to find a path is not an error; it is reported as
/// [`PathStatus::Failed`](crate::PathStatus::Failed) or an empty result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ResolverError {
    /// A search is in flight; configuration and endpoints are locked.
    #[error("invalid operation: a search is already in progress")]
    Busy,

    #[error("invalid operation: no graph configured")]
    MissingGraph,

    #[error("invalid operation: no heuristic configured")]
    MissingHeuristic,

    #[error("invalid operation: start node not set")]
    MissingStart,

    #[error("invalid operation: goal node not set")]
    MissingGoal,

    /// `step` was called without a preceding `begin_stepped_reduce`.
    #[error("invalid operation: stepped search has not begun")]
    NotStarted,
}

impl ResolverError {
    /// Every resolver error is an invalid-operation error: the caller broke
    /// the call protocol rather than the data being unsearchable.
    #[inline]
    pub fn is_invalid_operation(self) -> bool {
        true
    }

    /// Whether the error stems from missing configuration as opposed to a
    /// call made in the wrong state.
    pub fn is_configuration(self) -> bool {
        matches!(
            self,
            Self::MissingGraph | Self::MissingHeuristic | Self::MissingStart | Self::MissingGoal
        )
    }
}
