//! Incremental A* path resolution over caller-supplied graphs.
//!
//! [`AStarPathResolver`] finds the cheapest route between two nodes of any
//! graph exposed through [`Graph`], costed by a [`Heuristic`]. It runs either
//! to completion in one call ([`AStarPathResolver::reduce`]) or one node
//! expansion per [`AStarPathResolver::step`], so a scheduler can spread a
//! search across frames and cancel it with [`AStarPathResolver::reset`].
//!
//! # Trait hierarchy
//!
//! | Trait | Role |
//! |---|---|
//! | [`Graph`] | neighbour enumeration (reverse adjacency for backward search) |
//! | [`Heuristic`] | edge distance, distance estimate and node weight |
//! | [`PathResolver`] | blocking `reduce` |
//! | [`SteppingPathResolver`] : [`PathResolver`] | `begin` / `step` / `end` protocol |
//!
//! Nodes are any `Clone + Eq + Hash` value; the resolver never looks inside
//! them.

mod astar;
mod error;
mod path;
mod status;
mod traits;
mod vertex;

pub use astar::AStarPathResolver;
pub use error::ResolverError;
pub use path::Path;
pub use status::{PathStatus, SearchDirection};
pub use traits::{Graph, Heuristic, PathResolver, SteppingPathResolver};
pub use vertex::VertexPool;
