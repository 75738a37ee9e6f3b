//! Error kinds for the routing pipeline (spec.md §7).
//!
//! Typed at the library boundary; the public `initialize`/`find_path`/
//! `find_scenic_path` surface folds these down into the plain
//! `bool`/`Option` shapes the consumer-facing contract specifies —
//! diagnostics go through `tracing`, not the return value.

use crate::model::VertexId;

#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    /// Required coordinate fields were absent or zero; the record was skipped.
    #[error("input record missing or zero-valued coordinates")]
    InputMissing,

    /// A query was issued before a successful `initialize`.
    #[error("query issued against an uninitialized graph")]
    NoGraph,

    /// Bidirectional search exhausted both frontiers without a meeting vertex,
    /// and the Dijkstra fallback also found nothing.
    #[error("no path exists between {source:?} and {target:?}")]
    Unreachable {
        source: VertexId,
        target: VertexId,
    },

    /// Bidirectional search hit the iteration cap before converging.
    #[error("bidirectional search exceeded iteration cap of {cap}")]
    IterationCapped { cap: usize },

    /// The upstream data provider returned nothing usable.
    #[error("upstream data provider returned no usable records")]
    UpstreamFailure,
}

pub type Result<T> = std::result::Result<T, RoutingError>;
