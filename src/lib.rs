//! Customizable Contraction Hierarchies for city-scale bicycle routing.
//!
//! Pipeline (leaves first): [`builder`] → [`enhancer`] → [`rank`] →
//! [`preprocess`] → [`customize`] → [`query`] (with [`dijkstra`] as
//! fallback) → [`project`]. [`routing`] wires the pipeline into the
//! public four-operation surface; everything upstream of it (HTTP
//! fetching, scenic-preference scoring, CLI wiring, response
//! serialization) is an external collaborator this crate does not
//! implement.

pub mod builder;
pub mod customize;
pub mod dijkstra;
pub mod enhancer;
pub mod error;
pub mod model;
pub mod preprocess;
pub mod project;
pub mod query;
pub mod rank;
pub mod routing;

pub use error::{Result, RoutingError};
pub use routing::{RouteResult, RoutingConfig, RoutingEngine, RoutePreference, StepRecord, SummaryRecord};

/// Initializes the global `tracing` subscriber from `RUST_LOG` (default
/// `"info"`). Opt-in, not called implicitly by any library function —
/// matches `step9/mod.rs::init_tracing`'s shape: callers (the demo binary,
/// or an embedding application) decide when logging starts.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
