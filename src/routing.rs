//! Public library surface (spec.md §6): `initialize`, `find_path`,
//! `find_scenic_path`, and the record shapes returned by the latter two.
//!
//! Grounded on `original_source/route_calculator.py`'s `RouteCalculator`
//! class — same four-method surface, same `_convert_path_to_route_info`
//! record shape — adapted to take an already-parsed slice of segments
//! instead of doing its own HTTP fetch (that collaborator is out of
//! scope here, per spec.md §1).

use crate::builder::{build_graph, RawSegment};
use crate::customize::{customize, DefaultCombinator};
use crate::dijkstra::dijkstra;
use crate::enhancer::enhance_connectivity;
use crate::error::RoutingError;
use crate::model::{ArcKey, Graph};
use crate::preprocess::preprocess;
use crate::project::nearest_vertex;
use crate::query::{query, PathResult};
use crate::rank::assign_ranks;

/// Tunable knobs collected in one place rather than scattered magic
/// numbers (mirrors the teacher's per-stage config structs, e.g.
/// `IngestConfig`).
#[derive(Debug, Clone, Copy)]
pub struct RoutingConfig {
    /// Connectivity enhancer proximity threshold, kilometers.
    pub enhancer_threshold_km: f64,
    /// Bidirectional query iteration cap.
    pub iteration_cap: usize,
    /// Assumed average speed for ETA estimation, km/h.
    pub average_speed_kmh: f64,
    /// Caps how many raw records `initialize` will ingest; `None` means
    /// no cap. Retained from the original `initialize(num_routes,
    /// num_storage)` signature for fidelity.
    pub num_routes: Option<usize>,
    pub num_storage: Option<usize>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            enhancer_threshold_km: crate::enhancer::DEFAULT_THRESHOLD_KM,
            iteration_cap: crate::query::DEFAULT_ITERATION_CAP,
            average_speed_kmh: 15.0,
            num_routes: Some(500),
            num_storage: Some(50),
        }
    }
}

/// One leg of a route (spec.md §6's step record).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StepRecord {
    /// 1-based.
    pub step: usize,
    pub start_lat: f64,
    pub start_lng: f64,
    pub end_lat: f64,
    pub end_lng: f64,
    /// Kilometers.
    pub distance: f64,
    pub instruction: String,
}

/// Appended once after the last step (spec.md §6's summary record).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SummaryRecord {
    /// Kilometers, rounded to 2 decimals.
    pub total_distance: f64,
    pub total_steps: usize,
    /// Minutes, assuming `average_speed_kmh`.
    pub estimated_time: f64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RouteResult {
    pub steps: Vec<StepRecord>,
    pub summary: SummaryRecord,
}

/// Bias applied by [`RoutingEngine::find_scenic_path`]. The real
/// scenic-scoring collaborator (`CustomerPathFinder`/`ScenicPoint` in the
/// original) is out of scope here; this is the thin seam it would plug
/// into — a multiplier on the query's effective arc costs, not a scoring
/// engine.
#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize)]
pub struct RoutePreference {
    pub scenic_bias: f64,
}

/// Owns the built, customized graph and answers routing queries against
/// it. Stands in for the original's module-level `RouteCalculator`
/// singleton without relying on global mutable state (spec.md §9).
pub struct RoutingEngine {
    graph: Option<Graph>,
    config: RoutingConfig,
}

impl RoutingEngine {
    pub fn new(config: RoutingConfig) -> Self {
        Self { graph: None, config }
    }

    /// Builds the full pipeline (builder → enhancer → rank → preprocess →
    /// customize) from `segments`. Returns `false` if the provider handed
    /// back no usable segments (spec.md §7's `UpstreamFailure`), mirroring
    /// the original `initialize`'s single boolean surface.
    pub fn initialize(&mut self, segments: &[RawSegment]) -> bool {
        let capped: &[RawSegment] = match self.config.num_routes {
            Some(cap) if segments.len() > cap => &segments[..cap],
            _ => segments,
        };

        if capped.is_empty() {
            tracing::error!("{}", RoutingError::UpstreamFailure);
            self.graph = None;
            return false;
        }

        let (mut graph, skipped) = build_graph(capped);
        if skipped > 0 {
            tracing::warn!(skipped, "{}", RoutingError::InputMissing);
        }
        if graph.vertex_count() == 0 {
            tracing::error!("{}", RoutingError::UpstreamFailure);
            self.graph = None;
            return false;
        }

        enhance_connectivity(&mut graph, self.config.enhancer_threshold_km);
        assign_ranks(&mut graph);
        preprocess(&mut graph);
        customize(&mut graph, &DefaultCombinator);

        self.graph = Some(graph);
        true
    }

    pub fn find_path(&self, lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Option<RouteResult> {
        self.find_path_with_bias(lat1, lon1, lat2, lon2, 1.0)
    }

    /// spec.md §1's scenic wrapper: same query interface, biased costs.
    /// `scenic_bias < 1.0` prefers routes the bias was computed to favor;
    /// with the real scoring collaborator out of scope, the bias is
    /// applied uniformly rather than per-segment.
    pub fn find_scenic_path(
        &self,
        lat1: f64,
        lon1: f64,
        lat2: f64,
        lon2: f64,
        preference: RoutePreference,
    ) -> Option<RouteResult> {
        let bias = if preference.scenic_bias > 0.0 { preference.scenic_bias } else { 1.0 };
        self.find_path_with_bias(lat1, lon1, lat2, lon2, bias)
    }

    fn find_path_with_bias(&self, lat1: f64, lon1: f64, lat2: f64, lon2: f64, bias: f64) -> Option<RouteResult> {
        let Some(graph) = &self.graph else {
            tracing::warn!("{}", RoutingError::NoGraph);
            return None;
        };

        let source = nearest_vertex(graph, lat1, lon1)?;
        let target = nearest_vertex(graph, lat2, lon2)?;

        let path = query(graph, source, target, self.config.iteration_cap).or_else(|| {
            tracing::warn!("{}", RoutingError::Unreachable { source, target });
            dijkstra(graph, source, target)
        })?;

        Some(self.to_route_result(graph, &path, bias))
    }

    fn to_route_result(&self, graph: &Graph, path: &PathResult, bias: f64) -> RouteResult {
        let mut steps = Vec::with_capacity(path.arcs.len());
        let mut total_distance_km = 0.0;

        for (i, &key) in path.arcs.iter().enumerate() {
            let (start, end) = endpoints(graph, key);
            let distance_km = arc_distance_km(graph, key) * bias;
            total_distance_km += distance_km;
            steps.push(StepRecord {
                step: i + 1,
                start_lat: start.0,
                start_lng: start.1,
                end_lat: end.0,
                end_lng: end.1,
                distance: distance_km,
                instruction: format!("Continue for {:.0} m", distance_km * 1000.0),
            });
        }

        let total_distance = (total_distance_km * 100.0).round() / 100.0;
        let estimated_time = if self.config.average_speed_kmh > 0.0 {
            total_distance_km / self.config.average_speed_kmh * 60.0
        } else {
            0.0
        };

        RouteResult {
            steps,
            summary: SummaryRecord {
                total_distance,
                total_steps: path.arcs.len(),
                estimated_time,
            },
        }
    }
}

fn endpoints(graph: &Graph, key: ArcKey) -> ((f64, f64), (f64, f64)) {
    let source = graph.vertex(key.0).expect("unpacked arc endpoints exist in the vertex table");
    let target = graph.vertex(key.1).expect("unpacked arc endpoints exist in the vertex table");
    ((source.lat, source.lon), (target.lat, target.lon))
}

fn arc_distance_km(graph: &Graph, key: ArcKey) -> f64 {
    graph.arc(key).map_or(0.0, |a| a.cost) / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_segments() -> Vec<RawSegment> {
        vec![
            RawSegment {
                start_lat: 36.350000,
                start_lng: 127.380000,
                end_lat: 36.351000,
                end_lng: 127.380000,
            },
            RawSegment {
                start_lat: 36.351000,
                start_lng: 127.380000,
                end_lat: 36.352000,
                end_lng: 127.380000,
            },
        ]
    }

    #[test]
    fn initialize_then_find_path_returns_a_route() {
        let mut engine = RoutingEngine::new(RoutingConfig::default());
        assert!(engine.initialize(&sample_segments()));
        let result = engine.find_path(36.350000, 127.380000, 36.352000, 127.380000);
        assert!(result.is_some());
        let result = result.unwrap();
        assert_eq!(result.summary.total_steps, result.steps.len());
        assert!(result.summary.total_distance > 0.0);
    }

    #[test]
    fn find_path_before_initialize_returns_none() {
        let engine = RoutingEngine::new(RoutingConfig::default());
        assert!(engine.find_path(36.35, 127.38, 36.36, 127.39).is_none());
    }

    #[test]
    fn initialize_on_empty_input_fails() {
        let mut engine = RoutingEngine::new(RoutingConfig::default());
        assert!(!engine.initialize(&[]));
    }

    #[test]
    fn find_scenic_path_applies_bias_to_distance() {
        let mut engine = RoutingEngine::new(RoutingConfig::default());
        assert!(engine.initialize(&sample_segments()));
        let plain = engine.find_path(36.350000, 127.380000, 36.352000, 127.380000).unwrap();
        let scenic = engine
            .find_scenic_path(
                36.350000,
                127.380000,
                36.352000,
                127.380000,
                RoutePreference { scenic_bias: 2.0 },
            )
            .unwrap();
        assert!(scenic.summary.total_distance > plain.summary.total_distance);
    }
}
