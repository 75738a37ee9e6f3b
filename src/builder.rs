//! Builds a [`Graph`] from raw coordinate records (spec.md §4.1).
//!
//! Records with a zero or missing coordinate are skipped rather than
//! rejected outright, matching `original_source/route_calculator.py`'s
//! `_create_bike_route_graph`, which checks each of the four scalar fields
//! independently (`if start_lat == 0 or start_lng == 0 or end_lat == 0 or
//! end_lng == 0: continue`) and silently drops the segment instead of
//! erroring the whole batch.

use geo::{HaversineDistance, Point};

use crate::model::{Graph, VertexId};

/// One raw segment endpoint pair as delivered by the upstream data
/// provider, before any vertex ids exist.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RawSegment {
    pub start_lat: f64,
    pub start_lng: f64,
    pub end_lat: f64,
    pub end_lng: f64,
}

impl RawSegment {
    fn has_valid_coords(&self) -> bool {
        !(self.start_lat == 0.0 || self.start_lng == 0.0 || self.end_lat == 0.0 || self.end_lng == 0.0)
    }
}

/// Rounds to 6 decimal places (~0.11 m at the equator), the precision the
/// original coordinate-keyed dedup used.
fn round_coord(v: f64) -> f64 {
    (v * 1_000_000.0).round() / 1_000_000.0
}

/// Haversine meters, rounded half-to-even to the nearest integer (spec.md
/// §4.1), kept as `f64` to match the rest of the cost arithmetic.
fn haversine_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let a = Point::new(lon1, lat1);
    let b = Point::new(lon2, lat2);
    a.haversine_distance(&b).round_ties_even()
}

/// Builds a graph from raw segments. Vertices are deduped by rounded
/// `(lat, lng)` key; every segment becomes two directed arcs (both
/// directions, same cost) unless it is already present. A segment whose
/// endpoints round to the same vertex still inserts a zero-cost self-loop
/// arc, matching `_create_bike_route_graph`'s lack of any same-coordinate
/// check. Returns the graph and the number of segments skipped for invalid
/// coordinates.
pub fn build_graph(segments: &[RawSegment]) -> (Graph, usize) {
    let mut graph = Graph::new();
    let mut coord_to_id: rustc_hash::FxHashMap<(i64, i64), VertexId> = rustc_hash::FxHashMap::default();
    let mut next_id: VertexId = 0;
    let mut skipped = 0usize;

    fn vertex_for(
        graph: &mut Graph,
        coord_to_id: &mut rustc_hash::FxHashMap<(i64, i64), VertexId>,
        next_id: &mut VertexId,
        lat: f64,
        lng: f64,
    ) -> VertexId {
        let lat = round_coord(lat);
        let lng = round_coord(lng);
        let key = ((lat * 1_000_000.0).round() as i64, (lng * 1_000_000.0).round() as i64);
        if let Some(&id) = coord_to_id.get(&key) {
            return id;
        }
        let id = *next_id;
        *next_id += 1;
        graph.insert_vertex(id, lat, lng);
        coord_to_id.insert(key, id);
        id
    }

    for seg in segments {
        if !seg.has_valid_coords() {
            skipped += 1;
            continue;
        }
        let u = vertex_for(&mut graph, &mut coord_to_id, &mut next_id, seg.start_lat, seg.start_lng);
        let v = vertex_for(&mut graph, &mut coord_to_id, &mut next_id, seg.end_lat, seg.end_lng);
        let cost = haversine_meters(seg.start_lat, seg.start_lng, seg.end_lat, seg.end_lng);
        graph.upsert_arc(u, v, cost);
        graph.upsert_arc(v, u, cost);
    }

    tracing::info!(
        vertices = graph.vertex_count(),
        arcs = graph.arc_count(),
        skipped,
        "built graph from raw segments"
    );

    (graph, skipped)
}
