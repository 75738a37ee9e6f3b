//! Nearest-vertex projection (spec.md §4.9).
//!
//! Linear haversine scan, grounded on `geo.rs::nearest_node` — the
//! teacher explicitly keeps this O(n) variant alongside a spatially
//! indexed one ("Use `nearest_node_spatial()` for O(log n)..."); this
//! crate only needs the linear form since persisted spatial indexing is a
//! named Non-goal.

use geo::{HaversineDistance, Point};

use crate::model::{Graph, VertexId};

/// Returns the id of the vertex nearest `(lat, lon)` by great-circle
/// distance, or `None` if the graph has no vertices.
pub fn nearest_vertex(graph: &Graph, lat: f64, lon: f64) -> Option<VertexId> {
    let query = Point::new(lon, lat);
    graph
        .vertex_ids()
        .map(|id| {
            let v = graph.vertex(id).expect("id came from vertex_ids()");
            let dist = query.haversine_distance(&Point::new(v.lon, v.lat));
            (id, dist)
        })
        .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(id, _)| id)
}
