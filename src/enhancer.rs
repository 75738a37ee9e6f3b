//! Connectivity enhancer (spec.md §4.2).
//!
//! Densifies a graph by adding a bidirectional arc between every pair of
//! vertices within `threshold_km` of each other that isn't already
//! connected. Grounded on `original_source/route_calculator.py`'s
//! `_enhance_graph_connectivity`: a plain O(|V|^2) double loop, no spatial
//! index — acceptable at city scale, and adding one here would mean
//! carrying `rstar` for a single call site.

use geo::{HaversineDistance, Point};

use crate::model::Graph;

pub const DEFAULT_THRESHOLD_KM: f64 = 0.1;

/// Adds missing short-range arcs in place. Returns how many arcs were added
/// (each qualifying pair adds two, one per direction).
pub fn enhance_connectivity(graph: &mut Graph, threshold_km: f64) -> usize {
    let threshold_m = threshold_km * 1000.0;
    let ids: Vec<_> = graph.vertex_ids().collect();
    let mut added = 0usize;

    for (i, &u) in ids.iter().enumerate() {
        let uv = graph.vertex(u).expect("vertex id came from vertex_ids()");
        let (ulat, ulon) = (uv.lat, uv.lon);
        for &v in &ids[i + 1..] {
            if graph.arc_exists(u, v) {
                continue;
            }
            let vv = graph.vertex(v).expect("vertex id came from vertex_ids()");
            let dist = Point::new(ulon, ulat).haversine_distance(&Point::new(vv.lon, vv.lat));
            if dist <= threshold_m {
                graph.upsert_arc(u, v, dist);
                graph.upsert_arc(v, u, dist);
                added += 2;
            }
        }
    }

    tracing::info!(added, threshold_km, "enhanced graph connectivity");
    added
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connects_close_vertices_not_already_linked() {
        let mut graph = Graph::new();
        graph.insert_vertex(0, 36.35000, 127.38000);
        // ~50m away, well under the 100m default threshold.
        graph.insert_vertex(1, 36.35045, 127.38000);
        let added = enhance_connectivity(&mut graph, DEFAULT_THRESHOLD_KM);
        assert_eq!(added, 2);
        assert!(graph.arc_exists(0, 1));
        assert!(graph.arc_exists(1, 0));
    }

    #[test]
    fn leaves_far_vertices_unconnected() {
        let mut graph = Graph::new();
        graph.insert_vertex(0, 36.35, 127.38);
        graph.insert_vertex(1, 36.45, 127.48);
        let added = enhance_connectivity(&mut graph, DEFAULT_THRESHOLD_KM);
        assert_eq!(added, 0);
        assert!(!graph.arc_exists(0, 1));
    }

    #[test]
    fn does_not_duplicate_an_existing_arc() {
        let mut graph = Graph::new();
        graph.insert_vertex(0, 36.35000, 127.38000);
        graph.insert_vertex(1, 36.35001, 127.38000);
        graph.upsert_arc(0, 1, 5.0);
        graph.upsert_arc(1, 0, 5.0);
        let added = enhance_connectivity(&mut graph, DEFAULT_THRESHOLD_KM);
        assert_eq!(added, 0);
        assert_eq!(graph.arc((0, 1)).unwrap().cost, 5.0);
    }
}
