//! Rank assignment (spec.md §4.3).
//!
//! A free function, not a method on [`Graph`], mirroring `ch.rs`'s
//! `compute_node_ordering`/`compute_priority` split — the ordering
//! heuristic is a pluggable extension point, not baked into the graph
//! type. Orders vertices by descending degree with an ascending-id
//! tiebreak, matching `original_source/route_calculator.py`'s
//! `_assign_vertex_ranks` exactly (no edge-difference simulation, unlike
//! `ch.rs`'s later `compute_priority` — this spec's preprocessor has no
//! witness search to make that heuristic pay for itself).

use crate::model::{Graph, VertexId};

/// Assigns `rank = 0..|V|` to every vertex in `graph`, highest-degree first.
/// Ties broken by ascending vertex id for determinism.
pub fn assign_ranks(graph: &mut Graph) {
    let mut ids: Vec<VertexId> = graph.vertex_ids().collect();
    ids.sort_by(|&a, &b| {
        graph
            .degree(b)
            .cmp(&graph.degree(a))
            .then(a.cmp(&b))
    });
    for (rank, id) in ids.into_iter().enumerate() {
        graph.set_rank(id, rank as u32);
    }
}
