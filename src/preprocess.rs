//! Metric-independent preprocessing — CCH-MIP (spec.md §4.4).
//!
//! Contracts vertices in ascending rank order, inserting a shortcut (with
//! its witnessing triangle) between every ordered pair of still-remaining
//! upward neighbors. Grounded on `ch.rs::contract_node`, which does the
//! same "for every neighbor pair, create a shortcut" pass and explicitly
//! punts on witness search (`// TODO: Implement witness search... For
//! now, always create shortcuts`) — this crate keeps that simplification
//! rather than adding witness search nobody asked for.

use rustc_hash::FxHashSet;

use crate::model::{Graph, Triangle, VertexId};

/// Runs CCH-MIP over `graph`. Requires ranks already assigned (see
/// [`crate::rank::assign_ranks`]). Returns the number of shortcut arcs
/// newly created (arcs that had no prior entry in the table).
pub fn preprocess(graph: &mut Graph) -> usize {
    let mut ranked: Vec<VertexId> = graph.vertex_ids().collect();
    ranked.sort_by_key(|&id| graph.rank_of(id));

    let mut shortcuts_created = 0usize;

    for &u in &ranked {
        let r = graph.rank_of(u);
        let upward: FxHashSet<VertexId> = graph
            .out_neighbors(u)
            .iter()
            .copied()
            .filter(|&v| graph.rank_of(v) > r)
            .collect();

        let mut upward_sorted: Vec<VertexId> = upward.iter().copied().collect();
        upward_sorted.sort_by_key(|&v| graph.rank_of(v));

        for &v1 in &upward_sorted {
            for &v2 in &upward_sorted {
                if v1 == v2 || graph.rank_of(v1) >= graph.rank_of(v2) {
                    continue;
                }
                let was_new = !graph.arc_exists(v1, v2);
                graph.attach_shortcut_witness(
                    v1,
                    v2,
                    Triangle {
                        from_side: (v1, u),
                        to_side: (u, v2),
                    },
                );
                if was_new {
                    shortcuts_created += 1;
                }
            }
        }
    }

    tracing::info!(shortcuts_created, "completed metric-independent preprocessing");
    shortcuts_created
}
