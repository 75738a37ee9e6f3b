//! Dijkstra fallback (spec.md §4.8).
//!
//! Invoked when the CCH query comes back empty. Hand-rolled rather than
//! reused from a graph library — this crate's arc table isn't a
//! `petgraph::Graph` the way `route.rs::find_route`'s is — but kept in the
//! same `BinaryHeap`-of-distance-ordered-states shape as the rest of the
//! search code here, and as `original_source/cch.py::_dijkstra`.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::model::{ArcKey, Graph, VertexId};
use crate::query::{unpack, PathResult};

#[derive(PartialEq)]
struct State {
    dist: f64,
    vertex: VertexId,
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other.dist.partial_cmp(&self.dist).unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Standard single-source Dijkstra over the full arc table (original and
/// shortcut arcs both traversable), stopping as soon as `target` is
/// popped from the heap. Returns `None` if `target` is unreachable.
pub fn dijkstra(graph: &Graph, source: VertexId, target: VertexId) -> Option<PathResult> {
    if source == target {
        return Some(PathResult { arcs: Vec::new(), cost: 0.0 });
    }

    let mut dist: FxHashMap<VertexId, f64> = FxHashMap::default();
    let mut parent: FxHashMap<VertexId, VertexId> = FxHashMap::default();
    let mut settled: FxHashSet<VertexId> = FxHashSet::default();
    let mut heap = BinaryHeap::new();

    dist.insert(source, 0.0);
    heap.push(State { dist: 0.0, vertex: source });

    while let Some(State { dist: d, vertex }) = heap.pop() {
        if settled.contains(&vertex) {
            continue;
        }
        if d > dist.get(&vertex).copied().unwrap_or(f64::INFINITY) {
            continue;
        }
        settled.insert(vertex);
        if vertex == target {
            break;
        }

        for &next in graph.out_neighbors(vertex) {
            let Some(arc) = graph.arc((vertex, next)) else {
                continue;
            };
            if arc.cost.is_infinite() {
                continue;
            }
            let candidate = d + arc.cost;
            if candidate < dist.get(&next).copied().unwrap_or(f64::INFINITY) {
                dist.insert(next, candidate);
                parent.insert(next, vertex);
                heap.push(State { dist: candidate, vertex: next });
            }
        }
    }

    if !settled.contains(&target) {
        tracing::warn!(?source, ?target, "dijkstra fallback found no path");
        return None;
    }

    let mut chain = vec![target];
    let mut v = target;
    while v != source {
        match parent.get(&v) {
            Some(&p) => {
                chain.push(p);
                v = p;
            }
            None => break,
        }
    }
    chain.reverse();

    let mut out_arcs = Vec::new();
    let mut cost = 0.0;
    for pair in chain.windows(2) {
        let key: ArcKey = (pair[0], pair[1]);
        cost += graph.arc(key).map_or(0.0, |a| a.cost);
        out_arcs.extend(unpack(graph, key));
    }

    Some(PathResult { arcs: out_arcs, cost })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_shortest_path_over_original_arcs() {
        let mut g = Graph::new();
        g.insert_vertex(0, 0.0, 0.0);
        g.insert_vertex(1, 0.0, 1.0);
        g.insert_vertex(2, 1.0, 1.0);
        g.upsert_arc(0, 1, 100.0);
        g.upsert_arc(1, 0, 100.0);
        g.upsert_arc(1, 2, 100.0);
        g.upsert_arc(2, 1, 100.0);
        g.upsert_arc(0, 2, 1000.0);
        g.upsert_arc(2, 0, 1000.0);

        let result = dijkstra(&g, 0, 2).unwrap();
        assert_eq!(result.arcs, vec![(0, 1), (1, 2)]);
        assert_eq!(result.cost, 200.0);
    }

    #[test]
    fn returns_none_across_disjoint_components() {
        let mut g = Graph::new();
        g.insert_vertex(0, 0.0, 0.0);
        g.insert_vertex(1, 5.0, 5.0);
        assert!(dijkstra(&g, 0, 1).is_none());
    }
}
