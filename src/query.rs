//! Bidirectional CCH query with shortcut unpacking (spec.md §4.7).
//!
//! Search-loop shape grounded on `ch.rs::CHGraph::query`/`reconstruct_path`
//! — two `BinaryHeap`s driven in alternation, each entry ordered by
//! distance via a `Reverse`-style wrapper. This crate deliberately does
//! **not** carry over `ch.rs`'s rank-monotone pruning
//! (`if neighbor_level >= current_level`): spec.md §4.7 requires every
//! incident arc to be relaxed regardless of rank, trading the classical
//! CCH asymptotic guarantee for robustness on sparse graphs. That is a
//! conscious divergence from the teacher, not an oversight.
//!
//! Unpacking is grounded on `step9/unpack.rs::unpack_up_edge`/
//! `unpack_down_edge` for the recurse-into-both-sides shape, and on
//! `original_source/cch.py`'s `find_path`/`unpack_path` for the exact
//! first-meeting stop rule, the 1000-iteration cap, and the `1e-3`
//! triangle-compatibility tolerance.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::FxHashMap;

use crate::error::RoutingError;
use crate::model::{ArcKey, Graph, VertexId};

pub const DEFAULT_ITERATION_CAP: usize = 1000;
const UNPACK_TOLERANCE: f64 = 1e-3;

#[derive(PartialEq)]
struct SearchState {
    dist: f64,
    vertex: VertexId,
}

impl Eq for SearchState {}

impl Ord for SearchState {
    fn cmp(&self, other: &Self) -> Ordering {
        other.dist.partial_cmp(&self.dist).unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for SearchState {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct Frontier {
    dist: FxHashMap<VertexId, f64>,
    parent: FxHashMap<VertexId, VertexId>,
    settled: rustc_hash::FxHashSet<VertexId>,
    heap: BinaryHeap<SearchState>,
}

impl Frontier {
    fn new(start: VertexId) -> Self {
        let mut dist = FxHashMap::default();
        dist.insert(start, 0.0);
        let mut heap = BinaryHeap::new();
        heap.push(SearchState { dist: 0.0, vertex: start });
        Self {
            dist,
            parent: FxHashMap::default(),
            settled: rustc_hash::FxHashSet::default(),
            heap,
        }
    }

    fn distance_to(&self, v: VertexId) -> Option<f64> {
        self.dist.get(&v).copied()
    }

    fn is_settled(&self, v: VertexId) -> bool {
        self.settled.contains(&v)
    }
}

/// Expands one vertex off `frontier`'s heap, relaxing every arc in the
/// direction `neighbors_of` provides (outgoing for forward, incoming for
/// backward — see the call sites in [`search`]). Returns the vertex
/// settled this step, if any (`None` if the heap was empty or the popped
/// entry was stale).
fn expand_step(
    graph: &Graph,
    frontier: &mut Frontier,
    forward: bool,
) -> Option<VertexId> {
    let SearchState { dist, vertex } = frontier.heap.pop()?;
    if frontier.settled.contains(&vertex) {
        return None;
    }
    if dist > frontier.dist.get(&vertex).copied().unwrap_or(f64::INFINITY) {
        return None;
    }
    frontier.settled.insert(vertex);

    let neighbors: Vec<VertexId> = if forward {
        graph.out_neighbors(vertex).to_vec()
    } else {
        graph.in_neighbors(vertex).to_vec()
    };

    for next in neighbors {
        let arc_key: ArcKey = if forward { (vertex, next) } else { (next, vertex) };
        let cost = match graph.arc(arc_key) {
            Some(a) => a.cost,
            None => continue,
        };
        if cost.is_infinite() {
            continue;
        }
        let candidate = dist + cost;
        let better = candidate < frontier.dist.get(&next).copied().unwrap_or(f64::INFINITY);
        if better {
            frontier.dist.insert(next, candidate);
            frontier.parent.insert(next, vertex);
            frontier.heap.push(SearchState { dist: candidate, vertex: next });
        }
    }

    Some(vertex)
}

fn reconstruct_parent_chain(frontier: &Frontier, mut v: VertexId, start: VertexId) -> Vec<VertexId> {
    let mut chain = vec![v];
    while v != start {
        match frontier.parent.get(&v) {
            Some(&p) => {
                chain.push(p);
                v = p;
            }
            None => break,
        }
    }
    chain
}

/// Unpacks a single arc into its constituent original arcs (spec.md
/// §4.7's `unpack`). An arc with no triangles is already original and is
/// emitted as-is.
pub fn unpack(graph: &Graph, arc: ArcKey) -> Vec<ArcKey> {
    let triangles = graph.triangles_of(arc);
    if triangles.is_empty() {
        return vec![arc];
    }
    let arc_cost = graph.arc(arc).map_or(f64::INFINITY, |a| a.cost);

    let mut best: Option<(f64, ArcKey, ArcKey)> = None;
    for t in triangles {
        let from_cost = graph.arc(t.from_side).map_or(f64::INFINITY, |a| a.cost);
        let to_cost = graph.arc(t.to_side).map_or(f64::INFINITY, |a| a.cost);
        let sum = from_cost + to_cost;
        let compatible = (sum - arc_cost).abs() < UNPACK_TOLERANCE || sum < arc_cost;
        if !compatible {
            continue;
        }
        if best.map_or(true, |(best_sum, _, _)| sum < best_sum) {
            best = Some((sum, t.from_side, t.to_side));
        }
    }

    match best {
        Some((_, from_side, to_side)) => {
            let mut out = unpack(graph, from_side);
            out.extend(unpack(graph, to_side));
            out
        }
        None => vec![arc],
    }
}

/// A resolved path: the ordered list of original arcs and their total
/// cost (sum of arc costs along the *unexpanded* route, matching
/// spec.md §8's "sum of arc costs equals the reconstructed path length").
#[derive(Debug, Clone)]
pub struct PathResult {
    pub arcs: Vec<ArcKey>,
    pub cost: f64,
}

/// Runs the bidirectional CCH query (spec.md §4.7). `iteration_cap` bounds
/// the number of `expand_step` calls across both frontiers combined.
/// Returns `None` on `source == target` is handled by the caller (empty
/// path is a `Some` with no arcs, per spec.md §8's boundary behavior), on
/// exhaustion, or on hitting the cap.
pub fn query(graph: &Graph, source: VertexId, target: VertexId, iteration_cap: usize) -> Option<PathResult> {
    if source == target {
        return Some(PathResult { arcs: Vec::new(), cost: 0.0 });
    }
    if let Some(arc) = graph.arc((source, target)) {
        let cost = arc.cost;
        return Some(PathResult { arcs: unpack(graph, (source, target)), cost });
    }

    let mut forward = Frontier::new(source);
    let mut backward = Frontier::new(target);

    let mut best_total = f64::INFINITY;
    let mut best_meeting: Option<VertexId> = None;
    let mut iterations = 0usize;

    while best_total.is_infinite() {
        if iterations >= iteration_cap {
            tracing::warn!("{}", RoutingError::IterationCapped { cap: iteration_cap });
            return None;
        }
        if forward.heap.is_empty() && backward.heap.is_empty() {
            tracing::warn!("{}", RoutingError::Unreachable { source, target });
            return None;
        }

        if !forward.heap.is_empty() {
            iterations += 1;
            if let Some(v) = expand_step(graph, &mut forward, true) {
                if backward.is_settled(v) {
                    let total = forward.distance_to(v).unwrap_or(f64::INFINITY)
                        + backward.distance_to(v).unwrap_or(f64::INFINITY);
                    if total < best_total {
                        best_total = total;
                        best_meeting = Some(v);
                    }
                }
            }
        }
        if best_total.is_infinite() && !backward.heap.is_empty() {
            iterations += 1;
            if let Some(v) = expand_step(graph, &mut backward, false) {
                if forward.is_settled(v) {
                    let total = forward.distance_to(v).unwrap_or(f64::INFINITY)
                        + backward.distance_to(v).unwrap_or(f64::INFINITY);
                    if total < best_total {
                        best_total = total;
                        best_meeting = Some(v);
                    }
                }
            }
        }
    }

    let meeting = best_meeting?;
    let mut forward_chain = reconstruct_parent_chain(&forward, meeting, source);
    forward_chain.reverse();
    let backward_chain = reconstruct_parent_chain(&backward, meeting, target);

    let mut sequence = forward_chain;
    sequence.extend(backward_chain.into_iter().skip(1));

    let mut out_arcs = Vec::new();
    let mut cost = 0.0;
    for pair in sequence.windows(2) {
        let key = (pair[0], pair[1]);
        let arc_cost = graph.arc(key).map_or(f64::INFINITY, |a| a.cost);
        cost += arc_cost;
        out_arcs.extend(unpack(graph, key));
    }

    Some(PathResult { arcs: out_arcs, cost })
}
