//! Metric-dependent customization (spec.md §4.5) and incremental
//! recustomization (spec.md §4.6).
//!
//! The full sweep is grounded on `nbg_ch/weights.rs::customize_nbg_ch`
//! (ascending-rank order, fold each arc's triangles down to a minimum,
//! `.min()` against whatever cost the arc already holds). The incremental
//! path is grounded on `original_source/cch.py`'s
//! `update_costs_with_priority_queue`/`_find_affected_arcs`, including its
//! exact affected-arc condition.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::FxHashSet;

use crate::model::{ArcKey, Graph};

/// A pluggable, monotone non-decreasing binary cost combinator (spec.md
/// §4.5/§9). Kept as a trait rather than `dyn Fn` so the hot customization
/// loop monomorphizes instead of paying virtual-dispatch cost.
pub trait CostCombinator {
    fn combine(&self, a: f64, b: f64) -> f64;
}

/// Saturating addition: `+inf` absorbs (any operand infinite makes the
/// result infinite).
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultCombinator;

impl CostCombinator for DefaultCombinator {
    fn combine(&self, a: f64, b: f64) -> f64 {
        if a.is_infinite() || b.is_infinite() {
            f64::INFINITY
        } else {
            a + b
        }
    }
}

fn triangle_min_sum(graph: &Graph, key: ArcKey, combinator: &impl CostCombinator) -> f64 {
    let mut best = f64::INFINITY;
    for t in graph.triangles_of(key) {
        let from_cost = graph.arc(t.from_side).map_or(f64::INFINITY, |a| a.cost);
        let to_cost = graph.arc(t.to_side).map_or(f64::INFINITY, |a| a.cost);
        let sum = combinator.combine(from_cost, to_cost);
        if sum < best {
            best = sum;
        }
    }
    best
}

/// Full customization sweep. Idempotent: running it twice in a row on the
/// same graph leaves every cost unchanged, since each pass only ever takes
/// a `min` against values already converged from the previous pass.
pub fn customize(graph: &mut Graph, combinator: &impl CostCombinator) {
    let keys = graph.arc_keys_by_source_rank();
    for key in keys {
        if graph.triangles_of(key).is_empty() {
            continue;
        }
        let candidate = triangle_min_sum(graph, key, combinator);
        let current = graph.arc(key).map_or(f64::INFINITY, |a| a.cost);
        if candidate < current {
            graph.set_arc_cost(key, candidate);
        }
    }
    tracing::debug!("customization sweep complete");
}

#[derive(PartialEq)]
struct HeapEntry {
    cost: f64,
    key: ArcKey,
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so `BinaryHeap` (a max-heap) behaves as a min-heap.
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Incremental recustomization (spec.md §4.6). `changed` seeds the
/// min-heap with arcs whose costs have changed or may have changed.
pub fn recustomize(graph: &mut Graph, changed: &[ArcKey], combinator: &impl CostCombinator) {
    let mut heap = BinaryHeap::new();
    let mut queued: FxHashSet<ArcKey> = FxHashSet::default();
    for &key in changed {
        if let Some(arc) = graph.arc(key) {
            heap.push(HeapEntry { cost: arc.cost, key });
            queued.insert(key);
        }
    }

    let mut relaxations = 0usize;
    while let Some(HeapEntry { key, .. }) = heap.pop() {
        queued.remove(&key);
        if graph.triangles_of(key).is_empty() {
            continue;
        }
        let old = graph.arc(key).map_or(f64::INFINITY, |a| a.cost);
        let candidate = triangle_min_sum(graph, key, combinator);
        let new = candidate.min(old);
        let decreased = new < old;
        if new != old {
            graph.set_arc_cost(key, new);
            relaxations += 1;
        }

        for dependent in arcs_affected_by(graph, key, decreased, old) {
            if queued.insert(dependent) {
                let cost = graph.arc(dependent).map_or(f64::INFINITY, |a| a.cost);
                heap.push(HeapEntry { cost, key: dependent });
            }
        }
    }
    tracing::debug!(relaxations, "incremental recustomization complete");
}

/// An arc `b` is affected by a change in `a` when a triangle witnessing
/// `b` uses `a` as one of its two sides, and either `a`'s cost decreased
/// or `b`'s previous cost equaled its triangle sum through `a` (spec.md
/// §4.6) — a conservative superset, grounded exactly on
/// `original_source/cch.py::_find_affected_arcs`'s
/// `cost_reduced or to_side.cost == from_side.cost + old_cost` condition.
fn arcs_affected_by(graph: &Graph, changed: ArcKey, cost_decreased: bool, old_cost_of_changed: f64) -> Vec<ArcKey> {
    let mut affected = Vec::new();
    for key in graph.arc_keys_by_source_rank() {
        if key == changed {
            continue;
        }
        let current = graph.arc(key).map_or(f64::INFINITY, |a| a.cost);
        for t in graph.triangles_of(key) {
            let (other_side, uses_changed) = if t.from_side == changed {
                (t.to_side, true)
            } else if t.to_side == changed {
                (t.from_side, true)
            } else {
                (t.from_side, false)
            };
            if !uses_changed {
                continue;
            }
            if cost_decreased {
                affected.push(key);
                break;
            }
            let other_cost = graph.arc(other_side).map_or(f64::INFINITY, |a| a.cost);
            let witnessed_sum = if old_cost_of_changed.is_infinite() || other_cost.is_infinite() {
                f64::INFINITY
            } else {
                old_cost_of_changed + other_cost
            };
            if (current - witnessed_sum).abs() < f64::EPSILON {
                affected.push(key);
                break;
            }
        }
    }
    affected
}
