//! Quantified invariants from spec.md §8, checked against small
//! hand-built graphs and a handful of randomly generated ones.

use daecch::customize::{customize, DefaultCombinator};
use daecch::model::Graph;
use daecch::preprocess::preprocess;
use daecch::query::{query, unpack, DEFAULT_ITERATION_CAP};
use daecch::rank::assign_ranks;

const TOLERANCE: f64 = 1e-3;

fn grid_graph(n: u32) -> Graph {
    let mut g = Graph::new();
    for id in 0..n * n {
        let row = (id / n) as f64;
        let col = (id % n) as f64;
        g.insert_vertex(id, row * 0.001, col * 0.001);
    }
    for row in 0..n {
        for col in 0..n {
            let id = row * n + col;
            if col + 1 < n {
                let right = row * n + col + 1;
                g.upsert_arc(id, right, 100.0);
                g.upsert_arc(right, id, 100.0);
            }
            if row + 1 < n {
                let down = (row + 1) * n + col;
                g.upsert_arc(id, down, 100.0);
                g.upsert_arc(down, id, 100.0);
            }
        }
    }
    g
}

fn built_grid(n: u32) -> Graph {
    let mut g = grid_graph(n);
    assign_ranks(&mut g);
    preprocess(&mut g);
    customize(&mut g, &DefaultCombinator);
    g
}

#[test]
fn ranks_are_a_permutation_of_0_to_v() {
    let g = built_grid(4);
    let mut ranks: Vec<u32> = g.vertex_ids().map(|id| g.rank_of(id)).collect();
    ranks.sort();
    assert_eq!(ranks, (0..g.vertex_count() as u32).collect::<Vec<_>>());
}

#[test]
fn every_arc_cost_does_not_exceed_its_cheapest_triangle_sum() {
    let g = built_grid(4);
    for key in g.arc_keys_by_source_rank() {
        let triangles = g.triangles_of(key);
        if triangles.is_empty() {
            continue;
        }
        let cost = g.arc(key).unwrap().cost;
        let min_sum = triangles
            .iter()
            .map(|t| {
                let from = g.arc(t.from_side).map_or(f64::INFINITY, |a| a.cost);
                let to = g.arc(t.to_side).map_or(f64::INFINITY, |a| a.cost);
                from + to
            })
            .fold(f64::INFINITY, f64::min);
        assert!(
            cost <= min_sum + TOLERANCE,
            "arc {key:?} cost {cost} exceeds its cheapest witness sum {min_sum}"
        );
    }
}

#[test]
fn unpacking_yields_only_original_arcs() {
    let g = built_grid(4);
    for key in g.arc_keys_by_source_rank() {
        for original in unpack(&g, key) {
            assert!(
                g.triangles_of(original).is_empty(),
                "unpack({key:?}) emitted {original:?}, which still has triangles"
            );
        }
    }
}

#[test]
fn unpacked_path_is_contiguous_and_its_cost_sums_to_the_reported_total() {
    let g = built_grid(4);
    let last = g.vertex_count() as u32 - 1;
    let result = query(&g, 0, last, DEFAULT_ITERATION_CAP)
        .unwrap_or_else(|| panic!("expected a path across a connected grid"));

    for pair in result.arcs.windows(2) {
        assert_eq!(pair[0].1, pair[1].0, "consecutive arcs must meet");
    }
    for &arc in &result.arcs {
        assert!(g.triangles_of(arc).is_empty(), "output arc {arc:?} must be original");
    }
    let summed: f64 = result
        .arcs
        .iter()
        .map(|&key| g.arc(key).map_or(0.0, |a| a.cost))
        .sum();
    assert!(
        (summed - result.cost).abs() < TOLERANCE,
        "sum of unpacked arc costs {summed} != reported path cost {}",
        result.cost
    );
}

#[test]
fn customize_then_customize_again_is_idempotent() {
    let mut g = grid_graph(4);
    assign_ranks(&mut g);
    preprocess(&mut g);
    customize(&mut g, &DefaultCombinator);
    let before: Vec<f64> = g.arc_keys_by_source_rank().into_iter().map(|k| g.arc(k).unwrap().cost).collect();
    customize(&mut g, &DefaultCombinator);
    let after: Vec<f64> = g.arc_keys_by_source_rank().into_iter().map(|k| g.arc(k).unwrap().cost).collect();
    assert_eq!(before, after);
}
