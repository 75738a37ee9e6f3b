//! Core data model: vertices, arcs, triangles, and the graph that owns them.
//!
//! Mirrors the arena-style shape from `original_source/cch.py`'s `Graph`
//! class — separate id-keyed maps rather than a struct-of-arrays — because
//! the rest of the pipeline (preprocessing, customization, query) is
//! written against exactly that shape in the original and in spec.md §3.

use rustc_hash::FxHashMap;

pub type VertexId = u32;

/// A key into the arc table: `(source, target)`. At most one arc exists
/// per ordered pair.
pub type ArcKey = (VertexId, VertexId);

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vertex {
    pub id: VertexId,
    pub lat: f64,
    pub lon: f64,
    /// Assigned once by the rank assigner; a permutation of `[0, |V|)`.
    /// `u32::MAX` until assigned.
    pub rank: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Arc {
    pub source: VertexId,
    pub target: VertexId,
    /// Non-negative meters; `f64::INFINITY` means "not yet relaxed" for a
    /// freshly inserted shortcut.
    pub cost: f64,
}

/// The witness for a shortcut `(v1 -> v2)` created while contracting `u`:
/// `from_side = arc(v1 -> u)`, `to_side = arc(u -> v2)`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Triangle {
    pub from_side: ArcKey,
    pub to_side: ArcKey,
}

/// An arc is "original" if it has no triangles (inserted by the builder or
/// enhancer) and a "shortcut" otherwise (inserted by preprocessing). This is
/// a tag, not a subtype — represented by whether `triangles_of` is empty.
#[derive(Debug, Default)]
pub struct Graph {
    vertices: FxHashMap<VertexId, Vertex>,
    arcs: FxHashMap<ArcKey, Arc>,
    triangles: FxHashMap<ArcKey, Vec<Triangle>>,
    out_adj: FxHashMap<VertexId, Vec<VertexId>>,
    in_adj: FxHashMap<VertexId, Vec<VertexId>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.keys().copied()
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(&id)
    }

    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertices.contains_key(&id)
    }

    /// Inserts a vertex with no rank assigned yet (`rank = u32::MAX`). A
    /// no-op if the id already exists (the builder only calls this on
    /// first sight of a coordinate key).
    pub fn insert_vertex(&mut self, id: VertexId, lat: f64, lon: f64) {
        self.vertices.entry(id).or_insert(Vertex {
            id,
            lat,
            lon,
            rank: u32::MAX,
        });
    }

    pub fn set_rank(&mut self, id: VertexId, rank: u32) {
        if let Some(v) = self.vertices.get_mut(&id) {
            v.rank = rank;
        }
    }

    pub fn rank_of(&self, id: VertexId) -> u32 {
        self.vertices.get(&id).map(|v| v.rank).unwrap_or(u32::MAX)
    }

    /// Number of arc-table keys in which `id` appears as either endpoint —
    /// the degree measure the rank assigner sorts on.
    pub fn degree(&self, id: VertexId) -> usize {
        self.out_adj.get(&id).map_or(0, Vec::len) + self.in_adj.get(&id).map_or(0, Vec::len)
    }

    pub fn arc(&self, key: ArcKey) -> Option<&Arc> {
        self.arcs.get(&key)
    }

    pub fn arc_exists(&self, source: VertexId, target: VertexId) -> bool {
        self.arcs.contains_key(&(source, target))
    }

    /// Inserts or overwrites an arc with the given cost (builder/enhancer
    /// semantics: last write wins, and the builder only ever writes the
    /// same cost twice, so this is effectively idempotent). Returns `true`
    /// if the arc is new.
    pub fn upsert_arc(&mut self, source: VertexId, target: VertexId, cost: f64) -> bool {
        let key = (source, target);
        let is_new = !self.arcs.contains_key(&key);
        self.arcs.insert(key, Arc { source, target, cost });
        if is_new {
            self.out_adj.entry(source).or_default().push(target);
            self.in_adj.entry(target).or_default().push(source);
        }
        is_new
    }

    pub fn set_arc_cost(&mut self, key: ArcKey, cost: f64) {
        if let Some(arc) = self.arcs.get_mut(&key) {
            arc.cost = cost;
        }
    }

    pub fn out_neighbors(&self, id: VertexId) -> &[VertexId] {
        self.out_adj.get(&id).map_or(&[], Vec::as_slice)
    }

    pub fn in_neighbors(&self, id: VertexId) -> &[VertexId] {
        self.in_adj.get(&id).map_or(&[], Vec::as_slice)
    }

    pub fn triangles_of(&self, key: ArcKey) -> &[Triangle] {
        self.triangles.get(&key).map_or(&[], Vec::as_slice)
    }

    pub fn is_shortcut(&self, key: ArcKey) -> bool {
        !self.triangles_of(key).is_empty()
    }

    /// Preprocessing's insert-or-attach rule (spec.md §4.4): if no arc
    /// `(v1 -> v2)` exists, create one with cost `+inf` and attach the
    /// triangle; if one already exists, attach the triangle without
    /// touching its cost.
    pub fn attach_shortcut_witness(&mut self, v1: VertexId, v2: VertexId, triangle: Triangle) {
        let key = (v1, v2);
        if !self.arcs.contains_key(&key) {
            self.arcs.insert(
                key,
                Arc {
                    source: v1,
                    target: v2,
                    cost: f64::INFINITY,
                },
            );
            self.out_adj.entry(v1).or_default().push(v2);
            self.in_adj.entry(v2).or_default().push(v1);
        }
        self.triangles.entry(key).or_default().push(triangle);
    }

    /// All arc keys, ordered ascending by `rank(source)` — the order the
    /// customizer must sweep in (spec.md §4.5).
    pub fn arc_keys_by_source_rank(&self) -> Vec<ArcKey> {
        let mut keys: Vec<ArcKey> = self.arcs.keys().copied().collect();
        keys.sort_by_key(|&(s, _)| self.rank_of(s));
        keys
    }
}
