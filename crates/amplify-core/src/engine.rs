use crate::error::{GraphError, GraphResult};
use crate::matrix::AdjacencyMatrix;
use crate::model::{Edge, Vertex, VertexId, VertexKey, VertexKind};
use crate::vertex_store::VertexStore;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

pub const DEFAULT_EDGE_WEIGHT: f64 = 1.0;

/// Undirected weighted graph of typed vertices.
///
/// Every mutating call validates its arguments first and only then touches
/// the vertex store and the matrix, so a rejected call leaves no trace.
#[derive(Debug, Clone, Default)]
pub struct GraphEngine {
    store: VertexStore,
    matrix: AdjacencyMatrix,
    edge_count: usize,
}

/// Counts reported by `GraphEngine::summary`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub vertices: usize,
    pub edges: usize,
    pub by_kind: BTreeMap<VertexKind, usize>,
}

impl GraphEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.store.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn insert_vertex(&mut self, name: &str, kind: VertexKind) -> GraphResult<VertexId> {
        let id = self.store.add(name, kind)?;
        self.matrix.resize_grow();
        debug!(id, name, %kind, "inserted vertex");
        Ok(id)
    }

    pub fn remove_vertex(&mut self, id: VertexId) -> GraphResult<Vertex> {
        self.store.check(id)?;

        let incident = self.matrix.row(id)?.count();
        let removed = self.store.remove(id)?;
        self.matrix.resize_shrink(id)?;
        self.edge_count -= incident;

        debug!(id, name = %removed.name, incident, "removed vertex");
        Ok(removed)
    }

    /// Inserts or overwrites the edge `a`–`b`.
    /// Returns `true` when the pair was previously unconnected.
    pub fn insert_edge(&mut self, a: VertexId, b: VertexId, weight: f64) -> GraphResult<bool> {
        self.store.check(a)?;
        self.store.check(b)?;
        if a == b {
            return Err(GraphError::SelfLoop(a));
        }
        if !weight.is_finite() || weight <= 0.0 {
            return Err(GraphError::InvalidWeight(weight));
        }

        let created = self.matrix.get(a, b)? == 0.0;
        self.matrix.set(a, b, weight)?;
        if created {
            self.edge_count += 1;
        }

        debug!(a, b, weight, created, "inserted edge");
        Ok(created)
    }

    /// Zeroes the edge `a`–`b` and returns its former weight.
    /// A missing edge is reported as `EdgeNotFound` and changes nothing.
    pub fn remove_edge(&mut self, a: VertexId, b: VertexId) -> GraphResult<f64> {
        self.store.check(a)?;
        self.store.check(b)?;

        let weight = self.matrix.get(a, b)?;
        if weight == 0.0 {
            return Err(GraphError::EdgeNotFound(a, b));
        }
        self.matrix.set(a, b, 0.0)?;
        self.edge_count -= 1;

        debug!(a, b, "removed edge");
        Ok(weight)
    }

    pub fn weight(&self, a: VertexId, b: VertexId) -> GraphResult<f64> {
        self.matrix.get(a, b)
    }

    pub fn neighbors(&self, id: VertexId) -> GraphResult<BTreeSet<VertexId>> {
        Ok(self.matrix.row(id)?.map(|(other, _)| other).collect())
    }

    pub fn weighted_neighbors(&self, id: VertexId) -> GraphResult<Vec<(VertexId, f64)>> {
        Ok(self.matrix.row(id)?.collect())
    }

    pub fn vertices_of_kind(&self, kind: VertexKind) -> &BTreeSet<VertexId> {
        self.store.ids_of_kind(kind)
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.store.lookup_by_id(id)
    }

    pub fn id_of(&self, name: &str) -> Option<VertexId> {
        self.store.lookup_by_name(name)
    }

    pub fn resolve_key(&self, key: VertexKey) -> Option<VertexId> {
        self.store.lookup_by_key(key)
    }

    /// Resolves `name` and checks that the vertex has the expected kind.
    pub fn expect_kind(&self, name: &str, expected: VertexKind) -> GraphResult<VertexId> {
        let id = self
            .id_of(name)
            .ok_or_else(|| GraphError::NotFound(name.to_string()))?;
        let actual = self.store.lookup_by_id(id).map(|v| v.kind);
        match actual {
            Some(kind) if kind == expected => Ok(id),
            Some(actual) => Err(GraphError::WrongKind {
                name: name.to_string(),
                expected,
                actual,
            }),
            None => Err(GraphError::NotFound(name.to_string())),
        }
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> + '_ {
        self.store.iter()
    }

    /// Every non-zero pair exactly once, ordered by `(a, b)` with `a < b`.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        (0..self.matrix.dim()).flat_map(move |a| {
            self.matrix
                .row(a)
                .into_iter()
                .flatten()
                .filter(move |&(b, _)| b > a)
                .map(move |(b, weight)| Edge { a, b, weight })
        })
    }

    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            vertices: self.vertex_count(),
            edges: self.edge_count,
            by_kind: VertexKind::ALL
                .iter()
                .map(|&kind| (kind, self.vertices_of_kind(kind).len()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// A(Music) - B(Artist), A - C(Genre)
    fn abc() -> GraphEngine {
        let mut g = GraphEngine::new();
        let a = g.insert_vertex("A", VertexKind::Music).unwrap();
        let b = g.insert_vertex("B", VertexKind::Artist).unwrap();
        let c = g.insert_vertex("C", VertexKind::Genre).unwrap();
        g.insert_edge(a, b, DEFAULT_EDGE_WEIGHT).unwrap();
        g.insert_edge(a, c, DEFAULT_EDGE_WEIGHT).unwrap();
        g
    }

    fn assert_consistent(g: &GraphEngine) {
        let n = g.vertex_count();
        let mut pairs = 0;
        for a in 0..n {
            assert_eq!(g.weight(a, a).unwrap(), 0.0, "diagonal at {a}");
            for b in 0..n {
                assert_eq!(g.weight(a, b).unwrap(), g.weight(b, a).unwrap());
                if b > a && g.weight(a, b).unwrap() > 0.0 {
                    pairs += 1;
                }
            }
        }
        assert_eq!(g.edge_count(), pairs);
        assert_eq!(g.edges().count(), pairs);

        for (id, vertex) in g.vertices().enumerate() {
            assert_eq!(vertex.id, id);
            assert_eq!(g.id_of(&vertex.name), Some(id));
            assert_eq!(g.resolve_key(vertex.key), Some(id));
            assert!(g.vertices_of_kind(vertex.kind).contains(&id));
        }
        let bucketed: usize = VertexKind::ALL
            .iter()
            .map(|&k| g.vertices_of_kind(k).len())
            .sum();
        assert_eq!(bucketed, n);
    }

    #[test]
    fn neighbors_and_edge_count() {
        let g = abc();
        assert_eq!(g.neighbors(0).unwrap(), BTreeSet::from([1, 2]));
        assert_eq!(g.neighbors(1).unwrap(), BTreeSet::from([0]));
        assert_eq!(g.edge_count(), 2);
        assert_consistent(&g);
    }

    #[test]
    fn remove_vertex_drops_incident_edges_and_shifts_ids() {
        let mut g = abc();
        let c_key = g.vertex(2).unwrap().key;

        let removed = g.remove_vertex(1).unwrap();
        assert_eq!(removed.name, "B");

        assert_eq!(g.vertex_count(), 2);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.id_of("C"), Some(1));
        assert_eq!(g.resolve_key(c_key), Some(1));
        assert_eq!(g.weight(0, 1).unwrap(), 1.0);
        assert_consistent(&g);
    }

    #[test]
    fn reinserting_edge_overwrites_weight_only() {
        let mut g = abc();
        assert!(!g.insert_edge(1, 0, 4.0).unwrap());
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.weight(0, 1).unwrap(), 4.0);
        assert_eq!(g.weight(1, 0).unwrap(), 4.0);
    }

    #[test]
    fn insert_edge_validation() {
        let mut g = abc();
        assert_eq!(g.insert_edge(1, 1, 1.0).unwrap_err(), GraphError::SelfLoop(1));
        assert_eq!(
            g.insert_edge(0, 7, 1.0).unwrap_err(),
            GraphError::OutOfRange { id: 7, count: 3 }
        );
        assert!(matches!(
            g.insert_edge(1, 2, 0.0).unwrap_err(),
            GraphError::InvalidWeight(_)
        ));
        assert!(g.insert_edge(1, 2, f64::NAN).is_err());
        assert_eq!(g.edge_count(), 2);
        assert_consistent(&g);
    }

    #[test]
    fn remove_missing_edge_is_a_signal_only() {
        let mut g = abc();
        assert_eq!(g.remove_edge(1, 2).unwrap_err(), GraphError::EdgeNotFound(1, 2));
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.remove_edge(2, 0).unwrap(), 1.0);
        assert_eq!(g.edge_count(), 1);
        assert!(g.remove_edge(0, 2).is_err());
        assert_consistent(&g);
    }

    #[test]
    fn duplicate_vertex_is_rejected_without_growing_matrix() {
        let mut g = abc();
        assert!(g.insert_vertex("A", VertexKind::Genre).is_err());
        assert_eq!(g.vertex_count(), 3);
        assert!(g.weight(3, 0).is_err());
    }

    #[test]
    fn neighbors_out_of_range() {
        let g = abc();
        assert!(matches!(
            g.neighbors(3).unwrap_err(),
            GraphError::OutOfRange { .. }
        ));
    }

    #[test]
    fn expect_kind_reports_missing_and_mismatched() {
        let g = abc();
        assert_eq!(g.expect_kind("A", VertexKind::Music).unwrap(), 0);
        assert_eq!(
            g.expect_kind("Z", VertexKind::Music).unwrap_err(),
            GraphError::NotFound("Z".to_string())
        );
        assert!(matches!(
            g.expect_kind("B", VertexKind::Music).unwrap_err(),
            GraphError::WrongKind { actual: VertexKind::Artist, .. }
        ));
    }

    #[test]
    fn summary_counts_by_kind() {
        let g = abc();
        let summary = g.summary();
        assert_eq!(summary.vertices, 3);
        assert_eq!(summary.edges, 2);
        assert_eq!(summary.by_kind[&VertexKind::Music], 1);
        assert_eq!(summary.by_kind[&VertexKind::Unknown], 0);
    }

    #[test]
    fn remap_preserves_surviving_edges() {
        let mut g = GraphEngine::new();
        for i in 0..6 {
            g.insert_vertex(&format!("v{i}"), VertexKind::Unknown).unwrap();
        }
        let edges = [(0, 3, 1.0), (1, 4, 2.0), (3, 5, 3.0), (2, 4, 4.0), (4, 5, 5.0)];
        for &(a, b, w) in &edges {
            g.insert_edge(a, b, w).unwrap();
        }

        let k = 2;
        g.remove_vertex(k).unwrap();

        let shift = |i: usize| if i > k { i - 1 } else { i };
        for &(a, b, w) in &edges {
            if a == k || b == k {
                continue;
            }
            assert_eq!(g.weight(shift(a), shift(b)).unwrap(), w);
        }
        assert_eq!(g.edge_count(), 4);
        assert_consistent(&g);
    }

    #[test]
    fn random_operation_sequences_keep_invariants() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut g = GraphEngine::new();
        let mut next_name = 0;

        for step in 0..600 {
            let n = g.vertex_count();
            match rng.random_range(0..10) {
                0..=2 => {
                    let kind = VertexKind::ALL[rng.random_range(0..4)];
                    g.insert_vertex(&format!("v{next_name}"), kind).unwrap();
                    next_name += 1;
                }
                3 if n > 0 => {
                    g.remove_vertex(rng.random_range(0..n)).unwrap();
                }
                4..=7 if n > 1 => {
                    let a = rng.random_range(0..n);
                    let b = rng.random_range(0..n);
                    let w = rng.random_range(1..5) as f64;
                    let result = g.insert_edge(a, b, w);
                    assert_eq!(result.is_err(), a == b);
                }
                8 | 9 if n > 1 => {
                    let a = rng.random_range(0..n);
                    let b = rng.random_range(0..n);
                    let _ = g.remove_edge(a, b);
                }
                _ => {}
            }
            if step % 20 == 0 {
                assert_consistent(&g);
            }
        }
        assert_consistent(&g);
    }
}
