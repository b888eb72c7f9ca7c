use crate::engine::GraphEngine;
use crate::error::GraphResult;
use crate::model::{Edge, VertexKind};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotVertex {
    pub name: String,
    pub kind: VertexKind,
}

/// Format-agnostic picture of a graph: vertices in id order plus every
/// non-zero edge once. Edge endpoints index into `vertices`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub vertices: Vec<SnapshotVertex>,
    pub edges: Vec<Edge>,
}

impl GraphEngine {
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            vertices: self
                .vertices()
                .map(|v| SnapshotVertex {
                    name: v.name.clone(),
                    kind: v.kind,
                })
                .collect(),
            edges: self.edges().collect(),
        }
    }

    /// Rebuilds a graph through the regular validated operations, so a
    /// malformed snapshot fails with the ordinary error kinds.
    pub fn from_snapshot(snapshot: &GraphSnapshot) -> GraphResult<Self> {
        let mut graph = GraphEngine::new();
        for vertex in &snapshot.vertices {
            graph.insert_vertex(&vertex.name, vertex.kind)?;
        }
        for edge in &snapshot.edges {
            graph.insert_edge(edge.a, edge.b, edge.weight)?;
        }
        info!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "restored graph from snapshot"
        );
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed_demo;
    use crate::error::GraphError;

    #[test]
    fn snapshot_restores_identical_graph() {
        let original = seed_demo().unwrap();
        let snapshot = original.snapshot();
        assert_eq!(snapshot.vertices.len(), original.vertex_count());
        assert_eq!(snapshot.edges.len(), original.edge_count());
        assert!(snapshot.edges.iter().all(|e| e.a < e.b && e.weight > 0.0));

        let restored = GraphEngine::from_snapshot(&snapshot).unwrap();
        assert_eq!(restored.snapshot(), snapshot);
    }

    #[test]
    fn snapshot_survives_json() {
        let mut g = GraphEngine::new();
        g.insert_vertex("Song", VertexKind::Music).unwrap();
        g.insert_vertex("Band", VertexKind::Artist).unwrap();
        g.insert_edge(0, 1, 0.5).unwrap();

        let json = serde_json::to_string(&g.snapshot()).unwrap();
        assert!(json.contains("\"kind\":\"music\""));
        let parsed: GraphSnapshot = serde_json::from_str(&json).unwrap();
        let restored = GraphEngine::from_snapshot(&parsed).unwrap();
        assert_eq!(restored.weight(1, 0).unwrap(), 0.5);
    }

    #[test]
    fn malformed_snapshots_are_rejected() {
        let snapshot = GraphSnapshot {
            vertices: vec![
                SnapshotVertex { name: "a".into(), kind: VertexKind::Music },
                SnapshotVertex { name: "a".into(), kind: VertexKind::Genre },
            ],
            edges: vec![],
        };
        assert_eq!(
            GraphEngine::from_snapshot(&snapshot).unwrap_err(),
            GraphError::DuplicateName("a".into())
        );

        let snapshot = GraphSnapshot {
            vertices: vec![SnapshotVertex { name: "a".into(), kind: VertexKind::Music }],
            edges: vec![Edge { a: 0, b: 3, weight: 1.0 }],
        };
        assert!(matches!(
            GraphEngine::from_snapshot(&snapshot).unwrap_err(),
            GraphError::OutOfRange { id: 3, .. }
        ));
    }
}
