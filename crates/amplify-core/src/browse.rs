use crate::engine::GraphEngine;
use crate::error::{GraphError, GraphResult};
use crate::model::{Vertex, VertexId, VertexKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connection {
    pub id: VertexId,
    pub name: String,
    pub kind: VertexKind,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VertexDetail {
    #[serde(flatten)]
    pub vertex: Vertex,
    pub connections: Vec<Connection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackView {
    pub id: VertexId,
    pub name: String,
    pub artists: Vec<String>,
    pub genres: Vec<String>,
}

/// Optional case-insensitive filters for `track_listing`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TrackFilter {
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
}

pub fn vertex_detail(graph: &GraphEngine, id: VertexId) -> GraphResult<VertexDetail> {
    let vertex = graph
        .vertex(id)
        .cloned()
        .ok_or(GraphError::OutOfRange {
            id,
            count: graph.vertex_count(),
        })?;

    let connections = graph
        .weighted_neighbors(id)?
        .into_iter()
        .filter_map(|(other, weight)| {
            graph.vertex(other).map(|v| Connection {
                id: other,
                name: v.name.clone(),
                kind: v.kind,
                weight,
            })
        })
        .collect();

    Ok(VertexDetail { vertex, connections })
}

fn track_view(graph: &GraphEngine, id: VertexId) -> GraphResult<TrackView> {
    let mut view = TrackView {
        id,
        name: graph.vertex(id).map(|v| v.name.clone()).unwrap_or_default(),
        artists: Vec::new(),
        genres: Vec::new(),
    };
    for other in graph.neighbors(id)? {
        let Some(vertex) = graph.vertex(other) else {
            continue;
        };
        match vertex.kind {
            VertexKind::Artist => view.artists.push(vertex.name.clone()),
            VertexKind::Genre => view.genres.push(vertex.name.clone()),
            _ => {}
        }
    }
    Ok(view)
}

pub fn track_detail(graph: &GraphEngine, id: VertexId) -> GraphResult<TrackView> {
    let vertex = graph.vertex(id).ok_or(GraphError::OutOfRange {
        id,
        count: graph.vertex_count(),
    })?;
    if vertex.kind != VertexKind::Music {
        return Err(GraphError::WrongKind {
            name: vertex.name.clone(),
            expected: VertexKind::Music,
            actual: vertex.kind,
        });
    }
    track_view(graph, id)
}

pub fn track_listing(graph: &GraphEngine, filter: &TrackFilter) -> GraphResult<Vec<TrackView>> {
    let matches = |wanted: &Option<String>, names: &[String]| match wanted {
        Some(wanted) => {
            let wanted = wanted.to_lowercase();
            names.iter().any(|n| n.to_lowercase() == wanted)
        }
        None => true,
    };

    let mut tracks = Vec::new();
    for &id in graph.vertices_of_kind(VertexKind::Music) {
        let view = track_view(graph, id)?;
        if matches(&filter.genre, &view.genres) && matches(&filter.artist, &view.artists) {
            tracks.push(view);
        }
    }
    Ok(tracks)
}
