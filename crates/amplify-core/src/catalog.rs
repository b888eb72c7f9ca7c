//! Bulk loading of artists, genres and tracks from an external music catalog.

use crate::engine::{GraphEngine, DEFAULT_EDGE_WEIGHT};
use crate::error::{GraphError, GraphResult};
use crate::model::{VertexId, VertexKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::info;

/// How an import treats names that already exist in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportPolicy {
    /// Reuse an existing vertex when its kind matches the role it plays in the record.
    #[default]
    Reuse,
    /// Fail the whole import if any name is already taken.
    Reject,
}

impl ImportPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reuse => "reuse",
            Self::Reject => "reject",
        }
    }
}

impl FromStr for ImportPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "reuse" => Ok(Self::Reuse),
            "reject" => Ok(Self::Reject),
            other => Err(format!(
                "invalid import policy '{other}', expected one of: reuse, reject"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub name: String,
    /// Genres specific to this track, on top of the artist's.
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRecord {
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub tracks: Vec<TrackRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub artist: VertexId,
    pub genres: usize,
    pub tracks: usize,
    pub new_vertices: usize,
    pub new_edges: usize,
}

/// Distinct names a record touches, in first-seen order (artist, genres, tracks), with their kind.
fn planned_vertices(record: &ArtistRecord) -> Vec<(&str, VertexKind)> {
    let genres = record
        .genres
        .iter()
        .chain(record.tracks.iter().flat_map(|t| t.genres.iter()))
        .map(|g| (g.as_str(), VertexKind::Genre));
    let tracks = record
        .tracks
        .iter()
        .map(|t| (t.name.as_str(), VertexKind::Music));

    let mut planned = vec![(record.name.as_str(), VertexKind::Artist)];
    for (name, kind) in genres.chain(tracks) {
        if !planned.iter().any(|(seen, _)| *seen == name) {
            planned.push((name, kind));
        }
    }
    planned
}

/// Checks every name a record touches against the graph and the chosen policy.
fn validate(graph: &GraphEngine, record: &ArtistRecord, policy: ImportPolicy) -> GraphResult<()> {
    let mut roles: HashMap<&str, VertexKind> = HashMap::new();
    let names = std::iter::once((record.name.as_str(), VertexKind::Artist))
        .chain(record.genres.iter().map(|g| (g.as_str(), VertexKind::Genre)))
        .chain(record.tracks.iter().flat_map(|t| {
            std::iter::once((t.name.as_str(), VertexKind::Music))
                .chain(t.genres.iter().map(|g| (g.as_str(), VertexKind::Genre)))
        }));

    for (name, kind) in names {
        // A name cannot play two roles within one record.
        if let Some(&previous) = roles.get(name) {
            if previous != kind {
                return Err(GraphError::WrongKind {
                    name: name.to_string(),
                    expected: previous,
                    actual: kind,
                });
            }
            continue;
        }
        roles.insert(name, kind);

        let Some(existing) = graph.id_of(name).and_then(|id| graph.vertex(id)) else {
            continue;
        };
        if existing.kind != kind {
            return Err(GraphError::WrongKind {
                name: name.to_string(),
                expected: kind,
                actual: existing.kind,
            });
        }
        if policy == ImportPolicy::Reject {
            return Err(GraphError::DuplicateName(name.to_string()));
        }
    }
    Ok(())
}

/// Adds an artist, its genres and its tracks.
///
/// The artist links to each of its genres; every track links to the artist,
/// to the artist's genres and to its own genres. The record is validated in
/// full before the first insert, so a rejected import leaves the graph as it was.
pub fn import_artist(
    graph: &mut GraphEngine,
    record: &ArtistRecord,
    policy: ImportPolicy,
) -> GraphResult<ImportReport> {
    validate(graph, record, policy)?;

    let before = graph.vertex_count();
    let planned = planned_vertices(record);
    let mut ids: HashMap<&str, VertexId> = HashMap::new();
    for &(name, kind) in &planned {
        let id = match graph.id_of(name) {
            Some(id) => id,
            None => graph.insert_vertex(name, kind)?,
        };
        ids.insert(name, id);
    }

    let mut new_edges = 0;
    let artist = ids[record.name.as_str()];
    for genre in &record.genres {
        if graph.insert_edge(artist, ids[genre.as_str()], DEFAULT_EDGE_WEIGHT)? {
            new_edges += 1;
        }
    }
    for track in &record.tracks {
        let id = ids[track.name.as_str()];
        if graph.insert_edge(id, artist, DEFAULT_EDGE_WEIGHT)? {
            new_edges += 1;
        }
        for genre in record.genres.iter().chain(&track.genres) {
            if graph.insert_edge(id, ids[genre.as_str()], DEFAULT_EDGE_WEIGHT)? {
                new_edges += 1;
            }
        }
    }

    let of_kind = |kind| planned.iter().filter(|(_, k)| *k == kind).count();
    let report = ImportReport {
        artist,
        genres: of_kind(VertexKind::Genre),
        tracks: of_kind(VertexKind::Music),
        new_vertices: graph.vertex_count() - before,
        new_edges,
    };
    info!(
        artist = %record.name,
        tracks = report.tracks,
        genres = report.genres,
        new_vertices = report.new_vertices,
        new_edges = report.new_edges,
        "imported artist"
    );
    Ok(report)
}

fn track(name: &str, genres: &[&str]) -> TrackRecord {
    TrackRecord {
        name: name.to_string(),
        genres: genres.iter().map(|g| g.to_string()).collect(),
    }
}

fn artist(name: &str, tracks: Vec<TrackRecord>) -> ArtistRecord {
    ArtistRecord {
        name: name.to_string(),
        genres: Vec::new(),
        tracks,
    }
}

/// Genres of the demo catalog, in seeding order.
pub const DEMO_GENRES: [&str; 5] = [
    "Rock",
    "Pop",
    "Alternative",
    "Classic Rock",
    "Progressive Rock",
];

/// The demonstration catalog: seven artists, five genres, fourteen tracks.
pub fn demo_catalog() -> Vec<ArtistRecord> {
    vec![
        artist(
            "The Beatles",
            vec![
                track("Hey Jude", &["Rock", "Pop"]),
                track("Let It Be", &["Rock", "Pop"]),
            ],
        ),
        artist(
            "Queen",
            vec![
                track("Bohemian Rhapsody", &["Rock", "Progressive Rock"]),
                track("We Will Rock You", &["Rock"]),
            ],
        ),
        artist(
            "Pink Floyd",
            vec![
                track("Wish You Were Here", &["Progressive Rock", "Rock"]),
                track("Comfortably Numb", &["Progressive Rock", "Rock"]),
            ],
        ),
        artist(
            "Led Zeppelin",
            vec![
                track("Stairway to Heaven", &["Classic Rock", "Rock"]),
                track("Kashmir", &["Classic Rock", "Rock"]),
            ],
        ),
        artist(
            "Coldplay",
            vec![
                track("Fix You", &["Pop", "Alternative"]),
                track("Viva La Vida", &["Pop", "Alternative"]),
            ],
        ),
        artist(
            "Imagine Dragons",
            vec![
                track("Radioactive", &["Alternative", "Rock"]),
                track("Demons", &["Alternative", "Pop"]),
            ],
        ),
        artist(
            "Arctic Monkeys",
            vec![
                track("Do I Wanna Know?", &["Alternative", "Rock"]),
                track("R U Mine?", &["Alternative", "Rock"]),
            ],
        ),
    ]
}

/// Builds a fresh graph holding the demo catalog.
///
/// Artists take the first ids, genres the next five, tracks the rest.
pub fn seed_demo() -> GraphResult<GraphEngine> {
    let catalog = demo_catalog();
    let mut graph = GraphEngine::new();
    for record in &catalog {
        graph.insert_vertex(&record.name, VertexKind::Artist)?;
    }
    for genre in DEMO_GENRES {
        graph.insert_vertex(genre, VertexKind::Genre)?;
    }
    for record in &catalog {
        import_artist(&mut graph, record, ImportPolicy::Reuse)?;
    }
    info!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "seeded demo catalog"
    );
    Ok(graph)
}
