pub mod model {
    use serde::{Deserialize, Serialize};
    use std::fmt;

    /// Dense positional index of a vertex. Shifts down when a lower vertex is removed.
    pub type VertexId = usize;

    /// Stable vertex handle. Assigned once at creation and never reused.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct VertexKey(pub u64);

    impl fmt::Display for VertexKey {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "#{}", self.0)
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum VertexKind {
        Music,
        Artist,
        Genre,
        Unknown,
    }

    impl VertexKind {
        pub const ALL: [VertexKind; 4] = [
            VertexKind::Music,
            VertexKind::Artist,
            VertexKind::Genre,
            VertexKind::Unknown,
        ];

        pub fn as_str(self) -> &'static str {
            match self {
                Self::Music => "music",
                Self::Artist => "artist",
                Self::Genre => "genre",
                Self::Unknown => "unknown",
            }
        }

        /// Recognised type tags only; `None` for anything else.
        pub fn parse_tag(tag: &str) -> Option<Self> {
            match tag.trim().to_lowercase().as_str() {
                "music" | "musica" | "track" | "song" => Some(Self::Music),
                "artist" | "artista" => Some(Self::Artist),
                "genre" | "genero" => Some(Self::Genre),
                "unknown" => Some(Self::Unknown),
                _ => None,
            }
        }

        /// Maps a free-form type tag onto a kind. Unrecognised tags become `Unknown`.
        pub fn from_tag(tag: &str) -> Self {
            Self::parse_tag(tag).unwrap_or(Self::Unknown)
        }
    }

    impl fmt::Display for VertexKind {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Vertex {
        pub id: VertexId,
        pub key: VertexKey,
        pub name: String,
        pub kind: VertexKind,
    }

    /// A non-zero cell of the weight matrix, reported once per unordered pair (`a < b`).
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Edge {
        pub a: VertexId,
        pub b: VertexId,
        pub weight: f64,
    }
}

pub mod browse;
pub mod catalog;
pub mod config;
pub mod connectivity;
pub mod context;
pub mod engine;
pub mod error;
pub mod matrix;
pub mod persistence;
pub mod recommend;
pub mod rpc;
pub mod rpc_types;
pub mod vertex_store;

pub use engine::GraphEngine;
pub use error::{GraphError, GraphResult};
pub use model::{Edge, Vertex, VertexId, VertexKey, VertexKind};
