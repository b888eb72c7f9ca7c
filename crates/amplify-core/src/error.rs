use crate::model::{VertexId, VertexKind};
use thiserror::Error;

/// Errors raised by graph operations. All of them are rejected before any state changes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("vertex {id} out of range (vertex count {count})")]
    OutOfRange { id: VertexId, count: usize },

    #[error("vertex name '{0}' already exists")]
    DuplicateName(String),

    #[error("self-loop on vertex {0} is not allowed")]
    SelfLoop(VertexId),

    #[error("no edge between {0} and {1}")]
    EdgeNotFound(VertexId, VertexId),

    #[error("vertex '{0}' not found")]
    NotFound(String),

    #[error("vertex '{name}' is a {actual} vertex, expected {expected}")]
    WrongKind {
        name: String,
        expected: VertexKind,
        actual: VertexKind,
    },

    #[error("edge weight must be finite and positive, got {0}")]
    InvalidWeight(f64),
}

impl GraphError {
    /// Stable machine-readable code for boundary layers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::OutOfRange { .. } => "out_of_range",
            Self::DuplicateName(_) => "duplicate_name",
            Self::SelfLoop(_) => "self_loop",
            Self::EdgeNotFound(..) => "edge_not_found",
            Self::NotFound(_) => "not_found",
            Self::WrongKind { .. } => "wrong_kind",
            Self::InvalidWeight(_) => "invalid_weight",
        }
    }
}

pub type GraphResult<T> = Result<T, GraphError>;
