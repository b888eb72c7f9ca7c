use crate::config::EngineConfig;
use crate::engine::GraphEngine;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared handle to one graph and its configuration.
///
/// The graph sits behind a single lock. `read` and `write` run one closure
/// while holding it, so each logical operation is applied as one step and
/// no caller can observe a half-applied mutation.
pub struct GraphContext {
    graph: Arc<RwLock<GraphEngine>>,
    config: Arc<EngineConfig>,
}

impl Clone for GraphContext {
    fn clone(&self) -> Self {
        Self {
            graph: Arc::clone(&self.graph),
            config: Arc::clone(&self.config),
        }
    }
}

impl GraphContext {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_graph(GraphEngine::new(), config)
    }

    pub fn with_graph(graph: GraphEngine, config: EngineConfig) -> Self {
        Self {
            graph: Arc::new(RwLock::new(graph)),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub async fn read<R>(&self, f: impl FnOnce(&GraphEngine) -> R) -> R {
        let graph = self.graph.read().await;
        f(&graph)
    }

    pub async fn write<R>(&self, f: impl FnOnce(&mut GraphEngine) -> R) -> R {
        let mut graph = self.graph.write().await;
        f(&mut graph)
    }

    /// Swaps in a whole new graph and returns the old one.
    pub async fn replace(&self, graph: GraphEngine) -> GraphEngine {
        let mut current = self.graph.write().await;
        std::mem::replace(&mut *current, graph)
    }
}
