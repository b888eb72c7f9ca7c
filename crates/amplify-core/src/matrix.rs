use crate::error::{GraphError, GraphResult};
use crate::model::VertexId;

/// Dense symmetric weight matrix. `0.0` means "no edge".
/// Rows and columns follow the vertex store's positional ids.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyMatrix {
    rows: Vec<Vec<f64>>,
}

impl AdjacencyMatrix {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn dim(&self) -> usize {
        self.rows.len()
    }

    fn check(&self, id: VertexId) -> GraphResult<()> {
        if id < self.rows.len() {
            Ok(())
        } else {
            Err(GraphError::OutOfRange {
                id,
                count: self.rows.len(),
            })
        }
    }

    pub fn resize_grow(&mut self) {
        for row in &mut self.rows {
            row.push(0.0);
        }
        self.rows.push(vec![0.0; self.rows.len() + 1]);
    }

    pub fn resize_shrink(&mut self, id: VertexId) -> GraphResult<()> {
        self.check(id)?;
        self.rows.remove(id);
        for row in &mut self.rows {
            row.remove(id);
        }
        Ok(())
    }

    pub fn get(&self, a: VertexId, b: VertexId) -> GraphResult<f64> {
        self.check(a)?;
        self.check(b)?;
        Ok(self.rows[a][b])
    }

    pub fn set(&mut self, a: VertexId, b: VertexId, weight: f64) -> GraphResult<()> {
        self.check(a)?;
        self.check(b)?;
        self.rows[a][b] = weight;
        self.rows[b][a] = weight;
        Ok(())
    }

    /// Non-zero cells of row `id` as `(column, weight)`.
    pub fn row(&self, id: VertexId) -> GraphResult<impl Iterator<Item = (VertexId, f64)> + '_> {
        self.check(id)?;
        Ok(self.rows[id]
            .iter()
            .enumerate()
            .filter(|&(_, &w)| w > 0.0)
            .map(|(col, &w)| (col, w)))
    }
}
