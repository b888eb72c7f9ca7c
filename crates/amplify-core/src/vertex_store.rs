use crate::error::{GraphError, GraphResult};
use crate::model::{Vertex, VertexId, VertexKey, VertexKind};
use std::collections::{BTreeSet, HashMap};

/// Vertex identities, names and type tags.
///
/// Ids are dense positions into `vertices`. Removing a vertex shifts every
/// higher id down by one; the name, kind and key indices are remapped in the
/// same step so they always agree with the vertex sequence.
#[derive(Debug, Clone)]
pub struct VertexStore {
    vertices: Vec<Vertex>,
    name_index: HashMap<String, VertexId>,
    kind_index: HashMap<VertexKind, BTreeSet<VertexId>>,
    key_index: HashMap<VertexKey, VertexId>,
    next_key: u64,
}

impl Default for VertexStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VertexStore {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            name_index: HashMap::new(),
            kind_index: VertexKind::ALL
                .iter()
                .map(|&kind| (kind, BTreeSet::new()))
                .collect(),
            key_index: HashMap::new(),
            next_key: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn contains(&self, id: VertexId) -> bool {
        id < self.vertices.len()
    }

    pub fn check(&self, id: VertexId) -> GraphResult<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(GraphError::OutOfRange {
                id,
                count: self.vertices.len(),
            })
        }
    }

    pub fn add(&mut self, name: &str, kind: VertexKind) -> GraphResult<VertexId> {
        if self.name_index.contains_key(name) {
            return Err(GraphError::DuplicateName(name.to_string()));
        }

        let id = self.vertices.len();
        let key = VertexKey(self.next_key);
        self.next_key += 1;

        self.vertices.push(Vertex {
            id,
            key,
            name: name.to_string(),
            kind,
        });
        self.name_index.insert(name.to_string(), id);
        self.kind_index.entry(kind).or_default().insert(id);
        self.key_index.insert(key, id);

        Ok(id)
    }

    pub fn remove(&mut self, id: VertexId) -> GraphResult<Vertex> {
        self.check(id)?;

        let removed = self.vertices.remove(id);
        self.name_index.remove(&removed.name);
        self.key_index.remove(&removed.key);
        if let Some(bucket) = self.kind_index.get_mut(&removed.kind) {
            bucket.remove(&id);
        }

        // Everything past the hole moves down one slot.
        for vertex in &mut self.vertices[id..] {
            vertex.id -= 1;
            self.name_index.insert(vertex.name.clone(), vertex.id);
            self.key_index.insert(vertex.key, vertex.id);
        }
        for bucket in self.kind_index.values_mut() {
            if bucket.range(id..).next().is_some() {
                *bucket = bucket
                    .iter()
                    .map(|&other| if other > id { other - 1 } else { other })
                    .collect();
            }
        }

        Ok(removed)
    }

    pub fn lookup_by_name(&self, name: &str) -> Option<VertexId> {
        self.name_index.get(name).copied()
    }

    pub fn lookup_by_id(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id)
    }

    pub fn lookup_by_key(&self, key: VertexKey) -> Option<VertexId> {
        self.key_index.get(&key).copied()
    }

    pub fn ids_of_kind(&self, kind: VertexKind) -> &BTreeSet<VertexId> {
        static EMPTY: BTreeSet<VertexId> = BTreeSet::new();
        self.kind_index.get(&kind).unwrap_or(&EMPTY)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vertex> + '_ {
        self.vertices.iter()
    }
}
