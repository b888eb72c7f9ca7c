use crate::engine::GraphEngine;
use crate::model::VertexId;
use std::collections::VecDeque;

/// Counts connected components. `0` for an empty graph; callers read `<= 1` as connected.
pub fn analyze(graph: &GraphEngine) -> usize {
    components(graph).len()
}

pub fn is_connected(graph: &GraphEngine) -> bool {
    analyze(graph) <= 1
}

/// Connected components in discovery order, each listing its ids ascending.
pub fn components(graph: &GraphEngine) -> Vec<Vec<VertexId>> {
    let n = graph.vertex_count();
    let mut visited = vec![false; n];
    let mut found = Vec::new();

    for start in 0..n {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        let mut members = vec![start];
        let mut queue = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            let Ok(neighbors) = graph.neighbors(current) else {
                continue;
            };
            for next in neighbors {
                if !visited[next] {
                    visited[next] = true;
                    members.push(next);
                    queue.push_back(next);
                }
            }
        }

        members.sort_unstable();
        found.push(members);
    }

    found
}
