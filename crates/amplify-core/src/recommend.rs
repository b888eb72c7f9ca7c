use crate::engine::GraphEngine;
use crate::error::GraphResult;
use crate::model::{VertexId, VertexKind};
use serde::Serialize;
use std::collections::BTreeSet;

pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub id: VertexId,
    pub name: String,
    /// Jaccard ratio in `[0, 1]`, unscaled.
    pub score: f64,
}

/// `|a ∩ b| / |a ∪ b|`, or `0.0` when both sets are empty.
pub fn jaccard(a: &BTreeSet<VertexId>, b: &BTreeSet<VertexId>) -> f64 {
    let shared = a.intersection(b).count();
    let union = a.len() + b.len() - shared;
    if union == 0 {
        0.0
    } else {
        shared as f64 / union as f64
    }
}

/// Ranks music vertices by how much of their neighborhood they share with a source track.
#[derive(Debug, Clone, Copy)]
pub struct Recommender {
    limit: usize,
}

impl Default for Recommender {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_N)
    }
}

impl Recommender {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn recommend(
        &self,
        graph: &GraphEngine,
        source_name: &str,
    ) -> GraphResult<Vec<Recommendation>> {
        recommend(graph, source_name, self.limit)
    }
}

/// Top `top_n` music vertices most similar to `source_name`, best first.
/// Equal scores keep ascending id order.
pub fn recommend(
    graph: &GraphEngine,
    source_name: &str,
    top_n: usize,
) -> GraphResult<Vec<Recommendation>> {
    let source = graph.expect_kind(source_name, VertexKind::Music)?;
    if top_n == 0 {
        return Ok(Vec::new());
    }

    let profile = graph.neighbors(source)?;
    if profile.is_empty() {
        return Ok(Vec::new());
    }

    let mut scored = Vec::new();
    for &candidate in graph.vertices_of_kind(VertexKind::Music) {
        if candidate == source {
            continue;
        }
        let other = graph.neighbors(candidate)?;
        if other.is_empty() {
            continue;
        }
        let score = jaccard(&profile, &other);
        if score > 0.0 {
            let name = graph
                .vertex(candidate)
                .map(|v| v.name.clone())
                .unwrap_or_default();
            scored.push(Recommendation {
                id: candidate,
                name,
                score,
            });
        }
    }

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(top_n);
    Ok(scored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;

    fn tracks_with_genres(spec: &[(&str, Vec<&str>)]) -> GraphEngine {
        let mut g = GraphEngine::new();
        for (track, genres) in spec {
            let t = g.insert_vertex(track, VertexKind::Music).unwrap();
            for genre in genres {
                let gid = match g.id_of(genre) {
                    Some(id) => id,
                    None => g.insert_vertex(genre, VertexKind::Genre).unwrap(),
                };
                g.insert_edge(t, gid, 1.0).unwrap();
            }
        }
        g
    }

    #[test]
    fn jaccard_bounds() {
        let a = BTreeSet::from([1, 2, 3]);
        let b = BTreeSet::from([2, 3, 4, 5]);
        assert_eq!(jaccard(&a, &b), 2.0 / 5.0);
        assert_eq!(jaccard(&a, &a), 1.0);
        assert_eq!(jaccard(&a, &BTreeSet::from([9])), 0.0);
        assert_eq!(jaccard(&BTreeSet::new(), &BTreeSet::new()), 0.0);
    }

    #[test]
    fn shared_genre_gives_perfect_score() {
        let g = tracks_with_genres(&[("X", vec!["G"]), ("Y", vec!["G"])]);
        let recs = recommend(&g, "X", DEFAULT_TOP_N).unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].name, "Y");
        assert_eq!(recs[0].score, 1.0);
    }

    #[test]
    fn unconnected_track_gets_nothing() {
        let g = tracks_with_genres(&[("X", vec![]), ("Y", vec!["G"])]);
        assert!(recommend(&g, "X", 5).unwrap().is_empty());
    }

    #[test]
    fn orders_by_score_then_discovery() {
        let g = tracks_with_genres(&[
            ("seed", vec!["rock", "pop"]),
            ("half_a", vec!["rock"]),
            ("same", vec!["rock", "pop"]),
            ("half_b", vec!["pop"]),
            ("other", vec!["jazz"]),
            ("third", vec!["rock", "jazz"]),
        ]);
        let recs = recommend(&g, "seed", 10).unwrap();
        let names: Vec<&str> = recs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["same", "half_a", "half_b", "third"]);
        assert!(recs.iter().all(|r| r.score > 0.0 && r.score <= 1.0));

        let top2 = recommend(&g, "seed", 2).unwrap();
        assert_eq!(top2.len(), 2);
        assert!(recommend(&g, "seed", 0).unwrap().is_empty());
    }

    #[test]
    fn rejects_missing_and_non_music_sources() {
        let g = tracks_with_genres(&[("X", vec!["G"])]);
        assert_eq!(
            recommend(&g, "nope", 5).unwrap_err(),
            GraphError::NotFound("nope".to_string())
        );
        assert!(matches!(
            recommend(&g, "G", 5).unwrap_err(),
            GraphError::WrongKind {
                expected: VertexKind::Music,
                actual: VertexKind::Genre,
                ..
            }
        ));
    }

    #[test]
    fn recommender_uses_configured_limit() {
        let g = tracks_with_genres(&[
            ("a", vec!["g"]),
            ("b", vec!["g"]),
            ("c", vec!["g"]),
            ("d", vec!["g"]),
        ]);
        let recs = Recommender::new(2).recommend(&g, "a").unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(Recommender::default().limit(), DEFAULT_TOP_N);
    }
}
