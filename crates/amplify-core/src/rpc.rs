use crate::browse::{self, TrackFilter};
use crate::catalog::{self, ArtistRecord, ImportPolicy};
use crate::connectivity;
use crate::context::GraphContext;
use crate::engine::{GraphEngine, DEFAULT_EDGE_WEIGHT};
use crate::error::GraphError;
use crate::model::{VertexId, VertexKey, VertexKind};
use crate::persistence::GraphSnapshot;
use crate::recommend::Recommender;
use crate::rpc_types::{
    RpcError, RpcRequest, RpcResponse, INVALID_PARAMS, METHOD_NOT_FOUND, PARSE_ERROR,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{
    stdin, stdout, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct VertexParams {
    name: String,
    #[serde(default)]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct IdParams {
    id: VertexId,
}

#[derive(Debug, Deserialize)]
struct KeyParams {
    key: VertexKey,
}

#[derive(Debug, Deserialize)]
struct EdgeParams {
    a: VertexId,
    b: VertexId,
    #[serde(default = "default_weight")]
    weight: f64,
}

fn default_weight() -> f64 {
    DEFAULT_EDGE_WEIGHT
}

#[derive(Debug, Deserialize)]
struct PairParams {
    a: VertexId,
    b: VertexId,
}

#[derive(Debug, Deserialize)]
struct KindFilterParams {
    #[serde(default)]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct KindParams {
    kind: String,
}

#[derive(Debug, Deserialize)]
struct RecommendParams {
    name: String,
    #[serde(default)]
    limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ImportParams {
    #[serde(flatten)]
    artist: ArtistRecord,
    #[serde(default)]
    policy: Option<ImportPolicy>,
}

#[derive(Debug, Deserialize)]
struct RestoreParams {
    snapshot: GraphSnapshot,
}

fn params<T: DeserializeOwned>(raw: Option<Value>) -> Result<T, RpcError> {
    let raw = match raw {
        Some(Value::Null) | None => json!({}),
        Some(value) => value,
    };
    serde_json::from_value(raw).map_err(|e| RpcError::new(INVALID_PARAMS, e.to_string()))
}

fn vertex_json(graph: &GraphEngine, id: VertexId) -> Result<Value, RpcError> {
    let vertex = graph.vertex(id).ok_or(GraphError::OutOfRange {
        id,
        count: graph.vertex_count(),
    })?;
    Ok(serde_json::to_value(vertex)?)
}

/// Runs one request against the context and wraps the outcome.
pub async fn dispatch(ctx: &GraphContext, request: RpcRequest) -> RpcResponse {
    debug!(method = %request.method, "request");
    match handle(ctx, &request.method, request.params).await {
        Ok(result) => RpcResponse::success(request.id, result),
        Err(error) => {
            warn!(
                method = %request.method,
                code = error.code,
                message = %error.message,
                "request rejected"
            );
            RpcResponse::failure(request.id, error)
        }
    }
}

async fn handle(ctx: &GraphContext, method: &str, raw: Option<Value>) -> Result<Value, RpcError> {
    match method {
        "graph.info" => Ok(serde_json::to_value(ctx.read(|g| g.summary()).await)?),

        "vertex.insert" => {
            let p: VertexParams = params(raw)?;
            let kind = VertexKind::from_tag(&p.kind);
            ctx.write(|g| {
                let id = g.insert_vertex(&p.name, kind)?;
                vertex_json(g, id)
            })
            .await
        }

        "vertex.remove" => {
            let p: IdParams = params(raw)?;
            let removed = ctx.write(|g| g.remove_vertex(p.id)).await?;
            Ok(serde_json::to_value(removed)?)
        }

        "vertex.get" => {
            let p: IdParams = params(raw)?;
            let detail = ctx.read(|g| browse::vertex_detail(g, p.id)).await?;
            Ok(serde_json::to_value(detail)?)
        }

        "vertex.list" => {
            let p: KindFilterParams = params(raw)?;
            // An unrecognised tag matches no vertex.
            let wanted = p.kind.as_deref().map(VertexKind::parse_tag);
            ctx.read(|g| {
                let vertices: Vec<_> = g
                    .vertices()
                    .filter(|v| wanted.map_or(true, |k| k == Some(v.kind)))
                    .collect();
                Ok(json!({ "total": vertices.len(), "vertices": vertices }))
            })
            .await
        }

        "vertex.resolve" => {
            let p: KeyParams = params(raw)?;
            ctx.read(|g| {
                let id = g
                    .resolve_key(p.key)
                    .ok_or_else(|| GraphError::NotFound(p.key.to_string()))?;
                vertex_json(g, id)
            })
            .await
        }

        "edge.insert" => {
            let p: EdgeParams = params(raw)?;
            let (created, edges) = ctx
                .write(|g| g.insert_edge(p.a, p.b, p.weight).map(|c| (c, g.edge_count())))
                .await?;
            Ok(json!({
                "a": p.a,
                "b": p.b,
                "weight": p.weight,
                "created": created,
                "edges": edges
            }))
        }

        "edge.remove" => {
            let p: PairParams = params(raw)?;
            let weight = ctx.write(|g| g.remove_edge(p.a, p.b)).await?;
            Ok(json!({ "a": p.a, "b": p.b, "weight": weight }))
        }

        "neighbors" => {
            let p: IdParams = params(raw)?;
            let neighbors = ctx.read(|g| g.neighbors(p.id)).await?;
            Ok(json!({ "id": p.id, "neighbors": neighbors }))
        }

        "vertices.of_kind" => {
            let p: KindParams = params(raw)?;
            let ids = match VertexKind::parse_tag(&p.kind) {
                Some(kind) => ctx.read(|g| g.vertices_of_kind(kind).clone()).await,
                None => Default::default(),
            };
            Ok(json!({ "kind": p.kind, "ids": ids }))
        }

        "connectivity" => {
            let components = ctx.read(connectivity::analyze).await;
            Ok(json!({ "components": components, "connected": components <= 1 }))
        }

        "recommend" => {
            let p: RecommendParams = params(raw)?;
            let recommender = match p.limit {
                Some(limit) => Recommender::new(usize::try_from(limit).unwrap_or(0)),
                None => Recommender::new(ctx.config().default_top_n),
            };
            let recommendations = ctx.read(|g| recommender.recommend(g, &p.name)).await?;
            Ok(json!({ "source": p.name, "recommendations": recommendations }))
        }

        "tracks.list" => {
            let filter: TrackFilter = params(raw)?;
            let tracks = ctx.read(|g| browse::track_listing(g, &filter)).await?;
            Ok(json!({ "total": tracks.len(), "tracks": tracks }))
        }

        "track.get" => {
            let p: IdParams = params(raw)?;
            let track = ctx.read(|g| browse::track_detail(g, p.id)).await?;
            Ok(serde_json::to_value(track)?)
        }

        "catalog.import" => {
            let p: ImportParams = params(raw)?;
            let policy = p.policy.unwrap_or(ctx.config().import_policy);
            let report = ctx
                .write(|g| catalog::import_artist(g, &p.artist, policy))
                .await?;
            Ok(serde_json::to_value(report)?)
        }

        "demo.seed" => {
            let graph = catalog::seed_demo()?;
            let summary = graph.summary();
            ctx.replace(graph).await;
            Ok(serde_json::to_value(summary)?)
        }

        "snapshot.export" => Ok(serde_json::to_value(ctx.read(|g| g.snapshot()).await)?),

        "snapshot.restore" => {
            let p: RestoreParams = params(raw)?;
            let graph = GraphEngine::from_snapshot(&p.snapshot)?;
            let summary = graph.summary();
            ctx.replace(graph).await;
            Ok(serde_json::to_value(summary)?)
        }

        other => Err(RpcError::new(
            METHOD_NOT_FOUND,
            format!("method not found: {other}"),
        )),
    }
}

/// Serves line-delimited JSON-RPC until the reader hits EOF.
/// One response line per request line.
pub async fn serve<R, W>(ctx: &GraphContext, reader: R, writer: &mut W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<RpcRequest>(&line) {
            Ok(request) => dispatch(ctx, request).await,
            Err(e) => {
                warn!(error = %e, "unparseable request line");
                RpcResponse::failure(None, RpcError::new(PARSE_ERROR, e.to_string()))
            }
        };

        let mut out = serde_json::to_string(&response)?;
        out.push('\n');
        writer.write_all(out.as_bytes()).await?;
        writer.flush().await?;
    }

    Ok(())
}

pub async fn run_stdio(ctx: GraphContext) -> anyhow::Result<()> {
    info!("serving JSON-RPC on stdio");
    let mut out = stdout();
    serve(&ctx, BufReader::new(stdin()), &mut out).await
}
