use amplify_core::catalog;
use amplify_core::config::EngineConfig;
use amplify_core::context::GraphContext;
use amplify_core::rpc::run_stdio;
use anyhow::Context;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the JSON-RPC stream; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = EngineConfig::from_env().context("failed to read configuration")?;
    tracing::info!(
        top_n = config.default_top_n,
        policy = config.import_policy.as_str(),
        seed_demo = config.seed_demo,
        "starting amplify"
    );

    let graph = if config.seed_demo {
        catalog::seed_demo().context("failed to seed demo catalog")?
    } else {
        Default::default()
    };
    let ctx = GraphContext::with_graph(graph, config);

    run_stdio(ctx).await?;

    tracing::info!("stdin closed, shutting down");
    Ok(())
}
