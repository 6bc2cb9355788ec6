use clap::Parser;
use ledger_node::{build_state, router, Args};
use std::net::SocketAddr;
use tracing::{info, Level};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let node_id = Uuid::new_v4().simple().to_string();
    let state = build_state(&args, &node_id)?;
    info!(
        %node_id,
        difficulty = args.difficulty,
        peers = state.nodes().len(),
        "node state ready"
    );

    let app = router(state);
    let addr: SocketAddr = args.listen.parse()?;
    info!("ledger-node listening on http://{addr}");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
