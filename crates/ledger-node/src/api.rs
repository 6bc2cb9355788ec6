use crate::constants::{CONNECTED_MESSAGE, GET_CHAIN_PATH, MINED_MESSAGE};
use crate::peer::HttpPeerClient;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use ledger_core::{Block, Chain, LedgerError, NodeState, TransactionRequest};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::warn;

pub type AppState = Arc<NodeState<HttpPeerClient>>;

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub message: &'static str,
    #[serde(flatten)]
    pub block: Block,
}

#[derive(Serialize)]
pub struct ChainResponse {
    pub chain: Chain,
    pub length: usize,
}

#[derive(Serialize)]
pub struct ValidityResponse {
    pub is_valid: bool,
}

#[derive(Serialize)]
pub struct TransactionAccepted {
    pub message: String,
    pub block_index: u64,
}

#[derive(Deserialize)]
pub struct ConnectRequest {
    nodes: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct ConnectResponse {
    pub message: &'static str,
    pub network_nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct ReplaceResponse {
    pub chain_replaced: bool,
    pub chain: Chain,
}

/// Maps core errors onto HTTP statuses with a JSON `{"error": ...}` body.
pub struct ApiError(LedgerError);

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            LedgerError::MissingField(_) | LedgerError::InvalidAddress(_) => {
                StatusCode::BAD_REQUEST
            }
            LedgerError::SearchExhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
            LedgerError::SearchAborted(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        warn!(%status, "request failed: {}", self.0);
        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(Health { status: "ok" }) }))
        .route("/mine_block", get(mine_block))
        .route(GET_CHAIN_PATH, get(get_chain))
        .route("/is_valid", get(is_valid))
        .route("/add_transaction", post(add_transaction))
        .route("/connect_node", post(connect_node))
        .route("/replace_chain", get(replace_chain))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn mine_block(State(state): State<AppState>) -> Result<Json<MineResponse>, ApiError> {
    let block = state.mine_block().await?;
    Ok(Json(MineResponse {
        message: MINED_MESSAGE,
        block,
    }))
}

async fn get_chain(State(state): State<AppState>) -> Json<ChainResponse> {
    let chain = state.chain();
    Json(ChainResponse {
        length: chain.len(),
        chain,
    })
}

async fn is_valid(State(state): State<AppState>) -> Json<ValidityResponse> {
    Json(ValidityResponse {
        is_valid: state.is_valid(),
    })
}

async fn add_transaction(
    State(state): State<AppState>,
    Json(request): Json<TransactionRequest>,
) -> Result<(StatusCode, Json<TransactionAccepted>), ApiError> {
    let block_index = state.submit_transaction(request)?;
    Ok((
        StatusCode::CREATED,
        Json(TransactionAccepted {
            message: format!("Success! Your transaction will be added to block {block_index}"),
            block_index,
        }),
    ))
}

async fn connect_node(
    State(state): State<AppState>,
    Json(request): Json<ConnectRequest>,
) -> Result<Json<ConnectResponse>, ApiError> {
    let network_nodes = state.connect_nodes(request.nodes)?;
    Ok(Json(ConnectResponse {
        message: CONNECTED_MESSAGE,
        network_nodes,
    }))
}

async fn replace_chain(State(state): State<AppState>) -> Json<ReplaceResponse> {
    let (chain_replaced, chain) = state.reconcile().await;
    Json(ReplaceResponse {
        chain_replaced,
        chain,
    })
}
