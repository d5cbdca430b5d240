//! HTTP server exposing intent composition

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::blood::RoutingConstraint;
use crate::goals::parse_goals;
use crate::{BloodBlocks, ComposeEngine, ComposeRequest, ComposeResult, Intent, LifestyleInput, PainpointInput};

const DEFAULT_SEVERITY: i64 = 2;

/// Painpoint as submitted by clients; severity is coerced into 1-3
#[derive(Debug, Clone, Deserialize)]
pub struct RawPainpoint {
    pub id: String,
    #[serde(default)]
    pub severity: Option<i64>,
}

impl RawPainpoint {
    pub fn into_input(self) -> PainpointInput {
        let severity = self.severity.unwrap_or(DEFAULT_SEVERITY).clamp(1, 3);
        PainpointInput::new(self.id, severity as u8)
    }
}

/// HTTP request structure
#[derive(Debug, Default, Deserialize)]
pub struct ComposeRequestHttp {
    #[serde(default)]
    pub painpoints: Vec<RawPainpoint>,
    #[serde(default)]
    pub lifestyle: Option<LifestyleInput>,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub goal_intents: Vec<Intent>,
    #[serde(default)]
    pub blood_blocks: Option<BloodBlocks>,
    #[serde(default)]
    pub routing_constraints: Vec<RoutingConstraint>,
}

impl ComposeRequestHttp {
    /// Apply boundary coercion and build the engine request
    pub fn into_compose_request(self) -> ComposeRequest {
        let painpoints: Vec<PainpointInput> = self
            .painpoints
            .into_iter()
            .map(RawPainpoint::into_input)
            .collect();

        let mut goal_intents = parse_goals(&self.goals);
        goal_intents.extend(self.goal_intents);

        let mut blood_blocks = self.blood_blocks;
        if !self.routing_constraints.is_empty() {
            let derived = BloodBlocks::from_routing_constraints(&self.routing_constraints);
            blood_blocks.get_or_insert_with(BloodBlocks::default).extend(derived);
        }

        ComposeRequest {
            painpoints: (!painpoints.is_empty()).then_some(painpoints),
            lifestyle: self.lifestyle,
            goal_intents: (!goal_intents.is_empty()).then_some(goal_intents),
            blood_blocks,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub painpoints_loaded: usize,
    pub lifestyle_rules_loaded: usize,
}

/// Compose handler
pub async fn compose_handler(
    State(engine): State<Arc<ComposeEngine>>,
    Json(req): Json<ComposeRequestHttp>,
) -> Json<ComposeResult> {
    info!(
        "Received compose request: painpoints={}, goals={}, lifestyle={}",
        req.painpoints.len(),
        req.goals.len() + req.goal_intents.len(),
        req.lifestyle.is_some()
    );

    let result = engine.compose(req.into_compose_request());
    Json(result)
}

/// Health check handler
pub async fn health_handler(State(engine): State<Arc<ComposeEngine>>) -> Json<HealthResponse> {
    let config = engine.config();
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "intent-composer".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        painpoints_loaded: config.painpoints.painpoints.len(),
        lifestyle_rules_loaded: config.lifestyle.rules.len(),
    })
}

/// Create and configure the HTTP server
pub fn create_router(engine: Arc<ComposeEngine>) -> Router {
    Router::new()
        .route("/health", axum::routing::get(health_handler))
        .route("/compose", post(compose_handler))
        .with_state(engine)
}

/// Run the HTTP server
pub async fn run_server(engine: Arc<ComposeEngine>, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    info!("Starting intent-composer server on {}", addr);

    let app = create_router(engine);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
