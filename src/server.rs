use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Deserialize;
use tracing::{error, info};

use crate::audit::Engine;
use crate::types::AuditRecord;

#[derive(Deserialize)]
pub struct AuditReq {
    pub content: String,
    #[serde(default)]
    pub url: Option<String>,
}

pub async fn run_audit(
    State(engine): State<Arc<Engine>>,
    Json(req): Json<AuditReq>,
) -> Result<Json<AuditRecord>, (StatusCode, String)> {
    if req.content.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "article content is required".to_string(),
        ));
    }
    match engine.audit(&req.content, req.url.as_deref()).await {
        Ok(record) => Ok(Json(record)),
        Err(err) => {
            error!(error = %err, "audit pipeline failed");
            Err((StatusCode::BAD_GATEWAY, err.to_string()))
        }
    }
}

pub fn router(engine: Arc<Engine>) -> Router {
    Router::new().route("/audit", post(run_audit)).with_state(engine)
}

pub async fn run_server(engine: Engine, addr: &str) -> anyhow::Result<()> {
    let app = router(Arc::new(engine));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
