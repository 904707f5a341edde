use cm_session::AppState;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::warn;
use serde_json::json;

/// GET /health - component status
pub async fn health(State(state): State<AppState>) -> Response {
    let database = match sqlx::query("SELECT 1").execute(&state.engine.pool).await {
        Ok(_) => "operational",
        Err(e) => {
            warn!("Health check: database unavailable: {}", e);
            "unavailable"
        }
    };
    let (status, label) = if database == "operational" {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let lock_holder = state.lock.holder().map(|holder| holder.user);
    let health = json!({
        "status": label,
        "version": env!("CARGO_PKG_VERSION"),
        "repositoryId": state.engine.identity.repository_id,
        "components": {
            "database": database,
            "archives": state.engine.archive_dir.display().to_string(),
        },
        "sessions": state.sessions.count(),
        "lockHolder": lock_holder,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status, Json(health)).into_response()
}

/// GET /live - liveness probe
pub async fn liveness() -> Response {
    (StatusCode::OK, "OK").into_response()
}
