/// Liveness endpoint
///
/// `GET /health` answers without a session. A store outage is reported as
/// `"degraded"` with a 200 so load balancers can tell "up but unhealthy"
/// from "down".
///
/// ```json
/// { "status": "healthy", "version": "0.1.0", "database": "connected", "active_connections": 1 }
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use kanban_shared::db::pool;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,

    /// Application version
    pub version: String,

    /// "connected" or "disconnected"
    pub database: String,

    /// Connections currently checked out of the pool
    pub active_connections: u32,
}

/// Reports service health; a database outage degrades rather than fails
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let connected = match pool::health_check(&state.db).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            false
        }
    };

    let stats = pool::pool_stats(&state.db);

    Ok(Json(HealthResponse {
        status: if connected { "healthy" } else { "degraded" }.to_string(),
        version: kanban_shared::VERSION.to_string(),
        database: if connected { "connected" } else { "disconnected" }.to_string(),
        active_connections: stats.active_connections,
    }))
}
