/// Service health probe
///
/// `GET /health` reports the running version and whether the SQLite pool
/// still answers queries (via the same probe the startup path runs). The
/// endpoint itself never errors: a broken store flips the status to
/// `degraded` instead of failing the request, so orchestrators can always
/// read the body.

use axum::{extract::State, Json};
use profi_shared::db::pool;
use serde::Serialize;

use crate::app::AppState;

/// Overall service state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    /// Serving requests and the store is reachable
    Ok,

    /// Serving requests but the store probe failed
    Degraded,
}

/// Health probe body
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: ServiceStatus,
    pub version: &'static str,

    /// True when the store answered the probe query
    pub database: bool,
}

/// Health probe handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthReport> {
    let database = match pool::health_check(&state.db).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Health probe could not reach the database");
            false
        }
    };

    Json(HealthReport {
        status: if database {
            ServiceStatus::Ok
        } else {
            ServiceStatus::Degraded
        },
        version: env!("CARGO_PKG_VERSION"),
        database,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_serialization() {
        let report = HealthReport {
            status: ServiceStatus::Ok,
            version: "1.2.3",
            database: true,
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], "1.2.3");
        assert_eq!(json["database"], true);
    }

    #[test]
    fn test_degraded_status_name() {
        let json = serde_json::to_value(ServiceStatus::Degraded).unwrap();
        assert_eq!(json, "degraded");
    }
}
