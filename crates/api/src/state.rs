use std::sync::Arc;

use ytgrab_core::status::StatusQuery;
use ytgrab_core::supervisor::Supervisor;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Starts download jobs.
    pub supervisor: Arc<Supervisor>,
    /// Read side of the job registry.
    pub status: StatusQuery,
}

impl AppState {
    /// Wire the status query to the supervisor's registry.
    pub fn new(config: Arc<ServerConfig>, supervisor: Arc<Supervisor>) -> Self {
        let status = StatusQuery::new(Arc::clone(supervisor.registry()));
        Self {
            config,
            supervisor,
            status,
        }
    }
}
