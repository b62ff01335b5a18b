//! Read-only job lookups for polling clients.

use std::sync::Arc;

use crate::error::CoreError;
use crate::job::Job;
use crate::registry::JobRegistry;
use crate::types::JobId;

/// Entity name reported in not-found errors.
pub const ENTITY_DOWNLOAD: &str = "Download";

/// Query side of the job registry.
#[derive(Clone)]
pub struct StatusQuery {
    registry: Arc<JobRegistry>,
}

impl StatusQuery {
    pub fn new(registry: Arc<JobRegistry>) -> Self {
        Self { registry }
    }

    /// Current snapshot of a job.
    pub async fn get_status(&self, id: &JobId) -> Result<Job, CoreError> {
        self.registry
            .get(id)
            .await
            .ok_or_else(|| CoreError::NotFound {
                entity: ENTITY_DOWNLOAD,
                id: id.to_string(),
            })
    }

    /// Like [`get_status`](Self::get_status) for an id taken from a URL.
    ///
    /// Strings that are not valid ids are reported as not found: they can
    /// never have been issued.
    pub async fn get_status_by_key(&self, raw: &str) -> Result<Job, CoreError> {
        match raw.parse::<JobId>() {
            Ok(id) => self.get_status(&id).await,
            Err(_) => Err(CoreError::NotFound {
                entity: ENTITY_DOWNLOAD,
                id: raw.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
