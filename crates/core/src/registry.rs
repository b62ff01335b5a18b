//! In-memory job registry.
//!
//! Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
//! shared between the supervisor tasks (one writer per job), the status
//! query path and the retention sweep. Each mutation holds the write lock
//! for exactly one update, so a line update and an exit handler racing on
//! the same job are serialized rather than lost.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::job::Job;
use crate::output::OutputEvent;
use crate::types::{new_job_id, JobId, Timestamp};

/// Concurrent map of job id to job state.
pub struct JobRegistry {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl JobRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new job in the `starting` state and return its id.
    pub async fn create(&self) -> JobId {
        let mut jobs = self.jobs.write().await;
        let mut id = new_job_id();
        while jobs.contains_key(&id) {
            id = new_job_id();
        }
        jobs.insert(id, Job::new());
        id
    }

    /// Snapshot of a job, or `None` if the id is unknown.
    pub async fn get(&self, id: &JobId) -> Option<Job> {
        self.jobs.read().await.get(id).cloned()
    }

    /// Apply one classified output line to a job.
    ///
    /// Returns `true` if the job exists and changed.
    pub async fn apply(&self, id: &JobId, event: &OutputEvent) -> bool {
        self.update(id, |job| job.apply(event)).await
    }

    /// Move a job to `completed`.
    pub async fn complete(&self, id: &JobId) -> bool {
        self.update(id, Job::complete).await
    }

    /// Move a job to `error`.
    pub async fn fail(&self, id: &JobId) -> bool {
        self.update(id, Job::fail).await
    }

    async fn update(&self, id: &JobId, f: impl FnOnce(&mut Job) -> bool) -> bool {
        match self.jobs.write().await.get_mut(id) {
            Some(job) => f(job),
            None => false,
        }
    }

    /// Remove terminal jobs that finished before `cutoff`.
    ///
    /// Returns the number of jobs removed. Running jobs are never touched.
    pub async fn purge_finished_before(&self, cutoff: Timestamp) -> usize {
        let mut jobs = self.jobs.write().await;
        let before = jobs.len();
        jobs.retain(|_, job| match job.finished_at {
            Some(finished) if job.status.is_terminal() => finished >= cutoff,
            _ => true,
        });
        before - jobs.len()
    }

    /// Return the number of tracked jobs.
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
