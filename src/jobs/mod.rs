//! Analysis job tracking
//!
//! Extraction is slow, so each uploaded statement is processed as a job.
//! The [`JobStore`] is an explicit, cloneable handle: callers submit work,
//! then poll [`JobStore::get`] until the job leaves [`JobStatus::Processing`].

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{CamelsError, Result};
use crate::extraction::StatementExtractor;
use crate::rating::RatingScheme;
use crate::report::{analyze, BankAnalysis};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Processing,
    Completed,
    Failed,
}

/// Pipeline stage a job is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStep {
    Queued,
    Extracting,
    Preparing,
    Analyzing,
    Done,
    Failed,
}

impl JobStep {
    pub fn describe(&self) -> &'static str {
        match self {
            JobStep::Queued => "Queued",
            JobStep::Extracting => "Extracting statement",
            JobStep::Preparing => "Preparing data",
            JobStep::Analyzing => "Computing CAMELS ratios and ratings",
            JobStep::Done => "Done",
            JobStep::Failed => "Failed",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Job {
    pub id: JobId,
    pub filename: String,
    pub file_path: PathBuf,
    pub status: JobStatus,
    pub step: JobStep,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub result: Option<BankAnalysis>,
    pub error: Option<String>,
}

impl Job {
    pub fn is_finished(&self) -> bool {
        self.status != JobStatus::Processing
    }
}

/// Shared map of jobs keyed by id
#[derive(Debug, Clone, Default)]
pub struct JobStore {
    jobs: Arc<RwLock<HashMap<JobId, Job>>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Poisoned locks are recovered; the map is never left half-updated
    fn read(&self) -> RwLockReadGuard<'_, HashMap<JobId, Job>> {
        self.jobs.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<JobId, Job>> {
        self.jobs.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a new job for the statement at `file_path`
    pub fn create(&self, file_path: &Path) -> JobId {
        let id = JobId::new();
        let now = Utc::now();
        let filename = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_path.display().to_string());

        let job = Job {
            id,
            filename,
            file_path: file_path.to_path_buf(),
            status: JobStatus::Processing,
            step: JobStep::Queued,
            created_at: now,
            updated_at: now,
            result: None,
            error: None,
        };
        self.write().insert(id, job);
        info!("job {} created for {}", id, file_path.display());
        id
    }

    /// Snapshot of a job
    pub fn get(&self, id: JobId) -> Option<Job> {
        self.read().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn update<F: FnOnce(&mut Job)>(&self, id: JobId, f: F) -> Result<()> {
        let mut jobs = self.write();
        let job = jobs.get_mut(&id).ok_or(CamelsError::JobNotFound(id))?;
        f(job);
        job.updated_at = Utc::now();
        Ok(())
    }

    pub fn set_step(&self, id: JobId, step: JobStep) -> Result<()> {
        self.update(id, |job| job.step = step)
    }

    pub fn complete(&self, id: JobId, analysis: BankAnalysis) -> Result<()> {
        self.update(id, |job| {
            job.status = JobStatus::Completed;
            job.step = JobStep::Done;
            job.result = Some(analysis);
        })
    }

    pub fn fail(&self, id: JobId, error: impl Into<String>) -> Result<()> {
        let error = error.into();
        warn!("job {} failed: {}", id, error);
        self.update(id, |job| {
            job.status = JobStatus::Failed;
            job.step = JobStep::Failed;
            job.error = Some(error);
        })
    }

    /// Process a registered job on the calling thread
    ///
    /// Failures are recorded on the job and also returned.
    pub fn run(&self, id: JobId, extractor: &dyn StatementExtractor, scheme: &RatingScheme) -> Result<()> {
        let path = self.get(id).ok_or(CamelsError::JobNotFound(id))?.file_path;

        match self.process(id, &path, extractor, scheme) {
            Ok(analysis) => {
                info!("job {} completed", id);
                self.complete(id, analysis)
            }
            Err(e) => {
                self.fail(id, e.to_string())?;
                Err(e)
            }
        }
    }

    fn process(
        &self,
        id: JobId,
        path: &Path,
        extractor: &dyn StatementExtractor,
        scheme: &RatingScheme,
    ) -> Result<BankAnalysis> {
        self.set_step(id, JobStep::Extracting)?;
        let extracted = extractor.extract(path)?;

        self.set_step(id, JobStep::Preparing)?;
        let record = extracted.into_record(Some(path.display().to_string()));

        self.set_step(id, JobStep::Analyzing)?;
        Ok(analyze(record, None, scheme))
    }

    /// Register a job and process it on the rayon pool
    pub fn submit(
        &self,
        path: PathBuf,
        extractor: Arc<dyn StatementExtractor>,
        scheme: Arc<RatingScheme>,
    ) -> JobId {
        let id = self.create(&path);
        let store = self.clone();
        rayon::spawn(move || {
            // Outcome is recorded on the job itself
            let _ = store.run(id, extractor.as_ref(), &scheme);
        });
        id
    }

    /// Drop finished jobs last updated more than `max_age` ago
    pub fn prune_finished(&self, max_age: Duration) -> usize {
        let cutoff = Utc::now() - max_age;
        let mut jobs = self.write();
        let before = jobs.len();
        jobs.retain(|_, job| !(job.is_finished() && job.updated_at < cutoff));
        before - jobs.len()
    }
}
