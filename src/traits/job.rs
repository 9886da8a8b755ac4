//! Background job system traits
//!
//! Defines the contract between jobs, the queue, and the workers that drain
//! it. The only production job is the daily digest, but the machinery is
//! generic: a job serializes itself into the queue and a registered handler
//! deserializes and runs it.

use crate::app::AppContext;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A background job that can be executed asynchronously
///
/// Jobs implement this trait to define their execution logic.
/// The job must be serializable so it can be stored in queues.
#[async_trait]
pub trait Job: Send + Sync + Debug {
    /// Unique identifier for this job type (e.g., "daily_digest")
    fn job_type(&self) -> &str;

    /// Serialize the job payload to JSON
    fn serialize(&self) -> Result<serde_json::Value>;

    /// Execute the job with the given application context
    ///
    /// The context provides access to stores, the mailer, the stats API
    /// and the renderer.
    async fn execute(&self, ctx: &AppContext) -> Result<()>;
}

/// Job data structure for queue storage
///
/// This represents a job that has been enqueued, including
/// metadata like retry count and scheduling information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobData {
    /// Unique job identifier
    pub job_id: String,
    /// Job type identifier (matches `Job::job_type()`)
    pub job_type: String,
    /// Serialized job payload (JSON)
    pub payload: serde_json::Value,
    /// Current retry attempt count
    pub retry_count: u32,
    /// Maximum number of retries allowed
    pub max_retries: u32,
    /// When this job should be executed (None = immediate)
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Timestamp when job was created
    pub created_at: DateTime<Utc>,
}

impl JobData {
    /// Create a new JobData instance
    pub fn new(
        job_id: String,
        job_type: String,
        payload: serde_json::Value,
        max_retries: u32,
    ) -> Self {
        Self {
            job_id,
            job_type,
            payload,
            retry_count: 0,
            max_retries,
            scheduled_at: None,
            created_at: Utc::now(),
        }
    }

    /// Create a scheduled JobData instance
    pub fn scheduled(
        job_id: String,
        job_type: String,
        payload: serde_json::Value,
        max_retries: u32,
        run_at: DateTime<Utc>,
    ) -> Self {
        Self {
            job_id,
            job_type,
            payload,
            retry_count: 0,
            max_retries,
            scheduled_at: Some(run_at),
            created_at: Utc::now(),
        }
    }

    /// Check if this job should be retried
    pub fn should_retry(&self) -> bool {
        self.retry_count < self.max_retries
    }

    /// Increment retry count and return new count
    pub fn increment_retry(&mut self) -> u32 {
        self.retry_count += 1;
        self.retry_count
    }
}

/// Job queue trait for enqueueing and processing background jobs
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Enqueue a job for immediate execution
    ///
    /// Returns the job ID that can be used to track the job.
    async fn enqueue(&self, job: &dyn Job) -> Result<String>;

    /// Dequeue the next available job
    ///
    /// Returns `None` if no jobs are available.
    /// The job should be moved to a "processing" state.
    async fn dequeue(&self) -> Result<Option<JobData>>;

    /// Mark a job as completed
    async fn complete(&self, job_id: &str) -> Result<()>;

    /// Mark a job as failed
    ///
    /// Stores the error message and determines if retry is needed.
    async fn fail(&self, job_id: &str, error: String) -> Result<()>;

    /// Schedule a job for future execution
    ///
    /// The job will be moved to the ready queue when `run_at` time arrives.
    async fn schedule(&self, job: &dyn Job, run_at: DateTime<Utc>) -> Result<String>;
}
