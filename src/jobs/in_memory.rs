//! In-memory job queue implementation
//!
//! Jobs live in process memory, which fits this application: the only
//! production job is the daily digest, enqueued by the scheduler loop, and a
//! missed run after a restart is simply picked up at the next fire time.

use crate::error::Result;
use crate::traits::job::{Job, JobData, JobQueue};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Default maximum size for completed/failed job history
const DEFAULT_MAX_HISTORY_SIZE: usize = 1_000;

/// In-memory job queue
///
/// # Resource Limits
///
/// The completed and failed job lists are bounded to prevent unbounded memory
/// growth. Older entries are discarded when the limit is reached.
///
/// # Shutdown
///
/// Call `shutdown()` before dropping to cleanly stop the background promoter
/// task.
#[derive(Clone)]
pub struct InMemoryJobQueue {
    pending: Arc<Mutex<VecDeque<JobData>>>,
    processing: Arc<Mutex<HashMap<String, JobData>>>,
    /// Bounded history of completed jobs (oldest removed when full)
    completed: Arc<Mutex<VecDeque<JobData>>>,
    /// Bounded history of failed jobs (oldest removed when full)
    failed: Arc<Mutex<VecDeque<JobData>>>,
    scheduled: Arc<Mutex<BTreeMap<DateTime<Utc>, Vec<JobData>>>>,
    max_retries: u32,
    retry_backoff_seconds: u64,
    /// Maximum size of completed/failed history lists
    max_history_size: usize,
    /// Shutdown flag for the background promoter
    shutdown: Arc<AtomicBool>,
    /// Handle to the promoter task
    promoter_handle: Arc<Mutex<Option<tokio::task::JoinHandle<()>>>>,
}

impl InMemoryJobQueue {
    /// Create a new in-memory job queue
    pub fn new(max_retries: u32, retry_backoff_seconds: u64) -> Self {
        Self::with_history_limit(max_retries, retry_backoff_seconds, DEFAULT_MAX_HISTORY_SIZE)
    }

    /// Create a new in-memory job queue with custom history limit
    ///
    /// # Arguments
    ///
    /// * `max_retries` - Maximum retry attempts for failed jobs
    /// * `retry_backoff_seconds` - Base backoff duration (exponentially increased)
    /// * `max_history_size` - Maximum number of completed/failed jobs to retain
    pub fn with_history_limit(
        max_retries: u32,
        retry_backoff_seconds: u64,
        max_history_size: usize,
    ) -> Self {
        let queue = Self {
            pending: Arc::new(Mutex::new(VecDeque::new())),
            processing: Arc::new(Mutex::new(HashMap::new())),
            completed: Arc::new(Mutex::new(VecDeque::new())),
            failed: Arc::new(Mutex::new(VecDeque::new())),
            scheduled: Arc::new(Mutex::new(BTreeMap::new())),
            max_retries,
            retry_backoff_seconds,
            max_history_size,
            shutdown: Arc::new(AtomicBool::new(false)),
            promoter_handle: Arc::new(Mutex::new(None)),
        };

        // Background task moves scheduled jobs to pending when due
        queue.start_promoter_task();

        queue
    }

    /// Gracefully shut down the queue's background promoter task.
    pub async fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);

        let mut handle_guard = self.promoter_handle.lock().await;
        if let Some(handle) = handle_guard.take() {
            match tokio::time::timeout(tokio::time::Duration::from_secs(5), handle).await {
                Ok(_) => tracing::debug!("Job queue promoter stopped cleanly"),
                Err(_) => tracing::warn!("Job queue promoter did not stop within timeout"),
            }
        }
    }

    /// Number of jobs in the failed history.
    pub async fn failed_count(&self) -> usize {
        self.failed.lock().await.len()
    }

    /// Number of jobs in the completed history.
    pub async fn completed_count(&self) -> usize {
        self.completed.lock().await.len()
    }

    /// Add job to bounded history, removing oldest if at capacity
    fn push_to_bounded_history(history: &mut VecDeque<JobData>, job: JobData, max_size: usize) {
        if history.len() >= max_size {
            history.pop_front();
        }
        history.push_back(job);
    }

    fn start_promoter_task(&self) {
        let scheduled = self.scheduled.clone();
        let pending = self.pending.clone();
        let shutdown = self.shutdown.clone();
        let promoter_handle = self.promoter_handle.clone();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(1));

            loop {
                if shutdown.load(Ordering::Acquire) {
                    tracing::debug!("Job queue promoter shutting down");
                    break;
                }

                interval.tick().await;

                if shutdown.load(Ordering::Acquire) {
                    break;
                }

                let now = Utc::now();

                let mut scheduled_guard = scheduled.lock().await;
                let mut pending_guard = pending.lock().await;

                // Move all jobs scheduled for now or earlier to pending
                let due_keys: Vec<DateTime<Utc>> = scheduled_guard
                    .iter()
                    .take_while(|(time, _)| **time <= now)
                    .map(|(time, _)| *time)
                    .collect();

                for key in due_keys {
                    if let Some(jobs) = scheduled_guard.remove(&key) {
                        for job in jobs {
                            pending_guard.push_back(job);
                        }
                    }
                }
            }
        });

        // Store handle for cleanup - use try_lock since we're in sync context
        if let Ok(mut guard) = promoter_handle.try_lock() {
            *guard = Some(handle);
        } else {
            handle.abort();
            tracing::error!("Failed to store promoter handle");
        };
    }
}

#[async_trait]
impl JobQueue for InMemoryJobQueue {
    async fn enqueue(&self, job: &dyn Job) -> Result<String> {
        let job_id = Uuid::new_v4().to_string();
        let payload = job.serialize()?;

        let job_data = JobData::new(
            job_id.clone(),
            job.job_type().to_string(),
            payload,
            self.max_retries,
        );

        let mut pending = self.pending.lock().await;
        pending.push_back(job_data);

        Ok(job_id)
    }

    async fn dequeue(&self) -> Result<Option<JobData>> {
        let mut pending = self.pending.lock().await;

        if let Some(job_data) = pending.pop_front() {
            let mut processing = self.processing.lock().await;
            processing.insert(job_data.job_id.clone(), job_data.clone());
            Ok(Some(job_data))
        } else {
            Ok(None)
        }
    }

    async fn complete(&self, job_id: &str) -> Result<()> {
        let mut processing = self.processing.lock().await;
        if let Some(job_data) = processing.remove(job_id) {
            let mut completed = self.completed.lock().await;
            Self::push_to_bounded_history(&mut completed, job_data, self.max_history_size);
        }
        Ok(())
    }

    async fn fail(&self, job_id: &str, _error: String) -> Result<()> {
        let mut processing = self.processing.lock().await;

        if let Some(mut job_data) = processing.remove(job_id) {
            if job_data.should_retry() {
                // Schedule retry with exponential backoff
                let backoff_seconds =
                    self.retry_backoff_seconds * (2_u64.pow(job_data.retry_count));
                let retry_at = Utc::now() + Duration::seconds(backoff_seconds as i64);

                job_data.increment_retry();

                let mut scheduled = self.scheduled.lock().await;
                scheduled.entry(retry_at).or_default().push(job_data);
            } else {
                // Retries exhausted (or disabled), move to failed history
                let mut failed = self.failed.lock().await;
                Self::push_to_bounded_history(&mut failed, job_data, self.max_history_size);
            }
        }

        Ok(())
    }

    async fn schedule(&self, job: &dyn Job, run_at: DateTime<Utc>) -> Result<String> {
        let job_id = Uuid::new_v4().to_string();
        let payload = job.serialize()?;

        let job_data = JobData::scheduled(
            job_id.clone(),
            job.job_type().to_string(),
            payload,
            self.max_retries,
            run_at,
        );

        let mut scheduled = self.scheduled.lock().await;
        scheduled.entry(run_at).or_default().push(job_data);

        Ok(job_id)
    }
}

impl Default for InMemoryJobQueue {
    fn default() -> Self {
        Self::new(0, 60)
    }
}
