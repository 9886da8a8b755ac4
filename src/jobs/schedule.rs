//! Daily scheduling for the digest job.
//!
//! [`DailySchedule`] maps a local wall-clock hour to concrete UTC fire times,
//! handling DST gaps and ambiguities. [`DailyScheduler`] is the long-running
//! task that books the job with the queue once per day.

use std::sync::Arc;

use chrono::{DateTime, Duration, LocalResult, TimeZone, Utc};
use chrono_tz::Tz;
use tokio::sync::mpsc;

use crate::traits::job::{Job, JobQueue};

/// A once-a-day fire time at a fixed local hour.
#[derive(Debug, Clone, Copy)]
pub struct DailySchedule {
    hour: u32,
    tz: Tz,
}

impl DailySchedule {
    /// `hour` is a 24-hour local wall-clock hour in `tz`.
    pub fn new(hour: u32, tz: Tz) -> Self {
        Self { hour, tz }
    }

    /// First fire time strictly after `now`.
    ///
    /// A wall-clock time erased by a DST spring-forward gap is skipped to the
    /// next day; an ambiguous fall-back time fires at its first occurrence.
    pub fn next_fire(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let local_now = now.with_timezone(&self.tz);
        for day_offset in 0..3 {
            let date = local_now.date_naive() + Duration::days(day_offset);
            let Some(naive) = date.and_hms_opt(self.hour, 0, 0) else {
                continue;
            };
            let localized = match self.tz.from_local_datetime(&naive) {
                LocalResult::Single(fire) => Some(fire),
                LocalResult::Ambiguous(first, _) => Some(first),
                LocalResult::None => None,
            };
            if let Some(fire) = localized {
                let fire = fire.with_timezone(&Utc);
                if fire > now {
                    return fire;
                }
            }
        }
        // Unreachable for valid hours, but never loop forever
        now + Duration::days(1)
    }
}

/// Long-running task that books the daily job with the queue.
///
/// Each iteration schedules the job for the next fire time, sleeps until that
/// time has passed, then books the following day. The queue's promoter task
/// releases the job to a worker when it comes due.
pub struct DailyScheduler {
    schedule: DailySchedule,
    queue: Arc<dyn JobQueue>,
    job: Arc<dyn Job>,
    shutdown_tx: mpsc::Sender<()>,
}

impl DailyScheduler {
    pub fn new(
        schedule: DailySchedule,
        queue: Arc<dyn JobQueue>,
        job: Arc<dyn Job>,
    ) -> (Self, mpsc::Receiver<()>) {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        (
            Self {
                schedule,
                queue,
                job,
                shutdown_tx,
            },
            shutdown_rx,
        )
    }

    /// A sender that requests shutdown, usable after the scheduler task
    /// has taken ownership of `self`.
    pub fn shutdown_handle(&self) -> mpsc::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Run until shutdown is requested.
    pub async fn start(self, mut shutdown_rx: mpsc::Receiver<()>) {
        tracing::info!(
            hour = self.schedule.hour,
            timezone = %self.schedule.tz,
            "Daily scheduler started"
        );

        loop {
            let now = Utc::now();
            let fire_at = self.schedule.next_fire(now);

            match self.queue.schedule(self.job.as_ref(), fire_at).await {
                Ok(job_id) => {
                    tracing::info!(job_id = %job_id, fire_at = %fire_at, "Booked next daily run");
                }
                Err(error) => {
                    tracing::error!(error = %error, "Failed to book daily run");
                }
            }

            // Sleep just past the fire time so the next iteration books the
            // following day rather than re-booking the same slot.
            let wait = (fire_at - now).to_std().unwrap_or_default()
                + std::time::Duration::from_secs(1);

            tokio::select! {
                _ = shutdown_rx.recv() => {
                    tracing::info!("Daily scheduler stopped");
                    return;
                }
                _ = tokio::time::sleep(wait) => {}
            }
        }
    }
}

// ============================================================================
// Daily schedule tests
// ============================================================================
