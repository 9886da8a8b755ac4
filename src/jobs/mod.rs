//! Background job system
//!
//! Trait-based job processing with an in-memory queue, a worker pool that
//! drains it, and a daily scheduler that books the digest job at a fixed
//! local hour.

mod config;
mod in_memory;
mod registry;
mod schedule;
mod worker;


pub use config::JobsConfig;
pub use in_memory::InMemoryJobQueue;
pub use registry::JobRegistry;
pub use schedule::{DailySchedule, DailyScheduler};
pub use worker::{JobWorker, WorkerPool};
