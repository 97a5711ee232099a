//! Background job orchestration.

use std::sync::Arc;

use tracing::{debug, warn};

use zepp_core::JobStatus;
use zepp_extraction::FieldResolver;
use zepp_store::{JobStore, ObjectId, StoreError, UserStore};

/// Submits jobs and processes them on spawned worker tasks.
///
/// Each job's lifecycle is ordered — processing is scheduled only after the
/// create write completes — but nothing orders concurrently submitted jobs
/// against each other. There is no retry and no cancellation; a job that
/// fails mid-processing is marked failed and retained so the failure stays
/// visible to the read endpoints.
#[derive(Clone)]
pub struct JobRunner {
    jobs: Arc<dyn JobStore>,
    users: Arc<dyn UserStore>,
    resolver: Arc<FieldResolver>,
}

impl JobRunner {
    pub fn new(jobs: Arc<dyn JobStore>, users: Arc<dyn UserStore>) -> Self {
        Self {
            jobs,
            users,
            resolver: Arc::new(FieldResolver::new()),
        }
    }

    /// Persist a job document, schedule its processing, and return the job
    /// id without waiting for extraction.
    pub async fn submit(&self, text: String, user_id: String) -> Result<String, StoreError> {
        let job_id = self.jobs.create(&text, &user_id).await?;
        let runner = self.clone();
        tokio::spawn(async move {
            runner.process(job_id, &text, &user_id).await;
        });
        Ok(job_id.to_hex())
    }

    /// Worker side: claim, extract, append, prune.
    async fn process(&self, job_id: ObjectId, text: &str, user_id: &str) {
        match self
            .jobs
            .transition(job_id, JobStatus::Submitted, JobStatus::Processing)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                debug!(%job_id, "job no longer pending, skipping");
                return;
            }
            Err(err) => {
                warn!(%job_id, error = %err, "could not claim job");
                return;
            }
        }

        // Synchronous CPU-bound work; extraction itself cannot fail.
        let coupon = self.resolver.resolve(text);

        if let Err(err) = self.users.push_coupon(user_id, &coupon).await {
            warn!(%job_id, user_id, error = %err, "failed to store extracted coupon");
            self.mark_failed(job_id).await;
            return;
        }

        // The job document is pruned only from a terminal state.
        match self
            .jobs
            .transition(job_id, JobStatus::Processing, JobStatus::Completed)
            .await
        {
            Ok(_) => {
                if let Err(err) = self.jobs.delete(job_id).await {
                    warn!(%job_id, error = %err, "completed job was not pruned");
                }
            }
            Err(err) => {
                warn!(%job_id, error = %err, "failed to complete job");
                self.mark_failed(job_id).await;
            }
        }
    }

    async fn mark_failed(&self, job_id: ObjectId) {
        if let Err(err) = self.jobs.mark_failed(job_id).await {
            warn!(%job_id, error = %err, "failed job could not be marked");
        }
    }
}
