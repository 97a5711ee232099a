//! Job collection.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::Collection;
use serde::{Deserialize, Serialize};

use zepp_core::JobStatus;

use crate::client::StoreClient;
use crate::error::{Result, StoreError};
use crate::parse_object_id;

/// A queued unit of extraction work.
///
/// The document is created on submission and deleted once processing
/// completes; failed jobs are retained with their terminal status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub status: JobStatus,
    pub text: String,
    #[serde(rename = "userId")]
    pub user_id: String,
}

/// Async access to the job collection.
///
/// `transition` is an atomic compare-and-set on the status field; the store
/// guarantees single-document atomicity, which is all the runner needs.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert a new job with status [`JobStatus::Submitted`].
    async fn create(&self, text: &str, user_id: &str) -> Result<ObjectId>;

    /// Fetch one job by its client-supplied identifier.
    async fn get(&self, id: &str) -> Result<JobDocument>;

    /// All job documents.
    async fn list(&self) -> Result<Vec<JobDocument>>;

    /// Atomically move a job from `from` to `to`. Returns `false` when the
    /// job is gone or no longer in `from`.
    async fn transition(&self, id: ObjectId, from: JobStatus, to: JobStatus) -> Result<bool>;

    /// Force a job into [`JobStatus::Failed`], whatever its current state.
    async fn mark_failed(&self, id: ObjectId) -> Result<()>;

    /// Remove a job document.
    async fn delete(&self, id: ObjectId) -> Result<()>;
}

/// MongoDB-backed job store.
#[derive(Debug, Clone)]
pub struct MongoJobStore {
    jobs: Collection<JobDocument>,
}

impl MongoJobStore {
    pub fn new(client: &StoreClient) -> Self {
        Self {
            jobs: client.database().collection("jobs"),
        }
    }
}

#[async_trait]
impl JobStore for MongoJobStore {
    async fn create(&self, text: &str, user_id: &str) -> Result<ObjectId> {
        let job = JobDocument {
            id: ObjectId::new(),
            status: JobStatus::Submitted,
            text: text.to_string(),
            user_id: user_id.to_string(),
        };
        self.jobs.insert_one(&job).await?;
        Ok(job.id)
    }

    async fn get(&self, id: &str) -> Result<JobDocument> {
        let oid = parse_object_id(id)?;
        self.jobs
            .find_one(doc! { "_id": oid })
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn list(&self) -> Result<Vec<JobDocument>> {
        let cursor = self.jobs.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn transition(&self, id: ObjectId, from: JobStatus, to: JobStatus) -> Result<bool> {
        let result = self
            .jobs
            .update_one(
                doc! { "_id": id, "status": from.as_str() },
                doc! { "$set": { "status": to.as_str() } },
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn mark_failed(&self, id: ObjectId) -> Result<()> {
        self.jobs
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "status": JobStatus::Failed.as_str() } },
            )
            .await?;
        Ok(())
    }

    async fn delete(&self, id: ObjectId) -> Result<()> {
        self.jobs.delete_one(doc! { "_id": id }).await?;
        Ok(())
    }
}
