//! In-memory store implementations.
//!
//! Same trait surface as the MongoDB stores, backed by process-local maps.
//! Used by integration tests and local development without a running store.

use std::collections::HashMap;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use parking_lot::RwLock;

use zepp_core::{CouponRecord, JobStatus};

use crate::error::{Result, StoreError};
use crate::jobs::{JobDocument, JobStore};
use crate::parse_object_id;
use crate::users::{UserDocument, UserStore};

#[derive(Debug, Default)]
pub struct MemoryJobStore {
    jobs: RwLock<HashMap<ObjectId, JobDocument>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn create(&self, text: &str, user_id: &str) -> Result<ObjectId> {
        let job = JobDocument {
            id: ObjectId::new(),
            status: JobStatus::Submitted,
            text: text.to_string(),
            user_id: user_id.to_string(),
        };
        let id = job.id;
        self.jobs.write().insert(id, job);
        Ok(id)
    }

    async fn get(&self, id: &str) -> Result<JobDocument> {
        let oid = parse_object_id(id)?;
        self.jobs
            .read()
            .get(&oid)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list(&self) -> Result<Vec<JobDocument>> {
        let mut jobs: Vec<JobDocument> = self.jobs.read().values().cloned().collect();
        jobs.sort_by_key(|job| job.id);
        Ok(jobs)
    }

    async fn transition(&self, id: ObjectId, from: JobStatus, to: JobStatus) -> Result<bool> {
        let mut jobs = self.jobs.write();
        match jobs.get_mut(&id) {
            Some(job) if job.status == from => {
                job.status = to;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_failed(&self, id: ObjectId) -> Result<()> {
        if let Some(job) = self.jobs.write().get_mut(&id) {
            job.status = JobStatus::Failed;
        }
        Ok(())
    }

    async fn delete(&self, id: ObjectId) -> Result<()> {
        self.jobs.write().remove(&id);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<ObjectId, UserDocument>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an empty user document, returning its identifier.
    pub fn add_user(&self) -> ObjectId {
        let id = ObjectId::new();
        self.users.write().insert(
            id,
            UserDocument {
                id,
                coupons: Vec::new(),
            },
        );
        id
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn list(&self) -> Result<Vec<UserDocument>> {
        let mut users: Vec<UserDocument> = self.users.read().values().cloned().collect();
        users.sort_by_key(|user| user.id);
        Ok(users)
    }

    async fn push_coupon(&self, user_id: &str, coupon: &CouponRecord) -> Result<()> {
        let oid = parse_object_id(user_id)?;
        let mut users = self.users.write();
        let user = users.get_mut(&oid).ok_or(StoreError::NotFound)?;
        user.coupons.push(coupon.clone());
        Ok(())
    }
}
