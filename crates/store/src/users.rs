//! User collection.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, to_bson};
use mongodb::Collection;
use serde::{Deserialize, Serialize};

use zepp_core::CouponRecord;

use crate::client::StoreClient;
use crate::error::{Result, StoreError};
use crate::parse_object_id;

/// A user document with its accumulated coupon records.
///
/// User documents are created elsewhere; this layer only reads them and
/// appends coupons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub coupons: Vec<CouponRecord>,
}

/// Async access to the user collection.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All user documents.
    async fn list(&self) -> Result<Vec<UserDocument>>;

    /// Append one coupon to a user's list, as an atomic single-document
    /// update. Fails with [`StoreError::NotFound`] when the user is absent.
    async fn push_coupon(&self, user_id: &str, coupon: &CouponRecord) -> Result<()>;
}

/// MongoDB-backed user store.
#[derive(Debug, Clone)]
pub struct MongoUserStore {
    users: Collection<UserDocument>,
}

impl MongoUserStore {
    pub fn new(client: &StoreClient) -> Self {
        Self {
            users: client.database().collection("users"),
        }
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn list(&self) -> Result<Vec<UserDocument>> {
        let cursor = self.users.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn push_coupon(&self, user_id: &str, coupon: &CouponRecord) -> Result<()> {
        let oid = parse_object_id(user_id)?;
        let coupon = to_bson(coupon)?;
        let result = self
            .users
            .update_one(doc! { "_id": oid }, doc! { "$push": { "coupons": coupon } })
            .await?;
        if result.matched_count == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_document_tolerates_missing_coupons_field() {
        let id = ObjectId::new();
        let value = serde_json::json!({ "_id": { "$oid": id.to_hex() } });
        let user: UserDocument = serde_json::from_value(value).unwrap();
        assert_eq!(user.id, id);
        assert!(user.coupons.is_empty());
    }
}
