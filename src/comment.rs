//! Comments left on offers. Only the parts the offer routes depend on.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::projection::{Field, Projection};
use crate::user::{User, UserRdo};

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub text: String,
    pub rating: u8,
    pub offer_id: String,
    pub author: User,
}

pub struct CommentRdo;

impl Projection for CommentRdo {
    const SHAPE: &'static [Field] = &[
        Field::plain("id"),
        Field::plain("text"),
        Field::plain("rating"),
        Field::nested("author", UserRdo::SHAPE),
    ];
}

/// Comment persistence, provided by the host application.
#[async_trait]
pub trait CommentService: Send + Sync + 'static {
    async fn find_by_offer_id(&self, offer_id: &str, limit: Option<usize>) -> anyhow::Result<Vec<Comment>>;

    /// Deletes every comment of an offer, returning how many were removed.
    async fn delete_by_offer_id(&self, offer_id: &str) -> anyhow::Result<u64>;
}
