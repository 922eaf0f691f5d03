pub mod in_memory;

use async_trait::async_trait;

use crate::{
    entities::{
        order::{Order, OrderStatus},
        tracking::TrackingInfo,
    },
    errors::RepoErr,
};

#[derive(Debug, Clone, Default)]
pub struct ListOrdersQuery {
    pub status: Option<OrderStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Cache of order snapshots already fetched from the commerce backend.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn upsert(&self, order: Order) -> Result<Order, RepoErr>;
    async fn get_by_id(&self, id: &str) -> Result<Order, RepoErr>;
    async fn list(&self, q: ListOrdersQuery) -> Result<Vec<Order>, RepoErr>;
    async fn delete(&self, id: &str) -> Result<(), RepoErr>;
    async fn set_tracking(&self, id: &str, tracking: TrackingInfo) -> Result<(), RepoErr>;
    async fn get_tracking(&self, id: &str) -> Result<Option<TrackingInfo>, RepoErr>;
}
