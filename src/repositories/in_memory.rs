use crate::entities::order::Order;
use crate::entities::tracking::TrackingInfo;
use crate::errors::RepoErr;
use crate::repositories::{ListOrdersQuery, OrderRepository};
use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct Entry {
    order: Order,
    tracking: Option<TrackingInfo>,
}

#[derive(Clone, Default)]
pub struct InMemoryOrderRepository {
    inner: Arc<RwLock<HashMap<String, Entry>>>,
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn upsert(&self, order: Order) -> Result<Order, RepoErr> {
        let mut map = self.inner.write().await;
        match map.get_mut(&order.id) {
            // a fresh snapshot keeps the tracking payload already attached
            Some(entry) => entry.order = order.clone(),
            None => {
                map.insert(
                    order.id.clone(),
                    Entry {
                        order: order.clone(),
                        tracking: None,
                    },
                );
            }
        }
        Ok(order)
    }

    async fn get_by_id(&self, id: &str) -> Result<Order, RepoErr> {
        let map = self.inner.read().await;
        map.get(id)
            .map(|e| e.order.clone())
            .ok_or(RepoErr::NotFound)
    }

    async fn list(&self, q: ListOrdersQuery) -> Result<Vec<Order>, RepoErr> {
        let map = self.inner.read().await;
        let mut items: Vec<Order> = map.values().map(|e| e.order.clone()).collect();

        if let Some(status) = q.status {
            items.retain(|o| o.status == status);
        }
        // newest first; orders without a creation time sink, ties break on id
        items.sort_by(|a, b| {
            Reverse(a.created_at)
                .cmp(&Reverse(b.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });

        let start = q.offset.unwrap_or(0).max(0) as usize;
        let end = q
            .limit
            .filter(|&l| l > 0)
            .map(|l| start + l as usize)
            .unwrap_or(items.len());

        let end = end.min(items.len());
        if start >= items.len() {
            return Ok(vec![]);
        }

        Ok(items[start..end].to_vec())
    }

    async fn delete(&self, id: &str) -> Result<(), RepoErr> {
        let mut map = self.inner.write().await;
        map.remove(id).map(|_| ()).ok_or(RepoErr::NotFound)
    }

    async fn set_tracking(&self, id: &str, tracking: TrackingInfo) -> Result<(), RepoErr> {
        let mut map = self.inner.write().await;
        let entry = map.get_mut(id).ok_or(RepoErr::NotFound)?;
        entry.tracking = Some(tracking);
        Ok(())
    }

    async fn get_tracking(&self, id: &str) -> Result<Option<TrackingInfo>, RepoErr> {
        let map = self.inner.read().await;
        map.get(id)
            .map(|e| e.tracking.clone())
            .ok_or(RepoErr::NotFound)
    }
}
