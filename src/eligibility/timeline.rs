use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{current_stage_index, lifecycle_path, stage_date};
use crate::entities::order::{Order, OrderStatus};
use crate::entities::tracking::TrackingInfo;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineStage {
    pub stage: OrderStatus,
    pub completed: bool,
    pub current: bool,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    pub stages: Vec<TimelineStage>,
    pub current_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_delivery: Option<DateTime<Utc>>,
}

pub fn build_timeline(order: &Order, tracking: Option<&TrackingInfo>) -> Timeline {
    let path = lifecycle_path(order);
    let current = current_stage_index(path, order.status);
    let stages = path
        .iter()
        .enumerate()
        .map(|(i, stage)| TimelineStage {
            stage: *stage,
            completed: current.is_some_and(|c| i <= c),
            current: current == Some(i),
            date: stage_date(*stage, order, tracking),
        })
        .collect();

    Timeline {
        stages,
        current_index: current,
        tracking_number: tracking.and_then(|t| t.tracking_number.clone()),
        carrier: tracking.and_then(|t| t.carrier.clone()),
        estimated_delivery: tracking.and_then(|t| t.estimated_delivery),
    }
}
