use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::order::OrderStatus;
use crate::utils::lenient_timestamp;

/// One carrier or fulfilment event. `status` is kept as the raw stage name the
/// tracking service reported.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackingEvent {
    pub status: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TrackingInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_status: Option<OrderStatus>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub estimated_delivery: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,
    #[serde(default)]
    pub timeline: Vec<TrackingEvent>,
}

impl TrackingInfo {
    /// First event whose status names `stage` exactly.
    pub fn event_for(&self, stage: &str) -> Option<&TrackingEvent> {
        self.timeline.iter().find(|e| e.status == stage)
    }
}
