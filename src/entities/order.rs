use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::lenient_timestamp;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Placed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
    /// Anything the backend sends outside the known set.
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Placed => "placed",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    Active,
    Cancelled,
    Returned,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    pub quantity: u32,
    #[serde(default)]
    pub cancelled_quantity: u32,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
}

impl OrderItem {
    /// Units still owed to the customer. Saturates when the snapshot reports
    /// more cancelled units than ordered.
    pub fn remaining_quantity(&self) -> u32 {
        self.quantity.saturating_sub(self.cancelled_quantity)
    }

    pub fn line_total(&self) -> Option<Decimal> {
        self.price
            .map(|p| p * Decimal::from(self.remaining_quantity()))
    }
}

/// Read-only order snapshot as returned by the commerce backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    #[serde(default)]
    pub id: String,
    pub status: OrderStatus,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    /// Backend's own cancel flag. Advisory: see `eligibility::evaluate`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_cancel: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ItemSummary {
    pub active: usize,
    pub cancelled: usize,
    pub returned: usize,
    pub remaining_units: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_value: Option<Decimal>,
}

impl Order {
    pub fn item_summary(&self) -> ItemSummary {
        let mut summary = ItemSummary::default();
        for item in &self.items {
            match item.status {
                ItemStatus::Active => summary.active += 1,
                ItemStatus::Cancelled => summary.cancelled += 1,
                ItemStatus::Returned => summary.returned += 1,
                ItemStatus::Unknown => {}
            }
            if item.status == ItemStatus::Active {
                summary.remaining_units += item.remaining_quantity();
                if let Some(total) = item.line_total() {
                    *summary.remaining_value.get_or_insert(Decimal::ZERO) += total;
                }
            }
        }
        summary
    }
}
