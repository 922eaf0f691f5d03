use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::eligibility::{
    build_timeline, days_between, evaluate, EligibilityPolicy, OrderActions, Timeline,
};
use crate::entities::order::{ItemSummary, Order};
use crate::entities::tracking::TrackingInfo;
use crate::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EvaluatePayload {
    pub order: Order,
    #[serde(default)]
    pub tracking: Option<TrackingInfo>,
    /// Caller-chosen evaluation time. Unlike snapshot fields this is strict:
    /// a malformed value rejects the request.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

/// Everything a page needs to render an order's actions and progress.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluationView {
    pub actions: OrderActions,
    pub timeline: Timeline,
    pub items: ItemSummary,
    /// Whole days since the backend last changed the order's status.
    pub days_since_update: Option<i64>,
}

impl EvaluationView {
    pub fn build(
        order: &Order,
        tracking: Option<&TrackingInfo>,
        now: DateTime<Utc>,
        policy: &EligibilityPolicy,
    ) -> Self {
        Self {
            actions: evaluate(order, now, policy),
            timeline: build_timeline(order, tracking),
            items: order.item_summary(),
            days_since_update: order.updated_at.map(|u| days_between(u, now)),
        }
    }
}

pub async fn evaluate_order(
    state: web::Data<AppState>,
    payload: web::Json<EvaluatePayload>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    let now = payload.now.unwrap_or_else(|| state.clock.now());
    let view = EvaluationView::build(
        &payload.order,
        payload.tracking.as_ref(),
        now,
        &state.policy,
    );
    debug!(order_id = %payload.order.id, status = %payload.order.status, actions = ?view.actions, "evaluated snapshot");
    Ok(HttpResponse::Ok().json(view))
}
