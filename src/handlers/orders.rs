use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::eligibility::{build_timeline, evaluate, OrderActions};
use crate::entities::order::{Order, OrderStatus};
use crate::entities::tracking::TrackingInfo;
use crate::errors::ApiError;
use crate::handlers::eligibility::EvaluationView;
use crate::repositories::ListOrdersQuery;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<OrderStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderListEntry {
    pub order: Order,
    pub actions: OrderActions,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderDetail {
    pub order: Order,
    #[serde(flatten)]
    pub view: EvaluationView,
}

#[instrument(skip_all, fields(order_id = %path))]
pub async fn put_order(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<Order>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let mut order = payload.into_inner();
    if order.id.is_empty() {
        order.id = id;
    } else if order.id != id {
        return Err(ApiError::BadRequest(format!(
            "body id {} does not match path id {}",
            order.id, id
        )));
    }
    let stored = state.orders.upsert(order).await?;
    info!(status = %stored.status, items = stored.items.len(), "cached order snapshot");
    Ok(HttpResponse::Ok().json(stored))
}

pub async fn list_orders(
    state: web::Data<AppState>,
    q: web::Query<ListQuery>,
) -> Result<HttpResponse, ApiError> {
    let orders = state
        .orders
        .list(ListOrdersQuery {
            status: q.status,
            limit: q.limit,
            offset: q.offset,
        })
        .await?;
    let now = state.clock.now();
    let items: Vec<OrderListEntry> = orders
        .into_iter()
        .map(|order| OrderListEntry {
            actions: evaluate(&order, now, &state.policy),
            order,
        })
        .collect();
    Ok(HttpResponse::Ok().json(items))
}

#[instrument(skip_all, fields(order_id = %path))]
pub async fn get_order(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let order = state.orders.get_by_id(&id).await?;
    let tracking = state.orders.get_tracking(&id).await?;
    let view = EvaluationView::build(&order, tracking.as_ref(), state.clock.now(), &state.policy);
    Ok(HttpResponse::Ok().json(OrderDetail { order, view }))
}

#[instrument(skip_all, fields(order_id = %path))]
pub async fn put_tracking(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<TrackingInfo>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let tracking = payload.into_inner();
    info!(events = tracking.timeline.len(), carrier = ?tracking.carrier, "attaching tracking");
    state.orders.set_tracking(&id, tracking).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn get_timeline(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let order = state.orders.get_by_id(&id).await?;
    let tracking = state.orders.get_tracking(&id).await?;
    Ok(HttpResponse::Ok().json(build_timeline(&order, tracking.as_ref())))
}

#[instrument(skip_all, fields(order_id = %path))]
pub async fn delete_order(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    state.orders.delete(&id).await?;
    info!("evicted order snapshot");
    Ok(HttpResponse::NoContent().finish())
}
