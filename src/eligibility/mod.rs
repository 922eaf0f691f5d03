//! Order lifecycle and customer-action eligibility.
//!
//! Every function here is pure: the caller supplies the snapshot, the
//! current time and the policy. Missing data yields `false` or `None`.

pub mod timeline;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::entities::order::{Order, OrderStatus};
use crate::entities::tracking::TrackingInfo;

pub use timeline::{build_timeline, Timeline, TimelineStage};

pub const DEFAULT_RETURN_WINDOW_DAYS: i64 = 2;

const MS_PER_DAY: i64 = 86_400_000;

pub const FULFILLMENT_PATH: [OrderStatus; 4] = [
    OrderStatus::Placed,
    OrderStatus::Processing,
    OrderStatus::Shipped,
    OrderStatus::Delivered,
];

pub const CANCELLATION_PATH: [OrderStatus; 3] = [
    OrderStatus::Placed,
    OrderStatus::Cancelled,
    OrderStatus::Refunded,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityPolicy {
    pub return_window_days: i64,
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self {
            return_window_days: DEFAULT_RETURN_WINDOW_DAYS,
        }
    }
}

/// Actions a page may offer for one order snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderActions {
    pub can_cancel: bool,
    pub can_return: bool,
    pub can_review: bool,
    pub can_track: bool,
    pub return_deadline: Option<DateTime<Utc>>,
}

pub fn can_cancel(order: &Order) -> bool {
    order.status == OrderStatus::Placed
}

pub fn can_review(order: &Order) -> bool {
    order.status == OrderStatus::Delivered
}

pub fn can_track(order: &Order) -> bool {
    matches!(
        order.status,
        OrderStatus::Processing | OrderStatus::Shipped | OrderStatus::Delivered
    )
}

/// Whole days from `from` to `to`, flooring the millisecond delta.
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_milliseconds().div_euclid(MS_PER_DAY)
}

pub fn can_return(order: &Order, now: DateTime<Utc>) -> bool {
    can_return_within(order, now, DEFAULT_RETURN_WINDOW_DAYS)
}

/// Delivered, and `now` is no later than the last status update plus
/// `window_days`. Inclusive at the deadline instant.
pub fn can_return_within(order: &Order, now: DateTime<Utc>, window_days: i64) -> bool {
    if order.status != OrderStatus::Delivered {
        return false;
    }
    order
        .updated_at
        .and_then(|delivered_at| deadline_after(delivered_at, window_days))
        .is_some_and(|deadline| now <= deadline)
}

pub fn return_deadline(order: &Order, policy: &EligibilityPolicy) -> Option<DateTime<Utc>> {
    if order.status != OrderStatus::Delivered {
        return None;
    }
    deadline_after(order.updated_at?, policy.return_window_days)
}

fn deadline_after(delivered_at: DateTime<Utc>, window_days: i64) -> Option<DateTime<Utc>> {
    delivered_at.checked_add_signed(TimeDelta::try_days(window_days)?)
}

pub fn lifecycle_path(order: &Order) -> &'static [OrderStatus] {
    match order.status {
        OrderStatus::Cancelled | OrderStatus::Refunded => &CANCELLATION_PATH,
        _ => &FULFILLMENT_PATH,
    }
}

/// Position of `status` on `path`; `None` renders every stage incomplete.
pub fn current_stage_index(path: &[OrderStatus], status: OrderStatus) -> Option<usize> {
    path.iter().position(|s| *s == status)
}

/// Date shown under a timeline stage: tracking event first, then the order's
/// own creation time for `placed`, then the carrier estimate for `delivered`.
pub fn stage_date(
    stage: OrderStatus,
    order: &Order,
    tracking: Option<&TrackingInfo>,
) -> Option<DateTime<Utc>> {
    if let Some(event) = tracking.and_then(|t| t.event_for(stage.as_str())) {
        return event.timestamp;
    }
    match stage {
        OrderStatus::Placed => order.created_at,
        OrderStatus::Delivered => tracking.and_then(|t| t.estimated_delivery),
        _ => None,
    }
}

/// Single entry point for list and detail views. The backend's own
/// `can_cancel` flag never overrides the local rule.
pub fn evaluate(order: &Order, now: DateTime<Utc>, policy: &EligibilityPolicy) -> OrderActions {
    let cancel = can_cancel(order);
    if let Some(server) = order.can_cancel {
        if server != cancel {
            warn!(
                order_id = %order.id,
                status = %order.status,
                server_can_cancel = server,
                local_can_cancel = cancel,
                "backend cancel flag disagrees with status"
            );
        }
    }
    OrderActions {
        can_cancel: cancel,
        can_return: can_return_within(order, now, policy.return_window_days),
        can_review: can_review(order),
        can_track: can_track(order),
        return_deadline: return_deadline(order, policy),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::entities::tracking::TrackingEvent;

    const ALL: [OrderStatus; 7] = [
        OrderStatus::Placed,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
        OrderStatus::Refunded,
        OrderStatus::Unknown,
    ];

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn mk_order(status: OrderStatus, updated_at: Option<DateTime<Utc>>) -> Order {
        Order {
            id: "ORD-1".into(),
            status,
            created_at: Some(ts("2024-12-30T08:00:00Z")),
            updated_at,
            items: vec![],
            can_cancel: None,
            total_amount: None,
        }
    }

    #[test]
    fn cancel_only_when_placed() {
        for s in ALL {
            assert_eq!(can_cancel(&mk_order(s, None)), s == OrderStatus::Placed, "{s}");
        }
    }

    #[test]
    fn review_only_when_delivered() {
        for s in ALL {
            assert_eq!(
                can_review(&mk_order(s, None)),
                s == OrderStatus::Delivered,
                "{s}"
            );
        }
    }

    #[test]
    fn track_while_fulfilment_under_way() {
        let trackable: Vec<_> = ALL
            .into_iter()
            .filter(|s| can_track(&mk_order(*s, None)))
            .collect();
        assert_eq!(
            trackable,
            vec![
                OrderStatus::Processing,
                OrderStatus::Shipped,
                OrderStatus::Delivered
            ]
        );
    }

    #[test]
    fn return_window_boundary_is_inclusive() {
        let now = ts("2025-03-10T12:00:00Z");
        let exact = now - TimeDelta::try_days(2).unwrap();
        let just_over = exact - TimeDelta::try_milliseconds(1).unwrap();
        assert!(can_return(&mk_order(OrderStatus::Delivered, Some(exact)), now));
        assert!(!can_return(
            &mk_order(OrderStatus::Delivered, Some(just_over)),
            now
        ));
    }

    #[test]
    fn return_requires_delivered_regardless_of_date() {
        let now = ts("2025-03-10T12:00:00Z");
        for s in ALL.into_iter().filter(|s| *s != OrderStatus::Delivered) {
            assert!(!can_return(&mk_order(s, Some(now)), now), "{s}");
        }
    }

    #[test]
    fn return_without_update_time_is_refused() {
        let now = ts("2025-03-10T12:00:00Z");
        assert!(!can_return(&mk_order(OrderStatus::Delivered, None), now));
    }

    #[test]
    fn return_scenario_around_two_days() {
        let o = mk_order(OrderStatus::Delivered, Some(ts("2025-01-01T10:00:00Z")));
        assert!(can_return(&o, ts("2025-01-03T09:59:00Z")));
        assert!(!can_return(&o, ts("2025-01-03T10:00:01Z")));
    }

    #[test]
    fn return_refused_a_fraction_of_a_millisecond_late() {
        let o = mk_order(OrderStatus::Delivered, Some(ts("2025-01-01T10:00:00Z")));
        let policy = EligibilityPolicy::default();
        let now = ts("2025-01-03T10:00:00.000500Z");
        let a = evaluate(&o, now, &policy);
        assert!(!a.can_return);
        assert!(a.return_deadline.is_some_and(|d| d < now));
        assert!(can_return(&o, ts("2025-01-03T10:00:00Z")));
    }

    #[test]
    fn return_refused_when_deadline_overflows() {
        let o = mk_order(OrderStatus::Delivered, Some(ts("2025-01-01T10:00:00Z")));
        let now = ts("2025-01-02T10:00:00Z");
        assert!(!can_return_within(&o, now, i64::MAX));
    }

    #[test]
    fn return_window_follows_policy() {
        let o = mk_order(OrderStatus::Delivered, Some(ts("2025-01-01T10:00:00Z")));
        let now = ts("2025-01-05T10:00:00Z");
        assert!(!can_return_within(&o, now, 2));
        assert!(can_return_within(&o, now, 7));
        assert!(!can_return_within(&o, now, 0));
        assert!(can_return_within(&o, ts("2025-01-01T10:00:00Z"), 0));
    }

    #[test]
    fn days_between_floors() {
        let from = ts("2025-01-01T23:59:00Z");
        assert_eq!(days_between(from, ts("2025-01-02T00:00:00Z")), 0);
        assert_eq!(days_between(from, ts("2025-01-02T23:59:00Z")), 1);
        assert_eq!(days_between(from, ts("2025-01-03T23:58:59Z")), 1);
        assert_eq!(days_between(from, ts("2025-01-01T23:58:00Z")), -1);
    }

    #[test]
    fn return_deadline_only_for_delivered() {
        let policy = EligibilityPolicy::default();
        let o = mk_order(OrderStatus::Delivered, Some(ts("2025-01-01T10:00:00Z")));
        assert_eq!(
            return_deadline(&o, &policy),
            Some(ts("2025-01-03T10:00:00Z"))
        );
        let shipped = mk_order(OrderStatus::Shipped, Some(ts("2025-01-01T10:00:00Z")));
        assert_eq!(return_deadline(&shipped, &policy), None);
        assert_eq!(
            return_deadline(&mk_order(OrderStatus::Delivered, None), &policy),
            None
        );
    }

    #[test]
    fn lifecycle_path_has_two_shapes() {
        for s in ALL {
            let path = lifecycle_path(&mk_order(s, None));
            if matches!(s, OrderStatus::Cancelled | OrderStatus::Refunded) {
                assert_eq!(path, &CANCELLATION_PATH[..], "{s}");
            } else {
                assert_eq!(path, &FULFILLMENT_PATH[..], "{s}");
            }
        }
    }

    #[test]
    fn current_stage_index_on_each_path() {
        assert_eq!(
            current_stage_index(&FULFILLMENT_PATH, OrderStatus::Shipped),
            Some(2)
        );
        assert_eq!(
            current_stage_index(&CANCELLATION_PATH, OrderStatus::Refunded),
            Some(2)
        );
        assert_eq!(
            current_stage_index(&FULFILLMENT_PATH, OrderStatus::Unknown),
            None
        );
        assert_eq!(
            current_stage_index(&CANCELLATION_PATH, OrderStatus::Shipped),
            None
        );
    }

    #[test]
    fn stage_date_resolution_order() {
        let o = mk_order(OrderStatus::Shipped, None);
        let tracking = TrackingInfo {
            estimated_delivery: Some(ts("2025-01-06T18:00:00Z")),
            timeline: vec![
                TrackingEvent {
                    status: "placed".into(),
                    timestamp: Some(ts("2024-12-30T08:00:05Z")),
                    message: None,
                },
                TrackingEvent {
                    status: "shipped".into(),
                    timestamp: Some(ts("2025-01-02T09:00:00Z")),
                    message: Some("Left warehouse".into()),
                },
            ],
            ..Default::default()
        };

        // tracking entry beats created_at
        assert_eq!(
            stage_date(OrderStatus::Placed, &o, Some(&tracking)),
            Some(ts("2024-12-30T08:00:05Z"))
        );
        assert_eq!(
            stage_date(OrderStatus::Placed, &o, None),
            o.created_at
        );
        assert_eq!(
            stage_date(OrderStatus::Shipped, &o, Some(&tracking)),
            Some(ts("2025-01-02T09:00:00Z"))
        );
        assert_eq!(
            stage_date(OrderStatus::Delivered, &o, Some(&tracking)),
            Some(ts("2025-01-06T18:00:00Z"))
        );
        assert_eq!(stage_date(OrderStatus::Delivered, &o, None), None);
        assert_eq!(stage_date(OrderStatus::Processing, &o, Some(&tracking)), None);
    }

    #[test]
    fn evaluate_ignores_server_cancel_flag() {
        let now = ts("2025-01-02T00:00:00Z");
        let mut o = mk_order(OrderStatus::Shipped, None);
        o.can_cancel = Some(true);
        assert!(!evaluate(&o, now, &EligibilityPolicy::default()).can_cancel);

        o.status = OrderStatus::Placed;
        o.can_cancel = Some(false);
        assert!(evaluate(&o, now, &EligibilityPolicy::default()).can_cancel);
    }

    #[test]
    fn evaluate_is_idempotent() {
        let policy = EligibilityPolicy::default();
        let now = Utc.with_ymd_and_hms(2025, 1, 2, 12, 0, 0).unwrap();
        for s in ALL {
            let o = mk_order(s, Some(ts("2025-01-01T10:00:00Z")));
            assert_eq!(evaluate(&o, now, &policy), evaluate(&o, now, &policy));
            assert_eq!(lifecycle_path(&o), lifecycle_path(&o));
            assert_eq!(
                stage_date(s, &o, None),
                stage_date(s, &o, None)
            );
        }
    }

    #[test]
    fn evaluate_delivered_within_window() {
        let o = mk_order(OrderStatus::Delivered, Some(ts("2025-01-01T10:00:00Z")));
        let a = evaluate(&o, ts("2025-01-02T10:00:00Z"), &EligibilityPolicy::default());
        assert_eq!(
            a,
            OrderActions {
                can_cancel: false,
                can_return: true,
                can_review: true,
                can_track: true,
                return_deadline: Some(ts("2025-01-03T10:00:00Z")),
            }
        );
    }
}
