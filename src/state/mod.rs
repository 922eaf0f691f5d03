use crate::eligibility::EligibilityPolicy;
use crate::repositories::OrderRepository;
use crate::utils::Clock;
use actix_web::web::Data;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<dyn OrderRepository>,
    pub clock: Arc<dyn Clock>,
    pub policy: EligibilityPolicy,
}

impl AppState {
    pub fn new<R, C>(orders: R, clock: C, policy: EligibilityPolicy) -> Data<Self>
    where
        R: OrderRepository + 'static,
        C: Clock + 'static,
    {
        Data::new(Self {
            orders: Arc::new(orders),
            clock: Arc::new(clock),
            policy,
        })
    }
}
