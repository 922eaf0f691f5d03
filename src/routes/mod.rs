use crate::handlers;
use actix_web::web::{self, ServiceConfig};

pub fn config(cfg: &mut ServiceConfig) {
    cfg.service(web::scope("/health").route("", web::get().to(handlers::health::ping)))
        .service(
            web::scope("/eligibility")
                .route("", web::post().to(handlers::eligibility::evaluate_order)),
        )
        .service(
            web::scope("/orders")
                .route("", web::get().to(handlers::orders::list_orders))
                .route("/{id}", web::put().to(handlers::orders::put_order))
                .route("/{id}", web::get().to(handlers::orders::get_order))
                .route("/{id}", web::delete().to(handlers::orders::delete_order))
                .route(
                    "/{id}/tracking",
                    web::put().to(handlers::orders::put_tracking),
                )
                .route(
                    "/{id}/timeline",
                    web::get().to(handlers::orders::get_timeline),
                ),
        );
}
