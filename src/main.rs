use actix_web::{middleware::Logger, App, HttpServer};
use dotenvy::dotenv;
use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

use storefront_orders::{
    config::Settings, repositories::in_memory::InMemoryOrderRepository, routes, state::AppState,
    utils::SystemClock,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    SubscriberBuilder::default()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let settings = Settings::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    tracing::info!(
        addr = %settings.server_addr,
        return_window_days = settings.policy.return_window_days,
        "starting storefront-orders"
    );

    let state = AppState::new(
        InMemoryOrderRepository::default(),
        SystemClock,
        settings.policy,
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(routes::config)
    })
    .bind(&settings.server_addr)?
    .run()
    .await
}
