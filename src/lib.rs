use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use errors::StartupError;
use handlers::AppState;
use repositories::customer::PgCustomerRepository;
use services::customer::CustomerService;

pub mod config;
pub mod errors;
pub mod handlers;
mod logger;
pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;
pub mod validators;
mod views;

/// Routes of the customer registry. Every request is cut off after
/// `request_timeout`.
pub fn app(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(handlers::customer::index))
        .route(
            "/create",
            get(handlers::customer::create_form).post(handlers::customer::create),
        )
        .route(
            "/edit/:id",
            get(handlers::customer::edit_form).post(handlers::customer::update),
        )
        .route("/customers/:id", get(handlers::customer::show))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn axum() -> Result<(), StartupError> {
    dotenv().ok();

    logger::init();

    let config = config::Config::from_env()?;

    let pool = PgPoolOptions::new()
        .min_connections(config.pg.poolminsize)
        .max_connections(config.pg.poolmaxsize)
        .acquire_timeout(config.pg.acquire_timeout())
        .connect(&config.database_url())
        .await?;

    let repository = PgCustomerRepository::new(pool);
    repository.migrate().await?;

    let service = CustomerService::new(Arc::new(repository));
    let app = app(
        AppState::new(Arc::new(service)),
        config.server.request_timeout(),
    );

    let addr = config.server.address()?;

    tracing::info!("listening on {}", addr);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
