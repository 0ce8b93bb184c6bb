mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod services;
mod utils;

use std::io;

use actix_web::{App, HttpServer, middleware::Logger, web};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;
use crate::utils::jwt::TokenService;
use crate::utils::password::PasswordHasher;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();

    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().map_err(io::Error::other)?;

    tracing::info!("connecting to database");
    let db = db::establish_connection(&config)
        .await
        .map_err(io::Error::other)?;
    db::ensure_schema(&db).await.map_err(io::Error::other)?;
    tracing::info!("database connected");

    if config.seed_sample_books {
        services::seed::seed_sample_books(&db)
            .await
            .map_err(io::Error::other)?;
    }

    let db = web::Data::new(db);
    let tokens = web::Data::new(TokenService::new(&config.jwt_secret, config.token_ttl_days));
    let hasher = web::Data::new(PasswordHasher::new(config.password_iterations));

    tracing::info!(host = %config.host, port = config.port, "starting server");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(db.clone())
            .app_data(tokens.clone())
            .app_data(hasher.clone())
            .configure(routes::configure_routes)
    })
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
}
