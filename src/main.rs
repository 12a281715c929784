use std::{fs, io};

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use dsa_gateway::{AppState, config::AppConfig, routes::register};
use tracing::info;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[actix_web::main]
async fn main() -> io::Result<()> {
    let config = AppConfig::from_env().map_err(io::Error::other)?;

    fs::create_dir_all(&config.log_dir)?;
    let file_appender = rolling::never(&config.log_dir, "gateway.log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(io::Error::other)?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    let state = AppState::from_config(&config).map_err(io::Error::other)?;

    info!(
        host = %config.host,
        port = config.port,
        tree_api = %config.tree_api_url,
        persistence = %config.persistence_url,
        token_configured = config.github_token.is_some(),
        custom_catalog = config.fallback_catalog.is_some(),
        "starting DSA gateway"
    );

    let bind_addr = format!("{}:{}", config.host, config.port);
    let shared_state = web::Data::new(state);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .app_data(shared_state.clone())
            .configure(register)
    })
    .bind(bind_addr)?
    .run()
    .await
}
