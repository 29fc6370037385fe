use actix_cors::Cors;
use actix_web::{http::header, middleware::NormalizePath, web, App, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use art_portfolio_backend::{
    constants::START_TIME,
    db::postgres::DbConnection,
    graceful_shutdown::shutdown_signal,
    middlewares::auth::AuthMiddleware,
    routes::configure_routes,
    settings::AppConfig,
    AppState,
};

fn init_tracing() {
    dotenv::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let json_output = std::env::var("APP_ENV")
        .map(|env| env.eq_ignore_ascii_case("production"))
        .unwrap_or(false);

    let json_layer = json_output.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!json_output).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

fn cors_for(config: &AppConfig) -> Cors {
    let origins = config.cors_origins();
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600);

    if origins.iter().any(|o| o == "*") {
        cors.allow_any_origin()
    } else {
        origins
            .iter()
            .fold(cors.supports_credentials(), |cors, origin| cors.allowed_origin(origin))
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_tracing();
    once_cell::sync::Lazy::force(&START_TIME);

    let config = match AppConfig::new() {
        Ok(cfg) => {
            tracing::info!("Loaded configuration: {:?}", cfg);
            cfg
        },
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let db = DbConnection::from_config(&config);
    if let Err(e) = db.run_migrations().await {
        tracing::warn!("Database not ready at startup, serving fallback content until it is: {}", e);
    }

    let state = match AppState::new(&config, db) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to initialise mail transport: {}", e);
            std::process::exit(1);
        }
    };
    state.rate_limiter.spawn_eviction();
    let app_state = web::Data::new(state);

    let server_addr = format!("{}:{}", config.host, config.port);
    tracing::info!(
        "Starting {} v{} on {}",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr
    );

    let server = HttpServer::new({
        let config = config.clone();
        move || {
            App::new()
                .app_data(app_state.clone())
                .wrap(AuthMiddleware)
                .wrap(NormalizePath::trim())
                .wrap(cors_for(&config))
                .wrap(TracingLogger::default())
                .configure(configure_routes)
        }
    })
    .workers(config.worker_count.max(1))
    .bind(server_addr)?
    .run();

    tokio::select! {
        res = server => res,
        _ = shutdown_signal() => Ok(()),
    }
}
