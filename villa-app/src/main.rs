use axum::http::header;
use axum::middleware::map_response;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use axum_prometheus::PrometheusMetricLayer;
use clap::Parser;
use shadow_rs::shadow;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::propagate_header::PropagateHeaderLayer;
use tower_http::sensitive_headers::SetSensitiveHeadersLayer;
use tower_http::trace;
use tracing::{info, warn};
use villa_core::config::SiteConfig;
use villa_core::seed::Catalog;
use villa_tools::logger;

pub mod errors;
mod routes;

shadow!(build);

#[derive(Parser, Debug)]
#[command(name = "villa-app")]
#[command(about = "99Villa catalog, search, chat and lead API", long_about = None)]
struct Cli {
    #[arg(long, env = "HTTP_HOST", default_value = "127.0.0.1")]
    http_host: String,
    #[arg(long, env = "HTTP_PORT", default_value_t = 8080)]
    http_port: u16,
    /// TOML site configuration; built-in defaults when omitted
    #[arg(long, env = "VILLA_CONFIG")]
    config: Option<PathBuf>,
    /// Catalog JSON as written by `villa-tools export`; the built-in seed when omitted
    #[arg(long, env = "VILLA_CATALOG")]
    catalog: Option<PathBuf>,
}

pub const APP_VERSION: &str = shadow_rs::formatcp!(
    "{} ({} {}), build_env: {}, {}, {}",
    build::PKG_VERSION,
    build::SHORT_COMMIT,
    build::BUILD_TIME,
    build::RUST_VERSION,
    build::RUST_CHANNEL,
    build::CARGO_VERSION
);

async fn set_version_header<B>(mut res: Response<B>) -> Response<B> {
    match APP_VERSION.parse() {
        Ok(value) => {
            res.headers_mut().insert("x-version-id", value);
        }
        Err(err) => {
            warn!("Failed to parse x-version-id header value: {err}");
        }
    }
    res
}

fn load_catalog(path: Option<&PathBuf>) -> errors::Result<Catalog> {
    match path {
        Some(path) => {
            info!("Loading catalog from {}", path.display());
            let json = std::fs::read_to_string(path)?;
            Ok(Catalog::from_json(&json)?)
        }
        None => Ok(Catalog::seed()),
    }
}

/// API routes wrapped in metrics, version header, tracing, compression,
/// request-id propagation and CORS.
fn build_router(state: routes::AppState) -> Router {
    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
    Router::new()
        .merge(routes::create_route(state))
        .route("/metrics", get(|| async move { metric_handle.render() }))
        .layer(prometheus_layer)
        .layer(map_response(set_version_header))
        .layer(
            trace::TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().include_headers(true))
                .on_request(trace::DefaultOnRequest::new().level(tracing::Level::DEBUG))
                .on_response(trace::DefaultOnResponse::new().level(tracing::Level::DEBUG)),
        )
        // Admin bearer tokens stay out of the logs.
        .layer(SetSensitiveHeadersLayer::new(std::iter::once(
            header::AUTHORIZATION,
        )))
        .layer(CompressionLayer::new())
        .layer(PropagateHeaderLayer::new(header::HeaderName::from_static(
            "x-request-id",
        )))
        .layer(CorsLayer::permissive())
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> errors::Result<()> {
    logger::setup("villa_app", "info");

    let cli = Cli::parse();
    info!("Starting {APP_VERSION}");

    let config = SiteConfig::load_or_default(cli.config.as_deref())?;
    let catalog = load_catalog(cli.catalog.as_ref())?;
    info!(
        "Brand {}, {} properties in catalog",
        config.brand,
        catalog.all_properties().len()
    );

    let http_addr: SocketAddr = format!("{}:{}", cli.http_host, cli.http_port)
        .parse()
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err))?;
    let listener = tokio::net::TcpListener::bind(http_addr).await?;
    let svc = build_router(routes::AppState::new(&config, catalog))
        .into_make_service_with_connect_info::<SocketAddr>();

    let token = CancellationToken::new();
    tokio::spawn(watch_signals(token.clone()));

    info!("{} is running on http://{http_addr}", config.brand);
    axum::serve(listener, svc)
        .with_graceful_shutdown(token.cancelled_owned())
        .await?;
    info!("Server shutdown");

    Ok(())
}

/// Cancels `token` on Ctrl+C or, on unix, SIGTERM.
async fn watch_signals(token: CancellationToken) {
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("failed to install SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("failed to listen for Ctrl+C: {err}");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("signal received, starting graceful shutdown");
    token.cancel();
}
