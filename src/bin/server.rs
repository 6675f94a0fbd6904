use std::{fs::OpenOptions, net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use expense_view::{
    AppState, DEFAULT_MAX_LIVE_VIEWS, DEFAULT_REQUEST_TIMEOUT, SourceConfig, build_router,
    graceful_shutdown,
};

/// Serves the expense summary view.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The base URL of the expense API, e.g. `http://localhost:5000`.
    #[arg(long, env = "EXPENSE_API_BASE_URL")]
    api_base_url: String,

    /// The port to serve the view from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// How long to wait for the expense API before giving up, in seconds.
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs())]
    request_timeout_secs: u64,

    /// The number of rendered views to keep for panel toggles.
    #[arg(long, default_value_t = DEFAULT_MAX_LIVE_VIEWS)]
    max_live_views: usize,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let source_config = SourceConfig {
        api_base_url: args.api_base_url,
        request_timeout: Duration::from_secs(args.request_timeout_secs),
    };
    let app_state = AppState::new(&source_config, args.max_live_views)
        .expect("Could not configure the expense API client");

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(app_state));

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    tracing::info!(
        "HTTP server listening on {addr}, reading expenses from {}",
        source_config.api_base_url
    );
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .expect("Server stopped unexpectedly");
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but upstream failures
        // are already logged by the handlers.
        .on_failure(());

    router.layer(tracing_layer)
}
