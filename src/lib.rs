//! An expense summary view served as HTML fragments.
//!
//! The view reads a period token from the page's location fragment, fetches
//! the matching summary from an expense API at `/api/v1.0/expenses/{token}`,
//! and renders a summary header followed by one collapsible block per
//! expense group. The browser drives the view with htmx; the expand/collapse
//! state of every block is kept on the server.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
pub mod client;
mod endpoints;
mod error;
mod html;
mod internal_server_error;
mod logging;
mod not_found;
pub mod panels;
pub mod period;
mod routing;
pub mod summary;
mod templates;
pub mod view;
mod view_host;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, DEFAULT_MAX_LIVE_VIEWS};
pub use client::{DEFAULT_REQUEST_TIMEOUT, SourceConfig};
pub use error::Error;
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
