//! A stand-in for the expense API that serves canned responses on a local port.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Router,
    http::{StatusCode, Uri, header::CONTENT_TYPE},
    response::IntoResponse,
};
use tokio::net::TcpListener;

pub(crate) struct FakeUpstream {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeUpstream {
    /// The paths requested so far, oldest first.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Serve `body` with `status` for every request.
pub(crate) async fn spawn_fake_upstream(status: StatusCode, body: &'static str) -> FakeUpstream {
    spawn_upstream(status, body, Duration::ZERO).await
}

/// Serve an empty summary, but only after `delay`.
pub(crate) async fn spawn_slow_upstream(delay: Duration) -> FakeUpstream {
    spawn_upstream(
        StatusCode::OK,
        r#"{"total_sum": 0, "total_sum_by_group": {}, "total_sum_by_category": {}}"#,
        delay,
    )
    .await
}

async fn spawn_upstream(status: StatusCode, body: &'static str, delay: Duration) -> FakeUpstream {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = requests.clone();

    let app = Router::new().fallback(move |uri: Uri| {
        let recorded = recorded.clone();

        async move {
            recorded.lock().unwrap().push(uri.path().to_owned());

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            (status, [(CONTENT_TYPE, "application/json")], body).into_response()
        }
    });

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Could not bind fake upstream");
    let addr = listener
        .local_addr()
        .expect("Could not get fake upstream address");

    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Fake upstream stopped unexpectedly");
    });

    FakeUpstream {
        base_url: format!("http://{addr}"),
        requests,
    }
}
