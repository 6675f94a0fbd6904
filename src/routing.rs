//! Application router configuration.

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState, endpoints,
    logging::logging_middleware,
    not_found::get_404_not_found,
    view_host::{get_index_page, get_summary, post_panel_toggle},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::SUMMARY, get(get_summary))
        .route(endpoints::PANEL_TOGGLE, post(post_panel_toggle))
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;

    use crate::{AppState, build_router, client::SourceConfig, endpoints};

    fn test_server() -> TestServer {
        let state = AppState::new(&SourceConfig::new("http://127.0.0.1:9"), 4)
            .expect("Could not create app state");

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn root_serves_page_shell() {
        let response = test_server().get(endpoints::ROOT).await;

        response.assert_status_ok();
        assert!(response.text().contains("id=\"main\""));
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        test_server()
            .get("/no/such/page")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
