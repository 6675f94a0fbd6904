//! Route handlers that host the expense summary view in the browser.
//!
//! The page shell asks for a render pass when it loads and whenever the
//! location fragment changes, sending the fragment as the `period` parameter.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::{HxRequest, HxRetarget};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    app_state::ViewRegistry,
    client::HttpSummarySource,
    endpoints,
    html::{ALERT_CONTAINER_SELECTOR, PAGE_CONTAINER_STYLE, base, loading_spinner},
    period::Period,
    view::{MAIN_CONTAINER_ID, SummaryView, ViewId},
};

const PAGE_TITLE: &str = "Summary";

/// Sends the location fragment as the `period` parameter.
const PERIOD_FROM_LOCATION: &str = "js:{period: window.location.hash.slice(1)}";

/// The state needed to render views and toggle their panels.
#[derive(Debug, Clone)]
pub struct ViewHostState {
    /// Where the views get their expense summaries from.
    pub summary_source: HttpSummarySource,
    /// The views that can still receive panel toggles.
    pub views: Arc<Mutex<ViewRegistry>>,
}

impl FromRef<AppState> for ViewHostState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            summary_source: state.summary_source.clone(),
            views: state.views.clone(),
        }
    }
}

/// The query parameters for a render pass.
#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    /// The location fragment, with or without the leading `#`.
    pub period: Option<String>,
    /// The view this render pass replaces, if any.
    pub previous_view: Option<ViewId>,
}

/// The main container, which reloads the summary when the location fragment changes.
///
/// Set `load_now` to also request a render pass as soon as the page loads.
fn main_container(load_now: bool, contents: &Markup) -> Markup {
    let trigger = if load_now {
        "load, hashchange from:window"
    } else {
        "hashchange from:window"
    };

    html!(
        div
            id=(MAIN_CONTAINER_ID)
            class="w-full max-w-3xl"
            hx-get=(endpoints::SUMMARY)
            hx-trigger=(trigger)
            hx-vals=(PERIOD_FROM_LOCATION)
            hx-include="find input[name='previous_view']"
            hx-target-error="this"
        {
            (contents)
        }
    )
}

fn page(contents: &Markup, load_now: bool) -> Markup {
    let content = html!(
        main class=(PAGE_CONTAINER_STYLE)
        {
            (main_container(load_now, contents))
        }
    );

    base(PAGE_TITLE, &content)
}

/// The rendered view plus a marker so the next render pass can retire it.
fn view_contents(view: &SummaryView) -> Markup {
    html!(
        input type="hidden" name="previous_view" value=(view.id());
        (view.container().contents())
    )
}

fn lock_views(views: &Mutex<ViewRegistry>) -> Result<MutexGuard<'_, ViewRegistry>, Error> {
    views
        .lock()
        .inspect_err(|error| tracing::error!("Could not acquire the view registry lock: {error}"))
        .map_err(|_| Error::ViewRegistryLockError)
}

/// Display the page shell, which loads the summary for the location fragment.
pub async fn get_index_page() -> Response {
    let loading = html!(
        p id="indicator" class="htmx-request text-gray-500 dark:text-gray-400"
        {
            span class="htmx-indicator" { (loading_spinner()) }
            "Loading expenses..."
        }
    );

    page(&loading, true).into_response()
}

/// Run one render pass for the requested period.
///
/// htmx requests get the container contents. Other requests get a full page.
/// When the summary cannot be fetched, the response carries the error notice
/// with an error status.
pub async fn get_summary(
    State(state): State<ViewHostState>,
    HxRequest(is_htmx_request): HxRequest,
    Query(query): Query<SummaryQuery>,
) -> Response {
    let period = Period::resolve(query.period.as_deref());

    let opened = lock_views(&state.views).map(|mut views| {
        if let Some(previous_view) = query.previous_view {
            views.close(previous_view);
        }

        views.open()
    });
    let (view_id, attachment) = match opened {
        Ok(opened) => opened,
        Err(error) => return error.into_alert_response(),
    };

    let mut view = SummaryView::with_attachment(view_id, period, attachment);
    let load_result = view.load(&state.summary_source).await;

    let status = match &load_result {
        Ok(()) => StatusCode::OK,
        // The container belongs to a newer view now, so the alert must not replace it.
        Err(Error::ViewDetached) => {
            return (
                HxRetarget(ALERT_CONTAINER_SELECTOR.to_owned()),
                Error::ViewDetached.into_alert_response(),
            )
                .into_response();
        }
        Err(error) => {
            tracing::warn!(
                "Could not load the expense summary for {}: {error}",
                view.period()
            );
            error.status_code()
        }
    };

    let contents = view_contents(&view);

    let stored = lock_views(&state.views).and_then(|mut views| {
        if load_result.is_ok() {
            views.store(view)
        } else {
            // A failed view has no panels to toggle.
            views.close(view_id);
            Ok(())
        }
    });
    if let Err(error) = stored {
        return error.into_alert_response();
    }

    if is_htmx_request {
        (status, contents).into_response()
    } else {
        (status, page(&contents, false)).into_response()
    }
}

/// Show or hide a panel of a rendered view.
///
/// Responds with the updated toggle control and the panel marked for an
/// out-of-band swap.
pub async fn post_panel_toggle(
    State(state): State<ViewHostState>,
    Path((view_id, panel_id)): Path<(ViewId, String)>,
) -> Response {
    let update = lock_views(&state.views).and_then(|mut views| {
        views
            .get_mut(view_id)
            .and_then(|view| view.toggle_panel(&panel_id))
    });

    match update {
        Ok(update) => html!(
            (update.toggle_control)
            (update.panel)
        )
        .into_response(),
        Err(error) => {
            tracing::warn!("Could not toggle panel {panel_id} of view {view_id}: {error}");
            error.into_alert_response()
        }
    }
}
