//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{alert::Alert, internal_server_error::InternalServerError, not_found::NotFoundError};

/// The errors that may occur in the application.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request to the expense API could not be sent or its body could not
    /// be read.
    #[error("could not reach the expense API: {0}")]
    Network(String),

    /// The expense API did not respond within the configured timeout.
    #[error("the expense API did not respond in time")]
    Timeout,

    /// The expense API responded with a non-success status code.
    #[error("the expense API responded with status {0}")]
    UpstreamStatus(u16),

    /// The response body is not a valid expense summary.
    #[error("the expense API response is malformed: {0}")]
    MalformedResponse(String),

    /// The response body is missing a field that is needed to render the
    /// summary.
    #[error("the expense API response is missing the field \"{0}\"")]
    MissingField(&'static str),

    /// A view operation was called out of order, e.g., rendering group blocks
    /// before the summary header.
    #[error("render order violated: {0}")]
    RenderOrder(&'static str),

    /// A panel event named a panel that was never rendered.
    #[error("no panel with the ID \"{0}\"")]
    UnknownPanel(String),

    /// The view ID does not refer to a live view.
    #[error("no live view with the ID {0}")]
    UnknownView(u64),

    /// The view was torn down while its summary request was in flight.
    #[error("the view was detached before the summary arrived")]
    ViewDetached,

    /// The configured expense API base URL cannot be used to build request URLs.
    #[error("invalid expense API base URL \"{0}\"")]
    InvalidApiBaseUrl(String),

    /// Could not acquire the lock on the live views.
    #[error("could not acquire the view registry lock")]
    ViewRegistryLockError,
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            Error::Timeout
        } else if let Some(status) = value.status() {
            Error::UpstreamStatus(status.as_u16())
        } else {
            Error::Network(value.to_string())
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::UnknownView(_) | Error::UnknownPanel(_) => NotFoundError.into_response(),
            Error::InvalidApiBaseUrl(url) => InternalServerError {
                description: "Invalid Expense API Settings",
                fix: &format!(
                    "The expense API base URL \"{url}\" is not valid. Check your server settings."
                ),
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// The status code to send alongside the alert for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Network(_)
            | Error::UpstreamStatus(_)
            | Error::MalformedResponse(_)
            | Error::MissingField(_) => StatusCode::BAD_GATEWAY,
            Error::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Error::UnknownPanel(_) | Error::UnknownView(_) => StatusCode::NOT_FOUND,
            Error::ViewDetached => StatusCode::GONE,
            Error::RenderOrder(_)
            | Error::InvalidApiBaseUrl(_)
            | Error::ViewRegistryLockError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The alert to show the user for this error.
    pub fn to_alert(&self) -> Alert {
        let (message, details) = match self {
            Error::Network(_) => (
                "Could not load expenses",
                "The expense service could not be reached. Try refreshing the page.".to_owned(),
            ),
            Error::Timeout => (
                "Could not load expenses",
                "The expense service took too long to respond. Try refreshing the page."
                    .to_owned(),
            ),
            Error::UpstreamStatus(status) => (
                "Could not load expenses",
                format!("The expense service responded with status {status}."),
            ),
            Error::MalformedResponse(_) | Error::MissingField(_) => (
                "Could not display expenses",
                "The expense service sent a summary that could not be read.".to_owned(),
            ),
            Error::UnknownPanel(_) | Error::UnknownView(_) | Error::ViewDetached => (
                "This view has expired",
                "Refresh the page to load the expense summary again.".to_owned(),
            ),
            _ => (
                "Something went wrong",
                "An unexpected error occurred, check the server logs for more details.".to_owned(),
            ),
        };

        Alert {
            message: message.to_owned(),
            details,
        }
    }

    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        (self.status_code(), self.to_alert().into_html()).into_response()
    }
}
