//! Error alerts shown to users.
//!
//! Alerts are dismissible: the close button removes the alert from the page.

use maud::{Markup, html};

const ALERT_ERROR_STYLE: &str = "text-red-800 border-red-300 bg-red-50 dark:bg-gray-800 \
    dark:text-red-400 dark:border-red-800";

/// An error message with a short summary and longer details.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    /// A short summary of what went wrong.
    pub message: String,
    /// An explanation of what went wrong and, where possible, how to fix it.
    pub details: String,
}

impl Alert {
    /// Render the alert as a dismissible HTML fragment.
    pub fn into_html(self) -> Markup {
        html!(
            div
                role="alert"
                class={ "alert flex items-start gap-3 p-4 mb-4 border rounded-lg " (ALERT_ERROR_STYLE) }
            {
                span class="font-bold" aria-hidden="true" { "!" }

                div class="flex-1"
                {
                    p class="alert-message font-medium" { (self.message) }

                    @if !self.details.is_empty() {
                        p class="alert-details text-sm" { (self.details) }
                    }
                }

                button
                    type="button"
                    class="alert-dismiss ms-auto"
                    aria-label="Dismiss"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "×"
                }
            }
        )
    }
}
