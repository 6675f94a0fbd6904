//! The endpoint URIs served by the view host.
//!
//! For the panel toggle endpoint, use [format_panel_toggle] to fill in its parameters.

/// The page holding the expense summary view.
pub const ROOT: &str = "/";
/// Runs one render pass of the view for the period given as a query parameter.
pub const SUMMARY: &str = "/summary";
/// Shows or hides a panel of a rendered view.
pub const PANEL_TOGGLE: &str = "/views/{view_id}/panels/{panel_id}/toggle";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The panel toggle endpoint for the panel `panel_id` of the view `view_id`.
pub fn format_panel_toggle(view_id: u64, panel_id: &str) -> String {
    PANEL_TOGGLE
        .replace("{view_id}", &view_id.to_string())
        .replace("{panel_id}", panel_id)
}
