//! Expand/collapse state for the panels of a rendered summary.
//!
//! Every group block is a panel with a toggle control. The registry is filled
//! while the blocks are rendered, so a panel event looks up its toggle control
//! by panel ID instead of deriving the control's ID from the panel's.

use std::collections::HashMap;

use crate::Error;

/// Appended to a panel ID to get the ID of the panel's toggle control.
pub const TOGGLE_CONTROL_SUFFIX: &str = "__expand";

/// The ID of the panel for the group block at `index`.
pub fn panel_id(index: usize) -> String {
    format!("group-{index}")
}

/// The ID of the toggle control for the panel `panel_id`.
pub fn toggle_control_id(panel_id: &str) -> String {
    format!("{panel_id}{TOGGLE_CONTROL_SUFFIX}")
}

/// The icon shown on a toggle control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    /// The panel is hidden.
    ChevronDown,
    /// The panel is shown.
    ChevronUp,
}

impl Glyph {
    /// The CSS class that draws the glyph.
    pub fn class(self) -> &'static str {
        match self {
            Glyph::ChevronDown => "glyphicon-chevron-down",
            Glyph::ChevronUp => "glyphicon-chevron-up",
        }
    }
}

/// A panel changed visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelEvent {
    /// The panel became visible.
    Shown,
    /// The panel was hidden.
    Hidden,
}

/// The control that shows and hides a panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleControl {
    /// The element ID of the control.
    pub id: String,
    /// The glyph currently shown on the control.
    pub glyph: Glyph,
}

impl ToggleControl {
    fn closed(panel_id: &str) -> Self {
        Self {
            id: toggle_control_id(panel_id),
            glyph: Glyph::ChevronDown,
        }
    }

    /// Whether the control's panel is shown.
    pub fn is_open(&self) -> bool {
        self.glyph == Glyph::ChevronUp
    }

    /// The CSS classes of the control's icon.
    pub fn icon_classes(&self) -> String {
        format!("glyphicon {}", self.glyph.class())
    }
}

/// Maps panel IDs to their toggle controls.
///
/// Panels are independent: showing one panel never hides another.
#[derive(Debug, Default)]
pub struct PanelRegistry {
    controls: HashMap<String, ToggleControl>,
}

impl PanelRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hidden panel and return its toggle control.
    ///
    /// Registering a panel again keeps its current state.
    pub fn register(&mut self, panel_id: &str) -> &ToggleControl {
        self.controls
            .entry(panel_id.to_owned())
            .or_insert_with(|| ToggleControl::closed(panel_id))
    }

    /// The toggle control for `panel_id`, if the panel was registered.
    pub fn get(&self, panel_id: &str) -> Option<&ToggleControl> {
        self.controls.get(panel_id)
    }

    /// The number of registered panels.
    pub fn len(&self) -> usize {
        self.controls.len()
    }

    /// Whether no panels are registered.
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    /// Update the toggle control of `panel_id` after the panel was shown or hidden.
    ///
    /// # Errors
    /// Returns [Error::UnknownPanel] if the panel was never registered.
    pub fn handle(&mut self, panel_id: &str, event: PanelEvent) -> Result<&ToggleControl, Error> {
        let control = self
            .controls
            .get_mut(panel_id)
            .ok_or_else(|| Error::UnknownPanel(panel_id.to_owned()))?;

        control.glyph = match event {
            PanelEvent::Shown => Glyph::ChevronUp,
            PanelEvent::Hidden => Glyph::ChevronDown,
        };

        Ok(control)
    }

    /// Show a hidden panel or hide a shown one.
    ///
    /// # Errors
    /// Returns [Error::UnknownPanel] if the panel was never registered.
    pub fn toggle(&mut self, panel_id: &str) -> Result<(PanelEvent, &ToggleControl), Error> {
        let event = match self.get(panel_id) {
            Some(control) if control.is_open() => PanelEvent::Hidden,
            Some(_) => PanelEvent::Shown,
            None => return Err(Error::UnknownPanel(panel_id.to_owned())),
        };

        self.handle(panel_id, event).map(|control| (event, control))
    }
}
