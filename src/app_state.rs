//! Implements a struct that holds the state of the view host, including the live views.

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};

use crate::{
    Error,
    client::{HttpSummarySource, SourceConfig},
    view::{Attachment, SummaryView, ViewId},
};

/// The default number of views kept for panel toggling.
pub const DEFAULT_MAX_LIVE_VIEWS: usize = 256;

/// The state of the view host.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Where the views get their expense summaries from.
    pub summary_source: HttpSummarySource,

    /// The views that can still receive panel toggles.
    pub views: Arc<Mutex<ViewRegistry>>,
}

impl AppState {
    /// Create a new [AppState] that fetches summaries from the expense API in `config`.
    ///
    /// At most `max_live_views` views are kept; opening more evicts the oldest.
    ///
    /// # Errors
    /// Returns an error if the expense API base URL is invalid.
    pub fn new(config: &SourceConfig, max_live_views: usize) -> Result<Self, Error> {
        Ok(Self {
            summary_source: HttpSummarySource::new(config)?,
            views: Arc::new(Mutex::new(ViewRegistry::new(max_live_views))),
        })
    }
}

#[derive(Debug)]
struct LiveView {
    attachment: Attachment,
    /// `None` while the view's summary is being fetched.
    view: Option<SummaryView>,
}

/// The views whose pages may still be open, oldest first.
///
/// The registry is bounded. Opening a view past the bound evicts the oldest
/// one and detaches its container, so a fetch still in flight for it does not
/// render.
#[derive(Debug)]
pub struct ViewRegistry {
    views: HashMap<ViewId, LiveView>,
    order: VecDeque<ViewId>,
    next_id: ViewId,
    max_live_views: usize,
}

impl ViewRegistry {
    /// Create an empty registry holding at most `max_live_views` views.
    ///
    /// A bound of zero is treated as one.
    pub fn new(max_live_views: usize) -> Self {
        Self {
            views: HashMap::new(),
            order: VecDeque::new(),
            next_id: 1,
            max_live_views: max_live_views.max(1),
        }
    }

    /// Reserve an ID for a new view and the flag tracking its container.
    pub fn open(&mut self) -> (ViewId, Attachment) {
        while self.order.len() >= self.max_live_views {
            self.evict_oldest();
        }

        let id = self.next_id;
        self.next_id += 1;

        let attachment = Attachment::attached();
        self.views.insert(
            id,
            LiveView {
                attachment: attachment.clone(),
                view: None,
            },
        );
        self.order.push_back(id);

        (id, attachment)
    }

    /// Keep the rendered `view` so its panels can be toggled.
    ///
    /// # Errors
    /// Returns [Error::ViewDetached] if the view was evicted while it was loading.
    pub fn store(&mut self, view: SummaryView) -> Result<(), Error> {
        match self.views.get_mut(&view.id()) {
            Some(live_view) if live_view.attachment.is_attached() => {
                live_view.view = Some(view);
                Ok(())
            }
            _ => Err(Error::ViewDetached),
        }
    }

    /// Get a rendered view.
    ///
    /// # Errors
    /// Returns [Error::UnknownView] if the view was evicted, never existed, or
    /// is still loading.
    pub fn get_mut(&mut self, id: ViewId) -> Result<&mut SummaryView, Error> {
        self.views
            .get_mut(&id)
            .and_then(|live_view| live_view.view.as_mut())
            .ok_or(Error::UnknownView(id))
    }

    /// Remove a view and detach its container.
    pub fn close(&mut self, id: ViewId) {
        if let Some(live_view) = self.views.remove(&id) {
            live_view.attachment.detach();
        }
        self.order.retain(|&view_id| view_id != id);
    }

    /// The number of views in the registry, including loading ones.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Whether the registry holds no views.
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    fn evict_oldest(&mut self) {
        if let Some(id) = self.order.pop_front() {
            tracing::debug!("Evicting view {id}");
            if let Some(live_view) = self.views.remove(&id) {
                live_view.attachment.detach();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, app_state::ViewRegistry, period::Period, view::SummaryView};

    #[test]
    fn stored_views_can_be_fetched() {
        let mut registry = ViewRegistry::new(4);
        let (id, attachment) = registry.open();

        registry
            .store(SummaryView::with_attachment(id, Period::ThisMonth, attachment))
            .unwrap();

        assert_eq!(registry.get_mut(id).unwrap().id(), id);
    }

    #[test]
    fn loading_views_are_not_available() {
        let mut registry = ViewRegistry::new(4);
        let (id, _) = registry.open();

        assert_eq!(registry.get_mut(id).err(), Some(Error::UnknownView(id)));
    }

    #[test]
    fn evicts_oldest_view_past_bound() {
        let mut registry = ViewRegistry::new(2);
        let (first, first_attachment) = registry.open();
        let (second, _) = registry.open();
        let (third, _) = registry.open();

        assert_eq!(registry.len(), 2);
        assert!(!first_attachment.is_attached());
        assert_eq!(
            registry.store(SummaryView::new(first, Period::ThisMonth)),
            Err(Error::ViewDetached)
        );
        assert_ne!(second, third);
    }

    #[test]
    fn closing_detaches_view() {
        let mut registry = ViewRegistry::new(2);
        let (id, attachment) = registry.open();

        registry.close(id);

        assert!(!attachment.is_attached());
        assert!(registry.is_empty());
    }

    #[test]
    fn zero_bound_keeps_one_view() {
        let mut registry = ViewRegistry::new(0);

        registry.open();
        registry.open();

        assert_eq!(registry.len(), 1);
    }
}
