//! The expense summary view: resolves a period, fetches its summary, and
//! renders the summary into a container.
//!
//! A render pass appends the summary header first and then one block per
//! group. Appending never clears the container. If the summary cannot be
//! fetched or read, the view appends an error notice and no group blocks.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use maud::{Markup, html};

use crate::{
    Error,
    client::SummarySource,
    endpoints,
    panels::{PanelRegistry, panel_id},
    period::Period,
    summary::{ExpenseSummary, GroupSummary},
    templates::{
        ExpenseTemplate, SummaryTemplate, expense_template, panel, panel_body, summary_template,
        toggle_control,
    },
};

/// The element ID of the container the view renders into.
pub const MAIN_CONTAINER_ID: &str = "main";

/// Identifies a view among the live views.
pub type ViewId = u64;

/// Whether a container is still part of the page.
///
/// Clones share the same flag, so whoever tears the page down can detach the
/// container while a fetch for it is in flight.
#[derive(Debug, Clone)]
pub struct Attachment(Arc<AtomicBool>);

impl Attachment {
    /// A flag for a container that is on the page.
    pub fn attached() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    /// Mark the container as removed from the page.
    pub fn detach(&self) {
        self.0.store(false, Ordering::Release);
    }

    /// Whether the container is still on the page.
    pub fn is_attached(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// A piece of HTML appended to the container.
#[derive(Debug, Clone)]
pub enum Fragment {
    /// The total line.
    SummaryHeader(Markup),
    /// One group's collapsible block.
    GroupBlock {
        /// The ID of the block's panel.
        panel_id: String,
        /// The rendered block.
        markup: Markup,
    },
    /// A dismissible notice explaining why the summary is not shown.
    ErrorNotice(Markup),
}

impl Fragment {
    fn markup(&self) -> &Markup {
        match self {
            Fragment::SummaryHeader(markup)
            | Fragment::GroupBlock { markup, .. }
            | Fragment::ErrorNotice(markup) => markup,
        }
    }
}

/// The element the view appends its fragments to.
#[derive(Debug)]
pub struct Container {
    id: &'static str,
    fragments: Vec<Fragment>,
    attachment: Attachment,
}

impl Container {
    /// Create an empty container with the element ID `id`.
    pub fn new(id: &'static str, attachment: Attachment) -> Self {
        Self {
            id,
            fragments: Vec::new(),
            attachment,
        }
    }

    /// The element ID of the container.
    pub fn id(&self) -> &str {
        self.id
    }

    /// The fragments appended so far, oldest first.
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Whether the container is still on the page.
    pub fn is_attached(&self) -> bool {
        self.attachment.is_attached()
    }

    fn append(&mut self, fragment: Fragment) {
        self.fragments.push(fragment);
    }

    /// The fragments as one HTML fragment, without the container element.
    pub fn contents(&self) -> Markup {
        html!(
            @for fragment in &self.fragments {
                (fragment.markup())
            }
        )
    }
}

/// How far a render pass has progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RenderStage {
    Empty,
    HeaderRendered,
    Failed,
}

/// The HTML needed to update the page after a panel was toggled.
#[derive(Debug, Clone)]
pub struct PanelUpdate {
    /// The toggle control with its new glyph.
    pub toggle_control: Markup,
    /// The panel with its new visibility, marked for an out-of-band swap.
    pub panel: Markup,
}

/// One expense summary view.
///
/// Each view issues at most one summary request.
#[derive(Debug)]
pub struct SummaryView {
    id: ViewId,
    period: Period,
    container: Container,
    panels: PanelRegistry,
    panel_bodies: HashMap<String, Markup>,
    stage: RenderStage,
}

impl SummaryView {
    /// Create a view of `period` that renders into a fresh, attached container.
    pub fn new(id: ViewId, period: Period) -> Self {
        Self::with_attachment(id, period, Attachment::attached())
    }

    /// Create a view of `period` whose container liveness is tracked by `attachment`.
    pub fn with_attachment(id: ViewId, period: Period, attachment: Attachment) -> Self {
        Self {
            id,
            period,
            container: Container::new(MAIN_CONTAINER_ID, attachment),
            panels: PanelRegistry::new(),
            panel_bodies: HashMap::new(),
            stage: RenderStage::Empty,
        }
    }

    /// The view's ID.
    pub fn id(&self) -> ViewId {
        self.id
    }

    /// The period the view displays.
    pub fn period(&self) -> &Period {
        &self.period
    }

    /// The container the view renders into.
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// The expand/collapse state of the rendered panels.
    pub fn panels(&self) -> &PanelRegistry {
        &self.panels
    }

    /// Fetch the summary for the view's period and render it.
    ///
    /// On a fetch or validation failure, an error notice is rendered and the
    /// error is returned. If the container was detached while the request was
    /// in flight, nothing is rendered.
    ///
    /// # Errors
    /// Returns the fetch error, or [Error::ViewDetached].
    pub async fn load<S: SummarySource>(&mut self, source: &S) -> Result<(), Error> {
        tracing::debug!("View {} loading the summary for {}", self.id, self.period);
        let result = source.fetch_summary(&self.period).await;

        if !self.container.is_attached() {
            tracing::info!(
                "View {} was detached before the summary arrived, skipping render",
                self.id
            );
            return Err(Error::ViewDetached);
        }

        match result {
            Ok(summary) => self.render(&summary),
            Err(error) => {
                self.render_error(&error);
                Err(error)
            }
        }
    }

    /// Render the summary header followed by every group block.
    ///
    /// # Errors
    /// Returns [Error::RenderOrder] if the view has already rendered.
    pub fn render(&mut self, summary: &ExpenseSummary) -> Result<(), Error> {
        self.render_summary_header(summary.total)?;
        self.render_group_blocks(&summary.groups)?;

        Ok(())
    }

    /// Append the total line.
    ///
    /// # Errors
    /// Returns [Error::RenderOrder] if the header was already rendered or the
    /// view already shows an error notice.
    pub fn render_summary_header(&mut self, total: f64) -> Result<(), Error> {
        if self.stage != RenderStage::Empty {
            return Err(Error::RenderOrder(
                "the summary header must be rendered once, before anything else",
            ));
        }

        let label = self.period.year_and_month().map(|_| self.period.label());
        let markup = summary_template(SummaryTemplate {
            year_and_month: label.as_deref(),
            total,
        });

        self.container.append(Fragment::SummaryHeader(markup));
        self.stage = RenderStage::HeaderRendered;

        Ok(())
    }

    /// Append one collapsible block per group, in the order given.
    ///
    /// Blocks are numbered after the ones already rendered, so calling this
    /// again adds blocks with new panel IDs. Returns the number of blocks added.
    ///
    /// # Errors
    /// Returns [Error::RenderOrder] if the summary header has not been rendered.
    pub fn render_group_blocks(&mut self, groups: &[GroupSummary]) -> Result<usize, Error> {
        if self.stage != RenderStage::HeaderRendered {
            return Err(Error::RenderOrder(
                "group blocks must be rendered after the summary header",
            ));
        }

        let first_index = self.panels.len();

        for (offset, group) in groups.iter().enumerate() {
            let index = first_index + offset;
            let panel_id = panel_id(index);
            let toggle_url = endpoints::format_panel_toggle(self.id, &panel_id);
            let body = panel_body(&group.detail);
            let toggle = self.panels.register(&panel_id);

            let markup = expense_template(ExpenseTemplate {
                index,
                group: &group.name,
                total: group.total,
                panel_id: &panel_id,
                toggle,
                toggle_url: &toggle_url,
                body: &body,
            });

            self.panel_bodies.insert(panel_id.clone(), body);
            self.container.append(Fragment::GroupBlock { panel_id, markup });
        }

        Ok(groups.len())
    }

    /// Append a dismissible notice explaining `error`.
    pub fn render_error(&mut self, error: &Error) {
        tracing::debug!("View {} rendering error notice: {error}", self.id);
        self.container
            .append(Fragment::ErrorNotice(error.to_alert().into_html()));
        self.stage = RenderStage::Failed;
    }

    /// Show or hide the panel `panel_id` and get the HTML for the change.
    ///
    /// # Errors
    /// Returns [Error::UnknownPanel] if this view never rendered the panel.
    pub fn toggle_panel(&mut self, panel_id: &str) -> Result<PanelUpdate, Error> {
        let body = self
            .panel_bodies
            .get(panel_id)
            .ok_or_else(|| Error::UnknownPanel(panel_id.to_owned()))?;
        let (event, control) = self.panels.toggle(panel_id)?;
        tracing::debug!("View {} panel {panel_id}: {event:?}", self.id);

        let toggle_url = endpoints::format_panel_toggle(self.id, panel_id);

        Ok(PanelUpdate {
            toggle_control: toggle_control(control, panel_id, &toggle_url),
            panel: panel(panel_id, control.is_open(), body, true),
        })
    }
}
