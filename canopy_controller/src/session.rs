// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The interaction session: one tree, one view, one state machine.

use canopy_layout::{Layout, LayoutConfig, compute};
use canopy_model::{MindTree, NodeId, TreeError};
use canopy_scene::{Highlight, Scene, ViewState, project};
use canopy_source::{ExpandItem, ExpandRequest, SourceError};
use canopy_text::{CellMeasure, FontSpec, SizedLabel, TextMeasure};
use hashbrown::HashMap;
use kurbo::{Rect, Size, TranslateScale};
use serde_json::Value;

use crate::menu::place_menu;

/// Smallest allowed zoom scale.
pub const MIN_SCALE: f64 = 0.1;

/// Largest allowed zoom scale.
pub const MAX_SCALE: f64 = 3.0;

/// Label given to a freshly added child before the user edits it.
const NEW_NODE_LABEL: &str = "New Node";

/// Ticket identifying one outstanding exploration.
///
/// Completion must present the same ticket it was issued; anything else is
/// dropped as stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExploreTicket(u64);

/// Input events, in host coordinates where applicable.
#[derive(Clone, Debug)]
pub enum Event {
    /// Pointer click on a node box.
    ClickNode(NodeId),
    /// Pointer click on empty canvas.
    ClickBackground,
    /// Double click on a node box.
    DoubleClickNode(NodeId),
    /// "Add child" chosen from the context menu.
    MenuAdd,
    /// "Remove" chosen from the context menu.
    MenuRemove,
    /// "Explore" chosen from the context menu.
    MenuExplore,
    /// The edit overlay was committed with this text.
    EditCommit(String),
    /// The edit overlay was dismissed without committing.
    EditCancel,
    /// The user panned or zoomed to this transform.
    PanZoom(TranslateScale),
}

/// What the host should do in response to an event, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Re-project and repaint the scene.
    Redraw,
    /// Show (or restyle) the context menu.
    ShowMenu(MenuModel),
    /// Hide the context menu.
    HideMenu,
    /// Open the edit overlay.
    BeginEdit(EditModel),
    /// Surface a message to the user.
    Notify(String),
    /// Run the expansion request and call
    /// [`Session::complete_explore`] with the ticket.
    StartExplore {
        /// Ticket to present on completion.
        ticket: ExploreTicket,
        /// What to ask the expansion source.
        request: ExpandRequest,
    },
}

/// Everything the host needs to draw the context menu.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuModel {
    /// Top-left corner, viewport coordinates.
    pub position: kurbo::Point,
    /// Whether "Remove" is clickable; the root cannot be removed.
    pub remove_enabled: bool,
    /// True while an exploration is outstanding; all items are disabled.
    pub busy: bool,
}

/// Everything the host needs to place the edit overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct EditModel {
    /// The node being renamed.
    pub id: NodeId,
    /// Current label, prefilled and pre-selected.
    pub text: String,
    /// Overlay bounds, viewport coordinates.
    pub rect: Rect,
    /// Font size for the input, matching the node's text.
    pub font_px: f64,
}

/// Interaction mode. The selected or edited node rides along in the
/// variant, so there is no separate selection field to fall out of sync.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Mode {
    #[default]
    Idle,
    NodeSelected(NodeId),
    Editing(NodeId),
}

#[derive(Clone, Copy, Debug)]
struct PendingExplore {
    ticket: ExploreTicket,
    node: NodeId,
}

/// One mind map, its view, and the interaction state machine over both.
///
/// Events go in through [`Session::handle`]; the returned effects tell the
/// host what to show. The session never blocks: exploration is handed out
/// as an [`Effect::StartExplore`] and comes back through
/// [`Session::complete_explore`] with its ticket.
///
/// Hosts that keep text in their own edit widget should send
/// [`Event::EditCommit`] before a background click that dismisses the
/// overlay, so the text is not lost.
pub struct Session {
    tree: Option<MindTree>,
    cfg: LayoutConfig,
    measure: Box<dyn TextMeasure>,
    viewport: Size,
    menu_size: Size,
    view: ViewState,
    layout: Layout,
    labels: HashMap<NodeId, SizedLabel>,
    mode: Mode,
    pending: Option<PendingExplore>,
    next_ticket: u64,
}

impl core::fmt::Debug for Session {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("viewport", &self.viewport)
            .field("mode", &self.mode)
            .field("pending", &self.pending)
            .field("next_ticket", &self.next_ticket)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// New empty session with the given measurer.
    pub fn new(cfg: LayoutConfig, measure: Box<dyn TextMeasure>, viewport: Size) -> Self {
        Self {
            tree: None,
            cfg,
            measure,
            viewport,
            menu_size: Size::new(160.0, 120.0),
            view: ViewState::default(),
            layout: Layout::default(),
            labels: HashMap::new(),
            mode: Mode::Idle,
            pending: None,
            next_ticket: 0,
        }
    }

    /// New empty session with the default cell-count measurer.
    pub fn with_cell_measure(viewport: Size) -> Self {
        Self::new(
            LayoutConfig::default(),
            Box::new(CellMeasure::default()),
            viewport,
        )
    }

    /// Replace the tree from boundary JSON and reset interaction state.
    ///
    /// The next projection refits the drawing to the viewport. Any
    /// outstanding exploration is abandoned; its completion will be
    /// dropped, since its ticket can no longer match.
    pub fn load(&mut self, raw: &Value) -> Result<(), TreeError> {
        let tree = MindTree::normalize(raw)?;
        self.tree = Some(tree);
        self.mode = Mode::Idle;
        self.pending = None;
        self.view = ViewState::default();
        self.relayout();
        Ok(())
    }

    /// The current tree, if one is loaded.
    pub fn tree(&self) -> Option<&MindTree> {
        self.tree.as_ref()
    }

    /// The current layout. Empty until a tree is loaded.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The selected node, if any.
    pub fn selection(&self) -> Option<NodeId> {
        match self.mode {
            Mode::NodeSelected(id) => Some(id),
            Mode::Idle | Mode::Editing(_) => None,
        }
    }

    /// The node under the edit overlay, if any.
    pub fn editing(&self) -> Option<NodeId> {
        match self.mode {
            Mode::Editing(id) => Some(id),
            Mode::Idle | Mode::NodeSelected(_) => None,
        }
    }

    /// True while an exploration is outstanding.
    pub fn is_exploring(&self) -> bool {
        self.pending.is_some()
    }

    /// Tell the session how large the host draws the context menu, so
    /// placement can clamp correctly.
    pub fn set_menu_size(&mut self, size: Size) {
        self.menu_size = size;
    }

    /// Update the viewport after a host resize.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Project the current frame. `None` until a tree is loaded.
    pub fn scene(&mut self) -> Option<Scene> {
        let tree = self.tree.as_ref()?;
        let highlight = match self.mode {
            Mode::Idle => Highlight::default(),
            Mode::NodeSelected(id) => Highlight {
                selected: Some(id),
                editing: None,
            },
            Mode::Editing(id) => Highlight {
                selected: None,
                editing: Some(id),
            },
        };
        Some(project(
            tree,
            &self.layout,
            &self.labels,
            &self.cfg,
            self.viewport,
            highlight,
            &mut self.view,
        ))
    }

    /// Feed one event through the state machine.
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::ClickNode(id) => self.on_click_node(id),
            Event::ClickBackground => self.on_click_background(),
            Event::DoubleClickNode(id) => self.on_double_click(id),
            Event::MenuAdd => self.on_menu_add(),
            Event::MenuRemove => self.on_menu_remove(),
            Event::MenuExplore => self.on_menu_explore(),
            Event::EditCommit(text) => self.on_edit_commit(&text),
            Event::EditCancel => self.on_edit_cancel(),
            Event::PanZoom(transform) => self.on_pan_zoom(transform),
        }
    }

    /// Deliver the outcome of an exploration started by
    /// [`Effect::StartExplore`].
    ///
    /// A ticket that does not match the outstanding one, or a target node
    /// that has since been removed, drops the result with a diagnostic;
    /// stale suggestions are never reattached elsewhere.
    pub fn complete_explore(
        &mut self,
        ticket: ExploreTicket,
        result: Result<Vec<ExpandItem>, SourceError>,
    ) -> Vec<Effect> {
        let Some(pending) = self.pending else {
            tracing::warn!(?ticket, "exploration completed with no exploration outstanding");
            return Vec::new();
        };
        if pending.ticket != ticket {
            tracing::warn!(?ticket, current = ?pending.ticket, "stale exploration ticket dropped");
            return Vec::new();
        }
        self.pending = None;
        self.mode = Mode::Idle;
        let mut effects = vec![Effect::HideMenu];

        let alive = self
            .tree
            .as_ref()
            .is_some_and(|tree| tree.is_alive(pending.node));
        if !alive {
            tracing::warn!(node = ?pending.node, "exploration target removed mid-flight, result dropped");
            return effects;
        }

        match result {
            Ok(items) if items.is_empty() => {
                let name = self.label_of(pending.node);
                effects.push(Effect::Notify(format!(
                    "No additional sub-points found for \"{name}\"."
                )));
            }
            Ok(items) => {
                let appended = self.tree.as_mut().and_then(|tree| {
                    tree.append_expansion(pending.node, items.into_iter().map(|item| item.name))
                        .ok()
                });
                if appended.is_some() {
                    self.relayout();
                    effects.push(Effect::Redraw);
                }
            }
            Err(error) => {
                effects.push(Effect::Notify(format!("Failed to explore node: {error}")));
            }
        }
        effects
    }

    fn on_click_node(&mut self, id: NodeId) -> Vec<Effect> {
        if !self.is_alive(id) {
            tracing::warn!(node = ?id, "click on a node that is no longer alive");
            return Vec::new();
        }
        match self.mode {
            Mode::NodeSelected(current) if current == id => {
                // Clicking the selection again clears it.
                self.mode = Mode::Idle;
                vec![Effect::HideMenu, Effect::Redraw]
            }
            _ => {
                self.mode = Mode::NodeSelected(id);
                let mut effects = vec![Effect::HideMenu];
                if let Some(menu) = self.menu_model(id) {
                    effects.push(Effect::ShowMenu(menu));
                }
                effects.push(Effect::Redraw);
                effects
            }
        }
    }

    fn on_click_background(&mut self) -> Vec<Effect> {
        self.mode = Mode::Idle;
        vec![Effect::HideMenu, Effect::Redraw]
    }

    fn on_double_click(&mut self, id: NodeId) -> Vec<Effect> {
        if !self.is_alive(id) {
            tracing::warn!(node = ?id, "double click on a node that is no longer alive");
            return Vec::new();
        }
        self.mode = Mode::Editing(id);
        let mut effects = vec![Effect::HideMenu];
        if let Some(edit) = self.edit_model(id) {
            effects.push(Effect::BeginEdit(edit));
        }
        effects.push(Effect::Redraw);
        effects
    }

    fn on_menu_add(&mut self) -> Vec<Effect> {
        if let Some(refusal) = self.busy_refusal() {
            return refusal;
        }
        let Mode::NodeSelected(parent) = self.mode else {
            return Vec::new();
        };
        let inserted = self
            .tree
            .as_mut()
            .map(|tree| tree.insert_child(parent, NEW_NODE_LABEL));
        match inserted {
            Some(Ok(new_id)) => {
                self.relayout();
                self.mode = Mode::Editing(new_id);
                let mut effects = vec![Effect::HideMenu, Effect::Redraw];
                if let Some(edit) = self.edit_model(new_id) {
                    effects.push(Effect::BeginEdit(edit));
                }
                effects
            }
            Some(Err(error)) => {
                self.mode = Mode::Idle;
                vec![Effect::HideMenu, Effect::Notify(error.to_string())]
            }
            None => Vec::new(),
        }
    }

    fn on_menu_remove(&mut self) -> Vec<Effect> {
        if let Some(refusal) = self.busy_refusal() {
            return refusal;
        }
        let Mode::NodeSelected(id) = self.mode else {
            return Vec::new();
        };
        let removed = self.tree.as_mut().map(|tree| tree.remove_subtree(id));
        match removed {
            Some(Ok(())) => {
                self.relayout();
                self.mode = Mode::Idle;
                vec![Effect::HideMenu, Effect::Redraw]
            }
            Some(Err(TreeError::RootRemoval)) => {
                // Refused; the selection and menu stay up.
                vec![Effect::Notify("Cannot remove the root node.".to_owned())]
            }
            Some(Err(error)) => {
                self.mode = Mode::Idle;
                vec![Effect::HideMenu, Effect::Notify(error.to_string())]
            }
            None => Vec::new(),
        }
    }

    fn on_menu_explore(&mut self) -> Vec<Effect> {
        if let Some(refusal) = self.busy_refusal() {
            return refusal;
        }
        let Mode::NodeSelected(id) = self.mode else {
            return Vec::new();
        };
        let Some(tree) = self.tree.as_ref() else {
            return Vec::new();
        };
        let request = ExpandRequest {
            node_name: tree.label(id).unwrap_or_default().to_owned(),
            parent_context: tree
                .parent_of(id)
                .and_then(|p| tree.label(p))
                .unwrap_or_default()
                .to_owned(),
            root_context: tree.label(tree.root()).unwrap_or_default().to_owned(),
        };
        let ticket = ExploreTicket(self.next_ticket);
        self.next_ticket += 1;
        self.pending = Some(PendingExplore { ticket, node: id });

        let mut effects = Vec::new();
        if let Some(menu) = self.menu_model(id) {
            effects.push(Effect::ShowMenu(menu));
        }
        effects.push(Effect::StartExplore { ticket, request });
        effects
    }

    fn on_edit_commit(&mut self, text: &str) -> Vec<Effect> {
        let Mode::Editing(id) = self.mode else {
            return Vec::new();
        };
        self.mode = Mode::Idle;
        let renamed = self.tree.as_mut().map(|tree| tree.rename(id, text));
        match renamed {
            Some(Ok(true)) => {
                self.relayout();
                vec![Effect::Redraw]
            }
            // Empty, whitespace-only, or unchanged text: nothing to apply,
            // the overlay just closes.
            Some(Ok(false)) => vec![Effect::Redraw],
            Some(Err(error)) => vec![Effect::Notify(error.to_string())],
            None => Vec::new(),
        }
    }

    fn on_edit_cancel(&mut self) -> Vec<Effect> {
        if let Mode::Editing(_) = self.mode {
            self.mode = Mode::Idle;
            vec![Effect::Redraw]
        } else {
            Vec::new()
        }
    }

    fn on_pan_zoom(&mut self, transform: TranslateScale) -> Vec<Effect> {
        let scale = transform.scale.clamp(MIN_SCALE, MAX_SCALE);
        self.view.transform = TranslateScale::new(transform.translation, scale);
        self.view.fitted = true;
        if matches!(self.mode, Mode::Editing(_)) {
            self.mode = Mode::Idle;
        }
        vec![Effect::HideMenu, Effect::Redraw]
    }

    fn busy_refusal(&self) -> Option<Vec<Effect>> {
        self.pending.is_some().then(|| {
            vec![Effect::Notify(
                "Exploration in progress; please wait.".to_owned(),
            )]
        })
    }

    fn is_alive(&self, id: NodeId) -> bool {
        self.tree.as_ref().is_some_and(|tree| tree.is_alive(id))
    }

    fn label_of(&self, id: NodeId) -> String {
        self.tree
            .as_ref()
            .and_then(|tree| tree.label(id))
            .unwrap_or_default()
            .to_owned()
    }

    /// Node bounds in viewport coordinates.
    fn node_screen_rect(&self, id: NodeId) -> Option<Rect> {
        let placed = self.layout.get(id)?;
        let world = Rect::from_center_size(
            placed.pos,
            Size::new(self.cfg.box_width, placed.box_height),
        );
        Some(self.view.transform * world)
    }

    fn menu_model(&self, id: NodeId) -> Option<MenuModel> {
        let rect = self.node_screen_rect(id)?;
        let root = self.tree.as_ref()?.root();
        Some(MenuModel {
            position: place_menu(rect, self.menu_size, self.viewport),
            remove_enabled: id != root,
            busy: self.pending.is_some(),
        })
    }

    fn edit_model(&self, id: NodeId) -> Option<EditModel> {
        let tree = self.tree.as_ref()?;
        let placed = self.layout.get(id)?;
        let center = self.view.transform * placed.pos;
        let size = Size::new(
            self.cfg.box_width - self.cfg.padding,
            placed.box_height - self.cfg.padding,
        );
        let depth = tree.depth_of(id)?;
        Some(EditModel {
            id,
            text: tree.label(id).unwrap_or_default().to_owned(),
            rect: Rect::from_center_size(center, size),
            font_px: FontSpec::for_depth(depth).px,
        })
    }

    /// Re-wrap every label and recompute the layout.
    fn relayout(&mut self) {
        let Some(tree) = self.tree.as_ref() else {
            self.layout = Layout::default();
            self.labels.clear();
            return;
        };
        let mut labels = HashMap::new();
        for id in tree.descendants(tree.root()) {
            let depth = tree.depth_of(id).unwrap_or(0);
            let label = tree.label(id).unwrap_or_default();
            labels.insert(
                id,
                SizedLabel::new(
                    label,
                    self.cfg.text_wrap_width(),
                    self.cfg.padding,
                    FontSpec::for_depth(depth),
                    self.measure.as_ref(),
                ),
            );
        }
        self.layout = compute(tree, &self.cfg, |id| {
            labels.get(&id).map_or(0.0, |sized| sized.box_height)
        });
        self.labels = labels;
    }
}
