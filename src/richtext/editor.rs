// Editor
// Entry point for host input: owns the surfaces, the shared history and the
// selection coordinator, and keeps the model in step with the host

use log::{debug, info};
use std::collections::HashMap;

use super::behavior::{BehaviorTable, Handled};
use super::command::{self, Command};
use super::document::{Document, DocumentError};
use super::error::{EditError, EditResult};
use super::history::History;
use super::host::{ContainerRef, HostRef};
use super::input::{Input, InputEvent};
use super::node::{Node, NodeKind, NodeState};
use super::range::Range;
use super::registry::{NodeRecord, NodeRegistry};
use super::selection::SelectionCoordinator;
use super::surface::{Surface, SurfaceId, Surfaces};
use crate::config::EditorConfig;

pub struct Editor {
    surfaces: Surfaces,
    history: History,
    registry: NodeRegistry,
    behaviors: BehaviorTable,
    coordinator: SelectionCoordinator,
    host: HostRef,
    keys: HashMap<String, Input>,
    title: Option<String>,
}

impl Editor {
    pub fn new(
        document: Document,
        registry: NodeRegistry,
        host: HostRef,
        config: &EditorConfig,
    ) -> Self {
        let title = document.explicit_title().map(str::to_string);
        Editor {
            surfaces: Surfaces::new(document.into_nodes(), host.clone()),
            history: History::with_limit(config.history_limit),
            registry,
            behaviors: BehaviorTable::defaults(),
            coordinator: SelectionCoordinator::new(),
            host,
            keys: config.keys.clone(),
            title,
        }
    }

    /// Decode a persisted document through `registry` and open it
    pub fn load(
        json: &str,
        registry: NodeRegistry,
        host: HostRef,
        config: &EditorConfig,
    ) -> Result<Self, DocumentError> {
        let document = Document::from_json(json, &registry)?;
        info!("loaded {} nodes", document.nodes().len());
        Ok(Self::new(document, registry, host, config))
    }

    pub fn root(&self) -> &Surface {
        self.surfaces.root()
    }

    pub fn surface(&self, id: SurfaceId) -> EditResult<&Surface> {
        self.surfaces.get(id)
    }

    pub fn surfaces(&self) -> &Surfaces {
        &self.surfaces
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn host(&self) -> &HostRef {
        &self.host
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut NodeRegistry {
        &mut self.registry
    }

    pub fn behaviors_mut(&mut self) -> &mut BehaviorTable {
        &mut self.behaviors
    }

    /// Surface currently owning the selection
    pub fn active_surface(&self) -> Option<SurfaceId> {
        self.coordinator.active()
    }

    /// Add an editable region nested in `parent`
    pub fn add_surface(&mut self, parent: SurfaceId, nodes: Vec<Node>) -> EditResult<SurfaceId> {
        let id = self.surfaces.add_nested(parent, nodes)?;
        info!("added {} inside {}", id, parent);
        Ok(id)
    }

    /// Read the host's native selection into the model
    pub fn sync_selection(&mut self) -> EditResult<Option<Range>> {
        let native = self.host.borrow().native_selection();
        self.coordinator.sync(&mut self.surfaces, native)
    }

    /// Move the selection explicitly
    pub fn select(&mut self, range: Range) -> EditResult<Option<Range>> {
        self.surfaces.get_mut(range.surface())?.select(range)?;
        self.sync_selection()
    }

    /// Push the active surface's selection back to the host after the model
    /// changed underneath it
    fn push_selection(&mut self) -> EditResult {
        let Some(active) = self.coordinator.active() else {
            return Ok(());
        };
        let surface = self.surfaces.get_mut(active)?;
        if let Some(range) = surface.selection() {
            surface.select(range)?;
        }
        Ok(())
    }

    /// Route one host input event through the active surface.
    ///
    /// When no handler prevented it, the host applies its default editing and
    /// every container it touched is reconciled into the model.
    pub fn dispatch(&mut self, event: &InputEvent) -> EditResult<Handled> {
        self.sync_selection()?;
        let Some(active) = self.coordinator.active() else {
            debug!("no active surface for {:?}", event);
            return Ok(Handled::default());
        };
        let Some(input) = event.input(&self.keys) else {
            debug!("ignoring {:?}", event);
            return Ok(Handled::default());
        };

        let handled = self.surfaces.get_mut(active)?.handle(
            input,
            Some(event),
            &mut self.history,
            &self.behaviors,
        )?;

        if handled.default_prevented {
            self.push_selection()?;
            return Ok(handled);
        }

        let changed = self.host.borrow_mut().perform_default(event);
        if changed.len() > 1 {
            return Err(EditError::UnreconcilableInput(format!(
                "{} containers changed at once",
                changed.len()
            )));
        }
        for container in changed {
            self.reconcile(container)?;
        }
        self.sync_selection()?;
        Ok(handled)
    }

    /// Bring one node in line with the host's visible text. The host already
    /// shows the new content, so the update is not re-rendered.
    pub fn reconcile(&mut self, container: ContainerRef) -> EditResult<bool> {
        let visible = self.host.borrow().visible_text(container).ok_or(
            EditError::MissingContainer {
                surface: container.surface,
                index: container.index,
            },
        )?;

        let surface = self.surfaces.get_mut(container.surface)?;
        let node = surface.node(container.index)?;
        if !node.is_text() {
            return Err(EditError::UnreconcilableInput(format!(
                "{} node {} has no text to reconcile",
                node.type_id(),
                container.index
            )));
        }
        if node.text() == visible {
            return Ok(false);
        }

        let before = surface.selection();
        let mut command =
            command::update_state(surface, container.index, NodeState::with_text(visible), false)?;
        self.sync_selection()?;
        let after = self.surfaces.get(container.surface)?.selection();
        command.set_selections(before, after);
        debug!("reconciled {}:{}", container.surface, container.index);
        self.history.push(container.surface, command);
        Ok(true)
    }

    /// Run a transform against a surface and record it as one history entry
    pub fn apply(
        &mut self,
        id: SurfaceId,
        transform: impl FnOnce(&mut Surface) -> EditResult<Command>,
    ) -> EditResult {
        let surface = self.surfaces.get_mut(id)?;
        let before = surface.selection();
        let mut command = transform(surface)?;
        surface.refresh_selection();
        command.set_selections(before, surface.selection());
        self.history.push(id, command);
        self.push_selection()
    }

    /// Build a node of a registered type and insert it at `position` of a
    /// surface as one history entry
    pub fn insert_record(
        &mut self,
        id: SurfaceId,
        position: usize,
        record: &NodeRecord,
    ) -> EditResult {
        let node = self
            .registry
            .construct(record)
            .map_err(|err| EditError::NodeConstruction(err.to_string()))?;
        self.apply(id, |surface| command::insert_node(surface, node, position))
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> EditResult<bool> {
        let touched = self.history.undo(&mut self.surfaces)?;
        self.follow_history(touched)
    }

    pub fn redo(&mut self) -> EditResult<bool> {
        let touched = self.history.redo(&mut self.surfaces)?;
        self.follow_history(touched)
    }

    /// After undo or redo, the surface whose selection was restored becomes
    /// the active one
    fn follow_history(&mut self, touched: Option<SurfaceId>) -> EditResult<bool> {
        let Some(surface) = touched else {
            return Ok(false);
        };
        if self.surfaces.get(surface)?.selection().is_some() {
            self.coordinator.activate(&mut self.surfaces, surface)?;
        }
        self.push_selection()?;
        Ok(true)
    }

    /// Snapshot of the root surface as a document
    pub fn document(&self) -> Document {
        let document = Document::new(self.surfaces.root().nodes().to_vec());
        match &self.title {
            Some(title) => document.with_title(title.clone()),
            None => document,
        }
    }

    /// Stored title, or else the text of the first top-level heading
    pub fn title(&self) -> Option<String> {
        self.title.clone().or_else(|| {
            self.surfaces
                .root()
                .nodes()
                .iter()
                .find(|node| matches!(node.kind(), NodeKind::Heading { .. }))
                .map(|node| node.text().to_string())
        })
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }
}
