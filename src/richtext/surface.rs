// Surfaces
// An editable region owning an ordered node sequence and its selection.
// The sequence is only mutated by commands.

use log::debug;
use std::fmt;

use super::behavior::{self, BehaviorTable, Handled, Handler, HandlerContext};
use super::error::{EditError, EditResult};
use super::history::History;
use super::host::{BoundaryPoint, ContainerRef, HostRef, NativeSelection};
use super::input::{HandlerKey, Input, InputEvent};
use super::node::{Node, NodeState};
use super::range::{Position, Range};

/// Identifies a surface within an editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SurfaceId(pub usize);

impl SurfaceId {
    /// The surface holding the top level of the document
    pub const ROOT: SurfaceId = SurfaceId(0);
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

pub struct Surface {
    id: SurfaceId,
    parent: Option<SurfaceId>,
    nodes: Vec<Node>,
    host: HostRef,
    selection: Option<Range>,
}

impl Surface {
    /// Create a surface and attach every node to the host. An empty node list
    /// gets one empty paragraph so the surface always has a caret target.
    pub fn new(id: SurfaceId, parent: Option<SurfaceId>, nodes: Vec<Node>, host: HostRef) -> Self {
        let mut nodes = nodes;
        if nodes.is_empty() {
            nodes.push(Node::paragraph(""));
        }
        let mut surface = Surface {
            id,
            parent,
            nodes,
            host,
            selection: None,
        };
        surface.reindex();
        {
            let mut host = surface.host.borrow_mut();
            for node in &surface.nodes {
                host.attach(ContainerRef::new(id, node.index()), node.render());
            }
        }
        surface
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn parent(&self) -> Option<SurfaceId> {
        self.parent
    }

    pub fn host(&self) -> &HostRef {
        &self.host
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// Node at `index`, or an error when out of bounds
    pub fn node(&self, index: usize) -> EditResult<&Node> {
        self.nodes.get(index).ok_or(EditError::IndexOutOfBounds {
            index,
            len: self.nodes.len(),
        })
    }

    /// Text of every node, in reading order
    pub fn texts(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.text()).collect()
    }

    fn container(&self, index: usize) -> ContainerRef {
        ContainerRef::new(self.id, index)
    }

    fn reindex(&mut self) {
        for (index, node) in self.nodes.iter_mut().enumerate() {
            node.set_index(index);
        }
    }

    pub(crate) fn insert_node(&mut self, position: usize, node: Node) -> EditResult {
        if position > self.nodes.len() {
            return Err(EditError::IndexOutOfBounds {
                index: position,
                len: self.nodes.len(),
            });
        }
        let rendering = node.render();
        self.nodes.insert(position, node);
        self.reindex();
        self.host
            .borrow_mut()
            .attach(self.container(position), rendering);
        Ok(())
    }

    pub(crate) fn remove_node(&mut self, position: usize) -> EditResult<Node> {
        self.node(position)?;
        self.host.borrow_mut().detach(self.container(position));
        let node = self.nodes.remove(position);
        self.reindex();
        Ok(node)
    }

    /// Swap a node's state, returning the previous one
    pub(crate) fn replace_state(
        &mut self,
        index: usize,
        state: NodeState,
        rerender: bool,
    ) -> EditResult<NodeState> {
        let len = self.nodes.len();
        let node = self
            .nodes
            .get_mut(index)
            .ok_or(EditError::IndexOutOfBounds { index, len })?;
        let previous = node.replace_state(state);
        if rerender {
            let rendering = node.render();
            self.host
                .borrow_mut()
                .render(self.container(index), rendering);
        }
        Ok(previous)
    }

    /// Current selection tracked for this surface
    pub fn selection(&self) -> Option<Range> {
        self.selection
    }

    /// Update the tracker only, without touching the host
    pub(crate) fn set_selection(&mut self, selection: Option<Range>) {
        self.selection = selection;
    }

    /// Clamp the tracked selection to the current node bounds
    pub(crate) fn refresh_selection(&mut self) {
        if let Some(range) = self.selection {
            self.selection = Some(range.clamp(&self.nodes));
        }
    }

    /// Move the selection explicitly, pushing it to the host as a native selection
    pub fn select(&mut self, range: Range) -> EditResult {
        let range = range.clamp(&self.nodes);
        let native = {
            let host = self.host.borrow();
            let anchor = self.node(range.start_index())?.offset_to_boundary_point(
                &*host,
                self.id,
                range.start_offset(),
            )?;
            let focus = self.node(range.end_index())?.offset_to_boundary_point(
                &*host,
                self.id,
                range.end_offset(),
            )?;
            NativeSelection::new(anchor, focus)
        };
        self.host.borrow_mut().set_native_selection(Some(native));
        self.selection = Some(range);
        Ok(())
    }

    /// Restore a snapshot taken by history, if there is one
    pub(crate) fn restore_selection(&mut self, snapshot: Option<Range>) -> EditResult {
        match snapshot {
            Some(range) => self.select(range),
            None => {
                self.refresh_selection();
                Ok(())
            }
        }
    }

    /// Convert a native selection inside this surface into a Range
    pub fn range_from_native(&self, native: &NativeSelection) -> EditResult<Range> {
        let host = self.host.borrow();
        let position = |point: &BoundaryPoint| -> EditResult<Position> {
            let index = point.container.index;
            let offset = self.node(index)?.boundary_point_to_offset(&*host, point);
            Ok(Position::new(index, offset))
        };
        Ok(Range::new(
            self.id,
            position(&native.anchor)?,
            position(&native.focus)?,
        ))
    }

    /// Resolve and run the handler for an input.
    ///
    /// Range-bearing selections use the `Selection+` key. A node-local handler
    /// is only consulted when the range sits in one node; otherwise the
    /// surface-level default table decides.
    pub fn handle(
        &mut self,
        input: Input,
        event: Option<&InputEvent>,
        history: &mut History,
        defaults: &BehaviorTable,
    ) -> EditResult<Handled> {
        let Some(range) = self.selection else {
            return Ok(Handled::default());
        };
        let key = HandlerKey::new(input, !range.is_collapsed());

        let local = if range.is_single_node() {
            self.get(range.start_index())
                .and_then(|node| behavior::node_handler(node.kind(), key))
        } else {
            None
        };
        let Some(handler) = local.or_else(|| defaults.get(key)) else {
            debug!("{}: no handler for {}", self.id, key);
            return Ok(Handled::default());
        };

        debug!("{}: {} at {}", self.id, key, range);
        let mut handled = self.execute(handler, event, history)?;
        handled.found = true;
        Ok(handled)
    }

    /// Run a handler and record the command it returns, if any.
    ///
    /// The selection is snapshotted before the handler runs; the snapshot and
    /// the refreshed selection travel with the command into history.
    pub fn execute(
        &mut self,
        handler: Handler,
        event: Option<&InputEvent>,
        history: &mut History,
    ) -> EditResult<Handled> {
        let Some(range) = self.selection else {
            return Ok(Handled::default());
        };
        let before = self.selection;

        let (result, default_prevented, caret) = {
            let mut ctx = HandlerContext::new(self, range, event);
            let result = handler(&mut ctx)?;
            (result, ctx.default_prevented(), ctx.selection_after())
        };

        match caret {
            Some(caret) => self.select(caret)?,
            None => self.refresh_selection(),
        }

        let Some(mut command) = result else {
            return Ok(Handled {
                found: true,
                executed: false,
                default_prevented,
            });
        };
        command.set_selections(before, self.selection);
        history.push(self.id, command);

        Ok(Handled {
            found: true,
            executed: true,
            default_prevented,
        })
    }
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("id", &self.id)
            .field("parent", &self.parent)
            .field("nodes", &self.nodes)
            .field("selection", &self.selection)
            .finish()
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[{}] {}", i, node.kind())?;
            if node.is_text() {
                write!(f, " {:?}", node.text())?;
            }
        }
        Ok(())
    }
}

/// All surfaces of one editor. The root surface always exists; nested
/// surfaces hang off the root and cannot nest any further.
#[derive(Debug)]
pub struct Surfaces {
    surfaces: Vec<Surface>,
}

impl Surfaces {
    pub fn new(root_nodes: Vec<Node>, host: HostRef) -> Self {
        Surfaces {
            surfaces: vec![Surface::new(SurfaceId::ROOT, None, root_nodes, host)],
        }
    }

    pub fn root(&self) -> &Surface {
        &self.surfaces[0]
    }

    pub fn get(&self, id: SurfaceId) -> EditResult<&Surface> {
        self.surfaces.get(id.0).ok_or(EditError::UnknownSurface(id))
    }

    pub fn get_mut(&mut self, id: SurfaceId) -> EditResult<&mut Surface> {
        self.surfaces
            .get_mut(id.0)
            .ok_or(EditError::UnknownSurface(id))
    }

    /// Add a surface nested inside `parent`
    pub fn add_nested(&mut self, parent: SurfaceId, nodes: Vec<Node>) -> EditResult<SurfaceId> {
        let parent_surface = self.get(parent)?;
        if parent_surface.parent().is_some() {
            return Err(EditError::NestingTooDeep(parent));
        }
        let host = parent_surface.host().clone();
        let id = SurfaceId(self.surfaces.len());
        self.surfaces
            .push(Surface::new(id, Some(parent), nodes, host));
        Ok(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Surface> {
        self.surfaces.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Surface> {
        self.surfaces.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}
