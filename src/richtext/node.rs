// Node Model
// A flat, tree-free content model: every node is either text-bearing
// (paragraphs, headings) or an atomic unit (isolated nodes)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::error::{EditError, EditResult};
use super::host::{BoundaryPoint, ContainerRef, RenderHost};
use super::surface::SurfaceId;

pub const PARAGRAPH: &str = "paragraph";
pub const HEADING: &str = "heading";
pub const DIVIDER: &str = "divider";

/// How offsets address a node's content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Addressing {
    /// Offsets are inter-character positions in `0..=len`
    Characters,
    /// The whole node is one unit, addressed only by offset 0
    Opaque,
}

/// The closed set of node variants
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Paragraph,
    Heading { level: u8 }, // 1-6
    Isolated { type_id: String },
}

impl NodeKind {
    pub fn heading(level: u8) -> Self {
        NodeKind::Heading {
            level: level.clamp(1, 6),
        }
    }

    pub fn isolated(type_id: impl Into<String>) -> Self {
        NodeKind::Isolated {
            type_id: type_id.into(),
        }
    }

    /// Stable type tag used by the persisted format
    pub fn type_id(&self) -> &str {
        match self {
            NodeKind::Paragraph => PARAGRAPH,
            NodeKind::Heading { .. } => HEADING,
            NodeKind::Isolated { type_id } => type_id,
        }
    }

    pub fn addressing(&self) -> Addressing {
        match self {
            NodeKind::Paragraph | NodeKind::Heading { .. } => Addressing::Characters,
            NodeKind::Isolated { .. } => Addressing::Opaque,
        }
    }

    pub fn is_text(&self) -> bool {
        self.addressing() == Addressing::Characters
    }

    /// Variant created when Enter is pressed at the end of a node of this kind
    pub fn next_kind(&self) -> NodeKind {
        NodeKind::Paragraph
    }

    /// Default state for a freshly constructed node
    pub fn initial_state(&self) -> NodeState {
        match self {
            NodeKind::Paragraph | NodeKind::Heading { .. } => NodeState::with_text(""),
            NodeKind::Isolated { .. } => NodeState::new(),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Heading { level } => write!(f, "{}({})", HEADING, level),
            other => f.write_str(other.type_id()),
        }
    }
}

/// Open map of named values held by a node.
///
/// Text-bearing nodes keep their content under `text`. A state is also used as
/// a partial update: merging copies every key of the update over the target.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeState(Map<String, Value>);

impl NodeState {
    pub fn new() -> Self {
        NodeState(Map::new())
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self::new().set("text", Value::String(text.into()))
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        NodeState(map)
    }

    /// Builder-style setter, used to assemble partial updates
    pub fn set(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn text(&self) -> &str {
        self.0.get("text").and_then(Value::as_str).unwrap_or("")
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Copy every key of `partial` over this state
    pub fn merge(&mut self, partial: &NodeState) {
        for (key, value) in &partial.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }
}

/// What a node asks the host to display in its container
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendering {
    Text { kind: String, text: String },
    Atomic { type_id: String },
}

/// A single addressable unit of document content
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    kind: NodeKind,
    state: NodeState,
    index: usize,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        let state = kind.initial_state();
        Node {
            kind,
            state,
            index: 0,
        }
    }

    /// Build a node from a persisted state, starting from the variant's defaults
    pub fn with_state(kind: NodeKind, state: NodeState) -> Self {
        let mut node = Node::new(kind);
        node.state.merge(&state);
        node
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::with_state(NodeKind::Paragraph, NodeState::with_text(text))
    }

    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::with_state(NodeKind::heading(level), NodeState::with_text(text))
    }

    pub fn isolated(type_id: impl Into<String>) -> Self {
        Self::new(NodeKind::isolated(type_id))
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn type_id(&self) -> &str {
        self.kind.type_id()
    }

    pub fn addressing(&self) -> Addressing {
        self.kind.addressing()
    }

    pub fn is_text(&self) -> bool {
        self.kind.is_text()
    }

    pub fn state(&self) -> &NodeState {
        &self.state
    }

    /// Swap in a whole new state. Only commands call this, so the previous
    /// state is always captured for reversal.
    pub(crate) fn replace_state(&mut self, state: NodeState) -> NodeState {
        std::mem::replace(&mut self.state, state)
    }

    /// Position of this node within its surface
    pub fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    /// Text content; empty for atomic nodes
    pub fn text(&self) -> &str {
        match self.addressing() {
            Addressing::Characters => self.state.text(),
            Addressing::Opaque => "",
        }
    }

    /// Addressable length: characters for text nodes, 0 for atomic nodes
    pub fn len(&self) -> usize {
        match self.addressing() {
            Addressing::Characters => self.state.text().chars().count(),
            Addressing::Opaque => 0,
        }
    }

    /// True when the node has no addressable content
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A new instance of the same variant with initial state (used when splitting)
    pub fn clone_empty(&self) -> Node {
        Node::new(self.kind.clone())
    }

    pub fn render(&self) -> Rendering {
        match self.addressing() {
            Addressing::Characters => Rendering::Text {
                kind: self.kind.to_string(),
                text: self.text().to_string(),
            },
            Addressing::Opaque => Rendering::Atomic {
                type_id: self.type_id().to_string(),
            },
        }
    }

    fn container(&self, surface: SurfaceId) -> ContainerRef {
        ContainerRef::new(surface, self.index)
    }

    /// Map a model offset to a concrete host anchor
    pub fn offset_to_boundary_point(
        &self,
        host: &dyn RenderHost,
        surface: SurfaceId,
        offset: usize,
    ) -> EditResult<BoundaryPoint> {
        let container = self.container(surface);
        match self.addressing() {
            Addressing::Opaque => Ok(BoundaryPoint::new(container, 0)),
            Addressing::Characters => {
                let len = self.len();
                if offset > len {
                    return Err(EditError::OffsetOutOfBounds {
                        index: self.index,
                        offset,
                        len,
                    });
                }
                host.locate_point(container, offset)
                    .ok_or(EditError::MissingContainer {
                        surface,
                        index: self.index,
                    })
            }
        }
    }

    /// Map a host anchor inside this node's container back to a model offset
    pub fn boundary_point_to_offset(&self, host: &dyn RenderHost, point: &BoundaryPoint) -> usize {
        match self.addressing() {
            Addressing::Opaque => 0,
            Addressing::Characters => host
                .locate_offset(point)
                .map(|offset| offset.min(self.len()))
                .unwrap_or(0),
        }
    }
}

/// Byte index of a character offset, clamped to the end of `text`
pub(crate) fn byte_index(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// Characters of `text` in `[start, end)`
pub(crate) fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let from = byte_index(text, start);
    let to = byte_index(text, end.max(start));
    &text[from..to]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::richtext::host::{ContainerRef, MemoryHost};
    use crate::richtext::surface::Surface;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_text_length_counts_characters() {
        let node = Node::paragraph("héllo");
        assert_eq!(node.len(), 5);
        assert_eq!(node.text(), "héllo");
        assert!(node.is_text());
    }

    #[test]
    fn test_isolated_length_is_zero() {
        let node = Node::isolated(DIVIDER);
        assert_eq!(node.len(), 0);
        assert_eq!(node.addressing(), Addressing::Opaque);
        assert_eq!(node.type_id(), "divider");
    }

    #[test]
    fn test_heading_level_is_clamped() {
        assert_eq!(Node::heading(9, "x").kind(), &NodeKind::Heading { level: 6 });
        assert_eq!(Node::heading(0, "x").kind(), &NodeKind::Heading { level: 1 });
    }

    #[test]
    fn test_clone_empty_keeps_variant_not_state() {
        let heading = Node::heading(2, "Title");
        let clone = heading.clone_empty();
        assert_eq!(clone.kind(), &NodeKind::Heading { level: 2 });
        assert_eq!(clone.text(), "");
    }

    #[test]
    fn test_state_merge_overwrites_keys() {
        let mut state = NodeState::with_text("old").set("extra", Value::Bool(true));
        state.merge(&NodeState::with_text("new"));
        assert_eq!(state.text(), "new");
        assert_eq!(state.get("extra"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_char_slice_uses_character_offsets() {
        assert_eq!(char_slice("añb", 1, 2), "ñ");
        assert_eq!(char_slice("abc", 1, 10), "bc");
        assert_eq!(byte_index("añb", 2), 3);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(NodeKind::heading(3).to_string(), "heading(3)");
        assert_eq!(NodeKind::Paragraph.to_string(), "paragraph");
    }

    fn rendered(nodes: Vec<Node>) -> (Surface, Rc<RefCell<MemoryHost>>) {
        let host = MemoryHost::shared();
        (Surface::new(SurfaceId::ROOT, None, nodes, host.clone()), host)
    }

    #[test]
    fn test_atomic_node_is_one_anchor() {
        let (surface, host) = rendered(vec![Node::paragraph("ab"), Node::isolated(DIVIDER)]);
        let host = host.borrow();
        let divider = surface.node(1).unwrap();
        let container = ContainerRef::new(SurfaceId::ROOT, 1);

        for offset in [0, 1, 7] {
            let point = divider
                .offset_to_boundary_point(&*host, SurfaceId::ROOT, offset)
                .unwrap();
            assert_eq!(point, BoundaryPoint::new(container, 0));
        }
        for position in [0, 3, 42] {
            let point = BoundaryPoint::new(container, position);
            assert_eq!(divider.boundary_point_to_offset(&*host, &point), 0);
        }
    }

    #[test]
    fn test_text_offset_past_end_is_rejected() {
        let (surface, host) = rendered(vec![Node::paragraph("héllo")]);
        let node = surface.node(0).unwrap();
        assert_eq!(
            node.offset_to_boundary_point(&*host.borrow(), SurfaceId::ROOT, 6),
            Err(EditError::OffsetOutOfBounds {
                index: 0,
                offset: 6,
                len: 5
            })
        );
    }

    quickcheck::quickcheck! {
        fn text_offsets_map_to_anchors_and_back(text: String) -> bool {
            let (surface, host) = rendered(vec![Node::paragraph(text.as_str())]);
            let host = host.borrow();
            let node = match surface.node(0) {
                Ok(node) => node,
                Err(_) => return false,
            };
            (0..=node.len()).all(|offset| {
                node.offset_to_boundary_point(&*host, SurfaceId::ROOT, offset)
                    .map(|point| node.boundary_point_to_offset(&*host, &point) == offset)
                    .unwrap_or(false)
            })
        }
    }
}
