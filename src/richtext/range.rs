// Ranges
// A (possibly collapsed) span across the nodes of one surface

use std::fmt;

use super::node::Node;
use super::surface::SurfaceId;

/// Position within a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub index: usize,
    pub offset: usize, // Inter-character offset within the node
}

impl Position {
    pub fn new(index: usize, offset: usize) -> Self {
        Position { index, offset }
    }

    pub fn start() -> Self {
        Position::new(0, 0)
    }

    /// Clamp to the bounds of a node sequence
    pub fn clamp(self, nodes: &[Node]) -> Self {
        let Some(last) = nodes.len().checked_sub(1) else {
            return Position::start();
        };
        let index = self.index.min(last);
        Position::new(index, self.offset.min(nodes[index].len()))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.index, self.offset)
    }
}

/// Selection span; `start <= end` always holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    surface: SurfaceId,
    start: Position,
    end: Position,
}

impl Range {
    /// Build a range from two positions in either order
    pub fn new(surface: SurfaceId, a: Position, b: Position) -> Self {
        let (start, end) = if b < a { (b, a) } else { (a, b) };
        Range {
            surface,
            start,
            end,
        }
    }

    /// A collapsed range (caret)
    pub fn caret(surface: SurfaceId, index: usize, offset: usize) -> Self {
        let pos = Position::new(index, offset);
        Self::new(surface, pos, pos)
    }

    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    pub fn start_index(&self) -> usize {
        self.start.index
    }

    pub fn start_offset(&self) -> usize {
        self.start.offset
    }

    pub fn end_index(&self) -> usize {
        self.end.index
    }

    pub fn end_offset(&self) -> usize {
        self.end.offset
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Whether the whole range sits inside one node
    pub fn is_single_node(&self) -> bool {
        self.start.index == self.end.index
    }

    /// Number of nodes touched by the range
    pub fn node_count(&self) -> usize {
        self.end.index - self.start.index + 1
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.start <= pos && pos <= self.end
    }

    /// The caret at the start of this range
    pub fn collapse_to_start(&self) -> Self {
        Range::new(self.surface, self.start, self.start)
    }

    /// Clamp both ends to the bounds of a node sequence
    pub fn clamp(&self, nodes: &[Node]) -> Self {
        Range::new(self.surface, self.start.clamp(nodes), self.end.clamp(nodes))
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_collapsed() {
            write!(f, "{}@{}", self.surface, self.start)
        } else {
            write!(f, "{}@{}..{}", self.surface, self.start, self.end)
        }
    }
}
