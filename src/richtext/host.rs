// Rendering Host
// Abstracts over the visual layer that displays surfaces, owns native
// selections and performs default editing for unhandled input

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use unicode_segmentation::UnicodeSegmentation;

use super::input::InputEvent;
use super::node::{Rendering, byte_index};
use super::surface::SurfaceId;

/// Shared handle to the host; every surface of an editor renders into it
pub type HostRef = Rc<RefCell<dyn RenderHost>>;

/// Visual container of one node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerRef {
    pub surface: SurfaceId,
    pub index: usize,
}

impl ContainerRef {
    pub fn new(surface: SurfaceId, index: usize) -> Self {
        ContainerRef { surface, index }
    }
}

/// Concrete host anchor. `position` is measured in host units
/// (bytes for `MemoryHost`), never in model offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundaryPoint {
    pub container: ContainerRef,
    pub position: usize,
}

impl BoundaryPoint {
    pub fn new(container: ContainerRef, position: usize) -> Self {
        BoundaryPoint {
            container,
            position,
        }
    }
}

/// Selection as the host reports it: anchor is where it started, focus where it ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeSelection {
    pub anchor: BoundaryPoint,
    pub focus: BoundaryPoint,
}

impl NativeSelection {
    pub fn new(anchor: BoundaryPoint, focus: BoundaryPoint) -> Self {
        NativeSelection { anchor, focus }
    }

    pub fn collapsed(point: BoundaryPoint) -> Self {
        Self::new(point, point)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

/// The narrow interface the editing core needs from a visual host
pub trait RenderHost {
    /// Create a container at `container.index`, shifting later containers
    fn attach(&mut self, container: ContainerRef, rendering: Rendering);
    /// Remove a container, shifting later containers
    fn detach(&mut self, container: ContainerRef);
    /// Replace the content of an existing container
    fn render(&mut self, container: ContainerRef, rendering: Rendering);
    /// Anchor for a character offset inside a text container
    fn locate_point(&self, container: ContainerRef, offset: usize) -> Option<BoundaryPoint>;
    /// Character offset for an anchor inside a text container
    fn locate_offset(&self, point: &BoundaryPoint) -> Option<usize>;
    /// What the container currently shows, which may differ from the model
    /// after default host editing
    fn visible_text(&self, container: ContainerRef) -> Option<String>;
    fn native_selection(&self) -> Option<NativeSelection>;
    fn set_native_selection(&mut self, selection: Option<NativeSelection>);
    /// Apply the host's own editing for an event nobody prevented.
    /// Returns the containers whose visible content changed.
    fn perform_default(&mut self, event: &InputEvent) -> Vec<ContainerRef>;
}

/// A container of the in-memory host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    rendering: Rendering,
    text: String,
    renders: usize,
}

impl Container {
    fn new(rendering: Rendering) -> Self {
        let mut container = Container {
            rendering: Rendering::Atomic {
                type_id: String::new(),
            },
            text: String::new(),
            renders: 0,
        };
        container.show(rendering);
        container
    }

    fn show(&mut self, rendering: Rendering) {
        self.text = match &rendering {
            Rendering::Text { text, .. } => text.clone(),
            Rendering::Atomic { .. } => String::new(),
        };
        self.rendering = rendering;
        self.renders += 1;
    }

    pub fn rendering(&self) -> &Rendering {
        &self.rendering
    }

    /// Visible text, including edits the host made on its own
    pub fn text(&self) -> &str {
        &self.text
    }

    /// How many times the container content was (re)rendered
    pub fn renders(&self) -> usize {
        self.renders
    }

    fn is_text(&self) -> bool {
        matches!(self.rendering, Rendering::Text { .. })
    }
}

/// Headless host keeping every container in memory.
///
/// Default editing mimics a browser's contentEditable on a single container:
/// printable input replaces the selection, Backspace and Delete remove one
/// grapheme cluster.
#[derive(Debug, Default)]
pub struct MemoryHost {
    surfaces: BTreeMap<SurfaceId, Vec<Container>>,
    selection: Option<NativeSelection>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap into the shared handle editors expect
    pub fn shared() -> Rc<RefCell<MemoryHost>> {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn container(&self, container: ContainerRef) -> Option<&Container> {
        self.surfaces
            .get(&container.surface)
            .and_then(|containers| containers.get(container.index))
    }

    fn container_mut(&mut self, container: ContainerRef) -> Option<&mut Container> {
        self.surfaces
            .get_mut(&container.surface)
            .and_then(|containers| containers.get_mut(container.index))
    }

    /// Visible text of every container of a surface
    pub fn texts(&self, surface: SurfaceId) -> Vec<String> {
        self.surfaces
            .get(&surface)
            .map(|containers| containers.iter().map(|c| c.text.clone()).collect())
            .unwrap_or_default()
    }

    /// Place a collapsed native caret at a character offset, as a user click would
    pub fn place_caret(&mut self, container: ContainerRef, offset: usize) {
        self.select(container, offset, container, offset);
    }

    /// Set a native selection between two character offsets
    pub fn select(
        &mut self,
        anchor: ContainerRef,
        anchor_offset: usize,
        focus: ContainerRef,
        focus_offset: usize,
    ) {
        let anchor = self.point_for(anchor, anchor_offset);
        let focus = self.point_for(focus, focus_offset);
        self.selection = Some(NativeSelection::new(anchor, focus));
    }

    fn point_for(&self, container: ContainerRef, offset: usize) -> BoundaryPoint {
        let position = self
            .container(container)
            .map(|c| byte_index(&c.text, offset))
            .unwrap_or(0);
        BoundaryPoint::new(container, position)
    }

    /// Replace `[from, to)` bytes of a container and leave the caret after the insertion
    fn splice(&mut self, container: ContainerRef, from: usize, to: usize, insert: &str) -> bool {
        let Some(target) = self.container_mut(container) else {
            return false;
        };
        if from == to && insert.is_empty() {
            return false;
        }
        target.text.replace_range(from..to, insert);
        let caret = BoundaryPoint::new(container, from + insert.len());
        self.selection = Some(NativeSelection::collapsed(caret));
        true
    }
}

fn floor_char_boundary(text: &str, position: usize) -> usize {
    let mut position = position.min(text.len());
    while !text.is_char_boundary(position) {
        position -= 1;
    }
    position
}

impl RenderHost for MemoryHost {
    fn attach(&mut self, container: ContainerRef, rendering: Rendering) {
        let containers = self.surfaces.entry(container.surface).or_default();
        let index = container.index.min(containers.len());
        containers.insert(index, Container::new(rendering));
    }

    fn detach(&mut self, container: ContainerRef) {
        if let Some(containers) = self.surfaces.get_mut(&container.surface)
            && container.index < containers.len()
        {
            containers.remove(container.index);
        }
    }

    fn render(&mut self, container: ContainerRef, rendering: Rendering) {
        if let Some(target) = self.container_mut(container) {
            target.show(rendering);
        }
    }

    fn locate_point(&self, container: ContainerRef, offset: usize) -> Option<BoundaryPoint> {
        let target = self.container(container)?;
        if !target.is_text() {
            return Some(BoundaryPoint::new(container, 0));
        }
        if offset > target.text.chars().count() {
            return None;
        }
        Some(BoundaryPoint::new(
            container,
            byte_index(&target.text, offset),
        ))
    }

    fn locate_offset(&self, point: &BoundaryPoint) -> Option<usize> {
        let target = self.container(point.container)?;
        let position = floor_char_boundary(&target.text, point.position);
        Some(target.text[..position].chars().count())
    }

    fn visible_text(&self, container: ContainerRef) -> Option<String> {
        self.container(container).map(|c| c.text.clone())
    }

    fn native_selection(&self) -> Option<NativeSelection> {
        self.selection
    }

    fn set_native_selection(&mut self, selection: Option<NativeSelection>) {
        self.selection = selection;
    }

    fn perform_default(&mut self, event: &InputEvent) -> Vec<ContainerRef> {
        let Some(selection) = self.selection else {
            return Vec::new();
        };
        // Editing across containers is left to the dispatch layer
        if selection.anchor.container != selection.focus.container {
            return Vec::new();
        }
        let container = selection.anchor.container;
        let Some(target) = self.container(container) else {
            return Vec::new();
        };
        if !target.is_text() {
            return Vec::new();
        }

        let text = target.text.clone();
        let a = floor_char_boundary(&text, selection.anchor.position);
        let b = floor_char_boundary(&text, selection.focus.position);
        let (from, to) = (a.min(b), a.max(b));

        let changed = match event {
            InputEvent::Keypress { ch } => self.splice(container, from, to, &ch.to_string()),
            InputEvent::Paste { text: pasted } => self.splice(container, from, to, pasted),
            InputEvent::Key { code } => match code.as_str() {
                "Backspace" if from != to => self.splice(container, from, to, ""),
                "Backspace" => {
                    let previous = text[..from]
                        .grapheme_indices(true)
                        .next_back()
                        .map(|(i, _)| i);
                    match previous {
                        Some(start) => self.splice(container, start, from, ""),
                        None => false,
                    }
                }
                "Delete" if from != to => self.splice(container, from, to, ""),
                "Delete" => {
                    let next = text[from..].graphemes(true).next().map(|g| from + g.len());
                    match next {
                        Some(end) => self.splice(container, from, end, ""),
                        None => false,
                    }
                }
                _ => false,
            },
        };

        if changed { vec![container] } else { Vec::new() }
    }
}
