// Behavior
// Handlers for critical inputs, keyed per node variant and per surface

use log::trace;
use std::collections::HashMap;

use super::command::{self, Batch, Command};
use super::error::{EditError, EditResult};
use super::input::{HandlerKey, Input, InputEvent};
use super::node::{Addressing, Node, NodeKind, NodeState, char_slice};
use super::range::{Position, Range};
use super::surface::Surface;
use super::transforms;

/// A behavior handler. Returns the command it executed, or None when it made
/// no model change.
pub type Handler = fn(&mut HandlerContext<'_>) -> EditResult<Option<Command>>;

/// What a handler sees while it runs
pub struct HandlerContext<'a> {
    surface: &'a mut Surface,
    range: Range,
    event: Option<&'a InputEvent>,
    default_prevented: bool,
    selection_after: Option<Range>,
}

impl<'a> HandlerContext<'a> {
    pub fn new(surface: &'a mut Surface, range: Range, event: Option<&'a InputEvent>) -> Self {
        HandlerContext {
            surface,
            range,
            event,
            default_prevented: false,
            selection_after: None,
        }
    }

    pub fn surface(&self) -> &Surface {
        &*self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut *self.surface
    }

    /// Selection at the time the input arrived
    pub fn range(&self) -> Range {
        self.range
    }

    pub fn event(&self) -> Option<&InputEvent> {
        self.event
    }

    /// Keep the host from applying its own editing for this input
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Place the caret once the handler returns
    pub fn select(&mut self, index: usize, offset: usize) {
        self.selection_after = Some(Range::caret(self.surface.id(), index, offset));
    }

    pub fn selection_after(&self) -> Option<Range> {
        self.selection_after
    }

    fn apply(&mut self, edit: Option<Edit>) -> Option<Command> {
        edit.map(|edit| {
            self.select(edit.caret.index, edit.caret.offset);
            edit.command
        })
    }
}

/// Outcome of handing an input to a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Handled {
    pub found: bool,
    pub executed: bool,
    pub default_prevented: bool,
}

/// An executed command and where the caret lands after it
#[derive(Debug)]
pub struct Edit {
    pub command: Command,
    pub caret: Position,
}

impl Edit {
    fn new(command: Command, index: usize, offset: usize) -> Self {
        Edit {
            command,
            caret: Position::new(index, offset),
        }
    }
}

/// Node-local handler for a variant. Range-bearing keys only reach text
/// nodes through the surface table, so node handlers are caret-only.
pub fn node_handler(kind: &NodeKind, key: HandlerKey) -> Option<Handler> {
    if key.selection {
        return None;
    }
    let handler: Handler = match (kind.addressing(), key.input) {
        (Addressing::Characters, Input::Enter) => text_enter,
        (Addressing::Characters, Input::Backspace) => text_backspace,
        (Addressing::Characters, Input::Delete) => text_delete,
        (Addressing::Characters, Input::Paste) => text_paste,
        (Addressing::Characters, Input::Keypress) => return None,
        (Addressing::Opaque, Input::Backspace | Input::Delete) => atomic_remove,
        (Addressing::Opaque, Input::Enter | Input::Keypress | Input::Paste) => atomic_ignore,
    };
    Some(handler)
}

fn text_enter(ctx: &mut HandlerContext<'_>) -> EditResult<Option<Command>> {
    ctx.prevent_default();
    let at = ctx.range().start();
    let edit = enter_at(ctx.surface_mut(), at.index, at.offset)?;
    Ok(ctx.apply(Some(edit)))
}

fn text_backspace(ctx: &mut HandlerContext<'_>) -> EditResult<Option<Command>> {
    let at = ctx.range().start();
    let edit = delete_collapsed_at(ctx.surface_mut(), at.index, at.offset)?;
    if edit.is_some() {
        ctx.prevent_default();
    }
    Ok(ctx.apply(edit))
}

fn text_delete(ctx: &mut HandlerContext<'_>) -> EditResult<Option<Command>> {
    let at = ctx.range().start();
    let edit = delete_forward_at(ctx.surface_mut(), at.index, at.offset)?;
    if edit.is_some() {
        ctx.prevent_default();
    }
    Ok(ctx.apply(edit))
}

fn text_paste(ctx: &mut HandlerContext<'_>) -> EditResult<Option<Command>> {
    ctx.prevent_default();
    let text = ctx.event().and_then(InputEvent::text).unwrap_or_default();
    let at = ctx.range().start();
    let edit = paste_text(ctx.surface_mut(), at.index, at.offset, &text)?;
    Ok(ctx.apply(edit))
}

fn atomic_remove(ctx: &mut HandlerContext<'_>) -> EditResult<Option<Command>> {
    ctx.prevent_default();
    let index = ctx.range().start_index();
    let command = replace_with_paragraph(ctx.surface_mut(), index)?;
    ctx.select(index, 0);
    Ok(Some(command))
}

fn atomic_ignore(ctx: &mut HandlerContext<'_>) -> EditResult<Option<Command>> {
    ctx.prevent_default();
    Ok(None)
}

fn remove_selection(ctx: &mut HandlerContext<'_>) -> EditResult<Option<Command>> {
    ctx.prevent_default();
    let range = ctx.range();
    let command = transforms::remove_range(ctx.surface_mut(), range)?;
    ctx.select(range.start_index(), range.start_offset());
    Ok(Some(command))
}

/// Remove the selection, then run `followup` at the collapsed caret when it
/// sits in a text node. A failing followup also undoes the removal.
fn replace_selection(
    ctx: &mut HandlerContext<'_>,
    followup: impl FnOnce(&mut Surface, Position) -> EditResult<Option<Edit>>,
) -> EditResult<Option<Command>> {
    ctx.prevent_default();
    let range = ctx.range();
    let at = range.start();

    let mut batch = Batch::new();
    batch.step(ctx.surface_mut(), |surface| transforms::remove_range(surface, range))?;
    let edit = batch.run(ctx.surface_mut(), |surface| {
        if surface.node(at.index)?.is_text() {
            followup(surface, at)
        } else {
            Ok(None)
        }
    })?;

    let caret = match edit {
        Some(edit) => {
            batch.push(edit.command);
            edit.caret
        }
        None => at,
    };
    ctx.select(caret.index, caret.offset);
    Ok(Some(batch.finish()))
}

fn selection_enter(ctx: &mut HandlerContext<'_>) -> EditResult<Option<Command>> {
    replace_selection(ctx, |surface, at| {
        enter_at(surface, at.index, at.offset).map(Some)
    })
}

fn selection_keypress(ctx: &mut HandlerContext<'_>) -> EditResult<Option<Command>> {
    let text = ctx.event().and_then(InputEvent::text).unwrap_or_default();
    replace_selection(ctx, |surface, at| {
        if text.is_empty() {
            return Ok(None);
        }
        let command = transforms::insert_text(surface, at.index, at.offset, &text)?;
        Ok(Some(Edit::new(
            command,
            at.index,
            at.offset + text.chars().count(),
        )))
    })
}

fn selection_paste(ctx: &mut HandlerContext<'_>) -> EditResult<Option<Command>> {
    let text = ctx.event().and_then(InputEvent::text).unwrap_or_default();
    replace_selection(ctx, |surface, at| {
        paste_text(surface, at.index, at.offset, &text)
    })
}

/// Surface-level handlers, consulted when no node-local handler applies
#[derive(Debug, Clone)]
pub struct BehaviorTable {
    handlers: HashMap<HandlerKey, Handler>,
}

impl BehaviorTable {
    pub fn empty() -> Self {
        BehaviorTable {
            handlers: HashMap::new(),
        }
    }

    /// The built-in range-bearing behaviors
    pub fn defaults() -> Self {
        let mut table = Self::empty();
        table.register(HandlerKey::selection(Input::Backspace), remove_selection);
        table.register(HandlerKey::selection(Input::Delete), remove_selection);
        table.register(HandlerKey::selection(Input::Enter), selection_enter);
        table.register(HandlerKey::selection(Input::Keypress), selection_keypress);
        table.register(HandlerKey::selection(Input::Paste), selection_paste);
        table
    }

    pub fn get(&self, key: HandlerKey) -> Option<Handler> {
        self.handlers.get(&key).copied()
    }

    /// Add or replace the handler for a key
    pub fn register(&mut self, key: HandlerKey, handler: Handler) {
        self.handlers.insert(key, handler);
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for BehaviorTable {
    fn default() -> Self {
        Self::defaults()
    }
}

/// Enter at a caret inside a text node: split, or add the next node when the
/// caret is at the end. The caret moves to the start of the following node.
pub fn enter_at(surface: &mut Surface, index: usize, offset: usize) -> EditResult<Edit> {
    let node = surface.node(index)?;
    if !node.is_text() {
        return Err(EditError::NotTextNode { index });
    }
    let command = if offset >= node.len() {
        let next = Node::new(node.kind().next_kind());
        trace!("enter at end of {}, adding {}", index, next.kind());
        command::insert_node(surface, next, index + 1)?
    } else {
        transforms::split_text_node(surface, index, offset)?
    };
    Ok(Edit::new(command, index + 1, 0))
}

/// Backspace at a collapsed caret. Only the start of a node that has a
/// predecessor produces a command; everything else is left to the host.
pub fn delete_collapsed_at(
    surface: &mut Surface,
    index: usize,
    offset: usize,
) -> EditResult<Option<Edit>> {
    let node = surface.node(index)?;
    if offset > 0 || index == 0 || !node.is_text() {
        return Ok(None);
    }
    let empty = node.is_empty();
    let previous = surface.node(index - 1)?;

    if previous.is_text() {
        let merge_point = previous.len();
        let command = transforms::merge_text_nodes(surface, index - 1)?;
        return Ok(Some(Edit::new(command, index - 1, merge_point)));
    }
    if empty {
        let command = command::remove_node(surface, index)?;
        return Ok(Some(Edit::new(command, index - 1, 0)));
    }
    Ok(None)
}

/// Delete at a collapsed caret, the forward mirror of `delete_collapsed_at`
pub fn delete_forward_at(
    surface: &mut Surface,
    index: usize,
    offset: usize,
) -> EditResult<Option<Edit>> {
    let node = surface.node(index)?;
    let len = node.len();
    if offset < len || index + 1 >= surface.len() || !node.is_text() {
        return Ok(None);
    }
    let empty = node.is_empty();

    if surface.node(index + 1)?.is_text() {
        let command = transforms::merge_text_nodes(surface, index)?;
        return Ok(Some(Edit::new(command, index, len)));
    }
    if empty {
        let command = command::remove_node(surface, index)?;
        return Ok(Some(Edit::new(command, index, 0)));
    }
    Ok(None)
}

/// Remove the addressed slice of a node. An atomic node has no slices, so the
/// whole unit is swapped for an empty paragraph.
pub fn delete_slice(
    surface: &mut Surface,
    index: usize,
    start: usize,
    end: usize,
) -> EditResult<Command> {
    match surface.node(index)?.addressing() {
        Addressing::Characters => transforms::remove_text_slice(surface, index, start, end),
        Addressing::Opaque => replace_with_paragraph(surface, index),
    }
}

/// Swap the node at `index` for an empty paragraph
pub fn replace_with_paragraph(surface: &mut Surface, index: usize) -> EditResult<Command> {
    let remove = command::remove_node(surface, index)?;
    let insert = command::insert_node(surface, Node::paragraph(""), index)?;
    Ok(command::compose([remove, insert]))
}

/// Paste plain text at a caret inside a text node.
///
/// The first line lands at the caret; each further line becomes a new
/// paragraph, and the text after the caret moves to the end of the last one.
pub fn paste_text(
    surface: &mut Surface,
    index: usize,
    offset: usize,
    text: &str,
) -> EditResult<Option<Edit>> {
    if text.is_empty() {
        return Ok(None);
    }
    let lines = split_lines(text);
    let [first, rest @ ..] = lines.as_slice() else {
        return Ok(None);
    };

    let Some(last) = rest.last() else {
        let command = transforms::insert_text(surface, index, offset, first)?;
        return Ok(Some(Edit::new(
            command,
            index,
            offset + first.chars().count(),
        )));
    };

    let node = surface.node(index)?;
    if !node.is_text() {
        return Err(EditError::NotTextNode { index });
    }
    let len = node.len();
    if offset > len {
        return Err(EditError::OffsetOutOfBounds { index, offset, len });
    }
    let head = char_slice(node.text(), 0, offset).to_string();
    let tail = char_slice(node.text(), offset, len).to_string();

    let mut batch = Batch::new();
    batch.step(surface, |s| {
        command::update_state(s, index, NodeState::with_text(format!("{}{}", head, first)), true)
    })?;
    for (i, line) in rest.iter().enumerate() {
        let position = index + i + 1;
        let content = if i + 1 == rest.len() {
            format!("{}{}", line, tail)
        } else {
            line.to_string()
        };
        batch.step(surface, |s| {
            command::insert_node(s, Node::paragraph(content), position)
        })?;
    }

    Ok(Some(Edit::new(
        batch.finish(),
        index + rest.len(),
        last.chars().count(),
    )))
}

/// Split clipboard text on `\r\n`, `\n` and `\r`
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match c {
            '\n' => {
                lines.push(&text[start..i]);
                start = i + 1;
            }
            '\r' => {
                lines.push(&text[start..i]);
                start = i + 1;
                if let Some((_, '\n')) = chars.peek() {
                    chars.next();
                    start += 1;
                }
            }
            _ => {}
        }
    }
    lines.push(&text[start..]);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::richtext::command::CommandKind;
    use crate::richtext::history::History;
    use crate::richtext::host::MemoryHost;
    use crate::richtext::surface::SurfaceId;

    fn surface(nodes: Vec<Node>) -> Surface {
        Surface::new(SurfaceId::ROOT, None, nodes, MemoryHost::shared())
    }

    fn paragraphs(texts: &[&str]) -> Surface {
        surface(texts.iter().map(|t| Node::paragraph(*t)).collect())
    }

    fn press(
        surface: &mut Surface,
        history: &mut History,
        input: Input,
        event: Option<&InputEvent>,
    ) -> Handled {
        surface
            .handle(input, event, history, &BehaviorTable::defaults())
            .unwrap()
    }

    fn caret(surface: &Surface) -> (usize, usize) {
        let range = surface.selection().unwrap();
        assert!(range.is_collapsed());
        (range.start_index(), range.start_offset())
    }

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines("a\r\nb\nc\rd"), vec!["a", "b", "c", "d"]);
        assert_eq!(split_lines("one"), vec!["one"]);
        assert_eq!(split_lines("end\n"), vec!["end", ""]);
    }

    #[test]
    fn test_enter_splits_mid_text() {
        let mut surface = paragraphs(&["hello world"]);
        let mut history = History::new();
        surface
            .select(Range::caret(SurfaceId::ROOT, 0, 5))
            .unwrap();

        let handled = press(&mut surface, &mut history, Input::Enter, None);
        assert!(handled.executed);
        assert!(handled.default_prevented);
        assert_eq!(surface.texts(), vec!["hello", " world"]);
        assert_eq!(caret(&surface), (1, 0));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_enter_at_end_of_heading_adds_paragraph() {
        let mut surface = surface(vec![Node::heading(1, "Title")]);
        let edit = enter_at(&mut surface, 0, 5).unwrap();
        assert_eq!(edit.command.kind(), CommandKind::InsertNode);
        assert_eq!(edit.caret, Position::new(1, 0));
        assert_eq!(surface.nodes()[1].kind(), &NodeKind::Paragraph);
    }

    #[test]
    fn test_backspace_at_start_merges_into_previous() {
        let mut surface = paragraphs(&["ab", "cd"]);
        let mut history = History::new();
        surface
            .select(Range::caret(SurfaceId::ROOT, 1, 0))
            .unwrap();

        let handled = press(&mut surface, &mut history, Input::Backspace, None);
        assert!(handled.executed);
        assert_eq!(surface.texts(), vec!["abcd"]);
        assert_eq!(caret(&surface), (0, 2));
    }

    #[test]
    fn test_backspace_mid_text_defers_to_host() {
        let mut surface = paragraphs(&["abc"]);
        let mut history = History::new();
        surface
            .select(Range::caret(SurfaceId::ROOT, 0, 2))
            .unwrap();

        let handled = press(&mut surface, &mut history, Input::Backspace, None);
        assert!(handled.found);
        assert!(!handled.executed);
        assert!(!handled.default_prevented);
        assert!(history.is_empty());
    }

    #[test]
    fn test_backspace_in_first_node_does_nothing() {
        let mut surface = paragraphs(&["abc"]);
        assert!(delete_collapsed_at(&mut surface, 0, 0).unwrap().is_none());
    }

    #[test]
    fn test_backspace_after_atomic_removes_empty_node() {
        let mut surface = surface(vec![Node::isolated("divider"), Node::paragraph("")]);
        let edit = delete_collapsed_at(&mut surface, 1, 0).unwrap().unwrap();
        assert_eq!(surface.len(), 1);
        assert_eq!(surface.nodes()[0].type_id(), "divider");
        assert_eq!(edit.caret, Position::new(0, 0));

        let mut surface = self::surface(vec![Node::isolated("divider"), Node::paragraph("text")]);
        assert!(delete_collapsed_at(&mut surface, 1, 0).unwrap().is_none());
    }

    #[test]
    fn test_delete_at_end_merges_next() {
        let mut surface = paragraphs(&["ab", "cd"]);
        let edit = delete_forward_at(&mut surface, 0, 2).unwrap().unwrap();
        assert_eq!(surface.texts(), vec!["abcd"]);
        assert_eq!(edit.caret, Position::new(0, 2));

        assert!(delete_forward_at(&mut surface, 0, 1).unwrap().is_none());
        assert!(delete_forward_at(&mut surface, 0, 4).unwrap().is_none());
    }

    #[test]
    fn test_backspace_on_atomic_node_replaces_it() {
        let mut surface = surface(vec![Node::paragraph("a"), Node::isolated("divider")]);
        let mut history = History::new();
        surface
            .select(Range::caret(SurfaceId::ROOT, 1, 0))
            .unwrap();

        let handled = press(&mut surface, &mut history, Input::Backspace, None);
        assert!(handled.executed);
        assert!(handled.default_prevented);
        assert_eq!(surface.nodes()[1].kind(), &NodeKind::Paragraph);
        assert_eq!(caret(&surface), (1, 0));
        let entry = history.current().unwrap();
        assert_eq!(entry.command.kind(), CommandKind::Compose);
    }

    #[test]
    fn test_enter_on_atomic_node_is_ignored() {
        let mut surface = surface(vec![Node::isolated("divider")]);
        let mut history = History::new();
        surface
            .select(Range::caret(SurfaceId::ROOT, 0, 0))
            .unwrap();

        let handled = press(&mut surface, &mut history, Input::Enter, None);
        assert!(handled.found);
        assert!(!handled.executed);
        assert!(handled.default_prevented);
        assert_eq!(surface.len(), 1);
    }

    #[test]
    fn test_keypress_in_text_has_no_node_handler() {
        let kind = NodeKind::Paragraph;
        assert!(node_handler(&kind, HandlerKey::caret(Input::Keypress)).is_none());
        assert!(node_handler(&kind, HandlerKey::selection(Input::Enter)).is_none());
        assert!(node_handler(&kind, HandlerKey::caret(Input::Enter)).is_some());
    }

    #[test]
    fn test_paste_multiple_lines() {
        let mut surface = paragraphs(&["start end"]);
        let mut history = History::new();
        surface
            .select(Range::caret(SurfaceId::ROOT, 0, 6))
            .unwrap();
        let event = InputEvent::paste("one\ntwo\r\nthree ");

        let handled = press(&mut surface, &mut history, Input::Paste, Some(&event));
        assert!(handled.executed);
        assert_eq!(surface.texts(), vec!["start one", "two", "three end"]);
        assert_eq!(caret(&surface), (2, 6));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_paste_single_line() {
        let mut surface = paragraphs(&["ac"]);
        let edit = paste_text(&mut surface, 0, 1, "b").unwrap().unwrap();
        assert_eq!(surface.texts(), vec!["abc"]);
        assert_eq!(edit.caret, Position::new(0, 2));
        assert!(paste_text(&mut surface, 0, 0, "").unwrap().is_none());
    }

    #[test]
    fn test_selection_keypress_replaces_range() {
        let mut surface = paragraphs(&["hello", "world"]);
        let mut history = History::new();
        surface
            .select(Range::new(
                SurfaceId::ROOT,
                Position::new(0, 2),
                Position::new(1, 3),
            ))
            .unwrap();
        let event = InputEvent::keypress('X');

        let handled = press(&mut surface, &mut history, Input::Keypress, Some(&event));
        assert!(handled.executed);
        assert!(handled.default_prevented);
        assert_eq!(surface.texts(), vec!["heXld"]);
        assert_eq!(caret(&surface), (0, 3));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_selection_enter_removes_then_splits() {
        let mut surface = paragraphs(&["abcdef"]);
        let mut history = History::new();
        surface
            .select(Range::new(
                SurfaceId::ROOT,
                Position::new(0, 1),
                Position::new(0, 3),
            ))
            .unwrap();

        press(&mut surface, &mut history, Input::Enter, None);
        assert_eq!(surface.texts(), vec!["a", "def"]);
        assert_eq!(caret(&surface), (1, 0));
    }

    #[test]
    fn test_selection_backspace_removes_range() {
        let mut surface = paragraphs(&["one", "two", "three"]);
        let mut history = History::new();
        surface
            .select(Range::new(
                SurfaceId::ROOT,
                Position::new(0, 1),
                Position::new(2, 2),
            ))
            .unwrap();

        let handled = press(&mut surface, &mut history, Input::Backspace, None);
        assert!(handled.executed);
        assert_eq!(surface.texts(), vec!["oree"]);
        assert_eq!(caret(&surface), (0, 1));
    }

    #[test]
    fn test_failed_followup_keeps_selected_content() {
        fn insert_past_end(ctx: &mut HandlerContext<'_>) -> EditResult<Option<Command>> {
            replace_selection(ctx, |surface, at| {
                let command = transforms::insert_text(surface, at.index, at.offset + 50, "x")?;
                Ok(Some(Edit::new(command, at.index, at.offset)))
            })
        }

        let mut surface = paragraphs(&["ab", "cd"]);
        let mut history = History::new();
        let mut table = BehaviorTable::defaults();
        table.register(HandlerKey::selection(Input::Keypress), insert_past_end);
        surface
            .select(Range::new(
                SurfaceId::ROOT,
                Position::new(0, 1),
                Position::new(1, 1),
            ))
            .unwrap();

        let result = surface.handle(Input::Keypress, None, &mut history, &table);
        assert!(matches!(result, Err(EditError::OffsetOutOfBounds { .. })));
        assert_eq!(surface.texts(), vec!["ab", "cd"]);
        assert!(history.is_empty());
    }

    #[test]
    fn test_no_selection_means_no_handler() {
        let mut surface = paragraphs(&["abc"]);
        let mut history = History::new();
        let handled = press(&mut surface, &mut history, Input::Enter, None);
        assert_eq!(handled, Handled::default());
    }

    #[test]
    fn test_custom_handler_overrides_default() {
        fn shout(ctx: &mut HandlerContext<'_>) -> EditResult<Option<Command>> {
            ctx.prevent_default();
            let index = ctx.range().start_index();
            transforms::append_text(ctx.surface_mut(), index, "!").map(Some)
        }

        let mut surface = paragraphs(&["ab", "cd"]);
        let mut history = History::new();
        let mut table = BehaviorTable::defaults();
        table.register(HandlerKey::selection(Input::Backspace), shout);
        surface
            .select(Range::new(
                SurfaceId::ROOT,
                Position::new(0, 0),
                Position::new(1, 1),
            ))
            .unwrap();

        surface
            .handle(Input::Backspace, None, &mut history, &table)
            .unwrap();
        assert_eq!(surface.texts(), vec!["ab!", "cd"]);
    }
}
