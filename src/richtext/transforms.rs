// Transforms
// Document editing algorithms expressed as commands over a surface

use super::behavior;
use super::command::{self, Batch, Command};
use super::error::{EditError, EditResult};
use super::node::{NodeState, char_slice};
use super::range::Range;
use super::surface::Surface;

fn text_node_len(surface: &Surface, index: usize) -> EditResult<usize> {
    let node = surface.node(index)?;
    if !node.is_text() {
        return Err(EditError::NotTextNode { index });
    }
    Ok(node.len())
}

fn check_offset(index: usize, offset: usize, len: usize) -> EditResult {
    if offset > len {
        return Err(EditError::OffsetOutOfBounds { index, offset, len });
    }
    Ok(())
}

/// Split the text node at `index` so that the characters from `offset` on
/// move into a new node of the same variant inserted right after it
pub fn split_text_node(surface: &mut Surface, index: usize, offset: usize) -> EditResult<Command> {
    let len = text_node_len(surface, index)?;
    check_offset(index, offset, len)?;

    let node = surface.node(index)?;
    let text = node.text();
    let head = char_slice(text, 0, offset).to_string();
    let tail = char_slice(text, offset, len).to_string();
    let mut clone = node.clone_empty();
    clone.replace_state(NodeState::with_text(tail));

    let truncate = command::update_state(surface, index, NodeState::with_text(head), true)?;
    let insert = command::insert_node(surface, clone, index + 1)?;
    Ok(command::compose([truncate, insert]))
}

/// Remove the characters in `[start, end)` of a text node
pub fn remove_text_slice(
    surface: &mut Surface,
    index: usize,
    start: usize,
    end: usize,
) -> EditResult<Command> {
    let len = text_node_len(surface, index)?;
    check_offset(index, end, len)?;
    check_offset(index, start, end)?;

    let text = surface.node(index)?.text();
    let remaining = format!("{}{}", char_slice(text, 0, start), char_slice(text, end, len));
    command::update_state(surface, index, NodeState::with_text(remaining), true)
}

/// Insert `text` at `offset` of a text node
pub fn insert_text(
    surface: &mut Surface,
    index: usize,
    offset: usize,
    text: &str,
) -> EditResult<Command> {
    let len = text_node_len(surface, index)?;
    check_offset(index, offset, len)?;

    let current = surface.node(index)?.text();
    let updated = format!(
        "{}{}{}",
        char_slice(current, 0, offset),
        text,
        char_slice(current, offset, len)
    );
    command::update_state(surface, index, NodeState::with_text(updated), true)
}

/// Append `text` to the end of a text node
pub fn append_text(surface: &mut Surface, index: usize, text: &str) -> EditResult<Command> {
    let len = text_node_len(surface, index)?;
    insert_text(surface, index, len, text)
}

/// Append the text of node `index + 1` onto node `index`, then remove the
/// former. Both nodes must be text-bearing.
pub fn merge_text_nodes(surface: &mut Surface, index: usize) -> EditResult<Command> {
    text_node_len(surface, index)?;
    text_node_len(surface, index + 1)?;

    let tail = surface.node(index + 1)?.text().to_string();
    let append = append_text(surface, index, &tail)?;
    let remove = command::remove_node(surface, index + 1)?;
    Ok(command::compose([append, remove]))
}

/// Delete everything a range covers, as one reversible unit.
///
/// Interior nodes are removed first (always at `start_index + 1`, since each
/// removal shifts the rest down). When the range spans several nodes, the
/// start node loses its suffix, the end node its prefix, and the two are
/// merged. A single-node range removes the slice between its offsets.
/// On failure the surface is left unchanged.
pub fn remove_range(surface: &mut Surface, range: Range) -> EditResult<Command> {
    if range.is_collapsed() {
        return Ok(command::compose([]));
    }
    let start = range.start();
    let end = range.end();
    surface.node(end.index)?;

    let mut batch = Batch::new();
    for _ in start.index + 1..end.index {
        batch.step(surface, |s| command::remove_node(s, start.index + 1))?;
    }

    if start.index != end.index {
        let end_index = start.index + 1;
        batch.step(surface, |s| {
            let start_len = s.node(start.index)?.len();
            behavior::delete_slice(s, start.index, start.offset, start_len)
        })?;
        batch.step(surface, |s| behavior::delete_slice(s, end_index, 0, end.offset))?;
        batch.step(surface, |s| merge_text_nodes(s, start.index))?;
    } else {
        batch.step(surface, |s| {
            behavior::delete_slice(s, start.index, start.offset, end.offset)
        })?;
    }

    Ok(batch.finish())
}
