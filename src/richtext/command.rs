// Commands
// Reified, reversible mutations of a surface.
//
// Primitives are applied exactly once, when they are created. After that the
// only legal calls are `invert` and `reapply`, always in LIFO order relative
// to other commands touching the same surface.

use log::{trace, warn};

use super::error::{EditError, EditResult};
use super::node::{Node, NodeState};
use super::range::Range;
use super::surface::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    UpdateState,
    InsertNode,
    RemoveNode,
    Compose,
}

#[derive(Debug)]
enum Operation {
    UpdateState {
        index: usize,
        before: NodeState,
        after: NodeState,
    },
    InsertNode {
        position: usize,
        // Holds the node while the insertion is inverted
        detached: Option<Node>,
    },
    RemoveNode {
        position: usize,
        // Holds the node while the removal is applied
        detached: Option<Node>,
    },
    Compose(Vec<Command>),
}

/// A reversible unit of model mutation
#[derive(Debug)]
pub struct Command {
    operation: Operation,
    selection_before: Option<Range>,
    selection_after: Option<Range>,
}

impl Command {
    fn new(operation: Operation) -> Self {
        Command {
            operation,
            selection_before: None,
            selection_after: None,
        }
    }

    pub fn kind(&self) -> CommandKind {
        match self.operation {
            Operation::UpdateState { .. } => CommandKind::UpdateState,
            Operation::InsertNode { .. } => CommandKind::InsertNode,
            Operation::RemoveNode { .. } => CommandKind::RemoveNode,
            Operation::Compose(_) => CommandKind::Compose,
        }
    }

    /// Sub-commands of a composed command, in execution order
    pub fn children(&self) -> &[Command] {
        match &self.operation {
            Operation::Compose(commands) => commands,
            _ => &[],
        }
    }

    /// True for a composed command without any step
    pub fn is_empty(&self) -> bool {
        matches!(&self.operation, Operation::Compose(commands) if commands.is_empty())
    }

    pub fn selection_before(&self) -> Option<Range> {
        self.selection_before
    }

    pub fn selection_after(&self) -> Option<Range> {
        self.selection_after
    }

    pub(crate) fn set_selections(&mut self, before: Option<Range>, after: Option<Range>) {
        self.selection_before = before;
        self.selection_after = after;
    }

    /// Chain another command after this one
    pub fn then(self, next: Command) -> Command {
        match self.operation {
            Operation::Compose(mut commands) => {
                commands.push(next);
                Command::new(Operation::Compose(commands))
            }
            _ => compose([self, next]),
        }
    }

    /// Undo the effect; the surface must be in the post-apply state
    pub fn invert(&mut self, surface: &mut Surface) -> EditResult {
        match &mut self.operation {
            Operation::UpdateState { index, before, .. } => {
                trace!("invert update-state at {}", index);
                surface.replace_state(*index, before.clone(), true)?;
            }
            Operation::InsertNode { position, detached } => {
                trace!("invert insert-node at {}", position);
                *detached = Some(surface.remove_node(*position)?);
            }
            Operation::RemoveNode { position, detached } => {
                trace!("invert remove-node at {}", position);
                let node = detached.take().ok_or(EditError::StaleCommand)?;
                surface.insert_node(*position, node)?;
            }
            Operation::Compose(commands) => {
                for command in commands.iter_mut().rev() {
                    command.invert(surface)?;
                }
            }
        }
        Ok(())
    }

    /// Redo the effect; the surface must be in the post-invert state
    pub fn reapply(&mut self, surface: &mut Surface) -> EditResult {
        match &mut self.operation {
            Operation::UpdateState { index, after, .. } => {
                trace!("reapply update-state at {}", index);
                // Re-application always re-renders to resync the host
                surface.replace_state(*index, after.clone(), true)?;
            }
            Operation::InsertNode { position, detached } => {
                trace!("reapply insert-node at {}", position);
                let node = detached.take().ok_or(EditError::StaleCommand)?;
                surface.insert_node(*position, node)?;
            }
            Operation::RemoveNode { position, detached } => {
                trace!("reapply remove-node at {}", position);
                *detached = Some(surface.remove_node(*position)?);
            }
            Operation::Compose(commands) => {
                for command in commands.iter_mut() {
                    command.reapply(surface)?;
                }
            }
        }
        Ok(())
    }
}

/// Merge `partial` into the state of the node at `index`.
///
/// The host is re-rendered only when `rerender_on_execute` is set; a host that
/// already shows the new content (after its own default editing) passes false.
pub fn update_state(
    surface: &mut Surface,
    index: usize,
    partial: NodeState,
    rerender_on_execute: bool,
) -> EditResult<Command> {
    let before = surface.node(index)?.state().clone();
    let mut after = before.clone();
    after.merge(&partial);
    trace!("update-state at {}", index);
    surface.replace_state(index, after.clone(), rerender_on_execute)?;
    Ok(Command::new(Operation::UpdateState {
        index,
        before,
        after,
    }))
}

/// Insert `node` at `position` (`0..=len`)
pub fn insert_node(surface: &mut Surface, node: Node, position: usize) -> EditResult<Command> {
    trace!("insert-node {} at {}", node.type_id(), position);
    surface.insert_node(position, node)?;
    Ok(Command::new(Operation::InsertNode {
        position,
        detached: None,
    }))
}

/// Remove the node at `position`, keeping it for re-insertion
pub fn remove_node(surface: &mut Surface, position: usize) -> EditResult<Command> {
    trace!("remove-node at {}", position);
    let node = surface.remove_node(position)?;
    Ok(Command::new(Operation::RemoveNode {
        position,
        detached: Some(node),
    }))
}

/// Bundle already-applied commands into one reversible unit
pub fn compose(commands: impl IntoIterator<Item = Command>) -> Command {
    Command::new(Operation::Compose(commands.into_iter().collect()))
}

/// Steps of a composed command, collected while they are applied. A step
/// that fails inverts everything recorded so far, leaving the surface as it
/// was before the first step.
#[derive(Debug, Default)]
pub struct Batch {
    commands: Vec<Command>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one mutation and record the command it produced
    pub fn step(
        &mut self,
        surface: &mut Surface,
        op: impl FnOnce(&mut Surface) -> EditResult<Command>,
    ) -> EditResult {
        let command = self.run(surface, op)?;
        self.commands.push(command);
        Ok(())
    }

    /// Run `op`, rolling back the recorded steps if it fails
    pub fn run<T>(
        &mut self,
        surface: &mut Surface,
        op: impl FnOnce(&mut Surface) -> EditResult<T>,
    ) -> EditResult<T> {
        match op(surface) {
            Ok(value) => Ok(value),
            Err(err) => {
                self.rollback(surface);
                Err(err)
            }
        }
    }

    /// Record a command that was applied outside of `step`
    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    fn rollback(&mut self, surface: &mut Surface) {
        for mut command in self.commands.drain(..).rev() {
            if let Err(err) = command.invert(surface) {
                warn!("rollback of {:?} failed: {}", command.kind(), err);
            }
        }
    }

    pub fn finish(self) -> Command {
        compose(self.commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::richtext::host::{ContainerRef, MemoryHost};
    use crate::richtext::surface::SurfaceId;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn surface(texts: &[&str]) -> (Surface, Rc<RefCell<MemoryHost>>) {
        let host = MemoryHost::shared();
        let nodes = texts.iter().map(|t| Node::paragraph(*t)).collect();
        (Surface::new(SurfaceId::ROOT, None, nodes, host.clone()), host)
    }

    fn renders(host: &Rc<RefCell<MemoryHost>>, index: usize) -> usize {
        host.borrow()
            .container(ContainerRef::new(SurfaceId::ROOT, index))
            .unwrap()
            .renders()
    }

    #[test]
    fn test_update_state_applies_and_inverts() {
        let (mut surface, host) = surface(&["old"]);
        let mut command =
            update_state(&mut surface, 0, NodeState::with_text("new"), true).unwrap();
        assert_eq!(command.kind(), CommandKind::UpdateState);
        assert_eq!(surface.texts(), vec!["new"]);
        assert_eq!(host.borrow().texts(SurfaceId::ROOT), vec!["new"]);

        command.invert(&mut surface).unwrap();
        assert_eq!(surface.texts(), vec!["old"]);
        assert_eq!(host.borrow().texts(SurfaceId::ROOT), vec!["old"]);
    }

    #[test]
    fn test_update_state_without_rerender_until_redo() {
        let (mut surface, host) = surface(&["old"]);
        let mut command =
            update_state(&mut surface, 0, NodeState::with_text("new"), false).unwrap();
        assert_eq!(renders(&host, 0), 1);
        assert_eq!(host.borrow().texts(SurfaceId::ROOT), vec!["old"]);

        command.invert(&mut surface).unwrap();
        assert_eq!(renders(&host, 0), 2);

        command.reapply(&mut surface).unwrap();
        assert_eq!(renders(&host, 0), 3);
        assert_eq!(host.borrow().texts(SurfaceId::ROOT), vec!["new"]);
    }

    #[test]
    fn test_insert_and_remove_are_inverse() {
        let (mut surface, _host) = surface(&["a", "c"]);
        let mut insert = insert_node(&mut surface, Node::paragraph("b"), 1).unwrap();
        assert_eq!(surface.texts(), vec!["a", "b", "c"]);
        insert.invert(&mut surface).unwrap();
        assert_eq!(surface.texts(), vec!["a", "c"]);
        insert.reapply(&mut surface).unwrap();
        assert_eq!(surface.texts(), vec!["a", "b", "c"]);

        let mut remove = remove_node(&mut surface, 0).unwrap();
        assert_eq!(surface.texts(), vec!["b", "c"]);
        remove.invert(&mut surface).unwrap();
        assert_eq!(surface.texts(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_remove_reinserts_same_instance() {
        let host = MemoryHost::shared();
        let nodes = vec![Node::paragraph("a"), Node::heading(3, "h")];
        let mut surface = Surface::new(SurfaceId::ROOT, None, nodes, host);
        let original = surface.nodes()[1].clone();

        let mut remove = remove_node(&mut surface, 1).unwrap();
        remove.invert(&mut surface).unwrap();
        assert_eq!(surface.nodes()[1], original);
    }

    #[test]
    fn test_compose_inverts_in_reverse_order() {
        let (mut surface, _host) = surface(&["ab"]);
        let first = update_state(&mut surface, 0, NodeState::with_text("a"), true).unwrap();
        let second = insert_node(&mut surface, Node::paragraph("b"), 1).unwrap();
        let mut command = compose([first, second]);
        assert_eq!(command.children().len(), 2);
        assert_eq!(surface.texts(), vec!["a", "b"]);

        command.invert(&mut surface).unwrap();
        assert_eq!(surface.texts(), vec!["ab"]);
        command.reapply(&mut surface).unwrap();
        assert_eq!(surface.texts(), vec!["a", "b"]);
    }

    #[test]
    fn test_stale_command_is_reported() {
        let (mut surface, _host) = surface(&["a", "b"]);
        let mut remove = remove_node(&mut surface, 1).unwrap();
        remove.invert(&mut surface).unwrap();
        assert_eq!(remove.invert(&mut surface), Err(EditError::StaleCommand));
    }

    #[test]
    fn test_batch_rolls_back_on_failed_step() {
        let (mut surface, host) = surface(&["a", "b", "c"]);
        let mut batch = Batch::new();
        batch
            .step(&mut surface, |s| update_state(s, 0, NodeState::with_text("x"), true))
            .unwrap();
        batch.step(&mut surface, |s| remove_node(s, 1)).unwrap();
        assert_eq!(surface.texts(), vec!["x", "c"]);

        let failed = batch.step(&mut surface, |s| remove_node(s, 5));
        assert!(matches!(failed, Err(EditError::IndexOutOfBounds { index: 5, .. })));
        assert_eq!(surface.texts(), vec!["a", "b", "c"]);
        assert_eq!(host.borrow().texts(SurfaceId::ROOT), vec!["a", "b", "c"]);
        assert!(batch.finish().is_empty());
    }

    #[test]
    fn test_remove_out_of_bounds_fails() {
        let (mut surface, _host) = surface(&["a"]);
        assert!(matches!(
            remove_node(&mut surface, 3),
            Err(EditError::IndexOutOfBounds { index: 3, len: 1 })
        ));
    }
}
