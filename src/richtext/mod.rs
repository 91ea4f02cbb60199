// Rich Text Editing
// Flat node model, reversible commands, surfaces and selection mapping

pub mod behavior;
pub mod command;
pub mod document;
pub mod editor;
pub mod error;
pub mod history;
pub mod host;
pub mod input;
pub mod markdown;
pub mod node;
pub mod range;
pub mod registry;
pub mod selection;
pub mod surface;
pub mod transforms;

pub use document::{Document, DocumentError};
pub use editor::Editor;
pub use error::{EditError, EditResult};
pub use host::{MemoryHost, RenderHost};
pub use input::{Input, InputEvent};
pub use node::{Node, NodeKind};
pub use range::{Position, Range};
pub use surface::SurfaceId;
