// Document
// Persisted form of a node sequence plus an optional title

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::node::{Node, NodeKind};
use super::registry::{NodeRecord, NodeRegistry};

/// Errors raised while loading or saving a document
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("document has no `nodes` list")]
    MissingNodes,
    #[error("unknown node type `{0}`")]
    UnknownNodeType(String),
    #[error("invalid `{type_id}` node: {reason}")]
    InvalidNode { type_id: String, reason: String },
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct PersistedDocument<'a> {
    nodes: Vec<NodeRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
}

/// An ordered node sequence. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    nodes: Vec<Node>,
    title: Option<String>,
}

impl Document {
    pub fn new(nodes: Vec<Node>) -> Self {
        let mut nodes = nodes;
        if nodes.is_empty() {
            nodes.push(Node::paragraph(""));
        }
        for (index, node) in nodes.iter_mut().enumerate() {
            node.set_index(index);
        }
        Document { nodes, title: None }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    pub fn explicit_title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// The stored title, or else the text of the first heading
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().or_else(|| {
            self.nodes
                .iter()
                .find(|node| matches!(node.kind(), NodeKind::Heading { .. }))
                .map(|node| node.text())
        })
    }

    pub fn from_json(json: &str, registry: &NodeRegistry) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value, registry)
    }

    /// Build a document from its persisted value; fails without a partial
    /// result on a missing `nodes` list or an unknown node type
    pub fn from_value(value: Value, registry: &NodeRegistry) -> Result<Self, DocumentError> {
        let Value::Object(mut object) = value else {
            return Err(DocumentError::MissingNodes);
        };
        let Some(Value::Array(items)) = object.remove("nodes") else {
            return Err(DocumentError::MissingNodes);
        };

        let nodes = items
            .into_iter()
            .map(|item| -> Result<Node, DocumentError> {
                let record: NodeRecord = serde_json::from_value(item)?;
                registry.construct(&record)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let title = object
            .get("title")
            .and_then(Value::as_str)
            .map(str::to_string);
        Ok(Document {
            title,
            ..Document::new(nodes)
        })
    }

    pub fn to_value(&self) -> Result<Value, DocumentError> {
        let persisted = PersistedDocument {
            nodes: self.nodes.iter().map(Node::to_record).collect(),
            title: self.title.as_deref(),
        };
        Ok(serde_json::to_value(persisted)?)
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(&self.to_value()?)?)
    }

    /// Text of every text node, separated by blank lines
    pub fn to_plain_text(&self) -> String {
        self.nodes
            .iter()
            .filter(|node| node.is_text())
            .map(|node| node.text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
