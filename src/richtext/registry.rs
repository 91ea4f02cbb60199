// Node Registry
// Explicit table from persisted type ids to node constructors

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use super::document::DocumentError;
use super::node::{DIVIDER, HEADING, Node, NodeKind, NodeState, PARAGRAPH};

/// One node as it appears in the persisted format. Variant fields such as a
/// heading's `level` sit beside `type` and `state`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    #[serde(rename = "type")]
    pub type_id: String,
    #[serde(default)]
    pub state: Map<String, Value>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl NodeRecord {
    pub fn new(type_id: impl Into<String>, state: Map<String, Value>) -> Self {
        NodeRecord {
            type_id: type_id.into(),
            state,
            fields: Map::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

pub type NodeConstructor = fn(&NodeRecord) -> Result<Node, DocumentError>;

/// Type-id to constructor table consulted during deserialization
#[derive(Debug, Clone)]
pub struct NodeRegistry {
    constructors: HashMap<String, NodeConstructor>,
}

impl NodeRegistry {
    /// Registry knowing the built-in paragraph, heading and divider types
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(PARAGRAPH, construct_paragraph);
        registry.register(HEADING, construct_heading);
        registry.register(DIVIDER, construct_isolated);
        registry
    }

    pub fn empty() -> Self {
        NodeRegistry {
            constructors: HashMap::new(),
        }
    }

    /// Add or replace the constructor for a type id
    pub fn register(&mut self, type_id: impl Into<String>, constructor: NodeConstructor) {
        self.constructors.insert(type_id.into(), constructor);
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.constructors.contains_key(type_id)
    }

    pub fn construct(&self, record: &NodeRecord) -> Result<Node, DocumentError> {
        let constructor = self
            .constructors
            .get(&record.type_id)
            .ok_or_else(|| DocumentError::UnknownNodeType(record.type_id.clone()))?;
        constructor(record)
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn construct_paragraph(record: &NodeRecord) -> Result<Node, DocumentError> {
    Ok(Node::with_state(
        NodeKind::Paragraph,
        NodeState::from_map(record.state.clone()),
    ))
}

fn construct_heading(record: &NodeRecord) -> Result<Node, DocumentError> {
    let level = record
        .field("level")
        .and_then(Value::as_u64)
        .ok_or_else(|| DocumentError::InvalidNode {
            type_id: record.type_id.clone(),
            reason: "missing numeric level".to_string(),
        })?;
    let level = u8::try_from(level).unwrap_or(u8::MAX);
    Ok(Node::with_state(
        NodeKind::heading(level),
        NodeState::from_map(record.state.clone()),
    ))
}

/// Constructor for atomic node types; usable for any registered isolated id
pub fn construct_isolated(record: &NodeRecord) -> Result<Node, DocumentError> {
    Ok(Node::with_state(
        NodeKind::isolated(record.type_id.clone()),
        NodeState::from_map(record.state.clone()),
    ))
}

impl Node {
    /// Persisted form of this node
    pub fn to_record(&self) -> NodeRecord {
        let mut record = NodeRecord::new(self.type_id(), self.state().as_map().clone());
        if let NodeKind::Heading { level } = self.kind() {
            record.fields.insert("level".to_string(), Value::from(*level));
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> NodeRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_construct_builtin_types() {
        let registry = NodeRegistry::new();

        let node = registry
            .construct(&record(json!({"type": "paragraph", "state": {"text": "hi"}})))
            .unwrap();
        assert_eq!(node.text(), "hi");

        let node = registry
            .construct(&record(json!({"type": "heading", "level": 2, "state": {"text": "T"}})))
            .unwrap();
        assert_eq!(node.kind(), &NodeKind::Heading { level: 2 });

        let node = registry.construct(&record(json!({"type": "divider"}))).unwrap();
        assert!(!node.is_text());
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let registry = NodeRegistry::new();
        let err = registry
            .construct(&record(json!({"type": "video", "state": {}})))
            .unwrap_err();
        assert!(matches!(err, DocumentError::UnknownNodeType(ref id) if id == "video"));
    }

    #[test]
    fn test_heading_requires_level() {
        let registry = NodeRegistry::new();
        let err = registry
            .construct(&record(json!({"type": "heading", "state": {"text": "T"}})))
            .unwrap_err();
        assert!(matches!(err, DocumentError::InvalidNode { .. }));
    }

    #[test]
    fn test_custom_isolated_type() {
        let mut registry = NodeRegistry::empty();
        assert!(!registry.contains("image"));
        registry.register("image", construct_isolated);

        let node = registry
            .construct(&record(json!({"type": "image", "state": {"src": "a.png"}})))
            .unwrap();
        assert_eq!(node.type_id(), "image");
        assert_eq!(node.state().get("src"), Some(&json!("a.png")));
    }

    #[test]
    fn test_heading_record_carries_level() {
        let value = serde_json::to_value(Node::heading(3, "T").to_record()).unwrap();
        assert_eq!(
            value,
            json!({"type": "heading", "level": 3, "state": {"text": "T"}})
        );
    }
}
