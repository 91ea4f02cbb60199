// Markdown Converter
// Converts between Document and Markdown text. Inline markup is flattened to
// plain text on import.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

use super::document::Document;
use super::node::{DIVIDER, Node, NodeKind, NodeState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Owner {
    Heading,
    Paragraph,
    Item,
    Code,
}

/// Text block being collected from parser events
struct OpenBlock {
    kind: NodeKind,
    owner: Owner,
    text: String,
}

impl OpenBlock {
    fn new(kind: NodeKind, owner: Owner) -> Self {
        OpenBlock {
            kind,
            owner,
            text: String::new(),
        }
    }

    fn finish(self) -> Node {
        let text = match self.owner {
            Owner::Code => self.text.trim_end_matches('\n').to_string(),
            _ => self.text.trim().to_string(),
        };
        Node::with_state(self.kind, NodeState::with_text(text))
    }
}

/// Convert markdown text to a Document
pub fn markdown_to_document(markdown: &str) -> Document {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut nodes = Vec::new();
    let mut open: Option<OpenBlock> = None;

    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(tag) => {
                let started = match tag {
                    Tag::Heading { level, .. } => {
                        Some((NodeKind::heading(level as u8), Owner::Heading))
                    }
                    Tag::Paragraph => Some((NodeKind::Paragraph, Owner::Paragraph)),
                    Tag::Item => Some((NodeKind::Paragraph, Owner::Item)),
                    Tag::CodeBlock(_) => Some((NodeKind::Paragraph, Owner::Code)),
                    _ => None,
                };
                let Some((kind, owner)) = started else {
                    continue;
                };
                // A paragraph inside a list item belongs to the item
                if owner == Owner::Paragraph && open.is_some() {
                    continue;
                }
                // Nested list items each get their own node
                if let Some(block) = open.take() {
                    nodes.push(block.finish());
                }
                open = Some(OpenBlock::new(kind, owner));
            }
            Event::End(tag_end) => {
                let owner = match tag_end {
                    TagEnd::Heading(_) => Owner::Heading,
                    TagEnd::Paragraph => Owner::Paragraph,
                    TagEnd::Item => Owner::Item,
                    TagEnd::CodeBlock => Owner::Code,
                    _ => continue,
                };
                if let Some(block) = open.take_if(|block| block.owner == owner) {
                    nodes.push(block.finish());
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(block) = open.as_mut() {
                    block.text.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(block) = open.as_mut() {
                    block.text.push(' ');
                }
            }
            Event::Rule => {
                if let Some(block) = open.take() {
                    nodes.push(block.finish());
                }
                nodes.push(Node::isolated(DIVIDER));
            }
            _ => {}
        }
    }

    if let Some(block) = open.take() {
        nodes.push(block.finish());
    }

    Document::new(nodes)
}

/// Convert a Document to markdown text
pub fn document_to_markdown(doc: &Document) -> String {
    let mut blocks = Vec::new();

    for node in doc.nodes() {
        match node.kind() {
            NodeKind::Paragraph => {
                if !node.is_empty() {
                    blocks.push(node.text().to_string());
                }
            }
            NodeKind::Heading { level } => {
                blocks.push(format!("{} {}", "#".repeat(*level as usize), node.text()));
            }
            NodeKind::Isolated { type_id } if type_id == DIVIDER => {
                blocks.push("---".to_string());
            }
            // Other atomic nodes have no markdown form
            NodeKind::Isolated { .. } => {}
        }
    }

    blocks.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(doc: &Document) -> Vec<String> {
        doc.nodes()
            .iter()
            .map(|node| format!("{} {:?}", node.kind(), node.text()))
            .collect()
    }

    #[test]
    fn test_import_blocks() {
        let doc = markdown_to_document("# Title\n\nSome *emphasised* text\nacross lines.\n\n---\n\nEnd");
        assert_eq!(
            summary(&doc),
            vec![
                "heading(1) \"Title\"",
                "paragraph \"Some emphasised text across lines.\"",
                "divider \"\"",
                "paragraph \"End\"",
            ]
        );
        assert_eq!(doc.title(), Some("Title"));
    }

    #[test]
    fn test_import_lists_and_code() {
        let doc = markdown_to_document("- one\n- two\n  - nested\n\n```\nlet x = 1;\n```\n");
        assert_eq!(
            summary(&doc),
            vec![
                "paragraph \"one\"",
                "paragraph \"two\"",
                "paragraph \"nested\"",
                "paragraph \"let x = 1;\"",
            ]
        );
    }

    #[test]
    fn test_import_empty_markdown() {
        let doc = markdown_to_document("");
        assert_eq!(doc.nodes().len(), 1);
        assert_eq!(doc.nodes()[0].text(), "");
    }

    #[test]
    fn test_export() {
        let doc = Document::new(vec![
            Node::heading(2, "Section"),
            Node::paragraph("Body"),
            Node::paragraph(""),
            Node::isolated(DIVIDER),
            Node::isolated("image"),
            Node::paragraph("Tail"),
        ]);
        assert_eq!(
            document_to_markdown(&doc),
            "## Section\n\nBody\n\n---\n\nTail"
        );
    }

    #[test]
    fn test_markdown_round_trip() {
        let markdown = "# Title\n\nFirst paragraph\n\n---\n\nSecond paragraph";
        let doc = markdown_to_document(markdown);
        assert_eq!(document_to_markdown(&doc), markdown);
    }
}
