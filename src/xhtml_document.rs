use std::borrow::Cow;
use std::io::Cursor;

use anyhow::{Context, Result, anyhow};
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::name::QName;

use crate::errors::SyncError;

// @module: Arena-backed content document model and XML round-tripping

/// Where a text run is attached in reading order.
///
/// Both shapes funnel through the same splicing routine; the variant only
/// decides where leftover whitespace before the first token is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunSlot {
    /// The run is an element's leading text, before any child
    LeadingOf(usize),
    /// The run trails a sibling node, after its end tag
    TrailingOf(usize),
}

/// A maximal contiguous run of character data and its attachment point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    // @field: Attachment point in the tree
    pub slot: RunSlot,

    // @field: Character data in serialized (escaped) form
    pub text: String,
}

/// Node payload variants
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// An element with its qualified name and raw attribute list
    Element {
        /// Qualified tag name as written in the source
        name: String,
        /// Attributes in source order, values in serialized form
        attrs: Vec<(String, String)>,
        /// Whether the source used a self-closing tag
        self_closing: bool,
    },
    /// A comment, content verbatim
    Comment(String),
    /// A processing instruction, content verbatim
    Pi(String),
}

/// One node of the arena.
///
/// Children and parent are arena indices rather than references, so splicing
/// new nodes during tokenization is a plain index-array insert with no
/// aliasing hazards. `text` is the element's leading character data (before
/// any child); `tail` is the character data following this node's end tag.
/// All character data is stored in its serialized form - entity references
/// are never resolved - and written back verbatim.
#[derive(Debug, Clone)]
pub struct Node {
    /// Payload
    pub kind: NodeKind,
    /// Leading character data, elements only
    pub text: Option<String>,
    /// Trailing character data owned by this node
    pub tail: Option<String>,
    /// Ordered child indices
    pub children: Vec<usize>,
    /// Parent index, None for top-level nodes
    pub parent: Option<usize>,
}

/// One reflowable content document of the book
#[derive(Debug, Clone)]
pub struct XhtmlDocument {
    // @field: File stem, also the document identifier
    pub stem: String,

    // @field: Page number inferred from the stem, None when unnumbered
    pub page_number: Option<u64>,

    nodes: Vec<Node>,
    roots: Vec<usize>,
    doctype: Option<String>,
}

impl XhtmlDocument {
    /// Parse an XHTML document into the arena model.
    ///
    /// Entity references are kept unresolved (the serialized form is stored
    /// as-is), matching a parser with external entity resolution disabled.
    pub fn parse(stem: &str, page_number: Option<u64>, source: &str) -> Result<Self> {
        let mut reader = Reader::from_str(source);
        reader.config_mut().trim_text(false);

        let mut nodes: Vec<Node> = Vec::new();
        let mut roots: Vec<usize> = Vec::new();
        let mut stack: Vec<usize> = Vec::new();
        let mut doctype: Option<String> = None;
        let mut pending = String::new();

        loop {
            let event = reader
                .read_event()
                .with_context(|| format!("Malformed XML in content document '{}'", stem))?;

            match event {
                Event::Start(e) => {
                    Self::flush_text(&mut pending, &mut nodes, &stack, &roots);
                    let idx = Self::push_node(
                        &mut nodes,
                        &mut roots,
                        &stack,
                        Self::element_from_start(&e, false)?,
                    );
                    stack.push(idx);
                }
                Event::Empty(e) => {
                    Self::flush_text(&mut pending, &mut nodes, &stack, &roots);
                    Self::push_node(
                        &mut nodes,
                        &mut roots,
                        &stack,
                        Self::element_from_start(&e, true)?,
                    );
                }
                Event::End(_) => {
                    Self::flush_text(&mut pending, &mut nodes, &stack, &roots);
                    stack
                        .pop()
                        .ok_or_else(|| anyhow!("Unbalanced end tag in '{}'", stem))?;
                }
                Event::Text(e) => {
                    pending.push_str(std::str::from_utf8(e.as_ref())?);
                }
                Event::GeneralRef(e) => {
                    // Keep the reference in its serialized form
                    pending.push('&');
                    pending.push_str(std::str::from_utf8(e.as_ref())?);
                    pending.push(';');
                }
                Event::CData(e) => {
                    let escaped = e.escape()?;
                    pending.push_str(std::str::from_utf8(escaped.as_ref())?);
                }
                Event::Comment(e) => {
                    Self::flush_text(&mut pending, &mut nodes, &stack, &roots);
                    Self::push_node(
                        &mut nodes,
                        &mut roots,
                        &stack,
                        NodeKind::Comment(String::from_utf8_lossy(e.as_ref()).into_owned()),
                    );
                }
                Event::PI(e) => {
                    Self::flush_text(&mut pending, &mut nodes, &stack, &roots);
                    Self::push_node(
                        &mut nodes,
                        &mut roots,
                        &stack,
                        NodeKind::Pi(String::from_utf8_lossy(e.as_ref()).into_owned()),
                    );
                }
                Event::DocType(e) => {
                    doctype = Some(String::from_utf8_lossy(e.as_ref()).into_owned());
                }
                Event::Decl(_) => {
                    // Re-emitted in canonical utf-8 standalone form on write
                }
                Event::Eof => {
                    Self::flush_text(&mut pending, &mut nodes, &stack, &roots);
                    break;
                }
            }
        }

        if !stack.is_empty() {
            return Err(anyhow!("Unclosed element in content document '{}'", stem));
        }

        Ok(XhtmlDocument {
            stem: stem.to_string(),
            page_number,
            nodes,
            roots,
            doctype,
        })
    }

    /// Build an element node from a start tag, keeping attribute values raw
    fn element_from_start(start: &BytesStart, self_closing: bool) -> Result<NodeKind> {
        let name = String::from_utf8(start.name().as_ref().to_vec())?;
        let mut attrs = Vec::new();
        for attr in start.attributes().with_checks(false) {
            let attr = attr.context("Malformed attribute")?;
            attrs.push((
                String::from_utf8(attr.key.as_ref().to_vec())?,
                String::from_utf8(attr.value.into_owned())?,
            ));
        }
        Ok(NodeKind::Element { name, attrs, self_closing })
    }

    /// Append a node to the arena and attach it under the innermost open
    /// element (or as a top-level node)
    fn push_node(
        nodes: &mut Vec<Node>,
        roots: &mut Vec<usize>,
        stack: &[usize],
        kind: NodeKind,
    ) -> usize {
        let idx = nodes.len();
        let parent = stack.last().copied();
        nodes.push(Node {
            kind,
            text: None,
            tail: None,
            children: Vec::new(),
            parent,
        });
        match parent {
            Some(p) => nodes[p].children.push(idx),
            None => roots.push(idx),
        }
        idx
    }

    /// Attach accumulated character data at the current reading position:
    /// the last closed sibling's tail, or the open element's leading text
    fn flush_text(pending: &mut String, nodes: &mut [Node], stack: &[usize], roots: &[usize]) {
        if pending.is_empty() {
            return;
        }
        let text = std::mem::take(pending);

        let target = match stack.last() {
            Some(&parent) => match nodes[parent].children.last() {
                Some(&last_child) => &mut nodes[last_child].tail,
                None => &mut nodes[parent].text,
            },
            // Inter-node whitespace at the top level; anything before the
            // first node is dropped, as a serializer re-synthesizes it
            None => match roots.last() {
                Some(&last_root) => &mut nodes[last_root].tail,
                None => return,
            },
        };
        match target {
            Some(existing) => existing.push_str(&text),
            None => *target = Some(text),
        }
    }

    /// Serialize back to XML with a canonical declaration, the preserved
    /// doctype, and all character data byte-for-byte as stored
    pub fn to_xml_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        let mut writer = Writer::new(Cursor::new(&mut buffer));

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), Some("yes"))))?;
        writer.write_event(Event::Text(BytesText::from_escaped("\n")))?;
        if let Some(doctype) = &self.doctype {
            writer.write_event(Event::DocType(BytesText::from_escaped(doctype.as_str())))?;
            writer.write_event(Event::Text(BytesText::from_escaped("\n")))?;
        }
        for &root in &self.roots {
            self.write_node(&mut writer, root)?;
        }

        String::from_utf8(buffer).context("Serialized document is not valid UTF-8")
    }

    fn write_node<W: std::io::Write>(&self, writer: &mut Writer<W>, idx: usize) -> Result<()> {
        let node = &self.nodes[idx];
        match &node.kind {
            NodeKind::Element { name, attrs, self_closing } => {
                let mut start = BytesStart::new(name.as_str());
                for (key, value) in attrs {
                    start.push_attribute(Attribute {
                        key: QName(key.as_bytes()),
                        value: Cow::Borrowed(value.as_bytes()),
                    });
                }
                if node.children.is_empty() && node.text.is_none() && *self_closing {
                    writer.write_event(Event::Empty(start))?;
                } else {
                    writer.write_event(Event::Start(start))?;
                    if let Some(text) = &node.text {
                        writer.write_event(Event::Text(BytesText::from_escaped(text.as_str())))?;
                    }
                    for &child in &node.children {
                        self.write_node(writer, child)?;
                    }
                    writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
                }
            }
            NodeKind::Comment(content) => {
                writer.write_event(Event::Comment(BytesText::from_escaped(content.as_str())))?;
            }
            NodeKind::Pi(content) => {
                writer.write_event(Event::PI(BytesPI::new(content.as_str())))?;
            }
        }
        if let Some(tail) = &node.tail {
            writer.write_event(Event::Text(BytesText::from_escaped(tail.as_str())))?;
        }
        Ok(())
    }

    /// Find the `body` element (by local name), in document order
    pub fn find_body(&self) -> Option<usize> {
        fn search(doc: &XhtmlDocument, idx: usize) -> Option<usize> {
            if let NodeKind::Element { name, .. } = &doc.nodes[idx].kind {
                if local_name(name) == "body" {
                    return Some(idx);
                }
                for &child in &doc.nodes[idx].children {
                    if let Some(found) = search(doc, child) {
                        return Some(found);
                    }
                }
            }
            None
        }
        self.roots.iter().find_map(|&root| search(self, root))
    }

    /// Enumerate every text run under `body` in reading order.
    ///
    /// An element's leading text comes before the runs of its subtree; a
    /// node's trailing text comes after its subtree and before its next
    /// sibling. Fails with a tree invariant violation when the document has
    /// no body element.
    pub fn body_text_runs(&self) -> Result<Vec<TextRun>, SyncError> {
        let body = self.find_body().ok_or_else(|| SyncError::TreeInvariant {
            stem: self.stem.clone(),
            message: "content document has no body element".to_string(),
        })?;

        let mut runs = Vec::new();
        self.collect_runs(body, &mut runs);
        Ok(runs)
    }

    fn collect_runs(&self, idx: usize, runs: &mut Vec<TextRun>) {
        if let Some(text) = &self.nodes[idx].text {
            runs.push(TextRun {
                slot: RunSlot::LeadingOf(idx),
                text: text.clone(),
            });
        }
        for &child in &self.nodes[idx].children {
            if matches!(self.nodes[child].kind, NodeKind::Element { .. }) {
                self.collect_runs(child, runs);
            }
            if let Some(tail) = &self.nodes[child].tail {
                runs.push(TextRun {
                    slot: RunSlot::TrailingOf(child),
                    text: tail.clone(),
                });
            }
        }
    }

    /// Create a detached word span (`<span id="w{id}">`) in the arena
    pub fn new_word_span(&mut self, word_id: usize, text: &str, tail: Option<String>) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(Node {
            kind: NodeKind::Element {
                name: "span".to_string(),
                attrs: vec![("id".to_string(), format!("w{word_id}"))],
                self_closing: false,
            },
            text: Some(text.to_string()),
            tail,
            children: Vec::new(),
            parent: None,
        });
        idx
    }

    /// Insert a detached node as the first child of an element
    pub fn insert_first_child(&mut self, parent: usize, child: usize) {
        self.nodes[parent].children.insert(0, child);
        self.nodes[child].parent = Some(parent);
    }

    /// Insert a detached node as the next sibling of an existing node
    pub fn insert_after(&mut self, sibling: usize, node: usize) -> Result<(), SyncError> {
        let parent = self.nodes[sibling].parent.ok_or_else(|| SyncError::TreeInvariant {
            stem: self.stem.clone(),
            message: "text run trails a node with no parent element".to_string(),
        })?;
        let position = self.nodes[parent]
            .children
            .iter()
            .position(|&c| c == sibling)
            .ok_or_else(|| SyncError::TreeInvariant {
                stem: self.stem.clone(),
                message: "node is not among its parent's children".to_string(),
            })?;
        self.nodes[parent].children.insert(position + 1, node);
        self.nodes[node].parent = Some(parent);
        Ok(())
    }

    /// Replace an element's leading text
    pub fn set_text(&mut self, idx: usize, text: Option<String>) {
        self.nodes[idx].text = text;
    }

    /// Replace a node's trailing text
    pub fn set_tail(&mut self, idx: usize, tail: Option<String>) {
        self.nodes[idx].tail = tail;
    }

    /// Borrow a node by arena index
    pub fn node(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    /// Number of nodes currently in the arena
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Local part of a possibly prefixed tag name
fn local_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}
