//! The document: root node, node factory and mutation layer.

use std::fmt;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::buffer::BufferPool;
use crate::chars::is_all_xml_space;
use crate::dtd::{AttlistDef, ContentSpec};
use crate::entity::{EntityTable, XmlString};
use crate::error::{Error, Result};
use crate::node::{ExternalId, Node, NodeData, NodeId, NodeKind, NodeType, QName};
use crate::parser::{ParseOptions, SaxHandlers};
use crate::reader::TextPos;
use crate::symbol::SymbolTable;
use crate::writer::XmlWriter;

/// Distinguishes handles of different documents within one process.
static NEXT_DOC_TOKEN: AtomicU32 = AtomicU32::new(1);

fn names_equal_exact(a: &str, b: &str) -> bool {
    a == b
}

/// Drop-in name comparator for documents treating names case-insensitively.
pub fn names_equal_ignore_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// An XML document: the root of the tree and the factory for every node.
///
/// All nodes live in an arena owned by the document; [`Node`] handles index
/// into it. Dropping the document drops every node it created.
///
/// One document is single-threaded; distinct documents share nothing and
/// may live on different threads.
pub struct Document {
    token: u32,
    nodes: Vec<NodeData>,
    options: ParseOptions,
    entities: EntityTable,
    symbols: SymbolTable,
    pub(crate) buffers: BufferPool,
    default_uri: Rc<str>,
    name_eq: fn(&str, &str) -> bool,
    loading: u32,
}

impl Document {
    pub fn new() -> Document {
        Document::with_options(ParseOptions::default())
    }

    pub fn with_options(options: ParseOptions) -> Document {
        let mut nodes = Vec::with_capacity(64);
        nodes.push(NodeData::new(
            NodeKind::Document,
            QName::new(Rc::from(""), Rc::from("#document")),
        ));

        Document {
            token: NEXT_DOC_TOKEN.fetch_add(1, Ordering::Relaxed),
            nodes,
            options,
            entities: EntityTable::new(),
            symbols: SymbolTable::new(),
            buffers: BufferPool::new(),
            default_uri: Rc::from(""),
            name_eq: names_equal_exact,
            loading: 0,
        }
    }

    /// Parses `text` into a fresh document.
    ///
    /// # Examples
    ///
    /// ```
    /// let doc = domxml::Document::parse("<e/>").unwrap();
    /// assert!(doc.document_element().unwrap().has_name(&doc, "e"));
    /// ```
    pub fn parse(text: &str) -> Result<Document> {
        Document::parse_with_options(text, ParseOptions::default())
    }

    pub fn parse_with_options(text: &str, options: ParseOptions) -> Result<Document> {
        let mut doc = Document::with_options(options);
        doc.load_str(text)?;
        Ok(doc)
    }

    /// Reads and parses a file, resolving a byte-order mark first.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Document> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        log::debug!("loading {} ({} bytes)", path.display(), bytes.len());
        let text = decode_bytes(&bytes)?;
        Document::parse(&text)
    }

    /// Reads all input from `reader`, resolves a byte-order mark and
    /// parses the result into this document.
    pub fn load_reader(&mut self, mut reader: impl std::io::Read) -> Result<()> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let text = decode_bytes(&bytes)?;
        self.load_str(&text)
    }

    /// Parses `text` into this document, replacing its current content.
    pub fn load_str(&mut self, text: &str) -> Result<()> {
        self.load_str_with(text, &mut SaxHandlers::default())
    }

    /// Like [`load_str`](Document::load_str), with per-node callbacks.
    pub fn load_str_with(&mut self, text: &str, sax: &mut SaxHandlers) -> Result<()> {
        self.remove_child_nodes(self.root(), true)?;

        self.loading += 1;
        let result = crate::parser::parse_into(self, text, sax);
        self.loading -= 1;

        if let Err(ref e) = result {
            log::debug!("parse failed: {}", e);
        }
        result
    }

    /// Serializes the document to a file.
    pub fn save_to_file(&self, path: impl AsRef<Path>, pretty: bool) -> Result<()> {
        let file = fs::File::create(path.as_ref())?;
        let mut out = BufWriter::new(file);
        self.write_to(&mut out, pretty)?;
        out.flush()?;
        log::debug!("saved document to {}", path.as_ref().display());
        Ok(())
    }

    /// Serializes the document into `out`.
    pub fn write_to<W: Write>(&self, out: W, pretty: bool) -> Result<()> {
        let mut writer = XmlWriter::new(out, pretty);
        crate::writer::write_node(self, self.root(), &mut writer)
    }

    /// Serializes the document into a string.
    pub fn to_xml_string(&self, pretty: bool) -> Result<String> {
        let mut out = Vec::new();
        self.write_to(&mut out, pretty)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    // ------------------------------------------------------------------
    // Accessors.

    /// The document node itself.
    pub fn root(&self) -> Node {
        Node {
            doc_token: self.token,
            id: NodeId::from_usize(0),
        }
    }

    /// The single element child of the document, once present.
    pub fn document_element(&self) -> Option<Node> {
        self.root_child_of_type(NodeType::Element)
    }

    pub fn declaration(&self) -> Option<Node> {
        self.root_child_of_type(NodeType::Declaration)
    }

    pub fn doctype(&self) -> Option<Node> {
        self.root_child_of_type(NodeType::DocumentType)
    }

    fn root_child_of_type(&self, ty: NodeType) -> Option<Node> {
        let mut curr = self.root().first_child(self);
        while let Some(node) = curr {
            if node.node_type(self) == ty {
                return Some(node);
            }
            curr = node.next_sibling(self);
        }
        None
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: ParseOptions) {
        self.options = options;
    }

    pub fn entities(&self) -> &EntityTable {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut EntityTable {
        &mut self.entities
    }

    /// The namespace URI reported for names with an unreserved prefix.
    pub fn default_uri(&self) -> &str {
        &self.default_uri
    }

    pub fn set_default_uri(&mut self, uri: &str) {
        self.default_uri = Rc::from(uri);
    }

    /// Replaces the name comparator used by name lookups.
    pub fn set_name_comparator(&mut self, compare: fn(&str, &str) -> bool) {
        self.name_eq = compare;
    }

    pub fn names_equal(&self, a: &str, b: &str) -> bool {
        (self.name_eq)(a, b)
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.loading > 0
    }

    /// Whether `node` was created by this document.
    pub fn owns(&self, node: Node) -> bool {
        node.doc_token == self.token
    }

    // ------------------------------------------------------------------
    // Arena plumbing.

    pub(crate) fn data(&self, node: Node) -> &NodeData {
        assert_eq!(
            node.doc_token, self.token,
            "node handle belongs to another document"
        );
        &self.nodes[node.id.get_usize()]
    }

    fn data_mut(&mut self, node: Node) -> &mut NodeData {
        assert_eq!(
            node.doc_token, self.token,
            "node handle belongs to another document"
        );
        &mut self.nodes[node.id.get_usize()]
    }

    pub(crate) fn node_of(&self, id: Option<NodeId>) -> Option<Node> {
        id.map(|id| Node {
            doc_token: self.token,
            id,
        })
    }

    pub(crate) fn revision_of(&self, node: Node) -> u32 {
        self.data(node).revision
    }

    fn bump_revision(&mut self, node: Node) {
        let data = self.data_mut(node);
        data.revision = data.revision.wrapping_add(1);
    }

    fn ensure_same_doc(&self, node: Node) -> Result<()> {
        if node.doc_token != self.token {
            return Err(Error::InvalidOperation("node belongs to another document"));
        }
        Ok(())
    }

    fn intern(&self, s: &str) -> Rc<str> {
        if self.options.use_symbol_table {
            self.symbols.intern(s)
        } else {
            Rc::from(s)
        }
    }

    /// Builds a [`QName`], splitting `full` at the first `:`.
    pub fn qname(&self, full: &str) -> QName {
        match full.split_once(':') {
            Some((prefix, local)) if !prefix.is_empty() && !local.is_empty() => {
                QName::new(self.intern(prefix), self.intern(local))
            }
            _ => QName::new(self.intern(""), self.intern(full)),
        }
    }

    pub(crate) fn qname_parts(&self, prefix: &str, local: &str) -> QName {
        QName::new(self.intern(prefix), self.intern(local))
    }

    fn alloc(&mut self, kind: NodeKind, name: QName) -> Node {
        let id = NodeId::from_usize(self.nodes.len());
        self.nodes.push(NodeData::new(kind, name));
        Node {
            doc_token: self.token,
            id,
        }
    }

    fn sentinel(&self, name: &str) -> QName {
        QName::new(self.intern(""), self.intern(name))
    }

    // ------------------------------------------------------------------
    // Factory. Nodes start out detached.

    pub fn create_element(&mut self, name: &str) -> Node {
        let name = self.qname(name);
        self.alloc(NodeKind::Element, name)
    }

    pub(crate) fn create_element_parts(&mut self, prefix: &str, local: &str) -> Node {
        let name = self.qname_parts(prefix, local);
        self.alloc(NodeKind::Element, name)
    }

    /// Creates a detached attribute with a decoded value.
    pub fn create_attribute(&mut self, name: &str, value: &str) -> Node {
        let name = self.qname(name);
        self.alloc(
            NodeKind::Attribute {
                value: XmlString::decoded(value),
            },
            name,
        )
    }

    pub(crate) fn create_attribute_parts(&mut self, prefix: &str, local: &str, value: XmlString) -> Node {
        let name = self.qname_parts(prefix, local);
        self.alloc(NodeKind::Attribute { value }, name)
    }

    pub fn create_text(&mut self, text: &str) -> Node {
        let name = self.sentinel("#text");
        self.alloc(
            NodeKind::Text {
                value: XmlString::decoded(text),
            },
            name,
        )
    }

    pub(crate) fn create_text_node(&mut self, value: XmlString) -> Node {
        let name = self.sentinel("#text");
        self.alloc(NodeKind::Text { value }, name)
    }

    /// Creates a CDATA section. The content must not contain `]]>`,
    /// which has no representation inside CDATA.
    pub fn create_cdata(&mut self, text: &str) -> Result<Node> {
        if text.contains("]]>") {
            return Err(Error::InvalidOperation("CDATA content contains ']]>'"));
        }

        let name = self.sentinel("#cdata-section");
        Ok(self.alloc(
            NodeKind::CData {
                value: XmlString::raw(text),
            },
            name,
        ))
    }

    pub fn create_comment(&mut self, text: &str) -> Node {
        let name = self.sentinel("#comment");
        self.alloc(
            NodeKind::Comment {
                value: XmlString::raw(text),
            },
            name,
        )
    }

    pub fn create_processing_instruction(&mut self, target: &str, content: &str) -> Node {
        let name = self.qname(target);
        self.alloc(
            NodeKind::ProcessingInstruction {
                value: XmlString::raw(content),
            },
            name,
        )
    }

    /// Creates a whitespace node; every character must be XML whitespace.
    pub fn create_whitespace(&mut self, text: &str) -> Result<Node> {
        if !is_all_xml_space(text) {
            return Err(Error::NotAllWhitespace);
        }

        let name = self.sentinel("#whitespace");
        Ok(self.alloc(
            NodeKind::Whitespace {
                value: XmlString::raw(text),
            },
            name,
        ))
    }

    pub fn create_significant_whitespace(&mut self, text: &str) -> Result<Node> {
        if !is_all_xml_space(text) {
            return Err(Error::NotAllWhitespace);
        }

        let name = self.sentinel("#significant-whitespace");
        Ok(self.alloc(
            NodeKind::SignificantWhitespace {
                value: XmlString::raw(text),
            },
            name,
        ))
    }

    /// Creates an `<?xml …?>` declaration.
    ///
    /// `version` must match the version-number grammar and `standalone`,
    /// when given, must be `yes` or `no`.
    pub fn create_declaration(
        &mut self,
        version: &str,
        encoding: Option<&str>,
        standalone: Option<&str>,
    ) -> Result<Node> {
        let pos = TextPos::new(1, 1);
        check_version(version, pos)?;
        if let Some(standalone) = standalone {
            check_standalone(standalone, pos)?;
        }

        let name = self.sentinel("xml");
        let decl = self.alloc(NodeKind::Declaration, name);

        let version = self.create_attribute("version", version);
        self.append_attribute(decl, version)?;
        if let Some(encoding) = encoding {
            let encoding = self.create_attribute("encoding", encoding);
            self.append_attribute(decl, encoding)?;
        }
        if let Some(standalone) = standalone {
            let standalone = self.create_attribute("standalone", standalone);
            self.append_attribute(decl, standalone)?;
        }

        Ok(decl)
    }

    pub fn create_document_type(&mut self, name: &str, external_id: ExternalId) -> Node {
        let name = self.qname(name);
        self.alloc(NodeKind::DocumentType { external_id }, name)
    }

    /// Creates an internal general entity and registers it for decoding.
    pub fn create_entity(&mut self, name: &str, value: &str) -> Node {
        self.entities.insert(name, value);
        let qname = self.qname(name);
        self.alloc(
            NodeKind::Entity {
                parameter: false,
                value: Some(XmlString::raw(value)),
                external_id: ExternalId::None,
                ndata: None,
            },
            qname,
        )
    }

    /// Creates an entity node in full generality (parameter entities,
    /// external identifiers, unparsed NDATA entities).
    pub fn create_entity_full(
        &mut self,
        name: &str,
        parameter: bool,
        value: Option<&str>,
        external_id: ExternalId,
        ndata: Option<&str>,
    ) -> Node {
        if let (false, Some(value)) = (parameter, value) {
            self.entities.insert(name, value);
        }

        let qname = self.qname(name);
        self.alloc(
            NodeKind::Entity {
                parameter,
                value: value.map(XmlString::raw),
                external_id,
                ndata: ndata.map(str::to_string),
            },
            qname,
        )
    }

    pub fn create_entity_reference(&mut self, name: &str) -> Node {
        let name = self.qname(name);
        self.alloc(NodeKind::EntityReference, name)
    }

    pub fn create_notation(&mut self, name: &str, external_id: ExternalId) -> Node {
        let name = self.qname(name);
        self.alloc(NodeKind::Notation { external_id }, name)
    }

    pub fn create_attribute_list_decl(&mut self, element_name: &str, defs: Vec<AttlistDef>) -> Node {
        let name = self.qname(element_name);
        self.alloc(NodeKind::AttributeListDecl { defs }, name)
    }

    pub fn create_element_decl(&mut self, name: &str, content: ContentSpec) -> Node {
        let name = self.qname(name);
        self.alloc(NodeKind::ElementDecl { content }, name)
    }

    pub fn create_document_fragment(&mut self) -> Node {
        let name = self.sentinel("#document-fragment");
        self.alloc(NodeKind::DocumentFragment, name)
    }

    // ------------------------------------------------------------------
    // Mutation. Every path funnels through the checks here.

    pub(crate) fn append_child(&mut self, parent: Node, child: Node) -> Result<()> {
        self.insert_child(parent, child, InsertAt::End)
    }

    pub(crate) fn insert_child_before(&mut self, parent: Node, new: Node, reference: Node) -> Result<()> {
        self.ensure_same_doc(reference)?;
        if self.data(reference).parent != Some(parent.id) {
            return Err(Error::InvalidOperation(
                "reference node is not a child of this node",
            ));
        }
        self.insert_child(parent, new, InsertAt::Before(reference))
    }

    pub(crate) fn insert_child_after(&mut self, parent: Node, new: Node, reference: Node) -> Result<()> {
        self.ensure_same_doc(reference)?;
        if self.data(reference).parent != Some(parent.id) {
            return Err(Error::InvalidOperation(
                "reference node is not a child of this node",
            ));
        }
        match reference.next_sibling(self) {
            Some(next) => self.insert_child(parent, new, InsertAt::Before(next)),
            None => self.insert_child(parent, new, InsertAt::End),
        }
    }

    fn insert_child(&mut self, parent: Node, child: Node, at: InsertAt) -> Result<()> {
        self.ensure_same_doc(parent)?;
        self.ensure_same_doc(child)?;

        // A fragment donates its children instead of moving itself.
        if child.node_type(self) == NodeType::DocumentFragment {
            let mut moved = Vec::new();
            let mut curr = child.first_child(self);
            while let Some(node) = curr {
                moved.push(node);
                curr = node.next_sibling(self);
            }
            for node in moved {
                self.insert_child(parent, node, at)?;
            }
            return Ok(());
        }

        self.check_insertion(parent, child, at)?;

        self.detach(child);
        self.link_child(parent, child, at);
        Ok(())
    }

    fn check_insertion(&self, parent: Node, child: Node, at: InsertAt) -> Result<()> {
        let parent_type = parent.node_type(self);
        let child_type = child.node_type(self);

        if !parent_type.allows_children() {
            return Err(Error::InvalidOperation("node cannot hold child nodes"));
        }

        if !parent_type.accepts_child(child_type) {
            return Err(Error::InvalidOperation(
                "child of this type is not permitted here",
            ));
        }

        if child == parent || child.is_ancestor_of(self, parent) {
            return Err(Error::InvalidOperation(
                "node cannot become a descendant of itself",
            ));
        }

        if let InsertAt::Before(reference) = at {
            if reference == child {
                return Err(Error::InvalidOperation(
                    "node cannot be inserted next to itself",
                ));
            }
        }

        // The document holds at most one declaration, doctype and element.
        if parent_type == NodeType::Document {
            let existing = match child_type {
                NodeType::Declaration => self.declaration(),
                NodeType::DocumentType => self.doctype(),
                NodeType::Element => self.document_element(),
                _ => None,
            };
            if let Some(existing) = existing {
                if existing != child {
                    return Err(Error::InvalidOperation(
                        "document already has a child of this type",
                    ));
                }
            }
        }

        Ok(())
    }

    fn link_child(&mut self, parent: Node, child: Node, at: InsertAt) {
        match at {
            InsertAt::End => {
                let last = self.data(parent).last_child;
                self.data_mut(child).prev_sibling = last;
                self.data_mut(child).next_sibling = None;
                match last {
                    Some(last) => self.nodes[last.get_usize()].next_sibling = Some(child.id),
                    None => self.data_mut(parent).first_child = Some(child.id),
                }
                self.data_mut(parent).last_child = Some(child.id);
            }
            InsertAt::Before(reference) => {
                let prev = self.data(reference).prev_sibling;
                self.data_mut(child).prev_sibling = prev;
                self.data_mut(child).next_sibling = Some(reference.id);
                self.data_mut(reference).prev_sibling = Some(child.id);
                match prev {
                    Some(prev) => self.nodes[prev.get_usize()].next_sibling = Some(child.id),
                    None => self.data_mut(parent).first_child = Some(child.id),
                }
            }
        }

        self.data_mut(child).parent = Some(parent.id);
        self.bump_revision(parent);
    }

    pub(crate) fn append_attribute(&mut self, parent: Node, attr: Node) -> Result<()> {
        self.ensure_same_doc(parent)?;
        self.ensure_same_doc(attr)?;

        if !parent.node_type(self).allows_attributes() {
            return Err(Error::InvalidOperation("node cannot hold attributes"));
        }

        if attr.node_type(self) != NodeType::Attribute {
            return Err(Error::InvalidOperation("node is not an attribute"));
        }

        // Uniqueness is waived only while loading without `validate`.
        if !(self.is_loading() && !self.options.validate) {
            let name = attr.full_name(self).into_owned();
            if let Some(existing) = parent.find_attribute(self, &name) {
                if existing != attr {
                    return Err(Error::InvalidOperation(
                        "attribute with this name already present",
                    ));
                }
            }
        }

        self.detach(attr);

        let last = self.data(parent).last_attr;
        self.data_mut(attr).prev_sibling = last;
        self.data_mut(attr).next_sibling = None;
        match last {
            Some(last) => self.nodes[last.get_usize()].next_sibling = Some(attr.id),
            None => self.data_mut(parent).first_attr = Some(attr.id),
        }
        self.data_mut(parent).last_attr = Some(attr.id);
        self.data_mut(attr).parent = Some(parent.id);
        self.bump_revision(parent);
        Ok(())
    }

    pub(crate) fn ensure_attribute(&mut self, parent: Node, name: &str) -> Result<Node> {
        if let Some(existing) = parent.find_attribute(self, name) {
            return Ok(existing);
        }

        let attr = self.create_attribute(name, "");
        self.append_attribute(parent, attr)?;
        Ok(attr)
    }

    pub(crate) fn remove_child(&mut self, parent: Node, child: Node) -> Result<()> {
        self.ensure_same_doc(parent)?;
        self.ensure_same_doc(child)?;

        if self.data(child).parent != Some(parent.id) || child.is_attribute(self) {
            return Err(Error::InvalidOperation("node is not a child of this node"));
        }

        self.detach(child);
        Ok(())
    }

    pub(crate) fn remove_child_nodes(&mut self, parent: Node, deep: bool) -> Result<()> {
        self.ensure_same_doc(parent)?;

        while let Some(child) = parent.first_child(self) {
            self.detach(child);
            if deep {
                self.remove_child_nodes(child, true)?;
                self.remove_attributes(child)?;
            }
        }
        Ok(())
    }

    pub(crate) fn remove_attribute(&mut self, parent: Node, attr: Node) -> Result<()> {
        self.ensure_same_doc(parent)?;
        self.ensure_same_doc(attr)?;

        if self.data(attr).parent != Some(parent.id) || !attr.is_attribute(self) {
            return Err(Error::InvalidOperation(
                "attribute does not belong to this node",
            ));
        }

        self.detach(attr);
        Ok(())
    }

    pub(crate) fn remove_attributes(&mut self, parent: Node) -> Result<()> {
        self.ensure_same_doc(parent)?;

        while let Some(attr) = parent.first_attribute(self) {
            self.detach(attr);
        }
        Ok(())
    }

    pub(crate) fn replace_child(&mut self, parent: Node, new: Node, old: Node) -> Result<()> {
        self.ensure_same_doc(new)?;
        self.ensure_same_doc(old)?;

        if self.data(old).parent != Some(parent.id) {
            return Err(Error::InvalidOperation("node is not a child of this node"));
        }

        let anchor = old.next_sibling(self);
        self.remove_child(parent, old)?;
        match anchor {
            Some(anchor) => self.insert_child_before(parent, new, anchor),
            None => self.append_child(parent, new),
        }
    }

    /// Detaches `node` from whatever list it sits in. A no-op when the
    /// node is already detached.
    pub(crate) fn detach_any(&mut self, node: Node) -> Result<()> {
        self.ensure_same_doc(node)?;
        self.detach(node);
        Ok(())
    }

    fn detach(&mut self, node: Node) {
        let parent = match self.node_of(self.data(node).parent) {
            Some(parent) => parent,
            None => return,
        };

        let is_attr = node.is_attribute(self);
        let prev = self.data(node).prev_sibling;
        let next = self.data(node).next_sibling;

        match prev {
            Some(prev) => self.nodes[prev.get_usize()].next_sibling = next,
            None => {
                if is_attr {
                    self.data_mut(parent).first_attr = next;
                } else {
                    self.data_mut(parent).first_child = next;
                }
            }
        }

        match next {
            Some(next) => self.nodes[next.get_usize()].prev_sibling = prev,
            None => {
                if is_attr {
                    self.data_mut(parent).last_attr = prev;
                } else {
                    self.data_mut(parent).last_child = prev;
                }
            }
        }

        let data = self.data_mut(node);
        data.parent = None;
        data.prev_sibling = None;
        data.next_sibling = None;

        self.bump_revision(parent);
    }

    pub(crate) fn set_node_value(&mut self, node: Node, value: XmlString) -> Result<()> {
        self.ensure_same_doc(node)?;

        match node.node_type(self) {
            NodeType::CData if value.as_str().contains("]]>") => {
                return Err(Error::InvalidOperation("CDATA content contains ']]>'"));
            }
            NodeType::Whitespace | NodeType::SignificantWhitespace
                if !is_all_xml_space(value.as_str()) =>
            {
                return Err(Error::NotAllWhitespace);
            }
            _ => {}
        }

        match &mut self.data_mut(node).kind {
            NodeKind::Attribute { value: slot }
            | NodeKind::Text { value: slot }
            | NodeKind::CData { value: slot }
            | NodeKind::Comment { value: slot }
            | NodeKind::ProcessingInstruction { value: slot }
            | NodeKind::Whitespace { value: slot }
            | NodeKind::SignificantWhitespace { value: slot } => {
                *slot = value;
                Ok(())
            }
            NodeKind::Entity { value: slot, .. } => {
                *slot = Some(value);
                Ok(())
            }
            _ => Err(Error::InvalidOperation("node does not hold a value")),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Document::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("entities", &self.entities.len())
            .finish()
    }
}

/// Where `insert_child` places the node.
#[derive(Clone, Copy)]
enum InsertAt {
    End,
    Before(Node),
}

pub(crate) fn check_version(version: &str, pos: TextPos) -> Result<()> {
    let well_formed = version.chars().all(crate::chars::is_version_char)
        && matches!(version.strip_prefix("1."), Some(minor)
            if !minor.is_empty() && minor.bytes().all(|b| b.is_ascii_digit()));

    if !well_formed {
        return Err(Error::InvalidVersion {
            value: version.to_string(),
            pos,
        });
    }
    Ok(())
}

pub(crate) fn check_standalone(standalone: &str, pos: TextPos) -> Result<()> {
    if standalone != "yes" && standalone != "no" {
        return Err(Error::InvalidStandalone {
            value: standalone.to_string(),
            pos,
        });
    }
    Ok(())
}

/// Decodes raw file bytes, resolving a leading byte-order mark.
///
/// Recognized, in order: UTF-8, UTF-32BE, UTF-32LE, UTF-16BE, UTF-16LE;
/// anything else is treated as raw UTF-8.
fn decode_bytes(bytes: &[u8]) -> Result<String> {
    fn bad_input(what: &str) -> Error {
        Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, what.to_string()))
    }

    fn decode_utf16(bytes: &[u8], encoding: &'static encoding_rs::Encoding) -> Result<String> {
        let (text, _, had_errors) = encoding.decode(bytes);
        if had_errors {
            return Err(bad_input("malformed UTF-16 input"));
        }
        Ok(text.into_owned())
    }

    fn decode_utf32(bytes: &[u8], big_endian: bool) -> Result<String> {
        let body = &bytes[4..];
        if body.len() % 4 != 0 {
            return Err(bad_input("truncated UTF-32 input"));
        }

        let mut text = String::with_capacity(body.len() / 4);
        for unit in body.chunks_exact(4) {
            let code = if big_endian {
                u32::from_be_bytes([unit[0], unit[1], unit[2], unit[3]])
            } else {
                u32::from_le_bytes([unit[0], unit[1], unit[2], unit[3]])
            };
            match char::from_u32(code) {
                Some(c) => text.push(c),
                None => return Err(bad_input("malformed UTF-32 input")),
            }
        }
        Ok(text)
    }

    match bytes {
        [0xEF, 0xBB, 0xBF, rest @ ..] => {
            String::from_utf8(rest.to_vec()).map_err(|_| bad_input("malformed UTF-8 input"))
        }
        [0x00, 0x00, 0xFE, 0xFF, ..] => decode_utf32(bytes, true),
        [0xFF, 0xFE, 0x00, 0x00, ..] => decode_utf32(bytes, false),
        [0xFE, 0xFF, ..] => decode_utf16(bytes, encoding_rs::UTF_16BE),
        [0xFF, 0xFE, ..] => decode_utf16(bytes, encoding_rs::UTF_16LE),
        _ => String::from_utf8(bytes.to_vec()).map_err(|_| bad_input("malformed UTF-8 input")),
    }
}
