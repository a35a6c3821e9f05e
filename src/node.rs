//! Typed node variants and the navigation/query surface.

use std::borrow::Cow;
use std::io::Write;
use std::rc::Rc;

use crate::document::Document;
use crate::dtd::{AttlistDef, ContentSpec};
use crate::entity::XmlString;
use crate::error::Result;
use crate::list::NodeList;
use crate::writer::XmlWriter;
use crate::{NS_XMLNS_URI, NS_XML_URI};

/// Index into the document's node arena.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct NodeId(u32);

impl NodeId {
    #[inline]
    pub(crate) fn from_usize(n: usize) -> Self {
        NodeId(n as u32)
    }

    #[inline]
    pub(crate) fn get_usize(self) -> usize {
        self.0 as usize
    }
}

/// List of supported node types.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NodeType {
    Document,
    Declaration,
    DocumentType,
    Element,
    Attribute,
    Text,
    CData,
    Comment,
    ProcessingInstruction,
    Whitespace,
    SignificantWhitespace,
    Entity,
    EntityReference,
    Notation,
    AttributeListDecl,
    ElementDecl,
    DocumentFragment,
}

impl NodeType {
    /// Whether nodes of this type may hold attributes.
    pub fn allows_attributes(self) -> bool {
        matches!(self, NodeType::Element | NodeType::Declaration)
    }

    /// Whether nodes of this type may hold children.
    pub fn allows_children(self) -> bool {
        matches!(
            self,
            NodeType::Document
                | NodeType::DocumentType
                | NodeType::Element
                | NodeType::DocumentFragment
        )
    }

    /// Whether a node of type `child` may be appended under this type.
    pub fn accepts_child(self, child: NodeType) -> bool {
        match self {
            NodeType::Document => matches!(
                child,
                NodeType::Declaration
                    | NodeType::DocumentType
                    | NodeType::Element
                    | NodeType::Comment
                    | NodeType::ProcessingInstruction
                    | NodeType::Whitespace
                    | NodeType::SignificantWhitespace
            ),
            NodeType::DocumentType => matches!(
                child,
                NodeType::Comment
                    | NodeType::ProcessingInstruction
                    | NodeType::Entity
                    | NodeType::EntityReference
                    | NodeType::Notation
                    | NodeType::AttributeListDecl
                    | NodeType::ElementDecl
                    | NodeType::Text
                    | NodeType::Whitespace
                    | NodeType::SignificantWhitespace
            ),
            NodeType::Element => matches!(
                child,
                NodeType::Element
                    | NodeType::Text
                    | NodeType::CData
                    | NodeType::Comment
                    | NodeType::ProcessingInstruction
                    | NodeType::EntityReference
                    | NodeType::Whitespace
                    | NodeType::SignificantWhitespace
            ),
            NodeType::DocumentFragment => !matches!(
                child,
                NodeType::Document
                    | NodeType::Declaration
                    | NodeType::DocumentType
                    | NodeType::Attribute
            ),
            _ => false,
        }
    }

    /// Whether this type carries character data.
    pub fn is_text(self) -> bool {
        matches!(
            self,
            NodeType::Text
                | NodeType::CData
                | NodeType::Whitespace
                | NodeType::SignificantWhitespace
        )
    }
}

/// A qualified name: optional prefix plus local name.
///
/// The parts are shared `Rc<str>` slices; with `use_symbol_table` they come
/// out of the document's intern table.
#[derive(Clone, Debug)]
pub struct QName {
    prefix: Rc<str>,
    local: Rc<str>,
}

impl QName {
    pub(crate) fn new(prefix: Rc<str>, local: Rc<str>) -> Self {
        QName { prefix, local }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn local(&self) -> &str {
        &self.local
    }

    /// `prefix:local`, or just `local` when there is no prefix.
    pub fn full_name(&self) -> Cow<'_, str> {
        if self.prefix.is_empty() {
            Cow::Borrowed(&self.local)
        } else {
            Cow::Owned(format!("{}:{}", self.prefix, self.local))
        }
    }

    /// Resolves the namespace URI of this name.
    ///
    /// `xmlns` (as prefix or bare name) maps to the XMLNS namespace, the
    /// `xml` prefix to the XML namespace; everything else defers to the
    /// owning document's default URI.
    pub fn namespace<'a>(&'a self, doc: &'a Document) -> &'a str {
        if self.prefix() == "xmlns" || (self.prefix.is_empty() && self.local() == "xmlns") {
            NS_XMLNS_URI
        } else if self.prefix() == "xml" {
            NS_XML_URI
        } else {
            doc.default_uri()
        }
    }
}

impl PartialEq for QName {
    fn eq(&self, other: &Self) -> bool {
        self.prefix == other.prefix && self.local == other.local
    }
}

/// The external identifier of a DOCTYPE, entity or notation.
#[derive(Clone, PartialEq, Debug, Default)]
pub enum ExternalId {
    #[default]
    None,
    System {
        system: XmlString,
    },
    Public {
        public: XmlString,
        /// Absent only for notations, whose `PUBLIC` form allows it.
        system: Option<XmlString>,
    },
}

/// Per-variant payload.
#[derive(Debug)]
pub(crate) enum NodeKind {
    Document,
    Declaration,
    DocumentType {
        external_id: ExternalId,
    },
    Element,
    Attribute {
        value: XmlString,
    },
    Text {
        value: XmlString,
    },
    CData {
        value: XmlString,
    },
    Comment {
        value: XmlString,
    },
    ProcessingInstruction {
        value: XmlString,
    },
    Whitespace {
        value: XmlString,
    },
    SignificantWhitespace {
        value: XmlString,
    },
    Entity {
        parameter: bool,
        value: Option<XmlString>,
        external_id: ExternalId,
        ndata: Option<String>,
    },
    EntityReference,
    Notation {
        external_id: ExternalId,
    },
    AttributeListDecl {
        defs: Vec<AttlistDef>,
    },
    ElementDecl {
        content: ContentSpec,
    },
    DocumentFragment,
}

impl NodeKind {
    pub(crate) fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Document => NodeType::Document,
            NodeKind::Declaration => NodeType::Declaration,
            NodeKind::DocumentType { .. } => NodeType::DocumentType,
            NodeKind::Element => NodeType::Element,
            NodeKind::Attribute { .. } => NodeType::Attribute,
            NodeKind::Text { .. } => NodeType::Text,
            NodeKind::CData { .. } => NodeType::CData,
            NodeKind::Comment { .. } => NodeType::Comment,
            NodeKind::ProcessingInstruction { .. } => NodeType::ProcessingInstruction,
            NodeKind::Whitespace { .. } => NodeType::Whitespace,
            NodeKind::SignificantWhitespace { .. } => NodeType::SignificantWhitespace,
            NodeKind::Entity { .. } => NodeType::Entity,
            NodeKind::EntityReference => NodeType::EntityReference,
            NodeKind::Notation { .. } => NodeType::Notation,
            NodeKind::AttributeListDecl { .. } => NodeType::AttributeListDecl,
            NodeKind::ElementDecl { .. } => NodeType::ElementDecl,
            NodeKind::DocumentFragment => NodeType::DocumentFragment,
        }
    }

    pub(crate) fn value(&self) -> Option<&XmlString> {
        match self {
            NodeKind::Attribute { value }
            | NodeKind::Text { value }
            | NodeKind::CData { value }
            | NodeKind::Comment { value }
            | NodeKind::ProcessingInstruction { value }
            | NodeKind::Whitespace { value }
            | NodeKind::SignificantWhitespace { value } => Some(value),
            NodeKind::Entity { value, .. } => value.as_ref(),
            _ => None,
        }
    }
}

/// Arena slot: payload, name and linkage.
///
/// Child and attribute lists are doubly linked through the sibling fields
/// and anchored at the parent's first/last pointers.
#[derive(Debug)]
pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) name: QName,
    pub(crate) parent: Option<NodeId>,
    pub(crate) prev_sibling: Option<NodeId>,
    pub(crate) next_sibling: Option<NodeId>,
    pub(crate) first_child: Option<NodeId>,
    pub(crate) last_child: Option<NodeId>,
    pub(crate) first_attr: Option<NodeId>,
    pub(crate) last_attr: Option<NodeId>,
    /// Bumped on every structural change of this node's child or
    /// attribute list; node lists cross-check it while iterating.
    pub(crate) revision: u32,
}

impl NodeData {
    pub(crate) fn new(kind: NodeKind, name: QName) -> Self {
        NodeData {
            kind,
            name,
            parent: None,
            prev_sibling: None,
            next_sibling: None,
            first_child: None,
            last_child: None,
            first_attr: None,
            last_attr: None,
            revision: 0,
        }
    }
}

/// A node handle.
///
/// Cheap to copy; all access goes through the owning [`Document`].
/// Handles remember which document created them, and mutation through a
/// foreign document is rejected.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Node {
    pub(crate) doc_token: u32,
    pub(crate) id: NodeId,
}

impl Node {
    pub fn node_type(self, doc: &Document) -> NodeType {
        doc.data(self).kind.node_type()
    }

    pub fn is_element(self, doc: &Document) -> bool {
        self.node_type(doc) == NodeType::Element
    }

    pub fn is_attribute(self, doc: &Document) -> bool {
        self.node_type(doc) == NodeType::Attribute
    }

    pub fn is_document(self, doc: &Document) -> bool {
        self.node_type(doc) == NodeType::Document
    }

    /// Checks that the node carries character data.
    pub fn is_text(self, doc: &Document) -> bool {
        self.node_type(doc).is_text()
    }

    pub fn name(self, doc: &Document) -> &QName {
        &doc.data(self).name
    }

    pub fn prefix(self, doc: &Document) -> &str {
        doc.data(self).name.prefix()
    }

    pub fn local_name(self, doc: &Document) -> &str {
        doc.data(self).name.local()
    }

    pub fn full_name(self, doc: &Document) -> Cow<'_, str> {
        doc.data(self).name.full_name()
    }

    pub fn namespace(self, doc: &Document) -> &str {
        doc.data(self).name.namespace(doc)
    }

    /// Checks the full name against `name` using the document's name
    /// comparator.
    pub fn has_name(self, doc: &Document, name: &str) -> bool {
        doc.names_equal(&self.full_name(doc), name)
    }

    /// The node's character data with escapes resolved.
    pub fn value(self, doc: &Document) -> Option<Cow<'_, str>> {
        doc.data(self)
            .kind
            .value()
            .map(|v| v.unescaped(doc.entities()))
    }

    /// The stored string, untouched.
    pub fn xml_value(self, doc: &Document) -> Option<&XmlString> {
        doc.data(self).kind.value()
    }

    pub fn parent(self, doc: &Document) -> Option<Node> {
        doc.node_of(doc.data(self).parent)
    }

    pub fn prev_sibling(self, doc: &Document) -> Option<Node> {
        doc.node_of(doc.data(self).prev_sibling)
    }

    pub fn next_sibling(self, doc: &Document) -> Option<Node> {
        doc.node_of(doc.data(self).next_sibling)
    }

    pub fn first_child(self, doc: &Document) -> Option<Node> {
        doc.node_of(doc.data(self).first_child)
    }

    pub fn last_child(self, doc: &Document) -> Option<Node> {
        doc.node_of(doc.data(self).last_child)
    }

    pub fn first_attribute(self, doc: &Document) -> Option<Node> {
        doc.node_of(doc.data(self).first_attr)
    }

    pub fn last_attribute(self, doc: &Document) -> Option<Node> {
        doc.node_of(doc.data(self).last_attr)
    }

    pub fn has_children(self, doc: &Document) -> bool {
        doc.data(self).first_child.is_some()
    }

    pub fn has_attributes(self, doc: &Document) -> bool {
        doc.data(self).first_attr.is_some()
    }

    /// Depth below the document node.
    pub fn level(self, doc: &Document) -> usize {
        let mut depth = 0;
        let mut curr = self.parent(doc);
        while let Some(node) = curr {
            depth += 1;
            curr = node.parent(doc);
        }
        depth
    }

    pub fn is_ancestor_of(self, doc: &Document, other: Node) -> bool {
        let mut curr = other.parent(doc);
        while let Some(node) = curr {
            if node == self {
                return true;
            }
            curr = node.parent(doc);
        }
        false
    }

    // ------------------------------------------------------------------
    // Queries.

    /// First attribute whose full name matches `name`.
    pub fn find_attribute(self, doc: &Document, name: &str) -> Option<Node> {
        let mut curr = self.first_attribute(doc);
        while let Some(attr) = curr {
            if attr.has_name(doc, name) {
                return Some(attr);
            }
            curr = attr.next_sibling(doc);
        }
        None
    }

    /// First attribute matching local name and namespace URI.
    pub fn find_attribute_ns(self, doc: &Document, local: &str, uri: &str) -> Option<Node> {
        let mut curr = self.first_attribute(doc);
        while let Some(attr) = curr {
            if doc.names_equal(attr.local_name(doc), local) && attr.namespace(doc) == uri {
                return Some(attr);
            }
            curr = attr.next_sibling(doc);
        }
        None
    }

    /// The attribute named `id`, compared case-insensitively.
    pub fn find_attribute_by_id(self, doc: &Document) -> Option<Node> {
        let mut curr = self.first_attribute(doc);
        while let Some(attr) = curr {
            if attr.full_name(doc).eq_ignore_ascii_case("id") {
                return Some(attr);
            }
            curr = attr.next_sibling(doc);
        }
        None
    }

    /// Decoded value of the attribute with the given full name.
    pub fn attribute_value<'a>(self, doc: &'a Document, name: &str) -> Option<Cow<'a, str>> {
        self.find_attribute(doc, name).and_then(|a| a.value(doc))
    }

    /// First child element with the given full name. `*` matches any.
    pub fn find_element(self, doc: &Document, name: &str) -> Option<Node> {
        let mut curr = self.first_child(doc);
        while let Some(node) = curr {
            if node.is_element(doc) && (name == "*" || node.has_name(doc, name)) {
                return Some(node);
            }
            curr = node.next_sibling(doc);
        }
        None
    }

    /// First child element matching local name and namespace URI.
    /// `*` as the local name matches any.
    pub fn find_element_ns(self, doc: &Document, local: &str, uri: &str) -> Option<Node> {
        let mut curr = self.first_child(doc);
        while let Some(node) = curr {
            if node.is_element(doc)
                && (local == "*" || doc.names_equal(node.local_name(doc), local))
                && node.namespace(doc) == uri
            {
                return Some(node);
            }
            curr = node.next_sibling(doc);
        }
        None
    }

    /// Recursive search for the element whose `id` attribute equals `id`.
    pub fn element_by_id(self, doc: &Document, id: &str) -> Option<Node> {
        let mut curr = self.first_child(doc);
        while let Some(node) = curr {
            if node.is_element(doc) {
                if let Some(attr) = node.find_attribute_by_id(doc) {
                    if attr.value(doc).as_deref() == Some(id) {
                        return Some(node);
                    }
                }
                if let Some(found) = node.element_by_id(doc, id) {
                    return Some(found);
                }
            }
            curr = node.next_sibling(doc);
        }
        None
    }

    /// The attribute list as a [`NodeList`].
    pub fn attributes(self, doc: &Document) -> NodeList {
        NodeList::attributes(doc, self)
    }

    /// The child list; with `deep`, the whole subtree in preorder,
    /// starting with this node.
    pub fn child_nodes(self, doc: &Document, deep: bool) -> NodeList {
        if deep {
            NodeList::child_nodes_deep(doc, self)
        } else {
            NodeList::child_nodes(doc, self)
        }
    }

    /// Child elements only.
    pub fn elements(self, doc: &Document) -> NodeList {
        NodeList::child_nodes(doc, self)
            .with_filter(doc, Rc::new(|_, doc: &Document, n: Node| n.is_element(doc)))
    }

    /// All elements of the subtree with the given full name.
    /// `*` matches any element.
    pub fn elements_by_tag_name(self, doc: &Document, name: &str) -> NodeList {
        let name = name.to_string();
        NodeList::child_nodes_deep(doc, self).with_filter(
            doc,
            Rc::new(move |_, doc: &Document, n: Node| {
                n.is_element(doc) && (name == "*" || n.has_name(doc, &name))
            }),
        )
    }

    /// All elements of the subtree matching local name and namespace URI.
    /// `*` as the local name matches any.
    pub fn elements_by_tag_name_ns(self, doc: &Document, local: &str, uri: &str) -> NodeList {
        let local = local.to_string();
        let uri = uri.to_string();
        NodeList::child_nodes_deep(doc, self).with_filter(
            doc,
            Rc::new(move |_, doc: &Document, n: Node| {
                n.is_element(doc)
                    && (local == "*" || doc.names_equal(n.local_name(doc), &local))
                    && n.namespace(doc) == uri
            }),
        )
    }

    // ------------------------------------------------------------------
    // Mutations. These delegate to the document so the structural
    // invariants are enforced in one place.

    pub fn append_child(self, doc: &mut Document, child: Node) -> Result<()> {
        doc.append_child(self, child)
    }

    pub fn insert_child_before(self, doc: &mut Document, new: Node, reference: Node) -> Result<()> {
        doc.insert_child_before(self, new, reference)
    }

    pub fn insert_child_after(self, doc: &mut Document, new: Node, reference: Node) -> Result<()> {
        doc.insert_child_after(self, new, reference)
    }

    pub fn append_attribute(self, doc: &mut Document, attr: Node) -> Result<()> {
        doc.append_attribute(self, attr)
    }

    /// Returns the attribute with this name, creating it when absent.
    pub fn ensure_attribute(self, doc: &mut Document, name: &str) -> Result<Node> {
        doc.ensure_attribute(self, name)
    }

    pub fn remove_child(self, doc: &mut Document, child: Node) -> Result<()> {
        doc.remove_child(self, child)
    }

    /// Removes all children; with `deep`, their subtrees are unlinked too.
    pub fn remove_child_nodes(self, doc: &mut Document, deep: bool) -> Result<()> {
        doc.remove_child_nodes(self, deep)
    }

    pub fn remove_attribute(self, doc: &mut Document, attr: Node) -> Result<()> {
        doc.remove_attribute(self, attr)
    }

    pub fn remove_attribute_by_name(self, doc: &mut Document, name: &str) -> Result<Option<Node>> {
        match self.find_attribute(doc, name) {
            Some(attr) => {
                doc.remove_attribute(self, attr)?;
                Ok(Some(attr))
            }
            None => Ok(None),
        }
    }

    pub fn remove_attributes(self, doc: &mut Document) -> Result<()> {
        doc.remove_attributes(self)
    }

    /// Removes every child and attribute.
    pub fn remove_all(self, doc: &mut Document) -> Result<()> {
        doc.remove_attributes(self)?;
        doc.remove_child_nodes(self, true)
    }

    pub fn replace_child(self, doc: &mut Document, new: Node, old: Node) -> Result<()> {
        doc.replace_child(self, new, old)
    }

    pub fn set_value(self, doc: &mut Document, value: &str) -> Result<()> {
        doc.set_node_value(self, XmlString::decoded(value))
    }

    /// Replaces the stored string, keeping its encoding state.
    pub fn set_xml_value(self, doc: &mut Document, value: XmlString) -> Result<()> {
        doc.set_node_value(self, value)
    }

    /// Serializes this node and its subtree.
    pub fn write<W: Write>(self, doc: &Document, writer: &mut XmlWriter<W>) -> Result<()> {
        crate::writer::write_node(doc, self, writer)
    }
}
