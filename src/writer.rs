//! Serialization of the tree back to XML text.

use std::io::Write;

use crate::document::Document;
use crate::dtd::{AttlistDef, AttlistDefault, ContentSpec};
use crate::error::Result;
use crate::node::{ExternalId, Node, NodeKind};

/// Emits well-formed XML markup into an [`io::Write`](std::io::Write) sink.
///
/// In pretty mode a newline plus one indent unit per `node_level` is
/// written before each node; the `only_one_node_text` counter suppresses
/// that while an element holds a single text child, so `<a>text</a>` stays
/// on one line. Without pretty mode no whitespace is added at all.
pub struct XmlWriter<W: Write> {
    out: W,
    pretty: bool,
    indent: &'static str,
    node_level: usize,
    only_text: usize,
    started: bool,
}

impl<W: Write> XmlWriter<W> {
    pub fn new(out: W, pretty: bool) -> Self {
        XmlWriter::with_indent(out, pretty, "  ")
    }

    pub fn with_indent(out: W, pretty: bool, indent: &'static str) -> Self {
        XmlWriter {
            out,
            pretty,
            indent,
            node_level: 0,
            only_text: 0,
            started: false,
        }
    }

    pub fn put(&mut self, c: char) -> Result<()> {
        write!(self.out, "{}", c)?;
        self.started = true;
        Ok(())
    }

    pub fn put_str(&mut self, s: &str) -> Result<()> {
        self.out.write_all(s.as_bytes())?;
        if !s.is_empty() {
            self.started = true;
        }
        Ok(())
    }

    pub fn put_with_pre_space(&mut self, s: &str) -> Result<()> {
        self.put(' ')?;
        self.put_str(s)
    }

    /// Writes `s` in quotes, preferring `"` unless `s` contains one.
    pub fn put_with_quote(&mut self, s: &str) -> Result<()> {
        let quote = if s.contains('"') { '\'' } else { '"' };
        self.put(quote)?;
        self.put_str(s)?;
        self.put(quote)
    }

    pub fn inc_node_level(&mut self) {
        self.node_level += 1;
    }

    pub fn dec_node_level(&mut self) {
        self.node_level = self.node_level.saturating_sub(1);
    }

    pub fn inc_only_one_node_text(&mut self) {
        self.only_text += 1;
    }

    pub fn dec_only_one_node_text(&mut self) {
        self.only_text = self.only_text.saturating_sub(1);
    }

    /// The pretty-mode line break before a node.
    fn put_new_line(&mut self) -> Result<()> {
        if !self.pretty || self.only_text > 0 || !self.started {
            return Ok(());
        }

        self.put('\n')?;
        for _ in 0..self.node_level {
            self.put_str(self.indent)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Structural pieces.

    /// `<name`
    pub fn put_element_name_begin(&mut self, name: &str) -> Result<()> {
        self.put_new_line()?;
        self.put('<')?;
        self.put_str(name)
    }

    /// Closes a start tag.
    pub fn put_element_name_end(&mut self) -> Result<()> {
        self.put('>')
    }

    /// `</name>`
    pub fn put_element_end(&mut self, name: &str) -> Result<()> {
        self.put_new_line()?;
        self.put_str("</")?;
        self.put_str(name)?;
        self.put('>')
    }

    /// `/>`
    pub fn put_element_empty(&mut self) -> Result<()> {
        self.put_str("/>")
    }

    /// ` name="encoded-value"`
    pub fn put_attribute(&mut self, name: &str, encoded_value: &str) -> Result<()> {
        self.put(' ')?;
        self.put_str(name)?;
        self.put('=')?;
        self.put_with_quote(encoded_value)
    }

    /// CDATA framing; the content goes out verbatim.
    pub fn put_cdata(&mut self, raw: &str) -> Result<()> {
        self.put_new_line()?;
        self.put_str("<![CDATA[")?;
        self.put_str(raw)?;
        self.put_str("]]>")
    }

    pub fn put_comment(&mut self, text: &str) -> Result<()> {
        self.put_new_line()?;
        self.put_str("<!--")?;
        self.put_str(text)?;
        self.put_str("-->")
    }

    pub fn put_processing_instruction(&mut self, target: &str, content: &str) -> Result<()> {
        self.put_new_line()?;
        self.put_str("<?")?;
        self.put_str(target)?;
        if !content.is_empty() {
            self.put_with_pre_space(content)?;
        }
        self.put_str("?>")
    }

    /// `<!DOCTYPE name`, plus the external identifier when present.
    pub fn put_document_type_begin(&mut self, name: &str, external_id: &ExternalId) -> Result<()> {
        self.put_new_line()?;
        self.put_str("<!DOCTYPE ")?;
        self.put_str(name)?;
        self.put_external_id(external_id)
    }

    /// Closes the DOCTYPE, with or without an internal subset.
    pub fn put_document_type_end(&mut self, had_subset: bool) -> Result<()> {
        if had_subset {
            self.put_new_line()?;
            self.put_str("]>")
        } else {
            self.put('>')
        }
    }

    pub fn put_notation(&mut self, name: &str, external_id: &ExternalId) -> Result<()> {
        self.put_new_line()?;
        self.put_str("<!NOTATION ")?;
        self.put_str(name)?;
        self.put_external_id(external_id)?;
        self.put('>')
    }

    pub fn put_entity_general(
        &mut self,
        name: &str,
        parameter: bool,
        value: Option<&str>,
        external_id: &ExternalId,
        ndata: Option<&str>,
    ) -> Result<()> {
        self.put_new_line()?;
        self.put_str("<!ENTITY ")?;
        if parameter {
            self.put_str("% ")?;
        }
        self.put_str(name)?;

        if let Some(value) = value {
            self.put(' ')?;
            self.put_with_quote(value)?;
        }
        self.put_external_id(external_id)?;
        if let Some(ndata) = ndata {
            self.put_str(" NDATA ")?;
            self.put_str(ndata)?;
        }
        self.put('>')
    }

    /// `&name;`
    pub fn put_entity_reference(&mut self, name: &str) -> Result<()> {
        self.put('&')?;
        self.put_str(name)?;
        self.put(';')
    }

    /// `<!ATTLIST name`
    pub fn put_document_type_attribute_list_begin(&mut self, name: &str) -> Result<()> {
        self.put_new_line()?;
        self.put_str("<!ATTLIST ")?;
        self.put_str(name)
    }

    pub fn put_document_type_attribute_list_def(&mut self, def: &AttlistDef) -> Result<()> {
        self.put_with_pre_space(&def.name)?;
        self.put_with_pre_space(&def.ty.to_string())?;

        match &def.default {
            AttlistDefault::None => {}
            AttlistDefault::Required => self.put_str(" #REQUIRED")?,
            AttlistDefault::Implied => self.put_str(" #IMPLIED")?,
            AttlistDefault::Fixed(value) => {
                self.put_str(" #FIXED ")?;
                self.put_with_quote(&value.escaped())?;
            }
            AttlistDefault::Value(value) => {
                self.put(' ')?;
                self.put_with_quote(&value.escaped())?;
            }
        }
        Ok(())
    }

    pub fn put_document_type_attribute_list_end(&mut self) -> Result<()> {
        self.put('>')
    }

    /// `<!ELEMENT name`
    pub fn put_document_type_element_begin(&mut self, name: &str) -> Result<()> {
        self.put_new_line()?;
        self.put_str("<!ELEMENT ")?;
        self.put_str(name)
    }

    pub fn put_document_type_element_end(&mut self) -> Result<()> {
        self.put('>')
    }

    fn put_external_id(&mut self, external_id: &ExternalId) -> Result<()> {
        match external_id {
            ExternalId::None => Ok(()),
            ExternalId::System { system } => {
                self.put_str(" SYSTEM ")?;
                self.put_with_quote(system.as_str())
            }
            ExternalId::Public { public, system } => {
                self.put_str(" PUBLIC ")?;
                self.put_with_quote(public.as_str())?;
                if let Some(system) = system {
                    self.put(' ')?;
                    self.put_with_quote(system.as_str())?;
                }
                Ok(())
            }
        }
    }
}

/// Serializes `node` and its subtree into `w`.
pub(crate) fn write_node<W: Write>(doc: &Document, node: Node, w: &mut XmlWriter<W>) -> Result<()> {
    match &doc.data(node).kind {
        NodeKind::Document | NodeKind::DocumentFragment => write_children(doc, node, w),
        NodeKind::Declaration => {
            w.put_new_line()?;
            w.put_str("<?xml")?;
            write_attributes(doc, node, w)?;
            w.put_str("?>")
        }
        NodeKind::Element => {
            let name = node.full_name(doc).into_owned();
            w.put_element_name_begin(&name)?;
            write_attributes(doc, node, w)?;

            if !node.has_children(doc) {
                return w.put_element_empty();
            }

            w.put_element_name_end()?;

            // A single text child stays on the element's line.
            let first = node.first_child(doc);
            let inline_text = first == node.last_child(doc)
                && first.map_or(false, |child| child.is_text(doc));
            if inline_text {
                w.inc_only_one_node_text();
            }

            w.inc_node_level();
            write_children(doc, node, w)?;
            w.dec_node_level();

            w.put_element_end(&name)?;
            if inline_text {
                w.dec_only_one_node_text();
            }
            Ok(())
        }
        NodeKind::Attribute { value } => {
            w.put_attribute(&node.full_name(doc), &value.escaped())
        }
        NodeKind::Text { value } => {
            w.put_new_line()?;
            w.put_str(&value.escaped())
        }
        NodeKind::CData { value } => w.put_cdata(value.as_str()),
        NodeKind::Comment { value } => w.put_comment(value.as_str()),
        NodeKind::ProcessingInstruction { value } => {
            w.put_processing_instruction(&node.full_name(doc), value.as_str())
        }
        NodeKind::Whitespace { value } | NodeKind::SignificantWhitespace { value } => {
            w.put_str(value.as_str())
        }
        NodeKind::DocumentType { external_id } => {
            w.put_document_type_begin(&node.full_name(doc), external_id)?;

            if node.has_children(doc) {
                w.put_str(" [")?;
                w.inc_node_level();
                write_children(doc, node, w)?;
                w.dec_node_level();
                w.put_document_type_end(true)?;
            } else {
                w.put_document_type_end(false)?;
            }
            Ok(())
        }
        NodeKind::Entity {
            parameter,
            value,
            external_id,
            ndata,
        } => w.put_entity_general(
            &node.full_name(doc),
            *parameter,
            value.as_ref().map(|v| v.as_str()),
            external_id,
            ndata.as_deref(),
        ),
        NodeKind::EntityReference => w.put_entity_reference(&node.full_name(doc)),
        NodeKind::Notation { external_id } => {
            w.put_notation(&node.full_name(doc), external_id)
        }
        NodeKind::AttributeListDecl { defs } => {
            w.put_document_type_attribute_list_begin(&node.full_name(doc))?;
            for def in defs {
                w.put_document_type_attribute_list_def(def)?;
            }
            w.put_document_type_attribute_list_end()
        }
        NodeKind::ElementDecl { content } => {
            w.put_document_type_element_begin(&node.full_name(doc))?;
            write_content_spec(content, w)?;
            w.put_document_type_element_end()
        }
    }
}

fn write_children<W: Write>(doc: &Document, parent: Node, w: &mut XmlWriter<W>) -> Result<()> {
    let mut curr = parent.first_child(doc);
    while let Some(node) = curr {
        write_node(doc, node, w)?;
        curr = node.next_sibling(doc);
    }
    Ok(())
}

fn write_attributes<W: Write>(doc: &Document, parent: Node, w: &mut XmlWriter<W>) -> Result<()> {
    let mut curr = parent.first_attribute(doc);
    while let Some(attr) = curr {
        write_node(doc, attr, w)?;
        curr = attr.next_sibling(doc);
    }
    Ok(())
}

fn write_content_spec<W: Write>(content: &ContentSpec, w: &mut XmlWriter<W>) -> Result<()> {
    w.put_with_pre_space(&content.to_string())
}
