//! The parsing state machine.
//!
//! The parser recognizes tokens through the [`Reader`], allocates typed
//! nodes through the [`Document`] factory and attaches them with the
//! ordinary tree operations, so the structural rules are enforced the same
//! way for parsed and hand-built documents.

use crate::document::{check_standalone, check_version, Document};
use crate::dtd::{
    AttlistDef, AttlistDefault, AttlistType, ContentParticle, ContentSpec, Occurs, ParticleKind,
};
use crate::entity::XmlString;
use crate::error::{Error, Result};
use crate::node::{ExternalId, Node};
use crate::reader::{Reader, TextPos};

/// Options honored while parsing.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ParseOptions {
    /// Whitespace between markup becomes whitespace nodes instead of
    /// being dropped.
    pub preserve_whitespace: bool,
    /// Enables the [`SaxHandlers`] callbacks.
    pub use_sax: bool,
    /// Interns names and namespace URIs into the document symbol table.
    pub use_symbol_table: bool,
    /// Enforces attribute-name uniqueness and DTD keyword legality.
    pub validate: bool,
}

/// Per-node callbacks invoked while the tree is built.
///
/// Each hook returns a keep flag; `false` removes the freshly inserted
/// node again. The begin-element hook fires after the open tag and its
/// attributes are parsed; its return value is ignored.
#[derive(Default)]
pub struct SaxHandlers<'h> {
    pub on_attribute: Option<Box<dyn FnMut(&Document, Node) -> bool + 'h>>,
    pub on_element_begin: Option<Box<dyn FnMut(&Document, Node) -> bool + 'h>>,
    pub on_element_end: Option<Box<dyn FnMut(&Document, Node) -> bool + 'h>>,
    pub on_other_node: Option<Box<dyn FnMut(&Document, Node) -> bool + 'h>>,
}

pub(crate) fn parse_into(doc: &mut Document, text: &str, sax: &mut SaxHandlers) -> Result<()> {
    let opt = *doc.options();
    let mut parser = Parser {
        r: Reader::new(text),
        doc,
        opt,
        sax,
    };
    parser.parse_document()
}

struct Parser<'input, 'doc, 'sax, 'h> {
    r: Reader<'input>,
    doc: &'doc mut Document,
    opt: ParseOptions,
    sax: &'sax mut SaxHandlers<'h>,
}

impl<'input> Parser<'input, '_, '_, '_> {
    // document ::= prolog element Misc*
    fn parse_document(&mut self) -> Result<()> {
        // Skip UTF-8 BOM.
        if self.r.starts_with(&[0xEF, 0xBB, 0xBF]) {
            self.r.advance(3);
        }

        let root = self.doc.root();
        while !self.r.at_end() {
            if self.r.starts_with_space() {
                self.parse_document_spaces(root)?;
            } else {
                self.parse_markup(root)?;
            }
        }

        Ok(())
    }

    /// Whitespace between document-level markup.
    fn parse_document_spaces(&mut self, parent: Node) -> Result<()> {
        if !self.opt.preserve_whitespace {
            self.r.skip_spaces();
            return Ok(());
        }

        let mut buf = self.doc.buffers.acquire();
        while self.r.starts_with_space() {
            buf.push(self.r.curr_byte_unchecked() as char);
            self.r.advance(1);
        }

        let ws = self.doc.create_whitespace(buf.as_str())?;
        self.doc.append_child(parent, ws)?;
        self.sax_other(ws)
    }

    /// One `<…>` construct, dispatched on the tokens after `<`.
    fn parse_markup(&mut self, parent: Node) -> Result<()> {
        self.r.consume_byte(b'<', "'<'")?;

        match self.r.curr_byte()? {
            b'?' => {
                self.r.advance(1);
                let (target, pos) = self.r.consume_name()?;
                if target == "xml" {
                    self.parse_declaration(parent, pos)
                } else {
                    self.parse_pi(parent, target)
                }
            }
            b'!' => {
                self.r.advance(1);
                if self.r.starts_with(b"--") {
                    self.r.advance(2);
                    self.parse_comment(parent)
                } else if self.r.starts_with(b"[CDATA[") {
                    self.r.advance(7);
                    self.parse_cdata(parent)
                } else if self.r.starts_with(b"DOCTYPE") {
                    self.r.advance(7);
                    self.parse_doctype(parent)
                } else if self.r.starts_with(b"ATTLIST") {
                    self.r.advance(7);
                    self.parse_attlist_decl(parent)
                } else if self.r.starts_with(b"ELEMENT") {
                    self.r.advance(7);
                    self.parse_element_decl(parent)
                } else if self.r.starts_with(b"ENTITY") {
                    self.r.advance(6);
                    self.parse_entity_decl(parent)
                } else if self.r.starts_with(b"NOTATION") {
                    self.r.advance(8);
                    self.parse_notation_decl(parent)
                } else {
                    Err(Error::UnexpectedChar {
                        expected: "a markup declaration",
                        found: self.r.curr_byte_or(b'!') as char,
                        pos: self.r.text_pos(),
                    })
                }
            }
            _ => self.parse_element(parent),
        }
    }

    // element ::= EmptyElemTag | STag content ETag
    fn parse_element(&mut self, parent: Node) -> Result<()> {
        let (prefix, local, _) = self.r.consume_qname()?;
        let el = self.doc.create_element_parts(prefix, local);
        self.doc.append_child(parent, el)?;

        loop {
            let has_space = self.r.starts_with_space();
            self.r.skip_spaces();
            match self.r.curr_byte()? {
                b'/' => {
                    self.r.advance(1);
                    self.r.consume_byte(b'>', "'>'")?;
                    self.sax_element_begin(el)?;
                    self.sax_element_end(parent, el)?;
                    return Ok(());
                }
                b'>' => {
                    self.r.advance(1);
                    self.sax_element_begin(el)?;
                    self.parse_content(el)?;
                    self.sax_element_end(parent, el)?;
                    return Ok(());
                }
                _ => {
                    // An attribute must be preceded with a whitespace.
                    if !has_space {
                        self.r.consume_spaces()?;
                    }
                    self.parse_attribute(el)?;
                }
            }
        }
    }

    // Attribute ::= Name Eq AttValue
    fn parse_attribute(&mut self, el: Node) -> Result<()> {
        let (prefix, local, pos) = self.r.consume_qname()?;
        self.r.skip_spaces();
        self.r.consume_byte(b'=', "'='")?;
        self.r.skip_spaces();

        let mut buf = self.doc.buffers.acquire();
        self.r.consume_attr_value(self.doc.entities(), &mut buf)?;

        if self.opt.validate {
            let full = full_name(prefix, local);
            if el.find_attribute(self.doc, &full).is_some() {
                return Err(Error::DuplicatedAttribute { name: full, pos });
            }
        }

        let value = XmlString::decoded(buf.take_value());
        let attr = self.doc.create_attribute_parts(prefix, local, value);
        self.doc.append_attribute(el, attr)?;
        self.sax_attribute(el, attr)
    }

    // content ::= CharData? ((element | Reference | CDSect | PI | Comment) CharData?)*
    fn parse_content(&mut self, el: Node) -> Result<()> {
        loop {
            if self.r.at_end() {
                return Err(Error::UnexpectedEndOfStream(self.r.text_pos()));
            }

            if self.r.curr_byte_unchecked() != b'<' {
                self.parse_text(el)?;
                continue;
            }

            if self.r.next_byte()? == b'/' {
                self.r.advance(2);
                return self.parse_close_tag(el);
            }

            self.parse_markup(el)?;
        }
    }

    // '</' Name S? '>'
    fn parse_close_tag(&mut self, el: Node) -> Result<()> {
        let (prefix, local, pos) = self.r.consume_qname()?;
        self.r.skip_spaces();
        self.r.consume_byte(b'>', "'>'")?;

        if prefix != el.prefix(self.doc) || local != el.local_name(self.doc) {
            return Err(Error::UnexpectedCloseTag {
                expected: el.full_name(self.doc).into_owned(),
                found: full_name(prefix, local),
                pos,
            });
        }

        Ok(())
    }

    /// A text run up to the next `<`.
    fn parse_text(&mut self, el: Node) -> Result<()> {
        let mut buf = self.doc.buffers.acquire();
        let all_space = self.r.consume_text_into(self.doc.entities(), &mut buf)?;
        if buf.is_empty() {
            return Ok(());
        }

        if all_space {
            if self.opt.preserve_whitespace {
                let ws = self.doc.create_significant_whitespace(buf.as_str())?;
                self.doc.append_child(el, ws)?;
                self.sax_other(ws)?;
            }
            return Ok(());
        }

        let text = self.doc.create_text_node(XmlString::decoded(buf.take_value()));
        self.doc.append_child(el, text)?;
        self.sax_other(text)
    }

    // XMLDecl ::= '<?xml' VersionInfo EncodingDecl? SDDecl? S? '?>'
    fn parse_declaration(&mut self, parent: Node, pos: TextPos) -> Result<()> {
        let mut version: Option<String> = None;
        let mut encoding: Option<String> = None;
        let mut standalone: Option<String> = None;

        loop {
            let has_space = self.r.starts_with_space();
            self.r.skip_spaces();
            if self.r.starts_with(b"?>") {
                self.r.advance(2);
                break;
            }

            if !has_space {
                self.r.consume_spaces()?;
            }

            let (name, name_pos) = self.r.consume_name()?;
            self.r.skip_spaces();
            self.r.consume_byte(b'=', "'='")?;
            self.r.skip_spaces();

            let mut buf = self.doc.buffers.acquire();
            self.r.consume_attr_value(self.doc.entities(), &mut buf)?;
            let value = buf.take_value();

            match name {
                "version" if version.is_none() && encoding.is_none() && standalone.is_none() => {
                    check_version(&value, name_pos)?;
                    version = Some(value);
                }
                "encoding" if version.is_some() && encoding.is_none() && standalone.is_none() => {
                    encoding = Some(value);
                }
                "standalone" if version.is_some() && standalone.is_none() => {
                    check_standalone(&value, name_pos)?;
                    standalone = Some(value);
                }
                _ => {
                    return Err(Error::UnexpectedString {
                        expected: "version, encoding or standalone",
                        pos: name_pos,
                    });
                }
            }
        }

        let version = match version {
            Some(v) => v,
            None => {
                return Err(Error::UnexpectedString {
                    expected: "version",
                    pos,
                });
            }
        };

        let decl =
            self.doc
                .create_declaration(&version, encoding.as_deref(), standalone.as_deref())?;
        self.doc.append_child(parent, decl)?;
        self.sax_other(decl)
    }

    // '<!--' … '-->'
    fn parse_comment(&mut self, parent: Node) -> Result<()> {
        let pos = self.r.text_pos();
        let mut buf = self.doc.buffers.acquire();
        if !self.r.read_until(&mut buf, "-->") {
            return Err(Error::UnexpectedString {
                expected: "-->",
                pos,
            });
        }

        let comment = self.doc.create_comment(buf.as_str());
        self.doc.append_child(parent, comment)?;
        self.sax_other(comment)
    }

    // '<![CDATA[' … ']]>'
    fn parse_cdata(&mut self, parent: Node) -> Result<()> {
        let pos = self.r.text_pos();
        let mut buf = self.doc.buffers.acquire();
        if !self.r.read_until(&mut buf, "]]>") {
            return Err(Error::UnexpectedString {
                expected: "]]>",
                pos,
            });
        }

        let cdata = self.doc.create_cdata(buf.as_str())?;
        self.doc.append_child(parent, cdata)?;
        self.sax_other(cdata)
    }

    // PI ::= '<?' PITarget (S (Char* - (Char* '?>' Char*)))? '?>'
    fn parse_pi(&mut self, parent: Node, target: &str) -> Result<()> {
        let pos = self.r.text_pos();
        self.r.skip_spaces();

        let mut buf = self.doc.buffers.acquire();
        if !self.r.read_until(&mut buf, "?>") {
            return Err(Error::UnexpectedString {
                expected: "?>",
                pos,
            });
        }

        let pi = self.doc.create_processing_instruction(target, buf.as_str());
        self.doc.append_child(parent, pi)?;
        self.sax_other(pi)
    }

    // doctypedecl ::= '<!DOCTYPE' S Name (S ExternalID)? S? ('[' intSubset ']' S?)? '>'
    fn parse_doctype(&mut self, parent: Node) -> Result<()> {
        self.r.consume_spaces()?;
        let (name, _) = self.r.consume_name()?;
        self.r.skip_spaces();

        let external_id = self.parse_external_id(false)?;
        self.r.skip_spaces();

        let doctype = self.doc.create_document_type(name, external_id);
        self.doc.append_child(parent, doctype)?;

        if self.r.try_consume_byte(b'[') {
            self.parse_internal_subset(doctype)?;
            self.r.skip_spaces();
        }

        self.r.consume_byte(b'>', "'>'")?;
        self.sax_other(doctype)
    }

    /// The `[ … ]` part of a DOCTYPE: markup declarations plus
    /// parameter-entity reference tokens.
    fn parse_internal_subset(&mut self, doctype: Node) -> Result<()> {
        loop {
            self.r.skip_spaces();
            match self.r.curr_byte()? {
                b']' => {
                    self.r.advance(1);
                    return Ok(());
                }
                b'<' => self.parse_markup(doctype)?,
                b'%' => {
                    // Kept as a text token; parameter entities are not
                    // expanded.
                    self.r.advance(1);
                    let (pe_name, _) = self.r.consume_name()?;
                    self.r.try_consume_byte(b';');
                    log::warn!("parameter entity '%{};' left unexpanded", pe_name);

                    let token = format!("%{};", pe_name);
                    let text = self.doc.create_text_node(XmlString::raw(token));
                    self.doc.append_child(doctype, text)?;
                    self.sax_other(text)?;
                }
                c => {
                    return Err(Error::UnexpectedChar {
                        expected: "a markup declaration, '%' or ']'",
                        found: c as char,
                        pos: self.r.text_pos(),
                    });
                }
            }
        }
    }

    // ExternalID ::= 'SYSTEM' S SystemLiteral | 'PUBLIC' S PubidLiteral S SystemLiteral
    //
    // With `public_only` the system literal may be omitted, which the
    // notation grammar allows.
    fn parse_external_id(&mut self, public_only: bool) -> Result<ExternalId> {
        if self.r.starts_with(b"SYSTEM") {
            self.r.advance(6);
            self.r.consume_spaces()?;
            let system = self.r.consume_literal()?;
            return Ok(ExternalId::System {
                system: XmlString::raw(system),
            });
        }

        if self.r.starts_with(b"PUBLIC") {
            self.r.advance(6);
            self.r.consume_spaces()?;
            let public = XmlString::raw(self.r.consume_literal()?);

            let system = if public_only {
                self.r.skip_spaces();
                match self.r.curr_byte_or(b'>') {
                    b'"' | b'\'' => Some(XmlString::raw(self.r.consume_literal()?)),
                    _ => None,
                }
            } else {
                self.r.consume_spaces()?;
                Some(XmlString::raw(self.r.consume_literal()?))
            };

            return Ok(ExternalId::Public { public, system });
        }

        Ok(ExternalId::None)
    }

    // EntityDecl ::= '<!ENTITY' S Name S EntityDef S? '>'
    //              | '<!ENTITY' S '%' S Name S PEDef S? '>'
    fn parse_entity_decl(&mut self, parent: Node) -> Result<()> {
        self.r.consume_spaces()?;

        let parameter = self.r.try_consume_byte(b'%');
        if parameter {
            self.r.consume_spaces()?;
        }

        let (name, name_pos) = self.r.consume_name()?;
        self.r.consume_spaces()?;

        let entity = match self.r.curr_byte()? {
            b'"' | b'\'' => {
                let value = self.r.consume_literal()?;
                self.r.skip_spaces();
                self.doc
                    .create_entity_full(name, parameter, Some(value), ExternalId::None, None)
            }
            b'S' | b'P' => {
                let external_id = self.parse_external_id(false)?;
                if external_id == ExternalId::None {
                    return Err(Error::UnexpectedString {
                        expected: "SYSTEM or PUBLIC",
                        pos: name_pos,
                    });
                }
                self.r.skip_spaces();

                let mut ndata = None;
                if !parameter && self.r.starts_with(b"NDATA") {
                    self.r.advance(5);
                    self.r.consume_spaces()?;
                    let (ndata_name, _) = self.r.consume_name()?;
                    ndata = Some(ndata_name);
                    self.r.skip_spaces();
                }

                self.doc
                    .create_entity_full(name, parameter, None, external_id, ndata)
            }
            c => {
                return Err(Error::UnexpectedChar {
                    expected: "a quote, SYSTEM or PUBLIC",
                    found: c as char,
                    pos: self.r.text_pos(),
                });
            }
        };

        self.r.consume_byte(b'>', "'>'")?;
        self.doc.append_child(parent, entity)?;
        self.sax_other(entity)
    }

    // NotationDecl ::= '<!NOTATION' S Name S (ExternalID | PublicID) S? '>'
    fn parse_notation_decl(&mut self, parent: Node) -> Result<()> {
        self.r.consume_spaces()?;
        let (name, name_pos) = self.r.consume_name()?;
        self.r.consume_spaces()?;

        let external_id = self.parse_external_id(true)?;
        if external_id == ExternalId::None {
            return Err(Error::UnexpectedString {
                expected: "SYSTEM or PUBLIC",
                pos: name_pos,
            });
        }

        self.r.skip_spaces();
        self.r.consume_byte(b'>', "'>'")?;

        let notation = self.doc.create_notation(name, external_id);
        self.doc.append_child(parent, notation)?;
        self.sax_other(notation)
    }

    // elementdecl ::= '<!ELEMENT' S Name S contentspec S? '>'
    fn parse_element_decl(&mut self, parent: Node) -> Result<()> {
        self.r.consume_spaces()?;
        let (name, _) = self.r.consume_name()?;
        self.r.consume_spaces()?;

        let content = if self.r.curr_byte()? == b'(' {
            ContentSpec::Particle(self.parse_content_particle()?)
        } else {
            let (keyword, pos) = self.r.consume_name()?;
            match keyword {
                "ANY" => ContentSpec::Any,
                "EMPTY" => ContentSpec::Empty,
                _ => {
                    return Err(Error::UnexpectedString {
                        expected: "ANY, EMPTY or a choice group",
                        pos,
                    });
                }
            }
        };

        self.r.skip_spaces();
        self.r.consume_byte(b'>', "'>'")?;

        let decl = self.doc.create_element_decl(name, content);
        self.doc.append_child(parent, decl)?;
        self.sax_other(decl)
    }

    /// A parenthesized group of the element content model. Atoms are
    /// names; `|` alternates, `,` sequences; any atom or group may carry
    /// a `?`, `*` or `+` indicator. Nesting is unbounded.
    fn parse_content_particle(&mut self) -> Result<ContentParticle> {
        self.r.consume_byte(b'(', "'('")?;
        self.r.skip_spaces();

        let mut items = vec![self.parse_particle_atom()?];
        let mut separator = None;

        loop {
            self.r.skip_spaces();
            match self.r.curr_byte()? {
                b')' => {
                    self.r.advance(1);
                    break;
                }
                c @ (b'|' | b',') => {
                    if *separator.get_or_insert(c) != c {
                        return Err(Error::UnexpectedChar {
                            expected: "one separator kind per group",
                            found: c as char,
                            pos: self.r.text_pos(),
                        });
                    }
                    self.r.advance(1);
                    self.r.skip_spaces();
                    items.push(self.parse_particle_atom()?);
                }
                c => {
                    return Err(Error::UnexpectedChar {
                        expected: "'|', ',' or ')'",
                        found: c as char,
                        pos: self.r.text_pos(),
                    });
                }
            }
        }

        let kind = match separator {
            Some(b',') => ParticleKind::Sequence(items),
            _ => ParticleKind::Choice(items),
        };

        Ok(ContentParticle {
            kind,
            occurs: self.parse_occurs(),
        })
    }

    fn parse_particle_atom(&mut self) -> Result<ContentParticle> {
        if self.r.curr_byte()? == b'(' {
            return self.parse_content_particle();
        }

        let (name, _) = self.r.consume_decl_token()?;
        Ok(ContentParticle {
            kind: ParticleKind::Name(name.to_string()),
            occurs: self.parse_occurs(),
        })
    }

    fn parse_occurs(&mut self) -> Occurs {
        if self.r.try_consume_byte(b'?') {
            Occurs::Optional
        } else if self.r.try_consume_byte(b'*') {
            Occurs::ZeroOrMore
        } else if self.r.try_consume_byte(b'+') {
            Occurs::OneOrMore
        } else {
            Occurs::One
        }
    }

    // AttlistDecl ::= '<!ATTLIST' S Name AttDef* S? '>'
    fn parse_attlist_decl(&mut self, parent: Node) -> Result<()> {
        self.r.consume_spaces()?;
        let (element_name, _) = self.r.consume_name()?;

        let mut defs = Vec::new();
        loop {
            self.r.skip_spaces();
            if self.r.try_consume_byte(b'>') {
                break;
            }
            defs.push(self.parse_attlist_def()?);
        }

        let decl = self.doc.create_attribute_list_decl(element_name, defs);
        self.doc.append_child(parent, decl)?;
        self.sax_other(decl)
    }

    // AttDef ::= S Name S AttType S DefaultDecl
    fn parse_attlist_def(&mut self) -> Result<AttlistDef> {
        let (name, _) = self.r.consume_name()?;
        let name = name.to_string();
        self.r.consume_spaces()?;

        let ty = if self.r.curr_byte()? == b'(' {
            AttlistType::Enumeration(self.parse_token_list()?)
        } else {
            let (type_name, pos) = self.r.consume_name()?;
            if type_name == "NOTATION" {
                self.r.consume_spaces()?;
                AttlistType::Notation(self.parse_token_list()?)
            } else {
                if self.opt.validate && !is_attlist_type(type_name) {
                    return Err(Error::InvalidName(pos));
                }
                AttlistType::Name(type_name.to_string())
            }
        };

        self.r.skip_spaces();
        let default = match self.r.curr_byte_or(b'>') {
            b'#' => {
                let (keyword, pos) = self.r.consume_decl_token()?;
                match keyword {
                    "#REQUIRED" => AttlistDefault::Required,
                    "#IMPLIED" => AttlistDefault::Implied,
                    "#FIXED" => {
                        self.r.consume_spaces()?;
                        let value = self.r.consume_literal()?;
                        AttlistDefault::Fixed(XmlString::encoded(value))
                    }
                    _ => {
                        return Err(Error::UnexpectedString {
                            expected: "#REQUIRED, #IMPLIED or #FIXED",
                            pos,
                        });
                    }
                }
            }
            b'"' | b'\'' => {
                let value = self.r.consume_literal()?;
                AttlistDefault::Value(XmlString::encoded(value))
            }
            _ => AttlistDefault::None,
        };

        Ok(AttlistDef { name, ty, default })
    }

    // '(' S? Nmtoken (S? '|' S? Nmtoken)* S? ')'
    fn parse_token_list(&mut self) -> Result<Vec<String>> {
        self.r.consume_byte(b'(', "'('")?;

        let mut items = Vec::new();
        loop {
            self.r.skip_spaces();
            let (item, _) = self.r.consume_nmtoken()?;
            items.push(item.to_string());
            self.r.skip_spaces();

            match self.r.curr_byte()? {
                b'|' => self.r.advance(1),
                b')' => {
                    self.r.advance(1);
                    return Ok(items);
                }
                c => {
                    return Err(Error::UnexpectedChar {
                        expected: "'|' or ')'",
                        found: c as char,
                        pos: self.r.text_pos(),
                    });
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // SAX hooks.

    fn sax_other(&mut self, node: Node) -> Result<()> {
        if !self.opt.use_sax {
            return Ok(());
        }

        if let Some(cb) = self.sax.on_other_node.as_mut() {
            if !cb(self.doc, node) {
                self.doc.detach_any(node)?;
            }
        }
        Ok(())
    }

    fn sax_attribute(&mut self, el: Node, attr: Node) -> Result<()> {
        if !self.opt.use_sax {
            return Ok(());
        }

        if let Some(cb) = self.sax.on_attribute.as_mut() {
            if !cb(self.doc, attr) {
                self.doc.remove_attribute(el, attr)?;
            }
        }
        Ok(())
    }

    fn sax_element_begin(&mut self, el: Node) -> Result<()> {
        if !self.opt.use_sax {
            return Ok(());
        }

        if let Some(cb) = self.sax.on_element_begin.as_mut() {
            let _ = cb(self.doc, el);
        }
        Ok(())
    }

    fn sax_element_end(&mut self, parent: Node, el: Node) -> Result<()> {
        if !self.opt.use_sax {
            return Ok(());
        }

        if let Some(cb) = self.sax.on_element_end.as_mut() {
            if !cb(self.doc, el) {
                self.doc.remove_child(parent, el)?;
            }
        }
        Ok(())
    }
}

fn full_name(prefix: &str, local: &str) -> String {
    if prefix.is_empty() {
        local.to_string()
    } else {
        format!("{}:{}", prefix, local)
    }
}

fn is_attlist_type(name: &str) -> bool {
    matches!(
        name,
        "CDATA" | "ID" | "IDREF" | "IDREFS" | "ENTITY" | "ENTITIES" | "NMTOKEN" | "NMTOKENS"
    )
}
