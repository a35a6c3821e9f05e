/*!
Parse, edit and serialize [XML 1.0](https://www.w3.org/TR/xml/) documents
as a mutable DOM tree.

The root points of the documentation are [`Document::parse`] and the
[`Node`] handle type.

A [`Document`] owns every node it creates; [`Node`] handles are cheap
copies that index into it. Parsing builds the tree through the same
factory and mutation operations that are available to callers, and the
[`XmlWriter`] renders the tree back to markup, optionally pretty-printed:

```
use domxml::Document;

let mut doc = Document::parse("<greeting to=\"world\"/>").unwrap();
let root = doc.document_element().unwrap();

let text = doc.create_text("hi");
root.append_child(&mut doc, text).unwrap();

assert_eq!(doc.to_xml_string(false).unwrap(), "<greeting to=\"world\">hi</greeting>");
```

Namespaces are handled structurally: qualified names are split at the
first `:` and the reserved `xml`/`xmlns` prefixes resolve to their fixed
URIs. No namespace well-formedness checking is performed beyond that.
*/

#![forbid(unsafe_code)]

mod buffer;
mod chars;
mod document;
mod dtd;
mod entity;
mod error;
mod list;
mod node;
mod parser;
mod reader;
mod symbol;
mod writer;

pub use buffer::{BufferPool, PooledBuffer};
pub use chars::is_all_xml_space;
pub use document::{names_equal_ignore_case, Document};
pub use dtd::{
    AttlistDef, AttlistDefault, AttlistType, ContentParticle, ContentSpec, Occurs, ParticleKind,
};
pub use entity::{escape, unescape, EncodeState, EntityTable, XmlString};
pub use error::{Error, Result};
pub use list::{ListMode, NodeFilter, NodeList};
pub use node::{ExternalId, Node, NodeType, QName};
pub use parser::{ParseOptions, SaxHandlers};
pub use reader::TextPos;
pub use symbol::SymbolTable;
pub use writer::XmlWriter;

/// The <http://www.w3.org/XML/1998/namespace> URI.
pub const NS_XML_URI: &str = "http://www.w3.org/XML/1998/namespace";

/// The <http://www.w3.org/2000/xmlns/> URI.
pub const NS_XMLNS_URI: &str = "http://www.w3.org/2000/xmlns/";
