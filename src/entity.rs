//! The entity table and escape-aware string storage.

use std::borrow::Cow;
use std::collections::HashMap;

/// Maps entity names to their replacement text.
///
/// A fresh table knows the five predefined entities. DOCTYPE parsing adds
/// the general entities it declares.
#[derive(Clone, Debug)]
pub struct EntityTable {
    map: HashMap<Box<str>, Box<str>>,
}

impl EntityTable {
    pub fn new() -> Self {
        let mut map = HashMap::with_capacity(8);
        map.insert("lt".into(), "<".into());
        map.insert("gt".into(), ">".into());
        map.insert("amp".into(), "&".into());
        map.insert("apos".into(), "'".into());
        map.insert("quot".into(), "\"".into());
        EntityTable { map }
    }

    /// Returns the replacement text for `name`, if declared.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(name).map(|v| v.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Declares or redefines an entity.
    pub fn insert(&mut self, name: &str, value: &str) {
        self.map.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for EntityTable {
    fn default() -> Self {
        EntityTable::new()
    }
}

/// How the text held by an [`XmlString`] relates to the predefined escapes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EncodeState {
    /// Verbatim text, known to contain no escapes.
    Raw,
    /// Escapes already applied; written out as-is.
    Encoded,
    /// Not analyzed yet.
    Check,
    /// Escapes resolved; must be encoded on write.
    Decoded,
}

/// Owned text plus its [`EncodeState`].
///
/// The state makes encode-on-write cheap: an `Encoded` value is returned
/// unchanged without rescanning it.
#[derive(Clone, PartialEq, Debug)]
pub struct XmlString {
    text: String,
    state: EncodeState,
}

impl XmlString {
    pub fn decoded(text: impl Into<String>) -> Self {
        XmlString {
            text: text.into(),
            state: EncodeState::Decoded,
        }
    }

    pub fn encoded(text: impl Into<String>) -> Self {
        XmlString {
            text: text.into(),
            state: EncodeState::Encoded,
        }
    }

    pub fn raw(text: impl Into<String>) -> Self {
        XmlString {
            text: text.into(),
            state: EncodeState::Raw,
        }
    }

    pub fn check(text: impl Into<String>) -> Self {
        XmlString {
            text: text.into(),
            state: EncodeState::Check,
        }
    }

    /// The stored text, exactly as held.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn state(&self) -> EncodeState {
        self.state
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The text as it must appear in serialized markup.
    pub fn escaped(&self) -> Cow<'_, str> {
        match self.state {
            EncodeState::Encoded => Cow::Borrowed(&self.text),
            _ => escape(&self.text),
        }
    }

    /// The text with escapes resolved, for reading through the DOM.
    ///
    /// References to entities missing from `entities` are left intact.
    pub fn unescaped<'a>(&'a self, entities: &EntityTable) -> Cow<'a, str> {
        match self.state {
            EncodeState::Raw | EncodeState::Decoded => Cow::Borrowed(&self.text),
            _ => unescape(&self.text, entities),
        }
    }
}

/// Replaces the five special characters with the predefined entities.
///
/// Returns the input unchanged when it contains none of them.
pub fn escape(text: &str) -> Cow<'_, str> {
    fn is_special(b: u8) -> bool {
        matches!(b, b'&' | b'<' | b'>' | b'\'' | b'"')
    }

    if !text.bytes().any(is_special) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Resolves character and entity references against `entities`.
///
/// Malformed references and references to unknown entities are copied
/// through verbatim; strict resolution happens in the parser, which knows
/// source positions.
pub fn unescape<'a>(text: &'a str, entities: &EntityTable) -> Cow<'a, str> {
    if !text.bytes().any(|b| b == b'&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let semi = match rest.find(';') {
            Some(n) => n,
            None => break,
        };

        match decode_reference(&rest[1..semi], entities) {
            Some(decoded) => {
                out.push_str(&decoded);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Decodes the inside of one `&…;` reference.
fn decode_reference(body: &str, entities: &EntityTable) -> Option<String> {
    if let Some(num) = body.strip_prefix('#') {
        let code = if let Some(hex) = num.strip_prefix('x') {
            u32::from_str_radix(hex, 16).ok()?
        } else {
            num.parse::<u32>().ok()?
        };
        return char::from_u32(code).map(String::from);
    }

    entities.get(body).map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predefined_seeded() {
        let table = EntityTable::new();
        assert_eq!(table.get("lt"), Some("<"));
        assert_eq!(table.get("gt"), Some(">"));
        assert_eq!(table.get("amp"), Some("&"));
        assert_eq!(table.get("apos"), Some("'"));
        assert_eq!(table.get("quot"), Some("\""));
        assert_eq!(table.get("nbsp"), None);
    }

    #[test]
    fn escape_plain_is_borrowed() {
        assert!(matches!(escape("plain text"), Cow::Borrowed(_)));
    }

    #[test]
    fn escape_specials() {
        assert_eq!(escape("&<>'\""), "&amp;&lt;&gt;&apos;&quot;");
    }

    #[test]
    fn unescape_round_trip() {
        let table = EntityTable::new();
        let v = "a & b < c > d ' e \" f";
        assert_eq!(unescape(&escape(v), &table), v);
    }

    #[test]
    fn unescape_numeric() {
        let table = EntityTable::new();
        assert_eq!(unescape("&#65;&#x42;", &table), "AB");
    }

    #[test]
    fn unescape_unknown_left_intact() {
        let table = EntityTable::new();
        assert_eq!(unescape("&nope;", &table), "&nope;");
    }

    #[test]
    fn unescape_custom() {
        let mut table = EntityTable::new();
        table.insert("r", "replacement");
        assert_eq!(unescape("x &r; y", &table), "x replacement y");
    }

    #[test]
    fn encoded_state_skips_rescan() {
        let s = XmlString::encoded("&amp;");
        assert!(matches!(s.escaped(), Cow::Borrowed(_)));
        assert_eq!(s.escaped(), "&amp;");
    }

    #[test]
    fn decoded_state_encodes_on_write() {
        let s = XmlString::decoded("a & b");
        assert_eq!(s.escaped(), "a &amp; b");
    }
}
