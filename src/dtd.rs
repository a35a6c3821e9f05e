//! Payloads of the DTD declaration nodes.

use std::fmt;

use crate::entity::XmlString;

/// One attribute definition inside an `<!ATTLIST …>` declaration.
#[derive(Clone, PartialEq, Debug)]
pub struct AttlistDef {
    pub name: String,
    pub ty: AttlistType,
    pub default: AttlistDefault,
}

#[derive(Clone, PartialEq, Debug)]
pub enum AttlistType {
    /// A plain type name: `CDATA`, `ID`, `IDREF`, `NMTOKEN`, …
    Name(String),
    /// `( item | item | … )`
    Enumeration(Vec<String>),
    /// `NOTATION ( name | name | … )`
    Notation(Vec<String>),
}

#[derive(Clone, PartialEq, Debug)]
pub enum AttlistDefault {
    None,
    Required,
    Implied,
    /// `#FIXED "value"`
    Fixed(XmlString),
    /// A bare quoted default value.
    Value(XmlString),
}

impl fmt::Display for AttlistType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fn list(f: &mut fmt::Formatter, items: &[String]) -> fmt::Result {
            f.write_str("(")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str("|")?;
                }
                f.write_str(item)?;
            }
            f.write_str(")")
        }

        match self {
            AttlistType::Name(name) => f.write_str(name),
            AttlistType::Enumeration(items) => list(f, items),
            AttlistType::Notation(items) => {
                f.write_str("NOTATION ")?;
                list(f, items)
            }
        }
    }
}

/// The content model of an `<!ELEMENT …>` declaration.
#[derive(Clone, PartialEq, Debug)]
pub enum ContentSpec {
    Any,
    Empty,
    Particle(ContentParticle),
}

/// A node of the element-content choice tree. Nesting is unbounded.
#[derive(Clone, PartialEq, Debug)]
pub struct ContentParticle {
    pub kind: ParticleKind,
    pub occurs: Occurs,
}

#[derive(Clone, PartialEq, Debug)]
pub enum ParticleKind {
    /// A name atom, including `#PCDATA`.
    Name(String),
    /// `( a | b | … )`
    Choice(Vec<ContentParticle>),
    /// `( a , b , … )`
    Sequence(Vec<ContentParticle>),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Occurs {
    One,
    Optional,
    ZeroOrMore,
    OneOrMore,
}

impl Occurs {
    pub fn indicator(self) -> Option<char> {
        match self {
            Occurs::One => None,
            Occurs::Optional => Some('?'),
            Occurs::ZeroOrMore => Some('*'),
            Occurs::OneOrMore => Some('+'),
        }
    }
}

impl fmt::Display for ContentSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ContentSpec::Any => f.write_str("ANY"),
            ContentSpec::Empty => f.write_str("EMPTY"),
            ContentSpec::Particle(p) => p.fmt(f),
        }
    }
}

impl fmt::Display for ContentParticle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            ParticleKind::Name(name) => f.write_str(name)?,
            ParticleKind::Choice(items) | ParticleKind::Sequence(items) => {
                let sep = match self.kind {
                    ParticleKind::Choice(_) => "|",
                    _ => ",",
                };
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(sep)?;
                    }
                    item.fmt(f)?;
                }
                f.write_str(")")?;
            }
        }

        if let Some(c) = self.occurs.indicator() {
            write!(f, "{}", c)?;
        }

        Ok(())
    }
}
