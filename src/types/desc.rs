//! The tagged descriptor tree that carries values on the wire.

use std::fmt;

use bytes::Bytes;

/// A 4-byte descriptor type tag (an OSType code such as `utxt` or `reco`).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DescTag(pub [u8; 4]);

impl DescTag {
    /// Builds a tag from a 4-byte code.
    pub const fn new(code: [u8; 4]) -> Self {
        Self(code)
    }

    /// The raw bytes of the tag.
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl From<[u8; 4]> for DescTag {
    fn from(code: [u8; 4]) -> Self {
        Self(code)
    }
}

impl fmt::Display for DescTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{b:02X}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for DescTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DescTag(\"{self}\")")
    }
}

/// Payload of a descriptor: raw bytes under leaf tags, an ordered sequence
/// of child descriptors under container tags.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Bytes(Bytes),
    Nodes(Vec<Descriptor>),
}

/// A node in the descriptor tree: a 4-byte type tag plus payload.
///
/// Descriptors are immutable, constructed fresh per pack/unpack call, and
/// carry no identity beyond their contents.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    pub tag: DescTag,
    pub payload: Payload,
}

impl Descriptor {
    /// Builds a leaf descriptor carrying raw payload bytes.
    pub fn leaf(tag: DescTag, data: impl Into<Bytes>) -> Self {
        Self {
            tag,
            payload: Payload::Bytes(data.into()),
        }
    }

    /// Builds a leaf descriptor with an empty payload (the `true`/`fals`/
    /// `null` encodings).
    pub fn empty(tag: DescTag) -> Self {
        Self::leaf(tag, Bytes::new())
    }

    /// Builds a container descriptor carrying child descriptors.
    pub fn node(tag: DescTag, children: Vec<Descriptor>) -> Self {
        Self {
            tag,
            payload: Payload::Nodes(children),
        }
    }

    /// Returns the raw bytes if this is a leaf descriptor.
    pub fn bytes(&self) -> Option<&Bytes> {
        match &self.payload {
            Payload::Bytes(b) => Some(b),
            Payload::Nodes(_) => None,
        }
    }

    /// Returns the child descriptors if this is a container descriptor.
    pub fn children(&self) -> Option<&[Descriptor]> {
        match &self.payload {
            Payload::Bytes(_) => None,
            Payload::Nodes(nodes) => Some(nodes),
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Payload::Bytes(b) if b.is_empty() => write!(f, "(\"{}\")", self.tag),
            Payload::Bytes(b) => write!(f, "(\"{}\" <{} bytes>)", self.tag, b.len()),
            Payload::Nodes(nodes) => {
                write!(f, "(\"{}\"", self.tag)?;
                for node in nodes {
                    write!(f, " {node}")?;
                }
                write!(f, ")")
            }
        }
    }
}
