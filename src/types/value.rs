//! OSA value types.

use std::fmt;

use super::desc::Descriptor;

/// Type alias for OSA records (ordered key/value pairs; any value may key).
pub type OsaRecord = Vec<(OsaValue, OsaValue)>;

/// A value in the OSA bridge domain, corresponding to Apple Event
/// descriptor types.
#[derive(Debug, Clone, PartialEq)]
pub enum OsaValue {
    /// An explicit OSA null result, distinct from "no value".
    Null,
    Boolean(bool),
    /// Signed integer; must fit the 32-bit wire range at pack time.
    Integer(i64),
    Text(String),
    List(Vec<OsaValue>),
    /// Ordered key/value pairs; wire order is preserved in both directions.
    Record(OsaRecord),
    /// A symbolic type marker (`missing value`, the null type, or an
    /// opaque code).
    Type(TypeCode),
    /// A descriptor the lenient decoder could not interpret, held verbatim.
    Raw(Descriptor),
}

impl OsaValue {
    /// Returns the value as a string reference, if it is a `Text` variant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as an i64, if it is an `Integer` variant.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a bool, if it is a `Boolean` variant.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

// -- Type markers --

/// Symbolic OSA type markers and their wire codes.
///
/// `Missing` and `Null` are two distinct well-known aliases, both logically
/// "the null/missing OSA type"; any other code is preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeCode {
    /// The `missing value` marker (wire code `gnsm`).
    Missing,
    /// The null type marker (wire code `llun`).
    Null,
    /// Any other type code, carried as opaque text.
    Other(String),
}

impl TypeCode {
    /// The marker's wire code bytes.
    pub fn code(&self) -> &[u8] {
        match self {
            Self::Missing => b"gnsm",
            Self::Null => b"llun",
            Self::Other(code) => code.as_bytes(),
        }
    }

    /// Maps wire code bytes back to a marker, preserving unknown codes.
    pub fn from_code(code: &[u8]) -> Self {
        match code {
            b"gnsm" => Self::Missing,
            b"llun" => Self::Null,
            other => Self::Other(String::from_utf8_lossy(other).into_owned()),
        }
    }
}

// -- Convenience conversions --

impl From<bool> for OsaValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i64> for OsaValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for OsaValue {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<String> for OsaValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for OsaValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<Vec<OsaValue>> for OsaValue {
    fn from(v: Vec<OsaValue>) -> Self {
        Self::List(v)
    }
}

impl From<OsaRecord> for OsaValue {
    fn from(r: OsaRecord) -> Self {
        Self::Record(r)
    }
}

impl From<TypeCode> for OsaValue {
    fn from(t: TypeCode) -> Self {
        Self::Type(t)
    }
}

impl fmt::Display for OsaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Text(s) => write!(f, "\"{s}\""),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Record(pairs) => {
                write!(f, "{{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
            Self::Type(TypeCode::Missing) => write!(f, "missing value"),
            Self::Type(TypeCode::Null) => write!(f, "<null type>"),
            Self::Type(TypeCode::Other(code)) => write!(f, "<type {code}>"),
            Self::Raw(desc) => write!(f, "{desc}"),
        }
    }
}
