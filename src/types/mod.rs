//! OSA value types and the descriptor wire tree.

mod desc;
mod value;

pub use desc::{DescTag, Descriptor, Payload};
pub use value::{OsaRecord, OsaValue, TypeCode};

/// Descriptor type tags for the fixed value set.
pub mod tag {
    use super::DescTag;

    pub const TRUE: DescTag = DescTag::new(*b"true");
    pub const FALSE: DescTag = DescTag::new(*b"fals");
    pub const BOOLEAN: DescTag = DescTag::new(*b"bool");
    pub const INTEGER: DescTag = DescTag::new(*b"long");
    pub const NULL: DescTag = DescTag::new(*b"null");
    pub const TYPE: DescTag = DescTag::new(*b"type");
    pub const TEXT: DescTag = DescTag::new(*b"utxt");
    pub const LIST: DescTag = DescTag::new(*b"list");
    pub const RECORD: DescTag = DescTag::new(*b"reco");
    /// The synthetic wrapper keying record entries inside a `reco`.
    pub const USER_FIELDS: DescTag = DescTag::new(*b"usrf");
}
