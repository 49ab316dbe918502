//! Packing host values into descriptor trees.

use bytes::Bytes;

use crate::error::OsaError;
use crate::types::{tag, Descriptor, OsaValue, TypeCode};

use super::{num, text};

/// Packs a host value into its descriptor tree.
///
/// Packing fails loudly: out-of-range integers and values with no wire
/// form are errors, never silently coerced.
pub fn pack_value(value: &OsaValue) -> Result<Descriptor, OsaError> {
    match value {
        OsaValue::Null => Ok(Descriptor::empty(tag::NULL)),
        OsaValue::Boolean(true) => Ok(Descriptor::empty(tag::TRUE)),
        OsaValue::Boolean(false) => Ok(Descriptor::empty(tag::FALSE)),
        OsaValue::Integer(i) => pack_integer(*i),
        OsaValue::Text(s) => Ok(pack_text(s)),
        OsaValue::Type(code) => Ok(pack_type(code)),
        OsaValue::List(items) => pack_list(items),
        OsaValue::Record(pairs) => pack_record(pairs),
        OsaValue::Raw(_) => Err(OsaError::UnsupportedValue(value.clone())),
    }
}

fn pack_integer(value: i64) -> Result<Descriptor, OsaError> {
    let data = num::encode_i32(value)?;
    Ok(Descriptor::leaf(tag::INTEGER, Bytes::copy_from_slice(&data)))
}

fn pack_text(value: &str) -> Descriptor {
    Descriptor::leaf(tag::TEXT, text::encode_utf16le(value))
}

fn pack_type(code: &TypeCode) -> Descriptor {
    Descriptor::leaf(tag::TYPE, Bytes::copy_from_slice(code.code()))
}

fn pack_list(items: &[OsaValue]) -> Result<Descriptor, OsaError> {
    let children = items.iter().map(pack_value).collect::<Result<Vec<_>, _>>()?;
    Ok(Descriptor::node(tag::LIST, children))
}

/// Packs record pairs through the user-field wrapper:
/// `("reco" ("usrf" ("list" key value ...)))`.
fn pack_record(pairs: &[(OsaValue, OsaValue)]) -> Result<Descriptor, OsaError> {
    let mut entries = Vec::with_capacity(pairs.len() * 2);
    for (key, value) in pairs {
        entries.push(pack_value(key)?);
        entries.push(pack_value(value)?);
    }
    let fields = Descriptor::node(tag::USER_FIELDS, vec![Descriptor::node(tag::LIST, entries)]);
    Ok(Descriptor::node(tag::RECORD, vec![fields]))
}
