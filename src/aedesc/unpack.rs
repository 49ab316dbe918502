//! Unpacking descriptor trees into host values.

use bytes::Bytes;

use crate::error::OsaError;
use crate::types::{tag, DescTag, Descriptor, OsaRecord, OsaValue, TypeCode};

use super::{num, text};

/// Default bound on descriptor nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// How decode failures are handled while unpacking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnpackPolicy {
    /// Any decode failure fails the whole unpack, annotated with the
    /// offending descriptor.
    #[default]
    Strict,
    /// A failing subtree is replaced by `OsaValue::Raw` holding the
    /// original descriptor; enclosing containers decode normally.
    Lenient,
}

/// Options threaded through an unpack call.
#[derive(Debug, Clone, Copy)]
pub struct UnpackOptions {
    pub policy: UnpackPolicy,
    /// Nesting depth past which a descriptor is rejected as malformed.
    pub max_depth: usize,
}

impl Default for UnpackOptions {
    fn default() -> Self {
        Self { policy: UnpackPolicy::Strict, max_depth: DEFAULT_MAX_DEPTH }
    }
}

impl UnpackOptions {
    /// Strict decoding with the default depth bound.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Lenient decoding with the default depth bound.
    pub fn lenient() -> Self {
        Self { policy: UnpackPolicy::Lenient, ..Self::default() }
    }
}

/// Unpacks a descriptor tree into a host value.
///
/// Under `UnpackPolicy::Lenient` no decode failure escapes: the failing
/// subtree is logged at debug level and preserved as `OsaValue::Raw`.
pub fn unpack_value(desc: &Descriptor, options: UnpackOptions) -> Result<OsaValue, OsaError> {
    unpack_at(desc, options, 0)
}

fn unpack_at(desc: &Descriptor, options: UnpackOptions, depth: usize) -> Result<OsaValue, OsaError> {
    match unpack_node(desc, options, depth) {
        Ok(value) => Ok(value),
        Err(e) if options.policy == UnpackPolicy::Lenient => {
            tracing::debug!(tag = %desc.tag, error = %e, "preserving undecodable descriptor");
            Ok(OsaValue::Raw(desc.clone()))
        }
        Err(e) => Err(e),
    }
}

fn unpack_node(desc: &Descriptor, options: UnpackOptions, depth: usize) -> Result<OsaValue, OsaError> {
    if depth > options.max_depth {
        return Err(OsaError::malformed("nesting exceeds maximum depth", desc));
    }
    match desc.tag {
        tag::TRUE => {
            require_empty(desc)?;
            Ok(OsaValue::Boolean(true))
        }
        tag::FALSE => {
            require_empty(desc)?;
            Ok(OsaValue::Boolean(false))
        }
        tag::BOOLEAN => unpack_boolean(desc),
        tag::INTEGER => unpack_integer(desc),
        tag::NULL => {
            require_bytes(desc)?;
            Ok(OsaValue::Null)
        }
        tag::TYPE => {
            let data = require_bytes(desc)?;
            if data.is_empty() {
                return Err(OsaError::malformed("type payload is empty", desc));
            }
            Ok(OsaValue::Type(TypeCode::from_code(data)))
        }
        tag::TEXT => unpack_text(desc),
        tag::LIST => unpack_list(desc, options, depth),
        tag::RECORD => unpack_record(desc, options, depth),
        _ => Err(OsaError::UnknownTag(desc.clone())),
    }
}

fn unpack_boolean(desc: &Descriptor) -> Result<OsaValue, OsaError> {
    let data = require_bytes(desc)?;
    match data.first() {
        Some(byte) => Ok(OsaValue::Boolean(*byte != 0)),
        None => Err(OsaError::malformed("boolean payload is empty", desc)),
    }
}

fn unpack_integer(desc: &Descriptor) -> Result<OsaValue, OsaError> {
    let data = require_bytes(desc)?;
    let bytes: &[u8; 4] = data
        .as_ref()
        .try_into()
        .map_err(|_| OsaError::malformed("integer payload is not 4 bytes", desc))?;
    Ok(OsaValue::Integer(num::decode_i32(bytes)))
}

fn unpack_text(desc: &Descriptor) -> Result<OsaValue, OsaError> {
    let data = require_bytes(desc)?;
    let decoded = text::decode_utf16(data).map_err(|reason| OsaError::malformed(reason, desc))?;
    Ok(OsaValue::Text(decoded))
}

fn unpack_list(desc: &Descriptor, options: UnpackOptions, depth: usize) -> Result<OsaValue, OsaError> {
    let children = require_children(desc)?;
    let items = children
        .iter()
        .map(|child| unpack_at(child, options, depth + 1))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(OsaValue::List(items))
}

/// Unwraps `("reco" ("usrf" ("list" ...)))` down to its entry list, then
/// normalizes the entries into ordered key/value pairs.
fn unpack_record(desc: &Descriptor, options: UnpackOptions, depth: usize) -> Result<OsaValue, OsaError> {
    let children = require_children(desc)?;
    let [wrapper] = children else {
        return Err(OsaError::malformed("record must hold exactly one user-field wrapper", desc));
    };
    if wrapper.tag != tag::USER_FIELDS {
        return Err(OsaError::malformed("record child is not a user-field wrapper", desc));
    }
    let inner = require_children(wrapper)?;
    let [list] = inner else {
        return Err(OsaError::malformed("user-field wrapper must hold exactly one list", desc));
    };
    if list.tag != tag::LIST {
        return Err(OsaError::malformed("user-field wrapper child is not a list", desc));
    }
    let entries = require_children(list)?;
    Ok(OsaValue::Record(unpack_pairs(entries, options, depth)?))
}

/// Collapses the two record entry encodings into pairs.
///
/// An entry carrying a recognized value tag is a packed key and must be
/// followed by its packed value; any other tag is a plain-key entry whose
/// tag text is the key and whose single child is the value.
fn unpack_pairs(entries: &[Descriptor], options: UnpackOptions, depth: usize) -> Result<OsaRecord, OsaError> {
    let mut pairs = Vec::new();
    let mut iter = entries.iter();
    while let Some(entry) = iter.next() {
        if is_value_tag(entry.tag) {
            let value = iter
                .next()
                .ok_or_else(|| OsaError::malformed("record key has no value", entry))?;
            let key = unpack_at(entry, options, depth + 1)?;
            pairs.push((key, unpack_at(value, options, depth + 1)?));
        } else {
            let children = require_children(entry)?;
            let [value] = children else {
                return Err(OsaError::malformed("plain-key entry must hold exactly one value", entry));
            };
            let key = OsaValue::Text(entry.tag.to_string());
            pairs.push((key, unpack_at(value, options, depth + 1)?));
        }
    }
    Ok(pairs)
}

fn is_value_tag(t: DescTag) -> bool {
    matches!(
        t,
        tag::TRUE
            | tag::FALSE
            | tag::BOOLEAN
            | tag::INTEGER
            | tag::NULL
            | tag::TYPE
            | tag::TEXT
            | tag::LIST
            | tag::RECORD
    )
}

fn require_bytes(desc: &Descriptor) -> Result<&Bytes, OsaError> {
    desc.bytes()
        .ok_or_else(|| OsaError::malformed("expected a raw byte payload", desc))
}

fn require_children(desc: &Descriptor) -> Result<&[Descriptor], OsaError> {
    desc.children()
        .ok_or_else(|| OsaError::malformed("expected child descriptors", desc))
}

fn require_empty(desc: &Descriptor) -> Result<(), OsaError> {
    let data = require_bytes(desc)?;
    if data.is_empty() {
        Ok(())
    } else {
        Err(OsaError::malformed("expected an empty payload", desc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aedesc::pack_value;

    fn strict(desc: &Descriptor) -> Result<OsaValue, OsaError> {
        unpack_value(desc, UnpackOptions::strict())
    }

    fn lenient(desc: &Descriptor) -> OsaValue {
        unpack_value(desc, UnpackOptions::lenient()).expect("lenient unpack never fails")
    }

    fn round_trip(value: OsaValue) {
        let desc = pack_value(&value).expect("pack failed");
        let back = strict(&desc).expect("unpack failed");
        assert_eq!(back, value);
    }

    #[test]
    fn round_trip_scalars() {
        round_trip(OsaValue::Null);
        round_trip(OsaValue::Boolean(true));
        round_trip(OsaValue::Boolean(false));
        round_trip(OsaValue::Integer(0));
        round_trip(OsaValue::Integer(i64::from(i32::MIN)));
        round_trip(OsaValue::Integer(i64::from(i32::MAX)));
        round_trip(OsaValue::Text(String::new()));
        round_trip(OsaValue::Text("ligne claire".into()));
        round_trip(OsaValue::Text("crab: \u{1F980}".into()));
    }

    #[test]
    fn round_trip_type_markers() {
        round_trip(OsaValue::Type(TypeCode::Missing));
        round_trip(OsaValue::Type(TypeCode::Null));
        round_trip(OsaValue::Type(TypeCode::Other("docf".into())));
    }

    #[test]
    fn round_trip_containers() {
        round_trip(OsaValue::List(vec![]));
        round_trip(OsaValue::List(vec![OsaValue::List(vec![OsaValue::List(vec![])])]));
        round_trip(OsaValue::List(vec![
            OsaValue::Boolean(false),
            OsaValue::Integer(-7),
            OsaValue::Text("mixed".into()),
            OsaValue::Null,
        ]));
        round_trip(OsaValue::Record(vec![]));
        round_trip(OsaValue::Record(vec![
            (OsaValue::Text("name".into()), OsaValue::Text("osar".into())),
            (OsaValue::Text("count".into()), OsaValue::Integer(3)),
        ]));
        round_trip(OsaValue::Record(vec![(
            OsaValue::Integer(1),
            OsaValue::Record(vec![(OsaValue::Text("inner".into()), OsaValue::Boolean(true))]),
        )]));
    }

    #[test]
    fn boolean_payload_first_byte_decides() {
        let desc = Descriptor::leaf(tag::BOOLEAN, vec![0xFF]);
        assert_eq!(strict(&desc).unwrap(), OsaValue::Boolean(true));

        let desc = Descriptor::leaf(tag::BOOLEAN, vec![0x00]);
        assert_eq!(strict(&desc).unwrap(), OsaValue::Boolean(false));

        let desc = Descriptor::leaf(tag::BOOLEAN, vec![0x00, 0x07]);
        assert_eq!(strict(&desc).unwrap(), OsaValue::Boolean(false));

        let desc = Descriptor::leaf(tag::BOOLEAN, vec![0x01, 0x00]);
        assert_eq!(strict(&desc).unwrap(), OsaValue::Boolean(true));
    }

    #[test]
    fn empty_boolean_payload_is_malformed() {
        let desc = Descriptor::empty(tag::BOOLEAN);
        assert!(matches!(strict(&desc), Err(OsaError::MalformedDescriptor { .. })));
    }

    #[test]
    fn boolean_constants_reject_payload_bytes() {
        let desc = Descriptor::leaf(tag::TRUE, vec![0x01]);
        assert!(matches!(strict(&desc), Err(OsaError::MalformedDescriptor { .. })));

        let desc = Descriptor::leaf(tag::FALSE, vec![0x00]);
        assert!(matches!(strict(&desc), Err(OsaError::MalformedDescriptor { .. })));
    }

    #[test]
    fn integer_payload_exact_bytes() {
        let desc = Descriptor::leaf(tag::INTEGER, vec![0x2A, 0x00, 0x00, 0x00]);
        assert_eq!(strict(&desc).unwrap(), OsaValue::Integer(42));

        let desc = Descriptor::leaf(tag::INTEGER, vec![0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(strict(&desc).unwrap(), OsaValue::Integer(-1));

        let desc = Descriptor::leaf(tag::INTEGER, vec![0x00, 0x00, 0x00, 0x80]);
        assert_eq!(strict(&desc).unwrap(), OsaValue::Integer(i64::from(i32::MIN)));
    }

    #[test]
    fn integer_payload_wrong_length_is_malformed() {
        for payload in [vec![], vec![0x01], vec![0x01, 0x02, 0x03], vec![0x01, 0x02, 0x03, 0x04, 0x05]] {
            let desc = Descriptor::leaf(tag::INTEGER, payload);
            let err = strict(&desc).unwrap_err();
            assert!(matches!(err, OsaError::MalformedDescriptor { ref desc, .. } if desc.tag == tag::INTEGER));
        }
    }

    #[test]
    fn null_ignores_payload_bytes() {
        assert_eq!(strict(&Descriptor::empty(tag::NULL)).unwrap(), OsaValue::Null);
        let desc = Descriptor::leaf(tag::NULL, vec![0xDE, 0xAD]);
        assert_eq!(strict(&desc).unwrap(), OsaValue::Null);
    }

    #[test]
    fn text_byte_order_marks() {
        let plain = Descriptor::leaf(tag::TEXT, vec![0x74, 0x00, 0x65, 0x00, 0x73, 0x00, 0x74, 0x00]);
        assert_eq!(strict(&plain).unwrap(), OsaValue::Text("test".into()));

        let big = Descriptor::leaf(
            tag::TEXT,
            vec![0xFE, 0xFF, 0x00, 0x74, 0x00, 0x65, 0x00, 0x73, 0x00, 0x74],
        );
        assert_eq!(strict(&big).unwrap(), OsaValue::Text("test".into()));

        let little = Descriptor::leaf(
            tag::TEXT,
            vec![0xFF, 0xFE, 0x74, 0x00, 0x65, 0x00, 0x73, 0x00, 0x74, 0x00],
        );
        assert_eq!(strict(&little).unwrap(), OsaValue::Text("test".into()));
    }

    #[test]
    fn odd_length_text_is_malformed() {
        let desc = Descriptor::leaf(tag::TEXT, vec![0x74, 0x00, 0x65]);
        assert!(matches!(strict(&desc), Err(OsaError::MalformedDescriptor { .. })));
    }

    #[test]
    fn type_payload_codes() {
        let desc = Descriptor::leaf(tag::TYPE, Bytes::from_static(b"gnsm"));
        assert_eq!(strict(&desc).unwrap(), OsaValue::Type(TypeCode::Missing));

        let desc = Descriptor::leaf(tag::TYPE, Bytes::from_static(b"llun"));
        assert_eq!(strict(&desc).unwrap(), OsaValue::Type(TypeCode::Null));

        let desc = Descriptor::leaf(tag::TYPE, Bytes::from_static(b"unknown"));
        assert_eq!(strict(&desc).unwrap(), OsaValue::Type(TypeCode::Other("unknown".into())));
    }

    #[test]
    fn empty_type_payload_is_malformed() {
        let desc = Descriptor::empty(tag::TYPE);
        assert!(matches!(strict(&desc), Err(OsaError::MalformedDescriptor { .. })));
    }

    #[test]
    fn unknown_tag_strict_and_lenient() {
        let desc = Descriptor::leaf(DescTag::new(*b"doub"), vec![0x00; 8]);
        assert!(matches!(strict(&desc), Err(OsaError::UnknownTag(_))));
        assert_eq!(lenient(&desc), OsaValue::Raw(desc));
    }

    #[test]
    fn lenient_preserves_failing_subtree_only() {
        let desc = Descriptor::node(
            tag::LIST,
            vec![
                Descriptor::empty(tag::TRUE),
                Descriptor::leaf(DescTag::new(*b"doub"), vec![0x00; 8]),
                Descriptor::leaf(tag::INTEGER, vec![0x07, 0x00, 0x00, 0x00]),
            ],
        );
        let OsaValue::List(items) = lenient(&desc) else { panic!("expected a list") };
        assert_eq!(items[0], OsaValue::Boolean(true));
        assert!(matches!(items[1], OsaValue::Raw(ref raw) if raw.tag == DescTag::new(*b"doub")));
        assert_eq!(items[2], OsaValue::Integer(7));
    }

    #[test]
    fn lenient_never_fails_on_garbage() {
        let shapes = [
            Descriptor::leaf(tag::INTEGER, vec![0x01]),
            Descriptor::leaf(tag::LIST, vec![0x01]),
            Descriptor::node(tag::INTEGER, vec![]),
            Descriptor::node(tag::RECORD, vec![Descriptor::empty(tag::TRUE)]),
        ];
        for desc in shapes {
            assert_eq!(lenient(&desc), OsaValue::Raw(desc));
        }
    }

    #[test]
    fn structural_mismatch_is_malformed() {
        let desc = Descriptor::leaf(tag::LIST, vec![0x01]);
        assert!(matches!(strict(&desc), Err(OsaError::MalformedDescriptor { .. })));

        let desc = Descriptor::node(tag::INTEGER, vec![]);
        assert!(matches!(strict(&desc), Err(OsaError::MalformedDescriptor { .. })));

        let desc = Descriptor::node(tag::NULL, vec![]);
        assert!(matches!(strict(&desc), Err(OsaError::MalformedDescriptor { .. })));
    }

    #[test]
    fn record_plain_key_entries() {
        let entry = Descriptor::node(DescTag::new(*b"pnam"), vec![Descriptor::empty(tag::TRUE)]);
        let desc = Descriptor::node(
            tag::RECORD,
            vec![Descriptor::node(tag::USER_FIELDS, vec![Descriptor::node(tag::LIST, vec![entry])])],
        );
        let OsaValue::Record(pairs) = strict(&desc).unwrap() else { panic!("expected a record") };
        assert_eq!(pairs, vec![(OsaValue::Text("pnam".into()), OsaValue::Boolean(true))]);
    }

    #[test]
    fn record_mixes_both_entry_encodings() {
        let packed_key = Descriptor::leaf(tag::TEXT, vec![0x6B, 0x00]);
        let packed_val = Descriptor::leaf(tag::INTEGER, vec![0x01, 0x00, 0x00, 0x00]);
        let plain = Descriptor::node(DescTag::new(*b"pnam"), vec![Descriptor::empty(tag::FALSE)]);
        let desc = Descriptor::node(
            tag::RECORD,
            vec![Descriptor::node(
                tag::USER_FIELDS,
                vec![Descriptor::node(tag::LIST, vec![packed_key, packed_val, plain])],
            )],
        );
        let OsaValue::Record(pairs) = strict(&desc).unwrap() else { panic!("expected a record") };
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], (OsaValue::Text("k".into()), OsaValue::Integer(1)));
        assert_eq!(pairs[1], (OsaValue::Text("pnam".into()), OsaValue::Boolean(false)));
    }

    #[test]
    fn record_key_without_value_is_malformed() {
        let desc = Descriptor::node(
            tag::RECORD,
            vec![Descriptor::node(
                tag::USER_FIELDS,
                vec![Descriptor::node(tag::LIST, vec![Descriptor::empty(tag::TRUE)])],
            )],
        );
        assert!(matches!(strict(&desc), Err(OsaError::MalformedDescriptor { .. })));
    }

    #[test]
    fn record_bad_wrapper_shapes_are_malformed() {
        // No user-field wrapper at all.
        let desc = Descriptor::node(tag::RECORD, vec![]);
        assert!(matches!(strict(&desc), Err(OsaError::MalformedDescriptor { .. })));

        // Wrong wrapper tag.
        let desc = Descriptor::node(tag::RECORD, vec![Descriptor::node(tag::LIST, vec![])]);
        assert!(matches!(strict(&desc), Err(OsaError::MalformedDescriptor { .. })));

        // Wrapper holds bytes instead of a list.
        let desc = Descriptor::node(tag::RECORD, vec![Descriptor::leaf(tag::USER_FIELDS, vec![0x00])]);
        assert!(matches!(strict(&desc), Err(OsaError::MalformedDescriptor { .. })));

        // Plain-key entry with two values.
        let entry = Descriptor::node(
            DescTag::new(*b"pnam"),
            vec![Descriptor::empty(tag::TRUE), Descriptor::empty(tag::FALSE)],
        );
        let desc = Descriptor::node(
            tag::RECORD,
            vec![Descriptor::node(tag::USER_FIELDS, vec![Descriptor::node(tag::LIST, vec![entry])])],
        );
        assert!(matches!(strict(&desc), Err(OsaError::MalformedDescriptor { .. })));
    }

    #[test]
    fn depth_limit_rejects_runaway_nesting() {
        let mut desc = Descriptor::node(tag::LIST, vec![]);
        for _ in 0..200 {
            desc = Descriptor::node(tag::LIST, vec![desc]);
        }
        assert!(matches!(strict(&desc), Err(OsaError::MalformedDescriptor { .. })));
    }

    #[test]
    fn depth_limit_is_configurable() {
        let two_deep = Descriptor::node(
            tag::LIST,
            vec![Descriptor::node(tag::LIST, vec![Descriptor::node(tag::LIST, vec![])])],
        );
        let tight = UnpackOptions { max_depth: 2, ..UnpackOptions::strict() };
        assert!(strict(&two_deep).is_ok());
        assert!(unpack_value(&two_deep, tight).is_ok());

        let three_deep = Descriptor::node(tag::LIST, vec![two_deep]);
        assert!(matches!(
            unpack_value(&three_deep, tight),
            Err(OsaError::MalformedDescriptor { .. })
        ));
    }

    #[test]
    fn lenient_depth_overflow_becomes_raw() {
        let deep = Descriptor::node(
            tag::LIST,
            vec![Descriptor::node(tag::LIST, vec![Descriptor::node(tag::LIST, vec![])])],
        );
        let options = UnpackOptions { policy: UnpackPolicy::Lenient, max_depth: 1 };
        let OsaValue::List(outer) = unpack_value(&deep, options).unwrap() else {
            panic!("expected a list");
        };
        let OsaValue::List(inner) = &outer[0] else { panic!("expected a nested list") };
        assert!(matches!(inner[0], OsaValue::Raw(_)));
    }

    #[test]
    fn malformed_error_carries_offending_descriptor() {
        let bad = Descriptor::leaf(tag::INTEGER, vec![0x01, 0x02]);
        let desc = Descriptor::node(tag::LIST, vec![Descriptor::empty(tag::NULL), bad.clone()]);
        match strict(&desc) {
            Err(OsaError::MalformedDescriptor { desc: offending, .. }) => assert_eq!(offending, bad),
            other => panic!("expected a malformed error, got {other:?}"),
        }
    }
}
