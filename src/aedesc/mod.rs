//! Apple Event descriptor codec.
//!
//! A descriptor is a 4-byte type tag plus either raw payload bytes or a
//! list of child descriptors. Packing turns host values into that tree;
//! unpacking reverses it, either strictly or by preserving undecodable
//! subtrees as raw descriptors.

pub mod num;
pub mod pack;
pub mod text;
pub mod unpack;

pub use pack::pack_value;
pub use unpack::{unpack_value, UnpackOptions, UnpackPolicy, DEFAULT_MAX_DEPTH};
