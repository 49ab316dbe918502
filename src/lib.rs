//! osar — a pure-Rust Apple Event descriptor codec and OSA scripting bridge.
//!
//! This crate packs host values into the nested, tagged descriptor trees an
//! OSA scripting engine exchanges, and unpacks result trees back into host
//! values. The engine itself stays behind a trait; the crate owns the codec.
//!
//! # Architecture
//!
//! - **`aedesc`** — Descriptor packing/unpacking (tags, payloads, policies)
//! - **`types`** — Host values (`OsaValue`) and wire descriptors (`Descriptor`)
//! - **`engine`** — The `ScriptEngine` trait and `ScriptRequest`
//! - **`session`** — High-level pack/execute/unpack driver
//! - **`source`** — Script source assembly from snippets and files
//! - **`debug`** — Bounded execution transcript

pub mod aedesc;
pub mod debug;
pub mod engine;
pub mod error;
pub mod session;
pub mod source;
pub mod types;
