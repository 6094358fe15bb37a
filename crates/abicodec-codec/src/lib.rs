//! # abicodec-codec
//!
//! The JSON ↔ canonical binary codec. Values are serialized against a
//! validated [`Schema`](abicodec_core::Schema) by walking the type
//! definition and the JSON value in lock-step; the wire grammar is
//! varuint32 lengths, little-endian fixed-width numerics, length-prefixed
//! strings, tagged variants, presence-byte optionals, and field-by-field
//! struct concatenation (base chain first).
//!
//! Also home of the bootstrap schema — the ABI describing the ABI
//! definition format itself — which makes packed-binary ABI loading
//! possible.

pub mod bootstrap;
pub mod de;
pub mod reader;
pub mod ser;
pub mod writer;

pub use bootstrap::{abi_schema, pack_abi, unpack_abi};
pub use de::{bin_to_json, hex_to_json};
pub use reader::BinReader;
pub use ser::{json_to_bin, json_to_hex};
pub use writer::BinWriter;
