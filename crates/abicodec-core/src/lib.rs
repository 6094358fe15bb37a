//! # abicodec-core
//!
//! Core types shared across all AbiCodec crates: the 64-bit name codec,
//! symbol/asset and time-point text forms, the ABI document model, and the
//! resolved per-contract schema the binary codec walks.

pub mod abi;
pub mod asset;
pub mod error;
pub mod name;
pub mod schema;
pub mod time;

pub use abi::AbiDef;
pub use asset::{Asset, Symbol, SymbolCode};
pub use error::{AbiError, CodecError, NotFoundError, SchemaError};
pub use name::Name;
pub use schema::{Builtin, ResolvedBase, Schema, TypeSuffix};
pub use time::{BlockTimestamp, TimePoint, TimePointSec};
