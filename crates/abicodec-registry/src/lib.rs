//! # abicodec-registry
//!
//! The registry context tying the pieces together: a thread-safe map of
//! contract name → validated schema, the full conversion and lookup
//! surface, and the pull-style last-error slot host bindings rely on.

pub mod context;

pub use context::AbiRegistry;
