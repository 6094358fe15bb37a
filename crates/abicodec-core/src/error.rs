//! Error types for the AbiCodec schema and codec pipeline.

use thiserror::Error;

/// Errors raised while parsing or validating an ABI definition.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid ABI JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported ABI version '{version}'")]
    UnsupportedVersion { version: String },

    #[error("duplicate definition of type '{name}'")]
    DuplicateType { name: String },

    #[error("type '{ty}' referenced by '{referenced_by}' does not resolve")]
    UnresolvedType { ty: String, referenced_by: String },

    #[error("cyclic type alias involving '{ty}'")]
    CyclicAlias { ty: String },

    #[error("cyclic base chain involving struct '{name}'")]
    CyclicBase { name: String },

    #[error("non-extension field follows a binary-extension field in struct '{name}'")]
    BadExtensionOrder { name: String },

    #[error("invalid packed ABI: {reason}")]
    InvalidPackedAbi { reason: String },
}

/// Lookup failures against the contract registry.
#[derive(Debug, Error)]
pub enum NotFoundError {
    #[error("contract '{contract}' has no loaded ABI")]
    Contract { contract: String },

    #[error("action '{action}' not found in ABI for contract '{contract}'")]
    Action { contract: String, action: String },

    #[error("table '{table}' not found in ABI for contract '{contract}'")]
    Table { contract: String, table: String },
}

/// Errors raised while converting between JSON and the binary encoding.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("unknown type '{ty}'")]
    UnknownType { ty: String },

    #[error("expected {expected} for '{field}', got {got}")]
    Mismatch {
        field: String,
        expected: String,
        got: String,
    },

    #[error("missing field '{field}'")]
    MissingField { field: String },

    #[error("value '{value}' out of range for {ty}")]
    OutOfRange { ty: String, value: String },

    #[error("expected {expected}, got '{got}'")]
    Expected { expected: &'static str, got: String },

    #[error("variant '{variant}' has no alternative named '{alternative}'")]
    UnknownAlternative { variant: String, alternative: String },

    #[error("variant '{variant}' index {index} out of range")]
    BadVariantIndex { variant: String, index: u32 },

    #[error("field '{field}' set after an omitted binary extension")]
    ExtensionGap { field: String },

    #[error("unexpected field '{field}'")]
    UnexpectedField { field: String },

    #[error("unexpected end of input reading {what}")]
    UnexpectedEnd { what: String },

    #[error("invalid presence byte {value:#04x} for optional")]
    BadPresenceByte { value: u8 },

    #[error("varuint32 overflow")]
    VaruintOverflow,

    #[error("{count} trailing byte(s) after value")]
    TrailingBytes { count: usize },

    #[error("invalid hex input: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("invalid JSON payload: {reason}")]
    InvalidJson { reason: String },

    #[error("invalid UTF-8 in string payload")]
    Utf8,
}

/// Umbrella error returned by the registry context surface.
#[derive(Debug, Error)]
pub enum AbiError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}
