//! The bootstrap schema: an ABI describing the ABI definition format
//! itself. Loading a contract ABI from its packed binary form decodes the
//! blob with this schema first, then goes through the normal JSON path.
//!
//! `variants` and `action_results` are binary extensions — blobs packed by
//! older toolchains simply end before them and still load.

use abicodec_core::{AbiDef, CodecError, Schema, SchemaError};
use serde_json::Value;
use std::sync::OnceLock;

const ABI_BOOTSTRAP_JSON: &str = r#"{
    "version": "eosio::abi/1.1",
    "structs": [
        {"name": "type_def", "base": "", "fields": [
            {"name": "new_type_name", "type": "string"},
            {"name": "type", "type": "string"}
        ]},
        {"name": "field_def", "base": "", "fields": [
            {"name": "name", "type": "string"},
            {"name": "type", "type": "string"}
        ]},
        {"name": "struct_def", "base": "", "fields": [
            {"name": "name", "type": "string"},
            {"name": "base", "type": "string"},
            {"name": "fields", "type": "field_def[]"}
        ]},
        {"name": "action_def", "base": "", "fields": [
            {"name": "name", "type": "name"},
            {"name": "type", "type": "string"},
            {"name": "ricardian_contract", "type": "string"}
        ]},
        {"name": "table_def", "base": "", "fields": [
            {"name": "name", "type": "name"},
            {"name": "index_type", "type": "string"},
            {"name": "key_names", "type": "string[]"},
            {"name": "key_types", "type": "string[]"},
            {"name": "type", "type": "string"}
        ]},
        {"name": "clause_pair", "base": "", "fields": [
            {"name": "id", "type": "string"},
            {"name": "body", "type": "string"}
        ]},
        {"name": "error_message", "base": "", "fields": [
            {"name": "error_code", "type": "uint64"},
            {"name": "error_msg", "type": "string"}
        ]},
        {"name": "extensions_entry", "base": "", "fields": [
            {"name": "tag", "type": "uint16"},
            {"name": "data", "type": "bytes"}
        ]},
        {"name": "variant_def", "base": "", "fields": [
            {"name": "name", "type": "string"},
            {"name": "types", "type": "string[]"}
        ]},
        {"name": "action_result_def", "base": "", "fields": [
            {"name": "name", "type": "name"},
            {"name": "result_type", "type": "string"}
        ]},
        {"name": "abi_def", "base": "", "fields": [
            {"name": "version", "type": "string"},
            {"name": "types", "type": "type_def[]"},
            {"name": "structs", "type": "struct_def[]"},
            {"name": "actions", "type": "action_def[]"},
            {"name": "tables", "type": "table_def[]"},
            {"name": "ricardian_clauses", "type": "clause_pair[]"},
            {"name": "error_messages", "type": "error_message[]"},
            {"name": "abi_extensions", "type": "extensions_entry[]"},
            {"name": "variants", "type": "variant_def[]$"},
            {"name": "action_results", "type": "action_result_def[]$"}
        ]}
    ]
}"#;

/// The singleton bootstrap schema. The source is a compile-time constant;
/// failing to build it is a bug, not a runtime condition.
pub fn abi_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        let def: AbiDef =
            serde_json::from_str(ABI_BOOTSTRAP_JSON).expect("bootstrap ABI JSON is well-formed");
        Schema::from_abi(&def).expect("bootstrap ABI schema is valid")
    })
}

fn packed(err: CodecError) -> SchemaError {
    SchemaError::InvalidPackedAbi {
        reason: err.to_string(),
    }
}

/// Decode a packed (binary) ABI definition blob.
pub fn unpack_abi(bytes: &[u8]) -> Result<AbiDef, SchemaError> {
    let value = crate::de::bin_to_json(abi_schema(), "abi_def", bytes).map_err(packed)?;
    Ok(serde_json::from_value(value)?)
}

/// Encode an ABI definition to its packed binary form.
pub fn pack_abi(def: &AbiDef) -> Result<Vec<u8>, SchemaError> {
    let value = serde_json::to_value(def)?;
    crate::ser::json_to_bin(abi_schema(), "abi_def", &value).map_err(packed)
}
