//! The ABI document model — the serde shape of an `eosio::abi/1.x` JSON
//! definition. Parsing is strict: unknown top-level keys are rejected, the
//! list fields all default to empty.

use crate::name::Name;
use serde::{Deserialize, Serialize};

/// A type alias entry: `new_type_name` resolves to `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDef {
    pub new_type_name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

/// One field of a struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

/// A struct definition. `base` names another struct whose fields are
/// serialized first; empty means no base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructDef {
    pub name: String,
    #[serde(default)]
    pub base: String,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

/// Binds an action name to the struct type carrying its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDef {
    pub name: Name,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub ricardian_contract: String,
}

/// Binds a table name to its row type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDef {
    pub name: Name,
    #[serde(default)]
    pub index_type: String,
    #[serde(default)]
    pub key_names: Vec<String>,
    #[serde(default)]
    pub key_types: Vec<String>,
    #[serde(rename = "type")]
    pub ty: String,
}

/// A tagged union: the wire form is a varuint32 index into `types` followed
/// by the selected alternative's payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantDef {
    pub name: String,
    pub types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClausePair {
    pub id: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub error_code: u64,
    pub error_msg: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionsEntry {
    pub tag: u16,
    #[serde(default)]
    pub data: String,
}

/// Binds an action name to the type of its return value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResultDef {
    pub name: Name,
    pub result_type: String,
}

/// A full ABI document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AbiDef {
    pub version: String,
    #[serde(default)]
    pub types: Vec<TypeDef>,
    #[serde(default)]
    pub structs: Vec<StructDef>,
    #[serde(default)]
    pub actions: Vec<ActionDef>,
    #[serde(default)]
    pub tables: Vec<TableDef>,
    #[serde(default)]
    pub ricardian_clauses: Vec<ClausePair>,
    #[serde(default)]
    pub error_messages: Vec<ErrorMessage>,
    #[serde(default)]
    pub abi_extensions: Vec<ExtensionsEntry>,
    #[serde(default)]
    pub variants: Vec<VariantDef>,
    #[serde(default)]
    pub action_results: Vec<ActionResultDef>,
}

impl AbiDef {
    /// Version tags this implementation understands.
    pub fn version_supported(&self) -> bool {
        self.version.starts_with("eosio::abi/1.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_document() {
        let def: AbiDef = serde_json::from_str(
            r#"{
                "version": "eosio::abi/1.1",
                "structs": [
                    {"name": "transfer", "base": "", "fields": [
                        {"name": "from", "type": "name"},
                        {"name": "to", "type": "name"}
                    ]}
                ],
                "actions": [{"name": "transfer", "type": "transfer", "ricardian_contract": ""}]
            }"#,
        )
        .unwrap();
        assert!(def.version_supported());
        assert_eq!(def.structs[0].fields[1].ty, "name");
        assert_eq!(def.actions[0].name, Name::new("transfer"));
        assert!(def.tables.is_empty());
    }

    #[test]
    fn rejects_wrongly_typed_fields() {
        let err = serde_json::from_str::<AbiDef>(
            r#"{"version": "eosio::abi/1.1", "structs": "not an array"}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = serde_json::from_str::<AbiDef>(
            r#"{"version": "eosio::abi/1.1", "bogus": []}"#,
        );
        assert!(err.is_err());
    }
}
