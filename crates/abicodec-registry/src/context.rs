//! The registry context: one shared object owning every loaded contract
//! schema and mediating all codec and lookup calls.
//!
//! Thread-safe via `Arc<RwLock<..>>`: codec and lookup operations run
//! concurrently under the read lock, schema mutation takes the write lock.
//! Every fallible operation returns a `Result`; the pull-style
//! [`last_error`](AbiRegistry::last_error) slot is a projection of the most
//! recent outcome, kept for host bindings that surface errors after the
//! fact. The slot is per-context: concurrent fallible calls on one shared
//! context race on it, so pull-style callers should scope a context per
//! logical caller.

use abicodec_core::{AbiDef, AbiError, CodecError, Name, NotFoundError, Schema, SchemaError};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, RwLock};
use tracing::debug;

/// Thread-safe, cheaply clonable registry of contract schemas.
#[derive(Clone, Default)]
pub struct AbiRegistry {
    contracts: Arc<RwLock<HashMap<Name, Schema>>>,
    last_error: Arc<Mutex<Option<String>>>,
}

impl AbiRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide default instance. Convenient for host bindings
    /// that want exactly one context; independent instances remain fully
    /// supported for everything else.
    pub fn global() -> &'static AbiRegistry {
        static GLOBAL: OnceLock<AbiRegistry> = OnceLock::new();
        GLOBAL.get_or_init(AbiRegistry::new)
    }

    /// Encode an identifier string to its 64-bit name. Total: never fails.
    pub fn string_to_name(&self, text: &str) -> Name {
        Name::new(text)
    }

    /// Record the outcome of a fallible operation in the error slot.
    fn finish<T>(&self, result: Result<T, AbiError>) -> Result<T, AbiError> {
        let mut slot = self.last_error.lock().unwrap();
        *slot = result.as_ref().err().map(ToString::to_string);
        result
    }

    /// Human-readable message of the most recent failed operation, or
    /// `None` if the most recent fallible operation succeeded.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().unwrap().clone()
    }

    /// Parse, validate, and store an ABI given as a JSON document,
    /// replacing any schema previously held for `contract`. A failed load
    /// leaves the previous schema untouched.
    pub fn set_abi(&self, contract: &str, abi_json: &str) -> Result<(), AbiError> {
        self.finish(self.load(contract, || {
            let def: AbiDef =
                serde_json::from_str(abi_json).map_err(SchemaError::Json)?;
            Ok(def)
        }))
    }

    /// [`set_abi`](Self::set_abi) for the packed binary ABI form.
    pub fn set_abi_bin(&self, contract: &str, bytes: &[u8]) -> Result<(), AbiError> {
        self.finish(self.load(contract, || abicodec_codec::unpack_abi(bytes)))
    }

    /// [`set_abi`](Self::set_abi) for the hex-encoded packed ABI form.
    pub fn set_abi_hex(&self, contract: &str, abi_hex: &str) -> Result<(), AbiError> {
        self.finish(self.load(contract, || {
            let bytes = hex::decode(abi_hex.trim()).map_err(|e| {
                SchemaError::InvalidPackedAbi {
                    reason: e.to_string(),
                }
            })?;
            abicodec_codec::unpack_abi(&bytes)
        }))
    }

    fn load(
        &self,
        contract: &str,
        parse: impl FnOnce() -> Result<AbiDef, SchemaError>,
    ) -> Result<(), AbiError> {
        let def = parse()?;
        let schema = Schema::from_abi(&def)?;
        let name = Name::new(contract);
        let replaced = self
            .contracts
            .write()
            .unwrap()
            .insert(name, schema)
            .is_some();
        debug!(contract, replaced, "loaded ABI");
        Ok(())
    }

    /// Discard the schema for `contract`. Returns whether one existed.
    pub fn remove_contract(&self, contract: &str) -> bool {
        let existed = self
            .contracts
            .write()
            .unwrap()
            .remove(&Name::new(contract))
            .is_some();
        if existed {
            debug!(contract, "removed contract ABI");
        }
        existed
    }

    /// Discard every loaded schema.
    pub fn clear(&self) {
        let mut contracts = self.contracts.write().unwrap();
        let count = contracts.len();
        contracts.clear();
        debug!(count, "cleared registry");
    }

    /// Names of all loaded contracts, sorted.
    pub fn contracts(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .contracts
            .read()
            .unwrap()
            .keys()
            .map(ToString::to_string)
            .collect();
        names.sort();
        names
    }

    fn with_schema<T>(
        &self,
        contract: &str,
        f: impl FnOnce(&Schema) -> Result<T, AbiError>,
    ) -> Result<T, AbiError> {
        let contracts = self.contracts.read().unwrap();
        let schema = contracts.get(&Name::new(contract)).ok_or_else(|| {
            NotFoundError::Contract {
                contract: contract.to_string(),
            }
        })?;
        f(schema)
    }

    /// The argument type registered for an action.
    pub fn get_type_for_action(&self, contract: &str, action: &str) -> Result<String, AbiError> {
        self.finish(self.with_schema(contract, |schema| {
            schema
                .action_type(Name::new(action))
                .map(str::to_string)
                .ok_or_else(|| {
                    NotFoundError::Action {
                        contract: contract.to_string(),
                        action: action.to_string(),
                    }
                    .into()
                })
        }))
    }

    /// The row type registered for a table.
    pub fn get_type_for_table(&self, contract: &str, table: &str) -> Result<String, AbiError> {
        self.finish(self.with_schema(contract, |schema| {
            schema
                .table_type(Name::new(table))
                .map(str::to_string)
                .ok_or_else(|| {
                    NotFoundError::Table {
                        contract: contract.to_string(),
                        table: table.to_string(),
                    }
                    .into()
                })
        }))
    }

    /// Serialize a JSON value as `ty` against the contract's schema.
    pub fn json_to_bin(
        &self,
        contract: &str,
        ty: &str,
        value: &Value,
    ) -> Result<Vec<u8>, AbiError> {
        self.finish(self.with_schema(contract, |schema| {
            Ok(abicodec_codec::json_to_bin(schema, ty, value)?)
        }))
    }

    /// Serialize a JSON text payload as `ty`, returning lowercase hex.
    pub fn json_to_hex(&self, contract: &str, ty: &str, json: &str) -> Result<String, AbiError> {
        self.finish(self.with_schema(contract, |schema| {
            let value: Value =
                serde_json::from_str(json).map_err(|e| CodecError::InvalidJson {
                    reason: e.to_string(),
                })?;
            Ok(abicodec_codec::json_to_hex(schema, ty, &value)?)
        }))
    }

    /// Deserialize wire bytes as `ty` against the contract's schema.
    pub fn bin_to_json(&self, contract: &str, ty: &str, bytes: &[u8]) -> Result<Value, AbiError> {
        self.finish(self.with_schema(contract, |schema| {
            Ok(abicodec_codec::bin_to_json(schema, ty, bytes)?)
        }))
    }

    /// Deserialize a hex payload as `ty` against the contract's schema.
    pub fn hex_to_json(&self, contract: &str, ty: &str, hex_input: &str) -> Result<Value, AbiError> {
        self.finish(self.with_schema(contract, |schema| {
            Ok(abicodec_codec::hex_to_json(schema, ty, hex_input)?)
        }))
    }
}

impl std::fmt::Debug for AbiRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AbiRegistry")
            .field("contracts", &self.contracts.read().unwrap().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN_ABI: &str = r#"{
        "version": "eosio::abi/1.1",
        "types": [{"new_type_name": "account_name", "type": "name"}],
        "structs": [{
            "name": "transfer",
            "base": "",
            "fields": [
                {"name": "from", "type": "account_name"},
                {"name": "to", "type": "account_name"},
                {"name": "quantity", "type": "asset"},
                {"name": "memo", "type": "string"}
            ]
        }],
        "actions": [{"name": "transfer", "type": "transfer", "ricardian_contract": ""}],
        "tables": [{
            "name": "accounts", "index_type": "i64",
            "key_names": [], "key_types": [], "type": "transfer"
        }]
    }"#;

    #[test]
    fn load_convert_lookup() {
        let registry = AbiRegistry::new();
        registry.set_abi("eosio.token", TOKEN_ABI).unwrap();

        let hex_out = registry
            .json_to_hex(
                "eosio.token",
                "transfer",
                r#"{"from":"alice","to":"bob","quantity":"1.0000 EOS","memo":""}"#,
            )
            .unwrap();
        assert_eq!(
            hex_out,
            "0000000000855c340000000000000e3d102700000000000004454f530000000000"
        );

        let back = registry
            .hex_to_json("eosio.token", "transfer", &hex_out)
            .unwrap();
        assert_eq!(back["from"], "alice");
        assert_eq!(back["quantity"], "1.0000 EOS");

        assert_eq!(
            registry
                .get_type_for_action("eosio.token", "transfer")
                .unwrap(),
            "transfer"
        );
        assert_eq!(
            registry
                .get_type_for_table("eosio.token", "accounts")
                .unwrap(),
            "transfer"
        );
    }

    #[test]
    fn unknown_contract_is_not_found() {
        let registry = AbiRegistry::new();
        let err = registry
            .get_type_for_action("eosio.token", "transfer")
            .unwrap_err();
        assert!(matches!(
            err,
            AbiError::NotFound(NotFoundError::Contract { .. })
        ));
    }

    #[test]
    fn remove_contract_reports_existence() {
        let registry = AbiRegistry::new();
        assert!(!registry.remove_contract("eosio.token"));
        registry.set_abi("eosio.token", TOKEN_ABI).unwrap();
        assert!(registry.remove_contract("eosio.token"));
        assert!(!registry.remove_contract("eosio.token"));
    }

    #[test]
    fn failed_load_preserves_previous_schema() {
        let registry = AbiRegistry::new();
        registry.set_abi("eosio.token", TOKEN_ABI).unwrap();
        assert!(registry.set_abi("eosio.token", "not json").is_err());
        // the original schema still answers
        assert_eq!(
            registry
                .get_type_for_action("eosio.token", "transfer")
                .unwrap(),
            "transfer"
        );
    }

    #[test]
    fn error_slot_tracks_most_recent_outcome() {
        let registry = AbiRegistry::new();
        assert_eq!(registry.last_error(), None);

        assert!(registry.set_abi("bad", "not json").is_err());
        let msg = registry.last_error().expect("failure recorded");
        assert!(msg.contains("invalid ABI JSON"), "got: {msg}");

        registry.set_abi("eosio.token", TOKEN_ABI).unwrap();
        assert_eq!(registry.last_error(), None);
    }

    #[test]
    fn contracts_lists_loaded_names() {
        let registry = AbiRegistry::new();
        registry.set_abi("eosio.token", TOKEN_ABI).unwrap();
        registry.set_abi("alice", TOKEN_ABI).unwrap();
        assert_eq!(registry.contracts(), vec!["alice", "eosio.token"]);
        registry.clear();
        assert!(registry.contracts().is_empty());
    }
}
