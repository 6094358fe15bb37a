//! # variants_and_extensions
//!
//! Shows the two schema-evolution tools of the wire format: tagged
//! variants (`["type", value]` in JSON) and binary extension fields
//! (`$`), which let newer structs decode payloads produced before the
//! field existed.
//!
//! Run with:
//! ```sh
//! cargo run --bin variants_and_extensions
//! ```

use abicodec_registry::AbiRegistry;
use anyhow::Result;
use serde_json::json;

fn main() -> Result<()> {
    let abi = r#"{
        "version": "eosio::abi/1.1",
        "structs": [{
            "name": "order",
            "base": "",
            "fields": [
                {"name": "id", "type": "uint64"},
                {"name": "key", "type": "order_key"},
                {"name": "note", "type": "string$"}
            ]
        }],
        "variants": [{"name": "order_key", "types": ["uint64", "checksum256"]}]
    }"#;

    let registry = AbiRegistry::new();
    registry.set_abi("market", abi)?;

    // ── Variants carry their alternative's name on the JSON side ─────────────
    let numeric = json!({"id": "7", "key": ["uint64", "42"], "note": "limit"});
    let bytes = registry.json_to_bin("market", "order", &numeric)?;
    println!("✓ uint64-keyed order:      {}", hex::encode(&bytes));

    let hashed = json!({
        "id": "8",
        "key": ["checksum256", "ab".repeat(32)],
        "note": "stop"
    });
    let bytes = registry.json_to_bin("market", "order", &hashed)?;
    println!("✓ checksum-keyed order:    {}", hex::encode(&bytes));

    // ── Extension fields may be absent at the end of older payloads ──────────
    let old_payload = json!({"id": "9", "key": ["uint64", "1"]});
    let old_bytes = registry.json_to_bin("market", "order", &old_payload)?;
    println!("✓ pre-extension payload:   {}", hex::encode(&old_bytes));

    let decoded = registry.bin_to_json("market", "order", &old_bytes)?;
    println!("✓ decodes without 'note':  {decoded}");
    assert!(decoded.get("note").is_none());

    Ok(())
}
