//! # token_transfer
//!
//! Demonstrates the full round trip: load a token ABI, encode a transfer
//! payload to its wire form, and decode it back.
//!
//! Run with:
//! ```sh
//! cargo run --bin token_transfer
//! ```

use abicodec_registry::AbiRegistry;
use anyhow::Result;
use serde_json::json;

fn main() -> Result<()> {
    // ── 1. Define the token ABI inline ───────────────────────────────────────
    let abi = r#"{
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
        "actions": [{"name": "transfer", "type": "transfer", "ricardian_contract": ""}]
    }"#;

    let registry = AbiRegistry::new();
    registry.set_abi("eosio.token", abi)?;
    println!("✓ Registry loaded ({} contracts)", registry.contracts().len());

    // ── 2. Resolve the action's argument type ────────────────────────────────
    let ty = registry.get_type_for_action("eosio.token", "transfer")?;
    println!("✓ Action 'transfer' uses type '{ty}'");

    // ── 3. Encode a payload ──────────────────────────────────────────────────
    let payload = json!({
        "from": "alice",
        "to": "bob",
        "quantity": "1.0000 EOS",
        "memo": "demo"
    });
    let bytes = registry.json_to_bin("eosio.token", &ty, &payload)?;
    println!("✓ Encoded {} bytes: {}", bytes.len(), hex::encode(&bytes));

    // ── 4. Decode it back ────────────────────────────────────────────────────
    let decoded = registry.bin_to_json("eosio.token", &ty, &bytes)?;
    println!("✓ Decoded: {decoded}");
    assert_eq!(decoded, payload);

    Ok(())
}
