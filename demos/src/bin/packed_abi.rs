//! # packed_abi
//!
//! Demonstrates the bootstrap path: pack an ABI definition into its binary
//! form with the built-in ABI-of-ABIs schema, then load a contract from
//! the hex blob as a node operator would after fetching it from chain state.
//!
//! Run with:
//! ```sh
//! cargo run --bin packed_abi
//! ```

use abicodec_codec::pack_abi;
use abicodec_core::AbiDef;
use abicodec_registry::AbiRegistry;
use anyhow::Result;

fn main() -> Result<()> {
    let abi_json = r#"{
        "version": "eosio::abi/1.1",
        "structs": [{
            "name": "stat",
            "base": "",
            "fields": [
                {"name": "supply", "type": "asset"},
                {"name": "max_supply", "type": "asset"},
                {"name": "issuer", "type": "name"}
            ]
        }],
        "tables": [{
            "name": "stat", "index_type": "i64",
            "key_names": [], "key_types": [], "type": "stat"
        }]
    }"#;

    // ── 1. Pack the definition to its self-describing binary form ────────────
    let def: AbiDef = serde_json::from_str(abi_json)?;
    let blob = pack_abi(&def)?;
    let abi_hex = hex::encode(&blob);
    println!("✓ Packed ABI: {} bytes", blob.len());
    println!("  {abi_hex}");

    // ── 2. Load a contract straight from the hex blob ────────────────────────
    let registry = AbiRegistry::new();
    registry.set_abi_hex("eosio.token", &abi_hex)?;
    println!("✓ Contract loaded from hex");

    // ── 3. The schema answers exactly like a JSON-loaded one ─────────────────
    let row_type = registry.get_type_for_table("eosio.token", "stat")?;
    println!("✓ Table 'stat' row type: '{row_type}'");

    let row = registry.hex_to_json(
        "eosio.token",
        &row_type,
        // supply 1000.0000 EOS, max_supply 10000.0000 EOS, issuer eosio
        "809698000000000004454f530000000000e1f5050000000004454f53000000000000000000ea3055",
    )?;
    println!("✓ Decoded row: {row}");

    Ok(())
}
