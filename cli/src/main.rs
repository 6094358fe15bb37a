//! AbiCodec CLI — the command-line interface for AbiCodec.
//!
//! # Commands
//! ```
//! abicodec name        <value> [--decode]
//! abicodec validate    --abi <path.json>
//! abicodec encode      --abi <path.json> --type <name> --json <payload>
//! abicodec decode      --abi <path.json> --type <name> --hex <payload>
//! abicodec action-type --abi <path.json> --action <name>
//! abicodec table-type  --abi <path.json> --table <name>
//! abicodec pack-abi    --abi <path.json>
//! abicodec unpack-abi  --hex <blob>
//! abicodec info
//! ```

use abicodec_core::Name;
use abicodec_registry::AbiRegistry;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "abicodec",
    about = "Binary ABI codec and contract registry — AbiCodec CLI",
    long_about = "
AbiCodec CLI: validate eosio::abi/1.x definitions, pack and unpack the
binary ABI form, and convert action/table payloads between JSON and hex.

ENVIRONMENT VARIABLES:
  RUST_LOG    tracing filter, e.g. RUST_LOG=abicodec_registry=debug
",
    version
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an identifier between its string and 64-bit forms
    Name {
        /// The name string (or decimal u64 with --decode)
        value: String,
        /// Decode a 64-bit value back to its string form
        #[arg(long)]
        decode: bool,
    },

    /// Parse and validate an ABI JSON file
    Validate {
        /// Path to the ABI JSON file
        #[arg(short, long)]
        abi: String,
    },

    /// Encode a JSON payload to hex
    Encode {
        /// Path to the ABI JSON file
        #[arg(long)]
        abi: String,
        /// Type name within the ABI (suffixes allowed, e.g. 'transfer[]')
        #[arg(long = "type")]
        ty: String,
        /// The JSON payload
        #[arg(long)]
        json: String,
    },

    /// Decode a hex payload to JSON
    Decode {
        /// Path to the ABI JSON file
        #[arg(long)]
        abi: String,
        /// Type name within the ABI
        #[arg(long = "type")]
        ty: String,
        /// The hex payload
        #[arg(long)]
        hex: String,
    },

    /// Look up the argument type registered for an action
    #[command(name = "action-type")]
    ActionType {
        #[arg(long)]
        abi: String,
        #[arg(long)]
        action: String,
    },

    /// Look up the row type registered for a table
    #[command(name = "table-type")]
    TableType {
        #[arg(long)]
        abi: String,
        #[arg(long)]
        table: String,
    },

    /// Pack an ABI JSON file into its binary (hex) form
    #[command(name = "pack-abi")]
    PackAbi {
        #[arg(long)]
        abi: String,
    },

    /// Unpack a binary (hex) ABI blob into JSON
    #[command(name = "unpack-abi")]
    UnpackAbi {
        #[arg(long)]
        hex: String,
    },

    /// Show AbiCodec build and capability info
    Info,
}

/// Contract slot used for single-file CLI operations.
const CLI_CONTRACT: &str = "local";

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    match cli.command {
        Commands::Name { value, decode } => cmd_name(&value, decode),
        Commands::Validate { abi } => cmd_validate(&abi),
        Commands::Encode { abi, ty, json } => cmd_encode(&abi, &ty, &json),
        Commands::Decode { abi, ty, hex } => cmd_decode(&abi, &ty, &hex),
        Commands::ActionType { abi, action } => cmd_action_type(&abi, &action),
        Commands::TableType { abi, table } => cmd_table_type(&abi, &table),
        Commands::PackAbi { abi } => cmd_pack_abi(&abi),
        Commands::UnpackAbi { hex } => cmd_unpack_abi(&hex),
        Commands::Info => cmd_info(),
    }
}

/// Load the ABI file into a fresh registry under [`CLI_CONTRACT`].
fn registry_for(abi_path: &str) -> Result<AbiRegistry> {
    let abi_json = std::fs::read_to_string(abi_path)
        .with_context(|| format!("read ABI file '{abi_path}'"))?;
    let registry = AbiRegistry::new();
    registry
        .set_abi(CLI_CONTRACT, &abi_json)
        .with_context(|| format!("load ABI '{abi_path}'"))?;
    Ok(registry)
}

fn cmd_name(value: &str, decode: bool) -> Result<()> {
    if decode {
        let raw: u64 = value
            .parse()
            .with_context(|| format!("'{value}' is not a decimal u64"))?;
        println!("{}", Name::from_u64(raw));
    } else {
        let name = Name::new(value);
        println!("{}", name.as_u64());
        if name.to_string() != value {
            eprintln!("note: '{value}' canonicalizes to '{name}'");
        }
    }
    Ok(())
}

fn cmd_validate(abi_path: &str) -> Result<()> {
    use abicodec_core::{AbiDef, Schema};

    let abi_json = std::fs::read_to_string(abi_path)
        .with_context(|| format!("read ABI file '{abi_path}'"))?;
    let def: AbiDef = serde_json::from_str(&abi_json).context("parse ABI JSON")?;
    let schema = Schema::from_abi(&def).context("validate ABI")?;

    println!("✓ {} ({})", abi_path, def.version);
    println!("  types:    {}", def.types.len());
    println!("  structs:  {}", def.structs.len());
    println!("  variants: {}", def.variants.len());
    println!("  actions:  {}", def.actions.len());
    println!("  tables:   {}", def.tables.len());
    tracing::debug!(total = schema.type_count(), "schema validated");

    for action in &def.actions {
        println!("  action {} -> {}", action.name, action.ty);
    }
    for table in &def.tables {
        println!("  table  {} -> {}", table.name, table.ty);
    }
    Ok(())
}

fn cmd_encode(abi_path: &str, ty: &str, json: &str) -> Result<()> {
    let registry = registry_for(abi_path)?;
    let hex_out = registry.json_to_hex(CLI_CONTRACT, ty, json)?;
    println!("{hex_out}");
    Ok(())
}

fn cmd_decode(abi_path: &str, ty: &str, hex_input: &str) -> Result<()> {
    let registry = registry_for(abi_path)?;
    let value = registry.hex_to_json(CLI_CONTRACT, ty, hex_input)?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn cmd_action_type(abi_path: &str, action: &str) -> Result<()> {
    let registry = registry_for(abi_path)?;
    println!("{}", registry.get_type_for_action(CLI_CONTRACT, action)?);
    Ok(())
}

fn cmd_table_type(abi_path: &str, table: &str) -> Result<()> {
    let registry = registry_for(abi_path)?;
    println!("{}", registry.get_type_for_table(CLI_CONTRACT, table)?);
    Ok(())
}

fn cmd_pack_abi(abi_path: &str) -> Result<()> {
    use abicodec_core::AbiDef;

    let abi_json = std::fs::read_to_string(abi_path)
        .with_context(|| format!("read ABI file '{abi_path}'"))?;
    let def: AbiDef = serde_json::from_str(&abi_json).context("parse ABI JSON")?;
    let packed = abicodec_codec::pack_abi(&def)?;
    println!("{}", hex::encode(packed));
    Ok(())
}

fn cmd_unpack_abi(hex_input: &str) -> Result<()> {
    let bytes = hex::decode(hex_input.trim()).context("decode ABI hex")?;
    let def = abicodec_codec::unpack_abi(&bytes)?;
    println!("{}", serde_json::to_string_pretty(&def)?);
    Ok(())
}

fn cmd_info() -> Result<()> {
    println!("AbiCodec v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Capabilities:");
    println!("  ✓ 64-bit name codec        (base-32 packed identifiers)");
    println!("  ✓ ABI validation           (eosio::abi/1.x, alias/base cycle detection)");
    println!("  ✓ JSON <-> binary codec    (structs, variants, optionals, extensions)");
    println!("  ✓ Packed ABI bootstrap     (load ABIs from their binary form)");
    println!("  ✓ Contract registry        (thread-safe, last-error slot)");
    println!();
    println!("Builtin types:               bool, int8..int128, uint8..uint128,");
    println!("                             varint32, varuint32, float32/64/128,");
    println!("                             time_point(_sec), block_timestamp_type,");
    println!("                             name, bytes, string, checksum160/256/512,");
    println!("                             symbol, symbol_code, asset, extended_asset");
    Ok(())
}
