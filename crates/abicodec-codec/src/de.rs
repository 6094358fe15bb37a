//! Binary → JSON deserialization.
//!
//! The inverse walk of [`crate::ser`]. Input must be consumed exactly;
//! trailing bytes are an error. Struct fields decode in declared order
//! (base chain first), which `serde_json`'s `preserve_order` feature keeps
//! stable in the output object.

use crate::reader::BinReader;
use crate::ser::struct_fields;
use abicodec_core::abi::{StructDef, VariantDef};
use abicodec_core::schema::{split_suffix, ResolvedBase};
use abicodec_core::{
    Asset, BlockTimestamp, Builtin, CodecError, Name, Schema, Symbol, SymbolCode, TimePoint,
    TimePointSec, TypeSuffix,
};
use serde_json::{Map, Number, Value};

/// Deserialize `bytes` as `ty` against `schema`, consuming all input.
pub fn bin_to_json(schema: &Schema, ty: &str, bytes: &[u8]) -> Result<Value, CodecError> {
    let mut reader = BinReader::new(bytes);
    let value = decode_type(schema, ty, ty, &mut reader)?;
    reader.expect_end()?;
    Ok(value)
}

/// [`bin_to_json`] over a hex string input.
pub fn hex_to_json(schema: &Schema, ty: &str, hex_input: &str) -> Result<Value, CodecError> {
    let bytes = hex::decode(hex_input.trim())?;
    bin_to_json(schema, ty, &bytes)
}

fn unknown(ty: &str) -> CodecError {
    CodecError::UnknownType { ty: ty.to_string() }
}

fn decode_type(
    schema: &Schema,
    ty: &str,
    field: &str,
    reader: &mut BinReader<'_>,
) -> Result<Value, CodecError> {
    if let Some((inner, suffix)) = split_suffix(ty) {
        return match suffix {
            // Absence of extension fields is decided at the struct layer;
            // a present extension decodes exactly like its inner type.
            TypeSuffix::Extension => decode_type(schema, inner, field, reader),
            TypeSuffix::Optional => match reader.read_u8("optional presence byte")? {
                0 => Ok(Value::Null),
                1 => decode_type(schema, inner, field, reader),
                value => Err(CodecError::BadPresenceByte { value }),
            },
            TypeSuffix::Array => {
                let count = reader.read_varuint32("array length")?;
                let mut items = Vec::new();
                for _ in 0..count {
                    items.push(decode_type(schema, inner, field, reader)?);
                }
                Ok(Value::Array(items))
            }
        };
    }

    match schema.resolve_base(ty).map_err(|_| unknown(ty))? {
        Some(ResolvedBase::Builtin(b)) => decode_builtin(b, field, reader),
        Some(ResolvedBase::Struct(st)) => decode_struct(schema, st, reader),
        Some(ResolvedBase::Variant(var)) => decode_variant(schema, var, field, reader),
        None => {
            let resolved = schema.resolve_alias(ty).map_err(|_| unknown(ty))?;
            if resolved == ty {
                Err(unknown(ty))
            } else {
                decode_type(schema, resolved, field, reader)
            }
        }
    }
}

fn decode_struct(
    schema: &Schema,
    st: &StructDef,
    reader: &mut BinReader<'_>,
) -> Result<Value, CodecError> {
    let fields = struct_fields(schema, st)?;
    let mut obj = Map::with_capacity(fields.len());
    for f in fields {
        // An exhausted stream at the first extension field ends the struct;
        // load-time validation guarantees everything after it is `$` too.
        if f.ty.ends_with('$') && reader.is_empty() {
            break;
        }
        obj.insert(f.name.clone(), decode_type(schema, &f.ty, &f.name, reader)?);
    }
    Ok(Value::Object(obj))
}

fn decode_variant(
    schema: &Schema,
    var: &VariantDef,
    field: &str,
    reader: &mut BinReader<'_>,
) -> Result<Value, CodecError> {
    let index = reader.read_varuint32("variant index")?;
    let alternative = var
        .types
        .get(index as usize)
        .ok_or_else(|| CodecError::BadVariantIndex {
            variant: var.name.clone(),
            index,
        })?;
    let inner = decode_type(schema, alternative, field, reader)?;
    Ok(Value::Array(vec![
        Value::String(alternative.clone()),
        inner,
    ]))
}

fn finite_number(v: f64, ty: &str) -> Result<Value, CodecError> {
    Number::from_f64(v)
        .map(Value::Number)
        .ok_or_else(|| CodecError::Expected {
            expected: "finite float",
            got: format!("{ty} {v}"),
        })
}

fn decode_builtin(
    b: Builtin,
    field: &str,
    reader: &mut BinReader<'_>,
) -> Result<Value, CodecError> {
    Ok(match b {
        Builtin::Bool => match reader.read_u8(field)? {
            0 => Value::Bool(false),
            1 => Value::Bool(true),
            value => {
                return Err(CodecError::Expected {
                    expected: "boolean byte 0 or 1",
                    got: format!("{value:#04x}"),
                })
            }
        },
        Builtin::Int8 => Value::Number(reader.read_i8(field)?.into()),
        Builtin::Uint8 => Value::Number(reader.read_u8(field)?.into()),
        Builtin::Int16 => Value::Number(reader.read_i16(field)?.into()),
        Builtin::Uint16 => Value::Number(reader.read_u16(field)?.into()),
        Builtin::Int32 => Value::Number(reader.read_i32(field)?.into()),
        Builtin::Uint32 => Value::Number(reader.read_u32(field)?.into()),
        // 64- and 128-bit integers surface as strings: JSON consumers
        // cannot hold them losslessly in a double.
        Builtin::Int64 => Value::String(reader.read_i64(field)?.to_string()),
        Builtin::Uint64 => Value::String(reader.read_u64(field)?.to_string()),
        Builtin::Int128 => Value::String(reader.read_i128(field)?.to_string()),
        Builtin::Uint128 => Value::String(reader.read_u128(field)?.to_string()),
        Builtin::Varint32 => Value::Number(reader.read_varint32(field)?.into()),
        Builtin::Varuint32 => Value::Number(reader.read_varuint32(field)?.into()),
        Builtin::Float32 => finite_number(reader.read_f32(field)? as f64, "float32")?,
        Builtin::Float64 => finite_number(reader.read_f64(field)?, "float64")?,
        Builtin::Float128 => Value::String(hex::encode(reader.read_exact(16, field)?)),
        Builtin::TimePoint => Value::String(TimePoint(reader.read_i64(field)?).to_text()?),
        Builtin::TimePointSec => Value::String(TimePointSec(reader.read_u32(field)?).to_text()?),
        Builtin::BlockTimestamp => {
            Value::String(BlockTimestamp(reader.read_u32(field)?).to_text()?)
        }
        Builtin::Name => Value::String(Name::from_u64(reader.read_u64(field)?).to_string()),
        Builtin::Bytes => Value::String(hex::encode(reader.read_bytes(field)?)),
        Builtin::String => Value::String(reader.read_str(field)?.to_string()),
        Builtin::Checksum160 => Value::String(hex::encode(reader.read_exact(20, field)?)),
        Builtin::Checksum256 => Value::String(hex::encode(reader.read_exact(32, field)?)),
        Builtin::Checksum512 => Value::String(hex::encode(reader.read_exact(64, field)?)),
        Builtin::Symbol => Value::String(Symbol::from_u64(reader.read_u64(field)?).to_string()),
        Builtin::SymbolCode => {
            Value::String(SymbolCode::from_u64(reader.read_u64(field)?).to_string())
        }
        Builtin::Asset => {
            let amount = reader.read_i64(field)?;
            let symbol = Symbol::from_u64(reader.read_u64(field)?);
            Value::String(Asset { amount, symbol }.to_string())
        }
        Builtin::ExtendedAsset => {
            let amount = reader.read_i64(field)?;
            let symbol = Symbol::from_u64(reader.read_u64(field)?);
            let contract = Name::from_u64(reader.read_u64(field)?);
            let mut obj = Map::with_capacity(2);
            obj.insert(
                "quantity".into(),
                Value::String(Asset { amount, symbol }.to_string()),
            );
            obj.insert("contract".into(), Value::String(contract.to_string()));
            Value::Object(obj)
        }
    })
}
