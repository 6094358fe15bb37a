//! Golden byte-level tests for the JSON ↔ binary codec.
//!
//! The hex constants here are the canonical wire encodings; changing any
//! of them breaks interoperability with independently produced payloads.

use abicodec_codec::{bin_to_json, hex_to_json, json_to_bin, json_to_hex};
use abicodec_core::{AbiDef, CodecError, Schema};
use serde_json::{json, Value};

fn schema(abi_json: &str) -> Schema {
    let def: AbiDef = serde_json::from_str(abi_json).expect("test ABI parses");
    Schema::from_abi(&def).expect("test ABI validates")
}

fn token_schema() -> Schema {
    schema(
        r#"{
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
        }"#,
    )
}

/// Encode, decode back, and require exact JSON equality.
fn round_trip(schema: &Schema, ty: &str, value: Value) {
    let bytes = json_to_bin(schema, ty, &value)
        .unwrap_or_else(|e| panic!("encode {ty} {value}: {e}"));
    let back = bin_to_json(schema, ty, &bytes)
        .unwrap_or_else(|e| panic!("decode {ty} {}: {e}", hex::encode(&bytes)));
    assert_eq!(back, value, "round-trip of {ty}");
}

// ─── Golden fixtures ──────────────────────────────────────────────────────────

#[test]
fn transfer_golden_bytes() {
    let schema = token_schema();
    let value = json!({
        "from": "alice",
        "to": "bob",
        "quantity": "1.0000 EOS",
        "memo": ""
    });
    let hex_out = json_to_hex(&schema, "transfer", &value).unwrap();
    assert_eq!(
        hex_out,
        "0000000000855c340000000000000e3d102700000000000004454f530000000000"
    );
    let back = hex_to_json(&schema, "transfer", &hex_out).unwrap();
    assert_eq!(back, value);
    // object keys come back in declared field order
    let keys: Vec<&String> = back.as_object().unwrap().keys().collect();
    assert_eq!(keys, ["from", "to", "quantity", "memo"]);
}

#[test]
fn scalar_golden_bytes() {
    let s = schema(
        r#"{
            "version": "eosio::abi/1.1",
            "structs": [{"name": "probe", "base": "", "fields": [{"name": "v", "type": "uint16"}]}]
        }"#,
    );
    let cases: &[(&str, Value, &str)] = &[
        ("bool", json!(true), "01"),
        ("bool", json!(false), "00"),
        ("uint16", json!(0x1234), "3412"),
        ("int32", json!(-2), "feffffff"),
        ("uint64", json!("18446744073709551615"), "ffffffffffffffff"),
        ("varuint32", json!(300), "ac02"),
        ("varint32", json!(-1), "01"),
        ("name", json!("eosio.token"), "00a6823403ea3055"),
        ("string", json!("abc"), "03616263"),
        ("bytes", json!("deadbeef"), "04deadbeef"),
        ("symbol", json!("4,EOS"), "04454f5300000000"),
        ("symbol_code", json!("EOS"), "454f530000000000"),
        ("asset", json!("1.0000 EOS"), "102700000000000004454f5300000000"),
        ("time_point", json!("2023-05-21T12:34:56.789"), "08e6bb6133fc0500"),
        ("time_point_sec", json!("1970-01-01T00:00:00.000"), "00000000"),
        ("block_timestamp_type", json!("2000-01-01T00:00:00.000"), "00000000"),
    ];
    for (ty, value, expected_hex) in cases {
        let got = json_to_hex(&s, ty, value).unwrap_or_else(|e| panic!("encode {ty}: {e}"));
        assert_eq!(&got, expected_hex, "golden bytes of {ty}");
        assert_eq!(
            &hex_to_json(&s, ty, expected_hex).unwrap(),
            value,
            "golden decode of {ty}"
        );
    }
}

// ─── Scalar round-trips and rejections ────────────────────────────────────────

#[test]
fn integer_bounds() {
    let s = token_schema();
    round_trip(&s, "int8", json!(-128));
    round_trip(&s, "int8", json!(127));
    round_trip(&s, "uint8", json!(255));
    round_trip(&s, "int64", json!("-9223372036854775808"));
    round_trip(&s, "uint64", json!("0"));
    round_trip(&s, "int128", json!("-170141183460469231731687303715884105728"));
    round_trip(&s, "uint128", json!("340282366920938463463374607431768211455"));

    for (ty, value) in [
        ("int8", json!(-129)),
        ("int8", json!(128)),
        ("uint8", json!(-1)),
        ("uint8", json!(256)),
        ("int64", json!("9223372036854775808")),
        ("uint64", json!("-1")),
        ("uint64", json!("18446744073709551616")),
        ("varuint32", json!("4294967296")),
    ] {
        assert!(
            json_to_bin(&s, ty, &value).is_err(),
            "{ty} should reject {value}"
        );
    }
}

#[test]
fn bool_requires_json_boolean() {
    let s = token_schema();
    assert!(matches!(
        json_to_bin(&s, "bool", &json!("true")),
        Err(CodecError::Mismatch { .. })
    ));
    assert!(matches!(
        json_to_bin(&s, "bool", &json!(1)),
        Err(CodecError::Mismatch { .. })
    ));
}

#[test]
fn numbers_accept_string_form() {
    let s = token_schema();
    assert_eq!(
        json_to_bin(&s, "uint32", &json!("42")).unwrap(),
        json_to_bin(&s, "uint32", &json!(42)).unwrap()
    );
    assert!(json_to_bin(&s, "uint32", &json!("not a number")).is_err());
}

#[test]
fn floats_round_trip() {
    let s = token_schema();
    round_trip(&s, "float64", json!(0.0));
    round_trip(&s, "float64", json!(-1.5));
    let bytes = json_to_bin(&s, "float32", &json!(1.1)).unwrap();
    let back = bin_to_json(&s, "float32", &bytes).unwrap();
    assert!((back.as_f64().unwrap() - 1.1).abs() < 1e-5);
    assert!(json_to_bin(&s, "float32", &json!("not a number")).is_err());
}

#[test]
fn float128_is_raw_hex() {
    let s = token_schema();
    round_trip(&s, "float128", json!("0123456789abcdef0123456789abcdef"));
    assert!(json_to_bin(&s, "float128", &json!("0123")).is_err());
}

#[test]
fn checksums_are_fixed_length_hex() {
    let s = token_schema();
    round_trip(&s, "checksum160", json!("00".repeat(20)));
    round_trip(&s, "checksum256", json!("ab".repeat(32)));
    round_trip(&s, "checksum512", json!("cd".repeat(64)));
    assert!(json_to_bin(&s, "checksum256", &json!("abcd")).is_err());
    assert!(json_to_bin(&s, "checksum256", &json!("zz".repeat(32))).is_err());
}

#[test]
fn time_types_round_trip() {
    let s = token_schema();
    round_trip(&s, "time_point", json!("2023-05-21T12:34:56.789"));
    round_trip(&s, "time_point_sec", json!("2023-05-21T12:34:56.000"));
    round_trip(&s, "block_timestamp_type", json!("2023-05-21T12:34:56.500"));
    assert!(json_to_bin(&s, "time_point", &json!("invalid time")).is_err());
}

#[test]
fn extended_asset_is_an_object() {
    let s = token_schema();
    round_trip(
        &s,
        "extended_asset",
        json!({"quantity": "1.0000 EOS", "contract": "eosio.token"}),
    );
    assert!(json_to_bin(&s, "extended_asset", &json!({"quantity": "1.0000 EOS"})).is_err());
}

// ─── Containers ───────────────────────────────────────────────────────────────

#[test]
fn arrays_length_prefixed() {
    let s = token_schema();
    round_trip(&s, "uint8[]", json!([]));
    round_trip(&s, "uint8[]", json!([1, 2, 3]));
    assert_eq!(
        json_to_hex(&s, "uint8[]", &json!([1, 2, 3])).unwrap(),
        "03010203"
    );
    round_trip(&s, "string[]", json!(["a", "bc"]));
    assert!(json_to_bin(&s, "uint8[]", &json!(["not a number"])).is_err());
    assert!(json_to_bin(&s, "uint8[]", &json!(7)).is_err());
}

#[test]
fn optionals_use_presence_byte() {
    let s = token_schema();
    assert_eq!(json_to_hex(&s, "string?", &json!(null)).unwrap(), "00");
    assert_eq!(
        json_to_hex(&s, "string?", &json!("abc")).unwrap(),
        "0103616263"
    );
    round_trip(&s, "string?", json!(null));
    round_trip(&s, "string?", json!("abc"));

    let err = hex_to_json(&s, "string?", "02").unwrap_err();
    assert!(matches!(err, CodecError::BadPresenceByte { value: 2 }));
}

#[test]
fn alias_chains_and_suffixed_aliases() {
    let s = schema(
        r#"{
            "version": "eosio::abi/1.1",
            "types": [
                {"new_type_name": "account_name", "type": "name"},
                {"new_type_name": "account_list", "type": "account_name[]"}
            ],
            "structs": []
        }"#,
    );
    round_trip(&s, "account_name", json!("alice"));
    round_trip(&s, "account_list", json!(["alice", "bob"]));
    round_trip(&s, "account_name[]", json!(["alice"]));
}

#[test]
fn variants_tag_then_payload() {
    let s = schema(
        r#"{
            "version": "eosio::abi/1.1",
            "structs": [],
            "variants": [{"name": "key_arg", "types": ["uint64", "string"]}]
        }"#,
    );
    assert_eq!(
        json_to_hex(&s, "key_arg", &json!(["uint64", "5"])).unwrap(),
        "000500000000000000"
    );
    assert_eq!(
        json_to_hex(&s, "key_arg", &json!(["string", "hi"])).unwrap(),
        "01026869"
    );
    round_trip(&s, "key_arg", json!(["uint64", "5"]));
    round_trip(&s, "key_arg", json!(["string", "hi"]));

    assert!(matches!(
        json_to_bin(&s, "key_arg", &json!(["float64", 1.0])),
        Err(CodecError::UnknownAlternative { .. })
    ));
    assert!(matches!(
        json_to_bin(&s, "key_arg", &json!({"uint64": "5"})),
        Err(CodecError::Mismatch { .. })
    ));
    assert!(matches!(
        hex_to_json(&s, "key_arg", "05"),
        Err(CodecError::BadVariantIndex { index: 5, .. })
    ));
}

// ─── Structs ──────────────────────────────────────────────────────────────────

#[test]
fn struct_base_fields_come_first() {
    let s = schema(
        r#"{
            "version": "eosio::abi/1.1",
            "structs": [
                {"name": "header", "base": "", "fields": [{"name": "a", "type": "uint8"}]},
                {"name": "message", "base": "header", "fields": [{"name": "b", "type": "uint8"}]}
            ]
        }"#,
    );
    assert_eq!(
        json_to_hex(&s, "message", &json!({"a": 1, "b": 2})).unwrap(),
        "0102"
    );
    let back = hex_to_json(&s, "message", "0102").unwrap();
    let keys: Vec<&String> = back.as_object().unwrap().keys().collect();
    assert_eq!(keys, ["a", "b"]);
}

#[test]
fn struct_field_errors() {
    let s = token_schema();
    let missing = json_to_bin(&s, "transfer", &json!({"from": "alice"})).unwrap_err();
    assert!(matches!(missing, CodecError::MissingField { .. }));

    let extra = json_to_bin(
        &s,
        "transfer",
        &json!({
            "from": "alice", "to": "bob", "quantity": "1.0000 EOS",
            "memo": "", "bogus": 1
        }),
    )
    .unwrap_err();
    assert!(matches!(extra, CodecError::UnexpectedField { .. }));

    let not_object = json_to_bin(&s, "transfer", &json!([1, 2])).unwrap_err();
    assert!(matches!(not_object, CodecError::Mismatch { .. }));
}

#[test]
fn binary_extension_fields() {
    let s = schema(
        r#"{
            "version": "eosio::abi/1.1",
            "structs": [{"name": "evolved", "base": "", "fields": [
                {"name": "id", "type": "uint8"},
                {"name": "note", "type": "string$"},
                {"name": "flag", "type": "bool$"}
            ]}]
        }"#,
    );
    // all present
    assert_eq!(
        json_to_hex(&s, "evolved", &json!({"id": 7, "note": "x", "flag": true})).unwrap(),
        "07017801"
    );
    // trailing extensions omitted on encode
    assert_eq!(json_to_hex(&s, "evolved", &json!({"id": 7})).unwrap(), "07");
    assert_eq!(
        json_to_hex(&s, "evolved", &json!({"id": 7, "note": "x"})).unwrap(),
        "070178"
    );
    // a value after an omitted extension is an error
    assert!(matches!(
        json_to_bin(&s, "evolved", &json!({"id": 7, "flag": true})),
        Err(CodecError::ExtensionGap { .. })
    ));
    // short streams stop cleanly at the first absent extension
    assert_eq!(hex_to_json(&s, "evolved", "07").unwrap(), json!({"id": 7}));
    assert_eq!(
        hex_to_json(&s, "evolved", "070178").unwrap(),
        json!({"id": 7, "note": "x"})
    );
}

// ─── Input hygiene ────────────────────────────────────────────────────────────

#[test]
fn exact_consumption_is_required() {
    let s = token_schema();
    let err = hex_to_json(&s, "uint8", "0100").unwrap_err();
    assert!(matches!(err, CodecError::TrailingBytes { count: 1 }));

    let err = hex_to_json(&s, "uint32", "0102").unwrap_err();
    assert!(matches!(err, CodecError::UnexpectedEnd { .. }));
}

#[test]
fn bad_hex_input() {
    let s = token_schema();
    assert!(matches!(
        hex_to_json(&s, "uint8", "0"),
        Err(CodecError::Hex(_))
    ));
    assert!(matches!(
        hex_to_json(&s, "uint8", "zz"),
        Err(CodecError::Hex(_))
    ));
}

#[test]
fn unknown_type_is_reported() {
    let s = token_schema();
    assert!(matches!(
        json_to_bin(&s, "no_such_type", &json!(1)),
        Err(CodecError::UnknownType { .. })
    ));
    assert!(matches!(
        bin_to_json(&s, "no_such_type", &[1]),
        Err(CodecError::UnknownType { .. })
    ));
}
