//! Resolved per-contract schema and the type resolver.
//!
//! `Schema::from_abi` turns an [`AbiDef`](crate::abi::AbiDef) into
//! order-preserving lookup maps and validates every type reference up
//! front: alias chains must terminate (cycles rejected), struct base
//! chains must be acyclic and land on structs, and every referenced name
//! must resolve to a builtin, struct, or variant. The codec can then walk
//! a schema without re-checking any of this.

use crate::abi::{AbiDef, StructDef, VariantDef};
use crate::error::SchemaError;
use crate::name::Name;
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

/// The builtin wire types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Bool,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Int128,
    Uint128,
    Varint32,
    Varuint32,
    Float32,
    Float64,
    Float128,
    TimePoint,
    TimePointSec,
    BlockTimestamp,
    Name,
    Bytes,
    String,
    Checksum160,
    Checksum256,
    Checksum512,
    Symbol,
    SymbolCode,
    Asset,
    ExtendedAsset,
}

impl Builtin {
    pub fn lookup(name: &str) -> Option<Builtin> {
        Some(match name {
            "bool" => Builtin::Bool,
            "int8" => Builtin::Int8,
            "uint8" => Builtin::Uint8,
            "int16" => Builtin::Int16,
            "uint16" => Builtin::Uint16,
            "int32" => Builtin::Int32,
            "uint32" => Builtin::Uint32,
            "int64" => Builtin::Int64,
            "uint64" => Builtin::Uint64,
            "int128" => Builtin::Int128,
            "uint128" => Builtin::Uint128,
            "varint32" => Builtin::Varint32,
            "varuint32" => Builtin::Varuint32,
            "float32" => Builtin::Float32,
            "float64" => Builtin::Float64,
            "float128" => Builtin::Float128,
            "time_point" => Builtin::TimePoint,
            "time_point_sec" => Builtin::TimePointSec,
            "block_timestamp_type" => Builtin::BlockTimestamp,
            "name" => Builtin::Name,
            "bytes" => Builtin::Bytes,
            "string" => Builtin::String,
            "checksum160" => Builtin::Checksum160,
            "checksum256" => Builtin::Checksum256,
            "checksum512" => Builtin::Checksum512,
            "symbol" => Builtin::Symbol,
            "symbol_code" => Builtin::SymbolCode,
            "asset" => Builtin::Asset,
            "extended_asset" => Builtin::ExtendedAsset,
            _ => return None,
        })
    }
}

/// Outermost suffix of a type string, strongest binding last:
/// `$` (binary extension) > `?` (optional) > `[]` (array).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSuffix {
    Extension,
    Optional,
    Array,
}

/// Strip the outermost suffix, if any. `"name[]?$"` peels to
/// `("name[]?", Extension)`, then `("name[]", Optional)`, then
/// `("name", Array)`.
pub fn split_suffix(ty: &str) -> Option<(&str, TypeSuffix)> {
    if let Some(inner) = ty.strip_suffix('$') {
        Some((inner, TypeSuffix::Extension))
    } else if let Some(inner) = ty.strip_suffix('?') {
        Some((inner, TypeSuffix::Optional))
    } else if let Some(inner) = ty.strip_suffix("[]") {
        Some((inner, TypeSuffix::Array))
    } else {
        None
    }
}

/// A suffix-free, alias-free type: what the codec dispatches on.
#[derive(Debug, Clone, Copy)]
pub enum ResolvedBase<'a> {
    Builtin(Builtin),
    Struct(&'a StructDef),
    Variant(&'a VariantDef),
}

/// Validated, order-preserving view of one contract's ABI.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    aliases: IndexMap<String, String>,
    structs: IndexMap<String, StructDef>,
    variants: IndexMap<String, VariantDef>,
    actions: HashMap<Name, String>,
    tables: HashMap<Name, String>,
}

impl Schema {
    /// Build and fully validate a schema from a parsed ABI document.
    pub fn from_abi(def: &AbiDef) -> Result<Self, SchemaError> {
        if !def.version_supported() {
            return Err(SchemaError::UnsupportedVersion {
                version: def.version.clone(),
            });
        }

        let mut schema = Schema::default();
        for alias in &def.types {
            if schema.is_defined(&alias.new_type_name) {
                return Err(SchemaError::DuplicateType {
                    name: alias.new_type_name.clone(),
                });
            }
            schema
                .aliases
                .insert(alias.new_type_name.clone(), alias.ty.clone());
        }
        for st in &def.structs {
            if schema.is_defined(&st.name) {
                return Err(SchemaError::DuplicateType {
                    name: st.name.clone(),
                });
            }
            schema.structs.insert(st.name.clone(), st.clone());
        }
        for var in &def.variants {
            if schema.is_defined(&var.name) {
                return Err(SchemaError::DuplicateType {
                    name: var.name.clone(),
                });
            }
            schema.variants.insert(var.name.clone(), var.clone());
        }
        for action in &def.actions {
            schema.actions.insert(action.name, action.ty.clone());
        }
        for table in &def.tables {
            schema.tables.insert(table.name, table.ty.clone());
        }

        schema.validate(def)?;
        Ok(schema)
    }

    fn is_defined(&self, name: &str) -> bool {
        Builtin::lookup(name).is_some()
            || self.aliases.contains_key(name)
            || self.structs.contains_key(name)
            || self.variants.contains_key(name)
    }

    fn validate(&self, def: &AbiDef) -> Result<(), SchemaError> {
        for alias in &def.types {
            self.check_ref(&alias.ty, &alias.new_type_name)?;
        }
        for st in &def.structs {
            if !st.base.is_empty() {
                self.check_base_chain(st)?;
            }
            let mut saw_extension = false;
            for field in &st.fields {
                self.check_ref(&field.ty, &st.name)?;
                let is_extension = field.ty.ends_with('$');
                if saw_extension && !is_extension {
                    return Err(SchemaError::BadExtensionOrder {
                        name: st.name.clone(),
                    });
                }
                saw_extension |= is_extension;
            }
        }
        for var in &def.variants {
            for alt in &var.types {
                self.check_ref(alt, &var.name)?;
            }
        }
        for action in &def.actions {
            self.check_ref(&action.ty, &action.name.to_string())?;
        }
        for table in &def.tables {
            self.check_ref(&table.ty, &table.name.to_string())?;
        }
        for result in &def.action_results {
            self.check_ref(&result.result_type, &result.name.to_string())?;
        }
        Ok(())
    }

    /// Validate one type reference: strip suffixes, follow aliases, land on
    /// a builtin, struct, or variant. Alias cycles (including cycles routed
    /// through a suffix, like `a -> a?`) are caught by the in-progress set.
    fn check_ref(&self, ty: &str, referenced_by: &str) -> Result<(), SchemaError> {
        let mut in_progress = HashSet::new();
        self.check_ref_inner(ty, referenced_by, &mut in_progress)
    }

    fn check_ref_inner<'a>(
        &'a self,
        ty: &'a str,
        referenced_by: &str,
        in_progress: &mut HashSet<&'a str>,
    ) -> Result<(), SchemaError> {
        if let Some((inner, _)) = split_suffix(ty) {
            return self.check_ref_inner(inner, referenced_by, in_progress);
        }
        if Builtin::lookup(ty).is_some()
            || self.structs.contains_key(ty)
            || self.variants.contains_key(ty)
        {
            return Ok(());
        }
        if let Some(target) = self.aliases.get(ty) {
            if !in_progress.insert(ty) {
                return Err(SchemaError::CyclicAlias { ty: ty.to_string() });
            }
            return self.check_ref_inner(target, referenced_by, in_progress);
        }
        Err(SchemaError::UnresolvedType {
            ty: ty.to_string(),
            referenced_by: referenced_by.to_string(),
        })
    }

    fn check_base_chain(&self, st: &StructDef) -> Result<(), SchemaError> {
        let mut seen = HashSet::new();
        seen.insert(st.name.as_str());
        let mut current = st;
        while !current.base.is_empty() {
            let base_name = self.resolve_alias(&current.base)?;
            let base = self.structs.get(base_name).ok_or_else(|| {
                SchemaError::UnresolvedType {
                    ty: current.base.clone(),
                    referenced_by: current.name.clone(),
                }
            })?;
            if !seen.insert(base.name.as_str()) {
                return Err(SchemaError::CyclicBase {
                    name: st.name.clone(),
                });
            }
            current = base;
        }
        Ok(())
    }

    /// Follow alias links until a non-alias type string. The result may
    /// still carry suffixes; callers peel those and re-enter.
    pub fn resolve_alias<'a>(&'a self, ty: &'a str) -> Result<&'a str, SchemaError> {
        let mut current = ty;
        let mut seen = HashSet::new();
        while let Some(target) = self.aliases.get(current) {
            if !seen.insert(current) {
                return Err(SchemaError::CyclicAlias {
                    ty: current.to_string(),
                });
            }
            current = target;
        }
        Ok(current)
    }

    /// Resolve a suffix-free type name to what the codec dispatches on.
    /// Returns `None` for names that are neither builtin, struct, variant,
    /// nor an alias landing on one of those.
    pub fn resolve_base<'a>(&'a self, ty: &'a str) -> Result<Option<ResolvedBase<'a>>, SchemaError> {
        let resolved = self.resolve_alias(ty)?;
        if split_suffix(resolved).is_some() {
            // Alias landed on a suffixed type; the caller re-enters on it.
            return Ok(None);
        }
        if let Some(b) = Builtin::lookup(resolved) {
            return Ok(Some(ResolvedBase::Builtin(b)));
        }
        if let Some(st) = self.structs.get(resolved) {
            return Ok(Some(ResolvedBase::Struct(st)));
        }
        if let Some(var) = self.variants.get(resolved) {
            return Ok(Some(ResolvedBase::Variant(var)));
        }
        Ok(None)
    }

    pub fn get_struct(&self, name: &str) -> Option<&StructDef> {
        self.structs.get(name)
    }

    /// Registered argument type for an action, if any.
    pub fn action_type(&self, action: Name) -> Option<&str> {
        self.actions.get(&action).map(String::as_str)
    }

    /// Registered row type for a table, if any.
    pub fn table_type(&self, table: Name) -> Option<&str> {
        self.tables.get(&table).map(String::as_str)
    }

    /// Number of named type definitions (aliases + structs + variants).
    pub fn type_count(&self) -> usize {
        self.aliases.len() + self.structs.len() + self.variants.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abi(json: &str) -> AbiDef {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn builds_and_resolves() {
        let schema = Schema::from_abi(&abi(
            r#"{
                "version": "eosio::abi/1.1",
                "types": [{"new_type_name": "account_name", "type": "name"}],
                "structs": [{"name": "transfer", "base": "", "fields": [
                    {"name": "from", "type": "account_name"},
                    {"name": "quantity", "type": "asset"}
                ]}],
                "actions": [{"name": "transfer", "type": "transfer", "ricardian_contract": ""}]
            }"#,
        ))
        .unwrap();

        assert_eq!(schema.resolve_alias("account_name").unwrap(), "name");
        assert!(matches!(
            schema.resolve_base("account_name").unwrap(),
            Some(ResolvedBase::Builtin(Builtin::Name))
        ));
        assert!(matches!(
            schema.resolve_base("transfer").unwrap(),
            Some(ResolvedBase::Struct(_))
        ));
        assert_eq!(schema.action_type(Name::new("transfer")), Some("transfer"));
        assert_eq!(schema.action_type(Name::new("missing")), None);
    }

    #[test]
    fn rejects_unsupported_version() {
        let err = Schema::from_abi(&abi(r#"{"version": "eosio::abi/9.0"}"#)).unwrap_err();
        assert!(matches!(err, SchemaError::UnsupportedVersion { .. }));
    }

    #[test]
    fn rejects_unresolved_field_type() {
        let err = Schema::from_abi(&abi(
            r#"{
                "version": "eosio::abi/1.1",
                "structs": [{"name": "s", "base": "", "fields": [
                    {"name": "x", "type": "no_such_type"}
                ]}]
            }"#,
        ))
        .unwrap_err();
        assert!(matches!(err, SchemaError::UnresolvedType { .. }));
    }

    #[test]
    fn rejects_alias_cycle() {
        let err = Schema::from_abi(&abi(
            r#"{
                "version": "eosio::abi/1.1",
                "types": [
                    {"new_type_name": "a", "type": "b"},
                    {"new_type_name": "b", "type": "a"}
                ]
            }"#,
        ))
        .unwrap_err();
        assert!(matches!(err, SchemaError::CyclicAlias { .. }));
    }

    #[test]
    fn rejects_self_cycle_through_suffix() {
        let err = Schema::from_abi(&abi(
            r#"{
                "version": "eosio::abi/1.1",
                "types": [{"new_type_name": "a", "type": "a?"}]
            }"#,
        ))
        .unwrap_err();
        assert!(matches!(err, SchemaError::CyclicAlias { .. }));
    }

    #[test]
    fn rejects_base_cycle() {
        let err = Schema::from_abi(&abi(
            r#"{
                "version": "eosio::abi/1.1",
                "structs": [
                    {"name": "a", "base": "b", "fields": []},
                    {"name": "b", "base": "a", "fields": []}
                ]
            }"#,
        ))
        .unwrap_err();
        assert!(matches!(err, SchemaError::CyclicBase { .. }));
    }

    #[test]
    fn rejects_duplicate_definitions() {
        let err = Schema::from_abi(&abi(
            r#"{
                "version": "eosio::abi/1.1",
                "structs": [
                    {"name": "dup", "base": "", "fields": []},
                    {"name": "dup", "base": "", "fields": []}
                ]
            }"#,
        ))
        .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateType { .. }));
    }

    #[test]
    fn recursive_struct_through_array_is_legal() {
        let schema = Schema::from_abi(&abi(
            r#"{
                "version": "eosio::abi/1.1",
                "structs": [{"name": "node", "base": "", "fields": [
                    {"name": "children", "type": "node[]"}
                ]}]
            }"#,
        ));
        assert!(schema.is_ok());
    }

    #[test]
    fn rejects_plain_field_after_extension_field() {
        let err = Schema::from_abi(&abi(
            r#"{
                "version": "eosio::abi/1.1",
                "structs": [{"name": "s", "base": "", "fields": [
                    {"name": "a", "type": "uint8$"},
                    {"name": "b", "type": "uint8"}
                ]}]
            }"#,
        ))
        .unwrap_err();
        assert!(matches!(err, SchemaError::BadExtensionOrder { .. }));
    }

    #[test]
    fn suffix_splitting_order() {
        assert_eq!(split_suffix("name[]"), Some(("name", TypeSuffix::Array)));
        assert_eq!(split_suffix("name?"), Some(("name", TypeSuffix::Optional)));
        assert_eq!(split_suffix("name$"), Some(("name", TypeSuffix::Extension)));
        assert_eq!(
            split_suffix("name[]?$"),
            Some(("name[]?", TypeSuffix::Extension))
        );
        assert_eq!(split_suffix("name"), None);
    }
}
