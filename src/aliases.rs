//! Per-dialect alias tables mapping vendor type spellings onto canonical categories.

use serde::{Deserialize, Serialize};

use crate::error::SqlDialectError;
use crate::types::Dialect;

/// Storage width of an integer column, used for MIN/MAX clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IntWidth {
    Tiny,
    Small,
    Medium,
    #[default]
    Normal,
    Big,
}

impl IntWidth {
    /// Signed lower and upper bound for this width.
    #[must_use]
    pub fn bounds(self) -> (i64, i64) {
        match self {
            IntWidth::Tiny => (i64::from(i8::MIN), i64::from(i8::MAX)),
            IntWidth::Small => (i64::from(i16::MIN), i64::from(i16::MAX)),
            IntWidth::Medium => (-8_388_608, 8_388_607),
            IntWidth::Normal => (i64::from(i32::MIN), i64::from(i32::MAX)),
            IntWidth::Big => (i64::MIN, i64::MAX),
        }
    }
}

/// Canonical value category every vendor type spelling funnels into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeCategory {
    Text,
    Int(IntWidth),
    Float,
    Bool,
    Date,
    Timestamp,
}

impl TypeCategory {
    #[must_use]
    pub fn is_temporal(self) -> bool {
        matches!(self, TypeCategory::Date | TypeCategory::Timestamp)
    }
}

/// Resolve a raw type name for `dialect`.
///
/// Lookup ignores case, a parenthesised length suffix and a trailing `unsigned`,
/// so `VARCHAR(255)` and `int(10) unsigned` resolve like `varchar` and `int`.
///
/// ```rust
/// use sql_dialect::prelude::*;
///
/// assert_eq!(category_of(Dialect::MySql, "TINYINT(1)")?, TypeCategory::Int(IntWidth::Tiny));
/// assert_eq!(category_of(Dialect::Sqlite, "int8")?, TypeCategory::Int(IntWidth::Big));
/// assert!(category_of(Dialect::MySql, "geometry").is_err());
/// # Ok::<(), SqlDialectError>(())
/// ```
///
/// # Errors
/// Returns `SqlDialectError::UnsupportedType` when the name is not in the dialect's table.
pub fn category_of(dialect: Dialect, raw_type_name: &str) -> Result<TypeCategory, SqlDialectError> {
    let key = lookup_key(raw_type_name);
    let category = match dialect {
        Dialect::MySql => mysql_category(&key),
        Dialect::Sqlite => sqlite_category(&key),
        Dialect::Postgres => postgres_category(&key),
    };
    category.ok_or_else(|| SqlDialectError::UnsupportedType {
        dialect,
        type_name: raw_type_name.to_string(),
    })
}

fn lookup_key(raw: &str) -> String {
    let lower = raw.trim().to_ascii_lowercase();
    let without_params = match (lower.find('('), lower.rfind(')')) {
        (Some(open), Some(close)) if close > open => {
            format!("{}{}", &lower[..open], &lower[close + 1..])
        }
        _ => lower,
    };
    let trimmed = without_params.trim();
    let trimmed = trimmed.strip_suffix("zerofill").unwrap_or(trimmed).trim_end();
    let trimmed = trimmed.strip_suffix("unsigned").unwrap_or(trimmed).trim_end();
    // collapse runs of whitespace in multi-word names
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn mysql_category(name: &str) -> Option<TypeCategory> {
    use TypeCategory::{Bool, Date, Float, Int, Text, Timestamp};
    Some(match name {
        "char" | "varchar" | "tinytext" | "text" | "mediumtext" | "longtext" | "enum" | "set"
        | "json" => Text,
        "tinyint" => Int(IntWidth::Tiny),
        "smallint" => Int(IntWidth::Small),
        "mediumint" => Int(IntWidth::Medium),
        "int" | "integer" | "year" => Int(IntWidth::Normal),
        "bigint" => Int(IntWidth::Big),
        "float" | "double" | "double precision" | "real" | "decimal" | "dec" | "numeric"
        | "fixed" => Float,
        "bool" | "boolean" | "bit" => Bool,
        "date" => Date,
        "datetime" | "timestamp" => Timestamp,
        _ => return None,
    })
}

fn sqlite_category(name: &str) -> Option<TypeCategory> {
    use TypeCategory::{Bool, Date, Float, Int, Text, Timestamp};
    Some(match name {
        "text" | "char" | "varchar" | "character" | "varying character" | "nchar"
        | "native character" | "nvarchar" | "clob" => Text,
        "tinyint" => Int(IntWidth::Tiny),
        "int2" | "smallint" => Int(IntWidth::Small),
        "mediumint" => Int(IntWidth::Medium),
        "int" | "integer" => Int(IntWidth::Normal),
        "int8" | "bigint" | "unsigned big int" => Int(IntWidth::Big),
        "real" | "double" | "double precision" | "float" | "numeric" | "decimal" => Float,
        "bool" | "boolean" => Bool,
        "date" => Date,
        "datetime" | "timestamp" => Timestamp,
        _ => return None,
    })
}

fn postgres_category(name: &str) -> Option<TypeCategory> {
    use TypeCategory::{Bool, Date, Float, Int, Text, Timestamp};
    Some(match name {
        "text" | "varchar" | "character varying" | "char" | "character" | "bpchar" | "name"
        | "uuid" | "citext" => Text,
        "smallint" | "int2" | "smallserial" | "serial2" => Int(IntWidth::Small),
        "integer" | "int" | "int4" | "serial" | "serial4" => Int(IntWidth::Normal),
        "bigint" | "int8" | "bigserial" | "serial8" => Int(IntWidth::Big),
        "real" | "float4" | "double precision" | "float8" | "float" | "numeric" | "decimal" => {
            Float
        }
        "boolean" | "bool" => Bool,
        "date" => Date,
        "timestamp"
        | "timestamptz"
        | "timestamp without time zone"
        | "timestamp with time zone" => Timestamp,
        _ => return None,
    })
}
