use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// The SQL dialects this crate knows how to normalize for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// `MySQL` / `MariaDB`
    #[value(name = "mysql")]
    MySql,
    /// `SQLite`
    Sqlite,
    /// `PostgreSQL`
    Postgres,
}

impl Dialect {
    /// Map a connection-string driver name onto a dialect.
    ///
    /// ```rust
    /// use sql_dialect::prelude::*;
    ///
    /// assert_eq!(Dialect::from_driver("PostgreSQL"), Some(Dialect::Postgres));
    /// assert_eq!(Dialect::from_driver("oracle"), None);
    /// ```
    #[must_use]
    pub fn from_driver(driver: &str) -> Option<Self> {
        match driver.to_ascii_lowercase().as_str() {
            "mysql" | "mysqli" | "mariadb" => Some(Dialect::MySql),
            "sqlite" | "sqlite3" => Some(Dialect::Sqlite),
            "postgres" | "postgresql" | "pgsql" => Some(Dialect::Postgres),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::MySql => "mysql",
            Dialect::Sqlite => "sqlite",
            Dialect::Postgres => "postgres",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reserved tokens that request a dialect-specific boundary or clock expression
/// instead of literal data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentinel {
    Now,
    Min,
    Max,
}

impl Sentinel {
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Sentinel::Now => "NOW",
            Sentinel::Min => "MIN",
            Sentinel::Max => "MAX",
        }
    }
}

/// Application values handed to a `ValueSerializer`.
///
/// Sentinels are their own variant, so `SqlValue::Text("NOW".into())` is ordinary text:
/// ```rust
/// use sql_dialect::prelude::*;
///
/// let values = vec![
///     SqlValue::Int(1),
///     SqlValue::Text("alice".into()),
///     SqlValue::Sentinel(Sentinel::Now),
///     SqlValue::Fields(vec![2013, 1, 2]),
/// ];
/// # let _ = values;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL value
    Null,
    /// Integer value (64-bit); a unix timestamp when bound to a date/timestamp column
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Calendar date
    Date(NaiveDate),
    /// Calendar date and wall-clock time
    Timestamp(NaiveDateTime),
    /// Positional calendar fields: `[year, month?, day?, hour?, minute?, second?]`
    Fields(Vec<i64>),
    /// NOW / MIN / MAX
    Sentinel(Sentinel),
    /// Binary data
    Blob(Vec<u8>),
}

impl SqlValue {
    /// NULL and the empty string collapse to the same SQL literal.
    #[must_use]
    pub fn is_null_or_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Short name of the runtime shape, used in error messages.
    #[must_use]
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Bool(_) => "bool",
            Self::Date(_) => "date",
            Self::Timestamp(_) => "timestamp",
            Self::Fields(_) => "calendar fields",
            Self::Sentinel(_) => "sentinel",
            Self::Blob(_) => "blob",
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(value: NaiveDate) -> Self {
        SqlValue::Date(value)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(value: NaiveDateTime) -> Self {
        SqlValue::Timestamp(value)
    }
}

impl From<Sentinel> for SqlValue {
    fn from(value: Sentinel) -> Self {
        SqlValue::Sentinel(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}

/// Values found in the rows a database driver returns for introspection queries.
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Render scalar cells as text; NULL and blobs yield `None`.
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        match self {
            RowValues::Text(s) => Some(s.clone()),
            RowValues::Int(i) => Some(i.to_string()),
            RowValues::Float(f) => Some(f.to_string()),
            RowValues::Bool(b) => Some(b.to_string()),
            RowValues::Timestamp(ts) => Some(ts.format("%Y-%m-%d %H:%M:%S").to_string()),
            RowValues::Null | RowValues::Blob(_) => None,
        }
    }

    /// Interpret a flag column. Drivers disagree on how they hand these back
    /// (`t`, `1`, `YES`, native booleans), so accept all of them.
    #[must_use]
    pub fn as_flag(&self) -> bool {
        match self {
            RowValues::Bool(b) => *b,
            RowValues::Int(i) => *i != 0,
            RowValues::Float(f) => *f != 0.0,
            RowValues::Text(s) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "t" | "true" | "1" | "y" | "yes" | "on"
            ),
            RowValues::Timestamp(_) | RowValues::Null | RowValues::Blob(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_names_map_to_dialects() {
        assert_eq!(Dialect::from_driver("mysql"), Some(Dialect::MySql));
        assert_eq!(Dialect::from_driver("MariaDB"), Some(Dialect::MySql));
        assert_eq!(Dialect::from_driver("sqlite3"), Some(Dialect::Sqlite));
        assert_eq!(Dialect::from_driver("pgsql"), Some(Dialect::Postgres));
        assert_eq!(Dialect::from_driver("mssql"), None);
    }

    #[test]
    fn dialect_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Dialect::MySql).unwrap();
        assert_eq!(json, "\"mysql\"");
        let back: Dialect = serde_json::from_str("\"postgres\"").unwrap();
        assert_eq!(back, Dialect::Postgres);
    }

    #[test]
    fn empty_text_collapses_with_null() {
        assert!(SqlValue::Null.is_null_or_empty());
        assert!(SqlValue::Text(String::new()).is_null_or_empty());
        assert!(!SqlValue::Text(" ".into()).is_null_or_empty());
        assert!(!SqlValue::Int(0).is_null_or_empty());
    }

    #[test]
    fn option_values_become_null() {
        let none: Option<i64> = None;
        assert_eq!(SqlValue::from(none), SqlValue::Null);
        assert_eq!(SqlValue::from(Some("x")), SqlValue::Text("x".into()));
    }

    #[test]
    fn flags_accept_driver_spellings() {
        assert!(RowValues::Text("t".into()).as_flag());
        assert!(RowValues::Text("YES".into()).as_flag());
        assert!(RowValues::Int(1).as_flag());
        assert!(RowValues::Bool(true).as_flag());
        assert!(!RowValues::Text("NO".into()).as_flag());
        assert!(!RowValues::Null.as_flag());
    }
}
