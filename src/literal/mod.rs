//! Type-directed rendering of application values as SQL literal text.
//!
//! A [`ValueSerializer`] resolves a raw column type through the alias tables and then
//! applies the rules of the resulting [`TypeCategory`]. Dialects only supply the
//! hooks that differ: string quoting, boundary values, clock expressions and the
//! date-literal wrapper.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, TimeZone, Timelike};

use crate::aliases::{IntWidth, TypeCategory, category_of};
use crate::config::DateDelimiters;
use crate::error::SqlDialectError;
use crate::types::{Dialect, Sentinel, SqlValue};

mod mysql;
mod postgres;
mod sqlite;

pub use mysql::MySqlSerializer;
pub use postgres::PostgresSerializer;
pub use sqlite::SqliteSerializer;

const NULL: &str = "NULL";

/// The two temporal categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Temporal {
    Date,
    Timestamp,
}

impl Temporal {
    #[must_use]
    pub fn from_category(category: TypeCategory) -> Option<Self> {
        match category {
            TypeCategory::Date => Some(Temporal::Date),
            TypeCategory::Timestamp => Some(Temporal::Timestamp),
            _ => None,
        }
    }
}

/// Calendar fields before formatting; month and day are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarFields {
    pub year: i64,
    pub month: i64,
    pub day: i64,
    pub hour: i64,
    pub minute: i64,
    pub second: i64,
}

impl CalendarFields {
    #[must_use]
    pub const fn new(year: i64, month: i64, day: i64, hour: i64, minute: i64, second: i64) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Build from `[year, month?, day?, hour?, minute?, second?]`.
    ///
    /// # Errors
    /// Returns `SqlDialectError::InvalidValueShape` for an empty list, more than six
    /// fields or a negative field.
    pub fn from_positional(fields: &[i64]) -> Result<Self, SqlDialectError> {
        if fields.is_empty() || fields.len() > 6 {
            return Err(SqlDialectError::InvalidValueShape(format!(
                "calendar fields need 1 to 6 entries, got {}",
                fields.len()
            )));
        }
        if fields.iter().any(|f| *f < 0) {
            return Err(SqlDialectError::InvalidValueShape(format!(
                "negative calendar field in {fields:?}"
            )));
        }
        let at = |i: usize, default: i64| fields.get(i).copied().unwrap_or(default);
        Ok(Self::new(at(0, 0), at(1, 1), at(2, 1), at(3, 0), at(4, 0), at(5, 0)))
    }

    #[must_use]
    pub fn from_datetime(value: NaiveDateTime) -> Self {
        Self::new(
            i64::from(value.year()),
            i64::from(value.month()),
            i64::from(value.day()),
            i64::from(value.hour()),
            i64::from(value.minute()),
            i64::from(value.second()),
        )
    }

    #[must_use]
    pub fn from_date(value: NaiveDate) -> Self {
        Self::new(
            i64::from(value.year()),
            i64::from(value.month()),
            i64::from(value.day()),
            0,
            0,
            0,
        )
    }

    /// Zero-padded text using `delimiters`; the time part is only written for timestamps.
    #[must_use]
    pub fn format(&self, kind: Temporal, delimiters: &DateDelimiters) -> String {
        let d = &delimiters.date;
        let date = format!("{:04}{d}{:02}{d}{:02}", self.year, self.month, self.day);
        match kind {
            Temporal::Date => date,
            Temporal::Timestamp => {
                let t = &delimiters.time;
                format!(
                    "{date}{}{:02}{t}{:02}{t}{:02}",
                    delimiters.join, self.hour, self.minute, self.second
                )
            }
        }
    }
}

/// Converts application values into SQL literal text for one dialect.
///
/// ```rust
/// use sql_dialect::prelude::*;
///
/// let mysql = MySqlSerializer::default();
/// assert_eq!(mysql.to_literal(&SqlValue::Sentinel(Sentinel::Min), "int")?, "-2147483648");
/// assert_eq!(mysql.to_literal(&"".into(), "varchar(20)")?, "NULL");
/// assert_eq!(
///     mysql.to_literal(&SqlValue::Fields(vec![2013, 1, 2]), "date")?,
///     "STR_TO_DATE('2013-01-02','%Y-%m-%d')"
/// );
/// # Ok::<(), SqlDialectError>(())
/// ```
pub trait ValueSerializer: Send + Sync {
    fn dialect(&self) -> Dialect;

    fn delimiters(&self) -> &DateDelimiters;

    /// Quote `text` as a string literal.
    fn quote(&self, text: &str) -> String {
        format!("'{}'", text.replace('\'', "''"))
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        if value { "1" } else { "0" }
    }

    /// Literals emitted for MIN and MAX on float columns.
    fn float_bounds(&self) -> (&'static str, &'static str);

    /// Expression for the current date or time.
    fn now(&self, kind: Temporal) -> &'static str;

    /// Smallest and largest representable date/time.
    fn temporal_bounds(&self) -> (CalendarFields, CalendarFields);

    /// Format pattern matching [`CalendarFields::format`] under this dialect's
    /// date functions.
    fn format_pattern(&self, kind: Temporal) -> String;

    /// Wrap an already quoted date string in the dialect's date-literal function.
    fn wrap_temporal(&self, quoted: &str, kind: Temporal) -> String;

    /// Resolve `type_name` and render `value` for it.
    ///
    /// # Errors
    /// `UnsupportedType` when the type is not in the dialect's alias table,
    /// `InvalidValueShape` when the value does not fit the resolved category.
    fn to_literal(&self, value: &SqlValue, type_name: &str) -> Result<String, SqlDialectError> {
        let category = category_of(self.dialect(), type_name)?;
        self.literal_for(value, category)
    }

    /// Render `value` for an already resolved category.
    ///
    /// # Errors
    /// `InvalidValueShape` when the value does not fit `category`.
    fn literal_for(
        &self,
        value: &SqlValue,
        category: TypeCategory,
    ) -> Result<String, SqlDialectError> {
        if value.is_null_or_empty() {
            return Ok(NULL.to_string());
        }
        match category {
            TypeCategory::Text => text_literal(self, value, category),
            TypeCategory::Int(width) => int_literal(value, width, category),
            TypeCategory::Float => float_literal(self, value, category),
            TypeCategory::Bool => bool_literal(self, value, category),
            TypeCategory::Date => temporal_literal(self, value, Temporal::Date, category),
            TypeCategory::Timestamp => {
                temporal_literal(self, value, Temporal::Timestamp, category)
            }
        }
    }
}

fn shape_error(value: &SqlValue, category: TypeCategory) -> SqlDialectError {
    SqlDialectError::InvalidValueShape(format!(
        "{} value cannot be written to a {category:?} column",
        value.shape()
    ))
}

fn text_literal<S: ValueSerializer + ?Sized>(
    serializer: &S,
    value: &SqlValue,
    category: TypeCategory,
) -> Result<String, SqlDialectError> {
    let text = match value {
        SqlValue::Text(s) => s.clone(),
        SqlValue::Int(i) => i.to_string(),
        SqlValue::Float(f) => f.to_string(),
        SqlValue::Bool(b) => String::from(if *b { "1" } else { "0" }),
        SqlValue::Date(d) => {
            CalendarFields::from_date(*d).format(Temporal::Date, serializer.delimiters())
        }
        SqlValue::Timestamp(ts) => {
            CalendarFields::from_datetime(*ts).format(Temporal::Timestamp, serializer.delimiters())
        }
        SqlValue::Sentinel(s) => s.token().to_string(),
        SqlValue::Null | SqlValue::Fields(_) | SqlValue::Blob(_) => {
            return Err(shape_error(value, category));
        }
    };
    Ok(serializer.quote(&text))
}

fn int_literal(
    value: &SqlValue,
    width: IntWidth,
    category: TypeCategory,
) -> Result<String, SqlDialectError> {
    let (min, max) = width.bounds();
    match value {
        SqlValue::Sentinel(Sentinel::Min) => Ok(min.to_string()),
        SqlValue::Sentinel(Sentinel::Max) => Ok(max.to_string()),
        SqlValue::Int(i) => Ok(i.to_string()),
        SqlValue::Float(f) if f.is_finite() => Ok(f.to_string()),
        SqlValue::Bool(b) => Ok(i64::from(*b).to_string()),
        // caller-trusted numeric text or expression
        SqlValue::Text(s) => Ok(s.clone()),
        _ => Err(shape_error(value, category)),
    }
}

fn float_literal<S: ValueSerializer + ?Sized>(
    serializer: &S,
    value: &SqlValue,
    category: TypeCategory,
) -> Result<String, SqlDialectError> {
    let (min, max) = serializer.float_bounds();
    match value {
        SqlValue::Sentinel(Sentinel::Min) => Ok(min.to_string()),
        SqlValue::Sentinel(Sentinel::Max) => Ok(max.to_string()),
        SqlValue::Int(i) => Ok(i.to_string()),
        SqlValue::Float(f) if f.is_finite() => Ok(f.to_string()),
        SqlValue::Bool(b) => Ok(i64::from(*b).to_string()),
        SqlValue::Text(s) => Ok(s.clone()),
        _ => Err(shape_error(value, category)),
    }
}

fn bool_literal<S: ValueSerializer + ?Sized>(
    serializer: &S,
    value: &SqlValue,
    category: TypeCategory,
) -> Result<String, SqlDialectError> {
    let truthy = match value {
        SqlValue::Sentinel(Sentinel::Min) => false,
        SqlValue::Sentinel(Sentinel::Max) => true,
        SqlValue::Bool(b) => *b,
        SqlValue::Int(i) => *i != 0,
        SqlValue::Float(f) => *f != 0.0,
        // the flag spellings drivers hand back, as in `RowValues::as_flag`
        SqlValue::Text(s) => !matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "0" | "false" | "f" | "no" | "off"
        ),
        _ => return Err(shape_error(value, category)),
    };
    Ok(serializer.bool_literal(truthy).to_string())
}

fn temporal_literal<S: ValueSerializer + ?Sized>(
    serializer: &S,
    value: &SqlValue,
    kind: Temporal,
    category: TypeCategory,
) -> Result<String, SqlDialectError> {
    let fields = match value {
        SqlValue::Sentinel(Sentinel::Now) => return Ok(serializer.now(kind).to_string()),
        SqlValue::Sentinel(Sentinel::Min) => serializer.temporal_bounds().0,
        SqlValue::Sentinel(Sentinel::Max) => serializer.temporal_bounds().1,
        SqlValue::Text(preformatted) => {
            return Ok(serializer.wrap_temporal(&serializer.quote(preformatted), kind));
        }
        SqlValue::Fields(fields) => CalendarFields::from_positional(fields)?,
        SqlValue::Date(date) => CalendarFields::from_date(*date),
        SqlValue::Timestamp(ts) => CalendarFields::from_datetime(*ts),
        SqlValue::Int(unix) => CalendarFields::from_datetime(local_datetime(*unix)?),
        _ => return Err(shape_error(value, category)),
    };
    let formatted = fields.format(kind, serializer.delimiters());
    Ok(serializer.wrap_temporal(&serializer.quote(&formatted), kind))
}

/// Unix seconds as wall-clock time in the local timezone.
fn local_datetime(unix: i64) -> Result<NaiveDateTime, SqlDialectError> {
    Local
        .timestamp_opt(unix, 0)
        .single()
        .map(|dt| dt.naive_local())
        .ok_or_else(|| {
            SqlDialectError::InvalidValueShape(format!("unix timestamp {unix} out of range"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_fields_default_and_pad() {
        let delims = DateDelimiters::default();
        let fields = CalendarFields::from_positional(&[2013]).unwrap();
        assert_eq!(fields.format(Temporal::Timestamp, &delims), "2013-01-01 00:00:00");

        let fields = CalendarFields::from_positional(&[99, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(fields.format(Temporal::Date, &delims), "0099-02-03");
        assert_eq!(fields.format(Temporal::Timestamp, &delims), "0099-02-03 04:05:06");
    }

    #[test]
    fn positional_fields_reject_bad_shapes() {
        assert!(CalendarFields::from_positional(&[]).is_err());
        assert!(CalendarFields::from_positional(&[1, 2, 3, 4, 5, 6, 7]).is_err());
        assert!(matches!(
            CalendarFields::from_positional(&[2013, -1]),
            Err(SqlDialectError::InvalidValueShape(_))
        ));
    }

    #[test]
    fn null_and_empty_collapse_for_every_dialect() {
        let serializers: Vec<Box<dyn ValueSerializer>> = vec![
            Box::new(MySqlSerializer::default()),
            Box::new(SqliteSerializer::default()),
            Box::new(PostgresSerializer::default()),
        ];
        for s in &serializers {
            assert_eq!(s.to_literal(&SqlValue::Null, "text").unwrap(), "NULL");
            assert_eq!(s.to_literal(&"".into(), "text").unwrap(), "NULL");
            assert_eq!(s.to_literal(&"".into(), "date").unwrap(), "NULL");
            assert_eq!(s.to_literal(&SqlValue::Null, "integer").unwrap(), "NULL");
        }
    }

    #[test]
    fn unknown_types_are_rejected_before_values() {
        let err = SqliteSerializer::default()
            .to_literal(&SqlValue::Null, "geometry")
            .unwrap_err();
        assert!(matches!(err, SqlDialectError::UnsupportedType { .. }));
    }

    #[test]
    fn int_rules() {
        let s = SqliteSerializer::default();
        let int = TypeCategory::Int(IntWidth::Tiny);
        assert_eq!(s.literal_for(&SqlValue::Int(42), int).unwrap(), "42");
        assert_eq!(s.literal_for(&Sentinel::Min.into(), int).unwrap(), "-128");
        assert_eq!(s.literal_for(&Sentinel::Max.into(), int).unwrap(), "127");
        assert_eq!(s.literal_for(&"id + 1".into(), int).unwrap(), "id + 1");
        assert!(s.literal_for(&Sentinel::Now.into(), int).is_err());
        assert!(s.literal_for(&SqlValue::Fields(vec![1]), int).is_err());
    }

    #[test]
    fn bool_rules() {
        let s = SqliteSerializer::default();
        let b = TypeCategory::Bool;
        assert_eq!(s.literal_for(&Sentinel::Min.into(), b).unwrap(), "0");
        assert_eq!(s.literal_for(&Sentinel::Max.into(), b).unwrap(), "1");
        assert_eq!(s.literal_for(&SqlValue::Int(7), b).unwrap(), "1");
        assert_eq!(s.literal_for(&"0".into(), b).unwrap(), "0");
        assert_eq!(s.literal_for(&"yes".into(), b).unwrap(), "1");
        assert_eq!(s.literal_for(&false.into(), b).unwrap(), "0");
    }

    #[test]
    fn bool_text_false_spellings() {
        let s = PostgresSerializer::default();
        let b = TypeCategory::Bool;
        for falsy in ["0", "false", "F", " off ", "No"] {
            assert_eq!(s.literal_for(&falsy.into(), b).unwrap(), "FALSE", "{falsy:?}");
        }
        for truthy in ["1", "true", "t", "anything", " "] {
            assert_eq!(s.literal_for(&truthy.into(), b).unwrap(), "TRUE", "{truthy:?}");
        }
    }

    #[test]
    fn float_rules() {
        let s = SqliteSerializer::default();
        assert_eq!(s.literal_for(&1.5.into(), TypeCategory::Float).unwrap(), "1.5");
        assert_eq!(s.literal_for(&SqlValue::Int(3), TypeCategory::Float).unwrap(), "3");
        assert!(s.literal_for(&f64::NAN.into(), TypeCategory::Float).is_err());
    }

    #[test]
    fn text_quotes_scalars() {
        let s = SqliteSerializer::default();
        assert_eq!(s.literal_for(&"it's".into(), TypeCategory::Text).unwrap(), "'it''s'");
        assert_eq!(s.literal_for(&SqlValue::Int(5), TypeCategory::Text).unwrap(), "'5'");
        assert_eq!(
            s.literal_for(&SqlValue::Text("NOW".into()), TypeCategory::Text).unwrap(),
            "'NOW'"
        );
        assert!(s.literal_for(&SqlValue::Blob(vec![1]), TypeCategory::Text).is_err());
    }

    #[test]
    fn temporal_rejects_other_shapes() {
        let s = SqliteSerializer::default();
        let err = s.literal_for(&true.into(), TypeCategory::Date).unwrap_err();
        assert!(matches!(err, SqlDialectError::InvalidValueShape(_)));
        assert!(s.literal_for(&2.5.into(), TypeCategory::Timestamp).is_err());
    }

    #[test]
    fn unix_timestamps_use_local_time() {
        let s = SqliteSerializer::default();
        let unix = 1_357_092_245;
        let expected = Local
            .timestamp_opt(unix, 0)
            .unwrap()
            .naive_local()
            .format("datetime('%Y-%m-%d %H:%M:%S')")
            .to_string();
        assert_eq!(
            s.literal_for(&SqlValue::Int(unix), TypeCategory::Timestamp).unwrap(),
            expected
        );
    }

    #[test]
    fn serialization_is_deterministic() {
        let s = MySqlSerializer::default();
        let value = SqlValue::Fields(vec![2020, 2, 29, 12]);
        assert_eq!(
            s.to_literal(&value, "datetime").unwrap(),
            s.to_literal(&value, "datetime").unwrap()
        );
    }
}
