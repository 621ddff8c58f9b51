use std::sync::LazyLock;

use regex::Regex;

use crate::types::Dialect;

static ENUM_SIGNATURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^\s*enum\s*\((.*)\)\s*$").expect("enum signature regex"));
static QUOTED_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'(?:[^']|'')*'").expect("quoted literal regex"));
static PRECISION_SCALE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(\w+(?:\s+\w+)*?)\s*\(\s*(\d+)\s*,\s*(\d+)\s*\)(?:\s+(unsigned))?(?:\s+zerofill)?\s*$",
    )
    .expect("precision/scale regex")
});
static LENGTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(\w+(?:\s+\w+)*?)\s*\(\s*(\d+)\s*\)(?:\s+(unsigned))?(?:\s+zerofill)?\s*$")
        .expect("length regex")
});
static BARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(\w+(?:\s+\w+)*?)(?:\s+(unsigned))?(?:\s+zerofill)?\s*$")
        .expect("bare type regex")
});

/// A vendor type string broken into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSignature {
    pub base_type: String,
    pub max_length: Option<i64>,
    pub scale: Option<i64>,
    /// Only reported for `MySQL`, the one dialect with unsigned integers.
    pub unsigned: Option<bool>,
}

impl TypeSignature {
    fn bare(base_type: &str) -> Self {
        Self {
            base_type: base_type.to_string(),
            max_length: None,
            scale: None,
            unsigned: None,
        }
    }
}

/// Parse a type signature such as `varchar(255)`, `decimal(10,5)` or `int(10) unsigned`.
///
/// Patterns are tried in order and the first match wins. A string that matches none
/// of them comes back verbatim as the base type without length metadata.
///
/// ```rust
/// use sql_dialect::prelude::*;
///
/// let sig = parse_type_signature(Dialect::MySql, "enum('female','male')");
/// assert_eq!(sig.base_type, "enum");
/// assert_eq!(sig.max_length, Some(6));
/// ```
#[must_use]
pub fn parse_type_signature(dialect: Dialect, raw: &str) -> TypeSignature {
    let report_unsigned = dialect == Dialect::MySql;
    let unsigned = |caps: &regex::Captures<'_>, group: usize| {
        report_unsigned.then(|| caps.get(group).is_some())
    };

    if let Some(caps) = ENUM_SIGNATURE.captures(raw) {
        let longest = QUOTED_LITERAL
            .find_iter(&caps[1])
            .map(|m| m.as_str().chars().count())
            .max()
            .unwrap_or(0);
        return TypeSignature {
            base_type: "enum".to_string(),
            max_length: Some((longest.saturating_sub(2)).max(1) as i64),
            scale: None,
            unsigned: None,
        };
    }

    if let Some(caps) = PRECISION_SCALE.captures(raw) {
        return TypeSignature {
            base_type: caps[1].to_string(),
            max_length: Some(digits(&caps[2])),
            scale: Some(digits(&caps[3])),
            unsigned: unsigned(&caps, 4),
        };
    }

    if let Some(caps) = LENGTH.captures(raw) {
        return TypeSignature {
            base_type: caps[1].to_string(),
            max_length: Some(digits(&caps[2])),
            scale: None,
            unsigned: unsigned(&caps, 3),
        };
    }

    if let Some(caps) = BARE.captures(raw) {
        return TypeSignature {
            unsigned: unsigned(&caps, 2),
            ..TypeSignature::bare(&caps[1])
        };
    }

    tracing::trace!(raw, "type signature kept verbatim");
    TypeSignature::bare(raw)
}

/// `\d` also matches non-ASCII digits; anything that does not parse as an `i64`
/// is recorded as `-1` rather than rejected.
fn digits(capture: &str) -> i64 {
    capture.parse().unwrap_or(-1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precision_and_scale() {
        let sig = parse_type_signature(Dialect::Sqlite, "decimal(10,5)");
        assert_eq!(sig.base_type, "decimal");
        assert_eq!(sig.max_length, Some(10));
        assert_eq!(sig.scale, Some(5));
        assert_eq!(sig.unsigned, None);
    }

    #[test]
    fn enum_length_excludes_quotes() {
        let sig = parse_type_signature(Dialect::MySql, "enum('female','male')");
        assert_eq!(sig.base_type, "enum");
        assert_eq!(sig.max_length, Some(6));
        assert_eq!(sig.scale, None);

        let sig = parse_type_signature(Dialect::MySql, "enum('')");
        assert_eq!(sig.max_length, Some(1));

        let sig = parse_type_signature(Dialect::MySql, "enum('a,b','it''s')");
        assert_eq!(sig.max_length, Some(5));
    }

    #[test]
    fn length_with_unsigned() {
        let sig = parse_type_signature(Dialect::MySql, "int(10) unsigned");
        assert_eq!(sig.base_type, "int");
        assert_eq!(sig.max_length, Some(10));
        assert_eq!(sig.unsigned, Some(true));

        let sig = parse_type_signature(Dialect::MySql, "varchar(255)");
        assert_eq!(sig.max_length, Some(255));
        assert_eq!(sig.unsigned, Some(false));
    }

    #[test]
    fn bare_numeric_types() {
        let sig = parse_type_signature(Dialect::MySql, "bigint unsigned");
        assert_eq!(sig.base_type, "bigint");
        assert_eq!(sig.max_length, None);
        assert_eq!(sig.unsigned, Some(true));

        let sig = parse_type_signature(Dialect::Sqlite, "INTEGER");
        assert_eq!(sig.base_type, "INTEGER");
        assert_eq!(sig.unsigned, None);
    }

    #[test]
    fn multi_word_names() {
        let sig = parse_type_signature(Dialect::Postgres, "character varying(64)");
        assert_eq!(sig.base_type, "character varying");
        assert_eq!(sig.max_length, Some(64));

        let sig = parse_type_signature(Dialect::Postgres, "double precision");
        assert_eq!(sig.base_type, "double precision");
    }

    #[test]
    fn unmatched_signatures_fall_back_verbatim() {
        let raw = "timestamp(3) without time zone";
        let sig = parse_type_signature(Dialect::Postgres, raw);
        assert_eq!(sig.base_type, raw);
        assert_eq!(sig.max_length, None);
        assert_eq!(sig.scale, None);
    }

    #[test]
    fn unparseable_digit_captures_become_minus_one() {
        let sig = parse_type_signature(Dialect::MySql, "varchar(\u{0663}\u{0662})");
        assert_eq!(sig.base_type, "varchar");
        assert_eq!(sig.max_length, Some(-1));

        let sig = parse_type_signature(Dialect::MySql, "decimal(99999999999999999999,2)");
        assert_eq!(sig.max_length, Some(-1));
        assert_eq!(sig.scale, Some(2));
    }
}
