use super::{CalendarFields, Temporal, ValueSerializer};
use crate::config::DateDelimiters;
use crate::types::Dialect;

/// `PostgreSQL` literals: `TO_DATE`/`TO_TIMESTAMP` wrappers and native booleans.
#[derive(Debug, Clone, Default)]
pub struct PostgresSerializer {
    delimiters: DateDelimiters,
}

impl PostgresSerializer {
    #[must_use]
    pub fn new(delimiters: DateDelimiters) -> Self {
        Self { delimiters }
    }
}

impl ValueSerializer for PostgresSerializer {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn delimiters(&self) -> &DateDelimiters {
        &self.delimiters
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        if value { "TRUE" } else { "FALSE" }
    }

    fn float_bounds(&self) -> (&'static str, &'static str) {
        ("-9223372036854775808", "9223372036854775807")
    }

    fn now(&self, kind: Temporal) -> &'static str {
        match kind {
            Temporal::Date => "CURRENT_DATE",
            Temporal::Timestamp => "NOW()",
        }
    }

    fn temporal_bounds(&self) -> (CalendarFields, CalendarFields) {
        (
            CalendarFields::new(1, 1, 1, 0, 0, 0),
            CalendarFields::new(9999, 12, 31, 23, 59, 59),
        )
    }

    fn format_pattern(&self, kind: Temporal) -> String {
        let DateDelimiters { date, time, join } = &self.delimiters;
        match kind {
            Temporal::Date => format!("YYYY{date}MM{date}DD"),
            Temporal::Timestamp => format!("YYYY{date}MM{date}DD{join}HH24{time}MI{time}SS"),
        }
    }

    fn wrap_temporal(&self, quoted: &str, kind: Temporal) -> String {
        let function = match kind {
            Temporal::Date => "TO_DATE",
            Temporal::Timestamp => "TO_TIMESTAMP",
        };
        format!("{function}({quoted},{})", self.quote(&self.format_pattern(kind)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Sentinel, SqlValue};

    fn lit(value: impl Into<SqlValue>, type_name: &str) -> String {
        PostgresSerializer::default()
            .to_literal(&value.into(), type_name)
            .unwrap()
    }

    #[test]
    fn booleans_are_keywords() {
        assert_eq!(lit(true, "boolean"), "TRUE");
        assert_eq!(lit("f", "bool"), "FALSE");
        assert_eq!(lit(Sentinel::Max, "bool"), "TRUE");
    }

    #[test]
    fn dates_use_to_date_and_to_timestamp() {
        assert_eq!(
            lit(SqlValue::Fields(vec![2013, 1, 2]), "date"),
            "TO_DATE('2013-01-02','YYYY-MM-DD')"
        );
        assert_eq!(
            lit(SqlValue::Fields(vec![2013, 1, 2, 3, 4, 5]), "timestamp with time zone"),
            "TO_TIMESTAMP('2013-01-02 03:04:05','YYYY-MM-DD HH24:MI:SS')"
        );
        assert_eq!(lit(Sentinel::Now, "date"), "CURRENT_DATE");
        assert_eq!(lit(Sentinel::Now, "timestamptz"), "NOW()");
        assert_eq!(
            lit(Sentinel::Min, "date"),
            "TO_DATE('0001-01-01','YYYY-MM-DD')"
        );
    }

    #[test]
    fn integers_by_width() {
        assert_eq!(lit(Sentinel::Min, "smallint"), "-32768");
        assert_eq!(lit(Sentinel::Max, "bigserial"), "9223372036854775807");
        assert_eq!(lit(12_i64, "int4"), "12");
    }
}
