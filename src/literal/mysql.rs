use super::{CalendarFields, Temporal, ValueSerializer};
use crate::config::DateDelimiters;
use crate::types::Dialect;

/// `MySQL` literals: `STR_TO_DATE` wrappers and backslash-aware quoting.
#[derive(Debug, Clone, Default)]
pub struct MySqlSerializer {
    delimiters: DateDelimiters,
}

impl MySqlSerializer {
    #[must_use]
    pub fn new(delimiters: DateDelimiters) -> Self {
        Self { delimiters }
    }
}

impl ValueSerializer for MySqlSerializer {
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    fn delimiters(&self) -> &DateDelimiters {
        &self.delimiters
    }

    fn quote(&self, text: &str) -> String {
        // backslash is an escape character unless NO_BACKSLASH_ESCAPES is set
        format!("'{}'", text.replace('\\', "\\\\").replace('\'', "''"))
    }

    fn float_bounds(&self) -> (&'static str, &'static str) {
        ("'-3.402823466E+38'", "'3.402823466E+38'")
    }

    fn now(&self, kind: Temporal) -> &'static str {
        match kind {
            Temporal::Date => "CURDATE()",
            Temporal::Timestamp => "NOW()",
        }
    }

    fn temporal_bounds(&self) -> (CalendarFields, CalendarFields) {
        (
            CalendarFields::new(1000, 1, 1, 0, 0, 0),
            CalendarFields::new(9999, 12, 31, 23, 59, 59),
        )
    }

    fn format_pattern(&self, kind: Temporal) -> String {
        let DateDelimiters { date, time, join } = &self.delimiters;
        match kind {
            Temporal::Date => format!("%Y{date}%m{date}%d"),
            Temporal::Timestamp => format!("%Y{date}%m{date}%d{join}%H{time}%i{time}%s"),
        }
    }

    fn wrap_temporal(&self, quoted: &str, kind: Temporal) -> String {
        format!(
            "STR_TO_DATE({quoted},{})",
            self.quote(&self.format_pattern(kind))
        )
    }
}
