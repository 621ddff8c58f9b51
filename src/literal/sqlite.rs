use super::{CalendarFields, Temporal, ValueSerializer};
use crate::config::DateDelimiters;
use crate::types::Dialect;

/// `SQLite` literals: `date()`/`datetime()` wrappers and `'now'`.
#[derive(Debug, Clone, Default)]
pub struct SqliteSerializer {
    delimiters: DateDelimiters,
}

impl SqliteSerializer {
    #[must_use]
    pub fn new(delimiters: DateDelimiters) -> Self {
        Self { delimiters }
    }
}

impl ValueSerializer for SqliteSerializer {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn delimiters(&self) -> &DateDelimiters {
        &self.delimiters
    }

    fn float_bounds(&self) -> (&'static str, &'static str) {
        ("-9223372036854775808", "9223372036854775807")
    }

    fn now(&self, kind: Temporal) -> &'static str {
        match kind {
            Temporal::Date => "date('now')",
            Temporal::Timestamp => "datetime('now')",
        }
    }

    fn temporal_bounds(&self) -> (CalendarFields, CalendarFields) {
        (
            CalendarFields::new(0, 1, 1, 0, 0, 0),
            CalendarFields::new(9999, 12, 31, 23, 59, 59),
        )
    }

    fn format_pattern(&self, kind: Temporal) -> String {
        let DateDelimiters { date, time, join } = &self.delimiters;
        match kind {
            Temporal::Date => format!("%Y{date}%m{date}%d"),
            Temporal::Timestamp => format!("%Y{date}%m{date}%d{join}%H{time}%M{time}%S"),
        }
    }

    fn wrap_temporal(&self, quoted: &str, kind: Temporal) -> String {
        match kind {
            Temporal::Date => format!("date({quoted})"),
            Temporal::Timestamp => format!("datetime({quoted})"),
        }
    }
}
