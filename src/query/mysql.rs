use std::sync::LazyLock;

use regex::Regex;

use super::{QueryShaper, count_literal, trim_statement};
use crate::config::DateDelimiters;
use crate::error::SqlDialectError;
use crate::literal::{MySqlSerializer, Temporal, ValueSerializer};
use crate::types::Dialect;

static CALC_FOUND_ROWS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bSQL_CALC_FOUND_ROWS\b").expect("valid SQL_CALC_FOUND_ROWS regex")
});

/// `MySQL` has no unbounded LIMIT; the largest unsigned 64-bit count stands in.
pub const UNBOUNDED_LIMIT: u64 = u64::MAX;

/// Positional `LIMIT offset,count`, `FOUND_ROWS()` and `DATE_FORMAT`.
#[derive(Debug, Clone, Default)]
pub struct MySqlShaper {
    serializer: MySqlSerializer,
}

impl MySqlShaper {
    #[must_use]
    pub fn new(delimiters: DateDelimiters) -> Self {
        Self::with_serializer(MySqlSerializer::new(delimiters))
    }

    #[must_use]
    pub fn with_serializer(serializer: MySqlSerializer) -> Self {
        Self { serializer }
    }
}

impl QueryShaper for MySqlShaper {
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    fn serializer(&self) -> &dyn ValueSerializer {
        &self.serializer
    }

    fn apply_pagination(
        &self,
        sql: &str,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<String, SqlDialectError> {
        if limit.is_none() && offset.is_none() {
            return Ok(sql.to_string());
        }
        let sql = trim_statement(sql);
        let count = count_literal(&self.serializer, limit.unwrap_or(UNBOUNDED_LIMIT))?;
        Ok(match offset {
            Some(offset) => format!(
                "{sql} LIMIT {},{count}",
                count_literal(&self.serializer, offset)?
            ),
            None => format!("{sql} LIMIT {count}"),
        })
    }

    fn wrap_count(&self, sql: &str) -> String {
        if CALC_FOUND_ROWS.is_match(sql) {
            return "SELECT FOUND_ROWS()".to_string();
        }
        format!("SELECT COUNT(*) FROM ({}) AS X", trim_statement(sql))
    }

    fn quote_alias(&self, alias: &str) -> String {
        format!("`{}`", alias.replace('`', "``"))
    }

    fn format_temporal(&self, expr: &str, kind: Temporal) -> String {
        format!(
            "DATE_FORMAT({expr}, {})",
            self.serializer.quote(&self.serializer.format_pattern(kind))
        )
    }
}
