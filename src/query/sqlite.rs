use super::{QueryShaper, count_literal, trim_statement};
use crate::config::DateDelimiters;
use crate::error::SqlDialectError;
use crate::literal::{SqliteSerializer, Temporal, ValueSerializer};
use crate::types::Dialect;

/// `LIMIT count OFFSET offset` and `strftime`.
#[derive(Debug, Clone, Default)]
pub struct SqliteShaper {
    serializer: SqliteSerializer,
}

impl SqliteShaper {
    #[must_use]
    pub fn new(delimiters: DateDelimiters) -> Self {
        Self::with_serializer(SqliteSerializer::new(delimiters))
    }

    #[must_use]
    pub fn with_serializer(serializer: SqliteSerializer) -> Self {
        Self { serializer }
    }
}

impl QueryShaper for SqliteShaper {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
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
        // a negative LIMIT is unbounded in SQLite
        let count = match limit {
            Some(limit) => count_literal(&self.serializer, limit)?,
            None => "-1".to_string(),
        };
        Ok(match offset {
            Some(offset) => format!(
                "{sql} LIMIT {count} OFFSET {}",
                count_literal(&self.serializer, offset)?
            ),
            None => format!("{sql} LIMIT {count}"),
        })
    }

    fn format_temporal(&self, expr: &str, kind: Temporal) -> String {
        format!(
            "strftime({}, {expr})",
            self.serializer.quote(&self.serializer.format_pattern(kind))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aliases::TypeCategory;

    #[test]
    fn limit_then_offset() {
        let shaper = SqliteShaper::default();
        assert_eq!(
            shaper
                .apply_pagination("SELECT * FROM t", Some(20), Some(10))
                .unwrap(),
            "SELECT * FROM t LIMIT 20 OFFSET 10"
        );
        assert_eq!(
            shaper.apply_pagination("SELECT * FROM t", None, Some(10)).unwrap(),
            "SELECT * FROM t LIMIT -1 OFFSET 10"
        );
    }

    #[test]
    fn counting_ignores_mysql_hints() {
        let shaper = SqliteShaper::default();
        assert_eq!(
            shaper.wrap_count("SELECT SQL_CALC_FOUND_ROWS * FROM t"),
            "SELECT COUNT(*) FROM (SELECT SQL_CALC_FOUND_ROWS * FROM t) AS X"
        );
    }

    #[test]
    fn temporal_columns_use_strftime() {
        let shaper = SqliteShaper::new(DateDelimiters::new("/", ":", "T"));
        assert_eq!(
            shaper.column_expression("born", Some(TypeCategory::Date), Some("d")),
            "strftime('%Y/%m/%d', born) AS \"d\""
        );
        assert_eq!(
            shaper.column_expression("seen", Some(TypeCategory::Timestamp), None),
            "strftime('%Y/%m/%dT%H:%M:%S', seen) AS \"seen\""
        );
    }
}
