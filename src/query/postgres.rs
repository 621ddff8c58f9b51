use super::{QueryShaper, count_literal, trim_statement};
use crate::config::DateDelimiters;
use crate::error::SqlDialectError;
use crate::literal::{PostgresSerializer, Temporal, ValueSerializer};
use crate::types::Dialect;

/// `LIMIT count|ALL OFFSET offset` and `TO_CHAR`.
#[derive(Debug, Clone, Default)]
pub struct PostgresShaper {
    serializer: PostgresSerializer,
}

impl PostgresShaper {
    #[must_use]
    pub fn new(delimiters: DateDelimiters) -> Self {
        Self::with_serializer(PostgresSerializer::new(delimiters))
    }

    #[must_use]
    pub fn with_serializer(serializer: PostgresSerializer) -> Self {
        Self { serializer }
    }
}

impl QueryShaper for PostgresShaper {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
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
        let count = match limit {
            Some(limit) => count_literal(&self.serializer, limit)?,
            None => "ALL".to_string(),
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
            "TO_CHAR({expr}, {})",
            self.serializer.quote(&self.serializer.format_pattern(kind))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aliases::TypeCategory;

    #[test]
    fn limit_all_when_unbounded() {
        let shaper = PostgresShaper::default();
        assert_eq!(
            shaper
                .apply_pagination("SELECT * FROM t", None, Some(5))
                .unwrap(),
            "SELECT * FROM t LIMIT ALL OFFSET 5"
        );
        assert_eq!(
            shaper
                .apply_pagination("SELECT * FROM t", Some(20), Some(10))
                .unwrap(),
            "SELECT * FROM t LIMIT 20 OFFSET 10"
        );
    }

    #[test]
    fn temporal_columns_use_to_char() {
        let shaper = PostgresShaper::default();
        assert_eq!(
            shaper.column_expression("d", Some(TypeCategory::Date), Some("day")),
            "TO_CHAR(d, 'YYYY-MM-DD') AS \"day\""
        );
    }
}
