/// Cache keys for schema metadata.
///
/// One fixed key holds the table list; each table's columns live under a key
/// templated on the table name. The prefix lets several databases share a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    prefix: String,
}

impl Default for CacheKey {
    fn default() -> Self {
        Self::new("schema")
    }
}

impl CacheKey {
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    #[must_use]
    pub fn tables(&self) -> String {
        format!("{}:tables", self.prefix)
    }

    #[must_use]
    pub fn columns(&self, table: &str) -> String {
        format!("{}:columns:{}", self.prefix, table)
    }
}
