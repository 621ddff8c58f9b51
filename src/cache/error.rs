use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    Connection(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_error_display() {
        let err = CacheError::Connection("connection refused".to_string());
        assert_eq!(err.to_string(), "Cache connection error: connection refused");
    }

    #[test]
    fn test_serialization_error_display() {
        let err = CacheError::Serialization("trailing characters".to_string());
        assert_eq!(err.to_string(), "Serialization error: trailing characters");
    }
}
