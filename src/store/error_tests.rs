//! Unit tests for store error types

#[cfg(test)]
mod tests {
    use crate::store::error::StoreError;
    use std::error::Error;

    #[test]
    fn test_invalid_cursor_error() {
        let error = StoreError::InvalidCursor("zz".to_string());
        assert_eq!(error.to_string(), "Invalid cursor: zz");
    }

    #[test]
    fn test_invalid_input_error() {
        let error = StoreError::InvalidInput("line 3: missing name".to_string());
        assert_eq!(error.to_string(), "Invalid input: line 3: missing name");
        assert!(error.source().is_none());
    }

    #[test]
    fn test_invalid_pattern_from_regex() {
        let raw = regex::Regex::new("(").unwrap_err();
        let error: StoreError = raw.into();
        assert!(matches!(error, StoreError::InvalidPattern(_)));
        assert!(error.to_string().starts_with("Invalid search pattern"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_error_debug() {
        let error = StoreError::InvalidCursor("abc".to_string());
        let debug = format!("{error:?}");
        assert!(debug.contains("InvalidCursor"));
        assert!(debug.contains("abc"));
    }

    #[test]
    fn test_invalid_input_creation() {
        let msg = "empty file";
        let error = StoreError::InvalidInput(msg.to_string());

        match error {
            StoreError::InvalidInput(s) => assert_eq!(s, msg),
            _ => panic!("Expected InvalidInput variant"),
        }
    }
}
