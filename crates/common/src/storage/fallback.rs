//! Storage-unavailable policy.
//!
//! Every read or write issued by the token and app-info stores goes through
//! [`best_effort`]: a failing backend is logged and treated as an empty store.
//! Callers never observe a storage fault.

use tracing::debug;

use super::StorageResult;

/// Collapse a storage result into `Some(value)` or `None` on failure.
pub fn best_effort<T>(operation: &'static str, key: &str, result: StorageResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            debug!(operation, key, error = %err, "storage unavailable, degrading to empty store");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageError;

    #[test]
    fn test_success_passes_through() {
        assert_eq!(best_effort("get", "k", Ok(Some("v".to_string()))), Some(Some("v".into())));
    }

    #[test]
    fn test_failure_is_swallowed() {
        let result: StorageResult<()> = Err(StorageError::Unavailable("quota".into()));
        assert_eq!(best_effort("set", "k", result), None);
    }
}
