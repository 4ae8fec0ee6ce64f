//! Question store errors

use std::io;

use thiserror::Error;

use crate::question::ValidationError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Question store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Disk I/O failure
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Record file failed verification on replay
    #[error("Data corruption at offset {offset}: {reason}")]
    Corruption { offset: u64, reason: String },

    /// Insert rejected before an id was assigned
    #[error("Invalid question: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Lock poisoned")]
    LockPoisoned,

    /// A failed append could not be rolled back, so the record file may end
    /// in bytes that were never acknowledged
    #[error("Writes disabled: {0}")]
    WritesDisabled(String),
}

impl StoreError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        StoreError::Io {
            context: context.into(),
            source,
        }
    }

    pub fn corruption_at_offset(offset: u64, reason: impl Into<String>) -> Self {
        StoreError::Corruption {
            offset,
            reason: reason.into(),
        }
    }

    /// Whether the underlying data can no longer be trusted
    pub fn is_corruption(&self) -> bool {
        matches!(self, StoreError::Corruption { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corruption_display() {
        let err = StoreError::corruption_at_offset(42, "Checksum mismatch");
        assert!(err.is_corruption());
        assert_eq!(
            err.to_string(),
            "Data corruption at offset 42: Checksum mismatch"
        );
    }

    #[test]
    fn test_validation_converts() {
        let err = StoreError::from(ValidationError::EmptyQuestion);
        assert!(matches!(err, StoreError::Invalid(_)));
        assert!(!err.is_corruption());
    }

    #[test]
    fn test_writes_disabled_display() {
        let err = StoreError::WritesDisabled("rollback to 120 bytes failed".into());
        assert!(!err.is_corruption());
        assert_eq!(err.to_string(), "Writes disabled: rollback to 120 bytes failed");
    }
}
