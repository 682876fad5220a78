use thiserror::Error;

/// Errors from the detection core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetectorError {
    #[error("invalid detector config: {field} {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("out-of-order sample: expected index {expected}, received {received}")]
    OutOfOrderSample { expected: u64, received: u64 },

    #[error("non-finite sample value at index {index}")]
    NonFiniteSample { index: u64 },

    #[error("detector lock poisoned")]
    LockPoisoned,

    #[error("detector service stopped")]
    ServiceStopped,
}

impl DetectorError {
    pub(crate) fn invalid_config(field: &str, reason: impl Into<String>) -> Self {
        DetectorError::InvalidConfig {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the caller can correct the input and call again.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DetectorError::OutOfOrderSample { .. } | DetectorError::NonFiniteSample { .. }
        )
    }
}

/// Convenience type alias for detector results.
pub type DetectorResult<T> = Result<T, DetectorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let e = DetectorError::OutOfOrderSample {
            expected: 4,
            received: 7,
        };
        let msg = e.to_string();
        assert!(msg.contains("expected index 4"));
        assert!(msg.contains("received 7"));

        let e = DetectorError::invalid_config("window_size", "must be greater than zero");
        assert!(e.to_string().contains("window_size must be greater than zero"));

        let e = DetectorError::NonFiniteSample { index: 12 };
        assert!(e.to_string().contains("12"));
    }

    #[test]
    fn recoverable_kinds() {
        assert!(DetectorError::OutOfOrderSample {
            expected: 0,
            received: 1
        }
        .is_recoverable());
        assert!(DetectorError::NonFiniteSample { index: 0 }.is_recoverable());
        assert!(!DetectorError::invalid_config("threshold_multiplier", "must be positive")
            .is_recoverable());
        assert!(!DetectorError::LockPoisoned.is_recoverable());
    }

    #[test]
    fn result_type_works() {
        let ok: DetectorResult<u32> = Ok(3);
        assert_eq!(ok, Ok(3));

        let err: DetectorResult<u32> = Err(DetectorError::ServiceStopped);
        assert!(err.is_err());
    }
}
