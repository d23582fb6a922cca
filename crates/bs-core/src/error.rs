use thiserror::Error;

/// Boundary validation failures.
///
/// The outline computation itself never fails: an empty member set or an
/// exhausted search yields an empty outline. These errors are only produced
/// by explicit validation of configuration, shapes, and buffer sizes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid config field `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("invalid shape: {reason}")]
    InvalidShape { reason: String },

    #[error("size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn messages_name_the_offending_field() {
        let err = Error::InvalidConfig {
            field: "pixel_group",
            reason: "must be positive".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config field `pixel_group`: must be positive"
        );

        let err = Error::SizeMismatch {
            expected: 4,
            actual: 3,
        };
        assert_eq!(err.to_string(), "size mismatch: expected 4, got 3");
    }
}
