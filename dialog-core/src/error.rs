use thiserror::Error;

/// Errors raised synchronously at the operation boundary.
///
/// Transport and decode failures never surface here; they reach the caller
/// as an absent outcome through the completion handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialogError {
    #[error("invalid argument: `{name}` must not be empty")]
    InvalidArgument { name: &'static str },
}

impl DialogError {
    pub fn invalid_argument(name: &'static str) -> Self {
        Self::InvalidArgument { name }
    }
}

/// Returns `InvalidArgument` when `value` is empty.
pub fn require_non_empty(name: &'static str, value: &str) -> Result<(), DialogError> {
    if value.is_empty() {
        return Err(DialogError::invalid_argument(name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_value_is_rejected_with_its_name() {
        let err = require_non_empty("dialog_id", "").unwrap_err();
        assert_eq!(err, DialogError::InvalidArgument { name: "dialog_id" });
        assert_eq!(
            err.to_string(),
            "invalid argument: `dialog_id` must not be empty"
        );
    }

    #[test]
    fn non_empty_value_passes() {
        assert!(require_non_empty("input", "hello").is_ok());
    }
}
