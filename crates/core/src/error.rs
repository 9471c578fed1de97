#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid argument '{param}': {reason}")]
    InvalidArgument { param: &'static str, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CoreError {
    /// Shorthand for the "required value is missing or blank" case.
    pub fn blank(param: &'static str) -> Self {
        Self::InvalidArgument {
            param,
            reason: "value must not be empty or whitespace".to_string(),
        }
    }

    /// Name of the offending parameter, if this is an argument error.
    pub fn param(&self) -> Option<&'static str> {
        match self {
            Self::InvalidArgument { param, .. } => Some(*param),
            Self::Config(_) => None,
        }
    }
}

/// Reject empty or whitespace-only input for the named parameter.
pub fn require_non_blank(param: &'static str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::blank(param));
    }
    Ok(())
}
