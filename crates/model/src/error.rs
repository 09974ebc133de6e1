//! Error types for model parsing.

use thiserror::Error;

/// Errors that can occur while building model values from raw input.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Invalid expression: {reason}")]
    InvalidExpression { reason: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ModelError {
    /// Create an `InvalidExpression` error.
    ///
    /// # Arguments
    /// * `reason` - Why the expression was rejected
    pub fn invalid_expression(reason: impl Into<String>) -> Self {
        Self::InvalidExpression {
            reason: reason.into(),
        }
    }
}
