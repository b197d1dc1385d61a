//! Error types shared by the model and simulation layers.

use thiserror::Error;

/// Errors raised while building models or loading their data.
#[derive(Debug, Error)]
pub enum SimError {
    /// A model parameter is outside its valid range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Tabular model data is malformed (wrong shape, non-monotonic axis, ...).
    #[error("invalid model data: {0}")]
    InvalidData(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
