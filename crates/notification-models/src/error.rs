use crate::CrossNamespaceObjectReference;

/// Error is a structured reason why an Alert cannot be accepted or acted upon.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{field} is required")]
    MissingRequiredField { field: String },
    #[error("{field} has unsupported value {value:?} (must be one of {allowed:?})")]
    InvalidEnumValue {
        field: String,
        value: String,
        allowed: &'static [&'static str],
    },
    /// Returned by controllers which look up a reference and fail to find it.
    /// Validation never produces this error.
    #[error("referenced object {reference} could not be resolved")]
    ReferenceUnresolvable {
        reference: CrossNamespaceObjectReference,
    },
}

impl Error {
    pub fn missing(field: impl Into<String>) -> Self {
        Error::MissingRequiredField {
            field: field.into(),
        }
    }

    /// Path of the offending field, if the error is attributed to one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Error::MissingRequiredField { field } | Error::InvalidEnumValue { field, .. } => {
                Some(field)
            }
            Error::ReferenceUnresolvable { .. } => None,
        }
    }
}
