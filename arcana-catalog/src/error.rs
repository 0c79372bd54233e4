/// Errors raised while compiling criteria, before any storage access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CriteriaError {
    #[error("Invalid value for '{field}': '{value}' is not a non-negative integer")]
    InvalidValue { field: &'static str, value: String },

    #[error("Invalid list for '{field}': {reason} in '{value}'")]
    InvalidList {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid sort order: '{0}'")]
    InvalidSort(String),
}

impl CriteriaError {
    pub fn invalid_value(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            value: value.into(),
        }
    }

    pub fn invalid_list(
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidList {
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_sort(msg: impl Into<String>) -> Self {
        Self::InvalidSort(msg.into())
    }
}
