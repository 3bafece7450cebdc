use thiserror::Error;

/// Errors returned by [`crate::render_diff`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RedlineError {
    #[error("`{field}` is required and must not be empty")]
    Validation { field: &'static str },
}
