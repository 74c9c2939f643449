//! Crate-wide fatal error type.
//!
//! `AppError` is reserved for failures that should abort a run outright:
//! malformed sweep files, unreadable inputs, mismatched argument axes. Exit
//! codes:
//!
//! - `2`: configuration / input errors (bad files, unknown names, bad axes)
//! - `3`: nothing to do (no series or no acceleration methods loaded)
//!
//! Per-configuration numeric failures never become an `AppError`; they are
//! captured as `ErrorRecord` data on the affected `TrialResult` and the
//! sweep continues.

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// Equal-length validation failed on a set of parallel argument axes.
    ///
    /// This always indicates a sweep-authoring bug, not a runtime numeric
    /// issue, so it aborts the whole run instead of becoming error data.
    pub fn shape_mismatch(message: impl Into<String>) -> Self {
        Self::new(2, format!("shape mismatch: {}", message.into()))
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
