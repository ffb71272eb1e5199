//! Structured error types for gridview.
//!
//! Contract violations (invalid selection shapes) fail fast at construction;
//! everything geometric degrades gracefully by clamping instead of erroring.

/// All errors that can occur in the grid engine.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Invalid selection shape (e.g. empty row/column range list).
    #[error("Invalid selection: {0}")]
    Selection(String),

    /// Rendering error.
    #[error("Render error: {0}")]
    Render(String),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<String> for GridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for GridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
