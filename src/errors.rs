use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistogramError {
    #[error("Invalid pixel buffer: {message}")]
    InvalidFormat { message: String },

    #[error("Invalid render settings: {message}")]
    InvalidRenderSpec { message: String },

    #[error("Failed to load image '{path}': {message}")]
    ImageLoadError { path: PathBuf, message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Export error for '{path}': {message}")]
    ExportError { path: PathBuf, message: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON parsing error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, HistogramError>;

impl HistogramError {
    pub(crate) fn invalid_format(message: impl Into<String>) -> Self {
        HistogramError::InvalidFormat {
            message: message.into(),
        }
    }

    /// Returns true if retrying with the same input could succeed.
    ///
    /// Everything the core computes is deterministic, so only file system
    /// problems on the viewer side qualify.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            HistogramError::FileNotFound { .. }
                | HistogramError::ExportError { .. }
                | HistogramError::IoError { .. }
        )
    }

    /// Returns a user-friendly error message with a recovery suggestion
    pub fn user_message(&self) -> String {
        let suggestion = match self {
            HistogramError::InvalidFormat { .. } => {
                "The decoded image does not match its declared size. Try re-saving it as PNG."
            }
            HistogramError::InvalidRenderSpec { .. } => {
                "Pick a horizontal scale of at least 1 pixel per bin."
            }
            HistogramError::ImageLoadError { .. } => {
                "The image file may be corrupted or in an unsupported format."
            }
            HistogramError::FileNotFound { .. } => {
                "Check if the file exists and you have permission to access it."
            }
            HistogramError::ExportError { .. } => {
                "Export failed. Check if you have write permissions in the target directory."
            }
            HistogramError::IoError { .. } => {
                "File system error occurred. Check disk space and permissions."
            }
            HistogramError::JsonError { .. } => {
                "The settings file is unreadable. It will be replaced with defaults on next save."
            }
        };

        format!("{}\n\n{}", self, suggestion)
    }

    /// Returns an error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            HistogramError::InvalidFormat { .. } => "INVALID_FORMAT",
            HistogramError::InvalidRenderSpec { .. } => "INVALID_RENDER_SPEC",
            HistogramError::ImageLoadError { .. } => "IMAGE_LOAD_ERROR",
            HistogramError::FileNotFound { .. } => "FILE_NOT_FOUND",
            HistogramError::ExportError { .. } => "EXPORT_ERROR",
            HistogramError::IoError { .. } => "IO_ERROR",
            HistogramError::JsonError { .. } => "JSON_ERROR",
        }
    }

    pub fn log(&self) {
        let code = self.error_code();
        if self.is_recoverable() {
            tracing::warn!(code, "{}", self);
        } else {
            tracing::error!(code, "{}", self);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_format_is_not_recoverable() {
        let error = HistogramError::invalid_format("length 7 is not a multiple of 4");

        assert!(!error.is_recoverable());
        assert_eq!(error.error_code(), "INVALID_FORMAT");
        assert!(error.to_string().contains("length 7"));
    }

    #[test]
    fn test_user_message_has_suggestion() {
        let error = HistogramError::FileNotFound {
            path: PathBuf::from("/nonexistent/file.png"),
        };

        assert!(error.is_recoverable());
        let msg = error.user_message();
        assert!(msg.starts_with("File not found: /nonexistent/file.png"));
        assert!(msg.contains("Check if the file exists"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let error: HistogramError = io.into();
        assert_eq!(error.error_code(), "IO_ERROR");
    }
}
