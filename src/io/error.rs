//! Error types for dataset discovery, decoding and retrieval

use std::fmt;
use std::path::PathBuf;

/// Main error type for all dataset operations
#[derive(Debug)]
pub enum DatasetError {
    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A filename or glob pattern could not be compiled
    InvalidPattern {
        /// The pattern as written
        pattern: String,
        /// Compiler message
        reason: String,
    },

    /// Failed to read a `.npy` array
    NpyRead {
        /// Path to the array file
        path: PathBuf,
        /// Underlying reader error
        source: ndarray_npy::ReadNpyError,
    },

    /// Failed to decode a TIFF image or stack
    TiffDecode {
        /// Path to the TIFF file
        path: PathBuf,
        /// Underlying decoder error
        source: tiff::TiffError,
    },

    /// Failed to decode an image through the generic codec
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Decoded data can't be represented as a numeric array
    InvalidArrayData {
        /// Path of the offending file
        path: PathBuf,
        /// Description of what's wrong with the data
        reason: String,
    },

    /// HTTP request or body transfer failed
    Download {
        /// Requested URL
        url: String,
        /// Underlying client error
        source: reqwest::Error,
    },

    /// Archive could not be opened or extracted
    Archive {
        /// Path to the archive
        path: PathBuf,
        /// Underlying archive error
        source: zip::result::ZipError,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::InvalidPattern { pattern, reason } => {
                write!(f, "Invalid pattern '{pattern}': {reason}")
            }
            Self::NpyRead { path, source } => {
                write!(f, "Failed to read array '{}': {source}", path.display())
            }
            Self::TiffDecode { path, source } => {
                write!(f, "Failed to decode TIFF '{}': {source}", path.display())
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::InvalidArrayData { path, reason } => {
                write!(f, "Invalid array data in '{}': {reason}", path.display())
            }
            Self::Download { url, source } => {
                write!(f, "Failed to download '{url}': {source}")
            }
            Self::Archive { path, source } => {
                write!(f, "Failed to unpack archive '{}': {source}", path.display())
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FileSystem { source, .. } => Some(source),
            Self::NpyRead { source, .. } => Some(source),
            Self::TiffDecode { source, .. } => Some(source),
            Self::ImageLoad { source, .. } => Some(source),
            Self::Download { source, .. } => Some(source),
            Self::Archive { source, .. } => Some(source),
            Self::InvalidPattern { .. }
            | Self::InvalidArrayData { .. }
            | Self::InvalidParameter { .. } => None,
        }
    }
}

/// Convenience type alias for dataset results
pub type Result<T> = std::result::Result<T, DatasetError>;

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> DatasetError {
    DatasetError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an invalid array data error
pub fn invalid_array_data(path: impl Into<PathBuf>, reason: &impl ToString) -> DatasetError {
    DatasetError::InvalidArrayData {
        path: path.into(),
        reason: reason.to_string(),
    }
}

/// Wrap an I/O error with the path and operation it came from
pub fn file_system(
    path: impl Into<PathBuf>,
    operation: &'static str,
) -> impl FnOnce(std::io::Error) -> DatasetError {
    let path = path.into();
    move |source| DatasetError::FileSystem {
        path,
        operation,
        source,
    }
}
