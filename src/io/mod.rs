//! Input/output: decoding, retrieval, configuration and the command line

/// Command-line interface
pub mod cli;
/// Dataset conventions and defaults
pub mod configuration;
/// Error types
pub mod error;
/// Sample data download and extraction
pub mod fetch;
/// Array decoding by file extension
pub mod loader;
/// Download progress display
pub mod progress;
