/*!
 * Error types for the locmem application.
 *
 * This module contains custom error types for the persistent stores and the
 * configuration layer, using the thiserror crate for ergonomic error definitions.
 * Query operations never fail; only loading, saving and validation do.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading or saving a persistent store
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing file exists but could not be read
    #[error("Failed to read store file {path:?}: {source}")]
    Read {
        /// Path of the backing file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The backing file is not a valid store document
    #[error("Failed to decode store file {path:?}: {source}")]
    Decode {
        /// Path of the backing file
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// The in-memory store could not be serialized
    #[error("Failed to encode store document: {0}")]
    Encode(#[from] serde_json::Error),

    /// The document could not be written to disk
    #[error("Failed to write store file {path:?}: {source}")]
    Write {
        /// Path of the backing file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The document declares a version this build does not understand
    #[error("Unsupported document version: {found}")]
    UnsupportedVersion {
        /// Version string found in the document
        found: String,
    },

    /// An interchange document is not valid JSON of the expected shape
    #[error("Invalid glossary document: {0}")]
    InvalidDocument(#[source] serde_json::Error),

    /// An interchange record failed schema validation
    #[error("Invalid glossary term: {0}")]
    InvalidTerm(String),
}

/// Errors raised while validating configuration values
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    /// Similarity thresholds are ratios
    #[error("Similarity threshold must be within [0, 1], got {0}")]
    InvalidSimilarity(f64),

    /// At least one match must be requested
    #[error("Maximum match count must be greater than zero")]
    InvalidMaxMatches,

    /// Language code not recognised by ISO 639
    #[error("Invalid language code: {0}")]
    InvalidLanguage(String),

    /// A required field was left empty
    #[error("Missing required configuration value: {0}")]
    MissingValue(&'static str),
}

/// Errors raised while reading a translation backend's reply
#[derive(Error, Debug)]
pub enum ResponseError {
    /// The reply contained no JSON object
    #[error("Response does not contain a JSON object")]
    MissingObject,

    /// The JSON object does not map strings to strings
    #[error("Malformed translation response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from one of the persistent stores
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Error from a translation backend reply
    #[error("Response error: {0}")]
    Response(#[from] ResponseError),

    /// Error from configuration validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
