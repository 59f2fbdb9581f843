/*!
 * Tests for error types
 */

use std::error::Error;
use std::path::PathBuf;

use locmem::errors::{AppError, ConfigError, ResponseError, StoreError};

#[test]
fn test_storeError_read_shouldKeepPathAndSource() {
    let error = StoreError::Read {
        path: PathBuf::from("tm.json"),
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    };

    let message = error.to_string();
    assert!(message.contains("tm.json"));
    assert!(message.contains("denied"));
    assert!(error.source().is_some());
}

#[test]
fn test_appError_fromStoreError_shouldWrap() {
    let error: AppError = StoreError::UnsupportedVersion {
        found: "2.0".to_string(),
    }
    .into();

    assert!(matches!(error, AppError::Store(StoreError::UnsupportedVersion { .. })));
    assert!(error.to_string().contains("2.0"));
}

#[test]
fn test_appError_fromConfigError_shouldWrap() {
    let error: AppError = ConfigError::InvalidSimilarity(1.5).into();

    assert!(matches!(error, AppError::Config(ConfigError::InvalidSimilarity(_))));
    assert!(error.to_string().contains("1.5"));
}

#[test]
fn test_appError_fromIoAndAnyhow_shouldConvert() {
    let io: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(io, AppError::File(_)));

    let other: AppError = anyhow::anyhow!("boom").into();
    assert!(matches!(other, AppError::Unknown(ref m) if m == "boom"));
}

#[test]
fn test_responseError_fromJson_shouldBeMalformed() {
    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error: ResponseError = json_error.into();

    assert!(matches!(error, ResponseError::Malformed(_)));
    let app: AppError = error.into();
    assert!(app.to_string().starts_with("Response error"));
}
