use crate::cli::{check_mappings, config_error_hint};
use crate::conf::ConfigError;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn report_counts_rules_and_normalizes_samples() {
    // Arrange
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, r"/\d+/ /ID/").unwrap();
    writeln!(file, "//+ /").unwrap();
    writeln!(file, "/$").unwrap();
    let samples = vec!["//api/42/users/7/".to_string()];
    let mut out = Vec::new();

    // Act
    check_mappings(file.path(), &samples, &mut out).unwrap();

    // Assert
    let report = String::from_utf8(out).unwrap();
    assert!(report.contains("✔ 3 rules"));
    assert!(report.contains("✔ 1 strip rules"));
    assert!(report.contains("//api/42/users/7/ => /api/ID/users/ID"));
}

#[test]
fn bad_rule_is_reported_with_a_hint() {
    // Arrange
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "/[unclosed /x/").unwrap();
    let mut out = Vec::new();

    // Act
    let err = check_mappings(file.path(), &[], &mut out).unwrap_err();

    // Assert
    let config_err = err.downcast_ref::<ConfigError>().unwrap();
    assert!(matches!(config_err, ConfigError::InvalidRule { line: 1, .. }));
    assert!(config_error_hint(config_err).is_some());
    assert!(out.is_empty());
}

/// Accepts nothing; every write fails.
struct ClosedPipe;

impl Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn failed_report_write_is_an_error() {
    // Arrange
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "/$").unwrap();

    // Act
    let err = check_mappings(file.path(), &[], &mut ClosedPipe).unwrap_err();

    // Assert
    assert!(err.downcast_ref::<ConfigError>().is_none());
    let io_err = err.downcast_ref::<std::io::Error>().unwrap();
    assert_eq!(io_err.kind(), std::io::ErrorKind::BrokenPipe);
}
