use crate::conf::{
    ConfigError, ExporterConfig, ExporterSettings, LineSource, normalize_listen_addr,
    validate_metrics_path,
};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

//---------------------------------------------------------------------------
// Listen address
//---------------------------------------------------------------------------

#[test]
fn bare_port_listens_on_all_interfaces() {
    assert_eq!(normalize_listen_addr(":9151").unwrap(), "0.0.0.0:9151");
}

#[test]
fn host_and_port_are_kept() {
    assert_eq!(
        normalize_listen_addr("127.0.0.1:8080").unwrap(),
        "127.0.0.1:8080"
    );
}

#[test]
fn missing_or_bad_port_is_rejected() {
    for addr in ["9151", ":http", "localhost:70000"] {
        let err = normalize_listen_addr(addr).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidListenAddress { .. }),
            "{addr}"
        );
    }
}

//---------------------------------------------------------------------------
// Metrics path
//---------------------------------------------------------------------------

#[test]
fn metrics_path_must_be_absolute_and_not_root() {
    assert!(validate_metrics_path("/metrics").is_ok());
    assert!(validate_metrics_path("metrics").is_err());
    assert!(validate_metrics_path("/").is_err());
}

//---------------------------------------------------------------------------
// Settings -> config
//---------------------------------------------------------------------------

#[test]
fn defaults_spawn_varnishncsa_with_host_label() {
    // Act
    let cfg = ExporterConfig::from_settings(ExporterSettings::default()).unwrap();

    // Assert
    assert_eq!(cfg.listen_addr, "0.0.0.0:9151");
    assert_eq!(cfg.metrics_path, "/metrics");
    assert!(cfg.observations.host_label);
    assert!(!cfg.fields.first_byte);
    assert!(!cfg.fields.sizes);
    assert!(cfg.rewriter.is_empty());
    match cfg.source {
        LineSource::Varnishncsa(src) => {
            assert_eq!(src.program, "varnishncsa");
            assert_eq!(src.host, None);
            assert_eq!(src.query, None);
            assert_eq!(src.instance, None);
        }
        LineSource::Stdin => panic!("expected varnishncsa source"),
    }
}

#[test]
fn pinned_host_drops_host_label() {
    // Arrange
    let settings = ExporterSettings {
        host: Some("example.com".into()),
        ..ExporterSettings::default()
    };

    // Act
    let cfg = ExporterConfig::from_settings(settings).unwrap();

    // Assert
    assert!(!cfg.observations.host_label);
}

#[test]
fn empty_flag_values_are_treated_as_unset() {
    // Arrange
    let settings = ExporterSettings {
        host: Some(String::new()),
        query: Some("  ".into()),
        instance: Some(String::new()),
        ..ExporterSettings::default()
    };

    // Act
    let cfg = ExporterConfig::from_settings(settings).unwrap();

    // Assert
    assert!(cfg.observations.host_label);
    let LineSource::Varnishncsa(src) = cfg.source else {
        panic!("expected varnishncsa source");
    };
    assert_eq!(src.query, None);
    assert_eq!(src.instance, None);
}

#[test]
fn optional_metrics_enable_fields_and_observations_together() {
    // Arrange
    let settings = ExporterSettings {
        first_byte: true,
        sizes: true,
        ..ExporterSettings::default()
    };

    // Act
    let cfg = ExporterConfig::from_settings(settings).unwrap();

    // Assert
    assert!(cfg.fields.first_byte && cfg.observations.first_byte);
    assert!(cfg.fields.sizes && cfg.observations.sizes);
}

#[test]
fn stdin_mode_selects_stdin_source() {
    // Arrange
    let settings = ExporterSettings {
        stdin: true,
        ..ExporterSettings::default()
    };

    // Act
    let cfg = ExporterConfig::from_settings(settings).unwrap();

    // Assert
    assert_eq!(cfg.source, LineSource::Stdin);
}

#[test]
fn mappings_file_is_compiled_into_the_rewriter() {
    // Arrange
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, r"/\d+/ /ID/").unwrap();
    let settings = ExporterSettings {
        path_mappings: Some(file.path().to_path_buf()),
        ..ExporterSettings::default()
    };

    // Act
    let cfg = ExporterConfig::from_settings(settings).unwrap();

    // Assert
    assert_eq!(cfg.rewriter.len(), 1);
}

#[test]
fn invalid_metrics_path_fails_startup() {
    // Arrange
    let settings = ExporterSettings {
        metrics_path: "metrics".into(),
        ..ExporterSettings::default()
    };

    // Act
    let err = ExporterConfig::from_settings(settings).unwrap_err();

    // Assert
    assert!(matches!(err, ConfigError::InvalidMetricsPath { .. }));
}
