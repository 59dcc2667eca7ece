use crate::decode::{DecodedFields, FieldName, FieldSpec, decode};
use crate::observe::{
    LabelSet, MetricName, ObservationBuilder, ObservationError, ObservationOptions, labels,
};
use crate::rewrite::{PathRewriter, RewriteRule};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn builder(options: ObservationOptions) -> ObservationBuilder {
    let rewriter = PathRewriter::new(vec![RewriteRule::new(r"/\d+/", "/ID/").unwrap()]);
    ObservationBuilder::new(Arc::new(rewriter), options)
}

fn all_enabled() -> ObservationOptions {
    ObservationOptions {
        host_label: true,
        first_byte: true,
        sizes: true,
    }
}

fn base_fields() -> DecodedFields {
    DecodedFields::from([
        (FieldName::Method, "GET"),
        (FieldName::Status, "200"),
        (FieldName::Path, "/users/42/"),
        (FieldName::Cache, "hit"),
        (FieldName::Host, "example.com"),
        (FieldName::Time, "123.4"),
    ])
}

#[test]
fn end_to_end_line_yields_one_duration_observation() {
    // Arrange
    let line = r#"method="GET" status=200 path="/users/42/" cache="hit" host="example.com" time:123.4"#;
    let fields = decode(line, &FieldSpec::default()).unwrap();

    // Act
    let observations = builder(ObservationOptions::default())
        .build(&fields)
        .unwrap();

    // Assert
    assert_eq!(observations.len(), 1);
    let obs = &observations[0];
    assert_eq!(obs.metric, MetricName::RequestDuration);
    assert!((obs.value - 0.1234).abs() < 1e-12);
    assert_eq!(
        obs.labels,
        LabelSet::new()
            .with(labels::METHOD, "GET")
            .with(labels::STATUS, "200")
            .with(labels::PATH, "/users/ID/")
            .with(labels::CACHE, "hit")
            .with(labels::HOST, "example.com")
    );
}

#[test]
fn optional_fields_add_observations() {
    // Arrange
    let mut fields = base_fields();
    fields.insert(FieldName::TimeFirstByte, "50".to_string());
    fields.insert(FieldName::RespSize, "2048".to_string());

    // Act
    let observations = builder(all_enabled()).build(&fields).unwrap();

    // Assert
    let metrics: Vec<MetricName> = observations.iter().map(|o| o.metric).collect();
    assert_eq!(
        metrics,
        vec![
            MetricName::RequestDuration,
            MetricName::FirstByteDuration,
            MetricName::ResponseSize
        ]
    );
    assert!((observations[1].value - 0.05).abs() < 1e-12);
    assert_eq!(observations[2].value, 2048.0);
    assert!(observations.iter().all(|o| o.labels == observations[0].labels));
}

#[test]
fn enabled_but_absent_fields_are_skipped() {
    // Arrange
    let fields = base_fields();

    // Act
    let observations = builder(all_enabled()).build(&fields).unwrap();

    // Assert
    assert_eq!(observations.len(), 1);
}

#[test]
fn disabled_metrics_are_not_built_even_when_present() {
    // Arrange
    let mut fields = base_fields();
    fields.insert(FieldName::RespSize, "2048".to_string());

    // Act
    let observations = builder(ObservationOptions::default())
        .build(&fields)
        .unwrap();

    // Assert
    assert_eq!(observations.len(), 1);
}

#[test]
fn pinned_host_drops_the_host_label() {
    // Arrange
    let options = ObservationOptions {
        host_label: false,
        ..ObservationOptions::default()
    };
    let mut other_host = base_fields();
    other_host.remove(FieldName::Host);
    other_host.insert(FieldName::Host, "other.example".to_string());

    // Act
    let a = builder(options).build(&base_fields()).unwrap();
    let b = builder(options).build(&other_host).unwrap();

    // Assert
    assert_eq!(a[0].labels, b[0].labels);
    assert_eq!(a[0].labels.get(labels::HOST), None);
    assert_eq!(
        a[0].labels.names().collect::<Vec<_>>(),
        vec!["method", "status", "path", "cache"]
    );
}

#[test]
fn host_label_distinguishes_hosts_when_enabled() {
    // Arrange
    let mut other_host = base_fields();
    other_host.remove(FieldName::Host);
    other_host.insert(FieldName::Host, "other.example".to_string());

    // Act
    let a = builder(ObservationOptions::default())
        .build(&base_fields())
        .unwrap();
    let b = builder(ObservationOptions::default())
        .build(&other_host)
        .unwrap();

    // Assert
    assert_ne!(a[0].labels, b[0].labels);
}

#[test]
fn absent_cache_becomes_empty_label() {
    // Arrange
    let mut fields = base_fields();
    fields.remove(FieldName::Cache);

    // Act
    let observations = builder(ObservationOptions::default())
        .build(&fields)
        .unwrap();

    // Assert
    assert_eq!(observations[0].labels.get(labels::CACHE), Some(""));
    assert_eq!(observations[0].labels.len(), 5);
}

#[test]
fn labels_follow_the_schema_order() {
    // Arrange
    let builder = builder(ObservationOptions::default());
    assert!(LabelSet::new().is_empty());

    // Act
    let observations = builder.build(&base_fields()).unwrap();

    // Assert
    let series = &observations[0].labels;
    assert!(!series.is_empty());
    assert_eq!(
        series.names().collect::<Vec<_>>(),
        builder.schema().names().to_vec()
    );
}

#[test]
fn missing_required_source_is_an_error() {
    // Arrange
    let mut fields = base_fields();
    fields.remove(FieldName::Method);

    // Act
    let err = builder(ObservationOptions::default())
        .build(&fields)
        .unwrap_err();

    // Assert
    assert_eq!(
        err,
        ObservationError::MissingField {
            field: FieldName::Method
        }
    );
}

#[test]
fn missing_time_is_an_error() {
    // Arrange
    let mut fields = base_fields();
    fields.remove(FieldName::Time);

    // Act
    let err = builder(ObservationOptions::default())
        .build(&fields)
        .unwrap_err();

    // Assert
    assert_eq!(
        err,
        ObservationError::MissingField {
            field: FieldName::Time
        }
    );
}

#[test]
fn malformed_number_is_an_error() {
    // Arrange
    let mut fields = base_fields();
    fields.remove(FieldName::Time);
    fields.insert(FieldName::Time, "soon".to_string());

    // Act
    let err = builder(ObservationOptions::default())
        .build(&fields)
        .unwrap_err();

    // Assert
    assert!(matches!(err, ObservationError::InvalidNumber { .. }));
}
