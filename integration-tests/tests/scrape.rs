use integration_tests::harness::{TestExporter, metric_value};
use pretty_assertions::assert_eq;
use varnish_exporter_core::observe::ObservationOptions;
use varnish_exporter_core::rewrite::{PathRewriter, RewriteRule};

const LINE: &str =
    r#"method="GET" status=200 path="/users/42/" cache="hit" host="example.com" time:123.4"#;

const SERIES: &str = r#"varnish_request_time_count{cache="hit",host="example.com",method="GET",path="/users/ID/",status="200"}"#;

fn id_rules() -> PathRewriter {
    PathRewriter::new(vec![RewriteRule::new(r"/\d+/", "/ID/").unwrap()])
}

#[test]
fn scrape_reflects_fed_lines() {
    // Arrange
    let exporter = TestExporter::start(id_rules(), ObservationOptions::default());

    // Act
    exporter.feed(&[LINE, LINE, LINE]);
    let body = exporter.scrape();

    // Assert
    assert_eq!(metric_value(&body, SERIES), Some(3.0));
    assert_eq!(
        metric_value(&body, "varnish_request_exporter_log_messages"),
        Some(3.0)
    );
    assert_eq!(
        metric_value(&body, "varnish_request_exporter_log_parse_failure"),
        Some(0.0)
    );
}

#[test]
fn sum_is_recorded_in_seconds() {
    // Arrange
    let exporter = TestExporter::start(id_rules(), ObservationOptions::default());

    // Act
    exporter.feed(&[LINE]);
    let body = exporter.scrape();

    // Assert
    let sum = metric_value(&body, &SERIES.replace("_count{", "_sum{")).unwrap();
    assert!((sum - 0.1234).abs() < 1e-9, "{sum}");
}

#[test]
fn malformed_lines_only_move_the_counters() {
    // Arrange
    let exporter = TestExporter::start(id_rules(), ObservationOptions::default());

    // Act
    let summary = exporter.feed(&[
        r#"method="GET" path="/" cache="hit" host="a" time:1"#,
        "not a log line at all",
    ]);
    let body = exporter.scrape();

    // Assert
    assert_eq!(summary.rejected, 2);
    assert_eq!(
        metric_value(&body, "varnish_request_exporter_log_messages"),
        Some(2.0)
    );
    assert_eq!(
        metric_value(&body, "varnish_request_exporter_log_parse_failure"),
        Some(2.0)
    );
    assert!(!body.contains("varnish_request_time_count"));
    assert_eq!(exporter.registry().collector_count(), 0);
}

#[test]
fn optional_histograms_appear_when_enabled() {
    // Arrange
    let exporter = TestExporter::start(
        id_rules(),
        ObservationOptions {
            host_label: false,
            first_byte: true,
            sizes: true,
        },
    );
    let line = r#"method="POST" status=201 path="/orders/9/" cache="pass" host="shop" time:250 time_firstbyte:0.2 respsize:-"#;

    // Act
    exporter.feed(&[line]);
    let body = exporter.scrape();

    // Assert
    let labels = r#"{cache="pass",method="POST",path="/orders/ID/",status="201"}"#;
    assert_eq!(
        metric_value(&body, &format!("varnish_request_time_firstbyte_count{labels}")),
        Some(1.0)
    );
    assert_eq!(
        metric_value(&body, &format!("varnish_request_respsize_sum{labels}")),
        Some(0.0)
    );
    assert!(!body.contains("host=\"shop\""));
}

#[test]
fn landing_page_links_to_metrics() {
    // Arrange
    let exporter = TestExporter::start(PathRewriter::default(), ObservationOptions::default());

    // Act
    let res = exporter.get("/").send().unwrap();

    // Assert
    assert_eq!(res.status(), 200);
    assert!(res.text().unwrap().contains("href='/metrics'"));
}

#[test]
fn metrics_content_type_is_prometheus_text() {
    // Arrange
    let exporter = TestExporter::start(PathRewriter::default(), ObservationOptions::default());

    // Act
    let res = exporter.get("/metrics").send().unwrap();

    // Assert
    assert_eq!(
        res.headers()["content-type"],
        "text/plain; version=0.0.4"
    );
}
