use std::fs;
use std::path::Path;
use steep_config::{ApdexConfig, ReportConfig};
use steep_report::{build_dashboard, extract_failures, write_apdex_report, SinkSet};

const K6_SUMMARY: &str = r#"{"metrics": {"http_req_duration": {"avg": 120.5, "p(90)": 200, "p(95)": 250}}}"#;

const LOCUST_REPORT: &str = r#"<html><body>
<h1>Locust Test Report</h1>
<table>
  <tr><th>Name</th><th>Requests</th></tr>
  <tr><td>Total</td><td>42</td></tr>
</table>
</body></html>"#;

const JMETER_DASHBOARD_JS: &str = r##"
var data = {"OkPercent": 95.0, "KoPercent": 5.0};
createTable($("#statisticsTable"), {"overall": {"data": ["Total", 20, 1, 5.0, 40.0, 10, 90, 35.0, 70.0, 80.0, 88.0]}, "titles": ["Label", "#Samples", "FAIL", "Error %", "Average", "Min", "Max", "Median", "90th pct", "95th pct", "99th pct"]}, function(index, item){ return item; }, [[0, 0]], 0, summaryTableHeader);
"##;

const JTL: &str = "timeStamp,elapsed,label,responseCode,success,responseData\n\
    1000,100,GET Home,200,true,\n\
    1500,300,GET Home,200,true,\n\
    2200,700,POST Login,500,false,<h1>Server error</h1>\n\
    3100,2000,GET Home,200,true,\n";

fn write_artifacts(dir: &Path) -> ReportConfig {
    fs::write(dir.join("k6.json"), K6_SUMMARY).unwrap();
    fs::write(dir.join("locust.html"), LOCUST_REPORT).unwrap();
    let jmeter = dir.join("jmeter");
    fs::create_dir_all(jmeter.join("content/js")).unwrap();
    fs::write(jmeter.join("index.html"), "<html></html>").unwrap();
    fs::write(jmeter.join("content/js/dashboard.js"), JMETER_DASHBOARD_JS).unwrap();
    fs::write(dir.join("run.jtl"), JTL).unwrap();

    ReportConfig {
        k6_summary: dir.join("k6.json"),
        locust_report: dir.join("locust.html"),
        jmeter_dir: jmeter,
        jtl: Some(dir.join("run.jtl")),
        output: dir.join("out/dashboard.html"),
        pdf: Some(dir.join("out/dashboard.pdf")),
        charts_dir: dir.join("out/charts"),
        summary: Some(dir.join("out/summary.json")),
        ..ReportConfig::default()
    }
}

#[test]
fn test_dashboard_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_artifacts(dir.path());

    let outcome = build_dashboard(&config, SinkSet::available()).unwrap();
    assert_eq!(outcome.sections, 4);

    let html = fs::read_to_string(&outcome.html).unwrap();
    assert!(html.contains("avg=120.5 p90=200 p95=250"));
    assert!(html.contains("<td>Total</td>"));
    assert!(html.contains("OK 95% / KO 5%"));
    assert!(html.contains("JMeter HTML report"));
    assert!(html.contains("href=\"../jmeter/index.html\""));
    assert!(html.contains("href=\"../k6.json\""));

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("out/summary.json")).unwrap()).unwrap();
    assert_eq!(summary["k6"]["avg"], 120.5);
    assert_eq!(summary["k6"]["p99"], serde_json::Value::Null);
    assert_eq!(
        summary["locust"]["table_first_row"],
        serde_json::json!({"Name": "Total", "Requests": "42"})
    );
    assert_eq!(summary["jmeter"]["samples"]["samples"], 4);
    assert_eq!(summary["jmeter"]["samples"]["error_rate"], 0.25);

    if cfg!(feature = "charts") {
        assert_eq!(outcome.charts.len(), 2);
        assert!(html.contains("src=\"charts/heatmap_tools.png\""));
        assert!(html.contains("src=\"charts/compare_avg.png\""));
    }
    if cfg!(feature = "pdf") {
        let pdf = fs::read(dir.path().join("out/dashboard.pdf")).unwrap();
        assert!(pdf.starts_with(b"%PDF-1.4"));
    }
}

#[test]
fn test_chart_paths_resolve_from_output_directory() {
    let dir = tempfile::tempdir().unwrap();
    let config = ReportConfig {
        charts_dir: dir.path().join("charts"),
        output: dir.path().join("site/out/dashboard.html"),
        pdf: None,
        ..write_artifacts(dir.path())
    };

    build_dashboard(&config, SinkSet::available()).unwrap();
    let html = fs::read_to_string(&config.output).unwrap();

    if cfg!(feature = "charts") {
        assert!(html.contains("src=\"../../charts/heatmap_tools.png\""));
        let page_dir = config.output.parent().unwrap();
        assert!(page_dir.join("../../charts/heatmap_tools.png").exists());
    }
    assert!(html.contains("href=\"../../locust.html\""));
}

#[test]
fn test_summary_is_byte_identical_on_rerun() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_artifacts(dir.path());
    let summary = dir.path().join("out/summary.json");

    build_dashboard(&config, SinkSet::none()).unwrap();
    let first = fs::read(&summary).unwrap();
    build_dashboard(&config, SinkSet::none()).unwrap();
    let second = fs::read(&summary).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_dashboard_without_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let config = ReportConfig {
        k6_summary: dir.path().join("missing.json"),
        locust_report: dir.path().join("missing.html"),
        jmeter_dir: dir.path().join("missing"),
        output: dir.path().join("dashboard.html"),
        pdf: None,
        charts_dir: dir.path().join("charts"),
        summary: Some(dir.path().join("summary.json")),
        ..ReportConfig::default()
    };

    let outcome = build_dashboard(&config, SinkSet::available()).unwrap();
    assert_eq!(outcome.sections, 0);
    assert!(outcome.pdf.is_none());

    let html = fs::read_to_string(&outcome.html).unwrap();
    assert!(html.contains("k6 summary: N/A"));
    assert!(html.contains("Comparison not available"));

    let summary = fs::read_to_string(dir.path().join("summary.json")).unwrap();
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&summary).unwrap(),
        serde_json::json!({"k6": null, "locust": null, "jmeter": null})
    );
}

#[test]
fn test_malformed_k6_summary_degrades() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = write_artifacts(dir.path());
    fs::write(dir.path().join("k6.json"), "{not json").unwrap();
    config.pdf = None;

    let outcome = build_dashboard(&config, SinkSet::none()).unwrap();
    assert_eq!(outcome.sections, 3);
    let html = fs::read_to_string(&outcome.html).unwrap();
    assert!(html.contains("k6 summary: N/A"));
}

#[test]
fn test_failures_and_apdex_from_jtl() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_artifacts(dir.path());
    let jtl = config.jtl.unwrap();

    let failures = extract_failures(&jtl, &dir.path().join("failures")).unwrap();
    assert_eq!(failures.count, 1);
    assert_eq!(
        fs::read_to_string(dir.path().join("failures/failure_3.html")).unwrap(),
        "<h1>Server error</h1>"
    );

    let output = dir.path().join("apdex.html");
    let apdex = ApdexConfig {
        labels: vec!["GET Home".to_string(), "POST Login".to_string()],
        ..ApdexConfig::default()
    };
    let report = write_apdex_report(&jtl, &output, &apdex).unwrap();
    assert_eq!(report.labels[0].requests, 3);
    assert_eq!(report.labels[0].apdex, 0.667);
    assert_eq!(report.labels[1].apdex, 0.0);

    let html = fs::read_to_string(&output).unwrap();
    assert!(html.contains("<td>GET Home</td>"));
    assert!(html.contains("<path d=\"M16 16 L16 0"));
}
