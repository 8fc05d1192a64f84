//! HTML templates for the dashboard and the Apdex report

use crate::error::ReportResult;
use handlebars::Handlebars;
use serde::Serialize;

const DASHBOARD_TEMPLATE: &str = r#"<!doctype html>
<html>
<head>
  <meta charset="utf-8">
  <title>{{title}}</title>
  <style>
    body { font-family: Arial, sans-serif; margin: 2em; }
    table { border-collapse: collapse; margin-bottom: 1.5em; }
    th, td { border: 1px solid #ccc; padding: 4px 8px; text-align: left; }
    th { background: #f0f0f0; }
    pre { background: #f7f7f7; padding: 1em; overflow-x: auto; }
  </style>
</head>
<body>
  <h1>{{title}}</h1>
  <p>Generated {{generated_at}}</p>

  <h2>Heatmap</h2>
  {{#if heatmap}}<img src="{{heatmap}}" alt="percentile heatmap" style="max-width:800px;">{{else}}<p>Heatmap not available</p>{{/if}}

  <h2>Comparison</h2>
  {{#if compare}}<img src="{{compare}}" alt="average latency per tool" style="max-width:800px;">{{else}}<p>Comparison not available (no average latency found)</p>{{/if}}

  <h2>k6</h2>
  {{#if k6}}
  <p class="k6-summary">avg={{k6.avg}} p90={{k6.p90}} p95={{k6.p95}} p99={{k6.p99}} med={{k6.med}} max={{k6.max}}</p>
  <p>failed rate={{k6.failed_rate}} requests/s={{k6.request_rate}}</p>
  {{#if k6.checks}}<table><tr><th>Check</th><th>Rate</th></tr>{{#each k6.checks}}<tr><td>{{this.name}}</td><td>{{this.rate}}</td></tr>{{/each}}</table>{{/if}}
  {{else}}<p>k6 summary: N/A</p>{{/if}}

  <h2>Locust</h2>
  {{#if locust}}
  <h3>{{locust.title}}</h3>
  <table>
    <tr>{{#each locust.headers}}<th>{{this}}</th>{{/each}}</tr>
    {{#each locust.rows}}<tr>{{#each this}}<td>{{this}}</td>{{/each}}</tr>{{/each}}
  </table>
  {{else}}<p>Locust report: N/A</p>{{/if}}

  <h2>JMeter</h2>
  {{#if jmeter}}
  <p>OK {{jmeter.ok_percent}}% / KO {{jmeter.ko_percent}}%</p>
  {{#if jmeter.statistics}}<table>{{#each jmeter.statistics}}<tr><th>{{this.title}}</th><td>{{this.value}}</td></tr>{{/each}}</table>{{/if}}
  {{else}}<p>JMeter report: N/A</p>{{/if}}
  {{#if jtl}}
  <h3>JTL samples</h3>
  <table>
    <tr><th>Samples</th><th>Mean</th><th>p50</th><th>p95</th><th>p99</th><th>Error rate</th><th>Throughput/s</th></tr>
    <tr><td>{{jtl.samples}}</td><td>{{jtl.mean}}</td><td>{{jtl.p50}}</td><td>{{jtl.p95}}</td><td>{{jtl.p99}}</td><td>{{jtl.error_rate}}</td><td>{{jtl.throughput}}</td></tr>
  </table>
  {{/if}}

  <h2>Extracted summaries</h2>
  <pre>k6_metrics = {{k6_json}}</pre>
  <pre>locust_preview = {{locust_json}}</pre>
  <pre>jmeter_preview = {{jmeter_json}}</pre>

  <h3>Original reports</h3>
  <ul>
    {{#each links}}<li><a href="{{this.href}}">{{this.text}}</a></li>{{/each}}
  </ul>
</body>
</html>
"#;

const APDEX_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>JMeter Apdex report</title>
  <style>
    body { font-family: Arial, sans-serif; margin: 2em; }
    table { border-collapse: collapse; width: 60%; margin-bottom: 2em; }
    th, td { border: 1px solid #ccc; padding: 8px; text-align: left; }
    th { background: #f0f0f0; }
    .pie { width: 300px; height: 300px; }
  </style>
</head>
<body>
  <h2>APDEX (Application Performance Index)</h2>
  <p>Satisfied &le; {{report.satisfied_ms}} ms, tolerated &le; {{report.tolerated_ms}} ms</p>
  <table>
    <tr><th>Label</th><th>Requests</th><th>Fails</th><th>APDEX</th></tr>
    {{#each report.labels}}<tr><td>{{this.label}}</td><td>{{this.requests}}</td><td>{{this.failures}}</td><td>{{this.apdex}}</td></tr>
    {{/each}}
  </table>

  <h2>Requests Summary</h2>
  <svg class="pie" viewBox="0 0 32 32">
    <circle r="16" cx="16" cy="16" fill="{{#if all_failed}}#ff6f6f{{else}}#b6e388{{/if}}" />
    {{#if fail_slice}}<path d="{{fail_slice}}" fill="#ff6f6f" />{{/if}}
  </svg>
  <p><span style="color:#ff6f6f">FAIL</span>: {{report.fail_percent}}% &nbsp; <span style="color:#b6e388">PASS</span>: {{report.pass_percent}}%</p>
  <hr>
  <p>{{report.total}} requests across the listed labels.</p>
</body>
</html>
"##;

/// Handlebars registry holding the report templates
#[derive(Debug, Clone)]
pub struct ReportTemplates {
    handlebars: Handlebars<'static>,
}

impl ReportTemplates {
    pub const DASHBOARD: &'static str = "dashboard";
    pub const APDEX: &'static str = "apdex";

    pub fn new() -> ReportResult<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true); // Error on missing variables
        handlebars.register_template_string(Self::DASHBOARD, DASHBOARD_TEMPLATE)?;
        handlebars.register_template_string(Self::APDEX, APDEX_TEMPLATE)?;

        Ok(Self { handlebars })
    }

    /// Render a registered template; values are HTML-escaped
    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> ReportResult<String> {
        Ok(self.handlebars.render(name, data)?)
    }
}
