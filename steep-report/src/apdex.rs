//! Per-label Apdex report for JMeter samples

use crate::error::ReportResult;
use crate::extract::JtlTable;
use crate::template::ReportTemplates;
use serde::Serialize;
use std::collections::HashMap;
use steep_config::ApdexConfig;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelApdex {
    pub label: String,
    pub requests: usize,
    pub failures: usize,
    pub satisfied: usize,
    pub tolerated: usize,
    /// `(satisfied + tolerated / 2) / requests`, 1.0 for a label without samples
    pub apdex: f64,
}

impl LabelApdex {
    fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            requests: 0,
            failures: 0,
            satisfied: 0,
            tolerated: 0,
            apdex: 1.0,
        }
    }

    fn finish(&mut self) {
        if self.requests > 0 {
            let score = (self.satisfied as f64 + self.tolerated as f64 / 2.0) / self.requests as f64;
            self.apdex = round_to(score, 3);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApdexReport {
    pub satisfied_ms: u64,
    pub tolerated_ms: u64,
    pub labels: Vec<LabelApdex>,
    pub total: usize,
    pub failures: usize,
    pub pass_percent: f64,
    pub fail_percent: f64,
}

impl ApdexReport {
    /// Score the samples of `table`. Failed samples are frustrated whatever
    /// their latency; samples without a latency count by outcome only.
    pub fn from_table(table: &JtlTable, config: &ApdexConfig) -> Self {
        let samples = table.labelled();

        let order: Vec<String> = if config.labels.is_empty() {
            let mut seen = Vec::new();
            for (label, _, _) in &samples {
                if !seen.contains(label) {
                    seen.push(label.clone());
                }
            }
            seen
        } else {
            config.labels.clone()
        };

        let mut by_label: HashMap<&str, LabelApdex> =
            order.iter().map(|l| (l.as_str(), LabelApdex::new(l))).collect();

        let (satisfied_ms, tolerated_ms) = (config.satisfied_ms as f64, config.tolerated_ms as f64);
        for (label, elapsed, ok) in &samples {
            let Some(entry) = by_label.get_mut(label.as_str()) else {
                continue;
            };
            entry.requests += 1;
            if !ok {
                entry.failures += 1;
                continue;
            }
            match elapsed {
                Some(ms) if *ms > tolerated_ms => {}
                Some(ms) if *ms > satisfied_ms => entry.tolerated += 1,
                _ => entry.satisfied += 1,
            }
        }

        let labels: Vec<LabelApdex> = order
            .iter()
            .filter_map(|l| by_label.remove(l.as_str()))
            .map(|mut entry| {
                entry.finish();
                entry
            })
            .collect();

        let total = labels.iter().map(|l| l.requests).sum::<usize>();
        let failures = labels.iter().map(|l| l.failures).sum::<usize>();
        let (pass_percent, fail_percent) = if total == 0 {
            (100.0, 0.0)
        } else {
            (
                round_to(100.0 * (total - failures) as f64 / total as f64, 2),
                round_to(100.0 * failures as f64 / total as f64, 2),
            )
        };

        Self {
            satisfied_ms: config.satisfied_ms,
            tolerated_ms: config.tolerated_ms,
            labels,
            total,
            failures,
            pass_percent,
            fail_percent,
        }
    }

    /// SVG path of the failure slice on a radius-16 circle centred at (16, 16),
    /// starting at twelve o'clock. `None` when nothing failed or everything did.
    pub fn fail_slice_path(&self) -> Option<String> {
        if self.fail_percent <= 0.0 || self.fail_percent >= 100.0 {
            return None;
        }
        let angle = self.fail_percent / 100.0 * std::f64::consts::TAU;
        let x = 16.0 + 16.0 * angle.sin();
        let y = 16.0 - 16.0 * angle.cos();
        let large_arc = u8::from(self.fail_percent > 50.0);
        Some(format!("M16 16 L16 0 A16 16 0 {} 1 {:.2} {:.2} Z", large_arc, x, y))
    }

    pub fn render_html(&self, templates: &ReportTemplates) -> ReportResult<String> {
        #[derive(Serialize)]
        struct View<'a> {
            report: &'a ApdexReport,
            fail_slice: Option<String>,
            all_failed: bool,
        }

        templates.render(
            ReportTemplates::APDEX,
            &View {
                report: self,
                fail_slice: self.fail_slice_path(),
                all_failed: self.total > 0 && self.failures == self.total,
            },
        )
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    const JTL: &str = "timeStamp,elapsed,label,responseCode,success\n\
        1000,100,GET Home,200,true\n\
        1100,900,GET Home,200,true\n\
        1200,2000,GET Home,200,true\n\
        1300,50,GET Home,500,false\n\
        1400,80,POST Logout,200,true\n\
        1500,80,Debug Sampler,200,true\n";

    fn config(labels: &[&str]) -> ApdexConfig {
        ApdexConfig {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            ..ApdexConfig::default()
        }
    }

    #[test]
    fn test_scores_listed_labels_only() {
        let table = JtlTable::from_reader(JTL.as_bytes()).unwrap();
        let report = ApdexReport::from_table(&table, &config(&["GET Home", "GET Produto", "POST Logout"]));

        let home = &report.labels[0];
        assert_eq!((home.requests, home.failures, home.satisfied, home.tolerated), (4, 1, 1, 1));
        assert_eq!(home.apdex, 0.375);

        let produto = &report.labels[1];
        assert_eq!(produto.requests, 0);
        assert_eq!(produto.apdex, 1.0);

        assert_eq!(report.labels[2].apdex, 1.0);
        assert_eq!(report.total, 5);
        assert_eq!(report.failures, 1);
        assert_eq!(report.fail_percent, 20.0);
        assert_eq!(report.pass_percent, 80.0);
    }

    #[test]
    fn test_empty_label_list_means_all_in_file_order() {
        let table = JtlTable::from_reader(JTL.as_bytes()).unwrap();
        let report = ApdexReport::from_table(&table, &config(&[]));
        let labels: Vec<&str> = report.labels.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["GET Home", "POST Logout", "Debug Sampler"]);
        assert_eq!(report.total, 6);
    }

    #[test]
    fn test_fail_slice() {
        let table = JtlTable::from_reader(JTL.as_bytes()).unwrap();
        let mut report = ApdexReport::from_table(&table, &config(&[]));

        report.fail_percent = 25.0;
        assert_eq!(report.fail_slice_path().unwrap(), "M16 16 L16 0 A16 16 0 0 1 32.00 16.00 Z");
        report.fail_percent = 75.0;
        assert!(report.fail_slice_path().unwrap().contains(" 1 1 0.00 16.00 Z"));
        report.fail_percent = 0.0;
        assert!(report.fail_slice_path().is_none());
    }

    #[test]
    fn test_render_escapes_labels() {
        let table = JtlTable::from_reader("elapsed,label,success\n10,<script>,true\n".as_bytes()).unwrap();
        let report = ApdexReport::from_table(&table, &config(&[]));
        let html = report.render_html(&ReportTemplates::new().unwrap()).unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("PASS"));
    }
}
