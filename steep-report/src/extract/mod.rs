//! Readers for k6, JMeter and Locust artifacts

pub mod jmeter;
pub mod jtl;
pub mod k6;
pub mod locust;

pub use jmeter::{read_jmeter_report, JmeterPreview, JmeterStatistics};
pub use jtl::{parse_success, summarize_jtl, JtlTable, SampleSummary};
pub use k6::{load_k6_summary, read_k6_metrics, K6Metrics};
pub use locust::{read_locust_preview, read_locust_stats, LocustPreview, LocustStats};
