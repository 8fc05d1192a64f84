//! CLI argument parsing definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use steep_config::{Flow, SteepConfig};

#[derive(Parser)]
#[command(author, version, about = "TeaStore load scenarios and load-test reports", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a storefront flow under load
    Swarm(SwarmArgs),

    /// Walk one user through a flow once and print every step
    Probe {
        /// Flow to probe: shopping, navigation, homepage
        #[arg(long, value_name = "FLOW")]
        flow: Option<Flow>,

        /// Print the step record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Turn k6, Locust and JMeter artifacts into reports
    Report {
        #[command(subcommand)]
        report_cmd: ReportCommands,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        config_cmd: ConfigCommands,
    },
}

#[derive(Args, Debug, Default)]
pub struct SwarmArgs {
    /// Flow each user repeats: shopping, navigation, homepage
    #[arg(long, value_name = "FLOW")]
    pub flow: Option<Flow>,

    /// Concurrent users
    #[arg(long, value_name = "N")]
    pub users: Option<usize>,

    /// Users started per second
    #[arg(long, value_name = "RATE")]
    pub hatch_rate: Option<f64>,

    /// Run time in seconds once all users are started
    #[arg(long, value_name = "SECS")]
    pub run_time: Option<u64>,

    /// Write the harness HTML report here
    #[arg(long, value_name = "PATH")]
    pub report_file: Option<String>,

    /// Reset the storefront database before the run
    #[arg(long, conflicts_with = "no_reset")]
    pub reset: bool,

    /// Skip the database reset even if configured
    #[arg(long)]
    pub no_reset: bool,
}

impl SwarmArgs {
    /// Command line values win over the loaded configuration
    pub fn apply(&self, config: &mut SteepConfig) {
        if let Some(flow) = self.flow {
            config.load.flow = flow;
        }
        if let Some(users) = self.users {
            config.load.users = users;
        }
        if let Some(rate) = self.hatch_rate {
            config.load.hatch_rate = rate;
        }
        if let Some(secs) = self.run_time {
            config.load.run_time = Duration::from_secs(secs);
        }
        if let Some(path) = &self.report_file {
            config.load.report_file = Some(path.clone());
        }
        if self.reset {
            config.session.reset_database = true;
        }
        if self.no_reset {
            config.session.reset_database = false;
        }
    }
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Combined HTML dashboard, optional PDF, charts and unified summary
    Dashboard(DashboardArgs),

    /// PDF of a k6 summary JSON
    K6Pdf {
        #[arg(value_name = "JSON")]
        json: PathBuf,
        #[arg(value_name = "PDF")]
        pdf: PathBuf,
    },

    /// PDF of the first table of a Locust HTML report
    LocustPdf {
        #[arg(value_name = "HTML")]
        html: PathBuf,
        #[arg(value_name = "PDF")]
        pdf: PathBuf,
    },

    /// PDF of the three JMeter graphs in a directory
    JmeterPdf {
        #[arg(value_name = "GRAPHS_DIR")]
        graphs_dir: PathBuf,
        #[arg(value_name = "PDF")]
        pdf: PathBuf,
    },

    /// Response time, throughput and error rate graphs from a JTL file
    JmeterGraphs {
        #[arg(value_name = "JTL")]
        jtl: PathBuf,
        #[arg(value_name = "OUT_DIR")]
        out_dir: PathBuf,

        /// Samples per rolling error-rate window
        #[arg(long, value_name = "N")]
        window: Option<usize>,
    },

    /// Response bodies of failed samples in a JTL file
    JmeterFailures {
        #[arg(value_name = "JTL")]
        jtl: PathBuf,
        #[arg(value_name = "OUT_DIR")]
        out_dir: PathBuf,
    },

    /// Per-label Apdex HTML report from a JTL file
    JmeterApdex {
        #[arg(value_name = "JTL")]
        jtl: PathBuf,

        /// Output HTML file
        #[arg(long, value_name = "PATH", default_value = "jmeter-apdex.html")]
        output: PathBuf,

        /// Label to report, repeatable; default is every label in the file
        #[arg(long = "label", value_name = "LABEL")]
        labels: Vec<String>,

        /// Satisfied threshold in milliseconds
        #[arg(long, value_name = "MS")]
        satisfied_ms: Option<u64>,

        /// Tolerated threshold in milliseconds
        #[arg(long, value_name = "MS")]
        tolerated_ms: Option<u64>,
    },

    /// Aggregated statistics embedded in Locust HTML reports
    LocustStats {
        #[arg(value_name = "HTML", required = true)]
        html: Vec<PathBuf>,
    },
}

#[derive(Args, Debug, Default)]
pub struct DashboardArgs {
    /// k6 summary JSON
    #[arg(long, value_name = "PATH")]
    pub k6: Option<PathBuf>,

    /// Locust HTML report
    #[arg(long, value_name = "PATH")]
    pub locust: Option<PathBuf>,

    /// JMeter HTML report directory
    #[arg(long, value_name = "PATH")]
    pub jmeter_dir: Option<PathBuf>,

    /// JMeter JTL samples (CSV)
    #[arg(long, value_name = "PATH")]
    pub jtl: Option<PathBuf>,

    /// Dashboard HTML output
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Dashboard PDF output
    #[arg(long, value_name = "PATH", conflicts_with = "no_pdf")]
    pub pdf: Option<PathBuf>,

    /// Do not write a PDF
    #[arg(long)]
    pub no_pdf: bool,

    /// Directory for the PNG charts
    #[arg(long, value_name = "DIR")]
    pub charts_dir: Option<PathBuf>,

    /// Unified JSON summary output
    #[arg(long, value_name = "PATH")]
    pub summary: Option<PathBuf>,
}

impl DashboardArgs {
    pub fn apply(&self, config: &mut SteepConfig) {
        let report = &mut config.report;
        if let Some(path) = &self.k6 {
            report.k6_summary = path.clone();
        }
        if let Some(path) = &self.locust {
            report.locust_report = path.clone();
        }
        if let Some(path) = &self.jmeter_dir {
            report.jmeter_dir = path.clone();
        }
        if self.jtl.is_some() {
            report.jtl = self.jtl.clone();
        }
        if let Some(path) = &self.output {
            report.output = path.clone();
        }
        if self.pdf.is_some() {
            report.pdf = self.pdf.clone();
        }
        if self.no_pdf {
            report.pdf = None;
        }
        if let Some(dir) = &self.charts_dir {
            report.charts_dir = dir.clone();
        }
        if self.summary.is_some() {
            report.summary = self.summary.clone();
        }
    }
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        #[arg(long, value_name = "PATH")]
        config_file: PathBuf,
    },

    /// Write a sample configuration with every default
    Generate {
        /// Output file path
        #[arg(long, value_name = "PATH")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the configuration in effect
    Show {
        /// Output format: yaml, json
        #[arg(long, value_name = "FORMAT", default_value = "yaml")]
        format: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_swarm_overrides() {
        let cli = Cli::parse_from([
            "steep", "swarm", "--flow", "navigation", "--users", "50", "--run-time", "30", "--no-reset",
        ]);
        let Some(Commands::Swarm(args)) = cli.command else {
            panic!("expected swarm");
        };

        let mut config = SteepConfig::default();
        config.session.reset_database = true;
        args.apply(&mut config);

        assert_eq!(config.load.flow, Flow::Navigation);
        assert_eq!(config.load.users, 50);
        assert_eq!(config.load.run_time, Duration::from_secs(30));
        assert!(!config.session.reset_database);
    }

    #[test]
    fn test_reset_flags_conflict() {
        assert!(Cli::try_parse_from(["steep", "swarm", "--reset", "--no-reset"]).is_err());
    }

    #[test]
    fn test_dashboard_overrides() {
        let cli = Cli::parse_from([
            "steep", "report", "dashboard", "--k6", "k6.json", "--jtl", "run.csv", "--no-pdf",
        ]);
        let Some(Commands::Report {
            report_cmd: ReportCommands::Dashboard(args),
        }) = cli.command
        else {
            panic!("expected report dashboard");
        };

        let mut config = SteepConfig::default();
        args.apply(&mut config);

        assert_eq!(config.report.k6_summary, PathBuf::from("k6.json"));
        assert_eq!(config.report.jtl, Some(PathBuf::from("run.csv")));
        assert_eq!(config.report.pdf, None);
        assert_eq!(config.report.output, PathBuf::from("dashboard.html"));
    }

    #[test]
    fn test_apdex_labels_repeat() {
        let cli = Cli::parse_from([
            "steep", "report", "jmeter-apdex", "run.csv", "--label", "GET Home", "--label", "POST Logout",
        ]);
        let Some(Commands::Report {
            report_cmd: ReportCommands::JmeterApdex { labels, output, .. },
        }) = cli.command
        else {
            panic!("expected jmeter-apdex");
        };
        assert_eq!(labels, vec!["GET Home", "POST Logout"]);
        assert_eq!(output, PathBuf::from("jmeter-apdex.html"));
    }

    #[test]
    fn test_invalid_flow_rejected() {
        assert!(Cli::try_parse_from(["steep", "probe", "--flow", "checkout"]).is_err());
    }
}
