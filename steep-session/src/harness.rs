//! Load runs on the goose harness

use crate::browser::{Browser, Page};
use crate::context::SessionContext;
use crate::error::{BrowserError, SessionError, StepFailure};
use crate::flows::Storefront;
use goose::config::GooseConfiguration;
use goose::goose::GooseRequest;
use goose::metrics::{GooseMetrics, GooseRequestMetric};
use goose::prelude::*;
use gumdrop::Options;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use steep_config::{Flow, SteepConfig};
use steep_http::HttpManager;
use tracing::{debug, info};

/// [`Browser`] over a goose user: requests land in the harness metrics and
/// step outcomes are reported as request success or failure.
pub struct GooseBrowser<'a> {
    user: &'a mut GooseUser,
}

impl<'a> GooseBrowser<'a> {
    pub fn new(user: &'a mut GooseUser) -> Self {
        Self { user }
    }

    async fn send(&mut self, request: GooseRequest<'_>) -> Result<Page<GooseRequestMetric>, BrowserError> {
        let goose = self
            .user
            .request(request)
            .await
            .map_err(|e| BrowserError::Transport(e.to_string()))?;

        let metric = goose.request;
        let response = goose
            .response
            .map_err(|e| BrowserError::Transport(e.to_string()))?;
        let body = response
            .text()
            .await
            .map_err(|e| BrowserError::Transport(e.to_string()))?;

        Ok(Page {
            url: metric.final_url.clone(),
            status: metric.status_code,
            body,
            receipt: metric,
        })
    }
}

#[async_trait::async_trait]
impl Browser for GooseBrowser<'_> {
    type Receipt = GooseRequestMetric;

    async fn get(&mut self, url: &str, name: &str) -> Result<Page<Self::Receipt>, BrowserError> {
        let builder = self
            .user
            .get_request_builder(&GooseMethod::Get, url)
            .map_err(|e| BrowserError::Transport(e.to_string()))?;

        let request = GooseRequest::builder()
            .method(GooseMethod::Get)
            .path(url)
            .name(name)
            .set_request_builder(builder)
            .build();

        self.send(request).await
    }

    async fn post_form(
        &mut self,
        url: &str,
        name: &str,
        form: &[(String, String)],
    ) -> Result<Page<Self::Receipt>, BrowserError> {
        let builder = self
            .user
            .get_request_builder(&GooseMethod::Post, url)
            .map_err(|e| BrowserError::Transport(e.to_string()))?
            .form(form);

        let request = GooseRequest::builder()
            .method(GooseMethod::Post)
            .path(url)
            .name(name)
            .set_request_builder(builder)
            .build();

        self.send(request).await
    }

    fn pass(&mut self, page: &mut Page<Self::Receipt>) {
        if let Err(e) = self.user.set_success(&mut page.receipt) {
            debug!("could not record success: {}", e);
        }
    }

    fn fail(&mut self, page: &mut Page<Self::Receipt>, failure: &StepFailure) {
        // set_failure hands the failure back as an error; the flow already has it
        let _ = self
            .user
            .set_failure(&failure.harness_tag(), &mut page.receipt, None, None);
    }
}

async fn start_user(storefront: &Storefront, flow: Flow, user: &mut GooseUser) -> TransactionResult {
    let mut ctx = SessionContext::new();
    let outcome = storefront
        .start_user(flow, &mut GooseBrowser::new(user), &mut ctx)
        .await;

    if let Err(failure) = outcome {
        debug!(user = user.weighted_users_index, "start failed: {}", failure);
    }
    user.set_session_data(ctx);
    Ok(())
}

async fn run_user_iteration(
    storefront: &Storefront,
    flow: Flow,
    user: &mut GooseUser,
) -> TransactionResult {
    let mut ctx = user
        .get_session_data::<SessionContext>()
        .cloned()
        .unwrap_or_default();

    let outcome = storefront
        .run_iteration(flow, &mut GooseBrowser::new(user), &mut ctx)
        .await;

    if let Err(failure) = outcome {
        debug!(
            user = user.weighted_users_index,
            iteration = ctx.iterations,
            "iteration ended early: {}",
            failure
        );
    }
    user.set_session_data(ctx);
    Ok(())
}

/// Scenario for `flow`: an on-start login (for flows that need one) and one
/// repeating transaction, paced by the configured wait bounds.
pub fn build_scenario(storefront: Arc<Storefront>, flow: Flow) -> Result<Scenario, SessionError> {
    let wait_min = storefront.session().wait_min;
    let wait_max = storefront.session().wait_max;

    let mut scenario = Scenario::new(flow.as_str());

    if flow.requires_login() {
        let shared = Arc::clone(&storefront);
        let on_start: TransactionFunction = Arc::new(move |user| {
            let storefront = Arc::clone(&shared);
            Box::pin(async move { start_user(&storefront, flow, user).await })
        });
        scenario = scenario.register_transaction(Transaction::new(on_start).set_name("login").set_on_start());
    }

    let iterate: TransactionFunction = Arc::new(move |user| {
        let storefront = Arc::clone(&storefront);
        Box::pin(async move { run_user_iteration(&storefront, flow, user).await })
    });
    scenario = scenario.register_transaction(Transaction::new(iterate).set_name(flow.as_str()));

    scenario
        .set_wait_time(wait_min, wait_max)
        .map_err(|e| SessionError::Harness(e.to_string()))
}

/// Harness options expressed as its own command-line flags
pub fn harness_args(config: &SteepConfig) -> Vec<String> {
    let load = &config.load;
    let mut args = vec![
        "--host".to_string(),
        config.target.origin(),
        "--users".to_string(),
        load.users.to_string(),
        "--hatch-rate".to_string(),
        load.hatch_rate.to_string(),
        "--run-time".to_string(),
        load.run_time.as_secs().to_string(),
    ];

    if let Some(report_file) = &load.report_file {
        args.push("--report-file".to_string());
        args.push(report_file.clone());
    }

    args
}

/// Request counts for one harness endpoint, keyed as `METHOD name`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EndpointTally {
    pub success: usize,
    pub failed: usize,
}

/// Totals of a finished load run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SwarmReport {
    pub users: usize,
    pub requests: usize,
    pub failures: usize,
    pub endpoints: BTreeMap<String, EndpointTally>,
}

impl SwarmReport {
    fn from_metrics(metrics: &GooseMetrics) -> Self {
        let endpoints: BTreeMap<String, EndpointTally> = metrics
            .requests
            .iter()
            .map(|(key, aggregate)| {
                (
                    key.clone(),
                    EndpointTally {
                        success: aggregate.success_count,
                        failed: aggregate.fail_count,
                    },
                )
            })
            .collect();

        let (requests, failures) = endpoints
            .values()
            .fold((0, 0), |(requests, failures), tally| {
                (requests + tally.success + tally.failed, failures + tally.failed)
            });

        Self {
            users: metrics.maximum_users,
            requests,
            failures,
            endpoints,
        }
    }

    /// Tally of the first endpoint whose key ends with `name`
    pub fn endpoint(&self, name: &str) -> Option<&EndpointTally> {
        self.endpoints
            .iter()
            .find(|(key, _)| key.ends_with(name))
            .map(|(_, tally)| tally)
    }
}

/// POST the persistence reset endpoint; the run must not start if this fails
pub async fn reset_database(config: &SteepConfig) -> Result<(), SessionError> {
    let manager = HttpManager::with_config(config.http.clone().into())?;
    manager
        .reset_database(&config.target.url(&config.session.reset_path))
        .await
        .map_err(SessionError::ResetFailed)
}

/// Run the configured flow under load
pub async fn run_swarm(config: &SteepConfig) -> Result<SwarmReport, SessionError> {
    let storefront = Arc::new(Storefront::from_config(config)?);

    if config.session.reset_database {
        reset_database(config).await?;
        info!("storefront database reset");
    }

    let args = harness_args(config);
    let configuration = GooseConfiguration::parse_args_default(&args)
        .map_err(|e| SessionError::Harness(e.to_string()))?;
    let scenario = build_scenario(storefront, config.load.flow)?;

    info!(
        flow = %config.load.flow,
        users = config.load.users,
        run_time_secs = config.load.run_time.as_secs(),
        host = %config.target.origin(),
        "starting load run"
    );

    let metrics = GooseAttack::initialize_with_config(configuration)
        .map_err(|e| SessionError::Harness(e.to_string()))?
        .register_scenario(scenario)
        .execute()
        .await
        .map_err(|e| SessionError::Harness(e.to_string()))?;

    let report = SwarmReport::from_metrics(&metrics);
    info!(
        requests = report.requests,
        failures = report.failures,
        "load run finished"
    );
    Ok(report)
}
