//! Single-user dry run of a flow
//!
//! Walks one login and one iteration through a cookie-keeping
//! [`HttpClient`] and records every step, so selectors and credentials can
//! be checked against a storefront before a load run.

use crate::browser::{Browser, Page};
use crate::context::SessionContext;
use crate::error::{BrowserError, FailureKind, SessionError, StepFailure};
use crate::flows::Storefront;
use serde::Serialize;
use std::time::Instant;
use steep_config::{Flow, SteepConfig};
use steep_http::{HttpClient, HttpManager, HttpMethod};
use tracing::info;

/// How a recorded step ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum StepOutcome {
    /// Fetched but never settled
    Pending,
    Passed,
    Failed { kind: FailureKind, message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub name: String,
    pub method: HttpMethod,
    pub url: String,
    pub status: Option<u16>,
    pub elapsed_ms: u64,
    #[serde(flatten)]
    pub outcome: StepOutcome,
}

/// [`Browser`] that sends through an [`HttpClient`] and keeps a step log
pub struct ProbeBrowser<'a, C: HttpClient> {
    client: &'a C,
    steps: Vec<StepRecord>,
}

impl<'a, C: HttpClient> ProbeBrowser<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self {
            client,
            steps: Vec::new(),
        }
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    pub fn into_steps(self) -> Vec<StepRecord> {
        self.steps
    }

    async fn send(
        &mut self,
        method: HttpMethod,
        url: &str,
        name: &str,
        form: Option<&[(String, String)]>,
    ) -> Result<Page<usize>, BrowserError> {
        let started = Instant::now();
        match self.client.fetch(method, url, form).await {
            Ok(response) => {
                self.steps.push(StepRecord {
                    name: name.to_string(),
                    method,
                    url: response.url.clone(),
                    status: Some(response.status),
                    elapsed_ms: response.elapsed.as_millis() as u64,
                    outcome: StepOutcome::Pending,
                });
                Ok(Page {
                    url: response.url,
                    status: response.status,
                    body: response.body,
                    receipt: self.steps.len() - 1,
                })
            }
            Err(e) => {
                let error = BrowserError::from(e);
                self.steps.push(StepRecord {
                    name: name.to_string(),
                    method,
                    url: url.to_string(),
                    status: None,
                    elapsed_ms: started.elapsed().as_millis() as u64,
                    outcome: StepOutcome::Failed {
                        kind: FailureKind::Transport,
                        message: error.to_string(),
                    },
                });
                Err(error)
            }
        }
    }

    fn settle(&mut self, index: usize, outcome: StepOutcome) {
        if let Some(step) = self.steps.get_mut(index) {
            step.outcome = outcome;
        }
    }
}

#[async_trait::async_trait]
impl<C: HttpClient> Browser for ProbeBrowser<'_, C> {
    /// Index of the page's entry in the step log
    type Receipt = usize;

    async fn get(&mut self, url: &str, name: &str) -> Result<Page<usize>, BrowserError> {
        self.send(HttpMethod::Get, url, name, None).await
    }

    async fn post_form(
        &mut self,
        url: &str,
        name: &str,
        form: &[(String, String)],
    ) -> Result<Page<usize>, BrowserError> {
        self.send(HttpMethod::Post, url, name, Some(form)).await
    }

    fn pass(&mut self, page: &mut Page<usize>) {
        self.settle(page.receipt, StepOutcome::Passed);
    }

    fn fail(&mut self, page: &mut Page<usize>, failure: &StepFailure) {
        self.settle(
            page.receipt,
            StepOutcome::Failed {
                kind: failure.kind,
                message: failure.message.clone(),
            },
        );
    }
}

/// Result of a probe run
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub flow: Flow,
    pub steps: Vec<StepRecord>,
    /// First failure, which ended the run
    pub failure: Option<StepFailure>,
    pub authenticated: bool,
    pub token_seen: bool,
}

impl ProbeReport {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

/// Run the start step and one iteration of `flow` with any [`HttpClient`]
pub async fn probe_with<C: HttpClient>(
    storefront: &Storefront,
    flow: Flow,
    client: &C,
) -> ProbeReport {
    let mut browser = ProbeBrowser::new(client);
    let mut ctx = SessionContext::new();

    let mut outcome = storefront.start_user(flow, &mut browser, &mut ctx).await;
    if outcome.is_ok() {
        outcome = storefront.run_iteration(flow, &mut browser, &mut ctx).await;
    }

    ProbeReport {
        flow,
        steps: browser.into_steps(),
        failure: outcome.err(),
        authenticated: ctx.authenticated,
        token_seen: ctx.token.is_some(),
    }
}

/// Probe the configured storefront with a fresh cookie session
pub async fn run_probe(config: &SteepConfig, flow: Flow) -> Result<ProbeReport, SessionError> {
    let storefront = Storefront::from_config(config)?;
    let manager = HttpManager::with_config(config.http.clone().into())?;

    if config.session.reset_database {
        manager
            .reset_database(&config.target.url(&config.session.reset_path))
            .await
            .map_err(SessionError::ResetFailed)?;
    }

    info!(flow = %flow, target = %config.target.url(""), "probing storefront");
    let report = probe_with(&storefront, flow, &manager).await;
    info!(
        steps = report.steps.len(),
        passed = report.passed(),
        "probe finished"
    );
    Ok(report)
}
