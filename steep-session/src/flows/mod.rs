//! User journeys against the storefront
//!
//! Flows are generic over [`Browser`], so the same journey runs under the
//! load harness, through the single-user probe, or against a scripted fake.
//! A failed step settles its page as failed, is logged, and ends the
//! iteration by returning the [`StepFailure`].

mod homepage;
mod login;
mod navigation;
mod shopping;

use crate::browser::{Browser, Page};
use crate::context::SessionContext;
use crate::error::{SessionError, StepFailure};
use steep_config::{Flow, SessionConfig, SteepConfig, TargetConfig};
use steep_http::FormFields;
use steep_scrape::{LinkExtractor, ProductExtractor, TokenExtractor};
use tracing::{debug, warn};

pub type StepResult = Result<(), StepFailure>;

/// The storefront under test plus the extractors its pages need.
///
/// Built once per run and shared read-only by every simulated user.
#[derive(Debug)]
pub struct Storefront {
    target: TargetConfig,
    session: SessionConfig,
    tokens: TokenExtractor,
    categories: LinkExtractor,
    products: LinkExtractor,
    product_info: ProductExtractor,
}

impl Storefront {
    pub fn new(target: TargetConfig, session: SessionConfig) -> Result<Self, SessionError> {
        let selectors = &session.selectors;
        let tokens = TokenExtractor::from_config(selectors)?;
        let categories = LinkExtractor::new(&selectors.category_links)?;
        let products = LinkExtractor::new(&selectors.product_links)?;
        let product_info = ProductExtractor::from_config(selectors)?;

        Ok(Self {
            target,
            session,
            tokens,
            categories,
            products,
            product_info,
        })
    }

    pub fn from_config(config: &SteepConfig) -> Result<Self, SessionError> {
        Self::new(config.target.clone(), config.session.clone())
    }

    pub fn target(&self) -> &TargetConfig {
        &self.target
    }

    pub fn session(&self) -> &SessionConfig {
        &self.session
    }

    /// Runs once when a simulated user starts
    pub async fn start_user<B: Browser>(
        &self,
        flow: Flow,
        browser: &mut B,
        ctx: &mut SessionContext,
    ) -> StepResult {
        if flow.requires_login() {
            self.login(browser, ctx).await?;
        }
        Ok(())
    }

    /// One pass through the flow. An anonymous session logs in first.
    pub async fn run_iteration<B: Browser>(
        &self,
        flow: Flow,
        browser: &mut B,
        ctx: &mut SessionContext,
    ) -> StepResult {
        ctx.iterations += 1;
        debug!(flow = %flow, iteration = ctx.iterations, "starting iteration");

        if flow.requires_login() && !ctx.authenticated {
            self.login(browser, ctx).await?;
        }

        match flow {
            Flow::Shopping => self.shopping(browser, ctx).await,
            Flow::Navigation => self.navigation(browser, ctx).await,
            Flow::Homepage => self.homepage(browser).await,
        }
    }

    fn url(&self, path: &str) -> String {
        self.target.url(path)
    }

    fn observe_token(&self, ctx: &mut SessionContext, body: &str) {
        ctx.refresh_token(self.tokens.extract(body));
    }

    /// Append the current token under the configured field name
    fn with_token(&self, ctx: &SessionContext, mut form: FormFields) -> FormFields {
        if let Some(token) = &ctx.token {
            form.push((self.session.token_field.clone(), token.clone()));
        }
        form
    }
}

pub(crate) async fn open<B: Browser>(
    browser: &mut B,
    url: &str,
    name: &str,
) -> Result<Page<B::Receipt>, StepFailure> {
    browser.get(url, name).await.map_err(|e| {
        let failure = StepFailure::transport(name, &e);
        warn!(step = name, tag = failure.kind.tag(), "{}", failure.message);
        failure
    })
}

pub(crate) async fn submit<B: Browser>(
    browser: &mut B,
    url: &str,
    name: &str,
    form: &[(String, String)],
) -> Result<Page<B::Receipt>, StepFailure> {
    browser.post_form(url, name, form).await.map_err(|e| {
        let failure = StepFailure::transport(name, &e);
        warn!(step = name, tag = failure.kind.tag(), "{}", failure.message);
        failure
    })
}

/// Settle `page` as failed and hand the failure back
pub(crate) fn reject<B: Browser>(
    browser: &mut B,
    page: &mut Page<B::Receipt>,
    failure: StepFailure,
) -> StepFailure {
    warn!(step = %failure.step, tag = failure.kind.tag(), "{}", failure.message);
    browser.fail(page, &failure);
    failure
}

pub(crate) fn expect_status<B: Browser>(
    browser: &mut B,
    page: &mut Page<B::Receipt>,
    step: &str,
    accepted: &[u16],
) -> StepResult {
    if page.status_in(accepted) {
        Ok(())
    } else {
        let failure = StepFailure::status(step, page.status, accepted);
        Err(reject(browser, page, failure))
    }
}
