//! The seam between flows and whatever sends the requests

use crate::error::{BrowserError, StepFailure};

/// A fully read response plus whatever the driver needs to settle the step
#[derive(Debug)]
pub struct Page<R> {
    /// Final URL after redirects; links on the page resolve against it
    pub url: String,
    pub status: u16,
    pub body: String,
    pub receipt: R,
}

impl<R> Page<R> {
    pub fn status_in(&self, accepted: &[u16]) -> bool {
        accepted.contains(&self.status)
    }
}

/// Sends requests for one simulated user and records step outcomes.
///
/// Every page a flow fetches is settled exactly once with [`Browser::pass`]
/// or [`Browser::fail`].
#[async_trait::async_trait]
pub trait Browser: Send {
    /// Driver-specific handle used to settle a step
    type Receipt: Send;

    async fn get(&mut self, url: &str, name: &str) -> Result<Page<Self::Receipt>, BrowserError>;

    async fn post_form(
        &mut self,
        url: &str,
        name: &str,
        form: &[(String, String)],
    ) -> Result<Page<Self::Receipt>, BrowserError>;

    fn pass(&mut self, page: &mut Page<Self::Receipt>);

    fn fail(&mut self, page: &mut Page<Self::Receipt>, failure: &StepFailure);
}
