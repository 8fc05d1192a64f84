use super::{expect_status, open, StepResult, Storefront};
use crate::browser::Browser;

const HOME: &str = "/home";

impl Storefront {
    /// Anonymous home page hit
    pub(crate) async fn homepage<B: Browser>(&self, browser: &mut B) -> StepResult {
        let mut page = open(browser, &self.url(HOME), HOME).await?;
        expect_status(browser, &mut page, HOME, &[200])?;
        browser.pass(&mut page);
        Ok(())
    }
}
