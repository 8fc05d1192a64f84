use super::{expect_status, open, submit, StepResult, Storefront};
use crate::browser::Browser;
use crate::context::SessionContext;

const PAGES: [&str; 3] = ["/", "/category", "/product"];
const LOGOUT: &str = "/loginAction?logout=";
const LOGOUT_NAME: &str = "/logout";

impl Storefront {
    /// Visit the main pages and log out, checking statuses only.
    ///
    /// A bad status does not stop the remaining pages; the first failure is
    /// reported once all of them were visited. The session is anonymous
    /// afterwards.
    pub(crate) async fn navigation<B: Browser>(
        &self,
        browser: &mut B,
        ctx: &mut SessionContext,
    ) -> StepResult {
        let mut first_failure = None;

        for path in PAGES {
            let mut page = open(browser, &self.url(path), path).await?;
            match expect_status(browser, &mut page, path, &[200]) {
                Ok(()) => {
                    self.observe_token(ctx, &page.body);
                    browser.pass(&mut page);
                }
                Err(failure) => {
                    first_failure.get_or_insert(failure);
                }
            }
        }

        let form = self.with_token(ctx, Vec::new());
        let mut page = submit(browser, &self.url(LOGOUT), LOGOUT_NAME, &form).await?;
        ctx.sign_out();
        match expect_status(browser, &mut page, LOGOUT_NAME, &[200, 302]) {
            Ok(()) => browser.pass(&mut page),
            Err(failure) => {
                first_failure.get_or_insert(failure);
            }
        }

        match first_failure {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }
}
