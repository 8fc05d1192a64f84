use super::{expect_status, open, reject, submit, StepResult, Storefront};
use crate::browser::Browser;
use crate::context::SessionContext;
use crate::error::{FailureKind, StepFailure};
use steep_config::TokenPolicy;
use tracing::{debug, warn};

const LOGIN: &str = "/login";
const LOGIN_ACTION: &str = "/loginAction";

impl Storefront {
    /// Fetch the login form, post the test account, check the marker.
    ///
    /// Any failure leaves the session anonymous.
    pub async fn login<B: Browser>(&self, browser: &mut B, ctx: &mut SessionContext) -> StepResult {
        ctx.sign_out();

        let mut page = open(browser, &self.url(LOGIN), LOGIN).await?;
        expect_status(browser, &mut page, LOGIN, &[200])?;

        match self.tokens.extract(&page.body) {
            Some(token) => ctx.token = Some(token),
            None => match self.session.token_policy {
                TokenPolicy::Required => {
                    return Err(reject(
                        browser,
                        &mut page,
                        StepFailure::new(FailureKind::TokenMissing, LOGIN, "no token on login page"),
                    ));
                }
                TokenPolicy::Optional => {
                    warn!(step = LOGIN, "no token on login page, posting credentials without one");
                }
            },
        }
        browser.pass(&mut page);

        let form = self.with_token(
            ctx,
            vec![
                ("username".to_string(), self.session.username.clone()),
                ("password".to_string(), self.session.password.clone()),
                ("action".to_string(), "login".to_string()),
            ],
        );

        let mut page = submit(browser, &self.url(LOGIN_ACTION), LOGIN_ACTION, &form).await?;
        expect_status(browser, &mut page, LOGIN_ACTION, &[200, 302])?;

        if !page.body.contains(&self.session.login_marker) {
            return Err(reject(
                browser,
                &mut page,
                StepFailure::new(
                    FailureKind::LoginRejected,
                    LOGIN_ACTION,
                    format!("'{}' not found after login", self.session.login_marker),
                ),
            ));
        }

        self.observe_token(ctx, &page.body);
        ctx.authenticated = true;
        browser.pass(&mut page);

        debug!(username = %self.session.username, "logged in");
        Ok(())
    }
}
