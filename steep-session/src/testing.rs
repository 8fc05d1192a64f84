//! Scripted browser and storefront pages for flow tests

use crate::browser::{Browser, Page};
use crate::error::{BrowserError, FailureKind, StepFailure};
use std::collections::HashMap;
use steep_http::HttpMethod;

pub(crate) const LOGIN_PAGE: &str = r#"<html><body>
<form action="loginAction" method="POST">
  <input type="hidden" name="_csrf" value="tok-1"/>
  <input type="text" name="username"/>
</form></body></html>"#;

pub(crate) const LOGIN_PAGE_NO_TOKEN: &str = r#"<html><body>
<form action="loginAction" method="POST"><input type="text" name="username"/></form>
</body></html>"#;

pub(crate) const LOGGED_IN_PAGE: &str = r#"<html><body>
<a href="/tools.descartes.teastore.webui/loginAction?logout=">Logout</a>
</body></html>"#;

pub(crate) const HOME_PAGE: &str = r#"<html><body>
<ul class="nav nav-sidebar">
  <li><a class="menulink" href="category?category=2&amp;page=1">Black Tea</a></li>
  <li><a class="menulink" href="category?category=3&amp;page=1">Green Tea</a></li>
</ul></body></html>"#;

pub(crate) const CATEGORY_PAGE: &str = r#"<html><body>
<div class="thumbnail"><a href="product?id=7"><img src="earl.png"/></a></div>
</body></html>"#;

pub(crate) const PRODUCT_PAGE: &str = r#"<html><body>
<h2 class="minipage-title">Earl Grey (loose)</h2>
<form action="cartAction" method="POST">
  <input type="hidden" name="productid" value="7"/>
  <input type="hidden" name="_csrf" value="tok-2"/>
</form></body></html>"#;

pub(crate) const CART_PAGE: &str = r#"<html><body>
<table><tr><td>Earl  Grey
 (loose)</td><td>1</td></tr></table>
</body></html>"#;

pub(crate) const EMPTY_CART_PAGE: &str = "<html><body><p>Your cart is empty</p></body></html>";

#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub method: HttpMethod,
    pub name: String,
    pub url: String,
    pub form: Vec<(String, String)>,
}

impl Call {
    pub fn field(&self, key: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Answers requests by step name; unscripted steps fail at the transport.
#[derive(Debug, Default)]
pub(crate) struct ScriptedBrowser {
    pages: HashMap<String, (u16, String)>,
    pub calls: Vec<Call>,
    /// Per call: `None` until settled, then the outcome
    pub settled: Vec<Option<Result<(), FailureKind>>>,
    /// Times each call was settled
    pub settle_counts: Vec<usize>,
}

impl ScriptedBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, name: &str, status: u16, body: &str) -> Self {
        self.pages.insert(name.to_string(), (status, body.to_string()));
        self
    }

    /// The happy-path storefront
    pub fn storefront() -> Self {
        Self::new()
            .page("/login", 200, LOGIN_PAGE)
            .page("/loginAction", 200, LOGGED_IN_PAGE)
            .page("/", 200, HOME_PAGE)
            .page("/category", 200, CATEGORY_PAGE)
            .page("/product", 200, PRODUCT_PAGE)
            .page("/cartAction", 200, CART_PAGE)
            .page("/cart", 200, CART_PAGE)
            .page("/logout", 200, LOGIN_PAGE)
            .page("/home", 200, HOME_PAGE)
    }

    pub fn calls_named(&self, name: &str) -> Vec<&Call> {
        self.calls.iter().filter(|c| c.name == name).collect()
    }

    fn answer(
        &mut self,
        method: HttpMethod,
        url: &str,
        name: &str,
        form: &[(String, String)],
    ) -> Result<Page<usize>, BrowserError> {
        self.calls.push(Call {
            method,
            name: name.to_string(),
            url: url.to_string(),
            form: form.to_vec(),
        });
        self.settled.push(None);
        self.settle_counts.push(0);

        let (status, body) = self
            .pages
            .get(name)
            .cloned()
            .ok_or_else(|| BrowserError::Transport(format!("connection refused: {}", url)))?;

        Ok(Page {
            url: url.to_string(),
            status,
            body,
            receipt: self.calls.len() - 1,
        })
    }

    fn settle(&mut self, index: usize, outcome: Result<(), FailureKind>) {
        self.settled[index] = Some(outcome);
        self.settle_counts[index] += 1;
    }
}

#[async_trait::async_trait]
impl Browser for ScriptedBrowser {
    type Receipt = usize;

    async fn get(&mut self, url: &str, name: &str) -> Result<Page<usize>, BrowserError> {
        self.answer(HttpMethod::Get, url, name, &[])
    }

    async fn post_form(
        &mut self,
        url: &str,
        name: &str,
        form: &[(String, String)],
    ) -> Result<Page<usize>, BrowserError> {
        self.answer(HttpMethod::Post, url, name, form)
    }

    fn pass(&mut self, page: &mut Page<usize>) {
        self.settle(page.receipt, Ok(()));
    }

    fn fail(&mut self, page: &mut Page<usize>, failure: &StepFailure) {
        self.settle(page.receipt, Err(failure.kind));
    }
}
