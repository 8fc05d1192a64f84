use super::{expect_status, open, reject, submit, StepResult, Storefront};
use crate::browser::Browser;
use crate::context::SessionContext;
use crate::error::{FailureKind, StepFailure};
use steep_scrape::{contains_normalized, LinkExtractor};
use url::Url;

const HOME: &str = "/";
const CATEGORY: &str = "/category";
const PRODUCT: &str = "/product";
const CART_ACTION: &str = "/cartAction";
const CART: &str = "/cart";

impl Storefront {
    /// Home, first category, first product, add it to the cart, check the cart.
    pub(crate) async fn shopping<B: Browser>(
        &self,
        browser: &mut B,
        ctx: &mut SessionContext,
    ) -> StepResult {
        let category = self
            .follow(browser, ctx, &self.url(HOME), HOME, &self.categories, "category")
            .await?;
        let product = self
            .follow(browser, ctx, category.as_str(), CATEGORY, &self.products, "product")
            .await?;

        let mut page = open(browser, product.as_str(), PRODUCT).await?;
        expect_status(browser, &mut page, PRODUCT, &[200])?;
        self.observe_token(ctx, &page.body);

        let info = self.product_info.extract(&page.body, &page.url);
        let (Some(product_id), Some(product_name)) = (info.id, info.name) else {
            return Err(reject(
                browser,
                &mut page,
                StepFailure::new(FailureKind::ScrapeMiss, PRODUCT, "product id or name missing"),
            ));
        };
        browser.pass(&mut page);

        let form = self.with_token(
            ctx,
            vec![
                ("productid".to_string(), product_id),
                ("addToCart".to_string(), "Add to Cart".to_string()),
            ],
        );
        let mut page = submit(browser, &self.url(CART_ACTION), CART_ACTION, &form).await?;
        expect_status(browser, &mut page, CART_ACTION, &[200, 302])?;
        self.observe_token(ctx, &page.body);
        browser.pass(&mut page);

        let mut page = open(browser, &self.url(CART), CART).await?;
        expect_status(browser, &mut page, CART, &[200])?;
        self.observe_token(ctx, &page.body);

        if !contains_normalized(&page.body, &product_name) {
            return Err(reject(
                browser,
                &mut page,
                StepFailure::new(
                    FailureKind::Verification,
                    CART,
                    format!("product '{}' not in cart", product_name),
                ),
            ));
        }
        browser.pass(&mut page);

        Ok(())
    }

    /// GET a listing page and return the first link `links` selects on it
    async fn follow<B: Browser>(
        &self,
        browser: &mut B,
        ctx: &mut SessionContext,
        url: &str,
        name: &str,
        links: &LinkExtractor,
        what: &str,
    ) -> Result<Url, StepFailure> {
        let mut page = open(browser, url, name).await?;
        expect_status(browser, &mut page, name, &[200])?;
        self.observe_token(ctx, &page.body);

        match links.first_link(&page.body, &page.url) {
            Ok(Some(link)) => {
                browser.pass(&mut page);
                Ok(link)
            }
            Ok(None) => Err(reject(
                browser,
                &mut page,
                StepFailure::new(FailureKind::ScrapeMiss, name, format!("no {} link", what)),
            )),
            Err(e) => Err(reject(
                browser,
                &mut page,
                StepFailure::new(FailureKind::ScrapeMiss, name, format!("unusable {} link: {}", what, e)),
            )),
        }
    }
}
