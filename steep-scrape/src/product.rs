//! Product page extraction

use crate::error::ScrapeResult;
use crate::strategy::{ExtractionChain, Strategy};
use serde::Serialize;
use steep_config::SelectorConfig;
use url::Url;

const PRODUCT_ID_PATTERN: &str = r#"name=["']productid["'][^>]*?value=["'](\d+)["']"#;

/// What the cart step needs from a product page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct ProductInfo {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl ProductInfo {
    pub fn is_complete(&self) -> bool {
        self.id.is_some() && self.name.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct ProductExtractor {
    names: ExtractionChain,
    ids: ExtractionChain,
}

impl ProductExtractor {
    pub fn from_config(selectors: &SelectorConfig) -> ScrapeResult<Self> {
        let names = ExtractionChain::texts(&selectors.product_names)?;
        let ids = ExtractionChain::attrs(&selectors.product_ids, "value")?
            .then(Strategy::pattern(PRODUCT_ID_PATTERN, 1)?);

        Ok(Self { names, ids })
    }

    /// Name and identifier; the identifier falls back to the `id` query
    /// parameter of the page URL.
    pub fn extract(&self, markup: &str, page_url: &str) -> ProductInfo {
        let name = self.names.first_match(markup);
        let id = self.ids.first_match(markup).or_else(|| id_from_url(page_url));

        ProductInfo { id, name }
    }
}

fn id_from_url(page_url: &str) -> Option<String> {
    let url = Url::parse(page_url).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "id")
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> ProductExtractor {
        ProductExtractor::from_config(&SelectorConfig::default()).unwrap()
    }

    #[test]
    fn test_product_page() {
        let page = r#"<h2 class="minipage-title">Assam Tea</h2>
            <form action="cartAction" method="POST">
            <input type="hidden" name="productid" value="7">
            <input type="submit" name="addToCart" value="Add to Cart"></form>"#;
        let info = extractor().extract(page, "http://localhost/webui/product?id=7");
        assert_eq!(info.name.as_deref(), Some("Assam Tea"));
        assert_eq!(info.id.as_deref(), Some("7"));
        assert!(info.is_complete());
    }

    #[test]
    fn test_id_from_url() {
        let page = "<h2>Darjeeling</h2>";
        let info = extractor().extract(page, "http://localhost/webui/product?id=42");
        assert_eq!(info.id.as_deref(), Some("42"));
        assert_eq!(info.name.as_deref(), Some("Darjeeling"));
    }

    #[test]
    fn test_incomplete() {
        let info = extractor().extract("<p>nothing</p>", "http://localhost/webui/product");
        assert_eq!(info, ProductInfo::default());
        assert!(!info.is_complete());
    }
}
