//! Link selection on listing pages

use crate::error::ScrapeResult;
use crate::strategy::ExtractionChain;
use url::Url;

/// Picks the first link matched by an ordered list of anchor selectors.
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    chain: ExtractionChain,
}

impl LinkExtractor {
    pub fn new<S: AsRef<str>>(selectors: &[S]) -> ScrapeResult<Self> {
        Ok(Self {
            chain: ExtractionChain::attrs(selectors, "href")?,
        })
    }

    /// Raw `href` of the first matching anchor
    pub fn first_href(&self, markup: &str) -> Option<String> {
        self.chain.first_match(markup)
    }

    /// First link resolved against the URL of the page it was found on
    pub fn first_link(&self, markup: &str, page_url: &str) -> ScrapeResult<Option<Url>> {
        match self.first_href(markup) {
            Some(href) => Ok(Some(resolve_link(page_url, &href)?)),
            None => Ok(None),
        }
    }
}

/// Resolve `href` the way a browser would from `page_url`
pub fn resolve_link(page_url: &str, href: &str) -> ScrapeResult<Url> {
    let base = Url::parse(page_url)?;
    Ok(base.join(href)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: &str = r#"<ul class="nav-sidebar">
        <li><a class="menulink" href="category?category=2&amp;page=1">Black Tea</a></li>
        <li><a class="menulink" href="category?category=3&amp;page=1">Green Tea</a></li>
        </ul>"#;

    #[test]
    fn test_first_link_in_document_order() {
        let links = LinkExtractor::new(&["ul.nav-sidebar a.menulink", "a.menulink"]).unwrap();
        let url = links
            .first_link(HOME, "http://localhost:8080/tools.descartes.teastore.webui/")
            .unwrap()
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/tools.descartes.teastore.webui/category?category=2&page=1"
        );
    }

    #[test]
    fn test_fallback_selector() {
        let page = r#"<div><a href="/shop/category?category=9">Herbal</a></div>"#;
        let links = LinkExtractor::new(&["a.menulink", "a[href*='category']"]).unwrap();
        let url = links.first_link(page, "http://localhost:8080/shop/home").unwrap().unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/shop/category?category=9");
    }

    #[test]
    fn test_no_link() {
        let links = LinkExtractor::new(&["div.thumbnail a"]).unwrap();
        assert!(links.first_link("<p>empty</p>", "http://localhost/").unwrap().is_none());
    }

    #[test]
    fn test_bad_page_url() {
        let links = LinkExtractor::new(&["a.menulink"]).unwrap();
        assert!(links.first_link(HOME, "not-a-url").is_err());
    }
}
