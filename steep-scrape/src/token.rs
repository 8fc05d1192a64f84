//! Anti-forgery token extraction

use crate::error::ScrapeResult;
use crate::strategy::{ExtractionChain, Strategy};
use steep_config::SelectorConfig;

/// Finds the session token on a page: hidden inputs first, then meta tags,
/// then raw-markup patterns.
#[derive(Debug, Clone)]
pub struct TokenExtractor {
    chain: ExtractionChain,
}

impl TokenExtractor {
    pub fn from_config(selectors: &SelectorConfig) -> ScrapeResult<Self> {
        let mut chain = ExtractionChain::attrs(&selectors.token_inputs, "value")?;

        for selector in &selectors.token_meta {
            chain = chain.then(Strategy::meta(selector)?);
        }
        for pattern in &selectors.token_patterns {
            chain = chain.then(Strategy::pattern(pattern, 1)?);
        }

        Ok(Self { chain })
    }

    pub fn extract(&self, markup: &str) -> Option<String> {
        self.chain.first_match(markup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> TokenExtractor {
        TokenExtractor::from_config(&SelectorConfig::default()).unwrap()
    }

    #[test]
    fn test_hidden_input() {
        let page = r#"<form><input type="hidden" name="_csrf" value="abc-123"></form>"#;
        assert_eq!(extractor().extract(page).as_deref(), Some("abc-123"));
    }

    #[test]
    fn test_alternate_input_names() {
        let page = r#"<form><input type="hidden" name="csrf" value="alt"></form>"#;
        assert_eq!(extractor().extract(page).as_deref(), Some("alt"));
    }

    #[test]
    fn test_meta_tag() {
        let page = r#"<html><head><meta name="_csrf" content="from-meta"></head><body></body></html>"#;
        assert_eq!(extractor().extract(page).as_deref(), Some("from-meta"));
    }

    #[test]
    fn test_pattern_fallback_on_broken_markup() {
        // only recoverable from the raw markup
        let page = r#"<!-- value="hidden" --><template>value='pat-tok' name='_csrf'</template>"#;
        assert_eq!(extractor().extract(page).as_deref(), Some("pat-tok"));
    }

    #[test]
    fn test_missing_token() {
        let page = "<html><body><form><input name='username'></form></body></html>";
        assert_eq!(extractor().extract(page), None);
    }
}
