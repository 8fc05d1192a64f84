//! Extraction strategies and ordered chains

use crate::error::{ScrapeError, ScrapeResult};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// One way of pulling a string out of a page.
#[derive(Debug, Clone)]
pub enum Strategy {
    /// Attribute of the first element matching a CSS selector
    Attr {
        source: String,
        selector: Selector,
        attr: String,
    },
    /// Trimmed text content of the first element matching a CSS selector
    Text { source: String, selector: Selector },
    /// Capture group of the first regex match over the raw markup
    Pattern { regex: Regex, group: usize },
}

impl Strategy {
    pub fn attr(selector: &str, attr: &str) -> ScrapeResult<Self> {
        Ok(Strategy::Attr {
            source: selector.to_string(),
            selector: parse_selector(selector)?,
            attr: attr.to_string(),
        })
    }

    /// `content` attribute of a `<meta>` element
    pub fn meta(selector: &str) -> ScrapeResult<Self> {
        Self::attr(selector, "content")
    }

    pub fn text(selector: &str) -> ScrapeResult<Self> {
        Ok(Strategy::Text {
            source: selector.to_string(),
            selector: parse_selector(selector)?,
        })
    }

    pub fn pattern(pattern: &str, group: usize) -> ScrapeResult<Self> {
        Ok(Strategy::Pattern {
            regex: Regex::new(pattern)?,
            group,
        })
    }

    /// Apply against an already parsed document and its raw markup
    pub fn apply(&self, document: &Html, markup: &str) -> Option<String> {
        match self {
            Strategy::Attr { selector, attr, .. } => document
                .select(selector)
                .next()
                .and_then(|element| element.value().attr(attr))
                .map(|value| value.trim().to_string()),
            Strategy::Text { selector, .. } => document.select(selector).next().map(element_text),
            Strategy::Pattern { regex, group } => capture(regex, *group, markup),
        }
        .filter(|value| !value.is_empty())
    }

    /// Short description used in log lines
    pub fn describe(&self) -> String {
        match self {
            Strategy::Attr { source, attr, .. } => format!("{}@{}", source, attr),
            Strategy::Text { source, .. } => format!("{}#text", source),
            Strategy::Pattern { regex, group } => format!("/{}/[{}]", regex.as_str(), group),
        }
    }
}

/// Strategies tried in order; the first non-empty value wins.
#[derive(Debug, Clone, Default)]
pub struct ExtractionChain {
    strategies: Vec<Strategy>,
}

impl ExtractionChain {
    pub fn new(strategies: Vec<Strategy>) -> Self {
        Self { strategies }
    }

    /// Chain of `attr` lookups over a list of selectors
    pub fn attrs<S: AsRef<str>>(selectors: &[S], attr: &str) -> ScrapeResult<Self> {
        let strategies = selectors
            .iter()
            .map(|s| Strategy::attr(s.as_ref(), attr))
            .collect::<ScrapeResult<Vec<_>>>()?;
        Ok(Self::new(strategies))
    }

    /// Chain of text lookups over a list of selectors
    pub fn texts<S: AsRef<str>>(selectors: &[S]) -> ScrapeResult<Self> {
        let strategies = selectors
            .iter()
            .map(|s| Strategy::text(s.as_ref()))
            .collect::<ScrapeResult<Vec<_>>>()?;
        Ok(Self::new(strategies))
    }

    pub fn then(mut self, strategy: Strategy) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn extend(mut self, other: ExtractionChain) -> Self {
        self.strategies.extend(other.strategies);
        self
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// First hit over raw markup. The document is parsed only when a
    /// selector-based strategy is reached.
    pub fn first_match(&self, markup: &str) -> Option<String> {
        let mut document: Option<Html> = None;

        for strategy in &self.strategies {
            let hit = match strategy {
                Strategy::Pattern { regex, group } => {
                    capture(regex, *group, markup).filter(|value| !value.is_empty())
                }
                _ => {
                    let parsed = document.get_or_insert_with(|| Html::parse_document(markup));
                    strategy.apply(parsed, markup)
                }
            };

            if let Some(value) = hit {
                tracing::trace!(strategy = %strategy.describe(), "extraction hit");
                return Some(value);
            }
        }

        None
    }

    /// First hit against a document the caller already parsed
    pub fn first_match_in(&self, document: &Html, markup: &str) -> Option<String> {
        self.strategies
            .iter()
            .find_map(|strategy| strategy.apply(document, markup))
    }
}

fn capture(regex: &Regex, group: usize, markup: &str) -> Option<String> {
    regex
        .captures(markup)
        .and_then(|caps| caps.get(group))
        .map(|m| m.as_str().trim().to_string())
}

pub(crate) fn parse_selector(selector: &str) -> ScrapeResult<Selector> {
    Selector::parse(selector).map_err(|e| ScrapeError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Text content with runs of whitespace collapsed
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
