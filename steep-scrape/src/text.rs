//! Text normalisation for outcome checks

use scraper::Html;

/// Lowercase with every whitespace character removed
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Visible text of a document, whitespace-collapsed
pub fn document_text(markup: &str) -> String {
    let document = Html::parse_document(markup);
    document
        .root_element()
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether `needle` occurs in the raw markup or in the document text,
/// ignoring case and whitespace. An empty needle never matches.
pub fn contains_normalized(markup: &str, needle: &str) -> bool {
    let needle = normalize(needle);
    if needle.is_empty() {
        return false;
    }

    normalize(markup).contains(&needle) || normalize(&document_text(markup)).contains(&needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Earl\tGrey \n Tea "), "earlgreytea");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_contains_ignores_case_and_whitespace() {
        let cart = "<table><tr><td>EARL   GREY\n tea</td><td>1</td></tr></table>";
        assert!(contains_normalized(cart, "Earl Grey Tea"));
        assert!(contains_normalized(cart, "earlgrey"));
        assert!(!contains_normalized(cart, "Sencha"));
    }

    #[test]
    fn test_entities_are_matched_through_document_text() {
        let cart = "<td>Rooibos &amp; Vanilla</td>";
        assert!(contains_normalized(cart, "Rooibos & Vanilla"));
    }

    #[test]
    fn test_empty_needle() {
        assert!(!contains_normalized("<p>anything</p>", "   "));
    }
}
