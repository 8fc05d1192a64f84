//! HTML table previews

use crate::error::ScrapeResult;
use crate::strategy::{element_text, parse_selector};
use scraper::{Html, Selector};
use serde::Serialize;
use std::collections::BTreeMap;

/// Header cells plus a bounded number of data rows from one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct TablePreview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TablePreview {
    /// First data row keyed by header. Extra cells without a header are dropped.
    pub fn first_row_map(&self) -> Option<BTreeMap<String, String>> {
        let first = self.rows.first()?;
        Some(
            self.headers
                .iter()
                .cloned()
                .zip(first.iter().cloned())
                .collect(),
        )
    }

    /// Index of a header, compared case-insensitively
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
    }
}

/// Preview of the first `<table>`, optionally inside `container`.
///
/// Headers come from the table's `th` cells in document order; data rows are
/// the `tr` elements carrying `td` cells, capped at `max_rows`.
pub fn first_table(
    markup: &str,
    container: Option<&str>,
    max_rows: usize,
) -> ScrapeResult<Option<TablePreview>> {
    let table_selector = match container {
        Some(container) => parse_selector(&format!("{} table", container))?,
        None => parse_selector("table")?,
    };
    let th = parse_selector("th")?;
    let tr = parse_selector("tr")?;
    let td = parse_selector("td")?;

    let document = Html::parse_document(markup);
    let Some(table) = document.select(&table_selector).next() else {
        return Ok(None);
    };

    let headers = table.select(&th).map(element_text).collect();
    let rows = table
        .select(&tr)
        .map(|row| row.select(&td).map(element_text).collect::<Vec<_>>())
        .filter(|cells| !cells.is_empty())
        .take(max_rows)
        .collect();

    Ok(Some(TablePreview { headers, rows }))
}

/// Trimmed text of the first `<h1>`
pub fn first_heading(markup: &str) -> Option<String> {
    let h1 = Selector::parse("h1").ok()?;
    let document = Html::parse_document(markup);
    let text = document.select(&h1).next().map(element_text)?;
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_and_first_row() {
        let page = "<table><tr><th>Name</th><th>Requests</th></tr><tr><td>Total</td><td>42</td></tr></table>";
        let preview = first_table(page, None, 5).unwrap().unwrap();
        assert_eq!(preview.headers, vec!["Name", "Requests"]);

        let first = preview.first_row_map().unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first["Name"], "Total");
        assert_eq!(first["Requests"], "42");
    }

    #[test]
    fn test_rows_are_bounded() {
        let mut page = String::from("<table><thead><tr><th>Type</th><th>Avg</th></tr></thead><tbody>");
        for i in 0..12 {
            page.push_str(&format!("<tr><td>GET</td><td>{}</td></tr>", i));
        }
        page.push_str("</tbody></table>");

        let preview = first_table(&page, None, 5).unwrap().unwrap();
        assert_eq!(preview.rows.len(), 5);
        assert_eq!(preview.rows[4], vec!["GET", "4"]);
        assert_eq!(preview.column("avg"), Some(1));
    }

    #[test]
    fn test_container_and_missing_table() {
        let page = r#"<table><tr><td>nav</td></tr></table>
            <div class="stats"><table><tr><th>Name</th></tr><tr><td>/login</td></tr></table></div>"#;
        let preview = first_table(page, Some("div.stats"), 5).unwrap().unwrap();
        assert_eq!(preview.rows, vec![vec!["/login".to_string()]]);

        assert!(first_table("<p>no tables</p>", None, 5).unwrap().is_none());
    }

    #[test]
    fn test_headers_without_rows() {
        let page = "<table><tr><th>Name</th></tr></table>";
        let preview = first_table(page, None, 5).unwrap().unwrap();
        assert!(preview.first_row_map().is_none());
    }

    #[test]
    fn test_first_heading() {
        assert_eq!(first_heading("<h1> Locust  Test Report </h1>").as_deref(), Some("Locust Test Report"));
        assert_eq!(first_heading("<h2>x</h2>"), None);
    }
}
