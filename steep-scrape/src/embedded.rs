//! JSON objects embedded in report scripts

use crate::error::{ScrapeError, ScrapeResult};
use regex::Regex;
use serde_json::Value;

/// Where a script-assigned object literal starts. The pattern must contain
/// a group named `obj` matching the opening brace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddedMarker {
    pub name: &'static str,
    pub pattern: &'static str,
}

impl EmbeddedMarker {
    /// Locust report data, older single-letter form
    pub const LOCUST_CONST: EmbeddedMarker = EmbeddedMarker {
        name: "const V",
        pattern: r"const\s+V\s*=\s*(?P<obj>\{)",
    };

    /// Locust report data, current form
    pub const LOCUST_TEMPLATE_ARGS: EmbeddedMarker = EmbeddedMarker {
        name: "window.templateArgs",
        pattern: r"window\.templateArgs\s*=\s*(?P<obj>\{)",
    };

    /// JMeter dashboard statistics table
    pub const JMETER_STATISTICS: EmbeddedMarker = EmbeddedMarker {
        name: "statisticsTable",
        pattern: r##"createTable\(\$\("#statisticsTable"\),\s*(?P<obj>\{)"##,
    };

    /// JMeter dashboard pass/fail split
    pub const JMETER_OK_KO: EmbeddedMarker = EmbeddedMarker {
        name: "OkPercent",
        pattern: r#"var\s+data\s*=\s*(?P<obj>\{)\s*"OkPercent""#,
    };
}

/// Decode the first object literal introduced by one of `markers`, trying
/// markers in order.
pub fn embedded_object(source: &str, markers: &[EmbeddedMarker]) -> ScrapeResult<Value> {
    let mut last_error = None;

    for marker in markers {
        let regex = Regex::new(marker.pattern)?;
        for caps in regex.captures_iter(source) {
            let Some(open) = caps.name("obj") else {
                continue;
            };
            let Some(literal) = balanced_object(source, open.start()) else {
                continue;
            };

            match serde_json::from_str::<Value>(literal) {
                Ok(value) => {
                    tracing::debug!(marker = marker.name, bytes = literal.len(), "embedded object found");
                    return Ok(value);
                }
                Err(e) => last_error = Some(ScrapeError::InvalidJson(e)),
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        let names: Vec<&str> = markers.iter().map(|m| m.name).collect();
        ScrapeError::MissingObject(names.join(" / "))
    }))
}

/// Slice from the brace at `start` to its matching close, skipping braces
/// inside string literals.
fn balanced_object(source: &str, start: usize) -> Option<&str> {
    let bytes = source.as_bytes();
    if bytes.get(start) != Some(&b'{') {
        return None;
    }

    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == q {
                quote = None;
            }
            continue;
        }

        match byte {
            b'"' | b'\'' => quote = Some(byte),
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&source[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}
