//! Pulls the `ytInitialData` object out of a results page's HTML.
//!
//! The page assigns the data in an inline script. The object literal is cut out
//! by brace matching and parsed as is. If that fails, the older recovery is
//! tried: take everything up to the next `<`, drop every `;` and every `\u`,
//! and parse what is left. That mangles strings containing those sequences but
//! has kept working across several page revisions.
use crate::error::ParseError;
use serde_json::Value;

const MARKERS: [&str; 2] = ["var ytInitialData = ", "window[\"ytInitialData\"] = "];

/// Locate and parse the initial data assignment in `html`.
pub fn locate_initial_data(html: &str) -> Result<Value, ParseError> {
    let start = MARKERS
        .iter()
        .find_map(|marker| html.find(marker).map(|at| at + marker.len()))
        .ok_or(ParseError::MissingInitialData)?;
    let tail = &html[start..];

    match serde_json::from_str::<Value>(balanced_object(tail).unwrap_or_default()) {
        Ok(value) => Ok(value),
        Err(strict_err) => {
            tracing::debug!(
                target: "youtube.initial_data",
                error = %strict_err,
                "strict parse failed, retrying with sanitised literal"
            );
            serde_json::from_str(&sanitise(tail)).map_err(|_| ParseError::InvalidInitialData(strict_err))
        }
    }
}

/// The `{...}` literal at the start of `text`, braces inside strings ignored.
fn balanced_object(text: &str) -> Option<&str> {
    if !text.starts_with('{') {
        return None;
    }
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (at, byte) in text.bytes().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[..=at]);
                }
            }
            _ => {}
        }
    }
    None
}

fn sanitise(tail: &str) -> String {
    let script = tail.split('<').next().unwrap_or_default();
    script.replace(';', "").replace("\\u", "")
}
