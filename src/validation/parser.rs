use thiserror::Error;

use super::schema::GeneratedMetadata;

/// Generator output that cannot be turned into metadata
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Response contains no JSON object")]
    NoJsonObject,

    #[error("Response JSON could not be decoded: {0}")]
    InvalidJson(String),
}

/// Decode the first JSON object embedded in a generator response
pub fn parse_response(text: &str) -> Result<GeneratedMetadata, ParseError> {
    let span = extract_json_object(text).ok_or(ParseError::NoJsonObject)?;
    serde_json::from_str(span).map_err(|e| ParseError::InvalidJson(e.to_string()))
}

/// Find the first balanced `{...}` span.
///
/// Braces inside string literals are ignored. When an opening brace never
/// closes, scanning resumes at the next one.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let mut search_from = 0;
    while let Some(offset) = text[search_from..].find('{') {
        let start = search_from + offset;
        if let Some(end) = matching_brace(&text[start..]) {
            return Some(&text[start..start + end + 1]);
        }
        search_from = start + 1;
    }
    None
}

/// Byte index of the brace closing the one at index 0
fn matching_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
