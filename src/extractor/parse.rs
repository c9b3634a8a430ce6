//! Parsing of the extraction service's free-text replies.
//!
//! The model is asked for strict JSON but nothing enforces that upstream, so
//! everything here is total: fence markers are stripped, parse failures
//! become [`ExtractionOutcome::Malformed`], and link replies that are not
//! plain http(s) URLs are discarded.

use url::Url;

use crate::extractor::model::{ExtractionOutcome, JobDetails, NO_LINK_FOUND};

/// Strip enclosing markdown code-fence markers, if any. Tolerates an
/// unterminated fence.
pub fn strip_code_fences(response: &str) -> &str {
    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

/// Parse a job-details reply. Anything that does not decode as the expected
/// JSON object is `Malformed`.
pub fn parse_details(raw: &str) -> ExtractionOutcome {
    match serde_json::from_str::<JobDetails>(strip_code_fences(raw)) {
        Ok(details) => ExtractionOutcome::Parsed(details.normalized()),
        Err(_) => ExtractionOutcome::Malformed,
    }
}

/// Reduce a link reply to a validated http(s) URL, or `None`.
///
/// The model is told to answer with the bare URL, but replies like
/// `Link: <url>` or the no-link sentinel show up in practice.
pub fn normalize_link(raw: &str) -> Option<String> {
    let reply = strip_code_fences(raw);
    if reply.is_empty() || reply.eq_ignore_ascii_case(NO_LINK_FOUND) {
        return None;
    }

    let candidate = reply
        .trim_start_matches("Link:")
        .trim()
        .split_whitespace()
        .next()?;

    match Url::parse(candidate) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Some(candidate.to_string()),
        _ => None,
    }
}
