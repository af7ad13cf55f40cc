//! Heuristics over free-form model output.
//!
//! The model usually answers with some preamble, a "Dear Hiring …," salutation,
//! the body, and a closing. These functions pull out the salutation-to-closing
//! span and the position name. Nothing here is a parser: when the expected
//! shape is missing the caller falls back to the text as returned.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Output name used when the job description does not name a position.
pub const DEFAULT_POSITION: &str = "default";

static SALUTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Dear Hiring[^,]*,").expect("salutation pattern is valid"));

static LETTER_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)(Dear Hiring.*?)(?:Sincerely|Best regards),")
        .expect("letter body pattern is valid")
});

static POSITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+\s\w+)\sposition").expect("position pattern is valid"));

/// The salutation/closing structure was not found in the completion text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no \"Dear Hiring ...,\" salutation followed by \"Sincerely,\" or \"Best regards,\"")]
pub struct FormatMismatch;

/// Inserts a line break after the first "Dear Hiring …," salutation.
pub fn break_after_salutation(text: &str) -> String {
    SALUTATION.replacen(text, 1, "$0\n").into_owned()
}

/// Drops everything before the salutation and appends the signer's name.
///
/// Result: salutation-through-body, newline, the rest of the text from the
/// closing phrase on, newline, `signer`.
pub fn reshape_body(text: &str, signer: &str) -> Result<String, FormatMismatch> {
    let body = LETTER_BODY
        .captures(text)
        .and_then(|caps| caps.get(1))
        .ok_or(FormatMismatch)?;

    Ok(format!("{}\n{}\n{}", body.as_str(), &text[body.end()..], signer))
}

/// Position name from "<word> <word> position", or `DEFAULT_POSITION`.
pub fn position_name(job_description: &str) -> String {
    POSITION
        .captures(job_description)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_else(|| DEFAULT_POSITION.to_string())
}
