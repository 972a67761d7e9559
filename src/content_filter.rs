/// Chirp body validation
///
/// Two rules: a hard length cap on the raw body, then whole-word redaction of
/// a small denylist. Matching is exact and case-insensitive on
/// single-space-separated tokens, so `kerfuffle!` or `kerfuffle,` pass
/// through untouched. That is a known limitation of the filter.

use crate::error::ValidationError;

pub const MAX_CHIRP_LENGTH: usize = 140;
pub const REDACTION: &str = "****";

const PROFANE_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

/// Validate and clean a chirp body
///
/// # Errors
/// Returns [`ValidationError::TooLong`] if the body has more than
/// [`MAX_CHIRP_LENGTH`] characters (counted before filtering)
pub fn validate_chirp(body: &str) -> Result<String, ValidationError> {
    if body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(ValidationError::TooLong("chirp", MAX_CHIRP_LENGTH));
    }

    Ok(redact_profanity(body))
}

fn redact_profanity(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            if PROFANE_WORDS.contains(&word.to_lowercase().as_str()) {
                REDACTION
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
