//! Chirp body rules: length limit and the profanity filter.

use crate::error::CoreError;

/// Maximum chirp length, counted in UTF-8 bytes.
pub const MAX_CHIRP_LENGTH: usize = 140;

/// Replacement text for a filtered word.
pub const CENSORED_WORD: &str = "****";

/// Words replaced by [`CENSORED_WORD`], matched case-insensitively.
pub const PROFANE_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

/// Reject chirp bodies longer than [`MAX_CHIRP_LENGTH`].
pub fn validate_chirp_body(body: &str) -> Result<(), CoreError> {
    let length = body.len();
    if length > MAX_CHIRP_LENGTH {
        return Err(CoreError::Validation(format!(
            "Chirp is too long ({length} bytes, max {MAX_CHIRP_LENGTH})"
        )));
    }
    Ok(())
}

/// Replace every profane word in `body` with [`CENSORED_WORD`].
///
/// Words are split on single spaces, so punctuation attached to a word
/// (`"kerfuffle!"`) keeps it from matching. Spacing is preserved exactly.
///
/// ```
/// use chirpy_core::chirp::clean_chirp_body;
///
/// assert_eq!(clean_chirp_body("what a Kerfuffle today"), "what a **** today");
/// assert_eq!(clean_chirp_body("Sharbert!"), "Sharbert!");
/// ```
pub fn clean_chirp_body(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            let lowered = word.to_lowercase();
            if PROFANE_WORDS.contains(&lowered.as_str()) {
                CENSORED_WORD
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
