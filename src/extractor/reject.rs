use crate::extractor::model::ExtractError;

const MIN_WORD_COUNT: usize = 10;

/// Thin pages yield near-empty text that would make the model invent titles.
pub fn check_sufficient(text: &str, min_chars: usize) -> Result<(), ExtractError> {
    let chars = text.chars().count();
    let words = text.split_whitespace().count();

    if chars < min_chars || words < MIN_WORD_COUNT {
        return Err(ExtractError::InsufficientContent { chars, words });
    }

    Ok(())
}
