use whatlang::detect;

const MIN_CONFIDENCE: f64 = 0.25;
const MIN_TEXT_LENGTH: usize = 50;

/// English name of the dominant language ("English", "Spanish", ...), used as
/// a hint in the generation prompt.
pub fn detect_language(text: &str) -> Option<String> {
    // Skip detection for very short text
    if text.trim().chars().count() < MIN_TEXT_LENGTH {
        return None;
    }

    let info = detect(text)?;
    if info.confidence() < MIN_CONFIDENCE {
        return None;
    }

    Some(info.lang().eng_name().to_string())
}
