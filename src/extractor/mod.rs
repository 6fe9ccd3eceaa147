pub mod language;
pub mod model;
pub mod reader;
pub mod reject;

#[cfg(test)]
mod tests;

pub use model::{ExtractError, ExtractedContent};

use tracing::debug;

/// Turn an HTML document into plain article text.
///
/// Fails with [`ExtractError::InsufficientContent`] when what survives
/// boilerplate removal is shorter than `min_chars` characters or a handful of words.
pub fn extract(html: &str, min_chars: usize) -> Result<ExtractedContent, ExtractError> {
    let text = reader::extract_text(html);

    reject::check_sufficient(&text, min_chars)?;

    let language = language::detect_language(&text);
    let content = ExtractedContent::new(text, language);

    debug!(
        chars = content.character_count,
        language = content.language.as_deref().unwrap_or("unknown"),
        "extracted page text"
    );

    Ok(content)
}
