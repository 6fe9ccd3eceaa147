use std::fs;

use crate::extractor::{ExtractError, extract};

const MIN_CHARS: usize = 100;

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("src/extractor/tests/fixtures/{name}"))
        .expect("Failed to read test fixture")
}

#[test]
fn test_extract_article() {
    let content = extract(&fixture("article.html"), MIN_CHARS).unwrap();

    assert!(content.text.starts_with("From LLMs to SLMs in Agentic AI"));
    assert!(content.text.contains("Small language models trained"));
    assert!(content.text.contains("This second paragraph"));
    assert!(!content.text.contains("Subscribe"));
    assert!(!content.text.contains("dataLayer"));
    assert!(!content.text.contains("All rights reserved"));
    assert!(!content.text.contains('\n'));
    assert_eq!(content.character_count, content.text.chars().count());
    assert_eq!(content.language, Some("English".to_string()));
}

#[test]
fn test_extract_blog_post() {
    let content = extract(&fixture("blog.html"), MIN_CHARS).unwrap();

    assert!(content.text.starts_with("How to Build Better Software"));
    assert!(content.text.contains("Key Principles"));
    assert!(content.text.contains("so the fix stays fixed."));
    // sidebar, newsletter form and comments sit outside the post body
    assert!(!content.text.contains("Popular posts"));
    assert!(!content.text.contains("newsletter"));
    assert!(!content.text.contains("First comment"));
    assert_eq!(content.text.matches("so the fix stays fixed").count(), 1);
}

#[test]
fn test_reject_boilerplate_only_page() {
    let result = extract(&fixture("boilerplate_only.html"), MIN_CHARS);
    assert!(matches!(
        result,
        Err(ExtractError::InsufficientContent { .. })
    ));
}

#[test]
fn test_reject_empty_document() {
    assert_eq!(
        extract("", MIN_CHARS),
        Err(ExtractError::InsufficientContent { chars: 0, words: 0 })
    );
}

#[test]
fn test_minimal_valid_content() {
    let html = format!(
        r#"<!DOCTYPE html><html><head><title>Valid Article</title></head><body><article><h1>Valid Article</h1><p>{}</p></article></body></html>"#,
        "This is a valid article with enough content to pass the minimum requirements for extraction. ".repeat(3)
    );

    let content = extract(&html, MIN_CHARS).unwrap();
    assert!(content.text.starts_with("Valid Article This is a valid article"));
}

#[test]
fn test_threshold_is_configurable() {
    let html = "<body><p>A short note with exactly enough words to count as ten words total.</p></body>";

    assert!(extract(html, MIN_CHARS).is_err());
    assert!(extract(html, 20).is_ok());
}
