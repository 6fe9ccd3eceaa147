use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

use crate::extractor::model::normalize_whitespace;

/// Structural elements that never carry article prose.
const BOILERPLATE_TAGS: &[&str] = &[
    "script", "style", "noscript", "nav", "header", "footer", "aside", "form", "template", "svg",
    "iframe",
];

/// Block elements whose text is collected, in document order.
const PROSE_TAGS: &[&str] = &["p", "h1", "h2", "h3", "h4", "li", "blockquote", "pre"];

/// Candidate containers for the main article, most specific first.
const MAIN_CONTENT_SELECTORS: &[&str] = &[
    r#"div[class*="article"]"#,
    r#"div[class*="post"]"#,
    "main",
    "article",
    r#"div[id*="content"]"#,
    r#"div[class*="content"]"#,
];

/// A candidate container must hold more visible text than this to win over `<body>`.
const MAIN_BLOCK_MIN_CHARS: usize = 500;

static MAIN_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    MAIN_CONTENT_SELECTORS
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .collect()
});

static BODY_SELECTOR: LazyLock<Option<Selector>> =
    LazyLock::new(|| Selector::parse("body").ok());

/// Pull the readable text out of an HTML document.
///
/// Boilerplate subtrees are skipped wherever they appear. The result has
/// collapsed whitespace and may be empty.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let root = main_block(&document);

    let blocks = prose_blocks(root);
    if blocks.is_empty() {
        visible_text(root)
    } else {
        blocks.join(" ")
    }
}

fn is_boilerplate(element: ElementRef<'_>) -> bool {
    BOILERPLATE_TAGS.contains(&element.value().name())
}

fn is_prose(element: ElementRef<'_>) -> bool {
    PROSE_TAGS.contains(&element.value().name())
}

fn inside_boilerplate(element: ElementRef<'_>) -> bool {
    is_boilerplate(element)
        || element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(is_boilerplate)
}

fn main_block(document: &Html) -> ElementRef<'_> {
    for selector in MAIN_SELECTORS.iter() {
        for candidate in document.select(selector) {
            if inside_boilerplate(candidate) {
                continue;
            }
            if visible_text(candidate).chars().count() > MAIN_BLOCK_MIN_CHARS {
                return candidate;
            }
        }
    }

    BODY_SELECTOR
        .as_ref()
        .and_then(|selector| document.select(selector).next())
        .unwrap_or_else(|| document.root_element())
}

/// Text of every prose block under `root` that is neither boilerplate nor
/// nested inside another prose block (a `<p>` inside an `<li>` is counted once).
fn prose_blocks(root: ElementRef<'_>) -> Vec<String> {
    let root_id = root.id();

    root.descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| is_prose(*element))
        .filter(|element| !inside_boilerplate(*element))
        .filter(|element| {
            !element
                .ancestors()
                .take_while(|node| node.id() != root_id)
                .filter_map(ElementRef::wrap)
                .any(is_prose)
        })
        .map(visible_text)
        .filter(|text| !text.is_empty())
        .collect()
}

fn visible_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();

    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(is_boilerplate);
        if !hidden {
            out.push_str(text);
            out.push(' ');
        }
    }

    normalize_whitespace(&out)
}
