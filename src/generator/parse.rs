//! Turning free-form completion text into a list of titles.
//!
//! This is best-effort parsing of model output:
//!
//! 1. If any line looks like a list item (`1.`, `2)`, `(3)`, `-`, `*`, `•`,
//!    optionally behind markdown heading hashes or bold markers such as
//!    `**1. Foo**`), only those lines are kept, with the marker stripped.
//!    Chatter before or after the list is dropped, and so are indented
//!    bullets nested under a numbered list.
//! 2. Otherwise the text is split on blank lines and each paragraph becomes
//!    one title. A single multi-line paragraph is split per line instead.
//!
//! Titles lose surrounding markdown emphasis and quotes, entries without any
//! letters or digits are discarded, and the list is capped at `limit`. The
//! model's order is kept.

use regex::Regex;
use std::sync::LazyLock;

static LIST_ITEM_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<indent>\s*)(?:#{1,6}\s*)?(?P<emph>\*\*|__)?(?:(?P<num>\(?\d{1,2}[.)])(?:\*\*|__)?(?P<gap>\s*)|[-*•]\s+)(?P<text>\S.*)$",
    )
    .unwrap()
});

static BLANK_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

const WRAPPERS: &[(&str, &str)] = &[
    ("**", "**"),
    ("__", "__"),
    ("\"", "\""),
    ("\u{201c}", "\u{201d}"),
    ("*", "*"),
    ("_", "_"),
];

#[derive(Debug, Clone, Copy)]
struct ListItem<'a> {
    text: &'a str,
    numbered: bool,
    indented: bool,
}

/// Recognize a list-shaped line and return its text without the marker.
fn list_item(line: &str) -> Option<ListItem<'_>> {
    let caps = LIST_ITEM_REGEX.captures(line)?;
    let mut text = caps.name("text")?.as_str().trim_end();
    let numbered = caps.name("num").is_some();

    // "3.14 reasons" is a title that starts with a number, not item 3
    let gap = caps.name("gap").map_or("", |m| m.as_str());
    if numbered && gap.is_empty() && text.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }

    // "**1. Foo**": the opening emphasis sat before the marker
    if let Some(emph) = caps.name("emph") {
        text = text.strip_suffix(emph.as_str()).unwrap_or(text);
    }

    Some(ListItem {
        text,
        numbered,
        indented: caps.name("indent").is_some_and(|m| !m.as_str().is_empty()),
    })
}

pub fn parse_titles(raw: &str, limit: usize) -> Vec<String> {
    let raw = raw.replace("\r\n", "\n");

    let list_items: Vec<ListItem<'_>> = raw.lines().filter_map(list_item).collect();
    let has_numbers = list_items.iter().any(|item| item.numbered);

    let candidates = if list_items.is_empty() {
        split_paragraphs(&raw)
    } else {
        list_items
            .into_iter()
            .filter(|item| item.numbered || !(has_numbers && item.indented))
            .map(|item| item.text)
            .collect()
    };

    candidates
        .into_iter()
        .map(clean_title)
        .filter(|title| title.chars().any(char::is_alphanumeric))
        .take(limit)
        .collect()
}

fn split_paragraphs(raw: &str) -> Vec<&str> {
    let paragraphs: Vec<&str> = BLANK_LINE_REGEX
        .split(raw.trim())
        .filter(|p| !p.trim().is_empty())
        .collect();

    if paragraphs.len() == 1 {
        let single: &str = paragraphs[0];
        if single.trim().contains('\n') {
            return single.lines().collect();
        }
    }

    paragraphs
}

fn clean_title(raw: &str) -> String {
    let mut title = raw.trim();

    loop {
        let before = title;
        for (open, close) in WRAPPERS {
            if title.len() > open.len() + close.len()
                && let Some(inner) = title
                    .strip_prefix(open)
                    .and_then(|t| t.strip_suffix(close))
            {
                title = inner.trim();
            }
        }
        if title == before {
            break;
        }
    }

    title.split_whitespace().collect::<Vec<_>>().join(" ")
}
