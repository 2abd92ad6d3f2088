//! HTML to compact plain text for prompt embedding.

use scraper::{ElementRef, Html};

/// Job text handed to the prompt is capped at this many characters.
pub const MAX_JOB_TEXT_CHARS: usize = 8000;

/// Elements whose content is never visible text.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript"];

/// Elements that do not start a new line when flattened.
const INLINE_ELEMENTS: &[&str] = &[
    "a", "abbr", "b", "bdi", "bdo", "cite", "code", "data", "dfn", "em", "font", "i", "kbd",
    "label", "mark", "q", "s", "samp", "small", "span", "strong", "sub", "sup", "time", "u",
    "var", "wbr",
];

/// Strips markup from an HTML document and normalizes the visible text:
/// runs of two or more spaces/tabs collapse to one space, every line is trimmed,
/// blank lines are dropped and the result is cut to `MAX_JOB_TEXT_CHARS`.
pub fn sanitize_html(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut raw = String::with_capacity(html.len() / 2);
    collect_visible_text(document.root_element(), &mut raw);

    let collapsed = collapse_horizontal_whitespace(&raw);
    let joined = collapsed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    truncate_chars(&joined, MAX_JOB_TEXT_CHARS)
}

fn collect_visible_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_element) = ElementRef::wrap(child) {
            let name = child_element.value().name();
            if SKIPPED_ELEMENTS.contains(&name) {
                continue;
            }
            if name == "br" {
                out.push('\n');
                continue;
            }
            let is_block = !INLINE_ELEMENTS.contains(&name);
            if is_block {
                out.push('\n');
            }
            collect_visible_text(child_element, out);
            if is_block {
                out.push('\n');
            }
        }
    }
}

/// Replaces every run of 2+ spaces/tabs with a single space. Single tabs are kept.
fn collapse_horizontal_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = String::new();

    for c in text.chars() {
        if c == ' ' || c == '\t' {
            run.push(c);
            continue;
        }
        flush_run(&mut run, &mut out);
        out.push(c);
    }
    flush_run(&mut run, &mut out);
    out
}

fn flush_run(run: &mut String, out: &mut String) {
    if run.chars().count() >= 2 {
        out.push(' ');
    } else {
        out.push_str(run);
    }
    run.clear();
}

/// Returns at most `max` characters (not bytes) of `text`.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
