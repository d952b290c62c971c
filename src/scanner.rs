//! Document token scanning
//!
//! Pure functions over document text: locate comment spans with a
//! line-oriented heuristic, then match strict `[MermaidChart: <uuid>]`
//! tokens inside them. Safe to call on every keystroke; linear in document
//! size with a single pass per comment span. Never fails: malformed input
//! degrades to "no match".

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::types::DiagramReference;

/// Comment-opener heuristic applied per physical line.
///
/// Covers `//`, `#`, `/* */` and `<!-- -->` openers. This is deliberately not
/// a per-language lexer: an opener inside a string literal still starts a
/// span, and the span always runs to the end of the line.
static COMMENT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?://|#|/\*|<!--).*$").expect("comment pattern is valid"));

/// Strict token syntax: a canonical 36-character UUID in brackets.
static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\[MermaidChart: ([0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12})\]",
    )
    .expect("token pattern is valid")
});

/// Scan a document for embedded diagram references.
///
/// Returns matches in document order, strictly increasing in
/// `(line, start_col)`. Duplicate UUIDs on different lines are independent
/// references, not deduplicated. Columns are character offsets.
pub fn scan(text: &str) -> Vec<DiagramReference> {
    let mut references = Vec::new();

    for (line_idx, line) in text.lines().enumerate() {
        let Some(comment) = COMMENT_PATTERN.find(line) else {
            continue;
        };
        let comment_start = char_len(&line[..comment.start()]);
        let span = comment.as_str();

        for captures in TOKEN_PATTERN.captures_iter(span) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            // The pattern guarantees UUID shape; a parse failure is a
            // heuristic miss, silently skipped.
            let Ok(id) = Uuid::parse_str(&captures[1]) else {
                continue;
            };

            let start_col = comment_start + char_len(&span[..whole.start()]);
            let end_col = start_col + char_len(whole.as_str());
            references.push(DiagramReference {
                id,
                line: line_idx as u32,
                start_col,
                end_col,
                title: format!("Chart - {}", id),
            });
        }
    }

    references
}

/// The comment line inserted into a document to reference a diagram,
/// using the comment syntax of the document's declared language.
pub fn comment_line_for(language_id: &str, id: &Uuid) -> String {
    match language_id {
        "markdown" | "html" => format!("<!-- [MermaidChart: {}] -->", id),
        "yaml" | "python" => format!("# [MermaidChart: {}]", id),
        _ => format!("// [MermaidChart: {}]", id),
    }
}

fn char_len(s: &str) -> u32 {
    s.chars().count() as u32
}
