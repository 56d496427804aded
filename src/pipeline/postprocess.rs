//! Post-processing: deterministic cleanup of service-returned Markdown.
//!
//! OCR output is close to clean but not quite: page text can arrive with
//! Windows line endings, trailing whitespace from layout reconstruction,
//! runs of blank lines where the page had whitespace regions, and the odd
//! invisible Unicode character carried over from the source document. These
//! rules fix structure without touching content, and each is a pure
//! function so the set is easy to extend or re-order.
//!
//! Rule order matters only at the edges: line endings are normalised first
//! so the later line-based rules see `\n` everywhere, and the final-newline
//! rule runs last.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all cleanup rules to an assembled Markdown document.
///
/// Rules (applied in order):
/// 1. Normalise line endings (CRLF / bare CR → LF)
/// 2. Trim trailing whitespace per line
/// 3. Collapse runs of blank lines down to one blank line
/// 4. Strip invisible Unicode (zero-width spaces, BOM, word joiners)
/// 5. Ensure the document ends with exactly one newline
pub fn clean_markdown(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = trim_trailing_whitespace(&s);
    let s = collapse_blank_lines(&s);
    let s = remove_invisible_chars(&s);
    ensure_final_newline(&s)
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 2: Trim trailing whitespace per line ────────────────────────────────

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule 3: Collapse excessive blank lines ───────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n").to_string()
}

// ── Rule 4: Strip invisible Unicode ──────────────────────────────────────────

const INVISIBLE: [char; 5] = ['\u{200B}', '\u{FEFF}', '\u{200C}', '\u{200D}', '\u{2060}'];

fn remove_invisible_chars(input: &str) -> String {
    input.chars().filter(|c| !INVISIBLE.contains(c)).collect()
}

// ── Rule 5: Ensure file ends with single newline ─────────────────────────────

fn ensure_final_newline(input: &str) -> String {
    let trimmed = input.trim_end();
    if trimmed.is_empty() {
        String::from("\n")
    } else {
        format!("{}\n", trimmed)
    }
}
