//! Row classifier for extracted page text
//!
//! Each rule is an independent heuristic checked in order; the first one
//! that matches drops the line. These are tuned to the current roster
//! export and are expected to need adjusting if its layout changes.

use super::ExtractionOptions;

/// A named heuristic that says whether a trimmed line should be dropped
pub struct LineRule {
    pub name: &'static str,
    pub drops: fn(&str, &ExtractionOptions) -> bool,
}

/// Evaluated top to bottom
pub const RULES: &[LineRule] = &[
    LineRule { name: "blank", drops: is_blank },
    LineRule { name: "column_header", drops: is_column_header },
    LineRule { name: "major_header", drops: is_major_header },
    LineRule { name: "title_banner", drops: is_title_banner },
];

fn is_blank(line: &str, _: &ExtractionOptions) -> bool {
    line.is_empty()
}

fn is_column_header(line: &str, _: &ExtractionOptions) -> bool {
    line.contains("Name") && line.contains("SIS") && line.contains("ID")
}

fn is_major_header(line: &str, opts: &ExtractionOptions) -> bool {
    line.contains("Major") && line.chars().count() < opts.major_header_max_len
}

fn is_title_banner(line: &str, opts: &ExtractionOptions) -> bool {
    !opts.title_banner.is_empty() && line.starts_with(opts.title_banner.as_str())
}

/// Every character treated as ending a row. Extracted text sometimes
/// separates rows with a bare `\r` or a form feed
const LINE_BREAKS: &[char] = &[
    '\n', '\r', '\x0b', '\x0c', '\x1c', '\x1d', '\x1e', '\u{85}', '\u{2028}', '\u{2029}',
];

/// First rule that drops `line`, if any
pub fn classify(line: &str, opts: &ExtractionOptions) -> Option<&'static str> {
    RULES.iter().find(|rule| (rule.drops)(line, opts)).map(|rule| rule.name)
}

/// Trimmed lines of one page that may hold a roster row, in page order
pub fn surviving_lines<'a>(page_text: &'a str, opts: &ExtractionOptions) -> Vec<&'a str> {
    page_text
        .split(LINE_BREAKS)
        .map(str::trim)
        .filter(|line| match classify(line, opts) {
            Some(rule) => {
                if !line.is_empty() {
                    tracing::trace!(rule, line, "dropping roster line");
                }
                false
            }
            None => true,
        })
        .collect()
}
