//! Builds the roster mapping from every page of a document

use super::{identifier, line_filter, record, ExtractionOptions, Roster, RosterRecord, UNKNOWN_MAJOR};

/// Why a surviving line produced no record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    TooFewTokens,
    NoIdentifier,
    MissingName,
    MissingMajor,
}

/// Parse a single filtered line into `(identifier, record)`
pub fn parse_line(line: &str, opts: &ExtractionOptions) -> Result<(String, RosterRecord), SkipReason> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 3 {
        return Err(SkipReason::TooFewTokens);
    }

    let id = identifier::locate(&tokens, opts.identifier_prefix).ok_or(SkipReason::NoIdentifier)?;
    if id.index == 0 {
        return Err(SkipReason::MissingName);
    }

    let (name, major) = record::split(&tokens, id.index);
    if name.is_empty() {
        return Err(SkipReason::MissingName);
    }
    if major.is_empty() || major == UNKNOWN_MAJOR {
        return Err(SkipReason::MissingMajor);
    }

    Ok((id.text.to_string(), RosterRecord { name, major }))
}

/// Extract every valid record, pages and lines in document order.
///
/// Bad lines are skipped. A later row with the same identifier replaces
/// the earlier one.
pub fn assemble<S: AsRef<str>>(pages: &[S], opts: &ExtractionOptions) -> Roster {
    let mut roster = Roster::new();
    let mut skipped = 0usize;

    for (page_num, page) in pages.iter().enumerate() {
        for line in line_filter::surviving_lines(page.as_ref(), opts) {
            match parse_line(line, opts) {
                Ok((id, rec)) => {
                    if roster.insert(id.clone(), rec).is_some() {
                        tracing::debug!(page = page_num + 1, %id, "duplicate identifier, keeping later row");
                    }
                }
                Err(reason) => {
                    skipped += 1;
                    tracing::debug!(page = page_num + 1, ?reason, line, "skipping roster line");
                }
            }
        }
    }

    tracing::info!(pages = pages.len(), records = roster.len(), skipped, "roster extracted");
    roster
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> ExtractionOptions {
        ExtractionOptions::default()
    }

    fn rec(name: &str, major: &str) -> RosterRecord {
        RosterRecord { name: name.to_string(), major: major.to_string() }
    }

    #[test]
    fn test_single_row() {
        let roster = assemble(&["John Doe U12345678 Computer Science"], &opts());
        assert_eq!(roster.len(), 1);
        assert_eq!(roster["U12345678"], rec("John Doe", "Computer Science"));
    }

    #[test]
    fn test_fewer_than_three_tokens() {
        assert_eq!(parse_line("Doe U12345678", &opts()), Err(SkipReason::TooFewTokens));
        assert_eq!(parse_line("U12345678", &opts()), Err(SkipReason::TooFewTokens));
        assert!(assemble(&["Doe U12345678\nU1 Math"], &opts()).is_empty());
    }

    #[test]
    fn test_identifier_at_start_rejected() {
        assert_eq!(parse_line("U12345678 John Doe Math", &opts()), Err(SkipReason::MissingName));
        assert!(assemble(&["U12345678 John Doe Math"], &opts()).is_empty());
    }

    #[test]
    fn test_no_identifier() {
        assert_eq!(parse_line("Page 3 of 7", &opts()), Err(SkipReason::NoIdentifier));
    }

    #[test]
    fn test_missing_major_excluded() {
        assert_eq!(parse_line("Jane Q. Public U87654321", &opts()), Err(SkipReason::MissingMajor));
        assert!(assemble(&["Jane Q. Public U87654321"], &opts()).is_empty());
    }

    #[test]
    fn test_literal_sentinel_major_excluded() {
        assert_eq!(
            parse_line("Jane Public U87654321 Unknown Major", &opts()),
            Err(SkipReason::MissingMajor)
        );
    }

    #[test]
    fn test_header_lines_produce_nothing() {
        let page = "USF Photo Roster\nName SIS ID Major\nName\tSIS ID\tMajor\n";
        assert!(assemble(&[page], &opts()).is_empty());
    }

    #[test]
    fn test_duplicate_identifier_last_wins() {
        let pages = [
            "Sam Lee U11111111 Biology\nAna Ruiz U22222222 Physics",
            "Sam Lee U11111111 Chemistry",
        ];
        let roster = assemble(&pages, &opts());
        assert_eq!(roster.len(), 2);
        assert_eq!(roster["U11111111"], rec("Sam Lee", "Chemistry"));
        assert_eq!(roster["U22222222"], rec("Ana Ruiz", "Physics"));
    }

    #[test]
    fn test_duplicate_within_page() {
        let page = "Sam Lee U11111111 Biology\nSamuel Lee U11111111 Marine Biology";
        let roster = assemble(&[page], &opts());
        assert_eq!(roster["U11111111"], rec("Samuel Lee", "Marine Biology"));
    }

    #[test]
    fn test_bad_lines_do_not_stop_extraction() {
        let page = "\
USF Photo Roster - ENC 1101
Name SIS ID Major
U99999999 orphan row
Doe U1
Jane Q. Public U87654321
garbage line with no id
Zyad Abd-Elrahman U11758077 Computer Engineering
";
        let roster = assemble(&[page], &opts());
        assert_eq!(roster.len(), 1);
        assert_eq!(roster["U11758077"], rec("Zyad Abd-Elrahman", "Computer Engineering"));
    }

    #[test]
    fn test_blank_page_contributes_nothing() {
        let pages = ["", "John Doe U12345678 Computer Science", ""];
        let roster = assemble(&pages, &opts());
        assert_eq!(roster.len(), 1);
        assert!(assemble::<&str>(&[], &opts()).is_empty());
    }

    #[test]
    fn test_carriage_return_rows_stay_separate() {
        let roster = assemble(&["Sam Lee U11111111 Biology\rAna Ruiz U22222222 Physics"], &opts());
        assert_eq!(roster.len(), 2);
        assert_eq!(roster["U11111111"], rec("Sam Lee", "Biology"));
        assert_eq!(roster["U22222222"], rec("Ana Ruiz", "Physics"));
    }

    #[test]
    fn test_irregular_spacing() {
        let roster = assemble(&["  Maria   de la   Cruz\tU31415926   Civil  Engineering "], &opts());
        assert_eq!(roster["U31415926"], rec("Maria de la Cruz", "Civil Engineering"));
    }

    #[test]
    fn test_long_row_containing_major_is_kept() {
        let line = "Christopher Alexander Johnson-Williams U27182818 Major Exploratory Studies";
        let roster = assemble(&[line], &opts());
        assert_eq!(
            roster["U27182818"],
            rec("Christopher Alexander Johnson-Williams", "Major Exploratory Studies")
        );
    }

    #[test]
    fn test_custom_prefix() {
        let custom = ExtractionOptions { identifier_prefix: 'S', ..opts() };
        let roster = assemble(&["Kim Park S0042 History\nLee Chen U0043 Art"], &custom);
        assert_eq!(roster.len(), 1);
        assert!(roster.contains_key("S0042"));
    }

    #[test]
    fn test_repeatable() {
        let pages = ["John Doe U12345678 Computer Science\nSam Lee U11111111 Biology"];
        assert_eq!(assemble(&pages, &opts()), assemble(&pages, &opts()));
    }
}
