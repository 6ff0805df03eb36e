//! Canvas paginates list endpoints with RFC 5988 `Link` headers:
//!
//! `<https://x/api/v1/courses?page=2&per_page=100>; rel="next", <...>; rel="last"`

/// URL of the `rel="next"` entry, if the header has one
pub fn parse_next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let url = target.strip_prefix('<')?.strip_suffix('>')?;

        let is_next = parts.any(|param| {
            let Some((key, value)) = param.split_once('=') else { return false };
            key.trim().eq_ignore_ascii_case("rel")
                && value
                    .trim()
                    .trim_matches('"')
                    .split_whitespace()
                    .any(|rel| rel.eq_ignore_ascii_case("next"))
        });

        is_next.then(|| url.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_link_header() {
        let header = r#"<https://canvas.test/api/v1/courses?page=1&per_page=100>; rel="current",<https://canvas.test/api/v1/courses?page=2&per_page=100>; rel="next",<https://canvas.test/api/v1/courses?page=1&per_page=100>; rel="first",<https://canvas.test/api/v1/courses?page=5&per_page=100>; rel="last""#;
        assert_eq!(
            parse_next_link(header).as_deref(),
            Some("https://canvas.test/api/v1/courses?page=2&per_page=100")
        );
    }

    #[test]
    fn test_last_page_has_no_next() {
        let header = r#"<https://canvas.test/api/v1/courses?page=5>; rel="current", <https://canvas.test/api/v1/courses?page=1>; rel="first""#;
        assert!(parse_next_link(header).is_none());
    }

    #[test]
    fn test_unquoted_and_multi_rel() {
        assert_eq!(parse_next_link("<https://a/2>; rel=next").as_deref(), Some("https://a/2"));
        assert_eq!(
            parse_next_link(r#"<https://a/2>; title="x"; rel="prefetch next""#).as_deref(),
            Some("https://a/2")
        );
    }

    #[test]
    fn test_malformed_entries_ignored() {
        assert!(parse_next_link("").is_none());
        assert!(parse_next_link("https://a/2; rel=\"next\"").is_none());
        assert_eq!(
            parse_next_link(r#"garbage, <https://a/3>; rel="next""#).as_deref(),
            Some("https://a/3")
        );
    }
}
