//! Hyperlink construction, injected by whoever presents describer output.

/// Builds link targets for the things a rich output can refer to.
pub trait UrlBuilder {
    fn column_link(&self, column: &str) -> String;
    fn relationship_link(&self, column_1: &str, column_2: &str) -> String;
    fn value_link(&self, column: &str, value: &str) -> String;
    fn row_link(&self, index: usize) -> String;
}

/// Path-style links under a fixed prefix:
/// `<prefix>/column/<name>`, `<prefix>/column/<a>/relates-to/<b>`,
/// `<prefix>/column/<name>/values/<value>`, `<prefix>/row/<index>`.
#[derive(Debug, Clone, Default)]
pub struct PrefixUrlBuilder {
    prefix: String,
}

impl PrefixUrlBuilder {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix: String = prefix.into();
        Self {
            prefix: prefix.trim_end_matches('/').to_owned(),
        }
    }
}

impl UrlBuilder for PrefixUrlBuilder {
    fn column_link(&self, column: &str) -> String {
        format!("{}/column/{}", self.prefix, escape_segment(column))
    }

    fn relationship_link(&self, column_1: &str, column_2: &str) -> String {
        format!(
            "{}/column/{}/relates-to/{}",
            self.prefix,
            escape_segment(column_1),
            escape_segment(column_2)
        )
    }

    fn value_link(&self, column: &str, value: &str) -> String {
        format!(
            "{}/column/{}/values/{}",
            self.prefix,
            escape_segment(column),
            escape_segment(value)
        )
    }

    fn row_link(&self, index: usize) -> String {
        format!("{}/row/{index}", self.prefix)
    }
}

/// Percent-encode the few characters that break a path segment or a Markdown link.
fn escape_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for c in segment.chars() {
        match c {
            ' ' => out.push_str("%20"),
            '/' => out.push_str("%2F"),
            '(' => out.push_str("%28"),
            ')' => out.push_str("%29"),
            '%' => out.push_str("%25"),
            '?' => out.push_str("%3F"),
            '#' => out.push_str("%23"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_links() {
        let urls = PrefixUrlBuilder::new("/dfx/");
        assert_eq!(urls.column_link("city"), "/dfx/column/city");
        assert_eq!(
            urls.relationship_link("region", "state"),
            "/dfx/column/region/relates-to/state"
        );
        assert_eq!(urls.value_link("region", "west"), "/dfx/column/region/values/west");
        assert_eq!(urls.row_link(7), "/dfx/row/7");
    }

    #[test]
    fn test_segments_are_escaped() {
        let urls = PrefixUrlBuilder::default();
        assert_eq!(urls.value_link("first name", "a/b"), "/column/first%20name/values/a%2Fb");
    }
}
