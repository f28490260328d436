//! Line classification for one-tag-per-line documents.
//!
//! The format looks like XML but is not: there is no prolog, no escaping,
//! no multi-tag lines. Every line is exactly one open tag, one close tag,
//! or something else entirely (comment, blank, junk). Classification is
//! strictly line-local.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::AttrList;

/// An open tag, optionally self-closing: `<db id="X">` or `<allow ... />`.
/// Attribute text may contain anything except `<` and `>`, so a line with
/// a second tag on it never matches.
static OPEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\s*)<\s*([A-Za-z_][A-Za-z0-9_]*)([^<>]*?)\s*(/?)\s*>(\s*)$")
        .expect("open tag pattern must compile")
});

/// A close tag: `</db>`, with arbitrary whitespace tolerated.
static CLOSE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\s*)</\s*([A-Za-z_][A-Za-z0-9_]*)\s*>\s*$")
        .expect("close tag pattern must compile")
});

/// The three shapes a document line can take.
///
/// `Other` carries the raw line and is always forwarded unchanged; comments,
/// blank lines and anything unparseable flow through the engine untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineToken {
    Open(TagLine),
    Close(CloseTag),
    Other(String),
}

impl LineToken {
    /// Classifies a single line. Never fails: a line that is neither an
    /// open nor a close tag is `Other`.
    pub fn scan(line: &str) -> LineToken {
        if let Some(caps) = CLOSE_PATTERN.captures(line) {
            return LineToken::Close(CloseTag {
                raw: line.to_string(),
                leading: caps[1].to_string(),
                name: caps[2].to_string(),
            });
        }
        if let Some(caps) = OPEN_PATTERN.captures(line) {
            return LineToken::Open(TagLine {
                raw: line.to_string(),
                leading: caps[1].to_string(),
                name: caps[2].to_string(),
                attrs: AttrList::parse(&caps[3]),
                self_closing: !caps[4].is_empty(),
                trailing: caps[5].to_string(),
            });
        }
        LineToken::Other(line.to_string())
    }
}

/// A parsed open tag line.
///
/// The raw source line is kept alongside the parsed pieces: a tag nobody
/// modifies is written back byte for byte, and only a modified tag is
/// re-rendered from its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLine {
    raw: String,
    leading: String,
    name: String,
    attrs: AttrList,
    self_closing: bool,
    trailing: String,
}

impl TagLine {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attrs(&self) -> &AttrList {
        &self.attrs
    }

    pub fn attrs_mut(&mut self) -> &mut AttrList {
        &mut self.attrs
    }

    pub fn self_closing(&self) -> bool {
        self.self_closing
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn leading(&self) -> &str {
        &self.leading
    }

    /// Re-renders the tag from its parsed parts: original tag name and
    /// surrounding whitespace, attributes in document order with lowercase
    /// names and single separating spaces.
    pub fn render(&self) -> String {
        let close = if self.self_closing { " />" } else { ">" };
        format!(
            "{}<{}{}{}{}",
            self.leading,
            self.name,
            self.attrs.render(),
            close,
            self.trailing
        )
    }
}

/// A parsed close tag line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseTag {
    raw: String,
    leading: String,
    name: String,
}

impl CloseTag {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn leading(&self) -> &str {
        &self.leading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    fn scan_open(line: &str) -> TagLine {
        match LineToken::scan(line) {
            LineToken::Open(tag) => tag,
            other => panic!("expected open tag for {line:?}, got {other:?}"),
        }
    }

    #[parameterized(
        plain_open = { "<roles>" },
        open_with_attrs = { r#"<role name="Admin">"# },
        space_after_angle = { "< roles >" },
        indented = { r#"  <db id="X">"# },
    )]
    fn test_scan_classifies_open_tags(line: &str) {
        assert!(matches!(LineToken::scan(line), LineToken::Open(_)));
    }

    #[parameterized(
        plain_close = { "</roles>" },
        spaced_close = { "</ roles >" },
        indented_close = { "   </db>" },
    )]
    fn test_scan_classifies_close_tags(line: &str) {
        assert!(matches!(LineToken::scan(line), LineToken::Close(_)));
    }

    #[parameterized(
        blank = { "" },
        whitespace = { "   " },
        comment = { "# managed by deploy tooling" },
        two_tags_on_one_line = { "<roles><role>" },
        no_tag_name = { "<>" },
        unclosed_angle = { "<db id=" },
        free_text = { "version 20221001" },
    )]
    fn test_scan_classifies_other_lines(line: &str) {
        assert_eq!(LineToken::scan(line), LineToken::Other(line.to_string()));
    }

    #[parameterized(
        tight = { r#"<allow role="Admin"/>"#, true },
        spaced = { r#"<allow role="Admin" />"#, true },
        not_self_closing = { r#"<allow role="Admin">"#, false },
    )]
    fn test_scan_detects_self_closing(line: &str, expected: bool) {
        assert_eq!(scan_open(line).self_closing(), expected);
    }

    #[test]
    fn test_scan_keeps_raw_line_verbatim() {
        let line = r#"   <DB   ID="S_DB_1"   read_access="true" >  "#;
        let tag = scan_open(line);
        assert_eq!(tag.raw(), line);
        assert_eq!(tag.name(), "DB");
        assert_eq!(tag.attrs().get("id"), Some("S_DB_1"));
    }

    #[test]
    fn test_render_normalizes_attribute_spelling_and_spacing() {
        let mut tag = scan_open(r#"<db ID="S_DB_1"  read_access="true">"#);
        tag.attrs_mut().append("xxx", "yyy");
        assert_eq!(
            tag.render(),
            r#"<db id="S_DB_1" read_access="true" xxx="yyy">"#
        );
    }

    #[test]
    fn test_render_keeps_tag_name_case_and_outer_whitespace() {
        let mut tag = scan_open(r#"  <Role name="Admin">  "#);
        tag.attrs_mut().set("name", "Ops");
        assert_eq!(tag.render(), r#"  <Role name="Ops">  "#);
    }

    #[test]
    fn test_render_self_closing_uses_spaced_slash() {
        let mut tag = scan_open(r#"<allow role="Admin"/>"#);
        tag.attrs_mut().set("role", "Ops");
        assert_eq!(tag.render(), r#"<allow role="Ops" />"#);
    }

    #[test]
    fn test_close_tag_exposes_leading_whitespace() {
        let token = LineToken::scan("    </locations>");
        match token {
            LineToken::Close(close) => {
                assert_eq!(close.name(), "locations");
                assert_eq!(close.leading(), "    ");
                assert_eq!(close.raw(), "    </locations>");
            }
            other => panic!("expected close tag, got {other:?}"),
        }
    }

    #[test]
    fn test_bare_attribute_value_before_self_close() {
        let tag = scan_open("<include path=common.locator/>");
        assert!(tag.self_closing());
        assert_eq!(tag.attrs().get("path"), Some("common.locator"));
    }
}
