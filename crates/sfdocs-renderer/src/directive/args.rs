//! Directive argument parsing.
//!
//! Parses the `[label]{#id .class key="value"}` syntax from directives.

use std::collections::BTreeMap;

/// Parsed arguments from directive syntax.
///
/// Represents the label and attributes extracted from a directive:
/// `::name[label]{#id .class key="value"}`
///
/// # Example
///
/// ```
/// use sfdocs_renderer::directive::DirectiveArgs;
///
/// let args = DirectiveArgs::parse("Demo", r#"#intro .wide src="a.mp4""#);
/// assert_eq!(args.label, "Demo");
/// assert_eq!(args.id.as_deref(), Some("intro"));
/// assert_eq!(args.classes, vec!["wide"]);
/// assert_eq!(args.get("src"), Some("a.mp4"));
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirectiveArgs {
    /// Label from brackets: `[label]` (empty string if not provided).
    pub label: String,
    /// ID from attributes: `{#id}`.
    pub id: Option<String>,
    /// Classes from attributes: `{.class1 .class2}`.
    pub classes: Vec<String>,
    /// Key-value attributes: `{key="value"}`.
    pub attrs: BTreeMap<String, String>,
}

impl DirectiveArgs {
    /// Parse label and attributes string into structured arguments.
    ///
    /// # Arguments
    ///
    /// * `label` - The label from brackets `[label]`
    /// * `attrs_str` - The attributes string from braces `{...}` (without braces)
    #[must_use]
    pub fn parse(label: &str, attrs_str: &str) -> Self {
        let mut args = Self {
            label: label.to_owned(),
            ..Default::default()
        };

        let mut remaining = attrs_str.trim();

        while !remaining.is_empty() {
            if let Some(rest) = remaining.strip_prefix('#') {
                let end = shorthand_end(rest);
                args.id = Some(rest[..end].to_owned());
                remaining = &rest[end..];
            } else if let Some(rest) = remaining.strip_prefix('.') {
                let end = shorthand_end(rest);
                args.classes.push(rest[..end].to_owned());
                remaining = &rest[end..];
            } else if let Some((key, value, rest)) = parse_attribute(remaining) {
                if let Some(value) = value {
                    args.attrs.insert(key.to_owned(), value.to_owned());
                }
                remaining = rest;
            } else {
                // Skip one unrecognized character
                let skip = remaining.chars().next().map_or(1, char::len_utf8);
                remaining = &remaining[skip..];
            }
            remaining = remaining.trim_start();
        }

        args
    }

    /// Get an attribute value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// Flatten into a single attribute map.
    ///
    /// `#id` becomes `id` and classes are joined with spaces into `class`.
    /// Explicit `id=` or `class=` attributes are overridden by the shorthands.
    #[must_use]
    pub fn into_attributes(self) -> BTreeMap<String, String> {
        let mut attrs = self.attrs;
        if let Some(id) = self.id {
            attrs.insert("id".to_owned(), id);
        }
        if !self.classes.is_empty() {
            attrs.insert("class".to_owned(), self.classes.join(" "));
        }
        attrs
    }
}

/// Length of an `#id` or `.class` shorthand body.
fn shorthand_end(s: &str) -> usize {
    s.find(|c: char| c.is_whitespace() || c == '.' || c == '#')
        .unwrap_or(s.len())
}

/// Parse one attribute from the start of the attributes string.
///
/// Supports: `key="value"`, `key='value'`, `key=value` and a bare `key`,
/// which gets an empty value. An unterminated quote swallows the rest of the
/// string and yields no value.
fn parse_attribute(s: &str) -> Option<(&str, Option<&str>, &str)> {
    if !s.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_' || c == ':') {
        return None;
    }
    let key_end = s
        .find(|c: char| c.is_whitespace() || c == '=')
        .unwrap_or(s.len());
    let key = &s[..key_end];

    let Some(after_eq) = s[key_end..].trim_start().strip_prefix('=') else {
        return Some((key, Some(""), &s[key_end..]));
    };
    let after_eq = after_eq.trim_start();

    for quote in ['"', '\''] {
        if let Some(stripped) = after_eq.strip_prefix(quote) {
            return Some(match stripped.find(quote) {
                Some(end_quote) => (key, Some(&stripped[..end_quote]), &stripped[end_quote + 1..]),
                None => (key, None, ""),
            });
        }
    }

    let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
    Some((key, Some(&after_eq[..end]), &after_eq[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_args() {
        let args = DirectiveArgs::parse("", "");
        assert_eq!(args, DirectiveArgs::default());
    }

    #[test]
    fn test_label_only() {
        let args = DirectiveArgs::parse("hello world", "");
        assert_eq!(args.label, "hello world");
        assert!(args.attrs.is_empty());
    }

    #[test]
    fn test_video_attributes() {
        let args = DirectiveArgs::parse(
            "",
            r#"src="https://youtube.com/embed/abc123" title="Demo Video" type="youtube""#,
        );
        assert_eq!(args.get("src"), Some("https://youtube.com/embed/abc123"));
        assert_eq!(args.get("title"), Some("Demo Video"));
        assert_eq!(args.get("type"), Some("youtube"));
    }

    #[test]
    fn test_single_quoted_value() {
        let args = DirectiveArgs::parse("", "title='Hello World'");
        assert_eq!(args.get("title"), Some("Hello World"));
    }

    #[test]
    fn test_unquoted_value() {
        let args = DirectiveArgs::parse("", "width=560 type=local");
        assert_eq!(args.get("width"), Some("560"));
        assert_eq!(args.get("type"), Some("local"));
    }

    #[test]
    fn test_empty_quoted_value() {
        let args = DirectiveArgs::parse("", r#"alt="""#);
        assert_eq!(args.get("alt"), Some(""));
    }

    #[test]
    fn test_id_and_compact_classes() {
        let args = DirectiveArgs::parse("", "#id.foo.bar");
        assert_eq!(args.id.as_deref(), Some("id"));
        assert_eq!(args.classes, vec!["foo", "bar"]);
    }

    #[test]
    fn test_unterminated_quote_is_skipped() {
        let args = DirectiveArgs::parse("", r#"width=5 title="oops"#);
        assert_eq!(args.get("title"), None);
        assert_eq!(args.get("oops"), None);
        assert_eq!(args.get("width"), Some("5"));
    }

    #[test]
    fn test_bare_key_has_empty_value() {
        let args = DirectiveArgs::parse("", "src=a type=local autoplay");
        assert_eq!(args.get("src"), Some("a"));
        assert_eq!(args.get("type"), Some("local"));
        assert_eq!(args.get("autoplay"), Some(""));

        let args = DirectiveArgs::parse("", "muted loop src='b.mp4'");
        assert_eq!(args.get("muted"), Some(""));
        assert_eq!(args.get("loop"), Some(""));
        assert_eq!(args.get("src"), Some("b.mp4"));
        assert_eq!(args.attrs.len(), 3);
    }

    #[test]
    fn test_into_attributes_merges_shorthands() {
        let args = DirectiveArgs::parse("", r#"#main .a .b lang="en""#);
        let attrs = args.into_attributes();
        assert_eq!(attrs.get("id").map(String::as_str), Some("main"));
        assert_eq!(attrs.get("class").map(String::as_str), Some("a b"));
        assert_eq!(attrs.get("lang").map(String::as_str), Some("en"));
    }
}
