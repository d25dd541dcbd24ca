//! Video rule: `::video{type=... src=... title=...}` becomes embed markup.

use std::fmt;

use sfdocs_tree::{Action, Node, NodeKind, Position, SelectionSet, Selector};

use super::{RewriteError, RewriteRule};
use crate::serialize::escape_html;

/// How the rule treats a missing or unknown `type` attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum VideoPolicy {
    /// Render an empty fragment.
    #[default]
    Lenient,
    /// Fail the document.
    Strict,
}

/// Where a video is hosted, from the `type` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    /// `type="youtube"`: embedded frame.
    Youtube,
    /// `type="local"`: HTML5 video element.
    Local,
    /// No `type` attribute.
    Unspecified,
    /// Any other `type` value.
    Unknown(String),
}

impl VideoSource {
    fn from_type(value: Option<&str>) -> Self {
        match value {
            Some("youtube") => Self::Youtube,
            Some("local") => Self::Local,
            Some(other) => Self::Unknown(other.to_owned()),
            None => Self::Unspecified,
        }
    }
}

impl fmt::Display for VideoSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Youtube => f.write_str("youtube"),
            Self::Local => f.write_str("local"),
            Self::Unspecified => f.write_str("(none)"),
            Self::Unknown(value) => f.write_str(value),
        }
    }
}

/// Typed view of a video directive's attributes.
///
/// Absent `src` and `title` are empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSpec {
    pub src: String,
    pub title: String,
    pub source: VideoSource,
}

impl VideoSpec {
    /// Read `src`, `title` and `type` from a directive node.
    #[must_use]
    pub fn from_node(node: &Node) -> Self {
        Self {
            src: node.attribute("src").unwrap_or_default().to_owned(),
            title: node.attribute("title").unwrap_or_default().to_owned(),
            source: VideoSource::from_type(node.attribute("type")),
        }
    }

    /// Render the embed fragment, or `None` when the source is not supported.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        let title = escape_html(&self.title);
        let src = escape_html(&self.src);
        let player = match self.source {
            VideoSource::Youtube => format!(r#"<iframe src="{src}"></iframe>"#),
            VideoSource::Local => {
                format!(r#"<video controls><source src="{src}" type="video/mp4"></video>"#)
            }
            VideoSource::Unspecified | VideoSource::Unknown(_) => return None,
        };
        Some(format!(
            r#"<div class="video-plugin-div"><div class="video-plugin-title">{title}</div>{player}</div>"#
        ))
    }
}

/// Replaces `video` leaf directives with a raw HTML embed.
#[derive(Debug, Clone, Copy, Default)]
pub struct VideoRule {
    policy: VideoPolicy,
}

impl VideoRule {
    #[must_use]
    pub fn new(policy: VideoPolicy) -> Self {
        Self { policy }
    }
}

impl RewriteRule for VideoRule {
    fn name(&self) -> &str {
        "video"
    }

    fn selection(&self) -> SelectionSet {
        SelectionSet::new().with(Selector::named(NodeKind::LeafDirective, "video"))
    }

    fn rewrite(&self, node: &Node, _position: Position<'_>) -> Result<Action, RewriteError> {
        if !node.is_directive(NodeKind::LeafDirective, "video") {
            return Ok(Action::Keep);
        }

        let spec = VideoSpec::from_node(node);
        if let Some(fragment) = spec.render() {
            return Ok(Action::Replace(Node::raw(fragment)));
        }

        match (self.policy, spec.source) {
            (VideoPolicy::Strict, VideoSource::Unspecified) => Err(RewriteError::MissingVideoType),
            (VideoPolicy::Strict, VideoSource::Unknown(value)) => {
                Err(RewriteError::UnknownVideoType(value))
            }
            (_, source) => {
                tracing::warn!(%source, src = %spec.src, "Unsupported video type, rendering nothing");
                Ok(Action::Replace(Node::raw("")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn video(attrs: &[(&str, &str)]) -> Node {
        attrs.iter().fold(
            Node::new(NodeKind::LeafDirective).with_name("video"),
            |node, (key, value)| node.with_attribute(*key, *value),
        )
    }

    fn rewrite(rule: VideoRule, node: &Node) -> Result<Action, RewriteError> {
        rule.rewrite(node, Position::root())
    }

    #[test]
    fn test_youtube_fragment() {
        let node = video(&[("src", "https://x/y"), ("title", "Demo"), ("type", "youtube")]);
        assert_eq!(
            rewrite(VideoRule::default(), &node).unwrap(),
            Action::Replace(Node::raw(
                r#"<div class="video-plugin-div"><div class="video-plugin-title">Demo</div><iframe src="https://x/y"></iframe></div>"#
            ))
        );
    }

    #[test]
    fn test_local_fragment() {
        let node = video(&[("src", "/media/intro.mp4"), ("title", "Intro"), ("type", "local")]);
        assert_eq!(
            rewrite(VideoRule::default(), &node).unwrap(),
            Action::Replace(Node::raw(
                r#"<div class="video-plugin-div"><div class="video-plugin-title">Intro</div><video controls><source src="/media/intro.mp4" type="video/mp4"></video></div>"#
            ))
        );
    }

    #[test]
    fn test_missing_src_and_title_are_empty() {
        let node = video(&[("type", "youtube")]);
        assert_eq!(
            rewrite(VideoRule::default(), &node).unwrap(),
            Action::Replace(Node::raw(
                r#"<div class="video-plugin-div"><div class="video-plugin-title"></div><iframe src=""></iframe></div>"#
            ))
        );
    }

    #[test]
    fn test_unknown_type_renders_empty() {
        let node = video(&[("src", "a.webm"), ("type", "vimeo")]);
        assert_eq!(
            rewrite(VideoRule::default(), &node).unwrap(),
            Action::Replace(Node::raw(""))
        );
    }

    #[test]
    fn test_missing_type_renders_empty() {
        let node = video(&[("src", "a.mp4")]);
        assert_eq!(
            rewrite(VideoRule::default(), &node).unwrap(),
            Action::Replace(Node::raw(""))
        );
    }

    #[test]
    fn test_strict_policy_rejects_unknown_type() {
        let rule = VideoRule::new(VideoPolicy::Strict);
        assert_eq!(
            rewrite(rule, &video(&[("type", "vimeo")])).unwrap_err(),
            RewriteError::UnknownVideoType("vimeo".to_owned())
        );
        assert_eq!(
            rewrite(rule, &video(&[])).unwrap_err(),
            RewriteError::MissingVideoType
        );
    }

    #[test]
    fn test_strict_policy_accepts_known_type() {
        let rule = VideoRule::new(VideoPolicy::Strict);
        let action = rewrite(rule, &video(&[("type", "local")])).unwrap();
        assert!(matches!(action, Action::Replace(node) if !node.value.is_empty()));
    }

    #[test]
    fn test_attributes_are_escaped() {
        let node = video(&[
            ("src", r#"a.mp4" onload="x"#),
            ("title", "<b>Tom & Jerry</b>"),
            ("type", "local"),
        ]);
        let Action::Replace(raw) = rewrite(VideoRule::default(), &node).unwrap() else {
            panic!("video should be replaced");
        };
        assert!(raw.value.contains("&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;"));
        assert!(raw.value.contains(r#"src="a.mp4&quot; onload=&quot;x""#));
    }

    #[test]
    fn test_other_leaf_is_kept() {
        let node = Node::new(NodeKind::LeafDirective)
            .with_name("figure")
            .with_attribute("type", "youtube");
        assert_eq!(rewrite(VideoRule::default(), &node).unwrap(), Action::Keep);
    }

    #[test]
    fn test_container_named_video_is_kept() {
        let node = Node::new(NodeKind::ContainerDirective).with_name("video");
        assert_eq!(rewrite(VideoRule::default(), &node).unwrap(), Action::Keep);
    }
}
