//! Callout rule: `:::note`, `:::warning`, ... become callout elements.

use std::collections::BTreeMap;

use sfdocs_tree::{Action, Metadata, Node, NodeKind, Position, SelectionSet, Selector};

use super::{RewriteError, RewriteRule, RuleError, is_valid_tag_name};

/// Element emitted for every callout category.
pub const DEFAULT_CALLOUT_ELEMENT: &str = "doc-content-callout";

/// Built-in categories and their display titles.
pub const DEFAULT_CATEGORIES: [(&str, &str); 5] = [
    ("note", "Note"),
    ("tip", "Tip"),
    ("warning", "Warning"),
    ("important", "Important"),
    ("caution", "Caution"),
];

/// Callout rule configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalloutConfig {
    /// Element tag name emitted for callouts.
    pub element: String,
    /// Container directive names treated as callouts.
    pub categories: Vec<String>,
    /// Display title per category.
    pub titles: BTreeMap<String, String>,
}

impl Default for CalloutConfig {
    fn default() -> Self {
        Self {
            element: DEFAULT_CALLOUT_ELEMENT.to_owned(),
            categories: DEFAULT_CATEGORIES
                .iter()
                .map(|(name, _)| (*name).to_owned())
                .collect(),
            titles: DEFAULT_CATEGORIES
                .iter()
                .map(|(name, title)| ((*name).to_owned(), (*title).to_owned()))
                .collect(),
        }
    }
}

impl CalloutConfig {
    /// Add a category with its display title.
    #[must_use]
    pub fn with_category(mut self, name: impl Into<String>, title: impl Into<String>) -> Self {
        let name = name.into();
        self.titles.insert(name.clone(), title.into());
        if !self.categories.contains(&name) {
            self.categories.push(name);
        }
        self
    }
}

/// Tags container directives of a known category with callout metadata.
///
/// The callout body is left untouched; the element receives `header` (the
/// category title) and `variant` (the category name) properties.
///
/// # Example
///
/// ```
/// use sfdocs_renderer::rules::{CalloutConfig, CalloutRule};
///
/// let rule = CalloutRule::new(CalloutConfig::default()).unwrap();
/// assert_eq!(rule.title("warning"), Some("Warning"));
/// assert_eq!(rule.title("video"), None);
/// ```
#[derive(Debug, Clone)]
pub struct CalloutRule {
    element: String,
    /// Category name to display title, selected categories only.
    titles: BTreeMap<String, String>,
}

impl CalloutRule {
    /// Build the rule, checking every category has a title.
    pub fn new(config: CalloutConfig) -> Result<Self, RuleError> {
        if !is_valid_tag_name(&config.element) {
            return Err(RuleError::InvalidElement(config.element));
        }

        let mut titles = BTreeMap::new();
        for category in config.categories {
            let title = config
                .titles
                .get(&category)
                .ok_or_else(|| RuleError::MissingTitle(category.clone()))?;
            titles.insert(category, title.clone());
        }

        Ok(Self {
            element: config.element,
            titles,
        })
    }

    /// Display title for a category.
    #[must_use]
    pub fn title(&self, category: &str) -> Option<&str> {
        self.titles.get(category).map(String::as_str)
    }

    fn metadata(&self, category: &str, title: &str) -> Metadata {
        Metadata::new(&self.element)
            .with_property("header", title)
            .with_property("variant", category)
    }
}

impl RewriteRule for CalloutRule {
    fn name(&self) -> &str {
        "callout"
    }

    fn selection(&self) -> SelectionSet {
        self.titles
            .keys()
            .map(|category| Selector::named(NodeKind::ContainerDirective, category))
            .collect()
    }

    fn rewrite(&self, node: &Node, _position: Position<'_>) -> Result<Action, RewriteError> {
        if node.kind != NodeKind::ContainerDirective {
            return Ok(Action::Keep);
        }
        let action = node
            .name
            .as_deref()
            .and_then(|category| {
                self.title(category)
                    .map(|title| self.metadata(category, title))
            })
            .map_or(Action::Keep, Action::Annotate);
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rule() -> CalloutRule {
        CalloutRule::new(CalloutConfig::default()).unwrap()
    }

    fn container(name: &str) -> Node {
        Node::new(NodeKind::ContainerDirective)
            .with_name(name)
            .with_children(vec![Node::text("Be careful.")])
    }

    #[test]
    fn test_warning_metadata() {
        let action = rule()
            .rewrite(&container("warning"), Position::root())
            .unwrap();
        assert_eq!(
            action,
            Action::Annotate(
                Metadata::new("doc-content-callout")
                    .with_property("header", "Warning")
                    .with_property("variant", "warning")
            )
        );
    }

    #[test]
    fn test_every_default_category_matches() {
        let rule = rule();
        for (category, title) in DEFAULT_CATEGORIES {
            let Action::Annotate(meta) = rule.rewrite(&container(category), Position::root()).unwrap()
            else {
                panic!("{category} should be annotated");
            };
            assert_eq!(meta.target_properties["variant"], category);
            assert_eq!(meta.target_properties["header"], title);
        }
    }

    #[test]
    fn test_unknown_category_is_kept() {
        let action = rule()
            .rewrite(&container("details"), Position::root())
            .unwrap();
        assert_eq!(action, Action::Keep);
    }

    #[test]
    fn test_leaf_with_category_name_is_kept() {
        let node = Node::new(NodeKind::LeafDirective).with_name("note");
        assert_eq!(rule().rewrite(&node, Position::root()).unwrap(), Action::Keep);
    }

    #[test]
    fn test_missing_title_is_rejected() {
        let mut config = CalloutConfig::default();
        config.categories.push("danger".to_owned());
        assert_eq!(
            CalloutRule::new(config).unwrap_err(),
            RuleError::MissingTitle("danger".to_owned())
        );
    }

    #[test]
    fn test_invalid_element_is_rejected() {
        let config = CalloutConfig {
            element: "bad element".to_owned(),
            ..CalloutConfig::default()
        };
        assert!(matches!(
            CalloutRule::new(config),
            Err(RuleError::InvalidElement(_))
        ));
    }

    #[test]
    fn test_custom_category() {
        let rule =
            CalloutRule::new(CalloutConfig::default().with_category("danger", "Danger")).unwrap();
        let Action::Annotate(meta) = rule.rewrite(&container("danger"), Position::root()).unwrap()
        else {
            panic!("danger should be annotated");
        };
        assert_eq!(meta.target_properties["header"], "Danger");
    }

    #[test]
    fn test_titles_without_category_are_not_selected() {
        let config = CalloutConfig {
            categories: vec!["tip".to_owned()],
            ..CalloutConfig::default()
        };
        let rule = CalloutRule::new(config).unwrap();
        let selection = rule.selection();
        assert_eq!(selection.iter().count(), 1);
        assert!(selection.matches(&container("tip")));
        assert!(!selection.matches(&container("note")));
    }
}
