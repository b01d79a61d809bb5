//! Group selection declared under `<groups>` and `<testdoxGroups>`

use crate::document::Element;
use serde::Serialize;

/// Group names to include and exclude, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupConfig {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl GroupConfig {
    pub fn parse(groups: Option<&Element>) -> Self {
        let Some(groups) = groups else {
            return Self::default();
        };
        Self {
            include: names(groups, "include"),
            exclude: names(groups, "exclude"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }
}

fn names(groups: &Element, side: &str) -> Vec<String> {
    groups
        .children_named(side)
        .flat_map(|list| list.children_named("group"))
        .map(|group| group.text.trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_document;

    #[test]
    fn test_names_keep_order_and_duplicates() {
        let root = parse_document(
            "<phpunit><groups><include><group>b</group><group>a</group><group>b</group></include>\
             <exclude><group>slow</group></exclude></groups></phpunit>",
        )
        .unwrap();
        let groups = GroupConfig::parse(root.child("groups"));
        assert_eq!(groups.include, vec!["b", "a", "b"]);
        assert_eq!(groups.exclude, vec!["slow"]);
    }

    #[test]
    fn test_missing_section() {
        assert!(GroupConfig::parse(None).is_empty());
    }
}
