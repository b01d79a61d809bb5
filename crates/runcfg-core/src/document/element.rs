//! Owned element tree

/// One element of a configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Qualified element name, e.g. `testsuite` or `xi:include`
    pub name: String,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
    /// Concatenated, trimmed text content of this element
    pub text: String,
    /// Child elements in document order
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder-style attribute setter, mostly useful in tests.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Builder-style text setter.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Builder-style child appender.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Text content, `None` when empty.
    pub fn text(&self) -> Option<&str> {
        let text = self.text.trim();
        (!text.is_empty()).then_some(text)
    }

    /// First child with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    /// All direct children with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Select descendants along a relative path such as `whitelist/exclude/file`.
    ///
    /// Each segment matches child names exactly; `*` matches any child.
    pub fn select(&self, path: &str) -> Vec<&Element> {
        let mut current = vec![self];
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = current
                .into_iter()
                .flat_map(move |element| {
                    element
                        .children
                        .iter()
                        .filter(move |child| segment == "*" || child.name == segment)
                })
                .collect();
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        Element::new("phpunit").with_child(
            Element::new("groups")
                .with_child(
                    Element::new("include")
                        .with_child(Element::new("group").with_text("fast"))
                        .with_child(Element::new("group").with_text("db")),
                )
                .with_child(Element::new("exclude").with_child(Element::new("group").with_text("slow"))),
        )
    }

    #[test]
    fn test_select_follows_path() {
        let root = sample();
        let names: Vec<_> = root
            .select("groups/include/group")
            .iter()
            .map(|e| e.text.as_str())
            .collect();
        assert_eq!(names, vec!["fast", "db"]);
    }

    #[test]
    fn test_select_wildcard() {
        let root = sample();
        assert_eq!(root.select("groups/*").len(), 2);
        assert_eq!(root.select("groups/*/group").len(), 3);
        assert!(root.select("logging/log").is_empty());
    }

    #[test]
    fn test_text_treats_blank_as_missing() {
        assert_eq!(Element::new("file").with_text("  ").text(), None);
        assert_eq!(Element::new("file").with_text("a.php").text(), Some("a.php"));
    }

    #[test]
    fn test_attribute_lookup() {
        let element = Element::new("log")
            .with_attribute("type", "junit")
            .with_attribute("target", "/tmp/junit.xml");
        assert_eq!(element.attribute("type"), Some("junit"));
        assert!(element.has_attribute("target"));
        assert!(!element.has_attribute("threshold"));
    }
}
