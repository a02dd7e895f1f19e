//! Presentation tree produced by the render rules and the views.
//!
//! A `StyledNode` is what the reader eventually sees: an element with a tag, an
//! optional style class and attributes, or a run of text. Output formats only
//! ever consume this tree, never the parsed document.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StyledNode {
    Element(Element),
    Text { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    pub tag: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attrs: Vec<(&'static str, String)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<StyledNode>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Element {
            tag,
            class: None,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn class(mut self, class: &'static str) -> Self {
        self.class = Some(class);
        self
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn child(mut self, child: impl Into<StyledNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = StyledNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(StyledNode::text(text))
    }

    /// Concatenated text of this element's descendants.
    pub fn text_content(&self) -> String {
        self.children.iter().map(StyledNode::text_content).collect()
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl From<Element> for StyledNode {
    fn from(element: Element) -> Self {
        StyledNode::Element(element)
    }
}

impl StyledNode {
    pub fn text(text: impl Into<String>) -> Self {
        StyledNode::Text { text: text.into() }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            StyledNode::Element(element) => Some(element),
            StyledNode::Text { .. } => None,
        }
    }

    pub fn children(&self) -> &[StyledNode] {
        match self {
            StyledNode::Element(element) => &element.children,
            StyledNode::Text { .. } => &[],
        }
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                StyledNode::Text { text } => out.push_str(text),
                StyledNode::Element(element) => stack.extend(element.children.iter().rev()),
            }
        }
        out
    }

    /// Every element carrying `class`, in document order.
    pub fn find_by_class(&self, class: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let StyledNode::Element(element) = node {
                if element.class == Some(class) {
                    found.push(element);
                }
                stack.extend(element.children.iter().rev());
            }
        }
        found
    }

    /// Every element with the given tag, in document order.
    pub fn find_by_tag(&self, tag: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let StyledNode::Element(element) = node {
                if element.tag == tag {
                    found.push(element);
                }
                stack.extend(element.children.iter().rev());
            }
        }
        found
    }
}
