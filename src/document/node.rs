//! # Generic Scene Node
//!
//! The untyped tree produced by the parser. A node knows its element tag,
//! its attributes as raw strings, its children in document order, any
//! character data and any comments. It carries no X3D semantics: typing of
//! attribute values happens lazily through [`fields`](super::fields).

/// A single element of an X3D document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneNode {
    name: String,
    // Vec keeps document order; keys are unique (later duplicates replace earlier ones)
    attributes: Vec<(String, String)>,
    children: Vec<SceneNode>,
    inner_text: Option<String>,
    comments: Vec<String>,
}

impl SceneNode {
    /// Creates an empty node with the given element tag
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder pattern: add or replace an attribute
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Builder pattern: append a child
    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    /// Element tag, e.g. `Transform`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw attribute value
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, key: &str) -> bool {
        self.attr(key).is_some()
    }

    /// All attributes in document order
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }

    /// First child with the given tag
    pub fn child(&self, name: &str) -> Option<&SceneNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Concatenated non-whitespace character data, if any
    pub fn inner_text(&self) -> Option<&str> {
        self.inner_text.as_deref()
    }

    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// Name declared by a `DEF` attribute
    pub fn def_name(&self) -> Option<&str> {
        self.attr("DEF").filter(|s| !s.is_empty())
    }

    /// Name referenced by a `USE` attribute
    pub fn use_name(&self) -> Option<&str> {
        self.attr("USE").filter(|s| !s.is_empty())
    }

    /// Depth-first pre-order walk over this node and all descendants
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    pub(crate) fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub(crate) fn push_child(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    pub(crate) fn append_text(&mut self, text: &str) {
        self.inner_text.get_or_insert_with(String::new).push_str(text);
    }

    pub(crate) fn push_comment(&mut self, comment: String) {
        self.comments.push(comment);
    }
}

/// Iterator returned by [`SceneNode::walk`]
pub struct Walk<'a> {
    stack: Vec<&'a SceneNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a SceneNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
