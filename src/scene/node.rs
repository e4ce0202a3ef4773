//! The renderable-scene contract the animation drives.
//!
//! The core never touches concrete elements. It creates nodes, sets string attributes, and
//! appends children through [`Scene`], holding only [`NodeId`] handles.

use std::fmt;

use crate::foundation::error::EpiResult;

/// Opaque handle to a node owned by a [`Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

/// Element kinds the animation needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Root canvas (`<svg>`).
    Root,
    Group,
    Circle,
    Path,
    Rect,
    Text,
}

impl NodeKind {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Root => "svg",
            Self::Group => "g",
            Self::Circle => "circle",
            Self::Path => "path",
            Self::Rect => "rect",
            Self::Text => "text",
        }
    }
}

/// Ordered attribute list. Setting an existing key replaces its value in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attrs(Vec<(String, String)>);

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.set(key, value.to_string());
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A child entry: either an existing node or a run of text.
#[derive(Clone, Debug, PartialEq)]
pub enum Child {
    Node(NodeId),
    Text(String),
}

impl From<NodeId> for Child {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

/// Minimal renderable-scene collaborator.
pub trait Scene {
    fn create_node(&mut self, kind: NodeKind, attrs: Attrs) -> NodeId;

    fn set_attribute(&mut self, node: NodeId, key: &str, value: String) -> EpiResult<()>;

    fn append_child(&mut self, parent: NodeId, child: Child) -> EpiResult<()>;

    /// Create a node and append `children` to it in order.
    fn create_with_children(
        &mut self,
        kind: NodeKind,
        attrs: Attrs,
        children: Vec<Child>,
    ) -> EpiResult<NodeId> {
        let id = self.create_node(kind, attrs);
        for child in children {
            self.append_child(id, child)?;
        }
        Ok(id)
    }
}
