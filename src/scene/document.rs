use crate::{
    foundation::error::{EpiError, EpiResult},
    scene::node::{Attrs, Child, NodeId, NodeKind, Scene},
};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// One element in an [`SvgDocument`].
#[derive(Clone, Debug)]
pub struct Element {
    pub kind: NodeKind,
    pub attrs: Attrs,
    pub children: Vec<Child>,
    pub parent: Option<NodeId>,
}

/// In-memory element tree implementing [`Scene`], serializable to SVG markup.
///
/// Nodes live in an arena and are never freed; a handle stays valid for the lifetime of the
/// document. Appending a node that already has a parent moves it, as the DOM does.
#[derive(Clone, Debug, Default)]
pub struct SvgDocument {
    nodes: Vec<Element>,
}

impl SvgDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(id.0 as usize)
    }

    /// Attribute value on `id`, if both exist.
    pub fn attr(&self, id: NodeId, key: &str) -> Option<&str> {
        self.get(id).and_then(|e| e.attrs.get(key))
    }

    /// Node children of `id` in document order (text runs skipped).
    pub fn child_nodes(&self, id: NodeId) -> Vec<NodeId> {
        self.get(id)
            .map(|e| {
                e.children
                    .iter()
                    .filter_map(|c| match c {
                        Child::Node(n) => Some(*n),
                        Child::Text(_) => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every node of `kind` reachable from `root`, depth first.
    pub fn descendants_of_kind(&self, root: NodeId, kind: NodeKind) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(el) = self.get(id) else {
                continue;
            };
            if el.kind == kind {
                out.push(id);
            }
            for c in self.child_nodes(id).into_iter().rev() {
                stack.push(c);
            }
        }
        out
    }

    fn element_mut(&mut self, id: NodeId) -> EpiResult<&mut Element> {
        self.nodes
            .get_mut(id.0 as usize)
            .ok_or_else(|| EpiError::scene(format!("unknown node {}", id.0)))
    }

    fn is_ancestor(&self, maybe_ancestor: NodeId, mut id: NodeId) -> bool {
        loop {
            if id == maybe_ancestor {
                return true;
            }
            match self.get(id).and_then(|e| e.parent) {
                Some(p) => id = p,
                None => return false,
            }
        }
    }

    /// Serialize the subtree at `root` as SVG markup.
    pub fn to_svg_string(&self, root: NodeId) -> EpiResult<String> {
        if self.get(root).is_none() {
            return Err(EpiError::scene(format!("unknown node {}", root.0)));
        }
        let mut out = String::with_capacity(4096);
        self.write_node(root, &mut out);
        out.push('\n');
        Ok(out)
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let Some(el) = self.get(id) else {
            return;
        };
        let tag = el.kind.tag();
        out.push('<');
        out.push_str(tag);
        if el.kind == NodeKind::Root && el.attrs.get("xmlns").is_none() {
            out.push_str(" xmlns=\"");
            out.push_str(SVG_NS);
            out.push('"');
        }
        for (k, v) in el.attrs.iter() {
            out.push(' ');
            out.push_str(k);
            out.push_str("=\"");
            escape_into(v, out);
            out.push('"');
        }
        if el.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &el.children {
            match child {
                Child::Node(n) => self.write_node(*n, out),
                Child::Text(t) => escape_into(t, out),
            }
        }
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
}

fn escape_into(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}

impl Scene for SvgDocument {
    fn create_node(&mut self, kind: NodeKind, attrs: Attrs) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Element {
            kind,
            attrs,
            children: Vec::new(),
            parent: None,
        });
        id
    }

    fn set_attribute(&mut self, node: NodeId, key: &str, value: String) -> EpiResult<()> {
        self.element_mut(node)?.attrs.set(key, value);
        Ok(())
    }

    fn append_child(&mut self, parent: NodeId, child: Child) -> EpiResult<()> {
        self.element_mut(parent)?;
        let id = match child {
            Child::Text(text) => {
                self.element_mut(parent)?.children.push(Child::Text(text));
                return Ok(());
            }
            Child::Node(id) => id,
        };

        self.element_mut(id)?;
        if self.is_ancestor(id, parent) {
            return Err(EpiError::scene(format!(
                "appending node {} under {} would create a cycle",
                id.0, parent.0
            )));
        }

        if let Some(old) = self.element_mut(id)?.parent.take() {
            self.element_mut(old)?
                .children
                .retain(|c| *c != Child::Node(id));
        }
        self.element_mut(id)?.parent = Some(parent);
        self.element_mut(parent)?.children.push(Child::Node(id));
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/document.rs"]
mod tests;
