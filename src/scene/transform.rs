use crate::{
    foundation::core::{Affine, Point, Vec2},
    foundation::error::EpiResult,
    geometry::angle::degrees,
    scene::node::{Attrs, Child, NodeId, NodeKind, Scene},
};

/// Translation, rotation (radians) and rotation pivot of one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransformState {
    pub x: f64,
    pub y: f64,
    pub rot: f64,
    pub cx: f64,
    pub cy: f64,
}

impl TransformState {
    /// SVG transform attribute: translate first, then rotate about the pivot.
    pub fn to_svg(&self) -> String {
        // `+ 0.0` folds -0.0 into 0.0 so it prints as "0".
        format!(
            "translate({} {}) rotate({} {} {})",
            self.x + 0.0,
            self.y + 0.0,
            degrees(self.rot) + 0.0,
            self.cx + 0.0,
            self.cy + 0.0
        )
    }

    /// Same transform as [`TransformState::to_svg`], as a matrix mapping local to parent space.
    pub fn to_affine(&self) -> Affine {
        Affine::translate(Vec2::new(self.x, self.y))
            * Affine::rotate_about(self.rot, Point::new(self.cx, self.cy))
    }

    pub fn apply(&mut self, update: &TransformUpdate) {
        if let Some(v) = update.x {
            self.x = v;
        }
        if let Some(v) = update.y {
            self.y = v;
        }
        if let Some(v) = update.rot {
            self.rot = v;
        }
        if let Some(v) = update.cx {
            self.cx = v;
        }
        if let Some(v) = update.cy {
            self.cy = v;
        }
    }
}

/// Sparse update: fields left as `None` keep their current value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TransformUpdate {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub rot: Option<f64>,
    pub cx: Option<f64>,
    pub cy: Option<f64>,
}

impl TransformUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn x(mut self, v: f64) -> Self {
        self.x = Some(v);
        self
    }

    pub fn y(mut self, v: f64) -> Self {
        self.y = Some(v);
        self
    }

    pub fn rot(mut self, v: f64) -> Self {
        self.rot = Some(v);
        self
    }

    pub fn cx(mut self, v: f64) -> Self {
        self.cx = Some(v);
        self
    }

    pub fn cy(mut self, v: f64) -> Self {
        self.cy = Some(v);
        self
    }

    /// Set `x` and `y` together.
    pub fn pos(self, [x, y]: [f64; 2]) -> Self {
        self.x(x).y(y)
    }

    /// Set the pivot `cx` and `cy` together.
    pub fn c(self, [cx, cy]: [f64; 2]) -> Self {
        self.cx(cx).cy(cy)
    }
}

/// A group node whose `transform` attribute always mirrors its full [`TransformState`].
#[derive(Clone, Debug)]
pub struct TransformNode {
    node: NodeId,
    state: TransformState,
}

impl TransformNode {
    /// Create a fresh group in `scene` and push the initial transform.
    pub fn new(scene: &mut dyn Scene, init: TransformUpdate) -> EpiResult<Self> {
        let node = scene.create_node(NodeKind::Group, Attrs::new());
        let mut out = Self {
            node,
            state: TransformState::default(),
        };
        out.transform(scene, init)?;
        Ok(out)
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn state(&self) -> TransformState {
        self.state
    }

    /// Merge `update` into the state, then rewrite the node's whole transform.
    pub fn transform(&mut self, scene: &mut dyn Scene, update: TransformUpdate) -> EpiResult<()> {
        self.state.apply(&update);
        scene.set_attribute(self.node, "transform", self.state.to_svg())
    }

    pub fn append(&self, scene: &mut dyn Scene, child: impl Into<Child>) -> EpiResult<()> {
        scene.append_child(self.node, child.into())
    }
}

impl From<&TransformNode> for Child {
    fn from(t: &TransformNode) -> Self {
        Child::Node(t.node)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/transform.rs"]
mod tests;
