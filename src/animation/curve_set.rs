use crate::{
    foundation::core::Point,
    foundation::error::{EpiError, EpiResult},
    geometry::angle::TAU,
    geometry::epicycloid::EpiCycloid,
    scene::color::Hsla,
    scene::node::{Attrs, NodeId, NodeKind, Scene},
    scene::transform::{TransformNode, TransformUpdate},
};

/// Scene elements and motion for one epicycloid of the nested family.
///
/// Hierarchy under the parent node:
///
/// ```text
/// hub frame
///  ├─ hub circle (r = n)
///  ├─ roller frame
///  │   ├─ roller circle (r = 1)
///  │   └─ pen
///  └─ curve path
/// ```
#[derive(Clone, Debug)]
pub struct CurveSet {
    cusps: u32,
    max_cusps: u32,
    final_angle: f64,
    hue: u32,
    epi: EpiCycloid,
    hub_frame: TransformNode,
    roller_frame: TransformNode,
    hub: NodeId,
    roller: NodeId,
    pen: NodeId,
    curve: NodeId,
}

/// Hue in degrees for cusp count `cusps`, spread evenly over the family.
pub fn hue_for(cusps: u32, max_cusps: u32) -> u32 {
    ((u64::from(cusps.saturating_sub(1)) * 360) / u64::from(max_cusps.max(1))) as u32
}

impl CurveSet {
    #[tracing::instrument(skip(scene, parent))]
    pub fn new(
        scene: &mut dyn Scene,
        parent: NodeId,
        cusps: u32,
        max_cusps: u32,
        final_angle: f64,
    ) -> EpiResult<Self> {
        if cusps == 0 || cusps > max_cusps {
            return Err(EpiError::validation(format!(
                "cusp count {cusps} outside 1..={max_cusps}"
            )));
        }

        let hue = hue_for(cusps, max_cusps);
        let circle_color = Hsla::hsl(f64::from(hue), 50.0, 80.0);
        let n = f64::from(cusps);

        let epi = EpiCycloid::new(cusps)?;

        let hub_frame = TransformNode::new(scene, TransformUpdate::new().x(-n))?;
        let hub = scene.create_node(
            NodeKind::Circle,
            Attrs::new()
                .with("class", "hub")
                .with("r", n)
                .with("cx", 0)
                .with("cy", 0)
                .with("fill", "none")
                .with("stroke", circle_color),
        );

        let roller_frame = TransformNode::new(scene, TransformUpdate::new().x(n + 1.0))?;
        let roller = scene.create_node(
            NodeKind::Circle,
            Attrs::new()
                .with("class", "roller")
                .with("r", 1)
                .with("cx", 0)
                .with("cy", 0)
                .with("fill", "none")
                .with("stroke", circle_color),
        );
        let pen = scene.create_node(
            NodeKind::Circle,
            Attrs::new()
                .with("class", "pen")
                .with("r", 0.1)
                .with("cx", -1)
                .with("cy", 0),
        );
        roller_frame.append(scene, roller)?;
        roller_frame.append(scene, pen)?;
        hub_frame.append(scene, hub)?;
        hub_frame.append(scene, &roller_frame)?;

        let curve = scene.create_node(
            NodeKind::Path,
            Attrs::new()
                .with("class", "curve")
                .with("d", epi.path_to(TAU))
                .with("fill", "none")
                .with("stroke", Hsla::hsl(f64::from(hue), 100.0, 50.0)),
        );
        hub_frame.append(scene, curve)?;

        scene.append_child(parent, (&hub_frame).into())?;

        Ok(Self {
            cusps,
            max_cusps,
            final_angle,
            hue,
            epi,
            hub_frame,
            roller_frame,
            hub,
            roller,
            pen,
            curve,
        })
    }

    pub fn cusps(&self) -> u32 {
        self.cusps
    }

    pub fn hue(&self) -> u32 {
        self.hue
    }

    pub fn epicycloid(&self) -> &EpiCycloid {
        &self.epi
    }

    pub fn hub_frame(&self) -> &TransformNode {
        &self.hub_frame
    }

    pub fn roller_frame(&self) -> &TransformNode {
        &self.roller_frame
    }

    pub fn curve_node(&self) -> NodeId {
        self.curve
    }

    /// Hub circle, roller circle and pen, the elements that fade out.
    pub fn decoration_nodes(&self) -> [NodeId; 3] {
        [self.hub, self.roller, self.pen]
    }

    /// Roll the roller around the outside of the hub.
    ///
    /// The roller's own spin is `(n + 1)` times its orbital angle, so it never slips.
    pub fn roll_to(&mut self, scene: &mut dyn Scene, angle: f64) -> EpiResult<()> {
        let n = f64::from(self.cusps);
        let r = 1.0 + n;
        self.roller_frame.transform(
            scene,
            TransformUpdate::new()
                .pos([r * angle.cos(), r * angle.sin()])
                .rot((n + 1.0) * angle),
        )
    }

    /// Spin the hub inside the largest hub, whose center is at `(-max_cusps, 0)`.
    pub fn spin_to(&mut self, scene: &mut dyn Scene, angle: f64) -> EpiResult<()> {
        let n = f64::from(self.cusps);
        let max = f64::from(self.max_cusps);
        let r = max - n;
        self.hub_frame.transform(
            scene,
            TransformUpdate::new()
                .pos([-max + r * angle.cos(), r * angle.sin()])
                .rot(-(max / n - 1.0) * angle),
        )
    }

    /// Apply progress `p` (clamped to `[0, 1]`). Overwrites every animated attribute, so
    /// repeating a call with the same `p` changes nothing.
    pub fn update(&mut self, scene: &mut dyn Scene, p: f64) -> EpiResult<()> {
        let p = p.clamp(0.0, 1.0);
        let curve_angle = TAU * p;
        self.roll_to(scene, curve_angle)?;
        self.spin_to(scene, self.final_angle * p)?;

        let fill_alpha =
            p * (f64::from(self.max_cusps - self.cusps + 1) / f64::from(self.max_cusps));
        scene.set_attribute(self.curve, "d", self.epi.path_to(curve_angle).to_owned())?;
        scene.set_attribute(
            self.curve,
            "fill",
            Hsla::hsl(f64::from(self.hue), 100.0, 50.0)
                .with_alpha(fill_alpha)
                .to_string(),
        )?;

        let fade = (1.0 - p).to_string();
        for node in self.decoration_nodes() {
            scene.set_attribute(node, "opacity", fade.clone())?;
        }
        Ok(())
    }

    /// Pen center in the hub frame's coordinates; lies on the traced curve.
    pub fn pen_in_hub_frame(&self) -> Point {
        self.roller_frame.state().to_affine() * Point::new(-1.0, 0.0)
    }

    /// Pen center in the parent node's coordinates.
    pub fn pen_in_parent(&self) -> Point {
        self.hub_frame.state().to_affine() * self.pen_in_hub_frame()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/curve_set.rs"]
mod tests;
