use crate::{
    animation::config::DriverConfig,
    animation::curve_set::CurveSet,
    foundation::core::Rng64,
    foundation::error::{EpiError, EpiResult},
    geometry::angle::{TAU, centered},
    scene::node::{Attrs, Child, NodeId, NodeKind, Scene},
    scene::transform::{TransformNode, TransformUpdate},
};

/// Run state of a [`Driver`]. `Done` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum RunState {
    Paused,
    Running,
    Done,
}

impl RunState {
    pub fn name(self) -> &'static str {
        match self {
            Self::Paused => "PAUSED",
            Self::Running => "RUNNING",
            Self::Done => "DONE",
        }
    }
}

/// How the next frame computes its time delta.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickRequest {
    /// Real time since the previous frame. Only honored while still `Running`.
    SinceLastFrame,
    /// Manual step of a fixed number of milliseconds.
    Fixed(f64),
}

/// Result of offering a display frame to the driver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameOutcome {
    /// Nothing was scheduled, or the request went stale.
    Idle,
    /// Progress was applied and the animation continues.
    Advanced { p: f64 },
    /// Progress reached 1 and the driver is now `Done`.
    Finished,
}

#[derive(Clone, Debug)]
struct Stage {
    root: NodeId,
    drawing: TransformNode,
    title: Option<NodeId>,
    sets: Vec<CurveSet>,
}

/// Owns the run/pause/done state machine and fans progress out to every curve set.
///
/// The driver never runs its own loop. It keeps at most one pending [`TickRequest`]; the host
/// calls [`Driver::frame`] once per display refresh while [`Driver::wants_frame`] is true.
/// Every tick runs to completion before the next is considered.
#[derive(Clone, Debug)]
pub struct Driver {
    config: DriverConfig,
    final_angle: f64,
    state: RunState,
    elapsed: f64,
    last_frame_time: Option<f64>,
    pending: Option<TickRequest>,
    stage: Option<Stage>,
}

impl Driver {
    /// Validate `config` and resolve the spin sweep once.
    pub fn new(config: DriverConfig) -> EpiResult<Self> {
        config.validate()?;
        let final_angle = match config.final_angle {
            Some(a) => a,
            None => {
                let mut rng = match config.seed {
                    Some(seed) => Rng64::new(seed),
                    None => Rng64::from_clock(),
                };
                TAU * (rng.next_f64_01() + 0.7)
            }
        };
        Ok(Self {
            config,
            final_angle,
            state: RunState::Paused,
            elapsed: 0.0,
            last_frame_time: None,
            pending: None,
            stage: None,
        })
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Accumulated animation time in milliseconds.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn progress(&self) -> f64 {
        self.elapsed / self.config.duration
    }

    pub fn final_angle(&self) -> f64 {
        self.final_angle
    }

    /// Rotation of the whole drawing at `p = 1`, in `[-PI, PI)`.
    pub fn spin_target(&self) -> f64 {
        centered(self.final_angle * f64::from(self.config.max_cusps - 1))
    }

    pub fn is_initialized(&self) -> bool {
        self.stage.is_some()
    }

    /// Root canvas node, once initialized.
    pub fn root(&self) -> Option<NodeId> {
        self.stage.as_ref().map(|s| s.root)
    }

    /// Master frame every curve set hangs from, once initialized.
    pub fn drawing(&self) -> Option<&TransformNode> {
        self.stage.as_ref().map(|s| &s.drawing)
    }

    /// Curve sets from `max_cusps` down to 1. Empty before initialization.
    pub fn curve_sets(&self) -> &[CurveSet] {
        self.stage.as_ref().map(|s| s.sets.as_slice()).unwrap_or(&[])
    }

    pub fn wants_frame(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<TickRequest> {
        self.pending
    }

    fn reject(&self, op: &'static str) -> EpiError {
        let err = EpiError::transition(op, self.state.name());
        tracing::warn!(op, state = self.state.name(), "{err}");
        err
    }

    /// Paused -> Running. Frames then advance by real elapsed time.
    pub fn run(&mut self) -> EpiResult<()> {
        match self.state {
            RunState::Paused => {
                self.state = RunState::Running;
                // Re-anchor so wall time spent paused is not counted.
                self.last_frame_time = None;
                self.pending = Some(TickRequest::SinceLastFrame);
                Ok(())
            }
            RunState::Running | RunState::Done => Err(self.reject("run")),
        }
    }

    /// Running -> Paused. Accumulated time is kept.
    pub fn pause(&mut self) -> EpiResult<()> {
        match self.state {
            RunState::Running => {
                self.state = RunState::Paused;
                self.pending = None;
                Ok(())
            }
            RunState::Paused | RunState::Done => Err(self.reject("pause")),
        }
    }

    /// [`Driver::step_by`] with the configured step size.
    pub fn step(&mut self) -> EpiResult<()> {
        self.step_by(self.config.step_size)
    }

    /// While paused, schedule one frame advancing by `delta` ms; repeated steps before that frame
    /// add up. While running, switch to paused so the caller can drive frames by hand.
    pub fn step_by(&mut self, delta: f64) -> EpiResult<()> {
        match self.state {
            RunState::Paused => {
                if !delta.is_finite() || delta < 0.0 {
                    return Err(EpiError::validation(format!(
                        "step delta must be finite and >= 0, got {delta}"
                    )));
                }
                // Steps issued before the next frame accumulate into one request.
                let total = match self.pending {
                    Some(TickRequest::Fixed(prev)) => prev + delta,
                    _ => delta,
                };
                self.pending = Some(TickRequest::Fixed(total));
                Ok(())
            }
            RunState::Running => {
                tracing::debug!("step while running: switching to PAUSED");
                self.state = RunState::Paused;
                self.pending = None;
                Ok(())
            }
            RunState::Done => Err(self.reject("step")),
        }
    }

    /// Build the scene once: canvas, border, optional title, and one curve set per cusp count.
    #[tracing::instrument(skip(self, scene), fields(max_cusps = self.config.max_cusps))]
    pub fn initialize(&mut self, scene: &mut dyn Scene) -> EpiResult<()> {
        if self.stage.is_some() {
            return Ok(());
        }

        let cfg = &self.config;
        let layout = cfg.layout();
        let max_cusps = cfg.max_cusps;

        let root = scene.create_node(
            NodeKind::Root,
            Attrs::new()
                .with("width", cfg.width)
                .with("height", cfg.height),
        );
        let border = scene.create_node(
            NodeKind::Rect,
            Attrs::new()
                .with("class", "border")
                .with("x", cfg.margin)
                .with("y", cfg.margin)
                .with("width", layout.eff_width)
                .with("height", layout.eff_height)
                .with("fill", "none")
                .with("stroke", "#999"),
        );
        scene.append_child(root, border.into())?;

        let title = match &cfg.title {
            Some(text) => Some(scene.create_with_children(
                NodeKind::Text,
                Attrs::new()
                    .with("class", "title")
                    .with("x", f64::from(cfg.width) / 2.0)
                    .with("y", f64::from(cfg.margin) * 0.8)
                    .with("text-anchor", "middle")
                    .with("opacity", 0),
                vec![Child::Text(text.clone())],
            )?),
            None => None,
        };
        if let Some(t) = title {
            scene.append_child(root, t.into())?;
        }

        let scaler = scene.create_node(
            NodeKind::Group,
            Attrs::new()
                .with("transform", layout.drawing_transform(max_cusps))
                .with("stroke-width", 1.0 / layout.scale),
        );
        scene.append_child(root, scaler.into())?;

        let drawing = TransformNode::new(scene, TransformUpdate::new())?;
        scene.append_child(scaler, (&drawing).into())?;

        let sets = (1..=max_cusps)
            .rev()
            .map(|n| CurveSet::new(scene, drawing.node(), n, max_cusps, self.final_angle))
            .collect::<EpiResult<Vec<_>>>()?;

        self.stage = Some(Stage {
            root,
            drawing,
            title,
            sets,
        });
        Ok(())
    }

    /// Offer one display frame at `timestamp` ms.
    ///
    /// Consumes the pending request, if any. A real-time request that outlived a pause is
    /// dropped without touching the scene.
    pub fn frame(&mut self, scene: &mut dyn Scene, timestamp: f64) -> EpiResult<FrameOutcome> {
        let Some(req) = self.pending.take() else {
            return Ok(FrameOutcome::Idle);
        };
        if self.state == RunState::Done
            || (req == TickRequest::SinceLastFrame && self.state != RunState::Running)
        {
            tracing::debug!(?req, state = self.state.name(), "dropping stale tick");
            return Ok(FrameOutcome::Idle);
        }

        let first = !self.is_initialized();
        self.initialize(scene)?;

        let delta = if first {
            0.0
        } else {
            match req {
                TickRequest::Fixed(d) => d,
                TickRequest::SinceLastFrame => self
                    .last_frame_time
                    .map(|t| (timestamp - t).max(0.0))
                    .unwrap_or(0.0),
            }
        };

        let duration = self.config.duration;
        self.elapsed = (self.elapsed + delta).min(duration);
        let p = self.elapsed / duration;
        if self.config.debug {
            tracing::debug!(
                last_frame_time = ?self.last_frame_time,
                timestamp,
                elapsed = self.elapsed,
                p,
                "tick"
            );
        }
        self.apply(scene, p)?;
        self.last_frame_time = Some(timestamp);

        if self.elapsed >= duration {
            self.state = RunState::Done;
            self.pending = None;
            tracing::info!(elapsed = self.elapsed, "animation done");
            return Ok(FrameOutcome::Finished);
        }
        if self.state == RunState::Running {
            self.pending = Some(TickRequest::SinceLastFrame);
        }
        Ok(FrameOutcome::Advanced { p })
    }

    /// Jump to an absolute elapsed time (clamped to the duration) and render it, leaving the
    /// run state alone. Not allowed while running or once done.
    pub fn seek(&mut self, scene: &mut dyn Scene, elapsed: f64) -> EpiResult<f64> {
        if self.state != RunState::Paused {
            return Err(self.reject("seek"));
        }
        if elapsed.is_nan() {
            return Err(EpiError::validation("seek target must not be NaN"));
        }
        self.initialize(scene)?;
        self.elapsed = elapsed.clamp(0.0, self.config.duration);
        let p = self.progress();
        self.apply(scene, p)?;
        Ok(p)
    }

    fn apply(&mut self, scene: &mut dyn Scene, p: f64) -> EpiResult<()> {
        let spin = self.spin_target();
        let max_cusps = f64::from(self.config.max_cusps);
        let stage = self
            .stage
            .as_mut()
            .ok_or_else(|| EpiError::scene("driver scene is not initialized"))?;

        stage
            .drawing
            .transform(scene, TransformUpdate::new().rot(spin * p).cx(-max_cusps))?;
        if let Some(t) = stage.title {
            scene.set_attribute(t, "opacity", p.to_string())?;
        }
        for set in &mut stage.sets {
            set.update(scene, p)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/driver.rs"]
mod tests;
