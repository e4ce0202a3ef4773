//! epispin animates a nested family of epicycloids.
//!
//! Every cusp count `n` in `1..=max_cusps` gets a hub of radius `n` with a unit roller rolling
//! around it; the pen on the roller traces the curve while the hubs themselves roll inside the
//! largest one. A single progress value `p` in `[0, 1]` drives all of it.
//!
//! # Pieces
//!
//! - [`EpiCycloid`]: precomputed point table and progressive `M .. L ..` path strings.
//! - [`TransformNode`]: a group whose transform is translate-then-rotate-about-pivot, updated
//!   field by field.
//! - [`CurveSet`]: hub frame, roller frame, pen and curve for one cusp count.
//! - [`Driver`]: the paused/running/done state machine that turns frame timestamps into `p`.
//!
//! The core only talks to a [`Scene`]; [`SvgDocument`] is the in-memory implementation used for
//! export, and [`render::raster`] turns its markup into pixels.
#![forbid(unsafe_code)]

pub mod animation;
pub mod foundation;
pub mod geometry;
pub mod render;
pub mod scene;

pub use animation::clock::FrameClock;
pub use animation::config::{DriverConfig, Layout};
pub use animation::curve_set::{CurveSet, hue_for};
pub use animation::driver::{Driver, FrameOutcome, RunState, TickRequest};
pub use foundation::core::{Affine, Canvas, Point, Rng64, Vec2, fixed3};
pub use foundation::error::{EpiError, EpiResult};
pub use geometry::angle::{centered, degrees, normalized};
pub use geometry::epicycloid::{EpiCycloid, POINT_DENSITY};
pub use render::raster::{RasterFrame, rasterize_svg, write_png};
pub use scene::color::Hsla;
pub use scene::document::{Element, SvgDocument};
pub use scene::node::{Attrs, Child, NodeId, NodeKind, Scene};
pub use scene::transform::{TransformNode, TransformState, TransformUpdate};
