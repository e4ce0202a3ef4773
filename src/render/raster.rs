//! Headless frame output: SVG markup to pixels via `usvg`/`resvg`, and PNG via `image`.

use std::{path::Path, sync::Arc};

use crate::foundation::error::{EpiError, EpiResult};

/// One rasterized frame, premultiplied RGBA8, row-major.
#[derive(Clone, Debug)]
pub struct RasterFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Parse SVG markup. System fonts are loaded only when the markup has text to shape.
pub fn parse_svg(svg: &str) -> EpiResult<usvg::Tree> {
    let mut opts = usvg::Options::default();
    if svg.contains("<text") {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        opts.fontdb = Arc::new(db);
    }
    usvg::Tree::from_str(svg, &opts).map_err(|e| EpiError::render(format!("parse svg: {e}")))
}

/// Rasterize `svg` at its intrinsic size over a solid straight-alpha `background`.
#[tracing::instrument(skip(svg))]
pub fn rasterize_svg(svg: &str, background: [u8; 4]) -> EpiResult<RasterFrame> {
    let tree = parse_svg(svg)?;
    let size = tree.size();
    let width = to_px(size.width())?;
    let height = to_px(size.height())?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| EpiError::render("failed to allocate pixmap"))?;
    let [r, g, b, a] = background;
    pixmap.fill(resvg::tiny_skia::Color::from_rgba8(r, g, b, a));

    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    Ok(RasterFrame {
        width,
        height,
        data: pixmap.data().to_vec(),
    })
}

fn to_px(v: f32) -> EpiResult<u32> {
    const MAX_DIM: u32 = 16_384;
    if !v.is_finite() || v <= 0.0 {
        return Err(EpiError::render("svg has invalid width/height"));
    }
    let px = (v.ceil() as u32).max(1);
    if px > MAX_DIM {
        return Err(EpiError::render(format!(
            "svg raster size too large: {px} (max {MAX_DIM})"
        )));
    }
    Ok(px)
}

/// Write `frame` as a PNG, converting back to straight alpha.
pub fn write_png(path: &Path, frame: &RasterFrame) -> EpiResult<()> {
    let mut straight = frame.data.clone();
    unpremultiply_in_place(&mut straight);
    image::save_buffer_with_format(
        path,
        &straight,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| EpiError::render(format!("write png '{}': {e}", path.display())))
}

fn unpremultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
