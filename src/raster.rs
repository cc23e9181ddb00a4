use std::path::Path;

use anyhow::Context as _;

use crate::error::{GridArtError, GridArtResult};

/// Straight-alpha RGBA8 pixels, row-major.
#[derive(Clone, Debug)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl RasterImage {
    /// Write the image as a PNG file.
    pub fn save_png(&self, path: &Path) -> GridArtResult<()> {
        image::save_buffer_with_format(
            path,
            &self.data,
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| match e {
            image::ImageError::IoError(io) => {
                GridArtError::io(format!("write png '{}'", path.display()), io)
            }
            other => GridArtError::Other(
                anyhow::Error::new(other).context(format!("encode png '{}'", path.display())),
            ),
        })
    }
}

/// Turns a serialized vector scene into pixels.
///
/// Implementations must produce exactly `size` x `size` pixels over a transparent
/// background.
pub trait Rasterizer {
    fn rasterize(&mut self, svg_path: &Path, size: u32) -> GridArtResult<RasterImage>;
}

/// CPU rasterizer backed by `usvg` + `resvg` (antialiased fills).
pub struct ResvgRasterizer {
    opts: usvg::Options<'static>,
}

impl Default for ResvgRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ResvgRasterizer {
    pub fn new() -> Self {
        Self {
            opts: usvg::Options::default(),
        }
    }

    pub fn rasterize_svg_data(&self, svg: &[u8], size: u32) -> GridArtResult<RasterImage> {
        let tree = usvg::Tree::from_data(svg, &self.opts)
            .map_err(|e| GridArtError::rasterization(format!("parse svg tree: {e}")))?;
        self.rasterize_tree(&tree, size)
    }

    fn rasterize_tree(&self, tree: &usvg::Tree, size: u32) -> GridArtResult<RasterImage> {
        let mut pixmap = resvg::tiny_skia::Pixmap::new(size, size)
            .ok_or_else(|| GridArtError::rasterization("failed to allocate pixmap"))?;

        let tree_size = tree.size();
        if tree_size.width() <= 0.0 || tree_size.height() <= 0.0 {
            return Err(GridArtError::rasterization("svg has invalid width/height"));
        }
        let sx = (size as f32) / tree_size.width();
        let sy = (size as f32) / tree_size.height();
        let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);
        resvg::render(tree, xform, &mut pixmap.as_mut());

        // tiny-skia stores premultiplied pixels; PNG wants straight alpha.
        let mut data = Vec::with_capacity((size as usize) * (size as usize) * 4);
        for px in pixmap.pixels() {
            let c = px.demultiply();
            data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }

        Ok(RasterImage {
            width: size,
            height: size,
            data,
        })
    }
}

impl Rasterizer for ResvgRasterizer {
    fn rasterize(&mut self, svg_path: &Path, size: u32) -> GridArtResult<RasterImage> {
        let bytes = std::fs::read(svg_path)
            .with_context(|| format!("read svg '{}'", svg_path.display()))?;
        self.rasterize_svg_data(&bytes, size)
    }
}
