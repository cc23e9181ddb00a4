use std::path::{Path, PathBuf};

use crate::{
    color::Palette,
    compose::generate,
    config::BatchConfig,
    error::{GridArtError, GridArtResult},
    raster::Rasterizer,
    svg::scene_to_svg,
};

/// Outcome of a batch that ran to completion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchResult {
    pub items_completed: u64,
    pub total: u64,
}

/// Reported after each finished item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchProgress {
    pub completed: u64,
    pub total: u64,
}

const PROGRESS_LOG_EVERY: u64 = 10;

/// Caption text for one item.
pub fn compose_caption(trigger: &str, summary: &str, palette: &Palette) -> String {
    format!(
        "{trigger}, {summary} in colors {}, vector art style, clean lines, high quality, {trigger}",
        palette.joined_hex()
    )
}

/// Run a batch, see [`run_with_progress`].
pub fn run(cfg: &BatchConfig, rasterizer: &mut dyn Rasterizer) -> GridArtResult<BatchResult> {
    run_with_progress(cfg, rasterizer, |_| {})
}

/// Generate, rasterize and caption `cfg.count` items, strictly in order.
///
/// Preconditions are checked before any item is generated. The first failing item aborts
/// the batch with [`GridArtError::Item`]; items written before it stay on disk.
#[tracing::instrument(skip_all, fields(count = cfg.count, out = %cfg.output_dir.display()))]
pub fn run_with_progress(
    cfg: &BatchConfig,
    rasterizer: &mut dyn Rasterizer,
    mut on_progress: impl FnMut(BatchProgress),
) -> GridArtResult<BatchResult> {
    cfg.validate()?;

    let total = cfg.count;
    tracing::info!(total, canvas = cfg.canvas_size, "starting batch");

    for index in 0..total {
        if let Err(e) = render_item(cfg, rasterizer, index) {
            tracing::error!(index, error = %e, "batch item failed");
            return Err(e.at_item(index));
        }

        let completed = index + 1;
        on_progress(BatchProgress { completed, total });
        if completed % PROGRESS_LOG_EVERY == 0 {
            tracing::info!(completed, total, "batch progress");
        }
    }

    tracing::info!(total, "batch complete");
    Ok(BatchResult {
        items_completed: total,
        total,
    })
}

fn render_item(
    cfg: &BatchConfig,
    rasterizer: &mut dyn Rasterizer,
    index: u64,
) -> GridArtResult<()> {
    let comp = generate(cfg.canvas_size, cfg.palette.colors())?;

    let image = {
        let svg_text = scene_to_svg(&comp.scene);
        let svg = TransientFile::write(cfg.svg_path(index), svg_text.as_bytes())?;
        rasterizer.rasterize(svg.path(), cfg.canvas_size)?
    };
    if image.width != cfg.canvas_size || image.height != cfg.canvas_size {
        return Err(GridArtError::rasterization(format!(
            "rasterizer returned {}x{}, expected {}x{}",
            image.width, image.height, cfg.canvas_size, cfg.canvas_size
        )));
    }
    image.save_png(&cfg.image_path(index))?;

    let caption = compose_caption(cfg.trigger(), &comp.summary, &cfg.palette);
    let caption_path = cfg.caption_path(index);
    std::fs::write(&caption_path, caption).map_err(|e| {
        GridArtError::io(format!("write caption '{}'", caption_path.display()), e)
    })?;

    tracing::debug!(index, summary = %comp.summary, "wrote item");
    Ok(())
}

/// File that is removed when dropped, on success and error paths alike.
struct TransientFile {
    path: PathBuf,
}

impl TransientFile {
    fn write(path: PathBuf, contents: &[u8]) -> GridArtResult<Self> {
        // Construct the guard first so a partial write is cleaned up too.
        let guard = Self { path };
        std::fs::write(&guard.path, contents)
            .map_err(|e| GridArtError::io(format!("write svg '{}'", guard.path.display()), e))?;
        Ok(guard)
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TransientFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to remove transient svg"
                );
            }
        }
    }
}
