use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    encode::format::OutputFormat,
    foundation::{
        core::{Canvas, Fps, Rgba8},
        error::{PendvizError, PendvizResult},
    },
};

/// Tunables for one rendering run.
///
/// Every field has a default, so a JSON config only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Raster size of the static trajectory plot.
    pub static_canvas: Canvas,
    /// Raster size of every animation frame.
    pub animation_canvas: Canvas,
    /// Frame sampler stride: every `stride`-th sample becomes a frame.
    pub stride: usize,
    /// Maximum trail length per mass.
    pub trail_capacity: usize,
    /// Playback rate of the animated artifact.
    pub fps: Fps,
    /// Factor applied to the global max |coordinate| to get the fixed animation axis limit.
    pub axis_margin: f64,
    /// Keep per-frame scratch rasters after a successful assembly.
    pub retain_frames: bool,
    /// Scratch raster directory; defaults to `<output-stem>_frames` beside the output.
    pub scratch_dir: Option<PathBuf>,
    /// Explicit output format; inferred from the output extension when unset.
    pub format: Option<OutputFormat>,
    /// Figure background.
    pub background: Rgba8,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            static_canvas: Canvas {
                width: 1200,
                height: 800,
            },
            animation_canvas: Canvas {
                width: 800,
                height: 800,
            },
            stride: 5,
            trail_capacity: 500,
            fps: Fps(60),
            axis_margin: 1.1,
            retain_frames: false,
            scratch_dir: None,
            format: None,
            background: Rgba8::WHITE,
        }
    }
}

impl RenderConfig {
    pub fn from_json_file(path: &Path) -> PendvizResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read render config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse render config '{}'", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> PendvizResult<()> {
        self.static_canvas.validate()?;
        self.animation_canvas.validate()?;
        if self.stride == 0 {
            return Err(PendvizError::validation("stride must be >= 1"));
        }
        if self.trail_capacity == 0 {
            return Err(PendvizError::validation("trail_capacity must be >= 1"));
        }
        Fps::new(self.fps.0)?;
        if !(self.axis_margin.is_finite() && self.axis_margin > 0.0) {
            return Err(PendvizError::validation(
                "axis_margin must be a finite positive number",
            ));
        }
        Ok(())
    }

    /// Scratch directory for an animation written to `output`.
    pub fn scratch_dir_for(&self, output: &Path) -> PathBuf {
        if let Some(dir) = &self.scratch_dir {
            return dir.clone();
        }
        let stem = output
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("animation");
        output.with_file_name(format!("{stem}_frames"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/config.rs"]
mod tests;
