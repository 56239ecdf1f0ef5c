use std::path::{Path, PathBuf};

use crate::{
    encode::{
        assembler::{AssemblerConfig, SequenceAssembler},
        format::{OutputFormat, resolve_animated_output, resolve_static_output, write_raster},
    },
    foundation::error::{PendvizError, PendvizResult},
    pipeline::{
        config::RenderConfig,
        progress::{ProgressObserver, ProgressTracker, Stage},
    },
    plot::text::TextRasterizer,
    render::{animated::AnimatedRenderer, static_plot::render_static},
    schedule::sampler::FrameSchedule,
    trace::reader::{read_angle_trace_optional, read_position_trace},
};

const ANGLE_SUFFIX: &str = "_angles";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    Static,
    Animated,
}

/// Inputs of one run.
#[derive(Clone, Debug)]
pub struct RenderRequest {
    pub trace: PathBuf,
    /// Angle trace for the phase panel; derived from `trace` when unset.
    pub angles: Option<PathBuf>,
    pub output: PathBuf,
    pub mode: RenderMode,
}

impl RenderRequest {
    pub fn new(trace: impl Into<PathBuf>, output: impl Into<PathBuf>, mode: RenderMode) -> Self {
        Self {
            trace: trace.into(),
            angles: None,
            output: output.into(),
            mode,
        }
    }

    pub fn with_angles(mut self, angles: impl Into<PathBuf>) -> Self {
        self.angles = Some(angles.into());
        self
    }

    pub fn angle_path(&self) -> PathBuf {
        self.angles
            .clone()
            .unwrap_or_else(|| derive_angle_path(&self.trace))
    }
}

/// What a finished run produced.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderOutcome {
    /// Final artifact path (its extension may differ from the requested one).
    pub output: PathBuf,
    pub format: OutputFormat,
    /// Frames written: 1 for a static plot.
    pub frames: usize,
    /// Samples in the position trace.
    pub samples: usize,
    pub phase_panel: bool,
    /// Retained scratch directory, if any.
    pub scratch_dir: Option<PathBuf>,
}

/// `<stem>_angles.<ext>` beside `trace`.
pub fn derive_angle_path(trace: &Path) -> PathBuf {
    let stem = trace
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match trace.extension() {
        Some(ext) => format!("{stem}{ANGLE_SUFFIX}.{}", ext.to_string_lossy()),
        None => format!("{stem}{ANGLE_SUFFIX}"),
    };
    trace.with_file_name(name)
}

/// Owns the configuration and the font database for a sequence of runs.
pub struct RenderSession {
    config: RenderConfig,
    text: TextRasterizer,
}

impl RenderSession {
    /// Session with system fonts loaded.
    pub fn new(config: RenderConfig) -> PendvizResult<Self> {
        Self::with_text_rasterizer(config, TextRasterizer::with_system_fonts())
    }

    pub fn with_text_rasterizer(config: RenderConfig, text: TextRasterizer) -> PendvizResult<Self> {
        config.validate()?;
        if text.face_count() == 0 {
            tracing::warn!("no system fonts found; labels will not be drawn");
        }
        Ok(Self { config, text })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Read the trace and produce the requested artifact.
    ///
    /// An empty position trace yields [`PendvizError::EmptyTrace`] before any renderer runs.
    #[tracing::instrument(skip_all, fields(trace = %req.trace.display(), mode = ?req.mode))]
    pub fn run(
        &self,
        req: &RenderRequest,
        progress: &mut dyn ProgressObserver,
    ) -> PendvizResult<RenderOutcome> {
        let (positions, meta) = read_position_trace(&req.trace, progress)?;
        if positions.is_empty() {
            return Err(PendvizError::EmptyTrace {
                path: req.trace.clone(),
            });
        }
        let samples = positions.len();

        match req.mode {
            RenderMode::Static => {
                let (output, format) = resolve_static_output(&req.output, self.config.format)?;
                let angles = read_angle_trace_optional(&req.angle_path(), progress);
                let frame = render_static(
                    &positions,
                    angles.as_ref().map(|(a, _)| a),
                    &meta,
                    self.config.static_canvas,
                    self.config.background,
                    &self.text,
                    progress,
                )?;
                write_raster(&frame, &output, format, self.config.background)?;
                progress.on_progress(Stage::RenderStatic, 100);
                tracing::info!(output = %output.display(), "static plot written");
                Ok(RenderOutcome {
                    output,
                    format,
                    frames: 1,
                    samples,
                    phase_panel: angles.is_some(),
                    scratch_dir: None,
                })
            }
            RenderMode::Animated => {
                let (output, format) = resolve_animated_output(&req.output, self.config.format);
                let schedule = FrameSchedule::new(samples, self.config.stride)?;
                let mut renderer = AnimatedRenderer::new(
                    &positions,
                    &meta,
                    self.config.animation_canvas,
                    self.config.background,
                    self.config.axis_margin,
                    self.config.trail_capacity,
                    &self.text,
                )?;
                let mut assembler = SequenceAssembler::new(AssemblerConfig {
                    out_path: output.clone(),
                    format,
                    fps: self.config.fps,
                    canvas: self.config.animation_canvas,
                    background: self.config.background,
                    retain_frames: self.config.retain_frames,
                    scratch_dir: self.config.scratch_dir_for(&output),
                })?;

                let mut tracker = ProgressTracker::new(progress, Stage::RenderFrames, schedule.len());
                for (position, index) in schedule.iter().enumerate() {
                    let frame = renderer
                        .render_frame(index)
                        .map_err(|e| PendvizError::encoding_at(position, e.to_string()))?;
                    assembler.add_frame(&frame)?;
                    tracker.advance(position + 1);
                }
                tracker.finish();

                let report = assembler.finish(progress)?;
                Ok(RenderOutcome {
                    output: report.output,
                    format: report.format,
                    frames: report.frames,
                    samples,
                    phase_panel: false,
                    scratch_dir: report.retained_scratch,
                })
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/session.rs"]
mod tests;
