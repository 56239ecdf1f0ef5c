use std::path::PathBuf;

use crate::{
    encode::{
        ffmpeg::{EncodeConfig, FfmpegEncoder},
        format::OutputFormat,
        gif::GifSequenceEncoder,
        scratch::ScratchFrames,
    },
    foundation::{
        core::{Canvas, Fps, Rgba8},
        error::{PendvizError, PendvizResult},
    },
    pipeline::progress::{ProgressObserver, ProgressTracker, Stage},
    render::surface::FrameRGBA,
};

/// Settings for one [`SequenceAssembler`] run.
#[derive(Clone, Debug)]
pub struct AssemblerConfig {
    pub out_path: PathBuf,
    /// Must be [`OutputFormat::Gif`] or [`OutputFormat::Mp4`].
    pub format: OutputFormat,
    pub fps: Fps,
    pub canvas: Canvas,
    pub background: Rgba8,
    pub retain_frames: bool,
    pub scratch_dir: PathBuf,
}

impl AssemblerConfig {
    pub fn validate(&self) -> PendvizResult<()> {
        self.canvas.validate()?;
        Fps::new(self.fps.0)?;
        match self.format {
            OutputFormat::Gif => Ok(()),
            OutputFormat::Mp4 => self.mp4_config().validate(),
            other => Err(PendvizError::validation(format!(
                "{} cannot hold an animation",
                other.extension()
            ))),
        }
    }

    fn mp4_config(&self) -> EncodeConfig {
        EncodeConfig {
            canvas: self.canvas,
            fps: self.fps,
            out_path: self.out_path.clone(),
            overwrite: true,
        }
    }
}

/// Summary of a finished assembly.
#[derive(Clone, Debug, PartialEq)]
pub struct AssemblyReport {
    pub output: PathBuf,
    pub format: OutputFormat,
    pub frames: usize,
    /// Directory holding the per-frame rasters, when they were kept.
    pub retained_scratch: Option<PathBuf>,
}

enum SequenceSink {
    Gif(GifSequenceEncoder),
    Mp4(FfmpegEncoder),
}

impl SequenceSink {
    fn open(cfg: &AssemblerConfig) -> PendvizResult<Self> {
        match cfg.format {
            OutputFormat::Mp4 => Ok(Self::Mp4(FfmpegEncoder::new(
                cfg.mp4_config(),
                cfg.background,
            )?)),
            _ => Ok(Self::Gif(GifSequenceEncoder::new(
                cfg.out_path.clone(),
                cfg.canvas,
                cfg.fps,
                cfg.background,
            )?)),
        }
    }

    fn push(&mut self, frame: &FrameRGBA) -> PendvizResult<()> {
        match self {
            Self::Gif(enc) => enc.encode_frame(frame),
            Self::Mp4(enc) => enc.encode_frame(frame),
        }
    }

    fn finish(self) -> PendvizResult<()> {
        match self {
            Self::Gif(enc) => enc.finish(),
            Self::Mp4(enc) => enc.finish(),
        }
    }
}

/// Collects rendered frames as scratch rasters and joins them into one animated artifact.
///
/// Frames are encoded in the order they were added. Scratch rasters are removed on every exit
/// path unless `retain_frames` is set.
pub struct SequenceAssembler {
    cfg: AssemblerConfig,
    scratch: ScratchFrames,
}

impl SequenceAssembler {
    pub fn new(cfg: AssemblerConfig) -> PendvizResult<Self> {
        cfg.validate()?;
        let scratch = ScratchFrames::create(cfg.scratch_dir.clone(), cfg.retain_frames)?;
        Ok(Self { cfg, scratch })
    }

    pub fn frames(&self) -> usize {
        self.scratch.files().len()
    }

    pub fn add_frame(&mut self, frame: &FrameRGBA) -> PendvizResult<()> {
        let position = self.frames();
        if frame.width != self.cfg.canvas.width || frame.height != self.cfg.canvas.height {
            return Err(PendvizError::encoding_at(
                position,
                format!(
                    "frame size mismatch: got {}x{}, expected {}x{}",
                    frame.width, frame.height, self.cfg.canvas.width, self.cfg.canvas.height
                ),
            ));
        }
        self.scratch.write(position, frame, self.cfg.background)?;
        Ok(())
    }

    #[tracing::instrument(skip_all, fields(out = %self.cfg.out_path.display(), frames = self.frames()))]
    pub fn finish(self, progress: &mut dyn ProgressObserver) -> PendvizResult<AssemblyReport> {
        let frames = self.frames();
        if frames == 0 {
            return Err(PendvizError::encoding("no frames to assemble"));
        }

        // Declared before the sink so a failed sink is torn down before the file is removed.
        let mut partial = PartialOutput(Some(self.cfg.out_path.clone()));
        let mut sink = SequenceSink::open(&self.cfg)?;
        let mut tracker = ProgressTracker::new(progress, Stage::Encode, frames);
        for position in 0..frames {
            let frame = self.scratch.read(position)?;
            sink.push(&frame).map_err(|e| tag_frame(e, position))?;
            tracker.advance(position + 1);
        }
        sink.finish()?;
        partial.keep();
        tracker.finish();

        tracing::info!(
            format = self.cfg.format.extension(),
            frames,
            "animation written"
        );

        Ok(AssemblyReport {
            output: self.cfg.out_path.clone(),
            format: self.cfg.format,
            frames,
            retained_scratch: self
                .scratch
                .retains()
                .then(|| self.scratch.dir().to_path_buf()),
        })
    }
}

/// Removes a half-written artifact unless [`keep`](Self::keep) is called.
struct PartialOutput(Option<PathBuf>);

impl PartialOutput {
    fn keep(&mut self) {
        self.0 = None;
    }
}

impl Drop for PartialOutput {
    fn drop(&mut self) {
        if let Some(path) = self.0.take()
            && std::fs::remove_file(&path).is_ok()
        {
            tracing::warn!(path = %path.display(), "removed incomplete animation");
        }
    }
}

fn tag_frame(err: PendvizError, position: usize) -> PendvizError {
    match err {
        PendvizError::Encoding {
            frame: None,
            message,
        } => PendvizError::Encoding {
            frame: Some(position),
            message,
        },
        other => other,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/assembler.rs"]
mod tests;
