use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
    sync::{Arc, Mutex},
};

use anyhow::Context as _;
use image::codecs::gif::{GifEncoder, Repeat};

use crate::{
    encode::ffmpeg::ensure_parent_dir,
    foundation::{
        core::{Canvas, Fps, Rgba8},
        error::{PendvizError, PendvizResult},
    },
    render::surface::FrameRGBA,
};

/// Quantisation speed handed to the GIF encoder (1 = best quality, 30 = fastest).
const GIF_SPEED: i32 = 10;

/// First write error seen by a [`CheckedFile`], shared with the encoder that owns it.
#[derive(Clone, Debug, Default)]
struct WriteStatus(Arc<Mutex<Option<String>>>);

impl WriteStatus {
    fn record(&self, err: &io::Error) {
        if let Ok(mut slot) = self.0.lock()
            && slot.is_none()
        {
            *slot = Some(err.to_string());
        }
    }

    fn error(&self) -> Option<String> {
        self.0.lock().ok().and_then(|slot| slot.clone())
    }
}

/// Buffered file whose write and flush errors stay visible after `GifEncoder` swallows them in
/// its own `Drop`.
struct CheckedFile {
    inner: BufWriter<File>,
    status: WriteStatus,
}

impl Write for CheckedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf).inspect_err(|e| self.status.record(e))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush().inspect_err(|e| self.status.record(e))
    }
}

impl Drop for CheckedFile {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// Looping animated GIF writer with a constant per-frame delay.
pub struct GifSequenceEncoder {
    canvas: Canvas,
    delay: image::Delay,
    bg: Rgba8,
    out_path: PathBuf,
    encoder: GifEncoder<CheckedFile>,
    status: WriteStatus,
}

impl GifSequenceEncoder {
    pub fn new(out_path: PathBuf, canvas: Canvas, fps: Fps, bg: Rgba8) -> PendvizResult<Self> {
        canvas.validate()?;
        let fps = Fps::new(fps.0)?;
        ensure_parent_dir(&out_path)?;

        let file = File::create(&out_path)
            .with_context(|| format!("create gif '{}'", out_path.display()))?;
        let status = WriteStatus::default();
        let sink = CheckedFile {
            inner: BufWriter::new(file),
            status: status.clone(),
        };
        let mut encoder = GifEncoder::new_with_speed(sink, GIF_SPEED);
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| PendvizError::encoding(format!("configure gif looping: {e}")))?;

        let (numer, denom) = fps.frame_delay_ms();
        Ok(Self {
            canvas,
            delay: image::Delay::from_numer_denom_ms(numer, denom),
            bg,
            out_path,
            encoder,
            status,
        })
    }

    pub fn encode_frame(&mut self, frame: &FrameRGBA) -> PendvizResult<()> {
        if frame.width != self.canvas.width || frame.height != self.canvas.height {
            return Err(PendvizError::encoding(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.canvas.width, self.canvas.height
            )));
        }
        let rgba = frame.to_opaque_rgba8(self.bg)?;
        let buffer = image::RgbaImage::from_raw(frame.width, frame.height, rgba)
            .ok_or_else(|| PendvizError::encoding("frame buffer does not match its dimensions"))?;
        self.encoder
            .encode_frame(image::Frame::from_parts(buffer, 0, 0, self.delay))
            .map_err(|e| {
                PendvizError::encoding(format!(
                    "write gif frame to '{}': {e}",
                    self.out_path.display()
                ))
            })?;
        self.check_writes()
    }

    /// Writes the trailer and flushes the file; any write error seen along the way fails here.
    pub fn finish(self) -> PendvizResult<()> {
        let Self {
            encoder,
            status,
            out_path,
            ..
        } = self;
        // Dropping the encoder writes the trailer, then drops the file, which flushes it.
        drop(encoder);
        match status.error() {
            Some(err) => Err(PendvizError::encoding(format!(
                "write gif '{}': {err}",
                out_path.display()
            ))),
            None => Ok(()),
        }
    }

    fn check_writes(&self) -> PendvizResult<()> {
        match self.status.error() {
            Some(err) => Err(PendvizError::encoding(format!(
                "write gif '{}': {err}",
                self.out_path.display()
            ))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
