use std::path::{Path, PathBuf};

use crate::{
    encode::format::{OutputFormat, write_raster},
    foundation::{
        core::Rgba8,
        error::{PendvizError, PendvizResult},
    },
    render::surface::FrameRGBA,
};

const FRAME_PREFIX: &str = "frame_";

/// Per-frame scratch rasters for one assembly run.
///
/// Dropping the guard removes every raster it wrote (and the directory, if it created it) unless
/// retention was requested. This holds on success and on error paths alike.
#[derive(Debug)]
pub struct ScratchFrames {
    dir: PathBuf,
    created_dir: bool,
    files: Vec<PathBuf>,
    retain: bool,
}

impl ScratchFrames {
    pub fn create(dir: impl Into<PathBuf>, retain: bool) -> PendvizResult<Self> {
        use anyhow::Context as _;

        let dir = dir.into();
        let created_dir = !dir.exists();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create scratch directory '{}'", dir.display()))?;

        let stale = remove_stale_frames(&dir);
        if stale > 0 {
            tracing::debug!(dir = %dir.display(), stale, "removed stale scratch rasters");
        }

        Ok(Self {
            dir,
            created_dir,
            files: Vec::new(),
            retain,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn retains(&self) -> bool {
        self.retain
    }

    pub fn frame_path(&self, position: usize) -> PathBuf {
        self.dir.join(format!("{FRAME_PREFIX}{position:06}.png"))
    }

    /// Persist the raster for schedule position `position`.
    pub fn write(&mut self, position: usize, frame: &FrameRGBA, bg: Rgba8) -> PendvizResult<&Path> {
        let path = self.frame_path(position);
        if let Err(e) = write_raster(frame, &path, OutputFormat::Png, bg) {
            // A failed write may leave a truncated raster behind.
            let _ = std::fs::remove_file(&path);
            return Err(PendvizError::encoding_at(
                position,
                format!("write scratch raster: {e}"),
            ));
        }
        self.files.push(path);
        Ok(self.files[self.files.len() - 1].as_path())
    }

    /// Read back the raster for `position` as straight RGBA.
    pub fn read(&self, position: usize) -> PendvizResult<FrameRGBA> {
        let path = self.files.get(position).ok_or_else(|| {
            PendvizError::encoding_at(position, "scratch raster was never written")
        })?;
        let img = image::open(path)
            .map_err(|e| {
                PendvizError::encoding_at(
                    position,
                    format!("read scratch raster '{}': {e}", path.display()),
                )
            })?
            .to_rgba8();
        Ok(FrameRGBA {
            width: img.width(),
            height: img.height(),
            data: img.into_raw(),
            premultiplied: false,
        })
    }

    fn cleanup(&mut self) {
        for path in self.files.drain(..) {
            if let Err(e) = std::fs::remove_file(&path) {
                tracing::warn!(path = %path.display(), error = %e, "failed to remove scratch raster");
            }
        }
        if self.created_dir {
            // Fails harmlessly if something else was put in the directory.
            let _ = std::fs::remove_dir(&self.dir);
        }
    }
}

impl Drop for ScratchFrames {
    fn drop(&mut self) {
        if self.retain {
            tracing::info!(
                dir = %self.dir.display(),
                frames = self.files.len(),
                "scratch rasters retained"
            );
            return;
        }
        self.cleanup();
    }
}

fn remove_stale_frames(dir: &Path) -> usize {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return 0;
    };
    let mut removed = 0;
    for entry in rd.flatten() {
        let path = entry.path();
        let is_frame = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(FRAME_PREFIX) && n.ends_with(".png"));
        if is_frame && path.is_file() && std::fs::remove_file(&path).is_ok() {
            removed += 1;
        }
    }
    removed
}

#[cfg(test)]
#[path = "../../tests/unit/encode/scratch.rs"]
mod tests;
