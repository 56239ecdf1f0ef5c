use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    encode::ffmpeg::ensure_parent_dir,
    foundation::{
        core::Rgba8,
        error::{PendvizError, PendvizResult},
    },
    render::surface::FrameRGBA,
};

/// Container format of the produced artifact.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Jpeg,
    Gif,
    Mp4,
}

impl OutputFormat {
    /// Optional convenience mapping from a file extension (case-insensitive).
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "gif" => Some(Self::Gif),
            "mp4" => Some(Self::Mp4),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Mp4 => "mp4",
        }
    }

    /// Can hold a multi-frame sequence.
    pub fn is_animated_capable(self) -> bool {
        matches!(self, Self::Gif | Self::Mp4)
    }

    /// Can hold a single still raster.
    pub fn is_still_capable(self) -> bool {
        matches!(self, Self::Png | Self::Jpeg | Self::Gif)
    }
}

/// Output path and format for animated mode.
///
/// Still-only formats (and unknown extensions) are remapped to GIF instead of failing; the path's
/// extension is rewritten to match the chosen format.
pub fn resolve_animated_output(
    path: &Path,
    explicit: Option<OutputFormat>,
) -> (PathBuf, OutputFormat) {
    let requested = explicit.or_else(|| OutputFormat::from_extension(path));
    let format = match requested {
        Some(f) if f.is_animated_capable() => f,
        other => {
            if let Some(f) = other {
                tracing::info!(
                    from = f.extension(),
                    "still-image format requested for an animation; writing gif instead"
                );
            }
            OutputFormat::Gif
        }
    };
    (with_format_extension(path, format), format)
}

/// Output path and format for static mode. MP4 cannot hold a still plot.
pub fn resolve_static_output(
    path: &Path,
    explicit: Option<OutputFormat>,
) -> PendvizResult<(PathBuf, OutputFormat)> {
    let format = explicit
        .or_else(|| OutputFormat::from_extension(path))
        .unwrap_or(OutputFormat::Png);
    if !format.is_still_capable() {
        return Err(PendvizError::validation(format!(
            "{} output requires animated mode",
            format.extension()
        )));
    }
    Ok((with_format_extension(path, format), format))
}

fn with_format_extension(path: &Path, format: OutputFormat) -> PathBuf {
    if OutputFormat::from_extension(path) == Some(format) {
        return path.to_path_buf();
    }
    path.with_extension(format.extension())
}

/// Write one raster, flattened to opaque over `bg`.
pub fn write_raster(
    frame: &FrameRGBA,
    path: &Path,
    format: OutputFormat,
    bg: Rgba8,
) -> PendvizResult<()> {
    let rgba = frame.to_opaque_rgba8(bg)?;
    let (bytes, color, image_format) = match format {
        OutputFormat::Png => (rgba, image::ColorType::Rgba8, image::ImageFormat::Png),
        OutputFormat::Gif => (rgba, image::ColorType::Rgba8, image::ImageFormat::Gif),
        OutputFormat::Jpeg => {
            let rgb: Vec<u8> = rgba
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect();
            (rgb, image::ColorType::Rgb8, image::ImageFormat::Jpeg)
        }
        OutputFormat::Mp4 => {
            return Err(PendvizError::validation(
                "mp4 cannot store a single raster",
            ));
        }
    };

    ensure_parent_dir(path)?;
    image::save_buffer_with_format(
        path,
        &bytes,
        frame.width,
        frame.height,
        color,
        image_format,
    )
    .with_context(|| format!("write {} '{}'", format.extension(), path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/format.rs"]
mod tests;
