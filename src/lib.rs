//! Pendviz renders double-pendulum simulation traces.
//!
//! A run reads a plain-text position trace (and, optionally, an angle trace) and produces either
//! one static trajectory plot or an animated GIF/MP4 of the motion.
//!
//! # Pipeline overview
//!
//! 1. **Read**: trace files -> [`PositionTrace`] / [`AngleTrace`] + [`ConfigMetadata`]
//! 2. **Static**: full trace -> one raster ([`render_static`])
//! 3. **Animated**: [`FrameSchedule`] -> [`AnimatedRenderer`] (with a [`TrailBuffer`]) ->
//!    [`SequenceAssembler`]
//!
//! The pipeline is single-threaded and deterministic for a given input. Progress is reported
//! through [`ProgressObserver`] and never influences results.
#![forbid(unsafe_code)]

mod encode {
    pub mod assembler;
    pub mod ffmpeg;
    pub mod format;
    pub mod gif;
    pub mod scratch;
}
mod foundation {
    pub mod core;
    pub mod error;
}
mod pipeline {
    pub mod config;
    pub mod progress;
    pub mod session;
}
mod plot {
    pub mod axes;
    pub mod layout;
    pub mod text;
}
mod render {
    pub mod animated;
    pub mod static_plot;
    pub mod surface;
}
mod schedule {
    pub mod sampler;
}
mod trace {
    pub mod model;
    pub mod reader;
}
mod trail {
    pub mod buffer;
}

pub use encode::assembler::{AssemblerConfig, AssemblyReport, SequenceAssembler};
pub use encode::ffmpeg::{EncodeConfig, FfmpegEncoder, ensure_parent_dir, is_ffmpeg_on_path};
pub use encode::format::{
    OutputFormat, resolve_animated_output, resolve_static_output, write_raster,
};
pub use encode::gif::GifSequenceEncoder;
pub use encode::scratch::ScratchFrames;
pub use foundation::core::{Canvas, Fps, Point, Rect, Rgba8};
pub use foundation::error::{PendvizError, PendvizResult};
pub use pipeline::config::RenderConfig;
pub use pipeline::progress::{
    LogProgress, NoProgress, ProgressObserver, ProgressTracker, Stage,
};
pub use pipeline::session::{
    RenderMode, RenderOutcome, RenderRequest, RenderSession, derive_angle_path,
};
pub use plot::axes::{AxesLabels, LegendEntry, Swatch, data_area, draw_axes, draw_legend};
pub use plot::layout::{DataBounds, Projection, format_tick, ticks};
pub use plot::text::{Anchor, TextItem, TextRasterizer};
pub use render::animated::{AnimatedRenderer, animation_title, fixed_bounds};
pub use render::static_plot::{render_static, trajectory_title};
pub use render::surface::{FrameRGBA, Surface};
pub use schedule::sampler::FrameSchedule;
pub use trace::model::{
    AngleSample, AngleTrace, ConfigMetadata, PositionSample, PositionTrace, UNKNOWN_VALUE,
};
pub use trace::reader::{
    parse_angle_trace, parse_position_trace, read_angle_trace, read_angle_trace_optional,
    read_position_trace,
};
pub use trail::buffer::{Mass, TrailBuffer, TrailWindow};
