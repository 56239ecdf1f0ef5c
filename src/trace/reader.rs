use std::path::Path;

use anyhow::Context as _;

use crate::{
    foundation::error::{PendvizError, PendvizResult},
    pipeline::progress::{NoProgress, ProgressObserver, ProgressTracker, Stage},
    trace::model::{AngleSample, AngleTrace, ConfigMetadata, PositionSample, PositionTrace},
};

const COMMENT_MARKER: char = '#';

/// A fixed-width numeric row of a trace file.
trait TraceRow: Sized {
    const COLUMNS: &'static str;

    fn from_fields(fields: &[f64]) -> Option<Self>;
}

impl TraceRow for PositionSample {
    const COLUMNS: &'static str = "t x1 y1 x2 y2";

    fn from_fields(fields: &[f64]) -> Option<Self> {
        match *fields {
            [t, x1, y1, x2, y2] => Some(Self { t, x1, y1, x2, y2 }),
            _ => None,
        }
    }
}

impl TraceRow for AngleSample {
    const COLUMNS: &'static str = "t theta1 theta2";

    fn from_fields(fields: &[f64]) -> Option<Self> {
        match *fields {
            [t, theta1, theta2] => Some(Self { t, theta1, theta2 }),
            _ => None,
        }
    }
}

/// Parse position trace text. `source` is only used in diagnostics.
pub fn parse_position_trace(
    text: &str,
    source: &Path,
) -> PendvizResult<(PositionTrace, ConfigMetadata)> {
    let (rows, meta) = parse_rows::<PositionSample>(text, source, &mut NoProgress, Stage::ReadTrace)?;
    Ok((PositionTrace::new(rows), meta))
}

/// Parse angle trace text. `source` is only used in diagnostics.
pub fn parse_angle_trace(text: &str, source: &Path) -> PendvizResult<(AngleTrace, ConfigMetadata)> {
    let (rows, meta) = parse_rows::<AngleSample>(text, source, &mut NoProgress, Stage::ReadAngles)?;
    Ok((AngleTrace::new(rows), meta))
}

/// Read the primary position trace.
///
/// A missing file or any malformed line is fatal. An empty result is returned as-is; the caller
/// decides how to report it.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn read_position_trace(
    path: &Path,
    progress: &mut dyn ProgressObserver,
) -> PendvizResult<(PositionTrace, ConfigMetadata)> {
    let text = read_text(path)?;
    let (rows, meta) = parse_rows::<PositionSample>(&text, path, progress, Stage::ReadTrace)?;
    tracing::info!(samples = rows.len(), metadata_keys = meta.len(), "position trace loaded");
    Ok((PositionTrace::new(rows), meta))
}

/// Read an angle trace strictly (errors are returned, not absorbed).
pub fn read_angle_trace(
    path: &Path,
    progress: &mut dyn ProgressObserver,
) -> PendvizResult<(AngleTrace, ConfigMetadata)> {
    let text = read_text(path)?;
    let (rows, meta) = parse_rows::<AngleSample>(&text, path, progress, Stage::ReadAngles)?;
    Ok((AngleTrace::new(rows), meta))
}

/// Read the optional angle trace, degrading to `None` on any problem.
///
/// Missing, unreadable, malformed or empty angle files are logged as warnings and disable the
/// phase-space panel; they never abort the run.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn read_angle_trace_optional(
    path: &Path,
    progress: &mut dyn ProgressObserver,
) -> Option<(AngleTrace, ConfigMetadata)> {
    if !path.is_file() {
        tracing::warn!("angle trace not found; phase-space panel disabled");
        return None;
    }
    match read_angle_trace(path, progress) {
        Ok((trace, _)) if trace.is_empty() => {
            tracing::warn!("angle trace has no samples; phase-space panel disabled");
            None
        }
        Ok((trace, meta)) => {
            tracing::info!(samples = trace.len(), "angle trace loaded");
            Some((trace, meta))
        }
        Err(err) => {
            tracing::warn!(error = %err, "angle trace unusable; phase-space panel disabled");
            None
        }
    }
}

fn read_text(path: &Path) -> PendvizResult<String> {
    if !path.exists() {
        return Err(PendvizError::input(format!(
            "cannot find trace file '{}'",
            path.display()
        )));
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read trace file '{}'", path.display()))?;
    Ok(text)
}

fn parse_rows<R: TraceRow>(
    text: &str,
    source: &Path,
    progress: &mut dyn ProgressObserver,
    stage: Stage,
) -> PendvizResult<(Vec<R>, ConfigMetadata)> {
    let lines: Vec<&str> = text.lines().collect();
    let mut tracker = ProgressTracker::new(progress, stage, lines.len());
    let mut rows = Vec::new();
    let mut meta = ConfigMetadata::default();
    let mut fields = Vec::with_capacity(8);

    for (idx, raw) in lines.iter().enumerate() {
        tracker.advance(idx);
        let line_no = idx + 1;
        let line = raw.trim();

        if let Some(comment) = line.strip_prefix(COMMENT_MARKER) {
            parse_metadata_comment(comment, &mut meta)
                .map_err(|msg| input_error(source, line_no, &msg))?;
            continue;
        }
        if line.is_empty() {
            continue;
        }

        fields.clear();
        for token in line.split_whitespace() {
            let v: f64 = token.parse().map_err(|_| {
                input_error(source, line_no, &format!("invalid number '{token}'"))
            })?;
            fields.push(v);
        }
        let row = R::from_fields(&fields).ok_or_else(|| {
            input_error(
                source,
                line_no,
                &format!(
                    "expected {} columns ({}), found {}",
                    R::COLUMNS.split(' ').count(),
                    R::COLUMNS,
                    fields.len()
                ),
            )
        })?;
        rows.push(row);
    }

    tracker.finish();
    Ok((rows, meta))
}

/// Only comments carrying both `L1=` and `L2=` are treated as metadata; all others are ignored.
fn parse_metadata_comment(comment: &str, meta: &mut ConfigMetadata) -> Result<(), String> {
    if !(comment.contains("L1=") && comment.contains("L2=")) {
        return Ok(());
    }
    for part in comment.split_whitespace() {
        let Some((key, value)) = part.split_once('=') else {
            continue;
        };
        let v: f64 = value
            .parse()
            .map_err(|_| format!("invalid metadata value '{part}'"))?;
        meta.insert(key, v);
    }
    Ok(())
}

fn input_error(source: &Path, line_no: usize, msg: &str) -> PendvizError {
    PendvizError::input(format!("{}:{line_no}: {msg}", source.display()))
}

#[cfg(test)]
#[path = "../../tests/unit/trace/reader.rs"]
mod tests;
