/// Long-running stage a progress report refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    ReadTrace,
    ReadAngles,
    RenderStatic,
    RenderFrames,
    Encode,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Stage::ReadTrace => "reading trace",
            Stage::ReadAngles => "reading angles",
            Stage::RenderStatic => "rendering plot",
            Stage::RenderFrames => "rendering frames",
            Stage::Encode => "encoding",
        }
    }
}

/// Side channel for coarse-grained progress.
///
/// Observers only receive reports; nothing they do feeds back into rendering.
pub trait ProgressObserver {
    fn on_progress(&mut self, stage: Stage, percent: u8);
}

impl<F> ProgressObserver for F
where
    F: FnMut(Stage, u8),
{
    fn on_progress(&mut self, stage: Stage, percent: u8) {
        self(stage, percent)
    }
}

/// Discards every report.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&mut self, _stage: Stage, _percent: u8) {}
}

/// Forwards reports to `tracing` at INFO, throttled to `step` percent.
#[derive(Clone, Debug)]
pub struct LogProgress {
    step: u8,
    last: Option<(Stage, u8)>,
}

impl LogProgress {
    pub fn new(step: u8) -> Self {
        Self {
            step: step.clamp(1, 100),
            last: None,
        }
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new(10)
    }
}

impl ProgressObserver for LogProgress {
    fn on_progress(&mut self, stage: Stage, percent: u8) {
        let due = match self.last {
            Some((s, p)) if s == stage => percent == 100 || percent >= p.saturating_add(self.step),
            _ => true,
        };
        if due {
            tracing::info!(stage = stage.label(), "{}%", percent);
            self.last = Some((stage, percent));
        }
    }
}

/// Per-stage helper that turns `done / total` counts into monotonically increasing percentages.
pub struct ProgressTracker<'a> {
    observer: &'a mut dyn ProgressObserver,
    stage: Stage,
    total: usize,
    last: Option<u8>,
}

impl<'a> ProgressTracker<'a> {
    pub fn new(observer: &'a mut dyn ProgressObserver, stage: Stage, total: usize) -> Self {
        Self {
            observer,
            stage,
            total,
            last: None,
        }
    }

    /// Report that `done` of `total` units are complete; only forwards on a percentage change.
    pub fn advance(&mut self, done: usize) {
        let percent = if self.total == 0 {
            100
        } else {
            ((done.min(self.total) as u128 * 100) / self.total as u128) as u8
        };
        if self.last.is_some_and(|p| percent <= p) {
            return;
        }
        self.last = Some(percent);
        self.observer.on_progress(self.stage, percent);
    }

    pub fn finish(mut self) {
        self.advance(self.total);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/progress.rs"]
mod tests;
