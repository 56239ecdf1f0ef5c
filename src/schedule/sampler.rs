use crate::foundation::error::{PendvizError, PendvizResult};

/// Trace indices to render, chosen at a fixed stride.
///
/// Always starts at 0, strictly increasing, last index `<= len - 1`, and holds `ceil(len / stride)`
/// entries. The stride is never derived from the trace length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameSchedule {
    indices: Vec<usize>,
    stride: usize,
    source_len: usize,
}

impl FrameSchedule {
    pub fn new(source_len: usize, stride: usize) -> PendvizResult<Self> {
        if stride == 0 {
            return Err(PendvizError::validation("frame stride must be >= 1"));
        }
        let indices: Vec<usize> = (0..source_len).step_by(stride).collect();
        tracing::debug!(source_len, stride, frames = indices.len(), "frame schedule built");
        Ok(Self {
            indices,
            stride,
            source_len,
        })
    }

    /// Number of frames a trace of `source_len` samples yields at `stride` (`ceil(len / stride)`).
    pub fn frame_count(source_len: usize, stride: usize) -> usize {
        if stride == 0 {
            return 0;
        }
        source_len.div_ceil(stride)
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn source_len(&self) -> usize {
        self.source_len
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/sampler.rs"]
mod tests;
