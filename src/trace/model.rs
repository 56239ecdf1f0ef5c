use std::collections::BTreeMap;

use crate::foundation::core::Point;

/// Placeholder rendered in labels for metadata keys the trace did not carry.
pub const UNKNOWN_VALUE: &str = "unknown";

/// `key=value` metadata extracted from comment header lines (e.g. `L1`, `L2`).
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ConfigMetadata(pub BTreeMap<String, f64>);

impl ConfigMetadata {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        self.0.insert(key.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Label-ready value: two decimals, or [`UNKNOWN_VALUE`] when absent.
    pub fn display_value(&self, key: &str) -> String {
        match self.get(key) {
            Some(v) => format!("{v:.2}"),
            None => UNKNOWN_VALUE.to_string(),
        }
    }

    /// `L1=<v>m, L2=<v>m`, used by plot titles.
    pub fn arm_lengths_label(&self) -> String {
        format!(
            "L1={}m, L2={}m",
            self.display_value("L1"),
            self.display_value("L2")
        )
    }
}

/// One line of the position trace: time and the Cartesian positions of both masses.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PositionSample {
    pub t: f64,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl PositionSample {
    pub fn mass1(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn mass2(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    fn max_abs(&self) -> f64 {
        self.x1
            .abs()
            .max(self.y1.abs())
            .max(self.x2.abs())
            .max(self.y2.abs())
    }
}

/// One line of the optional angle trace.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AngleSample {
    pub t: f64,
    pub theta1: f64,
    pub theta2: f64,
}

/// Ordered position samples in file order; the order is playback order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PositionTrace {
    samples: Vec<PositionSample>,
}

impl PositionTrace {
    pub fn new(samples: Vec<PositionSample>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[PositionSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PositionSample> {
        self.samples.get(index)
    }

    pub fn first(&self) -> Option<&PositionSample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&PositionSample> {
        self.samples.last()
    }

    /// Largest absolute coordinate of either mass over the whole trace (0.0 when empty).
    pub fn max_abs_coord(&self) -> f64 {
        self.samples
            .iter()
            .map(PositionSample::max_abs)
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max)
    }

    pub fn mass1_path(&self) -> impl Iterator<Item = Point> + '_ {
        self.samples.iter().map(PositionSample::mass1)
    }

    pub fn mass2_path(&self) -> impl Iterator<Item = Point> + '_ {
        self.samples.iter().map(PositionSample::mass2)
    }
}

/// Ordered angle samples; independent of the position trace (never index-aligned implicitly).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AngleTrace {
    samples: Vec<AngleSample>,
}

impl AngleTrace {
    pub fn new(samples: Vec<AngleSample>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[AngleSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// θ1–θ2 phase trajectory.
    pub fn phase_path(&self) -> impl Iterator<Item = Point> + '_ {
        self.samples.iter().map(|s| Point::new(s.theta1, s.theta2))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/trace/model.rs"]
mod tests;
