use crate::foundation::core::{Point, Rect};

/// Axis-aligned data-space extent of a panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DataBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl DataBounds {
    /// `[-half, half]` on both axes; `half` falls back to 1.0 when not strictly positive.
    pub fn symmetric(half: f64) -> Self {
        let half = if half.is_finite() && half > 0.0 { half } else { 1.0 };
        Self {
            min_x: -half,
            max_x: half,
            min_y: -half,
            max_y: half,
        }
    }

    /// Tight bounds of the finite points, or `None` when there are none.
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut out: Option<Self> = None;
        for p in points {
            if !(p.x.is_finite() && p.y.is_finite()) {
                continue;
            }
            out = Some(match out {
                None => Self {
                    min_x: p.x,
                    max_x: p.x,
                    min_y: p.y,
                    max_y: p.y,
                },
                Some(b) => b.include(p),
            });
        }
        out
    }

    pub fn include(self, p: Point) -> Self {
        Self {
            min_x: self.min_x.min(p.x),
            max_x: self.max_x.max(p.x),
            min_y: self.min_y.min(p.y),
            max_y: self.max_y.max(p.y),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Grow each side by `frac` of the span; zero spans get a unit-sized window instead.
    pub fn padded(self, frac: f64) -> Self {
        let (min_x, max_x) = pad_axis(self.min_x, self.max_x, frac);
        let (min_y, max_y) = pad_axis(self.min_y, self.max_y, frac);
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Expand the narrower axis around its centre so both axes share `area`'s pixel scale.
    pub fn equalized(self, area: Rect) -> Self {
        let dx = self.width().max(f64::EPSILON);
        let dy = self.height().max(f64::EPSILON);
        let sx = area.width() / dx;
        let sy = area.height() / dy;
        let s = sx.min(sy);
        let half_w = area.width() / s / 2.0;
        let half_h = area.height() / s / 2.0;
        let cx = (self.min_x + self.max_x) / 2.0;
        let cy = (self.min_y + self.max_y) / 2.0;
        Self {
            min_x: cx - half_w,
            max_x: cx + half_w,
            min_y: cy - half_h,
            max_y: cy + half_h,
        }
    }
}

fn pad_axis(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = max - min;
    if span <= f64::EPSILON {
        let c = (min + max) / 2.0;
        return (c - 0.5, c + 0.5);
    }
    (min - span * frac, max + span * frac)
}

/// Maps data coordinates into a pixel rectangle (y grows upward in data, downward in pixels).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub area: Rect,
    pub bounds: DataBounds,
}

impl Projection {
    pub fn new(area: Rect, bounds: DataBounds, equal_aspect: bool) -> Self {
        let bounds = if equal_aspect {
            bounds.equalized(area)
        } else {
            bounds
        };
        Self { area, bounds }
    }

    pub fn x_to_px(&self, x: f64) -> f64 {
        let span = self.bounds.width().max(f64::EPSILON);
        self.area.x0 + (x - self.bounds.min_x) / span * self.area.width()
    }

    pub fn y_to_px(&self, y: f64) -> f64 {
        let span = self.bounds.height().max(f64::EPSILON);
        self.area.y1 - (y - self.bounds.min_y) / span * self.area.height()
    }

    pub fn to_px(&self, p: Point) -> Point {
        Point::new(self.x_to_px(p.x), self.y_to_px(p.y))
    }

    /// Pixels per data unit along x.
    pub fn scale_x(&self) -> f64 {
        self.area.width() / self.bounds.width().max(f64::EPSILON)
    }

    /// Pixels per data unit along y.
    pub fn scale_y(&self) -> f64 {
        self.area.height() / self.bounds.height().max(f64::EPSILON)
    }
}

/// "Nice" tick positions covering `[min, max]`.
pub fn ticks(min: f64, max: f64, desired: usize) -> Vec<f64> {
    if !(min.is_finite() && max.is_finite()) || max <= min {
        return vec![min];
    }
    let step = nice_number((max - min) / (desired.max(2) - 1) as f64, true);
    if step <= 0.0 {
        return vec![min];
    }
    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

fn nice_number(value: f64, round: bool) -> f64 {
    if value == 0.0 {
        return 0.0;
    }
    let exponent = value.abs().log10().floor();
    let fraction = value / 10f64.powf(exponent);
    let nice_fraction = if round {
        if fraction < 1.5 {
            1.0
        } else if fraction < 3.0 {
            2.0
        } else if fraction < 7.0 {
            5.0
        } else {
            10.0
        }
    } else if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice_fraction * 10f64.powf(exponent)
}

pub fn format_tick(value: f64) -> String {
    if value.abs() < 1e-9 {
        return "0".to_string();
    }
    let rounded = (value * 1000.0).round() / 1000.0;
    let mut text = format!("{rounded:.3}");
    while text.contains('.') && text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    text
}

#[cfg(test)]
#[path = "../../tests/unit/plot/layout.rs"]
mod tests;
