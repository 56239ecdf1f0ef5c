use crate::{
    foundation::{
        core::{Canvas, Point, Rect, Rgba8},
        error::{PendvizError, PendvizResult},
    },
    plot::{
        axes::{AxesLabels, data_area, draw_axes},
        layout::{DataBounds, Projection},
        text::{Anchor, TextItem, TextRasterizer},
    },
    render::surface::{FrameRGBA, Surface},
    trace::model::{ConfigMetadata, PositionTrace},
    trail::buffer::{Mass, TrailBuffer},
};

const ROD_WIDTH: f64 = 3.0;
const TRAIL_WIDTH: f64 = 1.5;
const TRAIL_ALPHA: f32 = 0.3;
const MASS_RADIUS: f64 = 9.0;
const PIVOT_RADIUS: f64 = 5.0;

pub fn animation_title(meta: &ConfigMetadata) -> String {
    format!("Double Pendulum Animation - {}", meta.arm_lengths_label())
}

/// Fixed axis window for a whole animation: `±max|coord| * margin` on both axes.
pub fn fixed_bounds(trace: &PositionTrace, margin: f64) -> DataBounds {
    DataBounds::symmetric(trace.max_abs_coord() * margin)
}

fn mass_color(mass: Mass) -> Rgba8 {
    match mass {
        Mass::First => Rgba8::RED,
        Mass::Second => Rgba8::BLUE,
    }
}

/// Per-frame composer for animated mode.
///
/// Axis limits are computed once from the whole trace and never change between frames. Each
/// [`render_frame`](Self::render_frame) call feeds the sampled positions into the trail buffer
/// before drawing, so frames must be requested in schedule order.
pub struct AnimatedRenderer<'a> {
    trace: &'a PositionTrace,
    text: &'a TextRasterizer,
    title: String,
    canvas: Canvas,
    background: Rgba8,
    projection: Projection,
    trails: TrailBuffer,
}

impl<'a> AnimatedRenderer<'a> {
    pub fn new(
        trace: &'a PositionTrace,
        meta: &ConfigMetadata,
        canvas: Canvas,
        background: Rgba8,
        axis_margin: f64,
        trail_capacity: usize,
        text: &'a TextRasterizer,
    ) -> PendvizResult<Self> {
        canvas.validate()?;
        let outer = Rect::new(0.0, 0.0, f64::from(canvas.width), f64::from(canvas.height));
        let bounds = fixed_bounds(trace, axis_margin);
        tracing::debug!(
            half_extent = bounds.max_x,
            trail_capacity,
            "animation axis limits fixed"
        );
        Ok(Self {
            trace,
            text,
            title: animation_title(meta),
            canvas,
            background,
            projection: Projection::new(data_area(outer), bounds, true),
            trails: TrailBuffer::new(trail_capacity)?,
        })
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn trails(&self) -> &TrailBuffer {
        &self.trails
    }

    /// Compose the frame for trace sample `index`.
    pub fn render_frame(&mut self, index: usize) -> PendvizResult<FrameRGBA> {
        let sample = *self.trace.get(index).ok_or_else(|| {
            PendvizError::validation(format!(
                "frame index {index} is outside the trace ({} samples)",
                self.trace.len()
            ))
        })?;
        self.trails.push(Mass::First, sample.mass1());
        self.trails.push(Mass::Second, sample.mass2());

        let proj = self.projection;
        let mut surface = Surface::new(self.canvas, self.background)?;
        let mut labels = Vec::new();
        draw_axes(
            &mut surface,
            &proj,
            &AxesLabels {
                title: self.title.clone(),
                x_label: "X Position (m)".to_string(),
                y_label: "Y Position (m)".to_string(),
            },
            &mut labels,
        );

        for mass in Mass::ALL {
            let trail: Vec<Point> = self.trails.window(mass).iter().map(|p| proj.to_px(p)).collect();
            surface.polyline(&trail, mass_color(mass).with_alpha(TRAIL_ALPHA), TRAIL_WIDTH);
        }

        let pivot = proj.to_px(Point::ORIGIN);
        let m1 = proj.to_px(sample.mass1());
        let m2 = proj.to_px(sample.mass2());
        surface.polyline(&[pivot, m1, m2], Rgba8::BLACK, ROD_WIDTH);
        surface.circle(m1, MASS_RADIUS, mass_color(Mass::First));
        surface.circle(m2, MASS_RADIUS, mass_color(Mass::Second));
        surface.circle(pivot, PIVOT_RADIUS, Rgba8::BLACK);

        labels.push(
            TextItem::new(
                Point::new(proj.area.x0 + 10.0, proj.area.y0 + 20.0),
                format!("t = {:.2} s", sample.t),
                14.0,
            )
            .anchor(Anchor::Start),
        );

        surface.finish(&labels, self.text)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/animated.rs"]
mod tests;
