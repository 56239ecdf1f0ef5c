use vello_cpu::kurbo::Shape as _;

use crate::{
    foundation::{
        core::{Canvas, Point, Rect, Rgba8},
        error::{PendvizError, PendvizResult},
    },
    plot::text::{TextItem, TextRasterizer},
};

/// One rendered raster.
///
/// `data` is RGBA8, row-major, `width * height * 4` bytes.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight RGBA8 with every pixel flattened to opaque over `bg`.
    pub fn to_opaque_rgba8(&self, bg: Rgba8) -> PendvizResult<Vec<u8>> {
        let mut out = vec![0u8; self.data.len()];
        flatten_to_opaque_rgba8(&mut out, &self.data, self.premultiplied, bg.to_array())?;
        Ok(out)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }
}

/// Immediate-mode CPU drawing surface in pixel coordinates (origin top-left).
pub struct Surface {
    canvas: Canvas,
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
}

impl Surface {
    pub fn new(canvas: Canvas, background: Rgba8) -> PendvizResult<Self> {
        canvas.validate()?;
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| PendvizError::validation("surface width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| PendvizError::validation("surface height exceeds u16"))?;

        let mut surface = Self {
            canvas,
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
        };
        surface.fill_rect(
            Rect::new(0.0, 0.0, f64::from(canvas.width), f64::from(canvas.height)),
            background,
        );
        Ok(surface)
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        self.set_color(color);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            rect.x0, rect.y0, rect.x1, rect.y1,
        ));
    }

    pub fn stroke_rect(&mut self, rect: Rect, color: Rgba8, width: f64) {
        let corners = [
            Point::new(rect.x0, rect.y0),
            Point::new(rect.x1, rect.y0),
            Point::new(rect.x1, rect.y1),
            Point::new(rect.x0, rect.y1),
            Point::new(rect.x0, rect.y0),
        ];
        self.polyline(&corners, color, width);
    }

    pub fn line(&mut self, a: Point, b: Point, color: Rgba8, width: f64) {
        self.polyline(&[a, b], color, width);
    }

    /// Stroke a connected polyline. Non-finite points split the line into separate runs.
    pub fn polyline(&mut self, points: &[Point], color: Rgba8, width: f64) {
        let mut path = vello_cpu::kurbo::BezPath::new();
        let mut pen_down = false;
        let mut segments = 0usize;
        for p in points {
            if !(p.x.is_finite() && p.y.is_finite()) {
                pen_down = false;
                continue;
            }
            if pen_down {
                path.line_to(point_to_cpu(*p));
                segments += 1;
            } else {
                path.move_to(point_to_cpu(*p));
                pen_down = true;
            }
        }
        if segments == 0 {
            return;
        }

        self.set_color(color);
        self.ctx.set_stroke(
            vello_cpu::kurbo::Stroke::new(width)
                .with_caps(vello_cpu::kurbo::Cap::Round)
                .with_join(vello_cpu::kurbo::Join::Round),
        );
        self.ctx.stroke_path(&path);
    }

    pub fn circle(&mut self, center: Point, radius: f64, color: Rgba8) {
        if !(center.x.is_finite() && center.y.is_finite()) || radius <= 0.0 {
            return;
        }
        let path = vello_cpu::kurbo::Circle::new(point_to_cpu(center), radius).to_path(0.1);
        self.set_color(color);
        self.ctx.fill_path(&path);
    }

    /// Rasterise the queued geometry and composite `labels` on top.
    pub fn finish(mut self, labels: &[TextItem], text: &TextRasterizer) -> PendvizResult<FrameRGBA> {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        let mut data = pixmap.data_as_u8_slice().to_vec();

        if let Some(overlay) = text.rasterize(self.canvas, labels)? {
            over_in_place(&mut data, &overlay)?;
        }

        Ok(FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data,
            premultiplied: true,
        })
    }

    fn set_color(&mut self, c: Rgba8) {
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
    }
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

/// Source-over of premultiplied `src` onto premultiplied `dst`.
fn over_in_place(dst: &mut [u8], src: &[u8]) -> PendvizResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(PendvizError::encoding(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = u16::from(s[3]);
        if sa == 0 {
            continue;
        }
        let inv = 255u16 - sa;
        for i in 0..4 {
            let v = u16::from(s[i]) + mul_div255(u16::from(d[i]), inv);
            d[i] = v.min(255) as u8;
        }
    }
    Ok(())
}

pub(crate) fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    src_is_premul: bool,
    bg_rgba: [u8; 4],
) -> PendvizResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(PendvizError::encoding(
            "flatten_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg_r = bg_rgba[0] as u16;
    let bg_g = bg_rgba[1] as u16;
    let bg_b = bg_rgba[2] as u16;

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = s[3] as u16;
        if a == 255 {
            d.copy_from_slice(s);
            d[3] = 255;
            continue;
        }

        let inv = 255u16 - a;

        let (r, g, b) = if src_is_premul {
            (
                s[0] as u16 + mul_div255(bg_r, inv),
                s[1] as u16 + mul_div255(bg_g, inv),
                s[2] as u16 + mul_div255(bg_b, inv),
            )
        } else {
            (
                mul_div255(s[0] as u16, a) + mul_div255(bg_r, inv),
                mul_div255(s[1] as u16, a) + mul_div255(bg_g, inv),
                mul_div255(s[2] as u16, a) + mul_div255(bg_b, inv),
            )
        };

        d[0] = r.min(255) as u8;
        d[1] = g.min(255) as u8;
        d[2] = b.min(255) as u8;
        d[3] = 255;
    }

    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
