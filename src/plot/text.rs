use std::{fmt::Write as _, sync::Arc};

use anyhow::Context as _;

use crate::foundation::{
    core::{Canvas, Point, Rgba8},
    error::{PendvizError, PendvizResult},
};

const FONT_FAMILIES: &str = "'DejaVu Sans', 'Liberation Sans', Arial, Helvetica, sans-serif";

/// Horizontal alignment of a label relative to its anchor point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_svg(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

/// A single label in pixel space. `pos` is the baseline anchor.
#[derive(Clone, Debug, PartialEq)]
pub struct TextItem {
    pub pos: Point,
    pub text: String,
    pub size_px: f32,
    pub color: Rgba8,
    pub anchor: Anchor,
    pub vertical: bool,
}

impl TextItem {
    pub fn new(pos: Point, text: impl Into<String>, size_px: f32) -> Self {
        Self {
            pos,
            text: text.into(),
            size_px,
            color: Rgba8::BLACK,
            anchor: Anchor::Start,
            vertical: false,
        }
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn color(mut self, color: Rgba8) -> Self {
        self.color = color;
        self
    }

    /// Rotate -90° around `pos` (for y-axis labels).
    pub fn vertical(mut self) -> Self {
        self.vertical = true;
        self
    }
}

/// Rasterises labels through `usvg`/`resvg`.
///
/// Missing fonts make text render empty; they never fail the frame.
#[derive(Clone)]
pub struct TextRasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for TextRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRasterizer")
            .field("faces", &self.face_count())
            .finish()
    }
}

impl TextRasterizer {
    pub fn with_system_fonts() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.faces().count(), "loaded system fonts for labels");
        Self {
            fontdb: Arc::new(db),
        }
    }

    /// No fonts at all; labels are laid out but produce no pixels.
    pub fn without_fonts() -> Self {
        Self {
            fontdb: Arc::new(usvg::fontdb::Database::new()),
        }
    }

    pub fn face_count(&self) -> usize {
        self.fontdb.faces().count()
    }

    /// Premultiplied RGBA8 overlay the size of `canvas`, or `None` when there is nothing to draw.
    pub fn rasterize(&self, canvas: Canvas, items: &[TextItem]) -> PendvizResult<Option<Vec<u8>>> {
        if items.is_empty() || self.fontdb.faces().next().is_none() {
            return Ok(None);
        }
        let svg = labels_to_svg(canvas, items);
        let opts = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&svg, &opts).context("parse label overlay svg")?;
        rasterize_svg_to_premul_rgba8(&tree, canvas.width, canvas.height).map(Some)
    }
}

pub(crate) fn labels_to_svg(canvas: Canvas, items: &[TextItem]) -> String {
    let mut svg = String::with_capacity(256 + items.len() * 160);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = canvas.width,
        h = canvas.height
    );
    for item in items {
        let _ = write!(
            svg,
            r#"<text x="{x:.2}" y="{y:.2}" font-family="{FONT_FAMILIES}" font-size="{size:.1}" fill="{fill}" fill-opacity="{alpha:.3}" text-anchor="{anchor}""#,
            x = item.pos.x,
            y = item.pos.y,
            size = item.size_px,
            fill = item.color.to_hex(),
            alpha = f32::from(item.color.a) / 255.0,
            anchor = item.anchor.as_svg(),
        );
        if item.vertical {
            let _ = write!(
                svg,
                r#" transform="rotate(-90 {:.2} {:.2})""#,
                item.pos.x, item.pos.y
            );
        }
        svg.push('>');
        escape_xml_into(&mut svg, &item.text);
        svg.push_str("</text>");
    }
    svg.push_str("</svg>");
    svg
}

fn escape_xml_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
}

fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> PendvizResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| PendvizError::encoding("failed to allocate label pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}

#[cfg(test)]
#[path = "../../tests/unit/plot/text.rs"]
mod tests;
