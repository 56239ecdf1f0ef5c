use crate::{
    foundation::core::{Point, Rect, Rgba8},
    plot::{
        layout::{Projection, format_tick, ticks},
        text::{Anchor, TextItem},
    },
    render::surface::Surface,
};

const LEFT_MARGIN: f64 = 72.0;
const RIGHT_MARGIN: f64 = 24.0;
const TOP_MARGIN: f64 = 44.0;
const BOTTOM_MARGIN: f64 = 56.0;

const GRID: Rgba8 = Rgba8::GREY;
const TICK_TARGET: usize = 7;

/// Titles and axis captions for one panel.
#[derive(Clone, Debug, Default)]
pub struct AxesLabels {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

/// Inner plotting rectangle of a panel occupying `outer`.
pub fn data_area(outer: Rect) -> Rect {
    let left = LEFT_MARGIN.min(outer.width() / 3.0);
    let right = RIGHT_MARGIN.min(outer.width() / 6.0);
    let top = TOP_MARGIN.min(outer.height() / 4.0);
    let bottom = BOTTOM_MARGIN.min(outer.height() / 4.0);
    Rect::new(
        outer.x0 + left,
        outer.y0 + top,
        (outer.x1 - right).max(outer.x0 + left + 1.0),
        (outer.y1 - bottom).max(outer.y0 + top + 1.0),
    )
}

/// Draw grid, frame and tick marks for `proj`, queueing tick labels and captions into `labels`.
pub fn draw_axes(
    surface: &mut Surface,
    proj: &Projection,
    captions: &AxesLabels,
    labels: &mut Vec<TextItem>,
) {
    let area = proj.area;
    let b = proj.bounds;
    let tick_size = 11.0;

    for x in ticks(b.min_x, b.max_x, TICK_TARGET) {
        let px = proj.x_to_px(x);
        surface.line(
            Point::new(px, area.y0),
            Point::new(px, area.y1),
            GRID.with_alpha(0.3),
            1.0,
        );
        surface.line(Point::new(px, area.y1), Point::new(px, area.y1 + 4.0), Rgba8::BLACK, 1.0);
        labels.push(
            TextItem::new(Point::new(px, area.y1 + 17.0), format_tick(x), tick_size)
                .anchor(Anchor::Middle),
        );
    }
    for y in ticks(b.min_y, b.max_y, TICK_TARGET) {
        let py = proj.y_to_px(y);
        surface.line(
            Point::new(area.x0, py),
            Point::new(area.x1, py),
            GRID.with_alpha(0.3),
            1.0,
        );
        surface.line(Point::new(area.x0 - 4.0, py), Point::new(area.x0, py), Rgba8::BLACK, 1.0);
        labels.push(
            TextItem::new(Point::new(area.x0 - 7.0, py + 4.0), format_tick(y), tick_size)
                .anchor(Anchor::End),
        );
    }

    surface.stroke_rect(area, Rgba8::BLACK, 1.0);

    let cx = (area.x0 + area.x1) / 2.0;
    let cy = (area.y0 + area.y1) / 2.0;
    if !captions.title.is_empty() {
        labels.push(
            TextItem::new(Point::new(cx, area.y0 - 14.0), captions.title.clone(), 16.0)
                .anchor(Anchor::Middle),
        );
    }
    if !captions.x_label.is_empty() {
        labels.push(
            TextItem::new(Point::new(cx, area.y1 + 40.0), captions.x_label.clone(), 13.0)
                .anchor(Anchor::Middle),
        );
    }
    if !captions.y_label.is_empty() {
        labels.push(
            TextItem::new(Point::new(area.x0 - 48.0, cy), captions.y_label.clone(), 13.0)
                .anchor(Anchor::Middle)
                .vertical(),
        );
    }
}

/// Kind of swatch drawn beside a legend entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Swatch {
    Line,
    Marker,
}

#[derive(Clone, Debug)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgba8,
    pub swatch: Swatch,
}

impl LegendEntry {
    pub fn new(label: impl Into<String>, color: Rgba8, swatch: Swatch) -> Self {
        Self {
            label: label.into(),
            color,
            swatch,
        }
    }
}

/// Boxed legend in the top-right corner of `area`.
pub fn draw_legend(
    surface: &mut Surface,
    area: Rect,
    entries: &[LegendEntry],
    labels: &mut Vec<TextItem>,
) {
    if entries.is_empty() {
        return;
    }
    let row_h = 18.0;
    let width = 210.0_f64.min(area.width() * 0.6);
    let height = row_h * entries.len() as f64 + 10.0;
    let x0 = area.x1 - width - 8.0;
    let y0 = area.y0 + 8.0;
    let frame = Rect::new(x0, y0, x0 + width, y0 + height);
    surface.fill_rect(frame, Rgba8::WHITE.with_alpha(0.85));
    surface.stroke_rect(frame, GRID.with_alpha(0.6), 1.0);

    for (i, entry) in entries.iter().enumerate() {
        let y = y0 + 5.0 + row_h * (i as f64 + 0.5);
        let sx = x0 + 8.0;
        match entry.swatch {
            Swatch::Line => surface.line(
                Point::new(sx, y),
                Point::new(sx + 22.0, y),
                entry.color,
                2.0,
            ),
            Swatch::Marker => surface.circle(Point::new(sx + 11.0, y), 4.5, entry.color),
        }
        labels.push(TextItem::new(Point::new(sx + 30.0, y + 4.0), entry.label.clone(), 11.0));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plot/axes.rs"]
mod tests;
