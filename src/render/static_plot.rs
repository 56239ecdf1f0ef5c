use crate::{
    foundation::{
        core::{Canvas, Point, Rect, Rgba8},
        error::{PendvizError, PendvizResult},
    },
    pipeline::progress::{ProgressObserver, Stage},
    plot::{
        axes::{AxesLabels, LegendEntry, Swatch, data_area, draw_axes, draw_legend},
        layout::{DataBounds, Projection},
        text::{TextItem, TextRasterizer},
    },
    render::surface::{FrameRGBA, Surface},
    trace::model::{AngleTrace, ConfigMetadata, PositionTrace},
};

const PATH_WIDTH: f64 = 1.5;
const MARKER_RADIUS: f64 = 5.0;
const PIVOT_RADIUS: f64 = 5.0;
const ROD_WIDTH: f64 = 2.0;
const BOUNDS_PAD: f64 = 0.05;
const START1_COLOR: Rgba8 = Rgba8::RED;
const START2_COLOR: Rgba8 = Rgba8::BLUE;

pub fn trajectory_title(meta: &ConfigMetadata) -> String {
    format!("Double Pendulum Trajectory - {}", meta.arm_lengths_label())
}

/// One-shot plot of the whole trace.
///
/// The position panel draws both full trajectories, their start points, the pivot and the final
/// rod configuration with equal aspect. When `angles` is given a phase-space panel is placed to
/// its right; the two panels share nothing but the canvas.
///
/// Progress stops at 80; the caller reports 100 once the raster is on disk.
#[tracing::instrument(skip_all, fields(samples = positions.len(), phase = angles.is_some()))]
pub fn render_static(
    positions: &PositionTrace,
    angles: Option<&AngleTrace>,
    meta: &ConfigMetadata,
    canvas: Canvas,
    background: Rgba8,
    text: &TextRasterizer,
    progress: &mut dyn ProgressObserver,
) -> PendvizResult<FrameRGBA> {
    if positions.is_empty() {
        return Err(PendvizError::validation(
            "static plot needs at least one position sample",
        ));
    }
    let angles = angles.filter(|a| !a.is_empty());
    if let Some(a) = angles
        && a.len() != positions.len()
    {
        tracing::debug!(
            positions = positions.len(),
            angles = a.len(),
            "position and angle traces differ in length; panels are drawn independently"
        );
    }

    let mut surface = Surface::new(canvas, background)?;
    let mut labels = Vec::new();
    let full = Rect::new(0.0, 0.0, f64::from(canvas.width), f64::from(canvas.height));
    let (left, right) = match angles {
        Some(_) => {
            let mid = full.width() / 2.0;
            (
                Rect::new(full.x0, full.y0, mid, full.y1),
                Some(Rect::new(mid, full.y0, full.x1, full.y1)),
            )
        }
        None => (full, None),
    };
    progress.on_progress(Stage::RenderStatic, 20);

    draw_position_panel(&mut surface, left, positions, meta, &mut labels);
    progress.on_progress(Stage::RenderStatic, 40);

    if let (Some(area), Some(angles)) = (right, angles) {
        draw_phase_panel(&mut surface, area, angles, &mut labels);
    }
    progress.on_progress(Stage::RenderStatic, 60);

    let frame = surface.finish(&labels, text)?;
    progress.on_progress(Stage::RenderStatic, 80);
    Ok(frame)
}

fn draw_position_panel(
    surface: &mut Surface,
    outer: Rect,
    positions: &PositionTrace,
    meta: &ConfigMetadata,
    labels: &mut Vec<TextItem>,
) {
    let area = data_area(outer);
    let bounds = DataBounds::from_points(positions.mass1_path().chain(positions.mass2_path()))
        .unwrap_or_else(|| DataBounds::symmetric(1.0))
        .include(Point::ORIGIN)
        .padded(BOUNDS_PAD);
    let proj = Projection::new(area, bounds, true);

    draw_axes(
        surface,
        &proj,
        &AxesLabels {
            title: trajectory_title(meta),
            x_label: "X Position (m)".to_string(),
            y_label: "Y Position (m)".to_string(),
        },
        labels,
    );

    let path1: Vec<Point> = positions.mass1_path().map(|p| proj.to_px(p)).collect();
    let path2: Vec<Point> = positions.mass2_path().map(|p| proj.to_px(p)).collect();
    surface.polyline(&path1, Rgba8::RED, PATH_WIDTH);
    surface.polyline(&path2, Rgba8::LIGHT_BLUE, PATH_WIDTH);

    if let Some(first) = positions.first() {
        surface.circle(proj.to_px(first.mass1()), MARKER_RADIUS, START1_COLOR);
        surface.circle(proj.to_px(first.mass2()), MARKER_RADIUS, START2_COLOR);
    }
    if let Some(last) = positions.last() {
        let rod = [
            proj.to_px(Point::ORIGIN),
            proj.to_px(last.mass1()),
            proj.to_px(last.mass2()),
        ];
        surface.polyline(&rod, Rgba8::BLACK.with_alpha(0.5), ROD_WIDTH);
    }
    surface.circle(proj.to_px(Point::ORIGIN), PIVOT_RADIUS, Rgba8::BLACK);

    draw_legend(surface, area, &position_legend(), labels);
}

fn position_legend() -> [LegendEntry; 5] {
    [
        LegendEntry::new("First pendulum path", Rgba8::RED, Swatch::Line),
        LegendEntry::new("Second pendulum path", Rgba8::LIGHT_BLUE, Swatch::Line),
        LegendEntry::new("Starting point 1", START1_COLOR, Swatch::Marker),
        LegendEntry::new("Starting point 2", START2_COLOR, Swatch::Marker),
        LegendEntry::new("Fixed point", Rgba8::BLACK, Swatch::Marker),
    ]
}

fn draw_phase_panel(
    surface: &mut Surface,
    outer: Rect,
    angles: &AngleTrace,
    labels: &mut Vec<TextItem>,
) {
    let area = data_area(outer);
    let bounds = DataBounds::from_points(angles.phase_path())
        .unwrap_or_else(|| DataBounds::symmetric(1.0))
        .padded(BOUNDS_PAD);
    let proj = Projection::new(area, bounds, false);

    draw_axes(
        surface,
        &proj,
        &AxesLabels {
            title: "Phase Space".to_string(),
            x_label: "θ1 (rad)".to_string(),
            y_label: "θ2 (rad)".to_string(),
        },
        labels,
    );

    let path: Vec<Point> = angles.phase_path().map(|p| proj.to_px(p)).collect();
    surface.polyline(&path, Rgba8::BLUE, 1.0);
    if let (Some(start), Some(end)) = (path.first(), path.last()) {
        surface.circle(*start, MARKER_RADIUS, Rgba8::GREEN);
        surface.circle(*end, MARKER_RADIUS, Rgba8::RED);
    }

    draw_legend(
        surface,
        area,
        &[
            LegendEntry::new("Start", Rgba8::GREEN, Swatch::Marker),
            LegendEntry::new("End", Rgba8::RED, Swatch::Marker),
        ],
        labels,
    );
}

#[cfg(test)]
#[path = "../../tests/unit/render/static_plot.rs"]
mod tests;
