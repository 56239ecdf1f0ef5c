use super::*;
use crate::trace::model::{AngleSample, PositionSample};

fn positions() -> PositionTrace {
    PositionTrace::new(
        (0..50)
            .map(|i| {
                let t = i as f64 * 0.1;
                let (s1, c1) = (t.sin(), t.cos());
                let (s2, c2) = ((1.7 * t).sin(), (1.7 * t).cos());
                PositionSample {
                    t,
                    x1: s1,
                    y1: -c1,
                    x2: s1 + s2,
                    y2: -c1 - c2,
                }
            })
            .collect(),
    )
}

fn angles(n: usize) -> AngleTrace {
    AngleTrace::new(
        (0..n)
            .map(|i| AngleSample {
                t: i as f64 * 0.1,
                theta1: i as f64 * 0.1,
                theta2: (i as f64 * 0.2).sin() + i as f64 * 0.05,
            })
            .collect(),
    )
}

fn count_matching(frame: &FrameRGBA, pred: impl Fn([u8; 4]) -> bool) -> usize {
    frame.data.chunks_exact(4).filter(|px| pred([px[0], px[1], px[2], px[3]])).count()
}

fn is_reddish(px: [u8; 4]) -> bool {
    px[3] > 200 && px[0] > 180 && px[1] < 90 && px[2] < 90
}

#[test]
fn title_uses_placeholder_for_missing_lengths() {
    let mut meta = ConfigMetadata::default();
    meta.insert("L1", 1.0);
    assert_eq!(
        trajectory_title(&meta),
        "Double Pendulum Trajectory - L1=1.00m, L2=unknownm"
    );
}

#[test]
fn empty_trace_is_rejected() {
    let text = TextRasterizer::without_fonts();
    let err = render_static(
        &PositionTrace::new(Vec::new()),
        None,
        &ConfigMetadata::default(),
        Canvas::new(200, 150).unwrap(),
        Rgba8::WHITE,
        &text,
        &mut crate::pipeline::progress::NoProgress,
    )
    .unwrap_err();
    assert!(matches!(err, PendvizError::Validation(_)));
}

#[test]
fn position_only_plot_draws_paths_on_background() {
    let text = TextRasterizer::without_fonts();
    let mut seen = Vec::new();
    let frame = render_static(
        &positions(),
        None,
        &ConfigMetadata::default(),
        Canvas::new(400, 300).unwrap(),
        Rgba8::WHITE,
        &text,
        &mut |stage: Stage, pct: u8| seen.push((stage, pct)),
    )
    .unwrap();

    assert_eq!((frame.width, frame.height), (400, 300));
    assert_eq!(frame.pixel(0, 0), Some([255, 255, 255, 255]));
    assert!(count_matching(&frame, is_reddish) > 20);
    assert_eq!(
        seen.iter().map(|(_, p)| *p).collect::<Vec<_>>(),
        vec![20, 40, 60, 80]
    );
    assert!(seen.iter().all(|(s, _)| *s == Stage::RenderStatic));
}

#[test]
fn phase_panel_occupies_the_right_half() {
    let text = TextRasterizer::without_fonts();
    let canvas = Canvas::new(600, 300).unwrap();
    let meta = ConfigMetadata::default();
    let no_phase = render_static(
        &positions(),
        None,
        &meta,
        canvas,
        Rgba8::WHITE,
        &text,
        &mut crate::pipeline::progress::NoProgress,
    )
    .unwrap();
    // Mismatched lengths are allowed.
    let with_phase = render_static(
        &positions(),
        Some(&angles(30)),
        &meta,
        canvas,
        Rgba8::WHITE,
        &text,
        &mut crate::pipeline::progress::NoProgress,
    )
    .unwrap();

    let green = |px: [u8; 4]| px[3] > 200 && px[1] > 130 && px[0] < 90 && px[2] < 90;
    assert_eq!(count_matching(&no_phase, green), 0);
    assert!(count_matching(&with_phase, green) > 0);
    assert_ne!(no_phase.data, with_phase.data);
}

#[test]
fn empty_angle_trace_is_treated_as_absent() {
    let text = TextRasterizer::without_fonts();
    let canvas = Canvas::new(300, 200).unwrap();
    let meta = ConfigMetadata::default();
    let a = render_static(
        &positions(),
        None,
        &meta,
        canvas,
        Rgba8::WHITE,
        &text,
        &mut crate::pipeline::progress::NoProgress,
    )
    .unwrap();
    let b = render_static(
        &positions(),
        Some(&angles(0)),
        &meta,
        canvas,
        Rgba8::WHITE,
        &text,
        &mut crate::pipeline::progress::NoProgress,
    )
    .unwrap();
    assert_eq!(a.data, b.data);
}

#[test]
fn start_markers_have_one_legend_entry_each() {
    let legend = position_legend();
    let entry = |label: &str| legend.iter().find(|e| e.label == label).unwrap();

    assert_eq!(entry("Starting point 1").color, START1_COLOR);
    assert_eq!(entry("Starting point 2").color, START2_COLOR);
    assert_eq!(entry("First pendulum path").color, START1_COLOR);
    assert_ne!(START1_COLOR, START2_COLOR);
    assert!(legend.iter().all(|e| e.label != "Start points"));
}
