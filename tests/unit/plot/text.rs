use super::*;

fn canvas() -> Canvas {
    Canvas::new(200, 100).unwrap()
}

#[test]
fn svg_escapes_markup_and_sets_anchor() {
    let items = vec![
        TextItem::new(Point::new(10.0, 20.0), "a < b & \"c\"", 12.0).anchor(Anchor::Middle),
    ];
    let svg = labels_to_svg(canvas(), &items);
    assert!(svg.contains("a &lt; b &amp; &quot;c&quot;"));
    assert!(svg.contains(r#"text-anchor="middle""#));
    assert!(svg.contains(r#"width="200" height="100""#));
}

#[test]
fn vertical_labels_are_rotated_about_their_anchor() {
    let items = vec![TextItem::new(Point::new(5.0, 50.0), "Y", 10.0).vertical()];
    let svg = labels_to_svg(canvas(), &items);
    assert!(svg.contains(r#"transform="rotate(-90 5.00 50.00)""#));
}

#[test]
fn generated_svg_parses() {
    let items = vec![
        TextItem::new(Point::new(10.0, 20.0), "θ1 (rad)", 12.0).color(Rgba8::RED.with_alpha(0.5)),
    ];
    let svg = labels_to_svg(canvas(), &items);
    usvg::Tree::from_str(&svg, &usvg::Options::default()).unwrap();
}

#[test]
fn no_fonts_or_no_items_yield_no_overlay() {
    let r = TextRasterizer::without_fonts();
    assert_eq!(r.face_count(), 0);
    let items = vec![TextItem::new(Point::new(10.0, 20.0), "hello", 12.0)];
    assert!(r.rasterize(canvas(), &items).unwrap().is_none());
    assert!(r.rasterize(canvas(), &[]).unwrap().is_none());
}

#[test]
fn system_font_overlay_matches_canvas_size() {
    let r = TextRasterizer::with_system_fonts();
    let items = vec![TextItem::new(Point::new(10.0, 50.0), "L1=1.00m", 20.0)];
    if let Some(px) = r.rasterize(canvas(), &items).unwrap() {
        assert_eq!(px.len(), 200 * 100 * 4);
    }
}
