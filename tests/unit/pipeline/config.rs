use super::*;

#[test]
fn defaults_are_valid() {
    let cfg = RenderConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.stride, 5);
    assert_eq!(cfg.trail_capacity, 500);
    assert_eq!(cfg.fps, Fps(60));
    assert!(!cfg.retain_frames);
    assert!(cfg.animation_canvas.is_even());
}

#[test]
fn invalid_values_are_rejected() {
    let bad = [
        RenderConfig {
            stride: 0,
            ..RenderConfig::default()
        },
        RenderConfig {
            trail_capacity: 0,
            ..RenderConfig::default()
        },
        RenderConfig {
            fps: Fps(0),
            ..RenderConfig::default()
        },
        RenderConfig {
            axis_margin: f64::NAN,
            ..RenderConfig::default()
        },
        RenderConfig {
            static_canvas: Canvas {
                width: 0,
                height: 10,
            },
            ..RenderConfig::default()
        },
    ];
    for cfg in bad {
        assert!(matches!(cfg.validate(), Err(PendvizError::Validation(_))), "{cfg:?}");
    }
}

#[test]
fn partial_json_overrides_defaults() {
    let cfg: RenderConfig =
        serde_json::from_str(r#"{ "stride": 2, "fps": 24, "format": "mp4", "retain_frames": true }"#)
            .unwrap();
    assert_eq!(cfg.stride, 2);
    assert_eq!(cfg.fps, Fps(24));
    assert_eq!(cfg.format, Some(OutputFormat::Mp4));
    assert!(cfg.retain_frames);
    assert_eq!(cfg.trail_capacity, 500);
}

#[test]
fn unknown_keys_are_rejected() {
    assert!(serde_json::from_str::<RenderConfig>(r#"{ "strid": 2 }"#).is_err());
}

#[test]
fn config_file_roundtrip_and_validation() {
    let dir = PathBuf::from("target").join("config_unit");
    std::fs::create_dir_all(&dir).unwrap();

    let good = dir.join("good.json");
    std::fs::write(&good, r#"{ "trail_capacity": 200 }"#).unwrap();
    assert_eq!(RenderConfig::from_json_file(&good).unwrap().trail_capacity, 200);

    let bad = dir.join("bad.json");
    std::fs::write(&bad, r#"{ "stride": 0 }"#).unwrap();
    assert!(RenderConfig::from_json_file(&bad).is_err());

    assert!(RenderConfig::from_json_file(&dir.join("missing.json")).is_err());
}

#[test]
fn scratch_dir_defaults_beside_output() {
    let cfg = RenderConfig::default();
    assert_eq!(
        cfg.scratch_dir_for(Path::new("out/run.gif")),
        PathBuf::from("out/run_frames")
    );
    let cfg = RenderConfig {
        scratch_dir: Some(PathBuf::from("/tmp/frames")),
        ..RenderConfig::default()
    };
    assert_eq!(cfg.scratch_dir_for(Path::new("run.gif")), PathBuf::from("/tmp/frames"));
}
