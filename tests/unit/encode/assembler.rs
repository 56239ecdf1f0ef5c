use super::*;

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width: w,
        height: h,
        data: rgba.repeat((w * h) as usize),
        premultiplied: true,
    }
}

fn cfg(name: &str, format: OutputFormat, retain: bool) -> AssemblerConfig {
    let root = PathBuf::from("target").join("assembler_unit").join(name);
    let _ = std::fs::remove_dir_all(&root);
    AssemblerConfig {
        out_path: root.join(format!("anim.{}", format.extension())),
        format,
        fps: Fps(10),
        canvas: Canvas::new(6, 4).unwrap(),
        background: Rgba8::WHITE,
        retain_frames: retain,
        scratch_dir: root.join("anim_frames"),
    }
}

#[test]
fn gif_assembly_cleans_scratch_by_default() {
    let cfg = cfg("gif_default", OutputFormat::Gif, false);
    let scratch = cfg.scratch_dir.clone();
    let mut asm = SequenceAssembler::new(cfg.clone()).unwrap();
    asm.add_frame(&solid(6, 4, [255, 0, 0, 255])).unwrap();
    asm.add_frame(&solid(6, 4, [0, 255, 0, 255])).unwrap();
    assert_eq!(asm.frames(), 2);

    let mut seen = Vec::new();
    let report = asm
        .finish(&mut |stage: Stage, pct: u8| seen.push((stage, pct)))
        .unwrap();

    assert_eq!(report.frames, 2);
    assert_eq!(report.format, OutputFormat::Gif);
    assert_eq!(report.retained_scratch, None);
    assert!(std::fs::metadata(&cfg.out_path).unwrap().len() > 0);
    assert!(!scratch.exists());
    assert_eq!(seen.last(), Some(&(Stage::Encode, 100)));
}

#[test]
fn retention_keeps_one_raster_per_frame() {
    let cfg = cfg("gif_retain", OutputFormat::Gif, true);
    let mut asm = SequenceAssembler::new(cfg.clone()).unwrap();
    for _ in 0..3 {
        asm.add_frame(&solid(6, 4, [0, 0, 0, 255])).unwrap();
    }
    let report = asm.finish(&mut crate::pipeline::progress::NoProgress).unwrap();
    assert_eq!(report.retained_scratch.as_deref(), Some(cfg.scratch_dir.as_path()));
    assert_eq!(std::fs::read_dir(&cfg.scratch_dir).unwrap().count(), 3);
}

#[test]
fn zero_frames_is_an_encoding_error_and_leaves_no_scratch() {
    let cfg = cfg("empty", OutputFormat::Gif, false);
    let asm = SequenceAssembler::new(cfg.clone()).unwrap();
    let err = asm
        .finish(&mut crate::pipeline::progress::NoProgress)
        .unwrap_err();
    assert!(matches!(err, PendvizError::Encoding { .. }));
    assert!(!cfg.scratch_dir.exists());
    assert!(!cfg.out_path.exists());
}

#[test]
fn mismatched_frame_is_tagged_with_its_position() {
    let cfg = cfg("mismatch", OutputFormat::Gif, false);
    let mut asm = SequenceAssembler::new(cfg.clone()).unwrap();
    asm.add_frame(&solid(6, 4, [0, 0, 0, 255])).unwrap();
    let err = asm.add_frame(&solid(2, 2, [0, 0, 0, 255])).unwrap_err();
    assert_eq!(err.frame(), Some(1));
    drop(asm);
    assert!(!cfg.scratch_dir.exists());
}

#[test]
fn still_formats_are_rejected() {
    let cfg = cfg("png", OutputFormat::Png, false);
    assert!(matches!(
        SequenceAssembler::new(cfg),
        Err(PendvizError::Validation(_))
    ));
}

#[test]
fn mp4_requires_even_dimensions() {
    let mut cfg = cfg("odd", OutputFormat::Mp4, false);
    cfg.canvas = Canvas::new(7, 4).unwrap();
    assert!(SequenceAssembler::new(cfg).is_err());
}

#[test]
fn mp4_assembly_when_ffmpeg_is_available() {
    if !crate::encode::ffmpeg::is_ffmpeg_on_path() {
        return;
    }
    let mut cfg = cfg("mp4", OutputFormat::Mp4, false);
    cfg.canvas = Canvas::new(32, 32).unwrap();
    let mut asm = SequenceAssembler::new(cfg.clone()).unwrap();
    for i in 0..4u8 {
        asm.add_frame(&solid(32, 32, [i * 60, 0, 0, 255])).unwrap();
    }
    let report = asm.finish(&mut crate::pipeline::progress::NoProgress).unwrap();
    assert_eq!(report.frames, 4);
    assert!(std::fs::metadata(&cfg.out_path).unwrap().len() > 0);
}

#[test]
fn failure_mid_assembly_removes_the_partial_artifact() {
    let cfg = cfg("mid_failure", OutputFormat::Gif, false);
    let mut asm = SequenceAssembler::new(cfg.clone()).unwrap();
    for _ in 0..3 {
        asm.add_frame(&solid(6, 4, [0, 0, 0, 255])).unwrap();
    }
    std::fs::remove_file(cfg.scratch_dir.join("frame_000001.png")).unwrap();

    let err = asm
        .finish(&mut crate::pipeline::progress::NoProgress)
        .unwrap_err();
    assert_eq!(err.frame(), Some(1));
    assert!(!cfg.out_path.exists());
    assert!(!cfg.scratch_dir.exists());
}

#[test]
fn mp4_failure_mid_assembly_stops_ffmpeg_and_removes_the_artifact() {
    if !crate::encode::ffmpeg::is_ffmpeg_on_path() {
        return;
    }
    let cfg = cfg("mp4_mid_failure", OutputFormat::Mp4, false);
    let mut asm = SequenceAssembler::new(cfg.clone()).unwrap();
    for _ in 0..3 {
        asm.add_frame(&solid(6, 4, [0, 0, 255, 255])).unwrap();
    }
    std::fs::remove_file(cfg.scratch_dir.join("frame_000002.png")).unwrap();

    let err = asm
        .finish(&mut crate::pipeline::progress::NoProgress)
        .unwrap_err();
    assert_eq!(err.frame(), Some(2));
    assert!(!cfg.out_path.exists());
}
