use super::*;

fn cfg(width: u32, height: u32, fps: u32) -> EncodeConfig {
    EncodeConfig {
        canvas: Canvas { width, height },
        fps: Fps(fps),
        out_path: PathBuf::from("target/ffmpeg_unit/out.mp4"),
        overwrite: true,
    }
}

#[test]
fn config_validation_catches_bad_values() {
    assert!(cfg(0, 10, 30).validate().is_err());
    assert!(cfg(11, 10, 30).validate().is_err());
    assert!(cfg(10, 10, 0).validate().is_err());
    assert!(cfg(10, 10, 30).validate().is_ok());
}

#[test]
fn ensure_parent_dir_accepts_bare_file_names() {
    ensure_parent_dir(Path::new("plain.mp4")).unwrap();
    ensure_parent_dir(Path::new("target/ffmpeg_unit/nested/out.mp4")).unwrap();
    assert!(Path::new("target/ffmpeg_unit/nested").is_dir());
}

#[test]
fn encodes_small_clip_when_ffmpeg_available() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let c = cfg(16, 16, 10);
    let out = c.out_path.clone();
    let mut enc = FfmpegEncoder::new(c, Rgba8::WHITE).unwrap();
    for shade in [0u8, 128, 255] {
        let frame = FrameRGBA {
            width: 16,
            height: 16,
            data: [shade, 0, 0, 255].repeat(16 * 16),
            premultiplied: true,
        };
        enc.encode_frame(&frame).unwrap();
    }
    enc.finish().unwrap();
    assert!(std::fs::metadata(&out).unwrap().len() > 0);
}

#[test]
fn mismatched_frame_size_is_an_encoding_error() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let mut c = cfg(16, 16, 10);
    c.out_path = PathBuf::from("target/ffmpeg_unit/mismatch.mp4");
    let mut enc = FfmpegEncoder::new(c, Rgba8::WHITE).unwrap();
    let frame = FrameRGBA {
        width: 8,
        height: 8,
        data: vec![0; 8 * 8 * 4],
        premultiplied: true,
    };
    assert!(matches!(
        enc.encode_frame(&frame),
        Err(PendvizError::Encoding { .. })
    ));
}

#[test]
fn dropping_an_unfinished_encoder_reaps_ffmpeg() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let mut c = cfg(16, 16, 10);
    c.out_path = PathBuf::from("target/ffmpeg_unit/abandoned.mp4");
    let mut enc = FfmpegEncoder::new(c, Rgba8::WHITE).unwrap();
    let frame = FrameRGBA {
        width: 16,
        height: 16,
        data: [0, 0, 255, 255].repeat(16 * 16),
        premultiplied: true,
    };
    enc.encode_frame(&frame).unwrap();
    // Returns only once the child has been killed and waited on.
    drop(enc);
}
