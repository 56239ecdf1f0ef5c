use std::path::PathBuf;

use super::*;

fn src() -> PathBuf {
    PathBuf::from("trace.txt")
}

#[test]
fn parses_metadata_and_samples_in_file_order() {
    let text = "# L1=1.00 L2=1.00\n0.0 0.5 0.5 1.0 1.0\n0.1 0.6 0.4 1.1 0.9\n";
    let (trace, meta) = parse_position_trace(text, &src()).unwrap();
    assert_eq!(meta.get("L1"), Some(1.0));
    assert_eq!(meta.get("L2"), Some(1.0));
    assert_eq!(meta.len(), 2);
    assert_eq!(trace.len(), 2);
    assert_eq!(
        trace.samples()[1],
        PositionSample {
            t: 0.1,
            x1: 0.6,
            y1: 0.4,
            x2: 1.1,
            y2: 0.9
        }
    );
}

#[test]
fn comments_without_both_arm_lengths_are_ignored() {
    let text = "# simulation data\n# M1=1 M2=2\n# G=9.81 dt=0.001\n# L1=2.5 L2=0.75\n0 0 0 0 0\n";
    let (_, meta) = parse_position_trace(text, &src()).unwrap();
    assert_eq!(meta.get("M1"), None);
    assert_eq!(meta.get("G"), None);
    assert_eq!(meta.get("L1"), Some(2.5));
    assert_eq!(meta.get("L2"), Some(0.75));
}

#[test]
fn blank_and_indented_lines_are_handled() {
    let text = "\n   \n  0.0 1 2 3 4  \n\t# L1=1 L2=2\n";
    let (trace, meta) = parse_position_trace(text, &src()).unwrap();
    assert_eq!(trace.len(), 1);
    assert_eq!(meta.get("L2"), Some(2.0));
}

#[test]
fn malformed_number_aborts_with_line_number() {
    let text = "0 0 0 0 0\n0.1 0.2 abc 0.4 0.5\n";
    let err = parse_position_trace(text, &src()).unwrap_err();
    assert!(matches!(err, PendvizError::Input(_)));
    let msg = err.to_string();
    assert!(msg.contains("trace.txt:2"), "{msg}");
    assert!(msg.contains("abc"), "{msg}");
}

#[test]
fn wrong_column_count_is_fatal() {
    let err = parse_position_trace("0 1 2\n", &src()).unwrap_err();
    assert!(err.to_string().contains("expected 5 columns"));
}

#[test]
fn malformed_metadata_value_is_fatal() {
    let err = parse_position_trace("# L1=abc L2=1\n", &src()).unwrap_err();
    assert!(matches!(err, PendvizError::Input(_)));
}

#[test]
fn comment_only_file_parses_to_empty_trace() {
    let (trace, meta) = parse_position_trace("# L1=1 L2=1\n\n", &src()).unwrap();
    assert!(trace.is_empty());
    assert_eq!(meta.len(), 2);
}

#[test]
fn angle_rows_have_three_columns() {
    let (trace, _) = parse_angle_trace("# L1=1 L2=1\n0 0.1 0.2\n0.1 0.15 0.25\n", &src()).unwrap();
    assert_eq!(trace.len(), 2);
    assert_eq!(trace.samples()[0].theta2, 0.2);
    assert!(parse_angle_trace("0 0.1 0.2 0.3 0.4\n", &src()).is_err());
}

#[test]
fn missing_primary_file_is_fatal_input_error() {
    let err = read_position_trace(Path::new("target/does/not/exist.txt"), &mut NoProgress)
        .unwrap_err();
    assert!(matches!(err, PendvizError::Input(_)));
}

#[test]
fn missing_angle_file_degrades_to_none() {
    assert!(read_angle_trace_optional(Path::new("target/no_such_angles.txt"), &mut NoProgress).is_none());
}

#[test]
fn malformed_angle_file_degrades_to_none() {
    let dir = PathBuf::from("target").join("reader_unit");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("bad_angles.txt");
    std::fs::write(&path, "0 0.1 nope\n").unwrap();
    assert!(read_angle_trace_optional(&path, &mut NoProgress).is_none());
}

#[test]
fn read_reports_progress_up_to_completion() {
    let dir = PathBuf::from("target").join("reader_unit");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("progress.txt");
    let body: String = (0..50).map(|i| format!("{i} 0 0 0 0\n")).collect();
    std::fs::write(&path, body).unwrap();

    let mut seen = Vec::new();
    {
        let mut obs = |s: Stage, p: u8| seen.push((s, p));
        let (trace, _) = read_position_trace(&path, &mut obs).unwrap();
        assert_eq!(trace.len(), 50);
    }
    assert_eq!(seen.last(), Some(&(Stage::ReadTrace, 100)));
    assert!(seen.windows(2).all(|w| w[0].1 < w[1].1));
}
