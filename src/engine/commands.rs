//! Argument vectors for the external tools.
//!
//! Every builder is a pure function of its inputs. Seeks always go before `-i`
//! so ffmpeg cuts on keyframes and audio stays in sync with video.

use std::path::Path;

use crate::domain::model::KeepSegment;
use crate::utils::time::{format_hms_millis, format_seconds};

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

fn ffmpeg_prelude() -> Vec<String> {
    ["-hide_banner", "-nostdin", "-y"].iter().map(|s| s.to_string()).collect()
}

/// ffmpeg stream-copy extraction of one keep-segment.
///
/// `mpegts` forces the MPEG-TS muxer; otherwise the container follows `output`.
pub fn ffmpeg_extract_args(
    source: &Path,
    segment: &KeepSegment,
    output: &Path,
    mpegts: bool,
) -> Vec<String> {
    let mut args = ffmpeg_prelude();
    args.extend([
        "-ss".to_string(),
        format_seconds(segment.start),
        "-i".to_string(),
        path_arg(source),
        "-t".to_string(),
        format_seconds(segment.length()),
        "-map".to_string(),
        "0".to_string(),
        "-c".to_string(),
        "copy".to_string(),
        "-avoid_negative_ts".to_string(),
        "make_zero".to_string(),
    ]);
    if mpegts {
        args.extend(["-f".to_string(), "mpegts".to_string()]);
    }
    args.push(path_arg(output));
    args
}

/// MP4Box keyframe-aligned split of one keep-segment
pub fn mp4box_extract_args(source: &Path, segment: &KeepSegment, output: &Path) -> Vec<String> {
    vec![
        "-splitx".to_string(),
        format!("{}:{}", format_seconds(segment.start), format_seconds(segment.end)),
        path_arg(source),
        "-out".to_string(),
        path_arg(output),
    ]
}

/// ffmpeg `concat:` protocol merge of MPEG-TS intermediates
pub fn ffmpeg_concat_protocol_args(inputs: &[&Path], output: &Path) -> Vec<String> {
    let joined = inputs
        .iter()
        .map(|p| path_arg(p))
        .collect::<Vec<_>>()
        .join("|");
    let mut args = ffmpeg_prelude();
    args.extend([
        "-i".to_string(),
        format!("concat:{}", joined),
        "-map".to_string(),
        "0".to_string(),
        "-c".to_string(),
        "copy".to_string(),
        "-f".to_string(),
        "mpegts".to_string(),
        path_arg(output),
    ]);
    args
}

/// ffmpeg concat demuxer merge driven by a list file
pub fn ffmpeg_concat_demuxer_args(list_file: &Path, output: &Path) -> Vec<String> {
    let mut args = ffmpeg_prelude();
    args.extend([
        "-f".to_string(),
        "concat".to_string(),
        "-safe".to_string(),
        "0".to_string(),
        "-i".to_string(),
        path_arg(list_file),
        "-map".to_string(),
        "0".to_string(),
        "-c".to_string(),
        "copy".to_string(),
        path_arg(output),
    ]);
    args
}

/// List file for the concat demuxer; single quotes in paths are escaped
pub fn concat_list_text(inputs: &[&Path]) -> String {
    inputs
        .iter()
        .map(|p| format!("file '{}'\n", path_arg(p).replace('\'', "'\\''")))
        .collect()
}

/// MP4Box concatenation into a new file
pub fn mp4box_cat_args(inputs: &[&Path], output: &Path) -> Vec<String> {
    let mut args = Vec::with_capacity(inputs.len() * 2 + 2);
    for input in inputs {
        args.push("-cat".to_string());
        args.push(path_arg(input));
    }
    args.push("-new".to_string());
    args.push(path_arg(output));
    args
}

/// mkvmerge append of Matroska intermediates
pub fn mkvmerge_append_args(inputs: &[&Path], output: &Path) -> Vec<String> {
    let mut args = vec!["-o".to_string(), path_arg(output)];
    for (position, input) in inputs.iter().enumerate() {
        if position > 0 {
            args.push("+".to_string());
        }
        args.push(path_arg(input));
    }
    args
}

/// Single-pass mkvmerge: keep every segment and append them into one output
pub fn mkvmerge_split_args(source: &Path, segments: &[KeepSegment], output: &Path) -> Vec<String> {
    let parts = segments
        .iter()
        .enumerate()
        .map(|(position, segment)| {
            format!(
                "{}{}-{}",
                if position > 0 { "+" } else { "" },
                format_hms_millis(segment.start),
                format_hms_millis(segment.end)
            )
        })
        .collect::<Vec<_>>()
        .join(",");

    vec![
        "-o".to_string(),
        path_arg(output),
        "--split".to_string(),
        format!("parts:{}", parts),
        path_arg(source),
    ]
}
