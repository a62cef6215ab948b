//! Chapter file writers

use std::path::{Path, PathBuf};

use tracing::debug;

use super::ChapterFormat;
use crate::config::ChapterConfig;
use crate::domain::model::ChapterList;
use crate::error::BreakcutResult;
use crate::ports::FsPort;
use crate::utils::time::{format_hms_millis, to_millis};

/// Paired-line chapter text with a trailing unnamed chapter at the total duration
pub fn ogm_text(list: &ChapterList) -> String {
    let mut out = String::new();
    for chapter in &list.chapters {
        out.push_str(&format!(
            "CHAPTER{:02}={}\nCHAPTER{:02}NAME={}\n",
            chapter.index,
            format_hms_millis(chapter.time_seconds),
            chapter.index,
            chapter.label
        ));
    }
    let sentinel = list.len() + 1;
    out.push_str(&format!(
        "CHAPTER{:02}={}\nCHAPTER{:02}NAME=\n",
        sentinel,
        format_hms_millis(list.total_duration),
        sentinel
    ));
    out
}

/// GPAC timed-text chapter track with an empty sample at the total duration
pub fn ttxt_text(list: &ChapterList) -> String {
    let mut out = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n\
         <!-- GPAC 3GPP Text Stream -->\n\
         <TextStream version=\"1.1\">\n\
         <TextStreamHeader>\n\
         <TextSampleDescription>\n\
         </TextSampleDescription>\n\
         </TextStreamHeader>\n",
    );
    for chapter in &list.chapters {
        out.push_str(&format!(
            "<TextSample sampleTime=\"{}\">{}</TextSample>\n",
            format_hms_millis(chapter.time_seconds),
            escape_xml(&chapter.label)
        ));
    }
    out.push_str(&format!(
        "<TextSample sampleTime=\"{}\"></TextSample>\n",
        format_hms_millis(list.total_duration)
    ));
    out.push_str("</TextStream>\n");
    out
}

/// ffmpeg metadata chapters; the last chapter ends at the total duration
pub fn ffmetadata_text(list: &ChapterList) -> String {
    let mut out = String::from(";FFMETADATA1\n");
    for (position, chapter) in list.chapters.iter().enumerate() {
        let end = list
            .chapters
            .get(position + 1)
            .map(|next| next.time_seconds)
            .unwrap_or(list.total_duration);
        out.push_str(&format!(
            "\n[CHAPTER]\nTIMEBASE=1/1000\nSTART={}\nEND={}\ntitle={}\n",
            to_millis(chapter.time_seconds),
            to_millis(end),
            escape_ffmetadata(&chapter.label)
        ));
    }
    out
}

/// Write every enabled chapter format next to `stem_path`
pub fn write_chapter_files(
    fs: &dyn FsPort,
    stem_path: &Path,
    list: &ChapterList,
    config: &ChapterConfig,
) -> BreakcutResult<Vec<PathBuf>> {
    let mut written = Vec::new();
    let formats = [
        (config.ogm, ChapterFormat::Ogm),
        (config.ttxt, ChapterFormat::Ttxt),
        (config.ffmetadata, ChapterFormat::FfMetadata),
    ];

    for (enabled, format) in formats {
        if !enabled {
            continue;
        }
        let path = format.path_for(stem_path);
        let text = match format {
            ChapterFormat::Ogm => ogm_text(list),
            ChapterFormat::Ttxt => ttxt_text(list),
            ChapterFormat::FfMetadata => ffmetadata_text(list),
        };
        fs.write_text(&path, &text)?;
        debug!("Wrote {} chapters to {}", list.len(), path.display());
        written.push(path);
    }

    Ok(written)
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_ffmetadata(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '=' | ';' | '#' | '\\' | '\n') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::LocalFsAdapter;
    use crate::domain::model::{ChapterMarker, KeepSegment, Timeline};

    fn cut_chapters() -> ChapterList {
        let segments = [KeepSegment::new(3.0, 40.0), KeepSegment::new(45.0, 97.0)];
        Timeline::new(100.0, 0.0, 5.0).chapters(&segments, true).unwrap()
    }

    #[test]
    fn test_ogm_has_sentinel() {
        let text = ogm_text(&cut_chapters());
        assert_eq!(
            text,
            "CHAPTER01=00:00:00.000\nCHAPTER01NAME=Chapter 1\n\
             CHAPTER02=00:00:37.000\nCHAPTER02NAME=Chapter 2\n\
             CHAPTER03=00:01:29.000\nCHAPTER03NAME=\n"
        );
    }

    #[test]
    fn test_ttxt_escapes_labels() {
        let list = ChapterList {
            chapters: vec![ChapterMarker {
                index: 1,
                time_seconds: 0.0,
                label: "Tom & Jerry <live>".to_string(),
            }],
            total_duration: 60.0,
        };
        let text = ttxt_text(&list);
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n"));
        assert!(text.contains(
            "<TextSample sampleTime=\"00:00:00.000\">Tom &amp; Jerry &lt;live&gt;</TextSample>\n"
        ));
        assert!(text.contains("<TextSample sampleTime=\"00:01:00.000\"></TextSample>\n"));
        assert!(text.ends_with("</TextStream>\n"));
    }

    #[test]
    fn test_ffmetadata_bounds() {
        let text = ffmetadata_text(&cut_chapters());
        assert!(text.starts_with(";FFMETADATA1\n"));
        assert!(text.contains("START=0\nEND=37000\ntitle=Chapter 1\n"));
        assert!(text.contains("START=37000\nEND=89000\ntitle=Chapter 2\n"));
    }

    #[test]
    fn test_write_only_enabled_formats() {
        let dir = tempfile::tempdir().unwrap();
        let stem = dir.path().join("show");
        let config = ChapterConfig {
            ogm: true,
            ttxt: false,
            ffmetadata: true,
        };

        let written =
            write_chapter_files(&LocalFsAdapter::new(), &stem, &cut_chapters(), &config).unwrap();

        assert_eq!(
            written,
            vec![dir.path().join("show.chap"), dir.path().join("show.ffmeta")]
        );
        assert!(!dir.path().join("show.ttxt").exists());
    }
}
