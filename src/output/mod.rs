//! Chapter file output

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub mod chapters;

pub use chapters::{ffmetadata_text, ogm_text, ttxt_text};

/// Chapter file flavours written beside the canonical marker file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChapterFormat {
    /// Paired-line `CHAPTERxx=` text
    Ogm,
    /// GPAC timed-text XML
    Ttxt,
    /// ffmpeg `;FFMETADATA1`
    FfMetadata,
}

impl ChapterFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Ogm => "chap",
            Self::Ttxt => "ttxt",
            Self::FfMetadata => "ffmeta",
        }
    }

    /// Chapter file path for a marker or media stem path (`/work/show` -> `/work/show.chap`)
    pub fn path_for(&self, stem_path: &Path) -> PathBuf {
        let mut name = stem_path.as_os_str().to_os_string();
        name.push(".");
        name.push(self.extension());
        PathBuf::from(name)
    }
}
