//! Canonical marker file resolution.
//!
//! Two candidate files may exist for a recording: a simplified `<stem>.edl` and a
//! per-frame precise `<stem>.edlp`. One of them is chosen, copied without its
//! degenerate lines to `<work_dir>/<stem>.edl`, and parsed back through the
//! timeline before any removal starts.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::format::{parse_marker_text, strip_degenerate_lines};
use crate::config::RemovalConfig;
use crate::domain::model::{KeepSegment, Timeline};
use crate::error::{BreakcutError, BreakcutResult};
use crate::output::chapters::write_chapter_files;
use crate::planner::StrategyKind;
use crate::ports::FsPort;
use crate::utils::path::stem_of;

/// Marker file flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerFormat {
    /// Cut list at keyframe granularity
    Simplified,
    /// Per-frame precise cut list
    Precise,
}

impl MarkerFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Simplified => "edl",
            Self::Precise => "edlp",
        }
    }
}

/// Candidate marker files found for a source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerCandidates {
    pub simplified: Option<PathBuf>,
    pub precise: Option<PathBuf>,
}

impl MarkerCandidates {
    fn get(&self, format: MarkerFormat) -> Option<&PathBuf> {
        match format {
            MarkerFormat::Simplified => self.simplified.as_ref(),
            MarkerFormat::Precise => self.precise.as_ref(),
        }
    }

    /// Choose the authoritative candidate.
    ///
    /// A forced format wins when its file exists. Otherwise containers that prefer
    /// the simplified format take it, and all others take the precise file if present.
    pub fn resolve(
        &self,
        force_precise: bool,
        force_simple: bool,
        prefer_simplified: bool,
    ) -> Option<(MarkerFormat, &PathBuf)> {
        let order = if force_precise && self.precise.is_some() {
            [MarkerFormat::Precise, MarkerFormat::Simplified]
        } else if force_simple && self.simplified.is_some() {
            [MarkerFormat::Simplified, MarkerFormat::Precise]
        } else if prefer_simplified {
            [MarkerFormat::Simplified, MarkerFormat::Precise]
        } else {
            [MarkerFormat::Precise, MarkerFormat::Simplified]
        };

        order
            .into_iter()
            .find_map(|format| self.get(format).map(|path| (format, path)))
    }
}

/// Result of establishing the canonical marker file
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayOutcome {
    /// Canonical file written and parsed into keep-segments
    Segments {
        canonical: PathBuf,
        segments: Vec<KeepSegment>,
    },
    /// No marker file, or no commercials in it; removal is skipped
    NoCommercials,
}

/// Locates, normalizes and validates marker files
pub struct MarkerGateway<'a> {
    fs: &'a dyn FsPort,
    config: &'a RemovalConfig,
}

impl<'a> MarkerGateway<'a> {
    pub fn new(fs: &'a dyn FsPort, config: &'a RemovalConfig) -> Self {
        Self { fs, config }
    }

    /// Canonical marker file location for `source`
    pub fn canonical_path(source: &Path, work_dir: &Path) -> PathBuf {
        work_dir.join(format!("{}.{}", stem_of(source), MarkerFormat::Simplified.extension()))
    }

    /// Look for both candidate formats in the working directory, then beside the source
    pub fn locate(&self, source: &Path, work_dir: &Path) -> MarkerCandidates {
        let stem = stem_of(source);
        let source_dir = match source.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let find = |format: MarkerFormat| {
            let name = format!("{}.{}", stem, format.extension());
            [work_dir.join(&name), source_dir.join(&name)]
                .into_iter()
                .find(|path| self.fs.file_exists(path))
        };

        MarkerCandidates {
            simplified: find(MarkerFormat::Simplified),
            precise: find(MarkerFormat::Precise),
        }
    }

    /// Resolve, persist and validate the canonical marker file.
    ///
    /// With `explicit` set, that file is copied to the canonical location and
    /// left in place. Otherwise the winning candidate is moved there and the
    /// losing candidate is deleted.
    pub fn establish(
        &self,
        source: &Path,
        work_dir: &Path,
        strategy: StrategyKind,
        timeline: &Timeline,
        explicit: Option<&Path>,
    ) -> BreakcutResult<GatewayOutcome> {
        let canonical = Self::canonical_path(source, work_dir);

        let winner = match explicit {
            Some(path) => {
                if !self.fs.file_exists(path) {
                    return Err(BreakcutError::marker_file(format!(
                        "Marker file not found: {}",
                        path.display()
                    )));
                }
                path.to_path_buf()
            }
            None => {
                let candidates = self.locate(source, work_dir);
                let Some((format, winner)) = candidates.resolve(
                    self.config.markers.force_precise,
                    self.config.markers.force_simple,
                    strategy.prefers_simplified_markers(),
                ) else {
                    info!("No marker file found for {}", source.display());
                    return Ok(GatewayOutcome::NoCommercials);
                };
                let winner = winner.clone();
                debug!(format = ?format, path = %winner.display(), "Selected marker file");

                for loser in [&candidates.simplified, &candidates.precise].into_iter().flatten() {
                    if *loser != winner && *loser != canonical {
                        self.fs.safe_delete(loser);
                    }
                }
                winner
            }
        };

        let raw = self.fs.read_text(&winner)?;
        self.fs.write_text(&canonical, &strip_degenerate_lines(&raw))?;
        if explicit.is_none() && winner != canonical {
            self.fs.safe_delete(&winner);
        }

        self.validate(&canonical, timeline)
    }

    /// Parse the canonical file back through the timeline
    fn validate(&self, canonical: &Path, timeline: &Timeline) -> BreakcutResult<GatewayOutcome> {
        let text = self.fs.read_text(canonical)?;
        let markers = match parse_marker_text(&text) {
            Ok(markers) => markers,
            Err(e) => {
                warn!("Discarding malformed marker file {}: {}", canonical.display(), e);
                self.fs.safe_delete(canonical);
                return Err(e.into());
            }
        };

        let segments = timeline.keep_segments(&markers)?;

        if segments.is_empty() {
            info!("No commercials found in {}", canonical.display());
            self.fs.safe_delete(canonical);
            return Ok(GatewayOutcome::NoCommercials);
        }

        let chapters = timeline.chapters(&segments, false)?;
        write_chapter_files(
            self.fs,
            &canonical.with_extension(""),
            &chapters,
            &self.config.chapters,
        )?;

        info!(
            "Canonical marker file {} yields {} keep-segments",
            canonical.display(),
            segments.len()
        );
        Ok(GatewayOutcome::Segments {
            canonical: canonical.to_path_buf(),
            segments,
        })
    }
}
