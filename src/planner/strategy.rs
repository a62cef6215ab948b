//! Strategy selection from container extension and profile overrides

use tracing::debug;

use super::StrategyKind;
use crate::config::RemovalConfig;
use crate::error::{BreakcutError, BreakcutResult};
use crate::utils::path::normalize_extension;

/// Maps container extensions to removal strategies
pub struct StrategySelector<'a> {
    config: &'a RemovalConfig,
}

impl<'a> StrategySelector<'a> {
    pub fn new(config: &'a RemovalConfig) -> Self {
        Self { config }
    }

    /// Pick the strategy for `extension` under `profile`
    pub fn select(&self, extension: &str, profile: &str) -> BreakcutResult<StrategyKind> {
        let extension = normalize_extension(extension);
        let overrides = self.config.profile(profile);

        let kind = if overrides.force_universal {
            StrategyKind::Universal
        } else {
            match StrategyKind::for_extension(&extension) {
                Some(kind) => kind,
                None if overrides.universal_remover => StrategyKind::Universal,
                None => {
                    return Err(BreakcutError::UnsupportedContainer { extension });
                }
            }
        };

        debug!(extension = %extension, profile, strategy = %kind, "Selected removal strategy");
        Ok(kind)
    }

    /// Native containers are always supported; others need a universal override on the profile
    pub fn is_supported(&self, extension: &str, profile: &str) -> bool {
        self.select(extension, profile).is_ok()
    }

    /// Strategy for the whole-job retry, if fallback is enabled
    pub fn outer_fallback(&self, failed: StrategyKind) -> Option<StrategyKind> {
        if !self.config.strategy_fallback {
            return None;
        }
        failed.outer_fallback()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ProfileOverrides, DEFAULT_PROFILE};
    use crate::planner::{ExtractTool, MergeTool, RemovalPlan};

    fn config_with_profile(name: &str, overrides: ProfileOverrides) -> RemovalConfig {
        let mut config = RemovalConfig::default();
        config.profiles.insert(name.to_string(), overrides);
        config
    }

    #[test]
    fn test_native_containers() {
        let config = RemovalConfig::default();
        let selector = StrategySelector::new(&config);
        assert_eq!(selector.select("ts", DEFAULT_PROFILE).unwrap(), StrategyKind::MpegTs);
        assert_eq!(selector.select(".M2TS", DEFAULT_PROFILE).unwrap(), StrategyKind::MpegTs);
        assert_eq!(selector.select("mp4", DEFAULT_PROFILE).unwrap(), StrategyKind::Mp4);
        assert_eq!(selector.select("mkv", DEFAULT_PROFILE).unwrap(), StrategyKind::Matroska);
    }

    #[test]
    fn test_unknown_container_needs_universal_override() {
        let config = config_with_profile(
            "anything",
            ProfileOverrides {
                universal_remover: true,
                force_universal: false,
            },
        );
        let selector = StrategySelector::new(&config);

        assert!(!selector.is_supported("wtv", DEFAULT_PROFILE));
        let err = selector.select("wtv", DEFAULT_PROFILE).unwrap_err();
        assert!(matches!(err, BreakcutError::UnsupportedContainer { ref extension } if extension == "wtv"));

        assert!(selector.is_supported("wtv", "anything"));
        assert_eq!(selector.select("wtv", "anything").unwrap(), StrategyKind::Universal);
        assert_eq!(selector.select("ts", "anything").unwrap(), StrategyKind::MpegTs);
    }

    #[test]
    fn test_force_universal() {
        let config = config_with_profile(
            "generic",
            ProfileOverrides {
                universal_remover: false,
                force_universal: true,
            },
        );
        let selector = StrategySelector::new(&config);
        assert_eq!(selector.select("mp4", "generic").unwrap(), StrategyKind::Universal);
    }

    #[test]
    fn test_outer_fallback_is_one_shot() {
        let mut config = RemovalConfig::default();
        let selector = StrategySelector::new(&config);
        assert_eq!(selector.outer_fallback(StrategyKind::Mp4), Some(StrategyKind::Universal));
        assert_eq!(selector.outer_fallback(StrategyKind::Universal), None);

        config.strategy_fallback = false;
        let selector = StrategySelector::new(&config);
        assert_eq!(selector.outer_fallback(StrategyKind::MpegTs), None);
    }

    #[test]
    fn test_plans() {
        assert_eq!(
            StrategyKind::Mp4.plan("mp4"),
            RemovalPlan::SplitMerge {
                extract: ExtractTool::Mp4BoxSplit,
                merge: MergeTool::Mp4BoxCat,
                alternate: Some(MergeTool::FfmpegConcatDemuxer),
            }
        );
        assert_eq!(
            StrategyKind::Matroska.plan("mkv"),
            RemovalPlan::SinglePass {
                tool: MergeTool::MkvmergeSplit
            }
        );
        assert!(matches!(
            StrategyKind::Universal.plan("mkv"),
            RemovalPlan::SplitMerge { alternate: Some(MergeTool::MkvmergeAppend), .. }
        ));
        assert!(matches!(
            StrategyKind::Universal.plan("avi"),
            RemovalPlan::SplitMerge { alternate: None, .. }
        ));
        assert!(StrategyKind::MpegTs.prefers_simplified_markers());
        assert!(!StrategyKind::Mp4.prefers_simplified_markers());
    }
}
