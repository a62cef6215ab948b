//! Path helpers for working-directory file naming

use std::path::{Path, PathBuf};

use crate::domain::model::KeepSegment;

/// Lowercased extension without the dot, or an empty string
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// File stem as a string, or `"output"` when the path has none
pub fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string())
}

/// Normalize an extension given on the command line (`.TS` -> `ts`)
pub fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_lowercase()
}

/// Intermediate file for one keep-segment: `<stem>-<start>-<end>.<ext>` in `work_dir`.
///
/// Bounds are rounded to whole seconds so operators can match files to the timeline.
pub fn segment_file_path(work_dir: &Path, source: &Path, segment: &KeepSegment) -> PathBuf {
    let (start, end) = segment.rounded_bounds();
    let name = with_extension(
        format!("{}-{}-{}", stem_of(source), start, end),
        &extension_of(source),
    );
    work_dir.join(name)
}

/// `segment_file_path`, with a `-<n>` suffix when that name is already in `taken`.
///
/// Sub-second segments can round to the same bounds.
pub fn unique_segment_file_path(
    work_dir: &Path,
    source: &Path,
    segment: &KeepSegment,
    taken: &[PathBuf],
) -> PathBuf {
    let path = segment_file_path(work_dir, source, segment);
    if !taken.contains(&path) {
        return path;
    }

    let (start, end) = segment.rounded_bounds();
    let base = format!("{}-{}-{}", stem_of(source), start, end);
    let extension = extension_of(source);
    let mut n = 2;
    loop {
        let candidate = work_dir.join(with_extension(format!("{}-{}", base, n), &extension));
        if !taken.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Merged output produced before the final rename: `<stem>.merged.<ext>`
pub fn merged_file_path(work_dir: &Path, source: &Path) -> PathBuf {
    work_dir.join(with_extension(
        format!("{}.merged", stem_of(source)),
        &extension_of(source),
    ))
}

/// Concat list consumed by the ffmpeg concat demuxer: `<stem>.<ext>.concat.txt`
pub fn concat_list_path(work_dir: &Path, source: &Path) -> PathBuf {
    work_dir.join(format!(
        "{}.concat.txt",
        with_extension(stem_of(source), &extension_of(source))
    ))
}

/// Final working copy location: the source's file name inside `work_dir`
pub fn working_copy_path(work_dir: &Path, source: &Path) -> PathBuf {
    match source.file_name() {
        Some(name) => work_dir.join(name),
        None => work_dir.join("output"),
    }
}

/// Whether `path` lives directly inside `dir`
pub fn is_inside_dir(path: &Path, dir: &Path) -> bool {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    match (parent.canonicalize(), dir.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => parent == dir,
    }
}

fn with_extension(base: String, extension: &str) -> String {
    if extension.is_empty() {
        base
    } else {
        format!("{}.{}", base, extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_file_path_is_deterministic() {
        let source = Path::new("/recordings/Show Name.ts");
        let segment = KeepSegment::new(3.2, 39.7);
        let path = segment_file_path(Path::new("/work"), source, &segment);
        assert_eq!(path, PathBuf::from("/work/Show Name-3-40.ts"));
    }

    #[test]
    fn test_segment_paths_with_equal_rounded_bounds_do_not_collide() {
        let work = Path::new("/work");
        let source = Path::new("/recordings/show.ts");
        let first = KeepSegment::new(10.1, 10.4);
        let second = KeepSegment::new(10.42, 10.49);

        let a = unique_segment_file_path(work, source, &first, &[]);
        assert_eq!(a, PathBuf::from("/work/show-10-10.ts"));

        let b = unique_segment_file_path(work, source, &second, &[a.clone()]);
        assert_eq!(b, PathBuf::from("/work/show-10-10-2.ts"));

        let c = unique_segment_file_path(work, source, &second, &[a, b]);
        assert_eq!(c, PathBuf::from("/work/show-10-10-3.ts"));
    }

    #[test]
    fn test_merged_and_concat_paths() {
        let source = Path::new("/recordings/show.mp4");
        assert_eq!(
            merged_file_path(Path::new("/work"), source),
            PathBuf::from("/work/show.merged.mp4")
        );
        assert_eq!(
            concat_list_path(Path::new("/work"), source),
            PathBuf::from("/work/show.mp4.concat.txt")
        );
        assert_ne!(
            concat_list_path(Path::new("/work"), Path::new("/recordings/show.ts")),
            concat_list_path(Path::new("/work"), source)
        );
        assert_eq!(
            working_copy_path(Path::new("/work"), source),
            PathBuf::from("/work/show.mp4")
        );
    }

    #[test]
    fn test_extension_helpers() {
        assert_eq!(extension_of(Path::new("a/b.M2TS")), "m2ts");
        assert_eq!(extension_of(Path::new("a/b")), "");
        assert_eq!(normalize_extension(".MKV"), "mkv");
        assert_eq!(stem_of(Path::new("dir/file.name.ts")), "file.name");
    }

    #[test]
    fn test_is_inside_dir() {
        let dir = tempfile::tempdir().unwrap();
        let inside = dir.path().join("show.ts");
        std::fs::write(&inside, b"x").unwrap();
        assert!(is_inside_dir(&inside, dir.path()));

        let other = tempfile::tempdir().unwrap();
        assert!(!is_inside_dir(&inside, other.path()));
    }
}
