// Local filesystem adapter - File system operations on the host filesystem

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::BreakcutResult;
use crate::ports::FsPort;

/// Local filesystem adapter
#[derive(Debug, Clone, Default)]
pub struct LocalFsAdapter;

impl LocalFsAdapter {
    /// Create new local filesystem adapter
    pub fn new() -> Self {
        Self
    }
}

impl FsPort for LocalFsAdapter {
    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn file_size(&self, path: &Path) -> BreakcutResult<u64> {
        Ok(fs::metadata(path)?.len())
    }

    fn read_text(&self, path: &Path) -> BreakcutResult<String> {
        Ok(fs::read_to_string(path)?)
    }

    fn write_text(&self, path: &Path, contents: &str) -> BreakcutResult<()> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        // Readers never observe a half-written file
        let mut temp = tempfile::Builder::new()
            .prefix(".breakcut-")
            .tempfile_in(parent)?;
        temp.write_all(contents.as_bytes())?;
        temp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn replace(&self, from: &Path, to: &Path) -> BreakcutResult<()> {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(rename_err) => {
                // Windows refuses to rename over an existing file; other
                // platforms fail across devices
                warn!(
                    "Rename {} -> {} failed ({}), retrying",
                    from.display(),
                    to.display(),
                    rename_err
                );
                if to.exists() {
                    fs::remove_file(to)?;
                    if fs::rename(from, to).is_ok() {
                        return Ok(());
                    }
                }
                fs::copy(from, to)?;
                fs::remove_file(from)?;
                Ok(())
            }
        }
    }

    fn safe_delete(&self, path: &Path) -> bool {
        match fs::remove_file(path) {
            Ok(()) => {
                debug!("Deleted {}", path.display());
                true
            }
            Err(_) => false,
        }
    }
}
