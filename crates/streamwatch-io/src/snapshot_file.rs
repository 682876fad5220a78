//! Snapshot file: hands detector state to out-of-process display tools.
//!
//! Writes are atomic (write to `.tmp`, then rename) so a reader polling
//! the file never sees a half-written snapshot.

use std::path::{Path, PathBuf};

use streamwatch_detector::DetectorSnapshot;

use crate::error::IoResult;

/// JSON file holding the latest [`DetectorSnapshot`].
pub struct JsonSnapshotFile {
    path: PathBuf,
}

impl JsonSnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the file contents with `snapshot`.
    pub fn write(&self, snapshot: &DetectorSnapshot) -> IoResult<()> {
        let json = serde_json::to_string_pretty(snapshot)?;

        let tmp_path = self.path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Read the last written snapshot, `None` if nothing was written yet.
    pub fn read(&self) -> IoResult<Option<DetectorSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }
}
