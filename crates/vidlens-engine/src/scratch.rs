//! Per-run scratch directories for extracted frames

use std::path::{Path, PathBuf};

use tracing::warn;
use vidlens_core::Result;

const MAX_STEM_LEN: usize = 40;

/// A uniquely named directory removed when the run ends.
///
/// Call [`ScratchDir::close`] on the normal path; dropping without closing
/// still removes the directory, synchronously.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
    removed: bool,
}

impl ScratchDir {
    /// Create `<root>/<video-stem>-<random>`
    pub async fn create(root: &Path, video: &Path) -> Result<Self> {
        let path = root.join(scratch_name(video));
        tokio::fs::create_dir_all(&path).await?;
        Ok(Self {
            path,
            removed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Location for the 1-based frame `number`
    pub fn frame_path(&self, number: usize) -> PathBuf {
        self.path.join(format!("frame_{:05}.jpg", number))
    }

    pub async fn close(mut self) {
        if let Err(e) = tokio::fs::remove_dir_all(&self.path).await {
            warn!("Failed to remove scratch dir {}: {}", self.path.display(), e);
        }
        self.removed = true;
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if !self.removed {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }
}

fn scratch_name(video: &Path) -> String {
    let stem: String = video
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .take(MAX_STEM_LEN)
        .collect();

    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let stem = if stem.is_empty() { "video".to_string() } else { stem };
    format!("{}-{}", stem, &suffix[..12])
}
