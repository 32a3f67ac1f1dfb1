//! Frame export
//!
//! Each opened video gets an output directory named after its file stem.
//! Frames are written there as `frame_<index>.<ext>`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use tracing::{info, warn};

use super::source::Frame;
use crate::error::ViewerError;

/// Marker recording which video an output directory belongs to
const OWNER_FILE: &str = ".source";

/// Output directories handed out to opened videos
///
/// Two different videos sharing a file stem get distinct directories
/// (`clip`, `clip_2`, ...), also across runs: a non-empty directory left by
/// another video is skipped. Reopening the same video gets its old one back.
#[derive(Debug, Default)]
pub struct OutputDirs {
    root: PathBuf,
    /// Directory → source video it belongs to
    claimed: HashMap<PathBuf, PathBuf>,
}

impl OutputDirs {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            claimed: HashMap::new(),
        }
    }

    /// Pick (and create) the output directory for `source`
    ///
    /// Creation failures are logged, not returned: the video still opens
    /// and saving reports the problem later.
    pub fn claim(&mut self, source: &Path) -> PathBuf {
        let source_key = fs::canonicalize(source).unwrap_or_else(|_| source.to_path_buf());
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "frames".to_string());

        let mut suffix = 1;
        let dir = loop {
            let name = if suffix == 1 {
                stem.clone()
            } else {
                format!("{stem}_{suffix}")
            };
            let candidate = self.root.join(name);
            let free = match self.claimed.get(&candidate) {
                Some(owner) => *owner == source_key,
                None => is_reusable(&candidate, &source_key),
            };
            if free {
                break candidate;
            }
            suffix += 1;
        };

        let created = fs::create_dir_all(&dir).and_then(|_| {
            fs::write(dir.join(OWNER_FILE), source_key.to_string_lossy().as_bytes())
        });
        if let Err(e) = created {
            warn!("Failed to create output directory {}: {}", dir.display(), e);
        }
        self.claimed.insert(dir.clone(), source_key);
        dir
    }
}

/// A directory on disk can be taken if it is missing, empty, or already
/// owned by `source`
fn is_reusable(dir: &Path, source: &Path) -> bool {
    let Ok(mut entries) = fs::read_dir(dir) else {
        return !dir.exists();
    };
    if entries.next().is_none() {
        return true;
    }
    fs::read_to_string(dir.join(OWNER_FILE))
        .map(|owner| Path::new(&owner) == source)
        .unwrap_or(false)
}

/// Path a frame is exported to
pub fn frame_path(dir: &Path, index: usize, extension: &str) -> PathBuf {
    dir.join(format!("frame_{index}.{extension}"))
}

/// Write `frame` into `dir`, returning the written path
pub fn save_frame(dir: &Path, frame: &Frame, format: ImageFormat) -> Result<PathBuf, ViewerError> {
    let extension = format.extensions_str().first().copied().unwrap_or("png");
    let path = frame_path(dir, frame.index, extension);

    let export_error = |reason: String| ViewerError::Export {
        path: path.clone(),
        reason,
    };

    fs::create_dir_all(dir).map_err(|e| export_error(e.to_string()))?;
    frame
        .image
        .save_with_format(&path, format)
        .map_err(|e| export_error(e.to_string()))?;

    info!("Frame saved to {}", path.display());
    Ok(path)
}
