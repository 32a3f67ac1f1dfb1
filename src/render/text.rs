//! Status text

use std::fmt;
use std::path::Path;

/// Shorten long filenames by replacing the middle with `...`
pub fn truncate_filename(filename: &str, max_len: usize) -> String {
    let chars: Vec<char> = filename.chars().collect();
    if chars.len() <= max_len {
        return filename.to_string();
    }

    let keep = (max_len / 2).saturating_sub(1);
    let head: String = chars[..keep].iter().collect();
    let tail: String = chars[chars.len() - keep..].iter().collect();
    format!("{head}...{tail}")
}

/// The file/frame line under the canvas
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
    NoFile,
    Loaded {
        filename: String,
        index: usize,
        total_frames: usize,
    },
}

impl StatusLine {
    pub fn loaded(path: &Path, index: usize, total_frames: usize, max_len: usize) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        StatusLine::Loaded {
            filename: truncate_filename(&name, max_len),
            index,
            total_frames,
        }
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusLine::NoFile => f.write_str("No file loaded"),
            StatusLine::Loaded {
                filename,
                index,
                total_frames,
            } => write!(
                f,
                "File: {} | Frame: {}/{}",
                filename,
                index,
                total_frames.saturating_sub(1)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_filename_untouched() {
        assert_eq!(truncate_filename("clip.mp4", 40), "clip.mp4");
    }

    #[test]
    fn test_long_filename_truncated_in_middle() {
        let name = "a_really_long_recording_name_from_the_field_camera_0001.mp4";
        let short = truncate_filename(name, 40);
        assert_eq!(short, "a_really_long_recor...eld_camera_0001.mp4");
        assert!(short.starts_with("a_really_long_recor"));
        assert!(short.ends_with("_0001.mp4"));
    }

    #[test]
    fn test_status_line_text() {
        let status = StatusLine::loaded(Path::new("/videos/clip.mp4"), 10, 30, 40);
        assert_eq!(status.to_string(), "File: clip.mp4 | Frame: 10/29");
        assert_eq!(StatusLine::NoFile.to_string(), "No file loaded");
    }
}
