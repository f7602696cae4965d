use std::borrow::Cow;
use std::fs;
use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use regex::{NoExpand, Regex};

use super::SyncError;

/// Rewrites local media paths inside playlist lines to their equivalents on
/// the playback device.
///
/// The substitution anchors on the literal `Library` path segment: everything
/// up to and including the last occurrence of the marker is replaced with
/// `<device_music_dir>Library`. A line without the marker passes through
/// unchanged, so paths outside the library silently keep their local form.
pub struct PathRewriteRule {
    marker: Regex,
    replacement: String,
}

impl PathRewriteRule {
    /// `device_music_dir` is the absolute music directory on the playback
    /// device, ending with a slash (e.g. `/storage/XXXX-XXXX/Music/`).
    pub fn new(device_music_dir: &str) -> Result<Self> {
        let marker = Regex::new(r"(.+)Library").wrap_err("Failed to create regex")?;
        Ok(Self {
            marker,
            replacement: format!("{device_music_dir}Library"),
        })
    }

    pub fn apply<'a>(&self, line: &'a str) -> Cow<'a, str> {
        self.marker.replace(line, NoExpand(&self.replacement))
    }
}

/// Rewrite a playlist file line by line into `target`, creating intermediate
/// directories and overwriting any previous converted copy. No line is
/// dropped or reordered.
pub fn rewrite_playlist(
    source: &Path,
    target: &Path,
    rule: &PathRewriteRule,
) -> Result<(), SyncError> {
    if !source.is_file() {
        return Err(SyncError::PlaylistFileNotFound {
            path: source.to_path_buf(),
        });
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }

    let contents = fs::read_to_string(source)?;
    let mut converted = String::with_capacity(contents.len());
    for line in contents.lines() {
        converted.push_str(&rule.apply(line));
        converted.push('\n');
    }
    fs::write(target, converted)?;

    log::debug!("Converted {} to {}", source.display(), target.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn rule() -> PathRewriteRule {
        PathRewriteRule::new("/storage/XXXX-XXXX/Music/").unwrap()
    }

    #[test]
    fn rewrites_the_library_prefix() {
        let line = rule().apply("../../Library/Eminem/Eyo/Rivers.mp3");
        assert_eq!(line, "/storage/XXXX-XXXX/Music/Library/Eminem/Eyo/Rivers.mp3");
    }

    #[test]
    fn absolute_prefixes_are_rewritten_too() {
        let line = rule().apply("O:/Media/Music/Library/Artist/Album/Track.flac");
        assert_eq!(
            line,
            "/storage/XXXX-XXXX/Music/Library/Artist/Album/Track.flac"
        );
    }

    #[test]
    fn lines_without_the_marker_pass_through() {
        let line = rule().apply("../../Podcasts/Episode 1.mp3");
        assert_eq!(line, "../../Podcasts/Episode 1.mp3");
    }

    #[test]
    fn missing_source_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = rewrite_playlist(
            &dir.path().join("absent.m3u"),
            &dir.path().join("out.m3u"),
            &rule(),
        )
        .unwrap_err();
        assert!(matches!(err, SyncError::PlaylistFileNotFound { .. }));
    }

    #[test]
    fn preserves_line_count_and_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("Folk.m3u");
        std::fs::write(
            &source,
            "../../Library/A/B/one.mp3\nno marker here\n../../Library/C/D/two.mp3\n",
        )
        .unwrap();

        let target = dir.path().join("Converted/Genres/Folk.m3u");
        rewrite_playlist(&source, &target, &rule()).unwrap();

        let converted = std::fs::read_to_string(&target).unwrap();
        let lines: Vec<&str> = converted.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "/storage/XXXX-XXXX/Music/Library/A/B/one.mp3");
        assert_eq!(lines[1], "no marker here");
        assert_eq!(lines[2], "/storage/XXXX-XXXX/Music/Library/C/D/two.mp3");
    }

    #[test]
    fn overwrites_a_previous_converted_copy() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("Folk.m3u");
        std::fs::write(&source, "../../Library/A/B/one.mp3\n").unwrap();

        let target = dir.path().join("Folk.converted.m3u");
        std::fs::write(&target, "stale contents\nfrom a previous run\n").unwrap();
        rewrite_playlist(&source, &target, &rule()).unwrap();

        let converted = std::fs::read_to_string(&target).unwrap();
        assert_eq!(converted, "/storage/XXXX-XXXX/Music/Library/A/B/one.mp3\n");
    }
}
