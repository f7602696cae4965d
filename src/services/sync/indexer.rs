use std::collections::BTreeMap;
use std::path::Path;

use super::SyncError;

/// Scan the playlists directory and map each playlist name to its sub-folder
/// ("" for files at the top level).
///
/// The scan goes exactly one sub-folder deep; anything nested further is
/// logged and skipped. Names collide across folders last-seen wins.
pub fn index_local_playlists(root: &Path) -> Result<BTreeMap<String, String>, SyncError> {
    if !root.is_dir() {
        return Err(SyncError::DirectoryNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut index = BTreeMap::new();
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() {
            if let Some(name) = playlist_name(&path) {
                index.insert(name, String::new());
            }
        } else if path.is_dir() {
            let folder = entry.file_name().to_string_lossy().into_owned();
            for sub_entry in std::fs::read_dir(&path)? {
                let sub_path = sub_entry?.path();
                if sub_path.is_file() {
                    if let Some(name) = playlist_name(&sub_path) {
                        index.insert(name, folder.clone());
                    }
                } else {
                    log::error!(
                        "The directory hierarchy is deeper than one level at {}",
                        sub_path.display()
                    );
                }
            }
        }
    }

    if index.is_empty() {
        return Err(SyncError::EmptyDirectory {
            path: root.to_path_buf(),
        });
    }

    Ok(index)
}

fn playlist_name(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");

        let err = index_local_playlists(&missing).unwrap_err();
        assert!(matches!(err, SyncError::DirectoryNotFound { .. }));
    }

    #[test]
    fn empty_root_is_an_error() {
        let dir = TempDir::new().unwrap();

        let err = index_local_playlists(dir.path()).unwrap_err();
        assert!(matches!(err, SyncError::EmptyDirectory { .. }));
    }

    #[test]
    fn indexes_flat_files_and_one_folder_level() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Rock.m3u"), "").unwrap();
        fs::create_dir(dir.path().join("Genres")).unwrap();
        fs::write(dir.path().join("Genres/Folk.m3u"), "").unwrap();

        let index = index_local_playlists(dir.path()).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index["Rock"], "");
        assert_eq!(index["Folk"], "Genres");
    }

    #[test]
    fn deeper_nesting_is_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Rock.m3u"), "").unwrap();
        fs::create_dir_all(dir.path().join("Genres/Deep")).unwrap();
        fs::write(dir.path().join("Genres/Deep/Hidden.m3u"), "").unwrap();

        let index = index_local_playlists(dir.path()).unwrap();
        assert_eq!(index.len(), 1);
        assert!(!index.contains_key("Hidden"));
    }

    #[test]
    fn strips_the_playlist_extension() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Best of 2023.m3u"), "").unwrap();

        let index = index_local_playlists(dir.path()).unwrap();
        assert!(index.contains_key("Best of 2023"));
    }
}
